//! ASCII Armor (RFC 4880 §6.2): the `-----BEGIN PGP ...-----` / `-----END
//! PGP ...-----` envelope wrapping base64-encoded binary data and a CRC-24
//! checksum.
//!
//! Decoding walks the envelope line by line through four states: looking
//! for the `BEGIN` line, consuming header lines, consuming base64 body
//! lines, and looking for the matching `END` line. This mirrors the line
//! classifier in `decodePkts` in the RPM source this crate is modeled on,
//! generalized from RPM's signature-only armor to every armor type RFC 4880
//! defines.

use alloc::string::String;
use alloc::vec::Vec;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::value::{is_known_armor_header, ArmorKind};
use super::{crc24, Error};

const BEGIN_PREFIX: &str = "-----BEGIN PGP ";
const END_PREFIX: &str = "-----END PGP ";
const DASHES_SUFFIX: &str = "-----";
const LINE_WIDTH: usize = 64;

#[derive(PartialEq, Eq)]
enum State {
    LookingForBegin,
    Headers,
    Body,
    LookingForEnd,
}

/// A decoded armor envelope: its type, the headers it carried (in order,
/// duplicates permitted), and the decoded binary payload.
#[derive(Clone, Debug)]
pub struct Armor {
    pub kind: ArmorKind,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Decode one armor envelope out of `input`.
///
/// Any text before the `BEGIN` line or after the matching `END` line is
/// ignored, matching how armor is conventionally embedded in mail and
/// other free-form text. Only the first envelope found is decoded.
pub fn decode(input: &str) -> Result<Armor, Error> {
    let mut state = State::LookingForBegin;
    let mut kind = None;
    let mut headers = Vec::new();
    let mut body_b64 = String::new();
    let mut crc_line: Option<&str> = None;

    for raw_line in input.lines() {
        let line = raw_line.trim_end_matches('\r');
        match state {
            State::LookingForBegin => {
                if let Some(label) = parse_dashed_line(line, BEGIN_PREFIX) {
                    kind = Some(ArmorKind::from_label(label).ok_or(Error::ArmorUnknownType)?);
                    state = State::Headers;
                }
            }
            State::Headers => {
                if line.is_empty() {
                    state = State::Body;
                } else {
                    let recognized = line
                        .split_once(':')
                        .map(|(key, value)| (key.trim(), value.trim()))
                        .filter(|(key, _)| is_known_armor_header(key));
                    match recognized {
                        Some((key, value)) => {
                            headers.push((String::from(key), String::from(value)));
                        }
                        // Anything else (an unrecognized key, or a line with
                        // no `:` at all) is not a header line: the armor
                        // parser abandons this envelope and starts looking
                        // for a new `BEGIN` line.
                        None => {
                            kind = None;
                            headers.clear();
                            state = State::LookingForBegin;
                        }
                    }
                }
            }
            State::Body => {
                if let Some(rest) = line.strip_prefix('=') {
                    crc_line = Some(rest);
                    state = State::LookingForEnd;
                } else {
                    body_b64.push_str(line.trim());
                }
            }
            State::LookingForEnd => {
                let label = parse_dashed_line(line, END_PREFIX).ok_or(Error::ArmorNoEnd)?;
                if ArmorKind::from_label(label) != kind {
                    return Err(Error::ArmorNoEnd);
                }
                let kind = kind.ok_or(Error::ArmorNoBegin)?;
                let body = STANDARD
                    .decode(body_b64.as_bytes())
                    .map_err(|_| Error::ArmorBodyDecode)?;
                let crc_bytes = STANDARD
                    .decode(crc_line.unwrap_or_default().as_bytes())
                    .map_err(|_| Error::ArmorCrcDecode)?;
                let crc = decode_crc24(&crc_bytes)?;
                if crc24(&body) != crc {
                    return Err(Error::ArmorCrcMismatch);
                }
                return Ok(Armor { kind, headers, body });
            }
        }
    }

    match state {
        State::LookingForBegin => Err(Error::ArmorNoBegin),
        _ => Err(Error::ArmorNoEnd),
    }
}

fn parse_dashed_line<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    line.strip_prefix(prefix)?.strip_suffix(DASHES_SUFFIX)
}

fn decode_crc24(crc_bytes: &[u8]) -> Result<u32, Error> {
    if crc_bytes.len() != 3 {
        return Err(Error::ArmorCrcDecode);
    }
    Ok(u32::from_be_bytes([0, crc_bytes[0], crc_bytes[1], crc_bytes[2]]))
}

/// Wrap `data` in an armor envelope of the given `kind`, with a single
/// `Version` header naming this crate.
pub fn encode(kind: ArmorKind, data: &[u8]) -> String {
    let mut out = String::new();
    out.push_str(BEGIN_PREFIX);
    out.push_str(kind.label());
    out.push_str(DASHES_SUFFIX);
    out.push('\n');
    out.push_str("Version: openpgp-parser ");
    out.push_str(env!("CARGO_PKG_VERSION"));
    out.push('\n');
    out.push('\n');

    let encoded = STANDARD.encode(data);
    for chunk in encoded.as_bytes().chunks(LINE_WIDTH) {
        // `chunks` on UTF-8-safe base64 alphabet bytes is always a valid
        // boundary.
        out.push_str(core::str::from_utf8(chunk).expect("base64 output is ASCII"));
        out.push('\n');
    }

    let crc = crc24(data);
    let crc_bytes = [(crc >> 16) as u8, (crc >> 8) as u8, crc as u8];
    out.push('=');
    out.push_str(&STANDARD.encode(crc_bytes));
    out.push('\n');

    out.push_str(END_PREFIX);
    out.push_str(kind.label());
    out.push_str(DASHES_SUFFIX);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_encode_and_decode() {
        let data = b"the quick brown fox jumps over the lazy dog, twice over".to_vec();
        let armored = encode(ArmorKind::Signature, &data);
        let decoded = decode(&armored).unwrap();
        assert_eq!(decoded.kind, ArmorKind::Signature);
        assert_eq!(decoded.body, data);
        assert!(decoded
            .headers
            .iter()
            .any(|(k, v)| k == "Version" && v.starts_with("openpgp-parser")));
    }

    #[test]
    fn rejects_mismatched_begin_end_labels() {
        let mut armored = encode(ArmorKind::Signature, b"hello");
        armored = armored.replace(
            "-----END PGP SIGNATURE-----",
            "-----END PGP PUBLIC KEY BLOCK-----",
        );
        assert_eq!(decode(&armored).unwrap_err(), Error::ArmorNoEnd);
    }

    #[test]
    fn rejects_corrupted_crc() {
        let mut armored = encode(ArmorKind::Message, b"payload bytes");
        // flip a character in the CRC line itself, not the body's own
        // base64 padding (which may also contain `=`)
        let crc_line_start = armored.find("\n=").unwrap() + 2;
        let mut bytes = armored.into_bytes();
        bytes[crc_line_start] = if bytes[crc_line_start] == b'A' { b'B' } else { b'A' };
        armored = String::from_utf8(bytes).unwrap();
        assert_eq!(decode(&armored).unwrap_err(), Error::ArmorCrcMismatch);
    }

    #[test]
    fn missing_begin_line_is_rejected() {
        assert_eq!(decode("just some text\n").unwrap_err(), Error::ArmorNoBegin);
    }

    #[test]
    fn unknown_armor_type_is_rejected() {
        let text = "-----BEGIN PGP NONSENSE-----\n\n=\n-----END PGP NONSENSE-----\n";
        assert_eq!(decode(text).unwrap_err(), Error::ArmorUnknownType);
    }

    #[test]
    fn unrecognized_header_line_abandons_the_envelope() {
        // An unrecognized header line isn't just skipped: it resets the
        // parser back to looking for a new `BEGIN` line, same as `rpmpgp.c`'s
        // `decodePkts` does on a `pgpValTok` miss while in the headers state.
        // Nothing here looks like a `BEGIN` line again, so decoding runs off
        // the end still looking for one.
        let text = concat!(
            "-----BEGIN PGP MESSAGE-----\n",
            "Version: test\n",
            "X-Custom: should abandon this envelope\n",
            "\n",
            "aGVsbG8=\n",
            "=jQRC\n",
            "-----END PGP MESSAGE-----\n",
        );
        assert_eq!(decode(text).unwrap_err(), Error::ArmorNoBegin);
    }

    #[test]
    fn recognized_header_lines_are_kept() {
        let text = concat!(
            "-----BEGIN PGP MESSAGE-----\n",
            "Version: test\n",
            "\n",
            "aGVsbG8=\n",
            "=jQRC\n",
            "-----END PGP MESSAGE-----\n",
        );
        let armor = decode(text).unwrap();
        assert_eq!(armor.headers, std::vec![(
            String::from("Version"),
            String::from("test"),
        )]);
    }
}
