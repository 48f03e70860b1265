//! User ID packets (tag 13, RFC 4880 §5.11): a single UTF-8 string with no
//! further structure.

use super::{packet, Error, Reader};

/// Parse a User ID packet, returning its text.
///
/// RFC 4880 does not actually require the body to be valid UTF-8 (the
/// conventional `Name (Comment) <email>` form is just a convention), but
/// every producer in practice emits UTF-8, and a verifier has no use for a
/// User ID it cannot display; non-UTF-8 bodies are rejected rather than
/// lossily converted.
pub fn parse(data: &[u8]) -> Result<&str, Error> {
    Reader::read_all(data, Error::TrailingJunk, read_userid)
}

/// Frame and parse the next packet in `reader` as a User ID.
pub fn read_userid<'a>(reader: &mut Reader<'a>) -> Result<&'a str, Error> {
    let pkt = packet::next(reader)?.ok_or(Error::PrematureEOF)?;
    if pkt.tag() != 13 {
        return Err(Error::IllFormedSignature);
    }
    core::str::from_utf8(pkt.contents()).map_err(|_| Error::IllFormedSignature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_userid_text() {
        let body = b"Jane Doe <jane@example.com>";
        let mut data = std::vec::Vec::new();
        data.push(0x80 | 0x40 | 13);
        data.push(body.len() as u8);
        data.extend_from_slice(body);
        assert_eq!(parse(&data).unwrap(), "Jane Doe <jane@example.com>");
    }

    #[test]
    fn rejects_non_utf8_body() {
        let body = [0xFF, 0xFE];
        let mut data = std::vec::Vec::new();
        data.push(0x80 | 0x40 | 13);
        data.push(body.len() as u8);
        data.extend_from_slice(&body);
        assert_eq!(parse(&data).unwrap_err(), Error::IllFormedSignature);
    }

    #[test]
    fn rejects_wrong_tag() {
        let body = b"not a user id";
        let mut data = std::vec::Vec::new();
        data.push(0x80 | 0x40 | 2); // tag 2 (signature)
        data.push(body.len() as u8);
        data.extend_from_slice(body);
        assert_eq!(parse(&data).unwrap_err(), Error::IllFormedSignature);
    }
}
