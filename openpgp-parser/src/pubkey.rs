//! Public-Key packets (tag 6), version 4 only (RFC 4880 §5.5.2).
//!
//! V3 public keys are deliberately unsupported — spec.md's Non-goals name
//! them explicitly, and RFC 4880 itself deprecates them.

use super::value::PublicKeyAlgorithm;
use super::{mpi, packet, Error, Reader};

/// A public key's algorithm-specific MPIs. Other algorithms are recognized
/// (spec §4.4: "stored but not verifiable") but their MPIs are not
/// individually split out — the raw remaining bytes are kept instead.
#[derive(Copy, Clone, Debug)]
pub enum PublicKeyMpis<'a> {
    Rsa { n: &'a [u8], e: &'a [u8] },
    Dsa { p: &'a [u8], q: &'a [u8], g: &'a [u8], y: &'a [u8] },
    Other(&'a [u8]),
}

/// A parsed v4 public-key packet.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct PubKeyInfo<'a> {
    pub version: u8,
    pub creation_time: u32,
    pub pkey_alg: PublicKeyAlgorithm,
    pub mpis: PublicKeyMpis<'a>,
    /// The whole packet body, needed by [`crate::fingerprint`] to compute
    /// the v4 fingerprint.
    pub body: &'a [u8],
}

/// Parse a public-key packet from a byte slice containing exactly one
/// packet.
pub fn parse(data: &[u8]) -> Result<PubKeyInfo<'_>, Error> {
    Reader::read_all(data, Error::TrailingJunk, read_pubkey)
}

/// Frame and parse the next packet in `reader` as a public key.
pub fn read_pubkey<'a>(reader: &mut Reader<'a>) -> Result<PubKeyInfo<'a>, Error> {
    let pkt = packet::next(reader)?.ok_or(Error::PrematureEOF)?;
    if pkt.tag() != 6 {
        return Err(Error::IllFormedSignature);
    }
    let body = pkt.contents();
    Reader::read_all(body, Error::TrailingJunk, |reader| {
        parse_packet_body(reader, body)
    })
}

fn parse_packet_body<'a>(reader: &mut Reader<'a>, body: &'a [u8]) -> Result<PubKeyInfo<'a>, Error> {
    let version = reader.byte()?;
    if version != 4 {
        return Err(Error::UnsupportedSignatureVersion);
    }
    let creation_time = reader.be_u32()?;
    let pkey_alg = PublicKeyAlgorithm::from_u8(reader.byte()?);

    let mpis = match pkey_alg {
        PublicKeyAlgorithm::Rsa | PublicKeyAlgorithm::RsaEncryptOnly | PublicKeyAlgorithm::RsaSignOnly => {
            let n = mpi::read(reader)?;
            let e = mpi::read(reader)?;
            PublicKeyMpis::Rsa { n, e }
        }
        PublicKeyAlgorithm::Dsa => {
            let p = mpi::read(reader)?;
            let q = mpi::read(reader)?;
            let g = mpi::read(reader)?;
            let y = mpi::read(reader)?;
            PublicKeyMpis::Dsa { p, q, g, y }
        }
        _ => PublicKeyMpis::Other(reader.rest()),
    };

    if !reader.is_empty() {
        return Err(Error::MismatchedMpiCount);
    }

    log::trace!("parsed v4 {:?} public key", pkey_alg);

    Ok(PubKeyInfo {
        version,
        creation_time,
        pkey_alg,
        mpis,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rsa_key_fixture(modulus_magnitude: &[u8]) -> std::vec::Vec<u8> {
        let bits = modulus_magnitude.len() * 8
            - usize::try_from(modulus_magnitude[0].leading_zeros()).unwrap();
        let mut body = std::vec::Vec::new();
        body.push(4); // version
        body.extend_from_slice(&1_650_000_000u32.to_be_bytes());
        body.push(1); // RSA
        body.extend_from_slice(&(bits as u16).to_be_bytes());
        body.extend_from_slice(modulus_magnitude);
        body.extend_from_slice(&[0x00, 0x02, 0x03]); // e: 2 bits, octet 0x03

        let mut packet = std::vec::Vec::new();
        packet.push(0x80 | 0x40 | 6); // new format, tag 6
        packet.push(body.len() as u8);
        packet.extend_from_slice(&body);
        packet
    }

    #[test]
    fn parses_rsa_key() {
        let data = rsa_key_fixture(&[0xFF, 0xEE]);
        let key = parse(&data).unwrap();
        assert_eq!(key.version, 4);
        assert_eq!(key.creation_time, 1_650_000_000);
        match key.mpis {
            PublicKeyMpis::Rsa { n, e } => {
                assert_eq!(n, &[0xFF, 0xEE]);
                assert_eq!(e, &[0x03]);
            }
            _ => panic!("expected RSA key"),
        }
    }

    #[test]
    fn truncated_modulus_is_rejected() {
        // Declares a 2048-bit modulus but only 100 octets follow: the
        // `mpi::read` call for `n` hits end-of-input.
        let mut body = std::vec::Vec::new();
        body.push(4);
        body.extend_from_slice(&0u32.to_be_bytes());
        body.push(1); // RSA
        body.extend_from_slice(&2048u16.to_be_bytes());
        body.extend(std::iter::repeat(0xFFu8).take(100));

        let mut packet = std::vec::Vec::new();
        packet.push(0x80 | 0x40 | 6);
        packet.push(body.len() as u8);
        packet.extend_from_slice(&body);
        let err = parse(&packet).unwrap_err();
        assert_eq!(err, Error::PrematureEOF);
    }

    #[test]
    fn rejects_v3_keys() {
        let mut body = std::vec::Vec::new();
        body.push(3);
        let mut packet = std::vec::Vec::new();
        packet.push(0x80 | 0x40 | 6);
        packet.push(body.len() as u8);
        packet.extend_from_slice(&body);
        assert_eq!(parse(&packet).unwrap_err(), Error::UnsupportedSignatureVersion);
    }
}
