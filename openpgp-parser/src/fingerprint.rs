//! V4 public-key fingerprints (RFC 4880 §5.5.2): SHA-1 over a synthetic
//! one-octet tag, a two-octet big-endian body length, and the key's packet
//! body, with the key ID being the fingerprint's last eight octets.

use core::convert::TryInto;

use sha1::{Digest, Sha1};

use super::pubkey::PubKeyInfo;
use super::Error;

/// Compute the v4 fingerprint of a parsed public key.
///
/// Matches `getFingerprint` in the RPM source this is modeled on, which
/// hashes a fixed `0x99` tag octet (not the key packet's own, possibly
/// old-format, header byte) followed by the body length and body — this is
/// what makes the fingerprint independent of how the key packet happened to
/// be framed.
///
/// The body length is hashed as a two-octet big-endian count, so a body
/// that doesn't fit in 16 bits cannot be fingerprinted at all: rather than
/// silently hash a truncated length, such a body is rejected.
pub fn fingerprint(key: &PubKeyInfo<'_>) -> Result<[u8; 20], Error> {
    let body_len: u16 = key
        .body
        .len()
        .try_into()
        .map_err(|_| Error::IllFormedSignature)?;
    let mut hasher = Sha1::new();
    hasher.update([0x99]);
    hasher.update(body_len.to_be_bytes());
    hasher.update(key.body);
    Ok(hasher.finalize().into())
}

/// The key ID derived from a v4 fingerprint: its trailing eight octets.
pub fn key_id(fingerprint: &[u8; 20]) -> [u8; 8] {
    let mut id = [0u8; 8];
    id.copy_from_slice(&fingerprint[12..]);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pubkey::{self, PublicKeyMpis};
    use crate::value::PublicKeyAlgorithm;

    #[test]
    fn fingerprint_and_key_id_are_consistent() {
        let mut body = std::vec::Vec::new();
        body.push(4);
        body.extend_from_slice(&1_650_000_000u32.to_be_bytes());
        body.push(1); // RSA
        body.extend_from_slice(&[0x00, 0x09, 0x01, 0xFF]); // n
        body.extend_from_slice(&[0x00, 0x02, 0x03]); // e

        let mut packet = std::vec::Vec::new();
        packet.push(0x80 | 0x40 | 6);
        packet.push(body.len() as u8);
        packet.extend_from_slice(&body);

        let key = pubkey::parse(&packet).unwrap();
        let fpr = fingerprint(&key).unwrap();
        let id = key_id(&fpr);
        assert_eq!(id, fpr[12..]);

        // Manually computed: SHA1(0x99 || be16(len) || body).
        let mut expected_input = std::vec![0x99u8];
        expected_input.extend_from_slice(&(body.len() as u16).to_be_bytes());
        expected_input.extend_from_slice(&body);
        let mut hasher = Sha1::new();
        hasher.update(&expected_input);
        let expected: [u8; 20] = hasher.finalize().into();
        assert_eq!(fpr, expected);
    }

    #[test]
    fn body_too_long_for_u16_is_rejected() {
        let big = std::vec![0u8; 65536];
        let key = pubkey::PubKeyInfo {
            version: 4,
            creation_time: 0,
            pkey_alg: PublicKeyAlgorithm::Rsa,
            mpis: PublicKeyMpis::Other(&big),
            body: &big,
        };
        assert_eq!(fingerprint(&key).unwrap_err(), Error::IllFormedSignature);
    }
}
