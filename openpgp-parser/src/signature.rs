//! OpenPGP signature packets (tag 2), versions 3 and 4 (RFC 4880 §5.2).

use super::subpacket::{self, Subpacket};
use super::value::{HashAlgorithm, PublicKeyAlgorithm, SigType};
use super::{mpi, packet, Error, Reader};

use core::convert::TryInto;

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
/// Whether cryptographically weak hash algorithms (anything shorter than
/// 256 bits, or otherwise known-broken) should be accepted.
pub enum AllowWeakHashes {
    /// Reject MD5, SHA-1, RIPEMD-160, MD2, TIGER192, HAVAL-5-160, SHA-224.
    No,
    /// Accept everything this crate knows how to hash: MD5 and SHA-1 in
    /// addition to the SHA-2 family.
    Yes,
}

const SIG_TYPE_BINARY: u8 = 0;

// Signature subpacket type codes, RFC 4880 §5.2.3.1.
const SUB_CREATION_TIME: u8 = 2;
const SUB_SIG_EXPIRATION_TIME: u8 = 3;
const SUB_EXPORTABLE: u8 = 4;
const SUB_TRUST_SIG: u8 = 5;
const SUB_REGEX: u8 = 6;
const SUB_REVOCABLE: u8 = 7;
const SUB_KEY_EXPIRATION_TIME: u8 = 9;
const SUB_PREFERRED_SYMMETRIC: u8 = 11;
const SUB_REVOCATION_KEY: u8 = 12;
const SUB_ISSUER_KEYID: u8 = 16;
const SUB_PREFERRED_HASH: u8 = 21;
const SUB_PREFERRED_COMPRESSION: u8 = 22;
const SUB_POLICY_URL: u8 = 26;
const SUB_KEY_FLAGS: u8 = 27;
const SUB_SIGNER_USER_ID: u8 = 28;
const SUB_REVOCATION_REASON: u8 = 29;
const SUB_FEATURES: u8 = 30;
const SUB_EMBEDDED_SIGNATURE: u8 = 32;
/// Not in RFC 4880 proper, but GnuPG emits it and it lets us cross-check
/// the issuer key ID against a full fingerprint.
const SUB_ISSUER_FINGERPRINT: u8 = 33;

/// Checks that a public-key algorithm can sign at all and, if so, returns
/// how many MPIs its signatures carry.
pub fn pkey_alg_mpis(alg: PublicKeyAlgorithm, sig_version: u8) -> Result<u8, Error> {
    let is_v4 = match sig_version {
        3 => false,
        4 => true,
        _ => return Err(Error::UnsupportedSignatureVersion),
    };
    match alg {
        PublicKeyAlgorithm::RsaEncryptOnly
        | PublicKeyAlgorithm::ElgamalEncryptOnly
        | PublicKeyAlgorithm::Elgamal
        | PublicKeyAlgorithm::Ecdh
        | PublicKeyAlgorithm::DiffieHellman => Err(Error::InvalidPkeyAlgorithm(raw(alg))),
        PublicKeyAlgorithm::Rsa | PublicKeyAlgorithm::RsaSignOnly => Ok(1),
        PublicKeyAlgorithm::EdDsa if is_v4 => Ok(2),
        PublicKeyAlgorithm::Dsa => Ok(2),
        PublicKeyAlgorithm::Ecdsa if is_v4 => Err(Error::UnsupportedPkeyAlgorithm(raw(alg))),
        PublicKeyAlgorithm::Ecdsa | PublicKeyAlgorithm::EdDsa => {
            Err(Error::PkeyAlgorithmRequiresV4Sig(raw(alg)))
        }
        PublicKeyAlgorithm::Unknown(a) => Err(Error::UnknownPkeyAlgorithm(a)),
    }
}

fn raw(alg: PublicKeyAlgorithm) -> u8 {
    match alg {
        PublicKeyAlgorithm::Rsa => 1,
        PublicKeyAlgorithm::RsaEncryptOnly => 2,
        PublicKeyAlgorithm::RsaSignOnly => 3,
        PublicKeyAlgorithm::ElgamalEncryptOnly => 16,
        PublicKeyAlgorithm::Dsa => 17,
        PublicKeyAlgorithm::Ecdh => 18,
        PublicKeyAlgorithm::Ecdsa => 19,
        PublicKeyAlgorithm::Elgamal => 20,
        PublicKeyAlgorithm::DiffieHellman => 21,
        PublicKeyAlgorithm::EdDsa => 22,
        PublicKeyAlgorithm::Unknown(a) => a,
    }
}

/// Checks that a hash algorithm is one this crate will hash with, and
/// returns its digest length in bytes.
pub fn check_hash_algorithm(hash: HashAlgorithm, allow: AllowWeakHashes) -> Result<u16, Error> {
    match hash {
        HashAlgorithm::Sha256 => Ok(32),
        HashAlgorithm::Sha384 => Ok(48),
        HashAlgorithm::Sha512 => Ok(64),
        HashAlgorithm::Sha224 if allow == AllowWeakHashes::Yes => Ok(28),
        HashAlgorithm::Md5 if allow == AllowWeakHashes::Yes => Ok(16),
        HashAlgorithm::Sha1 if allow == AllowWeakHashes::Yes => Ok(20),
        HashAlgorithm::Sha1
        | HashAlgorithm::Ripemd160
        | HashAlgorithm::Md2
        | HashAlgorithm::Tiger192
        | HashAlgorithm::Haval5_160
        | HashAlgorithm::Sha224
        | HashAlgorithm::Md5 => Err(Error::InsecureAlgorithm(raw_hash(hash))),
        HashAlgorithm::Unknown(h) => Err(Error::UnsupportedHashAlgorithm(i32::from(h))),
    }
}

fn raw_hash(h: HashAlgorithm) -> i32 {
    match h {
        HashAlgorithm::Md5 => 1,
        HashAlgorithm::Sha1 => 2,
        HashAlgorithm::Ripemd160 => 3,
        HashAlgorithm::Md2 => 5,
        HashAlgorithm::Tiger192 => 6,
        HashAlgorithm::Haval5_160 => 7,
        HashAlgorithm::Sha256 => 8,
        HashAlgorithm::Sha384 => 9,
        HashAlgorithm::Sha512 => 10,
        HashAlgorithm::Sha224 => 11,
        HashAlgorithm::Unknown(v) => i32::from(v),
    }
}

/// A signature's MPIs, normalized per the algorithm that produced them.
/// Still just borrowed views into the packet body — no padding or DER
/// encoding has happened yet; see `pgp-verify` for that.
#[derive(Copy, Clone, Debug)]
pub enum SignatureMpis<'a> {
    Rsa { s: &'a [u8] },
    Dsa { r: &'a [u8], s: &'a [u8] },
}

/// A parsed signature packet, with every field the verifier (spec §4.7)
/// needs: the hashed-data trailer, the quick-check digest, the signer's
/// key ID, and the signature MPIs.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct SigInfo<'a> {
    pub version: u8,
    pub sig_type: SigType,
    pub pkey_alg: PublicKeyAlgorithm,
    pub hash_alg: HashAlgorithm,
    /// Key ID of the signer.
    pub key_id: [u8; 8],
    /// Full fingerprint of the signer, if an issuer-fingerprint subpacket
    /// was present.
    pub fingerprint: Option<[u8; 20]>,
    /// Signature creation time, Unix seconds.
    pub creation_time: u32,
    /// Signature/key expiration offset, if a subpacket declared one.
    /// Informational only; this crate does not reject expired signatures.
    pub expiration_time: Option<u32>,
    /// Leading 16 bits of the expected digest (spec §4: "quick-check").
    pub quick_check: [u8; 2],
    /// For v3: the five octets `sigtype || creation_time`. For v4: the
    /// packet body from its first byte through the end of the hashed
    /// subpacket area, inclusive.
    pub hashed_prefix: &'a [u8],
    /// The signature MPIs.
    pub mpis: SignatureMpis<'a>,
}

struct Accumulator {
    issuer: Option<[u8; 8]>,
    fingerprint: Option<[u8; 20]>,
    creation_time: Option<u32>,
    expiration_time: Option<u32>,
}

fn read_be_u32(data: &[u8]) -> Result<u32, Error> {
    Reader::read_all(data, Error::TrailingJunk, |r| r.be_u32())
}

/// Disposition of one subpacket per spec §4.3's table: creation time and
/// issuer key ID are each saved the first time they're seen — both areas
/// are walked identically and, per spec §4.4, a repeated occurrence does
/// not make the signature malformed, it's simply ignored in favor of the
/// one already stored; everything else spec marks "recognized but not
/// semantically consumed" is walked and ignored; a genuinely unknown
/// *critical* subpacket is reported back to the caller.
fn process_subpacket(sp: Subpacket<'_>, acc: &mut Accumulator) -> Result<(), Error> {
    match sp.tag {
        SUB_CREATION_TIME => {
            let t = read_be_u32(sp.data)?;
            acc.creation_time.get_or_insert(t);
        }
        SUB_ISSUER_KEYID => {
            let id: [u8; 8] = sp.data.try_into().map_err(|_| Error::IllFormedSignature)?;
            acc.issuer.get_or_insert(id);
        }
        SUB_ISSUER_FINGERPRINT => {
            if acc.fingerprint.is_none() {
                if let [4, fpr @ ..] = sp.data {
                    acc.fingerprint =
                        Some(fpr.try_into().map_err(|_| Error::IllFormedSignature)?);
                }
            }
        }
        // Informational-only fields (spec §4.3): recorded once, never
        // used to reject a signature.
        SUB_SIG_EXPIRATION_TIME | SUB_KEY_EXPIRATION_TIME => {
            let t = read_be_u32(sp.data)?;
            acc.expiration_time.get_or_insert(t);
        }
        // Recognized but not semantically consumed by the verifier.
        SUB_EXPORTABLE
        | SUB_TRUST_SIG
        | SUB_REGEX
        | SUB_REVOCABLE
        | SUB_PREFERRED_SYMMETRIC
        | SUB_REVOCATION_KEY
        | SUB_PREFERRED_HASH
        | SUB_PREFERRED_COMPRESSION
        | SUB_POLICY_URL
        | SUB_KEY_FLAGS
        | SUB_SIGNER_USER_ID
        | SUB_REVOCATION_REASON
        | SUB_FEATURES
        | SUB_EMBEDDED_SIGNATURE => {}
        _ if sp.critical => return Err(Error::UnsupportedCriticalSubpacket),
        _ => {}
    }
    Ok(())
}

/// Parse a signature packet from a byte slice that contains exactly one
/// packet.
pub fn parse(data: &[u8]) -> Result<SigInfo<'_>, Error> {
    Reader::read_all(data, Error::TrailingJunk, read_signature)
}

/// Frame and parse the next packet in `reader` as a signature.
pub fn read_signature<'a>(reader: &mut Reader<'a>) -> Result<SigInfo<'a>, Error> {
    let pkt = packet::next(reader)?.ok_or(Error::PrematureEOF)?;
    if pkt.tag() != 2 {
        return Err(Error::IllFormedSignature);
    }
    Reader::read_all(pkt.contents(), Error::TrailingJunk, parse_packet_body)
}

fn parse_packet_body<'a>(reader: &mut Reader<'a>) -> Result<SigInfo<'a>, Error> {
    let body = reader.peek();
    let version = reader.byte()?;
    let mut acc = Accumulator {
        issuer: None,
        fingerprint: None,
        creation_time: None,
        expiration_time: None,
    };

    let sig_type: u8;
    let pkey_alg: u8;
    let hash_alg: u8;
    let key_id: [u8; 8];
    let hashed_prefix: &'a [u8];

    match version {
        3 => {
            let hashed_material_len = reader.byte()?;
            if hashed_material_len != 5 {
                return Err(Error::IllFormedSignature);
            }
            let hashed_start = reader.peek();
            sig_type = reader.byte()?;
            let creation_time = reader.be_u32()?;
            acc.creation_time = Some(creation_time);
            hashed_prefix = &hashed_start[..5];
            key_id = reader.be_u64()?.to_be_bytes();
            pkey_alg = reader.byte()?;
            hash_alg = reader.byte()?;
        }
        4 => {
            if reader.byte()? != SIG_TYPE_BINARY {
                return Err(Error::IllFormedSignature);
            }
            sig_type = SIG_TYPE_BINARY;
            pkey_alg = reader.byte()?;
            hash_alg = reader.byte()?;
            let hashed_len = reader.be_u16()?;
            let hashed_area = reader.get_bytes(usize::from(hashed_len))?;
            subpacket::walk(hashed_area, |sp| process_subpacket(sp, &mut acc))?;
            // hashed_prefix spans the packet body from its first byte
            // through the end of the hashed-subpacket area, inclusive.
            let consumed = body.len() - reader.len();
            hashed_prefix = &body[..consumed];

            let unhashed_len = reader.be_u16()?;
            let unhashed_area = reader.get_bytes(usize::from(unhashed_len))?;
            subpacket::walk(unhashed_area, |sp| process_subpacket(sp, &mut acc))?;

            key_id = match acc.issuer {
                Some(id) => id,
                None => return Err(Error::IllFormedSignature),
            };
            if let Some(fpr) = acc.fingerprint {
                if fpr[12..] != key_id[..] {
                    return Err(Error::IllFormedSignature);
                }
            }
        }
        _ => return Err(Error::UnsupportedSignatureVersion),
    }

    let pkey_alg = PublicKeyAlgorithm::from_u8(pkey_alg);
    let hash_alg = HashAlgorithm::from_u8(hash_alg);
    let mpi_count = pkey_alg_mpis(pkey_alg, version)?;
    check_hash_algorithm(hash_alg, AllowWeakHashes::No)?;

    let creation_time = acc.creation_time.ok_or(Error::NoCreationTime)?;
    let quick_check: [u8; 2] = reader.get_bytes(2)?.try_into().expect("length is 2");

    let mpis = match mpi_count {
        1 => SignatureMpis::Rsa { s: mpi::read(reader)? },
        2 => {
            let r = mpi::read(reader)?;
            let s = mpi::read(reader)?;
            SignatureMpis::Dsa { r, s }
        }
        _ => unreachable!("pkey_alg_mpis only returns 1 or 2"),
    };

    log::trace!(
        "parsed v{} signature, type={:?}, key_id={:02x?}",
        version,
        SigType::from_u8(sig_type),
        key_id
    );

    Ok(SigInfo {
        version,
        sig_type: SigType::from_u8(sig_type),
        pkey_alg,
        hash_alg,
        key_id,
        fingerprint: acc.fingerprint,
        creation_time,
        expiration_time: acc.expiration_time,
        quick_check,
        hashed_prefix,
        mpis,
    })
}
