//! Verifies OpenPGP detached signatures parsed by `openpgp-parser` against
//! RSA and DSA public keys.
//!
//! This crate owns every byte of actual cryptography: hashing the signed
//! data, building the PKCS#1/DSA public key from parsed MPIs, and running
//! the RFC 4880 §5.2.4 signature-hash construction. `openpgp-parser` itself
//! never touches a crypto crate, so this is the only place that does.

use openpgp_parser::pubkey::{PubKeyInfo, PublicKeyMpis};
use openpgp_parser::signature::SignatureMpis;
use openpgp_parser::signature::SigInfo;
use openpgp_parser::value::HashAlgorithm;

use num_bigint::BigUint;
use rsa::pkcs1v15::Pkcs1v15Sign;
use rsa::RsaPublicKey;
use sha2::{Sha256, Sha384, Sha512};
use signature::hazmat::PrehashVerifier;

/// Every way signature verification can conclude, per the four-way
/// verdict: a signature is either cryptographically `Good`, provably
/// `Bad`, too malformed to evaluate at all, or unevaluable because no
/// matching public key was supplied.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The signature was verified against the given key and matches.
    Good,
    /// The signature was verified and does not match, or its quick-check
    /// digest prefix already disagreed before any crypto ran.
    Bad,
    /// The signature or key could not be evaluated: an algorithm mismatch,
    /// an out-of-range MPI, or a hash algorithm this crate cannot produce.
    Malformed,
    /// No public key matching the signature's key ID was supplied.
    NoKey([u8; 8]),
}

#[derive(Debug, thiserror::Error)]
enum VerifyError {
    #[error("hash algorithm is not supported for verification")]
    UnsupportedHash,
    #[error("public-key algorithm does not match the signature's algorithm")]
    AlgorithmMismatch,
    #[error("RSA key or signature is malformed: {0}")]
    Rsa(#[from] rsa::errors::Error),
    #[error("DSA key or signature is malformed")]
    Dsa,
    #[error("DSA signature MPI exceeds 160 bits")]
    DsaMpiTooLarge,
}

/// RFC 4880 §5.2.2/§14 DSA signatures carry `r`/`s` as 160-bit values; a
/// wider MPI indicates a malformed signature rather than some more exotic
/// DSA variant this crate should accommodate.
const DSA_MPI_MAX_BYTES: usize = 20;

fn make_hasher(alg: HashAlgorithm) -> Result<alloc_box_digest::BoxDigest, VerifyError> {
    let boxed: alloc_box_digest::BoxDigest = match alg {
        HashAlgorithm::Md5 => alloc_box_digest::wrap(md5::Md5::default()),
        HashAlgorithm::Sha1 => alloc_box_digest::wrap(sha1::Sha1::default()),
        HashAlgorithm::Sha224 => alloc_box_digest::wrap(sha2::Sha224::default()),
        HashAlgorithm::Sha256 => alloc_box_digest::wrap(sha2::Sha256::default()),
        HashAlgorithm::Sha384 => alloc_box_digest::wrap(sha2::Sha384::default()),
        HashAlgorithm::Sha512 => alloc_box_digest::wrap(sha2::Sha512::default()),
        _ => return Err(VerifyError::UnsupportedHash),
    };
    Ok(boxed)
}

/// Thin wrapper module so `make_hasher` can return a single boxed-trait-object
/// type regardless of which concrete digest it picked.
mod alloc_box_digest {
    use digest::DynDigest;

    pub type BoxDigest = Box<dyn DynDigest>;

    pub fn wrap(d: impl DynDigest + 'static) -> BoxDigest {
        Box::new(d)
    }
}

/// Build the RFC 4880 §5.2.4 signature-hash input: the signed data, the
/// signature's hashed material, and (for v4) the six-octet trailer that
/// pins down how much of the packet body was hashed.
fn hash_digest(data: &[u8], sig: &SigInfo<'_>) -> Result<Box<[u8]>, VerifyError> {
    let mut hasher = make_hasher(sig.hash_alg)?;
    hasher.update(data);
    hasher.update(sig.hashed_prefix);
    if sig.version == 4 {
        let mut trailer = [0u8; 6];
        trailer[0] = 4;
        trailer[1] = 0xFF;
        trailer[2..].copy_from_slice(&(sig.hashed_prefix.len() as u32).to_be_bytes());
        hasher.update(&trailer);
    }
    Ok(hasher.finalize_reset())
}

fn verify_rsa(
    n: &[u8],
    e: &[u8],
    s: &[u8],
    hash_alg: HashAlgorithm,
    digest: &[u8],
) -> Result<bool, VerifyError> {
    let key = RsaPublicKey::new(BigUint::from_bytes_be(n), BigUint::from_bytes_be(e))?;
    let scheme = match hash_alg {
        HashAlgorithm::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
        HashAlgorithm::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
        HashAlgorithm::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
        _ => return Err(VerifyError::UnsupportedHash),
    };
    // `n`'s own leading-zero-bit invariant (enforced by `mpi::read`) means
    // its length already is the modulus's byte length; pad `s` out to it.
    let padded_sig = zero_pad(s, n.len());
    Ok(key.verify(scheme, digest, &padded_sig).is_ok())
}

/// Left-pad `bytes` with zero octets up to `len`; a no-op if already at
/// least that long.
fn zero_pad(bytes: &[u8], len: usize) -> std::vec::Vec<u8> {
    if bytes.len() >= len {
        return bytes.to_vec();
    }
    let mut out = std::vec![0u8; len - bytes.len()];
    out.extend_from_slice(bytes);
    out
}

/// Minimal DER `INTEGER` encoding of a big-endian magnitude: strip
/// superfluous leading zero octets, then reintroduce exactly one if the
/// high bit of the first remaining octet would otherwise flip the
/// encoded value negative.
fn der_integer(mut bytes: &[u8]) -> std::vec::Vec<u8> {
    while bytes.len() > 1 && bytes[0] == 0 && bytes[1] & 0x80 == 0 {
        bytes = &bytes[1..];
    }
    let mut out = std::vec![0x02u8];
    if bytes.first().map_or(true, |&b| b & 0x80 != 0) {
        out.push((bytes.len() + 1) as u8);
        out.push(0x00);
    } else {
        out.push(bytes.len() as u8);
    }
    out.extend_from_slice(bytes);
    out
}

/// DER `SEQUENCE { r INTEGER, s INTEGER }`, the encoding DSA/ECDSA
/// signatures use on the wire — not RFC 4880's own MPI encoding, which is
/// why `r` and `s` need re-encoding here rather than being fed to the `dsa`
/// crate as raw magnitudes.
fn der_sequence_of_two_integers(a: &[u8], b: &[u8]) -> std::vec::Vec<u8> {
    let ia = der_integer(a);
    let ib = der_integer(b);
    let mut body = std::vec::Vec::with_capacity(ia.len() + ib.len());
    body.extend_from_slice(&ia);
    body.extend_from_slice(&ib);
    let mut out = std::vec![0x30u8];
    out.push(body.len() as u8);
    out.extend_from_slice(&body);
    out
}

fn verify_dsa(
    p: &[u8],
    q: &[u8],
    g: &[u8],
    y: &[u8],
    r: &[u8],
    s: &[u8],
    digest: &[u8],
) -> Result<bool, VerifyError> {
    if r.len() > DSA_MPI_MAX_BYTES || s.len() > DSA_MPI_MAX_BYTES {
        return Err(VerifyError::DsaMpiTooLarge);
    }
    let components = dsa::Components::from_components(
        BigUint::from_bytes_be(p),
        BigUint::from_bytes_be(q),
        BigUint::from_bytes_be(g),
    )
    .map_err(|_| VerifyError::Dsa)?;
    let public_key = dsa::VerifyingKey::from_components(components, BigUint::from_bytes_be(y))
        .map_err(|_| VerifyError::Dsa)?;
    let der = der_sequence_of_two_integers(
        &zero_pad(r, DSA_MPI_MAX_BYTES),
        &zero_pad(s, DSA_MPI_MAX_BYTES),
    );
    let signature =
        dsa::Signature::try_from(der.as_slice()).map_err(|_| VerifyError::Dsa)?;
    Ok(public_key.verify_prehash(digest, &signature).is_ok())
}

/// Verify `sig` over `data` against `key`.
///
/// `key` is `None` when the caller has no public key matching the
/// signature's key ID on hand; the quick-check digest prefix is still
/// compared in that case, so an already-corrupt signature is reported
/// `Bad` rather than `NoKey`.
pub fn verify(data: &[u8], sig: &SigInfo<'_>, key: Option<&PubKeyInfo<'_>>) -> Verdict {
    let digest = match hash_digest(data, sig) {
        Ok(d) => d,
        Err(e) => {
            log::debug!("signature hash construction failed: {}", e);
            return Verdict::Malformed;
        }
    };

    if digest.get(0..2) != Some(&sig.quick_check[..]) {
        return Verdict::Bad;
    }

    let key = match key {
        Some(k) => k,
        None => return Verdict::NoKey(sig.key_id),
    };

    let result = match (&sig.mpis, &key.mpis) {
        (SignatureMpis::Rsa { s }, PublicKeyMpis::Rsa { n, e }) => {
            verify_rsa(n, e, s, sig.hash_alg, &digest)
        }
        (SignatureMpis::Dsa { r, s }, PublicKeyMpis::Dsa { p, q, g, y }) => {
            verify_dsa(p, q, g, y, r, s, &digest)
        }
        _ => Err(VerifyError::AlgorithmMismatch),
    };

    match result {
        Ok(true) => Verdict::Good,
        Ok(false) => Verdict::Bad,
        Err(e) => {
            log::debug!("signature verification failed to evaluate: {}", e);
            Verdict::Malformed
        }
    }
}

/// A one-line human-readable description of a signature, in the style of
/// `pgpIdentItem` in the RPM source `openpgp-parser`'s decoders are modeled
/// on: `"V<version> <pubkey-alg>/<hash-alg> <sig-type>, key ID <hex>"`.
pub fn identify(sig: &SigInfo<'_>) -> std::string::String {
    std::format!(
        "V{} {}/{} {}, key ID {}",
        sig.version,
        sig.pkey_alg.name(),
        sig.hash_alg.name(),
        sig.sig_type.name(),
        openpgp_parser::hex(&sig.key_id),
    )
}
