//! Integer/string value tables for OpenPGP enumerations (RFC 4880 §§4-9),
//! mirroring `pgpValTbl`/`pgpValStr` in the RPM source this crate's
//! decoders are modeled on. Every lookup here is *total*: an out-of-range
//! value yields `"Unknown ..."` rather than an error, per spec §6.

/// A signature's purpose, RFC 4880 §5.2.1.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum SigType {
    Binary,
    Text,
    Standalone,
    GenericCertification,
    PersonaCertification,
    CasualCertification,
    PositiveCertification,
    SubkeyBinding,
    SignatureDirectlyOnKey,
    KeyRevocation,
    SubkeyRevocation,
    CertificationRevocation,
    Timestamp,
    Unknown(u8),
}

impl SigType {
    /// Map a signature-type octet to its enumeration value.
    pub fn from_u8(v: u8) -> Self {
        match v {
            0x00 => SigType::Binary,
            0x01 => SigType::Text,
            0x02 => SigType::Standalone,
            0x10 => SigType::GenericCertification,
            0x11 => SigType::PersonaCertification,
            0x12 => SigType::CasualCertification,
            0x13 => SigType::PositiveCertification,
            0x18 => SigType::SubkeyBinding,
            0x1F => SigType::SignatureDirectlyOnKey,
            0x20 => SigType::KeyRevocation,
            0x28 => SigType::SubkeyRevocation,
            0x30 => SigType::CertificationRevocation,
            0x40 => SigType::Timestamp,
            other => SigType::Unknown(other),
        }
    }

    /// A human-readable name, never an error.
    pub fn name(self) -> &'static str {
        match self {
            SigType::Binary => "Binary document signature",
            SigType::Text => "Text document signature",
            SigType::Standalone => "Standalone signature",
            SigType::GenericCertification => {
                "Generic certification of a User ID and Public Key"
            }
            SigType::PersonaCertification => {
                "Persona certification of a User ID and Public Key"
            }
            SigType::CasualCertification => "Casual certification of a User ID and Public Key",
            SigType::PositiveCertification => {
                "Positive certification of a User ID and Public Key"
            }
            SigType::SubkeyBinding => "Subkey Binding Signature",
            SigType::SignatureDirectlyOnKey => "Signature directly on a key",
            SigType::KeyRevocation => "Key revocation signature",
            SigType::SubkeyRevocation => "Subkey revocation signature",
            SigType::CertificationRevocation => "Certification revocation signature",
            SigType::Timestamp => "Timestamp signature",
            SigType::Unknown(_) => "Unknown signature type",
        }
    }
}

/// Public-key algorithm IDs, RFC 4880 §9.1.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum PublicKeyAlgorithm {
    Rsa,
    RsaEncryptOnly,
    RsaSignOnly,
    ElgamalEncryptOnly,
    Dsa,
    Ecdh,
    Ecdsa,
    Elgamal,
    DiffieHellman,
    EdDsa,
    Unknown(u8),
}

impl PublicKeyAlgorithm {
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => PublicKeyAlgorithm::Rsa,
            2 => PublicKeyAlgorithm::RsaEncryptOnly,
            3 => PublicKeyAlgorithm::RsaSignOnly,
            16 => PublicKeyAlgorithm::ElgamalEncryptOnly,
            17 => PublicKeyAlgorithm::Dsa,
            18 => PublicKeyAlgorithm::Ecdh,
            19 => PublicKeyAlgorithm::Ecdsa,
            20 => PublicKeyAlgorithm::Elgamal,
            21 => PublicKeyAlgorithm::DiffieHellman,
            22 => PublicKeyAlgorithm::EdDsa,
            other => PublicKeyAlgorithm::Unknown(other),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PublicKeyAlgorithm::Rsa => "RSA",
            PublicKeyAlgorithm::RsaEncryptOnly => "RSA(Encrypt-Only)",
            PublicKeyAlgorithm::RsaSignOnly => "RSA(Sign-Only)",
            PublicKeyAlgorithm::ElgamalEncryptOnly => "Elgamal(Encrypt-Only)",
            PublicKeyAlgorithm::Dsa => "DSA",
            PublicKeyAlgorithm::Ecdh => "Elliptic Curve",
            PublicKeyAlgorithm::Ecdsa => "ECDSA",
            PublicKeyAlgorithm::Elgamal => "Elgamal",
            PublicKeyAlgorithm::DiffieHellman => "Diffie-Hellman (X9.42)",
            PublicKeyAlgorithm::EdDsa => "EdDSA",
            PublicKeyAlgorithm::Unknown(_) => "Unknown public key algorithm",
        }
    }
}

/// Hash algorithm IDs, RFC 4880 §9.4.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Ripemd160,
    Md2,
    Tiger192,
    Haval5_160,
    Sha256,
    Sha384,
    Sha512,
    Sha224,
    Unknown(u8),
}

impl HashAlgorithm {
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => HashAlgorithm::Md5,
            2 => HashAlgorithm::Sha1,
            3 => HashAlgorithm::Ripemd160,
            5 => HashAlgorithm::Md2,
            6 => HashAlgorithm::Tiger192,
            7 => HashAlgorithm::Haval5_160,
            8 => HashAlgorithm::Sha256,
            9 => HashAlgorithm::Sha384,
            10 => HashAlgorithm::Sha512,
            11 => HashAlgorithm::Sha224,
            other => HashAlgorithm::Unknown(other),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "MD5",
            HashAlgorithm::Sha1 => "SHA1",
            HashAlgorithm::Ripemd160 => "RIPEMD160",
            HashAlgorithm::Md2 => "MD2",
            HashAlgorithm::Tiger192 => "TIGER192",
            HashAlgorithm::Haval5_160 => "HAVAL-5-160",
            HashAlgorithm::Sha256 => "SHA256",
            HashAlgorithm::Sha384 => "SHA384",
            HashAlgorithm::Sha512 => "SHA512",
            HashAlgorithm::Sha224 => "SHA224",
            HashAlgorithm::Unknown(_) => "Unknown hash algorithm",
        }
    }

    /// Output length in bytes of a digest produced by this algorithm, for
    /// the algorithms this crate can actually hash (see `pgp-verify`).
    pub fn digest_len(self) -> Option<u16> {
        match self {
            HashAlgorithm::Md5 => Some(16),
            HashAlgorithm::Sha1 => Some(20),
            HashAlgorithm::Sha224 => Some(28),
            HashAlgorithm::Sha256 => Some(32),
            HashAlgorithm::Sha384 => Some(48),
            HashAlgorithm::Sha512 => Some(64),
            _ => None,
        }
    }
}

/// Packet tag values, RFC 4880 §4.3.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Tag {
    Signature,
    PublicKey,
    UserId,
    Other(u8),
}

impl Tag {
    pub fn from_u8(v: u8) -> Self {
        match v {
            2 => Tag::Signature,
            6 => Tag::PublicKey,
            13 => Tag::UserId,
            other => Tag::Other(other),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tag::Signature => "Signature",
            Tag::PublicKey => "Public Key",
            Tag::UserId => "User ID",
            Tag::Other(_) => "Unknown packet tag",
        }
    }
}

/// ASCII-armor envelope types, RFC 4880 §6.2.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ArmorKind {
    Message,
    PublicKeyBlock,
    PrivateKeyBlock,
    SecretKeyBlock,
    Signature,
    SignedMessage,
    File,
}

impl ArmorKind {
    /// The exact text that follows `-----BEGIN PGP ` (and precedes
    /// `-----`) for this armor type.
    pub fn label(self) -> &'static str {
        match self {
            ArmorKind::Message => "MESSAGE",
            ArmorKind::PublicKeyBlock => "PUBLIC KEY BLOCK",
            ArmorKind::PrivateKeyBlock => "PRIVATE KEY BLOCK",
            ArmorKind::SecretKeyBlock => "SECRET KEY BLOCK",
            ArmorKind::Signature => "SIGNATURE",
            ArmorKind::SignedMessage => "SIGNED MESSAGE",
            ArmorKind::File => "ARMORED FILE",
        }
    }

    /// Parse a `BEGIN`/`END` line's type token, or `None` if unrecognized.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "MESSAGE" => Some(ArmorKind::Message),
            "PUBLIC KEY BLOCK" => Some(ArmorKind::PublicKeyBlock),
            "PRIVATE KEY BLOCK" => Some(ArmorKind::PrivateKeyBlock),
            "SECRET KEY BLOCK" => Some(ArmorKind::SecretKeyBlock),
            "SIGNATURE" => Some(ArmorKind::Signature),
            "SIGNED MESSAGE" => Some(ArmorKind::SignedMessage),
            "ARMORED FILE" => Some(ArmorKind::File),
            _ => None,
        }
    }
}

/// Recognized armor header keys (RFC 4880 §6.2): `Version`, `Comment`,
/// `MessageID`, `Hash`, `Charset`.
pub fn is_known_armor_header(key: &str) -> bool {
    matches!(key, "Version" | "Comment" | "MessageID" | "Hash" | "Charset")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_values_are_never_an_error() {
        assert_eq!(SigType::from_u8(0xEE).name(), "Unknown signature type");
        assert_eq!(
            PublicKeyAlgorithm::from_u8(200).name(),
            "Unknown public key algorithm"
        );
        assert_eq!(HashAlgorithm::from_u8(99).name(), "Unknown hash algorithm");
    }

    #[test]
    fn armor_label_round_trips() {
        assert_eq!(
            ArmorKind::from_label(ArmorKind::PublicKeyBlock.label()),
            Some(ArmorKind::PublicKeyBlock)
        );
    }
}
