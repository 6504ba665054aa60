//! Fixed-layout binary container for an encrypted database.
//!
//! ```text
//! +-----------+--------------------+-----------+-----------+--------------------+
//! | magic (8) | verifier (128)     | salt (16) | nonce (12)| ciphertext + tag   |
//! +-----------+--------------------+-----------+-----------+--------------------+
//! ```
//!
//! All fields are concatenated without padding. The verifier is an ASCII
//! PHC string right-padded with NUL bytes. The magic names both the format
//! and the plaintext encoding inside the ciphertext.

use std::fmt;

use crate::codec;
use crate::crypto::verifier::is_well_formed;
use crate::crypto::{NONCE_LENGTH, SALT_LENGTH, TAG_LENGTH};
use crate::error::{AlockError, Result};
use crate::model::Folder;

pub const MAGIC_LENGTH: usize = 8;
pub const VERIFIER_LENGTH: usize = 128;
pub const HEADER_LENGTH: usize = MAGIC_LENGTH + VERIFIER_LENGTH + SALT_LENGTH + NONCE_LENGTH;

const TEXT_MAGIC: &[u8; MAGIC_LENGTH] = b"ALOCK_V1";
const JSON_MAGIC: &[u8; MAGIC_LENGTH] = b"ALOCK_J1";

/// Plaintext encoding sealed inside the envelope, selected by the magic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayloadFormat {
    /// Indented text (`ALOCK_V1`).
    #[default]
    Text,
    /// Tagged JSON (`ALOCK_J1`).
    Json,
}

impl PayloadFormat {
    pub fn magic(self) -> &'static [u8; MAGIC_LENGTH] {
        match self {
            PayloadFormat::Text => TEXT_MAGIC,
            PayloadFormat::Json => JSON_MAGIC,
        }
    }

    pub fn from_magic(magic: &[u8]) -> Option<Self> {
        if magic == TEXT_MAGIC {
            Some(PayloadFormat::Text)
        } else if magic == JSON_MAGIC {
            Some(PayloadFormat::Json)
        } else {
            None
        }
    }

    /// Encode `tree` as this format's plaintext.
    ///
    /// The text format only accepts trees that pass [`Folder::validate`], so
    /// nothing is written that would read back differently.
    pub fn encode(self, tree: &Folder) -> Result<Vec<u8>> {
        match self {
            PayloadFormat::Text => {
                tree.validate()?;
                Ok(codec::text::encode(tree))
            }
            PayloadFormat::Json => codec::json::encode(tree),
        }
    }

    pub fn decode(self, bytes: &[u8]) -> Result<Folder> {
        match self {
            PayloadFormat::Text => codec::text::decode(bytes),
            PayloadFormat::Json => codec::json::decode(bytes),
        }
    }
}

impl fmt::Display for PayloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadFormat::Text => write!(f, "text"),
            PayloadFormat::Json => write!(f, "json"),
        }
    }
}

/// Parsed contents of a database file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub format: PayloadFormat,
    pub verifier: String,
    pub salt: [u8; SALT_LENGTH],
    pub nonce: [u8; NONCE_LENGTH],
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let verifier = self.verifier.as_bytes();
        if verifier.len() > VERIFIER_LENGTH || verifier.contains(&0) {
            return Err(AlockError::Crypto(format!(
                "Verifier does not fit the {}-byte header field",
                VERIFIER_LENGTH
            )));
        }

        let mut out = Vec::with_capacity(HEADER_LENGTH + self.ciphertext.len());
        out.extend_from_slice(self.format.magic());
        out.extend_from_slice(verifier);
        out.resize(MAGIC_LENGTH + VERIFIER_LENGTH, 0);
        out.extend_from_slice(&self.salt);
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        Ok(out)
    }

    /// Split raw file bytes into their fields.
    ///
    /// The magic is checked before anything else, so a foreign file is
    /// reported as `AlockError::Format` without touching any other field.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let magic = bytes
            .get(..MAGIC_LENGTH)
            .ok_or_else(|| AlockError::Format("File is too short to be a database".to_string()))?;
        let format = PayloadFormat::from_magic(magic)
            .ok_or_else(|| AlockError::Format("Unrecognized file header".to_string()))?;

        if bytes.len() < HEADER_LENGTH {
            return Err(AlockError::Format("Truncated header".to_string()));
        }

        let (verifier_field, rest) = bytes[MAGIC_LENGTH..].split_at(VERIFIER_LENGTH);
        let verifier = parse_verifier(verifier_field)?;
        let (salt, rest) = rest.split_at(SALT_LENGTH);
        let (nonce, ciphertext) = rest.split_at(NONCE_LENGTH);

        if ciphertext.len() < TAG_LENGTH {
            return Err(AlockError::Format("Truncated payload".to_string()));
        }

        Ok(Self {
            format,
            verifier,
            salt: to_array(salt)?,
            nonce: to_array(nonce)?,
            ciphertext: ciphertext.to_vec(),
        })
    }
}

fn parse_verifier(field: &[u8]) -> Result<String> {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    if field[end..].iter().any(|&b| b != 0) {
        return Err(AlockError::Format("Corrupt verifier padding".to_string()));
    }
    let verifier = std::str::from_utf8(&field[..end])
        .map_err(|_| AlockError::Format("Verifier is not ASCII".to_string()))?;
    if !is_well_formed(verifier) {
        return Err(AlockError::Format("Malformed verifier".to_string()));
    }
    Ok(verifier.to_string())
}

fn to_array<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    bytes
        .try_into()
        .map_err(|_| AlockError::Format("Truncated header".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERIFIER: &str =
        "$argon2id$v=19$m=65536,t=3,p=1$c29tZXNhbHRzb21lc2FsdA$LRQGb4ePhQ2exLeDcm/cXmQ+L1VVZY7FSShzAUGuh3g";

    fn sample() -> Envelope {
        Envelope {
            format: PayloadFormat::Text,
            verifier: VERIFIER.to_string(),
            salt: [0x11; SALT_LENGTH],
            nonce: [0x22; NONCE_LENGTH],
            ciphertext: vec![0x33; TAG_LENGTH + 4],
        }
    }

    #[test]
    fn test_layout_is_fixed() {
        let bytes = sample().to_bytes().unwrap();
        assert_eq!(HEADER_LENGTH, 164);
        assert_eq!(bytes.len(), HEADER_LENGTH + TAG_LENGTH + 4);
        assert_eq!(&bytes[..8], b"ALOCK_V1");
        assert_eq!(&bytes[8..8 + VERIFIER.len()], VERIFIER.as_bytes());
        assert!(bytes[8 + VERIFIER.len()..136].iter().all(|&b| b == 0));
        assert_eq!(hex::encode(&bytes[136..152]), "11".repeat(16));
        assert_eq!(hex::encode(&bytes[152..164]), "22".repeat(12));
        assert_eq!(&bytes[164..], &[0x33; TAG_LENGTH + 4][..]);
    }

    #[test]
    fn test_parse_inverts_to_bytes() {
        let envelope = Envelope {
            format: PayloadFormat::Json,
            ..sample()
        };
        let parsed = Envelope::parse(&envelope.to_bytes().unwrap()).unwrap();
        assert_eq!(parsed, envelope);
    }

    #[test]
    fn test_unknown_magic_is_format_error() {
        let mut bytes = sample().to_bytes().unwrap();
        bytes[..8].copy_from_slice(b"KDBX4\0\0\0");
        assert!(matches!(Envelope::parse(&bytes), Err(AlockError::Format(_))));
    }

    #[test]
    fn test_short_inputs_are_format_errors() {
        let bytes = sample().to_bytes().unwrap();
        for len in [0, 4, 8, 100, HEADER_LENGTH, HEADER_LENGTH + TAG_LENGTH - 1] {
            assert!(
                matches!(Envelope::parse(&bytes[..len]), Err(AlockError::Format(_))),
                "length {} should be rejected",
                len
            );
        }
    }

    #[test]
    fn test_garbage_verifier_is_format_error() {
        let mut bytes = sample().to_bytes().unwrap();
        bytes[8..16].copy_from_slice(b"garbage!");
        assert!(matches!(Envelope::parse(&bytes), Err(AlockError::Format(_))));
    }

    #[test]
    fn test_untrusted_cost_parameters_are_format_errors() {
        for tampered in [
            VERIFIER.replace("m=65536", "m=4294967295"),
            VERIFIER.replace("t=3", "t=4294967295"),
            VERIFIER.replace("argon2id", "argon2d"),
        ] {
            let mut bytes = sample().to_bytes().unwrap();
            let field = &mut bytes[MAGIC_LENGTH..MAGIC_LENGTH + VERIFIER_LENGTH];
            field.fill(0);
            field[..tampered.len()].copy_from_slice(tampered.as_bytes());
            assert!(
                matches!(Envelope::parse(&bytes), Err(AlockError::Format(_))),
                "{} was accepted",
                tampered
            );
        }
    }

    #[test]
    fn test_oversized_verifier_rejected() {
        let envelope = Envelope {
            verifier: "x".repeat(VERIFIER_LENGTH + 1),
            ..sample()
        };
        assert!(envelope.to_bytes().is_err());
    }

    #[test]
    fn test_format_from_magic() {
        assert_eq!(PayloadFormat::from_magic(b"ALOCK_V1"), Some(PayloadFormat::Text));
        assert_eq!(PayloadFormat::from_magic(b"ALOCK_J1"), Some(PayloadFormat::Json));
        assert_eq!(PayloadFormat::from_magic(b"ALOCK_V2"), None);
    }
}
