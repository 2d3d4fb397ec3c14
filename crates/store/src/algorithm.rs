//! Hash algorithm selection
//!
//! The algorithm is chosen once, when the store is configured, and parsed
//! eagerly so an unknown name fails construction rather than the first put.

use digest::DynDigest;
use hashstore_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The hash function used to address stored content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HashAlgorithm {
    Sha224,
    #[default]
    Sha256,
    Sha384,
    Sha512,
    Sha512_256,
    Sha3_256,
    Sha3_512,
}

impl HashAlgorithm {
    /// Every supported algorithm, in declaration order
    pub const ALL: [HashAlgorithm; 7] = [
        HashAlgorithm::Sha224,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
        HashAlgorithm::Sha512_256,
        HashAlgorithm::Sha3_256,
        HashAlgorithm::Sha3_512,
    ];

    /// Returns the canonical algorithm name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Sha512_256 => "sha512_256",
            Self::Sha3_256 => "sha3_256",
            Self::Sha3_512 => "sha3_512",
        }
    }

    /// Size of the raw hash output in bytes
    pub fn output_size(&self) -> usize {
        match self {
            Self::Sha224 => 28,
            Self::Sha256 | Self::Sha512_256 | Self::Sha3_256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 | Self::Sha3_512 => 64,
        }
    }

    /// Length of a hex-encoded digest
    pub fn digest_len(&self) -> usize {
        self.output_size() * 2
    }

    /// Start a fresh streaming hash computation.
    pub fn hasher(&self) -> Box<dyn DynDigest + Send> {
        match self {
            Self::Sha224 => Box::new(sha2::Sha224::default()),
            Self::Sha256 => Box::new(sha2::Sha256::default()),
            Self::Sha384 => Box::new(sha2::Sha384::default()),
            Self::Sha512 => Box::new(sha2::Sha512::default()),
            Self::Sha512_256 => Box::new(sha2::Sha512_256::default()),
            Self::Sha3_256 => Box::new(sha3::Sha3_256::default()),
            Self::Sha3_512 => Box::new(sha3::Sha3_512::default()),
        }
    }

    /// Hex digest of the empty input
    pub fn empty_digest(&self) -> String {
        hex::encode(self.hasher().finalize())
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        // "sha3-256", "SHA3_256" and "sha3256" all name the same function
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "sha224" => Ok(Self::Sha224),
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            "sha512256" => Ok(Self::Sha512_256),
            "sha3256" => Ok(Self::Sha3_256),
            "sha3512" => Ok(Self::Sha3_512),
            _ => Err(Error::configuration(format!(
                "unknown hash algorithm '{s}' (supported: {})",
                Self::ALL
                    .iter()
                    .map(HashAlgorithm::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

impl TryFrom<String> for HashAlgorithm {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<HashAlgorithm> for String {
    fn from(algorithm: HashAlgorithm) -> Self {
        algorithm.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashstore_core::ErrorKind;

    #[test]
    fn test_sha256_empty_digest() {
        assert_eq!(
            HashAlgorithm::Sha256.empty_digest(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_empty_digest_length_matches_digest_len() {
        for algorithm in HashAlgorithm::ALL {
            assert_eq!(
                algorithm.empty_digest().len(),
                algorithm.digest_len(),
                "{algorithm}"
            );
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("sha256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!("SHA-512".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha512);
        assert_eq!(
            "sha3-256".parse::<HashAlgorithm>().unwrap(),
            HashAlgorithm::Sha3_256
        );
        assert_eq!(
            "sha512_256".parse::<HashAlgorithm>().unwrap(),
            HashAlgorithm::Sha512_256
        );
        for algorithm in HashAlgorithm::ALL {
            assert_eq!(algorithm.as_str().parse::<HashAlgorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn test_unknown_name_rejected() {
        let err = "md5".parse::<HashAlgorithm>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("md5"));
    }

    #[test]
    fn test_serde_uses_names() {
        let json = serde_json::to_string(&HashAlgorithm::Sha3_512).unwrap();
        assert_eq!(json, "\"sha3_512\"");
        let parsed: HashAlgorithm = serde_json::from_str("\"sha384\"").unwrap();
        assert_eq!(parsed, HashAlgorithm::Sha384);
        assert!(serde_json::from_str::<HashAlgorithm>("\"whirlpool\"").is_err());
    }
}
