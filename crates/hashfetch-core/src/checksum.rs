//! Content hashes used to address and verify manifest entries.
//!
//! Digests are computed on demand by streaming the file in fixed-size
//! chunks, so verifying a multi-gigabyte volume keeps memory use bounded.

use anyhow::{Context, Result};
use md5::Md5;
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

const BUF_SIZE: usize = 64 * 1024;

/// Hash algorithms a manifest entry may declare. The manifest field name is the [`id`](Self::id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HashAlgorithm {
    Md5,
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    /// All supported algorithms, weakest first.
    pub const ALL: [HashAlgorithm; 3] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha512,
    ];

    /// Lowercase identifier used as the manifest field name (`"sha512"`).
    pub fn id(self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    /// Directory name used by object stores and the default mirrors (`"SHA512"`).
    pub fn store_dir(self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "MD5",
            HashAlgorithm::Sha256 => "SHA256",
            HashAlgorithm::Sha512 => "SHA512",
        }
    }

    /// Length of the lowercase hex encoding of a digest.
    pub fn hex_len(self) -> usize {
        match self {
            HashAlgorithm::Md5 => 32,
            HashAlgorithm::Sha256 => 64,
            HashAlgorithm::Sha512 => 128,
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.id().eq_ignore_ascii_case(id))
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| {
            format!("unknown hash algorithm '{}' (expected md5, sha256 or sha512)", s)
        })
    }
}

/// A digest tagged with its algorithm. The hex string is always lowercase and
/// exactly `algorithm.hex_len()` characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksum {
    algorithm: HashAlgorithm,
    hex: String,
}

impl Checksum {
    /// Validates `hex` against the algorithm's digest length. Uppercase input is normalized.
    pub fn new(algorithm: HashAlgorithm, hex: &str) -> std::result::Result<Self, String> {
        let hex = hex.trim();
        if hex.len() != algorithm.hex_len() {
            return Err(format!(
                "{} digest must be {} hex characters, got {}",
                algorithm,
                algorithm.hex_len(),
                hex.len()
            ));
        }
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("{} digest contains non-hex characters", algorithm));
        }
        Ok(Checksum {
            algorithm,
            hex: hex.to_ascii_lowercase(),
        })
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn hex(&self) -> &str {
        &self.hex
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.hex)
    }
}

fn digest_file<D: Digest>(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = D::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Compute the digest of a file with the given algorithm.
pub fn hash_path(path: &Path, algorithm: HashAlgorithm) -> Result<Checksum> {
    let hex = match algorithm {
        HashAlgorithm::Md5 => digest_file::<Md5>(path)?,
        HashAlgorithm::Sha256 => digest_file::<Sha256>(path)?,
        HashAlgorithm::Sha512 => digest_file::<Sha512>(path)?,
    };
    Ok(Checksum { algorithm, hex })
}

/// True when `path` exists and its digest equals `expected`.
pub fn verify_path(path: &Path, expected: &Checksum) -> Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }
    let actual = hash_path(path, expected.algorithm())?;
    Ok(actual == *expected)
}
