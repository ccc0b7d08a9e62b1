//! JSON wire format of a manifest entry.
//!
//! The hash field is keyed by the algorithm id (`"sha512": "…"`), `archive`
//! may be a JSON boolean or the strings `"true"`/`"false"`, and unknown
//! fields are ignored.

use crate::checksum::{Checksum, HashAlgorithm};
use serde::{Deserialize, Deserializer, Serialize};

use super::ManifestEntry;

#[derive(Debug, Default, Serialize, Deserialize)]
pub(super) struct RawEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(
        default,
        deserialize_with = "bool_or_string",
        skip_serializing_if = "is_false"
    )]
    pub archive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha512: Option<String>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

fn bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Text(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Flag::Text(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        Flag::Text(s) => Err(serde::de::Error::custom(format!(
            "archive must be true or false, got \"{}\"",
            s
        ))),
    }
}

impl RawEntry {
    /// Converts to a validated entry. The strongest declared hash wins.
    pub fn into_entry(self) -> Result<ManifestEntry, String> {
        let declared = [
            (HashAlgorithm::Sha512, self.sha512),
            (HashAlgorithm::Sha256, self.sha256),
            (HashAlgorithm::Md5, self.md5),
        ];
        let (algorithm, hex) = declared
            .into_iter()
            .find_map(|(algo, hex)| hex.map(|h| (algo, h)))
            .ok_or_else(|| "no md5, sha256 or sha512 field".to_string())?;
        let checksum = Checksum::new(algorithm, &hex)?;
        let url = match self.url {
            Some(u) if u.trim().is_empty() => return Err("url is empty".to_string()),
            other => other,
        };
        Ok(ManifestEntry {
            checksum,
            url,
            archive: self.archive,
        })
    }

    pub fn from_entry(entry: &ManifestEntry) -> Self {
        let mut raw = RawEntry {
            url: entry.url.clone(),
            archive: entry.archive,
            ..RawEntry::default()
        };
        let hex = Some(entry.checksum.hex().to_string());
        match entry.checksum.algorithm() {
            HashAlgorithm::Md5 => raw.md5 = hex,
            HashAlgorithm::Sha256 => raw.sha256 = hex,
            HashAlgorithm::Sha512 => raw.sha512 = hex,
        }
        raw
    }
}
