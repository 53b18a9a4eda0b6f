//! Package versions
//!
//! `major.minor[.patch[.revision]][-prerelease][+metadata]`. The display text is
//! kept exactly as written so listings show what the feed author published.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, ShellError, install};

/// A parsed package version
#[derive(Debug, Clone)]
pub struct PackageVersion {
    parts: [u64; 4],
    prerelease: Option<String>,
    text: String,
}

impl PackageVersion {
    /// Parse a version string
    pub fn parse(input: &str) -> Result<Self> {
        let text = input.trim();
        let invalid = || install::invalid_version(input);
        if !text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+'))
        {
            return Err(invalid());
        }

        let without_metadata = text.split('+').next().unwrap_or_default();
        let (numbers, prerelease) = match without_metadata.split_once('-') {
            Some((numbers, pre)) if !pre.is_empty() => (numbers, Some(pre.to_string())),
            Some(_) => return Err(invalid()),
            None => (without_metadata, None),
        };

        let components: Vec<&str> = numbers.split('.').collect();
        if !(2..=4).contains(&components.len()) {
            return Err(invalid());
        }

        let mut parts = [0u64; 4];
        for (slot, component) in parts.iter_mut().zip(&components) {
            if component.is_empty() || !component.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            *slot = component.parse().map_err(|_| invalid())?;
        }

        Ok(Self {
            parts,
            prerelease,
            text: text.to_string(),
        })
    }

    pub fn major(&self) -> u64 {
        self.parts[0]
    }

    pub fn minor(&self) -> u64 {
        self.parts[1]
    }

    pub fn patch(&self) -> u64 {
        self.parts[2]
    }

    pub fn revision(&self) -> u64 {
        self.parts[3]
    }

    /// Prerelease label, without the leading dash
    pub fn prerelease(&self) -> Option<&str> {
        self.prerelease.as_deref()
    }

    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    /// The version exactly as it was written
    pub fn as_text(&self) -> &str {
        &self.text
    }
}

fn compare_prerelease(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ordering = match (l.parse::<u64>(), r.parse::<u64>()) {
                    (Ok(ln), Ok(rn)) => ln.cmp(&rn),
                    (Ok(_), Err(_)) => Ordering::Less,
                    (Err(_), Ok(_)) => Ordering::Greater,
                    (Err(_), Err(_)) => l.to_ascii_lowercase().cmp(&r.to_ascii_lowercase()),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

impl Ord for PackageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parts
            .cmp(&other.parts)
            .then_with(|| match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => compare_prerelease(a, b),
            })
    }
}

impl PartialOrd for PackageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PackageVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PackageVersion {}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for PackageVersion {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for PackageVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for PackageVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        // YAML feeds sometimes write `version: 1.2` which arrives as a float
        let value = serde_yaml::Value::deserialize(deserializer)?;
        let text = match value {
            serde_yaml::Value::String(s) => s,
            serde_yaml::Value::Number(n) => n.to_string(),
            other => {
                return Err(serde::de::Error::custom(format!(
                    "expected a version string, got {other:?}"
                )));
            }
        };
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
