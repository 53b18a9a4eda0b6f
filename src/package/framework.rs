//! Target framework names
//!
//! Accepts the short folder names used inside packages (`net45`, `net451`,
//! `netstandard2.0`, `netcoreapp3.1`, `net6.0`) and the long form
//! (`.NETFramework,Version=v4.5`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, ShellError, install};

pub const NET_FRAMEWORK: &str = ".NETFramework";
pub const NET_STANDARD: &str = ".NETStandard";
pub const NET_CORE_APP: &str = ".NETCoreApp";

/// Framework the workspace targets when its config does not name one
pub const DEFAULT_FRAMEWORK: &str = "net45";

/// A target framework identifier plus version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameworkName {
    identifier: &'static str,
    version: (u32, u32, u32),
}

impl FrameworkName {
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = || install::invalid_framework(input);

        if let Some((identifier, rest)) = trimmed.split_once(",Version=v") {
            let identifier = known_identifier(identifier).ok_or_else(invalid)?;
            let version = parse_dotted(rest).ok_or_else(invalid)?;
            return Ok(Self {
                identifier,
                version,
            });
        }

        let lower = trimmed.to_ascii_lowercase();
        if let Some(rest) = lower.strip_prefix("netstandard") {
            let version = parse_dotted(rest).ok_or_else(invalid)?;
            return Ok(Self {
                identifier: NET_STANDARD,
                version,
            });
        }
        if let Some(rest) = lower.strip_prefix("netcoreapp") {
            let version = parse_dotted(rest).ok_or_else(invalid)?;
            return Ok(Self {
                identifier: NET_CORE_APP,
                version,
            });
        }
        if let Some(rest) = lower.strip_prefix("net") {
            if rest.contains('.') {
                // net5.0 and later are .NETCoreApp
                let version = parse_dotted(rest).ok_or_else(invalid)?;
                if version.0 < 5 {
                    return Err(invalid());
                }
                return Ok(Self {
                    identifier: NET_CORE_APP,
                    version,
                });
            }
            let version = parse_compact(rest).ok_or_else(invalid)?;
            return Ok(Self {
                identifier: NET_FRAMEWORK,
                version,
            });
        }

        Err(invalid())
    }

    pub fn identifier(&self) -> &str {
        self.identifier
    }

    pub fn version(&self) -> (u32, u32, u32) {
        self.version
    }

    /// Short folder name, e.g. `net45` or `netstandard2.0`
    pub fn short_name(&self) -> String {
        let (major, minor, patch) = self.version;
        match self.identifier {
            NET_FRAMEWORK if patch > 0 => format!("net{major}{minor}{patch}"),
            NET_FRAMEWORK => format!("net{major}{minor}"),
            NET_STANDARD => format!("netstandard{major}.{minor}"),
            _ if major >= 5 => format!("net{major}.{minor}"),
            _ => format!("netcoreapp{major}.{minor}"),
        }
    }

    /// Whether assemblies built for `self` can be used by a `target` session
    pub fn is_compatible_with(&self, target: &FrameworkName) -> bool {
        if self.identifier == target.identifier {
            return self.version <= target.version;
        }
        if self.identifier == NET_STANDARD && self.version <= (2, 0, 0) {
            return match target.identifier {
                NET_FRAMEWORK => target.version >= (4, 6, 1),
                NET_CORE_APP => true,
                _ => false,
            };
        }
        false
    }
}

impl Default for FrameworkName {
    fn default() -> Self {
        Self {
            identifier: NET_FRAMEWORK,
            version: (4, 5, 0),
        }
    }
}

fn known_identifier(name: &str) -> Option<&'static str> {
    [NET_FRAMEWORK, NET_STANDARD, NET_CORE_APP]
        .into_iter()
        .find(|known| known.eq_ignore_ascii_case(name))
}

fn parse_dotted(text: &str) -> Option<(u32, u32, u32)> {
    let mut parts = text.split('.').map(|p| p.parse::<u32>().ok());
    let major = parts.next()??;
    let minor = parts.next().unwrap_or(Some(0))?;
    let patch = parts.next().unwrap_or(Some(0))?;
    if parts.next().is_some() {
        return None;
    }
    Some((major, minor, patch))
}

/// `45` -> 4.5, `451` -> 4.5.1, `4` -> 4.0
fn parse_compact(text: &str) -> Option<(u32, u32, u32)> {
    if text.is_empty() || text.len() > 3 || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let digit = |i: usize| {
        text.as_bytes()
            .get(i)
            .map_or(0, |b| u32::from(b - b'0'))
    };
    Some((digit(0), digit(1), digit(2)))
}

impl fmt::Display for FrameworkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

impl FromStr for FrameworkName {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for FrameworkName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.short_name())
    }
}

impl<'de> Deserialize<'de> for FrameworkName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
