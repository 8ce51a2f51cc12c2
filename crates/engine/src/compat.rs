use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostVersion {
    #[serde(rename = "1.2")]
    Legacy,
    #[default]
    #[serde(rename = "1.3")]
    Modern,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported host version '{raw}'; expected one of: 1.2, 1.3, legacy, modern")]
pub struct HostVersionError {
    pub raw: String,
}

impl HostVersion {
    pub const ALL: [HostVersion; 2] = [HostVersion::Legacy, HostVersion::Modern];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "1.2",
            Self::Modern => "1.3",
        }
    }

    pub fn select<T>(self, legacy: T, modern: T) -> T {
        match self {
            Self::Legacy => legacy,
            Self::Modern => modern,
        }
    }
}

impl fmt::Display for HostVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostVersion {
    type Err = HostVersionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1.2" | "legacy" => Ok(Self::Legacy),
            "1.3" | "modern" => Ok(Self::Modern),
            _ => Err(HostVersionError {
                raw: raw.to_string(),
            }),
        }
    }
}
