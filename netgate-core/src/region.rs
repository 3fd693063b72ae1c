//! Processing regions and base address resolution

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// North America production server
pub const NA_BASE_URL: &str = "https://www.iatspayments.com";

/// United Kingdom production server
pub const UK_BASE_URL: &str = "https://www.uk.iatspayments.com";

/// Geographic processing zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Region {
    /// North America
    #[serde(rename = "NA")]
    Na,
    /// United Kingdom
    #[serde(rename = "UK")]
    Uk,
}

impl Region {
    /// All regions, in a stable order
    pub const ALL: [Region; 2] = [Region::Na, Region::Uk];

    /// Server identifier as used by the remote service
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Na => "NA",
            Region::Uk => "UK",
        }
    }

    /// Production base address
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Region::Na => NA_BASE_URL,
            Region::Uk => UK_BASE_URL,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Region {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        id.parse().map_err(serde::de::Error::custom)
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "NA" => Ok(Region::Na),
            "UK" => Ok(Region::Uk),
            other => Err(Error::Configuration(format!(
                "Invalid Server ID: {:?}",
                other
            ))),
        }
    }
}

/// Maps region identifiers to base addresses
///
/// Unknown identifiers are rejected, never defaulted: a request sent to the
/// wrong region's server runs on the wrong country's payment rails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionResolver {
    na_base_url: String,
    uk_base_url: String,
}

impl Default for RegionResolver {
    fn default() -> Self {
        Self {
            na_base_url: NA_BASE_URL.to_string(),
            uk_base_url: UK_BASE_URL.to_string(),
        }
    }
}

impl RegionResolver {
    /// Resolver with explicit base addresses (sandbox, mock server)
    pub fn with_base_urls(na_base_url: impl Into<String>, uk_base_url: impl Into<String>) -> Self {
        Self {
            na_base_url: trim_base(na_base_url.into()),
            uk_base_url: trim_base(uk_base_url.into()),
        }
    }

    /// Base address for a region
    pub fn base_url(&self, region: Region) -> &str {
        match region {
            Region::Na => &self.na_base_url,
            Region::Uk => &self.uk_base_url,
        }
    }

    /// Resolve a raw region identifier to its base address
    pub fn resolve(&self, region_id: &str) -> Result<&str> {
        let region: Region = region_id.parse()?;
        Ok(self.base_url(region))
    }
}

fn trim_base(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
