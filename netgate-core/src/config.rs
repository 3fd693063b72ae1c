//! Configuration for the NetGate client

use crate::region::{Region, RegionResolver, NA_BASE_URL, UK_BASE_URL};
use crate::restriction::{RestrictionMatrix, STANDARD_MATRIX};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Client configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Agent code issued by iATS
    pub agent_code: String,

    /// Agent password
    pub password: String,

    /// Server identifier, `NA` or `UK`
    pub region: String,

    /// North America base address
    pub na_base_url: String,

    /// United Kingdom base address
    pub uk_base_url: String,

    /// Whole-request timeout
    pub request_timeout_seconds: u64,

    /// TCP/TLS connect timeout
    pub connect_timeout_seconds: u64,

    /// Replaces the standard currency/MOP matrix when set
    pub restriction_matrix: Option<RestrictionMatrix>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            agent_code: String::new(),
            password: String::new(),
            region: Region::Na.as_str().to_string(),
            na_base_url: NA_BASE_URL.to_string(),
            uk_base_url: UK_BASE_URL.to_string(),
            request_timeout_seconds: 30,
            connect_timeout_seconds: 10,
            restriction_matrix: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("agent_code", &self.agent_code)
            .field("password", &"<redacted>")
            .field("region", &self.region)
            .field("na_base_url", &self.na_base_url)
            .field("uk_base_url", &self.uk_base_url)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("connect_timeout_seconds", &self.connect_timeout_seconds)
            .field("restriction_matrix", &self.restriction_matrix.is_some())
            .finish()
    }
}

impl Config {
    /// Config with credentials and region, everything else default
    pub fn new(
        agent_code: impl Into<String>,
        password: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            agent_code: agent_code.into(),
            password: password.into(),
            region: region.into(),
            ..Self::default()
        }
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Configuration(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup, using the `NETGATE_*` names
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(agent_code) = lookup("NETGATE_AGENT_CODE") {
            config.agent_code = agent_code;
        }

        if let Some(password) = lookup("NETGATE_PASSWORD") {
            config.password = password;
        }

        if let Some(region) = lookup("NETGATE_REGION") {
            config.region = region;
        }

        if let Some(url) = lookup("NETGATE_NA_BASE_URL") {
            config.na_base_url = url;
        }

        if let Some(url) = lookup("NETGATE_UK_BASE_URL") {
            config.uk_base_url = url;
        }

        if let Some(timeout) = lookup("NETGATE_TIMEOUT_SECONDS") {
            config.request_timeout_seconds = parse_seconds("NETGATE_TIMEOUT_SECONDS", &timeout)?;
        }

        if let Some(timeout) = lookup("NETGATE_CONNECT_TIMEOUT_SECONDS") {
            config.connect_timeout_seconds =
                parse_seconds("NETGATE_CONNECT_TIMEOUT_SECONDS", &timeout)?;
        }

        Ok(config)
    }

    /// Parsed region; unknown identifiers are a configuration error
    pub fn region(&self) -> Result<Region> {
        self.region.parse()
    }

    /// Resolver over the configured base addresses
    pub fn resolver(&self) -> RegionResolver {
        RegionResolver::with_base_urls(self.na_base_url.clone(), self.uk_base_url.clone())
    }

    /// Configured matrix, or the shared standard one
    pub fn matrix(&self) -> Arc<RestrictionMatrix> {
        match &self.restriction_matrix {
            Some(matrix) => Arc::new(matrix.clone()),
            None => Arc::clone(&STANDARD_MATRIX),
        }
    }

    /// Check everything needed to build a client
    pub fn validate(&self) -> Result<()> {
        self.region()?;
        if self.agent_code.trim().is_empty() {
            return Err(Error::Configuration("agent code is required".to_string()));
        }
        if self.request_timeout_seconds == 0 {
            return Err(Error::Configuration(
                "request timeout must be at least one second".to_string(),
            ));
        }
        if self.connect_timeout_seconds == 0 {
            return Err(Error::Configuration(
                "connect timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_seconds(key: &str, value: &str) -> Result<u64> {
    value
        .parse()
        .map_err(|_| Error::Configuration(format!("{} is not a number: {}", key, value)))
}
