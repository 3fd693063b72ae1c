//! SOAP 1.2 over HTTPS transport

use crate::{envelope, transport::Transport, Error, Result};
use async_trait::async_trait;
use netgate_core::{Config, Parameters};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP transport configuration
#[derive(Debug, Clone)]
pub struct SoapConfig {
    /// Whole-request timeout
    pub timeout_seconds: u64,
    /// Connect timeout
    pub connect_timeout_seconds: u64,
}

impl Default for SoapConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: crate::DEFAULT_REQUEST_TIMEOUT_SECONDS,
            connect_timeout_seconds: crate::DEFAULT_CONNECT_TIMEOUT_SECONDS,
        }
    }
}

impl From<&Config> for SoapConfig {
    fn from(config: &Config) -> Self {
        Self {
            timeout_seconds: config.request_timeout_seconds,
            connect_timeout_seconds: config.connect_timeout_seconds,
        }
    }
}

/// SOAP transport
pub struct SoapTransport {
    config: SoapConfig,
    client: Client,
}

impl SoapTransport {
    /// Create new SOAP transport
    pub fn new(config: SoapConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()
            .map_err(|e| Error::Transport {
                operation: "client setup".to_string(),
                message: e.to_string(),
            })?;

        Ok(Self { config, client })
    }

    /// Limit that fired for a timed-out request
    fn timeout_seconds(&self, during_connect: bool) -> u64 {
        if during_connect {
            self.config.connect_timeout_seconds
        } else {
            self.config.timeout_seconds
        }
    }

    fn map_error(&self, operation: &str, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                seconds: self.timeout_seconds(err.is_connect()),
                operation: operation.to_string(),
            }
        } else {
            Error::Transport {
                operation: operation.to_string(),
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl Transport for SoapTransport {
    async fn call(
        &self,
        base_url: &str,
        endpoint: &str,
        operation: &str,
        parameters: &Parameters,
    ) -> Result<String> {
        let url = format!("{}{}", base_url, endpoint);
        let body = envelope::build_request(operation, parameters)?;
        debug!(url = %url, operation, "sending SOAP request");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, envelope::content_type(operation))
            .body(body)
            .send()
            .await
            .map_err(|e| self.map_error(operation, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.map_error(operation, e))?;

        if status.is_success() {
            return Ok(text);
        }

        // SOAP 1.2 faults arrive with 4xx/5xx statuses
        envelope::check_fault(&text)?;
        warn!(status = status.as_u16(), operation, "unexpected HTTP status");
        Err(Error::UnexpectedStatus {
            status_code: status.as_u16(),
            body: text,
        })
    }

    fn name(&self) -> &str {
        "SOAP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_reports_limit_that_fired() {
        let transport = SoapTransport::new(SoapConfig {
            timeout_seconds: 30,
            connect_timeout_seconds: 4,
        })
        .unwrap();
        assert_eq!(transport.timeout_seconds(true), 4);
        assert_eq!(transport.timeout_seconds(false), 30);
    }

    #[test]
    fn test_config_carries_both_timeouts() {
        let mut config = Config::new("TEST88", "TEST88", "NA");
        config.request_timeout_seconds = 12;
        config.connect_timeout_seconds = 3;
        let soap = SoapConfig::from(&config);
        assert_eq!(soap.timeout_seconds, 12);
        assert_eq!(soap.connect_timeout_seconds, 3);
    }
}
