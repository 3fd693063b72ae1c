//! # NetGate Client
//!
//! Async client for the iATS NetGate payment service:
//! - SOAP 1.2 over HTTPS transport (pluggable)
//! - single orchestrator for every remote operation
//! - CustomerLink, ProcessLink and ReportLink facades
//! - Prometheus metrics and tracing spans per request
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐ ┌──────────────┐ ┌──────────────┐
//! │ CustomerLink │ │ ProcessLink  │ │  ReportLink  │
//! └──────┬───────┘ └──────┬───────┘ └──────┬───────┘
//!        └────────────────┼────────────────┘
//!                ┌────────▼────────┐
//!                │   LinkClient    │  restrictions, credentials,
//!                │ (orchestrator)  │  normalize, classify
//!                └────────┬────────┘
//!                ┌────────▼────────┐
//!                │    Transport    │  SoapTransport (reqwest)
//!                └─────────────────┘
//! ```
//!
//! ```no_run
//! use netgate_client::LinkClient;
//! use netgate_core::{Config, Parameters};
//!
//! # async fn run() -> netgate_client::Result<()> {
//! let client = LinkClient::from_config(&Config::from_env()?)?;
//! let result = client
//!     .process_link()
//!     .process_credit_card(
//!         Parameters::new()
//!             .with("currency", "USD")
//!             .with("mop", "VISA")
//!             .with("total", "15.00"),
//!     )
//!     .await?;
//! println!("{}", result);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod customer;
pub mod envelope;
pub mod error;
pub mod metrics;
pub mod orchestrator;
pub mod process;
pub mod report;
pub mod soap;
pub mod transport;

pub use customer::CustomerLink;
pub use error::{Error, Result};
pub use orchestrator::LinkClient;
pub use process::ProcessLink;
pub use report::ReportLink;
pub use soap::{SoapConfig, SoapTransport};
pub use transport::Transport;

/// Default request timeout (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Default connect timeout (seconds)
pub const DEFAULT_CONNECT_TIMEOUT_SECONDS: u64 = 10;
