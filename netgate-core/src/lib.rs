//! # NetGate Core
//!
//! Request screening and response interpretation for the iATS NetGate
//! payment service, independent of any transport:
//! - region resolution (NA / UK servers)
//! - currency and method-of-payment restrictions
//! - response document normalization
//! - response classification and reject-code translation
//! - the declarative table of remote operations
//!
//! ## Flow
//!
//! ```text
//! parameters ──► RestrictionMatrix ──► (transport) ──► normalize ──► Classifier
//!                     │                                                   │
//!                     ▼                                                   ▼
//!             RestrictionDenied                                 ClassifiedResult
//! ```

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unused_qualifications)]

pub mod classify;
pub mod config;
pub mod document;
pub mod error;
pub mod operation;
pub mod region;
pub mod reject;
pub mod restriction;
pub mod types;

pub use classify::Classifier;
pub use config::Config;
pub use document::{normalize, Node};
pub use error::{Error, Result};
pub use operation::{Operation, OperationKind, OutputFormat, Service};
pub use region::{Region, RegionResolver};
pub use reject::RejectCodeTable;
pub use restriction::{Restriction, RestrictionMatrix};
pub use types::{ClassifiedResult, ParamValue, Parameters};
