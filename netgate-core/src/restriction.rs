//! Region and currency/method-of-payment restrictions
//!
//! Requests are screened locally before any network call so that the remote
//! service never sees a combination it is known to reject.

use crate::region::Region;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Denial reason when the operation is excluded for the region
pub const SERVER_RESTRICTED_MESSAGE: &str = "Service cannot be used on this server.";

/// Denial reason when currency/MOP is not supported in the region
pub const MOP_CURRENCY_RESTRICTED_MESSAGE: &str =
    "Service cannot be used with this Method of Payment or Currency.";

lazy_static! {
    /// Standard matrix, built once per process and shared by every client
    pub static ref STANDARD_MATRIX: Arc<RestrictionMatrix> =
        Arc::new(RestrictionMatrix::standard());
}

/// Outcome of a restriction check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restriction {
    /// Request may be sent
    Permit,
    /// Request must not be sent
    Deny(String),
}

impl Restriction {
    /// True if the request may be sent
    pub fn is_permitted(&self) -> bool {
        matches!(self, Restriction::Permit)
    }
}

/// Region → currency → allowed methods of payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestrictionMatrix {
    regions: BTreeMap<Region, BTreeMap<String, Vec<String>>>,
}

impl Default for RestrictionMatrix {
    fn default() -> Self {
        Self::standard()
    }
}

impl RestrictionMatrix {
    /// Matrix published for the NA and UK servers
    pub fn standard() -> Self {
        let mut regions = BTreeMap::new();

        let mut na = BTreeMap::new();
        na.insert(
            "USD".to_string(),
            to_owned(&["VISA", "MC", "AMX", "DSC", "VISA DEBIT", "MC DEBIT"]),
        );
        na.insert("CAD".to_string(), to_owned(&["VISA", "MC", "AMX", "VISA DEBIT"]));
        regions.insert(Region::Na, na);

        let mut uk = BTreeMap::new();
        uk.insert(
            "GBP".to_string(),
            to_owned(&["VISA", "MC", "AMX", "MAESTRO", "VISA DEBIT"]),
        );
        uk.insert("EUR".to_string(), to_owned(&["VISA", "MC", "AMX", "VISA DEBIT"]));
        regions.insert(Region::Uk, uk);

        Self { regions }
    }

    /// Build from an explicit table
    pub fn from_table(regions: BTreeMap<Region, BTreeMap<String, Vec<String>>>) -> Self {
        Self { regions }
    }

    /// Allowed methods of payment for a currency in a region
    pub fn allowed(&self, region: Region, currency: &str) -> Option<&[String]> {
        self.regions
            .get(&region)
            .and_then(|currencies| currencies.get(currency))
            .map(Vec::as_slice)
    }

    /// Currencies configured for a region
    pub fn currencies(&self, region: Region) -> impl Iterator<Item = &str> {
        self.regions
            .get(&region)
            .into_iter()
            .flat_map(|currencies| currencies.keys().map(String::as_str))
    }

    /// True if the currency/MOP pair is accepted in the region
    pub fn permits(&self, region: Region, currency: Option<&str>, mop: Option<&str>) -> bool {
        let Some(allowed) = currency.and_then(|c| self.allowed(region, c)) else {
            return false;
        };
        match mop {
            Some(mop) => allowed.iter().any(|m| m == mop),
            None => false,
        }
    }

    /// Screen a request
    ///
    /// The currency/MOP check runs when both values are present or when
    /// `force_check` is set; blank values count as absent.
    pub fn evaluate(
        &self,
        region: Region,
        excluded_regions: &[Region],
        currency: Option<&str>,
        mop: Option<&str>,
        force_check: bool,
    ) -> Restriction {
        if excluded_regions.contains(&region) {
            debug!(region = %region, "operation excluded on this server");
            return Restriction::Deny(SERVER_RESTRICTED_MESSAGE.to_string());
        }

        let currency = currency.filter(|c| !c.is_empty());
        let mop = mop.filter(|m| !m.is_empty());

        if (currency.is_some() && mop.is_some()) || force_check {
            if !self.permits(region, currency, mop) {
                debug!(
                    region = %region,
                    currency = currency.unwrap_or(""),
                    mop = mop.unwrap_or(""),
                    "currency/MOP combination rejected"
                );
                return Restriction::Deny(MOP_CURRENCY_RESTRICTED_MESSAGE.to_string());
            }
        }

        Restriction::Permit
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
