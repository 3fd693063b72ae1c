//! Request parameters and classified results

use crate::document::Node;
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Credential field: agent code
pub const AGENT_CODE_FIELD: &str = "agentCode";

/// Credential field: password
pub const PASSWORD_FIELD: &str = "password";

/// Client IP field, blanked when it cannot be IPv4
pub const CLIENT_IP_FIELD: &str = "customerIPAddress";

/// Currency field used by restriction checks
pub const CURRENCY_FIELD: &str = "currency";

/// Method-of-payment field used by restriction checks
pub const MOP_FIELD: &str = "mop";

/// Caller-visible text of [`ClassifiedResult::NoData`]
pub const NO_DATA_MESSAGE: &str = "No data returned for this date";

/// Longest dotted-quad IPv4 address
const MAX_CLIENT_IP_LEN: usize = 15;

/// Request parameter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Plain text
    Text(String),
    /// Amount or count
    Number(Decimal),
    /// Flag
    Bool(bool),
    /// Date, sent as ISO-8601 with offset
    Timestamp(DateTime<Utc>),
    /// Pre-encoded base64 blob (batch files), sent verbatim
    Base64(String),
}

impl ParamValue {
    /// Pre-encoded base64 blob
    pub fn base64(encoded: impl Into<String>) -> Self {
        ParamValue::Base64(encoded.into())
    }

    /// Text as sent on the wire
    pub fn to_wire(&self) -> String {
        match self {
            ParamValue::Text(text) | ParamValue::Base64(text) => text.clone(),
            ParamValue::Number(n) => n.to_string(),
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::Timestamp(ts) => ts.to_rfc3339_opts(SecondsFormat::Secs, false),
        }
    }

    /// Text value, if this is text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<Decimal> for ParamValue {
    fn from(v: Decimal) -> Self {
        ParamValue::Number(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Number(Decimal::from(v))
    }
}

impl From<DateTime<Utc>> for ParamValue {
    fn from(v: DateTime<Utc>) -> Self {
        ParamValue::Timestamp(v)
    }
}

/// Ordered request parameters
///
/// Keys are unique; inserting an existing key replaces its value in place.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    fields: Vec<(String, ParamValue)>,
}

impl Parameters {
    /// Empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a field
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Remove a field
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        let index = self.fields.iter().position(|(k, _)| k == key)?;
        Some(self.fields.remove(index).1)
    }

    /// Field value
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Text field value
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ParamValue::as_str)
    }

    /// Currency, if supplied
    pub fn currency(&self) -> Option<&str> {
        self.get_str(CURRENCY_FIELD)
    }

    /// Method of payment, if supplied
    pub fn mop(&self) -> Option<&str> {
        self.get_str(MOP_FIELD)
    }

    /// Fields in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if no fields are set
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Put the credential fields first, replacing caller-supplied values
    pub fn inject_credentials(&mut self, agent_code: &str, password: &str) {
        self.remove(AGENT_CODE_FIELD);
        self.remove(PASSWORD_FIELD);
        self.fields.insert(0, (PASSWORD_FIELD.to_string(), password.into()));
        self.fields.insert(0, (AGENT_CODE_FIELD.to_string(), agent_code.into()));
    }

    /// Blank a client IP that is too long to be IPv4
    ///
    /// Returns true if the value was blanked.
    pub fn sanitize_client_ip(&mut self) -> bool {
        let too_long = self
            .get(CLIENT_IP_FIELD)
            .map(|ip| ip.to_wire().chars().count() > MAX_CLIENT_IP_LEN)
            .unwrap_or(false);
        if too_long {
            self.insert(CLIENT_IP_FIELD, "");
        }
        too_long
    }
}

impl fmt::Debug for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.fields {
            if key == PASSWORD_FIELD {
                map.entry(key, &"<redacted>");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Parameters::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// Outcome of one remote call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "payload", rename_all = "snake_case")]
pub enum ClassifiedResult {
    /// Call succeeded; payload is the relevant part of the document
    Success(Node),
    /// Service reported failure; payload is its error field
    Failure(Node),
    /// Request was not sent because of a local restriction
    RestrictionDenied(String),
    /// Processor declined with a reject code
    RejectCode {
        /// Numeric code
        code: u32,
        /// Message from the reject-code table, empty if unknown
        message: String,
    },
    /// Report had no records
    NoData,
    /// Batch accepted and still processing
    BatchPending {
        /// Identifier to poll with
        batch_id: String,
    },
    /// Decoded CSV report, empty when the service returned no file
    Csv(String),
}

impl ClassifiedResult {
    /// True for [`ClassifiedResult::Success`] and [`ClassifiedResult::Csv`]
    pub fn is_success(&self) -> bool {
        matches!(self, ClassifiedResult::Success(_) | ClassifiedResult::Csv(_))
    }

    /// Success payload
    pub fn payload(&self) -> Option<&Node> {
        match self {
            ClassifiedResult::Success(node) => Some(node),
            _ => None,
        }
    }

    /// Outcome label for logs and metrics
    pub fn outcome(&self) -> &'static str {
        match self {
            ClassifiedResult::Success(_) => "success",
            ClassifiedResult::Failure(_) => "failure",
            ClassifiedResult::RestrictionDenied(_) => "restriction_denied",
            ClassifiedResult::RejectCode { .. } => "reject_code",
            ClassifiedResult::NoData => "no_data",
            ClassifiedResult::BatchPending { .. } => "batch_pending",
            ClassifiedResult::Csv(_) => "csv",
        }
    }
}

impl fmt::Display for ClassifiedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifiedResult::Success(_) => write!(f, "Success"),
            ClassifiedResult::Failure(errors) => match errors.text() {
                Some(text) => write!(f, "Failure: {}", text),
                None => write!(f, "Failure"),
            },
            ClassifiedResult::RestrictionDenied(reason) => f.write_str(reason),
            ClassifiedResult::RejectCode { code, message } => {
                write!(f, "REJECT: {} {}", code, message)
            }
            ClassifiedResult::NoData => f.write_str(NO_DATA_MESSAGE),
            ClassifiedResult::BatchPending { batch_id } => {
                write!(f, "Batch {} pending", batch_id)
            }
            ClassifiedResult::Csv(csv) => write!(f, "CSV ({} bytes)", csv.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut params = Parameters::new().with("a", "1").with("b", "2");
        params.insert("a", "3");
        let keys: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(params.get_str("a"), Some("3"));
    }

    #[test]
    fn test_inject_credentials_goes_first_and_overrides() {
        let mut params = Parameters::new()
            .with("invoiceNum", "00000001")
            .with(PASSWORD_FIELD, "caller");
        params.inject_credentials("TEST88", "secret");

        let keys: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![AGENT_CODE_FIELD, PASSWORD_FIELD, "invoiceNum"]);
        assert_eq!(params.get_str(PASSWORD_FIELD), Some("secret"));
    }

    #[test]
    fn test_ipv6_client_ip_blanked() {
        let mut params = Parameters::new().with(CLIENT_IP_FIELD, "2001:db8::ff00:42:8329");
        assert!(params.sanitize_client_ip());
        assert_eq!(params.get_str(CLIENT_IP_FIELD), Some(""));

        let mut params = Parameters::new().with(CLIENT_IP_FIELD, "255.255.255.255");
        assert!(!params.sanitize_client_ip());
        assert_eq!(params.get_str(CLIENT_IP_FIELD), Some("255.255.255.255"));

        let mut params = Parameters::new();
        assert!(!params.sanitize_client_ip());
        assert!(params.get(CLIENT_IP_FIELD).is_none());
    }

    #[test]
    fn test_wire_formatting() {
        let ts = Utc.with_ymd_and_hms(2011, 10, 23, 0, 0, 0).unwrap();
        assert_eq!(ParamValue::from(ts).to_wire(), "2011-10-23T00:00:00+00:00");
        assert_eq!(ParamValue::from(dec!(2.50)).to_wire(), "2.50");
        assert_eq!(ParamValue::from(false).to_wire(), "false");
    }

    #[test]
    fn test_debug_redacts_password() {
        let mut params = Parameters::new();
        params.inject_credentials("TEST88", "hunter2");
        let debug = format!("{:?}", params);
        assert!(debug.contains("TEST88"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_no_data_display() {
        assert_eq!(ClassifiedResult::NoData.to_string(), NO_DATA_MESSAGE);
    }
}
