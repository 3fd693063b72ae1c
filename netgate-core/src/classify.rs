//! Response classification
//!
//! The service is inconsistent about where result information nests, so
//! each operation kind probes a fixed list of known shapes in priority
//! order.

use crate::document::Node;
use crate::operation::{Operation, OperationKind};
use crate::reject::{RejectCodeTable, STANDARD_REJECT_CODES};
use crate::types::ClassifiedResult;
use crate::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, warn};

pub const STATUS_FIELD: &str = "STATUS";
pub const ERRORS_FIELD: &str = "ERRORS";
pub const FAILURE_STATUS: &str = "Failure";
pub const PROCESS_RESULT_FIELD: &str = "PROCESSRESULT";
pub const BATCH_PROCESS_RESULT_FIELD: &str = "BATCHPROCESSRESULT";
pub const AUTHORIZATION_RESULT_FIELD: &str = "AUTHORIZATIONRESULT";
pub const CUSTOMERS_FIELD: &str = "CUSTOMERS";
pub const JOURNAL_REPORT_FIELD: &str = "JOURNALREPORT";
pub const TRANSACTION_FIELD: &str = "TN";
pub const BATCH_ID_FIELD: &str = "BATCHID";
pub const BATCH_RESULT_FILE_FIELD: &str = "BATCHPROCESSRESULTFILE";
pub const FILE_FIELD: &str = "FILE";

lazy_static! {
    static ref REJECT_PATTERN: Regex =
        Regex::new(r"REJECT.*?(\d+)\s*$").expect("reject pattern is valid");
}

/// Turns normalized documents into [`ClassifiedResult`]s
#[derive(Debug, Clone)]
pub struct Classifier {
    reject_codes: Arc<RejectCodeTable>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(Arc::clone(&STANDARD_REJECT_CODES))
    }
}

impl Classifier {
    pub fn new(reject_codes: Arc<RejectCodeTable>) -> Self {
        Self { reject_codes }
    }

    /// Reject-code table in use
    pub fn reject_codes(&self) -> &RejectCodeTable {
        &self.reject_codes
    }

    /// Classify a normalized response document for `operation`
    ///
    /// Only CSV decoding can fail; every structured shape maps to some
    /// result variant.
    pub fn classify(&self, document: &Node, operation: &Operation) -> Result<ClassifiedResult> {
        if operation.is_csv() {
            return decode_csv(document).map(ClassifiedResult::Csv);
        }

        if document.get(STATUS_FIELD).and_then(Node::text) == Some(FAILURE_STATUS) {
            let errors = document.get(ERRORS_FIELD).cloned().unwrap_or_else(Node::empty);
            debug!(operation = operation.name, "service reported failure");
            return Ok(ClassifiedResult::Failure(errors));
        }

        let result = match operation.kind() {
            OperationKind::Report => match document.path(&[JOURNAL_REPORT_FIELD, TRANSACTION_FIELD]) {
                Some(transactions) => ClassifiedResult::Success(transactions.clone()),
                None => ClassifiedResult::NoData,
            },
            OperationKind::Process => {
                let payload = document
                    .get(PROCESS_RESULT_FIELD)
                    .or_else(|| document.get(BATCH_PROCESS_RESULT_FIELD))
                    .unwrap_or(document);
                self.reject_code(payload)
                    .or_else(|| batch_pending(payload))
                    .unwrap_or_else(|| ClassifiedResult::Success(payload.clone()))
            }
            OperationKind::Customer => {
                let payload = document
                    .get(PROCESS_RESULT_FIELD)
                    .or_else(|| document.get(CUSTOMERS_FIELD))
                    .unwrap_or(document);
                self.reject_code(payload)
                    .unwrap_or_else(|| ClassifiedResult::Success(payload.clone()))
            }
        };

        Ok(result)
    }

    fn reject_code(&self, payload: &Node) -> Option<ClassifiedResult> {
        let authorization = payload.get(AUTHORIZATION_RESULT_FIELD)?.text()?;
        let code = parse_reject_code(authorization)?;
        Some(ClassifiedResult::RejectCode {
            code,
            message: self.reject_codes.message(code).to_string(),
        })
    }
}

/// Trailing reject code of an authorization result, e.g. `REJECT: 19`
///
/// Strings without the `REJECT` token or without trailing digits carry no
/// code.
pub fn parse_reject_code(authorization: &str) -> Option<u32> {
    let captures = REJECT_PATTERN.captures(authorization)?;
    match captures[1].parse() {
        Ok(code) => Some(code),
        Err(_) => {
            warn!(authorization, "reject code out of range");
            None
        }
    }
}

fn batch_pending(payload: &Node) -> Option<ClassifiedResult> {
    let batch_id = payload.get(BATCH_ID_FIELD)?.text().filter(|id| !id.is_empty())?;
    let has_file = payload
        .get(BATCH_RESULT_FILE_FIELD)
        .map(|file| !file.is_empty())
        .unwrap_or(false);
    if has_file {
        return None;
    }
    Some(ClassifiedResult::BatchPending {
        batch_id: batch_id.to_string(),
    })
}

/// Decode the base64 `FILE` field of a CSV report
///
/// A missing or empty field is an empty report.
pub fn decode_csv(document: &Node) -> Result<String> {
    let encoded: String = match document.get(FILE_FIELD).and_then(Node::text) {
        Some(text) => text.chars().filter(|c| !c.is_ascii_whitespace()).collect(),
        None => return Ok(String::new()),
    };
    if encoded.is_empty() {
        return Ok(String::new());
    }

    let bytes = STANDARD
        .decode(encoded.as_bytes())
        .map_err(|e| Error::MalformedDocument(format!("FILE is not valid base64: {}", e)))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
