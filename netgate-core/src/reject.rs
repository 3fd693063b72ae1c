//! Processor reject codes

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::Arc;

lazy_static! {
    /// Standard reject-code table, built once per process and shared by every classifier
    pub static ref STANDARD_REJECT_CODES: Arc<RejectCodeTable> =
        Arc::new(RejectCodeTable::standard());
}

const STANDARD_CODES: &[(u32, &str)] = &[
    (1, "Agent code has not been set up on the authorization system. Please call iATS at 1-888-955-5455."),
    (2, "Unable to process transaction. Verify and re-enter credit card information."),
    (3, "Invalid Customer Code."),
    (4, "Incorrect expiration date."),
    (5, "Invalid transaction. Verify and re-enter credit card information."),
    (6, "Please have cardholder call the number on the back of the card."),
    (7, "Lost or stolen card."),
    (8, "Invalid card status."),
    (9, "Restricted card status. Usually on corporate cards restricted to specific sales."),
    (10, "Error. Please verify and re-enter credit card information."),
    (11, "General decline code. Please have client call the number on the back of credit card"),
    (12, "Incorrect CVV2 or Expiry date"),
    (14, "The card is over the limit."),
    (15, "General decline code. Please have client call the number on the back of credit card"),
    (16, "Invalid charge card number. Verify and re-enter credit card information."),
    (17, "Unable to authorize transaction. Authorizer needs more information for approval."),
    (18, "Card not supported by institution."),
    (19, "Incorrect CVV2 security code"),
    (22, "Bank timeout. Bank lines may be down or busy. Re-try transaction later."),
    (23, "System error. Re-try transaction later."),
    (24, "Charge card expired."),
    (25, "Capture card. Reported lost or stolen."),
    (26, "Invalid transaction, invalid expiry date. Please confirm and retry transaction."),
    (27, "Please have cardholder call the number on the back of the card."),
    (32, "Invalid charge card number."),
    (39, "Contact IATS 1-888-955-5455."),
    (40, "Invalid card number. Card not supported by IATS."),
    (41, "Invalid Expiry date."),
    (42, "CVV2 required."),
    (43, "Incorrect AVS."),
    (45, "Credit card name blocked. Call iATS at 1-888-955-5455."),
    (46, "Card tumbling. Call iATS at 1-888-955-5455."),
    (47, "Name tumbling. Call iATS at 1-888-955-5455."),
    (48, "IP blocked. Call iATS at 1-888-955-5455."),
    (49, "Velocity 1 – IP block. Call iATS at 1-888-955-5455."),
    (50, "Velocity 2 – IP block. Call iATS at 1-888-955-5455."),
    (51, "Velocity 3 – IP block. Call iATS at 1-888-955-5455."),
    (52, "Credit card BIN country blocked. Call iATS at 1-888-955-5455."),
    (100, "DO NOT REPROCESS. Call iATS at 1-888-955-5455."),
];

/// Reject code → human readable message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectCodeTable {
    messages: HashMap<u32, String>,
}

impl Default for RejectCodeTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl RejectCodeTable {
    /// Table published by the processor
    pub fn standard() -> Self {
        Self::from_entries(STANDARD_CODES.iter().map(|(code, msg)| (*code, msg.to_string())))
    }

    /// Build from explicit entries
    pub fn from_entries(entries: impl IntoIterator<Item = (u32, String)>) -> Self {
        Self {
            messages: entries.into_iter().collect(),
        }
    }

    /// Message for a code; unknown codes yield an empty message
    pub fn message(&self, code: u32) -> &str {
        self.messages.get(&code).map(String::as_str).unwrap_or("")
    }

    /// Number of known codes
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
