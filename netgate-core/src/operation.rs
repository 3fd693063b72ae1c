//! Declarative table of remote operations
//!
//! Every remote call is described by one [`Operation`]: which service hosts
//! it, which field carries its result, how the result is shaped and where
//! it may run. A single generic orchestrator consumes these.

use crate::region::Region;
use serde::Serialize;
use std::fmt;

/// Remote service group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Service {
    /// Customer profile management
    CustomerLink,
    /// Transaction processing
    ProcessLink,
    /// Reporting
    ReportLink,
}

impl Service {
    /// Endpoint path on the regional server
    pub fn endpoint(&self) -> &'static str {
        match self {
            Service::CustomerLink => "/NetGate/CustomerLink.asmx",
            Service::ProcessLink => "/NetGate/ProcessLink.asmx",
            Service::ReportLink => "/NetGate/ReportLink.asmx",
        }
    }

    /// Response classification rules for this service
    pub fn kind(&self) -> OperationKind {
        match self {
            Service::CustomerLink => OperationKind::Customer,
            Service::ProcessLink => OperationKind::Process,
            Service::ReportLink => OperationKind::Report,
        }
    }

    /// Service name
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::CustomerLink => "CustomerLink",
            Service::ProcessLink => "ProcessLink",
            Service::ReportLink => "ReportLink",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which classification rules apply to a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperationKind {
    /// Transaction processing results
    Process,
    /// Customer profile results
    Customer,
    /// Report listings
    Report,
}

/// Declared result format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutputFormat {
    /// Normalized document tree
    Structured,
    /// Base64 encoded CSV file in the `FILE` field
    Csv,
}

/// One remote operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    /// Hosting service
    pub service: Service,
    /// Operation name (e.g. `ProcessCreditCard`)
    pub name: &'static str,
    /// Field of the response carrying the result document
    pub result_field: &'static str,
    /// Result format
    pub format: OutputFormat,
    /// Regions where the operation is not offered
    pub excluded_regions: &'static [Region],
    /// Validate currency/MOP even when the caller omits one of them
    pub force_currency_check: bool,
}

impl Operation {
    /// SOAP operation element name
    pub fn soap_operation(&self) -> String {
        format!("{}V1", self.name)
    }

    /// Response classification rules
    pub fn kind(&self) -> OperationKind {
        self.service.kind()
    }

    /// True if the operation returns a CSV file
    pub fn is_csv(&self) -> bool {
        self.format == OutputFormat::Csv
    }
}

const NA_ONLY: &[Region] = &[Region::Uk];
const ANYWHERE: &[Region] = &[];

macro_rules! operation {
    ($ident:ident, $service:ident, $name:literal, $format:ident, $excluded:expr, $force:expr) => {
        #[doc = concat!("`", $name, "`")]
        pub const $ident: Operation = Operation {
            service: Service::$service,
            name: $name,
            result_field: concat!($name, "V1Result"),
            format: OutputFormat::$format,
            excluded_regions: $excluded,
            force_currency_check: $force,
        };
    };
}

// CustomerLink
operation!(GET_CUSTOMER_CODE_DETAIL, CustomerLink, "GetCustomerCodeDetail", Structured, ANYWHERE, false);
operation!(CREATE_CREDIT_CARD_CUSTOMER_CODE, CustomerLink, "CreateCreditCardCustomerCode", Structured, ANYWHERE, false);
operation!(UPDATE_CREDIT_CARD_CUSTOMER_CODE, CustomerLink, "UpdateCreditCardCustomerCode", Structured, ANYWHERE, false);
operation!(CREATE_ACHEFT_CUSTOMER_CODE, CustomerLink, "CreateACHEFTCustomerCode", Structured, NA_ONLY, false);
operation!(UPDATE_ACHEFT_CUSTOMER_CODE, CustomerLink, "UpdateACHEFTCustomerCode", Structured, NA_ONLY, false);
operation!(DELETE_CUSTOMER_CODE, CustomerLink, "DeleteCustomerCode", Structured, ANYWHERE, false);
operation!(GET_CUSTOMER_LIST, CustomerLink, "GetCustomerList", Structured, ANYWHERE, false);

// ProcessLink
operation!(PROCESS_CREDIT_CARD, ProcessLink, "ProcessCreditCard", Structured, ANYWHERE, true);
operation!(PROCESS_CREDIT_CARD_WITH_CUSTOMER_CODE, ProcessLink, "ProcessCreditCardWithCustomerCode", Structured, ANYWHERE, false);
operation!(CREATE_CUSTOMER_CODE_AND_PROCESS_CREDIT_CARD, ProcessLink, "CreateCustomerCodeAndProcessCreditCard", Structured, ANYWHERE, true);
operation!(PROCESS_CREDIT_CARD_REFUND, ProcessLink, "ProcessCreditCardRefundWithTransactionId", Structured, ANYWHERE, false);
operation!(PROCESS_CREDIT_CARD_BATCH, ProcessLink, "ProcessCreditCardBatch", Structured, ANYWHERE, false);
operation!(GET_BATCH_PROCESS_RESULT_FILE, ProcessLink, "GetBatchProcessResultFile", Structured, ANYWHERE, false);
operation!(PROCESS_ACHEFT, ProcessLink, "ProcessACHEFT", Structured, NA_ONLY, false);
operation!(PROCESS_ACHEFT_WITH_CUSTOMER_CODE, ProcessLink, "ProcessACHEFTWithCustomerCode", Structured, NA_ONLY, false);
operation!(CREATE_CUSTOMER_CODE_AND_PROCESS_ACHEFT, ProcessLink, "CreateCustomerCodeAndProcessACHEFT", Structured, NA_ONLY, false);
operation!(PROCESS_ACHEFT_REFUND, ProcessLink, "ProcessACHEFTRefundWithTransactionId", Structured, NA_ONLY, false);
operation!(PROCESS_ACHEFT_CHARGE_BATCH, ProcessLink, "ProcessACHEFTChargeBatch", Structured, NA_ONLY, false);
operation!(GET_ACHEFT_BATCH_PROCESS_RESULT_FILE, ProcessLink, "GetACHEFTBatchProcessResultFile", Structured, NA_ONLY, false);

// ReportLink
operation!(GET_CREDIT_CARD_JOURNAL, ReportLink, "GetCreditCardJournal", Structured, ANYWHERE, false);
operation!(GET_CREDIT_CARD_JOURNAL_CSV, ReportLink, "GetCreditCardJournalCSV", Csv, ANYWHERE, false);
operation!(GET_CREDIT_CARD_REJECT, ReportLink, "GetCreditCardReject", Structured, ANYWHERE, false);
operation!(GET_CREDIT_CARD_REJECT_CSV, ReportLink, "GetCreditCardRejectCSV", Csv, NA_ONLY, false);
operation!(GET_CREDIT_CARD_APPROVED_DATE_RANGE, ReportLink, "GetCreditCardApprovedDateRange", Structured, ANYWHERE, false);
operation!(GET_CREDIT_CARD_APPROVED_DATE_RANGE_CSV, ReportLink, "GetCreditCardApprovedDateRangeCSV", Csv, ANYWHERE, false);
operation!(GET_CREDIT_CARD_BANK_RECONCILIATION_CSV, ReportLink, "GetCreditCardBankReconciliationReportCSV", Csv, ANYWHERE, false);
operation!(GET_ACHEFT_JOURNAL, ReportLink, "GetACHEFTJournal", Structured, NA_ONLY, false);
operation!(GET_ACHEFT_JOURNAL_CSV, ReportLink, "GetACHEFTJournalCSV", Csv, NA_ONLY, false);
operation!(GET_ACHEFT_REJECT, ReportLink, "GetACHEFTReject", Structured, NA_ONLY, false);
operation!(GET_ACHEFT_REJECT_CSV, ReportLink, "GetACHEFTRejectCSV", Csv, NA_ONLY, false);
operation!(GET_ACHEFT_RETURN, ReportLink, "GetACHEFTReturn", Structured, NA_ONLY, false);
operation!(GET_ACHEFT_RETURN_CSV, ReportLink, "GetACHEFTReturnCSV", Csv, NA_ONLY, false);
operation!(GET_ACHEFT_BANK_RECONCILIATION_CSV, ReportLink, "GetACHEFTBankReconciliationReportCSV", Csv, NA_ONLY, false);

/// Every known operation
pub static OPERATIONS: &[Operation] = &[
    GET_CUSTOMER_CODE_DETAIL,
    CREATE_CREDIT_CARD_CUSTOMER_CODE,
    UPDATE_CREDIT_CARD_CUSTOMER_CODE,
    CREATE_ACHEFT_CUSTOMER_CODE,
    UPDATE_ACHEFT_CUSTOMER_CODE,
    DELETE_CUSTOMER_CODE,
    GET_CUSTOMER_LIST,
    PROCESS_CREDIT_CARD,
    PROCESS_CREDIT_CARD_WITH_CUSTOMER_CODE,
    CREATE_CUSTOMER_CODE_AND_PROCESS_CREDIT_CARD,
    PROCESS_CREDIT_CARD_REFUND,
    PROCESS_CREDIT_CARD_BATCH,
    GET_BATCH_PROCESS_RESULT_FILE,
    PROCESS_ACHEFT,
    PROCESS_ACHEFT_WITH_CUSTOMER_CODE,
    CREATE_CUSTOMER_CODE_AND_PROCESS_ACHEFT,
    PROCESS_ACHEFT_REFUND,
    PROCESS_ACHEFT_CHARGE_BATCH,
    GET_ACHEFT_BATCH_PROCESS_RESULT_FILE,
    GET_CREDIT_CARD_JOURNAL,
    GET_CREDIT_CARD_JOURNAL_CSV,
    GET_CREDIT_CARD_REJECT,
    GET_CREDIT_CARD_REJECT_CSV,
    GET_CREDIT_CARD_APPROVED_DATE_RANGE,
    GET_CREDIT_CARD_APPROVED_DATE_RANGE_CSV,
    GET_CREDIT_CARD_BANK_RECONCILIATION_CSV,
    GET_ACHEFT_JOURNAL,
    GET_ACHEFT_JOURNAL_CSV,
    GET_ACHEFT_REJECT,
    GET_ACHEFT_REJECT_CSV,
    GET_ACHEFT_RETURN,
    GET_ACHEFT_RETURN_CSV,
    GET_ACHEFT_BANK_RECONCILIATION_CSV,
];

/// Look up an operation by name
pub fn lookup(name: &str) -> Option<&'static Operation> {
    OPERATIONS.iter().find(|op| op.name == name)
}

/// Operations hosted by a service
pub fn for_service(service: Service) -> impl Iterator<Item = &'static Operation> {
    OPERATIONS.iter().filter(move |op| op.service == service)
}
