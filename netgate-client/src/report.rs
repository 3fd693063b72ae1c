//! ReportLink: journals, rejects, returns and reconciliation reports
//!
//! Structured reports yield [`ClassifiedResult::Success`] with the `TN`
//! records, or [`ClassifiedResult::NoData`]. CSV reports yield
//! [`ClassifiedResult::Csv`], empty when the service has no file for the
//! requested period.

use crate::{LinkClient, Result};
use netgate_core::operation::*;
use netgate_core::{ClassifiedResult, Parameters};

/// ReportLink facade
#[derive(Debug, Clone)]
pub struct ReportLink {
    client: LinkClient,
}

impl ReportLink {
    /// Facade over a client
    pub fn new(client: LinkClient) -> Self {
        Self { client }
    }

    /// Underlying client
    pub fn client(&self) -> &LinkClient {
        &self.client
    }

    /// Card journal for a date
    pub async fn get_credit_card_journal(&self, params: Parameters) -> Result<ClassifiedResult> {
        self.client.invoke(&GET_CREDIT_CARD_JOURNAL, params).await
    }

    /// Card journal for a date, as CSV
    pub async fn get_credit_card_journal_csv(&self, params: Parameters) -> Result<ClassifiedResult> {
        self.client.invoke(&GET_CREDIT_CARD_JOURNAL_CSV, params).await
    }

    /// Rejected card transactions for a date
    pub async fn get_credit_card_reject(&self, params: Parameters) -> Result<ClassifiedResult> {
        self.client.invoke(&GET_CREDIT_CARD_REJECT, params).await
    }

    /// Rejected card transactions for a date, as CSV (NA only)
    pub async fn get_credit_card_reject_csv(&self, params: Parameters) -> Result<ClassifiedResult> {
        self.client.invoke(&GET_CREDIT_CARD_REJECT_CSV, params).await
    }

    /// Approved card transactions between `fromDate` and `toDate`
    pub async fn get_credit_card_approved_date_range(
        &self,
        params: Parameters,
    ) -> Result<ClassifiedResult> {
        self.client
            .invoke(&GET_CREDIT_CARD_APPROVED_DATE_RANGE, params)
            .await
    }

    /// Approved card transactions in a date range, as CSV
    pub async fn get_credit_card_approved_date_range_csv(
        &self,
        params: Parameters,
    ) -> Result<ClassifiedResult> {
        self.client
            .invoke(&GET_CREDIT_CARD_APPROVED_DATE_RANGE_CSV, params)
            .await
    }

    /// Card bank reconciliation, as CSV
    pub async fn get_credit_card_bank_reconciliation_report_csv(
        &self,
        params: Parameters,
    ) -> Result<ClassifiedResult> {
        self.client
            .invoke(&GET_CREDIT_CARD_BANK_RECONCILIATION_CSV, params)
            .await
    }

    /// ACH/EFT journal (NA only)
    pub async fn get_acheft_journal(&self, params: Parameters) -> Result<ClassifiedResult> {
        self.client.invoke(&GET_ACHEFT_JOURNAL, params).await
    }

    /// ACH/EFT journal, as CSV (NA only)
    pub async fn get_acheft_journal_csv(&self, params: Parameters) -> Result<ClassifiedResult> {
        self.client.invoke(&GET_ACHEFT_JOURNAL_CSV, params).await
    }

    /// ACH/EFT rejects (NA only)
    pub async fn get_acheft_reject(&self, params: Parameters) -> Result<ClassifiedResult> {
        self.client.invoke(&GET_ACHEFT_REJECT, params).await
    }

    /// ACH/EFT rejects, as CSV (NA only)
    pub async fn get_acheft_reject_csv(&self, params: Parameters) -> Result<ClassifiedResult> {
        self.client.invoke(&GET_ACHEFT_REJECT_CSV, params).await
    }

    /// ACH/EFT returns (NA only)
    pub async fn get_acheft_return(&self, params: Parameters) -> Result<ClassifiedResult> {
        self.client.invoke(&GET_ACHEFT_RETURN, params).await
    }

    /// ACH/EFT returns, as CSV (NA only)
    pub async fn get_acheft_return_csv(&self, params: Parameters) -> Result<ClassifiedResult> {
        self.client.invoke(&GET_ACHEFT_RETURN_CSV, params).await
    }

    /// ACH/EFT bank reconciliation, as CSV (NA only)
    pub async fn get_acheft_bank_reconciliation_report_csv(
        &self,
        params: Parameters,
    ) -> Result<ClassifiedResult> {
        self.client
            .invoke(&GET_ACHEFT_BANK_RECONCILIATION_CSV, params)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::tests::{client, RecordingTransport};
    use chrono::{TimeZone, Utc};
    use netgate_core::restriction::SERVER_RESTRICTED_MESSAGE;
    use netgate_core::types::NO_DATA_MESSAGE;
    use netgate_core::Node;

    #[tokio::test]
    async fn test_journal_single_record_is_a_map() {
        let transport = RecordingTransport::new(
            "<IATSRESPONSE><STATUS>Success</STATUS><JOURNALREPORT>\
             <TN><TNID>1</TNID><AMT>15.00</AMT></TN></JOURNALREPORT></IATSRESPONSE>",
        );
        let link = client("NA", transport.clone()).report_link();

        let date = Utc.with_ymd_and_hms(2014, 7, 23, 0, 0, 0).unwrap();
        let result = link
            .get_credit_card_journal(Parameters::new().with("date", date))
            .await
            .unwrap();

        let record = result.payload().unwrap();
        assert_eq!(record.get("AMT").and_then(Node::as_str), Some("15.00"));
        assert_eq!(
            transport.calls()[0].parameters.get("date").map(|d| d.to_wire()),
            Some("2014-07-23T00:00:00+00:00".to_string())
        );
    }

    #[tokio::test]
    async fn test_reject_report_multiple_records_is_a_list() {
        let transport = RecordingTransport::new(
            "<IATSRESPONSE><STATUS>Success</STATUS><JOURNALREPORT>\
             <TN><TNID>1</TNID></TN><TN><TNID>2</TNID></TN><TN><TNID>3</TNID></TN>\
             </JOURNALREPORT></IATSRESPONSE>",
        );
        let link = client("NA", transport).report_link();

        let result = link.get_credit_card_reject(Parameters::new()).await.unwrap();
        let records = result.payload().and_then(Node::as_list).unwrap();
        assert_eq!(records.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_journal_is_no_data() {
        let transport =
            RecordingTransport::new("<IATSRESPONSE><STATUS>Success</STATUS><JOURNALREPORT/></IATSRESPONSE>");
        let link = client("NA", transport).report_link();

        let result = link
            .get_credit_card_approved_date_range(Parameters::new())
            .await
            .unwrap();
        assert_eq!(result, ClassifiedResult::NoData);
        assert_eq!(result.to_string(), NO_DATA_MESSAGE);
    }

    #[tokio::test]
    async fn test_csv_report_decoded() {
        // "Date,Amount\n2014-07-23,15.00\n"
        let transport = RecordingTransport::new(
            "<IATSRESPONSE><STATUS>Success</STATUS>\
             <FILE>RGF0ZSxBbW91bnQKMjAxNC0wNy0yMywxNS4wMAo=</FILE></IATSRESPONSE>",
        );
        let link = client("NA", transport.clone()).report_link();

        let result = link
            .get_credit_card_journal_csv(Parameters::new())
            .await
            .unwrap();
        assert_eq!(
            result,
            ClassifiedResult::Csv("Date,Amount\n2014-07-23,15.00\n".to_string())
        );
        assert_eq!(transport.calls()[0].endpoint, "/NetGate/ReportLink.asmx");
    }

    #[tokio::test]
    async fn test_csv_report_without_file_is_empty() {
        let transport = RecordingTransport::new("<IATSRESPONSE><FILE/></IATSRESPONSE>");
        let link = client("NA", transport).report_link();

        let result = link
            .get_credit_card_bank_reconciliation_report_csv(Parameters::new())
            .await
            .unwrap();
        assert_eq!(result, ClassifiedResult::Csv(String::new()));
    }

    #[tokio::test]
    async fn test_na_only_reports_refused_on_uk() {
        let transport = RecordingTransport::new("<R/>");
        let link = client("UK", transport.clone()).report_link();

        let results = vec![
            link.get_credit_card_reject_csv(Parameters::new()).await.unwrap(),
            link.get_acheft_journal(Parameters::new()).await.unwrap(),
            link.get_acheft_journal_csv(Parameters::new()).await.unwrap(),
            link.get_acheft_reject(Parameters::new()).await.unwrap(),
            link.get_acheft_reject_csv(Parameters::new()).await.unwrap(),
            link.get_acheft_return(Parameters::new()).await.unwrap(),
            link.get_acheft_return_csv(Parameters::new()).await.unwrap(),
            link.get_acheft_bank_reconciliation_report_csv(Parameters::new()).await.unwrap(),
        ];
        for result in results {
            assert_eq!(
                result,
                ClassifiedResult::RestrictionDenied(SERVER_RESTRICTED_MESSAGE.to_string())
            );
        }
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failure_status_on_report() {
        let transport = RecordingTransport::new(
            "<IATSRESPONSE><STATUS>Failure</STATUS><ERRORS>Agent code has not been set up on the authorization system.</ERRORS></IATSRESPONSE>",
        );
        let link = client("UK", transport).report_link();

        let result = link
            .get_credit_card_approved_date_range_csv(Parameters::new())
            .await
            .unwrap();
        // CSV reports ignore STATUS and read FILE only
        assert_eq!(result, ClassifiedResult::Csv(String::new()));

        let result = link.get_credit_card_journal(Parameters::new()).await.unwrap();
        assert!(matches!(result, ClassifiedResult::Failure(_)));
    }
}
