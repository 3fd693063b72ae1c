//! ProcessLink: transaction processing
//!
//! Batches are asynchronous on the service side: a submission answers with
//! a batch id ([`ClassifiedResult::BatchPending`]) and the result file is
//! fetched later with the matching `get_*_batch_process_result_file` call.
//! Polling cadence is up to the caller.

use crate::{LinkClient, Result};
use netgate_core::operation::*;
use netgate_core::{ClassifiedResult, Parameters};

/// ProcessLink facade
#[derive(Debug, Clone)]
pub struct ProcessLink {
    client: LinkClient,
}

impl ProcessLink {
    /// Facade over a client
    pub fn new(client: LinkClient) -> Self {
        Self { client }
    }

    /// Underlying client
    pub fn client(&self) -> &LinkClient {
        &self.client
    }

    /// Charge a card; currency and MOP are always checked
    pub async fn process_credit_card(&self, params: Parameters) -> Result<ClassifiedResult> {
        self.client.invoke(&PROCESS_CREDIT_CARD, params).await
    }

    /// Charge a stored card profile
    pub async fn process_credit_card_with_customer_code(
        &self,
        params: Parameters,
    ) -> Result<ClassifiedResult> {
        self.client
            .invoke(&PROCESS_CREDIT_CARD_WITH_CUSTOMER_CODE, params)
            .await
    }

    /// Store a card profile and charge it; currency and MOP are always checked
    pub async fn create_customer_code_and_process_credit_card(
        &self,
        params: Parameters,
    ) -> Result<ClassifiedResult> {
        self.client
            .invoke(&CREATE_CUSTOMER_CODE_AND_PROCESS_CREDIT_CARD, params)
            .await
    }

    /// Refund a card transaction; `total` must be negative
    pub async fn process_credit_card_refund_with_transaction_id(
        &self,
        params: Parameters,
    ) -> Result<ClassifiedResult> {
        self.client.invoke(&PROCESS_CREDIT_CARD_REFUND, params).await
    }

    /// Submit a base64 card batch file
    pub async fn process_credit_card_batch(&self, params: Parameters) -> Result<ClassifiedResult> {
        self.client.invoke(&PROCESS_CREDIT_CARD_BATCH, params).await
    }

    /// Fetch a card batch result by `batchId`
    pub async fn get_batch_process_result_file(
        &self,
        params: Parameters,
    ) -> Result<ClassifiedResult> {
        self.client.invoke(&GET_BATCH_PROCESS_RESULT_FILE, params).await
    }

    /// Debit a bank account (NA only)
    pub async fn process_acheft(&self, params: Parameters) -> Result<ClassifiedResult> {
        self.client.invoke(&PROCESS_ACHEFT, params).await
    }

    /// Debit a stored bank account profile (NA only)
    pub async fn process_acheft_with_customer_code(
        &self,
        params: Parameters,
    ) -> Result<ClassifiedResult> {
        self.client.invoke(&PROCESS_ACHEFT_WITH_CUSTOMER_CODE, params).await
    }

    /// Store a bank account profile and debit it (NA only)
    pub async fn create_customer_code_and_process_acheft(
        &self,
        params: Parameters,
    ) -> Result<ClassifiedResult> {
        self.client
            .invoke(&CREATE_CUSTOMER_CODE_AND_PROCESS_ACHEFT, params)
            .await
    }

    /// Refund a bank transaction (NA only)
    pub async fn process_acheft_refund_with_transaction_id(
        &self,
        params: Parameters,
    ) -> Result<ClassifiedResult> {
        self.client.invoke(&PROCESS_ACHEFT_REFUND, params).await
    }

    /// Submit a base64 ACH/EFT batch file (NA only)
    pub async fn process_acheft_charge_batch(&self, params: Parameters) -> Result<ClassifiedResult> {
        self.client.invoke(&PROCESS_ACHEFT_CHARGE_BATCH, params).await
    }

    /// Fetch an ACH/EFT batch result by `batchId` (NA only)
    pub async fn get_acheft_batch_process_result_file(
        &self,
        params: Parameters,
    ) -> Result<ClassifiedResult> {
        self.client
            .invoke(&GET_ACHEFT_BATCH_PROCESS_RESULT_FILE, params)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::tests::{client, RecordingTransport};
    use netgate_core::restriction::{MOP_CURRENCY_RESTRICTED_MESSAGE, SERVER_RESTRICTED_MESSAGE};
    use netgate_core::{Node, ParamValue};

    #[tokio::test]
    async fn test_charge_sends_wire_values() {
        let transport = RecordingTransport::new(
            "<IATSRESPONSE><STATUS>Success</STATUS><PROCESSRESULT>\
             <AUTHORIZATIONRESULT> OK: 678594:</AUTHORIZATIONRESULT>\
             <TRANSACTIONID>A6DE6F24</TRANSACTIONID></PROCESSRESULT></IATSRESPONSE>",
        );
        let link = client("NA", transport.clone()).process_link();

        let result = link
            .process_credit_card(
                Parameters::new()
                    .with("invoiceNum", "00000001")
                    .with("creditCardNum", "4222222222222220")
                    .with("creditCardExpiry", "12/17")
                    .with("mop", "VISA")
                    .with("currency", "USD")
                    .with("total", 15i64),
            )
            .await
            .unwrap();

        assert!(result.is_success());
        let call = &transport.calls()[0];
        assert_eq!(call.operation, "ProcessCreditCardV1");
        assert_eq!(call.parameters.get("total").map(ParamValue::to_wire), Some("15".to_string()));
    }

    #[tokio::test]
    async fn test_cad_discover_refused() {
        let transport = RecordingTransport::new("<R/>");
        let link = client("NA", transport.clone()).process_link();

        let result = link
            .create_customer_code_and_process_credit_card(
                Parameters::new().with("currency", "CAD").with("mop", "DSC"),
            )
            .await
            .unwrap();

        assert_eq!(
            result,
            ClassifiedResult::RestrictionDenied(MOP_CURRENCY_RESTRICTED_MESSAGE.to_string())
        );
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_customer_code_charge_skips_check_without_payment_fields() {
        let transport = RecordingTransport::new(
            "<R><PROCESSRESULT><AUTHORIZATIONRESULT>OK: 1</AUTHORIZATIONRESULT></PROCESSRESULT></R>",
        );
        let link = client("UK", transport.clone()).process_link();

        let result = link
            .process_credit_card_with_customer_code(
                Parameters::new().with("customerCode", "A1").with("total", "5"),
            )
            .await
            .unwrap();

        assert!(result.is_success());
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_batch_submit_then_fetch() {
        let submit = RecordingTransport::new(
            "<IATSRESPONSE><STATUS>Success</STATUS><BATCHPROCESSRESULT>\
             <AUTHORIZATIONRESULT>Batch Process Has Been Started</AUTHORIZATIONRESULT>\
             <BATCHID>2222</BATCHID></BATCHPROCESSRESULT></IATSRESPONSE>",
        );
        let link = client("NA", submit.clone()).process_link();

        let pending = link
            .process_credit_card_batch(
                Parameters::new()
                    .with("batchFile", ParamValue::base64("MDAwMDAwMDEsNDExMQ=="))
                    .with("customerIPAddress", ""),
            )
            .await
            .unwrap();
        assert_eq!(
            pending,
            ClassifiedResult::BatchPending {
                batch_id: "2222".to_string()
            }
        );
        assert_eq!(
            submit.calls()[0].parameters.get_str("batchFile"),
            None,
            "base64 blobs are not plain text"
        );
        assert_eq!(
            submit.calls()[0].parameters.get("batchFile").map(ParamValue::to_wire),
            Some("MDAwMDAwMDEsNDExMQ==".to_string())
        );

        let fetch = RecordingTransport::new(
            "<IATSRESPONSE><STATUS>Success</STATUS><BATCHPROCESSRESULT>\
             <AUTHORIZATIONRESULT>Batch Processing Completed</AUTHORIZATIONRESULT>\
             <BATCHID>2222</BATCHID>\
             <BATCHPROCESSRESULTFILE>MDAwMDAwMDEsT0s=</BATCHPROCESSRESULTFILE>\
             </BATCHPROCESSRESULT></IATSRESPONSE>",
        );
        let link = client("NA", fetch).process_link();
        let done = link
            .get_batch_process_result_file(Parameters::new().with("batchId", "2222"))
            .await
            .unwrap();
        assert_eq!(
            done.payload()
                .and_then(|p| p.get("BATCHPROCESSRESULTFILE"))
                .and_then(Node::as_str),
            Some("MDAwMDAwMDEsT0s=")
        );
    }

    #[tokio::test]
    async fn test_acheft_refused_on_uk() {
        let transport = RecordingTransport::new("<R/>");
        let link = client("UK", transport.clone()).process_link();

        let results = vec![
            link.process_acheft(Parameters::new()).await.unwrap(),
            link.process_acheft_with_customer_code(Parameters::new()).await.unwrap(),
            link.create_customer_code_and_process_acheft(Parameters::new()).await.unwrap(),
            link.process_acheft_refund_with_transaction_id(Parameters::new()).await.unwrap(),
            link.process_acheft_charge_batch(Parameters::new()).await.unwrap(),
            link.get_acheft_batch_process_result_file(Parameters::new()).await.unwrap(),
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
    async fn test_refund_reject() {
        let transport = RecordingTransport::new(
            "<R><PROCESSRESULT><AUTHORIZATIONRESULT>REJECT: 2</AUTHORIZATIONRESULT></PROCESSRESULT></R>",
        );
        let link = client("NA", transport).process_link();
        let result = link
            .process_credit_card_refund_with_transaction_id(
                Parameters::new().with("transactionId", "A6DE6F24").with("total", "-5"),
            )
            .await
            .unwrap();
        assert!(matches!(result, ClassifiedResult::RejectCode { code: 2, .. }));
    }
}
