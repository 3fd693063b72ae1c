//! Request orchestration
//!
//! Every remote operation goes through [`LinkClient::invoke`]:
//! restrictions, credentials, transport, result extraction, normalization,
//! classification.

use crate::{
    envelope, metrics::*, soap::SoapConfig, soap::SoapTransport, transport::Transport,
    CustomerLink, Error, ProcessLink, ReportLink, Result,
};
use netgate_core::{
    normalize, operation, ClassifiedResult, Classifier, Config, Operation, Parameters, Region,
    RegionResolver, RejectCodeTable, Restriction, RestrictionMatrix,
};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Generic NetGate client
///
/// Cheap to clone; all shared state is immutable.
#[derive(Clone)]
pub struct LinkClient {
    transport: Arc<dyn Transport>,
    region: Region,
    resolver: RegionResolver,
    matrix: Arc<RestrictionMatrix>,
    classifier: Classifier,
    agent_code: String,
    password: String,
}

impl fmt::Debug for LinkClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkClient")
            .field("transport", &self.transport.name())
            .field("region", &self.region)
            .field("base_url", &self.base_url())
            .field("agent_code", &self.agent_code)
            .finish_non_exhaustive()
    }
}

impl LinkClient {
    /// Client over an explicit transport
    ///
    /// Fails if the configured region is unknown or credentials are missing.
    pub fn new(config: &Config, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            transport,
            region: config.region()?,
            resolver: config.resolver(),
            matrix: config.matrix(),
            classifier: Classifier::default(),
            agent_code: config.agent_code.clone(),
            password: config.password.clone(),
        })
    }

    /// Client over the SOAP/HTTPS transport
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = SoapTransport::new(SoapConfig::from(config))?;
        Self::new(config, Arc::new(transport))
    }

    /// Replace the reject-code table
    pub fn with_reject_codes(mut self, reject_codes: Arc<RejectCodeTable>) -> Self {
        self.classifier = Classifier::new(reject_codes);
        self
    }

    /// Replace the restriction matrix
    pub fn with_matrix(mut self, matrix: Arc<RestrictionMatrix>) -> Self {
        self.matrix = matrix;
        self
    }

    /// Target region
    pub fn region(&self) -> Region {
        self.region
    }

    /// Base address of the target region
    pub fn base_url(&self) -> &str {
        self.resolver.base_url(self.region)
    }

    /// CustomerLink facade over this client
    pub fn customer_link(&self) -> CustomerLink {
        CustomerLink::new(self.clone())
    }

    /// ProcessLink facade over this client
    pub fn process_link(&self) -> ProcessLink {
        ProcessLink::new(self.clone())
    }

    /// ReportLink facade over this client
    pub fn report_link(&self) -> ReportLink {
        ReportLink::new(self.clone())
    }

    /// Check restrictions without sending anything
    pub fn screen(&self, operation: &Operation, parameters: &Parameters) -> Restriction {
        self.matrix.evaluate(
            self.region,
            operation.excluded_regions,
            parameters.currency(),
            parameters.mop(),
            operation.force_currency_check,
        )
    }

    /// Invoke an operation by name, e.g. `"GetCustomerList"`
    pub async fn invoke_by_name(
        &self,
        name: &str,
        parameters: Parameters,
    ) -> Result<ClassifiedResult> {
        let operation = operation::lookup(name).ok_or_else(|| {
            Error::Core(netgate_core::Error::Configuration(format!(
                "Unknown operation: {}",
                name
            )))
        })?;
        self.invoke(operation, parameters).await
    }

    /// Invoke an operation
    ///
    /// Business outcomes (declines, restriction denials, empty reports) are
    /// `Ok`; failing to reach the service or to read its answer is `Err`.
    pub async fn invoke(
        &self,
        operation: &Operation,
        parameters: Parameters,
    ) -> Result<ClassifiedResult> {
        let request_id = Uuid::new_v4();
        let span = info_span!(
            "netgate_invoke",
            %request_id,
            service = %operation.service,
            operation = operation.name,
            region = %self.region,
        );

        async move {
            let service = operation.service.as_str();

            if let Restriction::Deny(reason) = self.screen(operation, &parameters) {
                warn!(reason = %reason, "request refused before sending");
                NETGATE_RESTRICTION_DENIALS
                    .with_label_values(&[service, operation.name])
                    .inc();
                NETGATE_REQUESTS_TOTAL
                    .with_label_values(&[service, operation.name, "restriction_denied"])
                    .inc();
                return Ok(ClassifiedResult::RestrictionDenied(reason));
            }

            let start = Instant::now();
            let result = self.dispatch(operation, parameters).await;
            NETGATE_REQUEST_DURATION
                .with_label_values(&[service, operation.name])
                .observe(start.elapsed().as_secs_f64());

            match &result {
                Ok(classified) => {
                    info!(outcome = classified.outcome(), "request completed");
                    NETGATE_REQUESTS_TOTAL
                        .with_label_values(&[service, operation.name, classified.outcome()])
                        .inc();
                }
                Err(e) => {
                    warn!(error = %e, "request failed");
                    NETGATE_REQUESTS_TOTAL
                        .with_label_values(&[service, operation.name, "error"])
                        .inc();
                }
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn dispatch(
        &self,
        operation: &Operation,
        mut parameters: Parameters,
    ) -> Result<ClassifiedResult> {
        parameters.inject_credentials(&self.agent_code, &self.password);
        if parameters.sanitize_client_ip() {
            debug!("client IP is not IPv4, sending it blank");
        }

        let soap_operation = operation.soap_operation();
        let body = self
            .transport
            .call(
                self.base_url(),
                operation.service.endpoint(),
                &soap_operation,
                &parameters,
            )
            .await?;

        let document = envelope::extract_result(&body, operation.result_field)?;
        // a nil result on a report download means there is nothing to report
        if operation.is_csv() && document.trim().is_empty() {
            return Ok(ClassifiedResult::Csv(String::new()));
        }
        let node = normalize(&document)?;
        Ok(self.classifier.classify(&node, operation)?)
    }
}
