//! Transport interface

use crate::Result;
use async_trait::async_trait;
use netgate_core::Parameters;

/// Sends one operation to the service and returns the raw response body
///
/// Implementations own the wire format; the orchestrator only needs the
/// response document back.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Call `operation` at `base_url` + `endpoint`
    async fn call(
        &self,
        base_url: &str,
        endpoint: &str,
        operation: &str,
        parameters: &Parameters,
    ) -> Result<String>;

    /// Get transport name
    fn name(&self) -> &str;
}
