//! Client metrics

use prometheus::{register_counter_vec, register_histogram_vec, CounterVec, HistogramVec};

lazy_static::lazy_static! {
    /// Requests by service, operation and classified outcome
    pub static ref NETGATE_REQUESTS_TOTAL: CounterVec = register_counter_vec!(
        "netgate_requests_total",
        "Total NetGate requests by outcome",
        &["service", "operation", "outcome"]
    )
    .unwrap();

    /// Round-trip time of requests that reached the transport
    pub static ref NETGATE_REQUEST_DURATION: HistogramVec = register_histogram_vec!(
        "netgate_request_duration_seconds",
        "NetGate round-trip duration",
        &["service", "operation"]
    )
    .unwrap();

    /// Requests refused by the restriction matrix
    pub static ref NETGATE_RESTRICTION_DENIALS: CounterVec = register_counter_vec!(
        "netgate_restriction_denials_total",
        "Requests refused locally before reaching the service",
        &["service", "operation"]
    )
    .unwrap();
}
