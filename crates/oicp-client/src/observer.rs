//! Structured client events
//!
//! The client never writes output itself; it reports to an injected
//! [`ClientObserver`]. [`TracingObserver`] is the default.

use std::time::Duration;

use oicp_core::{EventTrackingId, FaultCause, StatusCode};
use tracing::{debug, warn};

/// Receives one event per step of an outbound call
pub trait ClientObserver: Send + Sync {
    fn on_request_sent(&self, operation: &str, event_tracking_id: &EventTrackingId, path: &str);

    fn on_response_received(
        &self,
        operation: &str,
        event_tracking_id: &EventTrackingId,
        http_status: u16,
        elapsed: Duration,
    );

    /// Called for every `DomainFault` or `TransportFault`
    fn on_fault_classified(
        &self,
        operation: &str,
        event_tracking_id: &EventTrackingId,
        status: &StatusCode,
        cause: Option<&FaultCause>,
    );
}

/// Forwards client events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ClientObserver for TracingObserver {
    fn on_request_sent(&self, operation: &str, event_tracking_id: &EventTrackingId, path: &str) {
        debug!(operation, %event_tracking_id, path, "Request sent");
    }

    fn on_response_received(
        &self,
        operation: &str,
        event_tracking_id: &EventTrackingId,
        http_status: u16,
        elapsed: Duration,
    ) {
        debug!(
            operation,
            %event_tracking_id,
            http_status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Response received"
        );
    }

    fn on_fault_classified(
        &self,
        operation: &str,
        event_tracking_id: &EventTrackingId,
        status: &StatusCode,
        cause: Option<&FaultCause>,
    ) {
        match cause {
            Some(cause) => warn!(
                operation,
                %event_tracking_id,
                status_code = %status.code,
                %cause,
                "Transport fault: {}", status
            ),
            None => warn!(
                operation,
                %event_tracking_id,
                status_code = %status.code,
                "Domain fault: {}", status
            ),
        }
    }
}
