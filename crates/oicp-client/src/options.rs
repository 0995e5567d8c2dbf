//! Per-call options

use std::time::Duration;

use oicp_core::EventTrackingId;
use tokio_util::sync::CancellationToken;

/// Options accepted by every outbound operation
///
/// A missing timeout falls back to the client default and a missing event
/// tracking id is generated for the call.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub timeout: Option<Duration>,
    pub cancel: Option<CancellationToken>,
    pub event_tracking_id: Option<EventTrackingId>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn with_event_tracking_id(mut self, event_tracking_id: EventTrackingId) -> Self {
        self.event_tracking_id = Some(event_tracking_id);
        self
    }
}
