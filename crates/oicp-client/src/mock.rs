//! Mock transport for testing

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use oicp_codec::{encode, OicpMessage};
use oicp_core::EventTrackingId;
use parking_lot::RwLock;

use crate::error::TransportError;
use crate::transport::{HttpResponse, Transport};

/// One request seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub path: String,
    pub body: String,
    pub event_tracking_id: EventTrackingId,
}

type Responder =
    Box<dyn Fn(&RecordedRequest) -> Result<HttpResponse, TransportError> + Send + Sync>;

/// Scripted transport that records every request
///
/// Responders are matched by path; the most recently added one wins.
pub struct MockTransport {
    connected: AtomicBool,
    latency_ms: AtomicU64,
    responders: RwLock<Vec<(String, Responder)>>,
    requests: RwLock<Vec<RecordedRequest>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(true),
            latency_ms: AtomicU64::new(0),
            responders: RwLock::new(Vec::new()),
            requests: RwLock::new(Vec::new()),
        }
    }

    /// Answer requests to `path` with a closure
    pub fn respond_with<F>(&self, path: &str, responder: F)
    where
        F: Fn(&RecordedRequest) -> Result<HttpResponse, TransportError> + Send + Sync + 'static,
    {
        self.responders
            .write()
            .push((path.to_string(), Box::new(responder)));
    }

    /// Answer requests to `path` with a fixed response
    pub fn respond(&self, path: &str, response: HttpResponse) {
        self.respond_with(path, move |_| Ok(response.clone()));
    }

    /// Answer requests to `path` with `200 OK` carrying `message`
    pub fn respond_message<M: OicpMessage>(&self, path: &str, message: &M) {
        self.respond(path, HttpResponse::ok(encode(message)));
    }

    /// Fail requests to `path` with a transport error
    pub fn fail(&self, path: &str, error: TransportError) {
        self.respond_with(path, move |_| Err(error.clone()));
    }

    /// Set connection state
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Delay every answer
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    /// Every request received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.read().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(
        &self,
        path: &str,
        body: String,
        event_tracking_id: &EventTrackingId,
        _timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::network("connection refused"));
        }

        let request = RecordedRequest {
            path: path.to_string(),
            body,
            event_tracking_id: event_tracking_id.clone(),
        };
        self.requests.write().push(request.clone());

        // Simulate latency
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        let responders = self.responders.read();
        match responders.iter().rev().find(|(p, _)| p == path) {
            Some((_, responder)) => responder(&request),
            None => Err(TransportError::network(format!(
                "no mock response configured for {}",
                path
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oicp_core::Acknowledgement;

    #[tokio::test]
    async fn test_latest_responder_wins() {
        let mock = MockTransport::new();
        mock.respond("/a", HttpResponse::new(500, "Internal Server Error", ""));
        mock.respond_message("/a", &Acknowledgement::success());

        let id = EventTrackingId::new();
        let response = mock
            .post("/a", "req".into(), &id, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(response.status, 200);

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].body, "req");
        assert_eq!(requests[0].event_tracking_id, id);
    }

    #[tokio::test]
    async fn test_unscripted_path_and_disconnect() {
        let mock = MockTransport::new();
        let id = EventTrackingId::new();
        let result = mock.post("/b", String::new(), &id, Duration::from_secs(1)).await;
        assert!(matches!(result, Err(TransportError::Network(_))));
        assert_eq!(mock.request_count(), 1);

        mock.set_connected(false);
        let result = mock.post("/b", String::new(), &id, Duration::from_secs(1)).await;
        assert_eq!(result, Err(TransportError::network("connection refused")));
        assert_eq!(mock.request_count(), 1);
    }
}
