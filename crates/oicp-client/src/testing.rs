//! Test utilities for oicp-client
//!
//! Provides helpers for running integration tests against OICP servers.

use std::net::SocketAddr;
use std::time::Duration;

use oicp_core::{EventTrackingId, FaultCause, StatusCode};
use parking_lot::Mutex;
use tokio::net::TcpListener;

use crate::observer::ClientObserver;
use crate::{OicpClient, Result};

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: OicpClient,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Serve `router` on a free loopback port
    ///
    /// # Example
    ///
    /// ```ignore
    /// use oicp_client::{testing::TestServer, CpoClient};
    ///
    /// let server = TestServer::start(router).await?;
    /// let cpo = CpoClient::new(server.client.clone());
    /// ```
    pub async fn start(router: axum::Router) -> Result<Self> {
        Self::start_with_timeout(router, Duration::from_secs(5), Duration::from_secs(2)).await
    }

    /// Serve `router` with custom client timeouts
    pub async fn start_with_timeout(
        router: axum::Router,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        let base_url = format!("http://{}", addr);
        let client = OicpClient::with_timeouts(&base_url, timeout, connect_timeout)?;

        Ok(Self {
            addr,
            client,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> &OicpClient {
        &self.client
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Event captured by [`RecordingObserver`]
#[derive(Debug, Clone, PartialEq)]
pub enum ObservedEvent {
    RequestSent {
        operation: String,
        event_tracking_id: EventTrackingId,
        path: String,
    },
    ResponseReceived {
        operation: String,
        event_tracking_id: EventTrackingId,
        http_status: u16,
    },
    FaultClassified {
        operation: String,
        event_tracking_id: EventTrackingId,
        status: StatusCode,
        cause: Option<FaultCause>,
    },
}

/// Observer that keeps every event for later assertions
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObservedEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().clone()
    }
}

impl ClientObserver for RecordingObserver {
    fn on_request_sent(&self, operation: &str, event_tracking_id: &EventTrackingId, path: &str) {
        self.events.lock().push(ObservedEvent::RequestSent {
            operation: operation.to_string(),
            event_tracking_id: event_tracking_id.clone(),
            path: path.to_string(),
        });
    }

    fn on_response_received(
        &self,
        operation: &str,
        event_tracking_id: &EventTrackingId,
        http_status: u16,
        _elapsed: Duration,
    ) {
        self.events.lock().push(ObservedEvent::ResponseReceived {
            operation: operation.to_string(),
            event_tracking_id: event_tracking_id.clone(),
            http_status,
        });
    }

    fn on_fault_classified(
        &self,
        operation: &str,
        event_tracking_id: &EventTrackingId,
        status: &StatusCode,
        cause: Option<&FaultCause>,
    ) {
        self.events.lock().push(ObservedEvent::FaultClassified {
            operation: operation.to_string(),
            event_tracking_id: event_tracking_id.clone(),
            status: status.clone(),
            cause: cause.cloned(),
        });
    }
}
