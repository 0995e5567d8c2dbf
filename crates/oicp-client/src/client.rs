//! Generic OICP call pipeline

use std::sync::Arc;
use std::time::{Duration, Instant};

use oicp_codec::{encode, OicpMessage};
use oicp_core::OperationResult;
use tracing::{field, instrument, Span};

use crate::classify::classify;
use crate::config::{ClientConfig, Endpoints};
use crate::error::{Result, TransportError};
use crate::observer::{ClientObserver, TracingObserver};
use crate::options::CallOptions;
use crate::transport::{HttpResponse, HttpTransport, Transport};

/// Default per-call timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends OICP messages and classifies the answers
///
/// Shared by [`CpoClient`](crate::CpoClient) and
/// [`EmpClient`](crate::EmpClient). Cloning is cheap.
#[derive(Clone)]
pub struct OicpClient {
    transport: Arc<dyn Transport>,
    observer: Arc<dyn ClientObserver>,
    endpoints: Endpoints,
    default_timeout: Duration,
}

impl std::fmt::Debug for OicpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OicpClient")
            .field("endpoints", &self.endpoints)
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}

impl OicpClient {
    /// Create a client for `base_url` with default endpoints and timeouts
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeouts(base_url, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    pub fn with_timeouts(
        base_url: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let transport = HttpTransport::new(base_url, timeout, connect_timeout)?;
        Ok(Self::with_transport(
            Arc::new(transport),
            Endpoints::default(),
            timeout,
        ))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(
            &config.base_url,
            config.timeout(),
            config.connect_timeout(),
        )?;
        Ok(Self::with_transport(
            Arc::new(transport),
            config.endpoints.clone(),
            config.timeout(),
        ))
    }

    /// Create a client over any transport
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        endpoints: Endpoints,
        default_timeout: Duration,
    ) -> Self {
        Self {
            transport,
            observer: Arc::new(TracingObserver),
            endpoints,
            default_timeout,
        }
    }

    /// Replace the default [`TracingObserver`]
    pub fn with_observer(mut self, observer: Arc<dyn ClientObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Send `request` to `path` and classify the answer as `Resp`
    ///
    /// Never fails: network errors, timeouts, cancellation, HTTP errors and
    /// undecodable bodies all become an `OperationResult` fault.
    #[instrument(
        skip_all,
        fields(operation = Req::ELEMENT, path = %path, event_tracking_id = field::Empty)
    )]
    pub async fn call<Req, Resp>(
        &self,
        path: &str,
        request: &Req,
        options: CallOptions,
    ) -> OperationResult<Resp>
    where
        Req: OicpMessage + Sync,
        Resp: OicpMessage + Send,
    {
        let operation = Req::ELEMENT;
        let event_tracking_id = options.event_tracking_id.unwrap_or_default();
        let timeout = options.timeout.unwrap_or(self.default_timeout);
        Span::current().record("event_tracking_id", event_tracking_id.as_str());

        let body = encode(request);

        let started = Instant::now();
        // Only reported once the send is actually polled
        let send = async {
            self.observer
                .on_request_sent(operation, &event_tracking_id, path);
            tokio::time::timeout(
                timeout,
                self.transport
                    .post(path, body, &event_tracking_id, timeout),
            )
            .await
        };
        let outcome = match options.cancel {
            Some(cancel) => tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(TransportError::Cancelled),
                result = send => flatten_timeout(result, timeout),
            },
            None => flatten_timeout(send.await, timeout),
        };

        if let Ok(response) = &outcome {
            self.observer.on_response_received(
                operation,
                &event_tracking_id,
                response.status,
                started.elapsed(),
            );
        }

        let result = classify::<Resp>(outcome);
        match &result {
            OperationResult::Success(_) => {}
            OperationResult::DomainFault(status) => {
                self.observer
                    .on_fault_classified(operation, &event_tracking_id, status, None)
            }
            OperationResult::TransportFault { status, cause } => self
                .observer
                .on_fault_classified(operation, &event_tracking_id, status, Some(cause)),
        }
        result
    }
}

fn flatten_timeout(
    result: std::result::Result<
        std::result::Result<HttpResponse, TransportError>,
        tokio::time::error::Elapsed,
    >,
    timeout: Duration,
) -> std::result::Result<HttpResponse, TransportError> {
    result.unwrap_or(Err(TransportError::Timeout(timeout)))
}
