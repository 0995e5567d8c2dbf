//! Transport seam between the client and the network

use std::time::Duration;

use async_trait::async_trait;
use oicp_codec::{CONTENT_TYPE, EVENT_TRACKING_HEADER};
use oicp_core::EventTrackingId;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::{Result, TransportError};

/// Raw HTTP answer handed to the response classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Canonical reason phrase of `status`, empty when unknown
    pub reason: String,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, reason: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
            body: body.into(),
        }
    }

    /// A `200 OK` carrying `body`
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, "OK", body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one encoded request envelope and returns the raw answer
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(
        &self,
        path: &str,
        body: String,
        event_tracking_id: &EventTrackingId,
        timeout: Duration,
    ) -> std::result::Result<HttpResponse, TransportError>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration, connect_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        let base_url = Url::parse(base_url)?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

fn transport_error(error: reqwest::Error, timeout: Duration) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout(timeout)
    } else {
        TransportError::Network(error.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        path: &str,
        body: String,
        event_tracking_id: &EventTrackingId,
        timeout: Duration,
    ) -> std::result::Result<HttpResponse, TransportError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| TransportError::network(format!("Invalid endpoint {}: {}", path, e)))?;
        debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .header(EVENT_TRACKING_HEADER, event_tracking_id.as_str())
            .timeout(timeout)
            .body(body)
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        Ok(HttpResponse::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            body,
        ))
    }
}
