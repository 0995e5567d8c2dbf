//! HTTP handlers
//!
//! Every request is answered with `200 OK` and an XML body; operation
//! failures travel inside the body.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use oicp_codec::{CONTENT_TYPE, EVENT_TRACKING_HEADER};
use tracing::{info_span, Instrument};

use crate::state::AppState;

fn xml(body: String) -> Response {
    ([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response()
}

fn event_tracking_id(headers: &HeaderMap) -> &str {
    headers
        .get(EVENT_TRACKING_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
}

/// CPO inbound: remote start/stop and reservation start/stop
pub async fn remote_command(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let span = info_span!("remote_command", event_tracking_id = event_tracking_id(&headers));
    let body = String::from_utf8_lossy(&body);
    xml(state.remote_commands.handle(&body).instrument(span).await)
}

/// EMP inbound: authorize start/stop and charge detail records
pub async fn emp_authorization(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let span = info_span!("emp_authorization", event_tracking_id = event_tracking_id(&headers));
    let body = String::from_utf8_lossy(&body);
    xml(state.emp.handle(&body).instrument(span).await)
}
