//! Status-diff pushes and response classification against a stub hub
//!
//! Run with: cargo test -p oicp-tests --test status_sync_e2e

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode as HttpStatus;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use oicp_client::testing::TestServer;
use oicp_client::{CallOptions, CancellationToken, CpoClient, OicpClient};
use oicp_codec::{decode_request, encode, envelope, SoapFault, CONTENT_TYPE};
use oicp_core::{
    Acknowledgement, ActionType, EvseId, EvseStatus, EvseStatusDiff, FaultCause, OperationResult,
    OperatorId, PushEvseStatus, StatusCode, StatusCodes,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;

/// What the stub hub does with a push
#[derive(Clone, Copy)]
enum Behaviour {
    Accept,
    /// `Result=false` with a status code, over HTTP 200
    Reject,
    /// HTTP 500 for this action, accept the rest
    FailAction(ActionType),
    /// SOAP fault carrying a status code
    Fault,
}

struct Hub {
    behaviour: Behaviour,
    received: Mutex<Vec<PushEvseStatus>>,
}

impl Hub {
    fn new(behaviour: Behaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            received: Mutex::new(Vec::new()),
        })
    }

    fn actions(&self) -> Vec<ActionType> {
        self.received.lock().iter().map(|r| r.action).collect()
    }
}

async fn push_evse_status(State(hub): State<Arc<Hub>>, body: String) -> Response {
    let request: PushEvseStatus = match decode_request(&body) {
        Ok(request) => request,
        Err(e) => return (HttpStatus::BAD_REQUEST, e.to_string()).into_response(),
    };
    let action = request.action;
    hub.received.lock().push(request);

    let body = match hub.behaviour {
        Behaviour::FailAction(failing) if failing == action => {
            return (HttpStatus::INTERNAL_SERVER_ERROR, "insert backend down").into_response();
        }
        Behaviour::Accept | Behaviour::FailAction(_) => encode(&Acknowledgement::success()),
        Behaviour::Reject => encode(&Acknowledgement::failure(StatusCode::new(
            StatusCodes::UnknownEvseId,
        ))),
        Behaviour::Fault => envelope::wrap_fault(
            &SoapFault::new("soap:Server", "Operator unknown")
                .with_status(StatusCode::new(StatusCodes::UnauthorizedAccess)),
        ),
    };
    ([(axum::http::header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response()
}

async fn hub_server(behaviour: Behaviour) -> (TestServer, Arc<Hub>) {
    let hub = Hub::new(behaviour);
    let router = Router::new()
        .route("/api/oicp/EVSEStatus", post(push_evse_status))
        .with_state(hub.clone());
    (TestServer::start(router).await.unwrap(), hub)
}

fn id(text: &str) -> EvseId {
    EvseId::parse(text).unwrap()
}

fn operator() -> OperatorId {
    OperatorId::parse("DE*ABC").unwrap()
}

/// Two new, one changed, one removed
fn mixed_diff() -> EvseStatusDiff {
    let previous = BTreeMap::from([
        (id("DE*ABC*E1"), EvseStatus::Available),
        (id("DE*ABC*E2"), EvseStatus::Available),
    ]);
    let current = BTreeMap::from([
        (id("DE*ABC*E1"), EvseStatus::Occupied),
        (id("DE*ABC*E3"), EvseStatus::Available),
        (id("DE*ABC*E4"), EvseStatus::Reserved),
    ]);
    EvseStatusDiff::compute(operator(), Some("ABC".into()), &previous, &current)
}

// =============================================================================
// Status-diff synchronizer
// =============================================================================

#[tokio::test]
async fn test_failed_insert_does_not_block_later_phases() {
    let (server, hub) = hub_server(Behaviour::FailAction(ActionType::Insert)).await;
    let cpo = CpoClient::new(server.client.clone());

    let result = cpo.push_diff(&mixed_diff(), CallOptions::new()).await;

    let insert = result.insert.unwrap();
    assert!(insert.is_transport_fault());
    let status = insert.fault_status().unwrap();
    assert_eq!(status.code, StatusCodes::DataError);
    assert_eq!(status.additional_info.as_deref(), Some("insert backend down"));

    assert!(result.update.unwrap().success().unwrap().result);
    assert!(result.delete.unwrap().success().unwrap().result);

    assert_eq!(
        hub.actions(),
        vec![ActionType::Insert, ActionType::Update, ActionType::Delete]
    );
    let received = hub.received.lock();
    assert_eq!(received[0].operator.records.len(), 2);
    assert_eq!(received[1].operator.records.len(), 1);
    assert_eq!(received[2].operator.records[0].evse_id, id("DE*ABC*E2"));
    assert_eq!(received[2].operator.records[0].status, EvseStatus::Unavailable);
}

#[tokio::test]
async fn test_empty_diff_sends_nothing() {
    let (server, hub) = hub_server(Behaviour::Accept).await;
    let cpo = CpoClient::new(server.client.clone());

    let result = cpo
        .push_diff(&EvseStatusDiff::new(operator(), None), CallOptions::new())
        .await;

    assert_eq!(result.calls(), 0);
    assert!(hub.actions().is_empty());
}

#[tokio::test]
async fn test_only_changed_entries_send_one_update() {
    let (server, hub) = hub_server(Behaviour::Accept).await;
    let cpo = CpoClient::new(server.client.clone());

    let mut diff = EvseStatusDiff::new(operator(), None);
    diff.insert_changed(id("DE*ABC*E1"), EvseStatus::OutOfService)
        .unwrap();

    let result = cpo.push_diff(&diff, CallOptions::new()).await;

    assert!(result.insert.is_none());
    assert!(result.delete.is_none());
    assert!(result.is_complete());
    assert_eq!(hub.actions(), vec![ActionType::Update]);
}

// =============================================================================
// Response classification
// =============================================================================

fn single_update() -> PushEvseStatus {
    let mut diff = EvseStatusDiff::new(operator(), None);
    diff.insert_changed(id("DE*ABC*E1"), EvseStatus::Available)
        .unwrap();
    oicp_client::sync::phase_request(&diff, ActionType::Update).unwrap()
}

#[tokio::test]
async fn test_negative_acknowledgement_is_transport_success() {
    let (server, _hub) = hub_server(Behaviour::Reject).await;
    let cpo = CpoClient::new(server.client.clone());

    let result = cpo
        .push_evse_status(&single_update(), CallOptions::new())
        .await;

    let OperationResult::Success(ack) = result else {
        panic!("a Result=false body must not be a fault");
    };
    assert!(!ack.result);
    assert_eq!(ack.status_code.code, StatusCodes::UnknownEvseId);
}

#[tokio::test]
async fn test_soap_fault_is_domain_fault() {
    let (server, _hub) = hub_server(Behaviour::Fault).await;
    let cpo = CpoClient::new(server.client.clone());

    let result = cpo
        .push_evse_status(&single_update(), CallOptions::new())
        .await;

    assert!(result.is_domain_fault());
    assert_eq!(result.fault_status().unwrap().code.code(), 17);
}

#[tokio::test]
async fn test_unreachable_hub_is_service_not_available() {
    let (server, _hub) = hub_server(Behaviour::Accept).await;
    let client = OicpClient::with_timeouts(
        &server.base_url(),
        Duration::from_secs(2),
        Duration::from_secs(1),
    )
    .unwrap();
    server.shutdown().await;
    let cpo = CpoClient::new(client);

    let result = cpo
        .push_evse_status(&single_update(), CallOptions::new())
        .await;

    let OperationResult::TransportFault { status, cause } = result else {
        panic!("expected a transport fault");
    };
    assert_eq!(status.code, StatusCodes::ServiceNotAvailable);
    assert!(matches!(cause, FaultCause::Network(_)));
}

#[tokio::test]
async fn test_cancelled_push_reports_cancellation() {
    let (server, hub) = hub_server(Behaviour::Accept).await;
    let cpo = CpoClient::new(server.client.clone());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = cpo
        .push_diff(&mixed_diff(), CallOptions::new().with_cancel(cancel))
        .await;

    // Every phase is still attempted and each reports the cancellation
    assert_eq!(result.calls(), 3);
    for phase in [result.insert, result.update, result.delete] {
        let status = phase.unwrap().fault_status().cloned().unwrap();
        assert_eq!(status.code, StatusCodes::RequestCancelled);
    }
    assert!(hub.actions().is_empty());
}
