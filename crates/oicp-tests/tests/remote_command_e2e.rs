//! EMP client against a real CPO endpoint
//!
//! Run with: cargo test -p oicp-tests --test remote_command_e2e

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use oicp_client::testing::TestServer;
use oicp_client::{CallOptions, EmpClient};
use oicp_core::{
    EvcoId, EvseId, Identification, PartnerSessionId, ProviderId, RemoteCommand,
    RemoteCommandOutcome, RemoteStart, RemoteStop, ReservationStart, SessionId, StatusCodes,
};
use oicp_server::{create_cpo_router, AppState, RemoteCommandHandler};
use oicpd::config::DaemonConfig;
use pretty_assertions::assert_eq;

const SESSION: &str = "8fade8bd-0a88-4c4b-b8a6-2b8d0f5e1d12";

/// Subscriber answering with a fixed outcome after a delay
struct Scripted {
    outcome: RemoteCommandOutcome,
    delay: Duration,
    calls: AtomicUsize,
}

impl Scripted {
    fn new(outcome: RemoteCommandOutcome, delay_ms: u64) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            delay: Duration::from_millis(delay_ms),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl RemoteCommandHandler for Scripted {
    async fn handle(&self, _command: &RemoteCommand) -> RemoteCommandOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.outcome
    }
}

fn remote_start(evse_id: &str) -> RemoteStart {
    RemoteStart {
        session_id: SessionId::parse(SESSION).unwrap(),
        partner_session_id: Some(PartnerSessionId::parse("emp-4711").unwrap()),
        provider_id: ProviderId::parse("DE*XYZ").unwrap(),
        evse_id: EvseId::parse(evse_id).unwrap(),
        identification: Identification::remote(EvcoId::parse("DE-8EO-CAAA00001-X").unwrap()),
        partner_product_id: None,
    }
}

fn remote_stop(evse_id: &str) -> RemoteStop {
    RemoteStop {
        session_id: SessionId::parse(SESSION).unwrap(),
        partner_session_id: None,
        provider_id: ProviderId::parse("DE*XYZ").unwrap(),
        evse_id: EvseId::parse(evse_id).unwrap(),
    }
}

// =============================================================================
// Arbitration over HTTP
// =============================================================================

#[tokio::test]
async fn test_first_committed_subscriber_wins() {
    let state = AppState::new();
    let subscribers = [
        Scripted::new(RemoteCommandOutcome::Unspecified, 0),
        // Slowest to answer, still wins by registration order
        Scripted::new(RemoteCommandOutcome::EvseAlreadyInUse, 50),
        Scripted::new(RemoteCommandOutcome::Success, 0),
    ];
    for subscriber in &subscribers {
        state.remote_commands.register(subscriber.clone());
    }

    let server = TestServer::start(create_cpo_router(state, "/api/oicp"))
        .await
        .unwrap();
    let emp = EmpClient::new(server.client.clone());

    let ack = emp
        .remote_start(&remote_start("DE*ABC*E1234"), CallOptions::new())
        .await
        .into_success()
        .unwrap();

    assert!(!ack.result);
    assert_eq!(ack.status_code.code, StatusCodes::EvseAlreadyInUse);
    assert_eq!(ack.status_code.code.code(), 602);
    assert_eq!(ack.session_id, Some(SessionId::parse(SESSION).unwrap()));
    assert_eq!(
        ack.partner_session_id,
        Some(PartnerSessionId::parse("emp-4711").unwrap())
    );
    for subscriber in &subscribers {
        assert_eq!(subscriber.calls.load(Ordering::SeqCst), 1);
    }
}

#[tokio::test]
async fn test_no_subscribers_answers_error() {
    let server = TestServer::start(create_cpo_router(AppState::new(), "/api/oicp"))
        .await
        .unwrap();
    let emp = EmpClient::new(server.client.clone());

    let ack = emp
        .remote_start(&remote_start("DE*ABC*E1234"), CallOptions::new())
        .await
        .into_success()
        .unwrap();

    assert!(!ack.result);
    assert_eq!(ack.status_code.code.code(), 22);
}

#[tokio::test]
async fn test_all_unspecified_answers_error() {
    let state = AppState::new();
    state
        .remote_commands
        .register(Scripted::new(RemoteCommandOutcome::Unspecified, 0));
    state
        .remote_commands
        .register(Scripted::new(RemoteCommandOutcome::Unspecified, 0));

    let server = TestServer::start(create_cpo_router(state, "/api/oicp"))
        .await
        .unwrap();
    let emp = EmpClient::new(server.client.clone());

    let ack = emp
        .remote_stop(&remote_stop("DE*ABC*E1234"), CallOptions::new())
        .await
        .into_success()
        .unwrap();

    assert!(!ack.result);
    assert_eq!(ack.status_code.code, StatusCodes::DataError);
}

// =============================================================================
// Daemon in CPO role
// =============================================================================

#[tokio::test]
async fn test_daemon_evse_simulator_session_lifecycle() {
    let config = DaemonConfig::parse(
        r#"
        [server]
        role = "cpo"

        [[simulator.evses]]
        evse_id = "DE*ABC*E1234"
        status = "Available"
        "#,
    )
    .unwrap();
    let router = oicpd::build(&config, &Default::default()).unwrap();
    let server = TestServer::start(router).await.unwrap();
    let emp = EmpClient::new(server.client.clone());

    let started = emp
        .remote_start(&remote_start("DE*ABC*E1234"), CallOptions::new())
        .await
        .into_success()
        .unwrap();
    assert!(started.result);
    assert_eq!(started.status_code.code, StatusCodes::Success);

    let again = emp
        .remote_start(&remote_start("DE*ABC*E1234"), CallOptions::new())
        .await
        .into_success()
        .unwrap();
    assert_eq!(again.status_code.code.code(), 602);

    let reserve = ReservationStart {
        session_id: Some(SessionId::parse("11111111-2222-3333-4444-555555555555").unwrap()),
        partner_session_id: None,
        provider_id: ProviderId::parse("DE*XYZ").unwrap(),
        evse_id: EvseId::parse("DE*ABC*E1234").unwrap(),
        identification: Identification::remote(EvcoId::parse("DE-8EO-CAAA00001-X").unwrap()),
        partner_product_id: None,
        duration_minutes: Some(15),
    };
    let reserved = emp
        .reservation_start(&reserve, CallOptions::new())
        .await
        .into_success()
        .unwrap();
    assert_eq!(reserved.status_code.code, StatusCodes::EvseAlreadyInUse);

    let untracked = emp
        .reservation_start(
            &ReservationStart {
                session_id: None,
                ..reserve.clone()
            },
            CallOptions::new(),
        )
        .await
        .into_success()
        .unwrap();
    assert!(!untracked.result);
    assert_eq!(untracked.status_code.code, StatusCodes::DataError);

    let stopped = emp
        .remote_stop(&remote_stop("DE*ABC*E1234"), CallOptions::new())
        .await
        .into_success()
        .unwrap();
    assert!(stopped.result);

    let unknown = emp
        .remote_start(&remote_start("DE*ABC*E9999"), CallOptions::new())
        .await
        .into_success()
        .unwrap();
    assert_eq!(unknown.status_code.code, StatusCodes::DataError);
}

// =============================================================================
// Raw HTTP
// =============================================================================

#[tokio::test]
async fn test_malformed_command_is_answered_with_200() {
    let server = TestServer::start(create_cpo_router(AppState::new(), "/api/oicp"))
        .await
        .unwrap();

    let body = oicp_codec::envelope::wrap(
        oicp_codec::XmlNode::new("eRoamingAuthorizeRemoteStart")
            .text_child("SessionID", SESSION)
            .text_child("EVSEID", "DE*ABC*E1234"),
    );
    let response = reqwest::Client::new()
        .post(format!("{}/api/oicp/Authorization", server.base_url()))
        .header("content-type", oicp_codec::CONTENT_TYPE)
        .body(body)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let text = response.text().await.unwrap();
    let oicp_codec::Decoded::Message(ack) =
        oicp_codec::decode::<oicp_core::Acknowledgement>(&text).unwrap()
    else {
        panic!("expected acknowledgement");
    };
    assert!(!ack.result);
    assert_eq!(ack.status_code.code, StatusCodes::DataError);
    assert!(ack.status_code.additional_info.is_some());
}
