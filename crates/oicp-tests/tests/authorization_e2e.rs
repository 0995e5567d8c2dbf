//! CPO client against a real EMP endpoint
//!
//! Run with: cargo test -p oicp-tests --test authorization_e2e

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use oicp_client::testing::TestServer;
use oicp_client::{CallOptions, CpoClient};
use oicp_core::{
    Acknowledgement, AuthToken, AuthorizationStart, AuthorizationStatus, AuthorizeStart,
    AuthorizeStop, ChargeDetailRecord, EvseId, Identification, OperationResult, OperatorId,
    PartnerProductId, ProviderId, SessionId, StatusCodes,
};
use oicp_server::{create_emp_router, AppState, EmpHandler};
use oicpd::config::DaemonConfig;
use pretty_assertions::assert_eq;

const SESSION: &str = "8fade8bd-0a88-4c4b-b8a6-2b8d0f5e1d12";

/// Provider backend that knows exactly one card
struct SingleCard;

#[async_trait]
impl EmpHandler for SingleCard {
    async fn authorize_start(&self, request: &AuthorizeStart) -> Option<AuthorizationStart> {
        let token = request.identification.auth_token()?;
        (token.as_str() == "AABBCCDD").then(|| {
            AuthorizationStart::authorized(
                SessionId::parse(SESSION).unwrap(),
                ProviderId::parse("DE*XYZ").unwrap(),
            )
        })
    }
}

fn rfid(uid: &str) -> Identification {
    Identification::rfid(AuthToken::parse(uid).unwrap())
}

async fn emp_server() -> TestServer {
    let state = AppState::new();
    state.emp.register(Arc::new(SingleCard));
    TestServer::start(create_emp_router(state, "/api/oicp"))
        .await
        .unwrap()
}

// =============================================================================
// AuthorizeStart
// =============================================================================

#[tokio::test]
async fn test_authorize_start_known_card() {
    let server = emp_server().await;
    let cpo = CpoClient::new(server.client.clone());

    let request = AuthorizeStart::new(OperatorId::parse("DE*ABC").unwrap(), rfid("AABBCCDD"));
    let result = cpo.authorize_start(&request, CallOptions::new()).await;

    let response = match result {
        OperationResult::Success(response) => response,
        other => panic!("expected success, got {:?}", other),
    };
    assert_eq!(response.status, AuthorizationStatus::Authorized);
    assert_eq!(response.session_id, Some(SessionId::parse(SESSION).unwrap()));
    assert_eq!(response.provider_id, Some(ProviderId::parse("DE*XYZ").unwrap()));
    assert_eq!(response.status_code.code, StatusCodes::Success);
    assert_eq!(response.status_code.code.code(), 0);
}

#[tokio::test]
async fn test_authorize_start_unknown_card_is_negative_payload() {
    let server = emp_server().await;
    let cpo = CpoClient::new(server.client.clone());

    let request = AuthorizeStart::new(OperatorId::parse("DE*ABC").unwrap(), rfid("01020304"));
    let result = cpo.authorize_start(&request, CallOptions::new()).await;

    // Negative authorization is data, not a fault
    let response = result.into_success().unwrap();
    assert_eq!(response.status, AuthorizationStatus::NotAuthorized);
    assert_eq!(response.session_id, None);
    assert_eq!(
        response.status_code.code,
        StatusCodes::NoPositiveAuthenticationResponse
    );
}

#[tokio::test]
async fn test_authorize_stop_without_opinion_falls_back() {
    let server = emp_server().await;
    let cpo = CpoClient::new(server.client.clone());

    let request = AuthorizeStop::new(
        OperatorId::parse("DE*ABC").unwrap(),
        SessionId::parse(SESSION).unwrap(),
        rfid("AABBCCDD"),
    );
    let response = cpo
        .authorize_stop(&request, CallOptions::new())
        .await
        .into_success()
        .unwrap();

    assert!(!response.is_authorized());
    assert_eq!(response.status_code.code.code(), 140);
}

// =============================================================================
// Charge detail records
// =============================================================================

fn record(uid: &str) -> ChargeDetailRecord {
    ChargeDetailRecord::new(
        SessionId::parse(SESSION).unwrap(),
        PartnerProductId::parse("AC1").unwrap(),
        EvseId::parse("DE*ABC*E1234").unwrap(),
        rfid(uid),
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 3, 1, 11, 30, 0).unwrap(),
    )
    .with_consumed_energy(22.5)
}

#[tokio::test]
async fn test_unclaimed_cdr_is_rejected_in_payload() {
    let server = emp_server().await;
    let cpo = CpoClient::new(server.client.clone());

    let ack: Acknowledgement = cpo
        .send_charge_detail_record(&record("AABBCCDD"), CallOptions::new())
        .await
        .into_success()
        .unwrap();

    assert!(!ack.result);
    assert_eq!(ack.status_code.code, StatusCodes::DataError);
    assert_eq!(ack.session_id, Some(SessionId::parse(SESSION).unwrap()));
}

// =============================================================================
// Daemon in EMP role
// =============================================================================

#[tokio::test]
async fn test_daemon_token_authorizer_round_trip() {
    let config = DaemonConfig::parse(
        r#"
        [server]
        role = "emp"

        [simulator]
        provider_id = "DE*XYZ"
        tokens = ["AABBCCDD"]
        "#,
    )
    .unwrap();
    let router = oicpd::build(&config, &Default::default()).unwrap();
    let server = TestServer::start(router).await.unwrap();
    let cpo = CpoClient::new(server.client.clone());

    let start = AuthorizeStart::new(OperatorId::parse("DE*ABC").unwrap(), rfid("AABBCCDD"))
        .with_session_id(SessionId::parse(SESSION).unwrap());
    let authorized = cpo
        .authorize_start(&start, CallOptions::new())
        .await
        .into_success()
        .unwrap();
    assert!(authorized.is_authorized());

    let ack = cpo
        .send_charge_detail_record(&record("AABBCCDD"), CallOptions::new())
        .await
        .into_success()
        .unwrap();
    assert!(ack.result);

    let stop = AuthorizeStop::new(
        OperatorId::parse("DE*ABC").unwrap(),
        SessionId::parse(SESSION).unwrap(),
        rfid("AABBCCDD"),
    );
    let stopped = cpo
        .authorize_stop(&stop, CallOptions::new())
        .await
        .into_success()
        .unwrap();
    assert!(stopped.is_authorized());
}
