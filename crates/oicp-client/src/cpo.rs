//! Operations a charge point operator sends to the hub

use oicp_core::{
    Acknowledgement, AuthorizationStart, AuthorizationStop, AuthorizeStart, AuthorizeStop,
    ChargeDetailRecord, OperationResult, PushEvseData, PushEvseStatus,
};
use tracing::instrument;

use crate::client::OicpClient;
use crate::options::CallOptions;

/// CPO side of the protocol
#[derive(Debug, Clone)]
pub struct CpoClient {
    client: OicpClient,
}

impl CpoClient {
    pub fn new(client: OicpClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &OicpClient {
        &self.client
    }

    /// Upload EVSE static data
    #[instrument(skip_all, fields(operator_id = %request.operator.operator_id, action = %request.action))]
    pub async fn push_evse_data(
        &self,
        request: &PushEvseData,
        options: CallOptions,
    ) -> OperationResult<Acknowledgement> {
        let path = &self.client.endpoints().evse_data;
        self.client.call(path, request, options).await
    }

    /// Upload EVSE live status
    #[instrument(skip_all, fields(operator_id = %request.operator.operator_id, action = %request.action))]
    pub async fn push_evse_status(
        &self,
        request: &PushEvseStatus,
        options: CallOptions,
    ) -> OperationResult<Acknowledgement> {
        let path = &self.client.endpoints().evse_status;
        self.client.call(path, request, options).await
    }

    /// Ask the hub whether a locally presented token may start charging
    #[instrument(skip_all, fields(operator_id = %request.operator_id))]
    pub async fn authorize_start(
        &self,
        request: &AuthorizeStart,
        options: CallOptions,
    ) -> OperationResult<AuthorizationStart> {
        let path = &self.client.endpoints().authorization;
        self.client.call(path, request, options).await
    }

    #[instrument(skip_all, fields(operator_id = %request.operator_id, session_id = %request.session_id))]
    pub async fn authorize_stop(
        &self,
        request: &AuthorizeStop,
        options: CallOptions,
    ) -> OperationResult<AuthorizationStop> {
        let path = &self.client.endpoints().authorization;
        self.client.call(path, request, options).await
    }

    /// Submit the record of a finished session
    ///
    /// The hub does not deduplicate; submit each session at most once.
    #[instrument(skip_all, fields(session_id = %record.session_id, evse_id = %record.evse_id))]
    pub async fn send_charge_detail_record(
        &self,
        record: &ChargeDetailRecord,
        options: CallOptions,
    ) -> OperationResult<Acknowledgement> {
        let path = &self.client.endpoints().authorization;
        self.client.call(path, record, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Endpoints;
    use crate::mock::MockTransport;
    use oicp_codec::decode_request;
    use oicp_core::{
        AuthToken, AuthorizationStatus, Identification, OperatorId, ProviderId, SessionId,
        StatusCode, StatusCodes,
    };
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::time::Duration;

    const AUTHORIZATION: &str = "/api/oicp/Authorization";

    fn cpo(mock: &Arc<MockTransport>) -> CpoClient {
        CpoClient::new(OicpClient::with_transport(
            mock.clone(),
            Endpoints::default(),
            Duration::from_secs(5),
        ))
    }

    fn token_request() -> AuthorizeStart {
        AuthorizeStart::new(
            OperatorId::parse("DE*ABC").unwrap(),
            Identification::rfid(AuthToken::parse("AABBCCDD").unwrap()),
        )
    }

    #[tokio::test]
    async fn test_authorize_start_authorized() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_message(
            AUTHORIZATION,
            &AuthorizationStart::authorized(
                SessionId::parse("8fade8bd-0a88-4c4b-b8a6-2b8d0f5e1d12").unwrap(),
                ProviderId::parse("DE*XYZ").unwrap(),
            ),
        );

        let result = cpo(&mock)
            .authorize_start(&token_request(), CallOptions::new())
            .await;

        let response = result.into_success().expect("authorized");
        assert_eq!(response.status, AuthorizationStatus::Authorized);
        assert_eq!(response.status_code.code, StatusCodes::Success);
        assert_eq!(response.provider_id.unwrap().as_str(), "DE*XYZ");

        let sent = decode_request::<AuthorizeStart>(&mock.requests()[0].body).unwrap();
        assert_eq!(sent, token_request());
    }

    #[tokio::test]
    async fn test_authorize_start_not_authorized_is_success() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_message(
            AUTHORIZATION,
            &AuthorizationStart::not_authorized(StatusCode::new(
                StatusCodes::RfidAuthenticationFailedInvalidUid,
            )),
        );

        let result = cpo(&mock)
            .authorize_start(&token_request(), CallOptions::new())
            .await;

        let response = result.into_success().unwrap();
        assert!(!response.is_authorized());
        assert!(response.session_id.is_none());
        assert_eq!(response.status_code.code.code(), 102);
    }

    #[tokio::test]
    async fn test_authorize_stop_unreachable() {
        let mock = Arc::new(MockTransport::new());
        mock.set_connected(false);

        let request = AuthorizeStop::new(
            OperatorId::parse("DE*ABC").unwrap(),
            SessionId::parse("8fade8bd-0a88-4c4b-b8a6-2b8d0f5e1d12").unwrap(),
            Identification::rfid(AuthToken::parse("AABBCCDD").unwrap()),
        );
        let result = cpo(&mock).authorize_stop(&request, CallOptions::new()).await;

        assert_eq!(
            result.fault_status().unwrap().code,
            StatusCodes::ServiceNotAvailable
        );
    }
}
