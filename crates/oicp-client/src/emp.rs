//! Operations an e-mobility provider sends to the hub

use oicp_core::{
    Acknowledgement, ChargeDetailRecords, EvseDataResponse, EvseSearchResult,
    EvseStatusByIdResponse, EvseStatusResponse, GetChargeDetailRecords, OperationResult,
    PullEvseData, PullEvseStatus, PullEvseStatusById, PushAuthenticationData, RemoteStart,
    RemoteStop, ReservationStart, ReservationStop, SearchEvse,
};
use tracing::instrument;

use crate::client::OicpClient;
use crate::options::CallOptions;

/// EMP side of the protocol
#[derive(Debug, Clone)]
pub struct EmpClient {
    client: OicpClient,
}

impl EmpClient {
    pub fn new(client: OicpClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &OicpClient {
        &self.client
    }

    // =========================================================================
    // EVSE data and status
    // =========================================================================

    #[instrument(skip_all, fields(provider_id = %request.provider_id))]
    pub async fn pull_evse_data(
        &self,
        request: &PullEvseData,
        options: CallOptions,
    ) -> OperationResult<EvseDataResponse> {
        let path = &self.client.endpoints().evse_data;
        self.client.call(path, request, options).await
    }

    #[instrument(skip_all, fields(provider_id = %request.provider_id))]
    pub async fn pull_evse_status(
        &self,
        request: &PullEvseStatus,
        options: CallOptions,
    ) -> OperationResult<EvseStatusResponse> {
        let path = &self.client.endpoints().evse_status;
        self.client.call(path, request, options).await
    }

    #[instrument(skip_all, fields(provider_id = %request.provider_id, evses = request.evse_ids.len()))]
    pub async fn pull_evse_status_by_id(
        &self,
        request: &PullEvseStatusById,
        options: CallOptions,
    ) -> OperationResult<EvseStatusByIdResponse> {
        let path = &self.client.endpoints().evse_status;
        self.client.call(path, request, options).await
    }

    #[instrument(skip_all, fields(provider_id = %request.provider_id))]
    pub async fn search_evse(
        &self,
        request: &SearchEvse,
        options: CallOptions,
    ) -> OperationResult<EvseSearchResult> {
        let path = &self.client.endpoints().evse_search;
        self.client.call(path, request, options).await
    }

    // =========================================================================
    // Authentication data and remote commands
    // =========================================================================

    #[instrument(skip_all, fields(provider_id = %request.provider_id, action = %request.action))]
    pub async fn push_authentication_data(
        &self,
        request: &PushAuthenticationData,
        options: CallOptions,
    ) -> OperationResult<Acknowledgement> {
        let path = &self.client.endpoints().authentication_data;
        self.client.call(path, request, options).await
    }

    #[instrument(skip_all, fields(evse_id = %request.evse_id))]
    pub async fn reservation_start(
        &self,
        request: &ReservationStart,
        options: CallOptions,
    ) -> OperationResult<Acknowledgement> {
        let path = &self.client.endpoints().reservation;
        self.client.call(path, request, options).await
    }

    #[instrument(skip_all, fields(evse_id = %request.evse_id, session_id = %request.session_id))]
    pub async fn reservation_stop(
        &self,
        request: &ReservationStop,
        options: CallOptions,
    ) -> OperationResult<Acknowledgement> {
        let path = &self.client.endpoints().reservation;
        self.client.call(path, request, options).await
    }

    /// Ask the operator of `request.evse_id` to start charging
    ///
    /// A refusal by the operator arrives as `Success` with a negative
    /// acknowledgement.
    #[instrument(skip_all, fields(evse_id = %request.evse_id, session_id = %request.session_id))]
    pub async fn remote_start(
        &self,
        request: &RemoteStart,
        options: CallOptions,
    ) -> OperationResult<Acknowledgement> {
        let path = &self.client.endpoints().authorization;
        self.client.call(path, request, options).await
    }

    #[instrument(skip_all, fields(evse_id = %request.evse_id, session_id = %request.session_id))]
    pub async fn remote_stop(
        &self,
        request: &RemoteStop,
        options: CallOptions,
    ) -> OperationResult<Acknowledgement> {
        let path = &self.client.endpoints().authorization;
        self.client.call(path, request, options).await
    }

    // =========================================================================
    // Charge detail records
    // =========================================================================

    #[instrument(skip_all, fields(provider_id = %request.provider_id))]
    pub async fn get_charge_detail_records(
        &self,
        request: &GetChargeDetailRecords,
        options: CallOptions,
    ) -> OperationResult<ChargeDetailRecords> {
        let path = &self.client.endpoints().authorization;
        self.client.call(path, request, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Endpoints;
    use crate::mock::MockTransport;
    use chrono::{TimeZone, Utc};
    use oicp_codec::{decode_remote_command, encode, envelope, SoapFault};
    use oicp_core::{
        EvcoId, EvseId, EvseStatus, EvseStatusRecord, Identification, ProviderId,
        RemoteCommand, SessionId, StatusCode, StatusCodes,
    };
    use std::sync::Arc;
    use std::time::Duration;

    fn emp(mock: &Arc<MockTransport>) -> EmpClient {
        EmpClient::new(OicpClient::with_transport(
            mock.clone(),
            Endpoints::default(),
            Duration::from_secs(5),
        ))
    }

    fn remote_start() -> RemoteStart {
        RemoteStart {
            session_id: SessionId::parse("8fade8bd-0a88-4c4b-b8a6-2b8d0f5e1d12").unwrap(),
            partner_session_id: None,
            provider_id: ProviderId::parse("DE*XYZ").unwrap(),
            evse_id: EvseId::parse("DE*ABC*E1234").unwrap(),
            identification: Identification::remote(EvcoId::parse("DE-8EO-CAAA00001-X").unwrap()),
            partner_product_id: None,
        }
    }

    #[tokio::test]
    async fn test_remote_start_refused() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_message(
            "/api/oicp/Authorization",
            &Acknowledgement::failure(StatusCode::new(StatusCodes::EvseAlreadyInUse)),
        );

        let result = emp(&mock).remote_start(&remote_start(), CallOptions::new()).await;

        let ack = result.into_success().unwrap();
        assert!(!ack.result);
        assert_eq!(ack.status_code.code.code(), 602);

        let sent = decode_remote_command(&mock.requests()[0].body).unwrap();
        assert_eq!(sent, RemoteCommand::Start(remote_start()));
    }

    #[tokio::test]
    async fn test_reservation_uses_reservation_endpoint() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_message("/api/oicp/Reservation", &Acknowledgement::success());

        let request = ReservationStop {
            session_id: SessionId::parse("8fade8bd-0a88-4c4b-b8a6-2b8d0f5e1d12").unwrap(),
            partner_session_id: None,
            provider_id: ProviderId::parse("DE*XYZ").unwrap(),
            evse_id: EvseId::parse("DE*ABC*E1234").unwrap(),
        };
        let result = emp(&mock).reservation_stop(&request, CallOptions::new()).await;

        assert!(result.is_success());
        assert_eq!(mock.requests()[0].path, "/api/oicp/Reservation");
    }

    #[tokio::test]
    async fn test_pull_evse_status_by_id() {
        let mock = Arc::new(MockTransport::new());
        let evse_id = EvseId::parse("DE*ABC*E1234").unwrap();
        mock.respond_message(
            "/api/oicp/EVSEStatus",
            &EvseStatusByIdResponse {
                records: vec![EvseStatusRecord::new(evse_id.clone(), EvseStatus::Available)],
                status_code: None,
            },
        );

        let request = PullEvseStatusById {
            provider_id: ProviderId::parse("DE*XYZ").unwrap(),
            evse_ids: vec![evse_id.clone()],
        };
        let result = emp(&mock)
            .pull_evse_status_by_id(&request, CallOptions::new())
            .await;

        let response = result.into_success().unwrap();
        assert_eq!(response.records[0].evse_id, evse_id);
        assert_eq!(response.records[0].status, EvseStatus::Available);
    }

    #[tokio::test]
    async fn test_get_charge_detail_records_fault() {
        let mock = Arc::new(MockTransport::new());
        let fault = SoapFault::new("soap:Client", "provider unknown")
            .with_status(StatusCode::new(StatusCodes::UnauthorizedAccess));
        mock.respond(
            "/api/oicp/Authorization",
            crate::transport::HttpResponse::ok(envelope::wrap_fault(&fault)),
        );

        let request = GetChargeDetailRecords {
            provider_id: ProviderId::parse("DE*XYZ").unwrap(),
            from: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            to: Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap(),
        };
        let result = emp(&mock)
            .get_charge_detail_records(&request, CallOptions::new())
            .await;

        assert!(result.is_domain_fault());
        assert_eq!(result.fault_status().unwrap().code.code(), 17);
    }

    #[tokio::test]
    async fn test_wrong_response_element_is_transport_fault() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(
            "/api/oicp/EVSESearch",
            crate::transport::HttpResponse::ok(encode(&Acknowledgement::success())),
        );

        let request = SearchEvse {
            provider_id: ProviderId::parse("DE*XYZ").unwrap(),
            search_center: None,
            plugs: vec![],
        };
        let result = emp(&mock).search_evse(&request, CallOptions::new()).await;

        assert!(result.is_transport_fault());
    }
}
