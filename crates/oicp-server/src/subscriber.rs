//! Internal subscribers of inbound requests

use async_trait::async_trait;
use oicp_core::{
    Acknowledgement, AuthorizationStart, AuthorizationStop, AuthorizeStart, AuthorizeStop,
    ChargeDetailRecord, RemoteCommand, RemoteCommandOutcome,
};

/// Receives remote start/stop and reservation commands on the CPO side
///
/// Return `Unspecified` for commands this subscriber has no opinion on,
/// e.g. EVSEs it does not own.
#[async_trait]
pub trait RemoteCommandHandler: Send + Sync {
    async fn handle(&self, command: &RemoteCommand) -> RemoteCommandOutcome;
}

/// Receives authorization requests and charge detail records on the EMP
/// side
///
/// `None` means "no opinion"; the default implementations have none.
#[async_trait]
pub trait EmpHandler: Send + Sync {
    async fn authorize_start(&self, _request: &AuthorizeStart) -> Option<AuthorizationStart> {
        None
    }

    async fn authorize_stop(&self, _request: &AuthorizeStop) -> Option<AuthorizationStop> {
        None
    }

    async fn charge_detail_record(&self, _record: &ChargeDetailRecord) -> Option<Acknowledgement> {
        None
    }
}
