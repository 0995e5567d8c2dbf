//! Remote commands (EMP → hub → CPO) and the generic acknowledgement

use serde::{Deserialize, Serialize};

use crate::ids::{EvseId, PartnerProductId, PartnerSessionId, ProviderId, SessionId};
use crate::models::authorization::Identification;
use crate::status::{StatusCode, StatusCodes};

/// Start charging on behalf of a provider's customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteStart {
    pub session_id: SessionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_session_id: Option<PartnerSessionId>,
    pub provider_id: ProviderId,
    pub evse_id: EvseId,
    /// Remote or QR-code identification carrying the contract id
    pub identification: Identification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_product_id: Option<PartnerProductId>,
}

/// Stop a remotely started session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteStop {
    pub session_id: SessionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_session_id: Option<PartnerSessionId>,
    pub provider_id: ProviderId,
    pub evse_id: EvseId,
}

/// Reserve an EVSE for a provider's customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationStart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_session_id: Option<PartnerSessionId>,
    pub provider_id: ProviderId,
    pub evse_id: EvseId,
    pub identification: Identification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_product_id: Option<PartnerProductId>,
    /// Reservation length in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

/// Cancel a reservation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationStop {
    pub session_id: SessionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_session_id: Option<PartnerSessionId>,
    pub provider_id: ProviderId,
    pub evse_id: EvseId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteCommandKind {
    Start,
    Stop,
    ReservationStart,
    ReservationStop,
}

impl std::fmt::Display for RemoteCommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RemoteCommandKind::Start => "remote_start",
            RemoteCommandKind::Stop => "remote_stop",
            RemoteCommandKind::ReservationStart => "reservation_start",
            RemoteCommandKind::ReservationStop => "reservation_stop",
        };
        f.write_str(s)
    }
}

/// One parsed inbound remote command
///
/// Built once from an inbound envelope and handed to every subscriber by
/// shared reference; it is never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RemoteCommand {
    Start(RemoteStart),
    Stop(RemoteStop),
    ReservationStart(ReservationStart),
    ReservationStop(ReservationStop),
}

impl RemoteCommand {
    pub fn kind(&self) -> RemoteCommandKind {
        match self {
            RemoteCommand::Start(_) => RemoteCommandKind::Start,
            RemoteCommand::Stop(_) => RemoteCommandKind::Stop,
            RemoteCommand::ReservationStart(_) => RemoteCommandKind::ReservationStart,
            RemoteCommand::ReservationStop(_) => RemoteCommandKind::ReservationStop,
        }
    }

    pub fn evse_id(&self) -> &EvseId {
        match self {
            RemoteCommand::Start(c) => &c.evse_id,
            RemoteCommand::Stop(c) => &c.evse_id,
            RemoteCommand::ReservationStart(c) => &c.evse_id,
            RemoteCommand::ReservationStop(c) => &c.evse_id,
        }
    }

    pub fn provider_id(&self) -> &ProviderId {
        match self {
            RemoteCommand::Start(c) => &c.provider_id,
            RemoteCommand::Stop(c) => &c.provider_id,
            RemoteCommand::ReservationStart(c) => &c.provider_id,
            RemoteCommand::ReservationStop(c) => &c.provider_id,
        }
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            RemoteCommand::Start(c) => Some(&c.session_id),
            RemoteCommand::Stop(c) => Some(&c.session_id),
            RemoteCommand::ReservationStart(c) => c.session_id.as_ref(),
            RemoteCommand::ReservationStop(c) => Some(&c.session_id),
        }
    }

    pub fn partner_session_id(&self) -> Option<&PartnerSessionId> {
        match self {
            RemoteCommand::Start(c) => c.partner_session_id.as_ref(),
            RemoteCommand::Stop(c) => c.partner_session_id.as_ref(),
            RemoteCommand::ReservationStart(c) => c.partner_session_id.as_ref(),
            RemoteCommand::ReservationStop(c) => c.partner_session_id.as_ref(),
        }
    }
}

/// What one subscriber reports for a remote command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemoteCommandOutcome {
    Success,
    EvseAlreadyInUse,
    SessionIdAlreadyInUse,
    EvseNotReachable,
    Timeout,
    Error,
    /// The subscriber has no opinion about this command
    Unspecified,
}

impl RemoteCommandOutcome {
    /// Wire status reported for this outcome
    pub fn status_code(self) -> StatusCodes {
        match self {
            RemoteCommandOutcome::Success => StatusCodes::Success,
            RemoteCommandOutcome::EvseAlreadyInUse => StatusCodes::EvseAlreadyInUse,
            RemoteCommandOutcome::SessionIdAlreadyInUse => StatusCodes::SessionIsInvalid,
            RemoteCommandOutcome::EvseNotReachable => StatusCodes::CommunicationToEvseFailed,
            RemoteCommandOutcome::Timeout => StatusCodes::NoEvConnectedToEvse,
            RemoteCommandOutcome::Error | RemoteCommandOutcome::Unspecified => {
                StatusCodes::DataError
            }
        }
    }

    pub fn is_success(self) -> bool {
        self == RemoteCommandOutcome::Success
    }
}

impl std::fmt::Display for RemoteCommandOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RemoteCommandOutcome::Success => "success",
            RemoteCommandOutcome::EvseAlreadyInUse => "evse_already_in_use",
            RemoteCommandOutcome::SessionIdAlreadyInUse => "session_id_already_in_use",
            RemoteCommandOutcome::EvseNotReachable => "evse_not_reachable",
            RemoteCommandOutcome::Timeout => "timeout",
            RemoteCommandOutcome::Error => "error",
            RemoteCommandOutcome::Unspecified => "unspecified",
        };
        f.write_str(s)
    }
}

/// Generic success/failure answer with a status code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub result: bool,
    pub status_code: StatusCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_session_id: Option<PartnerSessionId>,
}

impl Acknowledgement {
    pub fn success() -> Self {
        Self {
            result: true,
            status_code: StatusCode::success(),
            session_id: None,
            partner_session_id: None,
        }
    }

    pub fn failure(status_code: StatusCode) -> Self {
        Self {
            result: false,
            status_code,
            session_id: None,
            partner_session_id: None,
        }
    }

    /// Acknowledgement for an arbitrated remote command outcome
    pub fn from_outcome(outcome: RemoteCommandOutcome) -> Self {
        let status_code = StatusCode::new(outcome.status_code());
        Self {
            result: outcome.is_success(),
            status_code,
            session_id: None,
            partner_session_id: None,
        }
    }

    pub fn with_session_id(mut self, session_id: Option<SessionId>) -> Self {
        self.session_id = session_id;
        self
    }

    pub fn with_partner_session_id(mut self, partner_session_id: Option<PartnerSessionId>) -> Self {
        self.partner_session_id = partner_session_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_status_table() {
        let table = [
            (RemoteCommandOutcome::Success, 0, true),
            (RemoteCommandOutcome::EvseAlreadyInUse, 602, false),
            (RemoteCommandOutcome::SessionIdAlreadyInUse, 400, false),
            (RemoteCommandOutcome::EvseNotReachable, 501, false),
            (RemoteCommandOutcome::Timeout, 510, false),
            (RemoteCommandOutcome::Error, 22, false),
            (RemoteCommandOutcome::Unspecified, 22, false),
        ];
        for (outcome, code, result) in table {
            let ack = Acknowledgement::from_outcome(outcome);
            assert_eq!(ack.status_code.code.code(), code, "{outcome}");
            assert_eq!(ack.result, result, "{outcome}");
        }
    }

    #[test]
    fn test_command_accessors() {
        let stop = RemoteCommand::Stop(RemoteStop {
            session_id: SessionId::parse("8fade8bd-0a88-4c4b-b8a6-2b8d0f5e1d12").unwrap(),
            partner_session_id: None,
            provider_id: ProviderId::parse("DE*XYZ").unwrap(),
            evse_id: EvseId::parse("DE*ABC*E1").unwrap(),
        });
        assert_eq!(stop.kind(), RemoteCommandKind::Stop);
        assert_eq!(stop.evse_id().as_str(), "DE*ABC*E1");
        assert_eq!(stop.provider_id().as_str(), "DE*XYZ");
        assert!(stop.session_id().is_some());
        assert!(stop.partner_session_id().is_none());
    }
}
