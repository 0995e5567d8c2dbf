//! Authorization models (AuthorizeStart / AuthorizeStop)

use serde::{Deserialize, Serialize};

use crate::ids::{
    AuthToken, EvcoId, EvseId, OperatorId, PartnerProductId, PartnerSessionId, ProviderId,
    SessionId,
};
use crate::status::StatusCode;

/// How the driver identified themselves
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Identification {
    /// RFID card of the MIFARE family
    RfidMifare { uid: AuthToken },
    /// QR code scanned by the driver's app
    QrCode {
        evco_id: EvcoId,
        #[serde(skip_serializing_if = "Option::is_none")]
        pin: Option<String>,
    },
    /// ISO 15118 plug and charge
    PlugAndCharge { evco_id: EvcoId },
    /// Started remotely by the e-mobility provider
    Remote { evco_id: EvcoId },
}

impl Identification {
    pub fn rfid(uid: AuthToken) -> Self {
        Self::RfidMifare { uid }
    }

    pub fn remote(evco_id: EvcoId) -> Self {
        Self::Remote { evco_id }
    }

    /// Contract id carried by this identification, if any
    pub fn evco_id(&self) -> Option<&EvcoId> {
        match self {
            Self::RfidMifare { .. } => None,
            Self::QrCode { evco_id, .. }
            | Self::PlugAndCharge { evco_id }
            | Self::Remote { evco_id } => Some(evco_id),
        }
    }

    /// RFID UID carried by this identification, if any
    pub fn auth_token(&self) -> Option<&AuthToken> {
        match self {
            Self::RfidMifare { uid } => Some(uid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthorizationStatus {
    Authorized,
    NotAuthorized,
}

impl std::fmt::Display for AuthorizationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthorizationStatus::Authorized => f.write_str("Authorized"),
            AuthorizationStatus::NotAuthorized => f.write_str("NotAuthorized"),
        }
    }
}

impl std::str::FromStr for AuthorizationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Authorized" => Ok(AuthorizationStatus::Authorized),
            "NotAuthorized" => Ok(AuthorizationStatus::NotAuthorized),
            _ => Err(format!("Unknown authorization status: '{}'", s)),
        }
    }
}

/// CPO → hub: may this driver start charging?
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizeStart {
    pub operator_id: OperatorId,
    pub identification: Identification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evse_id: Option<EvseId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_product_id: Option<PartnerProductId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_session_id: Option<PartnerSessionId>,
}

impl AuthorizeStart {
    pub fn new(operator_id: OperatorId, identification: Identification) -> Self {
        Self {
            operator_id,
            identification,
            evse_id: None,
            session_id: None,
            partner_product_id: None,
            partner_session_id: None,
        }
    }

    pub fn with_evse_id(mut self, evse_id: EvseId) -> Self {
        self.evse_id = Some(evse_id);
        self
    }

    pub fn with_session_id(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn with_partner_product_id(mut self, product: PartnerProductId) -> Self {
        self.partner_product_id = Some(product);
        self
    }

    pub fn with_partner_session_id(mut self, partner_session_id: PartnerSessionId) -> Self {
        self.partner_session_id = Some(partner_session_id);
        self
    }
}

/// Hub → CPO answer to [`AuthorizeStart`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationStart {
    /// Present only when `status` is `Authorized`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_session_id: Option<PartnerSessionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<ProviderId>,
    pub status: AuthorizationStatus,
    pub status_code: StatusCode,
    /// Cards that may also stop this session
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop_identifications: Vec<Identification>,
}

impl AuthorizationStart {
    pub fn authorized(session_id: SessionId, provider_id: ProviderId) -> Self {
        Self {
            session_id: Some(session_id),
            partner_session_id: None,
            provider_id: Some(provider_id),
            status: AuthorizationStatus::Authorized,
            status_code: StatusCode::success(),
            stop_identifications: Vec::new(),
        }
    }

    pub fn not_authorized(status_code: StatusCode) -> Self {
        Self {
            session_id: None,
            partner_session_id: None,
            provider_id: None,
            status: AuthorizationStatus::NotAuthorized,
            status_code,
            stop_identifications: Vec::new(),
        }
    }

    pub fn is_authorized(&self) -> bool {
        self.status == AuthorizationStatus::Authorized
    }
}

/// CPO → hub: may this driver stop the session?
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizeStop {
    pub operator_id: OperatorId,
    pub session_id: SessionId,
    pub identification: Identification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evse_id: Option<EvseId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_session_id: Option<PartnerSessionId>,
}

impl AuthorizeStop {
    pub fn new(operator_id: OperatorId, session_id: SessionId, identification: Identification) -> Self {
        Self {
            operator_id,
            session_id,
            identification,
            evse_id: None,
            partner_session_id: None,
        }
    }

    pub fn with_evse_id(mut self, evse_id: EvseId) -> Self {
        self.evse_id = Some(evse_id);
        self
    }

    pub fn with_partner_session_id(mut self, partner_session_id: PartnerSessionId) -> Self {
        self.partner_session_id = Some(partner_session_id);
        self
    }
}

/// Hub → CPO answer to [`AuthorizeStop`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationStop {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_session_id: Option<PartnerSessionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<ProviderId>,
    pub status: AuthorizationStatus,
    pub status_code: StatusCode,
}

impl AuthorizationStop {
    pub fn authorized(session_id: SessionId, provider_id: ProviderId) -> Self {
        Self {
            session_id: Some(session_id),
            partner_session_id: None,
            provider_id: Some(provider_id),
            status: AuthorizationStatus::Authorized,
            status_code: StatusCode::success(),
        }
    }

    pub fn not_authorized(status_code: StatusCode) -> Self {
        Self {
            session_id: None,
            partner_session_id: None,
            provider_id: None,
            status: AuthorizationStatus::NotAuthorized,
            status_code,
        }
    }

    pub fn is_authorized(&self) -> bool {
        self.status == AuthorizationStatus::Authorized
    }
}
