//! OICP status-code registry

use std::fmt;

use serde::{Deserialize, Serialize};

/// OICP status codes
///
/// `000` is the only success code. Codes below `100` are hub and data errors,
/// `1xx` authentication failures, `2xx` contract problems, `3xx` partner and
/// service availability, `4xx` session problems, `5xx`-`7xx` EVSE state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCodes {
    Success,
    HubjectSystemError,
    HubjectDatabaseError,
    DataTransactionError,
    UnauthorizedAccess,
    InconsistentEvseId,
    InconsistentEvcoId,
    SystemError,
    DataError,
    QrCodeAuthenticationFailedInvalidCredentials,
    RfidAuthenticationFailedInvalidUid,
    RfidAuthenticationFailedCardNotReadable,
    PinAuthenticationFailedInvalidPin,
    ParallelRequests,
    QrCodeAppAuthenticationFailedTimeout,
    NoPositiveAuthenticationResponse,
    NoValidContract,
    PartnerNotFound,
    PartnerDidNotRespond,
    ServiceNotAvailable,
    SessionIsInvalid,
    CommunicationToEvseFailed,
    NoEvConnectedToEvse,
    EvseAlreadyReserved,
    EvseAlreadyInUse,
    UnknownEvseId,
    EvseIdNotHubjectCompatible,
    EvseOutOfService,
    /// Synthesized locally when the caller cancels a pending call; never
    /// sent by a remote endpoint
    RequestCancelled,
    /// A code outside the registry, preserved as received
    Unknown(u16),
}

impl StatusCodes {
    /// Numeric value of this code
    pub fn code(self) -> u16 {
        match self {
            Self::Success => 0,
            Self::HubjectSystemError => 1,
            Self::HubjectDatabaseError => 2,
            Self::DataTransactionError => 9,
            Self::UnauthorizedAccess => 17,
            Self::InconsistentEvseId => 18,
            Self::InconsistentEvcoId => 19,
            Self::SystemError => 21,
            Self::DataError => 22,
            Self::QrCodeAuthenticationFailedInvalidCredentials => 101,
            Self::RfidAuthenticationFailedInvalidUid => 102,
            Self::RfidAuthenticationFailedCardNotReadable => 103,
            Self::PinAuthenticationFailedInvalidPin => 105,
            Self::ParallelRequests => 106,
            Self::QrCodeAppAuthenticationFailedTimeout => 120,
            Self::NoPositiveAuthenticationResponse => 140,
            Self::NoValidContract => 210,
            Self::PartnerNotFound => 300,
            Self::PartnerDidNotRespond => 310,
            Self::ServiceNotAvailable => 320,
            Self::SessionIsInvalid => 400,
            Self::CommunicationToEvseFailed => 501,
            Self::NoEvConnectedToEvse => 510,
            Self::EvseAlreadyReserved => 601,
            Self::EvseAlreadyInUse => 602,
            Self::UnknownEvseId => 603,
            Self::EvseIdNotHubjectCompatible => 604,
            Self::EvseOutOfService => 700,
            Self::RequestCancelled => 990,
            Self::Unknown(code) => code,
        }
    }

    /// Look up a numeric code in the registry
    pub fn from_code(code: u16) -> Self {
        match code {
            0 => Self::Success,
            1 => Self::HubjectSystemError,
            2 => Self::HubjectDatabaseError,
            9 => Self::DataTransactionError,
            17 => Self::UnauthorizedAccess,
            18 => Self::InconsistentEvseId,
            19 => Self::InconsistentEvcoId,
            21 => Self::SystemError,
            22 => Self::DataError,
            101 => Self::QrCodeAuthenticationFailedInvalidCredentials,
            102 => Self::RfidAuthenticationFailedInvalidUid,
            103 => Self::RfidAuthenticationFailedCardNotReadable,
            105 => Self::PinAuthenticationFailedInvalidPin,
            106 => Self::ParallelRequests,
            120 => Self::QrCodeAppAuthenticationFailedTimeout,
            140 => Self::NoPositiveAuthenticationResponse,
            210 => Self::NoValidContract,
            300 => Self::PartnerNotFound,
            310 => Self::PartnerDidNotRespond,
            320 => Self::ServiceNotAvailable,
            400 => Self::SessionIsInvalid,
            501 => Self::CommunicationToEvseFailed,
            510 => Self::NoEvConnectedToEvse,
            601 => Self::EvseAlreadyReserved,
            602 => Self::EvseAlreadyInUse,
            603 => Self::UnknownEvseId,
            604 => Self::EvseIdNotHubjectCompatible,
            700 => Self::EvseOutOfService,
            990 => Self::RequestCancelled,
            other => Self::Unknown(other),
        }
    }

    /// Parse the zero-padded wire form, e.g. `"022"`
    pub fn parse_wire(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        text.parse::<u16>().ok().map(Self::from_code)
    }

    /// Registry description
    pub fn description(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::HubjectSystemError => "Hubject system error",
            Self::HubjectDatabaseError => "Hubject database error",
            Self::DataTransactionError => "Data transaction error",
            Self::UnauthorizedAccess => "Unauthorized Access",
            Self::InconsistentEvseId => "Inconsistent EvseID",
            Self::InconsistentEvcoId => "Inconsistent EvcoID",
            Self::SystemError => "System error",
            Self::DataError => "Request led to an exception",
            Self::QrCodeAuthenticationFailedInvalidCredentials => {
                "QR Code Authentication failed - Invalid Credentials"
            }
            Self::RfidAuthenticationFailedInvalidUid => "Authentication failed - invalid UID",
            Self::RfidAuthenticationFailedCardNotReadable => {
                "RFID Authentication failed - card not readable"
            }
            Self::PinAuthenticationFailedInvalidPin => "PIN Authentication failed - invalid PIN",
            Self::ParallelRequests => "Parallel requests",
            Self::QrCodeAppAuthenticationFailedTimeout => {
                "QR Code App Authentication failed - time out error"
            }
            Self::NoPositiveAuthenticationResponse => "No positive authentication response",
            Self::NoValidContract => "No valid contract",
            Self::PartnerNotFound => "Partner not found",
            Self::PartnerDidNotRespond => "Partner did not respond",
            Self::ServiceNotAvailable => "Service not available",
            Self::SessionIsInvalid => "Session is invalid",
            Self::CommunicationToEvseFailed => "Communication to EVSE failed",
            Self::NoEvConnectedToEvse => "No EV connected to EVSE",
            Self::EvseAlreadyReserved => "EVSE already reserved",
            Self::EvseAlreadyInUse => "EVSE already in use",
            Self::UnknownEvseId => "Unknown EVSE ID",
            Self::EvseIdNotHubjectCompatible => "EVSE ID is not Hubject compatible",
            Self::EvseOutOfService => "EVSE out of service",
            Self::RequestCancelled => "Request cancelled",
            Self::Unknown(_) => "Unknown status code",
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

impl fmt::Display for StatusCodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.code())
    }
}

impl Serialize for StatusCodes {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.code())
    }
}

impl<'de> Deserialize<'de> for StatusCodes {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u16::deserialize(deserializer).map(Self::from_code)
    }
}

/// Status reported by the remote endpoint or synthesized locally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCode {
    pub code: StatusCodes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

impl StatusCode {
    /// A status carrying the registry description of `code`
    pub fn new(code: StatusCodes) -> Self {
        Self {
            code,
            description: Some(code.description().to_string()),
            additional_info: None,
        }
    }

    /// A bare status with neither description nor additional info
    pub fn bare(code: StatusCodes) -> Self {
        Self {
            code,
            description: None,
            additional_info: None,
        }
    }

    pub fn success() -> Self {
        Self::new(StatusCodes::Success)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_additional_info(mut self, info: impl Into<String>) -> Self {
        self.additional_info = Some(info.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)?;
        if let Some(description) = &self.description {
            write!(f, " {}", description)?;
        }
        if let Some(info) = &self.additional_info {
            write!(f, " ({})", info)?;
        }
        Ok(())
    }
}
