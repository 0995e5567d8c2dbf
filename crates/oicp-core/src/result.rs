//! Three-way result of every outbound operation

use std::fmt;
use std::time::Duration;

use crate::status::StatusCode;

/// Why a call failed below the protocol layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultCause {
    /// Connection, DNS or I/O failure; the remote was never reached
    Network(String),
    /// The per-call timeout elapsed
    Timeout(Duration),
    /// The caller cancelled the call
    Cancelled,
    /// The remote answered with a non-2xx HTTP status
    HttpStatus(u16),
    /// The remote answered 2xx but the body could not be decoded
    Decode(String),
    /// The request could not be encoded
    Encode(String),
}

impl fmt::Display for FaultCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultCause::Network(msg) => write!(f, "network error: {}", msg),
            FaultCause::Timeout(after) => write!(f, "timed out after {:?}", after),
            FaultCause::Cancelled => f.write_str("cancelled"),
            FaultCause::HttpStatus(status) => write!(f, "HTTP {}", status),
            FaultCause::Decode(msg) => write!(f, "undecodable response: {}", msg),
            FaultCause::Encode(msg) => write!(f, "unencodable request: {}", msg),
        }
    }
}

/// Outcome of an outbound operation
///
/// Exactly one tag is populated and only `Success` carries a payload. A
/// payload whose own result flag is negative is still `Success`: the
/// transport exchange worked and the caller inspects the payload.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult<T> {
    Success(T),
    DomainFault(StatusCode),
    TransportFault { status: StatusCode, cause: FaultCause },
}

impl<T> OperationResult<T> {
    pub fn transport_fault(status: StatusCode, cause: FaultCause) -> Self {
        Self::TransportFault { status, cause }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_domain_fault(&self) -> bool {
        matches!(self, Self::DomainFault(_))
    }

    pub fn is_transport_fault(&self) -> bool {
        matches!(self, Self::TransportFault { .. })
    }

    /// Borrow the payload of a `Success`
    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn into_success(self) -> Option<T> {
        match self {
            Self::Success(payload) => Some(payload),
            _ => None,
        }
    }

    /// Status of a fault; `None` for `Success`
    pub fn fault_status(&self) -> Option<&StatusCode> {
        match self {
            Self::Success(_) => None,
            Self::DomainFault(status) => Some(status),
            Self::TransportFault { status, .. } => Some(status),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OperationResult<U> {
        match self {
            Self::Success(payload) => OperationResult::Success(f(payload)),
            Self::DomainFault(status) => OperationResult::DomainFault(status),
            Self::TransportFault { status, cause } => OperationResult::TransportFault { status, cause },
        }
    }

    /// Short tag used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::DomainFault(_) => "domain_fault",
            Self::TransportFault { .. } => "transport_fault",
        }
    }
}
