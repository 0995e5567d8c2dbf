//! oicp-core - Core types for OICP roaming endpoints
//!
//! This crate provides the value objects shared by the codec, the client and
//! the server crates: validated identifiers, the status-code registry, the
//! three-way `OperationResult` and every message model.

pub mod diff;
pub mod error;
pub mod ids;
pub mod models;
pub mod result;
pub mod status;

pub use diff::{DiffSet, EvseStatusDiff};
pub use error::{DiffError, IdError};
pub use ids::{
    AuthToken, EvcoId, EventTrackingId, EvseId, OperatorId, PartnerProductId, PartnerSessionId,
    ProviderId, SessionId,
};
pub use models::*;
pub use result::{FaultCause, OperationResult};
pub use status::{StatusCode, StatusCodes};
