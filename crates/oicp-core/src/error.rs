//! Error types for identifier parsing and diff construction

use thiserror::Error;

use crate::diff::DiffSet;
use crate::ids::EvseId;

/// An identifier string did not match the grammar of its kind
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: '{text}'")]
pub struct IdError {
    /// Identifier kind, e.g. "EVSE Id"
    pub kind: &'static str,
    /// Offending input
    pub text: String,
}

impl IdError {
    pub fn new(kind: &'static str, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Errors raised while building an [`EvseStatusDiff`](crate::EvseStatusDiff)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    /// The EVSE is already tracked by another set of the diff
    #[error("EVSE {evse_id} is already part of the {existing} set")]
    Overlap { evse_id: EvseId, existing: DiffSet },
}
