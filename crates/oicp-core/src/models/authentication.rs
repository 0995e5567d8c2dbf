//! Authentication data upload (EMP → hub)

use serde::{Deserialize, Serialize};

use crate::ids::ProviderId;
use crate::models::authorization::Identification;
use crate::models::evse::ActionType;

/// Offline whitelist of identifications a provider accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushAuthenticationData {
    pub action: ActionType,
    pub provider_id: ProviderId,
    pub identifications: Vec<Identification>,
}
