//! EVSE data and status models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{EvseId, OperatorId, ProviderId};
use crate::status::StatusCode;

/// Live status of a single charge point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvseStatus {
    Available,
    Reserved,
    Occupied,
    OutOfService,
    /// Sent for EVSEs removed from the operator's inventory
    Unavailable,
    EvseNotFound,
    Unknown,
}

impl std::fmt::Display for EvseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EvseStatus::Available => "Available",
            EvseStatus::Reserved => "Reserved",
            EvseStatus::Occupied => "Occupied",
            EvseStatus::OutOfService => "OutOfService",
            EvseStatus::Unavailable => "Unavailable",
            EvseStatus::EvseNotFound => "EvseNotFound",
            EvseStatus::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for EvseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(EvseStatus::Available),
            "Reserved" => Ok(EvseStatus::Reserved),
            "Occupied" => Ok(EvseStatus::Occupied),
            "OutOfService" => Ok(EvseStatus::OutOfService),
            "Unavailable" => Ok(EvseStatus::Unavailable),
            "EvseNotFound" => Ok(EvseStatus::EvseNotFound),
            "Unknown" => Ok(EvseStatus::Unknown),
            _ => Err(format!("Unknown EVSE status: '{}'", s)),
        }
    }
}

/// How a push is applied to the remote inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    FullLoad,
    Update,
    Insert,
    Delete,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ActionType::FullLoad => "fullLoad",
            ActionType::Update => "update",
            ActionType::Insert => "insert",
            ActionType::Delete => "delete",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for ActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fullLoad" => Ok(ActionType::FullLoad),
            "update" => Ok(ActionType::Update),
            "insert" => Ok(ActionType::Insert),
            "delete" => Ok(ActionType::Delete),
            _ => Err(format!("Unknown action type: '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Centre and radius of a geographic query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchCenter {
    pub coordinates: GeoCoordinates,
    pub radius_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// ISO 3166 alpha-3 country code
    pub country: String,
    pub city: String,
    pub street: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvseStatusRecord {
    pub evse_id: EvseId,
    pub status: EvseStatus,
}

impl EvseStatusRecord {
    pub fn new(evse_id: EvseId, status: EvseStatus) -> Self {
        Self { evse_id, status }
    }
}

/// Static description of a charge point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvseDataRecord {
    pub evse_id: EvseId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charging_station_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charging_station_name: Option<String>,
    pub address: Address,
    pub coordinates: GeoCoordinates,
    /// Plug types, e.g. "Type 2 Outlet"
    #[serde(default)]
    pub plugs: Vec<String>,
    /// Supported authentication modes, e.g. "NFC RFID Classic"
    #[serde(default)]
    pub authentication_modes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotline_phone_number: Option<String>,
    pub is_open_24_hours: bool,
}

/// EVSE data of one operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorEvseData {
    pub operator_id: OperatorId,
    pub operator_name: String,
    pub records: Vec<EvseDataRecord>,
}

/// EVSE status of one operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorEvseStatus {
    pub operator_id: OperatorId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_name: Option<String>,
    pub records: Vec<EvseStatusRecord>,
}

/// CPO → hub: upload EVSE data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushEvseData {
    pub action: ActionType,
    pub operator: OperatorEvseData,
}

/// CPO → hub: upload EVSE status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushEvseStatus {
    pub action: ActionType,
    pub operator: OperatorEvseStatus,
}

/// EMP → hub: download EVSE data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullEvseData {
    pub provider_id: ProviderId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_center: Option<SearchCenter>,
    /// Only return records changed since this instant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_call: Option<DateTime<Utc>>,
}

impl PullEvseData {
    pub fn new(provider_id: ProviderId) -> Self {
        Self {
            provider_id,
            search_center: None,
            last_call: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvseDataResponse {
    pub operators: Vec<OperatorEvseData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<StatusCode>,
}

/// EMP → hub: download EVSE status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullEvseStatus {
    pub provider_id: ProviderId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_center: Option<SearchCenter>,
    /// Only return EVSEs currently in this status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_filter: Option<EvseStatus>,
}

impl PullEvseStatus {
    pub fn new(provider_id: ProviderId) -> Self {
        Self {
            provider_id,
            search_center: None,
            status_filter: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvseStatusResponse {
    pub operators: Vec<OperatorEvseStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<StatusCode>,
}

/// EMP → hub: status of selected EVSEs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullEvseStatusById {
    pub provider_id: ProviderId,
    pub evse_ids: Vec<EvseId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvseStatusByIdResponse {
    pub records: Vec<EvseStatusRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<StatusCode>,
}

/// EMP → hub: geographic EVSE search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchEvse {
    pub provider_id: ProviderId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_center: Option<SearchCenter>,
    #[serde(default)]
    pub plugs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvseMatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub record: EvseDataRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvseSearchResult {
    pub matches: Vec<EvseMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<StatusCode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evse_status_wire_names() {
        for status in [
            EvseStatus::Available,
            EvseStatus::Reserved,
            EvseStatus::Occupied,
            EvseStatus::OutOfService,
            EvseStatus::Unavailable,
            EvseStatus::EvseNotFound,
            EvseStatus::Unknown,
        ] {
            assert_eq!(status.to_string().parse::<EvseStatus>().unwrap(), status);
        }
        assert!("available".parse::<EvseStatus>().is_err());
    }

    #[test]
    fn test_action_type_wire_names() {
        assert_eq!(ActionType::FullLoad.to_string(), "fullLoad");
        assert_eq!("delete".parse::<ActionType>().unwrap(), ActionType::Delete);
        assert!("Delete".parse::<ActionType>().is_err());
    }
}
