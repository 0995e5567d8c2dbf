//! Charge detail records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{EvseId, OperatorId, PartnerProductId, PartnerSessionId, ProviderId, SessionId};
use crate::models::authorization::Identification;

/// Settlement record of one finished charging session
///
/// Immutable once submitted. The protocol does not deduplicate, so
/// submitting the same session twice is a caller error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeDetailRecord {
    pub session_id: SessionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_session_id: Option<PartnerSessionId>,
    pub partner_product_id: PartnerProductId,
    pub evse_id: EvseId,
    pub identification: Identification,
    pub session_start: DateTime<Utc>,
    pub session_end: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charging_start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charging_end: Option<DateTime<Utc>>,
    /// Meter reading in kWh at session start
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meter_value_start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meter_value_end: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meter_values_in_between: Vec<f64>,
    /// kWh
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_energy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metering_signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hub_operator_id: Option<OperatorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hub_provider_id: Option<ProviderId>,
}

impl ChargeDetailRecord {
    pub fn new(
        session_id: SessionId,
        partner_product_id: PartnerProductId,
        evse_id: EvseId,
        identification: Identification,
        session_start: DateTime<Utc>,
        session_end: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id,
            partner_session_id: None,
            partner_product_id,
            evse_id,
            identification,
            session_start,
            session_end,
            charging_start: None,
            charging_end: None,
            meter_value_start: None,
            meter_value_end: None,
            meter_values_in_between: Vec::new(),
            consumed_energy: None,
            metering_signature: None,
            hub_operator_id: None,
            hub_provider_id: None,
        }
    }

    pub fn with_charging_period(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.charging_start = Some(start);
        self.charging_end = Some(end);
        self
    }

    /// Set start/end readings; consumed energy is derived when not set
    ///
    /// The derived value is rounded to whole Wh. Readings that run
    /// backwards leave it unset.
    pub fn with_meter_values(mut self, start: f64, end: f64) -> Self {
        self.meter_value_start = Some(start);
        self.meter_value_end = Some(end);
        if self.consumed_energy.is_none() && end >= start {
            self.consumed_energy = Some(round_to_meter_resolution(end - start));
        }
        self
    }

    pub fn with_consumed_energy(mut self, kwh: f64) -> Self {
        self.consumed_energy = Some(kwh);
        self
    }
}

/// Meter readings are reported in kWh with three decimals
fn round_to_meter_resolution(kwh: f64) -> f64 {
    (kwh * 1000.0).round() / 1000.0
}

/// EMP → hub: fetch CDRs for a time window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetChargeDetailRecords {
    pub provider_id: ProviderId,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChargeDetailRecords {
    pub records: Vec<ChargeDetailRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::AuthToken;
    use chrono::TimeZone;

    fn record() -> ChargeDetailRecord {
        ChargeDetailRecord::new(
            SessionId::parse("8fade8bd-0a88-4c4b-b8a6-2b8d0f5e1d12").unwrap(),
            PartnerProductId::parse("AC1").unwrap(),
            EvseId::parse("DE*ABC*E1234").unwrap(),
            Identification::rfid(AuthToken::parse("AABBCCDD").unwrap()),
            Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 11, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_derived_energy_rounded_to_meter_resolution() {
        let cdr = record().with_meter_values(0.1, 0.2);
        assert_eq!(cdr.consumed_energy, Some(0.1));
        assert_eq!(cdr.consumed_energy.map(|e| e.to_string()).as_deref(), Some("0.1"));

        let cdr = record().with_meter_values(1200.5, 1222.75);
        assert_eq!(cdr.consumed_energy, Some(22.25));
    }

    #[test]
    fn test_backwards_readings_leave_energy_unset() {
        let cdr = record().with_meter_values(1222.75, 1200.5);
        assert_eq!(cdr.meter_value_start, Some(1222.75));
        assert_eq!(cdr.consumed_energy, None);
    }

    #[test]
    fn test_explicit_energy_wins() {
        let cdr = record().with_consumed_energy(7.5).with_meter_values(0.0, 9.0);
        assert_eq!(cdr.consumed_energy, Some(7.5));
    }
}
