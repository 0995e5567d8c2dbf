//! Charge detail record messages

use oicp_core::{ChargeDetailRecord, ChargeDetailRecords, GetChargeDetailRecords};

use crate::common::{
    identification_node, opt_timestamp, opt_timestamp_node, require_identification,
    require_timestamp, timestamp_node,
};
use crate::error::CodecError;
use crate::message::{namespaces, OicpMessage};
use crate::node::XmlNode;

impl OicpMessage for ChargeDetailRecord {
    const ELEMENT: &'static str = "eRoamingChargeDetailRecord";
    const NAMESPACE: &'static str = namespaces::AUTHORIZATION;

    fn to_node(&self) -> XmlNode {
        let in_between = (!self.meter_values_in_between.is_empty()).then(|| {
            XmlNode::new("MeterValueInBetween").children(
                self.meter_values_in_between
                    .iter()
                    .map(|value| XmlNode::leaf("MeterValue", value)),
            )
        });

        XmlNode::new(Self::ELEMENT)
            .text_child("SessionID", &self.session_id)
            .opt_text_child("PartnerSessionID", self.partner_session_id.as_ref())
            .text_child("PartnerProductID", &self.partner_product_id)
            .text_child("EvseID", &self.evse_id)
            .child(identification_node(&self.identification))
            .opt_child(opt_timestamp_node("ChargingStart", self.charging_start.as_ref()))
            .opt_child(opt_timestamp_node("ChargingEnd", self.charging_end.as_ref()))
            .child(timestamp_node("SessionStart", &self.session_start))
            .child(timestamp_node("SessionEnd", &self.session_end))
            .opt_text_child("MeterValueStart", self.meter_value_start)
            .opt_text_child("MeterValueEnd", self.meter_value_end)
            .opt_child(in_between)
            .opt_text_child("ConsumedEnergy", self.consumed_energy)
            .opt_text_child("MeteringSignature", self.metering_signature.as_deref())
            .opt_text_child("HubOperatorID", self.hub_operator_id.as_ref())
            .opt_text_child("HubProviderID", self.hub_provider_id.as_ref())
    }

    fn from_node(node: &XmlNode) -> Result<Self, CodecError> {
        let meter_values_in_between: Vec<f64> = match node.find("MeterValueInBetween") {
            Some(list) => list
                .find_all("MeterValue")
                .map(|v| {
                    v.text()
                        .parse::<f64>()
                        .map_err(|e| CodecError::invalid("MeterValue", v.text(), e))
                })
                .collect::<Result<_, _>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            session_id: node.require_parse("SessionID")?,
            partner_session_id: node.opt_parse("PartnerSessionID")?,
            partner_product_id: node.require_parse("PartnerProductID")?,
            evse_id: node.require_parse("EvseID")?,
            identification: require_identification(node)?,
            session_start: require_timestamp(node, "SessionStart")?,
            session_end: require_timestamp(node, "SessionEnd")?,
            charging_start: opt_timestamp(node, "ChargingStart")?,
            charging_end: opt_timestamp(node, "ChargingEnd")?,
            meter_value_start: node.opt_parse("MeterValueStart")?,
            meter_value_end: node.opt_parse("MeterValueEnd")?,
            meter_values_in_between,
            consumed_energy: node.opt_parse("ConsumedEnergy")?,
            metering_signature: node.opt_text("MeteringSignature").map(str::to_string),
            hub_operator_id: node.opt_parse("HubOperatorID")?,
            hub_provider_id: node.opt_parse("HubProviderID")?,
        })
    }
}

impl OicpMessage for GetChargeDetailRecords {
    const ELEMENT: &'static str = "eRoamingGetChargeDetailRecords";
    const NAMESPACE: &'static str = namespaces::AUTHORIZATION;

    fn to_node(&self) -> XmlNode {
        XmlNode::new(Self::ELEMENT)
            .text_child("ProviderID", &self.provider_id)
            .child(timestamp_node("From", &self.from))
            .child(timestamp_node("To", &self.to))
    }

    fn from_node(node: &XmlNode) -> Result<Self, CodecError> {
        Ok(Self {
            provider_id: node.require_parse("ProviderID")?,
            from: require_timestamp(node, "From")?,
            to: require_timestamp(node, "To")?,
        })
    }
}

impl OicpMessage for ChargeDetailRecords {
    const ELEMENT: &'static str = "eRoamingChargeDetailRecords";
    const NAMESPACE: &'static str = namespaces::AUTHORIZATION;

    fn to_node(&self) -> XmlNode {
        XmlNode::new(Self::ELEMENT).children(self.records.iter().map(ChargeDetailRecord::to_node))
    }

    fn from_node(node: &XmlNode) -> Result<Self, CodecError> {
        let records = node
            .find_all(ChargeDetailRecord::ELEMENT)
            .map(ChargeDetailRecord::from_node)
            .collect::<Result<_, _>>()?;
        Ok(Self { records })
    }
}
