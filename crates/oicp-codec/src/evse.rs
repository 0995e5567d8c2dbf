//! EVSE data, status and search messages

use oicp_core::{
    Address, EvseDataRecord, EvseDataResponse, EvseId, EvseMatch, EvseSearchResult,
    EvseStatusByIdResponse, EvseStatusRecord, EvseStatusResponse, OperatorEvseData,
    OperatorEvseStatus, PullEvseData, PullEvseStatus, PullEvseStatusById, PushEvseData,
    PushEvseStatus, SearchEvse,
};

use crate::common::{
    format_timestamp, geo_from_node, geo_node, opt_search_center, opt_status_code, opt_timestamp,
    search_center_node, status_code_node,
};
use crate::error::CodecError;
use crate::message::{namespaces, OicpMessage};
use crate::node::XmlNode;

// =============================================================================
// Records
// =============================================================================

fn status_record_node(record: &EvseStatusRecord) -> XmlNode {
    XmlNode::new("EvseStatusRecord")
        .text_child("EvseID", &record.evse_id)
        .text_child("EvseStatus", record.status)
}

fn status_record_from_node(node: &XmlNode) -> Result<EvseStatusRecord, CodecError> {
    Ok(EvseStatusRecord {
        evse_id: node.require_parse("EvseID")?,
        status: node.require_parse("EvseStatus")?,
    })
}

fn operator_status_node(operator: &OperatorEvseStatus) -> XmlNode {
    XmlNode::new("OperatorEvseStatus")
        .text_child("OperatorID", &operator.operator_id)
        .opt_text_child("OperatorName", operator.operator_name.as_deref())
        .children(operator.records.iter().map(status_record_node))
}

fn operator_status_from_node(node: &XmlNode) -> Result<OperatorEvseStatus, CodecError> {
    Ok(OperatorEvseStatus {
        operator_id: node.require_parse("OperatorID")?,
        operator_name: node.opt_text("OperatorName").map(str::to_string),
        records: node
            .find_all("EvseStatusRecord")
            .map(status_record_from_node)
            .collect::<Result<_, _>>()?,
    })
}

fn address_node(address: &Address) -> XmlNode {
    XmlNode::new("Address")
        .text_child("Country", &address.country)
        .text_child("City", &address.city)
        .text_child("Street", &address.street)
        .opt_text_child("PostalCode", address.postal_code.as_deref())
        .opt_text_child("HouseNum", address.house_number.as_deref())
}

fn address_from_node(node: &XmlNode) -> Result<Address, CodecError> {
    Ok(Address {
        country: node.require_text("Country")?.to_string(),
        city: node.require_text("City")?.to_string(),
        street: node.require_text("Street")?.to_string(),
        postal_code: node.opt_text("PostalCode").map(str::to_string),
        house_number: node.opt_text("HouseNum").map(str::to_string),
    })
}

fn data_record_node(record: &EvseDataRecord) -> XmlNode {
    XmlNode::new("EvseDataRecord")
        .text_child("EvseID", &record.evse_id)
        .opt_text_child("ChargingStationID", record.charging_station_id.as_deref())
        .opt_text_child("ChargingStationName", record.charging_station_name.as_deref())
        .child(address_node(&record.address))
        .child(geo_node(&record.coordinates))
        .child(
            XmlNode::new("Plugs").children(record.plugs.iter().map(|p| XmlNode::leaf("Plug", p))),
        )
        .child(XmlNode::new("AuthenticationModes").children(
            record
                .authentication_modes
                .iter()
                .map(|m| XmlNode::leaf("AuthenticationMode", m)),
        ))
        .opt_text_child("HotlinePhoneNum", record.hotline_phone_number.as_deref())
        .text_child("IsOpen24Hours", record.is_open_24_hours)
}

fn texts(parent: &XmlNode, list: &str, item: &str) -> Vec<String> {
    parent
        .find(list)
        .map(|list| list.find_all(item).map(|n| n.text().to_string()).collect())
        .unwrap_or_default()
}

fn data_record_from_node(node: &XmlNode) -> Result<EvseDataRecord, CodecError> {
    Ok(EvseDataRecord {
        evse_id: node.require_parse("EvseID")?,
        charging_station_id: node.opt_text("ChargingStationID").map(str::to_string),
        charging_station_name: node.opt_text("ChargingStationName").map(str::to_string),
        address: address_from_node(node.require("Address")?)?,
        coordinates: geo_from_node(node.require("GeoCoordinates")?)?,
        plugs: texts(node, "Plugs", "Plug"),
        authentication_modes: texts(node, "AuthenticationModes", "AuthenticationMode"),
        hotline_phone_number: node.opt_text("HotlinePhoneNum").map(str::to_string),
        is_open_24_hours: node.require_parse("IsOpen24Hours")?,
    })
}

fn operator_data_node(operator: &OperatorEvseData) -> XmlNode {
    XmlNode::new("OperatorEvseData")
        .text_child("OperatorID", &operator.operator_id)
        .text_child("OperatorName", &operator.operator_name)
        .children(operator.records.iter().map(data_record_node))
}

fn operator_data_from_node(node: &XmlNode) -> Result<OperatorEvseData, CodecError> {
    Ok(OperatorEvseData {
        operator_id: node.require_parse("OperatorID")?,
        operator_name: node.require_text("OperatorName")?.to_string(),
        records: node
            .find_all("EvseDataRecord")
            .map(data_record_from_node)
            .collect::<Result<_, _>>()?,
    })
}

// =============================================================================
// Push
// =============================================================================

impl OicpMessage for PushEvseStatus {
    const ELEMENT: &'static str = "eRoamingPushEvseStatus";
    const NAMESPACE: &'static str = namespaces::EVSE_STATUS;

    fn to_node(&self) -> XmlNode {
        XmlNode::new(Self::ELEMENT)
            .text_child("ActionType", self.action)
            .child(operator_status_node(&self.operator))
    }

    fn from_node(node: &XmlNode) -> Result<Self, CodecError> {
        Ok(Self {
            action: node.require_parse("ActionType")?,
            operator: operator_status_from_node(node.require("OperatorEvseStatus")?)?,
        })
    }
}

impl OicpMessage for PushEvseData {
    const ELEMENT: &'static str = "eRoamingPushEvseData";
    const NAMESPACE: &'static str = namespaces::EVSE_DATA;

    fn to_node(&self) -> XmlNode {
        XmlNode::new(Self::ELEMENT)
            .text_child("ActionType", self.action)
            .child(operator_data_node(&self.operator))
    }

    fn from_node(node: &XmlNode) -> Result<Self, CodecError> {
        Ok(Self {
            action: node.require_parse("ActionType")?,
            operator: operator_data_from_node(node.require("OperatorEvseData")?)?,
        })
    }
}

// =============================================================================
// Pull
// =============================================================================

impl OicpMessage for PullEvseData {
    const ELEMENT: &'static str = "eRoamingPullEvseData";
    const NAMESPACE: &'static str = namespaces::EVSE_DATA;

    fn to_node(&self) -> XmlNode {
        XmlNode::new(Self::ELEMENT)
            .text_child("ProviderID", &self.provider_id)
            .opt_child(self.search_center.as_ref().map(search_center_node))
            .opt_text_child("LastCall", self.last_call.as_ref().map(format_timestamp))
    }

    fn from_node(node: &XmlNode) -> Result<Self, CodecError> {
        Ok(Self {
            provider_id: node.require_parse("ProviderID")?,
            search_center: opt_search_center(node)?,
            last_call: opt_timestamp(node, "LastCall")?,
        })
    }
}

impl OicpMessage for EvseDataResponse {
    const ELEMENT: &'static str = "eRoamingEvseData";
    const NAMESPACE: &'static str = namespaces::EVSE_DATA;

    fn to_node(&self) -> XmlNode {
        XmlNode::new(Self::ELEMENT)
            .child(XmlNode::new("EvseData").children(self.operators.iter().map(operator_data_node)))
            .opt_child(self.status_code.as_ref().map(status_code_node))
    }

    fn from_node(node: &XmlNode) -> Result<Self, CodecError> {
        let operators = node
            .require("EvseData")?
            .find_all("OperatorEvseData")
            .map(operator_data_from_node)
            .collect::<Result<_, _>>()?;
        Ok(Self {
            operators,
            status_code: opt_status_code(node)?,
        })
    }
}

impl OicpMessage for PullEvseStatus {
    const ELEMENT: &'static str = "eRoamingPullEvseStatus";
    const NAMESPACE: &'static str = namespaces::EVSE_STATUS;

    fn to_node(&self) -> XmlNode {
        XmlNode::new(Self::ELEMENT)
            .text_child("ProviderID", &self.provider_id)
            .opt_child(self.search_center.as_ref().map(search_center_node))
            .opt_text_child("EvseStatus", self.status_filter)
    }

    fn from_node(node: &XmlNode) -> Result<Self, CodecError> {
        Ok(Self {
            provider_id: node.require_parse("ProviderID")?,
            search_center: opt_search_center(node)?,
            status_filter: node.opt_parse("EvseStatus")?,
        })
    }
}

impl OicpMessage for EvseStatusResponse {
    const ELEMENT: &'static str = "eRoamingEvseStatus";
    const NAMESPACE: &'static str = namespaces::EVSE_STATUS;

    fn to_node(&self) -> XmlNode {
        XmlNode::new(Self::ELEMENT)
            .child(
                XmlNode::new("EvseStatuses")
                    .children(self.operators.iter().map(operator_status_node)),
            )
            .opt_child(self.status_code.as_ref().map(status_code_node))
    }

    fn from_node(node: &XmlNode) -> Result<Self, CodecError> {
        let operators = node
            .require("EvseStatuses")?
            .find_all("OperatorEvseStatus")
            .map(operator_status_from_node)
            .collect::<Result<_, _>>()?;
        Ok(Self {
            operators,
            status_code: opt_status_code(node)?,
        })
    }
}

impl OicpMessage for PullEvseStatusById {
    const ELEMENT: &'static str = "eRoamingPullEvseStatusById";
    const NAMESPACE: &'static str = namespaces::EVSE_STATUS;

    fn to_node(&self) -> XmlNode {
        XmlNode::new(Self::ELEMENT)
            .text_child("ProviderID", &self.provider_id)
            .children(self.evse_ids.iter().map(|id| XmlNode::leaf("EvseID", id)))
    }

    fn from_node(node: &XmlNode) -> Result<Self, CodecError> {
        let evse_ids = node
            .find_all("EvseID")
            .map(|n| {
                n.text()
                    .parse::<EvseId>()
                    .map_err(|e| CodecError::invalid("EvseID", n.text(), e))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self {
            provider_id: node.require_parse("ProviderID")?,
            evse_ids,
        })
    }
}

impl OicpMessage for EvseStatusByIdResponse {
    const ELEMENT: &'static str = "eRoamingEvseStatusById";
    const NAMESPACE: &'static str = namespaces::EVSE_STATUS;

    fn to_node(&self) -> XmlNode {
        XmlNode::new(Self::ELEMENT)
            .child(
                XmlNode::new("EvseStatusRecords")
                    .children(self.records.iter().map(status_record_node)),
            )
            .opt_child(self.status_code.as_ref().map(status_code_node))
    }

    fn from_node(node: &XmlNode) -> Result<Self, CodecError> {
        let records = node
            .require("EvseStatusRecords")?
            .find_all("EvseStatusRecord")
            .map(status_record_from_node)
            .collect::<Result<_, _>>()?;
        Ok(Self {
            records,
            status_code: opt_status_code(node)?,
        })
    }
}

// =============================================================================
// Search
// =============================================================================

impl OicpMessage for SearchEvse {
    const ELEMENT: &'static str = "eRoamingSearchEvse";
    const NAMESPACE: &'static str = namespaces::EVSE_SEARCH;

    fn to_node(&self) -> XmlNode {
        XmlNode::new(Self::ELEMENT)
            .text_child("ProviderID", &self.provider_id)
            .opt_child(self.search_center.as_ref().map(search_center_node))
            .children(self.plugs.iter().map(|p| XmlNode::leaf("Plug", p)))
    }

    fn from_node(node: &XmlNode) -> Result<Self, CodecError> {
        Ok(Self {
            provider_id: node.require_parse("ProviderID")?,
            search_center: opt_search_center(node)?,
            plugs: node.find_all("Plug").map(|n| n.text().to_string()).collect(),
        })
    }
}

impl OicpMessage for EvseSearchResult {
    const ELEMENT: &'static str = "eRoamingEvseSearchResult";
    const NAMESPACE: &'static str = namespaces::EVSE_SEARCH;

    fn to_node(&self) -> XmlNode {
        let matches = self.matches.iter().map(|m| {
            XmlNode::new("EvseMatch")
                .opt_text_child("Distance", m.distance_km)
                .child(data_record_node(&m.record))
        });
        XmlNode::new(Self::ELEMENT)
            .child(XmlNode::new("EvseMatches").children(matches))
            .opt_child(self.status_code.as_ref().map(status_code_node))
    }

    fn from_node(node: &XmlNode) -> Result<Self, CodecError> {
        let matches = node
            .require("EvseMatches")?
            .find_all("EvseMatch")
            .map(|m| -> Result<EvseMatch, CodecError> {
                Ok(EvseMatch {
                    distance_km: m.opt_parse("Distance")?,
                    record: data_record_from_node(m.require("EvseDataRecord")?)?,
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self {
            matches,
            status_code: opt_status_code(node)?,
        })
    }
}
