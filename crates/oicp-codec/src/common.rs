//! Building blocks shared by several messages

use chrono::{DateTime, SecondsFormat, Utc};
use oicp_core::{
    Acknowledgement, AuthToken, EvcoId, GeoCoordinates, Identification, SearchCenter, StatusCode,
    StatusCodes,
};

use crate::error::CodecError;
use crate::message::{namespaces, OicpMessage};
use crate::node::XmlNode;

// =============================================================================
// StatusCode
// =============================================================================

pub fn status_code_node(status: &StatusCode) -> XmlNode {
    XmlNode::new("StatusCode")
        .text_child("Code", status.code)
        .opt_text_child("Description", status.description.as_deref())
        .opt_text_child("AdditionalInfo", status.additional_info.as_deref())
}

pub fn status_code_from_node(node: &XmlNode) -> Result<StatusCode, CodecError> {
    let raw = node.require_text("Code")?;
    let code = StatusCodes::parse_wire(raw)
        .ok_or_else(|| CodecError::invalid("Code", raw, "not a numeric status code"))?;
    Ok(StatusCode {
        code,
        description: node.opt_text("Description").map(str::to_string),
        additional_info: node.opt_text("AdditionalInfo").map(str::to_string),
    })
}

pub fn opt_status_code(parent: &XmlNode) -> Result<Option<StatusCode>, CodecError> {
    parent.find("StatusCode").map(status_code_from_node).transpose()
}

// =============================================================================
// Identification
// =============================================================================

const RFID: &str = "RFIDmifarefamilyIdentification";
const QR_CODE: &str = "QRCodeIdentification";
const PLUG_AND_CHARGE: &str = "PlugAndChargeIdentification";
const REMOTE: &str = "RemoteIdentification";

pub fn identification_node(identification: &Identification) -> XmlNode {
    let variant = match identification {
        Identification::RfidMifare { uid } => XmlNode::new(RFID).text_child("UID", uid),
        Identification::QrCode { evco_id, pin } => XmlNode::new(QR_CODE)
            .text_child("EVCOID", evco_id)
            .opt_text_child("PIN", pin.as_deref()),
        Identification::PlugAndCharge { evco_id } => {
            XmlNode::new(PLUG_AND_CHARGE).text_child("EVCOID", evco_id)
        }
        Identification::Remote { evco_id } => XmlNode::new(REMOTE).text_child("EVCOID", evco_id),
    };
    XmlNode::new("Identification").child(variant)
}

/// Decode an `Identification` element holding exactly one variant
pub fn identification_from_node(node: &XmlNode) -> Result<Identification, CodecError> {
    let mut variants = node
        .children
        .iter()
        .filter(|c| [RFID, QR_CODE, PLUG_AND_CHARGE, REMOTE].contains(&c.name.as_str()));

    let variant = variants
        .next()
        .ok_or_else(|| CodecError::missing("Identification variant"))?;
    if let Some(extra) = variants.next() {
        return Err(CodecError::invalid(
            "Identification",
            extra.name.clone(),
            "more than one identification variant",
        ));
    }

    match variant.name.as_str() {
        RFID => Ok(Identification::RfidMifare {
            uid: variant.require_parse::<AuthToken>("UID")?,
        }),
        QR_CODE => Ok(Identification::QrCode {
            evco_id: variant.require_parse::<EvcoId>("EVCOID")?,
            pin: variant.opt_text("PIN").map(str::to_string),
        }),
        PLUG_AND_CHARGE => Ok(Identification::PlugAndCharge {
            evco_id: variant.require_parse::<EvcoId>("EVCOID")?,
        }),
        _ => Ok(Identification::Remote {
            evco_id: variant.require_parse::<EvcoId>("EVCOID")?,
        }),
    }
}

pub fn require_identification(parent: &XmlNode) -> Result<Identification, CodecError> {
    identification_from_node(parent.require("Identification")?)
}

// =============================================================================
// Timestamps and coordinates
// =============================================================================

pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn parse_timestamp(field: &str, text: &str) -> Result<DateTime<Utc>, CodecError> {
    DateTime::parse_from_rfc3339(text)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| CodecError::invalid(field, text, e))
}

pub fn timestamp_node(name: &str, at: &DateTime<Utc>) -> XmlNode {
    XmlNode::leaf(name, format_timestamp(at))
}

pub fn opt_timestamp_node(name: &str, at: Option<&DateTime<Utc>>) -> Option<XmlNode> {
    at.map(|at| timestamp_node(name, at))
}

pub fn require_timestamp(parent: &XmlNode, name: &str) -> Result<DateTime<Utc>, CodecError> {
    parse_timestamp(name, parent.require_text(name)?)
}

pub fn opt_timestamp(parent: &XmlNode, name: &str) -> Result<Option<DateTime<Utc>>, CodecError> {
    parent
        .opt_text(name)
        .map(|text| parse_timestamp(name, text))
        .transpose()
}

pub fn geo_node(coordinates: &GeoCoordinates) -> XmlNode {
    XmlNode::new("GeoCoordinates").child(
        XmlNode::new("DecimalDegree")
            .text_child("Latitude", coordinates.latitude)
            .text_child("Longitude", coordinates.longitude),
    )
}

pub fn geo_from_node(node: &XmlNode) -> Result<GeoCoordinates, CodecError> {
    let degree = node.require("DecimalDegree")?;
    Ok(GeoCoordinates::new(
        degree.require_parse("Latitude")?,
        degree.require_parse("Longitude")?,
    ))
}

pub fn search_center_node(center: &SearchCenter) -> XmlNode {
    XmlNode::new("SearchCenter")
        .child(geo_node(&center.coordinates))
        .text_child("Radius", center.radius_km)
}

pub fn opt_search_center(parent: &XmlNode) -> Result<Option<SearchCenter>, CodecError> {
    parent
        .find("SearchCenter")
        .map(|center| -> Result<SearchCenter, CodecError> {
            Ok(SearchCenter {
                coordinates: geo_from_node(center.require("GeoCoordinates")?)?,
                radius_km: center.require_parse("Radius")?,
            })
        })
        .transpose()
}

// =============================================================================
// Acknowledgement
// =============================================================================

impl OicpMessage for Acknowledgement {
    const ELEMENT: &'static str = "eRoamingAcknowledgement";
    const NAMESPACE: &'static str = namespaces::COMMON_TYPES;

    fn to_node(&self) -> XmlNode {
        XmlNode::new(Self::ELEMENT)
            .text_child("Result", self.result)
            .child(status_code_node(&self.status_code))
            .opt_text_child("SessionID", self.session_id.as_ref())
            .opt_text_child("PartnerSessionID", self.partner_session_id.as_ref())
    }

    fn from_node(node: &XmlNode) -> Result<Self, CodecError> {
        Ok(Self {
            result: node.require_parse("Result")?,
            status_code: status_code_from_node(node.require("StatusCode")?)?,
            session_id: node.opt_parse("SessionID")?,
            partner_session_id: node.opt_parse("PartnerSessionID")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::message::{decode, encode, Decoded};
    use oicp_core::{PartnerSessionId, SessionId};

    #[test]
    fn test_status_code_omits_absent_parts() {
        let bare = status_code_node(&StatusCode::bare(StatusCodes::Success));
        assert_eq!(bare.to_xml(), "<StatusCode><Code>000</Code></StatusCode>");

        let full = StatusCode::new(StatusCodes::EvseAlreadyInUse).with_additional_info("E1");
        let node = status_code_node(&full);
        assert_eq!(node.opt_text("Description"), Some("EVSE already in use"));
        assert_eq!(status_code_from_node(&node).unwrap(), full);
    }

    #[test]
    fn test_status_code_rejects_garbage() {
        let node = XmlNode::new("StatusCode").text_child("Code", "ok");
        assert!(matches!(
            status_code_from_node(&node),
            Err(CodecError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_identification_variants() {
        let remote = Identification::remote(EvcoId::parse("DE-8EO-CAAA00001-X").unwrap());
        let node = identification_node(&remote);
        assert_eq!(
            node.to_xml(),
            "<Identification><RemoteIdentification><EVCOID>DE-8EO-CAAA00001-X</EVCOID>\
             </RemoteIdentification></Identification>"
        );
        assert_eq!(identification_from_node(&node).unwrap(), remote);

        let qr = Identification::QrCode {
            evco_id: EvcoId::parse("DE*BMW*001234*5").unwrap(),
            pin: None,
        };
        let node = identification_node(&qr);
        assert!(!node.to_xml().contains("PIN"));
        assert_eq!(identification_from_node(&node).unwrap(), qr);
    }

    #[test]
    fn test_identification_needs_exactly_one_variant() {
        let none = XmlNode::new("Identification");
        assert_eq!(
            identification_from_node(&none),
            Err(CodecError::MissingField("Identification variant".into()))
        );

        let two = XmlNode::new("Identification")
            .child(XmlNode::new(RFID).text_child("UID", "AABBCCDD"))
            .child(XmlNode::new(REMOTE).text_child("EVCOID", "DE8EOCAAA00001X"));
        assert!(matches!(
            identification_from_node(&two),
            Err(CodecError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_timestamps_are_utc_rfc3339() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(format_timestamp(&at), "2024-03-01T12:30:00Z");
        let precise = at + chrono::Duration::milliseconds(250);
        assert_eq!(format_timestamp(&precise), "2024-03-01T12:30:00.250Z");
        assert_eq!(
            parse_timestamp("T", &format_timestamp(&precise)).unwrap(),
            precise
        );
        assert_eq!(parse_timestamp("T", "2024-03-01T13:30:00+01:00").unwrap(), at);
        assert!(parse_timestamp("T", "yesterday").is_err());
    }

    #[test]
    fn test_acknowledgement_negative_result() {
        let ack = Acknowledgement::failure(StatusCode::new(StatusCodes::SessionIsInvalid))
            .with_session_id(Some(
                SessionId::parse("8fade8bd-0a88-4c4b-b8a6-2b8d0f5e1d12").unwrap(),
            ));
        let node = ack.to_node();
        assert_eq!(node.require_text("Result").unwrap(), "false");
        assert!(node.find("PartnerSessionID").is_none());
        assert_eq!(Acknowledgement::from_node(&node).unwrap(), ack);
    }

    #[test]
    fn test_acknowledgement_keeps_edge_whitespace() {
        let ack = Acknowledgement::failure(
            StatusCode::new(StatusCodes::DataError).with_additional_info("  detail  "),
        )
        .with_partner_session_id(Some(PartnerSessionId::parse(" emp-1 ").unwrap()));

        let Decoded::Message(back) = decode::<Acknowledgement>(&encode(&ack)).unwrap() else {
            panic!("expected acknowledgement");
        };
        assert_eq!(back, ack);
    }
}
