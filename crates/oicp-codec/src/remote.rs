//! Remote start/stop and reservation commands

use oicp_core::{
    Identification, RemoteCommand, RemoteStart, RemoteStop, ReservationStart, ReservationStop,
};

use crate::common::{identification_node, require_identification};
use crate::envelope;
use crate::error::CodecError;
use crate::message::{namespaces, OicpMessage};
use crate::node::XmlNode;

impl OicpMessage for RemoteStart {
    const ELEMENT: &'static str = "eRoamingAuthorizeRemoteStart";
    const NAMESPACE: &'static str = namespaces::AUTHORIZATION;

    fn to_node(&self) -> XmlNode {
        XmlNode::new(Self::ELEMENT)
            .text_child("SessionID", &self.session_id)
            .opt_text_child("PartnerSessionID", self.partner_session_id.as_ref())
            .text_child("ProviderID", &self.provider_id)
            .text_child("EVSEID", &self.evse_id)
            .child(identification_node(&self.identification))
            .opt_text_child("PartnerProductID", self.partner_product_id.as_ref())
    }

    fn from_node(node: &XmlNode) -> Result<Self, CodecError> {
        let identification = require_identification(node)?;
        let rejected = match &identification {
            Identification::Remote { .. } | Identification::QrCode { .. } => None,
            Identification::RfidMifare { .. } => Some("RFIDmifarefamilyIdentification"),
            Identification::PlugAndCharge { .. } => Some("PlugAndChargeIdentification"),
        };
        if let Some(variant) = rejected {
            return Err(CodecError::invalid(
                "Identification",
                variant,
                "remote start takes RemoteIdentification or QRCodeIdentification",
            ));
        }

        Ok(Self {
            session_id: node.require_parse("SessionID")?,
            partner_session_id: node.opt_parse("PartnerSessionID")?,
            provider_id: node.require_parse("ProviderID")?,
            evse_id: node.require_parse("EVSEID")?,
            identification,
            partner_product_id: node.opt_parse("PartnerProductID")?,
        })
    }
}

impl OicpMessage for RemoteStop {
    const ELEMENT: &'static str = "eRoamingAuthorizeRemoteStop";
    const NAMESPACE: &'static str = namespaces::AUTHORIZATION;

    fn to_node(&self) -> XmlNode {
        XmlNode::new(Self::ELEMENT)
            .text_child("SessionID", &self.session_id)
            .opt_text_child("PartnerSessionID", self.partner_session_id.as_ref())
            .text_child("ProviderID", &self.provider_id)
            .text_child("EVSEID", &self.evse_id)
    }

    fn from_node(node: &XmlNode) -> Result<Self, CodecError> {
        Ok(Self {
            session_id: node.require_parse("SessionID")?,
            partner_session_id: node.opt_parse("PartnerSessionID")?,
            provider_id: node.require_parse("ProviderID")?,
            evse_id: node.require_parse("EVSEID")?,
        })
    }
}

impl OicpMessage for ReservationStart {
    const ELEMENT: &'static str = "eRoamingAuthorizeRemoteReservationStart";
    const NAMESPACE: &'static str = namespaces::RESERVATION;

    fn to_node(&self) -> XmlNode {
        XmlNode::new(Self::ELEMENT)
            .opt_text_child("SessionID", self.session_id.as_ref())
            .opt_text_child("PartnerSessionID", self.partner_session_id.as_ref())
            .text_child("ProviderID", &self.provider_id)
            .text_child("EVSEID", &self.evse_id)
            .child(identification_node(&self.identification))
            .opt_text_child("PartnerProductID", self.partner_product_id.as_ref())
            .opt_text_child("Duration", self.duration_minutes)
    }

    fn from_node(node: &XmlNode) -> Result<Self, CodecError> {
        Ok(Self {
            session_id: node.opt_parse("SessionID")?,
            partner_session_id: node.opt_parse("PartnerSessionID")?,
            provider_id: node.require_parse("ProviderID")?,
            evse_id: node.require_parse("EVSEID")?,
            identification: require_identification(node)?,
            partner_product_id: node.opt_parse("PartnerProductID")?,
            duration_minutes: node.opt_parse("Duration")?,
        })
    }
}

impl OicpMessage for ReservationStop {
    const ELEMENT: &'static str = "eRoamingAuthorizeRemoteReservationStop";
    const NAMESPACE: &'static str = namespaces::RESERVATION;

    fn to_node(&self) -> XmlNode {
        XmlNode::new(Self::ELEMENT)
            .text_child("SessionID", &self.session_id)
            .opt_text_child("PartnerSessionID", self.partner_session_id.as_ref())
            .text_child("ProviderID", &self.provider_id)
            .text_child("EVSEID", &self.evse_id)
    }

    fn from_node(node: &XmlNode) -> Result<Self, CodecError> {
        Ok(Self {
            session_id: node.require_parse("SessionID")?,
            partner_session_id: node.opt_parse("PartnerSessionID")?,
            provider_id: node.require_parse("ProviderID")?,
            evse_id: node.require_parse("EVSEID")?,
        })
    }
}

/// Body elements accepted on the inbound remote-command endpoint
pub const REMOTE_COMMAND_ELEMENTS: [&str; 4] = [
    RemoteStart::ELEMENT,
    RemoteStop::ELEMENT,
    ReservationStart::ELEMENT,
    ReservationStop::ELEMENT,
];

/// Parse an inbound envelope carrying exactly one remote command
pub fn decode_remote_command(input: &str) -> Result<RemoteCommand, CodecError> {
    let node = envelope::open(input)?.single(&REMOTE_COMMAND_ELEMENTS)?;
    let name = node.name.as_str();
    if name == RemoteStart::ELEMENT {
        RemoteStart::from_node(&node).map(RemoteCommand::Start)
    } else if name == RemoteStop::ELEMENT {
        RemoteStop::from_node(&node).map(RemoteCommand::Stop)
    } else if name == ReservationStart::ELEMENT {
        ReservationStart::from_node(&node).map(RemoteCommand::ReservationStart)
    } else {
        ReservationStop::from_node(&node).map(RemoteCommand::ReservationStop)
    }
}

/// Encode a remote command as an outbound request envelope
pub fn encode_remote_command(command: &RemoteCommand) -> String {
    match command {
        RemoteCommand::Start(c) => crate::message::encode(c),
        RemoteCommand::Stop(c) => crate::message::encode(c),
        RemoteCommand::ReservationStart(c) => crate::message::encode(c),
        RemoteCommand::ReservationStop(c) => crate::message::encode(c),
    }
}
