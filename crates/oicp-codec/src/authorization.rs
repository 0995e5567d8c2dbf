//! Authorization and authentication data messages

use oicp_core::{
    AuthorizationStart, AuthorizationStop, AuthorizeStart, AuthorizeStop, PushAuthenticationData,
};

use crate::common::{
    identification_from_node, identification_node, require_identification, status_code_from_node,
    status_code_node,
};
use crate::error::CodecError;
use crate::message::{namespaces, OicpMessage};
use crate::node::XmlNode;

impl OicpMessage for AuthorizeStart {
    const ELEMENT: &'static str = "eRoamingAuthorizeStart";
    const NAMESPACE: &'static str = namespaces::AUTHORIZATION;

    fn to_node(&self) -> XmlNode {
        XmlNode::new(Self::ELEMENT)
            .text_child("OperatorID", &self.operator_id)
            .child(identification_node(&self.identification))
            .opt_text_child("EVSEID", self.evse_id.as_ref())
            .opt_text_child("SessionID", self.session_id.as_ref())
            .opt_text_child("PartnerProductID", self.partner_product_id.as_ref())
            .opt_text_child("PartnerSessionID", self.partner_session_id.as_ref())
    }

    fn from_node(node: &XmlNode) -> Result<Self, CodecError> {
        Ok(Self {
            operator_id: node.require_parse("OperatorID")?,
            identification: require_identification(node)?,
            evse_id: node.opt_parse("EVSEID")?,
            session_id: node.opt_parse("SessionID")?,
            partner_product_id: node.opt_parse("PartnerProductID")?,
            partner_session_id: node.opt_parse("PartnerSessionID")?,
        })
    }
}

impl OicpMessage for AuthorizationStart {
    const ELEMENT: &'static str = "eRoamingAuthorizationStart";
    const NAMESPACE: &'static str = namespaces::AUTHORIZATION;

    fn to_node(&self) -> XmlNode {
        let stop_identifications = (!self.stop_identifications.is_empty()).then(|| {
            XmlNode::new("AuthorizationStopIdentifications")
                .children(self.stop_identifications.iter().map(identification_node))
        });

        XmlNode::new(Self::ELEMENT)
            .opt_text_child("SessionID", self.session_id.as_ref())
            .opt_text_child("PartnerSessionID", self.partner_session_id.as_ref())
            .opt_text_child("ProviderID", self.provider_id.as_ref())
            .text_child("AuthorizationStatus", self.status)
            .child(status_code_node(&self.status_code))
            .opt_child(stop_identifications)
    }

    fn from_node(node: &XmlNode) -> Result<Self, CodecError> {
        let stop_identifications: Vec<_> = match node.find("AuthorizationStopIdentifications") {
            Some(list) => list
                .find_all("Identification")
                .map(identification_from_node)
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            session_id: node.opt_parse("SessionID")?,
            partner_session_id: node.opt_parse("PartnerSessionID")?,
            provider_id: node.opt_parse("ProviderID")?,
            status: node.require_parse("AuthorizationStatus")?,
            status_code: status_code_from_node(node.require("StatusCode")?)?,
            stop_identifications,
        })
    }
}

impl OicpMessage for AuthorizeStop {
    const ELEMENT: &'static str = "eRoamingAuthorizeStop";
    const NAMESPACE: &'static str = namespaces::AUTHORIZATION;

    fn to_node(&self) -> XmlNode {
        XmlNode::new(Self::ELEMENT)
            .text_child("OperatorID", &self.operator_id)
            .text_child("SessionID", &self.session_id)
            .child(identification_node(&self.identification))
            .opt_text_child("EVSEID", self.evse_id.as_ref())
            .opt_text_child("PartnerSessionID", self.partner_session_id.as_ref())
    }

    fn from_node(node: &XmlNode) -> Result<Self, CodecError> {
        Ok(Self {
            operator_id: node.require_parse("OperatorID")?,
            session_id: node.require_parse("SessionID")?,
            identification: require_identification(node)?,
            evse_id: node.opt_parse("EVSEID")?,
            partner_session_id: node.opt_parse("PartnerSessionID")?,
        })
    }
}

impl OicpMessage for AuthorizationStop {
    const ELEMENT: &'static str = "eRoamingAuthorizationStop";
    const NAMESPACE: &'static str = namespaces::AUTHORIZATION;

    fn to_node(&self) -> XmlNode {
        XmlNode::new(Self::ELEMENT)
            .opt_text_child("SessionID", self.session_id.as_ref())
            .opt_text_child("PartnerSessionID", self.partner_session_id.as_ref())
            .opt_text_child("ProviderID", self.provider_id.as_ref())
            .text_child("AuthorizationStatus", self.status)
            .child(status_code_node(&self.status_code))
    }

    fn from_node(node: &XmlNode) -> Result<Self, CodecError> {
        Ok(Self {
            session_id: node.opt_parse("SessionID")?,
            partner_session_id: node.opt_parse("PartnerSessionID")?,
            provider_id: node.opt_parse("ProviderID")?,
            status: node.require_parse("AuthorizationStatus")?,
            status_code: status_code_from_node(node.require("StatusCode")?)?,
        })
    }
}

impl OicpMessage for PushAuthenticationData {
    const ELEMENT: &'static str = "eRoamingPushAuthenticationData";
    const NAMESPACE: &'static str = namespaces::AUTHENTICATION_DATA;

    fn to_node(&self) -> XmlNode {
        let records = self.identifications.iter().map(|identification| {
            XmlNode::new("AuthenticationDataRecord").child(identification_node(identification))
        });

        XmlNode::new(Self::ELEMENT)
            .text_child("ActionType", self.action)
            .child(
                XmlNode::new("ProviderAuthenticationData")
                    .text_child("ProviderID", &self.provider_id)
                    .children(records),
            )
    }

    fn from_node(node: &XmlNode) -> Result<Self, CodecError> {
        let data = node.require("ProviderAuthenticationData")?;
        let identifications = data
            .find_all("AuthenticationDataRecord")
            .map(require_identification)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            action: node.require_parse("ActionType")?,
            provider_id: data.require_parse("ProviderID")?,
            identifications,
        })
    }
}
