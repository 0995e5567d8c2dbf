//! SOAP envelope wrapping and unwrapping

use oicp_core::{StatusCode, StatusCodes};

use crate::common::{status_code_from_node, status_code_node};
use crate::error::CodecError;
use crate::node::XmlNode;

pub const SOAP_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Protocol-level fault carried in the SOAP body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapFault {
    pub fault_code: String,
    pub fault_string: String,
    /// Status code from the fault detail, when the sender supplied one
    pub status: Option<StatusCode>,
}

impl SoapFault {
    pub fn new(fault_code: impl Into<String>, fault_string: impl Into<String>) -> Self {
        Self {
            fault_code: fault_code.into(),
            fault_string: fault_string.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Status reported to callers; falls back to a data error carrying
    /// the fault string
    pub fn status_code(&self) -> StatusCode {
        match &self.status {
            Some(status) => status.clone(),
            None => StatusCode::new(StatusCodes::DataError)
                .with_additional_info(self.fault_string.clone()),
        }
    }

    fn to_node(&self) -> XmlNode {
        let detail = self
            .status
            .as_ref()
            .map(|status| XmlNode::new("detail").child(status_code_node(status)));
        XmlNode::new("soapenv:Fault")
            .text_child("faultcode", &self.fault_code)
            .text_child("faultstring", &self.fault_string)
            .opt_child(detail)
    }

    fn from_node(node: &XmlNode) -> Result<Self, CodecError> {
        let status = match node.find("detail").and_then(|d| d.find("StatusCode")) {
            Some(status) => Some(status_code_from_node(status)?),
            None => None,
        };
        Ok(Self {
            fault_code: node.opt_text("faultcode").unwrap_or_default().to_string(),
            fault_string: node.opt_text("faultstring").unwrap_or_default().to_string(),
            status,
        })
    }
}

/// Content of an envelope body
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Fault(SoapFault),
    Elements(Vec<XmlNode>),
}

impl Body {
    /// The single body element, which must be one of `allowed`
    pub fn single(self, allowed: &[&str]) -> Result<XmlNode, CodecError> {
        let elements = match self {
            Body::Fault(fault) => {
                return Err(CodecError::UnexpectedRoot {
                    expected: allowed.join("|"),
                    found: format!("Fault ({})", fault.fault_string),
                })
            }
            Body::Elements(elements) => elements,
        };

        let mut iter = elements.into_iter();
        let first = iter.next().ok_or(CodecError::NoRoot)?;
        if iter.next().is_some() {
            return Err(CodecError::MultipleRoots);
        }
        if !allowed.contains(&first.name.as_str()) {
            return Err(CodecError::UnexpectedRoot {
                expected: allowed.join("|"),
                found: first.name,
            });
        }
        Ok(first)
    }
}

fn envelope(body: XmlNode) -> String {
    let envelope = XmlNode::new("soapenv:Envelope")
        .attr("xmlns:soapenv", SOAP_NAMESPACE)
        .child(XmlNode::new("soapenv:Header"))
        .child(XmlNode::new("soapenv:Body").child(body));
    format!("{}{}", XML_DECLARATION, envelope.to_xml())
}

/// Wrap one message element in a SOAP envelope
pub fn wrap(message: XmlNode) -> String {
    envelope(message)
}

pub fn wrap_fault(fault: &SoapFault) -> String {
    envelope(fault.to_node())
}

/// Parse an envelope and classify its body
pub fn open(input: &str) -> Result<Body, CodecError> {
    let root = XmlNode::parse(input)?;
    if root.name != "Envelope" {
        return Err(CodecError::UnexpectedRoot {
            expected: "Envelope".into(),
            found: root.name,
        });
    }

    let body = root.require("Body")?;
    if let Some(fault) = body.find("Fault") {
        return SoapFault::from_node(fault).map(Body::Fault);
    }
    Ok(Body::Elements(body.children.clone()))
}
