//! The encode/decode pair every OICP message implements

use crate::envelope::{self, Body, SoapFault};
use crate::error::CodecError;
use crate::node::XmlNode;

pub mod namespaces {
    pub const COMMON_TYPES: &str = "http://www.hubject.com/b2b/services/commontypes/v2.0";
    pub const AUTHORIZATION: &str = "http://www.hubject.com/b2b/services/authorization/v2.0";
    pub const EVSE_DATA: &str = "http://www.hubject.com/b2b/services/evsedata/v2.0";
    pub const EVSE_STATUS: &str = "http://www.hubject.com/b2b/services/evsestatus/v2.0";
    pub const EVSE_SEARCH: &str = "http://www.hubject.com/b2b/services/evsesearch/v2.0";
    pub const AUTHENTICATION_DATA: &str =
        "http://www.hubject.com/b2b/services/authenticationdata/v2.0";
    pub const RESERVATION: &str = "http://www.hubject.com/b2b/services/reservation/v1.0";
}

/// A message that travels as the single element of a SOAP body
///
/// `to_node` emits child elements in wire order and omits every absent
/// optional field. `from_node` fails on missing required fields and
/// ignores elements it does not know.
pub trait OicpMessage: Sized {
    const ELEMENT: &'static str;
    const NAMESPACE: &'static str;

    fn to_node(&self) -> XmlNode;

    fn from_node(node: &XmlNode) -> Result<Self, CodecError>;
}

/// A decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<M> {
    Message(M),
    Fault(SoapFault),
}

/// Encode a message as a complete SOAP envelope
pub fn encode<M: OicpMessage>(message: &M) -> String {
    envelope::wrap(message.to_node().attr("xmlns", M::NAMESPACE))
}

/// Decode a response envelope expected to carry `M` or a SOAP fault
pub fn decode<M: OicpMessage>(input: &str) -> Result<Decoded<M>, CodecError> {
    match envelope::open(input)? {
        Body::Fault(fault) => Ok(Decoded::Fault(fault)),
        Body::Elements(elements) => {
            let node = elements
                .iter()
                .find(|e| e.name == M::ELEMENT)
                .ok_or_else(|| match elements.first() {
                    Some(other) => CodecError::UnexpectedRoot {
                        expected: M::ELEMENT.to_string(),
                        found: other.name.clone(),
                    },
                    None => CodecError::NoRoot,
                })?;
            M::from_node(node).map(Decoded::Message)
        }
    }
}

/// Decode an inbound request envelope that must carry exactly one `M`
pub fn decode_request<M: OicpMessage>(input: &str) -> Result<M, CodecError> {
    let node = envelope::open(input)?.single(&[M::ELEMENT])?;
    M::from_node(&node)
}
