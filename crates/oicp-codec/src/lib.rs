//! oicp-codec - XML envelope codec for OICP messages
//!
//! Every OICP operation is one request/response pair sharing the same
//! shape: a SOAP envelope whose body holds a single named element with
//! ordered, optionally-absent children. This crate implements
//! [`OicpMessage`] for every message model of `oicp-core`.
//!
//! # Usage
//!
//! ```ignore
//! use oicp_codec::{decode, encode, Decoded};
//! use oicp_core::{AuthorizeStart, AuthorizationStart};
//!
//! let body = encode(&request);
//! match decode::<AuthorizationStart>(&response_text)? {
//!     Decoded::Message(response) => { /* ... */ }
//!     Decoded::Fault(fault) => { /* ... */ }
//! }
//! ```
//!
//! Absent optional values never produce an element, not even an empty one.
//! Unknown elements in received messages are ignored.

mod authorization;
mod cdr;
pub mod common;
pub mod envelope;
pub mod error;
mod evse;
pub mod message;
pub mod node;
pub mod remote;

pub use envelope::{Body, SoapFault};
pub use error::CodecError;
pub use message::{decode, decode_request, encode, namespaces, Decoded, OicpMessage};
pub use node::XmlNode;
pub use remote::{decode_remote_command, encode_remote_command, REMOTE_COMMAND_ELEMENTS};

/// Content type of every request and response
pub const CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// HTTP header carrying the per-call event tracking id
pub const EVENT_TRACKING_HEADER: &str = "X-Event-Tracking-Id";
