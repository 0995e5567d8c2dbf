//! Codec error types

use thiserror::Error;

/// Errors raised while encoding or decoding an OICP envelope
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The input is not well-formed XML
    #[error("malformed XML: {0}")]
    Xml(String),

    /// A required element is absent
    #[error("missing required field '{0}'")]
    MissingField(String),

    /// An element is present but its content does not parse
    #[error("invalid value '{value}' for field '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// The body carries a different message than expected
    #[error("expected root element '{expected}', found '{found}'")]
    UnexpectedRoot { expected: String, found: String },

    /// More than one message element where exactly one is allowed
    #[error("more than one root element")]
    MultipleRoots,

    /// No message element at all
    #[error("no root element")]
    NoRoot,
}

impl CodecError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    pub fn invalid(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl std::fmt::Display,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<quick_xml::Error> for CodecError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for CodecError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(err.to_string())
    }
}
