//! Typed OICP identifiers
//!
//! Each identifier kind has its own textual grammar. A parsed identifier keeps
//! the exact text it was parsed from, so `parse(&id.to_string()) == Ok(id)`
//! holds for every valid value. Validation is purely syntactic.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::IdError;

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal, $pattern:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Human-readable name of this identifier kind
            pub const KIND: &'static str = $kind;

            /// Parse and validate the textual form
            pub fn parse(text: &str) -> Result<Self, IdError> {
                static GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
                    Regex::new($pattern).expect(concat!("grammar for ", $kind))
                });

                if GRAMMAR.is_match(text) {
                    Ok(Self(text.to_string()))
                } else {
                    Err(IdError::new($kind, text))
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

identifier!(
    /// Charge point operator, ISO (`DE*ABC`, `DEABC`) or DIN (`+49*822`) form
    OperatorId,
    "Operator Id",
    r"^(?:[A-Za-z]{2}\*?[A-Za-z0-9]{3}|\+?[0-9]{1,3}\*[0-9]{3})$"
);

identifier!(
    /// e-Mobility provider, e.g. `DE*XYZ` or `DE-XYZ`
    ProviderId,
    "Provider Id",
    r"^[A-Za-z]{2}[*-]?[A-Za-z0-9]{3}$"
);

identifier!(
    /// Operator-prefixed charge point id, e.g. `DE*ABC*E1234567`
    EvseId,
    "EVSE Id",
    r"^(?:[A-Za-z]{2}\*?[A-Za-z0-9]{3}\*?E[A-Za-z0-9*]{1,30}|\+?[0-9]{1,3}\*[0-9]{3}\*[0-9*]{1,32})$"
);

identifier!(
    /// Contract (e-mobility account) id, ISO 15118 or DIN 91286 form
    EvcoId,
    "EVCO Id",
    r"^(?:[A-Za-z]{2}-?[A-Za-z0-9]{3}-?[Cc][A-Za-z0-9]{8}-?[A-Za-z0-9]|[A-Za-z]{2}[*-]?[A-Za-z0-9]{3}[*-]?[A-Za-z0-9]{6}[*-]?[A-Za-z0-9])$"
);

identifier!(
    /// RFID card UID: 4, 7 or 10 bytes as hex
    AuthToken,
    "Auth token",
    r"^(?:[0-9A-Fa-f]{8}|[0-9A-Fa-f]{14}|[0-9A-Fa-f]{20})$"
);

identifier!(
    /// Hub-assigned charging session id (hyphenated UUID shape)
    SessionId,
    "Session Id",
    r"^[A-Za-z0-9]{8}-[A-Za-z0-9]{4}-[A-Za-z0-9]{4}-[A-Za-z0-9]{4}-[A-Za-z0-9]{12}$"
);

identifier!(
    /// Partner-assigned session id, opaque, at most 50 characters
    PartnerSessionId,
    "Partner Session Id",
    r"^[^\r\n]{1,50}$"
);

identifier!(
    /// Partner product (tariff) id, opaque, at most 100 characters
    PartnerProductId,
    "Partner Product Id",
    r"^[^\r\n]{1,100}$"
);

identifier!(
    /// Correlation id attached to every outbound call
    EventTrackingId,
    "Event Tracking Id",
    r"^[A-Za-z0-9]{8}-[A-Za-z0-9]{4}-[A-Za-z0-9]{4}-[A-Za-z0-9]{4}-[A-Za-z0-9]{12}$"
);

impl SessionId {
    /// Generate a fresh random session id
    pub fn new_random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl EventTrackingId {
    /// Generate a fresh random tracking id
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for EventTrackingId {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trips<T>(text: &str)
    where
        T: FromStr<Err = IdError> + fmt::Display + PartialEq + fmt::Debug,
    {
        let parsed: T = text.parse().unwrap();
        assert_eq!(parsed.to_string(), text);
        assert_eq!(parsed.to_string().parse::<T>().unwrap(), parsed);
    }

    #[test]
    fn test_operator_id_grammar() {
        round_trips::<OperatorId>("DE*ABC");
        round_trips::<OperatorId>("DEABC");
        round_trips::<OperatorId>("+49*822");
        assert!(OperatorId::parse("DE*AB").is_err());
        assert!(OperatorId::parse("DE**ABC").is_err());
        assert!(OperatorId::parse("").is_err());
    }

    #[test]
    fn test_provider_id_grammar() {
        round_trips::<ProviderId>("DE*XYZ");
        round_trips::<ProviderId>("DE-XYZ");
        round_trips::<ProviderId>("DEXYZ");
        assert!(ProviderId::parse("D*XYZ").is_err());
        assert!(ProviderId::parse("DE*XYZW").is_err());
    }

    #[test]
    fn test_evse_id_grammar() {
        round_trips::<EvseId>("DE*ABC*E1234567");
        round_trips::<EvseId>("DEABCE1234567*1");
        round_trips::<EvseId>("+49*822*4201*1");
        assert!(EvseId::parse("DE*ABC*1234").is_err());
        assert!(EvseId::parse("DE*ABC*E").is_err());
        assert!(EvseId::parse(" DE*ABC*E1").is_err());
    }

    #[test]
    fn test_evco_id_grammar() {
        round_trips::<EvcoId>("DE-8EO-CAAA00001-X");
        round_trips::<EvcoId>("DE8EOCAAA00001X");
        round_trips::<EvcoId>("DE*BMW*001234*5");
        assert!(EvcoId::parse("DE-8EO").is_err());
    }

    #[test]
    fn test_auth_token_grammar() {
        round_trips::<AuthToken>("AABBCCDD");
        round_trips::<AuthToken>("04A1B2C3D4E5F6");
        round_trips::<AuthToken>("00112233445566778899");
        assert!(AuthToken::parse("AABBCC").is_err());
        assert!(AuthToken::parse("AABBCCDG").is_err());
    }

    #[test]
    fn test_session_id_grammar() {
        round_trips::<SessionId>("8fade8bd-0a88-4c4b-b8a6-2b8d0f5e1d12");
        assert!(SessionId::parse("8fade8bd0a884c4bb8a62b8d0f5e1d12").is_err());
        assert!(SessionId::parse("{8fade8bd-0a88-4c4b-b8a6-2b8d0f5e1d12}").is_err());

        let fresh = SessionId::new_random();
        assert_eq!(SessionId::parse(fresh.as_str()).unwrap(), fresh);
    }

    #[test]
    fn test_partner_ids_length_limits() {
        round_trips::<PartnerSessionId>("0815-4711");
        assert!(PartnerSessionId::parse(&"x".repeat(50)).is_ok());
        assert!(PartnerSessionId::parse(&"x".repeat(51)).is_err());
        assert!(PartnerSessionId::parse("").is_err());

        assert!(PartnerProductId::parse(&"p".repeat(100)).is_ok());
        assert!(PartnerProductId::parse(&"p".repeat(101)).is_err());
    }

    #[test]
    fn test_error_names_kind() {
        let err = EvseId::parse("nope").unwrap_err();
        assert_eq!(err.kind, "EVSE Id");
        assert_eq!(err.to_string(), "invalid EVSE Id: 'nope'");
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(
            EvseId::parse("DE*ABC*E1").unwrap(),
            EvseId::parse("DE*ABC*E1").unwrap()
        );
        assert_ne!(
            EvseId::parse("DE*ABC*E1").unwrap(),
            EvseId::parse("DE*ABC*E2").unwrap()
        );
    }
}
