//! OICP message models
//!
//! Requests and responses are plain value objects. Optional wire fields are
//! `Option`s; absence is never modelled with a sentinel value.

pub mod authentication;
pub mod authorization;
pub mod cdr;
pub mod evse;
pub mod remote;

pub use authentication::PushAuthenticationData;
pub use authorization::{
    AuthorizationStart, AuthorizationStatus, AuthorizationStop, AuthorizeStart, AuthorizeStop,
    Identification,
};
pub use cdr::{ChargeDetailRecord, ChargeDetailRecords, GetChargeDetailRecords};
pub use evse::{
    ActionType, Address, EvseDataRecord, EvseDataResponse, EvseMatch, EvseSearchResult,
    EvseStatus, EvseStatusByIdResponse, EvseStatusRecord, EvseStatusResponse, GeoCoordinates,
    OperatorEvseData, OperatorEvseStatus, PullEvseData, PullEvseStatus, PullEvseStatusById,
    PushEvseData, PushEvseStatus, SearchCenter, SearchEvse,
};
pub use remote::{
    Acknowledgement, RemoteCommand, RemoteCommandKind, RemoteCommandOutcome, RemoteStart,
    RemoteStop, ReservationStart, ReservationStop,
};
