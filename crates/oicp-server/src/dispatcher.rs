//! Inbound request dispatch
//!
//! Per request: parse, fan out to a snapshot of the registered
//! subscribers concurrently, wait for all of them, arbitrate by
//! registration order, encode the response. A request that cannot be
//! parsed is answered directly with status `022` and the parse error.

use std::sync::Arc;

use futures::future::join_all;
use oicp_codec::{decode_remote_command, encode, envelope, CodecError, OicpMessage};
use oicp_core::{
    Acknowledgement, AuthorizationStart, AuthorizationStop, AuthorizeStart, AuthorizeStop,
    ChargeDetailRecord, RemoteCommand, RemoteCommandOutcome, StatusCode, StatusCodes,
};
use tracing::{debug, info, warn};

use crate::arbitration::{arbitrate, first_committed};
use crate::registry::{SubscriberId, SubscriberRegistry};
use crate::subscriber::{EmpHandler, RemoteCommandHandler};

fn parse_failure(error: &CodecError) -> StatusCode {
    StatusCode::new(StatusCodes::DataError).with_additional_info(error.to_string())
}

// =============================================================================
// CPO side: remote commands
// =============================================================================

/// Dispatches remote start/stop and reservation commands
#[derive(Default)]
pub struct RemoteCommandDispatcher {
    subscribers: SubscriberRegistry<dyn RemoteCommandHandler>,
}

impl RemoteCommandDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, handler: Arc<dyn RemoteCommandHandler>) -> SubscriberId {
        self.subscribers.register(handler)
    }

    pub fn unregister(&self, id: SubscriberId) -> bool {
        self.subscribers.unregister(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Fan `command` out to every current subscriber and arbitrate
    pub async fn dispatch(&self, command: &RemoteCommand) -> RemoteCommandOutcome {
        let subscribers = self.subscribers.snapshot();
        if subscribers.is_empty() {
            warn!(kind = %command.kind(), evse_id = %command.evse_id(), "No remote command subscribers");
            return RemoteCommandOutcome::Error;
        }

        let outcomes = join_all(subscribers.iter().map(|s| s.handle(command))).await;
        let outcome = arbitrate(&outcomes);
        debug!(?outcomes, %outcome, "Remote command arbitrated");
        outcome
    }

    /// Answer for an arbitrated command
    pub fn respond(command: &RemoteCommand, outcome: RemoteCommandOutcome) -> Acknowledgement {
        Acknowledgement::from_outcome(outcome)
            .with_session_id(command.session_id().cloned())
            .with_partner_session_id(command.partner_session_id().cloned())
    }

    /// Handle one raw request body and produce the response body
    pub async fn handle(&self, body: &str) -> String {
        let command = match decode_remote_command(body) {
            Ok(command) => command,
            Err(e) => {
                warn!(error = %e, "Rejecting unparseable remote command");
                return encode(&Acknowledgement::failure(parse_failure(&e)));
            }
        };

        let outcome = self.dispatch(&command).await;
        info!(
            kind = %command.kind(),
            evse_id = %command.evse_id(),
            %outcome,
            status_code = %outcome.status_code(),
            "Remote command handled"
        );
        encode(&Self::respond(&command, outcome))
    }
}

// =============================================================================
// EMP side: authorization and charge detail records
// =============================================================================

const EMP_ELEMENTS: [&str; 3] = [
    AuthorizeStart::ELEMENT,
    AuthorizeStop::ELEMENT,
    ChargeDetailRecord::ELEMENT,
];

/// Dispatches authorization requests and charge detail records
#[derive(Default)]
pub struct EmpDispatcher {
    subscribers: SubscriberRegistry<dyn EmpHandler>,
}

impl EmpDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, handler: Arc<dyn EmpHandler>) -> SubscriberId {
        self.subscribers.register(handler)
    }

    pub fn unregister(&self, id: SubscriberId) -> bool {
        self.subscribers.unregister(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Falls back to `NotAuthorized` with `140`
    pub async fn authorize_start(&self, request: &AuthorizeStart) -> AuthorizationStart {
        let subscribers = self.subscribers.snapshot();
        let answers = join_all(subscribers.iter().map(|s| s.authorize_start(request))).await;
        first_committed(answers).unwrap_or_else(|| {
            AuthorizationStart::not_authorized(StatusCode::new(
                StatusCodes::NoPositiveAuthenticationResponse,
            ))
        })
    }

    /// Falls back to `NotAuthorized` with `140`
    pub async fn authorize_stop(&self, request: &AuthorizeStop) -> AuthorizationStop {
        let subscribers = self.subscribers.snapshot();
        let answers = join_all(subscribers.iter().map(|s| s.authorize_stop(request))).await;
        first_committed(answers).unwrap_or_else(|| {
            AuthorizationStop::not_authorized(StatusCode::new(
                StatusCodes::NoPositiveAuthenticationResponse,
            ))
        })
    }

    /// Falls back to a negative acknowledgement with `022`
    pub async fn charge_detail_record(&self, record: &ChargeDetailRecord) -> Acknowledgement {
        let subscribers = self.subscribers.snapshot();
        let answers = join_all(subscribers.iter().map(|s| s.charge_detail_record(record))).await;
        first_committed(answers).unwrap_or_else(|| {
            Acknowledgement::failure(StatusCode::new(StatusCodes::DataError))
                .with_session_id(Some(record.session_id.clone()))
        })
    }

    /// Handle one raw request body and produce the response body
    ///
    /// A request whose root is known but whose content is invalid is
    /// answered with the negative form of that operation's response.
    pub async fn handle(&self, body: &str) -> String {
        let node = match envelope::open(body).and_then(|body| body.single(&EMP_ELEMENTS)) {
            Ok(node) => node,
            Err(e) => {
                warn!(error = %e, "Rejecting unparseable EMP request");
                return encode(&Acknowledgement::failure(parse_failure(&e)));
            }
        };

        if node.name == AuthorizeStart::ELEMENT {
            let response = match AuthorizeStart::from_node(&node) {
                Ok(request) => self.authorize_start(&request).await,
                Err(e) => AuthorizationStart::not_authorized(parse_failure(&e)),
            };
            info!(status = %response.status, status_code = %response.status_code.code, "AuthorizeStart handled");
            encode(&response)
        } else if node.name == AuthorizeStop::ELEMENT {
            let response = match AuthorizeStop::from_node(&node) {
                Ok(request) => self.authorize_stop(&request).await,
                Err(e) => AuthorizationStop::not_authorized(parse_failure(&e)),
            };
            info!(status = %response.status, status_code = %response.status_code.code, "AuthorizeStop handled");
            encode(&response)
        } else {
            let response = match ChargeDetailRecord::from_node(&node) {
                Ok(record) => self.charge_detail_record(&record).await,
                Err(e) => Acknowledgement::failure(parse_failure(&e)),
            };
            info!(result = response.result, status_code = %response.status_code.code, "Charge detail record handled");
            encode(&response)
        }
    }
}
