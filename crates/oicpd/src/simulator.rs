//! Simulated subscribers for running the daemon without real hardware
//!
//! [`EvseSimulator`] plays the charge point side: it owns a fixed set of
//! EVSEs and answers remote commands for them. [`TokenAuthorizer`] plays
//! the provider side and authorizes a fixed set of tokens.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use oicp_core::{
    Acknowledgement, AuthorizationStart, AuthorizationStop, AuthorizeStart, AuthorizeStop,
    ChargeDetailRecord, EvseId, EvseStatus, Identification, ProviderId, RemoteCommand,
    RemoteCommandOutcome, SessionId,
};
use oicp_server::{EmpHandler, RemoteCommandHandler};
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::config::SimulatedEvse;

#[derive(Debug, Clone)]
struct EvseState {
    status: EvseStatus,
    /// Charging session or reservation currently holding the EVSE
    session: Option<SessionId>,
}

/// Current status of every simulated EVSE
pub type StatusSnapshot = BTreeMap<EvseId, EvseStatus>;

/// Charge point simulator answering remote commands
pub struct EvseSimulator {
    evses: RwLock<HashMap<EvseId, EvseState>>,
    status_tx: watch::Sender<StatusSnapshot>,
}

impl EvseSimulator {
    pub fn new(evses: &[SimulatedEvse]) -> Self {
        let evses: HashMap<_, _> = evses
            .iter()
            .map(|evse| {
                (
                    evse.evse_id.clone(),
                    EvseState {
                        status: evse.status,
                        session: None,
                    },
                )
            })
            .collect();
        let snapshot = evses
            .iter()
            .map(|(id, state)| (id.clone(), state.status))
            .collect();
        let (status_tx, _) = watch::channel(snapshot);

        Self {
            evses: RwLock::new(evses),
            status_tx,
        }
    }

    /// Receiver that sees a new snapshot after every status change
    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.status_tx.subscribe()
    }

    pub fn status(&self, evse_id: &EvseId) -> Option<EvseStatus> {
        self.evses.read().get(evse_id).map(|state| state.status)
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.status_tx.borrow().clone()
    }

    fn publish(&self, evses: &HashMap<EvseId, EvseState>) {
        let snapshot = evses
            .iter()
            .map(|(id, state)| (id.clone(), state.status))
            .collect();
        self.status_tx.send_replace(snapshot);
    }

    fn occupy(
        state: &mut EvseState,
        session_id: &SessionId,
        status: EvseStatus,
    ) -> RemoteCommandOutcome {
        match state.status {
            EvseStatus::Available => {
                state.status = status;
                state.session = Some(session_id.clone());
                RemoteCommandOutcome::Success
            }
            // A reservation may be converted into a charging session by its holder
            EvseStatus::Reserved
                if status == EvseStatus::Occupied && state.session.as_ref() == Some(session_id) =>
            {
                state.status = status;
                RemoteCommandOutcome::Success
            }
            EvseStatus::Reserved | EvseStatus::Occupied => RemoteCommandOutcome::EvseAlreadyInUse,
            _ => RemoteCommandOutcome::EvseNotReachable,
        }
    }

    fn release(
        state: &mut EvseState,
        session_id: &SessionId,
        held: EvseStatus,
    ) -> RemoteCommandOutcome {
        if state.status == held && state.session.as_ref() == Some(session_id) {
            state.status = EvseStatus::Available;
            state.session = None;
            RemoteCommandOutcome::Success
        } else {
            RemoteCommandOutcome::Error
        }
    }
}

#[async_trait]
impl RemoteCommandHandler for EvseSimulator {
    async fn handle(&self, command: &RemoteCommand) -> RemoteCommandOutcome {
        let mut evses = self.evses.write();
        let Some(state) = evses.get_mut(command.evse_id()) else {
            debug!(evse_id = %command.evse_id(), "Not a simulated EVSE");
            return RemoteCommandOutcome::Unspecified;
        };

        let before = state.status;
        let outcome = match command {
            RemoteCommand::Start(start) => {
                Self::occupy(state, &start.session_id, EvseStatus::Occupied)
            }
            RemoteCommand::Stop(stop) => {
                Self::release(state, &stop.session_id, EvseStatus::Occupied)
            }
            // Without a session id the reservation could never be released
            RemoteCommand::ReservationStart(reservation) => match &reservation.session_id {
                Some(session_id) => Self::occupy(state, session_id, EvseStatus::Reserved),
                None => RemoteCommandOutcome::Error,
            },
            RemoteCommand::ReservationStop(reservation) => {
                Self::release(state, &reservation.session_id, EvseStatus::Reserved)
            }
        };
        let after = state.status;

        info!(
            kind = %command.kind(),
            evse_id = %command.evse_id(),
            %outcome,
            from = %before,
            to = %after,
            "Simulated EVSE handled command"
        );
        if before != after {
            self.publish(&evses);
        }
        outcome
    }
}

/// Provider simulator authorizing a fixed set of tokens
///
/// Unknown tokens get no opinion, leaving the decision to other
/// subscribers or to the negative fallback.
pub struct TokenAuthorizer {
    provider_id: ProviderId,
    tokens: HashSet<String>,
    sessions: Mutex<HashSet<SessionId>>,
}

impl TokenAuthorizer {
    pub fn new(provider_id: ProviderId, tokens: &[String]) -> Self {
        Self {
            provider_id,
            tokens: tokens.iter().map(|t| t.to_ascii_uppercase()).collect(),
            sessions: Mutex::new(HashSet::new()),
        }
    }

    fn knows(&self, identification: &Identification) -> bool {
        let text = match (identification.auth_token(), identification.evco_id()) {
            (Some(token), _) => token.as_str(),
            (None, Some(evco_id)) => evco_id.as_str(),
            (None, None) => return false,
        };
        self.tokens.contains(&text.to_ascii_uppercase())
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.lock().len()
    }
}

#[async_trait]
impl EmpHandler for TokenAuthorizer {
    async fn authorize_start(&self, request: &AuthorizeStart) -> Option<AuthorizationStart> {
        if !self.knows(&request.identification) {
            return None;
        }
        let session_id = request
            .session_id
            .clone()
            .unwrap_or_else(SessionId::new_random);
        self.sessions.lock().insert(session_id.clone());
        info!(session_id = %session_id, "Simulated provider authorized start");

        let mut response = AuthorizationStart::authorized(session_id, self.provider_id.clone());
        response.partner_session_id = request.partner_session_id.clone();
        Some(response)
    }

    async fn authorize_stop(&self, request: &AuthorizeStop) -> Option<AuthorizationStop> {
        if !self.knows(&request.identification)
            || !self.sessions.lock().remove(&request.session_id)
        {
            return None;
        }
        info!(session_id = %request.session_id, "Simulated provider authorized stop");

        let mut response =
            AuthorizationStop::authorized(request.session_id.clone(), self.provider_id.clone());
        response.partner_session_id = request.partner_session_id.clone();
        Some(response)
    }

    async fn charge_detail_record(&self, record: &ChargeDetailRecord) -> Option<Acknowledgement> {
        if !self.knows(&record.identification) {
            return None;
        }
        info!(session_id = %record.session_id, evse_id = %record.evse_id, "Simulated provider accepted CDR");
        Some(
            Acknowledgement::success()
                .with_session_id(Some(record.session_id.clone()))
                .with_partner_session_id(record.partner_session_id.clone()),
        )
    }
}
