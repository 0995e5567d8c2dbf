//! Application state for the OICP endpoints

use std::sync::Arc;

use crate::dispatcher::{EmpDispatcher, RemoteCommandDispatcher};

/// State shared across all handlers
#[derive(Clone, Default)]
pub struct AppState {
    /// CPO side: remote start/stop and reservations
    pub remote_commands: Arc<RemoteCommandDispatcher>,
    /// EMP side: authorization and charge detail records
    pub emp: Arc<EmpDispatcher>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
