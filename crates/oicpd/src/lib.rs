//! oicpd - OICP endpoint daemon
//!
//! Serves one side of the protocol and wires simulated subscribers into it.

pub mod config;
pub mod publisher;
pub mod simulator;

use std::sync::Arc;

use axum::Router;
use oicp_client::{CancellationToken, CpoClient, OicpClient};
use oicp_server::{create_cpo_router, create_emp_router, AppState};
use tracing::info;

use crate::config::{DaemonConfig, Role};
use crate::publisher::StatusPublisher;
use crate::simulator::{EvseSimulator, TokenAuthorizer};

/// Build the router for the configured role and start background tasks
pub fn build(config: &DaemonConfig, shutdown: &CancellationToken) -> anyhow::Result<Router> {
    let state = AppState::new();
    let prefix = &config.server.path_prefix;

    let router = match config.server.role {
        Role::Cpo => {
            let simulator = Arc::new(EvseSimulator::new(&config.simulator.evses));
            state.remote_commands.register(simulator.clone());
            info!(evses = config.simulator.evses.len(), "EVSE simulator registered");

            if config.simulator.push_status {
                let client = OicpClient::from_config(&config.client)?;
                let publisher = StatusPublisher::new(
                    CpoClient::new(client),
                    config.simulator.operator_id()?,
                    config.simulator.operator_name.clone(),
                );
                info!(base_url = %config.client.base_url, "Pushing EVSE status changes");
                tokio::spawn(publisher.run(simulator.subscribe(), shutdown.clone()));
            }

            create_cpo_router(state, prefix)
        }
        Role::Emp => {
            let authorizer =
                TokenAuthorizer::new(config.simulator.provider_id()?, &config.simulator.tokens);
            state.emp.register(Arc::new(authorizer));
            info!(tokens = config.simulator.tokens.len(), "Token authorizer registered");

            create_emp_router(state, prefix)
        }
    };

    Ok(router)
}
