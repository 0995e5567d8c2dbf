//! oicp-server - Inbound OICP endpoints
//!
//! Routers for the two roles of the roaming protocol. Each inbound request
//! is decoded, handed concurrently to every registered internal subscriber
//! and answered with the first committed outcome in registration order.
//!
//! # Usage
//!
//! ```ignore
//! use oicp_server::{create_cpo_router, AppState};
//!
//! let state = AppState::new();
//! state.remote_commands.register(Arc::new(MyEvseController::new()));
//! let router = create_cpo_router(state, "/api/oicp");
//! ```

pub mod arbitration;
pub mod dispatcher;
pub mod handlers;
pub mod registry;
pub mod state;
pub mod subscriber;

pub use arbitration::{arbitrate, first_committed};
pub use dispatcher::{EmpDispatcher, RemoteCommandDispatcher};
pub use registry::{SubscriberId, SubscriberRegistry};
pub use state::AppState;
pub use subscriber::{EmpHandler, RemoteCommandHandler};

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

fn base_router() -> Router<AppState> {
    Router::new().route("/health", get(|| async { "OK" }))
}

fn finish(router: Router<AppState>, state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Router for a charge point operator: remote commands arrive on
/// `{prefix}/Authorization` and `{prefix}/Reservation`
pub fn create_cpo_router(state: AppState, prefix: &str) -> Router {
    let prefix = prefix.trim_end_matches('/');
    let router = base_router()
        .route(
            &format!("{}/Authorization", prefix),
            post(handlers::remote_command),
        )
        .route(
            &format!("{}/Reservation", prefix),
            post(handlers::remote_command),
        );
    finish(router, state)
}

/// Router for an e-mobility provider: authorization requests and charge
/// detail records arrive on `{prefix}/Authorization`
pub fn create_emp_router(state: AppState, prefix: &str) -> Router {
    let prefix = prefix.trim_end_matches('/');
    let router = base_router().route(
        &format!("{}/Authorization", prefix),
        post(handlers::emp_authorization),
    );
    finish(router, state)
}
