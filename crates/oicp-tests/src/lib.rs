//! End-to-end tests for the OICP client and server
//!
//! Every test serves a real router on a loopback port with
//! `oicp_client::testing::TestServer` and drives it with the real
//! reqwest-backed client. No external hub is needed:
//!
//! ```bash
//! cargo test -p oicp-tests
//! ```
//!
//! - `authorization_e2e`: CPO client against the EMP endpoint
//! - `remote_command_e2e`: EMP client against the CPO endpoint
//! - `status_sync_e2e`: status-diff pushes against a stub hub
