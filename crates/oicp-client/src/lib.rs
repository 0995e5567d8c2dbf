//! OICP Client Library
//!
//! Typed outbound operations for both sides of the roaming protocol.
//! Every operation returns an [`OperationResult`]: a parsed payload, a
//! domain fault declared by the remote, or a locally synthesized transport
//! fault. No operation returns an error or panics on network trouble.
//!
//! # Example
//!
//! ```rust,no_run
//! use oicp_client::{CallOptions, CpoClient, OicpClient};
//! use oicp_core::{AuthToken, AuthorizeStart, Identification, OperatorId, OperationResult};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cpo = CpoClient::new(OicpClient::new("https://service-qa.hubject.com")?);
//!
//!     let request = AuthorizeStart::new(
//!         OperatorId::parse("DE*ABC")?,
//!         Identification::rfid(AuthToken::parse("AABBCCDD")?),
//!     );
//!     match cpo.authorize_start(&request, CallOptions::new()).await {
//!         OperationResult::Success(response) => println!("{}", response.status),
//!         other => println!("failed: {:?}", other.fault_status()),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! [`MockTransport`] scripts answers per endpoint path and records every
//! request; [`testing::TestServer`] serves an axum router on loopback.

pub mod classify;
mod client;
pub mod config;
mod cpo;
mod emp;
mod error;
pub mod mock;
pub mod observer;
mod options;
pub mod sync;
pub mod testing;
pub mod transport;

pub use classify::classify;
pub use client::OicpClient;
pub use config::{ClientConfig, Endpoints};
pub use cpo::CpoClient;
pub use emp::EmpClient;
pub use error::{ClientError, Result, TransportError};
pub use mock::MockTransport;
pub use observer::{ClientObserver, TracingObserver};
pub use options::CallOptions;
pub use sync::DiffPushResult;
pub use transport::{HttpResponse, HttpTransport, Transport};

// Re-export for callers building call options
pub use tokio_util::sync::CancellationToken;
