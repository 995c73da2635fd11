//! HTTP front end of docgate.
//!
//! [`server::build_router`] wires the MDX check and the markdown lint
//! endpoint onto an axum router; the `docgate-server` binary adds the CLI,
//! tracing setup and the listener.

pub mod error;
pub mod logging;
pub mod server;

pub use error::ApiError;
pub use logging::AccessLog;
pub use server::{AppState, LINT_PATH, build_router};
