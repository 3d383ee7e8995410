//! HTTP client for the websh remote shell service.
//!
//! The crate is a pure transport boundary: it turns a code string into an
//! [`ExecutionResult`] and performs liveness checks. It never interprets
//! the returned status or output.

pub mod client;
pub mod error;
pub mod types;

pub use client::{DEFAULT_BASE_URL, REQUEST_TIMEOUT, RemoteExecutor, WebshClient};
pub use error::ClientError;
pub use reqwest::StatusCode;
pub use types::{ExecuteRequest, ExecutionResult, IMAGE_SLOTS, PingResult};
