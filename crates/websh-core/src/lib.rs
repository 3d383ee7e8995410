//! Session engine for websh-prompt.
//!
//! This crate owns everything with state: the built-in command table, the
//! persistent history, result rendering and the read-eval-print loop that
//! ties them to a [`LineEditor`] and a [`RemoteExecutor`](websh_client::RemoteExecutor).

pub mod app;
pub mod config;
pub mod editor;
pub mod history;
pub mod registry;
pub mod render;
pub mod session;

pub use app::{APP_NAME, APP_VERSION, Outcome, version_line};
pub use config::{Config, ConfigError};
pub use editor::{LineEditor, PromptError, ReadOutcome};
pub use history::{HistoryError, HistoryStore, LoadReport};
pub use registry::{Builtin, CommandRegistry, Submission};
pub use render::{render, render_error, render_warning};
pub use session::{LoopState, Session};
