//! Application identity and process outcomes.

pub const APP_NAME: &str = "websh-prompt";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the `"<name> v<version>"` line printed by `version` and `--version`.
pub fn version_line() -> String {
    format!("{} v{}", APP_NAME, APP_VERSION)
}

/// How the process ends. Each variant maps to a stable exit code so that
/// scripts can branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Normal termination.
    Ok,
    /// Bad flags or unexpected positional arguments.
    ArgumentError,
    /// The line editor failed with something other than end-of-input.
    PromptError,
    /// The non-interactive liveness check failed.
    PingFailed,
}

impl Outcome {
    pub fn code(self) -> u8 {
        match self {
            Outcome::Ok => 0,
            Outcome::ArgumentError => 1,
            Outcome::PromptError => 2,
            Outcome::PingFailed => 3,
        }
    }
}

impl From<Outcome> for std::process::ExitCode {
    fn from(outcome: Outcome) -> Self {
        std::process::ExitCode::from(outcome.code())
    }
}
