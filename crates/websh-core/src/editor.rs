//! The line-editing seam between the session loop and the terminal.

use thiserror::Error;

/// Result of one blocking prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A complete line of input.
    Line(String),
    /// The user discarded the current line (Ctrl-C).
    Interrupted,
    /// End of input (Ctrl-D on an empty line, closed stdin).
    Eof,
}

/// Fatal line editor failure.
#[derive(Debug, Error)]
#[error("prompt failed: {0}")]
pub struct PromptError(#[source] Box<dyn std::error::Error + Send + Sync>);

impl PromptError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(source.into())
    }
}

/// A line editor the session can prompt through.
///
/// `read_line` blocks until the user submits a line; the session never
/// issues overlapping prompts.
pub trait LineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, PromptError>;

    /// Makes `entry` available for recall (Up, Ctrl-R).
    fn add_history(&mut self, entry: &str);
}
