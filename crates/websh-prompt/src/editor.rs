//! rustyline-backed [`LineEditor`].

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, EditMode, Editor};
use websh_core::{CommandRegistry, LineEditor, PromptError, ReadOutcome};

use crate::helper::ReplHelper;

pub struct RustylineEditor {
    editor: Editor<ReplHelper, DefaultHistory>,
}

impl RustylineEditor {
    /// Creates an Emacs-mode editor completing the registry's keywords.
    ///
    /// History is never added automatically; the session decides what is
    /// worth recalling.
    pub fn new(registry: &CommandRegistry, history_limit: usize) -> rustyline::Result<Self> {
        let config = Config::builder()
            .edit_mode(EditMode::Emacs)
            .completion_type(CompletionType::List)
            .auto_add_history(false)
            .history_ignore_dups(false)?
            .max_history_size(history_limit)?
            .build();

        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(ReplHelper::new(registry)));

        Ok(Self { editor })
    }
}

impl LineEditor for RustylineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, PromptError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(err) => Err(PromptError::new(err)),
        }
    }

    fn add_history(&mut self, entry: &str) {
        if let Err(e) = self.editor.add_history_entry(entry) {
            tracing::debug!("Failed to add history entry: {}", e);
        }
    }
}
