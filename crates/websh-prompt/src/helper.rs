use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use websh_core::CommandRegistry;

/// rustyline helper providing built-in command completion, hints and
/// highlighting.
#[derive(Clone)]
pub struct ReplHelper {
    registry: CommandRegistry,
}

impl ReplHelper {
    pub fn new(registry: &CommandRegistry) -> Self {
        Self {
            registry: registry.clone(),
        }
    }

    /// Keywords matching the text before the cursor, as long as it is a
    /// single word.
    fn candidates(&self, line: &str, pos: usize) -> Vec<&'static str> {
        let Some(prefix) = line.get(..pos) else {
            return Vec::new();
        };
        if prefix.contains(char::is_whitespace) {
            return Vec::new();
        }
        self.registry.completions_for(prefix)
    }
}

impl Helper for ReplHelper {}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let candidates = self
            .candidates(line, pos)
            .into_iter()
            .map(|keyword| Pair {
                display: keyword.to_string(),
                replacement: keyword.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if self.registry.lookup(line.trim()).is_some() {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos == 0 || pos < line.len() {
            return None;
        }
        self.candidates(line, pos)
            .into_iter()
            .find(|keyword| keyword.len() > pos)
            .and_then(|keyword| keyword.get(pos..))
            .map(str::to_string)
    }
}

impl Validator for ReplHelper {}
