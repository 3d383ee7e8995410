//! Built-in REPL commands.
//!
//! Two matching policies live here and must stay separate: [`CommandRegistry::lookup`]
//! is an exact, case-sensitive match used for dispatch, while
//! [`CommandRegistry::completions_for`] is a case-insensitive prefix match
//! used only for tab completion.

/// A keyword handled by the session itself instead of the remote executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Exit,
    Help,
    Version,
    Ping,
}

impl Builtin {
    pub const fn keyword(self) -> &'static str {
        match self {
            Builtin::Exit => "exit",
            Builtin::Help => "help",
            Builtin::Version => "version",
            Builtin::Ping => "ping",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Builtin::Exit => "Quit interactive UI",
            Builtin::Help => "Show help message",
            Builtin::Version => "Show version",
            Builtin::Ping => "Test websh server status",
        }
    }
}

/// Classification of one submitted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission<'a> {
    Empty,
    Builtin(Builtin),
    /// Code to send to the remote executor, verbatim.
    Code(&'a str),
}

const KEY_BINDINGS: &str = "\
KEY BINDINGS
  Ctrl-A, Home          Move cursor to beginning of line
  Ctrl-E, End           Move cursor to end of line
  Ctrl-B, Left          Move cursor one character left
  Ctrl-F, Right         Move cursor one character right
  Ctrl-Left, Alt-B      Move cursor to previous word
  Ctrl-Right, Alt-F     Move cursor to next word
  Ctrl-D, Del           (if line is not empty) Delete character under cursor
  Ctrl-D                (if line is empty) End of File - quits application
  Ctrl-C                Reset input (create new empty prompt)
  Ctrl-L                Clear screen (line is unmodified)
  Ctrl-T                Transpose previous character with current character
  Ctrl-H, BackSpace     Delete character before cursor
  Ctrl-W, Alt-BackSpace Delete word leading up to cursor
  Alt-D                 Delete word following cursor
  Ctrl-K                Delete from cursor to end of line
  Ctrl-U                Delete from start of line to cursor
  Ctrl-P, Up            Previous entry in history
  Ctrl-N, Down          Next entry in history
  Ctrl-R                Reverse search history (Ctrl-S forward, Ctrl-G cancel)
  Ctrl-Y                Paste from yank buffer (Alt-Y to paste next yank instead)
  Tab                   Complete command
";

/// The fixed, ordered table of built-in commands active in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRegistry {
    builtins: Vec<Builtin>,
}

impl CommandRegistry {
    /// Creates the registry; `ping` is registered only when `enable_ping` is set.
    pub fn new(enable_ping: bool) -> Self {
        let mut builtins = vec![Builtin::Exit, Builtin::Help, Builtin::Version];
        if enable_ping {
            builtins.push(Builtin::Ping);
        }
        Self { builtins }
    }

    pub fn builtins(&self) -> &[Builtin] {
        &self.builtins
    }

    pub fn keywords(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.builtins.iter().map(|b| b.keyword())
    }

    /// Exact, case-sensitive lookup.
    pub fn lookup(&self, token: &str) -> Option<Builtin> {
        self.builtins.iter().copied().find(|b| b.keyword() == token)
    }

    /// Every keyword starting with `prefix`, ignoring case, in registry order.
    pub fn completions_for(&self, prefix: &str) -> Vec<&'static str> {
        let prefix = prefix.to_lowercase();
        self.keywords()
            .filter(|keyword| keyword.starts_with(&prefix))
            .collect()
    }

    /// Classifies a submitted line. Built-ins match the whole trimmed line;
    /// code is returned untrimmed.
    pub fn classify<'a>(&self, line: &'a str) -> Submission<'a> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Submission::Empty;
        }
        match self.lookup(trimmed) {
            Some(builtin) => Submission::Builtin(builtin),
            None => Submission::Code(line),
        }
    }

    /// The help document: active commands, then key bindings.
    pub fn help_text(&self) -> String {
        let mut text = String::from("\nCOMMANDS\n");
        for builtin in &self.builtins {
            text.push_str(&format!(
                "  {:<8}{}\n",
                builtin.keyword(),
                builtin.description()
            ));
        }
        text.push('\n');
        text.push_str(KEY_BINDINGS);
        text
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new(true)
    }
}
