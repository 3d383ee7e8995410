//! The read-eval-print loop.
//!
//! A [`Session`] owns the line editor, the executor, the command table, the
//! history buffer and both output streams. Requests are issued one at a
//! time; the loop waits for each to finish or time out before prompting
//! again.

use std::io::{self, Write};

use websh_client::{REQUEST_TIMEOUT, RemoteExecutor};

use crate::app::{APP_NAME, APP_VERSION, Outcome, version_line};
use crate::editor::{LineEditor, ReadOutcome};
use crate::history::HistoryStore;
use crate::registry::{Builtin, CommandRegistry, Submission};
use crate::render::{render, render_error, render_warning};

pub const PROMPT: &str = "# ";

/// State of the loop after one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    /// `exit` was entered.
    Exiting,
    /// The prompt ended (end-of-input or a fatal editor error).
    Terminated(Outcome),
}

pub struct Session<E, X> {
    editor: E,
    executor: X,
    registry: CommandRegistry,
    history: HistoryStore,
    out: Box<dyn Write>,
    err: Box<dyn Write>,
}

impl<E: LineEditor, X: RemoteExecutor> Session<E, X> {
    /// Creates a session writing to the process's stdout and stderr.
    pub fn new(editor: E, executor: X, registry: CommandRegistry, history: HistoryStore) -> Self {
        Self {
            editor,
            executor,
            registry,
            history,
            out: Box::new(io::stdout()),
            err: Box::new(io::stderr()),
        }
    }

    /// Replaces the output streams.
    pub fn with_streams(mut self, out: impl Write + 'static, err: impl Write + 'static) -> Self {
        self.out = Box::new(out);
        self.err = Box::new(err);
        self
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    pub fn executor(&self) -> &X {
        &self.executor
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Runs the session to completion: loads history, prints the banner,
    /// loops until `exit`, end-of-input or a prompt failure, then writes the
    /// history back.
    pub async fn run(&mut self) -> Outcome {
        self.load_history();
        self.print_banner();

        let outcome = loop {
            match self.step().await {
                LoopState::Running => continue,
                LoopState::Exiting => break Outcome::Ok,
                LoopState::Terminated(outcome) => break outcome,
            }
        };

        self.flush_history();
        outcome
    }

    /// Prompts for one line and handles it.
    pub async fn step(&mut self) -> LoopState {
        let line = match self.editor.read_line(PROMPT) {
            Ok(ReadOutcome::Line(line)) => line,
            Ok(ReadOutcome::Interrupted) => return LoopState::Running,
            Ok(ReadOutcome::Eof) => return LoopState::Terminated(Outcome::Ok),
            Err(e) => {
                tracing::error!("{}", e);
                return LoopState::Terminated(Outcome::PromptError);
            }
        };

        match self.registry.classify(&line) {
            Submission::Empty => LoopState::Running,
            Submission::Builtin(builtin) => self.dispatch(builtin).await,
            Submission::Code(code) => {
                self.execute(code).await;
                LoopState::Running
            }
        }
    }

    async fn dispatch(&mut self, builtin: Builtin) -> LoopState {
        tracing::debug!("Built-in command: {}", builtin.keyword());
        let written = match builtin {
            Builtin::Exit => return LoopState::Exiting,
            Builtin::Help => write!(self.out, "{}", self.registry.help_text()),
            Builtin::Version => writeln!(self.out, "{}", version_line()),
            Builtin::Ping => match self.executor.ping().await {
                Ok(result) => writeln!(self.out, "{}", result.status),
                Err(e) => {
                    render_error(&mut *self.err, &e);
                    Ok(())
                }
            },
        };
        if let Err(e) = written.and_then(|_| self.out.flush()) {
            tracing::debug!("Failed to write output: {}", e);
        }
        LoopState::Running
    }

    async fn execute(&mut self, code: &str) {
        tracing::debug!("Executing {} bytes of code", code.len());
        match self.executor.execute(code).await {
            Ok(result) => {
                render(&result, &mut *self.out, &mut *self.err);
                self.history.append(code);
                self.editor.add_history(code);
            }
            Err(e) => {
                if e.is_protocol() {
                    tracing::debug!("Unexpected response from websh server: {}", e);
                } else {
                    tracing::debug!("Execution request failed: {}", e);
                }
                render_error(&mut *self.err, &e);
                if e.is_timeout() {
                    render_error(&mut *self.err, timeout_hint());
                }
            }
        }
    }

    fn load_history(&mut self) {
        match self.history.load() {
            Ok(report) => {
                if report.skipped > 0 {
                    render_warning(
                        &mut *self.err,
                        format!(
                            "skipped {} unreadable line(s) in {:?}",
                            report.skipped,
                            self.history.path()
                        ),
                    );
                }
            }
            Err(e) => render_warning(&mut *self.err, e),
        }

        for entry in self.history.entries() {
            self.editor.add_history(entry);
        }
    }

    fn flush_history(&mut self) {
        if let Err(e) = self.history.flush() {
            render_warning(&mut *self.err, e);
        }
    }

    fn print_banner(&mut self) {
        let written = write!(
            self.out,
            "{} v{}\nType `help` to show help message. Type `exit` to quit.\n\n",
            APP_NAME, APP_VERSION
        );
        if let Err(e) = written.and_then(|_| self.out.flush()) {
            tracing::debug!("Failed to write banner: {}", e);
        }
    }
}

/// Extra line shown after a request that ran into the client timeout.
fn timeout_hint() -> String {
    format!(
        "the server did not answer within {} seconds",
        REQUEST_TIMEOUT.as_secs()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::PromptError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::{TempDir, tempdir};
    use websh_client::{ClientError, ExecutionResult, PingResult};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Replays scripted prompt results, then reports end-of-input.
    struct ScriptedEditor {
        script: VecDeque<Result<ReadOutcome, PromptError>>,
        recalled: Vec<String>,
        prompts: usize,
    }

    impl ScriptedEditor {
        fn lines(lines: &[&str]) -> Self {
            Self::new(
                lines
                    .iter()
                    .map(|line| Ok(ReadOutcome::Line(line.to_string())))
                    .collect(),
            )
        }

        fn new(script: Vec<Result<ReadOutcome, PromptError>>) -> Self {
            Self {
                script: script.into(),
                recalled: Vec::new(),
                prompts: 0,
            }
        }
    }

    impl LineEditor for ScriptedEditor {
        fn read_line(&mut self, _prompt: &str) -> Result<ReadOutcome, PromptError> {
            self.prompts += 1;
            self.script.pop_front().unwrap_or(Ok(ReadOutcome::Eof))
        }

        fn add_history(&mut self, entry: &str) {
            self.recalled.push(entry.to_string());
        }
    }

    /// Records calls; answers `execute` with a canned result unless the code
    /// starts with `fail`, which yields a transport error.
    #[derive(Default)]
    struct MockExecutor {
        executed: Mutex<Vec<String>>,
        pings: Mutex<usize>,
        ping_fails: bool,
    }

    fn transport_error() -> ClientError {
        let err = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        ClientError::Transport(err)
    }

    #[async_trait]
    impl RemoteExecutor for MockExecutor {
        async fn ping(&self) -> Result<PingResult, ClientError> {
            *self.pings.lock().unwrap() += 1;
            if self.ping_fails {
                return Err(transport_error());
            }
            Ok(PingResult {
                status: "ok".to_string(),
            })
        }

        async fn execute(&self, code: &str) -> Result<ExecutionResult, ClientError> {
            self.executed.lock().unwrap().push(code.to_string());
            if code.starts_with("fail") {
                return Err(transport_error());
            }
            Ok(ExecutionResult {
                status: 0,
                stdout: "Hello\n".to_string(),
                elapsed_time: "12ms".to_string(),
                ..Default::default()
            })
        }
    }

    struct Harness {
        session: Session<ScriptedEditor, MockExecutor>,
        out: SharedBuffer,
        err: SharedBuffer,
        dir: TempDir,
    }

    impl Harness {
        fn new(editor: ScriptedEditor) -> Self {
            Self::with_executor(editor, MockExecutor::default())
        }

        fn with_executor(editor: ScriptedEditor, executor: MockExecutor) -> Self {
            let dir = tempdir().unwrap();
            let history = HistoryStore::new(
                dir.path().join("history.txt"),
                HistoryStore::DEFAULT_LIMIT,
            );
            let out = SharedBuffer::default();
            let err = SharedBuffer::default();
            let session = Session::new(editor, executor, CommandRegistry::default(), history)
                .with_streams(out.clone(), err.clone());
            Self {
                session,
                out,
                err,
                dir,
            }
        }

        fn history_file(&self) -> std::path::PathBuf {
            self.dir.path().join("history.txt")
        }

        fn executed(&self) -> Vec<String> {
            self.session.executor().executed.lock().unwrap().clone()
        }
    }

    #[tokio::test]
    async fn test_successful_execution() {
        let mut h = Harness::new(ScriptedEditor::lines(&["echo Hello"]));

        let outcome = h.session.run().await;

        assert_eq!(outcome, Outcome::Ok);
        assert_eq!(h.executed(), vec!["echo Hello"]);
        let out = h.out.contents();
        assert!(out.contains("Hello\n"));
        assert!(out.lines().any(|l| l.contains("websh") && l.contains("12ms")));
        assert_eq!(h.session.history().entries(), ["echo Hello"]);
        assert_eq!(h.session.editor().recalled, vec!["echo Hello"]);
        assert_eq!(fs::read_to_string(h.history_file()).unwrap(), "echo Hello\n");
    }

    #[tokio::test]
    async fn test_builtins_never_reach_executor() {
        let mut h = Harness::new(ScriptedEditor::lines(&["help", "version", " help "]));

        h.session.run().await;

        assert!(h.executed().is_empty());
        let out = h.out.contents();
        assert!(out.contains("COMMANDS"));
        assert!(out.contains(&version_line()));
        assert!(h.session.history().entries().is_empty());
    }

    #[tokio::test]
    async fn test_exit_stops_loop_and_flushes() {
        let mut h = Harness::new(ScriptedEditor::lines(&["echo Hello", "exit", "never read"]));

        let outcome = h.session.run().await;

        assert_eq!(outcome, Outcome::Ok);
        assert_eq!(h.executed(), vec!["echo Hello"]);
        assert_eq!(h.session.editor().prompts, 2);
        assert_eq!(fs::read_to_string(h.history_file()).unwrap(), "echo Hello\n");
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_running_without_history() {
        let mut h = Harness::new(ScriptedEditor::lines(&["fail please", "echo Hello"]));

        let outcome = h.session.run().await;

        assert_eq!(outcome, Outcome::Ok);
        assert_eq!(h.executed(), vec!["fail please", "echo Hello"]);
        assert!(h.err.contents().contains("request failed"));
        assert_eq!(h.session.history().entries(), ["echo Hello"]);
        // Two lines, then end-of-input.
        assert_eq!(h.session.editor().prompts, 3);
    }

    #[tokio::test]
    async fn test_end_of_input_terminates_ok_and_flushes() {
        let mut h = Harness::new(ScriptedEditor::new(vec![Ok(ReadOutcome::Eof)]));
        fs::write(h.history_file(), "ls\n").unwrap();

        let outcome = h.session.run().await;

        assert_eq!(outcome, Outcome::Ok);
        assert_eq!(fs::read_to_string(h.history_file()).unwrap(), "ls\n");
        assert_eq!(h.session.editor().recalled, vec!["ls"]);
    }

    #[tokio::test]
    async fn test_prompt_error_is_fatal() {
        let mut h = Harness::new(ScriptedEditor::new(vec![
            Ok(ReadOutcome::Line("echo Hello".to_string())),
            Err(PromptError::new("terminal went away")),
            Ok(ReadOutcome::Line("never read".to_string())),
        ]));

        let outcome = h.session.run().await;

        assert_eq!(outcome, Outcome::PromptError);
        assert_eq!(h.executed(), vec!["echo Hello"]);
        assert_eq!(fs::read_to_string(h.history_file()).unwrap(), "echo Hello\n");
    }

    #[tokio::test]
    async fn test_empty_and_interrupted_lines_are_ignored() {
        let mut h = Harness::new(ScriptedEditor::new(vec![
            Ok(ReadOutcome::Line(String::new())),
            Ok(ReadOutcome::Interrupted),
            Ok(ReadOutcome::Line("   ".to_string())),
        ]));

        let outcome = h.session.run().await;

        assert_eq!(outcome, Outcome::Ok);
        assert!(h.executed().is_empty());
        assert!(h.session.history().entries().is_empty());
        assert_eq!(fs::read_to_string(h.history_file()).unwrap(), "");
    }

    #[tokio::test]
    async fn test_history_counts_only_successful_code() {
        let mut h = Harness::new(ScriptedEditor::lines(&[
            "echo a", "", "help", "fail", "echo b", "version", "echo a",
        ]));
        fs::write(h.history_file(), "seq 3\n").unwrap();

        h.session.run().await;

        assert_eq!(
            fs::read_to_string(h.history_file()).unwrap(),
            "seq 3\necho a\necho b\necho a\n"
        );
    }

    #[tokio::test]
    async fn test_code_is_sent_verbatim() {
        let mut h = Harness::new(ScriptedEditor::lines(&["  echo  'a  b'  "]));

        h.session.run().await;

        assert_eq!(h.executed(), vec!["  echo  'a  b'  "]);
    }

    #[tokio::test]
    async fn test_ping_builtin_prints_status() {
        let mut h = Harness::new(ScriptedEditor::lines(&["ping"]));

        h.session.run().await;

        assert_eq!(*h.session.executor().pings.lock().unwrap(), 1);
        assert!(h.out.contents().lines().any(|l| l == "ok"));
        assert!(h.executed().is_empty());
    }

    #[tokio::test]
    async fn test_ping_builtin_failure_prints_error_only() {
        let executor = MockExecutor {
            ping_fails: true,
            ..Default::default()
        };
        let mut h = Harness::with_executor(ScriptedEditor::lines(&["ping"]), executor);

        let outcome = h.session.run().await;

        assert_eq!(outcome, Outcome::Ok);
        assert!(h.err.contents().contains("request failed"));
        assert!(!h.out.contents().lines().any(|l| l == "ok"));
    }

    #[tokio::test]
    async fn test_banner_is_printed_first() {
        let mut h = Harness::new(ScriptedEditor::lines(&[]));

        h.session.run().await;

        assert!(h.out.contents().starts_with(&version_line()));
    }

    #[tokio::test]
    async fn test_unwritable_history_is_not_fatal() {
        let dir = tempdir().unwrap();
        // The history path is a directory, so flushing fails.
        let history = HistoryStore::new(dir.path(), 10);
        let err = SharedBuffer::default();
        let mut session = Session::new(
            ScriptedEditor::lines(&["echo Hello"]),
            MockExecutor::default(),
            CommandRegistry::default(),
            history,
        )
        .with_streams(SharedBuffer::default(), err.clone());

        let outcome = session.run().await;

        assert_eq!(outcome, Outcome::Ok);
        assert!(err.contents().contains("warning"));
    }

    #[test]
    fn test_timeout_hint_names_request_timeout() {
        assert_eq!(
            timeout_hint(),
            "the server did not answer within 10 seconds"
        );
    }
}
