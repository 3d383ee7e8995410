//! Rendering of execution results and errors.
//!
//! Rendering never fails: a stream that refuses a write is logged and the
//! remaining sections are still attempted.

use colored::Colorize;
use std::fmt::Display;
use std::io::{self, Write};
use websh_client::ExecutionResult;

/// Label at the start of the status footer.
pub const FOOTER_LABEL: &str = "websh";

fn report(written: io::Result<()>) {
    if let Err(e) = written {
        tracing::debug!("Failed to write output: {}", e);
    }
}

/// Writes `result` to the two streams.
///
/// stdout goes to `out` as-is, stderr goes to `err` in red, and a footer
/// with the elapsed time always closes the output on `out`.
pub fn render(result: &ExecutionResult, out: &mut dyn Write, err: &mut dyn Write) {
    if !result.stdout.is_empty() {
        report(writeln!(out, "{}", result.stdout));
    }
    if !result.stderr.is_empty() {
        report(writeln!(err, "{}", result.stderr.bright_red()));
        report(err.flush());
    }

    for (slot, image) in result.attached_images() {
        let note = match image {
            Ok(bytes) => format!("[image {}: {} bytes, not displayed]", slot + 1, bytes.len()),
            Err(e) => format!("[image {}: undecodable data: {}]", slot + 1, e),
        };
        report(writeln!(out, "{}", note.dimmed()));
    }

    report(write_footer(result, out));
    report(out.flush());
}

fn write_footer(result: &ExecutionResult, out: &mut dyn Write) -> io::Result<()> {
    write!(
        out,
        "{} {}",
        FOOTER_LABEL.blue().bold(),
        result.elapsed_time.cyan().bold()
    )?;
    if result.status != 0 {
        write!(out, " {}", format!("[exit {}]", result.status).red())?;
    }
    writeln!(out)
}

/// Writes an error message to `err` in red.
pub fn render_error(err: &mut dyn Write, error: impl Display) {
    report(writeln!(err, "{}", error.to_string().bright_red()));
    report(err.flush());
}

/// Writes a warning to `err` in yellow.
pub fn render_warning(err: &mut dyn Write, warning: impl Display) {
    report(writeln!(err, "{}", format!("warning: {}", warning).yellow()));
    report(err.flush());
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    fn render_to_strings(result: &ExecutionResult) -> (String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        render(result, &mut out, &mut err);
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_render_stdout_and_footer() {
        let result = ExecutionResult {
            stdout: "Hello\n".to_string(),
            elapsed_time: "12ms".to_string(),
            ..Default::default()
        };

        let (out, err) = render_to_strings(&result);

        assert!(out.starts_with("Hello\n"), "got: {out:?}");
        let footer = out.lines().last().unwrap();
        assert!(footer.contains(FOOTER_LABEL));
        assert!(footer.contains("12ms"));
        assert!(!footer.contains("exit"));
        assert!(err.is_empty());
    }

    #[test]
    fn test_render_stderr_goes_to_err_stream() {
        let result = ExecutionResult {
            status: 1,
            stderr: "ls: cannot access 'x'".to_string(),
            elapsed_time: "3ms".to_string(),
            ..Default::default()
        };

        let (out, err) = render_to_strings(&result);

        assert!(err.contains("ls: cannot access 'x'"));
        assert!(!out.contains("cannot access"));
        assert!(out.contains("[exit 1]"));
    }

    #[test]
    fn test_render_empty_result_prints_footer_only() {
        let (out, err) = render_to_strings(&ExecutionResult::default());

        assert_eq!(out.lines().count(), 1);
        assert!(out.contains(FOOTER_LABEL));
        assert!(err.is_empty());
    }

    #[test]
    fn test_render_notes_images() {
        let mut result = ExecutionResult::default();
        result.images[0] = STANDARD.encode([0u8; 16]);

        let (out, _) = render_to_strings(&result);

        assert!(out.contains("[image 1: 16 bytes, not displayed]"));
    }

    #[test]
    fn test_render_error() {
        let mut err = Vec::new();
        render_error(&mut err, "connection refused");

        assert!(String::from_utf8(err).unwrap().contains("connection refused"));
    }
}
