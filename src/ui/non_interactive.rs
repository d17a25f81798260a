//! Line-oriented UI for piped input.

use std::io::{BufRead, Write};

use crate::error::{Result, SettleError};

use super::{SpinnerHandle, UserInterface};

/// UI implementation that reads answers line by line from any reader.
///
/// Used when stdin is not a terminal (answers piped in from a file or
/// another process). Every prompt is written as a single line to stdout
/// followed by one blocking read.
pub struct NonInteractiveUI<R> {
    input: R,
}

impl<R: BufRead> NonInteractiveUI<R> {
    /// Create a UI reading answers from `input`.
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

impl<R: BufRead> UserInterface for NonInteractiveUI<R> {
    fn message(&mut self, msg: &str) {
        println!("{}", msg);
    }

    fn success(&mut self, msg: &str) {
        println!("✓ {}", msg);
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("⚠ {}", msg);
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        let mut stdout = std::io::stdout();
        writeln!(stdout, "{}", prompt)?;
        stdout.flush()?;

        // invalid UTF-8 becomes U+FFFD so the prompt layer can reject the line
        let mut bytes = Vec::new();
        let read = self.input.read_until(b'\n', &mut bytes)?;
        if read == 0 {
            return Err(SettleError::InputClosed);
        }
        let line = String::from_utf8_lossy(&bytes);
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        println!("  {}", message);
        Box::new(NoopSpinner)
    }

    fn show_header(&mut self, title: &str) {
        println!("\n{}\n", title);
    }
}

/// Spinner stand-in that prints the final status line only.
struct NoopSpinner;

impl SpinnerHandle for NoopSpinner {
    fn finish_success(&mut self, msg: &str) {
        println!("  ✓ {}", msg);
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("  ✗ {}", msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_lines_in_order() {
        let mut ui = NonInteractiveUI::new(Cursor::new("first\nsecond\n"));
        assert_eq!(ui.read_line("?").unwrap(), "first");
        assert_eq!(ui.read_line("?").unwrap(), "second");
    }

    #[test]
    fn strips_windows_line_endings() {
        let mut ui = NonInteractiveUI::new(Cursor::new("yes\r\n"));
        assert_eq!(ui.read_line("?").unwrap(), "yes");
    }

    #[test]
    fn last_line_without_newline_is_read() {
        let mut ui = NonInteractiveUI::new(Cursor::new("4"));
        assert_eq!(ui.read_line("?").unwrap(), "4");
    }

    #[test]
    fn invalid_utf8_is_read_as_a_line() {
        let mut ui = NonInteractiveUI::new(Cursor::new(b"\xff\xfe\nY\n".to_vec()));
        assert_eq!(ui.read_line("?").unwrap(), "\u{FFFD}\u{FFFD}");
        assert_eq!(ui.read_line("?").unwrap(), "Y");
    }

    #[test]
    fn end_of_input_is_input_closed() {
        let mut ui = NonInteractiveUI::new(Cursor::new(""));
        let err = ui.read_line("?").unwrap_err();
        assert!(matches!(err, SettleError::InputClosed));
    }

    #[test]
    fn empty_line_is_not_end_of_input() {
        let mut ui = NonInteractiveUI::new(Cursor::new("\n"));
        assert_eq!(ui.read_line("?").unwrap(), "");
    }
}
