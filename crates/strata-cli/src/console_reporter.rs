//! Terminal rendering of deploy output.

use std::io::{self, Write};
use std::sync::Mutex;

use console::style;

use strata_core::remote::{MigrationError, MigrationMessage};
use strata_core::reporter::{Reporter, error_lines, message_lines};

/// Reporter that writes styled text to a terminal.
pub struct ConsoleReporter<W: Write + Send = io::Stdout> {
    /// Output writer (for testing)
    writer: Mutex<W>,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self, text: &str, newline: bool) {
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Write errors (closed pipe) are ignored.
        let _ = if newline {
            writeln!(writer, "{}", text)
        } else {
            write!(writer, "{}", text)
        };
        let _ = writer.flush();
    }
}

impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    fn log(&self, text: &str) {
        self.write(text, true);
    }

    fn warn(&self, text: &str) {
        self.write(&format!("{} {}", style("⚠").yellow(), text), true);
    }

    fn error(&self, error: &dyn std::error::Error) {
        self.write(
            &format!("{} {}", style("Error:").red().bold(), error),
            true,
        );
    }

    fn action_start(&self, text: &str) {
        self.write(&format!("{}...", text), false);
    }

    fn action_stop(&self) {
        self.write(&format!(" {}", style("done").green()), true);
    }

    fn print_messages(&self, messages: &[MigrationMessage]) {
        for line in message_lines(messages) {
            let styled = match line.trim_start().chars().next() {
                Some('+') => style(line).green(),
                Some('-') => style(line).red(),
                Some('~') => style(line).yellow(),
                _ => style(line),
            };
            self.write(&styled.to_string(), true);
        }
    }

    fn print_errors(&self, errors: &[MigrationError]) {
        for line in error_lines(errors) {
            self.write(&style(line).red().to_string(), true);
        }
    }
}
