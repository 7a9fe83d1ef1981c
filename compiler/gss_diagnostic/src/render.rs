//! Human-readable diagnostic rendering.
//!
//! The formatted layout is fixed:
//!
//! ```text
//! <kind> error in <file> at line L column C:
//! <source line>
//! <caret under column>
//! <message>
//! ```
//!
//! Diagnostics with unknown locations render as a single
//! `<kind> error: <message>` line.

use std::io::{self, Write};

use crate::diagnostic::GssError;

/// ANSI color codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const WARNING: &str = "\x1b[1;33m"; // Bold yellow
    pub const BOLD: &str = "\x1b[1m";
    pub const RESET: &str = "\x1b[0m";
}

/// Returns "s" for plural counts, "" for singular.
#[inline]
fn plural_s(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Render one diagnostic in the fixed caret format.
pub fn format_error(error: &GssError) -> String {
    let Some(source) = error.location.source() else {
        return format!("{} error: {}\n", error.kind, error.message);
    };
    let (line, column) = error.line_and_column();
    let line_text = source.line_text(line).unwrap_or("");
    let caret: String = line_text
        .chars()
        .take(column as usize - 1)
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .chain(std::iter::once('^'))
        .collect();
    format!(
        "{} error in {} at line {} column {}:\n{}\n{}\n{}\n",
        error.kind,
        source.file_name(),
        line,
        column,
        line_text,
        caret,
        error.message
    )
}

/// Terminal emitter with optional ANSI colors.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
}

impl<W: Write> TerminalEmitter<W> {
    /// Create a new terminal emitter.
    pub fn new(writer: W, colors: bool) -> Self {
        TerminalEmitter { writer, colors }
    }

    /// Create a terminal emitter for stderr.
    pub fn stderr(colors: bool) -> TerminalEmitter<io::Stderr> {
        TerminalEmitter {
            writer: io::stderr(),
            colors,
        }
    }

    /// Emit one diagnostic.
    pub fn emit(&mut self, error: &GssError) {
        let rendered = format_error(error);
        if self.colors {
            // Highlight only the header line.
            match rendered.split_once('\n') {
                Some((header, rest)) => {
                    let _ = writeln!(
                        self.writer,
                        "{}{}{}",
                        colors::ERROR,
                        header,
                        colors::RESET
                    );
                    let _ = write!(self.writer, "{rest}");
                }
                None => {
                    let _ = write!(self.writer, "{rendered}");
                }
            }
        } else {
            let _ = write!(self.writer, "{rendered}");
        }
    }

    /// Emit all diagnostics followed by a summary line.
    pub fn emit_all(&mut self, errors: &[GssError], warning_count: usize) {
        for error in errors {
            self.emit(error);
        }
        if warning_count > 0 {
            let style = if self.colors { colors::WARNING } else { "" };
            let reset = if self.colors { colors::RESET } else { "" };
            let _ = writeln!(
                self.writer,
                "{style}{warning_count} warning{}{reset}",
                plural_s(warning_count)
            );
        }
        if !errors.is_empty() {
            let style = if self.colors { colors::BOLD } else { "" };
            let reset = if self.colors { colors::RESET } else { "" };
            let _ = writeln!(
                self.writer,
                "{style}{} error{}{reset}",
                errors.len(),
                plural_s(errors.len())
            );
        }
    }
}
