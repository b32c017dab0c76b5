//! Text rendering of diagnostics.
//!
//! Layout:
//!
//! ```text
//! --- main.sb:1:5 - ERROR unterminated string literal
//!  1 | x + "abc
//!    |     ^^^^
//! hint: add a closing '"' before the end of the line
//! ```

use crate::{Diagnostic, Severity};
use std::fmt::{self, Write};

// ANSI color codes
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Renders diagnostics in the dashed-header, echoed-line, caret-underline form.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    pub color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn render(&self, diagnostic: &Diagnostic<'_>, out: &mut impl Write) -> fmt::Result {
        let (on, off) = if self.color {
            let color = match diagnostic.severity {
                Severity::Error => RED,
                Severity::Warning => YELLOW,
                Severity::Info => CYAN,
            };
            (color, RESET)
        } else {
            ("", "")
        };

        writeln!(
            out,
            "--- {} - {on}{}{off} {}{}{}",
            diagnostic.span.start,
            diagnostic.severity,
            if self.color { BOLD } else { "" },
            diagnostic.message,
            off,
        )?;

        // A diagnostic pointing past the last line still gets its header.
        if let Ok(text) = diagnostic.file().get_line(diagnostic.line()) {
            let text = text.trim_end_matches(['\n', '\r']);
            let gutter = diagnostic.line().to_string();
            let blank = " ".repeat(gutter.len());
            writeln!(out, "{gutter} | {text}")?;

            let mut underline = String::new();
            for ch in text.chars().take(diagnostic.column().saturating_sub(1) as usize) {
                underline.push(if ch == '\t' { '\t' } else { ' ' });
            }
            let carets = diagnostic.highlight_len().max(1) as usize;
            underline.push_str(&"^".repeat(carets));
            writeln!(out, "{blank} | {on}{underline}{off}")?;
        }

        if let Some(hint) = &diagnostic.hint {
            writeln!(out, "hint: {hint}")?;
        }
        Ok(())
    }
}

/// Render a diagnostic without color.
pub fn render(diagnostic: &Diagnostic<'_>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = Renderer::new(false).render(diagnostic, &mut out);
    out
}
