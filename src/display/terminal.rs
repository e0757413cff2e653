//! Terminal message surface.

use super::{MessageSurface, CURSOR};
use crate::error::{Result, ToolbeltError};
use console::{style, Term};

/// Draws messages on stdout, writing only what changed between frames.
pub struct TerminalSurface {
    term: Term,
    shown: String,
    cursor_visible: bool,
    started: bool,
}

impl TerminalSurface {
    pub fn stdout() -> Self {
        Self {
            term: Term::stdout(),
            shown: String::new(),
            cursor_visible: false,
            started: false,
        }
    }
}

impl MessageSurface for TerminalSurface {
    fn show(&mut self, frame: &str) -> Result<()> {
        let map_err = |e: std::io::Error| ToolbeltError::Display(e.to_string());

        if !self.started {
            self.term
                .write_str(&format!("{} ", style("assistant:").cyan().bold()))
                .map_err(map_err)?;
            self.started = true;
        }

        let (body, with_cursor) = match frame.strip_suffix(CURSOR) {
            Some(body) => (body, true),
            None => (frame, false),
        };

        if self.cursor_visible {
            self.term.clear_chars(1).map_err(map_err)?;
            self.cursor_visible = false;
        }

        match body.strip_prefix(self.shown.as_str()) {
            Some(delta) => self.term.write_str(delta).map_err(map_err)?,
            None => {
                self.term.write_line("").map_err(map_err)?;
                self.term.write_str(body).map_err(map_err)?;
            }
        }
        self.shown = body.to_string();

        if with_cursor {
            self.term.write_str(&CURSOR.to_string()).map_err(map_err)?;
            self.cursor_visible = true;
        } else {
            self.term.write_line("").map_err(map_err)?;
            self.shown.clear();
            self.started = false;
        }

        self.term.flush().map_err(map_err)?;
        Ok(())
    }
}
