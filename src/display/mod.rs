//! Typewriter-style rendering of assistant messages.
//!
//! A [`Typewriter`] reveals text one character at a time on a
//! [`MessageSurface`], showing a block cursor after the partial text until the
//! whole message is out.

mod terminal;

pub use terminal::TerminalSurface;

use crate::error::Result;
use std::time::Duration;

/// Cursor shown after partially revealed text.
pub const CURSOR: char = '▌';

/// Somewhere a message can be drawn and redrawn.
pub trait MessageSurface {
    /// Replace what is shown with `frame`.
    fn show(&mut self, frame: &str) -> Result<()>;
}

/// Reveals messages character by character.
#[derive(Debug, Clone)]
pub struct Typewriter {
    delay: Duration,
}

impl Typewriter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_settings(settings: &crate::config::DisplaySettings) -> Self {
        Self::new(Duration::from_millis(settings.typewriter_delay_ms))
    }

    /// Type `chars` onto `surface`, then show the finished message.
    pub async fn type_out<S, I>(&self, surface: &mut S, chars: I) -> Result<String>
    where
        S: MessageSurface + ?Sized,
        I: IntoIterator<Item = char>,
    {
        let mut shown = String::new();
        for ch in chars {
            shown.push(ch);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            surface.show(&format!("{}{}", shown, CURSOR))?;
        }
        surface.show(&shown)?;
        Ok(shown)
    }
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new(Duration::from_millis(20))
    }
}

/// Surface that records every frame, for tests and headless use.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub frames: Vec<String>,
}

impl MessageSurface for RecordingSurface {
    fn show(&mut self, frame: &str) -> Result<()> {
        self.frames.push(frame.to_string());
        Ok(())
    }
}
