//! Parser idle watchdog.
//!
//! A serial link that drops mid escape sequence would leave the ANSI
//! parser waiting forever for the rest of it.  The watchdog samples the
//! parser's received-character counter every [`PARSER_IDLE_POLL_MS`]; if
//! it stays unchanged for longer than the configured timeout the parser is
//! reset, once, and the watchdog disarms until the next character.

/// Poll period; the configured timeout is counted in these ticks.
pub const PARSER_IDLE_POLL_MS: u32 = 1;

pub struct IdleWatchdog {
    last_count: u32,
    /// Unchanged ticks since the last character; `None` once the reset for
    /// this idle period has fired (or before any character arrived).
    idle_ticks: Option<u32>,
}

impl Default for IdleWatchdog {
    fn default() -> Self {
        Self::new()
    }
}

impl IdleWatchdog {
    pub fn new() -> Self {
        Self {
            last_count: 0,
            idle_ticks: None,
        }
    }

    /// Whether a reset is still pending for the current idle period.
    pub fn is_armed(&self) -> bool {
        self.idle_ticks.is_some()
    }

    /// Sample `char_count`.  Returns the idle tick count when the parser
    /// must be reset now.  `timeout == 0` disables the watchdog.
    pub fn tick(&mut self, char_count: u32, timeout: u32) -> Option<u32> {
        if timeout == 0 {
            return None;
        }

        if char_count != self.last_count {
            self.last_count = char_count;
            self.idle_ticks = Some(0);
            return None;
        }

        let idle = self.idle_ticks.as_mut()?;
        *idle = idle.saturating_add(1);
        if *idle > timeout {
            let fired_after = *idle;
            self.idle_ticks = None;
            return Some(fired_after);
        }
        None
    }
}
