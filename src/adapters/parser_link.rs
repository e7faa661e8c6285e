//! Link to the ANSI escape-sequence parser.
//!
//! The parser runs on the UART receive path and bumps a character counter
//! for every byte it consumes.  The idle watchdog only reads that counter
//! and latches a reset request, which the parser picks up before its next
//! byte.  Both sides touch atomics only.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

pub struct ParserLink {
    char_count: AtomicU32,
    reset_requested: AtomicBool,
}

static PARSER_LINK: ParserLink = ParserLink::new();

impl Default for ParserLink {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserLink {
    pub const fn new() -> Self {
        Self {
            char_count: AtomicU32::new(0),
            reset_requested: AtomicBool::new(false),
        }
    }

    /// The process-wide link shared with the UART receive path.
    pub fn global() -> &'static ParserLink {
        &PARSER_LINK
    }

    /// Parser side: account for `n` received characters (wrapping).
    pub fn record_chars(&self, n: u32) {
        self.char_count.fetch_add(n, Ordering::Relaxed);
    }

    /// Parser side: consume a pending reset request.
    pub fn take_reset_request(&self) -> bool {
        self.reset_requested.swap(false, Ordering::AcqRel)
    }

    pub fn count(&self) -> u32 {
        self.char_count.load(Ordering::Relaxed)
    }

    pub fn request_reset(&self) {
        self.reset_requested.store(true, Ordering::Release);
    }
}
