//! Millisecond timer service.
//!
//! Replaces the SDK's software timers (`disarm` / `setfn` / `arm`) with a
//! fixed table of periodic slots advanced one millisecond at a time.
//!
//! ```text
//!   hw timer ISR ──▶ Event::MillisTick ──▶ main loop
//!                                              │
//!                                              ▼
//!                                    TickScheduler::tick()
//!                                              │ due timers, fixed order
//!                                              ▼
//!                                  IoService handlers (run to completion)
//! ```
//!
//! Handlers never nest: `tick()` only reports which timers are due, the
//! caller runs them one after the other.

use heapless::Vec;
use log::{debug, warn};

/// Number of timer slots.
pub const TIMER_COUNT: usize = 3;

/// Timer identity.  Declaration order is dispatch order within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerId {
    /// Boot-button hold poll (500 ms).
    HoldPoll,
    /// Hold indicator blink (500 ms / 100 ms).
    Blink,
    /// Parser idle watchdog (1 ms).
    ParserIdle,
}

impl TimerId {
    pub const ALL: [TimerId; TIMER_COUNT] = [TimerId::HoldPoll, TimerId::Blink, TimerId::ParserIdle];

    const fn index(self) -> usize {
        match self {
            Self::HoldPoll => 0,
            Self::Blink => 1,
            Self::ParserIdle => 2,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct TimerSlot {
    period_ms: u32,
    remaining_ms: u32,
}

/// Due timers reported by one [`TickScheduler::tick`].
pub type DueTimers = Vec<TimerId, TIMER_COUNT>;

pub struct TickScheduler {
    slots: [Option<TimerSlot>; TIMER_COUNT],
    uptime_ms: u64,
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TickScheduler {
    pub fn new() -> Self {
        Self {
            slots: [None; TIMER_COUNT],
            uptime_ms: 0,
        }
    }

    /// (Re)arm `id` as a periodic timer.  The first fire is one full period
    /// from now; any pending phase is discarded.
    pub fn arm(&mut self, id: TimerId, period_ms: u32) {
        if period_ms == 0 {
            warn!("Timers: refusing zero period for {:?}", id);
            self.disarm(id);
            return;
        }
        debug!("Timers: arm {:?} every {} ms", id, period_ms);
        self.slots[id.index()] = Some(TimerSlot {
            period_ms,
            remaining_ms: period_ms,
        });
    }

    pub fn disarm(&mut self, id: TimerId) {
        if self.slots[id.index()].take().is_some() {
            debug!("Timers: disarm {:?}", id);
        }
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.slots[id.index()].is_some()
    }

    /// Period of `id`, if armed.
    pub fn period(&self, id: TimerId) -> Option<u32> {
        self.slots[id.index()].map(|s| s.period_ms)
    }

    pub fn uptime_ms(&self) -> u64 {
        self.uptime_ms
    }

    /// Advance by one millisecond and return the timers that fired.
    pub fn tick(&mut self) -> DueTimers {
        self.uptime_ms += 1;
        let mut due = DueTimers::new();
        for id in TimerId::ALL {
            if let Some(slot) = self.slots[id.index()].as_mut() {
                slot.remaining_ms -= 1;
                if slot.remaining_ms == 0 {
                    slot.remaining_ms = slot.period_ms;
                    // Capacity equals the slot count.
                    let _ = due.push(id);
                }
            }
        }
        due
    }
}
