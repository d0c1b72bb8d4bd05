//! The round clock.

use std::time::{Duration, Instant};

/// Smallest period accepted, so a zero period cannot spin.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A cancellable repeating timer.
///
/// The timer does not run on its own thread; the owner polls it with the
/// current time and gets back how many periods elapsed since the last poll.
/// Cancelling it guarantees no further ticks until it is started again, so a
/// superseded round can never be ticked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    period: Duration,
    next_due: Option<Instant>,
}

impl Countdown {
    /// A stopped timer firing every `period` once started.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(MIN_PERIOD),
            next_due: None,
        }
    }

    /// (Re)start the timer; the first tick is due one period after `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    /// Stop the timer.
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Whether the timer is running.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Time left until the next tick, if running.
    #[must_use]
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// Number of ticks that came due at or before `now`, consuming them.
    pub fn due_ticks(&mut self, now: Instant) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };

        let mut ticks = 0u32;
        while due <= now {
            ticks = ticks.saturating_add(1);
            due += self.period;
        }
        self.next_due = Some(due);
        ticks
    }
}
