use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use crate::foundation::{
    core::Millis,
    error::{FlipbookError, FlipbookResult},
};

/// Shared tally of armed [`IntervalTimer`]s.
///
/// Cloning shares the tally. Every timer created from a book is counted while armed, so a host
/// can check that teardown left nothing scheduled.
#[derive(Clone, Debug, Default)]
pub struct TimerBook {
    active: Arc<AtomicUsize>,
}

impl TimerBook {
    /// Empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unarmed timer counted by this book.
    pub fn timer(&self) -> IntervalTimer {
        IntervalTimer {
            book: self.clone(),
            schedule: None,
        }
    }

    /// Number of timers currently armed.
    pub fn active_count(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Schedule {
    period_ms: u64,
    next_due: Millis,
}

/// Repeating virtual-time timer.
///
/// The timer carries no callback: its owner polls [`IntervalTimer::fire_due`] and dispatches on
/// which timer fired. Dropping an armed timer cancels it.
#[derive(Debug)]
pub struct IntervalTimer {
    book: TimerBook,
    schedule: Option<Schedule>,
}

impl IntervalTimer {
    /// Return `true` while armed.
    pub fn is_active(&self) -> bool {
        self.schedule.is_some()
    }

    /// Fire every `period_ms`, first at `now + period_ms`. Re-arming replaces the old schedule.
    pub fn arm(&mut self, period_ms: u64, now: Millis) -> FlipbookResult<()> {
        if period_ms == 0 {
            return Err(FlipbookError::precondition("timer period must be > 0 ms"));
        }
        if self.schedule.is_none() {
            self.book.active.fetch_add(1, Ordering::SeqCst);
        }
        self.schedule = Some(Schedule {
            period_ms,
            next_due: now.after(period_ms),
        });
        Ok(())
    }

    /// Disarm. No-op when already idle.
    pub fn cancel(&mut self) {
        if self.schedule.take().is_some() {
            self.book.active.fetch_sub(1, Ordering::SeqCst);
        }
    }

    /// Time of the next tick, if armed.
    pub fn next_due(&self) -> Option<Millis> {
        self.schedule.map(|s| s.next_due)
    }

    /// Period, if armed.
    pub fn period_ms(&self) -> Option<u64> {
        self.schedule.map(|s| s.period_ms)
    }

    /// Consume the pending tick if it is due at `now`, rescheduling one period later.
    ///
    /// Returns the tick's nominal time, which may be earlier than `now`. A timer whose next tick
    /// would fall past the end of the timeline disarms after this one.
    pub fn fire_due(&mut self, now: Millis) -> Option<Millis> {
        let schedule = self.schedule.filter(|s| s.next_due <= now)?;
        Some(self.fire_at(schedule.next_due, schedule.period_ms))
    }

    /// Like [`IntervalTimer::fire_due`], but a backlog of missed ticks fires once, at the latest
    /// tick due at or before `now`.
    pub fn fire_latest(&mut self, now: Millis) -> Option<Millis> {
        let schedule = self.schedule.filter(|s| s.next_due <= now)?;
        let missed = now.since(schedule.next_due) / schedule.period_ms;
        let at = schedule.next_due.after(missed * schedule.period_ms);
        Some(self.fire_at(at, schedule.period_ms))
    }

    fn fire_at(&mut self, at: Millis, period_ms: u64) -> Millis {
        match at.checked_after(period_ms) {
            Some(next) => {
                if let Some(schedule) = self.schedule.as_mut() {
                    schedule.next_due = next;
                }
            }
            None => self.cancel(),
        }
        at
    }
}

impl Drop for IntervalTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
