//! Performance measurement tools.
//!
//! Timers only record anything while profiling is enabled via [`set_enabled`]. It is disabled by
//! default, so timers can be left in hot code at almost no cost.

use std::{
    fmt, mem,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, PoisonError,
    },
    time::{Duration, Instant},
};

static ENABLED: AtomicBool = AtomicBool::new(false);

/// Globally enables or disables recording of timings.
pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

/// Returns whether timers currently record timings.
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// A timer that can measure how long an operation takes.
///
/// Collected timings are summarized and reset when the timer is displayed using `{}`
/// ([`std::fmt::Display`]).
pub struct Timer {
    name: &'static str,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    total: Duration,
    min: Option<Duration>,
    max: Duration,
    /// The number of measurements since the last reset.
    count: u32,
}

impl Timer {
    /// Creates a new timer.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Mutex::new(State::default()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the number of timings recorded since the last reset.
    pub fn count(&self) -> u32 {
        self.lock().count
    }

    /// Invokes a closure, measuring and recording the time it takes.
    pub fn time<T>(&self, timee: impl FnOnce() -> T) -> T {
        let _guard = self.start();
        timee()
    }

    /// Starts timing an operation using a drop guard.
    ///
    /// When the returned [`TimerGuard`] is dropped, the time between the call to `start` and the
    /// drop is recorded, provided profiling is enabled at that point.
    pub fn start(&self) -> TimerGuard<'_> {
        TimerGuard {
            start: Instant::now(),
            timer: self,
        }
    }

    fn record(&self, duration: Duration) {
        if !is_enabled() {
            return;
        }

        let mut state = self.lock();
        state.total += duration;
        state.min = Some(state.min.map_or(duration, |min| min.min(duration)));
        state.max = state.max.max(duration);
        state.count += 1;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // `State` is always left consistent, so a panic elsewhere can't corrupt it.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Displays the recorded timings and resets them.
impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = mem::take(&mut *self.lock());

        let ms = |d: Duration| d.as_secs_f64() * 1000.0;
        let avg = if state.count == 0 {
            0.0
        } else {
            ms(state.total) / f64::from(state.count)
        };
        let min = state.min.map_or(0.0, ms);
        let max = ms(state.max);

        write!(
            f,
            "{}: {}x{avg:.02}ms ({min:.02}..{max:.02})",
            self.name, state.count
        )
    }
}

/// Cloning a timer resets its collected timings.
impl Clone for Timer {
    fn clone(&self) -> Self {
        Self::new(self.name)
    }
}

/// Guard returned by [`Timer::start`]. Stops timing the operation when dropped.
pub struct TimerGuard<'a> {
    start: Instant,
    timer: &'a Timer,
}

impl Drop for TimerGuard<'_> {
    fn drop(&mut self) {
        self.timer.record(self.start.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    // The enable switch is process-wide, so everything that toggles it lives in one test.
    #[test]
    fn timer() {
        set_enabled(false);
        let timer = Timer::new("work");
        assert_eq!(timer.time(|| 7), 7);
        assert_eq!(timer.count(), 0);
        assert_eq!(timer.to_string(), "work: 0x0.00ms (0.00..0.00)");

        set_enabled(true);
        timer.time(|| thread::sleep(Duration::from_millis(2)));
        {
            let _guard = timer.start();
            thread::sleep(Duration::from_millis(4));
        }
        assert_eq!(timer.count(), 2);

        let state = timer.lock();
        assert!(state.min.unwrap() >= Duration::from_millis(2));
        assert!(state.max >= Duration::from_millis(4));
        assert!(state.min.unwrap() <= state.max);
        drop(state);

        let s = timer.to_string();
        assert!(s.starts_with("work: 2x"), "{s}");
        assert_eq!(timer.count(), 0);
        assert_eq!(timer.clone().name(), "work");

        // Disabling while a guard is live drops the measurement.
        let guard = timer.start();
        set_enabled(false);
        drop(guard);
        assert_eq!(timer.count(), 0);
    }
}
