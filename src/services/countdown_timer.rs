use chrono::{DateTime, Duration, Utc};

/// Longer durations are clamped; keeps the deadline inside chrono's range.
const MAX_TIMER_SECS: i64 = 100 * 365 * 24 * 60 * 60;

/// Below this many seconds the view flags the countdown as urgent.
pub const URGENT_THRESHOLD_SECS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerState {
    Idle,
    Running,
    Stopped,
    Disposed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Still counting; seconds left.
    Tick(i64),
    /// Deadline reached. Emitted once per timer.
    Expired,
    /// Not running, or already expired.
    Inactive,
}

/// Deadline-based countdown: remaining time is always derived from the
/// server start timestamp, never decremented per tick.
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    started_at: DateTime<Utc>,
    duration: Duration,
    state: TimerState,
    expired_fired: bool,
}

impl CountdownTimer {
    pub fn new(started_at: DateTime<Utc>, duration_seconds: i64) -> Self {
        Self {
            started_at,
            duration: Duration::try_seconds(duration_seconds.clamp(0, MAX_TIMER_SECS))
                .unwrap_or_else(Duration::zero),
            state: TimerState::Idle,
            expired_fired: false,
        }
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.started_at.checked_add_signed(self.duration)
    }

    /// Whole seconds left at `now`, within `0..=duration`.
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        let elapsed = (now - self.started_at).num_seconds().max(0);
        (self.duration.num_seconds() - elapsed).max(0)
    }

    pub fn is_urgent(&self, now: DateTime<Utc>) -> bool {
        self.remaining_seconds(now) < URGENT_THRESHOLD_SECS
    }

    pub fn start(&mut self) {
        if self.state == TimerState::Idle || self.state == TimerState::Stopped {
            self.state = TimerState::Running;
        }
    }

    pub fn stop(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Stopped;
        }
    }

    /// Stops for good; `start` is ignored afterwards.
    pub fn dispose(&mut self) {
        self.state = TimerState::Disposed;
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn poll(&mut self, now: DateTime<Utc>) -> TimerEvent {
        if self.state != TimerState::Running || self.expired_fired {
            return TimerEvent::Inactive;
        }

        let remaining = self.remaining_seconds(now);
        if remaining == 0 {
            self.expired_fired = true;
            log::info!("Countdown reached zero (deadline {:?})", self.deadline());
            return TimerEvent::Expired;
        }
        TimerEvent::Tick(remaining)
    }
}

/// `mm:ss`, or `--:--` for an untimed attempt.
pub fn format_remaining(seconds: Option<i64>) -> String {
    match seconds {
        None => "--:--".to_string(),
        Some(s) => {
            let s = s.max(0);
            format!("{:02}:{:02}", s / 60, s % 60)
        }
    }
}
