//! Focus timer state machine and tick sources.
//!
//! The timer is a three-state (stopped/running/paused) counter accumulating
//! elapsed seconds into three independent totals: the current session, the
//! day and the week. It is driven from outside by a 1 Hz tick source and is
//! optionally bound to one task by id (a weak reference; the task may be
//! deleted without affecting the timer).
//!
//! Transition policy: every transition is a plain state overwrite. `pause`
//! while stopped is a silent no-op rather than an error, matching the
//! surface the product exposes (no pause control is offered while stopped).

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Daily focus goal for the productivity gauge: 4 hours.
pub const DAILY_TARGET_SECONDS: u64 = 14_400;

/// Focus timer state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TimerState {
    Stopped,
    Running,
    Paused,
}

/// The per-session focus timer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusTimer {
    pub state: TimerState,
    pub session_seconds: u64,
    pub today_seconds: u64,
    pub week_seconds: u64,
    /// Bound task id, if any. Binding never affects counters or state.
    pub task_in_focus: Option<String>,
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusTimer {
    /// A fresh timer: stopped, all counters zero, no bound task.
    pub fn new() -> Self {
        FocusTimer {
            state: TimerState::Stopped,
            session_seconds: 0,
            today_seconds: 0,
            week_seconds: 0,
            task_in_focus: None,
        }
    }

    /// `stopped|paused -> running`. Always allowed; already-running is a
    /// no-op.
    pub fn start(&mut self) {
        self.state = TimerState::Running;
    }

    /// `running -> paused`. Silently ignored in any other state.
    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
        }
    }

    /// `running|paused -> stopped`, resetting the session counter only.
    /// Today/week totals and the task binding survive. Allowed while
    /// already stopped, where it has no visible effect.
    pub fn stop(&mut self) {
        self.state = TimerState::Stopped;
        self.session_seconds = 0;
    }

    /// Bind a task by id. Legal in any state.
    pub fn bind_task(&mut self, task_id: impl Into<String>) {
        self.task_in_focus = Some(task_id.into());
    }

    /// Remove the task binding. Legal in any state.
    pub fn clear_task(&mut self) {
        self.task_in_focus = None;
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// One accumulation second: all three counters advance together, so a
    /// partial increment is never observable. Callers gate this on
    /// [`FocusTimer::is_running`].
    pub fn tick(&mut self) {
        self.session_seconds += 1;
        self.today_seconds += 1;
        self.week_seconds += 1;
    }

    /// Fraction of the daily goal reached, clamped to 1.0.
    pub fn progress_ratio(&self, target_seconds: u64) -> f64 {
        if target_seconds == 0 {
            return 1.0;
        }
        (self.today_seconds as f64 / target_seconds as f64).min(1.0)
    }

    /// Display label for the current state (pt-BR, as the product shows).
    pub fn status_label(&self) -> &'static str {
        match self.state {
            TimerState::Running => "Ativo",
            TimerState::Paused => "Pausado",
            TimerState::Stopped => "Encerrado",
        }
    }
}

/// Format seconds as zero-padded "HH:MM:SS".
pub fn format_hms(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// Format seconds as "Xh Ymin".
pub fn format_hm(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    format!("{}h {}min", h, m)
}

/// A drift-free repeating tick source.
///
/// The event loop owns one ticker per concern: one gating focus
/// accumulation on the running state, and an independent one refreshing the
/// displayed wall clock in every state. Each ticker dies with its owner, so
/// no tick outlives the session.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    last: Instant,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Ticker {
            period,
            last: Instant::now(),
        }
    }

    /// Whole periods elapsed since the last poll. Advances the internal
    /// mark by exactly that many periods, so no fractional time is lost
    /// between polls.
    pub fn poll(&mut self) -> u32 {
        let elapsed = self.last.elapsed();
        if elapsed < self.period {
            return 0;
        }
        let n = (elapsed.as_nanos() / self.period.as_nanos()) as u32;
        self.last += self.period * n;
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let t = FocusTimer::new();
        assert_eq!(t.state, TimerState::Stopped);
        assert_eq!(
            (t.session_seconds, t.today_seconds, t.week_seconds),
            (0, 0, 0)
        );
        assert!(t.task_in_focus.is_none());
    }

    #[test]
    fn test_start_tick_pause_stop_sequence() {
        let mut t = FocusTimer::new();
        t.start();
        assert!(t.is_running());
        for _ in 0..5 {
            t.tick();
        }
        t.pause();
        assert_eq!(t.state, TimerState::Paused);
        assert_eq!(
            (t.session_seconds, t.today_seconds, t.week_seconds),
            (5, 5, 5)
        );
        t.stop();
        assert_eq!(t.state, TimerState::Stopped);
        assert_eq!(t.session_seconds, 0);
        assert_eq!((t.today_seconds, t.week_seconds), (5, 5));
    }

    #[test]
    fn test_pause_while_stopped_is_noop() {
        let mut t = FocusTimer::new();
        t.pause();
        assert_eq!(t.state, TimerState::Stopped);
    }

    #[test]
    fn test_stop_while_stopped_is_noop() {
        let mut t = FocusTimer::new();
        t.start();
        t.tick();
        t.stop();
        t.stop();
        assert_eq!(t.state, TimerState::Stopped);
        assert_eq!(t.session_seconds, 0);
        assert_eq!(t.today_seconds, 1);
    }

    #[test]
    fn test_resume_after_pause_keeps_session() {
        let mut t = FocusTimer::new();
        t.start();
        t.tick();
        t.tick();
        t.pause();
        t.start();
        t.tick();
        assert_eq!(t.session_seconds, 3);
    }

    #[test]
    fn test_binding_survives_stop() {
        let mut t = FocusTimer::new();
        t.bind_task("T-101");
        t.start();
        t.tick();
        t.stop();
        assert_eq!(t.task_in_focus.as_deref(), Some("T-101"));
        t.clear_task();
        assert!(t.task_in_focus.is_none());
    }

    #[test]
    fn test_progress_ratio_clamps() {
        let mut t = FocusTimer::new();
        t.today_seconds = 20_000;
        assert_eq!(t.progress_ratio(DAILY_TARGET_SECONDS), 1.0);
        t.today_seconds = 7_200;
        assert!((t.progress_ratio(DAILY_TARGET_SECONDS) - 0.5).abs() < 1e-9);
        assert_eq!(t.progress_ratio(0), 1.0);
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(3_725), "01:02:05");
        assert_eq!(format_hm(14_400), "4h 0min");
        assert_eq!(format_hm(5_400), "1h 30min");
    }

    #[test]
    fn test_ticker_accumulates_whole_periods() {
        let mut ticker = Ticker::new(Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(5));
        let n = ticker.poll();
        assert!(n >= 4, "expected at least 4 periods, got {n}");
        // Immediately after a poll there is less than one period pending.
        assert_eq!(ticker.poll(), 0);
    }
}
