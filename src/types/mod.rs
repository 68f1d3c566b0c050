//! Core data types for the Floating Timer.
//!
//! This module defines the data structures used for:
//! - Countdown state and its run/pause/reset transitions
//! - Derived display values (formatted time, progress)
//! - Startup configuration with validation
//! - Opacity bounds shared by the engine and the overlay window

use std::fmt;
use std::time::Duration;

use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Interval between two ticks while the timer is running.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Delay between completion and the automatic return to idle.
pub const AUTO_RESET_DELAY: Duration = Duration::from_millis(500);

/// Countdown length used when nothing else is configured.
pub const DEFAULT_MINUTES: u32 = 5;

/// Upper bound accepted for a configured countdown length.
pub const MAX_MINUTES: u32 = 999;

/// Durations offered as quick presets, in minutes.
pub const PRESET_MINUTES: [u32; 9] = [1, 5, 10, 15, 20, 25, 30, 45, 60];

/// Lowest window opacity.
pub const MIN_OPACITY: f64 = 0.3;

/// Highest window opacity.
pub const MAX_OPACITY: f64 = 1.0;

/// Opacity applied at startup.
pub const DEFAULT_OPACITY: f64 = 0.95;

/// Granularity of the opacity control.
pub const OPACITY_STEP: f64 = 0.05;

/// Clamps an opacity value into `[MIN_OPACITY, MAX_OPACITY]`.
///
/// NaN maps to `MAX_OPACITY` so the result is always inside the bound.
#[must_use]
pub fn clamp_opacity(value: f64) -> f64 {
    if value.is_nan() {
        return MAX_OPACITY;
    }
    value.clamp(MIN_OPACITY, MAX_OPACITY)
}

/// Moves an opacity value by `steps` increments of `OPACITY_STEP`.
///
/// The input is first snapped to the step grid so repeated stepping never
/// accumulates floating point error.
#[must_use]
pub fn step_opacity(current: f64, steps: i32) -> f64 {
    let grid = (clamp_opacity(current) / OPACITY_STEP).round();
    clamp_opacity((grid + f64::from(steps)) * OPACITY_STEP)
}

/// Formats a duration as `MM:SS`, flooring to whole seconds.
///
/// Minutes are not wrapped at 60.
#[must_use]
pub fn format_time(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

// ============================================================================
// RunState
// ============================================================================

/// Represents the current run state of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// Not started, or returned to the start after a reset
    #[default]
    Idle,
    /// Counting down
    Running,
    /// Stopped mid-countdown, remaining time preserved
    Paused,
    /// Reached zero; returns to idle shortly
    Completed,
}

impl RunState {
    /// Returns the string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Paused => "paused",
            RunState::Completed => "completed",
        }
    }

    /// Returns true if the countdown is actively ticking.
    pub fn is_running(&self) -> bool {
        *self == RunState::Running
    }

    /// Returns true if a preset may replace the current duration.
    pub fn accepts_preset(&self) -> bool {
        !self.is_running()
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TimerConfig
// ============================================================================

/// Errors reported by [`TimerConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Initial duration outside `0..=MAX_MINUTES`.
    #[error("タイマーの時間は0-{max}分の範囲で指定してください: {0}", max = MAX_MINUTES)]
    MinutesOutOfRange(u32),

    /// Opacity that is not a finite number.
    #[error("不透明度には有限の数値を指定してください: {0}")]
    InvalidOpacity(f64),
}

/// Startup configuration for the timer.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerConfig {
    /// Initial countdown length in minutes (0-999)
    pub initial_minutes: u32,
    /// Initial window opacity, clamped into `[0.3, 1.0]` when applied
    pub opacity: f64,
    /// Whether the completion alert is audible
    pub sound_enabled: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            initial_minutes: DEFAULT_MINUTES,
            opacity: DEFAULT_OPACITY,
            sound_enabled: true,
        }
    }
}

impl TimerConfig {
    /// Creates a new configuration with the specified initial duration.
    pub fn with_initial_minutes(mut self, minutes: u32) -> Self {
        self.initial_minutes = minutes;
        self
    }

    /// Creates a new configuration with the specified opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// Creates a new configuration with the completion alert toggled.
    pub fn with_sound(mut self, enabled: bool) -> Self {
        self.sound_enabled = enabled;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_minutes > MAX_MINUTES {
            return Err(ConfigError::MinutesOutOfRange(self.initial_minutes));
        }
        if !self.opacity.is_finite() {
            return Err(ConfigError::InvalidOpacity(self.opacity));
        }
        Ok(())
    }

    /// Returns the initial duration.
    pub fn initial_duration(&self) -> Duration {
        minutes_to_duration(self.initial_minutes)
    }
}

fn minutes_to_duration(minutes: u32) -> Duration {
    Duration::from_secs(u64::from(minutes) * 60)
}

// ============================================================================
// TimerState
// ============================================================================

/// How a successful `start` entered the running state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartKind {
    /// A new countdown; `original_time` was captured
    Fresh,
    /// Continued from pause; `original_time` untouched
    Resume,
}

/// Countdown state owned by the timer engine.
///
/// Fields are private so the transitions below are the only way to change
/// them; each transition returns whether it was accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerState {
    time_remaining: Duration,
    original_time: Duration,
    run_state: RunState,
    opacity: f64,
}

impl TimerState {
    /// Creates an idle state from the configuration.
    pub fn new(config: &TimerConfig) -> Self {
        let duration = config.initial_duration();
        Self {
            time_remaining: duration,
            original_time: duration,
            run_state: RunState::Idle,
            opacity: clamp_opacity(config.opacity),
        }
    }

    /// Enters `Running`.
    ///
    /// From `Idle` the current remaining time becomes the new baseline. From
    /// `Completed` the baseline is restored first. From `Paused` the countdown
    /// continues. Returns `None` if already running.
    pub fn start(&mut self) -> Option<StartKind> {
        let kind = match self.run_state {
            RunState::Running => return None,
            RunState::Paused => StartKind::Resume,
            RunState::Idle => {
                self.original_time = self.time_remaining;
                StartKind::Fresh
            }
            RunState::Completed => {
                self.time_remaining = self.original_time;
                StartKind::Fresh
            }
        };
        self.run_state = RunState::Running;
        Some(kind)
    }

    /// Pauses a running countdown, keeping the remaining time.
    pub fn pause(&mut self) -> bool {
        if !self.run_state.is_running() {
            return false;
        }
        self.run_state = RunState::Paused;
        true
    }

    /// Returns to `Idle` with the remaining time restored to the baseline.
    ///
    /// A no-op when already idle.
    pub fn reset(&mut self) -> bool {
        if self.run_state == RunState::Idle {
            return false;
        }
        self.run_state = RunState::Idle;
        self.time_remaining = self.original_time;
        true
    }

    /// Replaces both durations with `minutes` and forces `Idle`.
    ///
    /// Rejected while running.
    pub fn set_preset(&mut self, minutes: u32) -> bool {
        if !self.run_state.accepts_preset() {
            return false;
        }
        let duration = minutes_to_duration(minutes);
        self.time_remaining = duration;
        self.original_time = duration;
        self.run_state = RunState::Idle;
        true
    }

    /// Sets the opacity, clamped into bounds.
    ///
    /// Returns true if the stored value changed. NaN is ignored.
    pub fn set_opacity(&mut self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        let clamped = clamp_opacity(value);
        if (clamped - self.opacity).abs() < f64::EPSILON {
            return false;
        }
        self.opacity = clamped;
        true
    }

    /// Decrements the remaining time by `step`, saturating at zero.
    ///
    /// Returns true if this tick completed the countdown. Ticks outside
    /// `Running` are ignored.
    pub fn tick(&mut self, step: Duration) -> bool {
        if !self.run_state.is_running() {
            return false;
        }
        self.time_remaining = self.time_remaining.saturating_sub(step);
        if self.time_remaining.is_zero() {
            self.run_state = RunState::Completed;
            return true;
        }
        false
    }

    /// Leaves `Completed` for `Idle`, restoring the baseline.
    ///
    /// Returns false if the state is no longer `Completed`.
    pub fn finish_completion(&mut self) -> bool {
        if self.run_state != RunState::Completed {
            return false;
        }
        self.run_state = RunState::Idle;
        self.time_remaining = self.original_time;
        true
    }

    /// Returns the remaining time.
    pub fn time_remaining(&self) -> Duration {
        self.time_remaining
    }

    /// Returns the baseline of the current run.
    pub fn original_time(&self) -> Duration {
        self.original_time
    }

    /// Returns the run state.
    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Returns the opacity.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Returns the remaining time as `MM:SS`.
    pub fn formatted_time(&self) -> String {
        format_time(self.time_remaining)
    }

    /// Returns the elapsed fraction of the baseline, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.original_time.is_zero() {
            return 0.0;
        }
        let ratio = self.time_remaining.as_secs_f64() / self.original_time.as_secs_f64();
        (1.0 - ratio).clamp(0.0, 1.0)
    }

    /// Captures the state and its derived values.
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            run_state: self.run_state,
            time_remaining: self.time_remaining,
            original_time: self.original_time,
            opacity: self.opacity,
            formatted_time: self.formatted_time(),
            progress: self.progress(),
        }
    }

    /// Overwrites the remaining time (for testing).
    #[cfg(any(test, feature = "test-utils"))]
    pub fn set_time_remaining(&mut self, remaining: Duration) {
        self.time_remaining = remaining.min(self.original_time);
    }
}

// ============================================================================
// TimerSnapshot
// ============================================================================

/// Published copy of the timer state, with derived values precomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerSnapshot {
    /// Run state at publication time
    pub run_state: RunState,
    /// Remaining time
    pub time_remaining: Duration,
    /// Baseline of the current run
    pub original_time: Duration,
    /// Window opacity
    pub opacity: f64,
    /// Remaining time as `MM:SS`
    pub formatted_time: String,
    /// Elapsed fraction in `[0, 1]`
    pub progress: f64,
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        TimerState::new(&TimerConfig::default()).snapshot()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn idle_state(minutes: u32) -> TimerState {
        TimerState::new(&TimerConfig::default().with_initial_minutes(minutes))
    }

    // ------------------------------------------------------------------------
    // Helper Function Tests
    // ------------------------------------------------------------------------

    mod helper_tests {
        use super::*;

        #[test]
        fn test_clamp_opacity() {
            assert_eq!(clamp_opacity(1.5), 1.0);
            assert_eq!(clamp_opacity(0.0), 0.3);
            assert_eq!(clamp_opacity(0.5), 0.5);
            assert_eq!(clamp_opacity(f64::NAN), 1.0);
            assert_eq!(clamp_opacity(f64::NEG_INFINITY), 0.3);
        }

        #[test]
        fn test_step_opacity() {
            assert!((step_opacity(0.95, 1) - 1.0).abs() < 1e-9);
            assert!((step_opacity(1.0, 1) - 1.0).abs() < 1e-9);
            assert!((step_opacity(0.3, -1) - 0.3).abs() < 1e-9);
            assert!((step_opacity(0.5, -2) - 0.4).abs() < 1e-9);
        }

        #[test]
        fn test_step_opacity_snaps_to_grid() {
            assert!((step_opacity(0.52, 0) - 0.5).abs() < 1e-9);
        }

        #[test]
        fn test_format_time() {
            assert_eq!(format_time(Duration::ZERO), "00:00");
            assert_eq!(format_time(Duration::from_secs(300)), "05:00");
            assert_eq!(format_time(Duration::from_millis(299_900)), "04:59");
            assert_eq!(format_time(Duration::from_secs(3600)), "60:00");
            assert_eq!(format_time(Duration::from_secs(100 * 60 + 7)), "100:07");
        }
    }

    // ------------------------------------------------------------------------
    // RunState Tests
    // ------------------------------------------------------------------------

    mod run_state_tests {
        use super::*;

        #[test]
        fn test_default_is_idle() {
            assert_eq!(RunState::default(), RunState::Idle);
        }

        #[test]
        fn test_as_str() {
            assert_eq!(RunState::Idle.as_str(), "idle");
            assert_eq!(RunState::Running.as_str(), "running");
            assert_eq!(RunState::Paused.as_str(), "paused");
            assert_eq!(RunState::Completed.as_str(), "completed");
        }

        #[test]
        fn test_accepts_preset() {
            assert!(RunState::Idle.accepts_preset());
            assert!(RunState::Paused.accepts_preset());
            assert!(RunState::Completed.accepts_preset());
            assert!(!RunState::Running.accepts_preset());
        }
    }

    // ------------------------------------------------------------------------
    // TimerConfig Tests
    // ------------------------------------------------------------------------

    mod config_tests {
        use super::*;

        #[test]
        fn test_default() {
            let config = TimerConfig::default();
            assert_eq!(config.initial_minutes, 5);
            assert_eq!(config.opacity, 0.95);
            assert!(config.sound_enabled);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_builders() {
            let config = TimerConfig::default()
                .with_initial_minutes(25)
                .with_opacity(0.5)
                .with_sound(false);
            assert_eq!(config.initial_minutes, 25);
            assert_eq!(config.opacity, 0.5);
            assert!(!config.sound_enabled);
            assert_eq!(config.initial_duration(), Duration::from_secs(1500));
        }

        #[test]
        fn test_validate_minutes_out_of_range() {
            let config = TimerConfig::default().with_initial_minutes(1000);
            assert_eq!(
                config.validate(),
                Err(ConfigError::MinutesOutOfRange(1000))
            );
        }

        #[test]
        fn test_validate_nan_opacity() {
            let config = TimerConfig::default().with_opacity(f64::NAN);
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidOpacity(_))
            ));
        }

        #[test]
        fn test_out_of_range_opacity_is_clamped_not_rejected() {
            let config = TimerConfig::default().with_opacity(3.0);
            assert!(config.validate().is_ok());
            assert_eq!(TimerState::new(&config).opacity(), 1.0);
        }
    }

    // ------------------------------------------------------------------------
    // TimerState Tests
    // ------------------------------------------------------------------------

    mod timer_state_tests {
        use super::*;

        #[test]
        fn test_new() {
            let state = idle_state(5);
            assert_eq!(state.run_state(), RunState::Idle);
            assert_eq!(state.time_remaining(), Duration::from_secs(300));
            assert_eq!(state.original_time(), Duration::from_secs(300));
            assert_eq!(state.opacity(), 0.95);
            assert_eq!(state.formatted_time(), "05:00");
            assert_eq!(state.progress(), 0.0);
        }

        #[test]
        fn test_start_from_idle_captures_baseline() {
            let mut state = idle_state(5);
            assert_eq!(state.start(), Some(StartKind::Fresh));
            assert_eq!(state.run_state(), RunState::Running);
            assert_eq!(state.original_time(), Duration::from_secs(300));
        }

        #[test]
        fn test_start_while_running_is_rejected() {
            let mut state = idle_state(5);
            state.start();
            assert_eq!(state.start(), None);
            assert_eq!(state.run_state(), RunState::Running);
        }

        #[test]
        fn test_pause_and_resume_keep_baseline() {
            let mut state = idle_state(5);
            state.start();
            state.tick(Duration::from_secs(60));

            assert!(state.pause());
            assert_eq!(state.run_state(), RunState::Paused);
            assert_eq!(state.time_remaining(), Duration::from_secs(240));

            assert_eq!(state.start(), Some(StartKind::Resume));
            assert_eq!(state.original_time(), Duration::from_secs(300));
            assert_eq!(state.time_remaining(), Duration::from_secs(240));
        }

        #[test]
        fn test_pause_not_running() {
            let mut state = idle_state(5);
            assert!(!state.pause());
            assert_eq!(state.run_state(), RunState::Idle);
        }

        #[test]
        fn test_reset_restores_baseline() {
            let mut state = idle_state(5);
            state.start();
            state.tick(Duration::from_secs(90));

            assert!(state.reset());
            assert_eq!(state.run_state(), RunState::Idle);
            assert_eq!(state.time_remaining(), Duration::from_secs(300));
        }

        #[test]
        fn test_reset_idle_is_noop() {
            let mut state = idle_state(5);
            assert!(!state.reset());
        }

        #[test]
        fn test_set_preset_rejected_while_running() {
            let mut state = idle_state(5);
            state.start();
            state.tick(Duration::from_secs(1));
            let before = state.clone();

            assert!(!state.set_preset(10));
            assert_eq!(state, before);
        }

        #[test]
        fn test_set_preset_while_paused_forces_idle() {
            let mut state = idle_state(5);
            state.start();
            state.tick(Duration::from_secs(30));
            state.pause();

            assert!(state.set_preset(10));
            assert_eq!(state.run_state(), RunState::Idle);
            assert_eq!(state.time_remaining(), Duration::from_secs(600));
            assert_eq!(state.original_time(), Duration::from_secs(600));
        }

        #[test]
        fn test_tick_completes_at_zero() {
            let mut state = idle_state(0);
            state.set_preset(1);
            state.start();
            state.set_time_remaining(Duration::from_millis(200));

            assert!(!state.tick(TICK_INTERVAL));
            assert!(state.tick(TICK_INTERVAL));
            assert_eq!(state.run_state(), RunState::Completed);
            assert_eq!(state.time_remaining(), Duration::ZERO);
        }

        #[test]
        fn test_tick_saturates() {
            let mut state = idle_state(1);
            state.start();
            state.set_time_remaining(Duration::from_millis(50));

            assert!(state.tick(TICK_INTERVAL));
            assert_eq!(state.time_remaining(), Duration::ZERO);
        }

        #[test]
        fn test_tick_ignored_when_not_running() {
            let mut state = idle_state(5);
            assert!(!state.tick(TICK_INTERVAL));
            assert_eq!(state.time_remaining(), Duration::from_secs(300));
        }

        #[test]
        fn test_finish_completion() {
            let mut state = idle_state(1);
            state.start();
            state.tick(Duration::from_secs(60));
            assert_eq!(state.run_state(), RunState::Completed);

            assert!(state.finish_completion());
            assert_eq!(state.run_state(), RunState::Idle);
            assert_eq!(state.time_remaining(), Duration::from_secs(60));
            assert!(!state.finish_completion());
        }

        #[test]
        fn test_start_from_completed_restores_baseline() {
            let mut state = idle_state(1);
            state.start();
            state.tick(Duration::from_secs(60));

            assert_eq!(state.start(), Some(StartKind::Fresh));
            assert_eq!(state.time_remaining(), Duration::from_secs(60));
            assert_eq!(state.original_time(), Duration::from_secs(60));
        }

        #[test]
        fn test_set_opacity_clamps() {
            let mut state = idle_state(5);
            assert!(state.set_opacity(1.5));
            assert_eq!(state.opacity(), 1.0);
            assert!(state.set_opacity(0.0));
            assert_eq!(state.opacity(), 0.3);
            assert!(!state.set_opacity(0.1));
            assert!(!state.set_opacity(f64::NAN));
            assert_eq!(state.opacity(), 0.3);
        }

        #[test]
        fn test_progress() {
            let mut state = idle_state(10);
            state.start();
            state.tick(Duration::from_secs(150));
            assert!((state.progress() - 0.25).abs() < 1e-9);
            assert_eq!(state.formatted_time(), "07:30");
        }

        #[test]
        fn test_progress_zero_baseline() {
            let state = idle_state(0);
            assert_eq!(state.progress(), 0.0);
        }

        #[test]
        fn test_remaining_never_exceeds_baseline() {
            let mut state = idle_state(5);
            state.start();
            state.set_time_remaining(Duration::from_secs(900));
            assert_eq!(state.time_remaining(), Duration::from_secs(300));
        }

        #[test]
        fn test_snapshot() {
            let mut state = idle_state(5);
            state.start();
            state.tick(Duration::from_secs(60));

            let snapshot = state.snapshot();
            assert_eq!(snapshot.run_state, RunState::Running);
            assert_eq!(snapshot.formatted_time, "04:00");
            assert!((snapshot.progress - 0.2).abs() < 1e-9);
            assert_eq!(snapshot.original_time, Duration::from_secs(300));
        }
    }
}
