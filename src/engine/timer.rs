//! Timer engine for the Floating Timer.
//!
//! This module provides the core timer functionality:
//! - State transitions (Idle → Running ⇄ Paused, Running → Completed → Idle)
//! - Countdown with a cancellable `tokio::time::Interval`
//! - One-shot, cancellable auto-reset after completion
//! - Event firing and snapshot publication for the UI

use std::future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::{interval_at, sleep, Instant, Interval, MissedTickBehavior, Sleep};
use tracing::{debug, info, warn};

use crate::sound::{SoundPlayer, SoundSource};
use crate::types::{
    step_opacity, StartKind, TimerConfig, TimerSnapshot, TimerState, AUTO_RESET_DELAY,
    TICK_INTERVAL,
};

// ============================================================================
// TimerEvent
// ============================================================================

/// Timer events for logging and external observers.
#[derive(Debug, Clone, PartialEq)]
pub enum TimerEvent {
    /// A fresh countdown started
    Started {
        /// Baseline captured for this run
        original_seconds: u64,
    },
    /// Countdown continued after a pause
    Resumed,
    /// Countdown paused
    Paused,
    /// Manually returned to idle
    Reset,
    /// A preset replaced the duration
    PresetApplied {
        /// Preset length in minutes
        minutes: u32,
    },
    /// Countdown reached zero
    Completed,
    /// Returned to idle after completion
    AutoReset,
    /// Window opacity changed
    OpacityChanged {
        /// New, clamped opacity
        opacity: f64,
    },
    /// One tick elapsed
    Tick {
        /// Remaining milliseconds
        remaining_millis: u64,
    },
}

// ============================================================================
// TimerCommand
// ============================================================================

/// Commands sent from the presentation layer to the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerCommand {
    /// Start or resume
    Start,
    /// Pause a running countdown
    Pause,
    /// Start unless running, otherwise pause
    Toggle,
    /// Return to idle
    Reset,
    /// Apply a preset duration in minutes
    SetPreset(u32),
    /// Set the window opacity
    SetOpacity(f64),
    /// Move the opacity by whole steps from its current value
    StepOpacity(i32),
    /// Stop the run loop
    Shutdown,
}

/// What woke the run loop.
enum Wake {
    Command(Option<TimerCommand>),
    Tick,
    AutoReset,
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Timer engine that owns the countdown state and its scheduled callbacks.
///
/// The ticker and the pending auto-reset are plain `Option` fields: disarming
/// drops them, so at most one tick source exists and a cancelled auto-reset
/// can never fire.
pub struct TimerEngine {
    /// Current timer state
    state: TimerState,
    /// Active tick source, present only while running
    ticker: Option<Interval>,
    /// Pending return to idle after completion
    auto_reset: Option<Pin<Box<Sleep>>>,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
    /// Snapshot publisher
    snapshot_tx: watch::Sender<TimerSnapshot>,
    /// Completion alert, if audio is available
    sound: Option<Arc<dyn SoundPlayer>>,
    /// Sound played on completion
    alert: SoundSource,
}

impl TimerEngine {
    /// Creates a new TimerEngine with the given configuration and event channel.
    pub fn new(config: &TimerConfig, event_tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        let state = TimerState::new(config);
        let (snapshot_tx, _) = watch::channel(state.snapshot());
        Self {
            state,
            ticker: None,
            auto_reset: None,
            event_tx,
            snapshot_tx,
            sound: None,
            alert: SoundSource::beep(),
        }
    }

    /// Attaches the player used for the completion alert.
    pub fn with_sound(mut self, player: Arc<dyn SoundPlayer>, alert: SoundSource) -> Self {
        self.sound = Some(player);
        self.alert = alert;
        self
    }

    /// Returns a receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Runs the engine until the command channel closes or `Shutdown` arrives.
    ///
    /// Must be polled on a tokio runtime with the time driver enabled.
    pub async fn run(&mut self, mut commands: mpsc::UnboundedReceiver<TimerCommand>) {
        loop {
            let wake = {
                let ticker = &mut self.ticker;
                let auto_reset = &mut self.auto_reset;
                tokio::select! {
                    command = commands.recv() => Wake::Command(command),
                    () = next_tick(ticker) => Wake::Tick,
                    () = deferred(auto_reset) => Wake::AutoReset,
                }
            };

            match wake {
                Wake::Command(None) | Wake::Command(Some(TimerCommand::Shutdown)) => {
                    debug!("Timer engine shutting down");
                    self.disarm();
                    return;
                }
                Wake::Command(Some(command)) => {
                    self.apply(command);
                }
                Wake::Tick => self.handle_tick(),
                Wake::AutoReset => self.handle_auto_reset(),
            }
        }
    }

    /// Applies a command, returning whether it was accepted.
    pub fn apply(&mut self, command: TimerCommand) -> bool {
        match command {
            TimerCommand::Start => self.start(),
            TimerCommand::Pause => self.pause(),
            TimerCommand::Toggle => self.toggle(),
            TimerCommand::Reset => self.reset(),
            TimerCommand::SetPreset(minutes) => self.set_preset(minutes),
            TimerCommand::SetOpacity(value) => self.set_opacity(value),
            TimerCommand::StepOpacity(steps) => self.step_opacity(steps),
            TimerCommand::Shutdown => {
                self.disarm();
                true
            }
        }
    }

    /// Starts a fresh countdown or resumes a paused one.
    ///
    /// A no-op while already running.
    pub fn start(&mut self) -> bool {
        let Some(kind) = self.state.start() else {
            debug!("start ignored: already running");
            return false;
        };

        self.auto_reset = None;
        self.arm_ticker();

        match kind {
            StartKind::Fresh => {
                info!(original = %self.state.formatted_time(), "Timer started");
                self.emit(TimerEvent::Started {
                    original_seconds: self.state.original_time().as_secs(),
                });
            }
            StartKind::Resume => {
                info!(remaining = %self.state.formatted_time(), "Timer resumed");
                self.emit(TimerEvent::Resumed);
            }
        }
        self.publish();
        true
    }

    /// Pauses a running countdown.
    pub fn pause(&mut self) -> bool {
        if !self.state.pause() {
            debug!(state = %self.state.run_state(), "pause ignored");
            return false;
        }

        self.ticker = None;
        info!(remaining = %self.state.formatted_time(), "Timer paused");
        self.emit(TimerEvent::Paused);
        self.publish();
        true
    }

    /// Starts unless running, otherwise pauses.
    pub fn toggle(&mut self) -> bool {
        if self.state.run_state().is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Returns to idle with the baseline restored.
    ///
    /// Cancels the ticker and any pending auto-reset.
    pub fn reset(&mut self) -> bool {
        if !self.state.reset() {
            debug!("reset ignored: already idle");
            return false;
        }

        self.disarm();
        info!(remaining = %self.state.formatted_time(), "Timer reset");
        self.emit(TimerEvent::Reset);
        self.publish();
        true
    }

    /// Replaces the duration with `minutes`, forcing idle.
    ///
    /// Rejected while running.
    pub fn set_preset(&mut self, minutes: u32) -> bool {
        if !self.state.set_preset(minutes) {
            debug!(minutes, "preset ignored while running");
            return false;
        }

        self.disarm();
        info!(minutes, "Preset applied");
        self.emit(TimerEvent::PresetApplied { minutes });
        self.publish();
        true
    }

    /// Sets the window opacity, clamped into `[0.3, 1.0]`.
    pub fn set_opacity(&mut self, value: f64) -> bool {
        if !self.state.set_opacity(value) {
            return false;
        }

        let opacity = self.state.opacity();
        debug!(opacity, "Opacity changed");
        self.emit(TimerEvent::OpacityChanged { opacity });
        self.publish();
        true
    }

    /// Moves the opacity by `steps` increments from the current value.
    pub fn step_opacity(&mut self, steps: i32) -> bool {
        self.set_opacity(step_opacity(self.state.opacity(), steps))
    }

    /// Handles one tick of the countdown.
    pub fn handle_tick(&mut self) {
        if !self.state.run_state().is_running() {
            // Stray tick after the ticker was dropped.
            self.ticker = None;
            return;
        }

        let completed = self.state.tick(TICK_INTERVAL);
        self.emit(TimerEvent::Tick {
            remaining_millis: self.state.time_remaining().as_millis() as u64,
        });

        if completed {
            self.handle_timer_complete();
        }
        self.publish();
    }

    /// Handles timer completion: stop ticking, alert once, schedule the reset.
    fn handle_timer_complete(&mut self) {
        self.ticker = None;
        info!("Timer completed");
        self.play_alert();
        self.emit(TimerEvent::Completed);
        self.auto_reset = Some(Box::pin(sleep(AUTO_RESET_DELAY)));
    }

    /// Handles the deferred return to idle after completion.
    pub fn handle_auto_reset(&mut self) {
        self.auto_reset = None;
        if !self.state.finish_completion() {
            return;
        }

        debug!(remaining = %self.state.formatted_time(), "Auto reset after completion");
        self.emit(TimerEvent::AutoReset);
        self.publish();
    }

    fn play_alert(&self) {
        let Some(player) = &self.sound else {
            return;
        };
        if let Err(e) = player.play(&self.alert) {
            warn!("Failed to play completion sound: {} ({})", e, e.suggestion());
        }
    }

    fn arm_ticker(&mut self) {
        let mut ticker = interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.ticker = Some(ticker);
    }

    fn disarm(&mut self) {
        self.ticker = None;
        self.auto_reset = None;
    }

    fn emit(&self, event: TimerEvent) {
        // Observers are optional; a closed channel is not an error.
        let _ = self.event_tx.send(event);
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.state.snapshot());
    }

    /// Returns a reference to the current timer state.
    pub fn get_state(&self) -> &TimerState {
        &self.state
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> TimerSnapshot {
        self.state.snapshot()
    }

    /// Returns true if a tick source is armed.
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Returns true if an auto-reset is pending.
    pub fn has_pending_reset(&self) -> bool {
        self.auto_reset.is_some()
    }

    /// Returns a mutable reference to the timer state (for testing).
    #[cfg(any(test, feature = "test-utils"))]
    pub fn get_state_mut(&mut self) -> &mut TimerState {
        &mut self.state
    }
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("state", &self.state)
            .field("ticking", &self.ticker.is_some())
            .field("pending_reset", &self.auto_reset.is_some())
            .finish_non_exhaustive()
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => future::pending().await,
    }
}

async fn deferred(sleep: &mut Option<Pin<Box<Sleep>>>) {
    match sleep {
        Some(sleep) => sleep.as_mut().await,
        None => future::pending().await,
    }
}

// ============================================================================
// Tests
// ============================================================================
