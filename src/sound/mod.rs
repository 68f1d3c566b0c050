//! Sound playback for the completion alert.
//!
//! This module provides:
//!
//! - Discovery of the platform alert sound
//! - A synthesized beep fallback
//! - Non-blocking playback through rodio
//! - Graceful degradation when audio is unavailable
//!
//! # Usage
//!
//! ```rust,no_run
//! use floating_timer::sound::{get_default_sound, RodioSoundPlayer};
//!
//! let player = RodioSoundPlayer::new(false).expect("audio init");
//! player.play(&get_default_sound()).expect("playback failed");
//! ```

mod error;
mod player;
mod source;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub use error::SoundError;
pub use player::{try_create_player, RodioSoundPlayer};
pub use source::{find_alert_sound, get_default_sound, SoundSource};

/// Trait for sound playback implementations.
///
/// The timer engine only depends on this trait, so tests can count alerts
/// with [`MockSoundPlayer`].
pub trait SoundPlayer {
    /// Plays a sound from the given source without blocking.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, source: &SoundSource) -> Result<(), SoundError>;

    /// Returns true if sound playback is disabled.
    fn is_disabled(&self) -> bool;
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self, source)
    }

    fn is_disabled(&self) -> bool {
        RodioSoundPlayer::is_disabled(self)
    }
}

/// Mock sound player for testing.
#[derive(Debug, Default)]
pub struct MockSoundPlayer {
    play_calls: Mutex<Vec<SoundSource>>,
    failures: AtomicUsize,
    disabled: AtomicBool,
    should_fail: AtomicBool,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::SeqCst);
    }

    /// Number of successful plays.
    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().unwrap().len()
    }

    /// Number of plays that returned an error.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<SoundSource> {
        self.play_calls.lock().unwrap().clone()
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            self.failures.fetch_add(1, Ordering::SeqCst);
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        if self.disabled.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.play_calls.lock().unwrap().push(source.clone());
        Ok(())
    }

    fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_plays() {
        let mock = MockSoundPlayer::new();
        mock.play(&SoundSource::beep()).unwrap();
        mock.play(&SoundSource::beep()).unwrap();

        assert_eq!(mock.play_count(), 2);
        assert_eq!(mock.get_play_calls()[0], SoundSource::beep());
    }

    #[test]
    fn test_mock_failure() {
        let mock = MockSoundPlayer::new();
        mock.set_should_fail(true);

        assert!(mock.play(&SoundSource::beep()).is_err());
        assert_eq!(mock.play_count(), 0);
        assert_eq!(mock.failure_count(), 1);
    }

    #[test]
    fn test_mock_disabled() {
        let mock = MockSoundPlayer::new();
        mock.set_disabled(true);

        assert!(mock.is_disabled());
        assert!(mock.play(&SoundSource::beep()).is_ok());
        assert_eq!(mock.play_count(), 0);
    }
}
