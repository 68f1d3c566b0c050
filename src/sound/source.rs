//! Alert sound sources.
//!
//! The completion alert prefers the platform's own alert sound and falls back
//! to a synthesized beep when none is installed.

use std::path::PathBuf;

/// Directories searched for a system alert sound.
#[cfg(target_os = "macos")]
const SYSTEM_SOUND_DIRS: &[&str] = &["/System/Library/Sounds", "/Library/Sounds"];

#[cfg(target_os = "windows")]
const SYSTEM_SOUND_DIRS: &[&str] = &["C:\\Windows\\Media"];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const SYSTEM_SOUND_DIRS: &[&str] = &[
    "/usr/share/sounds/freedesktop/stereo",
    "/usr/share/sounds/gnome/default/alerts",
];

/// Alert sound names to try, in order of preference.
const ALERT_SOUND_NAMES: &[&str] = &["Tink", "Funk", "Glass", "Windows Ding", "complete", "bell"];

/// Supported audio file extensions.
const SUPPORTED_EXTENSIONS: &[&str] = &["aiff", "wav", "oga", "ogg", "flac", "mp3"];

/// Default beep pitch.
pub const BEEP_FREQUENCY_HZ: f32 = 880.0;

/// Default beep length.
pub const BEEP_DURATION_MS: u64 = 180;

/// Represents the source of the completion alert.
#[derive(Debug, Clone, PartialEq)]
pub enum SoundSource {
    /// A sound file shipped with the operating system.
    System {
        /// The name of the sound (e.g., "Tink").
        name: String,
        /// The full path to the sound file.
        path: PathBuf,
    },
    /// A sine tone generated at playback time.
    Beep {
        /// Tone frequency in hertz.
        frequency_hz: f32,
        /// Tone length in milliseconds.
        duration_ms: u64,
    },
}

impl SoundSource {
    /// Creates a new system sound source.
    #[must_use]
    pub fn system(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::System {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Creates the default synthesized beep.
    #[must_use]
    pub fn beep() -> Self {
        Self::Beep {
            frequency_hz: BEEP_FREQUENCY_HZ,
            duration_ms: BEEP_DURATION_MS,
        }
    }

    /// Returns a short label for logging.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::System { name, .. } => name,
            Self::Beep { .. } => "beep",
        }
    }

    /// Returns true if this is a system sound.
    #[must_use]
    pub fn is_system(&self) -> bool {
        matches!(self, Self::System { .. })
    }
}

/// Finds the preferred system alert sound, if any is installed.
#[must_use]
pub fn find_alert_sound() -> Option<SoundSource> {
    for name in ALERT_SOUND_NAMES {
        for dir in SYSTEM_SOUND_DIRS {
            for ext in SUPPORTED_EXTENSIONS {
                let path = PathBuf::from(dir).join(format!("{name}.{ext}"));
                if path.is_file() {
                    return Some(SoundSource::system(*name, path));
                }
            }
        }
    }
    None
}

/// Gets the sound source used for the completion alert.
///
/// Falls back to the synthesized beep when no system sound is found.
#[must_use]
pub fn get_default_sound() -> SoundSource {
    find_alert_sound().unwrap_or_else(SoundSource::beep)
}
