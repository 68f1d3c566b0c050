//! Sound system error types.
//!
//! Every variant is recoverable: the engine logs the error and keeps running
//! without an audible alert.

use thiserror::Error;

/// Errors that can occur while playing the completion alert.
#[derive(Debug, Error)]
pub enum SoundError {
    /// No audio output device could be opened.
    #[error("オーディオデバイスが利用できません: {0}")]
    DeviceNotAvailable(String),

    /// The alert sound file does not exist or cannot be read.
    #[error("サウンドファイルが見つかりません: {0}")]
    FileNotFound(String),

    /// The alert sound file is not in a supported format.
    #[error("サウンドファイルのデコードに失敗しました: {0}")]
    DecodeError(String),

    /// A sink could not be attached to the output stream.
    #[error("サウンド再生エラー: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_))
    }

    /// Returns true if playback should fall back to the synthesized beep.
    #[must_use]
    pub fn should_fallback_to_beep(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::DecodeError(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "オーディオデバイスを接続してください",
            Self::FileNotFound(_) | Self::DecodeError(_) => "ビープ音で代替します",
            Self::PlaybackError(_) => "オーディオ設定を確認してください",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SoundError::DeviceNotAvailable("no device".to_string());
        assert!(err.to_string().contains("no device"));
        assert!(err.to_string().contains("オーディオデバイス"));

        let err = SoundError::FileNotFound("/path/to/Tink.aiff".to_string());
        assert!(err.to_string().contains("/path/to/Tink.aiff"));

        let err = SoundError::PlaybackError("sink".to_string());
        assert!(err.to_string().contains("sink"));
    }

    #[test]
    fn test_is_device_error() {
        assert!(SoundError::DeviceNotAvailable("x".into()).is_device_error());
        assert!(!SoundError::FileNotFound("x".into()).is_device_error());
        assert!(!SoundError::PlaybackError("x".into()).is_device_error());
    }

    #[test]
    fn test_should_fallback_to_beep() {
        assert!(SoundError::FileNotFound("x".into()).should_fallback_to_beep());
        assert!(SoundError::DecodeError("x".into()).should_fallback_to_beep());
        assert!(!SoundError::DeviceNotAvailable("x".into()).should_fallback_to_beep());
        assert!(!SoundError::PlaybackError("x".into()).should_fallback_to_beep());
    }

    #[test]
    fn test_suggestion() {
        assert!(SoundError::DeviceNotAvailable("x".into())
            .suggestion()
            .contains("オーディオデバイス"));
        assert!(SoundError::DecodeError("x".into())
            .suggestion()
            .contains("ビープ"));
    }
}
