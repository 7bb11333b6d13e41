/// Core error types for the threadreel pipeline.
use std::path::PathBuf;

/// A specialized Result type for threadreel operations.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error type encompassing every pipeline stage.
///
/// Per-segment variants (`MissingAudio`, `AssetUnavailable`, `Render`) are
/// recoverable: the orchestrator drops the segment and keeps going. Everything
/// else aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum ReelError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("missing audio for segment {segment_index}: {reason} ({path:?})")]
    MissingAudio {
        segment_index: usize,
        path: PathBuf,
        reason: String,
    },

    #[error("asset unavailable: {message} ({path:?})")]
    AssetUnavailable { message: String, path: PathBuf },

    #[error("render error in segment {segment_index}: {message}")]
    Render {
        segment_index: usize,
        message: String,
    },

    #[error("no content: every segment was dropped, nothing to write")]
    NoContent,

    #[error("encode error: {0}")]
    Encode(String),

    #[error("render cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ReelError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        ReelError::Configuration(message.into())
    }

    /// Create a missing-audio error for a segment.
    pub fn missing_audio(
        segment_index: usize,
        path: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        ReelError::MissingAudio {
            segment_index,
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an asset error.
    pub fn asset(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        ReelError::AssetUnavailable {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Create a render error for a segment.
    pub fn render(segment_index: usize, message: impl Into<String>) -> Self {
        ReelError::Render {
            segment_index,
            message: message.into(),
        }
    }

    /// Whether the error only affects a single segment.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ReelError::MissingAudio { .. }
                | ReelError::AssetUnavailable { .. }
                | ReelError::Render { .. }
        )
    }

    /// Re-tag a per-segment error with the index of the segment it belongs to.
    ///
    /// Lower layers do not know which segment they are working for and report
    /// index 0; the clip builder fixes that up at its boundary.
    pub fn for_segment(self, index: usize) -> Self {
        match self {
            ReelError::MissingAudio { path, reason, .. } => ReelError::MissingAudio {
                segment_index: index,
                path,
                reason,
            },
            ReelError::Render { message, .. } => ReelError::Render {
                segment_index: index,
                message,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_audio_display() {
        let err = ReelError::missing_audio(3, "/tmp/narration_3.wav", "file not found");
        assert_eq!(
            err.to_string(),
            "missing audio for segment 3: file not found (\"/tmp/narration_3.wav\")"
        );
    }

    #[test]
    fn test_asset_error_display() {
        let err = ReelError::asset("no background found", "/assets/backgrounds");
        assert!(err.to_string().contains("no background found"));
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(ReelError::missing_audio(0, "a.wav", "gone").is_recoverable());
        assert!(ReelError::asset("x", "y").is_recoverable());
        assert!(ReelError::render(1, "bad overlay").is_recoverable());
        assert!(!ReelError::config("count mismatch").is_recoverable());
        assert!(!ReelError::NoContent.is_recoverable());
        assert!(!ReelError::Encode("codec".into()).is_recoverable());
        assert!(!ReelError::Cancelled.is_recoverable());
    }

    #[test]
    fn test_for_segment_retags_index() {
        let err = ReelError::render(0, "glyph cache").for_segment(7);
        match err {
            ReelError::Render { segment_index, .. } => assert_eq!(segment_index, 7),
            other => panic!("unexpected error: {other}"),
        }
        let untouched = ReelError::NoContent.for_segment(7);
        assert!(matches!(untouched, ReelError::NoContent));
    }
}
