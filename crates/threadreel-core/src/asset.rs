use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ReelError, ReelResult};
use crate::time::Duration;

/// Recognized background video extensions (lowercase).
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm"];
/// Recognized background image extensions (lowercase).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// The type of a background asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundKind {
    Video,
    Image,
}

impl BackgroundKind {
    /// Classify a path by its extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(BackgroundKind::Video)
        } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(BackgroundKind::Image)
        } else {
            None
        }
    }
}

impl std::fmt::Display for BackgroundKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackgroundKind::Video => write!(f, "video"),
            BackgroundKind::Image => write!(f, "image"),
        }
    }
}

/// A background media file. Shared read-only between segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BackgroundAsset {
    pub path: PathBuf,
    pub kind: BackgroundKind,
}

impl BackgroundAsset {
    pub fn new(path: impl Into<PathBuf>, kind: BackgroundKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Build an asset from a path with a recognized extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let kind = BackgroundKind::from_path(&path)?;
        Some(Self { path, kind })
    }
}

/// One synthesized narration, bound to exactly one segment.
///
/// An *owned* track deletes its file when dropped. The pipeline hands every
/// track to the clip builder by value, so the narration file is gone once
/// that segment's clip exists, whether or not the build succeeded.
#[derive(Debug)]
pub struct AudioTrack {
    path: PathBuf,
    duration: Duration,
    owned: bool,
}

impl AudioTrack {
    /// Create a track with a known duration. The file is left in place on drop.
    ///
    /// The duration must be finite and positive.
    pub fn new(path: impl Into<PathBuf>, duration: Duration) -> ReelResult<Self> {
        let path = path.into();
        let seconds = duration.as_seconds();
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(ReelError::missing_audio(
                0,
                path,
                format!("narration has invalid duration {}s", seconds),
            ));
        }
        Ok(Self {
            path,
            duration,
            owned: false,
        })
    }

    /// Mark the underlying file as owned by the pipeline: it is deleted on drop.
    pub fn owned(mut self) -> Self {
        self.owned = true;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_owned(&self) -> bool {
        self.owned
    }
}

impl Drop for AudioTrack {
    fn drop(&mut self) {
        if !self.owned {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("Removed narration file {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                "Failed to remove narration file {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}
