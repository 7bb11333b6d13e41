use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::color::Color;
use crate::error::{ReelError, ReelResult};

/// Default config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "threadreel.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VideoConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// x264 constant rate factor.
    pub crf: u8,
    /// x264 preset name.
    pub preset: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            fps: 30,
            crf: 23,
            preset: "medium".to_string(),
        }
    }
}

/// What to do when a background video is shorter than the narration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtendMode {
    /// Restart the video from its first frame.
    #[default]
    Loop,
    /// Freeze on the last frame.
    HoldLastFrame,
}

/// How backgrounds are picked for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundSelection {
    /// One random background for the whole video.
    #[default]
    Shared,
    /// A fresh random background for every segment.
    PerSegment,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub dir: PathBuf,
    /// Solid color used when no background asset is usable. `None` disables
    /// the fallback, so a missing background drops the segment.
    pub fallback_color: Option<Color>,
    /// Gaussian blur sigma applied to the background; 0 disables.
    pub blur_radius: f32,
    pub extend: ExtendMode,
    pub selection: BackgroundSelection,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets/backgrounds"),
            fallback_color: Some(Color::SLATE),
            blur_radius: 0.0,
            extend: ExtendMode::Loop,
            selection: BackgroundSelection::Shared,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TextConfig {
    /// Preferred TrueType/OpenType font file.
    pub font: Option<PathBuf>,
    pub color: Color,
    /// Horizontal padding between the frame edge and text, in pixels.
    pub padding: u32,
    /// Gap between stacked lines, in pixels.
    pub line_spacing: u32,
    /// Whether the built-in bitmap face may be used when no font file loads.
    pub allow_builtin_font: bool,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font: None,
            color: Color::WHITE,
            padding: 60,
            line_spacing: 12,
            allow_builtin_font: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Upper bound on concurrent clip builds.
    pub workers: usize,
    /// Seed for background selection. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ReelConfig {
    #[serde(default)]
    pub video: VideoConfig,
    #[serde(default)]
    pub background: BackgroundConfig,
    #[serde(default)]
    pub text: TextConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

impl ReelConfig {
    pub fn load_from_file(path: &Path) -> ReelResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: ReelConfig = toml::from_str(&contents).map_err(|e| {
            ReelError::config(format!("invalid config {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> ReelResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> ReelResult<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ReelError::config(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn validate(&self) -> ReelResult<()> {
        if self.video.width == 0 || self.video.height == 0 {
            return Err(ReelError::config("video dimensions must be non-zero"));
        }
        // yuv420p needs even dimensions.
        if self.video.width % 2 != 0 || self.video.height % 2 != 0 {
            return Err(ReelError::config(format!(
                "video dimensions must be even, got {}x{}",
                self.video.width, self.video.height
            )));
        }
        if self.video.fps == 0 {
            return Err(ReelError::config("fps must be non-zero"));
        }
        if self.render.workers == 0 {
            return Err(ReelError::config("render.workers must be at least 1"));
        }
        let blur = self.background.blur_radius;
        if blur.is_nan() || blur < 0.0 {
            return Err(ReelError::config("background.blur_radius must be >= 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_vertical_1080p() {
        let config = ReelConfig::default();
        assert_eq!((config.video.width, config.video.height), (1080, 1920));
        assert_eq!(config.video.fps, 30);
        assert_eq!(config.background.fallback_color, Some(Color::SLATE));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ReelConfig = toml::from_str(
            r##"
            [video]
            fps = 60

            [background]
            dir = "bg"
            extend = "hold_last_frame"
            selection = "per_segment"
            fallback_color = "#000000"

            [render]
            seed = 7
            "##,
        )
        .unwrap();
        assert_eq!(config.video.fps, 60);
        assert_eq!(config.video.width, 1080);
        assert_eq!(config.background.dir, PathBuf::from("bg"));
        assert_eq!(config.background.extend, ExtendMode::HoldLastFrame);
        assert_eq!(config.background.selection, BackgroundSelection::PerSegment);
        assert_eq!(config.background.fallback_color, Some(Color::BLACK));
        assert_eq!(config.render.seed, Some(7));
        assert_eq!(config.render.workers, 2);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ReelConfig::default();
        config.video.fps = 0;
        assert!(config.validate().is_err());

        let mut config = ReelConfig::default();
        config.video.width = 1081;
        assert!(config.validate().is_err());

        let mut config = ReelConfig::default();
        config.render.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut config = ReelConfig::default();
        config.render.seed = Some(42);
        config.text.font = Some(PathBuf::from("fonts/Inter.ttf"));
        config.save_to_file(&path).unwrap();

        let loaded = ReelConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.render.seed, Some(42));
        assert_eq!(loaded.text.font, Some(PathBuf::from("fonts/Inter.ttf")));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = ReelConfig::load_or_default(Path::new("/nonexistent/threadreel.toml")).unwrap();
        assert_eq!(config.video.fps, 30);
    }
}
