//! Background discovery, selection and normalization.
//!
//! A background is either a video or a still image from the configured
//! directory, or a solid colour when nothing usable exists. Every layer is
//! normalized to the output frame size and planned to cover an exact
//! duration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use rand::seq::SliceRandom;
use rand::Rng;
use threadreel_core::frame::{CoverCrop, FrameBuffer};
use threadreel_core::{
    BackgroundAsset, BackgroundConfig, BackgroundKind, BackgroundSelection, Color, Duration,
    ExtendMode, ReelError, ReelResult,
};
use threadreel_encode::decode::{DecodeOptions, VideoFrameStream};
use threadreel_encode::probe::{self, VideoInfo};

pub use crate::image_loader::fit_to_frame;

/// Scale-to-cover then centre-crop geometry for a `src_w`x`src_h` source.
pub fn cover_crop(src_width: u32, src_height: u32, width: u32, height: u32) -> CoverCrop {
    CoverCrop::compute(src_width, src_height, width, height)
}

/// How a video source of a given length covers a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Play from the start and stop at the clip end.
    Trim,
    /// Restart from the first frame whenever the source ends.
    Loop,
    /// Play once, then freeze on the last frame.
    HoldLastFrame,
}

/// Explicit loop/trim decision for one clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackPlan {
    pub source: Duration,
    pub needed: Duration,
    pub mode: PlaybackMode,
}

impl PlaybackPlan {
    pub fn new(source: Duration, needed: Duration, extend: ExtendMode) -> Self {
        let mode = if needed.as_seconds() <= source.as_seconds() {
            PlaybackMode::Trim
        } else {
            match extend {
                ExtendMode::Loop => PlaybackMode::Loop,
                ExtendMode::HoldLastFrame => PlaybackMode::HoldLastFrame,
            }
        };
        Self {
            source,
            needed,
            mode,
        }
    }

    /// Number of times the source starts playing within the clip.
    pub fn passes(&self) -> u32 {
        match self.mode {
            PlaybackMode::Loop if self.source.as_seconds() > 0.0 => {
                (self.needed.as_seconds() / self.source.as_seconds()).ceil() as u32
            }
            _ => 1,
        }
    }
}

/// A background normalized to the output frame.
#[derive(Debug, Clone)]
pub enum BackgroundLayer {
    Solid(Color),
    /// A fitted still image, held for the whole clip. Shared between every
    /// clip that uses the same image.
    Still(Arc<FrameBuffer>),
    Video {
        path: PathBuf,
        info: VideoInfo,
        plan: PlaybackPlan,
        decode: DecodeOptions,
    },
}

impl BackgroundLayer {
    pub fn describe(&self) -> String {
        match self {
            BackgroundLayer::Solid(color) => format!("solid {}", color),
            BackgroundLayer::Still(fb) => format!("still {}x{}", fb.width, fb.height),
            BackgroundLayer::Video { path, plan, .. } => {
                format!("video {} ({:?})", path.display(), plan.mode)
            }
        }
    }

    pub fn plan(&self) -> Option<&PlaybackPlan> {
        match self {
            BackgroundLayer::Video { plan, .. } => Some(plan),
            _ => None,
        }
    }
}

/// Fitted stills keyed by source path and output size.
type StillCache = DashMap<(PathBuf, u32, u32), Arc<FrameBuffer>>;

/// Finds and prepares background assets.
#[derive(Debug, Clone)]
pub struct BackgroundProvider {
    config: BackgroundConfig,
    stills: Arc<StillCache>,
}

impl BackgroundProvider {
    pub fn new(config: BackgroundConfig) -> Self {
        Self {
            config,
            stills: Arc::new(DashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    /// All recognized assets in the background directory, sorted by file
    /// name. A missing or empty directory yields an empty list.
    pub fn list_available(&self) -> Vec<BackgroundAsset> {
        let dir = &self.config.dir;
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Backgrounds directory {} unavailable: {}", dir.display(), e);
                return Vec::new();
            }
        };

        let mut assets: Vec<BackgroundAsset> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter_map(BackgroundAsset::from_path)
            .collect();
        assets.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));

        if assets.is_empty() {
            tracing::warn!("No background files found in {}", dir.display());
        } else {
            tracing::debug!("Found {} backgrounds in {}", assets.len(), dir.display());
        }
        assets
    }

    /// Uniform random pick from the directory; `None` when it has no assets.
    pub fn select_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<BackgroundAsset> {
        self.list_available().choose(rng).cloned()
    }

    /// Pick backgrounds for `count` segments, in order, before any clip work.
    pub fn assign<R: Rng + ?Sized>(
        &self,
        count: usize,
        selection: BackgroundSelection,
        rng: &mut R,
    ) -> Vec<Option<BackgroundAsset>> {
        let assets = self.list_available();
        let choices: Vec<Option<BackgroundAsset>> = match selection {
            BackgroundSelection::Shared => {
                let shared = assets.choose(rng).cloned();
                vec![shared; count]
            }
            BackgroundSelection::PerSegment => {
                (0..count).map(|_| assets.choose(rng).cloned()).collect()
            }
        };

        match selection {
            BackgroundSelection::Shared => match choices.first().and_then(|c| c.as_ref()) {
                Some(asset) => tracing::info!("Selected background {}", asset.path.display()),
                None => tracing::warn!("No background selected"),
            },
            BackgroundSelection::PerSegment => {
                for (index, choice) in choices.iter().enumerate() {
                    match choice {
                        Some(asset) => tracing::info!(
                            "Selected background {} for segment {}",
                            asset.path.display(),
                            index
                        ),
                        None => tracing::warn!("No background selected for segment {}", index),
                    }
                }
            }
        }
        choices
    }

    /// Normalize `asset` to `width`x`height` covering `duration`.
    pub fn load_layer(
        &self,
        asset: &BackgroundAsset,
        width: u32,
        height: u32,
        fps: u32,
        duration: Duration,
    ) -> ReelResult<BackgroundLayer> {
        match asset.kind {
            BackgroundKind::Image => {
                let key = (asset.path.clone(), width, height);
                if let Some(still) = self.stills.get(&key) {
                    return Ok(BackgroundLayer::Still(Arc::clone(still.value())));
                }
                let image = crate::image_loader::load_image(&asset.path)?;
                let fitted = fit_to_frame(&image, width, height);
                let still = Arc::new(crate::image_loader::blur(&fitted, self.config.blur_radius));
                // Another worker may have prepared the same image meanwhile.
                let still = Arc::clone(self.stills.entry(key).or_insert(still).value());
                Ok(BackgroundLayer::Still(still))
            }
            BackgroundKind::Video => {
                let info = probe::probe_video(&asset.path)?;
                let plan = PlaybackPlan::new(info.duration, duration, self.config.extend);
                let decode = DecodeOptions {
                    crop: cover_crop(info.width, info.height, width, height),
                    fps: fps as f64,
                    limit: (plan.mode == PlaybackMode::Trim).then_some(duration),
                    blur_sigma: self.config.blur_radius,
                };

                // Make sure the file actually decodes before committing to it.
                let mut stream = VideoFrameStream::open(&asset.path, &decode)?;
                if stream.next_frame()?.is_none() {
                    return Err(ReelError::asset("video produced no frames", &asset.path));
                }

                Ok(BackgroundLayer::Video {
                    path: asset.path.clone(),
                    info,
                    plan,
                    decode,
                })
            }
        }
    }

    /// The configured solid-colour fallback, if any.
    pub fn fallback_layer(&self) -> Option<BackgroundLayer> {
        self.config.fallback_color.map(BackgroundLayer::Solid)
    }

    /// Load `asset`, falling back to the solid colour when it is missing or
    /// unusable.
    pub fn layer_for(
        &self,
        asset: Option<&BackgroundAsset>,
        width: u32,
        height: u32,
        fps: u32,
        duration: Duration,
    ) -> ReelResult<BackgroundLayer> {
        let error = match asset {
            Some(asset) => match self.load_layer(asset, width, height, fps, duration) {
                Ok(layer) => return Ok(layer),
                Err(e) => e,
            },
            None => ReelError::asset("no background available", &self.config.dir),
        };

        match self.fallback_layer() {
            Some(layer) => {
                tracing::warn!("{}; using {}", error, layer.describe());
                Ok(layer)
            }
            None => Err(error),
        }
    }
}
