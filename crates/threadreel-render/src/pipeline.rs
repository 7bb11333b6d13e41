use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use threadreel_core::{BackgroundAsset, Duration, ReelConfig, ReelError, ReelResult, Segment};
use threadreel_encode::audio;
use threadreel_encode::FfmpegEncoder;

use crate::clip::{ClipBuilder, SegmentClip};
use crate::text::FontLibrary;
use crate::timeline::{CancelToken, TimelineCompositor};

/// Outcome of a successful render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    /// Path of the written video.
    pub output: PathBuf,
    /// Input indices that made it into the video, in order.
    pub included: Vec<usize>,
    /// Input indices that were dropped, with the reason.
    pub dropped: Vec<(usize, String)>,
    /// Total video duration.
    pub duration: Duration,
}

/// Clips that survived the build stage.
#[derive(Debug)]
pub struct BuiltClips {
    pub clips: Vec<SegmentClip>,
    pub dropped: Vec<(usize, String)>,
}

/// The render pipeline: segments + narration in, one video file out.
pub struct ReelPipeline {
    config: ReelConfig,
    cancel: CancelToken,
    keep_audio: bool,
}

impl ReelPipeline {
    pub fn new(config: ReelConfig) -> ReelResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cancel: CancelToken::new(),
            keep_audio: false,
        })
    }

    /// Leave narration files on disk instead of deleting them after use.
    pub fn keep_audio(mut self, keep: bool) -> Self {
        self.keep_audio = keep;
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &ReelConfig {
        &self.config
    }

    /// Render `segments`, narrated by `audio_paths[i]`, to `output`.
    pub fn render(
        &self,
        segments: &[Segment],
        audio_paths: &[PathBuf],
        output: &Path,
    ) -> ReelResult<RenderReport> {
        Self::preflight(output)?;
        let built = self.build_clips(segments, audio_paths)?;
        self.cancel.check()?;

        let compositor = TimelineCompositor::new(&self.config.video, self.cancel.clone());
        let output = compositor.render(&built.clips, output)?;

        Ok(RenderReport {
            output,
            included: built.clips.iter().map(|c| c.index()).collect(),
            duration: built.clips.iter().map(|c| c.duration()).sum(),
            dropped: built.dropped,
        })
    }

    /// Fatal environment checks, run before any narration is consumed.
    pub fn preflight(output: &Path) -> ReelResult<()> {
        FfmpegEncoder::prepare_output_dir(output)?;
        if !FfmpegEncoder::is_available() {
            return Err(ReelError::config(
                "ffmpeg not found in PATH. Install FFmpeg: https://ffmpeg.org/download.html",
            ));
        }
        Ok(())
    }

    /// Validate the input and build every clip on a bounded worker pool.
    ///
    /// Per-segment failures are logged and dropped; the surviving clips come
    /// back in input order.
    pub fn build_clips(
        &self,
        segments: &[Segment],
        audio_paths: &[PathBuf],
    ) -> ReelResult<BuiltClips> {
        if segments.len() != audio_paths.len() {
            return Err(ReelError::config(format!(
                "{} segments but {} audio paths",
                segments.len(),
                audio_paths.len()
            )));
        }
        if segments.is_empty() {
            return Err(ReelError::NoContent);
        }
        for (index, segment) in segments.iter().enumerate() {
            segment.validate().map_err(|e| match e {
                ReelError::Configuration(message) => {
                    ReelError::config(format!("segment {}: {}", index, message))
                }
                other => other,
            })?;
        }

        let face = FontLibrary::resolve(
            self.config.text.font.as_deref(),
            self.config.text.allow_builtin_font,
        )?;
        tracing::debug!("Using font {}", face.name());
        let builder = ClipBuilder::new(&self.config, face);

        let mut rng = match self.config.render.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let backgrounds = builder.provider().assign(
            segments.len(),
            self.config.background.selection,
            &mut rng,
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.render.workers)
            .thread_name(|i| format!("threadreel-clip-{}", i))
            .build()
            .map_err(|e| ReelError::config(format!("failed to start worker pool: {}", e)))?;

        let results: Vec<ReelResult<SegmentClip>> = pool.install(|| {
            segments
                .par_iter()
                .zip(audio_paths.par_iter())
                .zip(backgrounds.par_iter())
                .enumerate()
                .map(|(index, ((segment, path), background))| {
                    if self.cancel.is_cancelled() {
                        return Err(ReelError::Cancelled);
                    }
                    self.build_one(&builder, index, segment, path, background.as_ref())
                })
                .collect()
        });

        let mut clips = Vec::with_capacity(results.len());
        let mut dropped = Vec::new();
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(clip) => clips.push(clip),
                Err(e) if e.is_recoverable() => {
                    tracing::warn!("Dropping segment {}: {}", index, e);
                    dropped.push((index, e.to_string()));
                }
                Err(e) => return Err(e),
            }
        }

        if clips.is_empty() {
            tracing::warn!("All {} segments were dropped", segments.len());
            return Err(ReelError::NoContent);
        }
        Ok(BuiltClips { clips, dropped })
    }

    fn build_one(
        &self,
        builder: &ClipBuilder,
        index: usize,
        segment: &Segment,
        path: &Path,
        background: Option<&BackgroundAsset>,
    ) -> ReelResult<SegmentClip> {
        let track = match audio::probe_track(path) {
            Ok(track) => track,
            Err(e) => {
                if !self.keep_audio {
                    discard_audio(path);
                }
                return Err(e.for_segment(index));
            }
        };
        let track = if self.keep_audio { track } else { track.owned() };
        builder.build(index, segment, track, background)
    }
}

fn discard_audio(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!("Removed narration file {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Failed to remove narration file {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> ReelPipeline {
        ReelPipeline::new(ReelConfig::default()).unwrap()
    }

    #[test]
    fn test_count_mismatch_is_configuration_error() {
        let segments = vec![Segment::generic("a"); 5];
        let audio: Vec<PathBuf> = (0..4).map(|i| PathBuf::from(format!("/tmp/{}.wav", i))).collect();
        let err = pipeline().build_clips(&segments, &audio).unwrap_err();
        assert!(matches!(err, ReelError::Configuration(_)));
    }

    #[test]
    fn test_empty_input_is_no_content() {
        assert!(matches!(
            pipeline().build_clips(&[], &[]),
            Err(ReelError::NoContent)
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = ReelConfig::default();
        config.render.workers = 0;
        assert!(matches!(
            ReelPipeline::new(config),
            Err(ReelError::Configuration(_))
        ));
    }

    #[test]
    fn test_unwritable_output_fails_before_audio_is_consumed() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, b"").unwrap();
        let audio: Vec<PathBuf> = ["a.wav", "b.wav"]
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                audio::write_wav(&path, &[0i16; 4410]).unwrap();
                path
            })
            .collect();

        let err = pipeline()
            .render(
                &[Segment::generic("a"), Segment::generic("b")],
                &audio,
                &blocker.join("out.mp4"),
            )
            .unwrap_err();
        assert!(matches!(err, ReelError::Configuration(_)));
        assert!(err.to_string().contains("output directory"));
        assert!(audio.iter().all(|p| p.exists()));
    }

    #[test]
    fn test_cancelled_before_build() {
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("a.wav");
        audio::write_wav(&wav, &[0i16; 4410]).unwrap();

        let p = pipeline().keep_audio(true);
        p.cancel_token().cancel();
        let err = p
            .build_clips(&[Segment::generic("a")], &[wav.clone()])
            .unwrap_err();
        assert!(matches!(err, ReelError::Cancelled));
        assert!(wav.exists());
    }
}
