//! Timeline composition: concatenate clips in order and encode the result.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use threadreel_core::{Duration, FrameSpan, ReelError, ReelResult, VideoConfig};
use threadreel_encode::audio;
use threadreel_encode::ffmpeg::{EncodeSettings, FfmpegEncoder};

use crate::clip::SegmentClip;

/// Cooperative cancellation flag shared between a render and its caller.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once cancellation was requested.
    pub fn check(&self) -> ReelResult<()> {
        if self.is_cancelled() {
            Err(ReelError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Where one clip lands on the output timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineEntry {
    pub index: usize,
    pub start: Duration,
    pub duration: Duration,
    pub frames: FrameSpan,
}

/// Clips laid end to end, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub entries: Vec<TimelineEntry>,
    pub duration: Duration,
    pub total_frames: u64,
}

impl Timeline {
    pub fn layout(clips: &[SegmentClip], fps: f64) -> Self {
        let mut offset = Duration::zero();
        let entries: Vec<TimelineEntry> = clips
            .iter()
            .map(|clip| {
                let entry = TimelineEntry {
                    index: clip.index(),
                    start: offset,
                    duration: clip.duration(),
                    frames: FrameSpan::at(offset, clip.duration(), fps),
                };
                offset = offset + clip.duration();
                entry
            })
            .collect();
        let total_frames = entries.last().map_or(0, |e| e.frames.end);
        Self {
            entries,
            duration: offset,
            total_frames,
        }
    }
}

/// Encodes an ordered list of clips into one video file.
pub struct TimelineCompositor {
    settings: EncodeSettings,
    cancel: CancelToken,
}

impl TimelineCompositor {
    pub fn new(video: &VideoConfig, cancel: CancelToken) -> Self {
        Self {
            settings: EncodeSettings {
                width: video.width,
                height: video.height,
                fps: video.fps,
                crf: video.crf,
                preset: video.preset.clone(),
            },
            cancel,
        }
    }

    /// Write `clips`, in the given order, to `output_path`.
    ///
    /// The file appears only if the whole encode succeeds. Every decoder,
    /// the encoder and all temporary files are released on return.
    pub fn render(&self, clips: &[SegmentClip], output_path: &Path) -> ReelResult<PathBuf> {
        if clips.is_empty() {
            return Err(ReelError::NoContent);
        }
        self.cancel.check()?;

        let timeline = Timeline::layout(clips, self.settings.fps as f64);

        let narration = tempfile::Builder::new()
            .prefix("threadreel-narration-")
            .suffix(".wav")
            .tempfile()?
            .into_temp_path();
        let samples: Vec<i16> = clips
            .iter()
            .flat_map(|clip| clip.narration().iter().copied())
            .collect();
        audio::write_wav(&narration, &samples)?;

        let mut session = FfmpegEncoder::start(&self.settings, &narration, output_path)?;
        for (clip, entry) in clips.iter().zip(&timeline.entries) {
            let mut frames = clip.frames()?;
            for _ in 0..entry.frames.len() {
                self.cancel.check()?;
                let frame = frames.next_frame()?;
                session.write_frame(&frame)?;
            }
            tracing::debug!(
                "Wrote segment {} ({} frames)",
                entry.index,
                entry.frames.len()
            );
        }

        let written = session.finish(output_path)?;
        tracing::info!(
            "Final video written to {} ({}, {} frames)",
            written.display(),
            timeline.duration,
            timeline.total_frames
        );
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token() {
        let token = CancelToken::new();
        let shared = token.clone();
        assert!(token.check().is_ok());
        shared.cancel();
        assert!(token.is_cancelled());
        assert!(matches!(token.check(), Err(ReelError::Cancelled)));
    }

    #[test]
    fn test_empty_timeline_is_no_content() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.mp4");
        let compositor = TimelineCompositor::new(&VideoConfig::default(), CancelToken::new());
        assert!(matches!(
            compositor.render(&[], &output),
            Err(ReelError::NoContent)
        ));
        assert!(!output.exists());
    }

    #[test]
    fn test_empty_layout() {
        let timeline = Timeline::layout(&[], 30.0);
        assert!(timeline.entries.is_empty());
        assert_eq!(timeline.total_frames, 0);
        assert!(timeline.duration.is_zero());
    }
}
