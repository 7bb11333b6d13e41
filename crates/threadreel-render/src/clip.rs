//! Segment clips: one narrated segment over its background, locked to the
//! narration's duration.

use threadreel_core::frame::FrameBuffer;
use threadreel_core::hash;
use threadreel_core::{
    AudioTrack, BackgroundAsset, Color, Duration, ReelConfig, ReelError, ReelResult, Segment,
    SegmentKind,
};
use threadreel_encode::audio::{self, SAMPLE_RATE};
use threadreel_encode::decode::VideoFrameStream;

use crate::background::{BackgroundLayer, BackgroundProvider, PlaybackMode};
use crate::text::{CardRenderer, FontFace};

/// A fully prepared segment, ready for the timeline.
#[derive(Debug, Clone)]
pub struct SegmentClip {
    index: usize,
    kind: SegmentKind,
    duration: Duration,
    background: BackgroundLayer,
    overlay: FrameBuffer,
    narration: Vec<i16>,
}

impl SegmentClip {
    /// Position of the source segment in the input.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn background(&self) -> &BackgroundLayer {
        &self.background
    }

    pub fn overlay(&self) -> &FrameBuffer {
        &self.overlay
    }

    /// Mono PCM at [`SAMPLE_RATE`], exactly as long as the clip.
    pub fn narration(&self) -> &[i16] {
        &self.narration
    }

    /// Start producing composited frames from the first frame of the clip.
    pub fn frames(&self) -> ReelResult<ClipFrames<'_>> {
        let source = match &self.background {
            BackgroundLayer::Solid(color) => {
                let mut frame = FrameBuffer::solid(self.overlay.width, self.overlay.height, color);
                frame.composite_over(&self.overlay, 0, 0);
                FrameSource::Static(frame)
            }
            BackgroundLayer::Still(still) => {
                let mut frame = FrameBuffer::clone(still);
                frame.composite_over(&self.overlay, 0, 0);
                FrameSource::Static(frame)
            }
            BackgroundLayer::Video { path, decode, .. } => FrameSource::Video {
                stream: Some(VideoFrameStream::open(path, decode)?),
                last: None,
                passes: 1,
            },
        };
        Ok(ClipFrames { clip: self, source })
    }
}

enum FrameSource {
    Static(FrameBuffer),
    Video {
        stream: Option<VideoFrameStream>,
        last: Option<FrameBuffer>,
        /// Decoder passes started so far.
        passes: u32,
    },
}

/// Sequential frame producer for one clip. Holds at most one decoder
/// process, which is killed when this is dropped.
pub struct ClipFrames<'a> {
    clip: &'a SegmentClip,
    source: FrameSource,
}

impl ClipFrames<'_> {
    /// The next output frame. Never runs dry: once the background can't
    /// produce more, its last frame is held. A looping background restarts
    /// at most as many times as its plan has passes.
    pub fn next_frame(&mut self) -> ReelResult<FrameBuffer> {
        let clip = self.clip;
        match &mut self.source {
            FrameSource::Static(frame) => Ok(frame.clone()),
            FrameSource::Video {
                stream,
                last,
                passes,
            } => {
                let mut background = None;
                let mut restarted = false;
                while background.is_none() {
                    let Some(active) = stream.as_mut() else {
                        break;
                    };
                    match active.next_frame() {
                        Ok(Some(frame)) => background = Some(frame),
                        Ok(None) => {
                            *stream = None;
                            let planned = match clip.background.plan() {
                                Some(plan) if plan.mode == PlaybackMode::Loop => plan.passes(),
                                _ => 1,
                            };
                            // A pass that ends before its first frame would loop forever.
                            if *passes < planned && !restarted && last.is_some() {
                                if let BackgroundLayer::Video { path, decode, .. } = &clip.background {
                                    *stream = Some(VideoFrameStream::open(path, decode)?);
                                    *passes += 1;
                                    restarted = true;
                                }
                            }
                        }
                        Err(e) => {
                            tracing::warn!(
                                "Background decode failed in segment {}: {}; holding last frame",
                                clip.index,
                                e
                            );
                            *stream = None;
                        }
                    }
                }

                let mut frame = match background.or_else(|| last.clone()) {
                    Some(frame) => frame,
                    None => FrameBuffer::solid(clip.overlay.width, clip.overlay.height, &Color::BLACK),
                };
                *last = Some(frame.clone());
                frame.composite_over(&clip.overlay, 0, 0);
                Ok(frame)
            }
        }
    }
}

/// Builds [`SegmentClip`]s. Shared read-only across worker threads.
#[derive(Debug, Clone)]
pub struct ClipBuilder {
    width: u32,
    height: u32,
    fps: u32,
    provider: BackgroundProvider,
    cards: CardRenderer,
}

impl ClipBuilder {
    pub fn new(config: &ReelConfig, face: FontFace) -> Self {
        Self {
            width: config.video.width,
            height: config.video.height,
            fps: config.video.fps,
            provider: BackgroundProvider::new(config.background.clone()),
            cards: CardRenderer::new(face, config.video.width, config.video.height, &config.text),
        }
    }

    pub fn provider(&self) -> &BackgroundProvider {
        &self.provider
    }

    /// Build the clip for segment `index`.
    ///
    /// Takes ownership of the narration; an owned track's file is deleted
    /// when this returns, whether or not the build succeeded.
    pub fn build(
        &self,
        index: usize,
        segment: &Segment,
        audio: AudioTrack,
        background: Option<&BackgroundAsset>,
    ) -> ReelResult<SegmentClip> {
        segment.validate()?;
        let duration = audio.duration();

        let pcm = audio::decode_pcm(audio.path()).map_err(|e| e.for_segment(index))?;
        let narration = audio::fit_length(pcm, duration.sample_count(SAMPLE_RATE));
        drop(audio);

        let background = self
            .provider
            .layer_for(background, self.width, self.height, self.fps, duration)
            .map_err(|e| e.for_segment(index))?;

        let overlay = self.cards.render_segment(segment);
        if overlay.width != self.width || overlay.height != self.height {
            return Err(ReelError::render(index, "overlay does not match the frame size"));
        }

        tracing::debug!("Segment {} overlay {}", index, hash::hash_frame(&overlay));
        tracing::info!(
            "Created clip for segment {} ({}, {}, {})",
            index,
            segment.kind(),
            duration,
            background.describe()
        );

        Ok(SegmentClip {
            index,
            kind: segment.kind(),
            duration,
            background,
            overlay,
            narration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write_wav(path: &Path, seconds: f64) {
        let samples = vec![1000i16; (seconds * SAMPLE_RATE as f64).round() as usize];
        audio::write_wav(path, &samples).unwrap();
    }

    fn config(dir: &Path) -> ReelConfig {
        let mut config = ReelConfig::default();
        config.video.width = 108;
        config.video.height = 192;
        config.background.dir = dir.join("backgrounds");
        config.text.padding = 6;
        config
    }

    #[test]
    fn test_clip_duration_matches_audio() {
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("title.wav");
        write_wav(&wav, 1.5);

        let builder = ClipBuilder::new(&config(dir.path()), FontFace::builtin());
        let audio = audio::probe_track(&wav).unwrap();
        let clip = builder
            .build(0, &Segment::title("Hello", None, None), audio, None)
            .unwrap();

        assert_eq!(clip.duration(), Duration::from_seconds(1.5));
        assert_eq!(clip.narration().len(), 66_150);
        assert_eq!(clip.kind(), SegmentKind::Title);
        assert!(matches!(clip.background(), BackgroundLayer::Solid(_)));
        assert!(wav.exists(), "unowned narration is left in place");
    }

    #[test]
    fn test_owned_audio_is_deleted_after_build() {
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("comment.wav");
        write_wav(&wav, 0.5);

        let builder = ClipBuilder::new(&config(dir.path()), FontFace::builtin());
        let audio = audio::probe_track(&wav).unwrap().owned();
        let segment = Segment::comment("Nice", Some("someone".into()), 10, 1).unwrap();
        builder.build(3, &segment, audio, None).unwrap();
        assert!(!wav.exists());
    }

    #[test]
    fn test_failed_build_still_releases_audio() {
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("body.wav");
        write_wav(&wav, 0.5);

        let mut config = config(dir.path());
        config.background.fallback_color = None;
        let builder = ClipBuilder::new(&config, FontFace::builtin());
        let audio = audio::probe_track(&wav).unwrap().owned();
        let segment = Segment::body("text", 1, 2).unwrap();
        let err = builder.build(1, &segment, audio, None).unwrap_err();

        assert!(matches!(err, ReelError::AssetUnavailable { .. }));
        assert!(err.is_recoverable());
        assert!(!wav.exists());
    }

    #[test]
    fn test_unreadable_audio_is_missing_audio() {
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("gone.wav");
        write_wav(&wav, 0.5);
        let audio = audio::probe_track(&wav).unwrap();
        std::fs::write(&wav, b"garbage").unwrap();

        let builder = ClipBuilder::new(&config(dir.path()), FontFace::builtin());
        let err = builder
            .build(4, &Segment::generic("x"), audio, None)
            .unwrap_err();
        assert!(matches!(err, ReelError::MissingAudio { segment_index: 4, .. }));
    }

    #[test]
    fn test_static_frames_are_composited_and_stable() {
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("generic.wav");
        write_wav(&wav, 0.2);

        let builder = ClipBuilder::new(&config(dir.path()), FontFace::builtin());
        let audio = audio::probe_track(&wav).unwrap();
        let clip = builder
            .build(0, &Segment::generic("Thanks"), audio, None)
            .unwrap();

        let mut frames = clip.frames().unwrap();
        let first = frames.next_frame().unwrap();
        let second = frames.next_frame().unwrap();
        assert_eq!((first.width, first.height), (108, 192));
        assert_eq!(hash::hash_frame(&first), hash::hash_frame(&second));
        // Background is opaque everywhere, overlay included.
        assert!(first.data.chunks_exact(4).all(|p| p[3] == 255));
        assert_ne!(first.get_pixel(54, 96), Some(Color::SLATE.to_rgba8()));
    }
}
