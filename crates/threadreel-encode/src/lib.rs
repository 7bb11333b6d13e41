//! # threadreel-encode
//!
//! Media I/O for threadreel. Everything that touches an encoded file lives
//! here: `ffprobe` inspection, streaming `ffmpeg` decode of background
//! video, narration PCM, and the final H.264/AAC encode.

pub mod audio;
pub mod decode;
pub mod ffmpeg;
pub mod probe;

pub use audio::SAMPLE_RATE;
pub use decode::{DecodeOptions, VideoFrameStream};
pub use ffmpeg::{EncodeSession, EncodeSettings, FfmpegEncoder};
pub use probe::VideoInfo;
