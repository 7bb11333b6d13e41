use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use tempfile::TempPath;
use threadreel_core::{FrameBuffer, ReelError, ReelResult};

/// Output stream parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeSettings {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub crf: u8,
    pub preset: String,
}

/// Encoder that shells out to FFmpeg for H.264/AAC encoding.
pub struct FfmpegEncoder;

impl FfmpegEncoder {
    /// Check if FFmpeg is available on the system.
    pub fn is_available() -> bool {
        Command::new("ffmpeg")
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Create the directory `output_path` will be written to and make sure a
    /// file can be created there. Failures are configuration errors.
    pub fn prepare_output_dir(output_path: &Path) -> ReelResult<PathBuf> {
        let out_dir = match output_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&out_dir).map_err(|e| {
            ReelError::config(format!(
                "cannot create output directory {}: {}",
                out_dir.display(),
                e
            ))
        })?;
        tempfile::Builder::new()
            .prefix(".threadreel-check-")
            .tempfile_in(&out_dir)
            .map_err(|e| {
                ReelError::config(format!(
                    "output directory {} is not writable: {}",
                    out_dir.display(),
                    e
                ))
            })?;
        Ok(out_dir)
    }

    /// Start an encode whose narration is read from `audio_wav`.
    ///
    /// Video frames are pushed with [`EncodeSession::write_frame`]. Output goes
    /// to a uniquely named temporary file next to `output_path`; it only
    /// appears at `output_path` when [`EncodeSession::finish`] succeeds.
    pub fn start(
        settings: &EncodeSettings,
        audio_wav: &Path,
        output_path: &Path,
    ) -> ReelResult<EncodeSession> {
        if !Self::is_available() {
            return Err(ReelError::Encode(
                "ffmpeg not found in PATH. Install FFmpeg: https://ffmpeg.org/download.html".into(),
            ));
        }
        let out_dir = Self::prepare_output_dir(output_path)?;

        let suffix = output_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_else(|| ".mp4".to_string());
        let temp_output = tempfile::Builder::new()
            .prefix(".threadreel-")
            .suffix(&suffix)
            .tempfile_in(&out_dir)
            .map_err(|e| {
                ReelError::config(format!(
                    "output directory {} is not writable: {}",
                    out_dir.display(),
                    e
                ))
            })?
            .into_temp_path();

        let mut cmd = Command::new("ffmpeg");
        cmd.args(["-y", "-nostdin", "-nostats", "-loglevel", "error"]);

        // Input 0: raw video frames from stdin
        cmd.args([
            "-f",
            "rawvideo",
            "-pixel_format",
            "rgba",
            "-video_size",
            &format!("{}x{}", settings.width, settings.height),
            "-framerate",
            &settings.fps.to_string(),
            "-i",
            "-",
        ]);
        // Input 1: concatenated narration
        cmd.arg("-i").arg(audio_wav);

        cmd.args(["-map", "0:v", "-map", "1:a"]);
        cmd.args([
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-preset",
            &settings.preset,
            "-crf",
            &settings.crf.to_string(),
            "-r",
            &settings.fps.to_string(),
            "-c:a",
            "aac",
            "-b:a",
            "192k",
            "-movflags",
            "+faststart",
        ]);
        cmd.arg(&*temp_output);

        tracing::debug!("Spawning encoder: {:?}", cmd);

        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ReelError::Encode(format!("failed to start ffmpeg: {}", e)))?;

        let stdin = match child.stdin.take() {
            Some(stdin) => stdin,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ReelError::Encode("failed to open ffmpeg stdin".into()));
            }
        };

        Ok(EncodeSession {
            child,
            stdin: Some(stdin),
            temp_output: Some(temp_output),
            width: settings.width,
            height: settings.height,
            frames_written: 0,
        })
    }
}

/// A running encode. Dropping an unfinished session kills ffmpeg, reaps it,
/// and deletes the partial output.
pub struct EncodeSession {
    child: Child,
    stdin: Option<ChildStdin>,
    temp_output: Option<TempPath>,
    width: u32,
    height: u32,
    frames_written: u64,
}

impl EncodeSession {
    /// Push one RGBA frame.
    pub fn write_frame(&mut self, frame: &FrameBuffer) -> ReelResult<()> {
        if frame.width != self.width || frame.height != self.height {
            return Err(ReelError::Encode(format!(
                "frame {} has dimensions {}x{}, expected {}x{}",
                self.frames_written, frame.width, frame.height, self.width, self.height
            )));
        }
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| ReelError::Encode("encoder input already closed".into()))?;

        if let Err(e) = stdin.write_all(&frame.data) {
            // The pipe breaks when ffmpeg exits early; its stderr has the reason.
            self.stdin = None;
            let stderr = self.drain_stderr();
            return Err(ReelError::Encode(format!(
                "failed to write frame {} to ffmpeg: {}. FFmpeg stderr: {}",
                self.frames_written, e, stderr
            )));
        }
        self.frames_written += 1;
        Ok(())
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Close the input, wait for ffmpeg, and move the finished file to
    /// `output_path`.
    pub fn finish(mut self, output_path: &Path) -> ReelResult<PathBuf> {
        if self.frames_written == 0 {
            return Err(ReelError::Encode("no frames to encode".into()));
        }

        // Close stdin to signal end of input
        self.stdin = None;

        let status = self
            .child
            .wait()
            .map_err(|e| ReelError::Encode(format!("ffmpeg process error: {}", e)))?;
        if !status.success() {
            let stderr = self.drain_stderr();
            return Err(ReelError::Encode(format!(
                "ffmpeg failed with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        let temp_output = self
            .temp_output
            .take()
            .ok_or_else(|| ReelError::Encode("encoder output already taken".into()))?;
        temp_output.persist(output_path).map_err(|e| {
            ReelError::Encode(format!(
                "failed to move encoded video to {}: {}",
                output_path.display(),
                e.error
            ))
        })?;

        Ok(output_path.to_path_buf())
    }

    fn drain_stderr(&mut self) -> String {
        let _ = self.child.wait();
        let mut buf = String::new();
        if let Some(mut stderr) = self.child.stderr.take() {
            let _ = stderr.read_to_string(&mut buf);
        }
        buf
    }
}

impl Drop for EncodeSession {
    fn drop(&mut self) {
        self.stdin = None;
        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
        // `temp_output`, if still present, removes the partial file here.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> EncodeSettings {
        EncodeSettings {
            width: 64,
            height: 64,
            fps: 30,
            crf: 23,
            preset: "ultrafast".into(),
        }
    }

    #[test]
    fn test_ffmpeg_availability() {
        // Only checks that the probe itself doesn't panic.
        let _available = FfmpegEncoder::is_available();
    }

    #[test]
    fn test_prepare_output_dir_creates_and_checks() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("renders").join("nested").join("video.mp4");
        let out_dir = FfmpegEncoder::prepare_output_dir(&output).unwrap();
        assert_eq!(out_dir, dir.path().join("renders").join("nested"));
        assert!(out_dir.is_dir());
        let leftovers: Vec<_> = std::fs::read_dir(&out_dir).unwrap().collect();
        assert!(leftovers.is_empty(), "write check must clean up after itself");
    }

    #[test]
    fn test_prepare_output_dir_under_a_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, b"").unwrap();
        let err = FfmpegEncoder::prepare_output_dir(&blocker.join("video.mp4")).unwrap_err();
        assert!(matches!(err, ReelError::Configuration(_)));
    }

    #[test]
    fn test_finish_without_frames_leaves_no_file() {
        if !FfmpegEncoder::is_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("narration.wav");
        crate::audio::write_wav(&wav, &vec![0i16; 4410]).unwrap();
        let output = dir.path().join("out").join("video.mp4");

        let session = FfmpegEncoder::start(&settings(), &wav, &output).unwrap();
        assert!(session.finish(&output).is_err());
        assert!(!output.exists());
        let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("out")).unwrap().collect();
        assert!(leftovers.is_empty(), "partial output must be removed");
    }

    #[test]
    fn test_wrong_frame_size_is_rejected() {
        if !FfmpegEncoder::is_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("narration.wav");
        crate::audio::write_wav(&wav, &vec![0i16; 4410]).unwrap();
        let output = dir.path().join("video.mp4");

        let mut session = FfmpegEncoder::start(&settings(), &wav, &output).unwrap();
        let err = session.write_frame(&FrameBuffer::new(32, 32)).unwrap_err();
        assert!(err.to_string().contains("expected 64x64"));
    }

    #[test]
    fn test_encode_short_clip() {
        if !FfmpegEncoder::is_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("narration.wav");
        crate::audio::write_wav(&wav, &vec![0i16; 44_100 / 2]).unwrap();
        let output = dir.path().join("video.mp4");

        let mut session = FfmpegEncoder::start(&settings(), &wav, &output).unwrap();
        let frame = FrameBuffer::solid(64, 64, &threadreel_core::Color::WHITE);
        for _ in 0..15 {
            session.write_frame(&frame).unwrap();
        }
        assert_eq!(session.frames_written(), 15);
        let written = session.finish(&output).unwrap();
        assert_eq!(written, output);
        assert!(output.metadata().unwrap().len() > 0);
    }
}
