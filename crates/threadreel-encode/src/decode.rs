//! Streaming video decode.
//! Runs one `ffmpeg` process per pass over a background video and reads
//! scaled, cropped RGBA frames from its stdout one at a time.

use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use threadreel_core::{CoverCrop, Duration, FrameBuffer, ReelError, ReelResult};

/// How a background video pass is decoded.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Scale + crop applied to every frame.
    pub crop: CoverCrop,
    /// Output frame rate; ffmpeg duplicates/drops frames to hit it.
    pub fps: f64,
    /// Stop after this much source time.
    pub limit: Option<Duration>,
    /// Gaussian blur sigma, 0 to disable.
    pub blur_sigma: f32,
}

impl DecodeOptions {
    /// The ffmpeg `-vf` filter chain for these options.
    pub fn filter_chain(&self) -> String {
        let c = &self.crop;
        let mut filter = format!(
            "scale={}:{}:flags=bicubic,crop={}:{}:{}:{}",
            c.scaled_width, c.scaled_height, c.width, c.height, c.x, c.y
        );
        if self.blur_sigma > 0.0 {
            filter.push_str(&format!(",gblur=sigma={}", self.blur_sigma));
        }
        filter.push_str(&format!(",fps={}", self.fps));
        filter
    }
}

/// An open decoder process. The child is killed and reaped when the stream
/// is dropped, so an abandoned pass never leaves a process holding the file.
pub struct VideoFrameStream {
    path: PathBuf,
    child: Child,
    stdout: ChildStdout,
    width: u32,
    height: u32,
    frames_read: u64,
}

impl VideoFrameStream {
    /// Start decoding `path` from its first frame.
    pub fn open(path: &Path, options: &DecodeOptions) -> ReelResult<Self> {
        if !path.exists() {
            return Err(ReelError::asset(
                format!("video file not found: {}", path.display()),
                path,
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.args(["-nostdin", "-v", "error", "-i"]).arg(path);
        if let Some(limit) = options.limit {
            cmd.args(["-t", &format!("{:.3}", limit.as_seconds())]);
        }
        cmd.args(["-an", "-vf", &options.filter_chain()]);
        cmd.args(["-f", "rawvideo", "-pix_fmt", "rgba", "-"]);

        tracing::debug!("Spawning decoder: {:?}", cmd);

        let mut child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ReelError::asset(format!("failed to start ffmpeg decoder: {}", e), path))?;

        let stdout = match child.stdout.take() {
            Some(stdout) => stdout,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ReelError::asset("failed to open decoder stdout", path));
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            child,
            stdout,
            width: options.crop.width,
            height: options.crop.height,
            frames_read: 0,
        })
    }

    /// Read the next frame. `Ok(None)` means the pass reached its end.
    pub fn next_frame(&mut self) -> ReelResult<Option<FrameBuffer>> {
        let size = self.width as usize * self.height as usize * 4;
        let mut data = vec![0u8; size];
        let mut filled = 0;

        while filled < size {
            match self.stdout.read(&mut data[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(ReelError::asset(
                        format!("failed to read decoded frame: {}", e),
                        &self.path,
                    ))
                }
            }
        }

        if filled < size {
            // A truncated trailing frame is dropped; the caller treats the
            // pass as finished.
            if filled > 0 {
                tracing::debug!(
                    "Dropping partial frame ({} of {} bytes) from {}",
                    filled,
                    size,
                    self.path.display()
                );
            }
            return Ok(None);
        }

        self.frames_read += 1;
        Ok(FrameBuffer::from_raw(self.width, self.height, data))
    }

    /// Frames handed out so far in this pass.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }
}

impl Drop for VideoFrameStream {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> DecodeOptions {
        DecodeOptions {
            crop: CoverCrop::compute(1920, 1080, 1080, 1920),
            fps: 30.0,
            limit: Some(Duration::from_seconds(3.0)),
            blur_sigma: 0.0,
        }
    }

    #[test]
    fn test_filter_chain_scales_crops_and_resamples() {
        assert_eq!(
            options().filter_chain(),
            "scale=3413:1920:flags=bicubic,crop=1080:1920:1166:0,fps=30"
        );
    }

    #[test]
    fn test_filter_chain_with_blur() {
        let mut opts = options();
        opts.blur_sigma = 4.5;
        assert!(opts.filter_chain().contains(",gblur=sigma=4.5,"));
    }

    #[test]
    fn test_open_missing_file() {
        let result = VideoFrameStream::open(Path::new("/nonexistent/bg.mp4"), &options());
        assert!(matches!(result, Err(ReelError::AssetUnavailable { .. })));
    }
}
