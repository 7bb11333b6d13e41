//! Media inspection via `ffprobe`.

use std::path::Path;
use std::process::{Command, Stdio};

use threadreel_core::{Duration, ReelError, ReelResult};

/// Metadata about a video file.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Container duration.
    pub duration: Duration,
    /// Frame rate (fps).
    pub fps: f64,
}

/// Check if `ffprobe` is available on the system.
pub fn is_available() -> bool {
    Command::new("ffprobe")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn run_ffprobe(path: &Path) -> ReelResult<serde_json::Value> {
    if !path.exists() {
        return Err(ReelError::asset(
            format!("media file not found: {}", path.display()),
            path,
        ));
    }

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| ReelError::asset(format!("failed to run ffprobe: {}", e), path))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ReelError::asset(
            format!("ffprobe failed: {}", stderr.trim()),
            path,
        ));
    }

    serde_json::from_slice(&output.stdout)
        .map_err(|e| ReelError::asset(format!("failed to parse ffprobe output: {}", e), path))
}

fn parse_seconds(value: &serde_json::Value) -> Option<f64> {
    value
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|s| s.is_finite() && *s > 0.0)
}

/// Probe a video file for its dimensions, duration and frame rate.
pub fn probe_video(path: &Path) -> ReelResult<VideoInfo> {
    let json = run_ffprobe(path)?;

    let streams = json["streams"]
        .as_array()
        .ok_or_else(|| ReelError::asset("no streams found in video", path))?;

    let video_stream = streams
        .iter()
        .find(|s| s["codec_type"].as_str() == Some("video"))
        .ok_or_else(|| ReelError::asset("no video stream found", path))?;

    let width = video_stream["width"]
        .as_u64()
        .ok_or_else(|| ReelError::asset("missing width in video stream", path))? as u32;
    let height = video_stream["height"]
        .as_u64()
        .ok_or_else(|| ReelError::asset("missing height in video stream", path))? as u32;

    let fps = parse_frame_rate(video_stream["r_frame_rate"].as_str().unwrap_or("30/1"));

    let seconds = parse_seconds(&json["format"]["duration"])
        .or_else(|| parse_seconds(&video_stream["duration"]))
        .ok_or_else(|| ReelError::asset("video has no usable duration", path))?;

    Ok(VideoInfo {
        width,
        height,
        duration: Duration::from_seconds(seconds),
        fps,
    })
}

/// Probe the playable duration of an audio file.
pub fn probe_audio_duration(path: &Path) -> ReelResult<Duration> {
    let json = run_ffprobe(path)?;

    let audio_stream = json["streams"]
        .as_array()
        .and_then(|streams| {
            streams
                .iter()
                .find(|s| s["codec_type"].as_str() == Some("audio"))
        })
        .ok_or_else(|| ReelError::asset("no audio stream found", path))?;

    parse_seconds(&json["format"]["duration"])
        .or_else(|| parse_seconds(&audio_stream["duration"]))
        .map(Duration::from_seconds)
        .ok_or_else(|| ReelError::asset("audio has no usable duration", path))
}

/// Parse a frame rate string like "30/1" or "24000/1001" into a float.
pub(crate) fn parse_frame_rate(rate_str: &str) -> f64 {
    if let Some((num_str, den_str)) = rate_str.split_once('/') {
        let num: f64 = num_str.parse().unwrap_or(30.0);
        let den: f64 = den_str.parse().unwrap_or(1.0);
        if den > 0.0 && num > 0.0 {
            num / den
        } else {
            30.0
        }
    } else {
        rate_str
            .parse::<f64>()
            .ok()
            .filter(|r| *r > 0.0)
            .unwrap_or(30.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_rate_fraction() {
        assert!((parse_frame_rate("30/1") - 30.0).abs() < 0.001);
        assert!((parse_frame_rate("24000/1001") - 23.976).abs() < 0.01);
    }

    #[test]
    fn test_parse_frame_rate_invalid_falls_back() {
        assert!((parse_frame_rate("invalid") - 30.0).abs() < 0.001);
        assert!((parse_frame_rate("30/0") - 30.0).abs() < 0.001);
        assert!((parse_frame_rate("0/0") - 30.0).abs() < 0.001);
        assert!((parse_frame_rate("29.97") - 29.97).abs() < 0.001);
    }

    #[test]
    fn test_parse_seconds_rejects_garbage() {
        assert_eq!(parse_seconds(&serde_json::json!("5.000")), Some(5.0));
        assert_eq!(parse_seconds(&serde_json::json!("N/A")), None);
        assert_eq!(parse_seconds(&serde_json::json!("0")), None);
        assert_eq!(parse_seconds(&serde_json::Value::Null), None);
    }

    #[test]
    fn test_probe_missing_file_is_asset_error() {
        let err = probe_video(Path::new("/nonexistent/background.mp4")).unwrap_err();
        assert!(matches!(err, ReelError::AssetUnavailable { .. }));
        assert!(probe_audio_duration(Path::new("/nonexistent/narration.mp3")).is_err());
    }
}
