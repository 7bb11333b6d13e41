//! Narration audio: probing, decoding to PCM, and WAV output.
//!
//! All narration is normalized to mono 16-bit PCM at [`SAMPLE_RATE`] so clips
//! can be concatenated sample-exactly. WAV files are handled natively with
//! `hound`; anything else goes through `ffmpeg`.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};

use threadreel_core::{AudioTrack, Duration, ReelError, ReelResult};

/// Sample rate of all narration PCM handled by the pipeline.
pub const SAMPLE_RATE: u32 = 44_100;

fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("wav"))
        .unwrap_or(false)
}

fn missing(path: &Path, reason: impl Into<String>) -> ReelError {
    ReelError::missing_audio(0, path, reason)
}

/// Inspect a narration file and wrap it as an [`AudioTrack`].
///
/// Fails with `MissingAudio` when the file is absent, unreadable or silent.
pub fn probe_track(path: &Path) -> ReelResult<AudioTrack> {
    if !path.is_file() {
        return Err(missing(path, "narration file not found"));
    }

    let duration = if is_wav(path) {
        let reader = hound::WavReader::open(path)
            .map_err(|e| missing(path, format!("unreadable WAV: {}", e)))?;
        let spec = reader.spec();
        if spec.sample_rate == 0 {
            return Err(missing(path, "WAV header has a sample rate of 0"));
        }
        Duration::from_seconds(reader.duration() as f64 / spec.sample_rate as f64)
    } else {
        crate::probe::probe_audio_duration(path).map_err(|e| missing(path, e.to_string()))?
    };

    AudioTrack::new(path, duration)
}

/// Decode narration to mono 16-bit PCM at [`SAMPLE_RATE`].
pub fn decode_pcm(path: &Path) -> ReelResult<Vec<i16>> {
    if !path.is_file() {
        return Err(missing(path, "narration file not found"));
    }
    if is_wav(path) {
        decode_wav(path)
    } else {
        decode_with_ffmpeg(path)
    }
}

fn decode_wav(path: &Path) -> ReelResult<Vec<i16>> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|e| missing(path, format!("unreadable WAV: {}", e)))?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return Err(missing(path, "WAV header has a sample rate of 0"));
    }
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| missing(path, format!("corrupt WAV data: {}", e)))?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(|e| missing(path, format!("corrupt WAV data: {}", e)))?
        }
    };

    let mono: Vec<f32> = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect();

    let resampled = resample_linear(&mono, spec.sample_rate, SAMPLE_RATE);
    Ok(resampled
        .into_iter()
        .map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16)
        .collect())
}

fn decode_with_ffmpeg(path: &Path) -> ReelResult<Vec<i16>> {
    let rate = SAMPLE_RATE.to_string();
    let mut child = Command::new("ffmpeg")
        .args(["-nostdin", "-v", "error", "-i"])
        .arg(path)
        .args(["-vn", "-ac", "1", "-ar", &rate, "-f", "s16le", "-"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| missing(path, format!("failed to start ffmpeg: {}", e)))?;

    let mut bytes = Vec::new();
    let read = match child.stdout.take() {
        Some(mut stdout) => stdout.read_to_end(&mut bytes),
        None => Err(std::io::Error::other("ffmpeg stdout unavailable")),
    };
    let status = child.wait();

    read.map_err(|e| missing(path, format!("failed to read decoded audio: {}", e)))?;
    match status {
        Ok(s) if s.success() => {}
        Ok(s) => return Err(missing(path, format!("ffmpeg audio decode failed with {}", s))),
        Err(e) => return Err(missing(path, format!("ffmpeg audio decode failed: {}", e))),
    }

    Ok(bytes
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect())
}

/// Linear-interpolation resampler. Good enough for speech.
pub fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() || from_rate == 0 {
        return samples.to_vec();
    }
    let out_len = ((samples.len() as u64 * to_rate as u64) as f64 / from_rate as f64).round() as usize;
    let step = from_rate as f64 / to_rate as f64;
    let last = samples.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * step;
            let idx = (pos.floor() as usize).min(last);
            let next = (idx + 1).min(last);
            let frac = (pos - idx as f64) as f32;
            samples[idx] + (samples[next] - samples[idx]) * frac
        })
        .collect()
}

/// Pad with silence or truncate so the PCM is exactly `len` samples long.
pub fn fit_length(mut samples: Vec<i16>, len: usize) -> Vec<i16> {
    samples.resize(len, 0);
    samples
}

/// Write mono PCM at [`SAMPLE_RATE`] to a WAV file.
pub fn write_wav(path: &Path, samples: &[i16]) -> ReelResult<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| ReelError::Encode(format!("failed to create {}: {}", path.display(), e)))?;
    for &s in samples {
        writer
            .write_sample(s)
            .map_err(|e| ReelError::Encode(format!("failed to write audio sample: {}", e)))?;
    }
    writer
        .finalize()
        .map_err(|e| ReelError::Encode(format!("failed to finalize {}: {}", path.display(), e)))
}
