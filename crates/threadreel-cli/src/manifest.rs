//! Render manifests: the ordered segments of one video and their narration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use threadreel_core::Segment;

/// `{ "segments": [...], "audio": [...] }`, one audio path per segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub segments: Vec<Segment>,
    pub audio: Vec<PathBuf>,
}

impl Manifest {
    /// Read a manifest. Relative audio paths are resolved against the
    /// manifest's own directory.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;
        let mut manifest: Manifest = serde_json::from_str(&source)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for audio in &mut manifest.audio {
            if audio.is_relative() {
                *audio = base.join(&*audio);
            }
        }
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use threadreel_core::SegmentKind;

    const SAMPLE: &str = r#"{
        "segments": [
            {"kind": "title", "text": "TIFU by microwaving a fork", "author": "oops", "subreddit": "tifu"},
            {"kind": "body", "text": "It sparked.", "part": 1, "total_parts": 1},
            {"kind": "comment", "text": "Classic.", "score": 42, "rank": 1}
        ],
        "audio": ["audio/0.wav", "/abs/1.mp3", "audio/2.wav"]
    }"#;

    #[test]
    fn test_load_resolves_relative_audio() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("story.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let manifest = Manifest::load(&path).unwrap();
        let kinds: Vec<SegmentKind> = manifest.segments.iter().map(|s| s.kind()).collect();
        assert_eq!(
            kinds,
            vec![SegmentKind::Title, SegmentKind::Body, SegmentKind::Comment]
        );
        assert_eq!(manifest.audio[0], dir.path().join("audio/0.wav"));
        assert_eq!(manifest.audio[1], PathBuf::from("/abs/1.mp3"));
    }

    #[test]
    fn test_load_rejects_unknown_kind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"segments": [{"kind": "poll", "text": "?"}], "audio": ["a.wav"]}"#,
        )
        .unwrap();
        let err = Manifest::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse manifest"));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(Manifest::load(Path::new("/nonexistent/manifest.json")).is_err());
    }
}
