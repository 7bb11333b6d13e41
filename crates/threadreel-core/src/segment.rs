//! Narrated content segments.
//!
//! A [`Segment`] is one unit of narration destined for exactly one clip. Each
//! kind carries only the metadata its card needs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ReelError, ReelResult};

/// One narrated unit of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    /// The post title.
    Title {
        text: String,
        #[serde(default)]
        author: Option<String>,
        #[serde(default)]
        subreddit: Option<String>,
    },
    /// One paragraph of the post body.
    Body {
        text: String,
        part: u32,
        total_parts: u32,
    },
    /// A ranked comment.
    Comment {
        text: String,
        #[serde(default)]
        author: Option<String>,
        #[serde(default)]
        score: i64,
        rank: u32,
    },
    /// Free text with no role-specific decoration.
    Generic { text: String },
}

/// Discriminant of a [`Segment`], handy for logging and layout decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Title,
    Body,
    Comment,
    Generic,
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentKind::Title => write!(f, "title"),
            SegmentKind::Body => write!(f, "body"),
            SegmentKind::Comment => write!(f, "comment"),
            SegmentKind::Generic => write!(f, "generic"),
        }
    }
}

impl Segment {
    pub fn title(
        text: impl Into<String>,
        author: Option<String>,
        subreddit: Option<String>,
    ) -> Self {
        Segment::Title {
            text: text.into(),
            author,
            subreddit,
        }
    }

    /// A body part. `part` is 1-based and must not exceed `total_parts`.
    pub fn body(text: impl Into<String>, part: u32, total_parts: u32) -> ReelResult<Self> {
        let segment = Segment::Body {
            text: text.into(),
            part,
            total_parts,
        };
        segment.validate()?;
        Ok(segment)
    }

    /// A comment. `rank` is 1-based (1 = highest scored).
    pub fn comment(
        text: impl Into<String>,
        author: Option<String>,
        score: i64,
        rank: u32,
    ) -> ReelResult<Self> {
        let segment = Segment::Comment {
            text: text.into(),
            author,
            score,
            rank,
        };
        segment.validate()?;
        Ok(segment)
    }

    pub fn generic(text: impl Into<String>) -> Self {
        Segment::Generic { text: text.into() }
    }

    pub fn kind(&self) -> SegmentKind {
        match self {
            Segment::Title { .. } => SegmentKind::Title,
            Segment::Body { .. } => SegmentKind::Body,
            Segment::Comment { .. } => SegmentKind::Comment,
            Segment::Generic { .. } => SegmentKind::Generic,
        }
    }

    /// The narrated text.
    pub fn text(&self) -> &str {
        match self {
            Segment::Title { text, .. }
            | Segment::Body { text, .. }
            | Segment::Comment { text, .. }
            | Segment::Generic { text } => text,
        }
    }

    /// Check the kind-specific invariants. Deserialized segments bypass the
    /// constructors, so the pipeline calls this during pre-flight.
    pub fn validate(&self) -> ReelResult<()> {
        match self {
            Segment::Body {
                part, total_parts, ..
            } => {
                if *total_parts == 0 || *part == 0 || part > total_parts {
                    return Err(ReelError::config(format!(
                        "body part {}/{} is out of range",
                        part, total_parts
                    )));
                }
            }
            Segment::Comment { rank, .. } => {
                if *rank == 0 {
                    return Err(ReelError::config("comment rank must start at 1"));
                }
            }
            Segment::Title { .. } | Segment::Generic { .. } => {}
        }
        Ok(())
    }
}
