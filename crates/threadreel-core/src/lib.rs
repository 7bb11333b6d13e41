//! # threadreel-core
//!
//! Core types and primitives for the threadreel video assembler.
//! This crate contains the types shared across all threadreel crates:
//! segments and their narration, background assets, frames, colors,
//! durations, configuration and the error taxonomy.

pub mod asset;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod hash;
pub mod segment;
pub mod time;

pub use config::*;

pub use asset::{AudioTrack, BackgroundAsset, BackgroundKind};
pub use color::Color;
pub use error::{ReelError, ReelResult};
pub use frame::{CoverCrop, FrameBuffer};
pub use segment::{Segment, SegmentKind};
pub use time::{Duration, FrameSpan};
