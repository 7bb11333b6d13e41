//! # threadreel-render
//!
//! The threadreel assembly engine. Turns ordered segments and their narration
//! into clips (background + text card + audio) and encodes the clips, in
//! order, into a single vertical video.

pub mod background;
pub mod clip;
pub mod image_loader;
pub mod pipeline;
pub mod text;
pub mod timeline;

pub use background::{BackgroundLayer, BackgroundProvider, PlaybackMode, PlaybackPlan};
pub use clip::{ClipBuilder, SegmentClip};
pub use pipeline::{BuiltClips, ReelPipeline, RenderReport};
pub use text::{CardRenderer, FontFace, FontLibrary};
pub use timeline::{CancelToken, Timeline, TimelineCompositor};
