//! Red/cyan anaglyphs from a colour image plus a depth map, with a depth brush
//! that updates the anaglyph row by row as you paint.
//!
//! [`StereoCompositor`] does the compositing; [`PixelBuffer`] holds pixels and
//! implements the brush; [`RenderMode`] picks one of four compositing presets.

pub mod buffer;
pub mod config;
pub mod draw;
pub mod error;
pub mod loader;
pub mod mode;
pub mod stereo;
pub mod types;

pub use buffer::PixelBuffer;
pub use error::Error;
pub use mode::RenderMode;
pub use stereo::{RowSet, StereoCompositor, effective_depth};
pub use types::{FrameBuffer, Sample};
