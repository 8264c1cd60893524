// One error type for the whole crate.
// Every variant states *where* things went wrong.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Image and depth map must cover the same pixels
    #[error(
        "Dimension mismatch: image is {}x{}, depth is {}x{}",
        image.0,
        image.1,
        depth.0,
        depth.1
    )]
    DimensionMismatch {
        image: (usize, usize),
        depth: (usize, usize),
    },

    // Asked for a render mode that is not one of the presets
    #[error("Invalid render mode: {0}")]
    InvalidRenderMode(String),

    // Reading/decoding an input file failed
    #[error("Image load error ({}): {source}", path.display())]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    // Encoding/writing an output file failed
    #[error("Image save error ({}): {source}", path.display())]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed

    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed
}
