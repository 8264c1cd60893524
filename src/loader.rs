// Disk I/O for the viewer: decode the colour image and depth map into PixelBuffers,
// and encode a PixelBuffer back to a file. Formats are whatever `image` supports.

use crate::buffer::PixelBuffer;
use crate::error::Error;
use log::info;
use std::path::Path;

/// Decode any supported file into an RGBA PixelBuffer.
pub fn load_buffer(path: &Path) -> Result<PixelBuffer, Error> {
    let img = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    // Gray depth maps expand to R=G=B, so channel 0 carries the depth.
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    info!("loaded {} ({w}x{h})", path.display());
    Ok(PixelBuffer::from_rgba_image(&rgba))
}

/// Load the image and its depth map; they must be the same size.
pub fn load_pair(image: &Path, depth: &Path) -> Result<(PixelBuffer, PixelBuffer), Error> {
    let img = load_buffer(image)?;
    let dep = load_buffer(depth)?;
    if (img.width(), img.height()) != (dep.width(), dep.height()) {
        return Err(Error::DimensionMismatch {
            image: (img.width(), img.height()),
            depth: (dep.width(), dep.height()),
        });
    }
    Ok((img, dep))
}

/// Encode a buffer; the format follows the file extension.
pub fn save_buffer(buf: &PixelBuffer, path: &Path) -> Result<(), Error> {
    // Drop alpha so formats without it (JPEG) still work.
    let rgb = image::DynamicImage::ImageRgba8(buf.to_rgba_image()).to_rgb8();
    rgb.save(path).map_err(|source| Error::ImageSave {
        path: path.to_path_buf(),
        source,
    })?;
    info!("saved {}", path.display());
    Ok(())
}
