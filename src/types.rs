// Core value types shared by the buffers, the compositor and the window.

/// One RGBA sample. Channels are `u8`, so every value is in [0,255] by construction.
/// In a depth map, channel 0 holds the depth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Sample(pub [u8; 4]);

impl Sample {
    /// All channels zero; what out-of-range reads return.
    pub const ZERO: Sample = Sample([0, 0, 0, 0]);
    /// Opaque black; what every output row starts from.
    pub const BLACK: Sample = Sample([0, 0, 0, 255]);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Sample([r, g, b, a])
    }

    /// Depth encoded as an opaque gray sample.
    pub const fn gray(value: u8) -> Self {
        Sample([value, value, value, 255])
    }

    #[inline]
    pub fn r(&self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub fn g(&self) -> u8 {
        self.0[1]
    }

    #[inline]
    pub fn b(&self) -> u8 {
        self.0[2]
    }

    #[inline]
    pub fn a(&self) -> u8 {
        self.0[3]
    }

    /// Pack as 0x00RRGGBB for minifb (alpha is dropped).
    #[inline]
    pub fn to_0rgb(&self) -> u32 {
        ((self.r() as u32) << 16) | ((self.g() as u32) << 8) | self.b() as u32
    }
}

impl From<image::Rgba<u8>> for Sample {
    fn from(px: image::Rgba<u8>) -> Self {
        Sample(px.0)
    }
}

impl From<Sample> for image::Rgba<u8> {
    fn from(s: Sample) -> Self {
        image::Rgba(s.0)
    }
}

/// What the window shows each frame.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,     // window width (pixels)
    pub height: usize,    // window height (pixels)
    pub pixels: Vec<u32>, // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u32; width * height],
        }
    }
}
