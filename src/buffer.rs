// A fixed-size grid of RGBA samples with forgiving, bounds-checked access.
// Used three ways: the colour image, the depth map (depth lives in channel 0),
// and the anaglyph output the compositor writes.

use crate::types::{FrameBuffer, Sample};
use image::RgbaImage;
use log::trace;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    samples: Vec<Sample>, // row-major, length = width * height
}

impl PixelBuffer {
    /// A buffer filled with the zero sample.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Sample::ZERO)
    }

    pub fn filled(width: usize, height: usize, sample: Sample) -> Self {
        Self {
            width,
            height,
            samples: vec![sample; width * height],
        }
    }

    /// Build from row-major samples. Missing samples are zero, extra ones are dropped,
    /// so the buffer always has exactly `width * height` entries.
    pub fn from_samples(width: usize, height: usize, mut samples: Vec<Sample>) -> Self {
        samples.resize(width * height, Sample::ZERO);
        Self {
            width,
            height,
            samples,
        }
    }

    /// A depth map from row-major depth values (stored as gray samples).
    pub fn from_depths(width: usize, height: usize, depths: &[u8]) -> Self {
        let samples = depths.iter().map(|&d| Sample::gray(d)).collect();
        Self::from_samples(width, height, samples)
    }

    pub fn from_rgba_image(img: &RgbaImage) -> Self {
        let (w, h) = img.dimensions();
        let samples = img.pixels().map(|&px| Sample::from(px)).collect();
        Self::from_samples(w as usize, h as usize, samples)
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.width as u32, self.height as u32);
        for (dst, src) in img.pixels_mut().zip(self.samples.iter()) {
            *dst = (*src).into();
        }
        img
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn in_range_x(&self, x: i32) -> bool {
        x >= 0 && (x as usize) < self.width
    }

    #[inline]
    pub fn in_range_y(&self, y: i32) -> bool {
        y >= 0 && (y as usize) < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_range_x(x) && self.in_range_y(y) {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    /// The sample at (x,y), or the zero sample outside the buffer.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Sample {
        self.index(x, y).map_or(Sample::ZERO, |i| self.samples[i])
    }

    /// Write the sample at (x,y); silently ignored outside the buffer.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, sample: Sample) {
        if let Some(i) = self.index(x, y) {
            self.samples[i] = sample;
        }
    }

    #[inline]
    pub fn get_depth(&self, x: i32, y: i32) -> u8 {
        self.get(x, y).r()
    }

    #[inline]
    pub fn set_depth(&mut self, x: i32, y: i32, depth: u8) {
        self.set(x, y, Sample::gray(depth));
    }

    /// One row as a slice; empty when `y` is out of range.
    pub fn row(&self, y: usize) -> &[Sample] {
        if y >= self.height {
            return &[];
        }
        &self.samples[y * self.width..(y + 1) * self.width]
    }

    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [Sample] {
        if y >= self.height {
            return &mut [];
        }
        &mut self.samples[y * self.width..(y + 1) * self.width]
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [Sample] {
        &mut self.samples
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Copy into a window frame (0x00RRGGBB). Frames of another size are left alone.
    pub fn fill_frame(&self, fb: &mut FrameBuffer) {
        if fb.width != self.width || fb.height != self.height {
            return;
        }
        for (dst, src) in fb.pixels.iter_mut().zip(self.samples.iter()) {
            *dst = src.to_0rgb();
        }
    }

    /// Brush edit of the depth channel over the disk of `radius` around (cx,cy).
    ///
    /// The first pass measures the depth range under the brush. The second pass moves
    /// every covered depth by `delta`, but never past that range: raising stops at the
    /// observed max, lowering at the observed min. A flat disk (min == max) has no range
    /// to respect, so it moves freely. Results are clamped to [0,255].
    ///
    /// `on_row_changed(y)` runs once per row that actually changed, right after that
    /// row is finished. Returns how many pixels changed.
    pub fn edit_depth<F>(
        &mut self,
        cx: i32,
        cy: i32,
        radius: u32,
        delta: f64,
        mut on_row_changed: F,
    ) -> usize
    where
        F: FnMut(usize),
    {
        let r = radius as i64;
        let r2 = radius as i128 * radius as i128;
        let (cx, cy) = (cx as i64, cy as i64);

        // Bounding box of the disk, clipped to the buffer first.
        let (y0, y1) = ((cy - r).max(0), (cy + r).min(self.height as i64 - 1));
        let (x0, x1) = ((cx - r).max(0), (cx + r).min(self.width as i64 - 1));

        // Disk ∩ buffer, row by row: (y, x_min, x_max), all in range.
        let mut spans = Vec::new();
        for y in y0..=y1 {
            let dy = (y - cy) as i128;
            let mut lo = i64::MAX;
            let mut hi = i64::MIN;
            for x in x0..=x1 {
                let dx = (x - cx) as i128;
                if dx * dx + dy * dy > r2 {
                    continue;
                }
                lo = lo.min(x);
                hi = hi.max(x);
            }
            if lo <= hi {
                spans.push((y as i32, lo as i32, hi as i32));
            }
        }

        // Pass 1: depth range under the brush
        let mut min = u8::MAX;
        let mut max = u8::MIN;
        for &(y, x0, x1) in &spans {
            for x in x0..=x1 {
                let d = self.get_depth(x, y);
                min = min.min(d);
                max = max.max(d);
            }
        }
        let thresholded = min != max;

        // Pass 2: apply the delta, notify per changed row
        let mut changed = 0;
        for &(y, x0, x1) in &spans {
            let mut row_dirty = false;
            for x in x0..=x1 {
                let d = self.get_depth(x, y);
                if let Some(nd) = edited_depth(d, delta, min, max, thresholded) {
                    self.set_depth(x, y, nd);
                    row_dirty = true;
                    changed += 1;
                }
            }
            if row_dirty {
                trace!("edit_depth: row {y} changed");
                on_row_changed(y as usize);
            }
        }
        changed
    }
}

/// New depth for one brushed pixel, or None when it stays as it is.
fn edited_depth(d: u8, delta: f64, min: u8, max: u8, thresholded: bool) -> Option<u8> {
    let df = d as f64;
    let mut nd = df + delta;
    if thresholded {
        if delta > 0.0 {
            if d >= max {
                return None;
            }
            nd = nd.min(max as f64);
        } else {
            if d <= min {
                return None;
            }
            nd = nd.max(min as f64);
        }
    }
    let nd = nd.clamp(0.0, 255.0).round() as u8;
    if nd == d { None } else { Some(nd) }
}
