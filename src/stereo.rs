// The anaglyph compositor.
// Each output row is rebuilt from the same row of the colour image and depth map:
// every source column is drawn twice, shifted left into the red channel and right
// into green+blue, by a disparity proportional to its (remapped) depth.

use crate::buffer::PixelBuffer;
use crate::error::Error;
use crate::mode::RenderMode;
use crate::types::Sample;
use log::{debug, info, trace};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

const MAX_DEPTH: f64 = 255.0;

/// Shift in pixels at the deepest depth value when nothing else is configured.
pub const DEFAULT_MAX_DISPARITY: f64 = 12.75;

/// Depth as used for disparity: raw, or compressed by `ln(d + 1) * 255 / ln 256`.
/// Both maps send 0 to 0 and 255 to 255 and never decrease.
#[inline]
pub fn effective_depth(raw: u8, log_scale: bool) -> f64 {
    if log_scale {
        (raw as f64 + 1.0).ln() * (MAX_DEPTH / (MAX_DEPTH + 1.0).ln())
    } else {
        raw as f64
    }
}

/// Blend weight of the write `dx` pixels away from the centre of a blur of `radius`.
#[inline]
fn falloff(dx: u32, radius: u32) -> f64 {
    if radius > 0 {
        1.0 - dx as f64 / radius as f64
    } else {
        1.0
    }
}

#[inline]
fn combine(orig: u8, next: u8, f: f64) -> u8 {
    ((1.0 - f) * orig as f64 + f * next as f64)
        .round()
        .clamp(0.0, MAX_DEPTH) as u8
}

/// Rows waiting for a recompute. Holds each row once, so the backlog can never
/// grow past the image height no matter how many edits land on the same rows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowSet {
    rows: BTreeSet<usize>,
}

impl RowSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the row was not pending yet.
    pub fn insert(&mut self, y: usize) -> bool {
        self.rows.insert(y)
    }

    pub fn contains(&self, y: usize) -> bool {
        self.rows.contains(&y)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn extend(&mut self, other: &RowSet) {
        self.rows.extend(other.rows.iter().copied());
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().copied()
    }
}

impl FromIterator<usize> for RowSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

/// Everything one scanline needs besides the buffers. Copied into each row task.
#[derive(Clone, Copy, Debug)]
struct LineParams {
    blur: u32,
    use_depth_test: bool,
    sort_scanline: bool,
    log_scale: bool,
    disparity_factor: f64,
}

/// Writes one eye's channels into an output row, optionally behind a z-test.
///
/// Depths are stored negated, so a closer sample (smaller depth) compares larger;
/// `-inf` marks a column nobody has claimed yet.
struct EyeWriter<'a> {
    row: &'a mut [Sample],
    best_left: Option<Vec<f64>>,
    best_right: Option<Vec<f64>>,
}

impl<'a> EyeWriter<'a> {
    fn new(row: &'a mut [Sample], use_depth_test: bool) -> Self {
        let len = row.len();
        let gate = || use_depth_test.then(|| vec![f64::NEG_INFINITY; len]);
        let (best_left, best_right) = (gate(), gate());
        Self {
            row,
            best_left,
            best_right,
        }
    }

    #[inline]
    fn claim(best: &mut Option<Vec<f64>>, x: usize, z: f64) -> bool {
        match best {
            Some(best) if z < best[x] => false,
            Some(best) => {
                best[x] = z;
                true
            }
            None => true,
        }
    }

    #[inline]
    fn column(&self, x: i64) -> Option<usize> {
        usize::try_from(x).ok().filter(|&x| x < self.row.len())
    }

    /// Red channel only.
    fn write_left(&mut self, red: u8, x: i64, z: f64, f: f64) {
        let Some(x) = self.column(x) else { return };
        if !Self::claim(&mut self.best_left, x, z) {
            return;
        }
        let px = &mut self.row[x].0;
        px[0] = combine(px[0], red, f);
    }

    /// Green and blue together.
    fn write_right(&mut self, green: u8, blue: u8, x: i64, z: f64, f: f64) {
        let Some(x) = self.column(x) else { return };
        if !Self::claim(&mut self.best_right, x, z) {
            return;
        }
        let px = &mut self.row[x].0;
        px[1] = combine(px[1], green, f);
        px[2] = combine(px[2], blue, f);
    }
}

/// Rebuild output row `y` from the image and depth rows.
fn compose_line(
    image: &PixelBuffer,
    depth: &PixelBuffer,
    y: usize,
    row: &mut [Sample],
    p: LineParams,
) {
    row.fill(Sample::BLACK);
    let width = row.len();
    let yi = y as i32;
    // Any shift past this lands every write off the row; keeps the column math in range.
    let limit = width as i64 + p.blur as i64 + 1;

    let depths: Vec<f64> = (0..width)
        .map(|x| effective_depth(depth.get_depth(x as i32, yi), p.log_scale))
        .collect();

    // Painter's order: farthest first, ties keep column order (sort_by is stable).
    let mut order: Vec<usize> = (0..width).collect();
    if p.sort_scanline {
        order.sort_by(|&a, &b| depths[b].total_cmp(&depths[a]));
    }

    let mut eyes = EyeWriter::new(row, p.use_depth_test);
    for c in order {
        let src = image.get(c as i32, yi);
        let dep = depths[c];
        let dist = ((dep * p.disparity_factor).round() as i64).clamp(-limit, limit);
        let z = -dep;
        let c = c as i64;
        for dx in 0..=p.blur {
            let f = falloff(dx, p.blur);
            let d = dx as i64;
            eyes.write_left(src.r(), c - dist - d, z, f);
            eyes.write_right(src.g(), src.b(), c + dist - d, z, f);
            if dx != 0 {
                eyes.write_left(src.r(), c - dist + d, z, f);
                eyes.write_right(src.g(), src.b(), c + dist + d, z, f);
            }
        }
    }
}

fn read_lock(depth: &RwLock<PixelBuffer>) -> RwLockReadGuard<'_, PixelBuffer> {
    // Pixels stay valid even if a writer panicked mid-edit.
    depth.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock(depth: &RwLock<PixelBuffer>) -> RwLockWriteGuard<'_, PixelBuffer> {
    depth.write().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the anaglyph output and keeps it in sync with the image, the depth map
/// and the compositing settings.
///
/// The image is shared read-only. The depth map is shared behind a lock because
/// brush edits change it; edits go through [`StereoCompositor::edit_depth`] so the
/// affected rows are recomputed right after the edit, never concurrently with it.
pub struct StereoCompositor {
    image: Arc<PixelBuffer>,
    depth: Arc<RwLock<PixelBuffer>>,
    output: PixelBuffer,
    mode: RenderMode,
    disparity_factor: f64,
    blur_override: Option<u32>,
    pending: RowSet,
}

impl StereoCompositor {
    /// Build the compositor and compute the first full frame.
    /// The image and the depth map must have the same size.
    pub fn new(
        image: Arc<PixelBuffer>,
        depth: Arc<RwLock<PixelBuffer>>,
        mode: RenderMode,
    ) -> Result<Self, Error> {
        let depth_dims = {
            let d = read_lock(&depth);
            (d.width(), d.height())
        };
        let image_dims = (image.width(), image.height());
        if image_dims != depth_dims {
            return Err(Error::DimensionMismatch {
                image: image_dims,
                depth: depth_dims,
            });
        }

        let output = PixelBuffer::filled(image_dims.0, image_dims.1, Sample::BLACK);
        let mut compositor = Self {
            image,
            depth,
            output,
            mode,
            disparity_factor: DEFAULT_MAX_DISPARITY / MAX_DEPTH,
            blur_override: None,
            pending: RowSet::new(),
        };
        let (w, h) = image_dims;
        info!("compositor: {w}x{h} in mode {mode}");
        compositor.update();
        Ok(compositor)
    }

    /// Convenience for callers that own plain buffers.
    pub fn from_buffers(
        image: PixelBuffer,
        depth: PixelBuffer,
        mode: RenderMode,
    ) -> Result<Self, Error> {
        Self::new(Arc::new(image), Arc::new(RwLock::new(depth)), mode)
    }

    pub fn output(&self) -> &PixelBuffer {
        &self.output
    }

    pub fn image(&self) -> &Arc<PixelBuffer> {
        &self.image
    }

    pub fn depth(&self) -> &Arc<RwLock<PixelBuffer>> {
        &self.depth
    }

    pub fn width(&self) -> usize {
        self.output.width()
    }

    pub fn height(&self) -> usize {
        self.output.height()
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        info!("render mode -> {mode}");
        self.mode = mode;
        self.update();
    }

    /// Pixels of shift per unit of (effective) depth.
    pub fn disparity_factor(&self) -> f64 {
        self.disparity_factor
    }

    pub fn set_disparity_factor(&mut self, factor: f64) {
        debug!("disparity factor -> {factor}");
        self.disparity_factor = factor;
        self.update();
    }

    /// Shift in pixels at depth 255.
    pub fn max_disparity(&self) -> f64 {
        self.disparity_factor * MAX_DEPTH
    }

    pub fn set_max_disparity(&mut self, pixels: f64) {
        self.set_disparity_factor(pixels / MAX_DEPTH);
    }

    /// Blur radius in use: the override if set, else the mode's own.
    pub fn blur(&self) -> u32 {
        self.blur_override.unwrap_or(self.mode.blur_radius())
    }

    pub fn blur_override(&self) -> Option<u32> {
        self.blur_override
    }

    pub fn set_blur_override(&mut self, blur: Option<u32>) {
        debug!("blur override -> {blur:?}");
        self.blur_override = blur;
        self.update();
    }

    /// Remapped depth at (x,y) under the current mode; 0 outside the map.
    pub fn effective_depth_at(&self, x: i32, y: i32) -> f64 {
        let raw = read_lock(&self.depth).get_depth(x, y);
        effective_depth(raw, self.mode.log_scale())
    }

    fn line_params(&self) -> LineParams {
        LineParams {
            blur: self.blur(),
            use_depth_test: self.mode.use_depth_test(),
            sort_scanline: self.mode.sort_scanline(),
            log_scale: self.mode.log_scale(),
            disparity_factor: self.disparity_factor,
        }
    }

    /// Recompute every row, one rayon task per row. Returns once all rows are done,
    /// so the output is a complete frame afterwards.
    pub fn update(&mut self) {
        let started = Instant::now();
        let params = self.line_params();
        let width = self.output.width();
        if width > 0 {
            let image = &*self.image;
            let guard = read_lock(&self.depth);
            let depth: &PixelBuffer = &guard;
            self.output
                .samples_mut()
                .par_chunks_mut(width)
                .enumerate()
                .for_each(|(y, row)| compose_line(image, depth, y, row, params));
        }
        self.pending.clear();
        let rows = self.output.height();
        debug!("full update: {rows} rows in {:?}", started.elapsed());
    }

    /// Recompute a single row; out-of-range rows are ignored.
    pub fn update_line(&mut self, y: usize) {
        if y >= self.output.height() {
            return;
        }
        let params = self.line_params();
        let depth = read_lock(&self.depth);
        compose_line(&self.image, &depth, y, self.output.row_mut(y), params);
        trace!("update_line {y}");
    }

    /// Recompute rows `lower..=upper`, clipped to the image.
    pub fn update_lines(&mut self, lower: usize, upper: usize) {
        let height = self.output.height();
        if lower >= height || lower > upper {
            return;
        }
        let rows: RowSet = (lower..=upper.min(height - 1)).collect();
        self.update_rows(&rows);
    }

    /// Recompute exactly the given rows, in parallel.
    pub fn update_rows(&mut self, rows: &RowSet) {
        let width = self.output.width();
        if rows.is_empty() || width == 0 {
            return;
        }
        let params = self.line_params();
        let image = &*self.image;
        let guard = read_lock(&self.depth);
        let depth: &PixelBuffer = &guard;
        self.output
            .samples_mut()
            .par_chunks_mut(width)
            .enumerate()
            .filter(|(y, _)| rows.contains(*y))
            .for_each(|(y, row)| compose_line(image, depth, y, row, params));
        trace!("updated {} rows", rows.len());
    }

    /// Brush the depth map and bring the anaglyph up to date for the touched rows
    /// before returning. Returns how many depth pixels changed.
    pub fn edit_depth(&mut self, cx: i32, cy: i32, radius: u32, delta: f64) -> usize {
        let (changed, dirty) = self.brush(cx, cy, radius, delta);
        self.update_rows(&dirty);
        let rows = dirty.len();
        debug!("edit_depth at ({cx},{cy}) r={radius} by {delta}: {changed} px, {rows} rows");
        changed
    }

    /// Brush the depth map but only remember the touched rows; they are recomputed
    /// by the next [`flush`](Self::flush) or full update. Lets a caller fold several
    /// edits into one recompute.
    pub fn edit_depth_deferred(&mut self, cx: i32, cy: i32, radius: u32, delta: f64) -> usize {
        let (changed, dirty) = self.brush(cx, cy, radius, delta);
        self.pending.extend(&dirty);
        changed
    }

    /// Rows edited since the last flush or full update.
    pub fn pending_rows(&self) -> &RowSet {
        &self.pending
    }

    /// Recompute all pending rows. Returns how many there were.
    pub fn flush(&mut self) -> usize {
        let rows = std::mem::take(&mut self.pending);
        self.update_rows(&rows);
        rows.len()
    }

    fn brush(&mut self, cx: i32, cy: i32, radius: u32, delta: f64) -> (usize, RowSet) {
        let mut dirty = RowSet::new();
        let mut depth = write_lock(&self.depth);
        let changed = depth.edit_depth(cx, cy, radius, delta, |y| {
            dirty.insert(y);
        });
        (changed, dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Deterministic xorshift32, enough to make varied test pictures.
    struct Rng32(u32);

    impl Rng32 {
        fn next_u8(&mut self) -> u8 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            self.0 = x;
            (x >> 24) as u8
        }
    }

    fn noise_pair(width: usize, height: usize, seed: u32) -> (PixelBuffer, PixelBuffer) {
        let mut rng = Rng32(seed | 1);
        let image: Vec<Sample> = (0..width * height)
            .map(|_| Sample::rgba(rng.next_u8(), rng.next_u8(), rng.next_u8(), 255))
            .collect();
        let depths: Vec<u8> = (0..width * height).map(|_| rng.next_u8()).collect();
        (
            PixelBuffer::from_samples(width, height, image),
            PixelBuffer::from_depths(width, height, &depths),
        )
    }

    fn compositor(image: PixelBuffer, depth: PixelBuffer, mode: RenderMode) -> StereoCompositor {
        StereoCompositor::from_buffers(image, depth, mode).unwrap()
    }

    fn row_of(samples: &[(u8, u8, u8)]) -> PixelBuffer {
        let s = samples
            .iter()
            .map(|&(r, g, b)| Sample::rgba(r, g, b, 255))
            .collect();
        PixelBuffer::from_samples(samples.len(), 1, s)
    }

    #[test_log::test]
    fn rejects_mismatched_dimensions() {
        let (image, depth) = (PixelBuffer::new(4, 3), PixelBuffer::new(4, 2));
        let err = StereoCompositor::from_buffers(image, depth, RenderMode::default());
        let mismatch = matches!(
            err,
            Err(Error::DimensionMismatch {
                image: (4, 3),
                depth: (4, 2),
            })
        );
        assert!(mismatch);
    }

    #[test_log::test]
    fn output_matches_image_size() {
        let (image, depth) = noise_pair(7, 5, 3);
        let comp = compositor(image, depth, RenderMode::default());
        assert_eq!((comp.output().width(), comp.output().height()), (7, 5));
        assert!((comp.max_disparity() - DEFAULT_MAX_DISPARITY).abs() < 1e-12);
    }

    #[test_log::test]
    fn repeated_updates_are_identical() {
        for mode in RenderMode::PRESETS {
            let (image, depth) = noise_pair(40, 12, 99);
            let mut comp = compositor(image, depth, mode);
            let first = comp.output().clone();
            comp.update();
            assert_eq!(comp.output(), &first, "{mode}");
            comp.update();
            assert_eq!(comp.output(), &first, "{mode}");
        }
    }

    #[test]
    fn effective_depth_is_monotonic_and_spans_range() {
        for log_scale in [false, true] {
            let mut prev = effective_depth(0, log_scale);
            assert_eq!(prev, 0.0);
            for d in 1..=255u8 {
                let cur = effective_depth(d, log_scale);
                assert!(cur >= prev, "d={d} log={log_scale}");
                prev = cur;
            }
            assert!((prev - 255.0).abs() < 1e-9);
        }
        // log compresses: mid depths land well above linear
        assert!(effective_depth(85, true) > 200.0);
    }

    #[test_log::test]
    fn zero_disparity_without_blur_copies_image() {
        for mode in RenderMode::PRESETS {
            let (image, depth) = noise_pair(16, 4, 7);
            let mut comp = compositor(image.clone(), depth, mode);
            comp.set_blur_override(Some(0));
            comp.set_disparity_factor(0.0);
            for y in 0..4 {
                for x in 0..16 {
                    let src = image.get(x, y);
                    let want = Sample::rgba(src.r(), src.g(), src.b(), 255);
                    assert_eq!(comp.output().get(x, y), want, "{mode} ({x},{y})");
                }
            }
        }
    }

    #[test_log::test]
    fn sorted_blur_lets_nearer_columns_paint_over_farther() {
        let image = row_of(&[
            (10, 110, 210),
            (20, 120, 220),
            (30, 130, 230),
            (40, 140, 240),
        ]);
        let depth = PixelBuffer::from_depths(4, 1, &[0, 85, 170, 255]);
        let mut comp = compositor(image.clone(), depth.clone(), RenderMode::SORTED_LOG);
        comp.set_max_disparity(4.0);

        // Column 0 is nearest and drawn last at full weight: the far columns' red is gone.
        assert_eq!(comp.output().get(0, 0), Sample::rgba(10, 110, 210, 255));
        // Column 1 only keeps a quarter of the blended far contributions.
        assert_eq!(comp.output().get(1, 0).r(), 13);

        // Same input, z-tested without blur: each column owned by one source, no blending.
        let mut comp = compositor(image, depth, RenderMode::DEPTH_TEST_LOG);
        comp.set_max_disparity(4.0);
        assert_eq!(comp.output().get(0, 0), Sample::rgba(10, 110, 210, 255));
        for x in 1..4 {
            assert_eq!(comp.output().get(x, 0), Sample::BLACK);
        }
    }

    #[test_log::test]
    fn depth_test_keeps_closest_regardless_of_order() {
        let image = row_of(&[
            (10, 100, 200),
            (20, 101, 201),
            (30, 102, 202),
            (40, 103, 203),
            (50, 104, 204),
            (60, 105, 205),
        ]);
        let depth = PixelBuffer::from_depths(6, 1, &[0, 0, 85, 0, 0, 0]);
        let mut comp = compositor(image, depth, RenderMode::DEPTH_TEST_LINEAR);
        comp.set_max_disparity(3.0); // depth 85 -> 1 px

        let out: Vec<Sample> = (0..6).map(|x| comp.output().get(x, 0)).collect();
        assert_eq!(
            out,
            vec![
                Sample::rgba(10, 100, 200, 255),
                // red: column 2 lands here too but is farther than column 1
                Sample::rgba(20, 101, 201, 255),
                Sample::BLACK,
                // cyan: column 2 got here first, column 3 is closer and takes over
                Sample::rgba(40, 103, 203, 255),
                Sample::rgba(50, 104, 204, 255),
                Sample::rgba(60, 105, 205, 255),
            ]
        );
    }

    #[test_log::test]
    fn mode_switch_recomputes_everything() {
        let (image, depth) = noise_pair(24, 6, 42);
        let mut comp = compositor(image.clone(), depth.clone(), RenderMode::SORTED_LOG);
        comp.set_render_mode(RenderMode::DEPTH_TEST_LINEAR);
        let fresh = compositor(image, depth, RenderMode::DEPTH_TEST_LINEAR);
        assert_eq!(comp.output(), fresh.output());
        assert_eq!(comp.blur(), 0);
        // linear now: effective depth is the raw value
        let raw = read_lock(comp.depth()).get_depth(3, 2) as f64;
        assert_eq!(comp.effective_depth_at(3, 2), raw);
        assert_eq!(comp.effective_depth_at(-1, 0), 0.0);
    }

    #[test_log::test]
    fn brush_edit_matches_full_recompute() {
        for mode in RenderMode::PRESETS {
            let (image, depth) = noise_pair(32, 20, 5);
            let mut comp = compositor(image.clone(), depth, mode);
            let changed = comp.edit_depth(10, 8, 4, 25.0) + comp.edit_depth(20, 15, 6, -25.0);
            assert!(changed > 0);

            let edited = read_lock(comp.depth()).clone();
            let fresh = compositor(image, edited, mode);
            assert_eq!(comp.output(), fresh.output(), "{mode}");
        }
    }

    #[test_log::test]
    fn deferred_edits_coalesce_until_flush() {
        let (image, depth) = noise_pair(32, 20, 11);
        let mut eager = compositor(image.clone(), depth.clone(), RenderMode::SORTED_LOG);
        let mut lazy = compositor(image, depth, RenderMode::SORTED_LOG);

        for _ in 0..5 {
            eager.edit_depth(12, 10, 3, 10.0);
            lazy.edit_depth_deferred(12, 10, 3, 10.0);
        }
        // Same rows over and over: the backlog stays within the brush height.
        let pending = lazy.pending_rows().len();
        assert!(pending > 0 && pending <= 7);
        assert_eq!(lazy.flush(), pending);
        assert!(lazy.pending_rows().is_empty());
        assert_eq!(eager.output(), lazy.output());
    }

    // Inverts every depth in place, bypassing the compositor.
    fn invert_depths(comp: &StereoCompositor) -> PixelBuffer {
        let mut depth = comp.depth().write().unwrap();
        for y in 0..depth.height() as i32 {
            for x in 0..depth.width() as i32 {
                let d = depth.get_depth(x, y);
                depth.set_depth(x, y, 255 - d);
            }
        }
        depth.clone()
    }

    #[test_log::test]
    fn update_lines_recomputes_inclusive_range_only() {
        let (image, depth) = noise_pair(12, 4, 23);
        let mut comp = compositor(image.clone(), depth, RenderMode::SORTED_LOG);
        let old = comp.output().clone();

        let edited = invert_depths(&comp);
        comp.update_lines(1, 2);
        let fresh = compositor(image, edited, RenderMode::SORTED_LOG);

        for y in [1, 2] {
            assert_eq!(comp.output().row(y), fresh.output().row(y), "row {y}");
        }
        for y in [0, 3] {
            assert_ne!(fresh.output().row(y), old.row(y), "row {y} should be stale");
            assert_eq!(comp.output().row(y), old.row(y), "row {y}");
        }
    }

    #[test_log::test]
    fn update_lines_clips_the_upper_bound() {
        let (image, depth) = noise_pair(8, 3, 1);
        let mut comp = compositor(image.clone(), depth, RenderMode::default());
        let before = comp.output().clone();
        comp.update_line(3);
        comp.update_lines(3, 10);
        comp.update_lines(2, 1);
        comp.update_lines(usize::MAX, usize::MAX);
        assert_eq!(comp.output(), &before);

        let edited = invert_depths(&comp);
        comp.update_lines(0, usize::MAX);
        let fresh = compositor(image, edited, RenderMode::default());
        assert_eq!(comp.output(), fresh.output());
    }

    #[test_log::test]
    fn huge_disparity_shifts_off_the_row() {
        let image = row_of(&[
            (10, 110, 210),
            (20, 120, 220),
            (30, 130, 230),
            (40, 140, 240),
        ]);
        let depth = PixelBuffer::from_depths(4, 1, &[0, 85, 170, 255]);
        let mut comp = compositor(image, depth, RenderMode::SORTED_LOG);
        for pixels in [1e300, f64::INFINITY, -1e300, f64::NEG_INFINITY] {
            comp.set_max_disparity(pixels);
            // Depth 0 never moves; every other column lands off the row.
            assert_eq!(comp.output().get(0, 0), Sample::rgba(10, 110, 210, 255));
            assert_eq!(comp.output().samples().len(), 4);
        }
    }

    #[test]
    fn empty_buffers_are_fine() {
        let (image, depth) = (PixelBuffer::new(0, 0), PixelBuffer::new(0, 0));
        let mut comp = compositor(image, depth, RenderMode::default());
        comp.update();
        comp.update_lines(0, usize::MAX);
        assert_eq!(comp.edit_depth(0, 0, 5, 25.0), 0);
    }

    #[test]
    fn row_set_keeps_each_row_once() {
        let mut rows = RowSet::new();
        assert!(rows.insert(3));
        assert!(!rows.insert(3));
        rows.extend(&[1usize, 3, 5].into_iter().collect());
        assert_eq!(rows.iter().collect::<Vec<_>>(), vec![1, 3, 5]);
    }
}
