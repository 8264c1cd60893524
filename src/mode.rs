// Render presets: how the compositor orders, blurs and scales each scanline.

use crate::error::Error;
use std::fmt::{self, Display};
use std::str::FromStr;

/// An immutable compositing configuration. Only the four presets exist;
/// `from_parts` rejects anything else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderMode {
    blur_radius: u32,
    use_depth_test: bool,
    sort_scanline: bool,
    log_scale: bool,
}

impl RenderMode {
    /// A: painter's order, soft edges, log depth.
    pub const SORTED_LOG: RenderMode = RenderMode::preset(4, false, true, true);
    /// B: z-tested, hard edges, log depth.
    pub const DEPTH_TEST_LOG: RenderMode = RenderMode::preset(0, true, false, true);
    /// C: painter's order, soft edges, linear depth.
    pub const SORTED_LINEAR: RenderMode = RenderMode::preset(4, false, true, false);
    /// D: z-tested, hard edges, linear depth.
    pub const DEPTH_TEST_LINEAR: RenderMode = RenderMode::preset(0, true, false, false);

    /// In cycling order.
    pub const PRESETS: [RenderMode; 4] = [
        RenderMode::SORTED_LOG,
        RenderMode::DEPTH_TEST_LOG,
        RenderMode::SORTED_LINEAR,
        RenderMode::DEPTH_TEST_LINEAR,
    ];

    const fn preset(
        blur_radius: u32,
        use_depth_test: bool,
        sort_scanline: bool,
        log_scale: bool,
    ) -> Self {
        RenderMode {
            blur_radius,
            use_depth_test,
            sort_scanline,
            log_scale,
        }
    }

    /// Look up the preset with exactly these settings.
    pub fn from_parts(
        blur_radius: u32,
        use_depth_test: bool,
        sort_scanline: bool,
        log_scale: bool,
    ) -> Result<Self, Error> {
        if use_depth_test == sort_scanline {
            return Err(Error::InvalidRenderMode(format!(
                "exactly one of depth test / scanline sort must be on \
                 (depth_test={use_depth_test}, sort={sort_scanline})"
            )));
        }
        let wanted = RenderMode::preset(blur_radius, use_depth_test, sort_scanline, log_scale);
        RenderMode::PRESETS
            .into_iter()
            .find(|m| *m == wanted)
            .ok_or_else(|| Error::InvalidRenderMode(format!("no preset with {wanted:?}")))
    }

    #[inline]
    pub fn blur_radius(&self) -> u32 {
        self.blur_radius
    }

    #[inline]
    pub fn use_depth_test(&self) -> bool {
        self.use_depth_test
    }

    #[inline]
    pub fn sort_scanline(&self) -> bool {
        self.sort_scanline
    }

    #[inline]
    pub fn log_scale(&self) -> bool {
        self.log_scale
    }

    /// Preset letter, A through D.
    pub fn letter(&self) -> char {
        match self.position() {
            0 => 'A',
            1 => 'B',
            2 => 'C',
            _ => 'D',
        }
    }

    pub fn name(&self) -> &'static str {
        match self.position() {
            0 => "sorted-log",
            1 => "depth-test-log",
            2 => "sorted-linear",
            _ => "depth-test-linear",
        }
    }

    /// The preset after this one, wrapping from D back to A.
    pub fn next(&self) -> RenderMode {
        RenderMode::PRESETS[(self.position() + 1) % RenderMode::PRESETS.len()]
    }

    fn position(&self) -> usize {
        RenderMode::PRESETS.iter().position(|m| m == self).unwrap_or(0)
    }
}

impl Default for RenderMode {
    fn default() -> Self {
        RenderMode::SORTED_LOG
    }
}

impl Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.letter(), self.name())
    }
}

/// Accepts a preset letter (`a`..`d`) or its name, case-insensitive.
impl FromStr for RenderMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        let matches = |m: &RenderMode| {
            wanted == m.letter().to_ascii_lowercase().to_string() || wanted == m.name()
        };
        RenderMode::PRESETS.into_iter().find(matches).ok_or_else(|| {
            Error::InvalidRenderMode(format!("unknown mode '{s}' (use a, b, c, d)"))
        })
    }
}
