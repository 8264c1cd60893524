// Window + software overlay drawing.
// Visual effects provided here:
// 1) A window that shows the anaglyph (or the source image / depth map).
// 2) A circle outline that follows the mouse and shows the brush size.

use crate::error::Error;
use crate::types::FrameBuffer;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

/// Which buffer the window shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Anaglyph, // key 1
    Image,    // key 2
    Depth,    // key 3
}

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window sized to the image.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Visual: the title bar doubles as the status line.
    pub fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// ESC or Q quits.
    pub fn quit_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape) || self.window.is_key_pressed(Key::Q, KeyRepeat::No)
    }

    /// Mouse position in window pixels; None while the pointer is outside the window.
    pub fn mouse_pos(&self) -> Option<(i32, i32)> {
        self.window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| (x.floor() as i32, y.floor() as i32))
    }

    /// Left button raises depth.
    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    /// Right button lowers depth.
    pub fn right_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Right)
    }

    /// Wheel notches this frame: positive = up (bigger brush).
    pub fn scroll_notches(&self) -> i32 {
        match self.window.get_scroll_wheel() {
            Some((_, dy)) if dy > 0.0 => 1,
            Some((_, dy)) if dy < 0.0 => -1,
            _ => 0,
        }
    }

    /// View key pressed this frame, if any.
    pub fn view_pressed(&self) -> Option<View> {
        if self.window.is_key_pressed(Key::Key1, KeyRepeat::No) {
            Some(View::Anaglyph)
        } else if self.window.is_key_pressed(Key::Key2, KeyRepeat::No) {
            Some(View::Image)
        } else if self.window.is_key_pressed(Key::Key3, KeyRepeat::No) {
            Some(View::Depth)
        } else {
            None
        }
    }

    /// R cycles the render mode.
    pub fn r_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::R, KeyRepeat::No)
    }
}

/* ---------- Software drawing ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Circle outline of radius `r` around (cx,cy), midpoint algorithm.
/// Visual: the brush footprint; everything inside gets edited on click.
pub fn draw_circle(fb: &mut FrameBuffer, cx: i32, cy: i32, r: i32, color: u32) {
    if r <= 0 {
        put_pixel(fb, cx, cy, color);
        return;
    }
    let (mut x, mut y) = (r, 0);
    let mut err = 1 - r;
    while x >= y {
        // One point per octant
        let octants = [
            (x, y),
            (y, x),
            (-y, x),
            (-x, y),
            (-x, -y),
            (-y, -x),
            (y, -x),
            (x, -y),
        ];
        for (px, py) in octants {
            put_pixel(fb, cx + px, cy + py, color);
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}
