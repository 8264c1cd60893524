// What you SEE:
// • The red/cyan anaglyph of the image, using the depth map for the shift.
// • Hold Left Mouse: raise depth under the brush. Right Mouse: lower it.
//   The anaglyph rows under the brush update as you paint.
// • Wheel: brush size. R: next render mode.
// • 1 / 2 / 3: show anaglyph / source image / depth map. Q or ESC quits.

use clap::Parser;
use depth_anaglyph::config::{Args, ViewerConfig};
use depth_anaglyph::draw::{Drawer, View, draw_circle};
use depth_anaglyph::stereo::DEFAULT_MAX_DISPARITY;
use depth_anaglyph::{Error, FrameBuffer, StereoCompositor, loader};
use log::{debug, info};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ViewerConfig::from(Args::parse());
    let (image_path, depth_path) = (config.image_path.display(), config.depth_path.display());
    info!("image: {image_path}, depth: {depth_path}");

    /* --- Load + first full composite --- */
    let (image, depth) = loader::load_pair(&config.image_path, &config.depth_path)?;
    let depth = Arc::new(RwLock::new(depth));
    let mut pic = StereoCompositor::new(Arc::new(image), depth, config.mode)?;
    if config.max_disparity != DEFAULT_MAX_DISPARITY {
        pic.set_max_disparity(config.max_disparity);
    }
    if config.blur_override.is_some() {
        pic.set_blur_override(config.blur_override);
    }

    /* --- Headless: write the anaglyph and stop --- */
    if let Some(out) = &config.output {
        return loader::save_buffer(pic.output(), out);
    }

    run_viewer(pic, config)
}

fn title(pic: &StereoCompositor, view: View, radius: u32) -> String {
    format!("Depth Anaglyph | {view:?} | mode {} | brush {radius}", pic.mode())
}

fn run_viewer(mut pic: StereoCompositor, config: ViewerConfig) -> Result<(), Error> {
    let (w, h) = (pic.width(), pic.height());
    let mut brush = config.brush;
    let mut view = View::Anaglyph;
    let mut drawer = Drawer::new(&title(&pic, view, brush.radius), w, h)?;

    /* --- Reusable screen buffer ---
       Visual: this is the image you actually see each frame. */
    let mut screen = FrameBuffer::new(w, h);

    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.quit_pressed() {
        let now = Instant::now();
        let mut retitle = false;

        /* 1) Keys: view switch and mode cycling */
        if let Some(v) = drawer.view_pressed() {
            if v == View::Anaglyph {
                pic.update(); // visual: forces a fresh full anaglyph
            }
            view = v;
            retitle = true;
        }
        if drawer.r_pressed_once() {
            // visual: whole image re-rendered in the next preset
            pic.set_render_mode(pic.mode().next());
            retitle = true;
        }

        /* 2) Wheel resizes the brush */
        let notches = drawer.scroll_notches();
        if notches != 0 {
            brush.scroll(notches);
            retitle = true;
        }

        /* 3) Painting: all dabs of this frame share one row recompute */
        if let Some((mx, my)) = drawer.mouse_pos() {
            let delta = if drawer.left_mouse_down() {
                Some(brush.strength)
            } else if drawer.right_mouse_down() {
                Some(-brush.strength)
            } else {
                None
            };
            if let Some(delta) = delta {
                pic.edit_depth_deferred(mx, my, brush.radius, delta);
            }
        }
        let rows = pic.flush();
        if rows > 0 {
            debug!("recomputed {rows} rows");
        }

        /* 4) Pick the buffer to show */
        match view {
            View::Anaglyph => pic.output().fill_frame(&mut screen),
            View::Image => pic.image().fill_frame(&mut screen),
            View::Depth => pic
                .depth()
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .fill_frame(&mut screen),
        }

        /* 5) Brush outline on top */
        if let Some((mx, my)) = drawer.mouse_pos() {
            // visual: yellow ring
            draw_circle(&mut screen, mx, my, brush.radius as i32, 0x00_FF_CC_33);
        }

        if retitle {
            drawer.set_title(&title(&pic, view, brush.radius));
        }

        /* 6) Present */
        drawer.present(&screen)?;

        /* 7) FPS to the log once per second */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            debug!("FPS: {:.1}", frames_this_second as f32 / secs);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    info!("viewer closed");
    Ok(())
}
