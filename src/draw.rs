// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the image being annotated with its overlay.
// 2) A rectangle outline around the annotated object.

use crate::error::Error;
use crate::types::{BoundingBox, FrameBuffer, Rgb};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window sized to the image.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60); // cap the redraw loop
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down (we'll exit when this is pressed).
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// F: run the object map filter.
    pub fn f_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::F, KeyRepeat::No)
    }

    /// S: save what's on screen.
    pub fn s_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::S, KeyRepeat::No)
    }
}

/* ---------- Software drawing: pixels, lines, box outline ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: Rgb) {
    if x < 0 || y < 0 {
        return;
    }
    fb.set(x as usize, y as usize, color);
}

/// Draw a thin line between (x0,y0) and (x1,y1) using Bresenham.
pub fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Stroke the border of `bbox`, `thickness` pixels wide, growing inwards.
/// Visual: a solid frame in the object color; the inside is not touched.
pub fn draw_rect_outline(fb: &mut FrameBuffer, bbox: BoundingBox, color: Rgb, thickness: u32) {
    // Edges are computed in i64 and pulled in to one pixel past the buffer, so
    // huge boxes can't wrap when narrowed to i32. Lines are axis-aligned, so
    // clamping their ends keeps exactly the visible part.
    let (w, h) = (fb.width as i64, fb.height as i64);
    let clamp_x = |v: i64| v.clamp(-1, w) as i32;
    let clamp_y = |v: i64| v.clamp(-1, h) as i32;

    // never thicker than half the box, or the rings would cross
    let rings = thickness.min(bbox.width.div_ceil(2)).min(bbox.height.div_ceil(2)) as i64;
    let mut edges = Vec::with_capacity(rings as usize);
    for i in 0..rings {
        edges.push((
            clamp_x(bbox.x as i64 + i),
            clamp_y(bbox.y as i64 + i),
            clamp_x(bbox.right() as i64 - 1 - i),
            clamp_y(bbox.bottom() as i64 - 1 - i),
        ));
    }

    for (left, top, right, bottom) in edges {
        draw_line(fb, left, top, right, top, color);       // top edge
        draw_line(fb, left, bottom, right, bottom, color); // bottom edge
        draw_line(fb, left, top, left, bottom, color);     // left edge
        draw_line(fb, right, top, right, bottom, color);   // right edge
    }
}
