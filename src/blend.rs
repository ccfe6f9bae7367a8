// Tints the masked part of a bounding box with the object's color.
// Visual: the segmented pixels look "painted over" with a translucent layer of
// the object color while the image underneath stays readable.
//
// out = color * alpha + original * (1 - alpha), per channel, computed from the
// ORIGINAL image so the result never depends on what `work` already holds.

use log::debug;

use crate::coords::box_points;
use crate::error::{Error, Result};
use crate::types::{BoundingBox, FrameBuffer, ObjectMap, Rgb};

/// Blend factor in [0,1]; 1 = pure object color, 0 = untouched image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alpha(f32);

impl Alpha {
    /// 120/255, the opacity the editor has always used for scribble maps.
    pub const DEFAULT: Alpha = Alpha(120.0 / 255.0);

    pub fn new(value: f32) -> Result<Self> {
        // NaN fails both comparisons, so it lands here too
        if !(0.0..=1.0).contains(&value) {
            return Err(Error::InvalidAlpha(value));
        }
        Ok(Self(value))
    }

    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for Alpha {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// How a blended channel is brought back to an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rounding {
    /// Nearest integer, .5 goes up.
    #[default]
    HalfUp,
    /// Drop the fraction (integer-cast behaviour of older editors).
    Floor,
}

/// Blend one channel. Both operands are 0..=255 and the mix is convex, so the
/// result is in range before rounding.
#[inline]
pub fn blend_channel(fg: u8, bg: u8, alpha: f32, rounding: Rounding) -> u8 {
    let (fg, bg) = (fg as f32, bg as f32);
    // bg + (fg - bg) * a == fg * a + bg * (1 - a), but exact at a = 0 and a = 1
    let v = bg + (fg - bg) * alpha;
    let v = match rounding {
        Rounding::HalfUp => (v + 0.5).floor(),
        Rounding::Floor => v.floor(),
    };
    v.clamp(0.0, 255.0) as u8
}

#[inline]
pub fn blend_rgb(fg: Rgb, bg: Rgb, alpha: f32, rounding: Rounding) -> Rgb {
    Rgb::new(
        blend_channel(fg.r, bg.r, alpha, rounding),
        blend_channel(fg.g, bg.g, alpha, rounding),
        blend_channel(fg.b, bg.b, alpha, rounding),
    )
}

/// Paint `color` over every pixel of `work` inside `bbox` whose object-map
/// cell is > 0. Pixels with a zero cell are left alone.
///
/// * `map == None` is a plain box: nothing to do, returns `Ok(0)`.
/// * alpha, buffer sizes, box placement and map size are all checked before
///   any write, so a failed call leaves `work` untouched.
/// * A map whose size differs from the box (smaller or larger) is
///   [`Error::OutOfBoundsMask`].
///
/// Returns how many pixels were tinted.
pub fn composite(
    original: &FrameBuffer,
    work: &mut FrameBuffer,
    map: Option<&ObjectMap>,
    bbox: BoundingBox,
    color: Rgb,
    alpha: f32,
    rounding: Rounding,
) -> Result<usize> {
    let alpha = Alpha::new(alpha)?.get();

    let Some(map) = map else {
        return Ok(0);
    };

    if !original.same_size(work) {
        return Err(Error::DimensionMismatch {
            what: "composite work buffer",
            expected_w: original.width as u32,
            expected_h: original.height as u32,
            got_w: work.width as u32,
            got_h: work.height as u32,
        });
    }
    for (what, fb) in [("composite original pixels", original), ("composite work pixels", &*work)] {
        if !fb.is_consistent() {
            return Err(Error::DimensionMismatch {
                what,
                expected_w: fb.width as u32,
                expected_h: fb.height as u32,
                got_w: fb.pixels.len() as u32,
                got_h: 1,
            });
        }
    }
    if !bbox.fits_in(original) {
        return Err(Error::BoxOutsideImage {
            x: bbox.x,
            y: bbox.y,
            width: bbox.width,
            height: bbox.height,
            image_w: original.width as u32,
            image_h: original.height as u32,
        });
    }

    let out_of_bounds = Error::OutOfBoundsMask {
        box_w: bbox.width,
        box_h: bbox.height,
        map_w: map.width(),
        map_h: map.height(),
    };
    if map.width() != bbox.width || map.height() != bbox.height {
        return Err(out_of_bounds);
    }

    let mut tinted = 0usize;
    for (p, local) in box_points(bbox) {
        let Some(cell) = map.get(local.x, local.y) else {
            return Err(out_of_bounds);
        };
        if cell == 0 {
            continue; // background: keep whatever the host reset `work` to
        }

        let (x, y) = (p.x as usize, p.y as usize);
        if let Some(bg) = original.get(x, y) {
            work.set(x, y, blend_rgb(color, bg, alpha, rounding));
            tinted += 1;
        }
    }

    debug!(
        "composite: tinted {tinted} of {} px in box ({},{} {}x{})",
        bbox.width as usize * bbox.height as usize,
        bbox.x,
        bbox.y,
        bbox.width,
        bbox.height
    );
    Ok(tinted)
}
