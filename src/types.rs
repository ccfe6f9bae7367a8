// Core types shared by the mapper, compositor, filter and renderer.

use crate::error::{Error, Result};
use image::{GrayImage, RgbImage};

/// A plain RGB triple. Visual: the tint an object is painted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpack a 0x00RRGGBB pixel.
    #[inline]
    pub fn from_u32(px: u32) -> Self {
        Self {
            r: ((px >> 16) & 0xFF) as u8,
            g: ((px >> 8) & 0xFF) as u8,
            b: (px & 0xFF) as u8,
        }
    }

    /// Pack as 0x00RRGGBB (what minifb wants).
    #[inline]
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    #[inline]
    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the image is (pixels)
    pub height: usize,     // how tall the image is (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// All-black buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Pack an `image` RGB buffer into 0x00RRGGBB pixels.
    pub fn from_rgb_image(img: &RgbImage) -> Self {
        let (w, h) = img.dimensions();
        let mut pixels = Vec::with_capacity((w as usize) * (h as usize));
        for pixel in img.pixels() {
            pixels.push(Rgb::new(pixel[0], pixel[1], pixel[2]).to_u32());
        }
        Self { width: w as usize, height: h as usize, pixels }
    }

    /// Unpack back into an `image` RGB buffer (used when saving the overlay).
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let c = self.get(x as usize, y as usize).unwrap_or(Rgb::new(0, 0, 0));
            image::Rgb(c.channels())
        })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).map(|&px| Rgb::from_u32(px))
    }

    /// Write one pixel; out-of-range writes are ignored.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, color: Rgb) {
        if x >= self.width || y >= self.height {
            return;
        }
        if let Some(px) = self.pixels.get_mut(y * self.width + x) {
            *px = color.to_u32();
        }
    }

    pub fn same_size(&self, other: &FrameBuffer) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// `pixels` holds exactly `width * height` entries.
    pub fn is_consistent(&self) -> bool {
        self.width.checked_mul(self.height) == Some(self.pixels.len())
    }

    /// Overwrite this buffer with `src`. This is the host's "reset work to
    /// original" step before a redraw.
    pub fn copy_from(&mut self, src: &FrameBuffer) -> Result<()> {
        if !self.same_size(src) || self.pixels.len() != src.pixels.len() {
            return Err(Error::DimensionMismatch {
                what: "frame copy",
                expected_w: self.width as u32,
                expected_h: self.height as u32,
                got_w: src.width as u32,
                got_h: src.height as u32,
            });
        }
        self.pixels.copy_from_slice(&src.pixels);
        Ok(())
    }
}

/// Integer point, image space or mask-local depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box in image coordinates. `x..x+width`, `y..y+height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Rejects zero-area boxes and boxes whose far edge overflows u32.
    /// Placement inside an image is checked at render time.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Result<Self> {
        let overflows = x.checked_add(width).is_none() || y.checked_add(height).is_none();
        if width == 0 || height == 0 || overflows {
            return Err(Error::InvalidBox { x, y, width, height });
        }
        Ok(Self { x, y, width, height })
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// One past the last column. u64 so a box built by hand near u32::MAX can't wrap.
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// One past the last row.
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && (p.x as u64) < self.right() && p.y >= self.y && (p.y as u64) < self.bottom()
    }

    /// True when every pixel of the box is inside `fb`.
    pub fn fits_in(&self, fb: &FrameBuffer) -> bool {
        self.right() <= fb.width as u64 && self.bottom() <= fb.height as u64
    }
}

/// Per-pixel presence grid aligned to a bounding box ("scribble map").
/// Cell (0,0) is the top-left of the box, not of the image.
///
/// Cells are unsigned: any value in 1..=255 means object, 0 means background.
/// Editors that stored the map as signed bytes treated 128..=255 (negative)
/// as background; here those values are presence.
///
/// Fields are private so `cells.len() == width * height` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMap {
    width: u32,
    height: u32,
    cells: Vec<u8>, // row-major
}

impl ObjectMap {
    /// Empty (all background) map.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, cells: vec![0u8; (width as usize) * (height as usize)] }
    }

    /// Wrap existing cells; the length must match the size.
    pub fn from_cells(width: u32, height: u32, cells: Vec<u8>) -> Result<Self> {
        let expected = (width as usize) * (height as usize);
        if cells.len() != expected {
            return Err(Error::DimensionMismatch {
                what: "object map cells",
                expected_w: width,
                expected_h: height,
                got_w: cells.len() as u32,
                got_h: 1,
            });
        }
        Ok(Self { width, height, cells })
    }

    /// Any non-zero luma counts as presence.
    pub fn from_luma(img: &GrayImage) -> Self {
        let (w, h) = img.dimensions();
        let cells = img.pixels().map(|p| if p[0] > 0 { 1 } else { 0 }).collect();
        Self { width: w, height: h, cells }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major cell values.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Cell value, or None if (x,y) is outside the map.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y as usize * self.width as usize + x as usize).copied()
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        if x >= self.width || y >= self.height {
            return;
        }
        if let Some(cell) = self.cells.get_mut(y as usize * self.width as usize + x as usize) {
            *cell = value;
        }
    }

    /// Number of cells marked as object.
    pub fn count_set(&self) -> usize {
        self.cells.iter().filter(|&&c| c > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&c| c == 0)
    }
}

/// An object being edited. Plain boxes have no pixel-level segmentation.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotatedObject {
    PlainBox { bbox: BoundingBox, color: Rgb },
    ScribbleBox { bbox: BoundingBox, color: Rgb, map: ObjectMap },
}

impl AnnotatedObject {
    pub fn bbox(&self) -> BoundingBox {
        match self {
            AnnotatedObject::PlainBox { bbox, .. } | AnnotatedObject::ScribbleBox { bbox, .. } => *bbox,
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            AnnotatedObject::PlainBox { color, .. } | AnnotatedObject::ScribbleBox { color, .. } => *color,
        }
    }

    pub fn object_map(&self) -> Option<&ObjectMap> {
        match self {
            AnnotatedObject::PlainBox { .. } => None,
            AnnotatedObject::ScribbleBox { map, .. } => Some(map),
        }
    }

    pub fn object_map_mut(&mut self) -> Option<&mut ObjectMap> {
        match self {
            AnnotatedObject::PlainBox { .. } => None,
            AnnotatedObject::ScribbleBox { map, .. } => Some(map),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_pack_unpack() {
        let c = Rgb::new(0x12, 0x34, 0x56);
        assert_eq!(c.to_u32(), 0x0012_3456);
        assert_eq!(Rgb::from_u32(0x00AB_CDEF), Rgb::new(0xAB, 0xCD, 0xEF));
    }

    #[test]
    fn zero_area_box_rejected() {
        assert!(matches!(BoundingBox::new(0, 0, 0, 3), Err(Error::InvalidBox { .. })));
        assert!(matches!(BoundingBox::new(0, 0, 3, 0), Err(Error::InvalidBox { .. })));
    }

    #[test]
    fn box_edge_overflow_rejected() {
        assert!(matches!(BoundingBox::new(u32::MAX - 1, 0, 5, 5), Err(Error::InvalidBox { .. })));
        assert!(matches!(BoundingBox::new(0, u32::MAX, 1, 1), Err(Error::InvalidBox { .. })));
        assert!(BoundingBox::new(u32::MAX - 5, 0, 5, 5).is_ok());
    }

    #[test]
    fn hand_built_box_near_max_does_not_fit() {
        let fb = FrameBuffer::new(6, 6);
        let bbox = BoundingBox { x: u32::MAX - 1, y: 0, width: 5, height: 5 };
        assert_eq!(bbox.right(), u32::MAX as u64 + 4);
        assert!(!bbox.fits_in(&fb));
        assert!(!bbox.contains(Point::new(0, 0)));
    }

    #[test]
    fn short_pixel_vec_reads_none_and_ignores_writes() {
        let mut fb = FrameBuffer { width: 2, height: 2, pixels: vec![7; 3] };
        assert!(!fb.is_consistent());
        assert_eq!(fb.get(1, 1), None);
        fb.set(1, 1, Rgb::new(1, 1, 1));
        assert_eq!(fb.pixels, vec![7; 3]);
        assert!(FrameBuffer::new(2, 2).copy_from(&fb).is_err());
    }

    #[test]
    fn box_fits_exactly_at_edge() {
        let fb = FrameBuffer::new(10, 10);
        assert!(BoundingBox::new(5, 5, 5, 5).unwrap().fits_in(&fb));
        assert!(!BoundingBox::new(5, 5, 6, 5).unwrap().fits_in(&fb));
    }

    #[test]
    fn object_map_get_out_of_range_is_none() {
        let m = ObjectMap::new(2, 3);
        assert_eq!(m.get(1, 2), Some(0));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.get(0, 3), None);
    }

    #[test]
    fn object_map_from_cells_checks_length() {
        assert!(ObjectMap::from_cells(2, 2, vec![0, 1, 0]).is_err());
        let m = ObjectMap::from_cells(2, 2, vec![0, 1, 0, 3]).unwrap();
        assert_eq!(m.count_set(), 2);
        assert_eq!(m.get(1, 1), Some(3));
    }

    #[test]
    fn short_cell_vec_is_read_safely() {
        // only constructible from inside this module
        let mut map = ObjectMap { width: 3, height: 3, cells: vec![1; 4] };
        assert_eq!(map.get(2, 2), None);
        map.set(2, 2, 5);
        assert_eq!(map.cells(), &[1, 1, 1, 1]);

        crate::filter::filter_object_map(&mut map, &crate::filter::FilterConfig::default());
        assert_eq!(map.cells().len(), 4);
    }

    #[test]
    fn high_byte_values_count_as_presence() {
        let m = ObjectMap::from_cells(2, 1, vec![128, 255]).unwrap();
        assert_eq!(m.count_set(), 2);
    }

    #[test]
    fn object_map_from_luma_thresholds_at_zero() {
        let img = GrayImage::from_raw(3, 1, vec![0, 1, 255]).unwrap();
        let m = ObjectMap::from_luma(&img);
        assert_eq!(m.cells(), &[0, 1, 1]);
    }

    #[test]
    fn frame_copy_checks_size() {
        let mut a = FrameBuffer::new(2, 2);
        let b = FrameBuffer { width: 2, height: 2, pixels: vec![1, 2, 3, 4] };
        a.copy_from(&b).unwrap();
        assert_eq!(a.pixels, vec![1, 2, 3, 4]);
        assert!(a.copy_from(&FrameBuffer::new(3, 2)).is_err());
    }

    #[test]
    fn rgb_image_round_trip_keeps_pixels() {
        let img = RgbImage::from_raw(2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let fb = FrameBuffer::from_rgb_image(&img);
        assert_eq!(fb.get(1, 0), Some(Rgb::new(4, 5, 6)));
        assert_eq!(fb.to_rgb_image(), img);
    }

    #[test]
    fn plain_box_has_no_map() {
        let bbox = BoundingBox::new(0, 0, 2, 2).unwrap();
        let mut obj = AnnotatedObject::PlainBox { bbox, color: Rgb::new(1, 2, 3) };
        assert!(obj.object_map().is_none());
        assert!(obj.object_map_mut().is_none());
        assert_eq!(obj.bbox(), bbox);
    }
}
