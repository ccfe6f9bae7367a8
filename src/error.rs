// One error type for the whole overlay engine and the preview window.
// Every variant states *where* things went wrong.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The object map and the bounding box disagree about the object's size,
    /// so some mask-local coordinate has no cell (or some cell has no pixel).
    #[error("object map is {map_w}x{map_h} but its bounding box is {box_w}x{box_h}")]
    OutOfBoundsMask { box_w: u32, box_h: u32, map_w: u32, map_h: u32 },

    /// Blend factor outside [0,1] (or NaN). Rejected before any pixel is written.
    #[error("alpha {0} is outside [0, 1]")]
    InvalidAlpha(f32),

    /// Two buffers that must share a size don't.
    #[error("{what}: expected {expected_w}x{expected_h}, got {got_w}x{got_h}")]
    DimensionMismatch {
        what: &'static str,
        expected_w: u32,
        expected_h: u32,
        got_w: u32,
        got_h: u32,
    },

    /// The bounding box reaches past the image edge (callers must clip).
    #[error("box at ({x},{y}) size {width}x{height} exceeds the {image_w}x{image_h} image")]
    BoxOutsideImage {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        image_w: u32,
        image_h: u32,
    },

    /// Zero-area bounding box, or one whose far edge doesn't fit in u32.
    #[error("invalid bounding box at ({x},{y}) size {width}x{height}")]
    InvalidBox { x: u32, y: u32, width: u32, height: u32 },

    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed

    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError), // Loading or saving an image file failed
}
