//! Overlay engine for manually segmented objects: draws an object's bounding
//! box and tints its scribble map over the image so the annotator can check
//! the mask against the pixels underneath.

pub mod blend;
pub mod config;
pub mod coords;
pub mod draw;
pub mod error;
pub mod filter;
pub mod overlay;
pub mod types;

pub use blend::{composite, Alpha, Rounding};
pub use config::OverlayConfig;
pub use error::{Error, Result};
pub use filter::{filter_object_map, FilterConfig, FilterStats};
pub use overlay::OverlayRenderer;
pub use types::{AnnotatedObject, BoundingBox, FrameBuffer, ObjectMap, Point, Rgb};
