// Knobs for the overlay renderer. Defaults match what the editor ships with.

use crate::blend::{Alpha, Rounding};
use crate::filter::FilterConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayConfig {
    pub alpha: Alpha,            // tint opacity over masked pixels
    pub rounding: Rounding,      // channel rounding after the blend
    pub outline_thickness: u32,  // bounding box stroke width in pixels
    pub filter: FilterConfig,    // used by filter_and_refresh
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            alpha: Alpha::DEFAULT,
            rounding: Rounding::HalfUp,
            outline_thickness: 1,
            filter: FilterConfig::default(),
        }
    }
}
