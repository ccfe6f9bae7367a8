// Draws one annotated object on top of the image.
// Visual: a frame in the object's color around the object and, for scribbled
// objects, a translucent tint over every segmented pixel.

use log::{debug, warn};

use crate::blend::composite;
use crate::config::OverlayConfig;
use crate::draw::draw_rect_outline;
use crate::error::Result;
use crate::filter::{filter_object_map, FilterStats};
use crate::types::{AnnotatedObject, FrameBuffer};

/// Stateless: everything it needs comes in through each call.
#[derive(Debug, Clone, Default)]
pub struct OverlayRenderer {
    pub config: OverlayConfig,
}

impl OverlayRenderer {
    pub fn new(config: OverlayConfig) -> Self {
        Self { config }
    }

    /// Per-frame redraw: outline first, then the tint on top.
    /// `work` is expected to hold a fresh copy of `original`; resetting it is
    /// the caller's job. Border pixels covered by the map end up tinted.
    pub fn render(&self, object: &AnnotatedObject, original: &FrameBuffer, work: &mut FrameBuffer) -> Result<()> {
        let bbox = object.bbox();
        let color = object.color();

        draw_rect_outline(work, bbox, color, self.config.outline_thickness);

        match object {
            AnnotatedObject::PlainBox { .. } => Ok(()),
            AnnotatedObject::ScribbleBox { map, .. } => {
                composite(
                    original,
                    work,
                    Some(map),
                    bbox,
                    color,
                    self.config.alpha.get(),
                    self.config.rounding,
                )?;
                Ok(())
            }
        }
    }

    /// Explicit "filter object map" action: clean the map in place, then redraw.
    /// Plain boxes are left completely alone.
    ///
    /// Like [`render`](Self::render), this never resets `work`: reset it to
    /// `original` first, or cells the filter removed keep their old tint.
    pub fn filter_and_refresh(
        &self,
        object: &mut AnnotatedObject,
        original: &FrameBuffer,
        work: &mut FrameBuffer,
    ) -> Result<FilterStats> {
        let Some(map) = object.object_map_mut() else {
            debug!("filter requested on a plain box, nothing to do");
            return Ok(FilterStats::default());
        };

        let stats = filter_object_map(map, &self.config.filter);
        if map.is_empty() {
            warn!("object map is empty after filtering");
        }

        self.render(object, original, work)?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::{BoundingBox, ObjectMap, Rgb};

    const GREY: Rgb = Rgb::new(100, 100, 100);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    fn image(w: usize, h: usize) -> FrameBuffer {
        FrameBuffer { width: w, height: h, pixels: vec![GREY.to_u32(); w * h] }
    }

    fn opaque() -> OverlayRenderer {
        let mut config = OverlayConfig::default();
        config.alpha = crate::blend::Alpha::new(1.0).unwrap();
        OverlayRenderer::new(config)
    }

    #[test]
    fn plain_box_only_draws_outline() {
        let original = image(8, 8);
        let mut work = original.clone();
        let bbox = BoundingBox::new(2, 2, 4, 4).unwrap();
        let obj = AnnotatedObject::PlainBox { bbox, color: BLUE };

        OverlayRenderer::default().render(&obj, &original, &mut work).unwrap();

        for y in 0..8u32 {
            for x in 0..8u32 {
                let inside = bbox.contains(crate::types::Point::new(x, y));
                let border = inside && (x == 2 || x == 5 || y == 2 || y == 5);
                let want = if border { BLUE } else { GREY };
                assert_eq!(work.get(x as usize, y as usize), Some(want), "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn plain_box_filter_is_a_no_op() {
        let original = image(4, 4);
        let mut work = image(4, 4);
        work.set(0, 0, BLUE);
        let before = work.clone();
        let bbox = BoundingBox::new(0, 0, 2, 2).unwrap();
        let mut obj = AnnotatedObject::PlainBox { bbox, color: BLUE };

        let stats = OverlayRenderer::default()
            .filter_and_refresh(&mut obj, &original, &mut work)
            .unwrap();
        assert_eq!(stats, FilterStats::default());
        assert_eq!(work, before);
    }

    #[test]
    fn scribble_interior_is_tinted() {
        let original = image(6, 6);
        let mut work = original.clone();
        let bbox = BoundingBox::new(1, 1, 4, 4).unwrap();
        let mut map = ObjectMap::new(4, 4);
        map.set(1, 1, 1);
        let obj = AnnotatedObject::ScribbleBox { bbox, color: BLUE, map };

        OverlayRenderer::default().render(&obj, &original, &mut work).unwrap();

        // 100 + (255 - 100) * 120/255 = 172.94 -> 173 on blue, 100 * 135/255 = 52.94 -> 53 elsewhere
        assert_eq!(work.get(2, 2), Some(Rgb::new(53, 53, 173)));
        assert_eq!(work.get(3, 3), Some(GREY));
        assert_eq!(work.get(1, 1), Some(BLUE));
    }

    #[test]
    fn filter_removes_stray_tint() {
        let original = image(6, 6);
        let mut work = original.clone();
        let bbox = BoundingBox::new(0, 0, 6, 6).unwrap();
        let mut map = ObjectMap::new(6, 6);
        map.set(3, 3, 1); // lone dot
        let mut obj = AnnotatedObject::ScribbleBox { bbox, color: BLUE, map };
        let renderer = opaque();

        renderer.render(&obj, &original, &mut work).unwrap();
        assert_eq!(work.get(3, 3), Some(BLUE));

        // host resets before every redraw
        work.copy_from(&original).unwrap();
        let stats = renderer.filter_and_refresh(&mut obj, &original, &mut work).unwrap();
        assert_eq!(stats.removed, 1);
        assert!(obj.object_map().unwrap().is_empty());
        assert_eq!(work.get(3, 3), Some(GREY));
        assert_eq!(work.get(0, 0), Some(BLUE)); // outline redrawn
    }

    #[test]
    fn filter_leaves_reset_to_the_caller() {
        let original = image(6, 6);
        let mut work = original.clone();
        let bbox = BoundingBox::new(0, 0, 6, 6).unwrap();
        let mut map = ObjectMap::new(6, 6);
        map.set(3, 3, 1);
        let mut obj = AnnotatedObject::ScribbleBox { bbox, color: BLUE, map };
        let renderer = opaque();

        renderer.render(&obj, &original, &mut work).unwrap();
        renderer.filter_and_refresh(&mut obj, &original, &mut work).unwrap();

        // map is clean, but the stale tint is still in the unreset buffer
        assert!(obj.object_map().unwrap().is_empty());
        assert_eq!(work.get(3, 3), Some(BLUE));
    }

    #[test]
    fn mismatched_map_surfaces_out_of_bounds() {
        let original = image(6, 6);
        let mut work = original.clone();
        let bbox = BoundingBox::new(0, 0, 4, 4).unwrap();
        let obj = AnnotatedObject::ScribbleBox { bbox, color: BLUE, map: ObjectMap::new(2, 2) };

        let err = OverlayRenderer::default().render(&obj, &original, &mut work).unwrap_err();
        assert!(matches!(err, Error::OutOfBoundsMask { .. }));
    }
}
