// Image space <-> object-map space.
// The object map is aligned to its bounding box, so the mapping is a plain
// offset by the box origin.

use crate::types::{BoundingBox, Point};

/// Map an image-space point into mask-local coordinates.
/// No validation: only call this for points already known to be inside the box.
#[inline]
pub fn to_mask_local(image_point: Point, box_origin: Point) -> Point {
    Point::new(image_point.x - box_origin.x, image_point.y - box_origin.y)
}

/// Every image-space point covered by `bbox`, row by row, paired with its
/// mask-local coordinate. Right and bottom edges are exclusive; anything past
/// u32::MAX is cut off.
pub fn box_points(bbox: BoundingBox) -> impl Iterator<Item = (Point, Point)> {
    let origin = bbox.origin();
    let right = bbox.x.saturating_add(bbox.width);
    let bottom = bbox.y.saturating_add(bbox.height);
    (bbox.y..bottom).flat_map(move |y| {
        (bbox.x..right).map(move |x| {
            let p = Point::new(x, y);
            (p, to_mask_local(p, origin))
        })
    })
}
