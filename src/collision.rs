use crate::entities::Rect;

/// Axis-aligned overlap test.  Edges are inclusive: rectangles that only
/// touch are considered intersecting.
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.position.x <= b.right()
        && b.position.x <= a.right()
        && a.position.y <= b.bottom()
        && b.position.y <= a.bottom()
}
