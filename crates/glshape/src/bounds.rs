//! Axis-aligned bounds and the rectangle contract.
//!
//! Every shape, image and screen region converts to a [`BoundingBox`] for
//! the cheap broad-phase test that runs before any exact geometry.

use crate::geometry::Point;

/// Anything with a mutable position, size and extent.
///
/// Implementors keep `extent == position + size` at all times. Whether
/// moving the position keeps the size or the extent fixed is up to the
/// implementor and documented there.
pub trait Rectangle {
    fn position(&self) -> Point;
    fn size(&self) -> Point;
    fn set_position(&mut self, position: Point);
    fn set_size(&mut self, size: Point);

    /// Bottom-right corner.
    fn extent(&self) -> Point {
        self.position() + self.size()
    }

    /// Move the bottom-right corner by resizing.
    fn set_extent(&mut self, extent: Point) {
        let position = self.position();
        self.set_size(extent - position);
    }
}

/// Rectangles are equal when their position and size match.
pub fn rect_eq(a: &dyn Rectangle, b: &dyn Rectangle) -> bool {
    a.position() == b.position() && a.size() == b.size()
}

/// Anything that can report an axis-aligned bounding box.
pub trait Bounded {
    fn bounds(&self) -> BoundingBox;

    fn point_within_bounds(&self, point: Point) -> bool {
        self.bounds().point_within_bounds(point)
    }

    fn bounds_collide(&self, other: &dyn Bounded) -> bool {
        self.bounds().bounds_collide(&other.bounds())
    }
}

/// An axis-aligned box from `position` (top-left) to `extent`
/// (bottom-right).
///
/// `position <= extent` on both axes is expected but not enforced.
/// Callers pass corners in the right order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub position: Point,
    pub extent: Point,
}

impl BoundingBox {
    #[inline]
    pub const fn new(position: Point, extent: Point) -> Self {
        Self { position, extent }
    }

    #[inline]
    pub fn from_size(position: Point, size: Point) -> Self {
        Self::new(position, position + size)
    }

    #[inline]
    pub fn size(&self) -> Point {
        self.extent - self.position
    }

    /// Centre of the box.
    #[inline]
    pub fn center(&self) -> Point {
        (self.position + self.extent) * 0.5
    }

    /// Corners in winding order: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.position,
            Point::new(self.extent.x, self.position.y),
            self.extent,
            Point::new(self.position.x, self.extent.y),
        ]
    }

    /// Grow outward by `amount` on every side.
    pub fn expand(&self, amount: f64) -> Self {
        Self::new(
            self.position - Point::splat(amount),
            self.extent + Point::splat(amount),
        )
    }

    /// Inclusive containment on both axes.
    #[inline]
    pub fn point_within_bounds(&self, point: Point) -> bool {
        point.x >= self.position.x
            && point.x <= self.extent.x
            && point.y >= self.position.y
            && point.y <= self.extent.y
    }

    /// A box has no content beyond its bounds.
    #[inline]
    pub fn point_within_content(&self, point: Point) -> bool {
        self.point_within_bounds(point)
    }

    /// Broad-phase gate used by every collision query.
    ///
    /// This is deliberately NOT a strict overlap test: it reports a
    /// collision when either box starts above-left of the other's
    /// extent. It never rejects a real overlap but lets many disjoint
    /// pairs through to the narrow phase. See [`BoundingBox::overlaps`]
    /// for the strict form.
    #[inline]
    pub fn bounds_collide(&self, other: &BoundingBox) -> bool {
        (self.position.x <= other.extent.x && self.position.y <= other.extent.y)
            || (other.position.x <= self.extent.x && other.position.y <= self.extent.y)
    }

    /// Strict inclusive AABB overlap.
    #[inline]
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.position.x <= other.extent.x
            && other.position.x <= self.extent.x
            && self.position.y <= other.extent.y
            && other.position.y <= self.extent.y
    }

    /// For boxes, content collision is the bounds gate.
    #[inline]
    pub fn content_collides(&self, other: &BoundingBox) -> bool {
        self.bounds_collide(other)
    }
}

impl Bounded for BoundingBox {
    fn bounds(&self) -> BoundingBox {
        *self
    }
}

/// Moving a box keeps its extent; resizing moves the extent.
impl Rectangle for BoundingBox {
    fn position(&self) -> Point {
        self.position
    }

    fn size(&self) -> Point {
        BoundingBox::size(self)
    }

    fn extent(&self) -> Point {
        self.extent
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn set_size(&mut self, size: Point) {
        self.extent = self.position + size;
    }

    fn set_extent(&mut self, extent: Point) {
        self.extent = extent;
    }
}

// ============================================================================
// TESTS
// ============================================================================
