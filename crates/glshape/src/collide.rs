//! Collision queries between shapes, images and boxes.
//!
//! Every query runs in two phases:
//! 1. Broad phase: [`BoundingBox::bounds_collide`] on the two boxes.
//! 2. Narrow phase: exact geometry, chosen by the [`ShapeType`] tiers.
//!
//! | Query            | Point / PointSet          | LineSet / Hollow        | Solid          |
//! |------------------|---------------------------|-------------------------|----------------|
//! | point in content | exact vertex match        | within line width       | ray casting    |
//! | shape vs shape   | vertex vs side origins    | side crossings          | side crossings |
//! | shape vs image   | vertex on visible pixel   | visible pixel in content | same          |
//!
//! [`content_overlaps`] widens shape vs shape with containment: a solid
//! holding the other shape overlaps it even when no outlines cross.
//!
//! ## Rust Lesson #14: Trait Objects
//!
//! `&dyn Shape` lets one function accept a rectangle, a circle or a raw
//! primitive without knowing which at compile time. Every composite
//! exposes its inner [`PrimitiveShape`], and the engine only ever looks
//! at that.

use tracing::{debug, trace};

use crate::algebra::LinearEquation;
use crate::bounds::{Bounded, BoundingBox};
use crate::geometry::{Color, Point};
use crate::raster::Image;
use crate::shape::{PrimitiveShape, Segment, ShapeType};

/// A collidable shape.
///
/// Implementors only provide [`Shape::primitive`] (plus `bounds` from
/// [`Bounded`]). Every query has a provided implementation on top.
pub trait Shape: Bounded {
    /// The primitive that holds this shape's points.
    fn primitive(&self) -> &PrimitiveShape;

    fn shape_type(&self) -> ShapeType {
        self.primitive().shape_type()
    }

    fn outline(&self) -> &[Point] {
        self.primitive().points()
    }

    fn sides(&self) -> Vec<Segment> {
        self.primitive().sides()
    }

    fn color(&self) -> Color {
        self.primitive().color()
    }

    fn line_width(&self) -> f64 {
        self.primitive().line_width()
    }

    fn point_within_content(&self, point: Point) -> bool {
        point_within_content(self.primitive(), point)
    }

    fn content_collides(&self, other: &dyn Shape) -> bool {
        content_collides(self.primitive(), other.primitive())
    }

    fn content_overlaps(&self, other: &dyn Shape) -> bool {
        content_overlaps(self.primitive(), other.primitive())
    }

    fn content_collides_image(&self, image: &Image, alpha_threshold: u8) -> bool {
        content_collides_image(self.primitive(), image, alpha_threshold)
    }

    fn content_collides_box(&self, other: &BoundingBox) -> bool {
        content_collides_box(self.primitive(), other)
    }
}

impl Shape for PrimitiveShape {
    fn primitive(&self) -> &PrimitiveShape {
        self
    }
}

// ============================================================================
// NARROW PHASE
// ============================================================================

/// A shape with its bounds and sides computed once, for repeated point
/// queries (one per pixel when testing against an image).
struct Prepared<'a> {
    shape: &'a PrimitiveShape,
    bounds: BoundingBox,
    sides: Vec<Segment>,
}

impl<'a> Prepared<'a> {
    fn new(shape: &'a PrimitiveShape) -> Self {
        Self {
            shape,
            bounds: shape.bounds(),
            sides: shape.sides(),
        }
    }

    fn contains(&self, point: Point) -> bool {
        if !self.bounds.point_within_bounds(point) {
            return false;
        }

        let shape_type = self.shape.shape_type();
        if shape_type <= ShapeType::PointSet {
            self.shape.points().contains(&point)
        } else if shape_type >= ShapeType::Solid {
            ray_cast(&self.sides, point)
        } else {
            let width = self.shape.line_width();
            self.sides.iter().any(|side| side.point_near(point, width))
        }
    }
}

/// Even-odd test with a horizontal ray cast from `point` toward +X.
///
/// A side counts when it straddles the ray's Y with the half-open rule
/// (one endpoint strictly above, the other at or below), so a ray that
/// passes exactly through a vertex is counted once. Horizontal sides
/// never straddle.
fn ray_cast(sides: &[Segment], point: Point) -> bool {
    let ray = LinearEquation::new(0.0, point.y);
    let crossings = sides
        .iter()
        .filter(|side| (side.origin.y > point.y) != (side.destination.y > point.y))
        // a straddling side always meets the ray inside its own Y span
        .filter_map(|side| side.equation().intersect(&ray).point())
        .filter(|hit| hit.x >= point.x)
        .count();
    crossings % 2 == 1
}

/// Side origins of `shape`, or its points when it has no sides.
fn edge_origins(shape: &PrimitiveShape) -> Vec<Point> {
    if shape.shape_type() <= ShapeType::PointSet {
        shape.points().to_vec()
    } else {
        shape.sides().iter().map(|side| side.origin).collect()
    }
}

/// Whether a solid `container` holds the first point of `other`.
fn holds_first_point(container: &PrimitiveShape, other: &PrimitiveShape) -> bool {
    container.shape_type() >= ShapeType::Solid
        && other
            .points()
            .first()
            .is_some_and(|p| point_within_content(container, *p))
}

// ============================================================================
// QUERIES
// ============================================================================

/// Whether `point` lies in the shape's content.
///
/// Points outside the bounds are rejected first. Points are matched
/// exactly, lines and loops within their line width, solids by ray
/// casting.
pub fn point_within_content(shape: &PrimitiveShape, point: Point) -> bool {
    Prepared::new(shape).contains(point)
}

/// Whether two shapes' contents touch.
///
/// A shape always collides with itself. Otherwise the broad phase runs
/// first, then one of:
/// - `this` point-tier: its vertices against the other's side origins
///   (or points, if the other is point-tier too);
/// - `this` edge-bearing: any of its sides crossing one of the other's
///   sides. A point-tier `other` has no sides, so never collides here.
///
/// Nested shapes whose outlines never cross do not collide; see
/// [`content_overlaps`].
pub fn content_collides(this: &PrimitiveShape, other: &PrimitiveShape) -> bool {
    if std::ptr::eq(this, other) {
        return true;
    }
    if !this.bounds().bounds_collide(&other.bounds()) {
        trace!("broad phase rejected");
        return false;
    }

    if this.shape_type() <= ShapeType::PointSet {
        let origins = edge_origins(other);
        return this.points().iter().any(|p| origins.contains(p));
    }

    let ours = this.sides();
    let theirs = other.sides();
    ours.iter().any(|a| theirs.iter().any(|b| a.intersection(b).is_some()))
}

/// Whether two shapes touch or one contains the other.
///
/// Symmetric: a point-tier shape is always tested from its own side.
/// On top of [`content_collides`], a solid holding the other shape's
/// first point overlaps it.
pub fn content_overlaps(this: &PrimitiveShape, other: &PrimitiveShape) -> bool {
    if this.shape_type() > ShapeType::PointSet && other.shape_type() <= ShapeType::PointSet {
        return content_overlaps(other, this);
    }
    if content_collides(this, other) {
        return true;
    }
    let contained = holds_first_point(this, other) || holds_first_point(other, this);
    if contained {
        debug!("overlap by containment");
    }
    contained
}

/// Whether the shape's content touches a visible pixel of `image`.
///
/// Point-tier shapes test their own vertices against the image. Other
/// shapes walk every visible pixel, placed at the image position plus
/// its (x, y) offset, and stop at the first one inside the shape.
pub fn content_collides_image(shape: &PrimitiveShape, image: &Image, alpha_threshold: u8) -> bool {
    if !shape.bounds().bounds_collide(&image.bounds()) {
        return false;
    }

    if shape.shape_type() <= ShapeType::PointSet {
        return shape
            .points()
            .iter()
            .any(|p| image.point_visible(*p, alpha_threshold));
    }

    let prepared = Prepared::new(shape);
    let origin = image.position();
    let (width, height) = image.dimensions();
    for y in 0..height {
        for x in 0..width {
            if !image.pixel_is_visible(x as i64, y as i64, alpha_threshold, false) {
                continue;
            }
            let p = origin + Point::new(x as f64, y as f64);
            if prepared.contains(p) {
                debug!(x, y, "visible pixel inside shape");
                return true;
            }
        }
    }
    false
}

/// Whether the shape's content touches an axis-aligned box.
///
/// A box equal to the shape's own bounds always collides. Point-tier
/// shapes need a vertex inside the box. Everything else overlaps a
/// zero-width solid quadrilateral with the box's corners, so a box
/// inside the shape (or around it) counts.
pub fn content_collides_box(shape: &PrimitiveShape, other: &BoundingBox) -> bool {
    if shape.bounds() == *other {
        return true;
    }
    if shape.shape_type() <= ShapeType::PointSet {
        return shape.points().iter().any(|p| other.point_within_bounds(*p));
    }

    let [a, b, c, d] = other.corners();
    let quad = PrimitiveShape::quadrilateral(a, b, c, d).with_line_width(0.0);
    content_overlaps(shape, &quad)
}

// ============================================================================
// TESTS
// ============================================================================
