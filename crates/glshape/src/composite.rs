//! Rectangles and circles built on top of [`PrimitiveShape`].
//!
//! A composite owns one primitive and regenerates its whole point list
//! whenever a defining parameter (corner, size, centre, radius) changes.
//! Collision and drawing go straight to that primitive.

use crate::bounds::{Bounded, BoundingBox, Rectangle};
use crate::collide::Shape;
use crate::geometry::{circle_points, circle_points_auto, Color, Point};
use crate::render::{Drawable, RenderContext};
use crate::shape::{PrimitiveShape, ShapeKind};

/// Implements the delegating traits and colour/width forwarding for a
/// composite whose primitive lives in `self.shape`.
///
/// ## Rust Lesson #16: Declarative Macros
///
/// `macro_rules!` pastes the same impl blocks for every listed type.
/// It is checked after expansion, so a typo still fails to compile.
macro_rules! composite_shape {
    ($($ty:ty),+ $(,)?) => {$(
        impl $ty {
            pub fn with_color(mut self, color: Color) -> Self {
                self.shape.set_color(color);
                self
            }

            pub fn with_line_width(mut self, line_width: f64) -> Self {
                self.shape.set_line_width(line_width);
                self
            }

            pub fn set_color(&mut self, color: Color) {
                self.shape.set_color(color);
            }

            pub fn set_line_width(&mut self, line_width: f64) {
                self.shape.set_line_width(line_width);
            }
        }

        impl Bounded for $ty {
            fn bounds(&self) -> BoundingBox {
                self.shape.bounds()
            }
        }

        impl Shape for $ty {
            fn primitive(&self) -> &PrimitiveShape {
                &self.shape
            }
        }

        impl Drawable for $ty {
            fn draw(&self, context: &mut dyn RenderContext) {
                self.shape.draw(context);
            }
        }
    )+};
}

composite_shape!(HollowRectangle, SolidRectangle, HollowCircle, SolidCircle);

// ============================================================================
// RECTANGLES
// ============================================================================

fn corners(position: Point, size: Point) -> Vec<Point> {
    BoundingBox::from_size(position, size).corners().to_vec()
}

macro_rules! rectangle_impl {
    ($ty:ident, $kind:expr) => {
        impl $ty {
            /// Corners wind top-left, top-right, bottom-right, bottom-left.
            pub fn new(position: Point, size: Point) -> Self {
                Self {
                    shape: PrimitiveShape::from_parts($kind, corners(position, size)),
                }
            }

            pub fn from_bounds(bounds: BoundingBox) -> Self {
                Self::new(bounds.position, bounds.size())
            }

            fn corner(&self, index: usize) -> Point {
                self.shape.points()[index]
            }
        }

        /// Moving keeps the size; resizing keeps the position.
        impl Rectangle for $ty {
            fn position(&self) -> Point {
                self.corner(0)
            }

            fn size(&self) -> Point {
                self.corner(2) - self.corner(0)
            }

            fn extent(&self) -> Point {
                self.corner(2)
            }

            fn set_position(&mut self, position: Point) {
                let size = self.size();
                self.shape.replace_points_unchecked(corners(position, size));
            }

            fn set_size(&mut self, size: Point) {
                let position = self.position();
                self.shape.replace_points_unchecked(corners(position, size));
            }
        }
    };
}

/// Outline-only rectangle (a line loop).
#[derive(Debug, Clone, PartialEq)]
pub struct HollowRectangle {
    shape: PrimitiveShape,
}

/// Filled rectangle (a quadrilateral).
#[derive(Debug, Clone, PartialEq)]
pub struct SolidRectangle {
    shape: PrimitiveShape,
}

rectangle_impl!(HollowRectangle, ShapeKind::LineLoop);
rectangle_impl!(SolidRectangle, ShapeKind::Quadrilateral);

// ============================================================================
// CIRCLES
// ============================================================================

/// Outline points for a circle: `segments` evenly spaced points, or one
/// per unit of arc when unset.
fn ring(center: Point, radius: f64, segments: Option<usize>) -> Vec<Point> {
    match segments {
        Some(count) if count > 0 => circle_points(center, radius, count),
        _ => circle_points_auto(center, radius),
    }
}

macro_rules! circle_impl {
    ($ty:ident, $kind:expr) => {
        impl $ty {
            pub fn new(center: Point, radius: f64) -> Self {
                Self {
                    center,
                    radius,
                    segments: None,
                    shape: PrimitiveShape::from_parts($kind, ring(center, radius, None)),
                }
            }

            /// Use exactly `segments` outline points. Zero means automatic.
            pub fn with_segments(mut self, segments: usize) -> Self {
                self.set_segments(Some(segments));
                self
            }

            #[inline]
            pub fn center(&self) -> Point {
                self.center
            }

            #[inline]
            pub fn radius(&self) -> f64 {
                self.radius
            }

            #[inline]
            pub fn segments(&self) -> Option<usize> {
                self.segments
            }

            pub fn set_center(&mut self, center: Point) {
                self.center = center;
                self.regenerate();
            }

            pub fn set_radius(&mut self, radius: f64) {
                self.radius = radius;
                self.regenerate();
            }

            pub fn set_segments(&mut self, segments: Option<usize>) {
                self.segments = segments.filter(|&n| n > 0);
                self.regenerate();
            }

            fn regenerate(&mut self) {
                let points = ring(self.center, self.radius, self.segments);
                self.shape.replace_points_unchecked(points);
            }
        }
    };
}

/// Outline-only circle (a line loop).
#[derive(Debug, Clone, PartialEq)]
pub struct HollowCircle {
    center: Point,
    radius: f64,
    segments: Option<usize>,
    shape: PrimitiveShape,
}

/// Filled circle (a polygon).
#[derive(Debug, Clone, PartialEq)]
pub struct SolidCircle {
    center: Point,
    radius: f64,
    segments: Option<usize>,
    shape: PrimitiveShape,
}

circle_impl!(HollowCircle, ShapeKind::LineLoop);
circle_impl!(SolidCircle, ShapeKind::Polygon);

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::MAX_AUTO_SEGMENTS;
    use crate::shape::ShapeType;

    #[test]
    fn rectangle_corners_wind_from_top_left() {
        let rect = SolidRectangle::new(Point::new(1.0, 2.0), Point::new(10.0, 5.0));
        assert_eq!(
            rect.outline(),
            &[
                Point::new(1.0, 2.0),
                Point::new(11.0, 2.0),
                Point::new(11.0, 7.0),
                Point::new(1.0, 7.0),
            ]
        );
        assert_eq!(rect.position(), Point::new(1.0, 2.0));
        assert_eq!(rect.extent(), Point::new(11.0, 7.0));
        assert_eq!(rect.primitive().kind(), ShapeKind::Quadrilateral);
        assert_eq!(rect.shape_type(), ShapeType::Solid);
    }

    #[test]
    fn rectangle_regenerates_on_change() {
        let mut rect = HollowRectangle::new(Point::ZERO, Point::new(10.0, 10.0));
        rect.set_position(Point::new(5.0, 5.0));
        assert_eq!(rect.size(), Point::new(10.0, 10.0));
        assert_eq!(rect.extent(), Point::new(15.0, 15.0));

        rect.set_extent(Point::new(25.0, 9.0));
        assert_eq!(rect.position(), Point::new(5.0, 5.0));
        assert_eq!(rect.size(), Point::new(20.0, 4.0));
        assert_eq!(rect.outline()[1], Point::new(25.0, 5.0));
        assert_eq!(rect.shape_type(), ShapeType::Hollow);
    }

    #[test]
    fn overlapping_solid_rectangles_collide_both_ways() {
        let a = SolidRectangle::new(Point::ZERO, Point::new(10.0, 10.0));
        let b = SolidRectangle::new(Point::new(5.0, 5.0), Point::new(10.0, 10.0));
        assert!(a.content_collides(&b));
        assert!(b.content_collides(&a));
    }

    #[test]
    fn composite_collides_with_itself() {
        let circle = SolidCircle::new(Point::new(50.0, 50.0), 10.0);
        assert!(circle.content_collides(&circle));
    }

    #[test]
    fn circle_points_lie_on_circle() {
        let center = Point::new(20.0, 30.0);
        let circle = HollowCircle::new(center, 15.0);
        assert!(circle.outline().len() > 8);
        for p in circle.outline() {
            assert!((p.distance(center) - 15.0).abs() < 1e-9);
        }
    }

    #[test]
    fn circle_regenerates_on_change() {
        let mut circle = SolidCircle::new(Point::ZERO, 10.0).with_segments(8);
        assert_eq!(circle.outline().len(), 8);

        circle.set_center(Point::new(100.0, 0.0));
        assert!((circle.outline()[0].x - 110.0).abs() < 1e-9);

        circle.set_radius(2.0);
        assert!((circle.outline()[0].x - 102.0).abs() < 1e-9);

        circle.set_segments(Some(0));
        assert_eq!(circle.segments(), None);
        assert_eq!(circle.outline().len(), 13); // ceil(2π · 2)
    }

    #[test]
    fn huge_circle_has_bounded_outline() {
        let circle = SolidCircle::new(Point::ZERO, 1.0e13);
        assert_eq!(circle.outline().len(), MAX_AUTO_SEGMENTS);
        assert!(circle.point_within_content(Point::new(1.0e12, 0.0)));
    }

    #[test]
    fn degenerate_circle_is_its_centre() {
        let circle = SolidCircle::new(Point::new(4.0, 4.0), 0.0);
        assert_eq!(circle.outline(), &[Point::new(4.0, 4.0)]);
    }

    #[test]
    fn solid_circle_contains_centre_hollow_does_not() {
        let center = Point::new(50.0, 50.0);
        assert!(SolidCircle::new(center, 10.0).point_within_content(center));
        assert!(!HollowCircle::new(center, 10.0).point_within_content(center));
        assert!(HollowCircle::new(center, 10.0).point_within_content(Point::new(60.0, 50.0)));
    }

    #[test]
    fn setters_forward_to_primitive() {
        let mut rect =
            SolidRectangle::new(Point::ZERO, Point::new(1.0, 1.0)).with_color(Color::RED);
        rect.set_line_width(4.0);
        assert_eq!(rect.color(), Color::RED);
        assert_eq!(rect.line_width(), 4.0);
        assert_eq!(rect.bounds().position, Point::new(-4.0, -4.0));
    }
}
