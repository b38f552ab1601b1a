//! Primitive shapes: one point-list payload tagged with a [`ShapeKind`].
//!
//! ## Rust Lesson #4: Ownership & Vec
//!
//! A `PrimitiveShape` OWNS its `Vec<Point>`. Points passed in are copied
//! into that storage, and nothing outside can hold a mutable handle to
//! it. All mutation goes through methods that keep the kind's point
//! count valid, so a triangle can never end up with four corners.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::algebra::{Intersection, LinearEquation};
use crate::bounds::{Bounded, BoundingBox};
use crate::error::{Error, Result};
use crate::geometry::{Color, Point};
use crate::render::{Drawable, RenderContext};

/// Line width given to shapes built without an explicit one.
pub const DEFAULT_LINE_WIDTH: f64 = 1.0;

/// Collision tier of a shape.
///
/// The order matters: queries compare tiers (`<= PointSet`, `>= Solid`)
/// to pick an algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShapeType {
    /// A single point.
    Point = 1,
    /// Several unconnected points.
    PointSet = 2,
    /// Connected lines that do not enclose anything.
    LineSet = 3,
    /// Lines enclosing a region; the region itself is empty.
    Hollow = 4,
    /// An enclosed, filled region.
    Solid = 5,
}

/// How the render context should connect a shape's vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    Polygon,
    Triangles,
    Quads,
    TriangleFan,
}

/// How many points a kind accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    fn check(self, kind: ShapeKind, actual: usize) -> Result<()> {
        match self {
            Arity::Exactly(expected) if actual != expected => {
                Err(Error::WrongPointCount { kind, expected, actual })
            }
            Arity::AtLeast(required) if actual < required => {
                Err(Error::NotEnoughPoints { kind, required, actual })
            }
            _ => Ok(()),
        }
    }
}

/// The concrete primitive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Point,
    PointSet,
    Line,
    LineStrip,
    LineLoop,
    Polygon,
    Triangle,
    Quadrilateral,
    /// First point is the centre, the rest walk the circumference.
    TriangleFan,
}

impl ShapeKind {
    /// Get all shape kinds.
    pub fn all() -> &'static [ShapeKind] {
        &[
            ShapeKind::Point,
            ShapeKind::PointSet,
            ShapeKind::Line,
            ShapeKind::LineStrip,
            ShapeKind::LineLoop,
            ShapeKind::Polygon,
            ShapeKind::Triangle,
            ShapeKind::Quadrilateral,
            ShapeKind::TriangleFan,
        ]
    }

    /// Get kind name as string.
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Point => "point",
            ShapeKind::PointSet => "point_set",
            ShapeKind::Line => "line",
            ShapeKind::LineStrip => "line_strip",
            ShapeKind::LineLoop => "line_loop",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Quadrilateral => "quadrilateral",
            ShapeKind::TriangleFan => "triangle_fan",
        }
    }

    /// Parse a kind name. Accepts the `name()` spelling and dashes.
    pub fn from_name(name: &str) -> Option<ShapeKind> {
        let normalized = name.trim().to_lowercase().replace('-', "_");
        Self::all().iter().copied().find(|k| k.name() == normalized)
    }

    /// Collision tier of this kind.
    pub fn shape_type(&self) -> ShapeType {
        match self {
            ShapeKind::Point => ShapeType::Point,
            ShapeKind::PointSet => ShapeType::PointSet,
            ShapeKind::Line | ShapeKind::LineStrip => ShapeType::LineSet,
            ShapeKind::LineLoop => ShapeType::Hollow,
            ShapeKind::Polygon
            | ShapeKind::Triangle
            | ShapeKind::Quadrilateral
            | ShapeKind::TriangleFan => ShapeType::Solid,
        }
    }

    /// Draw topology of this kind.
    pub fn topology(&self) -> Topology {
        match self {
            ShapeKind::Point | ShapeKind::PointSet => Topology::Points,
            ShapeKind::Line => Topology::Lines,
            ShapeKind::LineStrip => Topology::LineStrip,
            ShapeKind::LineLoop => Topology::LineLoop,
            ShapeKind::Polygon => Topology::Polygon,
            ShapeKind::Triangle => Topology::Triangles,
            ShapeKind::Quadrilateral => Topology::Quads,
            ShapeKind::TriangleFan => Topology::TriangleFan,
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            ShapeKind::Point => Arity::Exactly(1),
            ShapeKind::Line => Arity::Exactly(2),
            ShapeKind::Triangle => Arity::Exactly(3),
            ShapeKind::Quadrilateral => Arity::Exactly(4),
            ShapeKind::TriangleFan => Arity::AtLeast(2),
            ShapeKind::PointSet
            | ShapeKind::LineStrip
            | ShapeKind::LineLoop
            | ShapeKind::Polygon => Arity::AtLeast(1),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One edge of a shape's outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub origin: Point,
    pub destination: Point,
}

impl Segment {
    #[inline]
    pub const fn new(origin: Point, destination: Point) -> Self {
        Self { origin, destination }
    }

    /// The infinite line through both endpoints.
    #[inline]
    pub fn equation(&self) -> LinearEquation {
        LinearEquation::regression(self.origin, self.destination)
    }

    /// Box spanned by the endpoints.
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.origin.min(self.destination), self.origin.max(self.destination))
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.origin.distance(self.destination)
    }

    /// Where two segments cross, if they do.
    ///
    /// The line crossing must fall inside both segments' boxes.
    pub fn intersection(&self, other: &Segment) -> Intersection {
        let hit = self
            .equation()
            .intersect_within(&other.equation(), self.origin, self.destination);
        match hit {
            Intersection::At(p) if other.bounds().point_within_bounds(p) => hit,
            _ => Intersection::None,
        }
    }

    /// Whether `point` is within `thickness` of this segment.
    ///
    /// Distance is measured to the infinite line, limited to the
    /// segment's box grown by `thickness`.
    pub fn point_near(&self, point: Point, thickness: f64) -> bool {
        self.bounds().expand(thickness.max(0.0)).point_within_bounds(point)
            && self.equation().point_on_line(point, thickness)
    }

    /// A drawable line shape for this edge.
    pub fn to_line(&self) -> PrimitiveShape {
        PrimitiveShape::line(self.origin, self.destination)
    }
}

/// A point list tagged with its kind, plus colour and line width.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveShape {
    kind: ShapeKind,
    points: Vec<Point>,
    color: Color,
    line_width: f64,
}

impl PrimitiveShape {
    /// Build a shape of any kind, checking the point count.
    pub fn new<I>(kind: ShapeKind, points: I) -> Result<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let points: Vec<Point> = points.into_iter().collect();
        kind.arity().check(kind, points.len())?;
        Ok(Self::from_parts(kind, points))
    }

    /// Build without checking the point count. Callers guarantee it.
    pub(crate) fn from_parts(kind: ShapeKind, points: Vec<Point>) -> Self {
        debug_assert!(kind.arity().check(kind, points.len()).is_ok());
        Self {
            kind,
            points,
            color: Color::default(),
            line_width: DEFAULT_LINE_WIDTH,
        }
    }

    pub fn point(at: Point) -> Self {
        Self::from_parts(ShapeKind::Point, vec![at])
    }

    pub fn line(origin: Point, destination: Point) -> Self {
        Self::from_parts(ShapeKind::Line, vec![origin, destination])
    }

    pub fn triangle(a: Point, b: Point, c: Point) -> Self {
        Self::from_parts(ShapeKind::Triangle, vec![a, b, c])
    }

    pub fn quadrilateral(a: Point, b: Point, c: Point, d: Point) -> Self {
        Self::from_parts(ShapeKind::Quadrilateral, vec![a, b, c, d])
    }

    pub fn point_set<I: IntoIterator<Item = Point>>(points: I) -> Result<Self> {
        Self::new(ShapeKind::PointSet, points)
    }

    pub fn line_strip<I: IntoIterator<Item = Point>>(points: I) -> Result<Self> {
        Self::new(ShapeKind::LineStrip, points)
    }

    pub fn line_loop<I: IntoIterator<Item = Point>>(points: I) -> Result<Self> {
        Self::new(ShapeKind::LineLoop, points)
    }

    pub fn polygon<I: IntoIterator<Item = Point>>(points: I) -> Result<Self> {
        Self::new(ShapeKind::Polygon, points)
    }

    /// A fan around `center`. Needs at least one circumference point.
    pub fn triangle_fan<I: IntoIterator<Item = Point>>(
        center: Point,
        circumference: I,
    ) -> Result<Self> {
        Self::new(ShapeKind::TriangleFan, std::iter::once(center).chain(circumference))
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_line_width(mut self, line_width: f64) -> Self {
        self.set_line_width(line_width);
        self
    }

    #[inline]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[inline]
    pub fn shape_type(&self) -> ShapeType {
        self.kind.shape_type()
    }

    #[inline]
    pub fn topology(&self) -> Topology {
        self.kind.topology()
    }

    /// Points in insertion order.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn vertex(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    /// Points that make up the outline loop.
    ///
    /// For a triangle fan this skips the centre.
    pub fn ring(&self) -> &[Point] {
        match self.kind {
            ShapeKind::TriangleFan => &self.points[1..],
            _ => &self.points,
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    /// Negative and NaN widths become 0.
    pub fn set_line_width(&mut self, line_width: f64) {
        // f64::max ignores a NaN operand
        self.line_width = line_width.max(0.0);
    }

    pub fn set_vertex(&mut self, index: usize, point: Point) -> Result<()> {
        let len = self.points.len();
        let slot = self
            .points
            .get_mut(index)
            .ok_or(Error::VertexOutOfRange { index, len })?;
        *slot = point;
        Ok(())
    }

    /// Append a point. Fails for kinds with a fixed point count.
    pub fn push(&mut self, point: Point) -> Result<()> {
        if let Arity::Exactly(_) = self.kind.arity() {
            return Err(Error::FixedArity { kind: self.kind });
        }
        self.points.push(point);
        Ok(())
    }

    /// Replace every point, checking the new count first.
    pub fn replace_points<I: IntoIterator<Item = Point>>(&mut self, points: I) -> Result<()> {
        let points: Vec<Point> = points.into_iter().collect();
        self.kind.arity().check(self.kind, points.len())?;
        self.points = points;
        Ok(())
    }

    /// Replace every point with a list the caller built for this kind.
    pub(crate) fn replace_points_unchecked(&mut self, points: Vec<Point>) {
        debug_assert!(self.kind.arity().check(self.kind, points.len()).is_ok());
        self.points = points;
    }

    /// The outline as edges.
    ///
    /// Point-tier shapes have no edges. Hollow and solid shapes close the
    /// loop from the last point back to the first.
    pub fn sides(&self) -> Vec<Segment> {
        let shape_type = self.shape_type();
        if shape_type <= ShapeType::PointSet {
            return Vec::new();
        }

        let ring = self.ring();
        let mut sides: Vec<Segment> = ring
            .windows(2)
            .map(|pair| Segment::new(pair[0], pair[1]))
            .collect();

        if shape_type >= ShapeType::Hollow && ring.len() > 1 {
            sides.push(Segment::new(ring[ring.len() - 1], ring[0]));
        }
        sides
    }

    /// The segment for a `Line` shape.
    pub fn as_segment(&self) -> Option<Segment> {
        match (self.kind, self.points.as_slice()) {
            (ShapeKind::Line, [origin, destination]) => Some(Segment::new(*origin, *destination)),
            _ => None,
        }
    }
}

impl Bounded for PrimitiveShape {
    /// Min/max over every point, grown by the line width on all sides.
    fn bounds(&self) -> BoundingBox {
        let (position, extent) = match self.points.split_first() {
            Some((first, rest)) => rest
                .iter()
                .fold((*first, *first), |(lo, hi), p| (lo.min(*p), hi.max(*p))),
            None => (Point::ZERO, Point::ZERO),
        };
        BoundingBox::new(position, extent).expand(self.line_width)
    }
}

impl Drawable for PrimitiveShape {
    fn draw(&self, context: &mut dyn RenderContext) {
        if !context.focus() {
            trace!(kind = %self.kind, "context not focused, skipping draw");
            return;
        }
        context.draw_primitive(self.topology(), &self.points, self.color, self.line_width);
    }
}

// ============================================================================
// TESTS
// ============================================================================
