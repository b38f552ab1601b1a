//! SVG import: turn the paths of an SVG document into primitive shapes.
//!
//! Uses usvg for complete SVG resolution (CSS, transforms, basic shapes
//! converted to paths), then walks the tree and emits one shape per
//! subpath.
//!
//! ## Curve Flattening
//!
//! SVG paths contain Bézier curves (cubic and quadratic). Shapes only
//! hold straight edges, so curves are flattened into line segments with
//! lyon_geom at a fixed tolerance.

use lyon_geom::{point, CubicBezierSegment, QuadraticBezierSegment};
use thiserror::Error;
use tracing::debug;
use usvg::tiny_skia_path::PathSegment;

use crate::geometry::{Color, Point};
use crate::shape::{PrimitiveShape, ShapeKind};

/// Error type for SVG import.
///
/// ## Rust Lesson #20: Error Handling
///
/// `thiserror` writes the `Display` and `std::error::Error` impls from
/// the `#[error(...)]` attributes, so each variant documents its own
/// message right where it is declared.
#[derive(Debug, Error)]
pub enum SvgError {
    #[error("SVG parse error: {0}")]
    Parse(String),
    #[error("no shapes found in SVG")]
    NoShapes,
}

/// Tolerance for curve flattening.
/// Lower = more points, smoother curves, slower.
const CURVE_TOLERANCE: f32 = 0.1;

/// Extract every path of an SVG document as a shape.
///
/// Closed filled subpaths become polygons, closed unfilled ones line
/// loops, open ones line strips. A subpath that collapses to a single
/// point becomes a point.
pub fn extract_shapes_from_svg(svg_content: &str) -> Result<Vec<PrimitiveShape>, SvgError> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg_content, &options)
        .map_err(|e| SvgError::Parse(e.to_string()))?;

    let mut shapes = Vec::new();
    extract_from_group(tree.root(), &mut shapes);
    debug!(count = shapes.len(), "shapes extracted from SVG");

    if shapes.is_empty() {
        Err(SvgError::NoShapes)
    } else {
        Ok(shapes)
    }
}

fn extract_from_group(group: &usvg::Group, shapes: &mut Vec<PrimitiveShape>) {
    for child in group.children() {
        match child {
            usvg::Node::Group(group) => extract_from_group(group, shapes),
            usvg::Node::Path(path) => shapes.extend(path_to_shapes(path)),
            // Text is already converted to paths by usvg; images are skipped
            _ => {}
        }
    }
}

/// Colour of a paint, if it is a plain colour.
fn paint_color(paint: &usvg::Paint, opacity: f32) -> Option<Color> {
    match paint {
        usvg::Paint::Color(c) => {
            let alpha = (opacity * 255.0).round() as u8;
            Some(Color::from_rgba8([c.red, c.green, c.blue, alpha]))
        }
        _ => None,
    }
}

/// A subpath under construction.
#[derive(Default)]
struct Subpath {
    points: Vec<Point>,
    closed: bool,
}

impl Subpath {
    fn into_shape(mut self, filled: bool) -> Option<PrimitiveShape> {
        self.points.dedup_by(|a, b| (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6);
        if self.closed && self.points.len() > 1 && self.points.first() == self.points.last() {
            self.points.pop();
        }

        let kind = match (self.points.len(), self.closed, filled) {
            (0, _, _) => return None,
            (1, _, _) => ShapeKind::Point,
            (_, true, true) => ShapeKind::Polygon,
            (_, true, false) => ShapeKind::LineLoop,
            (_, false, _) => ShapeKind::LineStrip,
        };
        PrimitiveShape::new(kind, self.points).ok()
    }
}

fn path_to_shapes(path: &usvg::Path) -> Vec<PrimitiveShape> {
    if !path.is_visible() {
        return Vec::new();
    }
    let Some(data) = path.data().clone().transform(path.abs_transform()) else {
        return Vec::new();
    };

    let filled = path.fill().is_some();
    let color = path
        .fill()
        .and_then(|f| paint_color(f.paint(), f.opacity().get()))
        .or_else(|| path.stroke().and_then(|s| paint_color(s.paint(), s.opacity().get())))
        .unwrap_or_default();
    let line_width = path.stroke().map_or(0.0, |s| s.width().get() as f64);

    let mut subpaths = Vec::new();
    let mut current = Subpath::default();
    let mut last: Option<(f32, f32)> = None;

    for segment in data.segments() {
        match segment {
            PathSegment::MoveTo(p) => {
                subpaths.push(std::mem::take(&mut current));
                current.points.push(Point::new(p.x as f64, p.y as f64));
                last = Some((p.x, p.y));
            }
            PathSegment::LineTo(p) => {
                current.points.push(Point::new(p.x as f64, p.y as f64));
                last = Some((p.x, p.y));
            }
            PathSegment::QuadTo(ctrl, p) => {
                if let Some((lx, ly)) = last {
                    let curve = QuadraticBezierSegment {
                        from: point(lx, ly),
                        ctrl: point(ctrl.x, ctrl.y),
                        to: point(p.x, p.y),
                    };
                    curve.for_each_flattened(CURVE_TOLERANCE, &mut |line| {
                        current.points.push(Point::new(line.to.x as f64, line.to.y as f64));
                    });
                } else {
                    current.points.push(Point::new(p.x as f64, p.y as f64));
                }
                last = Some((p.x, p.y));
            }
            PathSegment::CubicTo(ctrl1, ctrl2, p) => {
                if let Some((lx, ly)) = last {
                    let curve = CubicBezierSegment {
                        from: point(lx, ly),
                        ctrl1: point(ctrl1.x, ctrl1.y),
                        ctrl2: point(ctrl2.x, ctrl2.y),
                        to: point(p.x, p.y),
                    };
                    curve.for_each_flattened(CURVE_TOLERANCE, &mut |line| {
                        current.points.push(Point::new(line.to.x as f64, line.to.y as f64));
                    });
                } else {
                    current.points.push(Point::new(p.x as f64, p.y as f64));
                }
                last = Some((p.x, p.y));
            }
            PathSegment::Close => current.closed = true,
        }
    }
    subpaths.push(current);

    subpaths
        .into_iter()
        .filter_map(|sub| sub.into_shape(filled))
        .map(|shape| shape.with_color(color).with_line_width(line_width))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
