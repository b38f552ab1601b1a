//! Straight-line algebra: `y = mx + c`, with `x = k` for vertical lines.
//!
//! Shapes never store equations. An equation is rebuilt from a side's two
//! endpoints whenever a query needs one, so it always matches the points.
//!
//! All classification is exact: a gradient of `0.0` is horizontal and an
//! infinite gradient is vertical. There is no epsilon anywhere here.

use crate::geometry::Point;

/// Result of intersecting two lines.
///
/// ## Rust Lesson #10: Enums (Sum Types)
///
/// Rust enums can carry data, so "no intersection" and "intersects here"
/// are two variants of one type instead of a sentinel `(NaN, NaN)` point.
/// The compiler makes every caller handle both cases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intersection {
    /// Parallel, identical, or outside the bounds.
    None,
    /// The lines cross at this point.
    At(Point),
}

impl Intersection {
    #[inline]
    pub fn point(&self) -> Option<Point> {
        match self {
            Intersection::None => None,
            Intersection::At(p) => Some(*p),
        }
    }

    #[inline]
    pub fn is_some(&self) -> bool {
        matches!(self, Intersection::At(_))
    }
}

/// A straight line in gradient/intercept form.
///
/// For vertical lines the gradient is `+∞` and `y_intercept` holds the
/// x-intercept instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearEquation {
    pub gradient: f64,
    pub y_intercept: f64,
}

impl LinearEquation {
    #[inline]
    pub const fn new(gradient: f64, y_intercept: f64) -> Self {
        Self { gradient, y_intercept }
    }

    /// The vertical line `x = x`.
    #[inline]
    pub const fn vertical(x: f64) -> Self {
        Self { gradient: f64::INFINITY, y_intercept: x }
    }

    /// The unique line through two points.
    ///
    /// Points with exactly equal X produce a vertical line. Two identical
    /// points therefore give a vertical line through them.
    pub fn regression(p1: Point, p2: Point) -> Self {
        let dx = p2.x - p1.x;
        if dx == 0.0 {
            return Self::vertical(p1.x);
        }
        let gradient = (p2.y - p1.y) / dx;
        Self::new(gradient, p1.y - gradient * p1.x)
    }

    #[inline]
    pub fn is_horizontal(&self) -> bool {
        self.gradient == 0.0
    }

    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.gradient.is_infinite()
    }

    /// X where the line crosses `y = 0`. NaN for horizontal lines.
    pub fn x_intercept(&self) -> f64 {
        if self.is_horizontal() {
            f64::NAN
        } else if self.is_vertical() {
            self.y_intercept
        } else {
            -self.y_intercept / self.gradient
        }
    }

    /// Y at the given X.
    ///
    /// A vertical line has no single Y: the result is `+∞` exactly on the
    /// line and NaN anywhere else.
    pub fn get_y(&self, x: f64) -> f64 {
        if self.is_vertical() {
            if x == self.x_intercept() { f64::INFINITY } else { f64::NAN }
        } else {
            self.gradient * x + self.y_intercept
        }
    }

    /// The line perpendicular to this one that passes through `through`.
    pub fn perpendicular_through(&self, through: Point) -> Self {
        if self.is_vertical() {
            Self::new(0.0, through.y)
        } else if self.is_horizontal() {
            Self::vertical(through.x)
        } else {
            let gradient = -1.0 / self.gradient;
            Self::new(gradient, through.y - gradient * through.x)
        }
    }

    /// Intersection of two unbounded lines.
    pub fn intersect(&self, other: &LinearEquation) -> Intersection {
        self.intersect_within(
            other,
            Point::splat(f64::NEG_INFINITY),
            Point::splat(f64::INFINITY),
        )
    }

    /// Intersection of two lines, kept only if it lies inside the
    /// axis-aligned box spanned by `bound1` and `bound2` (inclusive).
    ///
    /// Parallel lines, including two vertical lines and identical lines,
    /// have no single crossing point and return [`Intersection::None`].
    pub fn intersect_within(
        &self,
        other: &LinearEquation,
        bound1: Point,
        bound2: Point,
    ) -> Intersection {
        let candidate = if self.is_vertical() {
            if other.is_vertical() {
                return Intersection::None;
            }
            let x = self.x_intercept();
            Point::new(x, other.get_y(x))
        } else if other.is_vertical() {
            let x = other.x_intercept();
            Point::new(x, self.get_y(x))
        } else {
            let x = (other.y_intercept - self.y_intercept) / (self.gradient - other.gradient);
            // A horizontal line's Y is exact; the other gradient would round it.
            let y = if other.is_horizontal() { other.y_intercept } else { self.get_y(x) };
            Point::new(x, y)
        };

        // Equal gradients divide by zero above and land here as ±∞ or NaN.
        if !(candidate.x.is_finite() && candidate.y.is_finite()) {
            return Intersection::None;
        }

        let lower = bound1.min(bound2);
        let upper = bound1.max(bound2);
        let inside = candidate.x >= lower.x
            && candidate.x <= upper.x
            && candidate.y >= lower.y
            && candidate.y <= upper.y;

        if inside { Intersection::At(candidate) } else { Intersection::None }
    }

    /// Whether `point` is on this line, allowing `thickness` units of
    /// perpendicular distance.
    pub fn point_on_line(&self, point: Point, thickness: f64) -> bool {
        let exact = if self.is_vertical() {
            point.x == self.x_intercept()
        } else {
            self.get_y(point.x) == point.y
        };
        if exact {
            return true;
        }
        if thickness > 0.0 {
            let perpendicular = self.perpendicular_through(point);
            if let Intersection::At(foot) = self.intersect(&perpendicular) {
                return foot.distance(point) <= thickness;
            }
        }
        false
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn regression_passes_through_both_points() {
        let pairs = [
            (Point::new(0.0, 0.0), Point::new(10.0, 10.0)),
            (Point::new(-3.5, 2.0), Point::new(7.25, -9.0)),
            (Point::new(1.0, 5.0), Point::new(4.0, 5.0)),
        ];
        for (p1, p2) in pairs {
            let eqn = LinearEquation::regression(p1, p2);
            assert!(close(eqn.get_y(p1.x), p1.y), "{:?} at p1", eqn);
            assert!(close(eqn.get_y(p2.x), p2.y), "{:?} at p2", eqn);
        }
    }

    #[test]
    fn regression_vertical_line() {
        let eqn = LinearEquation::regression(Point::new(3.0, 0.0), Point::new(3.0, 5.0));
        assert!(eqn.is_vertical());
        assert!(!eqn.is_horizontal());
        assert_eq!(eqn.x_intercept(), 3.0);
    }

    #[test]
    fn horizontal_and_vertical_are_exclusive() {
        let flat = LinearEquation::regression(Point::new(0.0, 2.0), Point::new(5.0, 2.0));
        assert!(flat.is_horizontal());
        assert!(!flat.is_vertical());
        assert!(flat.x_intercept().is_nan());

        let sloped = LinearEquation::new(2.0, -4.0);
        assert!(!sloped.is_horizontal() && !sloped.is_vertical());
        assert_eq!(sloped.x_intercept(), 2.0);
    }

    #[test]
    fn vertical_get_y_is_infinite_on_line_and_nan_off_it() {
        let eqn = LinearEquation::vertical(3.0);
        assert_eq!(eqn.get_y(3.0), f64::INFINITY);
        assert!(eqn.get_y(3.0000001).is_nan());
    }

    #[test]
    fn crossing_diagonals_meet_in_the_middle() {
        let a = LinearEquation::regression(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let b = LinearEquation::regression(Point::new(0.0, 10.0), Point::new(10.0, 0.0));
        let p = a.intersect(&b).point().unwrap();
        assert!(close(p.x, 5.0) && close(p.y, 5.0));
    }

    #[test]
    fn vertical_crossing() {
        let v = LinearEquation::vertical(4.0);
        let h = LinearEquation::new(0.0, 7.0);
        assert_eq!(v.intersect(&h), Intersection::At(Point::new(4.0, 7.0)));
        assert_eq!(h.intersect(&v), Intersection::At(Point::new(4.0, 7.0)));
    }

    #[test]
    fn parallel_lines_do_not_intersect() {
        let a = LinearEquation::new(1.0, 0.0);
        let b = LinearEquation::new(1.0, 5.0);
        assert_eq!(a.intersect(&b), Intersection::None);
        // Identical lines have no single crossing either
        assert_eq!(a.intersect(&a), Intersection::None);
        // Two verticals, even far apart, never report a crossing
        assert_eq!(
            LinearEquation::vertical(1.0).intersect(&LinearEquation::vertical(9.0)),
            Intersection::None
        );
    }

    #[test]
    fn bounds_reject_crossings_outside_the_box() {
        let a = LinearEquation::regression(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let b = LinearEquation::regression(Point::new(0.0, 10.0), Point::new(10.0, 0.0));
        let hit = a.intersect_within(&b, Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        assert!(hit.is_some());
        let miss = a.intersect_within(&b, Point::new(6.0, 6.0), Point::new(10.0, 10.0));
        assert_eq!(miss, Intersection::None);
    }

    #[test]
    fn bounds_use_both_y_coordinates() {
        // An earlier clamp built the Y range from bound1.y twice, which
        // collapsed it to a single value and rejected this crossing.
        let a = LinearEquation::regression(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let b = LinearEquation::regression(Point::new(0.0, 10.0), Point::new(10.0, 0.0));
        let hit = a.intersect_within(&b, Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        assert_eq!(hit.point().map(|p| (p.x.round(), p.y.round())), Some((5.0, 5.0)));

        // Bounds given in reverse order describe the same box
        let reversed = a.intersect_within(&b, Point::new(10.0, 10.0), Point::new(0.0, 0.0));
        assert_eq!(hit, reversed);
    }

    #[test]
    fn perpendicular_lines() {
        let sloped = LinearEquation::new(2.0, 1.0);
        let perp = sloped.perpendicular_through(Point::new(2.0, 5.0));
        assert!(close(perp.gradient, -0.5));
        assert!(close(perp.get_y(2.0), 5.0));

        let v = LinearEquation::vertical(1.0).perpendicular_through(Point::new(8.0, 3.0));
        assert!(v.is_horizontal());
        assert_eq!(v.y_intercept, 3.0);

        let h = LinearEquation::new(0.0, 1.0).perpendicular_through(Point::new(8.0, 3.0));
        assert!(h.is_vertical());
        assert_eq!(h.x_intercept(), 8.0);
    }

    #[test]
    fn point_on_line_exact_and_with_thickness() {
        let eqn = LinearEquation::new(1.0, 0.0);
        assert!(eqn.point_on_line(Point::new(4.0, 4.0), 0.0));
        assert!(!eqn.point_on_line(Point::new(4.0, 5.0), 0.0));
        // (4,5) is 1/sqrt(2) ≈ 0.707 away from y = x
        assert!(eqn.point_on_line(Point::new(4.0, 5.0), 0.75));
        assert!(!eqn.point_on_line(Point::new(4.0, 5.0), 0.7));
    }

    #[test]
    fn point_on_vertical_line() {
        let eqn = LinearEquation::vertical(2.0);
        assert!(eqn.point_on_line(Point::new(2.0, 100.0), 0.0));
        assert!(!eqn.point_on_line(Point::new(3.0, 1.0), 0.0));
        assert!(eqn.point_on_line(Point::new(3.0, 1.0), 1.0));
        assert!(!eqn.point_on_line(Point::new(3.5, 1.0), 1.0));
    }

    #[test]
    fn point_on_horizontal_line_with_thickness() {
        let eqn = LinearEquation::new(0.0, 2.0);
        assert!(eqn.point_on_line(Point::new(-50.0, 2.5), 0.5));
        assert!(!eqn.point_on_line(Point::new(-50.0, 2.6), 0.5));
    }
}
