//! Core geometry types for glshape.
//!
//! ## Rust Lesson #3: Structs & Derives
//!
//! The `#[derive(...)]` macro auto-generates common functionality:
//! - `Debug` = lets you print with `{:?}`
//! - `Clone` + `Copy` = small stack values are duplicated implicitly
//! - `PartialEq` = can compare with `==`
//! - `Serialize` / `Deserialize` = serde can read and write it (scene files)

use std::f64::consts::TAU;
use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A 2D coordinate in window space (Y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates set to `v`.
    #[inline]
    pub const fn splat(v: f64) -> Self {
        Self { x: v, y: v }
    }

    /// Length of the vector from the origin to this point.
    #[inline]
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        (*self - other).length()
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(self, other: Point) -> Point {
        Point::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Point) -> Point {
        Point::new(self.x.max(other.x), self.y.max(other.y))
    }
}

// ## Rust Lesson #5: Operator Overloading
//
// Implementing `Add` lets us write `a + b` for our own types.
// Because Point is `Copy`, the operands are copied, not moved away.

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    #[inline]
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Point;

    #[inline]
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// An RGBA colour with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgba(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Color = Color::rgba(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Color = Color::rgba(0.0, 0.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self::rgba(
            rgba[0] as f32 / 255.0,
            rgba[1] as f32 / 255.0,
            rgba[2] as f32 / 255.0,
            rgba[3] as f32 / 255.0,
        )
    }

    /// Quantise to 8-bit channels, clamping out-of-range values.
    pub fn to_rgba8(&self) -> [u8; 4] {
        fn q(c: f32) -> u8 {
            (c.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Get `count` equally spaced points on a circle, starting at angle 0.
///
/// Zero points are returned for `count == 0`.
pub fn circle_points(center: Point, radius: f64, count: usize) -> Vec<Point> {
    if count == 0 {
        return Vec::new();
    }
    let step = TAU / count as f64;
    (0..count)
        .map(|i| {
            let angle = step * i as f64;
            Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect()
}

/// Upper limit on the points [`circle_points_auto`] generates.
pub const MAX_AUTO_SEGMENTS: usize = 1024;

/// Get points on a circle spaced roughly one unit of arc length apart.
///
/// Cheap tessellation: the angle advances by `1 / radius` per point, so
/// tiny circles collapse to a single point. Circles whose circumference
/// exceeds [`MAX_AUTO_SEGMENTS`] get exactly that many evenly spaced
/// points instead. A radius that is not a positive finite number yields
/// just the centre.
pub fn circle_points_auto(center: Point, radius: f64) -> Vec<Point> {
    if !(radius.is_finite() && radius > 0.0) {
        return vec![center];
    }
    let step = 1.0 / radius;
    let count = (TAU / step).ceil().max(1.0);
    if count > MAX_AUTO_SEGMENTS as f64 {
        return circle_points(center, radius, MAX_AUTO_SEGMENTS);
    }
    let mut points = Vec::with_capacity(count as usize);
    let mut angle = 0.0;
    while angle < TAU {
        points.push(Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin()));
        angle += step;
    }
    points
}

// ============================================================================
// TESTS
// ============================================================================
