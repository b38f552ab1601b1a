//! Library error type.
//!
//! Construction and mutation of shapes are the only fallible geometry
//! operations. Queries never fail: degenerate input gives degenerate
//! answers instead.

use thiserror::Error;

use crate::shape::ShapeKind;

#[derive(Debug, Error)]
pub enum Error {
    #[error("not enough points to build a {kind}: need at least {required}, got {actual}")]
    NotEnoughPoints {
        kind: ShapeKind,
        required: usize,
        actual: usize,
    },

    #[error("a {kind} takes exactly {expected} points, got {actual}")]
    WrongPointCount {
        kind: ShapeKind,
        expected: usize,
        actual: usize,
    },

    #[error("vertex index {index} is out of range for a shape with {len} points")]
    VertexOutOfRange { index: usize, len: usize },

    #[error("cannot add points to a {kind}: it has a fixed number of points")]
    FixedArity { kind: ShapeKind },

    #[error("raster error: {0}")]
    Raster(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
