//! # glshape
//!
//! 2D shape primitives, collision detection and raster collision surfaces.
//!
//! ## Rust Lesson #7: Modules
//!
//! Rust modules are like ES6 modules but more explicit:
//! - `mod foo;` = load from `foo.rs` or `foo/mod.rs`
//! - `pub mod foo;` = also export it publicly
//! - `pub use foo::Bar;` = re-export Bar at this level
//!
//! Unlike Node.js, you must explicitly declare every module.

pub mod algebra;
pub mod bounds;
pub mod collide;
pub mod composite;
pub mod error;
pub mod geometry;
pub mod pixmap;
pub mod raster;
pub mod region;
pub mod render;
pub mod shape;
pub mod svg;

// Re-export common types at crate root for convenience.
pub use algebra::{Intersection, LinearEquation};
pub use bounds::{rect_eq, Bounded, BoundingBox, Rectangle};
pub use collide::Shape;
pub use composite::{HollowCircle, HollowRectangle, SolidCircle, SolidRectangle};
pub use error::{Error, Result};
pub use geometry::{circle_points, circle_points_auto, Color, Point, MAX_AUTO_SEGMENTS};
pub use pixmap::PixmapContext;
pub use raster::{Image, DEFAULT_ALPHA_THRESHOLD};
pub use region::{ListenerId, RegionChange, ScreenRegion};
pub use render::{Drawable, RenderContext, Texture, TextureId, TexturePool};
pub use shape::{PrimitiveShape, Segment, ShapeKind, ShapeType, Topology, DEFAULT_LINE_WIDTH};
pub use svg::{extract_shapes_from_svg, SvgError};
