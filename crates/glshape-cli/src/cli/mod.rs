//! CLI command implementations.
//!
//! This module contains the implementations for the CLI subcommands:
//! - `render` - Draw a scene with the software render context
//! - `collide` - Report every colliding pair in a scene
//! - `probe` - List the entities containing a point
//! - `bench` - Time all-pairs collision on random shapes
//! - `import` - Convert SVG paths into a scene file
//!
//! `scene` holds the scene file model shared by all of them.

pub mod scene;
pub mod render;
pub mod collide;
pub mod probe;
pub mod bench;
pub mod import;

pub use render::cmd_render;
pub use collide::cmd_collide;
pub use probe::cmd_probe;
pub use bench::cmd_bench;
pub use import::cmd_import;
