//! Scene files: declarative lists of shapes and sprites.
//!
//! Scenes are YAML (or JSON, picked by extension) files that place
//! shapes and image sprites on a canvas. Points can be written either as
//! `{x: 1, y: 2}` or as `[1, 2]`.
//!
//! ```yaml
//! width: 200
//! height: 150
//! shapes:
//!   - name: wall
//!     type: solid_rectangle
//!     position: [10, 10]
//!     size: [50, 20]
//!     color: {r: 1, g: 0, b: 0}
//! sprites:
//!   - name: logo
//!     path: logo.png
//!     position: [40, 20]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tiny_skia::Pixmap;
use tracing::debug;

use glshape::{
    Bounded, BoundingBox, Color, Drawable, HollowCircle, HollowRectangle, Image, Point,
    PrimitiveShape, Rectangle, Shape, ShapeKind, SolidCircle, SolidRectangle, DEFAULT_LINE_WIDTH,
};

/// A complete scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Canvas width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Canvas height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Canvas colour (default: white)
    #[serde(default = "default_background")]
    pub background: Color,

    #[serde(default)]
    pub shapes: Vec<ShapeEntry>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sprites: Vec<SpriteEntry>,
}

fn default_width() -> u32 {
    400
}

fn default_height() -> u32 {
    300
}

fn default_background() -> Color {
    Color::WHITE
}

fn default_line_width() -> f64 {
    DEFAULT_LINE_WIDTH
}

/// One shape with its styling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub spec: ShapeSpec,

    #[serde(default)]
    pub color: Color,

    #[serde(default = "default_line_width")]
    pub line_width: f64,
}

/// Geometry of a shape, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeSpec {
    Point { at: Point },
    PointSet { points: Vec<Point> },
    Line { from: Point, to: Point },
    LineStrip { points: Vec<Point> },
    LineLoop { points: Vec<Point> },
    Polygon { points: Vec<Point> },
    Triangle { points: [Point; 3] },
    Quadrilateral { points: [Point; 4] },
    TriangleFan { center: Point, points: Vec<Point> },
    HollowRectangle { position: Point, size: Point },
    SolidRectangle { position: Point, size: Point },
    HollowCircle {
        center: Point,
        radius: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        segments: Option<usize>,
    },
    SolidCircle {
        center: Point,
        radius: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        segments: Option<usize>,
    },
}

impl ShapeSpec {
    /// Describe an existing primitive.
    pub fn from_primitive(shape: &PrimitiveShape) -> Self {
        let points = shape.points().to_vec();
        match (shape.kind(), points.as_slice()) {
            (ShapeKind::Point, [at]) => ShapeSpec::Point { at: *at },
            (ShapeKind::Line, [from, to]) => ShapeSpec::Line { from: *from, to: *to },
            (ShapeKind::Triangle, [a, b, c]) => ShapeSpec::Triangle { points: [*a, *b, *c] },
            (ShapeKind::Quadrilateral, [a, b, c, d]) => {
                ShapeSpec::Quadrilateral { points: [*a, *b, *c, *d] }
            }
            (ShapeKind::TriangleFan, [center, ring @ ..]) => ShapeSpec::TriangleFan {
                center: *center,
                points: ring.to_vec(),
            },
            (ShapeKind::PointSet, _) => ShapeSpec::PointSet { points },
            (ShapeKind::LineStrip, _) => ShapeSpec::LineStrip { points },
            (ShapeKind::LineLoop, _) => ShapeSpec::LineLoop { points },
            _ => ShapeSpec::Polygon { points },
        }
    }

    fn build(&self) -> Result<BuiltShape> {
        let built = match self {
            ShapeSpec::Point { at } => BuiltShape::Primitive(PrimitiveShape::point(*at)),
            ShapeSpec::PointSet { points } => {
                BuiltShape::Primitive(PrimitiveShape::point_set(points.clone())?)
            }
            ShapeSpec::Line { from, to } => BuiltShape::Primitive(PrimitiveShape::line(*from, *to)),
            ShapeSpec::LineStrip { points } => {
                BuiltShape::Primitive(PrimitiveShape::line_strip(points.clone())?)
            }
            ShapeSpec::LineLoop { points } => {
                BuiltShape::Primitive(PrimitiveShape::line_loop(points.clone())?)
            }
            ShapeSpec::Polygon { points } => {
                BuiltShape::Primitive(PrimitiveShape::polygon(points.clone())?)
            }
            ShapeSpec::Triangle { points: [a, b, c] } => {
                BuiltShape::Primitive(PrimitiveShape::triangle(*a, *b, *c))
            }
            ShapeSpec::Quadrilateral { points: [a, b, c, d] } => {
                BuiltShape::Primitive(PrimitiveShape::quadrilateral(*a, *b, *c, *d))
            }
            ShapeSpec::TriangleFan { center, points } => {
                BuiltShape::Primitive(PrimitiveShape::triangle_fan(*center, points.clone())?)
            }
            ShapeSpec::HollowRectangle { position, size } => {
                BuiltShape::HollowRectangle(HollowRectangle::new(*position, *size))
            }
            ShapeSpec::SolidRectangle { position, size } => {
                BuiltShape::SolidRectangle(SolidRectangle::new(*position, *size))
            }
            ShapeSpec::HollowCircle { center, radius, segments } => {
                let mut circle = HollowCircle::new(*center, *radius);
                circle.set_segments(*segments);
                BuiltShape::HollowCircle(circle)
            }
            ShapeSpec::SolidCircle { center, radius, segments } => {
                let mut circle = SolidCircle::new(*center, *radius);
                circle.set_segments(*segments);
                BuiltShape::SolidCircle(circle)
            }
        };
        Ok(built)
    }
}

/// An image placed in the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// PNG/JPEG (decoded with `image`) or SVG (rasterised with resvg),
    /// relative to the scene file
    pub path: PathBuf,

    #[serde(default)]
    pub position: Point,

    /// Resample to this size (nearest neighbour)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Point>,

    /// Repaint every visible pixel with this colour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<Color>,
}

/// A constructed shape of any variety.
///
/// ## Rust Lesson #24: Enum Dispatch
///
/// Instead of a `Box<dyn ...>` combining two traits, a closed enum hands
/// out whichever trait object the caller needs.
#[derive(Debug, Clone)]
pub enum BuiltShape {
    Primitive(PrimitiveShape),
    HollowRectangle(HollowRectangle),
    SolidRectangle(SolidRectangle),
    HollowCircle(HollowCircle),
    SolidCircle(SolidCircle),
}

impl BuiltShape {
    pub fn as_shape(&self) -> &dyn Shape {
        match self {
            BuiltShape::Primitive(s) => s,
            BuiltShape::HollowRectangle(s) => s,
            BuiltShape::SolidRectangle(s) => s,
            BuiltShape::HollowCircle(s) => s,
            BuiltShape::SolidCircle(s) => s,
        }
    }

    pub fn as_drawable(&self) -> &dyn Drawable {
        match self {
            BuiltShape::Primitive(s) => s,
            BuiltShape::HollowRectangle(s) => s,
            BuiltShape::SolidRectangle(s) => s,
            BuiltShape::HollowCircle(s) => s,
            BuiltShape::SolidCircle(s) => s,
        }
    }

    fn style(&mut self, color: Color, line_width: f64) {
        match self {
            BuiltShape::Primitive(s) => {
                s.set_color(color);
                s.set_line_width(line_width);
            }
            BuiltShape::HollowRectangle(s) => {
                s.set_color(color);
                s.set_line_width(line_width);
            }
            BuiltShape::SolidRectangle(s) => {
                s.set_color(color);
                s.set_line_width(line_width);
            }
            BuiltShape::HollowCircle(s) => {
                s.set_color(color);
                s.set_line_width(line_width);
            }
            BuiltShape::SolidCircle(s) => {
                s.set_color(color);
                s.set_line_width(line_width);
            }
        }
    }
}

/// What an entity is.
#[derive(Debug, Clone)]
pub enum Body {
    Shape(BuiltShape),
    Sprite(Image),
}

/// A named, constructed scene member.
#[derive(Debug, Clone)]
pub struct Entity {
    pub name: String,
    pub body: Body,
}

impl Entity {
    pub fn bounds(&self) -> BoundingBox {
        match &self.body {
            Body::Shape(shape) => shape.as_shape().bounds(),
            Body::Sprite(image) => image.bounds(),
        }
    }

    pub fn kind_label(&self) -> String {
        match &self.body {
            Body::Shape(BuiltShape::Primitive(p)) => p.kind().name().to_string(),
            Body::Shape(BuiltShape::HollowRectangle(_)) => "hollow_rectangle".to_string(),
            Body::Shape(BuiltShape::SolidRectangle(_)) => "solid_rectangle".to_string(),
            Body::Shape(BuiltShape::HollowCircle(_)) => "hollow_circle".to_string(),
            Body::Shape(BuiltShape::SolidCircle(_)) => "solid_circle".to_string(),
            Body::Sprite(_) => "sprite".to_string(),
        }
    }

    /// Whether the window point is in this entity's content.
    pub fn contains(&self, point: Point, alpha_threshold: u8) -> bool {
        match &self.body {
            Body::Shape(shape) => shape.as_shape().point_within_content(point),
            Body::Sprite(image) => image.point_visible(point, alpha_threshold),
        }
    }

    /// Content collision between any two entities.
    ///
    /// Shape pairs use overlap, so a shape nested inside a solid counts.
    pub fn collides(&self, other: &Entity, alpha_threshold: u8) -> bool {
        match (&self.body, &other.body) {
            (Body::Shape(a), Body::Shape(b)) => a.as_shape().content_overlaps(b.as_shape()),
            (Body::Shape(a), Body::Sprite(b)) => {
                a.as_shape().content_collides_image(b, alpha_threshold)
            }
            (Body::Sprite(a), Body::Shape(b)) => {
                a.content_collides_shape(b.as_shape(), alpha_threshold)
            }
            (Body::Sprite(a), Body::Sprite(b)) => a.content_collides_image(b, alpha_threshold),
        }
    }
}

impl Scene {
    /// Load a scene; `.json` files are JSON, anything else YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file {}", path.display()))?;

        let is_json = path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let scene = if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse scene JSON {}", path.display()))?
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse scene YAML {}", path.display()))?
        };
        Ok(scene)
    }

    /// Construct every shape and load every sprite. Sprite paths are
    /// resolved against `base_dir`.
    pub fn build(&self, base_dir: &Path) -> Result<Vec<Entity>> {
        let mut entities = Vec::with_capacity(self.shapes.len() + self.sprites.len());

        for (i, entry) in self.shapes.iter().enumerate() {
            let name = entry.name.clone().unwrap_or_else(|| format!("shape{}", i));
            let mut shape = entry
                .spec
                .build()
                .with_context(|| format!("Invalid shape '{}'", name))?;
            shape.style(entry.color, entry.line_width);
            entities.push(Entity { name, body: Body::Shape(shape) });
        }

        for (i, entry) in self.sprites.iter().enumerate() {
            let name = entry.name.clone().unwrap_or_else(|| format!("sprite{}", i));
            let mut image = load_sprite(&base_dir.join(&entry.path))
                .with_context(|| format!("Failed to load sprite '{}'", name))?
                .with_position(entry.position);
            if let Some(size) = entry.size {
                image.set_size(size);
            }
            if let Some(color) = entry.overlay {
                image.overlay(color, glshape::DEFAULT_ALPHA_THRESHOLD);
            }
            entities.push(Entity { name, body: Body::Sprite(image) });
        }

        debug!(count = entities.len(), "scene built");
        Ok(entities)
    }
}

/// Directory scene-relative paths resolve against.
pub fn scene_dir(scene_path: &Path) -> PathBuf {
    scene_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Decode a bitmap, or rasterise an SVG at its natural size.
pub fn load_sprite(path: &Path) -> Result<Image> {
    let is_svg = path.extension().is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if !is_svg {
        return Ok(Image::open(path)?);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(&content, &options).context("Failed to parse SVG sprite")?;

    let size = tree.size();
    let width = size.width().ceil() as u32;
    let height = size.height().ceil() as u32;
    let Some(mut pixmap) = Pixmap::new(width, height) else {
        bail!("SVG sprite {} has zero size", path.display());
    };
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    let mut raster = RgbaImage::new(width, height);
    for (dst, src) in raster.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
    }
    Ok(Image::new(raster))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"
width: 100
height: 80
shapes:
  - name: left
    type: solid_rectangle
    position: [0, 0]
    size: [10, 10]
    color: {r: 1, g: 0, b: 0}
  - name: right
    type: solid_rectangle
    position: {x: 5, y: 5}
    size: [10, 10]
  - type: polygon
    points: [[50, 50], [60, 50], [55, 60]]
    line_width: 0
  - type: solid_circle
    center: [30, 30]
    radius: 5
    segments: 12
"#;

    #[test]
    fn parse_yaml_scene() {
        let scene: Scene = serde_yaml::from_str(SCENE).unwrap();
        assert_eq!(scene.width, 100);
        assert_eq!(scene.background, Color::WHITE);
        assert_eq!(scene.shapes.len(), 4);
        assert_eq!(scene.shapes[0].color, Color::RED);
        assert_eq!(scene.shapes[1].line_width, DEFAULT_LINE_WIDTH);
        assert!(matches!(scene.shapes[3].spec, ShapeSpec::SolidCircle { segments: Some(12), .. }));
    }

    #[test]
    fn build_names_and_styles() {
        let scene: Scene = serde_yaml::from_str(SCENE).unwrap();
        let entities = scene.build(Path::new(".")).unwrap();
        assert_eq!(entities[0].name, "left");
        assert_eq!(entities[2].name, "shape2");
        assert_eq!(entities[3].kind_label(), "solid_circle");
        assert!(entities[0].collides(&entities[1], 0));
        assert!(!entities[0].collides(&entities[2], 0));
        assert!(entities[3].contains(Point::new(30.0, 30.0), 0));
    }

    #[test]
    fn invalid_shape_is_reported() {
        let scene: Scene =
            serde_yaml::from_str("shapes:\n  - type: polygon\n    points: []\n").unwrap();
        let err = scene.build(Path::new(".")).unwrap_err();
        assert!(format!("{:#}", err).contains("not enough points"));
    }

    #[test]
    fn primitive_round_trips_through_shape_spec() {
        let fan = PrimitiveShape::triangle_fan(
            Point::ZERO,
            vec![Point::new(1.0, 0.0), Point::new(0.0, 1.0)],
        )
        .unwrap();
        let spec = ShapeSpec::from_primitive(&fan);
        let BuiltShape::Primitive(rebuilt) = spec.build().unwrap() else {
            panic!("expected a primitive");
        };
        assert_eq!(rebuilt.points(), fan.points());
        assert_eq!(rebuilt.kind(), ShapeKind::TriangleFan);
    }
}
