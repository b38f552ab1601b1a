//! Software render context on a tiny-skia pixmap.
//!
//! Stands in for a window's GL context: it has a focus flag, a texture
//! pool and a framebuffer, and it can be saved to PNG. The CLI renders
//! scenes through it and the tests use it to observe drawing.

use std::collections::HashMap;
use std::path::Path;

use image::RgbaImage;
use tiny_skia::{
    ColorU8, FillRule, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};
use tracing::{debug, trace};

use crate::error::Result;
use crate::geometry::{Color, Point};
use crate::render::{RenderContext, Texture, TextureId, TexturePool};
use crate::shape::Topology;

/// A [`RenderContext`] that rasterises into memory.
pub struct PixmapContext {
    pixmap: Pixmap,
    focused: bool,
    pool: TexturePool,
    textures: HashMap<TextureId, Pixmap>,
}

impl PixmapContext {
    /// A focused, transparent context. `None` if either side is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(Self {
            pixmap: Pixmap::new(width, height)?,
            focused: true,
            pool: TexturePool::new(),
            textures: HashMap::new(),
        })
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Fill the whole framebuffer with one colour.
    pub fn clear(&mut self, color: Color) {
        let [r, g, b, a] = color.to_rgba8();
        self.pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
    }

    #[inline]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Number of uploaded textures still owned by someone.
    pub fn uploaded_textures(&self) -> usize {
        self.textures.keys().filter(|id| self.pool.is_live(**id)).count()
    }

    /// Un-premultiplied copy of the framebuffer.
    pub fn to_image(&self) -> RgbaImage {
        let mut out = RgbaImage::new(self.pixmap.width(), self.pixmap.height());
        for (dst, src) in out.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
        }
        out
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_image().save(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "framebuffer saved");
        Ok(())
    }

    /// Forget cached pixmaps whose texture was dropped.
    fn prune(&mut self) {
        let pool = &self.pool;
        self.textures.retain(|id, _| pool.is_live(*id));
    }
}

fn paint_for(color: Color) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

/// One path holding every chunk as a subpath.
fn build_path<'a, I>(chunks: I, close: bool) -> Option<tiny_skia::Path>
where
    I: IntoIterator<Item = &'a [Point]>,
{
    let mut pb = PathBuilder::new();
    for chunk in chunks {
        let Some((first, rest)) = chunk.split_first() else {
            continue;
        };
        pb.move_to(first.x as f32, first.y as f32);
        for p in rest {
            pb.line_to(p.x as f32, p.y as f32);
        }
        if close {
            pb.close();
        }
    }
    pb.finish()
}

impl RenderContext for PixmapContext {
    fn focus(&self) -> bool {
        self.focused
    }

    fn size(&self) -> Point {
        Point::new(self.pixmap.width() as f64, self.pixmap.height() as f64)
    }

    fn textures(&self) -> &TexturePool {
        &self.pool
    }

    fn draw_primitive(
        &mut self,
        topology: Topology,
        points: &[Point],
        color: Color,
        line_width: f64,
    ) {
        let paint = paint_for(color);
        let stroke = Stroke {
            width: line_width as f32,
            ..Stroke::default()
        };
        let identity = Transform::identity();

        match topology {
            Topology::Points => {
                let side = line_width.max(1.0);
                for p in points {
                    let rect = Rect::from_xywh(
                        (p.x - side / 2.0) as f32,
                        (p.y - side / 2.0) as f32,
                        side as f32,
                        side as f32,
                    );
                    if let Some(rect) = rect {
                        self.pixmap.fill_rect(rect, &paint, identity, None);
                    }
                }
            }
            Topology::Lines | Topology::LineStrip | Topology::LineLoop => {
                let path = match topology {
                    Topology::Lines => build_path(points.chunks_exact(2), false),
                    Topology::LineStrip => build_path([points], false),
                    _ => build_path([points], true),
                };
                if let Some(path) = path {
                    self.pixmap.stroke_path(&path, &paint, &stroke, identity, None);
                }
            }
            Topology::Polygon | Topology::Triangles | Topology::Quads | Topology::TriangleFan => {
                let (path, rule) = match topology {
                    Topology::Polygon => (build_path([points], true), FillRule::EvenOdd),
                    Topology::Triangles => {
                        (build_path(points.chunks_exact(3), true), FillRule::Winding)
                    }
                    Topology::Quads => {
                        (build_path(points.chunks_exact(4), true), FillRule::Winding)
                    }
                    _ => {
                        let fan: Vec<[Point; 3]> = match points.split_first() {
                            Some((center, ring)) => ring
                                .windows(2)
                                .map(|w| [*center, w[0], w[1]])
                                .collect(),
                            None => Vec::new(),
                        };
                        (build_path(fan.iter().map(|t| t.as_slice()), true), FillRule::Winding)
                    }
                };
                if let Some(path) = path {
                    self.pixmap.fill_path(&path, &paint, rule, identity, None);
                }
            }
        }
        trace!(?topology, points = points.len(), "primitive drawn");
    }

    fn upload_texture(&mut self, texture: &Texture, raster: &RgbaImage) {
        self.prune();
        let Some(mut pixmap) = Pixmap::new(raster.width(), raster.height()) else {
            self.textures.remove(&texture.id());
            return;
        };
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(raster.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        debug!(
            index = texture.id().index,
            width = raster.width(),
            height = raster.height(),
            "texture uploaded"
        );
        self.textures.insert(texture.id(), pixmap);
    }

    fn draw_texture(&mut self, texture: &Texture, position: Point) {
        let Some(source) = self.textures.get(&texture.id()) else {
            trace!(index = texture.id().index, "texture never uploaded");
            return;
        };
        self.pixmap.draw_pixmap(
            position.x.floor() as i32,
            position.y.floor() as i32,
            source.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::SolidRectangle;
    use crate::raster::Image;
    use crate::render::Drawable;
    use crate::shape::PrimitiveShape;
    use image::Rgba;

    fn alpha_at(ctx: &PixmapContext, x: u32, y: u32) -> u8 {
        ctx.to_image().get_pixel(x, y).0[3]
    }

    #[test]
    fn zero_sized_context_is_rejected() {
        assert!(PixmapContext::new(0, 10).is_none());
    }

    #[test]
    fn solid_rectangle_fills() {
        let mut ctx = PixmapContext::new(20, 20).unwrap();
        SolidRectangle::new(Point::new(5.0, 5.0), Point::new(10.0, 10.0))
            .with_color(Color::RED)
            .draw(&mut ctx);
        let img = ctx.to_image();
        assert_eq!(img.get_pixel(10, 10).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(1, 1).0[3], 0);
    }

    #[test]
    fn unfocused_context_draws_nothing() {
        let mut ctx = PixmapContext::new(20, 20).unwrap();
        ctx.set_focus(false);
        PrimitiveShape::quadrilateral(
            Point::new(0.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(20.0, 20.0),
            Point::new(0.0, 20.0),
        )
        .draw(&mut ctx);
        assert_eq!(alpha_at(&ctx, 10, 10), 0);
    }

    #[test]
    fn line_loop_leaves_interior_empty() {
        let mut ctx = PixmapContext::new(30, 30).unwrap();
        PrimitiveShape::line_loop(vec![
            Point::new(5.0, 5.0),
            Point::new(25.0, 5.0),
            Point::new(25.0, 25.0),
            Point::new(5.0, 25.0),
        ])
        .unwrap()
        .with_line_width(2.0)
        .draw(&mut ctx);
        assert!(alpha_at(&ctx, 15, 5) > 0);
        assert_eq!(alpha_at(&ctx, 15, 15), 0);
    }

    #[test]
    fn triangle_fan_fills_its_triangles() {
        let mut ctx = PixmapContext::new(30, 30).unwrap();
        PrimitiveShape::triangle_fan(
            Point::new(15.0, 15.0),
            vec![Point::new(0.0, 0.0), Point::new(30.0, 0.0), Point::new(30.0, 30.0)],
        )
        .unwrap()
        .draw(&mut ctx);
        assert!(alpha_at(&ctx, 15, 5) > 0);
        assert_eq!(alpha_at(&ctx, 3, 27), 0);
    }

    #[test]
    fn image_draws_after_attach() {
        let mut ctx = PixmapContext::new(10, 10).unwrap();
        let raster = RgbaImage::from_pixel(2, 2, Rgba([0, 255, 0, 255]));
        let mut img = Image::new(raster).with_position(Point::new(4.0, 4.0));

        // Not attached yet: nothing to draw
        img.draw(&mut ctx);
        assert_eq!(alpha_at(&ctx, 4, 4), 0);

        img.attach(&ctx);
        img.draw(&mut ctx);
        assert_eq!(ctx.to_image().get_pixel(5, 5).0, [0, 255, 0, 255]);
        assert_eq!(ctx.uploaded_textures(), 1);

        drop(img);
        assert_eq!(ctx.uploaded_textures(), 0);
        assert_eq!(ctx.textures().live_count(), 0);
    }

    #[test]
    fn attach_without_focus_allocates_nothing() {
        let mut ctx = PixmapContext::new(10, 10).unwrap();
        ctx.set_focus(false);
        let mut img = Image::new(RgbaImage::new(2, 2));
        img.attach(&ctx);
        assert!(img.texture().is_none());
        assert_eq!(ctx.textures().live_count(), 0);
    }

    #[test]
    fn cloned_image_gets_its_own_texture() {
        let ctx = PixmapContext::new(10, 10).unwrap();
        let mut img = Image::new(RgbaImage::new(2, 2));
        img.attach(&ctx);
        let copy = img.clone();
        assert_ne!(img.texture().unwrap().id(), copy.texture().unwrap().id());
        assert_eq!(ctx.textures().live_count(), 2);
        drop(img);
        assert_eq!(ctx.textures().live_count(), 1);
    }
}
