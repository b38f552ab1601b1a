//! Positioned raster images as collision surfaces.
//!
//! An [`Image`] is an RGBA raster placed at a window position. Its
//! content is the set of pixels whose alpha is strictly above a
//! threshold, so a sprite with a transparent border only collides where
//! it is actually painted.

use std::cell::Cell;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use tracing::{debug, trace};

use crate::bounds::{Bounded, BoundingBox, Rectangle};
use crate::collide::Shape;
use crate::error::Result;
use crate::geometry::{Color, Point};
use crate::render::{Drawable, RenderContext, Texture};

/// Alpha at or below which a pixel counts as transparent.
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 0;

/// An RGBA raster at a window position, with an optional texture.
#[derive(Debug)]
pub struct Image {
    raster: RgbaImage,
    position: Point,
    texture: Option<Texture>,
    // pixels changed since the last upload
    dirty: Cell<bool>,
}

impl Image {
    pub fn new(raster: RgbaImage) -> Self {
        Self {
            raster,
            position: Point::ZERO,
            texture: None,
            dirty: Cell::new(true),
        }
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Decode a bitmap file (PNG, JPEG, ... as supported by `image`).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raster = image::open(path.as_ref())?.to_rgba8();
        debug!(
            path = %path.as_ref().display(),
            width = raster.width(),
            height = raster.height(),
            "image loaded"
        );
        Ok(Self::new(raster))
    }

    #[inline]
    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.raster.dimensions()
    }

    #[inline]
    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    /// Convert `(x, y)` to raster coordinates.
    ///
    /// With `absolute`, the coordinates are window space and the floored
    /// position is subtracted first.
    ///
    /// # Panics
    ///
    /// If the resulting pixel is outside the raster.
    fn local_pixel(&self, x: i64, y: i64, absolute: bool) -> (u32, u32) {
        let (x, y) = if absolute {
            (x - self.position.x.floor() as i64, y - self.position.y.floor() as i64)
        } else {
            (x, y)
        };
        let (width, height) = self.dimensions();
        assert!(
            (0..width as i64).contains(&x) && (0..height as i64).contains(&y),
            "pixel ({x}, {y}) is outside the {width}x{height} raster"
        );
        (x as u32, y as u32)
    }

    /// Colour of one pixel.
    ///
    /// # Panics
    ///
    /// If the pixel is outside the raster.
    pub fn pixel_color(&self, x: i64, y: i64, absolute: bool) -> Color {
        let (x, y) = self.local_pixel(x, y, absolute);
        Color::from_rgba8(self.raster.get_pixel(x, y).0)
    }

    /// Whether a pixel's alpha is strictly above `alpha_threshold`.
    ///
    /// # Panics
    ///
    /// If the pixel is outside the raster.
    pub fn pixel_is_visible(&self, x: i64, y: i64, alpha_threshold: u8, absolute: bool) -> bool {
        let (x, y) = self.local_pixel(x, y, absolute);
        self.raster.get_pixel(x, y).0[3] > alpha_threshold
    }

    /// Whether the window point lands on a visible pixel.
    ///
    /// Points on the far edge of the bounds pass the inclusive bounds
    /// test but map to no pixel, so they are rejected here.
    pub fn point_visible(&self, point: Point, alpha_threshold: u8) -> bool {
        if !self.bounds().point_within_bounds(point) {
            return false;
        }
        let local = point - self.position;
        let (x, y) = (local.x.floor() as i64, local.y.floor() as i64);
        let (width, height) = self.dimensions();
        if !((0..width as i64).contains(&x) && (0..height as i64).contains(&y)) {
            return false;
        }
        self.pixel_is_visible(x, y, alpha_threshold, false)
    }

    /// [`Image::point_visible`] at the default threshold.
    pub fn point_within_content(&self, point: Point) -> bool {
        self.point_visible(point, DEFAULT_ALPHA_THRESHOLD)
    }

    /// Whether any visible pixel of this image lands on a visible pixel
    /// of `other`.
    pub fn content_collides_image(&self, other: &Image, alpha_threshold: u8) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        if !self.bounds().bounds_collide(&other.bounds()) {
            return false;
        }
        let (width, height) = self.dimensions();
        for y in 0..height {
            for x in 0..width {
                if self.raster.get_pixel(x, y).0[3] <= alpha_threshold {
                    continue;
                }
                let p = self.position + Point::new(x as f64, y as f64);
                if other.point_visible(p, alpha_threshold) {
                    debug!(x, y, "visible pixels overlap");
                    return true;
                }
            }
        }
        false
    }

    /// Collision with a shape, answered by the shape.
    pub fn content_collides_shape(&self, shape: &dyn Shape, alpha_threshold: u8) -> bool {
        shape.content_collides_image(self, alpha_threshold)
    }

    pub fn content_collides_box(&self, other: &BoundingBox) -> bool {
        self.bounds().content_collides(other)
    }

    /// Repaint every visible pixel with `color`, alpha included.
    pub fn overlay(&mut self, color: Color, alpha_threshold: u8) {
        let replacement = Rgba(color.to_rgba8());
        for pixel in self.raster.pixels_mut() {
            if pixel.0[3] > alpha_threshold {
                *pixel = replacement;
            }
        }
        self.dirty.set(true);
    }

    /// Reserve a texture on the context. Does nothing without focus.
    ///
    /// Attaching again replaces (and releases) the previous texture.
    pub fn attach(&mut self, context: &dyn RenderContext) {
        if !context.focus() {
            trace!("context not focused, texture not allocated");
            return;
        }
        self.texture = Some(context.textures().allocate());
        self.dirty.set(true);
    }

    /// Release the texture, if any.
    pub fn detach(&mut self) {
        self.texture = None;
    }
}

impl Clone for Image {
    /// Copies the pixels. A texture is never shared: the copy gets its
    /// own slot from the same pool.
    fn clone(&self) -> Self {
        Self {
            raster: self.raster.clone(),
            position: self.position,
            texture: self.texture.as_ref().and_then(Texture::fresh),
            dirty: Cell::new(true),
        }
    }
}

impl Bounded for Image {
    fn bounds(&self) -> BoundingBox {
        BoundingBox::from_size(self.position, Rectangle::size(self))
    }
}

/// Moving keeps the raster. Resizing resamples it (nearest neighbour)
/// to the rounded size.
impl Rectangle for Image {
    fn position(&self) -> Point {
        self.position
    }

    fn size(&self) -> Point {
        let (width, height) = self.dimensions();
        Point::new(width as f64, height as f64)
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn set_size(&mut self, size: Point) {
        let width = size.x.max(0.0).round() as u32;
        let height = size.y.max(0.0).round() as u32;
        if (width, height) == self.dimensions() {
            return;
        }
        self.raster = if width == 0 || height == 0 {
            RgbaImage::new(width, height)
        } else {
            imageops::resize(&self.raster, width, height, FilterType::Nearest)
        };
        self.dirty.set(true);
    }
}

impl Drawable for Image {
    /// Upload if the pixels changed, then blit. Needs [`Image::attach`]
    /// first.
    fn draw(&self, context: &mut dyn RenderContext) {
        if !context.focus() {
            trace!("context not focused, skipping image draw");
            return;
        }
        let Some(texture) = &self.texture else {
            trace!("image has no texture, skipping draw");
            return;
        };
        if self.dirty.replace(false) {
            context.upload_texture(texture, &self.raster);
        }
        context.draw_texture(texture, self.position);
    }
}

// ============================================================================
// TESTS
// ============================================================================
