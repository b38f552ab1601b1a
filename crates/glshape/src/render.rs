//! The render-context contract and texture lifetime.
//!
//! Shapes draw in immediate mode: every `draw` call submits the whole
//! point list. Images are the only things holding context resources, and
//! they hold them through a [`Texture`] guard.
//!
//! ## Rust Lesson #17: RAII with Drop
//!
//! A `Texture` frees its pool slot in `Drop`, so a texture is released
//! exactly once, when its owner goes away. There is no `dispose()` to
//! forget and no way to release twice. Ids carry a generation, so an id
//! kept after its texture was dropped is detected as stale instead of
//! silently pointing at whoever reused the slot.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use image::RgbaImage;
use tracing::debug;

use crate::geometry::{Color, Point};
use crate::shape::Topology;

/// A drawing target: a window's GL context, or a software pixmap.
pub trait RenderContext {
    /// Whether this context is current. Work that touches the context is
    /// skipped silently when it is not.
    fn focus(&self) -> bool;

    /// Context dimensions in pixels.
    fn size(&self) -> Point;

    /// The arena this context's textures live in.
    fn textures(&self) -> &TexturePool;

    fn draw_primitive(
        &mut self,
        topology: Topology,
        points: &[Point],
        color: Color,
        line_width: f64,
    );

    /// Replace the texture's pixels.
    fn upload_texture(&mut self, texture: &Texture, raster: &RgbaImage);

    /// Blit the texture with its top-left corner at `position`.
    fn draw_texture(&mut self, texture: &Texture, position: Point);
}

/// Anything that can put itself on a render context.
pub trait Drawable {
    fn draw(&self, context: &mut dyn RenderContext);
}

/// A slot index plus the generation it was allocated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId {
    pub index: u32,
    pub generation: u32,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    live: bool,
}

#[derive(Debug, Default)]
struct PoolSlots {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl PoolSlots {
    fn allocate(&mut self) -> TextureId {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        slot.live = true;
        TextureId { index, generation: slot.generation }
    }

    fn release(&mut self, id: TextureId) {
        if let Some(slot) = self.slots.get_mut(id.index as usize) {
            if slot.live && slot.generation == id.generation {
                slot.live = false;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index);
            }
        }
    }

    fn is_live(&self, id: TextureId) -> bool {
        self.slots
            .get(id.index as usize)
            .is_some_and(|slot| slot.live && slot.generation == id.generation)
    }
}

/// Generational arena of texture slots.
///
/// Cloning the pool clones a handle to the same arena. The pool is
/// `Rc`-based and therefore stays on the thread that owns the context.
#[derive(Debug, Clone, Default)]
pub struct TexturePool {
    slots: Rc<RefCell<PoolSlots>>,
}

impl TexturePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a slot. The slot is released when the guard drops.
    pub fn allocate(&self) -> Texture {
        let id = self.slots.borrow_mut().allocate();
        debug!(index = id.index, generation = id.generation, "texture allocated");
        Texture {
            id,
            pool: Rc::downgrade(&self.slots),
        }
    }

    pub fn is_live(&self, id: TextureId) -> bool {
        self.slots.borrow().is_live(id)
    }

    pub fn live_count(&self) -> usize {
        self.slots.borrow().slots.iter().filter(|slot| slot.live).count()
    }
}

/// Owning handle to one texture slot.
///
/// Deliberately not `Clone`: a copy gets its own slot through
/// [`Texture::fresh`].
#[derive(Debug)]
pub struct Texture {
    id: TextureId,
    pool: Weak<RefCell<PoolSlots>>,
}

impl Texture {
    #[inline]
    pub fn id(&self) -> TextureId {
        self.id
    }

    /// A new texture from the same pool. `None` if the pool is gone.
    pub fn fresh(&self) -> Option<Texture> {
        let slots = self.pool.upgrade()?;
        let id = slots.borrow_mut().allocate();
        debug!(index = id.index, generation = id.generation, "texture allocated");
        Some(Texture {
            id,
            pool: Rc::downgrade(&slots),
        })
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        if let Some(slots) = self.pool.upgrade() {
            slots.borrow_mut().release(self.id);
            debug!(index = self.id.index, "texture released");
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_releases_slot() {
        let pool = TexturePool::new();
        let a = pool.allocate();
        let b = pool.allocate();
        assert_eq!(pool.live_count(), 2);
        assert_ne!(a.id(), b.id());

        let stale = a.id();
        drop(a);
        assert_eq!(pool.live_count(), 1);
        assert!(!pool.is_live(stale));
        assert!(pool.is_live(b.id()));
    }

    #[test]
    fn reused_slot_gets_new_generation() {
        let pool = TexturePool::new();
        let first = pool.allocate();
        let old = first.id();
        drop(first);

        let second = pool.allocate();
        assert_eq!(second.id().index, old.index);
        assert_ne!(second.id().generation, old.generation);
        assert!(!pool.is_live(old));
        assert!(pool.is_live(second.id()));
    }

    #[test]
    fn fresh_texture_is_independent() {
        let pool = TexturePool::new();
        let a = pool.allocate();
        let b = a.fresh().unwrap();
        assert_ne!(a.id(), b.id());
        drop(a);
        assert!(pool.is_live(b.id()));
        assert_eq!(pool.live_count(), 1);
    }

    #[test]
    fn texture_outliving_pool_is_harmless() {
        let pool = TexturePool::new();
        let tex = pool.allocate();
        drop(pool);
        assert!(tex.fresh().is_none());
        drop(tex);
    }
}
