//! Screen regions: rectangles of the window that notify listeners when
//! they move or resize.
//!
//! ## Rust Lesson #18: Boxed Closures as Observers
//!
//! Listeners are stored as `Box<dyn FnMut(&RegionChange)>`. Each one gets
//! a shared reference to a snapshot, never the region itself, so a
//! listener cannot modify the region while it is being notified. The
//! borrow checker enforces this: the region is mutably borrowed for the
//! whole dispatch.

use std::fmt;

use tracing::trace;

use crate::bounds::{Bounded, BoundingBox, Rectangle};
use crate::geometry::Point;
use crate::render::RenderContext;

/// Handle returned by [`ScreenRegion::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// What a region looked like before and after a change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionChange {
    pub previous_position: Point,
    pub previous_size: Point,
    pub position: Point,
    pub size: Point,
}

type Listener = Box<dyn FnMut(&RegionChange)>;

/// An area of the screen, optionally tracking a render context's size.
pub struct ScreenRegion {
    position: Point,
    size: Point,
    context_linked: bool,
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl ScreenRegion {
    pub fn new(position: Point, size: Point) -> Self {
        Self {
            position,
            size,
            context_linked: false,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// A region at `position` reaching infinitely right and down.
    pub fn from_position(position: Point) -> Self {
        Self::new(position, Point::splat(f64::INFINITY))
    }

    /// The whole positive quadrant.
    pub fn unbounded() -> Self {
        Self::from_position(Point::ZERO)
    }

    /// A region covering the context, linked to it for [`ScreenRegion::sync_with`].
    pub fn fit_context(context: &dyn RenderContext) -> Self {
        let mut region = Self::new(Point::ZERO, context.size());
        region.context_linked = true;
        region
    }

    /// Copy position and size from any rectangle.
    pub fn from_rect(rect: &dyn Rectangle) -> Self {
        Self::new(rect.position(), rect.size())
    }

    pub fn is_unbounded(&self) -> bool {
        self.size.x == f64::INFINITY && self.size.y == f64::INFINITY
    }

    pub fn is_context_linked(&self) -> bool {
        self.context_linked
    }

    /// Re-read the context's size. Only linked regions follow the context.
    pub fn sync_with(&mut self, context: &dyn RenderContext) {
        if self.context_linked {
            self.set_size(context.size());
        }
    }

    /// Stop following the context.
    pub fn unlink(&mut self) {
        self.context_linked = false;
    }

    /// Register a listener. Listeners run in subscription order.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&RegionChange) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(registered, _)| *registered != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn update(&mut self, position: Point, size: Point) {
        if position == self.position && size == self.size {
            return;
        }
        let change = RegionChange {
            previous_position: self.position,
            previous_size: self.size,
            position,
            size,
        };
        self.position = position;
        self.size = size;
        trace!(listeners = self.listeners.len(), "region changed");
        for (_, listener) in &mut self.listeners {
            listener(&change);
        }
    }
}

impl fmt::Debug for ScreenRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenRegion")
            .field("position", &self.position)
            .field("size", &self.size)
            .field("context_linked", &self.context_linked)
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl Rectangle for ScreenRegion {
    fn position(&self) -> Point {
        self.position
    }

    fn size(&self) -> Point {
        self.size
    }

    fn set_position(&mut self, position: Point) {
        self.update(position, self.size);
    }

    fn set_size(&mut self, size: Point) {
        self.update(self.position, size);
    }
}

impl Bounded for ScreenRegion {
    fn bounds(&self) -> BoundingBox {
        BoundingBox::from_size(self.position, self.size)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::rect_eq;
    use crate::pixmap::PixmapContext;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn unbounded_region() {
        let region = ScreenRegion::unbounded();
        assert!(region.is_unbounded());
        assert!(region.point_within_bounds(Point::new(1e12, 1e12)));
        assert!(!ScreenRegion::new(Point::ZERO, Point::new(1.0, 1.0)).is_unbounded());
    }

    #[test]
    fn listeners_fire_only_on_change_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut region = ScreenRegion::new(Point::ZERO, Point::new(10.0, 10.0));

        let first = Rc::clone(&log);
        region.subscribe(move |c: &RegionChange| {
            first.borrow_mut().push(("first", c.position))
        });
        let second = Rc::clone(&log);
        let id = region.subscribe(move |c: &RegionChange| {
            second.borrow_mut().push(("second", c.position))
        });
        assert_eq!(region.listener_count(), 2);

        region.set_position(Point::ZERO); // unchanged
        assert!(log.borrow().is_empty());

        region.set_position(Point::new(3.0, 4.0));
        assert_eq!(
            *log.borrow(),
            vec![("first", Point::new(3.0, 4.0)), ("second", Point::new(3.0, 4.0))]
        );

        assert!(region.unsubscribe(id));
        assert!(!region.unsubscribe(id));
        assert_eq!(region.listener_count(), 1);
        region.set_extent(Point::new(20.0, 20.0));
        assert_eq!(log.borrow().len(), 3);
        assert_eq!(region.size(), Point::new(17.0, 16.0));
    }

    #[test]
    fn change_carries_previous_values() {
        let seen = Rc::new(RefCell::new(None));
        let mut region = ScreenRegion::new(Point::ZERO, Point::new(5.0, 5.0));
        let sink = Rc::clone(&seen);
        region.subscribe(move |c: &RegionChange| *sink.borrow_mut() = Some(*c));
        region.set_size(Point::new(8.0, 2.0));
        let change = seen.borrow().unwrap();
        assert_eq!(change.previous_size, Point::new(5.0, 5.0));
        assert_eq!(change.size, Point::new(8.0, 2.0));
    }

    #[test]
    fn context_linked_region_follows_context() {
        let small = PixmapContext::new(40, 30).unwrap();
        let large = PixmapContext::new(80, 60).unwrap();

        let mut region = ScreenRegion::fit_context(&small);
        assert!(region.is_context_linked());
        assert_eq!(region.size(), Point::new(40.0, 30.0));

        region.sync_with(&large);
        assert_eq!(region.size(), Point::new(80.0, 60.0));

        region.unlink();
        region.sync_with(&small);
        assert_eq!(region.size(), Point::new(80.0, 60.0));
    }

    #[test]
    fn equality_by_position_and_size() {
        let region = ScreenRegion::new(Point::new(1.0, 2.0), Point::new(3.0, 4.0));
        let bounds = BoundingBox::new(Point::new(1.0, 2.0), Point::new(4.0, 6.0));
        assert!(rect_eq(&region, &bounds));
        assert!(rect_eq(&ScreenRegion::from_rect(&bounds), &region));
    }
}
