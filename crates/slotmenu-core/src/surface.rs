//! Rendering surfaces: the [`Surface`] and [`SurfaceFactory`] contracts and
//! [`SlotBuffer`], shared slot storage for implementing them.
//!
//! A `SlotBuffer` is a *view* into shared storage. Cloning it yields another
//! handle to the **same** slots, so a host can hand one clone to its renderer
//! and keep another for writes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::events::{ActorId, SurfaceId};
use crate::geom::{row_slots, rows_for};
use crate::icon::Icon;
use crate::text::StyledText;

/// A host-rendered grid of slots.
pub trait Surface {
    fn id(&self) -> SurfaceId;

    /// Number of slots.
    fn size(&self) -> usize;

    fn title(&self) -> StyledText;

    /// Show `icon` in `slot`, or clear it. Out-of-range slots are the
    /// caller's bug; implementations may ignore them.
    fn write(&self, slot: usize, icon: Option<&Icon>);

    /// Show this surface to `actor`, replacing whatever it was viewing.
    fn open(&self, actor: ActorId);
}

/// Creates surfaces on behalf of menus.
pub trait SurfaceFactory {
    fn create_surface(&self, title: &StyledText, size: usize) -> Rc<dyn Surface>;
}

// ---------------------------------------------------------------------------
// SlotBuffer
// ---------------------------------------------------------------------------

/// Fixed-size slot storage with slice semantics on clone.
#[derive(Clone, Debug)]
pub struct SlotBuffer {
    slots: Rc<RefCell<Vec<Option<Icon>>>>,
    writes: Rc<Cell<u64>>,
}

impl SlotBuffer {
    /// Create an empty buffer of `size` slots.
    pub fn new(size: usize) -> Self {
        Self {
            slots: Rc::new(RefCell::new(vec![None; size])),
            writes: Rc::new(Cell::new(0)),
        }
    }

    pub fn size(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        rows_for(self.size())
    }

    /// Icon in `slot`, `None` if empty or out of range.
    pub fn at(&self, slot: usize) -> Option<Icon> {
        self.slots.borrow().get(slot).cloned().flatten()
    }

    /// Replace the content of `slot`. No-op if `slot` is out of range.
    /// Returns whether the write landed.
    pub fn set(&self, slot: usize, icon: Option<Icon>) -> bool {
        let mut slots = self.slots.borrow_mut();
        match slots.get_mut(slot) {
            Some(s) => {
                *s = icon;
                self.writes.set(self.writes.get() + 1);
                true
            }
            None => false,
        }
    }

    /// Contents of row `z` (empty if the row is out of range).
    pub fn row(&self, z: usize) -> Vec<Option<Icon>> {
        let slots = self.slots.borrow();
        let r = row_slots(z);
        if r.end > slots.len() {
            return Vec::new();
        }
        slots[r].to_vec()
    }

    /// Number of non-empty slots.
    pub fn occupied(&self) -> usize {
        self.slots.borrow().iter().filter(|s| s.is_some()).count()
    }

    /// Total number of landed writes since creation.
    pub fn writes(&self) -> u64 {
        self.writes.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let b = SlotBuffer::new(18);
        assert_eq!(b.size(), 18);
        assert_eq!(b.rows(), 2);
        assert!(b.set(10, Some(Icon::new('x', "X"))));
        assert_eq!(b.at(10).map(|i| i.glyph), Some('x'));
        // out of bounds is ignored
        assert!(!b.set(18, Some(Icon::default())));
        assert_eq!(b.at(18), None);
        assert_eq!(b.writes(), 1);
    }

    #[test]
    fn clone_shares_storage() {
        let a = SlotBuffer::new(9);
        let b = a.clone();
        b.set(3, Some(Icon::new('#', "")));
        assert_eq!(a.occupied(), 1);
        assert_eq!(a.row(0)[3].as_ref().map(|i| i.glyph), Some('#'));
        assert!(a.row(1).is_empty());
        a.set(3, None);
        assert_eq!(b.occupied(), 0);
    }
}
