//! [`LocalHost`]: an in-process host for tests, tools and demos.
//!
//! It implements every host contract the menus consume: an [`EventBus`], a
//! [`TickScheduler`], a surface registry backed by [`SlotBuffer`]s, and a
//! cue log. Each actor views at most one surface; opening another surface
//! first closes the current one and dispatches the matching
//! [`CloseEvent`], just like a game server would.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::bus::EventBus;
use crate::events::{ActorId, ClickEvent, ClickKind, CloseEvent, DragEvent, SurfaceId};
use crate::host::{Cue, Feedback, Host};
use crate::icon::Icon;
use crate::schedule::TickScheduler;
use crate::surface::{SlotBuffer, Surface, SurfaceFactory};
use crate::text::StyledText;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Shared {
    bus: Rc<EventBus>,
    scheduler: Rc<TickScheduler>,
    surfaces: RefCell<HashMap<SurfaceId, Rc<LocalSurface>>>,
    views: RefCell<HashMap<ActorId, SurfaceId>>,
    cues: RefCell<Vec<(ActorId, Cue)>>,
    next_surface: Cell<u64>,
    /// Depth of close dispatches currently on the stack.
    closing: Cell<u32>,
    reentrant_opens: Cell<u32>,
}

impl Shared {
    fn open(&self, surface: SurfaceId, actor: ActorId) {
        if self.closing.get() > 0 {
            log::warn!("{surface} opened for {actor} while a close event is being dispatched");
            self.reentrant_opens.set(self.reentrant_opens.get() + 1);
        }
        let previous = self.views.borrow_mut().remove(&actor);
        if let Some(previous) = previous {
            self.dispatch_close(CloseEvent::new(previous, actor));
        }
        log::trace!("{actor} now views {surface}");
        self.views.borrow_mut().insert(actor, surface);
    }

    fn close(&self, actor: ActorId) -> bool {
        let previous = self.views.borrow_mut().remove(&actor);
        match previous {
            Some(surface) => {
                self.dispatch_close(CloseEvent::new(surface, actor));
                true
            }
            None => false,
        }
    }

    fn dispatch_close(&self, event: CloseEvent) {
        self.closing.set(self.closing.get() + 1);
        self.bus.close(&event);
        self.closing.set(self.closing.get() - 1);
    }
}

// ---------------------------------------------------------------------------
// LocalSurface
// ---------------------------------------------------------------------------

/// A surface registered with a [`LocalHost`].
pub struct LocalSurface {
    id: SurfaceId,
    title: StyledText,
    slots: SlotBuffer,
    shared: Weak<Shared>,
}

impl LocalSurface {
    /// The slot contents as last written.
    pub fn slots(&self) -> &SlotBuffer {
        &self.slots
    }

    /// Icon currently shown in `slot`.
    pub fn at(&self, slot: usize) -> Option<Icon> {
        self.slots.at(slot)
    }
}

impl Surface for LocalSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn size(&self) -> usize {
        self.slots.size()
    }

    fn title(&self) -> StyledText {
        self.title.clone()
    }

    fn write(&self, slot: usize, icon: Option<&Icon>) {
        if !self.slots.set(slot, icon.cloned()) {
            log::warn!("{}: write to slot {slot} outside {} slots", self.id, self.size());
        }
    }

    fn open(&self, actor: ActorId) {
        // The host is gone: nothing left to show the surface on.
        if let Some(shared) = self.shared.upgrade() {
            shared.open(self.id, actor);
        }
    }
}

impl fmt::Debug for LocalSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSurface")
            .field("id", &self.id)
            .field("title", &self.title.content())
            .field("size", &self.slots.size())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// LocalHost
// ---------------------------------------------------------------------------

/// An in-process host. Cloning yields another handle to the same host.
#[derive(Clone, Default)]
pub struct LocalHost {
    shared: Rc<Shared>,
}

impl LocalHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host services for constructing menus against this host.
    pub fn host(&self) -> Host {
        Host::new(
            self.shared.bus.clone(),
            self.shared.scheduler.clone(),
            Rc::new(self.clone()),
        )
        .with_feedback(Rc::new(self.clone()))
    }

    pub fn bus(&self) -> &EventBus {
        &self.shared.bus
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.shared.scheduler
    }

    /// Look up a surface created by this host.
    pub fn surface(&self, id: SurfaceId) -> Option<Rc<LocalSurface>> {
        self.shared.surfaces.borrow().get(&id).cloned()
    }

    /// The surface `actor` is viewing, if any.
    pub fn view_of(&self, actor: ActorId) -> Option<SurfaceId> {
        self.shared.views.borrow().get(&actor).copied()
    }

    /// Actors viewing `surface`, in id order.
    pub fn viewers(&self, surface: SurfaceId) -> Vec<ActorId> {
        let mut v: Vec<ActorId> = self
            .shared
            .views
            .borrow()
            .iter()
            .filter(|(_, s)| **s == surface)
            .map(|(a, _)| *a)
            .collect();
        v.sort();
        v
    }

    /// Show `surface` to `actor`, closing its current view first.
    pub fn open(&self, surface: SurfaceId, actor: ActorId) {
        self.shared.open(surface, actor);
    }

    /// `actor` clicks `raw_slot` of its current view. Raw slots past the
    /// surface size address the actor's own inventory below it.
    ///
    /// Returns the dispatched event, or `None` if the actor views nothing.
    pub fn click(&self, actor: ActorId, raw_slot: usize, kind: ClickKind) -> Option<ClickEvent> {
        let surface = self.view_of(actor)?;
        let size = self.surface(surface).map_or(0, |s| s.size());
        let slot = if raw_slot < size { raw_slot } else { raw_slot - size };
        let mut event = ClickEvent::new(surface, raw_slot, slot, kind, actor);
        self.shared.bus.click(&mut event);
        Some(event)
    }

    /// `actor` drags over `raw_slots` of its current view.
    pub fn drag(&self, actor: ActorId, raw_slots: Vec<usize>) -> Option<DragEvent> {
        let surface = self.view_of(actor)?;
        let mut event = DragEvent::new(surface, actor, raw_slots);
        self.shared.bus.drag(&mut event);
        Some(event)
    }

    /// `actor` closes its current view. Returns `false` if it viewed
    /// nothing.
    pub fn close(&self, actor: ActorId) -> bool {
        self.shared.close(actor)
    }

    /// Advance the scheduler by `ticks`. Returns how many tasks ran.
    pub fn advance(&self, ticks: u32) -> usize {
        self.shared.scheduler.advance(ticks)
    }

    /// Every cue sent so far, oldest first.
    pub fn cues(&self) -> Vec<(ActorId, Cue)> {
        self.shared.cues.borrow().clone()
    }

    /// Drain the cue log.
    pub fn take_cues(&self) -> Vec<(ActorId, Cue)> {
        std::mem::take(&mut *self.shared.cues.borrow_mut())
    }

    /// How many surfaces were opened from inside a close dispatch.
    pub fn reentrant_opens(&self) -> u32 {
        self.shared.reentrant_opens.get()
    }
}

impl SurfaceFactory for LocalHost {
    fn create_surface(&self, title: &StyledText, size: usize) -> Rc<dyn Surface> {
        let id = SurfaceId(self.shared.next_surface.get());
        self.shared.next_surface.set(id.0 + 1);
        let surface = Rc::new(LocalSurface {
            id,
            title: title.clone(),
            slots: SlotBuffer::new(size),
            shared: Rc::downgrade(&self.shared),
        });
        self.shared
            .surfaces
            .borrow_mut()
            .insert(id, surface.clone());
        log::debug!("created {id} \"{}\" with {size} slots", title.content());
        surface
    }
}

impl Feedback for LocalHost {
    fn cue(&self, actor: ActorId, cue: Cue) {
        self.shared.cues.borrow_mut().push((actor, cue));
    }
}

impl fmt::Debug for LocalHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalHost")
            .field("surfaces", &self.shared.surfaces.borrow().len())
            .field("views", &self.shared.views.borrow().len())
            .field("tick", &self.shared.scheduler.now())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{EventSource, Listener};

    const ALICE: ActorId = ActorId(1);

    #[derive(Default)]
    struct Closes(RefCell<Vec<CloseEvent>>);

    impl Listener for Closes {
        fn on_close(&self, event: &CloseEvent) {
            self.0.borrow_mut().push(*event);
        }
    }

    #[test]
    fn opening_replaces_current_view_with_close() {
        let local = LocalHost::new();
        let closes = Rc::new(Closes::default());
        local.bus().subscribe(closes.clone());

        let a = local.create_surface(&StyledText::plain("a"), 9);
        let b = local.create_surface(&StyledText::plain("b"), 9);
        a.open(ALICE);
        assert_eq!(local.view_of(ALICE), Some(a.id()));
        assert!(closes.0.borrow().is_empty());

        b.open(ALICE);
        assert_eq!(local.view_of(ALICE), Some(b.id()));
        assert_eq!(*closes.0.borrow(), vec![CloseEvent::new(a.id(), ALICE)]);
        assert_eq!(local.viewers(b.id()), vec![ALICE]);

        assert!(local.close(ALICE));
        assert!(!local.close(ALICE));
        assert_eq!(closes.0.borrow().len(), 2);
        assert_eq!(local.reentrant_opens(), 0);
    }

    #[test]
    fn click_maps_lower_inventory_slots() {
        let local = LocalHost::new();
        let s = local.create_surface(&StyledText::plain("s"), 27);
        assert!(local.click(ALICE, 0, ClickKind::Left).is_none());
        s.open(ALICE);
        let top = local.click(ALICE, 5, ClickKind::Left).unwrap();
        assert_eq!((top.raw_slot, top.slot), (5, 5));
        let bottom = local.click(ALICE, 30, ClickKind::ShiftLeft).unwrap();
        assert_eq!((bottom.raw_slot, bottom.slot), (30, 3));
        assert!(!bottom.is_cancelled());
    }

    #[test]
    fn writes_land_in_registered_surface() {
        let local = LocalHost::new();
        let s = local.create_surface(&StyledText::parse("&6Shop"), 9);
        s.write(4, Some(&Icon::new('$', "coin")));
        let reg = local.surface(s.id()).unwrap();
        assert_eq!(reg.at(4).map(|i| i.glyph), Some('$'));
        assert_eq!(reg.title().content(), "Shop");
        s.write(4, None);
        assert_eq!(reg.at(4), None);
    }

    #[test]
    fn cue_log() {
        let local = LocalHost::new();
        let host = local.host();
        host.cue(Some(ALICE), Cue::Deny);
        host.cue(None, Cue::Accept);
        assert_eq!(local.take_cues(), vec![(ALICE, Cue::Deny)]);
        assert!(local.cues().is_empty());
    }
}
