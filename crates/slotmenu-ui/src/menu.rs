use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use slotmenu_core::geom::is_valid_size;
use slotmenu_core::{
    ActorId, ClickEvent, CloseEvent, DragEvent, Host, Listener, ListenerId, StyledText, Surface,
    SurfaceId, slot_index,
};

use crate::{Item, MenuError};

/// Ticks between a close event and the reopen it triggers.
pub const REOPEN_DELAY: u32 = 2;

/// Configuration for a [`Menu`].
#[derive(Debug, Clone)]
pub struct MenuConfig {
    /// Title, with `&` formatting codes.
    pub title: String,
    /// Number of slots; a positive multiple of 9.
    pub size: usize,
    /// Reopen on close until the first item interaction.
    pub sticky: bool,
    /// Ticks to wait before reopening after a close.
    pub reopen_delay: u32,
}

impl MenuConfig {
    pub fn new(title: &str, size: usize) -> Self {
        Self {
            title: title.to_string(),
            size,
            ..Self::default()
        }
    }

    /// Set stickiness (builder).
    pub fn sticky(mut self, sticky: bool) -> Self {
        self.sticky = sticky;
        self
    }
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            size: 27,
            sticky: false,
            reopen_delay: REOPEN_DELAY,
        }
    }
}

/// Slot access shared by every menu kind.
///
/// Implementations differ in how a write reaches the surface: [`Menu`]
/// renders immediately, [`ScrollingMenu`](crate::ScrollingMenu) renders on
/// flush and [`MultiMenu`](crate::MultiMenu) delegates to a page.
pub trait GridMenu {
    /// Bind `item` to `index`, or clear it with `None`.
    fn set_item(&self, index: usize, item: Option<Item>) -> &Self;

    fn item_at(&self, index: usize) -> Option<Item>;

    /// Open the menu for each actor. Actors already viewing it are not
    /// skipped.
    fn show_to(&self, actors: &[ActorId]);

    /// Item at column `x`, row `z`.
    fn item_at_xz(&self, x: usize, z: usize) -> Option<Item> {
        self.item_at(slot_index(x, z))
    }

    /// Bind `item` at column `x`, row `z`.
    fn set_item_at(&self, x: usize, z: usize, item: Option<Item>) -> &Self {
        self.set_item(slot_index(x, z), item)
    }
}

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

/// A grid of slots bound to items, shown on one host surface.
///
/// `Menu` is a handle: clones refer to the same menu. While subscribed, the
/// host's event source keeps the menu alive, so it must be
/// [`dispose`](Self::dispose)d (or created under a [`MenuGuard`]) to be
/// released.
#[derive(Clone)]
pub struct Menu {
    inner: Rc<Inner>,
}

struct Inner {
    host: Host,
    title: StyledText,
    size: usize,
    reopen_delay: u32,
    surface: Rc<dyn Surface>,
    state: RefCell<State>,
    subscription: Cell<Option<ListenerId>>,
}

#[derive(Default)]
struct State {
    slots: HashMap<usize, Item>,
    parent: Option<Weak<Inner>>,
    sticky: bool,
    /// Actors whose next close of this surface is a page switch, not a
    /// real close.
    suppressed: HashSet<ActorId>,
}

impl Menu {
    /// Create a menu and subscribe it to the host's events.
    pub fn create(host: &Host, config: MenuConfig) -> Result<Self, MenuError> {
        if !is_valid_size(config.size) {
            return Err(MenuError::InvalidSize(config.size));
        }
        let title = StyledText::parse(&config.title);
        let surface = host.surfaces.create_surface(&title, config.size);
        let inner = Rc::new(Inner {
            host: host.clone(),
            title,
            size: config.size,
            reopen_delay: config.reopen_delay,
            surface,
            state: RefCell::new(State {
                sticky: config.sticky,
                ..State::default()
            }),
            subscription: Cell::new(None),
        });
        let id = host.events.subscribe(inner.clone());
        inner.subscription.set(Some(id));
        log::debug!(
            "menu \"{}\" ({} slots) subscribed on {}",
            inner.title.content(),
            inner.size,
            inner.surface.id()
        );
        Ok(Self { inner })
    }

    /// Revoke the event subscription. Returns `false` if already disposed.
    pub fn dispose(&self) -> bool {
        match self.inner.subscription.take() {
            Some(id) => {
                log::debug!("menu \"{}\" disposed", self.inner.title.content());
                self.inner.host.events.unsubscribe(id)
            }
            None => false,
        }
    }

    /// Whether the menu still receives events.
    pub fn is_subscribed(&self) -> bool {
        self.inner.subscription.get().is_some()
    }

    /// Wrap the menu in a guard that disposes it when dropped.
    pub fn scoped(self) -> MenuGuard {
        MenuGuard { menu: self }
    }

    pub fn title(&self) -> &StyledText {
        &self.inner.title
    }

    /// Number of slots.
    pub fn size(&self) -> usize {
        self.inner.size
    }

    pub fn surface(&self) -> Rc<dyn Surface> {
        self.inner.surface.clone()
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.inner.surface.id()
    }

    /// Menu shown instead of this one when it is closed. Held weakly.
    pub fn set_parent(&self, parent: Option<&Menu>) -> &Self {
        self.inner.state.borrow_mut().parent = parent.map(|p| Rc::downgrade(&p.inner));
        self
    }

    pub fn parent(&self) -> Option<Menu> {
        let state = self.inner.state.borrow();
        state
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| Menu { inner })
    }

    pub fn set_sticky(&self, sticky: bool) -> &Self {
        self.inner.state.borrow_mut().sticky = sticky;
        self
    }

    pub fn is_sticky(&self) -> bool {
        self.inner.state.borrow().sticky
    }

    /// Bound slots, in index order.
    pub fn items(&self) -> Vec<(usize, Item)> {
        let state = self.inner.state.borrow();
        let mut v: Vec<(usize, Item)> = state
            .slots
            .iter()
            .map(|(i, item)| (*i, item.clone()))
            .collect();
        v.sort_by_key(|(i, _)| *i);
        v
    }

    pub fn downgrade(&self) -> WeakMenu {
        WeakMenu {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether both handles refer to the same menu.
    pub fn ptr_eq(&self, other: &Menu) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn host(&self) -> &Host {
        &self.inner.host
    }

    /// Treat the next close of this surface by `actor` as a transition:
    /// no reopen is scheduled for it.
    pub(crate) fn suppress_close(&self, actor: ActorId) {
        self.inner.state.borrow_mut().suppressed.insert(actor);
    }

    /// Drop a pending [`suppress_close`](Self::suppress_close) that no close
    /// consumed.
    pub(crate) fn release_close(&self, actor: ActorId) {
        self.inner.state.borrow_mut().suppressed.remove(&actor);
    }
}

impl GridMenu for Menu {
    /// Out-of-range indices are ignored with a warning.
    fn set_item(&self, index: usize, item: Option<Item>) -> &Self {
        if index >= self.inner.size {
            log::warn!(
                "menu \"{}\": slot {index} is outside its {} slots",
                self.inner.title.content(),
                self.inner.size
            );
            return self;
        }
        self.inner
            .surface
            .write(index, item.as_ref().map(|i| i.icon()));
        let mut state = self.inner.state.borrow_mut();
        match item {
            Some(item) => state.slots.insert(index, item),
            None => state.slots.remove(&index),
        };
        self
    }

    fn item_at(&self, index: usize) -> Option<Item> {
        self.inner.state.borrow().slots.get(&index).cloned()
    }

    fn show_to(&self, actors: &[ActorId]) {
        for &actor in actors {
            self.inner.surface.open(actor);
        }
    }
}

impl Listener for Inner {
    fn on_click(&self, event: &mut ClickEvent) {
        if event.surface != self.surface.id() {
            return;
        }
        // Clicks in the actor's own inventory behave normally, except
        // move-all gestures that would push items into the menu.
        if event.raw_slot >= self.size && !event.kind.is_shift_click() {
            return;
        }
        event.cancel();

        let item = {
            let mut state = self.state.borrow_mut();
            let item = state.slots.get(&event.slot).cloned();
            if item.is_some() {
                state.sticky = false;
            }
            item
        };
        // Disarm first, then invoke: the action may re-arm stickiness.
        if let Some(item) = item {
            log::trace!(
                "menu \"{}\": {} used slot {} ({:?})",
                self.title.content(),
                event.actor,
                event.slot,
                event.kind
            );
            item.interact(event.actor, event.kind);
        }
    }

    fn on_drag(&self, event: &mut DragEvent) {
        if event.surface != self.surface.id() {
            return;
        }
        event.cancel();
    }

    fn on_close(&self, event: &CloseEvent) {
        if event.surface != self.surface.id() {
            return;
        }
        let target = {
            let mut state = self.state.borrow_mut();
            if state.suppressed.remove(&event.actor) {
                log::trace!(
                    "menu \"{}\": close by {} is a page switch",
                    self.title.content(),
                    event.actor
                );
                return;
            }
            match state.parent.as_ref().and_then(Weak::upgrade) {
                Some(parent) => Some(parent.surface.clone()),
                None if state.sticky => Some(self.surface.clone()),
                None => None,
            }
        };

        let Some(surface) = target else {
            return;
        };
        // Opening a surface while the host is still unwinding this close
        // corrupts its view state, so the reopen always waits.
        let actor = event.actor;
        log::debug!(
            "menu \"{}\": reopening {} for {actor} in {} ticks",
            self.title.content(),
            surface.id(),
            self.reopen_delay
        );
        self.host
            .scheduler
            .after(self.reopen_delay, Box::new(move || surface.open(actor)));
    }
}

impl fmt::Debug for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Menu")
            .field("title", &self.inner.title.content())
            .field("size", &self.inner.size)
            .field("surface", &self.inner.surface.id())
            .field("items", &state.slots.len())
            .field("sticky", &state.sticky)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// WeakMenu / MenuGuard
// ---------------------------------------------------------------------------

/// A non-owning menu handle, for item actions that refer back to their menu.
#[derive(Clone, Debug)]
pub struct WeakMenu {
    inner: Weak<Inner>,
}

impl WeakMenu {
    pub fn upgrade(&self) -> Option<Menu> {
        self.inner.upgrade().map(|inner| Menu { inner })
    }
}

/// Disposes the wrapped menu when dropped.
#[must_use = "the menu is disposed as soon as the guard is dropped"]
#[derive(Debug)]
pub struct MenuGuard {
    menu: Menu,
}

impl Deref for MenuGuard {
    type Target = Menu;

    fn deref(&self) -> &Menu {
        &self.menu
    }
}

impl Drop for MenuGuard {
    fn drop(&mut self) {
        self.menu.dispose();
    }
}
