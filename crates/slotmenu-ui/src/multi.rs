use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use slotmenu_core::geom::is_valid_size;
use slotmenu_core::{ActorId, Color, Cue, Host, Icon, ROW_WIDTH, Style, SurfaceId};

use crate::menu::REOPEN_DELAY;
use crate::{GridMenu, Item, Menu, MenuConfig, MenuError, WeakMenu};

/// Default cap on the number of pages of a [`MultiMenu`].
pub const MAX_PAGES: usize = 256;

/// Icons for the page controls, in their enabled and disabled variants.
#[derive(Debug, Clone)]
pub struct PageButtons {
    pub previous: Icon,
    pub previous_disabled: Icon,
    pub next: Icon,
    pub next_disabled: Icon,
}

impl Default for PageButtons {
    fn default() -> Self {
        let on = Style::default().with_fg(Color::GOLD);
        let off = Style::default().with_fg(Color::DARK_GRAY);
        Self {
            previous: Icon::new('◀', "&6Previous page").with_style(on),
            previous_disabled: Icon::new('◁', "&8No previous page").with_style(off),
            next: Icon::new('▶', "&6Next page").with_style(on),
            next_disabled: Icon::new('▷', "&8No next page").with_style(off),
        }
    }
}

/// Configuration for a [`MultiMenu`].
#[derive(Debug, Clone)]
pub struct MultiMenuConfig {
    /// Title of every page, with `&` formatting codes.
    pub title: String,
    /// Slots per page; a positive multiple of 9.
    pub size: usize,
    /// Pages created up front. More are added on demand.
    pub pages: usize,
    /// Upper bound on the page count, initial or grown.
    pub max_pages: usize,
    pub buttons: PageButtons,
    pub reopen_delay: u32,
}

impl MultiMenuConfig {
    pub fn new(title: &str, size: usize) -> Self {
        Self {
            title: title.to_string(),
            size,
            ..Self::default()
        }
    }

    /// Set the initial page count (builder).
    pub fn with_pages(mut self, pages: usize) -> Self {
        self.pages = pages;
        self
    }
}

impl Default for MultiMenuConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            size: 54,
            pages: 1,
            max_pages: MAX_PAGES,
            buttons: PageButtons::default(),
            reopen_delay: REOPEN_DELAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Turn {
    Previous,
    Next,
}

// ---------------------------------------------------------------------------
// MultiMenu
// ---------------------------------------------------------------------------

/// A sequence of same-sized [`Menu`] pages addressed as one flat slot space.
///
/// Flat index `i` lives on page `i / size` at local slot `i % size`. The
/// first and last slot of every page's bottom row are reserved for the
/// previous/next controls. The active page is shared by all viewers.
///
/// Like [`Menu`], a paged menu lives until [`dispose`](Self::dispose)d: the
/// page controls own it, so dropping every handle leaves it working.
#[derive(Clone)]
pub struct MultiMenu {
    inner: Rc<Inner>,
}

struct Inner {
    host: Host,
    config: MultiMenuConfig,
    pages: RefCell<Vec<Menu>>,
    active: Cell<usize>,
    parent: RefCell<Option<WeakMenu>>,
    sticky: Cell<bool>,
    disposed: Cell<bool>,
}

impl MultiMenu {
    /// Create the menu with `config.pages` pages, each subscribed.
    pub fn create(host: &Host, config: MultiMenuConfig) -> Result<Self, MenuError> {
        if !is_valid_size(config.size) {
            return Err(MenuError::InvalidSize(config.size));
        }
        if config.pages == 0 {
            return Err(MenuError::NoPages);
        }
        if config.pages > config.max_pages {
            return Err(MenuError::TooManyPages(config.max_pages));
        }
        let pages = config.pages;
        let multi = Self {
            inner: Rc::new(Inner {
                host: host.clone(),
                config,
                pages: RefCell::new(Vec::with_capacity(pages)),
                active: Cell::new(0),
                parent: RefCell::new(None),
                sticky: Cell::new(false),
                disposed: Cell::new(false),
            }),
        };
        for _ in 0..pages {
            multi.push_page()?;
        }
        multi.refresh_controls();
        Ok(multi)
    }

    /// Slots per page.
    pub fn page_size(&self) -> usize {
        self.inner.config.size
    }

    pub fn page_count(&self) -> usize {
        self.inner.pages.borrow().len()
    }

    pub fn page(&self, index: usize) -> Option<Menu> {
        self.inner.pages.borrow().get(index).cloned()
    }

    pub fn pages(&self) -> Vec<Menu> {
        self.inner.pages.borrow().clone()
    }

    pub fn active_index(&self) -> usize {
        self.inner.active.get()
    }

    pub fn active_page(&self) -> Menu {
        let pages = self.inner.pages.borrow();
        pages[self.inner.active.get()].clone()
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.active_page().surface_id()
    }

    /// Local slot of the previous-page control.
    pub fn previous_slot(&self) -> usize {
        self.inner.config.size - ROW_WIDTH
    }

    /// Local slot of the next-page control.
    pub fn next_slot(&self) -> usize {
        self.inner.config.size - 1
    }

    /// Append an empty page and return it.
    pub fn add_page(&self) -> Result<Menu, MenuError> {
        let page = self.push_page()?;
        self.refresh_controls();
        Ok(page)
    }

    /// Applies to every page, including pages added later.
    pub fn set_parent(&self, parent: Option<&Menu>) -> &Self {
        *self.inner.parent.borrow_mut() = parent.map(Menu::downgrade);
        for page in self.pages() {
            page.set_parent(parent);
        }
        self
    }

    /// Applies to every page, including pages added later.
    pub fn set_sticky(&self, sticky: bool) -> &Self {
        self.inner.sticky.set(sticky);
        for page in self.pages() {
            page.set_sticky(sticky);
        }
        self
    }

    /// Dispose every page and unbind the page controls. Returns `false` if
    /// none was still subscribed.
    pub fn dispose(&self) -> bool {
        self.inner.disposed.set(true);
        let any = self
            .pages()
            .iter()
            .fold(false, |any, page| page.dispose() || any);
        // Controls own the menu; replacing them releases it.
        self.refresh_controls();
        any
    }

    /// Advance to the next page for `actor`. At the last page nothing
    /// changes and `actor` gets a deny cue.
    pub fn next_page(&self, actor: ActorId) -> bool {
        self.turn(Turn::Next, actor)
    }

    /// Go back to the previous page for `actor`. At the first page nothing
    /// changes and `actor` gets a deny cue.
    pub fn previous_page(&self, actor: ActorId) -> bool {
        self.turn(Turn::Previous, actor)
    }

    /// Make page `index` active and show it to `actor` in place of the page
    /// it is viewing. The page being left does not treat this as a close.
    pub fn show_page(&self, index: usize, actor: ActorId) -> bool {
        let pages = self.pages();
        let Some(target) = pages.get(index) else {
            self.inner.host.cue(Some(actor), Cue::Deny);
            return false;
        };
        self.inner.active.set(index);
        log::debug!(
            "paged menu \"{}\": {actor} turns to page {}/{}",
            self.inner.config.title,
            index + 1,
            pages.len()
        );
        // Opening the target closes the actor's current page synchronously;
        // no page may run its close policy for that.
        for page in &pages {
            page.suppress_close(actor);
        }
        target.show_to(&[actor]);
        for page in &pages {
            page.release_close(actor);
        }
        self.inner.host.cue(Some(actor), Cue::Accept);
        true
    }

    fn turn(&self, turn: Turn, actor: ActorId) -> bool {
        let active = self.inner.active.get();
        let target = match turn {
            Turn::Previous => active.checked_sub(1),
            Turn::Next => Some(active + 1).filter(|&i| i < self.page_count()),
        };
        match target {
            Some(index) => self.show_page(index, actor),
            None => {
                log::trace!("paged menu \"{}\": no page to turn to", self.inner.config.title);
                self.inner.host.cue(Some(actor), Cue::Deny);
                false
            }
        }
    }

    fn push_page(&self) -> Result<Menu, MenuError> {
        let config = &self.inner.config;
        if self.inner.disposed.get() {
            return Err(MenuError::Disposed);
        }
        if self.page_count() >= config.max_pages {
            return Err(MenuError::TooManyPages(config.max_pages));
        }
        let page = Menu::create(
            &self.inner.host,
            MenuConfig {
                title: config.title.clone(),
                size: config.size,
                sticky: self.inner.sticky.get(),
                reopen_delay: config.reopen_delay,
            },
        )?;
        let parent = self.inner.parent.borrow().as_ref().and_then(WeakMenu::upgrade);
        page.set_parent(parent.as_ref());
        self.inner.pages.borrow_mut().push(page.clone());
        Ok(page)
    }

    /// Repaint both controls on every page.
    fn refresh_controls(&self) {
        let pages = self.pages();
        let last = pages.len().saturating_sub(1);
        for (i, page) in pages.iter().enumerate() {
            page.set_item(self.previous_slot(), Some(self.control(Turn::Previous, i > 0)))
                .set_item(self.next_slot(), Some(self.control(Turn::Next, i < last)));
        }
    }

    fn control(&self, turn: Turn, enabled: bool) -> Item {
        let buttons = &self.inner.config.buttons;
        let icon = match (turn, enabled) {
            (Turn::Previous, true) => buttons.previous.clone(),
            (Turn::Previous, false) => buttons.previous_disabled.clone(),
            (Turn::Next, true) => buttons.next.clone(),
            (Turn::Next, false) => buttons.next_disabled.clone(),
        };
        if self.inner.disposed.get() {
            return Item::decoration(icon);
        }
        let multi = self.clone();
        Item::new(icon, move |actor, _| {
            multi.turn(turn, actor);
        })
    }

    fn is_reserved(&self, local: usize) -> bool {
        local == self.previous_slot() || local == self.next_slot()
    }
}

impl GridMenu for MultiMenu {
    /// Bind `item` at flat `index`, adding pages as needed. Writes to a
    /// control slot are refused.
    fn set_item(&self, index: usize, item: Option<Item>) -> &Self {
        let size = self.page_size();
        let (page, local) = (index / size, index % size);
        if self.is_reserved(local) {
            log::warn!(
                "paged menu \"{}\": slot {local} of page {page} holds a page control",
                self.inner.config.title
            );
            return self;
        }
        let max_pages = self.inner.config.max_pages;
        if page >= max_pages {
            log::warn!(
                "paged menu \"{}\": slot {index} needs page {page}, past the limit of {max_pages}",
                self.inner.config.title
            );
            return self;
        }
        if page >= self.page_count() {
            while self.page_count() <= page {
                if let Err(err) = self.push_page() {
                    log::warn!("paged menu \"{}\": {err}", self.inner.config.title);
                    return self;
                }
            }
            self.refresh_controls();
        }
        if let Some(menu) = self.page(page) {
            menu.set_item(local, item);
        }
        self
    }

    fn item_at(&self, index: usize) -> Option<Item> {
        let size = self.page_size();
        self.page(index / size)?.item_at(index % size)
    }

    /// Show the active page.
    fn show_to(&self, actors: &[ActorId]) {
        self.active_page().show_to(actors);
    }
}

impl fmt::Debug for MultiMenu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiMenu")
            .field("title", &self.inner.config.title)
            .field("page_size", &self.page_size())
            .field("pages", &self.page_count())
            .field("active", &self.active_index())
            .finish()
    }
}

/// A non-owning [`MultiMenu`] handle.
#[derive(Clone, Debug)]
pub struct WeakMultiMenu {
    inner: Weak<Inner>,
}

impl WeakMultiMenu {
    pub fn upgrade(&self) -> Option<MultiMenu> {
        self.inner.upgrade().map(|inner| MultiMenu { inner })
    }
}

impl MultiMenu {
    pub fn downgrade(&self) -> WeakMultiMenu {
        WeakMultiMenu {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmenu_core::{ClickKind, LocalHost};

    const ALICE: ActorId = ActorId(1);

    fn multi(local: &LocalHost, size: usize, pages: usize) -> MultiMenu {
        MultiMenu::create(&local.host(), MultiMenuConfig::new("&9Atlas", size).with_pages(pages))
            .unwrap()
    }

    fn glyph_item(glyph: char) -> Item {
        Item::decoration(Icon::new(glyph, ""))
    }

    fn control_glyph(local: &LocalHost, page: &Menu, slot: usize) -> Option<char> {
        local
            .surface(page.surface_id())
            .and_then(|s| s.at(slot))
            .map(|i| i.glyph)
    }

    #[test]
    fn create_validates() {
        let local = LocalHost::new();
        let host = local.host();
        assert_eq!(
            MultiMenu::create(&host, MultiMenuConfig::new("x", 20)).unwrap_err(),
            MenuError::InvalidSize(20)
        );
        assert_eq!(
            MultiMenu::create(&host, MultiMenuConfig::new("x", 9).with_pages(0)).unwrap_err(),
            MenuError::NoPages
        );
        let m = multi(&local, 27, 3);
        assert_eq!(m.page_count(), 3);
        assert_eq!(local.bus().len(), 3);
        assert_eq!(m.active_index(), 0);
    }

    #[test]
    fn flat_index_resolves_page_and_slot() {
        let local = LocalHost::new();
        let m = multi(&local, 9, 3);
        m.set_item(19, Some(glyph_item('s')));
        let page = m.page(2).unwrap();
        assert_eq!(page.item_at(1).map(|i| i.icon().glyph), Some('s'));
        assert_eq!(m.item_at(19).map(|i| i.icon().glyph), Some('s'));
        assert!(m.page(0).unwrap().item_at(1).is_none());
        assert!(m.item_at(99).is_none());
    }

    #[test]
    fn controls_reflect_bounds() {
        let local = LocalHost::new();
        let m = multi(&local, 18, 3);
        let b = PageButtons::default();
        let pages = m.pages();
        assert_eq!(control_glyph(&local, &pages[0], 9), Some(b.previous_disabled.glyph));
        assert_eq!(control_glyph(&local, &pages[0], 17), Some(b.next.glyph));
        assert_eq!(control_glyph(&local, &pages[1], 9), Some(b.previous.glyph));
        assert_eq!(control_glyph(&local, &pages[2], 17), Some(b.next_disabled.glyph));
    }

    #[test]
    fn reserved_slots_are_refused() {
        let local = LocalHost::new();
        let m = multi(&local, 9, 1);
        let before = m.item_at(8).unwrap();
        m.set_item(8, Some(glyph_item('x')));
        m.set_item(0, None);
        assert!(m.item_at(8).unwrap().ptr_eq(&before));
        assert!(m.item_at(0).is_some());
    }

    #[test]
    fn next_control_switches_page_in_place() {
        let local = LocalHost::new();
        let parent = Menu::create(&local.host(), MenuConfig::new("hub", 9)).unwrap();
        let m = multi(&local, 27, 2);
        m.set_parent(Some(&parent)).set_sticky(true);
        m.show_to(&[ALICE]);

        let ev = local.click(ALICE, m.next_slot(), ClickKind::Left).unwrap();
        assert!(ev.is_cancelled());
        assert_eq!(m.active_index(), 1);
        assert_eq!(local.view_of(ALICE), Some(m.page(1).unwrap().surface_id()));
        assert_eq!(local.scheduler().pending(), 0);
        assert_eq!(local.take_cues(), vec![(ALICE, Cue::Accept)]);

        local.advance(REOPEN_DELAY * 2);
        assert_eq!(local.view_of(ALICE), Some(m.page(1).unwrap().surface_id()));

        // A real close still goes back to the parent.
        local.close(ALICE);
        local.advance(REOPEN_DELAY);
        assert_eq!(local.view_of(ALICE), Some(parent.surface_id()));
        assert_eq!(local.reentrant_opens(), 0);
    }

    #[test]
    fn turning_past_bounds_is_denied() {
        let local = LocalHost::new();
        let m = multi(&local, 9, 2);
        m.show_to(&[ALICE]);
        let first = m.page(0).unwrap().surface_id();

        local.click(ALICE, m.previous_slot(), ClickKind::Left);
        assert_eq!(m.active_index(), 0);
        assert_eq!(local.view_of(ALICE), Some(first));
        assert_eq!(local.take_cues(), vec![(ALICE, Cue::Deny)]);

        assert!(m.next_page(ALICE));
        assert!(!m.next_page(ALICE));
        assert_eq!(m.active_index(), 1);
        assert!(m.previous_page(ALICE));
        assert_eq!(local.view_of(ALICE), Some(first));
        assert!(!m.show_page(7, ALICE));
    }

    #[test]
    fn writing_past_last_page_grows() {
        let local = LocalHost::new();
        let parent = Menu::create(&local.host(), MenuConfig::new("hub", 9)).unwrap();
        let m = multi(&local, 9, 1);
        m.set_parent(Some(&parent));
        let b = PageButtons::default();
        assert_eq!(control_glyph(&local, &m.page(0).unwrap(), 8), Some(b.next_disabled.glyph));

        m.set_item(30, Some(glyph_item('g')));
        assert_eq!(m.page_count(), 4);
        assert_eq!(m.item_at(30).map(|i| i.icon().glyph), Some('g'));
        assert_eq!(control_glyph(&local, &m.page(0).unwrap(), 8), Some(b.next.glyph));
        assert!(m.page(3).unwrap().parent().unwrap().ptr_eq(&parent));

        let added = m.add_page().unwrap();
        assert_eq!(m.page_count(), 5);
        assert_eq!(control_glyph(&local, &added, 8), Some(b.next_disabled.glyph));
    }

    #[test]
    fn controls_work_after_handle_is_dropped() {
        let local = LocalHost::new();
        let (first, second) = {
            let m = multi(&local, 9, 2);
            m.show_to(&[ALICE]);
            (m.page(0).unwrap().surface_id(), m.page(1).unwrap().surface_id())
        };
        assert_eq!(local.bus().len(), 2);

        local.click(ALICE, 8, ClickKind::Left);
        assert_eq!(local.view_of(ALICE), Some(second));
        assert_eq!(local.take_cues(), vec![(ALICE, Cue::Accept)]);

        local.click(ALICE, 0, ClickKind::Left);
        assert_eq!(local.view_of(ALICE), Some(first));
        local.click(ALICE, 0, ClickKind::Left);
        assert_eq!(local.take_cues(), vec![(ALICE, Cue::Accept), (ALICE, Cue::Deny)]);
    }

    #[test]
    fn page_count_is_capped() {
        let local = LocalHost::new();
        let host = local.host();
        let mut config = MultiMenuConfig::new("capped", 9).with_pages(3);
        config.max_pages = 2;
        assert_eq!(
            MultiMenu::create(&host, config.clone()).unwrap_err(),
            MenuError::TooManyPages(2)
        );

        config.pages = 1;
        let m = MultiMenu::create(&host, config).unwrap();
        m.set_item(usize::MAX / 2, Some(glyph_item('!')));
        assert_eq!(m.page_count(), 1);
        m.set_item(13, Some(glyph_item('b')));
        assert_eq!(m.page_count(), 2);
        assert_eq!(m.add_page().unwrap_err(), MenuError::TooManyPages(2));
        m.set_item(20, Some(glyph_item('c')));
        assert_eq!(m.page_count(), 2);
        assert!(m.item_at(20).is_none());
    }

    #[test]
    fn disposed_menu_does_not_grow() {
        let local = LocalHost::new();
        let m = multi(&local, 9, 1);
        m.dispose();
        assert_eq!(m.add_page().unwrap_err(), MenuError::Disposed);
        m.set_item(12, Some(glyph_item('d')));
        assert_eq!(m.page_count(), 1);
        assert!(m.item_at(8).unwrap().is_decoration());
    }

    #[test]
    fn dispose_releases_every_page() {
        let local = LocalHost::new();
        let m = multi(&local, 9, 3);
        assert!(m.dispose());
        assert!(local.bus().is_empty());
        assert!(!m.dispose());
        let weak = m.downgrade();
        drop(m);
        assert!(weak.upgrade().is_none());
    }
}
