use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use slotmenu_core::geom::row_slots;
use slotmenu_core::{
    ActorId, Color, Cue, Host, Icon, ROW_WIDTH, SlotPos, Style, SurfaceId, slot_index,
};

use crate::menu::REOPEN_DELAY;
use crate::{GridMenu, Item, Menu, MenuConfig, MenuError, WeakMenu};

/// Slot count of every scrolling menu: six rows.
pub const SCROLLING_SIZE: usize = 54;

/// Rows of the virtual window shown between the two control rows.
pub const VIEW_ROWS: usize = 4;

const TOP_ROW: usize = 0;
const BOTTOM_ROW: usize = 5;
/// Slot of the scroll-up control, top-left.
pub const SCROLL_UP_SLOT: usize = slot_index(0, TOP_ROW);
/// Slot of the scroll-down control, bottom-left.
pub const SCROLL_DOWN_SLOT: usize = slot_index(0, BOTTOM_ROW);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Icons for the two scroll controls, in their enabled and disabled
/// variants.
#[derive(Debug, Clone)]
pub struct ScrollButtons {
    pub up: Icon,
    pub up_disabled: Icon,
    pub down: Icon,
    pub down_disabled: Icon,
}

impl ScrollButtons {
    fn icon(&self, direction: ScrollDirection, enabled: bool) -> Icon {
        match (direction, enabled) {
            (ScrollDirection::Up, true) => self.up.clone(),
            (ScrollDirection::Up, false) => self.up_disabled.clone(),
            (ScrollDirection::Down, true) => self.down.clone(),
            (ScrollDirection::Down, false) => self.down_disabled.clone(),
        }
    }
}

impl Default for ScrollButtons {
    fn default() -> Self {
        let on = Style::default().with_fg(Color::GOLD);
        let off = Style::default().with_fg(Color::DARK_GRAY);
        Self {
            up: Icon::new('▲', "&6Scroll up").with_style(on),
            up_disabled: Icon::new('△', "&8Cannot scroll up!").with_style(off),
            down: Icon::new('▼', "&6Scroll down").with_style(on),
            down_disabled: Icon::new('▽', "&8Cannot scroll down!").with_style(off),
        }
    }
}

/// Configuration for a [`ScrollingMenu`].
#[derive(Debug, Clone)]
pub struct ScrollingMenuConfig {
    /// Title, with `&` formatting codes.
    pub title: String,
    /// Filler for the two control rows.
    pub border: Icon,
    pub buttons: ScrollButtons,
    pub reopen_delay: u32,
}

impl ScrollingMenuConfig {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }
}

impl Default for ScrollingMenuConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            border: Icon::new('░', " ").with_style(Style::default().with_fg(Color::GRAY)),
            buttons: ScrollButtons::default(),
            reopen_delay: REOPEN_DELAY,
        }
    }
}

// ---------------------------------------------------------------------------
// ScrollingMenu
// ---------------------------------------------------------------------------

/// A six-row menu over an unbounded virtual item space.
///
/// Rows 0 and 5 hold the border and the scroll controls; rows 1 to 4 show
/// four rows of the virtual space starting at the current row offset.
/// [`set_item`](GridMenu::set_item) only records items in the virtual space:
/// nothing reaches the surface until [`flush`](Self::flush).
///
/// The offset is shared by every viewer, so one viewer scrolling scrolls
/// everyone.
#[derive(Clone)]
pub struct ScrollingMenu {
    menu: Menu,
    window: Rc<RefCell<Window>>,
}

struct Window {
    items: BTreeMap<usize, Item>,
    offset: usize,
    border: Item,
    buttons: ScrollButtons,
}

impl Window {
    /// One past the last virtual row holding an item, 0 when empty.
    fn highest_row(&self) -> usize {
        self.items
            .last_key_value()
            .map_or(0, |(index, _)| index / ROW_WIDTH + 1)
    }

    fn can_scroll(&self, direction: ScrollDirection) -> bool {
        match direction {
            ScrollDirection::Up => self.offset > 0,
            ScrollDirection::Down => self.offset < self.highest_row(),
        }
    }
}

impl ScrollingMenu {
    /// Create a scrolling menu, subscribe it, and render it once.
    pub fn create(host: &Host, config: ScrollingMenuConfig) -> Result<Self, MenuError> {
        let menu = Menu::create(
            host,
            MenuConfig {
                title: config.title,
                size: SCROLLING_SIZE,
                sticky: false,
                reopen_delay: config.reopen_delay,
            },
        )?;
        let window = Window {
            items: BTreeMap::new(),
            offset: 0,
            border: Item::decoration(config.border),
            buttons: config.buttons,
        };
        let scrolling = Self {
            menu,
            window: Rc::new(RefCell::new(window)),
        };
        scrolling.flush();
        Ok(scrolling)
    }

    /// The underlying menu handling this surface's events.
    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.menu.surface_id()
    }

    pub fn set_parent(&self, parent: Option<&Menu>) -> &Self {
        self.menu.set_parent(parent);
        self
    }

    pub fn set_sticky(&self, sticky: bool) -> &Self {
        self.menu.set_sticky(sticky);
        self
    }

    pub fn dispose(&self) -> bool {
        self.menu.dispose()
    }

    /// Replace the control-row filler. Shown from the next flush.
    pub fn set_border(&self, border: Icon) -> &Self {
        self.window.borrow_mut().border = Item::decoration(border);
        self
    }

    /// First virtual row shown in the window.
    pub fn offset_rows(&self) -> usize {
        self.window.borrow().offset
    }

    /// One past the last virtual row holding an item; the largest offset
    /// scrolling down can reach.
    pub fn highest_row(&self) -> usize {
        self.window.borrow().highest_row()
    }

    pub fn can_scroll(&self, direction: ScrollDirection) -> bool {
        self.window.borrow().can_scroll(direction)
    }

    /// Scroll one row down without feedback.
    pub fn scroll_down(&self) -> bool {
        self.scroll(ScrollDirection::Down, None)
    }

    /// Scroll one row up without feedback.
    pub fn scroll_up(&self) -> bool {
        self.scroll(ScrollDirection::Up, None)
    }

    /// Scroll one row down on behalf of `actor`, cueing the outcome.
    pub fn scroll_down_for(&self, actor: ActorId) -> bool {
        self.scroll(ScrollDirection::Down, Some(actor))
    }

    /// Scroll one row up on behalf of `actor`, cueing the outcome.
    pub fn scroll_up_for(&self, actor: ActorId) -> bool {
        self.scroll(ScrollDirection::Up, Some(actor))
    }

    /// Move the window one row and re-render. At a bound nothing changes
    /// and `actor`, if given, gets a deny cue. Returns whether it moved.
    pub fn scroll(&self, direction: ScrollDirection, actor: Option<ActorId>) -> bool {
        {
            let mut window = self.window.borrow_mut();
            if !window.can_scroll(direction) {
                drop(window);
                log::trace!("{}: cannot scroll {direction:?}", self.menu.surface_id());
                self.menu.host().cue(actor, Cue::Deny);
                return false;
            }
            match direction {
                ScrollDirection::Up => window.offset -= 1,
                ScrollDirection::Down => window.offset += 1,
            }
            log::debug!(
                "{}: scrolled {direction:?} to row {}",
                self.menu.surface_id(),
                window.offset
            );
        }
        self.flush();
        self.menu.host().cue(actor, Cue::Accept);
        true
    }

    /// Project the virtual window onto the surface and repaint both control
    /// rows.
    pub fn flush(&self) {
        let (border, window_items, up, down) = {
            let mut window = self.window.borrow_mut();
            let highest = window.highest_row();
            if window.offset > highest {
                window.offset = highest;
            }
            let base = window.offset * ROW_WIDTH;
            let window_items: Vec<(usize, Option<Item>)> = (row_slots(1).start
                ..row_slots(VIEW_ROWS).end)
                .map(|slot| {
                    let pos = SlotPos::from_index(slot);
                    let virtual_index = (pos.z - 1) * ROW_WIDTH + pos.x + base;
                    (slot, window.items.get(&virtual_index).cloned())
                })
                .collect();
            let up = window.can_scroll(ScrollDirection::Up);
            let down = window.can_scroll(ScrollDirection::Down);
            (window.border.clone(), window_items, up, down)
        };

        for slot in row_slots(TOP_ROW).chain(row_slots(BOTTOM_ROW)) {
            self.menu.set_item(slot, Some(border.clone()));
        }
        for (slot, item) in window_items {
            self.menu.set_item(slot, item);
        }
        self.menu
            .set_item(SCROLL_UP_SLOT, Some(self.button(ScrollDirection::Up, up)))
            .set_item(SCROLL_DOWN_SLOT, Some(self.button(ScrollDirection::Down, down)));
    }

    pub fn downgrade(&self) -> WeakScrollingMenu {
        WeakScrollingMenu {
            menu: self.menu.downgrade(),
            window: Rc::downgrade(&self.window),
        }
    }

    /// A control bound into the menu's own slots. It owns the window and
    /// refers to the menu weakly: the subscription keeps the menu alive, and
    /// the menu's slots keep the window alive.
    fn button(&self, direction: ScrollDirection, enabled: bool) -> Item {
        let icon = self.window.borrow().buttons.icon(direction, enabled);
        let menu = self.menu.downgrade();
        let window = self.window.clone();
        Item::new(icon, move |actor, _| {
            if let Some(menu) = menu.upgrade() {
                let scrolling = ScrollingMenu {
                    menu,
                    window: window.clone(),
                };
                scrolling.scroll(direction, Some(actor));
            }
        })
    }
}

impl GridMenu for ScrollingMenu {
    /// Record `item` at a virtual index. Call [`flush`](ScrollingMenu::flush)
    /// to show it.
    fn set_item(&self, index: usize, item: Option<Item>) -> &Self {
        let mut window = self.window.borrow_mut();
        match item {
            Some(item) => window.items.insert(index, item),
            None => window.items.remove(&index),
        };
        self
    }

    /// Item at a virtual index.
    fn item_at(&self, index: usize) -> Option<Item> {
        self.window.borrow().items.get(&index).cloned()
    }

    fn show_to(&self, actors: &[ActorId]) {
        self.menu.show_to(actors);
    }
}

impl fmt::Debug for ScrollingMenu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let window = self.window.borrow();
        f.debug_struct("ScrollingMenu")
            .field("menu", &self.menu)
            .field("virtual_items", &window.items.len())
            .field("offset", &window.offset)
            .finish()
    }
}

/// A non-owning [`ScrollingMenu`] handle.
#[derive(Clone, Debug)]
pub struct WeakScrollingMenu {
    menu: WeakMenu,
    window: Weak<RefCell<Window>>,
}

impl WeakScrollingMenu {
    pub fn upgrade(&self) -> Option<ScrollingMenu> {
        Some(ScrollingMenu {
            menu: self.menu.upgrade()?,
            window: self.window.upgrade()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmenu_core::{ClickKind, LocalHost, LocalSurface, Surface};

    const ALICE: ActorId = ActorId(1);

    fn scrolling(local: &LocalHost) -> ScrollingMenu {
        ScrollingMenu::create(&local.host(), ScrollingMenuConfig::new("&bCatalogue")).unwrap()
    }

    fn glyph_item(glyph: char) -> Item {
        Item::decoration(Icon::new(glyph, ""))
    }

    fn surface(local: &LocalHost, menu: &ScrollingMenu) -> Rc<LocalSurface> {
        local.surface(menu.surface_id()).unwrap()
    }

    fn row_glyphs(surface: &LocalSurface, z: usize) -> Vec<Option<char>> {
        surface
            .slots()
            .row(z)
            .into_iter()
            .map(|s| s.map(|i| i.glyph))
            .collect()
    }

    fn assert_control_rows(surface: &LocalSurface, up: bool, down: bool) {
        let buttons = ScrollButtons::default();
        for z in [TOP_ROW, BOTTOM_ROW] {
            for x in 1..ROW_WIDTH {
                assert_eq!(surface.at(slot_index(x, z)).map(|i| i.glyph), Some('░'));
            }
        }
        let up_icon = buttons.icon(ScrollDirection::Up, up);
        let down_icon = buttons.icon(ScrollDirection::Down, down);
        assert_eq!(surface.at(SCROLL_UP_SLOT), Some(up_icon));
        assert_eq!(surface.at(SCROLL_DOWN_SLOT), Some(down_icon));
    }

    #[test]
    fn create_renders_empty_window() {
        let local = LocalHost::new();
        let m = scrolling(&local);
        let s = surface(&local, &m);
        assert_eq!(s.size(), SCROLLING_SIZE);
        assert_eq!(m.highest_row(), 0);
        assert!(!m.can_scroll(ScrollDirection::Up));
        assert!(!m.can_scroll(ScrollDirection::Down));
        assert_control_rows(&s, false, false);
        for z in 1..=VIEW_ROWS {
            assert!(row_glyphs(&s, z).iter().all(Option::is_none));
        }
    }

    #[test]
    fn set_item_waits_for_flush() {
        let local = LocalHost::new();
        let m = scrolling(&local);
        let s = surface(&local, &m);
        let writes = s.slots().writes();
        m.set_item(0, Some(glyph_item('a')));
        assert_eq!(s.slots().writes(), writes);
        assert_eq!(s.at(slot_index(0, 1)), None);
        assert_eq!(m.item_at(0).map(|i| i.icon().glyph), Some('a'));

        m.flush();
        assert_eq!(s.at(slot_index(0, 1)).map(|i| i.glyph), Some('a'));
    }

    #[test]
    fn two_row_scenario() {
        let local = LocalHost::new();
        let m = scrolling(&local);
        let s = surface(&local, &m);
        for i in 0..9 {
            m.set_item(i, Some(glyph_item('a')));
        }
        for i in 27..36 {
            m.set_item(i, Some(glyph_item('d')));
        }
        assert_eq!(m.highest_row(), 4);
        m.flush();

        assert_eq!(row_glyphs(&s, 1), vec![Some('a'); 9]);
        assert_eq!(row_glyphs(&s, 2), vec![None; 9]);
        assert_eq!(row_glyphs(&s, 3), vec![None; 9]);
        assert_eq!(row_glyphs(&s, 4), vec![Some('d'); 9]);
        assert_control_rows(&s, false, true);

        assert!(m.scroll_down());
        assert_eq!(m.offset_rows(), 1);
        assert_eq!(row_glyphs(&s, 1), vec![None; 9]);
        assert_eq!(row_glyphs(&s, 2), vec![None; 9]);
        assert_eq!(row_glyphs(&s, 3), vec![Some('d'); 9]);
        assert_control_rows(&s, true, true);

        assert!(m.scroll_down());
        assert!(m.scroll_down());
        assert!(m.can_scroll(ScrollDirection::Down));
        assert!(m.scroll_down());
        assert_eq!(m.offset_rows(), 4);
        assert!(!m.can_scroll(ScrollDirection::Down));
        assert_control_rows(&s, true, false);
    }

    #[test]
    fn scrolling_at_bound_changes_nothing() {
        let local = LocalHost::new();
        let m = scrolling(&local);
        let s = surface(&local, &m);
        m.set_item(9, Some(glyph_item('a')));
        m.flush();
        assert!(m.scroll_down());
        assert!(m.scroll_down());
        assert_eq!(m.offset_rows(), m.highest_row());

        let writes = s.slots().writes();
        assert!(!m.scroll_down());
        assert_eq!(m.offset_rows(), 2);
        assert_eq!(s.slots().writes(), writes);

        assert!(m.scroll_up());
        assert!(m.scroll_up());
        assert!(!m.scroll_up());
        assert_eq!(m.offset_rows(), 0);
    }

    #[test]
    fn can_scroll_matches_offset_for_reachable_states() {
        let local = LocalHost::new();
        let m = scrolling(&local);
        for i in (0..80).step_by(7) {
            m.set_item(i, Some(glyph_item('x')));
        }
        m.flush();
        let check = |m: &ScrollingMenu| {
            assert_eq!(m.can_scroll(ScrollDirection::Up), m.offset_rows() > 0);
            assert_eq!(
                m.can_scroll(ScrollDirection::Down),
                m.offset_rows() < m.highest_row()
            );
        };
        check(&m);
        while m.scroll_down() {
            check(&m);
        }
        while m.scroll_up() {
            check(&m);
        }
        check(&m);
    }

    #[test]
    fn flush_repaints_control_rows() {
        let local = LocalHost::new();
        let m = scrolling(&local);
        let s = surface(&local, &m);
        m.menu().set_item(3, None).set_item(SCROLL_DOWN_SLOT, Some(glyph_item('!')));
        m.flush();
        assert_control_rows(&s, false, false);

        m.set_border(Icon::new('=', ""));
        m.flush();
        assert_eq!(s.at(slot_index(4, TOP_ROW)).map(|i| i.glyph), Some('='));
        assert_eq!(s.at(slot_index(8, BOTTOM_ROW)).map(|i| i.glyph), Some('='));
    }

    #[test]
    fn buttons_scroll_with_feedback() {
        let local = LocalHost::new();
        let m = scrolling(&local);
        m.set_item(40, Some(glyph_item('z')));
        m.flush();
        m.show_to(&[ALICE]);

        let ev = local.click(ALICE, SCROLL_DOWN_SLOT, ClickKind::Left).unwrap();
        assert!(ev.is_cancelled());
        assert_eq!(m.offset_rows(), 1);
        assert_eq!(local.take_cues(), vec![(ALICE, Cue::Accept)]);

        local.click(ALICE, SCROLL_UP_SLOT, ClickKind::Left);
        local.click(ALICE, SCROLL_UP_SLOT, ClickKind::Left);
        assert_eq!(m.offset_rows(), 0);
        assert_eq!(local.take_cues(), vec![(ALICE, Cue::Accept), (ALICE, Cue::Deny)]);
    }

    #[test]
    fn programmatic_scroll_is_silent() {
        let local = LocalHost::new();
        let m = scrolling(&local);
        assert!(!m.scroll_down());
        m.set_item(20, Some(glyph_item('q')));
        assert!(m.scroll_down());
        assert!(local.cues().is_empty());
    }

    #[test]
    fn window_items_are_clickable() {
        let local = LocalHost::new();
        let m = scrolling(&local);
        let hits = Rc::new(RefCell::new(Vec::new()));
        let h = hits.clone();
        m.set_item(
            12,
            Some(Item::new(Icon::new('$', "buy"), move |actor, _| {
                h.borrow_mut().push(actor)
            })),
        );
        m.flush();
        m.show_to(&[ALICE]);
        // virtual 12 is row 1, column 3: physical row 2
        local.click(ALICE, slot_index(3, 2), ClickKind::Left);
        assert_eq!(*hits.borrow(), vec![ALICE]);

        m.scroll_down();
        local.click(ALICE, slot_index(3, 1), ClickKind::Left);
        assert_eq!(hits.borrow().len(), 2);
    }

    #[test]
    fn flush_clamps_offset_after_removal() {
        let local = LocalHost::new();
        let m = scrolling(&local);
        m.set_item(50, Some(glyph_item('x')));
        m.scroll_down();
        m.scroll_down();
        m.scroll_down();
        assert_eq!(m.offset_rows(), 3);
        m.set_item(50, None);
        m.set_item(4, Some(glyph_item('y')));
        m.flush();
        assert_eq!(m.highest_row(), 1);
        assert_eq!(m.offset_rows(), 1);
        assert!(!m.can_scroll(ScrollDirection::Down));
    }

    #[test]
    fn buttons_work_after_handle_is_dropped() {
        let local = LocalHost::new();
        let id = {
            let m = scrolling(&local);
            m.set_item(40, Some(glyph_item('z')));
            m.flush();
            m.show_to(&[ALICE]);
            m.surface_id()
        };
        assert_eq!(local.bus().len(), 1);

        let ev = local.click(ALICE, SCROLL_DOWN_SLOT, ClickKind::Left).unwrap();
        assert!(ev.is_cancelled());
        assert_eq!(local.take_cues(), vec![(ALICE, Cue::Accept)]);
        let s = local.surface(id).unwrap();
        // Item 40 is on virtual row 4, shown on physical row 4 at offset 1.
        assert_eq!(s.at(slot_index(4, 4)).map(|i| i.glyph), Some('z'));
        assert_eq!(
            s.at(SCROLL_UP_SLOT),
            Some(ScrollButtons::default().icon(ScrollDirection::Up, true))
        );

        local.click(ALICE, SCROLL_UP_SLOT, ClickKind::Left);
        assert_eq!(local.take_cues(), vec![(ALICE, Cue::Accept)]);
        assert_eq!(s.at(slot_index(4, 4)), None);
    }

    #[test]
    fn weak_handle_follows_subscription() {
        let local = LocalHost::new();
        let weak = {
            let m = scrolling(&local);
            m.set_item(3, Some(glyph_item('k')));
            m.downgrade()
        };
        let m = weak.upgrade().unwrap();
        assert_eq!(m.item_at(3).map(|i| i.icon().glyph), Some('k'));
        m.dispose();
        drop(m);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn buttons_hold_menu_weakly() {
        let local = LocalHost::new();
        let weak = {
            let m = scrolling(&local);
            m.dispose();
            m.downgrade()
        };
        assert!(weak.upgrade().is_none());
    }
}
