//! Slot menus: single menus with parent and sticky reopen, paged menus
//! and scrolling menus over a virtual slot space.

mod error;
mod item;
mod menu;
mod multi;
mod scrolling;

pub use error::MenuError;
pub use item::{Action, Item};
pub use menu::{GridMenu, Menu, MenuConfig, MenuGuard, REOPEN_DELAY, WeakMenu};
pub use multi::{MAX_PAGES, MultiMenu, MultiMenuConfig, PageButtons, WeakMultiMenu};
pub use scrolling::{
    SCROLL_DOWN_SLOT, SCROLL_UP_SLOT, SCROLLING_SIZE, ScrollButtons, ScrollDirection,
    ScrollingMenu, ScrollingMenuConfig, VIEW_ROWS, WeakScrollingMenu,
};
