use std::fmt;
use std::rc::Rc;

use slotmenu_core::{ActorId, ClickKind, Icon};

/// Callback run when an actor interacts with an item.
pub type Action = dyn Fn(ActorId, ClickKind);

/// An icon paired with the behaviour bound to it.
///
/// Items are immutable and cheap to clone; one item may sit in any number
/// of slots, pages and menus at once.
#[derive(Clone)]
pub struct Item {
    icon: Rc<Icon>,
    action: Option<Rc<Action>>,
}

impl Item {
    /// An item running `action` on interaction.
    pub fn new<F>(icon: Icon, action: F) -> Self
    where
        F: Fn(ActorId, ClickKind) + 'static,
    {
        Self {
            icon: Rc::new(icon),
            action: Some(Rc::new(action)),
        }
    }

    /// An item with no behaviour, used for borders and filler.
    pub fn decoration(icon: Icon) -> Self {
        Self {
            icon: Rc::new(icon),
            action: None,
        }
    }

    /// Convenience: an item from a glyph, an `&`-formatted name and lore
    /// lines.
    pub fn labelled<F, I, S>(glyph: char, name: &str, lore: I, action: F) -> Self
    where
        F: Fn(ActorId, ClickKind) + 'static,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(Icon::new(glyph, name).with_lore(lore), action)
    }

    pub fn icon(&self) -> &Icon {
        &self.icon
    }

    /// Whether interacting with the item runs anything.
    pub fn is_decoration(&self) -> bool {
        self.action.is_none()
    }

    /// Run the bound action, if any.
    pub fn interact(&self, actor: ActorId, kind: ClickKind) {
        if let Some(action) = &self.action {
            action(actor, kind);
        }
    }

    /// Whether both handles refer to the same item.
    pub fn ptr_eq(&self, other: &Item) -> bool {
        Rc::ptr_eq(&self.icon, &other.icon)
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("glyph", &self.icon.glyph)
            .field("name", &self.icon.name.content())
            .field("decoration", &self.is_decoration())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn interact_runs_action() {
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let item = Item::labelled('!', "&aGo", ["&7lore"], move |actor, kind| {
            assert_eq!(actor, ActorId(4));
            assert_eq!(kind, ClickKind::Right);
            h.set(h.get() + 1);
        });
        item.interact(ActorId(4), ClickKind::Right);
        assert_eq!(hits.get(), 1);
        assert!(!item.is_decoration());
        assert_eq!(item.icon().name.content(), "Go");
    }

    #[test]
    fn clones_share_identity() {
        let a = Item::decoration(Icon::new('#', ""));
        let b = a.clone();
        let c = Item::decoration(Icon::new('#', ""));
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
        a.interact(ActorId(1), ClickKind::Left);
        assert!(a.is_decoration());
    }
}
