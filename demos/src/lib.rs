//! A small menu hub shared by the demo binaries.
//!
//! Demonstrates: a hub menu linking to the other menus, a sticky reward
//! menu, a scrolling catalogue and a paged atlas, all wired with the hub
//! as their parent.

pub mod render;

use std::cell::Cell;
use std::rc::Rc;

use slotmenu_core::{Color, Host, Icon, Style};
use slotmenu_ui::{
    GridMenu, Item, Menu, MenuConfig, MenuError, MultiMenu, MultiMenuConfig, ScrollingMenu,
    ScrollingMenuConfig,
};

pub const HUB_SIZE: usize = 27;
pub const CATALOGUE_SLOT: usize = 10;
pub const ATLAS_SLOT: usize = 13;
pub const REWARD_SLOT: usize = 16;
pub const CLAIM_SLOT: usize = 4;

const CATALOGUE_ENTRIES: usize = 40;
const ATLAS_REGIONS: usize = 30;
const ATLAS_PAGE_SIZE: usize = 18;

const WARES: &[(char, &str)] = &[
    ('⚔', "&fSword"),
    ('◘', "&7Shield"),
    ('⛏', "&ePickaxe"),
    ('➶', "&6Bow"),
    ('✦', "&bGem"),
    ('☕', "&6Potion"),
    ('⚗', "&dElixir"),
    ('❄', "&bFrost rune"),
];

// ---------------------------------------------------------------------------
// Showcase
// ---------------------------------------------------------------------------

/// Every menu of the demo, built against one host.
pub struct Showcase {
    pub hub: Menu,
    pub reward: Menu,
    pub catalogue: ScrollingMenu,
    pub atlas: MultiMenu,
    claimed: Rc<Cell<u32>>,
}

impl Showcase {
    pub fn build(host: &Host) -> Result<Self, MenuError> {
        let hub = Menu::create(host, MenuConfig::new("&8&lHub", HUB_SIZE))?;
        let reward = Menu::create(host, MenuConfig::new("&aDaily reward", 9).sticky(true))?;
        let catalogue = build_catalogue(host)?;
        let atlas = build_atlas(host)?;
        catalogue.set_parent(Some(&hub));
        atlas.set_parent(Some(&hub));

        let claimed = Rc::new(Cell::new(0));
        let counter = claimed.clone();
        reward.set_item(
            CLAIM_SLOT,
            Some(Item::labelled('★', "&e&lClaim", ["&7Once per day"], move |actor, _| {
                counter.set(counter.get() + 1);
                log::info!("{actor} claimed the daily reward");
            })),
        );

        let filler = Item::decoration(
            Icon::new('▒', "").with_style(Style::default().with_fg(Color::DARK_GRAY)),
        );
        for slot in 0..HUB_SIZE {
            hub.set_item(slot, Some(filler.clone()));
        }
        let to_catalogue = catalogue.clone();
        let to_atlas = atlas.clone();
        let to_reward = reward.clone();
        hub.set_item(
            CATALOGUE_SLOT,
            Some(Item::labelled('☰', "&6Catalogue", ["&7Browse wares"], move |actor, _| {
                to_catalogue.show_to(&[actor]);
            })),
        )
        .set_item(
            ATLAS_SLOT,
            Some(Item::labelled('✈', "&9Atlas", ["&7Pick a region"], move |actor, _| {
                to_atlas.show_to(&[actor]);
            })),
        )
        .set_item(
            REWARD_SLOT,
            Some(Item::labelled('✉', "&aReward", ["&7Stays open until claimed"], move |actor, _| {
                to_reward.set_sticky(true);
                to_reward.show_to(&[actor]);
            })),
        );

        Ok(Self {
            hub,
            reward,
            catalogue,
            atlas,
            claimed,
        })
    }

    /// Times the daily reward has been claimed.
    pub fn claimed(&self) -> u32 {
        self.claimed.get()
    }

    pub fn dispose(&self) {
        self.hub.dispose();
        self.reward.dispose();
        self.catalogue.dispose();
        self.atlas.dispose();
    }
}

fn build_catalogue(host: &Host) -> Result<ScrollingMenu, MenuError> {
    let catalogue = ScrollingMenu::create(host, ScrollingMenuConfig::new("&6Catalogue"))?;
    for i in 0..CATALOGUE_ENTRIES {
        let (glyph, name) = WARES[i % WARES.len()];
        let price = 5 + i * 3;
        let label = format!("{name} &7#{i}");
        catalogue.set_item(
            i,
            Some(Item::labelled(glyph, &label, [format!("&ePrice: {price}")], move |actor, _| {
                log::info!("{actor} bought ware #{i} for {price}");
            })),
        );
    }
    catalogue.flush();
    Ok(catalogue)
}

fn build_atlas(host: &Host) -> Result<MultiMenu, MenuError> {
    let atlas = MultiMenu::create(host, MultiMenuConfig::new("&9Atlas", ATLAS_PAGE_SIZE))?;
    let reserved = [atlas.previous_slot(), atlas.next_slot()];
    (0usize..)
        .filter(|index| !reserved.contains(&(index % ATLAS_PAGE_SIZE)))
        .take(ATLAS_REGIONS)
        .enumerate()
        .for_each(|(region, index)| {
            let name = format!("&bRegion {}", region + 1);
            atlas.set_item(
                index,
                Some(Item::labelled('◆', &name, ["&7Travel here"], move |actor, _| {
                    log::info!("{actor} travels to region {}", region + 1);
                })),
            );
        });
    Ok(atlas)
}
