//! Scripted menu session rendered to the terminal.
//!
//! Run: cargo run --bin showcase
//! Set RUST_LOG=debug to follow reopen scheduling, paging and scrolling.

use std::io::{self, Write};

use slotmenu_core::{ActorId, ClickKind, LocalHost};
use slotmenu_demos::{
    ATLAS_SLOT, CATALOGUE_SLOT, CLAIM_SLOT, REWARD_SLOT, Showcase,
    render::{describe_slot, render_surface},
};
use slotmenu_ui::{GridMenu, REOPEN_DELAY, SCROLL_DOWN_SLOT, SCROLL_UP_SLOT};

const ALICE: ActorId = ActorId(1);

/// Print a step header followed by whatever `actor` is looking at.
fn show<W: Write>(out: &mut W, local: &LocalHost, actor: ActorId, step: &str) -> io::Result<()> {
    writeln!(out, "\n== {step}")?;
    for (who, cue) in local.take_cues() {
        writeln!(out, "   cue for {who}: {cue:?}")?;
    }
    match local.view_of(actor).and_then(|id| local.surface(id)) {
        Some(surface) => render_surface(out, &surface),
        None => writeln!(out, "{actor} has no menu open"),
    }
}

/// Close `actor`'s view and let pending reopens run.
fn close_and_wait(local: &LocalHost, actor: ActorId) {
    local.close(actor);
    local.advance(REOPEN_DELAY);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();

    let local = LocalHost::new();
    let showcase = Showcase::build(&local.host())?;
    let mut out = io::stdout();

    showcase.hub.show_to(&[ALICE]);
    show(&mut out, &local, ALICE, "hub")?;
    if let Some(hub) = local.surface(showcase.hub.surface_id()) {
        describe_slot(&mut out, &hub, CATALOGUE_SLOT)?;
    }

    local.click(ALICE, CATALOGUE_SLOT, ClickKind::Left);
    show(&mut out, &local, ALICE, "catalogue")?;
    local.click(ALICE, SCROLL_DOWN_SLOT, ClickKind::Left);
    local.click(ALICE, SCROLL_DOWN_SLOT, ClickKind::Left);
    show(&mut out, &local, ALICE, "catalogue, scrolled two rows")?;
    local.click(ALICE, SCROLL_UP_SLOT, ClickKind::Left);
    local.click(ALICE, SCROLL_UP_SLOT, ClickKind::Left);
    local.click(ALICE, SCROLL_UP_SLOT, ClickKind::Left);
    show(&mut out, &local, ALICE, "catalogue, scrolled back past the top")?;
    close_and_wait(&local, ALICE);
    show(&mut out, &local, ALICE, "closed catalogue, back at the hub")?;

    local.click(ALICE, ATLAS_SLOT, ClickKind::Left);
    let next = showcase.atlas.next_slot();
    local.click(ALICE, next, ClickKind::Left);
    show(&mut out, &local, ALICE, "atlas, page 2")?;
    local.click(ALICE, next, ClickKind::Left);
    show(&mut out, &local, ALICE, "atlas, no page 3")?;
    close_and_wait(&local, ALICE);

    local.click(ALICE, REWARD_SLOT, ClickKind::Left);
    close_and_wait(&local, ALICE);
    show(&mut out, &local, ALICE, "reward reopened while unclaimed")?;
    local.click(ALICE, CLAIM_SLOT, ClickKind::Left);
    close_and_wait(&local, ALICE);
    show(&mut out, &local, ALICE, "reward claimed and closed")?;

    writeln!(out, "\nclaimed {} reward(s)", showcase.claimed())?;
    showcase.dispose();
    Ok(())
}
