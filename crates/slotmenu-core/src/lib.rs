//! **slotmenu-core**: host-facing building blocks for slot menus.
//!
//! This crate defines the contracts a host application implements for menus
//! to run against it (surfaces, event delivery, deferred scheduling and
//! feedback), the value types those contracts carry (slot geometry, styled
//! `&`-coded text, icons, events), and [`LocalHost`], an in-process host
//! used by tests and demos.

pub mod bus;
pub mod events;
pub mod geom;
pub mod host;
pub mod icon;
pub mod local;
pub mod schedule;
pub mod style;
pub mod surface;
pub mod text;

pub use bus::{EventBus, EventSource, Listener, ListenerId};
pub use events::{ActorId, ClickEvent, ClickKind, CloseEvent, DragEvent, SurfaceId};
pub use geom::{ROW_WIDTH, SlotPos, slot_index};
pub use host::{Cue, Feedback, Host, Silent};
pub use icon::Icon;
pub use local::{LocalHost, LocalSurface};
pub use schedule::{Scheduler, Task, TickScheduler};
pub use style::{AttrMask, Color, Style};
pub use surface::{SlotBuffer, Surface, SurfaceFactory};
pub use text::{Span, StyledText};
