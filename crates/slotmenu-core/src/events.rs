//! Host events delivered to menus: [`ClickEvent`], [`DragEvent`],
//! [`CloseEvent`], plus the identifiers they carry.

use std::fmt;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Identifies an acting entity (a player, a viewer).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

/// Identifies a rendering surface. Events name the surface they target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceId(pub u64);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ClickKind
// ---------------------------------------------------------------------------

/// The gesture an actor used on a slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClickKind {
    /// Primary button.
    Left,
    /// Primary button with shift held (move-all).
    ShiftLeft,
    /// Secondary button.
    Right,
    /// Secondary button with shift held (move-all).
    ShiftRight,
    /// Middle button.
    Middle,
    Double,
    /// A hotbar number key, `0`-based.
    NumberKey(u8),
    /// Drop key on a slot.
    Drop,
    /// Drop-whole-stack key on a slot.
    ControlDrop,
    /// Any gesture the host cannot classify.
    Unknown,
}

impl ClickKind {
    /// Whether this is a shift (move-all) gesture.
    #[inline]
    pub const fn is_shift_click(self) -> bool {
        matches!(self, Self::ShiftLeft | Self::ShiftRight)
    }

    #[inline]
    pub const fn is_left_click(self) -> bool {
        matches!(self, Self::Left | Self::ShiftLeft | Self::Double)
    }

    #[inline]
    pub const fn is_right_click(self) -> bool {
        matches!(self, Self::Right | Self::ShiftRight)
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A click on a viewed surface.
///
/// `raw_slot` counts across the whole view: indices at or past the surface
/// size belong to the actor's own inventory shown below the menu. `slot` is
/// the index within whichever of the two inventories was clicked.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClickEvent {
    pub surface: SurfaceId,
    pub raw_slot: usize,
    pub slot: usize,
    pub kind: ClickKind,
    pub actor: ActorId,
    cancelled: bool,
}

impl ClickEvent {
    pub fn new(
        surface: SurfaceId,
        raw_slot: usize,
        slot: usize,
        kind: ClickKind,
        actor: ActorId,
    ) -> Self {
        Self {
            surface,
            raw_slot,
            slot,
            kind,
            actor,
            cancelled: false,
        }
    }

    /// Prevent the host's default item movement for this click.
    #[inline]
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// A drag gesture spreading items over one or more slots.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DragEvent {
    pub surface: SurfaceId,
    pub actor: ActorId,
    pub raw_slots: Vec<usize>,
    cancelled: bool,
}

impl DragEvent {
    pub fn new(surface: SurfaceId, actor: ActorId, raw_slots: Vec<usize>) -> Self {
        Self {
            surface,
            actor,
            raw_slots,
            cancelled: false,
        }
    }

    /// Prevent the host's default item movement for this drag.
    #[inline]
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// An actor stopped viewing a surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CloseEvent {
    pub surface: SurfaceId,
    pub actor: ActorId,
}

impl CloseEvent {
    pub const fn new(surface: SurfaceId, actor: ActorId) -> Self {
        Self { surface, actor }
    }
}
