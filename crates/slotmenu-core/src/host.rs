//! [`Host`]: the bundle of host services a menu is constructed with.

use std::fmt;
use std::rc::Rc;

use crate::bus::EventSource;
use crate::events::ActorId;
use crate::schedule::Scheduler;
use crate::surface::SurfaceFactory;

/// A non-blocking feedback signal sent to an actor, e.g. a sound.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cue {
    /// The interaction had an effect.
    Accept,
    /// The interaction was refused (e.g. scrolling past the end).
    Deny,
}

/// Delivers [`Cue`]s to actors.
pub trait Feedback {
    fn cue(&self, actor: ActorId, cue: Cue);
}

/// Feedback sink that drops every cue.
#[derive(Copy, Clone, Debug, Default)]
pub struct Silent;

impl Feedback for Silent {
    fn cue(&self, _actor: ActorId, _cue: Cue) {}
}

/// Host services injected into every menu.
///
/// Cloning is cheap: all services are shared.
#[derive(Clone)]
pub struct Host {
    pub events: Rc<dyn EventSource>,
    pub scheduler: Rc<dyn Scheduler>,
    pub surfaces: Rc<dyn SurfaceFactory>,
    pub feedback: Rc<dyn Feedback>,
}

impl Host {
    /// Bundle host services; cues are dropped until
    /// [`with_feedback`](Self::with_feedback) is used.
    pub fn new(
        events: Rc<dyn EventSource>,
        scheduler: Rc<dyn Scheduler>,
        surfaces: Rc<dyn SurfaceFactory>,
    ) -> Self {
        Self {
            events,
            scheduler,
            surfaces,
            feedback: Rc::new(Silent),
        }
    }

    /// Replace the feedback sink (builder).
    pub fn with_feedback(mut self, feedback: Rc<dyn Feedback>) -> Self {
        self.feedback = feedback;
        self
    }

    /// Send `cue` to `actor` if there is one.
    pub fn cue(&self, actor: Option<ActorId>, cue: Cue) {
        if let Some(actor) = actor {
            self.feedback.cue(actor, cue);
        }
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Host(..)")
    }
}
