//! Bot behaviours
//!
//! A behaviour is initialised once for the snake it drives and then executed
//! every simulation tick. Everything it knows about the world comes through
//! the host traits in [`host`].

pub mod host;
pub mod smart;
pub mod timer;

pub use host::{AgentId, BotHost, EntityId, EntityRegistry, Hit, Locomotion, SpatialQuery};
pub use smart::SmartBot;
pub use timer::FleeTimer;

use glam::Vec2;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// The snake a behaviour controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Head entity (the one that moves)
    pub body: EntityId,
    /// Movement driver living on the head
    pub driver: AgentId,
}

/// SmartBot decision state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BotState {
    /// Steering toward the nearest orb
    #[default]
    Search,
    /// Running away from an obstacle until the flee window closes
    Flee,
}

/// A per-snake AI behaviour driven by the host loop
pub trait Behaviour<H: BotHost + ?Sized> {
    /// (Re)bind the behaviour to a snake and reset its decision state
    fn init(&mut self, owner: Owner, rng: &mut dyn RngCore);

    /// Sense, decide and move for one tick of `dt` seconds
    fn execute(&mut self, host: &mut H, dt: f32);

    /// Current unit travel direction
    fn heading(&self) -> Vec2;

    fn owner(&self) -> Owner;
}
