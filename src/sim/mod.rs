//! Deterministic reference world
//!
//! A minimal host for SmartBots. This module must stay deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity and agent ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Contact, circle_overlap, follow};
pub use state::{Arena, Entity, EntityKind, Snake, World};
pub use tick::{WorldSetup, populate, tick};
