//! Host collaborator traits
//!
//! The bot never owns the world. It senses, resolves identities and moves
//! through these traits, which the game (or `sim::World`) implements.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::layer::LayerMask;

/// Identifier of a collider-bearing entity (head, body segment, orb, obstacle)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Identifier of a movement driver (one per snake, lives on its head)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u32);

/// One collider returned by an overlap query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Entity owning the collider
    pub entity: EntityId,
    /// Contact point on the collider surface nearest the query centre
    pub point: Vec2,
    /// Collider centre
    pub position: Vec2,
}

/// Circle overlap queries against the physics layers
pub trait SpatialQuery {
    /// All colliders on `mask` overlapping the circle, in a stable order
    fn query_overlaps(&self, center: Vec2, radius: f32, mask: LayerMask) -> Vec<Hit>;
}

/// Position access and movement
pub trait Locomotion {
    fn position(&self, entity: EntityId) -> Option<Vec2>;

    /// Move `entity` toward `target` by at most `max_distance`
    fn move_towards(&mut self, entity: EntityId, target: Vec2, max_distance: f32);

    /// Travel speed of a movement driver (units/sec)
    fn speed(&self, driver: AgentId) -> f32;
}

/// Identity and classification lookups
pub trait EntityRegistry {
    /// Movement driver carried directly by this entity (snake heads only)
    fn movement_driver(&self, entity: EntityId) -> Option<AgentId>;

    /// Head a body segment belongs to
    fn parent_head(&self, entity: EntityId) -> Option<EntityId>;

    fn tag(&self, entity: EntityId) -> Option<&str>;

    /// Whether the entity is a food source (orb)
    fn is_food(&self, entity: EntityId) -> bool;

    /// Driver owning `entity`, directly or through its parent head
    fn resolve_driver(&self, entity: EntityId) -> Option<AgentId> {
        self.movement_driver(entity).or_else(|| {
            self.parent_head(entity)
                .and_then(|head| self.movement_driver(head))
        })
    }
}

/// Everything a bot needs from its host
pub trait BotHost: SpatialQuery + Locomotion + EntityRegistry {}

impl<T: SpatialQuery + Locomotion + EntityRegistry> BotHost for T {}
