//! World state for the reference host
//!
//! The `Arena` owns every collider and implements the bot host traits. The
//! `World` pairs it with the bots driving each snake and the seeded RNG.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::circle_overlap;
use crate::bot::{
    AgentId, Behaviour, EntityId, EntityRegistry, Hit, Locomotion, Owner, SmartBot, SpatialQuery,
};
use crate::consts::*;
use crate::layer::{Layer, LayerMask};
use crate::polar_to_cartesian;
use crate::settings::{BotSettings, SettingsError};

/// What an entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Snake head, carries the movement driver
    Head { agent: AgentId },
    /// Trailing body part, points back at its head
    Segment { head: EntityId },
    /// Food pickup
    Orb,
    /// Static hazard
    Obstacle,
}

/// A disc collider in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub radius: f32,
    pub layer: Layer,
    pub tag: String,
}

/// Movement driver for one snake
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snake {
    pub agent: AgentId,
    pub head: EntityId,
    /// Body segments, nearest the head first
    pub segments: Vec<EntityId>,
    pub speed: f32,
    pub orbs_eaten: u32,
}

/// Every collider in the world (sorted by id for determinism)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub radius: f32,
    entities: Vec<Entity>,
    snakes: BTreeMap<AgentId, Snake>,
    next_entity: u32,
    next_agent: u32,
}

impl Arena {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            entities: Vec::new(),
            snakes: BTreeMap::new(),
            next_entity: 1,
            next_agent: 1,
        }
    }

    /// Spawn an entity; ids only grow, so `entities` stays sorted
    pub fn spawn(
        &mut self,
        kind: EntityKind,
        pos: Vec2,
        radius: f32,
        layer: Layer,
        tag: &str,
    ) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        self.entities.push(Entity {
            id,
            kind,
            pos,
            radius,
            layer,
            tag: tag.to_string(),
        });
        id
    }

    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.index_of(id)?;
        Some(self.entities.remove(index))
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.binary_search_by_key(&id, |e| e.id).ok()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|i| &self.entities[i])
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.index_of(id).map(|i| &mut self.entities[i])
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Add a snake: a head at `pos` and `segments` body parts trailing along -X
    pub fn spawn_snake(&mut self, pos: Vec2, segments: usize, speed: f32) -> Owner {
        let agent = AgentId(self.next_agent);
        self.next_agent += 1;

        let head = self.spawn(
            EntityKind::Head { agent },
            pos,
            HEAD_RADIUS,
            Layer::HEADS,
            SNAKE_TAG,
        );
        let segments = (1..=segments)
            .map(|i| {
                let seg_pos = pos - Vec2::X * SEGMENT_SPACING * i as f32;
                self.spawn(
                    EntityKind::Segment { head },
                    seg_pos,
                    SEGMENT_RADIUS,
                    Layer::BODIES,
                    SNAKE_TAG,
                )
            })
            .collect();

        self.snakes.insert(
            agent,
            Snake {
                agent,
                head,
                segments,
                speed,
                orbs_eaten: 0,
            },
        );
        Owner {
            body: head,
            driver: agent,
        }
    }

    pub fn snake(&self, agent: AgentId) -> Option<&Snake> {
        self.snakes.get(&agent)
    }

    pub fn snake_mut(&mut self, agent: AgentId) -> Option<&mut Snake> {
        self.snakes.get_mut(&agent)
    }

    pub fn snakes(&self) -> impl Iterator<Item = &Snake> {
        self.snakes.values()
    }

    pub fn spawn_orb(&mut self, pos: Vec2) -> EntityId {
        self.spawn(EntityKind::Orb, pos, ORB_RADIUS, Layer::ORBS, ORB_TAG)
    }

    pub fn spawn_obstacle(&mut self, pos: Vec2, radius: f32, tag: &str) -> EntityId {
        self.spawn(EntityKind::Obstacle, pos, radius, Layer::OBSTACLES, tag)
    }

    /// Uniform random point inside the arena
    pub fn random_point(&self, rng: &mut impl Rng) -> Vec2 {
        let r = self.radius * rng.random::<f32>().sqrt();
        let theta = rng.random_range(0.0..std::f32::consts::TAU);
        polar_to_cartesian(r, theta)
    }
}

impl SpatialQuery for Arena {
    fn query_overlaps(&self, center: Vec2, radius: f32, mask: LayerMask) -> Vec<Hit> {
        self.entities
            .iter()
            .filter(|e| mask.contains(e.layer))
            .filter_map(|e| {
                circle_overlap(center, radius, e.pos, e.radius).map(|contact| Hit {
                    entity: e.id,
                    point: contact.point,
                    position: e.pos,
                })
            })
            .collect()
    }
}

impl Locomotion for Arena {
    fn position(&self, entity: EntityId) -> Option<Vec2> {
        self.entity(entity).map(|e| e.pos)
    }

    fn move_towards(&mut self, entity: EntityId, target: Vec2, max_distance: f32) {
        if let Some(e) = self.entity_mut(entity) {
            e.pos = crate::move_towards(e.pos, target, max_distance);
        }
    }

    fn speed(&self, driver: AgentId) -> f32 {
        self.snakes.get(&driver).map(|s| s.speed).unwrap_or(0.0)
    }
}

impl EntityRegistry for Arena {
    fn movement_driver(&self, entity: EntityId) -> Option<AgentId> {
        match self.entity(entity)?.kind {
            EntityKind::Head { agent } => Some(agent),
            _ => None,
        }
    }

    fn parent_head(&self, entity: EntityId) -> Option<EntityId> {
        match self.entity(entity)?.kind {
            EntityKind::Segment { head } => Some(head),
            _ => None,
        }
    }

    fn tag(&self, entity: EntityId) -> Option<&str> {
        self.entity(entity).map(|e| e.tag.as_str())
    }

    fn is_food(&self, entity: EntityId) -> bool {
        self.entity(entity)
            .is_some_and(|e| e.kind == EntityKind::Orb)
    }
}

/// Complete simulation: arena, bots and RNG
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    pub arena: Arena,
    /// Bots keyed by the snake they drive (ticked in id order)
    pub(super) bots: BTreeMap<AgentId, Box<dyn Behaviour<Arena>>>,
    pub(super) rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl World {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            arena: Arena::new(ARENA_RADIUS),
            bots: BTreeMap::new(),
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
        }
    }

    /// Spawn a snake driven by a SmartBot; nothing is spawned if `settings` is invalid
    pub fn spawn_bot(
        &mut self,
        pos: Vec2,
        segments: usize,
        settings: BotSettings,
    ) -> Result<AgentId, SettingsError> {
        settings.validate()?;
        let owner = self.arena.spawn_snake(pos, segments, SNAKE_SPEED);
        let bot = SmartBot::new(settings, owner, &mut self.rng)?;
        self.bots.insert(owner.driver, Box::new(bot));
        Ok(owner.driver)
    }

    /// Spawn a snake driven by any behaviour
    pub fn spawn_with(
        &mut self,
        pos: Vec2,
        segments: usize,
        mut behaviour: Box<dyn Behaviour<Arena>>,
    ) -> AgentId {
        let owner = self.arena.spawn_snake(pos, segments, SNAKE_SPEED);
        behaviour.init(owner, &mut self.rng);
        self.bots.insert(owner.driver, behaviour);
        owner.driver
    }

    pub fn bot(&self, agent: AgentId) -> Option<&dyn Behaviour<Arena>> {
        self.bots.get(&agent).map(|b| b.as_ref())
    }

    /// Scatter `count` orbs uniformly over the arena
    pub fn scatter_orbs(&mut self, count: usize) {
        for _ in 0..count {
            let pos = self.arena.random_point(&mut self.rng);
            self.arena.spawn_orb(pos);
        }
    }

    /// Head position of a snake
    pub fn head_pos(&self, agent: AgentId) -> Option<Vec2> {
        let snake = self.arena.snake(agent)?;
        self.arena.position(snake.head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_layout() {
        let mut arena = Arena::new(ARENA_RADIUS);
        let agent = arena.spawn_snake(Vec2::new(1.0, 1.0), 3, 4.0).driver;
        let snake = arena.snake(agent).unwrap().clone();

        assert_eq!(snake.segments.len(), 3);
        assert_eq!(arena.movement_driver(snake.head), Some(agent));
        for seg in &snake.segments {
            assert_eq!(arena.parent_head(*seg), Some(snake.head));
            assert_eq!(arena.movement_driver(*seg), None);
            assert_eq!(arena.resolve_driver(*seg), Some(agent));
        }
        assert_eq!(arena.speed(agent), 4.0);
    }

    #[test]
    fn test_query_respects_layer_mask() {
        let mut arena = Arena::new(ARENA_RADIUS);
        let orb = arena.spawn_orb(Vec2::new(1.0, 0.0));
        let rock = arena.spawn_obstacle(Vec2::new(-1.0, 0.0), 0.5, OBSTACLE_TAG);

        let orbs = arena.query_overlaps(Vec2::ZERO, 2.0, Layer::ORBS.mask());
        assert_eq!(orbs.len(), 1);
        assert_eq!(orbs[0].entity, orb);

        let obstacles = arena.query_overlaps(Vec2::ZERO, 2.0, Layer::OBSTACLES.mask());
        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles[0].entity, rock);
        assert!((obstacles[0].point - Vec2::new(-0.5, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_query_radius_filters_far_entities() {
        let mut arena = Arena::new(ARENA_RADIUS);
        arena.spawn_orb(Vec2::new(20.0, 0.0));
        assert!(arena.query_overlaps(Vec2::ZERO, 10.0, LayerMask::ALL).is_empty());
    }

    #[test]
    fn test_query_order_is_by_id() {
        let mut arena = Arena::new(ARENA_RADIUS);
        let a = arena.spawn_orb(Vec2::new(3.0, 0.0));
        let b = arena.spawn_orb(Vec2::new(1.0, 0.0));
        let hits = arena.query_overlaps(Vec2::ZERO, 5.0, LayerMask::ALL);
        assert_eq!(hits.iter().map(|h| h.entity).collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn test_despawn_keeps_lookup_working() {
        let mut arena = Arena::new(ARENA_RADIUS);
        let a = arena.spawn_orb(Vec2::ZERO);
        let b = arena.spawn_orb(Vec2::X);
        assert!(arena.despawn(a).is_some());
        assert!(arena.entity(a).is_none());
        assert_eq!(arena.position(b), Some(Vec2::X));
        assert!(!arena.is_food(a));
        assert!(arena.is_food(b));
    }

    #[test]
    fn test_random_points_inside_arena() {
        let arena = Arena::new(10.0);
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..200 {
            assert!(arena.random_point(&mut rng).length() <= 10.0 + 1e-4);
        }
    }

    #[test]
    fn test_spawn_bot_binds_owner() {
        let mut world = World::new(5);
        let agent = world.spawn_bot(Vec2::ZERO, 2, BotSettings::default()).unwrap();
        let bot = world.bot(agent).unwrap();
        let snake = world.arena.snake(agent).unwrap();
        assert_eq!(bot.owner().driver, agent);
        assert_eq!(bot.owner().body, snake.head);
        assert!((bot.heading().length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_spawn_bot_rejects_invalid_settings() {
        let mut world = World::new(5);
        let settings = BotSettings {
            seconds_to_flee: f32::NAN,
            ..Default::default()
        };
        let result = world.spawn_bot(Vec2::ZERO, 2, settings);

        assert!(matches!(result, Err(SettingsError::InvalidDuration { .. })));
        assert!(world.arena.entities().is_empty());
        assert_eq!(world.arena.snakes().count(), 0);
    }
}
