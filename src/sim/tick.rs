//! Fixed timestep world tick
//!
//! Order per tick: every bot senses/decides/moves its head (by agent id),
//! heads are kept inside the arena, bodies are dragged after their heads,
//! then orbs touched by a head are eaten and respawned elsewhere.

use glam::Vec2;

use super::collision::{circle_overlap, follow};
use super::state::{EntityKind, World};
use crate::bot::AgentId;
use crate::consts::*;
use crate::settings::{BotSettings, SettingsError};

/// Initial population of a world
#[derive(Debug, Clone)]
pub struct WorldSetup {
    pub snakes: usize,
    pub segments_per_snake: usize,
    pub orbs: usize,
    pub obstacles: usize,
    pub settings: BotSettings,
}

impl Default for WorldSetup {
    fn default() -> Self {
        Self {
            snakes: 4,
            segments_per_snake: 6,
            orbs: 80,
            obstacles: 12,
            settings: BotSettings::default(),
        }
    }
}

/// Fill a world with bots, obstacles and orbs
pub fn populate(world: &mut World, setup: &WorldSetup) -> Result<Vec<AgentId>, SettingsError> {
    setup.settings.validate()?;
    let ring = world.arena.radius * 0.5;
    let agents = (0..setup.snakes)
        .map(|i| {
            let theta = std::f32::consts::TAU * i as f32 / setup.snakes.max(1) as f32;
            let pos = crate::polar_to_cartesian(ring, theta);
            world.spawn_bot(pos, setup.segments_per_snake, setup.settings.clone())
        })
        .collect::<Result<Vec<_>, _>>()?;

    for _ in 0..setup.obstacles {
        let pos = world.arena.random_point(&mut world.rng);
        world.arena.spawn_obstacle(pos, 1.5, OBSTACLE_TAG);
    }
    world.scatter_orbs(setup.orbs);

    log::info!(
        "World {}: {} snakes, {} obstacles, {} orbs",
        world.seed,
        setup.snakes,
        setup.obstacles,
        setup.orbs
    );
    Ok(agents)
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, dt: f32) {
    for bot in world.bots.values_mut() {
        bot.execute(&mut world.arena, dt);
    }

    confine_heads(world);
    drag_bodies(world);
    eat_orbs(world);

    world.time_ticks += 1;
}

/// Clamp every head back inside the arena wall
fn confine_heads(world: &mut World) {
    let limit = world.arena.radius - HEAD_RADIUS;
    let heads: Vec<_> = world.arena.snakes().map(|s| s.head).collect();
    for head in heads {
        if let Some(e) = world.arena.entity_mut(head) {
            e.pos = e.pos.clamp_length_max(limit);
        }
    }
}

/// Pull each segment to within spacing of the part ahead of it
fn drag_bodies(world: &mut World) {
    let chains: Vec<(_, Vec<_>)> = world
        .arena
        .snakes()
        .map(|s| (s.head, s.segments.clone()))
        .collect();

    for (head, segments) in chains {
        let Some(mut leader) = world.arena.entity(head).map(|e| e.pos) else {
            continue;
        };
        for seg in segments {
            let Some(e) = world.arena.entity_mut(seg) else {
                continue;
            };
            e.pos = follow(e.pos, leader, SEGMENT_SPACING);
            leader = e.pos;
        }
    }
}

/// Heads eat overlapping orbs; eaten orbs reappear at a random point
fn eat_orbs(world: &mut World) {
    let heads: Vec<(AgentId, Vec2)> = world
        .arena
        .snakes()
        .filter_map(|s| world.arena.entity(s.head).map(|e| (s.agent, e.pos)))
        .collect();

    for (agent, head_pos) in heads {
        let eaten: Vec<_> = world
            .arena
            .entities()
            .iter()
            .filter(|e| e.kind == EntityKind::Orb)
            .filter(|e| circle_overlap(head_pos, HEAD_RADIUS, e.pos, e.radius).is_some())
            .map(|e| e.id)
            .collect();

        for orb in &eaten {
            let pos = world.arena.random_point(&mut world.rng);
            if let Some(e) = world.arena.entity_mut(*orb) {
                e.pos = pos;
            }
        }
        if !eaten.is_empty() {
            if let Some(snake) = world.arena.snake_mut(agent) {
                snake.orbs_eaten += eaten.len() as u32;
                log::trace!("agent {} ate {} orb(s)", agent.0, eaten.len());
            }
        }
    }
}
