//! SmartBot: a two-state search/flee controller
//!
//! Each tick the bot runs two circle queries around its head:
//! - a small obstacle query; the first non-self hit with a flee tag sends the
//!   bot directly away from the contact point for `seconds_to_flee`
//! - a wide orb query; while searching, the bot steers at the nearest orb
//!
//! and then always moves forward along its heading.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, RngCore};

use super::host::{BotHost, EntityId, EntityRegistry, Hit};
use super::timer::FleeTimer;
use super::{Behaviour, BotState, Owner};
use crate::settings::{BotSettings, SettingsError};

#[derive(Debug, Clone)]
pub struct SmartBot {
    settings: BotSettings,
    owner: Owner,
    state: BotState,
    heading: Vec2,
    flee_timer: FleeTimer,
    /// Seconds of ticks executed since `init`
    clock: f64,
    /// Orb chosen on the last searching tick
    target: Option<Vec2>,
    /// Orb positions seen this tick (rebuilt every tick)
    orb_candidates: Vec<Vec2>,
}

impl SmartBot {
    /// Build a bot for `owner`; settings that fail `validate` are rejected
    pub fn new(
        settings: BotSettings,
        owner: Owner,
        rng: &mut dyn RngCore,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        let mut bot = Self {
            settings,
            owner,
            state: BotState::Search,
            heading: Vec2::X,
            flee_timer: FleeTimer::new(),
            clock: 0.0,
            target: None,
            orb_candidates: Vec::new(),
        };
        bot.reset(owner, rng);
        Ok(bot)
    }

    fn reset(&mut self, owner: Owner, rng: &mut dyn RngCore) {
        self.owner = owner;
        self.state = BotState::Search;
        self.flee_timer.cancel();
        self.clock = 0.0;
        self.target = None;
        self.orb_candidates.clear();

        let angle: f32 = rng.random_range(0.0..TAU);
        self.heading = Vec2::from_angle(angle);
    }

    pub fn settings(&self) -> &BotSettings {
        &self.settings
    }

    pub fn state(&self) -> BotState {
        self.state
    }

    /// Seconds left before the bot goes back to searching
    pub fn flee_remaining(&self) -> Option<f64> {
        self.flee_timer.remaining(self.clock)
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Orb picked on the most recent searching tick
    pub fn target(&self) -> Option<Vec2> {
        self.target
    }

    /// Run one tick
    pub fn tick<H: BotHost + ?Sized>(&mut self, host: &mut H, dt: f32) {
        self.clock += f64::from(dt);
        if self.flee_timer.poll(self.clock) {
            self.state = BotState::Search;
            log::debug!("agent {} back to search", self.owner.driver.0);
        }

        let Some(origin) = host.position(self.owner.body) else {
            return;
        };

        let obstacle_hits = host.query_overlaps(
            origin,
            self.settings.obstacle_check_radius,
            self.settings.obstacle_layers,
        );
        let orb_hits = host.query_overlaps(
            origin,
            self.settings.orb_check_radius,
            self.settings.orb_layers,
        );

        // First tagged hit wins, no ranking
        let obstacle = obstacle_hits.iter().find(|hit| {
            !self.is_own_body(&*host, hit.entity)
                && host
                    .tag(hit.entity)
                    .is_some_and(|tag| self.settings.is_obstacle_tag(tag))
        });
        if let Some(hit) = obstacle.copied() {
            self.flee(origin, hit);
        }

        if self.state == BotState::Search {
            self.collect_orbs(&*host, &orb_hits);
            self.target = nearest(origin, &self.orb_candidates);
            if let Some(target) = self.target {
                self.steer(target - origin);
            }
        }

        self.move_forward(host, origin, dt);
    }

    /// Whether `entity` belongs to this bot's own snake
    fn is_own_body<R: EntityRegistry + ?Sized>(&self, host: &R, entity: EntityId) -> bool {
        host.resolve_driver(entity) == Some(self.owner.driver)
    }

    fn collect_orbs<H: BotHost + ?Sized>(&mut self, host: &H, hits: &[Hit]) {
        self.orb_candidates.clear();
        for hit in hits {
            if self.is_own_body(host, hit.entity) || !host.is_food(hit.entity) {
                continue;
            }
            self.orb_candidates.push(hit.position);
        }
    }

    fn flee(&mut self, origin: Vec2, hit: Hit) {
        self.steer(origin - hit.point);
        if self.state != BotState::Flee {
            log::debug!(
                "agent {} fleeing entity {} at ({:.2}, {:.2})",
                self.owner.driver.0,
                hit.entity.0,
                hit.point.x,
                hit.point.y
            );
        }
        self.state = BotState::Flee;
        self.target = None;
        self.flee_timer.arm(self.clock, self.settings.seconds_to_flee);
    }

    /// Point the heading along `direction`; a zero vector keeps the old heading
    fn steer(&mut self, direction: Vec2) {
        if let Some(heading) = direction.try_normalize() {
            self.heading = heading;
        }
    }

    fn move_forward<H: BotHost + ?Sized>(&self, host: &mut H, origin: Vec2, dt: f32) {
        let step = host.speed(self.owner.driver) * dt;
        host.move_towards(self.owner.body, origin + self.heading, step);
    }
}

/// Closest point to `origin`; ties go to the first one
fn nearest(origin: Vec2, candidates: &[Vec2]) -> Option<Vec2> {
    candidates
        .iter()
        .copied()
        .min_by(|a, b| {
            a.distance_squared(origin)
                .total_cmp(&b.distance_squared(origin))
        })
}

impl<H: BotHost + ?Sized> Behaviour<H> for SmartBot {
    fn init(&mut self, owner: Owner, rng: &mut dyn RngCore) {
        self.reset(owner, rng);
    }

    fn execute(&mut self, host: &mut H, dt: f32) {
        self.tick(host, dt);
    }

    fn heading(&self) -> Vec2 {
        self.heading
    }

    fn owner(&self) -> Owner {
        self.owner
    }
}
