//! Player character: movement, integration and the damage state machine
//!
//! The character only knows about its own lives. Deciding that the run is
//! over belongs to the controller in `tick`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::Body;
use super::rect::Rect;
use crate::consts::*;

/// Damage state, derived from the invulnerability timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterState {
    /// Takes damage on enemy contact
    Normal,
    /// Recently hit; further damage is ignored until the timer runs out
    Invulnerable,
}

/// The player-controlled character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub body: Body,
    /// Set by the floor or a platform landing, cleared by jumping
    pub on_ground: bool,
    pub lives: u32,
    /// Ticks of damage immunity left; the only source of invulnerability
    invulnerable_ticks: u32,
}

impl Character {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            body: Body::new(
                Vec2::new(x, y),
                Vec2::new(CHARACTER_WIDTH, CHARACTER_HEIGHT),
            ),
            on_ground: false,
            lives: STARTING_LIVES,
            invulnerable_ticks: 0,
        }
    }

    /// Character at the level spawn point
    pub fn spawn() -> Self {
        Self::new(CHARACTER_SPAWN_X, CHARACTER_SPAWN_Y)
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    #[inline]
    pub fn invulnerable(&self) -> bool {
        self.invulnerable_ticks > 0
    }

    #[inline]
    pub fn invulnerable_ticks(&self) -> u32 {
        self.invulnerable_ticks
    }

    pub fn state(&self) -> CharacterState {
        if self.invulnerable() {
            CharacterState::Invulnerable
        } else {
            CharacterState::Normal
        }
    }

    pub fn is_dead(&self) -> bool {
        self.lives == 0
    }

    /// Whether the sprite is in the dim half of its damage flicker
    pub fn flash(&self) -> bool {
        self.invulnerable() && (self.invulnerable_ticks / FLASH_PERIOD_TICKS) % 2 == 1
    }

    pub fn move_left(&mut self) {
        self.body.vel.x = -MOVE_SPEED;
    }

    pub fn move_right(&mut self) {
        self.body.vel.x = MOVE_SPEED;
    }

    /// Jump if standing on something; ignored in the air
    pub fn jump(&mut self) {
        if self.on_ground {
            self.body.vel.y = JUMP_FORCE;
            self.on_ground = false;
        }
    }

    /// Lose a life unless already invulnerable
    ///
    /// Returns true only when a life was actually taken.
    pub fn take_damage(&mut self) -> bool {
        if self.invulnerable() {
            return false;
        }
        self.lives = self.lives.saturating_sub(1);
        self.invulnerable_ticks = INVULNERABLE_TICKS;
        true
    }

    /// Advance one tick: physics, screen clamp, invulnerability, friction
    pub fn integrate(&mut self) {
        if self.body.integrate(FLOOR_Y) {
            self.on_ground = true;
        }

        self.body.clamp_horizontal(CANVAS_WIDTH);

        self.invulnerable_ticks = self.invulnerable_ticks.saturating_sub(1);

        // Applied after movement so speed decays without input
        self.body.vel.x *= FRICTION;
    }
}
