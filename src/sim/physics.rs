//! Per-tick body integration
//!
//! Steps are tick based, not wall-clock: one call advances a body by exactly
//! one fixed timestep. Callers must integrate each body once per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// Position, velocity and box size shared by the character and enemies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Apply gravity, move by velocity and clamp to the floor
    ///
    /// Returns true when the body ended the step resting on the floor.
    pub fn integrate(&mut self, floor_y: f32) -> bool {
        self.vel.y += GRAVITY;
        self.pos += self.vel;

        if self.pos.y + self.size.y >= floor_y {
            self.pos.y = floor_y - self.size.y;
            self.vel.y = 0.0;
            return true;
        }
        false
    }

    /// Keep the box inside `[0, max_x - width]`
    pub fn clamp_horizontal(&mut self, max_x: f32) {
        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
        }
        if self.pos.x + self.size.x > max_x {
            self.pos.x = max_x - self.size.x;
        }
    }

    /// True when the box touches or crosses either side of `[0, max_x]`
    #[inline]
    pub fn at_horizontal_edge(&self, max_x: f32) -> bool {
        self.pos.x <= 0.0 || self.pos.x + self.size.x >= max_x
    }
}
