//! Idle/demo mode - an AI that produces input snapshots
//!
//! Chases the nearest live enemy and hops when it gets close, with a
//! seeded RNG adding hesitation and stray jumps so runs don't loop
//! identically. Same seed and same states give the same inputs.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::{GamePhase, GameState, TickInput};

/// Horizontal distance (center to center) at which the autopilot jumps
const JUMP_RANGE: f32 = 70.0;
/// Dead zone so it doesn't jitter left/right over a target
const ALIGN_SLACK: f32 = 4.0;

pub struct Autopilot {
    rng: Pcg32,
    /// Chance per tick of a jump when in range
    jump_chance: f64,
    /// Chance per tick of a random hop anywhere
    stray_jump_chance: f64,
    /// Chance per tick of standing still
    hesitate_chance: f64,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            jump_chance: 0.35,
            stray_jump_chance: 0.01,
            hesitate_chance: 0.05,
        }
    }

    /// Decide the input for the next tick
    pub fn next_input(&mut self, state: &GameState) -> TickInput {
        if state.phase != GamePhase::Running {
            return TickInput::default();
        }

        let me = state.character.rect();
        let my_center = me.x + me.width / 2.0;

        let target = state
            .enemies
            .iter()
            .filter(|e| e.alive)
            .map(|e| {
                let r = e.rect();
                r.x + r.width / 2.0 - my_center
            })
            .min_by(|a, b| a.abs().total_cmp(&b.abs()));

        let Some(dx) = target else {
            return TickInput::default();
        };

        if self.rng.random_bool(self.hesitate_chance) {
            return TickInput::default();
        }

        let on_ground = state.character.on_ground;
        let in_range = dx.abs() < JUMP_RANGE;
        let jump = on_ground
            && ((in_range && self.rng.random_bool(self.jump_chance))
                || self.rng.random_bool(self.stray_jump_chance));

        TickInput {
            left: dx < -ALIGN_SLACK,
            right: dx > ALIGN_SLACK,
            jump,
        }
    }
}
