//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (by entity ID)
//! - No rendering, network or platform dependencies

pub mod character;
pub mod collision;
pub mod physics;
pub mod rect;
pub mod state;
pub mod tick;

pub use character::{Character, CharacterState};
pub use collision::{Resolution, Target, landing_platform, lands_on, overlaps, resolve};
pub use physics::Body;
pub use rect::Rect;
pub use state::{
    CharacterView, Enemy, EnemyView, GameEvent, GamePhase, GameState, LevelConfig, Platform,
    RenderSnapshot, Session, SessionSummary, enemy_spawn_x,
};
pub use tick::{TickInput, tick};
