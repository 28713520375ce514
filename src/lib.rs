//! Stomp Run - A browser platformer with server-tuned difficulty
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `renderer`: Draw command generation from simulation state
//! - `platform`: Browser/native platform abstraction (input sampling)
//! - `api`: Backend seam (player registration, level config, session submit)
//! - `director`: Local difficulty policy mirroring the backend
//! - `autopilot`: Demo mode input generator

pub mod api;
pub mod autopilot;
pub mod director;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use api::{ApiClient, ApiError, PlayerId};
pub use settings::Settings;
pub use sim::{GameState, LevelConfig, SessionSummary};

/// Game configuration constants
///
/// Units are canvas pixels and ticks; all per-tick quantities assume the
/// fixed 60 Hz step below.
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Canvas dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;
    /// Top of the ground strip; bodies never sink below this line
    pub const FLOOR_Y: f32 = CANVAS_HEIGHT - 50.0;

    /// Downward acceleration (pixels/tick²)
    pub const GRAVITY: f32 = 0.5;
    /// Initial jump velocity (negative is up)
    pub const JUMP_FORCE: f32 = -12.0;
    /// Horizontal speed while a direction key is held
    pub const MOVE_SPEED: f32 = 5.0;
    /// Horizontal velocity multiplier applied every tick
    pub const FRICTION: f32 = 0.8;

    /// Character defaults
    pub const CHARACTER_WIDTH: f32 = 32.0;
    pub const CHARACTER_HEIGHT: f32 = 32.0;
    pub const CHARACTER_SPAWN_X: f32 = 50.0;
    pub const CHARACTER_SPAWN_Y: f32 = 400.0;
    pub const STARTING_LIVES: u32 = 3;
    /// Damage immunity after a hit (2 seconds)
    pub const INVULNERABLE_TICKS: u32 = 120;
    /// Flicker period while invulnerable
    pub const FLASH_PERIOD_TICKS: u32 = 10;

    /// Enemy defaults
    pub const ENEMY_WIDTH: f32 = 24.0;
    pub const ENEMY_HEIGHT: f32 = 24.0;
    pub const ENEMY_SPAWN_X: f32 = 200.0;
    pub const ENEMY_SPAWN_Y: f32 = CANVAS_HEIGHT - 100.0;
    pub const ENEMY_SPACING: f32 = 150.0;
    /// Largest enemy count a level config may ask for
    pub const MAX_ENEMIES: u32 = 64;

    /// Platforms share one thickness
    pub const PLATFORM_HEIGHT: f32 = 20.0;
    /// How far above a platform top a falling character still lands
    pub const LANDING_TOLERANCE: f32 = 10.0;

    /// Scoring
    pub const STOMP_SCORE: u64 = 100;
    pub const LEVEL_CLEAR_BONUS: u64 = 1000;

    /// Pause between clearing a level and requesting the next (1 second)
    pub const LEVEL_ADVANCE_DELAY_TICKS: u32 = 60;
}
