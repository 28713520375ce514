//! Game state and core simulation types
//!
//! `GameState` owns every entity and the session. Entities never point back
//! at it; the tick and the lifecycle methods below operate on them directly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::character::Character;
use super::physics::Body;
use super::rect::Rect;
use crate::api::PlayerId;
use crate::consts::*;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Registered but no level requested yet (also the fallback after a
    /// failed config fetch)
    NotStarted,
    /// Waiting for the difficulty descriptor of `level`; input is ignored
    AwaitingConfig { level: u32 },
    /// Active gameplay
    Running,
    /// Every enemy is down; counting toward the next level request
    LevelCleared { ticks_left: u32 },
    /// Run ended, summary emitted
    GameOver,
}

/// Difficulty descriptor supplied per level by the backend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub enemy_count: u32,
    pub enemy_speed: f32,
    pub difficulty_level: f32,
}

/// A patrolling enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub body: Body,
    /// Cleared by a stomp; never set again within a level
    pub alive: bool,
}

impl Enemy {
    pub fn new(id: u32, x: f32, y: f32, speed: f32) -> Self {
        let mut body = Body::new(Vec2::new(x, y), Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT));
        body.vel.x = -speed;
        Self {
            id,
            body,
            alive: true,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    /// Advance one tick: physics, then turn around at a screen edge
    ///
    /// Position is left unclamped; the reversed velocity carries the enemy
    /// back inside on the next tick.
    pub fn integrate(&mut self) {
        self.body.integrate(FLOOR_Y);
        if self.body.at_horizontal_edge(CANVAS_WIDTH) {
            self.body.vel.x *= -1.0;
        }
    }
}

/// A static platform (fixed thickness)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32) -> Self {
        Self { x, y, width }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, PLATFORM_HEIGHT)
    }

    /// The fixed layout: full-width ground plus three floating ledges
    pub fn layout() -> Vec<Platform> {
        vec![
            Platform::new(0.0, FLOOR_Y, CANVAS_WIDTH),
            Platform::new(300.0, 450.0, 200.0),
            Platform::new(600.0, 350.0, 150.0),
            Platform::new(150.0, 300.0, 100.0),
        ]
    }
}

/// Horizontal spawn position for the `index`-th enemy
///
/// Enemies are spaced evenly from the spawn column and wrap back into the
/// playable span, so large counts never start past the right edge.
pub fn enemy_spawn_x(index: u32) -> f32 {
    let span = CANVAS_WIDTH - ENEMY_WIDTH - ENEMY_SPAWN_X;
    ENEMY_SPAWN_X + (index as f32 * ENEMY_SPACING) % span
}

/// Per-run bookkeeping reported to the backend at game over
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub player_id: PlayerId,
    /// 1-based level number
    pub level: u32,
    pub score: u64,
    /// Successful hits taken over the whole run
    pub deaths: u32,
    /// Wall-clock start (ms since epoch) as reported by the driver; see
    /// `wall_clock_secs`
    pub started_at_ms: f64,
    /// Simulated time since the run started (deterministic)
    pub elapsed_secs: f64,
    pub difficulty_level: f32,
}

impl Session {
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            level: 1,
            score: 0,
            deaths: 0,
            started_at_ms: 0.0,
            elapsed_secs: 0.0,
            difficulty_level: 1.0,
        }
    }

    /// Seconds of real time since the run started
    ///
    /// Unlike `elapsed_secs` this includes level loading, background tabs
    /// and clamped frames. This is the completion time the backend records.
    pub fn wall_clock_secs(&self, now_ms: f64) -> f64 {
        ((now_ms - self.started_at_ms) / 1000.0).max(0.0)
    }
}

/// Read-only snapshot of a finished run, handed to the submission seam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub player_id: PlayerId,
    pub level: u32,
    pub score: u64,
    pub deaths: u32,
    pub completion_time: f64,
    pub difficulty_level: f32,
    pub final_lives: u32,
}

/// Things that happened during a tick or a lifecycle call
///
/// The driver drains these after each frame and performs the side effects
/// (network calls, DOM updates) outside the simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The driver should fetch the config for `level` and call `apply_config`
    ConfigRequested { level: u32 },
    EnemyStomped { enemy_id: u32 },
    CharacterHit { lives_left: u32 },
    LevelCleared { level: u32, score: u64 },
    /// Emitted exactly once per run
    GameOver(SessionSummary),
}

/// Box and flicker state for drawing the character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterView {
    pub rect: Rect,
    pub flash: bool,
}

/// Box and liveness for drawing an enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyView {
    pub rect: Rect,
    pub alive: bool,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    pub character: CharacterView,
    pub enemies: Vec<EnemyView>,
    pub platforms: Vec<Rect>,
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub difficulty_level: f32,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub character: Character,
    /// Sorted by id for deterministic iteration
    pub enemies: Vec<Enemy>,
    pub platforms: Vec<Platform>,
    pub session: Session,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Pending events for the driver
    #[serde(skip)]
    pub(super) events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create the pre-start state for a registered player
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            phase: GamePhase::NotStarted,
            character: Character::spawn(),
            enemies: Vec::new(),
            platforms: Platform::layout(),
            session: Session::new(player_id),
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Ask the driver for the current level's config
    ///
    /// Only valid before the run starts (or after a failed fetch); returns
    /// false otherwise.
    pub fn request_level(&mut self) -> bool {
        if self.phase != GamePhase::NotStarted {
            return false;
        }
        let level = self.session.level;
        self.phase = GamePhase::AwaitingConfig { level };
        self.events.push(GameEvent::ConfigRequested { level });
        log::info!("Requesting config for level {}", level);
        true
    }

    /// Build the level from a fetched difficulty descriptor
    ///
    /// Returns false and changes nothing if no fetch for `level` is
    /// outstanding (e.g. the player restarted while it was in flight).
    pub fn apply_config(&mut self, level: u32, config: &LevelConfig, now_ms: f64) -> bool {
        match self.phase {
            GamePhase::AwaitingConfig { level: awaited } if awaited == level => {}
            phase => {
                log::warn!("Ignoring config for level {} in phase {:?}", level, phase);
                return false;
            }
        }

        if level == 1 {
            self.session.started_at_ms = now_ms;
            self.session.elapsed_secs = 0.0;
        }
        self.session.level = level;
        self.session.difficulty_level = config.difficulty_level;

        self.character = Character::spawn();
        self.platforms = Platform::layout();
        self.enemies.clear();
        for i in 0..config.enemy_count {
            let id = self.next_entity_id();
            self.enemies
                .push(Enemy::new(id, enemy_spawn_x(i), ENEMY_SPAWN_Y, config.enemy_speed));
        }

        self.phase = GamePhase::Running;
        log::info!(
            "Level {}: {} enemies at speed {:.2} (difficulty {:.1})",
            level,
            config.enemy_count,
            config.enemy_speed,
            config.difficulty_level
        );
        true
    }

    /// Config fetch failed: fall back to the pre-start state untouched
    pub fn config_failed(&mut self) {
        if let GamePhase::AwaitingConfig { level } = self.phase {
            log::warn!("Config for level {} unavailable, back to start screen", level);
            self.phase = GamePhase::NotStarted;
        }
    }

    /// Start over with the same player, discarding entities and score
    pub fn restart(&mut self) {
        let player_id = self.session.player_id.clone();
        self.session = Session::new(player_id);
        self.character = Character::spawn();
        self.enemies.clear();
        self.platforms = Platform::layout();
        self.phase = GamePhase::NotStarted;
        log::info!("Restarting run for player {}", self.session.player_id);
        self.request_level();
    }

    /// Number of enemies still in play
    pub fn alive_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }

    /// Snapshot of the session for submission
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            player_id: self.session.player_id.clone(),
            level: self.session.level,
            score: self.session.score,
            deaths: self.session.deaths,
            completion_time: self.session.elapsed_secs,
            difficulty_level: self.session.difficulty_level,
            final_lives: self.character.lives,
        }
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            phase: self.phase,
            character: CharacterView {
                rect: self.character.rect(),
                flash: self.character.flash(),
            },
            enemies: self
                .enemies
                .iter()
                .map(|e| EnemyView {
                    rect: e.rect(),
                    alive: e.alive,
                })
                .collect(),
            platforms: self.platforms.iter().map(Platform::rect).collect(),
            score: self.session.score,
            lives: self.character.lives,
            level: self.session.level,
            difficulty_level: self.session.difficulty_level,
        }
    }

    /// Take all pending events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
