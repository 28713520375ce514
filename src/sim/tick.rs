//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. The order
//! inside a running tick is fixed: input, physics, enemy collisions,
//! platform collisions, then the win/loss check.

use super::collision::{Resolution, Target, landing_platform, resolve};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Key state sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Advance the game state by one fixed timestep
///
/// `dt` only feeds the session clock; movement constants are per tick.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    match state.phase {
        GamePhase::Running => {}
        GamePhase::LevelCleared { ticks_left } => {
            state.session.elapsed_secs += f64::from(dt);
            count_down_to_next_level(state, ticks_left);
            return;
        }
        // Nothing moves before the level exists or after the run ends
        GamePhase::NotStarted | GamePhase::AwaitingConfig { .. } | GamePhase::GameOver => return,
    }

    state.time_ticks += 1;
    state.session.elapsed_secs += f64::from(dt);

    apply_input(state, input);

    state.character.integrate();
    for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
        enemy.integrate();
    }

    resolve_collisions(state);

    if state.character.is_dead() {
        end_run(state);
    } else if state.alive_enemies() == 0 {
        clear_level(state);
    }
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    let character = &mut state.character;
    if input.left {
        character.move_left();
    }
    if input.right {
        character.move_right();
    }
    if input.jump {
        character.jump();
    }
}

/// All enemies first, then the platform landing, against the moved character
fn resolve_collisions(state: &mut GameState) {
    for enemy in state.enemies.iter_mut() {
        let enemy_id = enemy.id;
        match resolve(&mut state.character, Target::Enemy(enemy)) {
            Resolution::Stomp => {
                state.session.score += STOMP_SCORE;
                state.events.push(GameEvent::EnemyStomped { enemy_id });
                log::debug!("Stomped enemy {}", enemy_id);
            }
            Resolution::Damage { lost_life: true } => {
                state.session.deaths += 1;
                let lives_left = state.character.lives;
                state.events.push(GameEvent::CharacterHit { lives_left });
                log::debug!("Hit by enemy {}, {} lives left", enemy_id, lives_left);
            }
            Resolution::Damage { lost_life: false } | Resolution::Landed | Resolution::Ignored => {}
        }
    }

    if let Some(index) = landing_platform(&state.character, &state.platforms) {
        resolve(&mut state.character, Target::Platform(&state.platforms[index]));
    }
}

/// Freeze the run and emit its summary
fn end_run(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    let summary = state.summary();
    log::info!(
        "Game over at level {}: score {}, deaths {}, {:.1}s",
        summary.level,
        summary.score,
        summary.deaths,
        summary.completion_time
    );
    state.events.push(GameEvent::GameOver(summary));
}

fn clear_level(state: &mut GameState) {
    state.session.score += LEVEL_CLEAR_BONUS;
    state.phase = GamePhase::LevelCleared {
        ticks_left: LEVEL_ADVANCE_DELAY_TICKS,
    };
    let level = state.session.level;
    let score = state.session.score;
    log::info!("Level {} cleared, score {}", level, score);
    state.events.push(GameEvent::LevelCleared { level, score });
}

fn count_down_to_next_level(state: &mut GameState, ticks_left: u32) {
    let ticks_left = ticks_left.saturating_sub(1);
    if ticks_left > 0 {
        state.phase = GamePhase::LevelCleared { ticks_left };
        return;
    }

    state.session.level += 1;
    let level = state.session.level;
    state.phase = GamePhase::AwaitingConfig { level };
    state.events.push(GameEvent::ConfigRequested { level });
    log::info!("Advancing to level {}", level);
}
