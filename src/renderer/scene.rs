//! Scene generation: snapshot in, draw commands out
//!
//! Painter's order: sky, platforms, character, enemies, HUD, banners.

use super::commands::{Color, DrawCommand, TextAlign};
use crate::Settings;
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::sim::{CharacterView, GamePhase, Rect, RenderSnapshot};

const SKY: Color = Color::rgb(0x87, 0xCE, 0xEB);
const PLATFORM: Color = Color::rgb(0x00, 0xFF, 0x00);
const CHARACTER: Color = Color::rgb(0xFF, 0x00, 0x00);
const ENEMY: Color = Color::rgb(0x8B, 0x45, 0x13);
const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
const ENEMY_EYE: Color = Color::rgb(0xFF, 0x00, 0x00);

const HUD_FONT: &str = "20px Arial";
const BANNER_FONT: &str = "bold 36px Arial";
const HUD_X: f32 = 10.0;
const HUD_FIRST_LINE: f32 = 30.0;
const HUD_LINE_HEIGHT: f32 = 25.0;

/// Build the full frame for a snapshot
pub fn build(snapshot: &RenderSnapshot, settings: &Settings) -> Vec<DrawCommand> {
    let mut out = Vec::with_capacity(16 + snapshot.enemies.len() * 3);

    fill(&mut out, Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT), SKY);

    for platform in &snapshot.platforms {
        fill(&mut out, *platform, PLATFORM);
    }

    character(&mut out, &snapshot.character, settings.reduced_flashing);

    for enemy in snapshot.enemies.iter().filter(|e| e.alive) {
        let r = enemy.rect;
        fill(&mut out, r, ENEMY);
        fill(&mut out, Rect::new(r.x + 4.0, r.y + 4.0, 3.0, 3.0), ENEMY_EYE);
        fill(&mut out, Rect::new(r.x + 17.0, r.y + 4.0, 3.0, 3.0), ENEMY_EYE);
    }

    hud(&mut out, snapshot, settings.show_difficulty);

    match snapshot.phase {
        GamePhase::AwaitingConfig { level } => {
            banner(&mut out, format!("Loading level {}...", level))
        }
        GamePhase::LevelCleared { .. } => {
            banner(&mut out, format!("Level {} cleared!", snapshot.level))
        }
        GamePhase::NotStarted | GamePhase::Running | GamePhase::GameOver => {}
    }

    out
}

fn fill(out: &mut Vec<DrawCommand>, rect: Rect, color: Color) {
    out.push(DrawCommand::FillRect { rect, color });
}

fn character(out: &mut Vec<DrawCommand>, view: &CharacterView, reduced_flashing: bool) {
    let r = view.rect;
    let body = if view.flash && !reduced_flashing {
        CHARACTER.with_alpha(0.5)
    } else {
        CHARACTER
    };
    fill(out, r, body);
    // Eyes
    fill(out, Rect::new(r.x + 8.0, r.y + 8.0, 4.0, 4.0), WHITE);
    fill(out, Rect::new(r.x + 20.0, r.y + 8.0, 4.0, 4.0), WHITE);
    // Mustache
    fill(out, Rect::new(r.x + 12.0, r.y + 16.0, 8.0, 2.0), BLACK);
}

fn hud(out: &mut Vec<DrawCommand>, snapshot: &RenderSnapshot, show_difficulty: bool) {
    let mut lines = vec![
        format!("Score: {}", snapshot.score),
        format!("Lives: {}", snapshot.lives),
        format!("Level: {}", snapshot.level),
    ];
    if show_difficulty {
        lines.push(format!("Difficulty: {:.1}", snapshot.difficulty_level));
    }

    for (i, text) in lines.into_iter().enumerate() {
        out.push(DrawCommand::Text {
            text,
            x: HUD_X,
            y: HUD_FIRST_LINE + i as f32 * HUD_LINE_HEIGHT,
            font: HUD_FONT,
            align: TextAlign::Left,
            color: BLACK,
        });
    }
}

fn banner(out: &mut Vec<DrawCommand>, text: String) {
    out.push(DrawCommand::Text {
        text,
        x: CANVAS_WIDTH / 2.0,
        y: CANVAS_HEIGHT / 3.0,
        font: BANNER_FONT,
        align: TextAlign::Center,
        color: BLACK,
    });
}
