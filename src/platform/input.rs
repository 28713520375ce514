//! Keyboard state to per-tick input
//!
//! Key events only flip held flags; the simulation sees them once per tick
//! through `HeldKeys::sample`. There is no buffering: a tap shorter than a
//! tick can be missed, same as a browser polling its key map.

use crate::sim::TickInput;

/// Game-level meaning of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Left,
    Right,
    Jump,
    /// Toggle the autopilot demo mode
    ToggleAutopilot,
}

impl Action {
    /// Map a `KeyboardEvent.code` value (layout independent)
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Action::Left),
            "ArrowRight" | "KeyD" => Some(Action::Right),
            "Space" | "ArrowUp" | "KeyW" => Some(Action::Jump),
            "KeyI" => Some(Action::ToggleAutopilot),
            _ => None,
        }
    }

    /// Whether the browser's default handling (page scroll) should be
    /// suppressed for this action
    pub fn blocks_default(&self) -> bool {
        matches!(self, Action::Jump | Action::Left | Action::Right)
    }
}

/// Which movement keys are currently down
///
/// Two keys can map to the same action, so each physical key is tracked
/// separately and an action is active while any of its keys is held.
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    held: Vec<String>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press; returns the action it maps to, if any
    pub fn press(&mut self, code: &str) -> Option<Action> {
        let action = Action::from_code(code)?;
        if action != Action::ToggleAutopilot && !self.held.iter().any(|k| k == code) {
            self.held.push(code.to_string());
        }
        Some(action)
    }

    pub fn release(&mut self, code: &str) {
        self.held.retain(|k| k != code);
    }

    /// Drop everything (e.g. the window lost focus mid-press)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    fn active(&self, action: Action) -> bool {
        self.held
            .iter()
            .any(|k| Action::from_code(k) == Some(action))
    }

    /// Snapshot for the next tick
    pub fn sample(&self) -> TickInput {
        TickInput {
            left: self.active(Action::Left),
            right: self.active(Action::Right),
            jump: self.active(Action::Jump),
        }
    }
}
