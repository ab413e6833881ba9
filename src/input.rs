//! Keyboard input handling
//!
//! Tracks which keys are held and turns them into one `TickInput` per frame.
//! Left cat: W/S. Right cat: arrow keys. Space toggles pause.

use std::collections::HashSet;

use crate::sim::TickInput;

/// What a key press asks the game to do immediately
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Nothing beyond updating held-key state
    None,
    /// Toggle play/pause
    TogglePause,
}

/// Held-key tracker
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<String>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle key down event (`key` is a DOM `KeyboardEvent.key` value)
    pub fn key_down(&mut self, key: &str) -> KeyAction {
        if key == " " {
            return KeyAction::TogglePause;
        }
        self.held.insert(key.to_string());
        KeyAction::None
    }

    /// Handle key up event
    pub fn key_up(&mut self, key: &str) {
        self.held.remove(key);
    }

    /// Forget all held keys (e.g. on window blur)
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    fn any(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.held.contains(*k))
    }

    /// Intents for this frame
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            left_up: self.any(&["w", "W"]),
            left_down: self.any(&["s", "S"]),
            right_up: self.any(&["ArrowUp"]),
            right_down: self.any(&["ArrowDown"]),
        }
    }
}
