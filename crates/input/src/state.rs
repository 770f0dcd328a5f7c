use crate::action::{Action, Key};
use std::collections::HashSet;

/// Currently held keys.
#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key going down. Returns the one-off action it fires, or
    /// `None` for auto-repeat of a key already held.
    pub fn press(&mut self, key: Key) -> Option<Action> {
        if !self.held.insert(key) {
            return None;
        }
        match key.press_action() {
            Action::Noop => None,
            action => {
                tracing::debug!(?key, ?action, "key pressed");
                Some(action)
            }
        }
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Drop all held keys, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Continuous movement for this frame.
    ///
    /// Each axis is independent, so diagonals work. Within an axis only one
    /// direction applies: left beats right and up beats down.
    pub fn held_actions(&self) -> Vec<Action> {
        let mut actions = Vec::with_capacity(2);
        for (first, second) in [(Key::Left, Key::Right), (Key::Up, Key::Down)] {
            let key = if self.is_held(first) {
                first
            } else if self.is_held(second) {
                second
            } else {
                continue;
            };
            if let Some(heading) = key.held_heading() {
                actions.push(Action::Move(heading));
            }
        }
        actions
    }
}
