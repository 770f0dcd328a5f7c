use deepspace_common::Heading;

/// Logical keys the demo understands. Window backends map their own key
/// codes onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    /// Single step forward.
    Forward,
    /// Single step back.
    Back,
    Quit,
}

/// A high-level action the view controller consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Held movement: one movement step along the heading per frame.
    Move(Heading),
    /// One unit along the heading.
    Nudge(Heading),
    Quit,
    /// No-op (used for input mapping that hasn't been bound yet).
    Noop,
}

impl Key {
    /// Heading a held key moves the viewer along, if it is a movement key.
    /// Screen Y grows downward, so the up arrow heads `Down`.
    pub fn held_heading(self) -> Option<Heading> {
        match self {
            Key::Left => Some(Heading::West),
            Key::Right => Some(Heading::East),
            Key::Up => Some(Heading::Down),
            Key::Down => Some(Heading::Up),
            _ => None,
        }
    }

    /// One-off action fired when the key goes down.
    pub fn press_action(self) -> Action {
        match self {
            Key::Forward => Action::Nudge(Heading::North),
            Key::Back => Action::Nudge(Heading::South),
            Key::Quit => Action::Quit,
            _ => Action::Noop,
        }
    }
}
