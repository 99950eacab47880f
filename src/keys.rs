//! Keys: the controller's input alphabet, decoupled from any particular
//! input collaborator (§5, "the SBDI bus and ADC key matrix are out of
//! scope; model the controller's input as an abstract key code instead").

use crossterm::event::{KeyCode as CtKeyCode, KeyEvent, KeyModifiers};

/// A single logical key press. Values below `0x80` are printable ASCII
/// (digits, letters, operator glyphs); values at and above `0x80` are
/// control keys (arrows, delete, mode switches) that have no character
/// representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub const LEFT: KeyCode = KeyCode(0x80);
    pub const RIGHT: KeyCode = KeyCode(0x81);
    pub const UP: KeyCode = KeyCode(0x82);
    pub const DOWN: KeyCode = KeyCode(0x83);
    pub const DELETE: KeyCode = KeyCode(0x84);
    pub const CLEAR: KeyCode = KeyCode(0x85);
    pub const ENTER: KeyCode = KeyCode(0x86);
    pub const FRACTION: KeyCode = KeyCode(0x87);
    pub const EXPONENT: KeyCode = KeyCode(0x88);
    pub const SQRT: KeyCode = KeyCode(0x89);
    pub const SHIFT: KeyCode = KeyCode(0x8A);
    pub const MODE: KeyCode = KeyCode(0x8B);
    pub const ANS: KeyCode = KeyCode(0x8C);
    pub const MATRIX: KeyCode = KeyCode(0x8D);
    pub const SIGMA: KeyCode = KeyCode(0x8E);
    pub const ABS: KeyCode = KeyCode(0x8F);
    pub const SUBSCRIPT: KeyCode = KeyCode(0x90);
    pub const PIECEWISE: KeyCode = KeyCode(0x91);
    /// Evaluates to a forced decimal approximation instead of an exact
    /// fraction, without changing the persistent `force_decimal` setting
    /// (§4.2 "Enter / Approx").
    pub const APPROX: KeyCode = KeyCode(0x92);

    /// Marks a code's low 10 bits as an analog joystick X reading rather
    /// than a digital key (§6's external key-code contract). The terminal
    /// front-end has no joystick and never sets these; kept so the
    /// in-memory `KeySource` test double can still synthesize them.
    pub const ADCX_MASK: u16 = 0x400;
    pub const ADCY_MASK: u16 = 0x800;

    pub fn is_char(self) -> bool {
        self.0 < 0x80
    }

    pub fn as_char(self) -> Option<u8> {
        self.is_char().then_some(self.0 as u8)
    }
}

/// Abstracts over wherever key events come from, so the controller can be
/// driven by a real terminal or by a scripted sequence in tests (§5).
pub trait KeySource {
    fn next_key(&mut self) -> Option<KeyCode>;
}

/// An in-memory queue of key codes, for headless/test driving.
#[derive(Debug, Default)]
pub struct QueueKeySource {
    queue: std::collections::VecDeque<KeyCode>,
}

impl QueueKeySource {
    pub fn new(keys: impl IntoIterator<Item = KeyCode>) -> Self {
        Self { queue: keys.into_iter().collect() }
    }

    pub fn push(&mut self, key: KeyCode) {
        self.queue.push_back(key);
    }

    pub fn from_str(s: &str) -> Self {
        Self::new(s.bytes().map(|b| KeyCode(b as u16)))
    }
}

impl KeySource for QueueKeySource {
    fn next_key(&mut self) -> Option<KeyCode> {
        self.queue.pop_front()
    }
}

/// Maps a `crossterm` key event onto our abstract `KeyCode` (§5's terminal
/// collaborator).
pub fn from_crossterm(ev: KeyEvent) -> Option<KeyCode> {
    match ev.code {
        CtKeyCode::Char(c) if c.is_ascii() => Some(KeyCode(c as u16)),
        CtKeyCode::Left => Some(KeyCode::LEFT),
        CtKeyCode::Right => Some(KeyCode::RIGHT),
        CtKeyCode::Up => Some(KeyCode::UP),
        CtKeyCode::Down => Some(KeyCode::DOWN),
        CtKeyCode::Backspace => Some(KeyCode::DELETE),
        CtKeyCode::Enter => Some(KeyCode::ENTER),
        CtKeyCode::Esc => Some(KeyCode::CLEAR),
        CtKeyCode::Tab => Some(KeyCode::MODE),
        CtKeyCode::F(1) => Some(KeyCode::ANS),
        CtKeyCode::F(2) => Some(KeyCode::FRACTION),
        CtKeyCode::F(3) => Some(KeyCode::EXPONENT),
        CtKeyCode::F(4) => Some(KeyCode::SQRT),
        CtKeyCode::F(5) => Some(KeyCode::MATRIX),
        CtKeyCode::F(6) => Some(KeyCode::SIGMA),
        CtKeyCode::F(7) => Some(KeyCode::ABS),
        CtKeyCode::F(8) => Some(KeyCode::SUBSCRIPT),
        CtKeyCode::F(9) => Some(KeyCode::PIECEWISE),
        CtKeyCode::F(10) => Some(KeyCode::APPROX),
        _ if ev.modifiers.contains(KeyModifiers::SHIFT) => Some(KeyCode::SHIFT),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_source_drains_in_order() {
        let mut src = QueueKeySource::from_str("12");
        assert_eq!(src.next_key(), Some(KeyCode(b'1' as u16)));
        assert_eq!(src.next_key(), Some(KeyCode(b'2' as u16)));
        assert_eq!(src.next_key(), None);
    }
}
