//! Hidden admin-panel entry triggers.
//!
//! # Responsibility
//! - Recognize the Ctrl/Cmd+Shift+A shortcut.
//! - Recognize the typed magic word `admin` within a rolling key buffer.
//!
//! # Invariants
//! - The buffer holds at most `MAGIC_WORD.len()` letters.
//! - A pause of `SEQUENCE_TIMEOUT` or longer between letters clears it.
//! - Any trigger clears the buffer.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const MAGIC_WORD: &str = "admin";
pub const SEQUENCE_TIMEOUT: Duration = Duration::from_secs(2);

/// One keyboard event as reported by the host UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Logical key value, e.g. `"a"`, `"A"`, `"Enter"`.
    pub key: String,
    pub ctrl: bool,
    /// Command key on macOS.
    pub meta: bool,
    pub shift: bool,
}

impl KeyEvent {
    pub fn plain(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            meta: false,
            shift: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessTrigger {
    Shortcut,
    MagicWord,
}

#[derive(Debug, Default)]
pub struct AdminAccessDetector {
    buffer: VecDeque<char>,
    last_letter_at: Option<Instant>,
}

impl AdminAccessDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one key event observed at `at`.
    ///
    /// Returns the trigger when this event opens the admin prompt.
    pub fn on_key(&mut self, event: &KeyEvent, at: Instant) -> Option<AccessTrigger> {
        if (event.ctrl || event.meta) && event.shift && event.key == "A" {
            self.reset();
            return Some(AccessTrigger::Shortcut);
        }

        let letter = single_letter(&event.key)?;
        if let Some(previous) = self.last_letter_at {
            if at.saturating_duration_since(previous) >= SEQUENCE_TIMEOUT {
                self.buffer.clear();
            }
        }
        self.last_letter_at = Some(at);

        self.buffer.push_back(letter);
        while self.buffer.len() > MAGIC_WORD.len() {
            self.buffer.pop_front();
        }

        if self.buffer.iter().copied().eq(MAGIC_WORD.chars()) {
            self.reset();
            return Some(AccessTrigger::MagicWord);
        }
        None
    }

    /// Letters currently buffered, oldest first.
    pub fn pending(&self) -> String {
        self.buffer.iter().collect()
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.last_letter_at = None;
    }
}

fn single_letter(key: &str) -> Option<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_lowercase()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{AccessTrigger, AdminAccessDetector, KeyEvent};
    use std::time::{Duration, Instant};

    fn type_word(
        detector: &mut AdminAccessDetector,
        word: &str,
        start: Instant,
        gap: Duration,
    ) -> Option<AccessTrigger> {
        let mut last = None;
        for (index, c) in word.chars().enumerate() {
            last = detector.on_key(&KeyEvent::plain(c.to_string()), start + gap * index as u32);
        }
        last
    }

    #[test]
    fn shortcut_triggers_with_ctrl_or_meta() {
        let mut detector = AdminAccessDetector::new();
        let now = Instant::now();
        let ctrl = KeyEvent {
            key: "A".to_string(),
            ctrl: true,
            meta: false,
            shift: true,
        };
        let meta = KeyEvent {
            meta: true,
            ctrl: false,
            ..ctrl.clone()
        };
        assert_eq!(detector.on_key(&ctrl, now), Some(AccessTrigger::Shortcut));
        assert_eq!(detector.on_key(&meta, now), Some(AccessTrigger::Shortcut));
    }

    #[test]
    fn magic_word_triggers_and_clears_buffer() {
        let mut detector = AdminAccessDetector::new();
        let trigger = type_word(
            &mut detector,
            "xxADMIN",
            Instant::now(),
            Duration::from_millis(100),
        );
        assert_eq!(trigger, Some(AccessTrigger::MagicWord));
        assert!(detector.pending().is_empty());
    }

    #[test]
    fn slow_typing_resets_sequence() {
        let mut detector = AdminAccessDetector::new();
        let trigger = type_word(
            &mut detector,
            "admin",
            Instant::now(),
            Duration::from_secs(3),
        );
        assert_eq!(trigger, None);
        assert_eq!(detector.pending(), "n");
    }

    #[test]
    fn named_keys_are_ignored() {
        let mut detector = AdminAccessDetector::new();
        let now = Instant::now();
        assert_eq!(detector.on_key(&KeyEvent::plain("Shift"), now), None);
        assert!(detector.pending().is_empty());
    }
}
