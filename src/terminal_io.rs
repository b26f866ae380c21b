use std::collections::{HashMap, HashSet};
use std::ops::Range;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode,
};
use log::{debug, info};

use crate::constants::HOLD_WINDOW_FRAMES;

/// Logical keys the match reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Slow,
    Ability,
    Quit,
}

impl Key {
    fn from_code(code: KeyCode, modifiers: KeyModifiers) -> Option<Key> {
        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Key::Quit),
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Key::Up),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Key::Down),
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::Left),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::Right),
            KeyCode::Modifier(ModifierKeyCode::LeftShift)
            | KeyCode::Modifier(ModifierKeyCode::RightShift) => Some(Key::Slow),
            KeyCode::Char('b') | KeyCode::Char('B') => Some(Key::Ability),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Key::Quit),
            _ => None,
        }
    }

    /// Shift shows up either as a modifier flag or as an uppercase letter.
    fn implies_slow(code: KeyCode, modifiers: KeyModifiers) -> bool {
        modifiers.contains(KeyModifiers::SHIFT)
            || matches!(code, KeyCode::Char('W' | 'A' | 'S' | 'D'))
    }
}

/// What the match sees for one frame: the held-key set plus key-down edges.
#[derive(Clone, Debug, Default)]
pub struct FrameInput {
    pub held: HashSet<Key>,
    pub pressed: Vec<Key>,
}

impl FrameInput {
    pub fn holding(keys: &[Key]) -> Self {
        FrameInput { held: keys.iter().copied().collect(), pressed: Vec::new() }
    }

    pub fn pressing(keys: &[Key]) -> Self {
        FrameInput { held: HashSet::new(), pressed: keys.to_vec() }
    }

    pub fn quit_requested(&self) -> bool {
        self.pressed.contains(&Key::Quit)
    }
}

/// Turns a stream of crossterm key events into per-frame held/pressed keys.
///
/// Terminals with keyboard enhancement report releases and the key is dropped
/// immediately. Classic terminals only repeat presses, so a key also expires
/// `HOLD_WINDOW_FRAMES` after its last press.
#[derive(Default)]
pub struct KeyTracker {
    key_frame: HashMap<Key, u64>,
}

impl KeyTracker {
    pub fn new() -> Self {
        KeyTracker::default()
    }

    fn is_held(&self, key: Key, frame: u64) -> bool {
        self.key_frame
            .get(&key)
            .is_some_and(|&last| frame.saturating_sub(last) <= HOLD_WINDOW_FRAMES)
    }

    /// Records one event. Returns the key when this event is a fresh key-down.
    pub fn record(&mut self, event: &Event, frame: u64) -> Option<Key> {
        let Event::Key(KeyEvent { code, modifiers, kind, .. }) = *event else {
            return None;
        };
        let key = Key::from_code(code, modifiers)?;
        match kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                let fresh = kind == KeyEventKind::Press && !self.is_held(key, frame);
                self.key_frame.insert(key, frame);
                if Key::implies_slow(code, modifiers) {
                    self.key_frame.insert(Key::Slow, frame);
                }
                fresh.then_some(key)
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&key);
                None
            }
        }
    }

    pub fn held(&self, frame: u64) -> HashSet<Key> {
        self.key_frame
            .keys()
            .copied()
            .filter(|&key| self.is_held(key, frame))
            .collect()
    }

    pub fn collect(&mut self, events: impl IntoIterator<Item = Event>, frame: u64) -> FrameInput {
        let pressed = events
            .into_iter()
            .filter_map(|event| self.record(&event, frame))
            .collect();
        FrameInput { held: self.held(frame), pressed }
    }
}

// --- SimulatedInput for debugging ---
pub struct SimulatedInput {
    events: HashMap<u64, Vec<Event>>,
}

impl SimulatedInput {
    pub fn new(events: HashMap<u64, Vec<Event>>) -> Self {
        SimulatedInput { events }
    }

    pub fn empty() -> Self {
        SimulatedInput::new(HashMap::new())
    }

    pub fn press(mut self, frame: u64, code: KeyCode) -> Self {
        self.events.entry(frame).or_default().push(Event::Key(code.into()));
        self
    }

    /// Re-sends the press every frame of `frames`, like OS key repeat.
    pub fn hold(mut self, frames: Range<u64>, code: KeyCode) -> Self {
        for frame in frames {
            self = self.press(frame, code);
        }
        self
    }

    pub fn drain(&mut self, frame: u64) -> Vec<Event> {
        self.events.remove(&frame).unwrap_or_default()
    }

    /// The script `--debug` runs: wander, pop the shield, then quit.
    pub fn demo_script() -> Self {
        SimulatedInput::empty()
            .hold(1..20, KeyCode::Left)
            .hold(20..40, KeyCode::Up)
            .press(60, KeyCode::Char('b'))
            .hold(80..100, KeyCode::Char('D'))
            .press(400, KeyCode::Char('q'))
    }
}

/// Background-music collaborator. The terminal build has no audio device, so
/// this tracks play state and logs transitions.
pub struct Soundtrack {
    enabled: bool,
    playing: bool,
}

impl Soundtrack {
    pub fn new(enabled: bool) -> Self {
        Soundtrack { enabled, playing: false }
    }

    pub fn play(&mut self) {
        if self.enabled && !self.playing {
            self.playing = true;
            info!("Soundtrack started.");
        }
    }

    pub fn stop(&mut self) {
        if self.playing {
            self.playing = false;
            info!("Soundtrack stopped.");
        } else {
            debug!("Soundtrack stop requested while silent.");
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}
