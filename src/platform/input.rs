//! Input events
//!
//! The host translates raw window events into these. Menu widgets are laid
//! out by the UI collaborator, which reports the resolved action instead of a
//! click position.

use glam::Vec2;

use crate::settings::Difficulty;

/// Keys the screen flow reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    /// Restart
    R,
    /// Continue
    C,
    /// Quit
    Q,
}

/// Menu choices resolved by the UI collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuAction {
    Start,
    OpenSettings,
    Back,
    Quit,
    SetVolume(f32),
    SetDifficulty(Difficulty),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    /// Primary button pressed at a screen position
    PointerDown(Vec2),
    Menu(MenuAction),
}

/// Everything gathered for one frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Pointer position (None when outside the window)
    pub pointer: Option<Vec2>,
    pub events: Vec<InputEvent>,
}

impl FrameInput {
    pub fn new(pointer: Option<Vec2>) -> Self {
        Self {
            pointer,
            events: Vec::new(),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    pub fn with_event(mut self, event: InputEvent) -> Self {
        self.push(event);
        self
    }

    pub fn key(key: Key) -> Self {
        Self::default().with_event(InputEvent::KeyDown(key))
    }

    pub fn menu(action: MenuAction) -> Self {
        Self::default().with_event(InputEvent::Menu(action))
    }

    pub fn pointer_x(&self) -> Option<f32> {
        self.pointer.map(|p| p.x)
    }
}
