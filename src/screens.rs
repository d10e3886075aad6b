//! Screen flow
//!
//! Sequences start, settings, play and game over. Input events are drained
//! first; the play session then ticks once, so a transition requested this
//! frame takes effect before the next tick.

use std::sync::Arc;

use glam::Vec2;

use crate::assets::SpriteCatalog;
use crate::platform::{FrameInput, InputEvent, Key, MenuAction};
use crate::settings::Settings;
use crate::sim::{PlaySession, Rect, TickInput, tick};
use crate::ui::{HudSnapshot, Notice};

/// On-screen "Back" button shown during play (top-left corner)
pub const BACK_BUTTON: Rect = Rect::new(Vec2::new(110.0, 75.0), Vec2::new(120.0, 50.0));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Start,
    Settings,
    Play,
    GameOver,
}

/// Result of one frame, checked by the outer loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug)]
pub struct ScreenStateMachine {
    screen: Screen,
    /// Committed, process-wide settings
    settings: Settings,
    /// Working copy while the settings screen is open
    draft: Option<Settings>,
    session: Option<PlaySession>,
    catalog: Arc<dyn SpriteCatalog>,
    notice: Option<Notice>,
    /// Seed for the next session
    seed: u64,
    /// Let the autopilot steer during play
    pub idle_mode: bool,
}

impl ScreenStateMachine {
    pub fn new(settings: Settings, catalog: Arc<dyn SpriteCatalog>, seed: u64) -> Self {
        Self {
            screen: Screen::Start,
            settings,
            draft: None,
            session: None,
            catalog,
            notice: None,
            seed,
            idle_mode: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Settings as edited on the settings screen (committed on leave)
    pub fn draft(&self) -> Option<&Settings> {
        self.draft.as_ref()
    }

    pub fn session(&self) -> Option<&PlaySession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut PlaySession> {
        self.session.as_mut()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// HUD values while a session exists
    pub fn hud(&self) -> Option<HudSnapshot> {
        self.session
            .as_ref()
            .map(|s| HudSnapshot::from_session(s, self.notice.as_ref()))
    }

    /// Run one frame: drain events, then tick the session if playing
    pub fn frame(&mut self, input: &FrameInput, dt_ms: f32) -> Flow {
        if let Some(notice) = &mut self.notice {
            if !notice.update(dt_ms) {
                self.notice = None;
            }
        }

        for event in &input.events {
            if self.handle_event(event) == Flow::Exit {
                return Flow::Exit;
            }
        }

        if self.screen == Screen::Play {
            let tick_input = TickInput {
                pointer_x: input.pointer_x(),
                idle_mode: self.idle_mode,
            };
            let ended = match &mut self.session {
                Some(session) => tick(session, &tick_input, dt_ms).ended,
                None => false,
            };
            if ended {
                self.screen = Screen::GameOver;
            }
        }

        Flow::Continue
    }

    pub fn handle_event(&mut self, event: &InputEvent) -> Flow {
        match (self.screen, event) {
            (Screen::Start, InputEvent::Menu(MenuAction::Start)) => self.start_session(),
            (Screen::Start, InputEvent::Menu(MenuAction::OpenSettings)) => {
                self.draft = Some(self.settings.clone());
                self.screen = Screen::Settings;
            }
            (
                Screen::Start,
                InputEvent::Menu(MenuAction::Quit)
                | InputEvent::KeyDown(Key::Escape)
                | InputEvent::KeyDown(Key::Q),
            ) => return Flow::Exit,

            (Screen::Settings, InputEvent::Menu(MenuAction::SetVolume(volume))) => {
                if let Some(draft) = &mut self.draft {
                    draft.set_volume(*volume);
                }
            }
            (Screen::Settings, InputEvent::Menu(MenuAction::SetDifficulty(tier))) => {
                if let Some(draft) = &mut self.draft {
                    draft.difficulty = *tier;
                }
            }
            (
                Screen::Settings,
                InputEvent::Menu(MenuAction::Back)
                | InputEvent::KeyDown(Key::Escape)
                | InputEvent::KeyDown(Key::Q),
            ) => {
                if let Some(draft) = self.draft.take() {
                    log::info!(
                        "Settings saved: volume={:.2}, difficulty={}",
                        draft.volume,
                        draft.difficulty
                    );
                    self.settings = draft;
                }
                self.screen = Screen::Start;
            }

            (Screen::Play, InputEvent::KeyDown(Key::Escape)) => self.abandon_session(),
            (Screen::Play, InputEvent::PointerDown(pos)) if BACK_BUTTON.contains_point(*pos) => {
                self.abandon_session()
            }

            (Screen::GameOver, InputEvent::KeyDown(Key::R)) => self.start_session(),
            (Screen::GameOver, InputEvent::KeyDown(Key::C)) => self.continue_session(),
            (
                Screen::GameOver,
                InputEvent::KeyDown(Key::Q) | InputEvent::Menu(MenuAction::Quit),
            ) => {
                if let Some(session) = &self.session {
                    log::info!(
                        "Final score {} ({} coins)",
                        session.player.score,
                        session.player.coins_collected
                    );
                }
                return Flow::Exit;
            }

            _ => {}
        }
        Flow::Continue
    }

    /// Fresh session using the current settings
    fn start_session(&mut self) {
        let config = self.settings.session_config(self.seed);
        self.seed = self.seed.wrapping_add(1);
        self.session = Some(PlaySession::new(config, Arc::clone(&self.catalog)));
        self.notice = None;
        self.screen = Screen::Play;
    }

    fn continue_session(&mut self) {
        let Some(session) = &mut self.session else {
            return;
        };
        match session.continue_round() {
            Ok(()) => {
                self.notice = None;
                self.screen = Screen::Play;
            }
            Err(err) => {
                log::warn!("Continue rejected: {}", err);
                self.notice = Some(Notice::new(err.to_string()));
            }
        }
    }

    fn abandon_session(&mut self) {
        self.session = None;
        self.screen = Screen::Start;
        log::info!("Round abandoned");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SpriteSheet;
    use crate::consts::*;
    use crate::error::ContinueError;
    use crate::settings::Difficulty;
    use crate::sim::{Behavior, Entity, SessionPhase};

    fn machine() -> ScreenStateMachine {
        ScreenStateMachine::new(
            Settings::default(),
            Arc::new(SpriteSheet::placeholder()),
            7,
        )
    }

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    /// Park a motionless rock on the player, skipping the countdown
    fn doom(machine: &mut ScreenStateMachine) {
        let session = machine.session_mut().unwrap();
        session.phase = SessionPhase::Playing;
        session.countdown_ms = 0.0;
        session.player.active = true;
        session.player.pos.y = session.player.target_y;
        let pos = session.player.pos;
        session.field.insert(Entity::new(
            0,
            Behavior::Obstacle,
            pos,
            Vec2::splat(150.0),
            0.0,
        ));
    }

    fn play_until_game_over(machine: &mut ScreenStateMachine) {
        for _ in 0..1_000 {
            machine.frame(&idle(), FRAME_MS);
            if machine.screen() == Screen::GameOver {
                return;
            }
        }
        panic!("round never ended");
    }

    #[test]
    fn test_initial_and_quit() {
        let mut m = machine();
        assert_eq!(m.screen(), Screen::Start);
        assert_eq!(m.frame(&FrameInput::key(Key::Q), FRAME_MS), Flow::Exit);
        let mut m = machine();
        assert_eq!(m.frame(&FrameInput::key(Key::Escape), FRAME_MS), Flow::Exit);
    }

    #[test]
    fn test_settings_commit_on_leave() {
        let mut m = machine();
        m.frame(&FrameInput::menu(MenuAction::OpenSettings), FRAME_MS);
        assert_eq!(m.screen(), Screen::Settings);

        let edits = FrameInput::default()
            .with_event(InputEvent::Menu(MenuAction::SetVolume(0.9)))
            .with_event(InputEvent::Menu(MenuAction::SetDifficulty(Difficulty::Hard)));
        m.frame(&edits, FRAME_MS);
        // Not committed while the screen is open
        assert_eq!(m.settings().difficulty, Difficulty::Medium);
        assert_eq!(m.draft().unwrap().difficulty, Difficulty::Hard);

        m.frame(&FrameInput::key(Key::Escape), FRAME_MS);
        assert_eq!(m.screen(), Screen::Start);
        assert_eq!(m.settings().difficulty, Difficulty::Hard);
        assert_eq!(m.settings().volume, 0.9);

        m.frame(&FrameInput::menu(MenuAction::Start), FRAME_MS);
        assert_eq!(m.session().unwrap().config.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_escape_abandons_without_score() {
        let mut m = machine();
        m.frame(&FrameInput::menu(MenuAction::Start), FRAME_MS);
        assert_eq!(m.screen(), Screen::Play);
        m.session_mut().unwrap().player.score = 500;

        m.frame(&FrameInput::key(Key::Escape), FRAME_MS);
        assert_eq!(m.screen(), Screen::Start);
        assert!(m.session().is_none());
    }

    #[test]
    fn test_back_button_abandons_round() {
        let mut m = machine();
        m.frame(&FrameInput::menu(MenuAction::Start), FRAME_MS);

        // Clicks elsewhere are ignored
        let miss =
            FrameInput::default().with_event(InputEvent::PointerDown(Vec2::new(640.0, 75.0)));
        m.frame(&miss, FRAME_MS);
        assert_eq!(m.screen(), Screen::Play);

        let hit = FrameInput::default().with_event(InputEvent::PointerDown(BACK_BUTTON.center));
        m.frame(&hit, FRAME_MS);
        assert_eq!(m.screen(), Screen::Start);
        assert!(m.session().is_none());
    }

    #[test]
    fn test_restart_rereads_difficulty() {
        let mut m = machine();
        m.frame(&FrameInput::menu(MenuAction::Start), FRAME_MS);
        let first_seed = m.session().unwrap().config.seed;
        doom(&mut m);
        m.session_mut().unwrap().player.score = 40;
        play_until_game_over(&mut m);

        m.settings_mut().difficulty = Difficulty::Easy;
        m.frame(&FrameInput::key(Key::R), FRAME_MS);
        assert_eq!(m.screen(), Screen::Play);
        let session = m.session().unwrap();
        assert_eq!(session.config.difficulty, Difficulty::Easy);
        assert_ne!(session.config.seed, first_seed);
        assert_eq!(session.player.score, 0);
    }

    #[test]
    fn test_continue_cap_shows_notice() {
        let mut m = machine();
        m.frame(&FrameInput::menu(MenuAction::Start), FRAME_MS);
        doom(&mut m);
        play_until_game_over(&mut m);

        for _ in 0..MAX_CONTINUES {
            m.frame(&FrameInput::key(Key::C), FRAME_MS);
            assert_eq!(m.screen(), Screen::Play);
            assert!(m.session().unwrap().invincibility_ms > 0.0);
            play_until_game_over(&mut m);
        }

        m.frame(&FrameInput::key(Key::C), FRAME_MS);
        assert_eq!(m.screen(), Screen::GameOver);
        let expected = ContinueError::LimitReached { used: 2, max: 2 }.to_string();
        assert_eq!(m.notice().map(|n| n.text.as_str()), Some(expected.as_str()));
        assert_eq!(m.hud().unwrap().notice, Some(expected));

        // The notice fades
        for _ in 0..200 {
            m.frame(&idle(), FRAME_MS);
        }
        assert!(m.notice().is_none());
    }

    #[test]
    fn test_quit_from_game_over() {
        let mut m = machine();
        m.frame(&FrameInput::menu(MenuAction::Start), FRAME_MS);
        doom(&mut m);
        play_until_game_over(&mut m);

        assert_eq!(
            m.frame(&FrameInput::menu(MenuAction::Quit), FRAME_MS),
            Flow::Exit
        );
    }

    #[test]
    fn test_game_over_ignores_unrelated_input() {
        let mut m = machine();
        m.frame(&FrameInput::menu(MenuAction::Start), FRAME_MS);
        doom(&mut m);
        play_until_game_over(&mut m);

        let noise = FrameInput::new(Some(Vec2::new(10.0, 10.0)))
            .with_event(InputEvent::PointerDown(Vec2::new(10.0, 10.0)))
            .with_event(InputEvent::KeyDown(Key::Escape));
        assert_eq!(m.frame(&noise, FRAME_MS), Flow::Continue);
        assert_eq!(m.screen(), Screen::GameOver);
    }
}
