//! Headless demo driver
//!
//! Plays rounds with the autopilot and logs what happens. Windowing, drawing
//! and sound belong to a host; this binary only exercises the core loop.
//!
//! Usage: `surf-dash [difficulty] [seconds] [seed]`
//! Settings JSON may be supplied through `SURF_DASH_SETTINGS`; set
//! `SURF_DASH_REALTIME=1` to pace frames at 60 FPS instead of running flat out.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use surf_dash::assets::SpriteSheet;
use surf_dash::consts::*;
use surf_dash::platform::{FrameInput, FrameLimiter, InputEvent, Key, MenuAction};
use surf_dash::renderer::build_scene;
use surf_dash::{Difficulty, Flow, Screen, ScreenStateMachine, Settings};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut settings = match std::env::var("SURF_DASH_SETTINGS") {
        Ok(json) => Settings::from_json(&json)?,
        Err(_) => Settings::default(),
    };

    let mut args = std::env::args().skip(1);
    if let Some(tier) = args.next() {
        settings.difficulty = tier.parse::<Difficulty>()?;
    }
    let seconds: f32 = match args.next() {
        Some(s) => s.parse()?,
        None => 60.0,
    };
    let seed: u64 = match args.next() {
        Some(s) => s.parse()?,
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0),
    };
    let realtime = std::env::var_os("SURF_DASH_REALTIME").is_some();

    log::info!(
        "Surf Dash (headless) starting: difficulty={}, {}s, seed={}",
        settings.difficulty,
        seconds,
        seed
    );

    let mut machine = ScreenStateMachine::new(settings, Arc::new(SpriteSheet::placeholder()), seed);
    machine.idle_mode = true;
    machine.frame(&FrameInput::menu(MenuAction::Start), FRAME_MS);

    let mut limiter = FrameLimiter::new(TARGET_FPS);
    let mut simulated_ms = 0.0;
    let mut frames: u64 = 0;

    while simulated_ms < seconds * 1000.0 {
        let dt_ms = if realtime { limiter.wait() } else { FRAME_MS };

        let mut input = FrameInput::default();
        if machine.screen() == Screen::GameOver {
            let can_continue = machine
                .session()
                .map(|s| s.continues_left() > 0)
                .unwrap_or(false);
            input = FrameInput::key(if can_continue { Key::C } else { Key::R });
        }

        if machine.frame(&input, dt_ms) == Flow::Exit {
            break;
        }
        simulated_ms += dt_ms;
        frames += 1;

        if frames % (TARGET_FPS as u64 * 10) == 0 {
            if let (Some(hud), Some(session)) = (machine.hud(), machine.session()) {
                let scene = build_scene(session);
                log::info!(
                    "t={:.0}s score={} coins={} entities={} theme={:?}",
                    simulated_ms / 1000.0,
                    hud.score,
                    hud.coins,
                    scene.items.len(),
                    hud.theme
                );
            }
        }
    }

    let (score, coins) = machine
        .hud()
        .map(|hud| (hud.score, hud.coins))
        .unwrap_or((0, 0));
    if machine.screen() == Screen::GameOver {
        machine.handle_event(&InputEvent::KeyDown(Key::Q));
    }

    println!("Simulated {:.1}s in {} frames", simulated_ms / 1000.0, frames);
    println!("Last run: score {} with {} coins", score, coins);
    Ok(())
}
