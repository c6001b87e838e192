//! Eight Ball headless runner
//!
//! Plays a scripted break through the full app stack at 60 Hz and logs what
//! happens. Set `RUST_LOG=debug` to see every collision and sound cue.

use std::path::PathBuf;

use glam::Vec2;

use eightball::audio::LogAudio;
use eightball::consts::FRAME_DT;
use eightball::sim::{FrameInput, GameEvent, GamePhase};
use eightball::{App, Leaderboard, ScreenEvent, Settings};

/// Give up on a shot that has not settled after this many frames
const MAX_FRAMES: u32 = 60 * 60;

fn data_dir() -> PathBuf {
    std::env::var_os("EIGHTBALL_DATA")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn main() {
    env_logger::init();
    log::info!("Eight Ball (headless) starting...");

    let dir = data_dir();
    let settings = Settings::load(&dir.join("settings.json"));
    let leaderboard_path = dir.join("leaderboard.json");
    let leaderboard = Leaderboard::load(&leaderboard_path);

    let mut app = App::new(settings, leaderboard)
        .with_leaderboard_path(leaderboard_path)
        .with_audio(Box::new(LogAudio));
    app.handle(ScreenEvent::StartSelected);
    app.set_names("Player 1", "Player 2");
    app.handle(ScreenEvent::NamesConfirmed);

    // Aim straight at the apex, press, drag back for full power, release
    let cue_pos = app.game.cue_ball().pos;
    let aim = cue_pos + Vec2::new(100.0, 0.0);
    let drag = aim + Vec2::new(0.0, 400.0);
    let script = [
        FrameInput {
            pointer: Some(aim),
            ..Default::default()
        },
        FrameInput {
            pointer: Some(aim),
            primary: true,
            ..Default::default()
        },
        FrameInput {
            pointer: Some(drag),
            ..Default::default()
        },
        FrameInput {
            pointer: Some(drag),
            primary: true,
            ..Default::default()
        },
    ];

    let mut frames = 0;
    let mut input = script.iter().copied();
    loop {
        let frame_input = input.next().unwrap_or_default();
        let events = app.frame(&frame_input, FRAME_DT);
        for event in &events.events {
            match event {
                GameEvent::BallCollision { .. } | GameEvent::CushionHit { .. } => {
                    log::debug!("frame {}: {:?}", frames, event)
                }
                _ => log::info!("frame {}: {:?}", frames, event),
            }
        }

        frames += 1;
        let settled = frames > script.len() as u32 && app.game.phase != GamePhase::BallsMoving;
        if settled || frames >= MAX_FRAMES {
            break;
        }
    }

    let snapshot = app.game.snapshot();
    let on_table = snapshot.balls.iter().filter(|b| !b.potted).count();
    log::info!(
        "Settled after {} frames: {} balls on the table, player {} to shoot",
        frames,
        on_table,
        snapshot.turn.number()
    );
    if let Some(message) = snapshot.message {
        log::info!("Banner: {}", message.text);
    }
}
