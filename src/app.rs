//! Screen state machine
//!
//! One explicit `Screen` value replaces a pile of UI flags. Every change goes
//! through `transition`, which is pure; `App` layers the side effects on top
//! (starting a match, recording a win, playing sound cues).

use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::audio::{self, AudioSink, NullAudio};
use crate::leaderboard::Leaderboard;
use crate::settings::Settings;
use crate::sim::{FrameEvents, FrameInput, GameState, Player};

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    Menu,
    InputNames,
    Playing,
    Paused,
    GameOver,
    Tutorial,
    Team,
    Settings,
    Leaderboard,
}

/// UI events that can move between screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenEvent {
    /// "Play" chosen on the menu
    StartSelected,
    NamesConfirmed,
    TutorialSelected,
    TeamSelected,
    SettingsSelected,
    LeaderboardSelected,
    /// Pause key while playing or paused
    PauseToggled,
    /// The match produced a winner
    MatchFinished,
    /// Play again with the same names
    Rematch,
    /// Escape / back button
    Back,
}

/// Next screen for `event` on `screen`. Events that mean nothing on the
/// current screen leave it unchanged.
pub fn transition(screen: Screen, event: ScreenEvent) -> Screen {
    use Screen as S;
    use ScreenEvent as E;

    match (screen, event) {
        (S::Menu, E::StartSelected) => S::InputNames,
        (S::Menu, E::TutorialSelected) => S::Tutorial,
        (S::Menu, E::TeamSelected) => S::Team,
        (S::Menu, E::SettingsSelected) => S::Settings,
        (S::Menu, E::LeaderboardSelected) => S::Leaderboard,

        (S::InputNames, E::NamesConfirmed) => S::Playing,
        (S::InputNames, E::Back) => S::Menu,

        (S::Playing, E::PauseToggled | E::Back) => S::Paused,
        (S::Playing, E::MatchFinished) => S::GameOver,

        (S::Paused, E::PauseToggled) => S::Playing,
        (S::Paused, E::Back) => S::Menu,

        (S::GameOver, E::Rematch) => S::Playing,
        (S::GameOver, E::LeaderboardSelected) => S::Leaderboard,
        (S::GameOver, E::Back) => S::Menu,

        (S::Tutorial | S::Team | S::Settings | S::Leaderboard, E::Back) => S::Menu,

        (screen, _) => screen,
    }
}

/// Names entered for the two players
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerNames {
    pub one: String,
    pub two: String,
}

impl Default for PlayerNames {
    fn default() -> Self {
        Self {
            one: "Player 1".to_string(),
            two: "Player 2".to_string(),
        }
    }
}

impl PlayerNames {
    /// Trimmed names; a blank entry keeps the default label
    pub fn new(one: &str, two: &str) -> Self {
        let defaults = Self::default();
        let pick = |name: &str, default: String| {
            let name = name.trim();
            if name.is_empty() {
                default
            } else {
                name.to_string()
            }
        };
        Self {
            one: pick(one, defaults.one),
            two: pick(two, defaults.two),
        }
    }

    pub fn name(&self, player: Player) -> &str {
        match player {
            Player::One => &self.one,
            Player::Two => &self.two,
        }
    }
}

/// Top-level application: screens, preferences, leaderboard and the match
pub struct App {
    screen: Screen,
    pub names: PlayerNames,
    pub settings: Settings,
    pub leaderboard: Leaderboard,
    /// Where the leaderboard is saved after each win (None keeps it in memory)
    leaderboard_path: Option<PathBuf>,
    pub game: GameState,
    audio: Box<dyn AudioSink>,
}

impl App {
    pub fn new(settings: Settings, leaderboard: Leaderboard) -> Self {
        let settings = settings.sanitized();
        let mut game = GameState::new();
        game.configure_cue(settings.sensitivity, settings.max_power);
        Self {
            screen: Screen::Menu,
            names: PlayerNames::default(),
            settings,
            leaderboard,
            leaderboard_path: None,
            game,
            audio: Box::new(NullAudio),
        }
    }

    /// Persist the leaderboard to `path` after each recorded win
    pub fn with_leaderboard_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.leaderboard_path = Some(path.into());
        self
    }

    pub fn with_audio(mut self, sink: Box<dyn AudioSink>) -> Self {
        self.audio = sink;
        self
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn set_names(&mut self, one: &str, two: &str) {
        self.names = PlayerNames::new(one, two);
    }

    /// Replace preferences and push the cue ones into the match
    pub fn apply_settings(&mut self, settings: Settings) {
        self.settings = settings.sanitized();
        self.game
            .configure_cue(self.settings.sensitivity, self.settings.max_power);
    }

    /// Apply a UI event and return the resulting screen
    pub fn handle(&mut self, event: ScreenEvent) -> Screen {
        let previous = self.screen;
        let next = transition(previous, event);
        if next == previous {
            return next;
        }

        // A fresh rack whenever play starts from outside a match
        if next == Screen::Playing && previous != Screen::Paused {
            self.game.reset();
            self.game
                .configure_cue(self.settings.sensitivity, self.settings.max_power);
            log::info!("Match started: {} vs {}", self.names.one, self.names.two);
        }

        log::debug!("Screen {:?} -> {:?}", previous, next);
        self.screen = next;
        next
    }

    /// Advance one frame. The match only runs while `Playing`.
    pub fn frame(&mut self, input: &FrameInput, dt: f32) -> FrameEvents {
        if self.screen != Screen::Playing {
            return FrameEvents::default();
        }

        let events = self.game.step(input, dt);
        audio::play_events(
            self.audio.as_mut(),
            &events.events,
            self.settings.effective_sfx_volume(),
        );

        if let Some(winner) = events.game_over() {
            self.record_win(winner);
            self.handle(ScreenEvent::MatchFinished);
        }
        events
    }

    fn record_win(&mut self, winner: Player) {
        let name = self.names.name(winner).to_string();
        if let Some(wins) = self.leaderboard.add_win(&name, Utc::now()) {
            log::info!("{} wins ({} total)", name, wins);
        }
        if let Some(path) = &self.leaderboard_path {
            if let Err(err) = self.leaderboard.save(path) {
                log::warn!("Failed to save leaderboard: {}", err);
            }
        }
    }
}
