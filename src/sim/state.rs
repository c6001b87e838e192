//! Match state and the per-frame step
//!
//! `GameState::step` is the single entry point the frame loop calls: it feeds
//! pointer input to the cue, runs the sub-stepped physics, routes pots through
//! the rules as they happen and settles the turn once the table is at rest.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::{Ball, BallKind, Suit};
use super::cue::{Cue, CueState, Shot};
use super::physics::{self, PhysicsConfig, PhysicsEvent};
use super::rack::{RackLayout, rack_for};
use super::raycast::{ShotPrediction, predict_shot};
use super::rules::{FoulKind, Player, PotOutcome, Rules};
use super::table::Table;
use crate::consts::*;

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Balls at rest, shooter may aim
    AwaitingShot,
    /// A shot is rolling out
    BallsMoving,
    /// Eight ball decided the frame
    GameOver,
}

/// Input commands for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Pointer position in table coordinates (None if unknown this frame)
    pub pointer: Option<Vec2>,
    /// Primary button pressed this frame
    pub primary: bool,
    /// Secondary button pressed this frame
    pub secondary: bool,
    /// Re-rack and start over
    pub reset: bool,
}

/// Everything observable that happened during a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Shot { player: Player, shot: Shot },
    BallCollision { a: u8, b: u8, impact_speed: f32 },
    CushionHit { number: u8, speed: f32 },
    BallPotted { number: u8, pocket: usize, shooter: Player, outcome: PotOutcome },
    Foul { player: Player, foul: FoulKind },
    SuitsAssigned { player: Player, suit: Suit },
    TurnChanged { player: Player },
    GameOver { winner: Player },
    RackReset,
}

/// Events emitted by one `step`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameEvents {
    pub events: Vec<GameEvent>,
}

impl FrameEvents {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Numbers of balls potted this frame
    pub fn potted(&self) -> impl Iterator<Item = u8> + '_ {
        self.events.iter().filter_map(|e| match e {
            GameEvent::BallPotted { number, .. } => Some(*number),
            _ => None,
        })
    }

    pub fn game_over(&self) -> Option<Player> {
        self.events.iter().find_map(|e| match e {
            GameEvent::GameOver { winner } => Some(*winner),
            _ => None,
        })
    }

    pub fn turn_changed(&self) -> Option<Player> {
        self.events.iter().find_map(|e| match e {
            GameEvent::TurnChanged { player } => Some(*player),
            _ => None,
        })
    }
}

/// Text banner shown over the table for a limited number of frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchMessage {
    pub text: String,
    pub frames_left: u32,
}

/// Ball data for rendering
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BallView {
    pub number: u8,
    pub kind: BallKind,
    pub pos: Vec2,
    pub radius: f32,
    pub potted: bool,
}

/// Cue data for rendering
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CueView {
    pub angle: f32,
    pub power: f32,
    pub state: CueState,
    /// Drawn only while the cue ball is at rest and the shooter may aim
    pub visible: bool,
}

/// Read-only view of the match for renderers and UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub balls: Vec<BallView>,
    pub cue: CueView,
    pub phase: GamePhase,
    pub turn: Player,
    pub assignments: [Option<Suit>; 2],
    pub scores: [u32; 2],
    pub winner: Option<Player>,
    pub message: Option<MatchMessage>,
    pub prediction: Option<ShotPrediction>,
}

/// Complete match state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub table: Table,
    /// All balls, including potted ones
    pub balls: Vec<Ball>,
    pub cue: Cue,
    pub rules: Rules,
    pub physics: PhysicsConfig,
    pub phase: GamePhase,
    pub rack_layout: RackLayout,
    pub message: Option<MatchMessage>,
    /// Frames stepped since the last rack
    pub frame: u64,
    /// Index of the cue ball in `balls`
    cue_index: usize,
    /// Last pointer position seen
    last_pointer: Vec2,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Standard table with a standard rack
    pub fn new() -> Self {
        Self::with_layout(RackLayout::Standard)
    }

    pub fn with_layout(layout: RackLayout) -> Self {
        let mut state = Self::with_balls(Table::standard(), Vec::new());
        state.rack_layout = layout;
        state.reset();
        state
    }

    /// Custom table and ball set. A cue ball is added at the break spot if missing.
    pub fn with_balls(table: Table, mut balls: Vec<Ball>) -> Self {
        let cue_index = match balls.iter().position(Ball::is_cue) {
            Some(index) => index,
            None => {
                balls.push(Ball::new(0, table.cue_spot()));
                balls.len() - 1
            }
        };
        let last_pointer = balls[cue_index].pos + Vec2::X;
        Self {
            table,
            balls,
            cue: Cue::default(),
            rules: Rules::new(),
            physics: PhysicsConfig::default(),
            phase: GamePhase::AwaitingShot,
            rack_layout: RackLayout::Standard,
            message: None,
            frame: 0,
            cue_index,
            last_pointer,
        }
    }

    /// Re-rack all balls and start a fresh frame
    pub fn reset(&mut self) {
        self.balls = rack_for(self.rack_layout, &self.table);
        self.cue_index = 0;
        self.last_pointer = self.table.cue_spot() + Vec2::X;
        self.cue.reset();
        self.rules = Rules::new();
        self.phase = GamePhase::AwaitingShot;
        self.frame = 0;
        self.set_message("Player 1 to break");
        log::info!("Rack reset ({:?})", self.rack_layout);
    }

    /// Apply cue preferences
    pub fn configure_cue(&mut self, sensitivity: f32, max_power: f32) {
        self.cue.configure(sensitivity, max_power);
    }

    pub fn cue_ball(&self) -> &Ball {
        &self.balls[self.cue_index]
    }

    pub fn ball(&self, number: u8) -> Option<&Ball> {
        self.balls.iter().find(|b| b.number == number)
    }

    pub fn ball_mut(&mut self, number: u8) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.number == number)
    }

    /// Balls on the table that are still moving
    pub fn moving_count(&self) -> usize {
        self.balls.iter().filter(|b| b.is_moving()).count()
    }

    /// Whether the cue can be drawn and aimed right now
    pub fn can_aim(&self) -> bool {
        self.phase == GamePhase::AwaitingShot && Cue::can_aim(self.cue_ball())
    }

    fn set_message(&mut self, text: impl Into<String>) {
        self.message = Some(MatchMessage {
            text: text.into(),
            frames_left: MESSAGE_FRAMES,
        });
    }

    fn tick_message(&mut self) {
        if let Some(message) = &mut self.message {
            message.frames_left = message.frames_left.saturating_sub(1);
            if message.frames_left == 0 {
                self.message = None;
            }
        }
    }

    /// Advance the match by one frame of `dt` seconds
    pub fn step(&mut self, input: &FrameInput, dt: f32) -> FrameEvents {
        let mut events = FrameEvents::default();
        self.frame += 1;
        self.tick_message();

        if input.reset {
            self.reset();
            events.push(GameEvent::RackReset);
            return events;
        }

        if let Some(pointer) = input.pointer.filter(|p| p.is_finite()) {
            self.last_pointer = pointer;
        }

        if self.phase == GamePhase::AwaitingShot {
            self.handle_cue_input(input, &mut events);
        }

        self.run_physics(frame_scale(dt), &mut events);

        if self.rules.is_over() {
            self.phase = GamePhase::GameOver;
        } else if self.phase == GamePhase::BallsMoving && self.moving_count() == 0 {
            let turn = self.rules.end_turn();
            self.cue.reset();
            self.phase = GamePhase::AwaitingShot;
            if turn.changed {
                events.push(GameEvent::TurnChanged { player: turn.next });
            }
            log::debug!("Table at rest, player {} to shoot", turn.next.number());
        }

        self.update_message(&events);
        events
    }

    fn handle_cue_input(&mut self, input: &FrameInput, events: &mut FrameEvents) {
        let pointer = self.last_pointer;
        let cue_index = self.cue_index;
        let shooter = self.rules.turn;

        if input.secondary {
            self.cue.press_secondary();
        }
        self.cue.update(pointer, &self.balls[cue_index]);
        if input.primary {
            if let Some(shot) = self.cue.press_primary(pointer, &mut self.balls[cue_index]) {
                self.phase = GamePhase::BallsMoving;
                events.push(GameEvent::Shot {
                    player: shooter,
                    shot,
                });
            }
        }
    }

    fn run_physics(&mut self, frame_scale: f32, events: &mut FrameEvents) {
        let Self {
            balls,
            table,
            rules,
            physics: config,
            ..
        } = self;

        physics::step(balls, table, config, frame_scale, |balls, event| match event {
            PhysicsEvent::Potted { index, pocket } => {
                let number = balls[index].number;
                let shooter = rules.turn;
                let outcome = rules.on_pot(balls, index);
                events.push(GameEvent::BallPotted {
                    number,
                    pocket,
                    shooter,
                    outcome,
                });
                match outcome {
                    PotOutcome::Foul { player, foul } => {
                        events.push(GameEvent::Foul { player, foul });
                    }
                    PotOutcome::SuitsAssigned { player, suit } => {
                        events.push(GameEvent::SuitsAssigned { player, suit });
                    }
                    PotOutcome::GameOver { winner, .. } => {
                        events.push(GameEvent::GameOver { winner });
                    }
                    PotOutcome::Scored { .. } | PotOutcome::Ignored => {}
                }
            }
            PhysicsEvent::CushionHit { index, speed } => {
                events.push(GameEvent::CushionHit {
                    number: balls[index].number,
                    speed,
                });
            }
            PhysicsEvent::Collision { a, b, impact_speed } => {
                events.push(GameEvent::BallCollision {
                    a: balls[a].number,
                    b: balls[b].number,
                    impact_speed,
                });
            }
        });
    }

    fn update_message(&mut self, events: &FrameEvents) {
        for event in &events.events {
            let text = match event {
                GameEvent::Foul { .. } => "Foul! Cue ball potted".to_string(),
                GameEvent::SuitsAssigned { player, suit } => {
                    format!("Player {} takes {}", player.number(), suit.as_str())
                }
                GameEvent::TurnChanged { player } => format!("Player {}'s turn", player.number()),
                GameEvent::GameOver { winner } => format!("Player {} wins!", winner.number()),
                _ => continue,
            };
            self.set_message(text);
        }
    }

    /// Shot prediction for the current aim (None unless the shooter can aim)
    pub fn prediction(&self) -> Option<ShotPrediction> {
        if !self.can_aim() {
            return None;
        }
        predict_shot(&self.balls, self.cue_index, self.cue.angle, &self.table.bounds)
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            balls: self
                .balls
                .iter()
                .map(|b| BallView {
                    number: b.number,
                    kind: b.kind,
                    pos: b.pos,
                    radius: b.radius,
                    potted: b.potted,
                })
                .collect(),
            cue: CueView {
                angle: self.cue.angle,
                power: self.cue.power,
                state: self.cue.state,
                visible: self.can_aim(),
            },
            phase: self.phase,
            turn: self.rules.turn,
            assignments: self.rules.assignments,
            scores: self.rules.scores,
            winner: self.rules.winner,
            message: self.message.clone(),
            prediction: self.prediction(),
        }
    }
}

/// Frames covered by `dt` seconds; invalid or negative deltas integrate nothing
fn frame_scale(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        (dt / FRAME_DT).min(MAX_FRAME_SCALE)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rack::standard_rack;

    fn press(pointer: Vec2) -> FrameInput {
        FrameInput {
            pointer: Some(pointer),
            primary: true,
            ..Default::default()
        }
    }

    fn hover(pointer: Vec2) -> FrameInput {
        FrameInput {
            pointer: Some(pointer),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_state() {
        let state = GameState::new();
        assert_eq!(state.balls.len(), 16);
        assert_eq!(state.phase, GamePhase::AwaitingShot);
        assert_eq!(state.rules.turn, Player::One);
        assert!(state.can_aim());
        assert!(state.message.is_some());
    }

    #[test]
    fn test_frame_scale() {
        assert!((frame_scale(FRAME_DT) - 1.0).abs() < 1e-5);
        assert_eq!(frame_scale(-1.0), 0.0);
        assert_eq!(frame_scale(f32::NAN), 0.0);
        assert_eq!(frame_scale(10.0), MAX_FRAME_SCALE);
    }

    #[test]
    fn test_shot_starts_motion() {
        let mut state = GameState::new();
        let cue_pos = state.cue_ball().pos;
        let target = cue_pos + Vec2::new(100.0, 0.0);

        state.step(&hover(target), FRAME_DT);
        state.step(&press(target), FRAME_DT);
        assert!(state.cue.is_charging());

        // Drag away from the press point to build power
        state.step(&hover(target + Vec2::new(0.0, 150.0)), FRAME_DT);
        assert!(state.cue.power > 1.0);

        let events = state.step(&press(target + Vec2::new(0.0, 150.0)), FRAME_DT);
        assert!(events.events.iter().any(|e| matches!(e, GameEvent::Shot { .. })));
        assert_eq!(state.phase, GamePhase::BallsMoving);
        assert!(state.cue_ball().vel.x > 0.0);
        assert!(!state.can_aim());
        assert!(state.snapshot().prediction.is_none());
    }

    #[test]
    fn test_prediction_targets_rack() {
        let mut state = GameState::new();
        let cue_pos = state.cue_ball().pos;
        state.step(&hover(cue_pos + Vec2::new(50.0, 0.0)), FRAME_DT);
        let prediction = state.prediction().expect("prediction");
        let hit = prediction.hit.expect("aimed at apex");
        assert_eq!(state.balls[hit.index].number, 1);
    }

    #[test]
    fn test_reset_input() {
        let mut state = GameState::new();
        state.balls[5].potted = true;
        state.rules.turn = Player::Two;
        let events = state.step(
            &FrameInput {
                reset: true,
                ..Default::default()
            },
            FRAME_DT,
        );
        assert_eq!(events.events, vec![GameEvent::RackReset]);
        assert!(state.balls.iter().all(|b| !b.potted));
        assert_eq!(state.rules.turn, Player::One);
    }

    #[test]
    fn test_message_counts_down() {
        let mut state = GameState::new();
        for _ in 0..MESSAGE_FRAMES {
            state.step(&FrameInput::default(), FRAME_DT);
        }
        assert!(state.message.is_none());
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new();
        let mut b = GameState::new();
        let aim = a.cue_ball().pos + Vec2::new(100.0, 3.0);
        let drag = aim + Vec2::new(0.0, 400.0);
        let script = [hover(aim), press(aim), hover(drag), press(drag)];

        for frame in 0..900 {
            let input = script.get(frame).copied().unwrap_or_default();
            let events_a = a.step(&input, FRAME_DT);
            let events_b = b.step(&input, FRAME_DT);
            assert_eq!(events_a.events, events_b.events, "frame {}", frame);
            for (x, y) in a.balls.iter().zip(&b.balls) {
                assert_eq!(x.pos, y.pos, "ball {} frame {}", x.number, frame);
                assert_eq!(x.vel, y.vel, "ball {} frame {}", x.number, frame);
                assert_eq!(x.potted, y.potted);
            }
        }
        assert_eq!(a.rules.turn, b.rules.turn);
        assert_eq!(a.rules.assignments, b.rules.assignments);
    }

    #[test]
    fn test_reset_matches_standard_rack() {
        let state = GameState::new();
        let rack = standard_rack(RackLayout::Standard);
        assert_eq!(state.balls.len(), rack.len());
        for (ball, racked) in state.balls.iter().zip(&rack) {
            assert_eq!(ball.number, racked.number);
            assert_eq!(ball.pos, racked.pos);
        }
        assert_eq!(state.cue_ball().pos, Vec2::new(CUE_START_X, CUE_START_Y));
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let state = GameState::new();
        let snapshot = state.snapshot();
        assert_eq!(snapshot.balls.len(), 16);
        assert!(snapshot.cue.visible);
        assert_eq!(snapshot.assignments, [None, None]);
        assert_eq!(snapshot.turn, Player::One);
    }
}
