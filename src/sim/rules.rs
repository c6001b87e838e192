//! 8-ball turn and foul rules
//!
//! Pots are judged one at a time as the physics reports them; the turn is
//! settled once the table comes to rest after a shot.

use serde::{Deserialize, Serialize};

use super::ball::{Ball, BallKind, Suit};

/// One of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Slot index for per-player arrays
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    /// 1 or 2
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }
}

/// Why a foul was called
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoulKind {
    CuePotted,
}

/// Outcome of judging a single pot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PotOutcome {
    /// Cue ball went down; it has been respotted
    Foul { player: Player, foul: FoulKind },
    /// Open table closed by this pot
    SuitsAssigned { player: Player, suit: Suit },
    /// Ball of `scorer`'s suit went down
    Scored { scorer: Player, own: bool },
    /// Eight ball decided the frame
    GameOver { winner: Player, legal: bool },
    /// Pot after the frame was already decided
    Ignored,
}

/// Turn result once the balls stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub next: Player,
    pub changed: bool,
}

/// Match rules state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rules {
    pub turn: Player,
    /// Suit per player (None while the table is open)
    pub assignments: [Option<Suit>; 2],
    /// Shooter pocketed one of their own balls this turn
    pub ball_potted_this_turn: bool,
    pub foul_this_turn: bool,
    /// Object balls credited to each player
    pub scores: [u32; 2],
    pub winner: Option<Player>,
}

impl Default for Rules {
    fn default() -> Self {
        Self::new()
    }
}

impl Rules {
    pub fn new() -> Self {
        Self {
            turn: Player::One,
            assignments: [None, None],
            ball_potted_this_turn: false,
            foul_this_turn: false,
            scores: [0, 0],
            winner: None,
        }
    }

    pub fn assignment(&self, player: Player) -> Option<Suit> {
        self.assignments[player.index()]
    }

    pub fn is_open_table(&self) -> bool {
        self.assignments.iter().all(Option::is_none)
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Balls of `suit` still on the table
    pub fn remaining(balls: &[Ball], suit: Suit) -> usize {
        balls
            .iter()
            .filter(|b| !b.potted && b.kind.suit() == Some(suit))
            .count()
    }

    /// Judge the ball at `index`, which has just been potted
    ///
    /// A potted cue ball is respotted here so it never leaves play.
    pub fn on_pot(&mut self, balls: &mut [Ball], index: usize) -> PotOutcome {
        if self.is_over() {
            // The frame is decided but the cue ball still never leaves play
            if balls[index].is_cue() {
                balls[index].reset();
            }
            return PotOutcome::Ignored;
        }
        let shooter = self.turn;
        let kind = balls[index].kind;

        match kind {
            BallKind::Cue => {
                self.foul_this_turn = true;
                self.ball_potted_this_turn = false;
                balls[index].reset();
                PotOutcome::Foul {
                    player: shooter,
                    foul: FoulKind::CuePotted,
                }
            }
            BallKind::Eight => {
                let cleared = self
                    .assignment(shooter)
                    .is_some_and(|suit| Self::remaining(balls, suit) == 0);
                let winner = if cleared { shooter } else { shooter.other() };
                self.winner = Some(winner);
                log::info!(
                    "Eight ball potted by player {}: player {} wins",
                    shooter.number(),
                    winner.number()
                );
                PotOutcome::GameOver {
                    winner,
                    legal: cleared,
                }
            }
            BallKind::Solid | BallKind::Stripe => {
                let Some(suit) = kind.suit() else {
                    return PotOutcome::Ignored;
                };
                match self.assignment(shooter) {
                    None => {
                        self.assignments[shooter.index()] = Some(suit);
                        self.assignments[shooter.other().index()] = Some(suit.opposite());
                        self.scores[shooter.index()] += 1;
                        self.ball_potted_this_turn = true;
                        log::info!("Player {} takes {}", shooter.number(), suit.as_str());
                        PotOutcome::SuitsAssigned {
                            player: shooter,
                            suit,
                        }
                    }
                    Some(own) if own == suit => {
                        self.scores[shooter.index()] += 1;
                        self.ball_potted_this_turn = true;
                        PotOutcome::Scored {
                            scorer: shooter,
                            own: true,
                        }
                    }
                    Some(_) => {
                        self.scores[shooter.other().index()] += 1;
                        PotOutcome::Scored {
                            scorer: shooter.other(),
                            own: false,
                        }
                    }
                }
            }
        }
    }

    /// Settle the turn after the table comes to rest
    ///
    /// The shooter continues only after pocketing an own ball without fouling.
    pub fn end_turn(&mut self) -> TurnOutcome {
        let keep = self.ball_potted_this_turn && !self.foul_this_turn;
        let changed = !keep && !self.is_over();
        if changed {
            self.turn = self.turn.other();
        }
        self.ball_potted_this_turn = false;
        self.foul_this_turn = false;
        TurnOutcome {
            next: self.turn,
            changed,
        }
    }
}
