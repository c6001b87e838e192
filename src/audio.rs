//! Sound cues
//!
//! Maps frame events to sound effects. Playback goes through an `AudioSink`
//! so the match runs identically with no audio device at all.

use crate::sim::{GameEvent, PotOutcome};

/// Impact speed that plays at full volume
const FULL_VOLUME_SPEED: f32 = 15.0;
/// Quietest audible cue for a very soft touch
const MIN_VOLUME: f32 = 0.1;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Cue tip strikes the cue ball
    CueStrike,
    /// Two balls collide
    BallClack,
    /// Ball hits a cushion
    Cushion,
    /// Ball drops into a pocket
    Pocket,
    /// Cue ball scratched
    Foul,
    /// Frame won
    Win,
}

/// Volume in `[MIN_VOLUME, 1]` for an impact of `speed`
fn impact_volume(speed: f32) -> f32 {
    if !speed.is_finite() {
        return MIN_VOLUME;
    }
    (speed / FULL_VOLUME_SPEED).clamp(MIN_VOLUME, 1.0)
}

/// Sound and relative volume for an event, if it makes one
pub fn sound_for(event: &GameEvent) -> Option<(SoundEffect, f32)> {
    match *event {
        GameEvent::Shot { shot, .. } => Some((SoundEffect::CueStrike, impact_volume(shot.force))),
        GameEvent::BallCollision { impact_speed, .. } => {
            Some((SoundEffect::BallClack, impact_volume(impact_speed)))
        }
        GameEvent::CushionHit { speed, .. } => Some((SoundEffect::Cushion, impact_volume(speed))),
        // The foul itself carries the sound for a scratch
        GameEvent::BallPotted {
            outcome: PotOutcome::Foul { .. },
            ..
        } => None,
        GameEvent::BallPotted { .. } => Some((SoundEffect::Pocket, 1.0)),
        GameEvent::Foul { .. } => Some((SoundEffect::Foul, 1.0)),
        GameEvent::GameOver { .. } => Some((SoundEffect::Win, 1.0)),
        GameEvent::SuitsAssigned { .. } | GameEvent::TurnChanged { .. } | GameEvent::RackReset => {
            None
        }
    }
}

/// Something that can play sound effects
pub trait AudioSink {
    /// Play `effect` at `volume` (0.0 - 1.0, already scaled by settings)
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) {}
}

/// Sink that logs each cue at debug level (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("sound {:?} at {:.2}", effect, volume);
    }
}

/// Play the cues for a batch of events at `gain`. Silent when `gain` is zero.
pub fn play_events<'a>(
    sink: &mut dyn AudioSink,
    events: impl IntoIterator<Item = &'a GameEvent>,
    gain: f32,
) {
    if gain <= 0.0 {
        return;
    }
    for (effect, volume) in events.into_iter().filter_map(sound_for) {
        sink.play(effect, volume * gain);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{FoulKind, Player, Suit};

    #[derive(Default)]
    struct Recorder(Vec<(SoundEffect, f32)>);

    impl AudioSink for Recorder {
        fn play(&mut self, effect: SoundEffect, volume: f32) {
            self.0.push((effect, volume));
        }
    }

    #[test]
    fn test_volume_scales_with_impact() {
        let soft = sound_for(&GameEvent::BallCollision {
            a: 0,
            b: 1,
            impact_speed: 0.5,
        });
        let hard = sound_for(&GameEvent::BallCollision {
            a: 0,
            b: 1,
            impact_speed: 100.0,
        });
        assert_eq!(soft, Some((SoundEffect::BallClack, 0.1)));
        assert_eq!(hard, Some((SoundEffect::BallClack, 1.0)));
    }

    #[test]
    fn test_scratch_plays_foul_only() {
        let events = [
            GameEvent::BallPotted {
                number: 0,
                pocket: 0,
                shooter: Player::One,
                outcome: PotOutcome::Foul {
                    player: Player::One,
                    foul: FoulKind::CuePotted,
                },
            },
            GameEvent::Foul {
                player: Player::One,
                foul: FoulKind::CuePotted,
            },
        ];
        let mut sink = Recorder::default();
        play_events(&mut sink, &events, 0.5);
        assert_eq!(sink.0, vec![(SoundEffect::Foul, 0.5)]);
    }

    #[test]
    fn test_silent_events() {
        assert_eq!(sound_for(&GameEvent::RackReset), None);
        assert_eq!(
            sound_for(&GameEvent::SuitsAssigned {
                player: Player::Two,
                suit: Suit::Stripe,
            }),
            None
        );
    }

    #[test]
    fn test_zero_gain_is_silent() {
        let mut sink = Recorder::default();
        play_events(&mut sink, &[GameEvent::GameOver { winner: Player::One }], 0.0);
        assert!(sink.0.is_empty());
    }
}
