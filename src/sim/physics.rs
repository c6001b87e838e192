//! Sub-stepped physics integration
//!
//! Each frame is split into `substeps` equal slices. Per slice every ball on
//! the table moves by `vel / substeps`, is checked against pockets and
//! cushions, and then all ball pairs are resolved. Friction is applied once
//! per frame after the last slice unless `FrictionModel::PerSubstep` is set.

use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::collision::resolve_pairs;
use super::table::Table;
use crate::consts::*;

/// When velocity decay is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FrictionModel {
    /// `friction` once per frame after all sub-steps
    #[default]
    PerFrame,
    /// `friction^(1/N)` after every sub-step
    PerSubstep,
}

/// Which boundary check runs first in a sub-step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundaryOrder {
    /// A ball reaching a pocket mouth drops before the cushion can bounce it
    #[default]
    PocketFirst,
    WallFirst,
}

/// Runtime physics tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    pub substeps: u32,
    pub rest_speed: f32,
    pub wall_restitution: f32,
    pub friction_model: FrictionModel,
    pub boundary_order: BoundaryOrder,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            substeps: SUBSTEPS,
            rest_speed: REST_SPEED,
            wall_restitution: WALL_RESTITUTION,
            friction_model: FrictionModel::PerFrame,
            boundary_order: BoundaryOrder::PocketFirst,
        }
    }
}

/// Something that happened during integration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhysicsEvent {
    /// Ball at `index` bounced off a cushion at `speed`
    CushionHit { index: usize, speed: f32 },
    /// Ball at `index` dropped into pocket `pocket`
    Potted { index: usize, pocket: usize },
    /// Balls `a` and `b` collided with closing speed `impact_speed`
    Collision { a: usize, b: usize, impact_speed: f32 },
}

/// Summary of one frame of integration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Balls on the table still moving after friction
    pub moving_count: usize,
}

impl StepReport {
    pub fn at_rest(&self) -> bool {
        self.moving_count == 0
    }
}

/// Advance all balls by `frame_scale` frames (1.0 at the nominal frame rate)
///
/// `on_event` runs as soon as an event happens and may mutate the balls
/// (e.g. respawning a potted cue ball) before the rest of the sub-step runs.
pub fn step<F>(
    balls: &mut [Ball],
    table: &Table,
    config: &PhysicsConfig,
    frame_scale: f32,
    mut on_event: F,
) -> StepReport
where
    F: FnMut(&mut [Ball], PhysicsEvent),
{
    let substeps = config.substeps.max(1);
    let fraction = frame_scale / substeps as f32;

    for _ in 0..substeps {
        for ball in balls.iter_mut() {
            ball.advance(fraction);
        }

        for index in 0..balls.len() {
            match config.boundary_order {
                BoundaryOrder::PocketFirst => {
                    check_pocket(balls, index, table, &mut on_event);
                    check_wall(balls, index, table, config, &mut on_event);
                }
                BoundaryOrder::WallFirst => {
                    check_wall(balls, index, table, config, &mut on_event);
                    check_pocket(balls, index, table, &mut on_event);
                }
            }
        }

        for (a, b, contact) in resolve_pairs(balls) {
            on_event(
                balls,
                PhysicsEvent::Collision {
                    a,
                    b,
                    impact_speed: contact.impact_speed,
                },
            );
        }

        if config.friction_model == FrictionModel::PerSubstep {
            for ball in balls.iter_mut() {
                ball.apply_friction(fraction, config.rest_speed);
            }
        }
    }

    if config.friction_model == FrictionModel::PerFrame {
        for ball in balls.iter_mut() {
            ball.apply_friction(frame_scale, config.rest_speed);
        }
    }

    StepReport {
        moving_count: balls.iter().filter(|b| b.is_moving()).count(),
    }
}

fn check_pocket<F>(balls: &mut [Ball], index: usize, table: &Table, on_event: &mut F)
where
    F: FnMut(&mut [Ball], PhysicsEvent),
{
    if let Some(pocket) = balls[index].check_pocket_collision(&table.pockets) {
        on_event(balls, PhysicsEvent::Potted { index, pocket });
    }
}

fn check_wall<F>(balls: &mut [Ball], index: usize, table: &Table, config: &PhysicsConfig, on_event: &mut F)
where
    F: FnMut(&mut [Ball], PhysicsEvent),
{
    let speed = balls[index].speed();
    if balls[index].check_wall_collision(&table.bounds, config.wall_restitution) && speed > 0.0 {
        on_event(balls, PhysicsEvent::CushionHit { index, speed });
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::table::{Pocket, Rect};

    fn open_table() -> Table {
        Table::without_pockets(Rect::new(0.0, 0.0, 400.0, 200.0))
    }

    #[test]
    fn test_friction_once_per_frame() {
        let table = open_table();
        let mut balls = vec![Ball::new(1, Vec2::new(100.0, 100.0))];
        balls[0].vel = Vec2::new(10.0, 0.0);
        let report = step(&mut balls, &table, &PhysicsConfig::default(), 1.0, |_, _| {});
        // Full frame of motion, one frame of decay
        assert!((balls[0].pos.x - 110.0).abs() < 1e-3);
        assert!((balls[0].vel.x - 9.9).abs() < 1e-4);
        assert_eq!(report.moving_count, 1);
    }

    #[test]
    fn test_per_substep_friction_matches_frame_decay() {
        let table = open_table();
        let config = PhysicsConfig {
            friction_model: FrictionModel::PerSubstep,
            ..Default::default()
        };
        let mut balls = vec![Ball::new(1, Vec2::new(100.0, 100.0))];
        balls[0].vel = Vec2::new(10.0, 0.0);
        step(&mut balls, &table, &config, 1.0, |_, _| {});
        assert!((balls[0].vel.x - 9.9).abs() < 1e-3);
        // Ball decelerates during the frame so it travels slightly less
        assert!(balls[0].pos.x < 110.0);
    }

    #[test]
    fn test_fast_ball_does_not_tunnel() {
        let table = open_table();
        let mut balls = vec![Ball::new(1, Vec2::new(350.0, 100.0))];
        balls[0].vel = Vec2::new(200.0, 0.0);
        let mut cushions = 0;
        step(&mut balls, &table, &PhysicsConfig::default(), 1.0, |_, e| {
            if matches!(e, PhysicsEvent::CushionHit { .. }) {
                cushions += 1;
            }
        });
        assert!(cushions >= 1);
        assert!(table.bounds.contains_ball(balls[0].pos, balls[0].radius));
    }

    #[test]
    fn test_pot_event_fires_immediately() {
        let mut table = open_table();
        table.pockets.push(Pocket::new(Vec2::new(300.0, 100.0), 20.0));
        let mut balls = vec![
            Ball::new(2, Vec2::new(270.0, 100.0)),
            Ball::new(5, Vec2::new(340.0, 100.0)),
        ];
        balls[0].vel = Vec2::new(30.0, 0.0);
        let mut events = Vec::new();
        step(&mut balls, &table, &PhysicsConfig::default(), 1.0, |_, e| events.push(e));
        assert!(balls[0].potted);
        assert!(events.contains(&PhysicsEvent::Potted { index: 0, pocket: 0 }));
        // Potted ball never reached the ball behind the pocket
        assert!(!events.iter().any(|e| matches!(e, PhysicsEvent::Collision { .. })));
        assert_eq!(balls[1].vel, Vec2::ZERO);
    }

    #[test]
    fn test_handler_can_respawn_ball() {
        let mut table = open_table();
        table.pockets.push(Pocket::new(Vec2::new(300.0, 100.0), 20.0));
        let mut balls = vec![Ball::new(0, Vec2::new(50.0, 50.0))];
        balls[0].pos = Vec2::new(290.0, 100.0);
        balls[0].vel = Vec2::new(5.0, 0.0);
        step(&mut balls, &table, &PhysicsConfig::default(), 1.0, |balls, e| {
            if let PhysicsEvent::Potted { index, .. } = e {
                balls[index].reset();
            }
        });
        assert!(!balls[0].potted);
        assert_eq!(balls[0].pos, Vec2::new(50.0, 50.0));
        assert_eq!(balls[0].vel, Vec2::ZERO);
    }

    #[test]
    fn test_collision_event_and_rest() {
        let table = open_table();
        let mut balls = vec![
            Ball::new(0, Vec2::new(100.0, 100.0)),
            Ball::new(1, Vec2::new(130.0, 100.0)),
        ];
        balls[0].vel = Vec2::new(8.0, 0.0);
        let mut impacts = Vec::new();
        step(&mut balls, &table, &PhysicsConfig::default(), 1.0, |_, e| {
            if let PhysicsEvent::Collision { a, b, impact_speed } = e {
                impacts.push((a, b, impact_speed));
            }
        });
        assert_eq!(impacts.len(), 1);
        assert_eq!((impacts[0].0, impacts[0].1), (0, 1));
        assert!(impacts[0].2 > 7.9);
        assert!(balls[1].vel.x > 7.0);
        assert!(balls[0].vel.length() < 0.1);
    }

    #[test]
    fn test_moving_count_excludes_potted() {
        let table = open_table();
        let mut balls = vec![Ball::new(1, Vec2::new(100.0, 100.0))];
        balls[0].potted = true;
        balls[0].vel = Vec2::new(4.0, 0.0);
        let report = step(&mut balls, &table, &PhysicsConfig::default(), 1.0, |_, _| {});
        assert!(report.at_rest());
    }
}
