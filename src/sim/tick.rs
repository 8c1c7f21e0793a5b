//! Fixed timestep simulation tick
//!
//! Advances a session by exactly one step. Order within a tick:
//! expiry -> paddle -> launch -> speed ramp -> balls (walls, paddle, bricks)
//! -> lost balls -> level clear -> drops -> particles -> shake.

use glam::Vec2;
use rand::Rng;

use super::collision::{WallHit, side_wall_hit, top_wall_hit, within_span};
use super::state::{BallState, GameEvent, GamePhase, GameState, PowerUpKind, SpawnPolicy};
use crate::config::ControlScheme;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Pointer/touch x in canvas pixels (pointer control scheme)
    pub pointer_x: Option<f32>,
    /// Direction keys held (keyboard control scheme)
    pub left: bool,
    pub right: bool,
    /// Launch balls held by the sticky paddle
    pub launch: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("Paused at tick {}", state.time_ticks);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::info!("Resumed");
            }
            _ => {}
        }
    }

    // Don't tick if paused or finished
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;
    state.expire_power_ups();

    update_paddle(state, input);
    for ball in state.balls.iter_mut() {
        ball.follow_paddle(&state.paddle);
    }

    if input.launch {
        let released = state.release_stuck_balls();
        if released > 0 {
            log::debug!("Launched {} stuck balls", released);
        }
    }

    if state.config.speed_ramp {
        let (increment, max) = (state.layout.ball_speed_increment, state.layout.ball_max_speed);
        for ball in state.balls.iter_mut().filter(|b| b.is_free()) {
            ball.ramp_speed(increment, max);
        }
    }

    let lost = update_balls(state);
    if lost > 0 && state.balls.is_empty() {
        lose_life(state);
        if state.phase.is_terminal() {
            return;
        }
    }

    if state.all_bricks_cleared() {
        clear_level(state);
        if state.phase.is_terminal() {
            return;
        }
    }

    update_drops(state);
    update_particles(state);
    update_shake(state);
}

fn update_paddle(state: &mut GameState, input: &TickInput) {
    let width = state.layout.width;
    match state.config.control {
        ControlScheme::Pointer => {
            if let Some(x) = input.pointer_x {
                state.paddle.track(x, width);
            }
        }
        ControlScheme::Keyboard => {
            let direction = match (input.left, input.right) {
                (true, false) => -1.0,
                (false, true) => 1.0,
                _ => 0.0,
            };
            if direction != 0.0 {
                state.paddle.step(direction, width);
            }
        }
    }
}

/// Move every free ball and resolve its collisions
///
/// Returns the number of balls lost this tick (already removed).
fn update_balls(state: &mut GameState) -> usize {
    let layout = state.layout;
    let sticky = state.power_ups.sticky_active();
    let (paddle_x, paddle_w) = (state.paddle.x, state.paddle.width);
    let paddle_center = state.paddle.center();

    let mut events = Vec::new();
    let mut destroyed: Vec<(Vec2, Option<PowerUpKind>)> = Vec::new();
    let mut lost_ids = Vec::new();

    for ball in state.balls.iter_mut() {
        if !ball.is_free() {
            continue;
        }

        ball.pos += ball.vel;

        // Walls (checked against the next position so the ball never
        // visibly leaves the canvas)
        let projected = ball.pos + ball.vel;
        match side_wall_hit(projected.x, ball.radius, layout.width) {
            Some(WallHit::Right) => ball.vel.x = -ball.vel.x.abs(),
            Some(WallHit::Left) => ball.vel.x = ball.vel.x.abs(),
            None => {}
        }
        if top_wall_hit(projected.y, ball.radius) {
            ball.vel.y = ball.vel.y.abs();
        }

        // Paddle plane: bounce on overlap, otherwise the ball is gone
        if ball.pos.y + ball.vel.y > layout.paddle_plane() {
            if within_span(ball.pos.x, paddle_x, paddle_w) {
                ball.vel.y = -ball.vel.y.abs();
                events.push(GameEvent::PaddleHit);
                if sticky {
                    ball.vel = Vec2::ZERO;
                    ball.state = BallState::Stuck {
                        offset: ball.pos.x - paddle_center,
                    };
                    continue;
                }
            } else {
                lost_ids.push(ball.id);
                continue;
            }
        }

        // Bricks, column-major
        for brick in state.bricks.iter_mut().filter(|b| b.is_alive()) {
            if brick.rect.contains(ball.pos) {
                ball.vel.y = -ball.vel.y;
                brick.durability -= 1;
                let broke = brick.durability == 0;
                if broke {
                    destroyed.push((brick.rect.center(), brick.power_up));
                }
                events.push(GameEvent::BrickHit { destroyed: broke });
            }
        }
    }

    let brick_hits = events
        .iter()
        .filter(|e| matches!(e, GameEvent::BrickHit { .. }))
        .count();
    for event in events {
        state.emit(event);
    }
    if brick_hits > 0 {
        state.shake();
    }

    for (center, power_up) in destroyed {
        state.score += 1;
        state.bricks_destroyed += 1;
        state.spawn_burst(center);
        if let Some(kind) = power_up {
            state.spawn_drop(kind, center);
        }
    }

    if !lost_ids.is_empty() {
        state.balls.retain(|b| !lost_ids.contains(&b.id));
        for _ in &lost_ids {
            state.emit(GameEvent::BallLost);
        }
    }
    lost_ids.len()
}

fn lose_life(state: &mut GameState) {
    state.lives = state.lives.saturating_sub(1);
    state.emit(GameEvent::LifeLost {
        lives_left: state.lives,
    });

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.shutdown();
        state.emit(GameEvent::GameOver);
        log::info!(
            "Game over on level {} after {} ticks",
            state.level,
            state.time_ticks
        );
    } else {
        log::info!("Life lost, {} remaining", state.lives);
        state.recenter_paddle();
        state.spawn_ball(SpawnPolicy::CanvasCenter);
    }
}

fn clear_level(state: &mut GameState) {
    let cleared = state.level;

    if state.config.max_level.is_some_and(|max| cleared >= max) {
        state.phase = GamePhase::Completed;
        state.shutdown();
        state.emit(GameEvent::SessionCompleted { level: cleared });
        log::info!("Final level {} cleared", cleared);
        return;
    }

    state.level += 1;
    state.score = 0;
    state.balls.clear();
    state.recenter_paddle();
    state.spawn_ball(SpawnPolicy::CanvasCenter);
    state.rebuild_grid();
    state.emit(GameEvent::LevelUp { level: state.level });
    log::info!("Level {} cleared, starting level {}", cleared, state.level);
}

fn update_drops(state: &mut GameState) {
    let catch_line = state.layout.paddle_top();
    let bottom = state.layout.height;
    let (paddle_x, paddle_w) = (state.paddle.x, state.paddle.width);

    let mut caught = Vec::new();
    let mut missed = Vec::new();
    state.drops.retain_mut(|drop| {
        drop.pos.y += drop.speed;
        if drop.pos.y > catch_line && within_span(drop.pos.x, paddle_x, paddle_w) {
            caught.push(drop.kind);
            false
        } else if drop.pos.y > bottom {
            missed.push(drop.kind);
            false
        } else {
            true
        }
    });

    for kind in missed {
        state.emit(GameEvent::PowerUpMissed(kind));
    }
    for kind in caught {
        state.activate_power_up(kind);
    }
}

fn update_particles(state: &mut GameState) {
    if state.config.trail_particles {
        if let Some(lead) = state.balls.first().filter(|b| b.is_free()) {
            let pos = lead.pos;
            state.emit_trail(pos);
        }
    }

    for particle in state.particles.iter_mut() {
        particle.advance();
    }
    state.particles.retain(|p| !p.is_dead());
}

fn update_shake(state: &mut GameState) {
    if state.shake_ticks > 0 {
        state.shake_ticks -= 1;
        let intensity = state.layout.shake_intensity;
        let rng = state.rng();
        let x = rng.random::<f32>() * intensity * 2.0 - intensity;
        let y = rng.random::<f32>() * intensity * 2.0 - intensity;
        state.shake_offset = Vec2::new(x, y);
    } else {
        state.shake_offset = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::state::Ball;
    use proptest::prelude::*;

    fn quiet_config() -> GameConfig {
        GameConfig {
            seed: Some(12345),
            speed_ramp: false,
            trail_particles: false,
            power_up_chance: 0.0,
            ..Default::default()
        }
    }

    fn new_state(config: &GameConfig) -> GameState {
        let mut state = GameState::new(config);
        state.drain_events();
        state
    }

    fn place_ball(state: &mut GameState, pos: Vec2, vel: Vec2) {
        let ball = &mut state.balls[0];
        ball.pos = pos;
        ball.vel = vel;
        ball.state = BallState::Free;
    }

    fn count(events: &[GameEvent], wanted: GameEvent) -> usize {
        events.iter().filter(|e| **e == wanted).count()
    }

    #[test]
    fn test_pointer_clamps_paddle() {
        let mut state = new_state(&quiet_config());
        state.paddle.x = 350.0;
        state.paddle.width = 100.0;
        let input = TickInput {
            pointer_x: Some(900.0),
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.paddle.x, 700.0);
    }

    #[test]
    fn test_keyboard_moves_and_clamps() {
        let config = GameConfig {
            control: ControlScheme::Keyboard,
            ..quiet_config()
        };
        let mut state = new_state(&config);
        let start = state.paddle.x;
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        tick(&mut state, &left);
        assert!((state.paddle.x - (start - state.paddle.speed)).abs() < 0.001);

        // Both held cancels out; pointer is ignored in keyboard mode
        let both = TickInput {
            left: true,
            right: true,
            pointer_x: Some(0.0),
            ..Default::default()
        };
        let before = state.paddle.x;
        tick(&mut state, &both);
        assert_eq!(state.paddle.x, before);

        for _ in 0..200 {
            tick(&mut state, &left);
        }
        assert_eq!(state.paddle.x, 0.0);
    }

    #[test]
    fn test_side_and_top_walls_reflect() {
        let mut state = new_state(&quiet_config());
        place_ball(&mut state, Vec2::new(785.0, 300.0), Vec2::new(4.0, -3.0));
        tick(&mut state, &TickInput::default());
        assert!(state.balls[0].vel.x < 0.0);

        place_ball(&mut state, Vec2::new(15.0, 300.0), Vec2::new(-4.0, -3.0));
        tick(&mut state, &TickInput::default());
        assert!(state.balls[0].vel.x > 0.0);

        place_ball(&mut state, Vec2::new(400.0, 13.0), Vec2::new(4.0, -3.0));
        tick(&mut state, &TickInput::default());
        assert!(state.balls[0].vel.y > 0.0);
    }

    #[test]
    fn test_paddle_hit_bounces_and_notifies() {
        let mut state = new_state(&quiet_config());
        let center = state.paddle.center();
        place_ball(&mut state, Vec2::new(center, 576.0), Vec2::new(2.0, 3.0));
        tick(&mut state, &TickInput::default());
        assert!(state.balls[0].vel.y < 0.0);
        assert_eq!(count(&state.drain_events(), GameEvent::PaddleHit), 1);
    }

    #[test]
    fn test_paddle_edge_is_a_miss() {
        let mut state = new_state(&quiet_config());
        // Ball center lands exactly on the paddle's left edge
        let x = state.paddle.x;
        place_ball(&mut state, Vec2::new(x, 576.0), Vec2::new(0.0, 3.0));
        tick(&mut state, &TickInput::default());
        let events = state.drain_events();
        assert_eq!(count(&events, GameEvent::BallLost), 1);
        assert_eq!(state.lives, 2);
    }

    #[test]
    fn test_losing_last_ball_costs_a_life_and_respawns() {
        let mut state = new_state(&quiet_config());
        place_ball(&mut state, Vec2::new(50.0, 576.0), Vec2::new(0.0, 3.0));
        tick(&mut state, &TickInput::default());

        assert_eq!(state.lives, 2);
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.phase, GamePhase::Playing);
        let events = state.drain_events();
        assert_eq!(count(&events, GameEvent::BallLost), 1);
        assert_eq!(count(&events, GameEvent::LifeLost { lives_left: 2 }), 1);
    }

    #[test]
    fn test_losing_one_of_several_balls_is_free() {
        let mut state = new_state(&quiet_config());
        state.spawn_ball(SpawnPolicy::CanvasCenter);
        place_ball(&mut state, Vec2::new(50.0, 576.0), Vec2::new(0.0, 3.0));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.lives, 3);
        assert_eq!(state.balls.len(), 1);
    }

    #[test]
    fn test_adjacent_lost_balls_removed_in_one_pass() {
        let mut state = new_state(&quiet_config());
        state.spawn_ball(SpawnPolicy::CanvasCenter);
        state.spawn_ball(SpawnPolicy::CanvasCenter);
        place_ball(&mut state, Vec2::new(20.0, 576.0), Vec2::new(0.0, 3.0));
        state.balls[1].pos = Vec2::new(60.0, 576.0);
        state.balls[1].vel = Vec2::new(0.0, 3.0);
        state.balls[2].pos = Vec2::new(400.0, 300.0);
        state.balls[2].vel = Vec2::new(2.0, -3.0);
        let kept = state.balls[2].id;

        tick(&mut state, &TickInput::default());

        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.balls[0].id, kept);
        assert_eq!(state.lives, 3);
        let events = state.drain_events();
        assert_eq!(count(&events, GameEvent::BallLost), 2);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::LifeLost { .. })));
    }

    #[test]
    fn test_adjacent_drops_caught_and_missed_in_one_pass() {
        let mut state = new_state(&quiet_config());
        let speed = state.layout.drop_speed;
        let center = state.paddle.center();
        let push = |state: &mut GameState, kind: PowerUpKind, pos: Vec2| {
            let id = state.next_entity_id();
            state.drops.push(crate::sim::state::PowerUpDrop { id, kind, pos, speed });
            id
        };
        push(&mut state, PowerUpKind::Sticky, Vec2::new(10.0, 599.5));
        push(&mut state, PowerUpKind::Expand, Vec2::new(center, 587.0));
        let kept = push(&mut state, PowerUpKind::MultiBall, Vec2::new(center, 100.0));

        tick(&mut state, &TickInput::default());

        assert_eq!(state.drops.len(), 1);
        assert_eq!(state.drops[0].id, kept);
        assert!(state.power_ups.expand_active());
        assert!(!state.power_ups.sticky_active());
        let events = state.drain_events();
        assert_eq!(
            count(&events, GameEvent::PowerUpMissed(PowerUpKind::Sticky)),
            1
        );
        assert_eq!(
            count(&events, GameEvent::PowerUpCaught(PowerUpKind::Expand)),
            1
        );
    }

    #[test]
    fn test_brick_hit_without_break() {
        let mut state = new_state(&quiet_config());
        let (columns, rows) = (state.config.columns, state.config.rows);
        state.reset_bricks(columns, rows, 2..=2, 0.0);
        let rect = state.brick_at(0, 0).unwrap().rect;
        let center = rect.center();
        place_ball(&mut state, center + Vec2::new(0.0, 3.0), Vec2::new(0.0, -3.0));
        tick(&mut state, &TickInput::default());

        assert_eq!(state.brick_at(0, 0).unwrap().durability, 1);
        assert!(state.balls[0].vel.y > 0.0);
        assert_eq!(state.score, 0);
        assert!(state.shake_ticks > 0);
        let events = state.drain_events();
        assert_eq!(count(&events, GameEvent::BrickHit { destroyed: false }), 1);
    }

    #[test]
    fn test_brick_destroyed_spawns_burst_and_drop() {
        let mut state = new_state(&quiet_config());
        state.bricks[0].durability = 1;
        state.bricks[0].power_up = Some(PowerUpKind::Expand);
        let center = state.bricks[0].rect.center();
        place_ball(&mut state, center + Vec2::new(0.0, 3.0), Vec2::new(0.0, -3.0));
        tick(&mut state, &TickInput::default());

        assert!(!state.bricks[0].is_alive());
        assert_eq!(state.score, 1);
        assert_eq!(state.bricks_destroyed, 1);
        assert_eq!(state.particles.len(), crate::consts::BURST_PARTICLES);
        assert_eq!(state.drops.len(), 1);
        let drop = &state.drops[0];
        assert_eq!(drop.kind, PowerUpKind::Expand);
        assert!((drop.pos.x - (center.x - state.layout.drop_width / 2.0)).abs() < 0.001);
        let events = state.drain_events();
        assert_eq!(count(&events, GameEvent::BrickHit { destroyed: true }), 1);
    }

    #[test]
    fn test_destroyed_brick_is_inert() {
        let mut state = new_state(&quiet_config());
        state.bricks[0].durability = 0;
        let center = state.bricks[0].rect.center();
        place_ball(&mut state, center, Vec2::ZERO);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.bricks[0].durability, 0);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_clearing_9x5_grid_levels_up_once() {
        let config = GameConfig {
            columns: 9,
            rows: 5,
            durability_min: 1,
            durability_max: 1,
            ..quiet_config()
        };
        let mut state = new_state(&config);
        let mut events = Vec::new();

        for i in 0..45 {
            if i == 44 {
                assert_eq!(state.score, 44);
            }
            let center = state.bricks[i].rect.center();
            place_ball(&mut state, center, Vec2::ZERO);
            tick(&mut state, &TickInput::default());
            events.extend(state.drain_events());
        }

        assert_eq!(count(&events, GameEvent::BrickHit { destroyed: true }), 45);
        assert_eq!(count(&events, GameEvent::LevelUp { level: 2 }), 1);
        assert_eq!(state.level, 2);
        assert_eq!(state.score, 0);
        assert_eq!(state.bricks.len(), 45);
        assert!(state.bricks.iter().all(|b| b.durability == 1));
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.bricks_destroyed, 45);
    }

    #[test]
    fn test_final_level_completes_session() {
        let config = GameConfig {
            columns: 2,
            rows: 1,
            durability_min: 1,
            durability_max: 1,
            max_level: Some(1),
            ..quiet_config()
        };
        let mut state = new_state(&config);
        for i in 0..2 {
            let center = state.bricks[i].rect.center();
            place_ball(&mut state, center, Vec2::ZERO);
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.phase, GamePhase::Completed);
        assert!(state.balls.is_empty());
        let events = state.drain_events();
        assert_eq!(count(&events, GameEvent::SessionCompleted { level: 1 }), 1);
    }

    #[test]
    fn test_sticky_paddle_holds_ball_until_expiry() {
        let mut state = new_state(&quiet_config());
        state.activate_power_up(PowerUpKind::Sticky);
        let center = state.paddle.center();
        place_ball(&mut state, Vec2::new(center, 576.0), Vec2::new(2.0, 3.0));
        tick(&mut state, &TickInput::default());

        assert_eq!(state.balls[0].vel, Vec2::ZERO);
        assert!(matches!(state.balls[0].state, BallState::Stuck { .. }));
        let held_at = state.balls[0].pos;

        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
            assert_eq!(state.balls[0].pos, held_at);
            assert_eq!(state.balls[0].vel, Vec2::ZERO);
        }

        while state.power_ups.sticky_active() {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.balls[0].state, BallState::Free);
        assert!(state.balls[0].vel.y < 0.0);
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_launch_releases_stuck_ball() {
        let mut state = new_state(&quiet_config());
        state.activate_power_up(PowerUpKind::Sticky);
        let center = state.paddle.center();
        place_ball(&mut state, Vec2::new(center - 10.0, 576.0), Vec2::new(0.0, 3.0));
        tick(&mut state, &TickInput::default());
        assert!(matches!(state.balls[0].state, BallState::Stuck { .. }));

        let launch = TickInput {
            launch: true,
            ..Default::default()
        };
        tick(&mut state, &launch);
        let ball: &Ball = &state.balls[0];
        assert_eq!(ball.state, BallState::Free);
        // Left of center launches up and to the left
        assert!(ball.vel.x < 0.0 && ball.vel.y < 0.0);
    }

    #[test]
    fn test_stuck_ball_rides_with_paddle() {
        let config = GameConfig {
            trail_particles: true,
            ..quiet_config()
        };
        let mut state = new_state(&config);
        state.activate_power_up(PowerUpKind::Sticky);
        let center = state.paddle.center();
        place_ball(&mut state, Vec2::new(center + 5.0, 576.0), Vec2::new(0.0, 3.0));
        tick(&mut state, &TickInput::default());
        assert!(matches!(state.balls[0].state, BallState::Stuck { .. }));
        state.particles.clear();

        let steer = TickInput {
            pointer_x: Some(200.0),
            ..Default::default()
        };
        for _ in 0..20 {
            tick(&mut state, &steer);
        }
        assert!((state.paddle.center() - 200.0).abs() < 0.001);
        assert!((state.balls[0].pos.x - 205.0).abs() < 0.001);
        // A held ball leaves no trail
        assert!(state.particles.is_empty());

        let launch = TickInput {
            launch: true,
            ..steer
        };
        tick(&mut state, &launch);
        assert!(state.balls[0].is_free());
        assert!(state.balls[0].vel.x > 0.0);
        assert_eq!(state.particles.len(), 1);
    }

    #[test]
    fn test_last_life_ends_session_once() {
        let config = GameConfig {
            initial_lives: 1,
            ..quiet_config()
        };
        let mut state = new_state(&config);
        state.activate_power_up(PowerUpKind::Expand);
        state.drain_events();
        place_ball(&mut state, Vec2::new(20.0, 576.0), Vec2::new(0.0, 3.0));
        tick(&mut state, &TickInput::default());

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
        let events = state.drain_events();
        assert_eq!(count(&events, GameEvent::GameOver), 1);
        assert!(state.bricks.is_empty());
        assert!(!state.power_ups.expand_active());

        let ticks = state.time_ticks;
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.time_ticks, ticks);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_drop_caught_activates() {
        let mut state = new_state(&quiet_config());
        let width = state.paddle.width;
        let id = state.next_entity_id();
        state.drops.push(crate::sim::state::PowerUpDrop {
            id,
            kind: PowerUpKind::Expand,
            pos: Vec2::new(state.paddle.center(), 587.0),
            speed: state.layout.drop_speed,
        });
        tick(&mut state, &TickInput::default());
        assert!(state.drops.is_empty());
        assert!(state.paddle.width > width);
        let events = state.drain_events();
        assert_eq!(
            count(&events, GameEvent::PowerUpCaught(PowerUpKind::Expand)),
            1
        );
    }

    #[test]
    fn test_drop_missed_is_removed() {
        let mut state = new_state(&quiet_config());
        state.spawn_drop(PowerUpKind::Sticky, Vec2::new(10.0, 590.0));
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.drops.is_empty());
        assert!(!state.power_ups.sticky_active());
        let events = state.drain_events();
        assert_eq!(
            count(&events, GameEvent::PowerUpMissed(PowerUpKind::Sticky)),
            1
        );
    }

    #[test]
    fn test_pause_freezes_clock() {
        let mut state = new_state(&quiet_config());
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);
        let ticks = state.time_ticks;
        let pos = state.balls[0].pos;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.balls[0].pos, pos);

        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, ticks + 1);
    }

    #[test]
    fn test_particles_expire() {
        let mut state = new_state(&quiet_config());
        state.spawn_burst(Vec2::new(100.0, 100.0));
        for _ in 0..200 {
            update_particles(&mut state);
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_trail_follows_lead_ball() {
        let config = GameConfig {
            trail_particles: true,
            ..quiet_config()
        };
        let mut state = new_state(&config);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.particles.len(), 1);
        for _ in 0..99 {
            tick(&mut state, &TickInput::default());
        }
        // Trail dots fade out after ~50 ticks
        assert!(state.particles.len() >= 45 && state.particles.len() <= 50);
    }

    #[test]
    fn test_shake_decays() {
        let mut state = new_state(&quiet_config());
        state.shake();
        tick(&mut state, &TickInput::default());
        assert!(state.shake_offset.x.abs() <= state.layout.shake_intensity);
        for _ in 0..40 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.shake_ticks, 0);
        assert_eq!(state.shake_offset, Vec2::ZERO);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let config = GameConfig {
            seed: Some(99999),
            power_up_chance: 0.5,
            ..Default::default()
        };
        let mut state1 = GameState::new(&config);
        let mut state2 = GameState::new(&config);

        for i in 0..500 {
            let input = TickInput {
                pointer_x: Some((i as f32 * 7.0) % 800.0),
                ..Default::default()
            };
            tick(&mut state1, &input);
            tick(&mut state2, &input);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.balls.len(), state2.balls.len());
        assert_eq!(state1.score, state2.score);
        assert!((state1.paddle.x - state2.paddle.x).abs() < 0.0001);
    }

    proptest! {
        #[test]
        fn prop_balls_stay_on_canvas(
            seed in any::<u64>(),
            pointers in prop::collection::vec(0.0f32..800.0, 1..400),
        ) {
            let config = GameConfig {
                seed: Some(seed),
                power_up_chance: 0.3,
                ..Default::default()
            };
            let mut state = GameState::new(&config);
            for x in pointers {
                tick(&mut state, &TickInput { pointer_x: Some(x), ..Default::default() });
                if state.phase.is_terminal() {
                    break;
                }
                for ball in &state.balls {
                    prop_assert!(ball.pos.x >= 0.0 && ball.pos.x <= state.layout.width);
                    prop_assert!(ball.pos.y >= 0.0 && ball.pos.y <= state.layout.height);
                }
            }
        }

        #[test]
        fn prop_durability_never_increases_within_a_level(
            seed in any::<u64>(),
            pointers in prop::collection::vec(0.0f32..800.0, 1..400),
        ) {
            let config = GameConfig { seed: Some(seed), ..Default::default() };
            let mut state = GameState::new(&config);
            let mut level = state.level;
            let mut before: Vec<u8> = state.bricks.iter().map(|b| b.durability).collect();
            for x in pointers {
                tick(&mut state, &TickInput { pointer_x: Some(x), ..Default::default() });
                if state.phase.is_terminal() {
                    break;
                }
                let now: Vec<u8> = state.bricks.iter().map(|b| b.durability).collect();
                if state.level == level {
                    for (old, new) in before.iter().zip(&now) {
                        prop_assert!(new <= old);
                    }
                }
                level = state.level;
                before = now;
            }
        }

        #[test]
        fn prop_score_counts_destroyed_bricks(
            seed in any::<u64>(),
            pointers in prop::collection::vec(0.0f32..800.0, 1..400),
        ) {
            let config = GameConfig { seed: Some(seed), ..Default::default() };
            let mut state = GameState::new(&config);
            for x in pointers {
                tick(&mut state, &TickInput { pointer_x: Some(x), ..Default::default() });
                if state.phase.is_terminal() {
                    break;
                }
                prop_assert_eq!(state.score as usize, state.destroyed_bricks());
                prop_assert!(state.score < state.config.brick_count());
            }
        }
    }
}
