//! Frame composition
//!
//! Builds the draw list for whatever the orchestrator is showing: the title
//! menu, a running session, or the end screen.

use glam::Vec2;

use super::draw::{Color, DrawCmd, Paint, Stroke, TextAlign, rgb, with_alpha};
use crate::session::{EndReason, SessionSummary};
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, ParticleKind, PowerUpKind, Rect};

/// Colors for game elements
pub mod colors {
    use super::{Color, rgb};

    pub const BACKGROUND: Color = [0.0, 0.0, 0.0, 1.0];
    pub const TEXT: Color = rgb(0xffffff);
    pub const OUTLINE: Color = rgb(0x005588);
    pub const BRICK_STROKE: Color = rgb(0xffffff);
    /// Brick fill by remaining durability (1, 2, 3+)
    pub const BRICK: [Color; 3] = [rgb(0x0095dd), rgb(0xff0000), rgb(0x00ff00)];
    pub const PADDLE_LEFT: Color = rgb(0x0095dd);
    pub const PADDLE_RIGHT: Color = rgb(0x00ffff);
    pub const BALL_CORE: Color = rgb(0xffffff);
    pub const BALL_EDGE: Color = rgb(0x0095dd);
    pub const BURST: Color = rgb(0xff0000);
    pub const TRAIL: Color = rgb(0x0095dd);
    pub const EXPAND: Color = rgb(0xff0000);
    pub const STICKY: Color = rgb(0x00ff00);
    pub const MULTI_BALL: Color = rgb(0x0000ff);
}

const PADDLE_CORNER: f32 = 5.0;
const SMALL_CORNER: f32 = 3.0;
const OUTLINE_WIDTH: f32 = 2.0;

/// What is on screen
pub enum Scene<'a> {
    Menu,
    Playing(&'a GameState),
    Ended(&'a SessionSummary),
}

pub fn brick_color(durability: u8) -> Color {
    let index = (durability.max(1) as usize - 1).min(colors::BRICK.len() - 1);
    colors::BRICK[index]
}

pub fn power_up_color(kind: PowerUpKind) -> Color {
    match kind {
        PowerUpKind::Expand => colors::EXPAND,
        PowerUpKind::Sticky => colors::STICKY,
        PowerUpKind::MultiBall => colors::MULTI_BALL,
    }
}

/// Compose one frame for a `width` x `height` canvas
pub fn build_frame(
    scene: &Scene,
    width: f32,
    height: f32,
    settings: &Settings,
    fps: Option<u32>,
) -> Vec<DrawCmd> {
    let mut cmds = vec![DrawCmd::Clear(colors::BACKGROUND)];

    match scene {
        Scene::Menu => {
            title_screen(&mut cmds, width, height, "Breakout Game", "Tap to Start", None);
        }
        Scene::Playing(state) => {
            draw_world(&mut cmds, state, settings);
            draw_hud(&mut cmds, state);
            if state.phase == GamePhase::Paused {
                title_screen(&mut cmds, width, height, "Paused", "Press P to Resume", None);
            }
        }
        Scene::Ended(summary) => {
            let title = match summary.reason {
                EndReason::Completed => "All Levels Cleared",
                EndReason::OutOfLives | EndReason::PlayerQuit => "Game Over",
            };
            let detail = format!(
                "Level {} - {} bricks destroyed",
                summary.level, summary.bricks_destroyed
            );
            title_screen(&mut cmds, width, height, title, "Tap to Restart", Some(detail.as_str()));
        }
    }

    if let Some(fps) = fps.filter(|_| settings.show_fps) {
        cmds.push(text(
            format!("{} FPS", fps),
            Vec2::new(width * 0.02, height * 0.98),
            width * 0.02,
            TextAlign::Left,
        ));
    }

    cmds
}

fn text(text: String, pos: Vec2, size: f32, align: TextAlign) -> DrawCmd {
    DrawCmd::Text {
        text,
        pos,
        size,
        color: colors::TEXT,
        align,
    }
}

fn title_screen(
    cmds: &mut Vec<DrawCmd>,
    width: f32,
    height: f32,
    title: &str,
    prompt: &str,
    detail: Option<&str>,
) {
    let center = Vec2::new(width / 2.0, height / 2.0);
    cmds.push(text(
        title.to_string(),
        center - Vec2::new(0.0, height * 0.1),
        width * 0.05,
        TextAlign::Center,
    ));
    if let Some(detail) = detail {
        cmds.push(text(detail.to_string(), center, width * 0.025, TextAlign::Center));
    }
    cmds.push(text(
        prompt.to_string(),
        center + Vec2::new(0.0, height * 0.1),
        width * 0.03,
        TextAlign::Center,
    ));
}

fn draw_world(cmds: &mut Vec<DrawCmd>, state: &GameState, settings: &Settings) {
    let gradients = settings.quality.gradients();
    let paint = |p: Paint| if gradients { p } else { p.flattened() };
    let outline = Some(Stroke {
        color: colors::OUTLINE,
        width: OUTLINE_WIDTH,
    });

    let shaking = settings.screen_shake && state.shake_offset != Vec2::ZERO;
    if shaking {
        cmds.push(DrawCmd::PushOffset(state.shake_offset));
    }

    for brick in state.bricks.iter().filter(|b| b.is_alive()) {
        cmds.push(DrawCmd::RoundRect {
            rect: brick.rect,
            radius: SMALL_CORNER,
            paint: Paint::Solid(brick_color(brick.durability)),
            stroke: Some(Stroke {
                color: colors::BRICK_STROKE,
                width: OUTLINE_WIDTH,
            }),
        });
    }

    for ball in &state.balls {
        cmds.push(DrawCmd::Circle {
            center: ball.pos,
            radius: ball.radius,
            paint: paint(Paint::Radial {
                center: ball.pos,
                radius: ball.radius,
                stops: [colors::BALL_CORE, colors::BALL_EDGE],
            }),
            stroke: outline,
        });
    }

    let paddle = state.paddle.rect(&state.layout);
    cmds.push(DrawCmd::RoundRect {
        rect: paddle,
        radius: PADDLE_CORNER,
        paint: paint(Paint::Linear {
            from: Vec2::new(paddle.x, 0.0),
            to: Vec2::new(paddle.right(), 0.0),
            stops: [colors::PADDLE_LEFT, colors::PADDLE_RIGHT],
        }),
        stroke: outline,
    });

    for drop in &state.drops {
        cmds.push(DrawCmd::RoundRect {
            rect: Rect::new(
                drop.pos.x,
                drop.pos.y,
                state.layout.drop_width,
                state.layout.drop_height,
            ),
            radius: SMALL_CORNER,
            paint: Paint::Solid(power_up_color(drop.kind)),
            stroke: None,
        });
    }

    for particle in &state.particles {
        let color = match particle.kind {
            ParticleKind::Trail if settings.trails => colors::TRAIL,
            ParticleKind::Burst if settings.particles => colors::BURST,
            _ => continue,
        };
        cmds.push(DrawCmd::Circle {
            center: particle.pos,
            radius: particle.radius.max(0.0),
            paint: Paint::Solid(with_alpha(color, particle.alpha)),
            stroke: None,
        });
    }

    if shaking {
        cmds.push(DrawCmd::PopOffset);
    }
}

fn draw_hud(cmds: &mut Vec<DrawCmd>, state: &GameState) {
    let (w, h) = (state.layout.width, state.layout.height);
    let size = w * 0.03;
    let y = h * 0.05;
    cmds.push(text(
        format!("Score: {}", state.score),
        Vec2::new(w * 0.02, y),
        size,
        TextAlign::Left,
    ));
    cmds.push(text(
        format!("Level: {}", state.level),
        Vec2::new(w / 2.0 - w * 0.05, y),
        size,
        TextAlign::Left,
    ));
    cmds.push(text(
        format!("Lives: {}", state.lives),
        Vec2::new(w - w * 0.1, y),
        size,
        TextAlign::Left,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::settings::QualityPreset;

    fn state() -> GameState {
        GameState::new(&GameConfig {
            seed: Some(3),
            ..Default::default()
        })
    }

    fn texts(cmds: &[DrawCmd]) -> Vec<String> {
        cmds.iter()
            .filter_map(|c| match c {
                DrawCmd::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn rect_count(cmds: &[DrawCmd]) -> usize {
        cmds.iter()
            .filter(|c| matches!(c, DrawCmd::RoundRect { .. }))
            .count()
    }

    #[test]
    fn test_menu_frame() {
        let cmds = build_frame(&Scene::Menu, 800.0, 600.0, &Settings::default(), None);
        assert_eq!(cmds[0], DrawCmd::Clear(colors::BACKGROUND));
        assert_eq!(texts(&cmds), vec!["Breakout Game", "Tap to Start"]);
    }

    #[test]
    fn test_destroyed_bricks_not_drawn() {
        let mut state = state();
        let settings = Settings::default();
        let full = build_frame(&Scene::Playing(&state), 800.0, 600.0, &settings, None);
        // 45 bricks + paddle
        assert_eq!(rect_count(&full), 46);

        state.bricks[0].durability = 0;
        state.bricks[7].durability = 0;
        let fewer = build_frame(&Scene::Playing(&state), 800.0, 600.0, &settings, None);
        assert_eq!(rect_count(&fewer), 44);
    }

    #[test]
    fn test_hud_text() {
        let state = state();
        let cmds = build_frame(&Scene::Playing(&state), 800.0, 600.0, &Settings::default(), None);
        let texts = texts(&cmds);
        assert!(texts.contains(&"Score: 0".to_string()));
        assert!(texts.contains(&"Lives: 3".to_string()));
        assert!(texts.contains(&"Level: 1".to_string()));
    }

    #[test]
    fn test_shake_respects_settings() {
        let mut state = state();
        state.shake_offset = Vec2::new(2.0, -1.0);
        let mut settings = Settings::default();
        let cmds = build_frame(&Scene::Playing(&state), 800.0, 600.0, &settings, None);
        assert!(cmds.contains(&DrawCmd::PushOffset(Vec2::new(2.0, -1.0))));
        assert!(cmds.contains(&DrawCmd::PopOffset));

        settings.screen_shake = false;
        let cmds = build_frame(&Scene::Playing(&state), 800.0, 600.0, &settings, None);
        assert!(!cmds.iter().any(|c| matches!(c, DrawCmd::PushOffset(_))));
    }

    #[test]
    fn test_low_quality_has_no_gradients() {
        let state = state();
        let settings = Settings::from_preset(QualityPreset::Low);
        let cmds = build_frame(&Scene::Playing(&state), 800.0, 600.0, &settings, None);
        let gradient = cmds.iter().any(|c| match c {
            DrawCmd::RoundRect { paint, .. } | DrawCmd::Circle { paint, .. } => {
                !matches!(paint, Paint::Solid(_))
            }
            _ => false,
        });
        assert!(!gradient);
    }

    #[test]
    fn test_end_screen() {
        let summary = SessionSummary {
            reason: EndReason::OutOfLives,
            seed: 1,
            level: 4,
            lives: 0,
            ticks: 100,
            bricks_destroyed: 150,
        };
        let cmds = build_frame(&Scene::Ended(&summary), 800.0, 600.0, &Settings::default(), None);
        let texts = texts(&cmds);
        assert_eq!(texts[0], "Game Over");
        assert!(texts.contains(&"Tap to Restart".to_string()));
    }

    #[test]
    fn test_brick_colors_by_durability() {
        assert_eq!(brick_color(1), colors::BRICK[0]);
        assert_eq!(brick_color(3), colors::BRICK[2]);
        assert_eq!(brick_color(9), colors::BRICK[2]);
    }

    #[test]
    fn test_fps_only_when_enabled() {
        let mut settings = Settings::default();
        let cmds = build_frame(&Scene::Menu, 800.0, 600.0, &settings, Some(60));
        assert!(!texts(&cmds).contains(&"60 FPS".to_string()));
        settings.show_fps = true;
        let cmds = build_frame(&Scene::Menu, 800.0, 600.0, &settings, Some(60));
        assert!(texts(&cmds).contains(&"60 FPS".to_string()));
    }
}
