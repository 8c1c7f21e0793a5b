//! 2D canvas backend
//!
//! Replays a draw list on a `CanvasRenderingContext2d`.

use std::f64::consts::TAU;

use web_sys::CanvasRenderingContext2d;

use super::draw::{DrawCmd, Paint, Stroke, TextAlign, css};
use crate::sim::Rect;

/// Draw a full frame
pub fn replay(ctx: &CanvasRenderingContext2d, width: f64, height: f64, cmds: &[DrawCmd]) {
    for cmd in cmds {
        match cmd {
            DrawCmd::Clear(color) => {
                ctx.clear_rect(0.0, 0.0, width, height);
                ctx.set_fill_style_str(&css(*color));
                ctx.fill_rect(0.0, 0.0, width, height);
            }
            DrawCmd::PushOffset(offset) => {
                ctx.save();
                ctx.translate(offset.x as f64, offset.y as f64).ok();
            }
            DrawCmd::PopOffset => ctx.restore(),
            DrawCmd::RoundRect {
                rect,
                radius,
                paint,
                stroke,
            } => {
                ctx.begin_path();
                round_rect_path(ctx, rect, *radius as f64);
                fill_and_stroke(ctx, paint, stroke);
            }
            DrawCmd::Circle {
                center,
                radius,
                paint,
                stroke,
            } => {
                ctx.begin_path();
                ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU)
                    .ok();
                fill_and_stroke(ctx, paint, stroke);
            }
            DrawCmd::Text {
                text,
                pos,
                size,
                color,
                align,
            } => {
                ctx.set_font(&format!("{}px Arial", size.round()));
                ctx.set_text_align(match align {
                    TextAlign::Left => "left",
                    TextAlign::Center => "center",
                });
                ctx.set_fill_style_str(&css(*color));
                ctx.fill_text(text, pos.x as f64, pos.y as f64).ok();
            }
        }
    }
}

fn round_rect_path(ctx: &CanvasRenderingContext2d, rect: &Rect, radius: f64) {
    let (x, y, w, h) = (rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    ctx.move_to(x + r, y);
    ctx.arc_to(x + w, y, x + w, y + h, r).ok();
    ctx.arc_to(x + w, y + h, x, y + h, r).ok();
    ctx.arc_to(x, y + h, x, y, r).ok();
    ctx.arc_to(x, y, x + w, y, r).ok();
    ctx.close_path();
}

fn fill_and_stroke(ctx: &CanvasRenderingContext2d, paint: &Paint, stroke: &Option<Stroke>) {
    match paint {
        Paint::Solid(color) => ctx.set_fill_style_str(&css(*color)),
        Paint::Linear { from, to, stops } => {
            let gradient =
                ctx.create_linear_gradient(from.x as f64, from.y as f64, to.x as f64, to.y as f64);
            gradient.add_color_stop(0.0, &css(stops[0])).ok();
            gradient.add_color_stop(1.0, &css(stops[1])).ok();
            ctx.set_fill_style_canvas_gradient(&gradient);
        }
        Paint::Radial {
            center,
            radius,
            stops,
        } => {
            let (cx, cy) = (center.x as f64, center.y as f64);
            match ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, *radius as f64) {
                Ok(gradient) => {
                    gradient.add_color_stop(0.0, &css(stops[0])).ok();
                    gradient.add_color_stop(1.0, &css(stops[1])).ok();
                    ctx.set_fill_style_canvas_gradient(&gradient);
                }
                // Zero or negative radius
                Err(_) => ctx.set_fill_style_str(&css(stops[1])),
            }
        }
    }
    ctx.fill();

    if let Some(stroke) = stroke {
        ctx.set_stroke_style_str(&css(stroke.color));
        ctx.set_line_width(stroke.width as f64);
        ctx.stroke();
    }
}
