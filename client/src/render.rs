use crate::geometry::{circle_radius, rect_between, Point};
use crate::state::{paint_color, sanitize_brush_width, State, StrokePhase, Tool};

/// Enter the `stroking` state: set up paint for the selected tool and open
/// the path that freehand moves will extend. The caller has already captured
/// the stroke snapshot and pushed the pre-stroke bitmap onto history.
pub fn begin_stroke(state: &mut State, start: Point) {
    let color = paint_color(state.tool, &state.selected_color, &state.background_color).to_string();
    state.ctx.set_stroke_style_str(&color);
    state.ctx.set_fill_style_str(&color);
    state.ctx.set_line_width(sanitize_brush_width(state.brush_width));
    state.ctx.set_line_cap("round");
    state.ctx.set_line_join("round");
    state.ctx.begin_path();
    state.phase = StrokePhase::Stroking { start };
}

/// One preview frame: restore the clean pre-stroke bitmap, then draw the
/// in-progress shape from the stroke start to the current pointer position.
pub fn render_stroke(state: &State, current: Point) {
    let StrokePhase::Stroking { start } = state.phase else {
        return;
    };
    let Some(snapshot) = state.stroke_snapshot.as_ref() else {
        return;
    };
    let _ = state.ctx.put_image_data(snapshot, 0.0, 0.0);

    match state.tool {
        Tool::Brush | Tool::Eraser => {
            // The path accumulates across moves; replaying it over the
            // restored snapshot keeps the line continuous.
            state.ctx.line_to(current.x, current.y);
            state.ctx.stroke();
        }
        Tool::Line => {
            state.ctx.begin_path();
            state.ctx.move_to(start.x, start.y);
            state.ctx.line_to(current.x, current.y);
            state.ctx.stroke();
        }
        Tool::Rectangle => {
            state.ctx.set_line_join("miter");
            state.ctx.begin_path();
            let rect = rect_between(start, current);
            state.ctx.rect(rect.x, rect.y, rect.width, rect.height);
            if state.fill_shape {
                state.ctx.fill();
            }
            state.ctx.stroke();
        }
        Tool::Circle => {
            state.ctx.begin_path();
            let _ = state.ctx.arc(
                start.x,
                start.y,
                circle_radius(start, current),
                0.0,
                std::f64::consts::PI * 2.0,
            );
            if state.fill_shape {
                state.ctx.fill();
            }
            state.ctx.stroke();
        }
    }
}

/// Leave the `stroking` state; the surface keeps whatever the last preview
/// frame drew.
pub fn end_stroke(state: &mut State) {
    state.phase = StrokePhase::Idle;
    state.stroke_snapshot = None;
}
