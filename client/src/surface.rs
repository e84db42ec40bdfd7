use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, ImageData};

use crate::dom::set_placeholder;
use crate::geometry::fit_rect;
use crate::state::State;

/// Synchronous copy of the full pixel buffer. `None` when the surface has no
/// area yet (before the first layout pass).
pub fn capture_snapshot(state: &State) -> Option<ImageData> {
    let width = state.canvas.width();
    let height = state.canvas.height();
    if width == 0 || height == 0 {
        return None;
    }
    state
        .ctx
        .get_image_data(0.0, 0.0, width as f64, height as f64)
        .ok()
}

/// Write a snapshot back onto the surface. Same-size snapshots are restored
/// pixel-for-pixel; snapshots from other dimensions (taken before a resize)
/// are refitted over a fresh background.
pub fn apply_snapshot(
    document: &Document,
    state: &State,
    snapshot: &ImageData,
) -> Result<(), JsValue> {
    if snapshot.width() == state.canvas.width() && snapshot.height() == state.canvas.height() {
        return state.ctx.put_image_data(snapshot, 0.0, 0.0);
    }
    fill_surface(state, &state.background_color);
    blit_scaled(document, state, snapshot)
}

/// Flood the surface with `color`, then restore the selected color as the
/// active paint so the next path is unaffected.
pub fn fill_surface(state: &State, color: &str) {
    state.ctx.set_fill_style_str(color);
    state.ctx.fill_rect(
        0.0,
        0.0,
        state.canvas.width() as f64,
        state.canvas.height() as f64,
    );
    state.ctx.set_fill_style_str(&state.selected_color);
}

/// Reset to a flat background and mark the surface logically empty.
pub fn fill_background(state: &mut State, color: &str, title: &HtmlElement) {
    state.background_color = color.to_string();
    fill_surface(state, color);
    state.stroke_snapshot = None;
    set_placeholder(title, true);
}

/// Resize the backing buffer to the element's visible size. Resizing wipes
/// the pixel content and resets the context, so the bitmap is captured
/// first and refitted afterwards.
pub fn resize_surface(document: &Document, state: &mut State, title: &HtmlElement) {
    let snapshot = capture_snapshot(state);
    state.canvas.set_width(state.canvas.offset_width() as u32);
    state.canvas.set_height(state.canvas.offset_height() as u32);
    reset_context(&state.ctx);

    let background = state.background_color.clone();
    fill_surface(state, &background);
    match snapshot {
        Some(snapshot) => {
            let _ = blit_scaled(document, state, &snapshot);
        }
        None => set_placeholder(title, true),
    }
}

/// Line caps and joins are wiped along with the pixels when the buffer is
/// resized.
pub fn reset_context(ctx: &CanvasRenderingContext2d) {
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
}

/// Draw a snapshot scaled to fit the surface, centered, through a scratch
/// canvas (`put_image_data` cannot scale).
fn blit_scaled(document: &Document, state: &State, snapshot: &ImageData) -> Result<(), JsValue> {
    let Some(fit) = fit_rect(
        snapshot.width() as f64,
        snapshot.height() as f64,
        state.canvas.width() as f64,
        state.canvas.height() as f64,
    ) else {
        return Ok(());
    };
    let scratch: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    scratch.set_width(snapshot.width());
    scratch.set_height(snapshot.height());
    let scratch_ctx = scratch
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing scratch context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    scratch_ctx.put_image_data(snapshot, 0.0, 0.0)?;
    state
        .ctx
        .draw_image_with_html_canvas_element_and_dw_and_dh(
            &scratch, fit.x, fit.y, fit.width, fit.height,
        )
}

/// Render an external image (a gallery drawing) scaled and centered over a
/// fresh background.
pub fn draw_image_fitted(state: &State, image: &web_sys::HtmlImageElement) -> Result<(), JsValue> {
    fill_surface(state, &state.background_color);
    let Some(fit) = fit_rect(
        image.natural_width() as f64,
        image.natural_height() as f64,
        state.canvas.width() as f64,
        state.canvas.height() as f64,
    ) else {
        return Ok(());
    };
    state.ctx.draw_image_with_html_image_element_and_dw_and_dh(
        image, fit.x, fit.y, fit.width, fit.height,
    )
}

pub fn to_data_url(state: &State) -> Result<String, JsValue> {
    state.canvas.to_data_url()
}
