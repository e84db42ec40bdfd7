use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlCanvasElement, HtmlElement, HtmlInputElement,
    HtmlSpanElement, PointerEvent, Window,
};

use crate::geometry::Point;

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

/// Pointer position as an offset into the canvas element, in device pixels.
pub fn event_point(event: &PointerEvent) -> Point {
    Point {
        x: event.offset_x() as f64,
        y: event.offset_y() as f64,
    }
}

pub fn update_size_label(input: &HtmlInputElement, value: &HtmlSpanElement) {
    value.set_text_content(Some(&input.value()));
}

pub fn set_tool_button(button: &HtmlButtonElement, active: bool) {
    let pressed = if active { "true" } else { "false" };
    let _ = button.set_attribute("aria-pressed", pressed);
}

pub fn set_status(status_el: &Element, status_text: &Element, state: &str, text: &str) {
    let _ = status_el.set_attribute("data-state", state);
    status_text.set_text_content(Some(text));
}

/// The "draw something" hint shown while the canvas is logically empty.
pub fn set_placeholder(title: &HtmlElement, visible: bool) {
    let class = if visible {
        "canvas-title"
    } else {
        "canvas-title hidden"
    };
    title.set_class_name(class);
}

pub fn set_generate_busy(button: &HtmlButtonElement, busy: bool) {
    button.set_disabled(busy);
    let value = if busy { "true" } else { "false" };
    let _ = button.set_attribute("aria-busy", value);
    let label = if busy {
        "Generating..."
    } else {
        "Generate song"
    };
    button.set_inner_text(label);
}

pub fn set_canvas_dimmed(canvas: &HtmlCanvasElement, dimmed: bool) {
    let class = if dimmed { "sketch dimmed" } else { "sketch" };
    canvas.set_class_name(class);
}

pub fn set_entry_controls(buttons: &[&HtmlButtonElement], enabled: bool) {
    for button in buttons {
        button.set_disabled(!enabled);
    }
}

pub fn show_alert(window: &Window, text: &str) {
    let _ = window.alert_with_message(text);
}
