use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, Event, HtmlButtonElement, HtmlCanvasElement,
    HtmlElement, HtmlIFrameElement, HtmlImageElement, HtmlInputElement, HtmlSpanElement,
    KeyboardEvent, PointerEvent, Window,
};

use songsketch_shared::{
    EntryRequest, ErrorResponse, HistoryResponse, PaintifyRequest, SongResponse,
};

use crate::dom::{
    event_point, get_element, set_canvas_dimmed, set_entry_controls, set_generate_busy,
    set_placeholder, set_status, set_tool_button, show_alert, update_size_label,
};
use crate::gallery::{gallery_index_from_event, render_gallery};
use crate::history::{History, HISTORY_LIMIT};
use crate::net::{
    entry_image_url, fetch_text, get_request, post_json_request, track_embed_url, HISTORY_URL,
    MUSIFY_URL, PAINTIFY_URL, REMOVE_URL,
};
use crate::palette::{palette_index_from_event, render_palette};
use crate::render::{begin_stroke, end_stroke, render_stroke};
use crate::state::{
    sanitize_brush_width, State, StrokePhase, Tool, DEFAULT_BACKGROUND, DEFAULT_PALETTE,
    RESIZE_DEBOUNCE_MS,
};
use crate::surface::{
    apply_snapshot, capture_snapshot, draw_image_fitted, fill_background, reset_context,
    resize_surface, to_data_url,
};

/// Every element a handler may need to touch, cloned once per closure.
#[derive(Clone)]
struct Panels {
    window: Window,
    document: Document,
    canvas: HtmlCanvasElement,
    title: HtmlElement,
    status_el: Element,
    status_text: Element,
    description: HtmlElement,
    music_frame: HtmlIFrameElement,
    generate_button: HtmlButtonElement,
    board_el: HtmlElement,
    remove_button: HtmlButtonElement,
    redraw_button: HtmlButtonElement,
    musify_button: HtmlButtonElement,
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    let started = Rc::new(Cell::new(false));

    if document.ready_state() == "complete" {
        started.set(true);
        return start_app();
    }

    let onload_started = started.clone();
    let onload = Closure::<dyn FnMut(Event)>::new(move |_| {
        if onload_started.replace(true) {
            return;
        }
        if let Err(err) = start_app() {
            web_sys::console::error_1(&err);
        }
    });
    window.add_event_listener_with_callback("load", onload.as_ref().unchecked_ref())?;
    onload.forget();

    Ok(())
}

fn start_app() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let canvas: HtmlCanvasElement = get_element(&document, "sketch")?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    reset_context(&ctx);

    let title: HtmlElement = get_element(&document, "sketchTitle")?;
    let palette_el: HtmlElement = get_element(&document, "palette")?;
    let color_input: HtmlInputElement = get_element(&document, "color")?;
    let fill_checkbox: HtmlInputElement = get_element(&document, "fillShape")?;
    let size_input: HtmlInputElement = get_element(&document, "size")?;
    let size_value: HtmlSpanElement = get_element(&document, "sizeValue")?;
    let fill_button: HtmlButtonElement = get_element(&document, "fillCanvas")?;
    let clear_button: HtmlButtonElement = get_element(&document, "clearCanvas")?;
    let undo_button: HtmlButtonElement = get_element(&document, "undo")?;
    let redo_button: HtmlButtonElement = get_element(&document, "redo")?;
    let generate_button: HtmlButtonElement = get_element(&document, "generate")?;
    let description: HtmlElement = get_element(&document, "description")?;
    let music_frame: HtmlIFrameElement = get_element(&document, "musicFrame")?;
    let board_el: HtmlElement = get_element(&document, "gallery")?;
    let remove_button: HtmlButtonElement = get_element(&document, "remove")?;
    let redraw_button: HtmlButtonElement = get_element(&document, "redraw")?;
    let musify_button: HtmlButtonElement = get_element(&document, "musify")?;
    let status_el = document
        .get_element_by_id("status")
        .ok_or_else(|| JsValue::from_str("Missing status element"))?;
    let status_text = document
        .get_element_by_id("statusText")
        .ok_or_else(|| JsValue::from_str("Missing status text"))?;

    let panels = Panels {
        window: window.clone(),
        document: document.clone(),
        canvas: canvas.clone(),
        title: title.clone(),
        status_el,
        status_text,
        description,
        music_frame,
        generate_button: generate_button.clone(),
        board_el,
        remove_button: remove_button.clone(),
        redraw_button: redraw_button.clone(),
        musify_button: musify_button.clone(),
    };

    let state = Rc::new(RefCell::new(State {
        canvas: canvas.clone(),
        ctx,
        tool: Tool::Brush,
        fill_shape: false,
        brush_width: sanitize_brush_width(size_input.value_as_number()),
        selected_color: DEFAULT_PALETTE[0].to_string(),
        background_color: DEFAULT_BACKGROUND.to_string(),
        palette: DEFAULT_PALETTE
            .iter()
            .map(|value| value.to_string())
            .collect(),
        palette_selected: Some(0),
        phase: StrokePhase::Idle,
        stroke_snapshot: None,
        history: History::new(HISTORY_LIMIT),
        entries: Vec::new(),
        selected_entry: None,
        busy: false,
    }));

    {
        let mut state = state.borrow_mut();
        resize_surface(&document, &mut state, &title);
        fill_background(&mut state, DEFAULT_BACKGROUND, &title);
        render_palette(&document, &palette_el, &state.palette, state.palette_selected);
    }
    update_size_label(&size_input, &size_value);
    set_entry_controls(
        &[&remove_button, &redraw_button, &musify_button],
        false,
    );
    set_status(&panels.status_el, &panels.status_text, "ready", "Ready");
    refresh_gallery(&panels, &state);

    // Tool buttons share one id scheme with the Tool enum.
    let tool_buttons: Vec<(Tool, HtmlButtonElement)> = [
        Tool::Brush,
        Tool::Eraser,
        Tool::Line,
        Tool::Rectangle,
        Tool::Circle,
    ]
    .into_iter()
    .map(|tool| {
        get_element::<HtmlButtonElement>(&document, tool.id()).map(|button| (tool, button))
    })
    .collect::<Result<_, _>>()?;
    let tool_buttons = Rc::new(tool_buttons);
    for (tool, button) in tool_buttons.iter() {
        set_tool_button(button, *tool == Tool::Brush);
    }

    for (tool, button) in tool_buttons.iter() {
        let tool = *tool;
        let tool_state = state.clone();
        let tool_buttons_cb = tool_buttons.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut state = tool_state.borrow_mut();
            state.tool = tool;
            for (other, other_button) in tool_buttons_cb.iter() {
                set_tool_button(other_button, *other == tool);
            }
        });
        button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let fill_state = state.clone();
        let fill_checkbox_cb = fill_checkbox.clone();
        let onchange = Closure::<dyn FnMut(Event)>::new(move |_| {
            fill_state.borrow_mut().fill_shape = fill_checkbox_cb.checked();
        });
        fill_checkbox
            .add_event_listener_with_callback("change", onchange.as_ref().unchecked_ref())?;
        onchange.forget();
    }

    {
        let size_state = state.clone();
        let size_input_cb = size_input.clone();
        let size_value_cb = size_value.clone();
        let oninput = Closure::<dyn FnMut(Event)>::new(move |_| {
            update_size_label(&size_input_cb, &size_value_cb);
            size_state.borrow_mut().brush_width =
                sanitize_brush_width(size_input_cb.value_as_number());
        });
        size_input.add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }

    {
        let palette_state = state.clone();
        let palette_el_cb = palette_el.clone();
        let document_cb = document.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(index) = palette_index_from_event(&event) else {
                return;
            };
            let mut state = palette_state.borrow_mut();
            let Some(color) = state.palette.get(index).cloned() else {
                return;
            };
            state.palette_selected = Some(index);
            state.selected_color = color;
            render_palette(
                &document_cb,
                &palette_el_cb,
                &state.palette,
                state.palette_selected,
            );
        });
        palette_el.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let color_state = state.clone();
        let color_input_cb = color_input.clone();
        let palette_el_cb = palette_el.clone();
        let document_cb = document.clone();
        let onchange = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut state = color_state.borrow_mut();
            state.selected_color = color_input_cb.value();
            state.palette_selected = None;
            render_palette(&document_cb, &palette_el_cb, &state.palette, None);
        });
        color_input.add_event_listener_with_callback("change", onchange.as_ref().unchecked_ref())?;
        onchange.forget();
    }

    {
        let fill_state = state.clone();
        let title_cb = title.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut state = fill_state.borrow_mut();
            let color = state.selected_color.clone();
            fill_background(&mut state, &color, &title_cb);
        });
        fill_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let clear_state = state.clone();
        let title_cb = title.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut state = clear_state.borrow_mut();
            fill_background(&mut state, DEFAULT_BACKGROUND, &title_cb);
        });
        clear_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let undo_state = state.clone();
        let undo_panels = panels.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            apply_undo(&undo_panels, &undo_state);
        });
        undo_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let redo_state = state.clone();
        let redo_panels = panels.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            apply_redo(&redo_panels, &redo_state);
        });
        redo_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let oncontextmenu = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            event.prevent_default();
        });
        canvas.add_event_listener_with_callback(
            "contextmenu",
            oncontextmenu.as_ref().unchecked_ref(),
        )?;
        oncontextmenu.forget();
    }

    {
        let down_state = state.clone();
        let down_panels = panels.clone();
        let ondown = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let point = event_point(&event);
            let mut state = down_state.borrow_mut();
            // Pre-stroke bitmap goes to history; a second copy backs the
            // preview so the two never alias.
            let Some(pre_stroke) = capture_snapshot(&state) else {
                return;
            };
            state.history.record(pre_stroke);
            state.stroke_snapshot = capture_snapshot(&state);
            begin_stroke(&mut state, point);
            set_placeholder(&down_panels.title, false);
        });
        canvas.add_event_listener_with_callback("pointerdown", ondown.as_ref().unchecked_ref())?;
        ondown.forget();
    }

    {
        let move_state = state.clone();
        let onmove = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let state = move_state.borrow();
            if !state.is_stroking() {
                return;
            }
            render_stroke(&state, event_point(&event));
        });
        canvas.add_event_listener_with_callback("pointermove", onmove.as_ref().unchecked_ref())?;
        onmove.forget();
    }

    {
        let stop_state = state.clone();
        let onstop = Closure::<dyn FnMut(PointerEvent)>::new(move |_event: PointerEvent| {
            let mut state = stop_state.borrow_mut();
            if state.is_stroking() {
                end_stroke(&mut state);
            }
        });
        canvas.add_event_listener_with_callback("pointerup", onstop.as_ref().unchecked_ref())?;
        canvas.add_event_listener_with_callback("pointerout", onstop.as_ref().unchecked_ref())?;
        onstop.forget();
    }

    {
        // One long-lived timer callback; each resize event re-arms it.
        let resize_state = state.clone();
        let resize_panels = panels.clone();
        let resize_fired = Rc::new(Closure::<dyn FnMut()>::new(move || {
            let mut state = resize_state.borrow_mut();
            resize_surface(&resize_panels.document, &mut state, &resize_panels.title);
        }));
        let pending = Rc::new(Cell::new(None::<i32>));
        let window_cb = window.clone();
        let resize_fired_cb = resize_fired.clone();
        let pending_cb = pending.clone();
        let onresize = Closure::<dyn FnMut()>::new(move || {
            if let Some(handle) = pending_cb.take() {
                window_cb.clear_timeout_with_handle(handle);
            }
            if let Ok(handle) = window_cb.set_timeout_with_callback_and_timeout_and_arguments_0(
                (*resize_fired_cb).as_ref().unchecked_ref(),
                RESIZE_DEBOUNCE_MS,
            ) {
                pending_cb.set(Some(handle));
            }
        });
        window.add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
        onresize.forget();
    }

    {
        let key_state = state.clone();
        let key_panels = panels.clone();
        let onkeydown = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            let key = event.key();
            let modifier = event.meta_key() || event.ctrl_key();
            if !modifier {
                if key == "Delete" {
                    if key_state.borrow().selected_entry.is_none() {
                        return;
                    }
                    event.prevent_default();
                    remove_selected(&key_panels, &key_state);
                }
                return;
            }
            if event.shift_key() && key.eq_ignore_ascii_case("z") {
                event.prevent_default();
                apply_redo(&key_panels, &key_state);
                return;
            }
            if key.eq_ignore_ascii_case("z") {
                event.prevent_default();
                apply_undo(&key_panels, &key_state);
                return;
            }
            if key.eq_ignore_ascii_case("y") {
                event.prevent_default();
                apply_redo(&key_panels, &key_state);
            }
        });
        window.add_event_listener_with_callback("keydown", onkeydown.as_ref().unchecked_ref())?;
        onkeydown.forget();
    }

    {
        let generate_state = state.clone();
        let generate_panels = panels.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let data = {
                let mut state = generate_state.borrow_mut();
                if state.busy {
                    return;
                }
                let Ok(data) = to_data_url(&state) else {
                    return;
                };
                state.busy = true;
                data
            };
            begin_generation_ui(&generate_panels);
            let Ok(body) = serde_json::to_string(&PaintifyRequest { data }) else {
                clear_generation_busy(&generate_panels, &generate_state);
                return;
            };
            let Ok(request) = post_json_request(PAINTIFY_URL, &body) else {
                clear_generation_busy(&generate_panels, &generate_state);
                return;
            };
            let done_panels = generate_panels.clone();
            let done_state = generate_state.clone();
            fetch_text(&generate_panels.window, &request, move |status, body| {
                finish_generation(&done_panels, &done_state, status, &body);
            });
        });
        generate_button
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let musify_state = state.clone();
        let musify_panels = panels.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let id = {
                let mut state = musify_state.borrow_mut();
                if state.busy {
                    return;
                }
                let Some(id) = state.selected_entry_id() else {
                    return;
                };
                state.busy = true;
                id
            };
            begin_generation_ui(&musify_panels);
            let Ok(body) = serde_json::to_string(&EntryRequest { id }) else {
                clear_generation_busy(&musify_panels, &musify_state);
                return;
            };
            let Ok(request) = post_json_request(MUSIFY_URL, &body) else {
                clear_generation_busy(&musify_panels, &musify_state);
                return;
            };
            let done_panels = musify_panels.clone();
            let done_state = musify_state.clone();
            fetch_text(&musify_panels.window, &request, move |status, body| {
                finish_generation(&done_panels, &done_state, status, &body);
            });
        });
        musify_button
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let remove_state = state.clone();
        let remove_panels = panels.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            remove_selected(&remove_panels, &remove_state);
        });
        remove_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let redraw_state = state.clone();
        let redraw_panels = panels.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let Some(id) = redraw_state.borrow().selected_entry_id() else {
                return;
            };
            let Ok(image) = HtmlImageElement::new() else {
                return;
            };
            let image_cb = image.clone();
            let load_panels = redraw_panels.clone();
            let load_state = redraw_state.clone();
            let onload = Closure::once(move |_event: JsValue| {
                let state = load_state.borrow();
                let _ = draw_image_fitted(&state, &image_cb);
                set_placeholder(&load_panels.title, false);
            });
            image.set_onload(Some(onload.as_ref().unchecked_ref()));
            onload.forget();
            image.set_src(&entry_image_url(&id));
        });
        redraw_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let board_state = state.clone();
        let board_panels = panels.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(index) = gallery_index_from_event(&event) else {
                return;
            };
            let mut state = board_state.borrow_mut();
            if index >= state.entries.len() {
                return;
            }
            state.selected_entry = Some(index);
            render_gallery(
                &board_panels.document,
                &board_panels.board_el,
                &state.entries,
                state.selected_entry,
            );
            set_entry_controls(
                &[
                    &board_panels.remove_button,
                    &board_panels.redraw_button,
                    &board_panels.musify_button,
                ],
                true,
            );
        });
        panels
            .board_el
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    Ok(())
}

fn apply_undo(panels: &Panels, state: &Rc<RefCell<State>>) {
    let mut state = state.borrow_mut();
    if !state.history.can_undo() {
        return;
    }
    let Some(current) = capture_snapshot(&state) else {
        return;
    };
    if let Some(snapshot) = state.history.undo(current) {
        let _ = apply_snapshot(&panels.document, &state, &snapshot);
        set_placeholder(&panels.title, !state.history.can_undo());
    }
}

fn apply_redo(panels: &Panels, state: &Rc<RefCell<State>>) {
    let mut state = state.borrow_mut();
    if !state.history.can_redo() {
        return;
    }
    let Some(current) = capture_snapshot(&state) else {
        return;
    };
    if let Some(snapshot) = state.history.redo(current) {
        let _ = apply_snapshot(&panels.document, &state, &snapshot);
        set_placeholder(&panels.title, false);
    }
}

fn begin_generation_ui(panels: &Panels) {
    set_generate_busy(&panels.generate_button, true);
    set_canvas_dimmed(&panels.canvas, true);
    set_status(
        &panels.status_el,
        &panels.status_text,
        "busy",
        "Generating a song...",
    );
    panels
        .description
        .set_text_content(Some("Listening to your drawing..."));
}

fn clear_generation_busy(panels: &Panels, state: &Rc<RefCell<State>>) {
    state.borrow_mut().busy = false;
    set_generate_busy(&panels.generate_button, false);
    set_canvas_dimmed(&panels.canvas, false);
}

fn finish_generation(panels: &Panels, state: &Rc<RefCell<State>>, status: u16, body: &str) {
    clear_generation_busy(panels, state);
    if (200..300).contains(&status) {
        if let Ok(song) = serde_json::from_str::<SongResponse>(body) {
            panels.music_frame.set_src(&track_embed_url(&song.id));
            panels.description.set_text_content(Some(&song.description));
            set_status(&panels.status_el, &panels.status_text, "ready", "Ready");
            refresh_gallery(panels, state);
            return;
        }
    }
    let description = serde_json::from_str::<ErrorResponse>(body)
        .map(|error| error.description)
        .unwrap_or_else(|_| "The song service is unavailable.".to_string());
    panels
        .description
        .set_text_content(Some("An error occurred :("));
    set_status(
        &panels.status_el,
        &panels.status_text,
        "error",
        "Generation failed",
    );
    show_alert(
        &panels.window,
        &format!("The song service says:\n\n{description}\n\nPlease try again."),
    );
}

fn remove_selected(panels: &Panels, state: &Rc<RefCell<State>>) {
    let Some(id) = state.borrow().selected_entry_id() else {
        return;
    };
    let Ok(body) = serde_json::to_string(&EntryRequest { id }) else {
        return;
    };
    let Ok(request) = post_json_request(REMOVE_URL, &body) else {
        return;
    };
    let done_panels = panels.clone();
    let done_state = state.clone();
    fetch_text(&panels.window, &request, move |_status, _body| {
        refresh_gallery(&done_panels, &done_state);
    });
}

fn refresh_gallery(panels: &Panels, state: &Rc<RefCell<State>>) {
    let Ok(request) = get_request(HISTORY_URL) else {
        return;
    };
    let done_panels = panels.clone();
    let done_state = state.clone();
    fetch_text(&panels.window, &request, move |status, body| {
        let entries = if (200..300).contains(&status) {
            serde_json::from_str::<HistoryResponse>(&body)
                .map(|history| history.entries)
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        let mut state = done_state.borrow_mut();
        state.entries = entries;
        state.selected_entry = None;
        render_gallery(
            &done_panels.document,
            &done_panels.board_el,
            &state.entries,
            None,
        );
        set_entry_controls(
            &[
                &done_panels.remove_button,
                &done_panels.redraw_button,
                &done_panels.musify_button,
            ],
            false,
        );
    });
}
