use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Headers, Request, RequestInit, Response, Window};

pub const PAINTIFY_URL: &str = "/paintify";
pub const REMOVE_URL: &str = "/remove";
pub const MUSIFY_URL: &str = "/musify";
pub const HISTORY_URL: &str = "/history";

pub fn entry_image_url(id: &str) -> String {
    format!("/history/{id}.png")
}

pub fn track_embed_url(track_id: &str) -> String {
    format!("https://open.spotify.com/embed/track/{track_id}?utm_source=generator")
}

pub fn post_json_request(url: &str, body: &str) -> Result<Request, JsValue> {
    let init = RequestInit::new();
    init.set_method("POST");
    let headers = Headers::new()?;
    headers.set("Content-Type", "application/json")?;
    init.set_headers(headers.as_ref());
    init.set_body(&JsValue::from_str(body));
    Request::new_with_str_and_init(url, &init)
}

pub fn get_request(url: &str) -> Result<Request, JsValue> {
    Request::new_with_str_and_init(url, &RequestInit::new())
}

/// Fire a request and hand `(status, body)` to `on_done` when the response
/// body has been read. Network-level failures report status 0 with an empty
/// body; HTTP error statuses pass through with whatever body the server
/// sent.
pub fn fetch_text(window: &Window, request: &Request, on_done: impl FnOnce(u16, String) + 'static) {
    let on_done: Rc<RefCell<Option<Box<dyn FnOnce(u16, String)>>>> =
        Rc::new(RefCell::new(Some(Box::new(on_done))));

    let promise: js_sys::Promise = window.fetch_with_request(request);

    let response_done = on_done.clone();
    let on_response = Closure::once(move |value: JsValue| {
        let Ok(response) = value.dyn_into::<Response>() else {
            if let Some(done) = response_done.borrow_mut().take() {
                done(0, String::new());
            }
            return;
        };
        let status = response.status();
        let Ok(text_promise) = response.text() else {
            if let Some(done) = response_done.borrow_mut().take() {
                done(status, String::new());
            }
            return;
        };

        let text_done = response_done.clone();
        let on_text = Closure::once(move |text: JsValue| {
            let body = text.as_string().unwrap_or_default();
            if let Some(done) = text_done.borrow_mut().take() {
                done(status, body);
            }
        });
        let text_err_done = response_done.clone();
        let on_text_err = Closure::once(move |_err: JsValue| {
            if let Some(done) = text_err_done.borrow_mut().take() {
                done(status, String::new());
            }
        });
        let _ = text_promise.then2(&on_text, &on_text_err);
        on_text.forget();
        on_text_err.forget();
    });

    let error_done = on_done.clone();
    let on_error = Closure::once(move |_err: JsValue| {
        if let Some(done) = error_done.borrow_mut().take() {
            done(0, String::new());
        }
    });

    let _ = promise.then2(&on_response, &on_error);
    on_response.forget();
    on_error.forget();
}
