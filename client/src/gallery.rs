use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlButtonElement, HtmlElement, HtmlImageElement};

use songsketch_shared::GalleryEntry;

use crate::net::entry_image_url;

/// Rebuild the history board from the gallery listing. Each drawing is a
/// button wrapping its thumbnail; clicks are resolved through
/// `gallery_index_from_event`.
pub fn render_gallery(
    document: &Document,
    board_el: &HtmlElement,
    entries: &[GalleryEntry],
    selected: Option<usize>,
) {
    board_el.set_inner_html("");
    if entries.is_empty() {
        if let Ok(empty) = document.create_element("span") {
            let _ = empty.set_attribute("class", "gallery-empty");
            empty.set_text_content(Some("No drawings yet"));
            let _ = board_el.append_child(&empty);
        }
        return;
    }
    for (index, entry) in entries.iter().enumerate() {
        let Ok(element) = document.create_element("button") else {
            continue;
        };
        let Ok(button) = element.dyn_into::<HtmlButtonElement>() else {
            continue;
        };
        let _ = button.set_attribute("type", "button");
        let _ = button.set_attribute("data-index", &index.to_string());
        let _ = button.set_attribute("aria-label", &entry.description);
        let class_name = if selected == Some(index) {
            "shot selected"
        } else {
            "shot"
        };
        let _ = button.set_attribute("class", class_name);
        if let Ok(image_el) = document.create_element("img") {
            if let Ok(image) = image_el.dyn_into::<HtmlImageElement>() {
                image.set_src(&entry_image_url(&entry.id));
                image.set_alt(&entry.description);
                let _ = button.append_child(&image);
            }
        }
        let _ = board_el.append_child(&button);
    }
}

/// Walk up from the event target to the nearest element carrying an entry
/// index.
pub fn gallery_index_from_event(event: &Event) -> Option<usize> {
    let mut current = event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok());
    while let Some(element) = current {
        if let Some(index) = element.get_attribute("data-index") {
            return index.parse::<usize>().ok();
        }
        current = element.parent_element();
    }
    None
}
