//! Small DOM helpers shared by the page and harness bindings

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlTextAreaElement, Window};

pub fn window() -> Option<Window> {
    web_sys::window()
}

pub fn document() -> Option<Document> {
    window()?.document()
}

pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

pub fn by_id(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

pub fn query(selector: &str) -> Option<Element> {
    document()?.query_selector(selector).ok().flatten()
}

/// Every match of `selector` under `root`, in document order
pub fn query_all_in(root: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        log::warn!("Bad selector: {}", selector);
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn query_all(selector: &str) -> Vec<Element> {
    match document() {
        Some(doc) => query_all_in(&doc, selector),
        None => Vec::new(),
    }
}

pub fn set_style(el: &Element, property: &str, value: &str) {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let _ = html.style().set_property(property, value);
    }
}

pub fn offset_top(el: &Element) -> f64 {
    el.dyn_ref::<HtmlElement>()
        .map(|h| f64::from(h.offset_top()))
        .unwrap_or(0.0)
}

pub fn navbar_height() -> f64 {
    query(".navbar")
        .and_then(|n| n.dyn_into::<HtmlElement>().ok())
        .map(|n| f64::from(n.offset_height()))
        .unwrap_or(0.0)
}

pub fn scroll_y() -> f64 {
    window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0)
}

/// Value of an `<input>` or `<textarea>`
pub fn field_value(el: &Element) -> Option<String> {
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    el.dyn_ref::<HtmlTextAreaElement>().map(|t| t.value())
}

pub fn set_field_value(el: &Element, value: &str) {
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        input.set_value(value);
    } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
        area.set_value(value);
    }
}

/// Create an element with a class and append it to `<body>`
pub fn append_to_body(tag: &str, class: &str) -> Option<Element> {
    let doc = document()?;
    let el = doc.create_element(tag).ok()?;
    if !class.is_empty() {
        el.set_class_name(class);
    }
    doc.body()?.append_child(&el).ok()?;
    Some(el)
}
