//! Snapshot acquisition from a popup window showing the site

use std::collections::BTreeMap;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlElement, HtmlLinkElement, HtmlScriptElement, Response, Window};

use super::dom;
use super::events::sleep;
use crate::harness::{DomSnapshot, ElementSnapshot, HarnessError, STYLE_PROPERTIES, SnapshotSource};
use crate::security::ScriptRef;
use crate::settings::Settings;

/// Give up waiting for the popup after this many polls
const MAX_READY_POLLS: u32 = 300;
/// First readiness poll happens after this delay
const FIRST_POLL_DELAY_MS: u32 = 500;

fn js_error(e: JsValue) -> HarnessError {
    HarnessError::Js(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

/// Popup's document, or an error when it is closed or cross-origin
fn popup_document(popup: &Window) -> Result<Document, HarnessError> {
    if popup.closed().unwrap_or(true) {
        return Err(HarnessError::WindowClosed);
    }
    js_sys::Reflect::get(popup, &JsValue::from_str("document"))
        .map_err(|e| HarnessError::Inaccessible(format!("{:?}", e)))?
        .dyn_into::<Document>()
        .map_err(|_| HarnessError::Inaccessible("document not reachable".into()))
}

fn ready_state(popup: &Window) -> Option<String> {
    let doc = popup_document(popup).ok()?;
    js_sys::Reflect::get(&doc, &JsValue::from_str("readyState"))
        .ok()?
        .as_string()
}

/// The site opened in a second window
pub struct PopupWindowSource {
    popup: Window,
    stylesheet_text: Option<String>,
}

impl PopupWindowSource {
    /// Open the target, wait for it to finish loading, and fetch its stylesheet
    pub async fn open(settings: &Settings) -> Result<Self, HarnessError> {
        let window = dom::window().ok_or_else(|| HarnessError::Js("no window".into()))?;
        let popup = window
            .open_with_url_and_target_and_features(
                &settings.harness_target_url,
                "_blank",
                "width=1200,height=800",
            )
            .map_err(js_error)?
            .ok_or(HarnessError::PopupBlocked)?;

        wait_until_ready(&popup, settings.harness_poll_interval_ms).await?;
        let stylesheet_text = fetch_text(&settings.stylesheet_url()).await;
        if stylesheet_text.is_none() {
            log::warn!("Could not fetch {}", settings.stylesheet_url());
        }

        Ok(Self {
            popup,
            stylesheet_text,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.popup.closed().unwrap_or(true)
    }
}

impl SnapshotSource for PopupWindowSource {
    fn acquire(&mut self) -> Result<DomSnapshot, HarnessError> {
        capture(&self.popup, self.stylesheet_text.clone())
    }
}

/// Poll `readyState` until `complete`, the window closes, or we give up
async fn wait_until_ready(popup: &Window, poll_ms: u32) -> Result<(), HarnessError> {
    sleep(FIRST_POLL_DELAY_MS).await;
    for _ in 0..MAX_READY_POLLS {
        if popup.closed().unwrap_or(true) {
            return Err(HarnessError::WindowClosed);
        }
        if ready_state(popup).as_deref() == Some("complete") {
            return Ok(());
        }
        sleep(poll_ms).await;
    }
    Err(HarnessError::Inaccessible(
        "page did not finish loading. Make sure the server is running.".into(),
    ))
}

async fn fetch_text(url: &str) -> Option<String> {
    let window = dom::window()?;
    let response = JsFuture::from(window.fetch_with_str(url)).await.ok()?;
    let response: Response = response.dyn_into().ok()?;
    if !response.ok() {
        return None;
    }
    JsFuture::from(response.text().ok()?).await.ok()?.as_string()
}

fn computed_style(popup: &Window, el: &Element) -> BTreeMap<String, String> {
    let Ok(Some(style)) = popup.get_computed_style(el) else {
        return BTreeMap::new();
    };
    STYLE_PROPERTIES
        .iter()
        .filter_map(|p| {
            let value = style.get_property_value(p).ok()?;
            Some((p.to_string(), value))
        })
        .collect()
}

fn element_snapshot(popup: &Window, el: &Element) -> ElementSnapshot {
    let id = el.id();
    let attributes = el
        .get_attribute_names()
        .iter()
        .filter_map(|name| name.as_string())
        .map(|name| {
            let value = el.get_attribute(&name).unwrap_or_default();
            (name, value)
        })
        .collect();
    let in_contact_form = id != "contact-form"
        && el.closest("#contact-form").ok().flatten().is_some();

    ElementSnapshot {
        tag: el.tag_name().to_lowercase(),
        id: (!id.is_empty()).then_some(id),
        classes: el.class_name().split_whitespace().map(String::from).collect(),
        attributes,
        computed_style: computed_style(popup, el),
        in_contact_form,
    }
}

/// Click the mobile toggle, see whether the menu opened, then put it back
fn probe_nav_toggle(doc: &Document) -> Option<bool> {
    let toggle = doc
        .query_selector(".nav-toggle")
        .ok()
        .flatten()?
        .dyn_into::<HtmlElement>()
        .ok()?;
    let menu = doc.query_selector(".nav-menu").ok().flatten()?;

    let was_active = menu.class_list().contains("active");
    toggle.click();
    let changed = menu.class_list().contains("active") != was_active;
    if changed {
        toggle.click();
    }
    Some(changed)
}

fn capture(popup: &Window, stylesheet_text: Option<String>) -> Result<DomSnapshot, HarnessError> {
    let doc = popup_document(popup)?;

    let meta_viewport = doc
        .query_selector("meta[name=\"viewport\"]")
        .map_err(js_error)?
        .and_then(|m| m.get_attribute("content"));

    let elements = dom::query_all_in(&doc, "body *")
        .iter()
        .map(|el| element_snapshot(popup, el))
        .collect();

    let stylesheets = dom::query_all_in(&doc, "link[rel=\"stylesheet\"]")
        .into_iter()
        .filter_map(|l| l.dyn_into::<HtmlLinkElement>().ok())
        .map(|l| l.href())
        .collect();

    let scripts = dom::query_all_in(&doc, "script[src]")
        .into_iter()
        .filter_map(|s| s.dyn_into::<HtmlScriptElement>().ok())
        .map(|s| ScriptRef {
            src: s.src(),
            integrity: Some(s.integrity()).filter(|i| !i.is_empty()),
        })
        .collect();

    let root_style = doc
        .document_element()
        .map(|root| computed_style(popup, &root))
        .unwrap_or_default();

    Ok(DomSnapshot {
        has_doctype: doc.doctype().is_some(),
        title: doc.title(),
        meta_viewport,
        elements,
        stylesheets,
        scripts,
        root_style,
        stylesheet_text,
        nav_toggle_activates: probe_nav_toggle(&doc),
    })
}
