//! Portfolio page bindings
//!
//! Wires DOM events to the pure handlers in `nav`, `form`, and `security`.
//! All subscriptions live in [`Page`] and detach when it is dropped.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Element, Event, FormData, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, MouseEvent,
    MutationObserver, MutationObserverInit, MutationRecord, ScrollBehavior, ScrollToOptions,
};

use super::dom::{self, now_ms};
use super::events::{Interval, Listener, set_timeout};
use super::storage::SessionStorageStore;
use crate::consts::{PASTE_SANITIZE_DELAY_MS, RATE_WINDOW_MS, SUBMIT_DELAY_MS};
use crate::form::{self, ContactSubmission, SubmitButtonState, SubmitEnv};
use crate::nav::{self, NavToggle};
use crate::notify::{Notification, SecurityWarning};
use crate::security::{self, SessionState};
use crate::settings::Settings;

struct PageState {
    session: SessionState<SessionStorageStore>,
    toggle: NavToggle,
}

type Shared = Rc<RefCell<PageState>>;

/// Observer handle that disconnects on drop
struct RevealObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl Drop for RevealObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

struct InjectionWatch {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
}

impl Drop for InjectionWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Everything the page keeps alive
pub struct Page {
    _state: Shared,
    _listeners: Vec<Listener>,
    _reveal: Option<RevealObserver>,
    _injection_watch: Option<InjectionWatch>,
    _rate_reset: Option<Interval>,
}

thread_local! {
    static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
}

/// Install every page behavior. Safe to call more than once; the previous
/// installation is torn down first.
pub fn start(settings: &Settings) {
    PAGE.with(|p| p.borrow_mut().take());
    let page = Page::install(settings);
    PAGE.with(|p| *p.borrow_mut() = Some(page));
    log::info!("Page behaviors installed");
}

impl Page {
    fn install(settings: &Settings) -> Self {
        let now = now_ms();
        let state = Rc::new(RefCell::new(PageState {
            session: SessionState::new(SessionStorageStore::open(), rand::random(), now),
            toggle: NavToggle::default(),
        }));

        let mut listeners = Vec::new();

        stamp_token(&state);
        let rate_reset = {
            let state = state.clone();
            Interval::new(RATE_WINDOW_MS as u32, move || {
                state.borrow_mut().session.rate_limiter.reset(now_ms());
            })
        };
        check_script_integrity();
        let injection_watch = watch_script_injection();
        listeners.extend(init_input_sanitization());
        log::info!("Security suite initialized");

        if settings.enforce_https && enforce_https() {
            // Navigating away; nothing else to wire
            return Self {
                _state: state,
                _listeners: listeners,
                _reveal: None,
                _injection_watch: injection_watch,
                _rate_reset: rate_reset,
            };
        }

        listeners.extend(init_navigation(&state));
        let reveal = init_scroll_animations();
        listeners.extend(init_contact_form(&state));
        listeners.extend(init_smooth_scrolling());
        listeners.extend(init_scroll_indicator());
        report_security_context();

        if settings.scroll_progress {
            listeners.extend(init_scroll_progress());
        }
        if settings.parallax {
            listeners.extend(init_parallax());
        }
        if settings.button_hover {
            listeners.extend(init_button_hover());
        }
        if settings.typing_effect {
            start_typing_effect();
        }
        listeners.extend(init_load_entrance());

        Self {
            _state: state,
            _listeners: listeners,
            _reveal: reveal,
            _injection_watch: injection_watch,
            _rate_reset: rate_reset,
        }
    }
}

// === Security ===

fn stamp_token(state: &Shared) {
    let token = state.borrow_mut().session.issue_token(now_ms());
    write_token_field(&token);
}

fn write_token_field(token: &str) {
    if let Some(input) = dom::by_id("csrf-token").and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
    {
        input.set_value(token);
    }
}

fn check_script_integrity() {
    let scripts: Vec<security::ScriptRef> = dom::query_all("script[src]")
        .iter()
        .map(|s| security::ScriptRef {
            src: s.get_attribute("src").unwrap_or_default(),
            integrity: s.get_attribute("integrity"),
        })
        .collect();
    for src in security::unverified_cdn_scripts(&scripts) {
        log::warn!("External script without integrity check: {}", src);
    }
}

fn watch_script_injection() -> Option<InjectionWatch> {
    let body = dom::document()?.body()?;
    let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
        move |records: js_sys::Array, _observer: MutationObserver| {
            for record in records.iter() {
                let Ok(record) = record.dyn_into::<MutationRecord>() else {
                    continue;
                };
                if record.type_() != "childList" {
                    continue;
                }
                let added = record.added_nodes();
                for i in 0..added.length() {
                    if let Some(el) = added.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                        if el.tag_name() == "SCRIPT" {
                            log::warn!(
                                "Script injection detected: {}",
                                el.get_attribute("src").unwrap_or_else(|| "<inline>".into())
                            );
                        }
                    }
                }
            }
        },
    );
    let observer = MutationObserver::new(callback.as_ref().unchecked_ref()).ok()?;
    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    observer.observe_with_options(&body, &init).ok()?;
    log::info!("Content integrity monitoring active");
    Some(InjectionWatch {
        observer,
        _callback: callback,
    })
}

fn sanitize_field(el: &Element) {
    let Some(value) = dom::field_value(el) else {
        return;
    };
    let cleaned = security::sanitize(&value);
    if cleaned != value.as_str() {
        dom::set_field_value(el, &cleaned);
        log::warn!("Potentially malicious input sanitized");
        show_security_warning(&SecurityWarning::new("Input was sanitized for security reasons"));
    }
}

fn init_input_sanitization() -> Vec<Listener> {
    let mut listeners = Vec::new();
    for field in dom::query_all("input, textarea") {
        let on_input = {
            let field = field.clone();
            Listener::new(&field.clone(), "input", move |_| sanitize_field(&field))
        };
        let on_paste = {
            let field = field.clone();
            Listener::new(&field.clone(), "paste", move |_| {
                let field = field.clone();
                set_timeout(PASTE_SANITIZE_DELAY_MS, move || sanitize_field(&field));
            })
        };
        listeners.extend(on_input);
        listeners.extend(on_paste);
    }
    log::info!("Input sanitization initialized");
    listeners
}

fn show_security_warning(warning: &SecurityWarning) {
    let Some(el) = dom::append_to_body("div", SecurityWarning::CLASS_NAME) else {
        return;
    };
    let _ = el.set_attribute("style", SecurityWarning::STYLE);
    el.set_text_content(Some(&warning.text()));
    set_timeout(warning.lifetime_ms(), move || el.remove());
}

/// Returns true when a redirect to https was issued
fn enforce_https() -> bool {
    let Some(location) = dom::window().map(|w| w.location()) else {
        return false;
    };
    let protocol = location.protocol().unwrap_or_default();
    let hostname = location.hostname().unwrap_or_default();
    let href = location.href().unwrap_or_default();

    if let Some(target) = security::https_redirect(&protocol, &hostname, &href) {
        log::info!("Redirecting to HTTPS");
        let _ = location.replace(&target);
        return true;
    }
    if protocol == "https:" {
        log::info!("Secure connection established ({})", location.host().unwrap_or_default());
        add_secure_badge();
    }
    false
}

fn add_secure_badge() {
    if dom::query(".ssl-badge").is_some() {
        return;
    }
    let (Some(doc), Some(container)) = (dom::document(), dom::query(".navbar .nav-container")) else {
        return;
    };
    let Ok(badge) = doc.create_element("div") else {
        return;
    };
    badge.set_class_name("ssl-badge");
    badge.set_inner_html("<i class=\"fas fa-lock\"></i> Secure");
    let _ = badge.set_attribute(
        "style",
        "display: flex; align-items: center; gap: 5px; background: #10b981; color: white; \
         padding: 5px 10px; border-radius: 15px; font-size: 0.8rem; font-weight: 600;",
    );
    let _ = container.append_child(&badge);
}

fn report_security_context() {
    let Some(window) = dom::window() else {
        return;
    };
    let protocol = window.location().protocol().unwrap_or_default();
    if let Some(perf) = window.performance() {
        for entry in perf.get_entries_by_type("resource").iter() {
            if let Ok(entry) = entry.dyn_into::<web_sys::PerformanceEntry>() {
                if security::is_mixed_content(&entry.name(), &protocol) {
                    log::warn!("Mixed content detected: {}", entry.name());
                }
            }
        }
    }
    if window.is_secure_context() {
        log::info!("Running in secure context");
    } else {
        log::warn!("Not running in secure context");
    }
}

// === Navigation ===

fn apply_toggle(toggle: &NavToggle) {
    if let Some(menu) = dom::by_id("nav-menu") {
        let classes = menu.class_list();
        if toggle.menu_active() {
            let _ = classes.add_1(NavToggle::MENU_ACTIVE_CLASS);
        } else {
            let _ = classes.remove_1(NavToggle::MENU_ACTIVE_CLASS);
        }
    }
    if let Some(icon) = dom::query("#nav-toggle i") {
        let classes = icon.class_list();
        let _ = classes.remove_1(toggle.stale_icon_class());
        let _ = classes.add_1(toggle.icon_class());
    }
}

fn highlight_active_link() {
    let sections: Vec<(String, f64)> = dom::query_all("section[id]")
        .iter()
        .map(|s| (s.id(), dom::offset_top(s)))
        .collect();
    let borrowed: Vec<(&str, f64)> = sections.iter().map(|(id, top)| (id.as_str(), *top)).collect();
    let current = nav::active_section(&borrowed, dom::scroll_y());

    for link in dom::query_all(".nav-link") {
        let classes = link.class_list();
        let _ = classes.remove_1("active");
        if nav::link_is_active(&link.get_attribute("href").unwrap_or_default(), current) {
            let _ = classes.add_1("active");
        }
    }
}

fn init_navigation(state: &Shared) -> Vec<Listener> {
    let mut listeners = Vec::new();

    let Some(toggle_el) = dom::by_id("nav-toggle") else {
        log::warn!("#nav-toggle missing, skipping navigation setup");
        return listeners;
    };

    {
        let state = state.clone();
        listeners.extend(Listener::new(&toggle_el, "click", move |_| {
            let open = dom::by_id("nav-menu")
                .map(|m| m.class_list().contains(NavToggle::MENU_ACTIVE_CLASS))
                .unwrap_or(false);
            let mut s = state.borrow_mut();
            s.toggle.set_open(open);
            s.toggle.toggle();
            apply_toggle(&s.toggle);
        }));
    }

    for link in dom::query_all(".nav-link") {
        let state = state.clone();
        listeners.extend(Listener::new(&link, "click", move |_| {
            let mut s = state.borrow_mut();
            s.toggle.close();
            apply_toggle(&s.toggle);
        }));
    }

    if let Some(window) = dom::window() {
        listeners.extend(Listener::new(&window, "scroll", move |_| {
            if let Some(navbar) = dom::query(".navbar") {
                let style = nav::navbar_style(dom::scroll_y());
                dom::set_style(&navbar, "background", style.background);
                dom::set_style(&navbar, "box-shadow", style.box_shadow);
            }
            highlight_active_link();
        }));
    }

    listeners
}

fn init_scroll_animations() -> Option<RevealObserver> {
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, _observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if entry.is_intersecting() {
                    let _ = entry.target().class_list().add_1(nav::REVEAL_SHOWN_CLASS);
                }
            }
        },
    );

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(nav::REVEAL_THRESHOLD));
    init.set_root_margin(nav::REVEAL_ROOT_MARGIN);
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init).ok()?;

    for el in dom::query_all(nav::REVEAL_SELECTOR) {
        let _ = el.class_list().add_1(nav::REVEAL_HIDDEN_CLASS);
        observer.observe(&el);
    }

    for selector in nav::STAGGERED_SELECTORS {
        for (index, el) in dom::query_all(selector).iter().enumerate() {
            dom::set_style(el, "animation-delay", &nav::stagger_delay(index));
        }
    }

    Some(RevealObserver {
        observer,
        _callback: callback,
    })
}

fn scroll_to_section(id: &str) -> bool {
    let (Some(window), Some(section)) = (dom::window(), dom::by_id(id)) else {
        return false;
    };
    let options = ScrollToOptions::new();
    options.set_top(nav::scroll_target(dom::offset_top(&section), dom::navbar_height()));
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
    true
}

fn init_smooth_scrolling() -> Vec<Listener> {
    dom::query_all(".nav-link, .btn[href^=\"#\"]")
        .into_iter()
        .filter_map(|link| {
            let href = link.get_attribute("href").unwrap_or_default();
            Listener::new(&link, "click", move |event: Event| {
                if !href.starts_with('#') {
                    return;
                }
                event.prevent_default();
                if let Some(id) = nav::anchor_target(&href) {
                    scroll_to_section(id);
                }
            })
        })
        .collect()
}

fn init_scroll_indicator() -> Vec<Listener> {
    let mut listeners = Vec::new();
    let Some(indicator) = dom::query(".scroll-indicator") else {
        return listeners;
    };

    listeners.extend(Listener::new(&indicator, "click", move |_| {
        scroll_to_section("about");
    }));

    if let Some(window) = dom::window() {
        listeners.extend(Listener::new(&window, "scroll", move |_| {
            dom::set_style(
                &indicator,
                "opacity",
                nav::scroll_indicator_opacity(dom::scroll_y()),
            );
        }));
    }
    listeners
}

// === Contact form ===

fn form_field(data: &FormData, name: &str) -> String {
    data.get(name).as_string().unwrap_or_default()
}

fn set_submit_button(form: &HtmlFormElement, state: SubmitButtonState) {
    let Ok(Some(button)) = form.query_selector("button[type=\"submit\"]") else {
        return;
    };
    if let Ok(Some(text)) = button.query_selector(".btn-text") {
        dom::set_style(&text, "display", if state.text_visible { "inline" } else { "none" });
    }
    if let Ok(Some(loader)) = button.query_selector(".btn-loader") {
        dom::set_style(&loader, "display", if state.loader_visible { "inline" } else { "none" });
    }
    if let Some(button) = button.dyn_ref::<HtmlButtonElement>() {
        button.set_disabled(state.disabled);
    }
}

fn submit_env() -> SubmitEnv {
    let Some(window) = dom::window() else {
        return SubmitEnv::default();
    };
    let dimension = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    if security::devtools_open(
        dimension(window.outer_width()),
        dimension(window.inner_width()),
        dimension(window.outer_height()),
        dimension(window.inner_height()),
    ) {
        log::debug!("Developer tools appear to be open");
    }
    SubmitEnv {
        secure_context: window.is_secure_context(),
    }
}

fn init_contact_form(state: &Shared) -> Vec<Listener> {
    let Some(form_el) = dom::by_id("contact-form").and_then(|f| f.dyn_into::<HtmlFormElement>().ok())
    else {
        log::warn!("#contact-form missing, skipping form setup");
        return Vec::new();
    };

    let state = state.clone();
    let form_for_handler = form_el.clone();
    Listener::new(&form_el, "submit", move |event: Event| {
        event.prevent_default();
        let form_el = &form_for_handler;

        let Ok(data) = FormData::new_with_form(form_el) else {
            return;
        };
        let submission = ContactSubmission {
            name: form_field(&data, "name"),
            email: form_field(&data, "email"),
            message: form_field(&data, "message"),
            website: form_field(&data, "website"),
            csrf_token: data.get("csrf_token").as_string(),
        };

        let result = {
            let mut s = state.borrow_mut();
            form::evaluate(&mut s.session, &submission, &submit_env(), now_ms())
        };

        match result {
            Err(rejected) => {
                write_token_field(&rejected.token);
                show_notification(&rejected.reason.notification());
            }
            Ok(accepted) => {
                set_submit_button(form_el, SubmitButtonState::busy());
                let state = state.clone();
                let form_el = form_el.clone();
                set_timeout(SUBMIT_DELAY_MS, move || {
                    set_submit_button(&form_el, SubmitButtonState::idle());
                    form_el.reset();
                    let done = accepted.complete(&mut state.borrow_mut().session, now_ms());
                    write_token_field(&done.token);
                    show_notification(&done.notification);
                });
            }
        }
    })
    .into_iter()
    .collect()
}

fn slide_out_and_remove(el: Element) {
    dom::set_style(&el, "transform", "translateX(100%)");
    set_timeout(300, move || el.remove());
}

/// Show a toast, replacing any that is already up
pub fn show_notification(notification: &Notification) {
    if let Some(existing) = dom::query(".notification") {
        existing.remove();
    }
    let Some(doc) = dom::document() else {
        return;
    };
    let Some(el) = dom::append_to_body("div", &notification.class_name()) else {
        return;
    };
    let _ = el.set_attribute("style", &notification.style());

    if let (Ok(content), Ok(message), Ok(close)) = (
        doc.create_element("div"),
        doc.create_element("span"),
        doc.create_element("button"),
    ) {
        content.set_class_name("notification-content");
        message.set_class_name("notification-message");
        message.set_text_content(Some(&notification.message));
        close.set_class_name("notification-close");
        close.set_text_content(Some("×"));
        let _ = content.append_child(&message);
        let _ = content.append_child(&close);
        let _ = el.append_child(&content);

        let target = el.clone();
        let on_close = Closure::once_into_js(move || slide_out_and_remove(target));
        let _ = close.add_event_listener_with_callback("click", on_close.unchecked_ref());
    }

    {
        let el = el.clone();
        set_timeout(100, move || dom::set_style(&el, "transform", "translateX(0)"));
    }
    set_timeout(notification.lifetime_ms(), move || {
        if el.parent_node().is_some() {
            slide_out_and_remove(el);
        }
    });
}

// === Cosmetic extras ===

fn init_scroll_progress() -> Vec<Listener> {
    let Some(bar) = dom::append_to_body("div", "scroll-progress") else {
        return Vec::new();
    };
    let _ = bar.set_attribute(
        "style",
        "position: fixed; top: 0; left: 0; width: 0%; height: 3px; \
         background: linear-gradient(90deg, #6366f1, #8b5cf6); z-index: 10001; transition: width 0.3s ease;",
    );
    let Some(window) = dom::window() else {
        return Vec::new();
    };
    Listener::new(&window, "scroll", move |_| {
        let Some(root) = dom::document().and_then(|d| d.document_element()) else {
            return;
        };
        let percent = nav::scroll_progress_percent(
            f64::from(root.scroll_top()),
            f64::from(root.scroll_height()),
            f64::from(root.client_height()),
        );
        dom::set_style(&bar, "width", &format!("{}%", percent));
    })
    .into_iter()
    .collect()
}

fn init_parallax() -> Vec<Listener> {
    let Some(hero) = dom::query(".hero") else {
        return Vec::new();
    };
    let mut listeners = Vec::new();
    listeners.extend(Listener::new(&hero, "mousemove", move |event: Event| {
        let (Some(event), Some(window), Some(avatar)) = (
            event.dyn_ref::<MouseEvent>(),
            dom::window(),
            dom::query(".hero-avatar"),
        ) else {
            return;
        };
        let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let (dx, dy) = nav::parallax_offset(
            f64::from(event.client_x()),
            f64::from(event.client_y()),
            width,
            height,
        );
        dom::set_style(&avatar, "transform", &format!("translate({}px, {}px)", dx, dy));
    }));
    listeners.extend(Listener::new(&hero, "mouseleave", move |_| {
        if let Some(avatar) = dom::query(".hero-avatar") {
            dom::set_style(&avatar, "transform", "translate(0, 0)");
        }
    }));
    listeners
}

fn init_button_hover() -> Vec<Listener> {
    let mut listeners = Vec::new();
    for button in dom::query_all(".btn") {
        let lift = button.clone();
        listeners.extend(Listener::new(&button, "mouseenter", move |_| {
            dom::set_style(&lift, "transform", "translateY(-2px)");
        }));
        let settle = button.clone();
        listeners.extend(Listener::new(&button, "mouseleave", move |_| {
            dom::set_style(&settle, "transform", "translateY(0)");
        }));
    }
    listeners
}

fn start_typing_effect() {
    let Some(title) = dom::query(".hero-title") else {
        return;
    };
    let text = title.text_content().unwrap_or_default();
    title.set_text_content(Some(""));
    let steps: Vec<String> = nav::TypingEffect::new(text).collect();
    for (i, step) in steps.into_iter().enumerate() {
        let title = title.clone();
        let delay = nav::TypingEffect::START_DELAY_MS + nav::TypingEffect::STEP_MS * i as u32;
        set_timeout(delay, move || title.set_text_content(Some(&step)));
    }
}

fn init_load_entrance() -> Vec<Listener> {
    let Some(window) = dom::window() else {
        return Vec::new();
    };
    Listener::new(&window, "load", move |_| {
        if let Some(body) = dom::document().and_then(|d| d.body()) {
            let _ = body.class_list().add_1("loaded");
        }
        let Some(hero) = dom::query(".hero-content").and_then(|h| h.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        dom::set_style(&hero, "opacity", "0");
        dom::set_style(&hero, "transform", "translateY(50px)");
        set_timeout(300, move || {
            dom::set_style(&hero, "transition", "all 1s ease");
            dom::set_style(&hero, "opacity", "1");
            dom::set_style(&hero, "transform", "translateY(0)");
        });
    })
    .into_iter()
    .collect()
}
