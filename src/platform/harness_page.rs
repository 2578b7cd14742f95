//! Harness page bindings: run button, result panels, console log

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement};

use super::dom;
use super::events::{Listener, sleep};
use super::popup::PopupWindowSource;
use crate::harness::{Category, Harness, HarnessError, LogLevel, SnapshotSource, TestRecord};
use crate::settings::Settings;

struct HarnessUi {
    harness: Harness,
    source: Option<PopupWindowSource>,
    rendered_log: usize,
    running: bool,
}

type SharedUi = Rc<RefCell<HarnessUi>>;

pub struct HarnessPage {
    _ui: SharedUi,
    _run_button: Option<Listener>,
}

thread_local! {
    static HARNESS_PAGE: RefCell<Option<HarnessPage>> = const { RefCell::new(None) };
}

pub fn start(settings: Settings) {
    let ui = Rc::new(RefCell::new(HarnessUi {
        harness: Harness::new(),
        source: None,
        rendered_log: 0,
        running: false,
    }));
    render(&ui);

    let run_button = dom::by_id("run-tests").and_then(|button| {
        let ui = ui.clone();
        Listener::new(&button, "click", move |_| {
            wasm_bindgen_futures::spawn_local(run_all(ui.clone(), settings.clone()));
        })
    });
    if run_button.is_none() {
        log::warn!("#run-tests missing, harness can not be started");
    }

    HARNESS_PAGE.with(|p| {
        *p.borrow_mut() = Some(HarnessPage {
            _ui: ui,
            _run_button: run_button,
        })
    });
    log::info!("Harness page ready");
}

fn set_run_button(running: bool) {
    let Some(button) = dom::by_id("run-tests").and_then(|b| b.dyn_into::<HtmlButtonElement>().ok())
    else {
        return;
    };
    button.set_disabled(running);
    if running {
        button.set_inner_html("<span class=\"loading\"></span> Running Tests...");
    } else {
        button.set_text_content(Some("🚀 Run All Tests"));
    }
}

fn fail_run(ui: &SharedUi, error: &HarnessError) {
    ui.borrow_mut().harness.abort(error);
    render(ui);
}

async fn run_all(ui: SharedUi, settings: Settings) {
    if ui.borrow().running {
        return;
    }
    ui.borrow_mut().running = true;
    set_run_button(true);
    ui.borrow_mut().harness.begin();
    render(&ui);

    let needs_window = ui.borrow().source.as_ref().is_none_or(PopupWindowSource::is_closed);
    if needs_window {
        ui.borrow_mut()
            .harness
            .push_log(LogLevel::Info, "Opening main website for testing...");
        render(&ui);
        match PopupWindowSource::open(&settings).await {
            Ok(source) => {
                {
                    let mut u = ui.borrow_mut();
                    u.source = Some(source);
                    u.harness.push_log(LogLevel::Success, "Website opened successfully");
                }
                render(&ui);
                sleep(settings.harness_settle_delay_ms).await;
            }
            Err(e) => {
                fail_run(&ui, &e);
                finish_run(&ui);
                return;
            }
        }
    }

    let snapshot = ui
        .borrow_mut()
        .source
        .as_mut()
        .map(|s| s.acquire())
        .unwrap_or(Err(HarnessError::WindowClosed));

    match snapshot {
        Ok(doc) => {
            let count = ui.borrow().harness.len();
            for index in 0..count {
                ui.borrow_mut().harness.run_check(index, &doc);
                render(&ui);
                sleep(settings.harness_step_delay_ms).await;
            }
            ui.borrow_mut().harness.finish();
            render(&ui);
        }
        Err(e) => fail_run(&ui, &e),
    }

    finish_run(&ui);
}

fn finish_run(ui: &SharedUi) {
    ui.borrow_mut().running = false;
    set_run_button(false);
}

fn render(ui: &SharedUi) {
    let Some(doc) = dom::document() else {
        return;
    };
    let mut u = ui.borrow_mut();

    let tally = u.harness.tally();
    for (id, value) in [
        ("passed-count", tally.passed),
        ("failed-count", tally.failed),
        ("warning-count", tally.warnings),
        ("total-count", tally.total),
    ] {
        if let Some(el) = doc.get_element_by_id(id) {
            el.set_text_content(Some(&value.to_string()));
        }
    }

    for category in Category::ALL {
        let Some(container) = doc.get_element_by_id(&category.container_id()) else {
            continue;
        };
        container.set_inner_html("");
        for record in u.harness.records_in(category) {
            if let Some(item) = test_item(&doc, record) {
                let _ = container.append_child(&item);
            }
        }
    }

    if let Some(console) = doc.get_element_by_id("console-log") {
        let time = js_sys::Date::new_0().to_locale_time_string("en-US");
        for entry in &u.harness.log()[u.rendered_log..] {
            let Ok(line) = doc.create_element("div") else {
                continue;
            };
            line.set_class_name(entry.level.css_class());
            line.set_text_content(Some(&format!("[{}] {}", String::from(time.clone()), entry.message)));
            let _ = console.append_child(&line);
        }
        console.set_scroll_top(console.scroll_height());
    }
    u.rendered_log = u.harness.log().len();
}

fn test_item(doc: &Document, record: &TestRecord) -> Option<Element> {
    let item = doc.create_element("div").ok()?;
    item.set_class_name("test-item");

    let text = doc.create_element("div").ok()?;
    let name = doc.create_element("div").ok()?;
    name.set_class_name("test-name");
    name.set_text_content(Some(&record.name));
    text.append_child(&name).ok()?;
    if !record.message.is_empty() {
        let details = doc.create_element("div").ok()?;
        details.set_class_name("test-details");
        details.set_text_content(Some(&record.message));
        text.append_child(&details).ok()?;
    }

    let status = doc.create_element("div").ok()?;
    match record.status.css_class() {
        "" => status.set_class_name("test-status"),
        class => status.set_class_name(&format!("test-status {}", class)),
    }
    status.set_text_content(Some(record.status.label()));

    item.append_child(&text).ok()?;
    item.append_child(&status).ok()?;
    Some(item)
}
