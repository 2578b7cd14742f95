//! Folio Site entry point
//!
//! In the browser, installs either the page behaviors or the smoke-test
//! harness depending on which page loaded the module. Natively, runs the
//! harness checks against a JSON DOM snapshot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_site {
    use folio_site::Settings;
    use folio_site::platform::{dom, harness_page, page};

    pub fn run() {
        console_error_panic_hook::set_once();
        // Already set if the module was started twice
        let _ = console_log::init_with_level(log::Level::Info);

        let settings = Settings::load();

        // The harness page is the one with a run button
        if dom::by_id("run-tests").is_some() {
            log::info!("Folio Site harness starting...");
            harness_page::start(settings);
        } else {
            log::info!("Folio Site page starting...");
            page::start(&settings);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_site::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "snapshot.json".to_string());

    match native::run(&path) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use folio_site::harness::{
        Category, DomSnapshot, Harness, HarnessError, StaticSnapshotSource,
    };

    /// Run every check against the snapshot at `path`.
    /// Returns whether nothing failed.
    pub fn run(path: &str) -> Result<bool, HarnessError> {
        log::info!("Loading snapshot from {}", path);
        let json = std::fs::read_to_string(path)?;
        let mut source = StaticSnapshotSource::new(DomSnapshot::from_json(&json)?);

        let mut harness = Harness::new();
        let tally = harness.run_from(&mut source, |_| {})?;

        for entry in harness.log() {
            println!("{}", entry.message);
        }
        println!();
        for category in Category::ALL {
            println!("[{}]", category.as_str());
            for record in harness.records_in(category) {
                println!("  {:<8} {} - {}", record.status.label(), record.name, record.message);
            }
        }
        println!(
            "\npassed {} / failed {} / warnings {} / total {}",
            tally.passed, tally.failed, tally.warnings, tally.total
        );

        Ok(tally.failed == 0)
    }
}
