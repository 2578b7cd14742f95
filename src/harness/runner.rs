//! Runs the checks in order and keeps the tally, records, and console log

use super::checks::{Check, standard_checks};
use super::error::HarnessError;
use super::record::{Category, CheckOutcome, LogEntry, LogLevel, Tally, TestRecord, TestStatus};
use super::snapshot::DomSnapshot;

/// Where snapshots come from: a popup window, a JSON file, a test fixture
pub trait SnapshotSource {
    fn acquire(&mut self) -> Result<DomSnapshot, HarnessError>;
}

/// Hands out a fixed snapshot
#[derive(Debug, Clone)]
pub struct StaticSnapshotSource {
    snapshot: DomSnapshot,
}

impl StaticSnapshotSource {
    pub fn new(snapshot: DomSnapshot) -> Self {
        Self { snapshot }
    }
}

impl SnapshotSource for StaticSnapshotSource {
    fn acquire(&mut self) -> Result<DomSnapshot, HarnessError> {
        Ok(self.snapshot.clone())
    }
}

pub struct Harness {
    checks: Vec<Check>,
    records: Vec<TestRecord>,
    tally: Tally,
    log: Vec<LogEntry>,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    pub fn new() -> Self {
        Self::with_checks(standard_checks())
    }

    pub fn with_checks(checks: Vec<Check>) -> Self {
        let records = checks
            .iter()
            .map(|c| TestRecord::new(c.name, c.category))
            .collect();
        Self {
            checks,
            records,
            tally: Tally::default(),
            log: Vec::new(),
        }
    }

    pub fn records(&self) -> &[TestRecord] {
        &self.records
    }

    pub fn records_in(&self, category: Category) -> impl Iterator<Item = &TestRecord> {
        self.records.iter().filter(move |r| r.category == category)
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn push_log(&mut self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            LogLevel::Error => log::error!("{}", message),
            LogLevel::Info | LogLevel::Success => log::info!("{}", message),
        }
        self.log.push(LogEntry { level, message });
    }

    /// Start a new run: clear counters
    pub fn begin(&mut self) {
        self.tally = Tally::default();
        self.push_log(LogLevel::Info, "Starting comprehensive website testing...");
    }

    /// Run the check at `index` against `doc` and record its outcome
    pub fn run_check(&mut self, index: usize, doc: &DomSnapshot) {
        let Some(check) = self.checks.get(index).copied() else {
            return;
        };
        self.push_log(
            LogLevel::Info,
            format!("Running test {}/{}: {}", index + 1, self.checks.len(), check.name),
        );

        let outcome = match (check.run)(doc) {
            Ok(outcome) => outcome,
            Err(e) => CheckOutcome::fail(format!("Test error: {}", e)),
        };

        let (level, marker) = match outcome.status {
            TestStatus::Pass => (LogLevel::Success, "✅"),
            TestStatus::Fail => (LogLevel::Error, "❌"),
            TestStatus::Warning | TestStatus::Pending => (LogLevel::Info, "⚠️"),
        };
        self.push_log(level, format!("{} {}: {}", marker, check.name, outcome.message));

        self.tally.count(outcome.status);
        self.records[index].apply(outcome);
    }

    /// Summary lines once every check ran
    pub fn finish(&mut self) {
        let t = self.tally;
        self.push_log(
            LogLevel::Success,
            format!(
                "Testing completed! Success rate: {}% ({}/{})",
                t.success_rate(),
                t.passed,
                t.total
            ),
        );
        if t.failed > 0 {
            self.push_log(
                LogLevel::Error,
                format!("{} tests failed - check details above", t.failed),
            );
        }
        if t.warnings > 0 {
            self.push_log(
                LogLevel::Info,
                format!("{} warnings - consider improvements", t.warnings),
            );
        }
    }

    /// The run could not start (no snapshot)
    pub fn abort(&mut self, error: &HarnessError) {
        self.push_log(LogLevel::Error, format!("Testing failed: {}", error));
    }

    /// Run every check against `doc`, calling `observer` after each one
    pub fn run(&mut self, doc: &DomSnapshot, mut observer: impl FnMut(&Harness)) {
        self.begin();
        for index in 0..self.checks.len() {
            self.run_check(index, doc);
            observer(self);
        }
        self.finish();
    }

    /// Acquire a snapshot from `source`, then run. Returns the final tally.
    pub fn run_from(
        &mut self,
        source: &mut impl SnapshotSource,
        observer: impl FnMut(&Harness),
    ) -> Result<Tally, HarnessError> {
        match source.acquire() {
            Ok(doc) => {
                self.run(&doc, observer);
                Ok(self.tally)
            }
            Err(e) => {
                self.abort(&e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::checks::Check;

    fn always_errors(_: &DomSnapshot) -> Result<CheckOutcome, HarnessError> {
        Err(HarnessError::WindowClosed)
    }

    fn always_passes(_: &DomSnapshot) -> Result<CheckOutcome, HarnessError> {
        Ok(CheckOutcome::pass("fine"))
    }

    struct Blocked;

    impl SnapshotSource for Blocked {
        fn acquire(&mut self) -> Result<DomSnapshot, HarnessError> {
            Err(HarnessError::PopupBlocked)
        }
    }

    #[test]
    fn test_erroring_check_recorded_as_fail() {
        let mut h = Harness::with_checks(vec![
            Check::new("Broken", Category::Js, always_errors),
            Check::new("Fine", Category::Js, always_passes),
        ]);
        h.run(&DomSnapshot::default(), |_| {});

        assert_eq!(h.records()[0].status, TestStatus::Fail);
        assert_eq!(h.records()[0].message, "Test error: test window was closed");
        // The failure did not stop the next check
        assert_eq!(h.records()[1].status, TestStatus::Pass);
        assert_eq!(h.tally().failed, 1);
        assert_eq!(h.tally().passed, 1);
    }

    #[test]
    fn test_observer_called_per_check() {
        let mut h = Harness::new();
        let mut calls = 0;
        h.run(&DomSnapshot::default(), |_| calls += 1);
        assert_eq!(calls, h.len());
        assert_eq!(h.tally().total as usize, h.len());
    }

    #[test]
    fn test_acquisition_failure_runs_nothing() {
        let mut h = Harness::new();
        let err = h.run_from(&mut Blocked, |_| {}).unwrap_err();
        assert!(matches!(err, HarnessError::PopupBlocked));
        assert_eq!(h.tally().total, 0);
        assert!(h.records().iter().all(|r| r.status == TestStatus::Pending));
        assert_eq!(
            h.log().last().map(|l| l.message.as_str()),
            Some("Testing failed: Could not open main website. Please allow popups.")
        );
    }

    #[test]
    fn test_rerun_resets_tally() {
        let mut h = Harness::with_checks(vec![Check::new("Fine", Category::Html, always_passes)]);
        h.run(&DomSnapshot::default(), |_| {});
        h.run(&DomSnapshot::default(), |_| {});
        assert_eq!(h.tally().total, 1);
        assert_eq!(h.tally().success_rate(), 100);
    }

    const FULL_PAGE: &str = include_str!("../../fixtures/snapshot.json");

    fn full_page() -> DomSnapshot {
        DomSnapshot::from_json(FULL_PAGE).unwrap()
    }

    #[test]
    fn test_full_page_passes_everything() {
        let mut h = Harness::new();
        let tally = h
            .run_from(&mut StaticSnapshotSource::new(full_page()), |_| {})
            .unwrap();

        let not_passing: Vec<_> = h
            .records()
            .iter()
            .filter(|r| r.status != TestStatus::Pass)
            .map(|r| (r.name.as_str(), r.message.as_str()))
            .collect();
        assert!(not_passing.is_empty(), "{:?}", not_passing);
        assert_eq!(tally.total, 17);
        assert_eq!(tally.success_rate(), 100);
        assert_eq!(
            h.log().last().map(|l| l.message.as_str()),
            Some("Testing completed! Success rate: 100% (17/17)")
        );
    }

    #[test]
    fn test_missing_contact_section() {
        let mut doc = full_page();
        doc.elements.retain(|e| e.id.as_deref() != Some("contact"));

        let mut h = Harness::new();
        let tally = h.run_from(&mut StaticSnapshotSource::new(doc), |_| {}).unwrap();

        let sections = &h.records()[2];
        assert_eq!(sections.name, "Essential Sections");
        assert_eq!(sections.status, TestStatus::Fail);
        assert_eq!(sections.message, "Missing sections: contact");

        // The #contact nav link now dangles
        let links = h.records().iter().find(|r| r.name == "Navigation Links").unwrap();
        assert_eq!(links.status, TestStatus::Fail);
        assert_eq!(links.message, "4/5 navigation links are valid");

        assert_eq!(tally.failed, 2);
        assert_eq!(tally.passed, 15);
        assert!(
            h.log()
                .iter()
                .any(|l| l.message == "2 tests failed - check details above")
        );
    }

    #[test]
    fn test_degraded_page_warns() {
        let mut doc = full_page();
        doc.stylesheet_text = Some(String::from("body { margin: 0; }"));
        doc.root_style.clear();
        doc.nav_toggle_activates = Some(false);

        let mut h = Harness::new();
        let tally = h.run_from(&mut StaticSnapshotSource::new(doc), |_| {}).unwrap();

        assert_eq!(tally.warnings, 3);
        assert_eq!(tally.failed, 0);
        assert_eq!(tally.success_rate(), 82);
        let warned: Vec<_> = h
            .records()
            .iter()
            .filter(|r| r.status == TestStatus::Warning)
            .map(|r| r.category)
            .collect();
        assert_eq!(warned, vec![Category::Js, Category::Js, Category::Responsive]);
    }

    #[test]
    fn test_records_grouped_by_category() {
        let h = Harness::new();
        let counts: Vec<usize> = Category::ALL.iter().map(|c| h.records_in(*c).count()).collect();
        assert_eq!(counts, vec![3, 3, 3, 3, 2, 3]);
    }
}
