//! Test records, outcomes, and the running tally

use serde::{Deserialize, Serialize};

/// Result panel a check is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Html,
    Css,
    Js,
    Responsive,
    Navigation,
    Form,
}

impl Category {
    /// Display order of the result panels
    pub const ALL: [Category; 6] = [
        Category::Html,
        Category::Css,
        Category::Js,
        Category::Responsive,
        Category::Navigation,
        Category::Form,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Html => "html",
            Category::Css => "css",
            Category::Js => "js",
            Category::Responsive => "responsive",
            Category::Navigation => "navigation",
            Category::Form => "form",
        }
    }

    /// Id of the result container element for this category
    pub fn container_id(&self) -> String {
        format!("{}-tests", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    #[default]
    Pending,
    Pass,
    Fail,
    Warning,
}

impl TestStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TestStatus::Pending => "PENDING",
            TestStatus::Pass => "PASS",
            TestStatus::Fail => "FAIL",
            TestStatus::Warning => "WARN",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            TestStatus::Pending => "",
            TestStatus::Pass => "status-pass",
            TestStatus::Fail => "status-fail",
            TestStatus::Warning => "status-warning",
        }
    }
}

/// What a single check decided
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub status: TestStatus,
    pub message: String,
}

impl CheckOutcome {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            status: TestStatus::Pass,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: TestStatus::Fail,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            status: TestStatus::Warning,
            message: message.into(),
        }
    }
}

/// One row in the results panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRecord {
    pub name: String,
    pub category: Category,
    pub status: TestStatus,
    pub message: String,
}

impl TestRecord {
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
            status: TestStatus::Pending,
            message: String::new(),
        }
    }

    pub fn apply(&mut self, outcome: CheckOutcome) {
        self.status = outcome.status;
        self.message = outcome.message;
    }
}

/// Pass/fail/warning counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub passed: u32,
    pub failed: u32,
    pub warnings: u32,
    pub total: u32,
}

impl Tally {
    pub fn count(&mut self, status: TestStatus) {
        match status {
            TestStatus::Pass => self.passed += 1,
            TestStatus::Fail => self.failed += 1,
            TestStatus::Warning => self.warnings += 1,
            TestStatus::Pending => return,
        }
        self.total += 1;
    }

    /// Rounded pass percentage; 0 before anything ran
    pub fn success_rate(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((f64::from(self.passed) / f64::from(self.total)) * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Error,
}

impl LogLevel {
    pub fn css_class(&self) -> &'static str {
        match self {
            LogLevel::Info => "log-entry log-info",
            LogLevel::Success => "log-entry log-success",
            LogLevel::Error => "log-entry log-error",
        }
    }
}

/// A line in the harness console panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_counts_and_rate() {
        let mut t = Tally::default();
        assert_eq!(t.success_rate(), 0);
        t.count(TestStatus::Pass);
        t.count(TestStatus::Pass);
        t.count(TestStatus::Fail);
        t.count(TestStatus::Pending);
        assert_eq!(t.total, 3);
        assert_eq!(t.success_rate(), 67);
    }

    #[test]
    fn test_status_presentation() {
        assert_eq!(TestStatus::Warning.label(), "WARN");
        assert_eq!(TestStatus::Pending.css_class(), "");
        assert_eq!(Category::Responsive.container_id(), "responsive-tests");
    }
}
