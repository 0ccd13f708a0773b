// SPDX-License-Identifier: MIT
//
// Coordinator configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Name of the virtual PDF printer installed on every supported host.
pub const DEFAULT_PDF_PRINTER: &str = "Microsoft Print to PDF";

/// Tuning knobs for a print-job coordinator.
///
/// The two deadlines default to `None` for behavioral parity with the
/// unbounded waits of the original integration; setting them converts a
/// stuck external system from a hang into a `Timeout` error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// PDF printer driver to resolve at job start (exact, case-sensitive).
    pub printer_name: String,
    /// Interval between print-queue refreshes while awaiting spool drain.
    pub spool_poll_interval: Duration,
    /// Interval between exclusive-open attempts while awaiting file release.
    pub release_poll_interval: Duration,
    /// Upper bound on the spool-drain wait.  `None` waits indefinitely.
    pub spool_deadline: Option<Duration>,
    /// Upper bound on the file-release wait.  `None` waits indefinitely.
    pub release_deadline: Option<Duration>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            printer_name: DEFAULT_PDF_PRINTER.to_string(),
            spool_poll_interval: Duration::from_millis(100),
            release_poll_interval: Duration::from_millis(10),
            spool_deadline: None,
            release_deadline: None,
        }
    }
}

impl CoordinatorConfig {
    /// Override the PDF printer driver used for all jobs.
    pub fn with_printer(mut self, name: impl Into<String>) -> Self {
        self.printer_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_platform_driver() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.printer_name, DEFAULT_PDF_PRINTER);
        assert_eq!(config.spool_poll_interval, Duration::from_millis(100));
        assert_eq!(config.release_poll_interval, Duration::from_millis(10));
        assert!(config.spool_deadline.is_none());
        assert!(config.release_deadline.is_none());
    }

    #[test]
    fn printer_override() {
        let config = CoordinatorConfig::default().with_printer("CutePDF Writer");
        assert_eq!(config.printer_name, "CutePDF Writer");
    }
}
