// SPDX-License-Identifier: MIT
//
// File-release probe: blocks until the output file can be opened exclusively
// for read-write.
//
// Neither the engine nor the spooler reports "file fully flushed", so
// readiness is inferred: if an exclusive open succeeds, no other process
// (in particular the spooler's writer) still holds the file open.  Each
// attempt is a full open/close cycle; the handle is dropped immediately, its
// acquisition being the only evidence needed.

use std::fs::OpenOptions;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, instrument, trace};

use spoolsync_core::config::CoordinatorConfig;
use spoolsync_core::error::{PrintError, Result};

/// Polls a path until an exclusive read-write open succeeds.
pub struct FileReadinessProbe {
    poll_interval: Duration,
    deadline: Option<Duration>,
}

impl FileReadinessProbe {
    pub fn new(poll_interval: Duration, deadline: Option<Duration>) -> Self {
        Self {
            poll_interval,
            deadline,
        }
    }

    pub fn from_config(config: &CoordinatorConfig) -> Self {
        Self::new(config.release_poll_interval, config.release_deadline)
    }

    /// Block until `path` is exclusively openable.
    ///
    /// Presumes the file already exists: this probe is invoked only after
    /// spool drain, at which point the spooler has created the output.  A
    /// file that never appears (silent spooler failure) starves the probe
    /// unless a deadline is configured.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn await_release(&self, path: &Path) -> Result<()> {
        self.await_condition("file release", || try_exclusive_open(path))
    }

    /// Poll `attempt` until it reports success, honoring the configured
    /// interval and deadline.
    fn await_condition(
        &self,
        condition: &'static str,
        mut attempt: impl FnMut() -> bool,
    ) -> Result<()> {
        let started = Instant::now();
        let mut attempts = 0u64;

        loop {
            attempts += 1;
            if attempt() {
                debug!(attempts, elapsed_ms = started.elapsed().as_millis(), condition, "released");
                return Ok(());
            }

            trace!(attempts, condition, "still held");

            if let Some(deadline) = self.deadline {
                let elapsed = started.elapsed();
                if elapsed >= deadline {
                    return Err(PrintError::Timeout { condition, elapsed });
                }
            }

            thread::sleep(self.poll_interval);
        }
    }
}

/// One exclusive open/close cycle.  Success proves no writer holds the file.
///
/// On Windows the open denies all sharing, so a spooler writer still holding
/// the file fails the attempt.  Elsewhere a plain read-write open is the
/// best available approximation (the engine integration is Windows-only
/// anyway).
fn try_exclusive_open(path: &Path) -> bool {
    let mut options = OpenOptions::new();
    options.read(true).write(true);

    #[cfg(windows)]
    {
        use std::os::windows::fs::OpenOptionsExt;
        options.share_mode(0);
    }

    options.open(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn fast_probe(deadline: Option<Duration>) -> FileReadinessProbe {
        FileReadinessProbe::new(Duration::from_millis(1), deadline)
    }

    #[test]
    fn returns_once_lock_releases() {
        // Simulated lock held for 4 attempts, then released.
        let mut held_for = 4u32;
        let probe = fast_probe(None);

        let mut attempts = 0u32;
        probe
            .await_condition("test lock", || {
                attempts += 1;
                if held_for > 0 {
                    held_for -= 1;
                    false
                } else {
                    true
                }
            })
            .expect("release");
        assert_eq!(attempts, 5);
    }

    #[test]
    fn released_file_is_ready_immediately() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("out.pdf");
        std::fs::write(&path, b"%PDF-1.7\n").expect("write");

        fast_probe(None).await_release(&path).expect("ready");
    }

    #[test]
    fn missing_file_starves_until_deadline() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("never-written.pdf");

        let err = fast_probe(Some(Duration::from_millis(5)))
            .await_release(&path)
            .unwrap_err();
        assert!(matches!(err, PrintError::Timeout { condition: "file release", .. }));
    }

    #[test]
    fn held_lock_times_out_when_bounded() {
        let probe = fast_probe(Some(Duration::ZERO));
        let err = probe.await_condition("test lock", || false).unwrap_err();
        assert!(matches!(err, PrintError::Timeout { condition: "test lock", .. }));
    }
}
