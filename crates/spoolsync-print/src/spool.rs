// SPDX-License-Identifier: MIT
//
// Spool-drain watcher: blocks until a submitted job has left the OS print
// queue.
//
// The engine returns no job identifier from its print call, so the only
// identity signal available post-submission is the source filename.  The
// default matcher checks whether any queued job's display name contains that
// filename as a substring.  Two in-flight jobs with colliding base names are
// indistinguishable under this scheme — a known precision gap; deployments
// with a stricter identity source can substitute their own `JobMatcher`.

use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, instrument, trace};

use spoolsync_core::config::CoordinatorConfig;
use spoolsync_core::error::{PrintError, Result};

use crate::engine::SpoolQueue;

/// Decides whether a queued job belongs to the print job being awaited.
pub trait JobMatcher {
    /// `queued_name` is the display name reported by the spooler;
    /// `hint` is the source filename (no directory).
    fn matches(&self, queued_name: &str, hint: &str) -> bool;
}

/// Default matcher: substring containment of the source filename.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileNameMatcher;

impl JobMatcher for FileNameMatcher {
    fn matches(&self, queued_name: &str, hint: &str) -> bool {
        queued_name.contains(hint)
    }
}

/// Polls the print queue until no job matching the hint remains.
pub struct SpoolCompletionWatcher {
    poll_interval: Duration,
    deadline: Option<Duration>,
}

impl SpoolCompletionWatcher {
    pub fn new(poll_interval: Duration, deadline: Option<Duration>) -> Self {
        Self {
            poll_interval,
            deadline,
        }
    }

    pub fn from_config(config: &CoordinatorConfig) -> Self {
        Self::new(config.spool_poll_interval, config.spool_deadline)
    }

    /// Block until the queue lists no job matching `hint`.
    ///
    /// The queue is refreshed on every iteration; the calling thread sleeps
    /// between polls and does no other work.  With no deadline configured
    /// this wait is unbounded — a stuck spooler manifests as a hang, not an
    /// error.
    #[instrument(skip(self, queue, matcher), fields(hint = %hint))]
    pub fn await_drain(
        &self,
        queue: &mut dyn SpoolQueue,
        matcher: &dyn JobMatcher,
        hint: &str,
    ) -> Result<()> {
        let started = Instant::now();
        let mut polls = 0u64;

        loop {
            let jobs = queue.pending_jobs()?;
            polls += 1;

            if !jobs.iter().any(|job| matcher.matches(&job.name, hint)) {
                debug!(polls, elapsed_ms = started.elapsed().as_millis(), "spool drained");
                return Ok(());
            }

            trace!(polls, queued = jobs.len(), "job still in queue");

            if let Some(deadline) = self.deadline {
                let elapsed = started.elapsed();
                if elapsed >= deadline {
                    return Err(PrintError::Timeout {
                        condition: "spool drain",
                        elapsed,
                    });
                }
            }

            thread::sleep(self.poll_interval);
        }
    }
}
