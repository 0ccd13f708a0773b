// SPDX-License-Identifier: MIT
//
// Print job orchestration: open the document, submit the print, wait out
// the two completion phases, close the document on every exit path.

use std::path::Path;

use tracing::{debug, info, instrument, warn};

use spoolsync_core::config::CoordinatorConfig;
use spoolsync_core::error::{PrintError, Result};
use spoolsync_core::types::{DocumentFormat, JobState, PrintJob};

use crate::engine::{DocumentHandle, OpenOptions, PrinterRegistry, SpoolQueue};
use crate::probe::FileReadinessProbe;
use crate::session::EngineLifecycleGuard;
use crate::spool::{FileNameMatcher, JobMatcher, SpoolCompletionWatcher};

/// Drives one document conversion at a time through the engine session.
///
/// The session's active-printer selection and open-document set are mutable
/// shared state, so `print` takes `&mut self` — the compiler enforces that
/// only one job executes per coordinator.  Collaborators are injected; the
/// engine session in particular is never an implicit process-wide singleton.
pub struct PrintJobCoordinator {
    session: EngineLifecycleGuard,
    registry: Box<dyn PrinterRegistry>,
    queue: Box<dyn SpoolQueue>,
    matcher: Box<dyn JobMatcher>,
    config: CoordinatorConfig,
}

impl PrintJobCoordinator {
    pub fn new(
        session: EngineLifecycleGuard,
        registry: Box<dyn PrinterRegistry>,
        queue: Box<dyn SpoolQueue>,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            session,
            registry,
            queue,
            matcher: Box::new(FileNameMatcher),
            config,
        }
    }

    /// Substitute a stricter queue-job matcher than the default
    /// filename-substring one.
    pub fn with_matcher(mut self, matcher: Box<dyn JobMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Convert `input_path` to a PDF at `output_path`.
    ///
    /// Synchronous to the caller: the call returns only once the output file
    /// is fully written and exclusively openable, or with an error.  All
    /// preconditions are checked before any external mutation; a
    /// mid-operation engine failure still closes the document before
    /// propagating.
    #[instrument(skip(self), fields(input = %input_path.display(), output = %output_path.display()))]
    pub fn print(&mut self, input_path: &Path, output_path: &Path) -> Result<()> {
        if !input_path.exists() {
            return Err(PrintError::NotFound(input_path.to_path_buf()));
        }

        let format = DocumentFormat::from_path(input_path)
            .ok_or_else(|| PrintError::UnsupportedFormat(describe_extension(input_path)))?;

        let printer = resolve_printer(self.registry.as_ref(), &self.config.printer_name)?;

        let mut job = PrintJob::new(input_path, output_path, printer.as_str(), format);
        info!(job_id = %job.id, printer = %printer, "starting print job");

        let engine = self
            .session
            .engine_mut()
            .ok_or_else(|| PrintError::EngineFailure("engine session already released".into()))?;

        engine.set_active_printer(&printer)?;

        let handle = engine.open_document(input_path, OpenOptions::default())?;
        job.advance(JobState::DocumentOpen);
        let mut document = CloseGuard::new(handle);

        let submitted = submit_and_await(
            &mut document,
            &mut job,
            output_path,
            self.queue.as_mut(),
            self.matcher.as_ref(),
            &self.config,
        );

        // Close runs on every path; the submission error, if any, wins.
        let closed = document.close();
        match submitted.and(closed) {
            Ok(()) => {
                job.advance(JobState::Completed);
                info!(job_id = %job.id, "print job completed");
                Ok(())
            }
            Err(err) => {
                job.fail();
                Err(err)
            }
        }
    }

    /// Release the engine session.  Idempotent; also performed on drop.
    pub fn close(&mut self) -> Result<()> {
        self.session.release()
    }
}

/// Submit the print command and wait out both completion phases.
///
/// Spool drain is awaited strictly before file release: the spooler may
/// still hold the output file open after the engine's print call returns,
/// so probing the file first would produce false negatives.
fn submit_and_await(
    document: &mut CloseGuard,
    job: &mut PrintJob,
    output_path: &Path,
    queue: &mut dyn SpoolQueue,
    matcher: &dyn JobMatcher,
    config: &CoordinatorConfig,
) -> Result<()> {
    document.print_to_file(output_path)?;
    job.advance(JobState::Submitted);

    job.advance(JobState::AwaitingSpoolDrain);
    SpoolCompletionWatcher::from_config(config).await_drain(queue, matcher, &job.queue_hint())?;

    job.advance(JobState::AwaitingFileRelease);
    FileReadinessProbe::from_config(config).await_release(output_path)?;

    Ok(())
}

/// Look up the configured printer in the installed-printer registry.
///
/// Exact, case-sensitive name match.
fn resolve_printer(registry: &dyn PrinterRegistry, printer_name: &str) -> Result<String> {
    let installed = registry.installed_printers()?;
    debug!(count = installed.len(), "enumerated installed printers");

    installed
        .into_iter()
        .find(|name| name == printer_name)
        .ok_or_else(|| PrintError::PrinterUnavailable(printer_name.to_string()))
}

fn describe_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(no extension)".to_string())
}

/// Scoped ownership of an open document handle.
///
/// The handle is closed exactly once: explicitly on the coordinator's exit
/// paths, or by `Drop` if an earlier panic or early return skipped that.
struct CloseGuard {
    handle: Option<Box<dyn DocumentHandle>>,
}

impl CloseGuard {
    fn new(handle: Box<dyn DocumentHandle>) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    fn print_to_file(&mut self, output_path: &Path) -> Result<()> {
        match self.handle.as_deref_mut() {
            Some(handle) => handle.print_to_file(output_path),
            None => Err(PrintError::EngineFailure("document already closed".into())),
        }
    }

    fn close(&mut self) -> Result<()> {
        match self.handle.take() {
            Some(mut handle) => handle.close(),
            None => Ok(()),
        }
    }
}

impl Drop for CloseGuard {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(error = %err, "document close failed during teardown");
        }
    }
}
