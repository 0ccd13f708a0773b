// SPDX-License-Identifier: MIT
//
// Core domain types for the Spoolsync print-completion engine.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Unique identifier for a print job.
///
/// Used for log correlation only — the OS spooler never learns this id, so
/// queue matching falls back to the source filename (see the watcher docs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Input document formats the engine integration accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentFormat {
    Doc,
    Docx,
    Txt,
    Rtf,
}

impl DocumentFormat {
    /// Infer the document format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "doc" => Some(Self::Doc),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Txt),
            "rtf" => Some(Self::Rtf),
            _ => None,
        }
    }

    /// Infer the document format from a path.
    ///
    /// Only the final extension is considered, so `report.v2.docx` is a
    /// valid Docx input.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// Lifecycle states of a print job.
///
/// Transitions are strictly forward.  The two `Awaiting*` states loop
/// internally until their condition is observed, but the job never revisits
/// an earlier state.  `Failed` is terminal and reachable from any
/// non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    /// Job created, preconditions validated.
    Created,
    /// The engine holds an open handle on the input document.
    DocumentOpen,
    /// The print-to-file command has been accepted by the engine; the job is
    /// now in the hands of the OS spooler.
    Submitted,
    /// Polling the print queue until the job leaves it.
    AwaitingSpoolDrain,
    /// Polling the output file until all writers release it.
    AwaitingFileRelease,
    /// The output PDF is fully written and exclusively openable.
    Completed,
    /// Terminal failure — see the error returned by `print`.
    Failed,
}

impl JobState {
    /// Position in the forward progression; `Failed` sits past `Completed`
    /// so that failing from any non-terminal state is a forward move.
    fn ordinal(self) -> u8 {
        match self {
            Self::Created => 0,
            Self::DocumentOpen => 1,
            Self::Submitted => 2,
            Self::AwaitingSpoolDrain => 3,
            Self::AwaitingFileRelease => 4,
            Self::Completed => 5,
            Self::Failed => 6,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// A single print-to-PDF job, owned by the coordinator for its lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintJob {
    pub id: JobId,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Printer driver name, resolved once at job start.
    pub printer_name: String,
    pub format: DocumentFormat,
    pub state: JobState,
    pub created_at: DateTime<Utc>,
}

impl PrintJob {
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        printer_name: impl Into<String>,
        format: DocumentFormat,
    ) -> Self {
        Self {
            id: JobId::new(),
            input_path: input_path.into(),
            output_path: output_path.into(),
            printer_name: printer_name.into(),
            format,
            state: JobState::Created,
            created_at: Utc::now(),
        }
    }

    /// The source filename without its directory — the only identity signal
    /// visible in the OS print queue after submission.
    pub fn queue_hint(&self) -> String {
        self.input_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Advance to the next lifecycle state.
    ///
    /// Transitions must be forward; a backwards transition is a programming
    /// error in the coordinator.
    pub fn advance(&mut self, next: JobState) {
        debug_assert!(
            next.ordinal() > self.state.ordinal(),
            "job state must move forward: {:?} -> {:?}",
            self.state,
            next
        );
        debug!(job_id = %self.id, from = ?self.state, to = ?next, "job state advanced");
        self.state = next;
    }

    /// Mark the job as failed.  Valid from any non-terminal state.
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            debug!(job_id = %self.id, from = ?self.state, "job failed");
            self.state = JobState::Failed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension_is_case_insensitive() {
        assert_eq!(DocumentFormat::from_extension("DOCX"), Some(DocumentFormat::Docx));
        assert_eq!(DocumentFormat::from_extension("Doc"), Some(DocumentFormat::Doc));
        assert_eq!(DocumentFormat::from_extension("rtf"), Some(DocumentFormat::Rtf));
        assert_eq!(DocumentFormat::from_extension("TXT"), Some(DocumentFormat::Txt));
        assert_eq!(DocumentFormat::from_extension("pdf"), None);
        assert_eq!(DocumentFormat::from_extension("odt"), None);
    }

    #[test]
    fn format_from_path_uses_final_extension() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("report.v2.docx")),
            Some(DocumentFormat::Docx)
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("/tmp/letter.RTF")),
            Some(DocumentFormat::Rtf)
        );
        assert_eq!(DocumentFormat::from_path(Path::new("archive.docx.bak")), None);
        assert_eq!(DocumentFormat::from_path(Path::new("no-extension")), None);
    }

    #[test]
    fn queue_hint_drops_directory() {
        let job = PrintJob::new(
            "/home/user/docs/sample.docx",
            "/home/user/docs/sample.pdf",
            "Microsoft Print to PDF",
            DocumentFormat::Docx,
        );
        assert_eq!(job.queue_hint(), "sample.docx");
    }

    #[test]
    fn job_advances_through_full_lifecycle() {
        let mut job = PrintJob::new("in.docx", "out.pdf", "p", DocumentFormat::Docx);
        assert_eq!(job.state, JobState::Created);

        job.advance(JobState::DocumentOpen);
        job.advance(JobState::Submitted);
        job.advance(JobState::AwaitingSpoolDrain);
        job.advance(JobState::AwaitingFileRelease);
        job.advance(JobState::Completed);

        assert!(job.state.is_terminal());
    }

    #[test]
    fn fail_is_reachable_from_any_nonterminal_state() {
        let mut job = PrintJob::new("in.txt", "out.pdf", "p", DocumentFormat::Txt);
        job.advance(JobState::DocumentOpen);
        job.fail();
        assert_eq!(job.state, JobState::Failed);

        // Failing again is a no-op, not a panic.
        job.fail();
        assert_eq!(job.state, JobState::Failed);
    }

    #[test]
    #[should_panic(expected = "forward")]
    #[cfg(debug_assertions)]
    fn backwards_transition_is_rejected() {
        let mut job = PrintJob::new("in.doc", "out.pdf", "p", DocumentFormat::Doc);
        job.advance(JobState::Submitted);
        job.advance(JobState::DocumentOpen);
    }
}
