// SPDX-License-Identifier: MIT
//
// Trait seams for the external collaborators the coordinator drives.
//
// The document engine, the printer registry, and the OS print queue are all
// out of scope of this crate — they are specified only at their interface
// boundary here, and a concrete integration (e.g. Word automation on
// Windows) supplies the implementations.  Tests supply fakes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use spoolsync_core::error::Result;

/// Options for opening a source document through the engine.
///
/// The defaults treat the source as authoritative: the engine must not pop
/// interactive repair dialogs or conversion prompts, and must not mutate the
/// file.
#[derive(Debug, Clone, Copy)]
pub struct OpenOptions {
    /// Open the document read-only where the engine supports it.
    pub read_only: bool,
    /// Suppress the engine's interactive repair dialog on damaged input.
    pub suppress_repair_dialog: bool,
    /// Suppress format-conversion prompts for legacy formats.
    pub suppress_conversion_prompts: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            read_only: true,
            suppress_repair_dialog: true,
            suppress_conversion_prompts: true,
        }
    }
}

/// An open document inside the engine.
///
/// The handle must be closed exactly once; the coordinator guarantees this
/// on every exit path via a scoped close guard.
pub trait DocumentHandle {
    /// Issue the engine's print-to-file command targeting `output_path`.
    ///
    /// Returns once the engine has *submitted* the job to the OS spooler —
    /// this does **not** guarantee the output file is finished writing.
    fn print_to_file(&mut self, output_path: &Path) -> Result<()>;

    /// Close the document without saving changes.
    fn close(&mut self) -> Result<()>;
}

/// A live session of the external document-rendering engine.
///
/// The session carries mutable shared state (active printer, open-document
/// set); only one print job may safely execute at a time per session.
pub trait DocumentEngine {
    /// Select the session's active output device.
    ///
    /// Observable by subsequent jobs on the same session.
    fn set_active_printer(&mut self, printer_name: &str) -> Result<()>;

    /// Open a document for printing.
    fn open_document(&mut self, path: &Path, options: OpenOptions) -> Result<Box<dyn DocumentHandle>>;

    /// Quit the engine process/session.
    fn quit(&mut self) -> Result<()>;
}

/// Read-only enumeration of installed printer drivers.
pub trait PrinterRegistry {
    fn installed_printers(&self) -> Result<Vec<String>>;
}

/// A pending job as listed by the OS print queue.
///
/// The spooler exposes only a display name — no stable identifier survives
/// the engine's submission call, so matching falls back to the name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpooledJob {
    pub name: String,
}

/// Refreshable view of the OS print queue for one printer.
///
/// Each call to `pending_jobs` re-reads the queue; handles to the underlying
/// OS object are scoped to a single wait and never held across calls.
pub trait SpoolQueue {
    fn pending_jobs(&mut self) -> Result<Vec<SpooledJob>>;
}
