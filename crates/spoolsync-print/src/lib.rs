// SPDX-License-Identifier: MIT
//
// Spoolsync Print — the print-completion synchronization engine.  This crate
// bridges between the core domain types defined in `spoolsync-core` and the
// external document engine, printer registry, and OS print spooler, all of
// which are consumed through the trait seams in `engine`.
//
// The hard problem solved here: the engine's print-to-file call returns at
// job *submission*, and neither the engine nor the spooler ever signals job
// *completion*.  Completion is inferred in two ordered phases — the job
// leaving the print queue (spool drain), then the output file becoming
// exclusively openable (file release).

pub mod coordinator;
pub mod engine;
pub mod probe;
pub mod session;
pub mod spool;

pub use coordinator::PrintJobCoordinator;
pub use engine::{DocumentEngine, DocumentHandle, OpenOptions, PrinterRegistry, SpoolQueue, SpooledJob};
pub use probe::FileReadinessProbe;
pub use session::EngineLifecycleGuard;
pub use spool::{FileNameMatcher, JobMatcher, SpoolCompletionWatcher};
