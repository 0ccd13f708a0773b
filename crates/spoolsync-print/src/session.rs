// SPDX-License-Identifier: MIT
//
// Engine session ownership.
//
// The document engine is a heavyweight external process; one session is
// reused across all jobs issued through a coordinator rather than relaunched
// per conversion.  The guard owns that session and quits it exactly once,
// on deterministic scoped teardown rather than non-deterministic
// finalization.

use tracing::{debug, info, warn};

use spoolsync_core::error::{PrintError, Result};

use crate::engine::DocumentEngine;

/// Owns one engine session and guarantees its release exactly once.
pub struct EngineLifecycleGuard {
    engine: Option<Box<dyn DocumentEngine>>,
}

impl EngineLifecycleGuard {
    /// Take ownership of a native engine session.
    ///
    /// The host platform is checked once here: the document-engine
    /// automation interface exists only on Windows.
    pub fn new(engine: Box<dyn DocumentEngine>) -> Result<Self> {
        ensure_platform_supported()?;
        Ok(Self::new_unchecked(engine))
    }

    /// Take ownership without the host platform check.
    ///
    /// For engine implementations that do not drive the native automation
    /// interface (fakes, remote bridges).
    pub fn new_unchecked(engine: Box<dyn DocumentEngine>) -> Self {
        debug!("engine session acquired");
        Self {
            engine: Some(engine),
        }
    }

    /// The live engine, or `None` once released.
    pub fn engine_mut(&mut self) -> Option<&mut (dyn DocumentEngine + 'static)> {
        self.engine.as_deref_mut()
    }

    /// Quit the engine session.
    ///
    /// Idempotent: the first call quits the engine, every later call is a
    /// no-op.  Even a failed quit consumes the session — the engine is not
    /// quit twice.
    pub fn release(&mut self) -> Result<()> {
        match self.engine.take() {
            Some(mut engine) => {
                info!("quitting engine session");
                engine.quit()
            }
            None => Ok(()),
        }
    }
}

impl Drop for EngineLifecycleGuard {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!(error = %err, "engine quit failed during teardown");
        }
    }
}

fn ensure_platform_supported() -> Result<()> {
    if cfg!(windows) {
        Ok(())
    } else {
        Err(PrintError::PlatformUnsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::engine::{DocumentHandle, OpenOptions};

    struct CountingEngine {
        quits: Arc<AtomicU32>,
        fail_quit: bool,
    }

    impl DocumentEngine for CountingEngine {
        fn set_active_printer(&mut self, _printer_name: &str) -> Result<()> {
            Ok(())
        }

        fn open_document(
            &mut self,
            _path: &Path,
            _options: OpenOptions,
        ) -> Result<Box<dyn DocumentHandle>> {
            unreachable!("not opened in these tests")
        }

        fn quit(&mut self) -> Result<()> {
            self.quits.fetch_add(1, Ordering::SeqCst);
            if self.fail_quit {
                Err(PrintError::EngineFailure("quit rejected".into()))
            } else {
                Ok(())
            }
        }
    }

    fn guarded_engine(fail_quit: bool) -> (EngineLifecycleGuard, Arc<AtomicU32>) {
        let quits = Arc::new(AtomicU32::new(0));
        let guard = EngineLifecycleGuard::new_unchecked(Box::new(CountingEngine {
            quits: Arc::clone(&quits),
            fail_quit,
        }));
        (guard, quits)
    }

    #[test]
    fn release_is_idempotent() {
        let (mut guard, quits) = guarded_engine(false);

        guard.release().expect("first release");
        guard.release().expect("second release");
        assert_eq!(quits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_releases_exactly_once() {
        let (guard, quits) = guarded_engine(false);
        drop(guard);
        assert_eq!(quits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn explicit_release_then_drop_quits_once() {
        let (mut guard, quits) = guarded_engine(false);
        guard.release().expect("release");
        drop(guard);
        assert_eq!(quits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_quit_consumes_the_session() {
        let (mut guard, quits) = guarded_engine(true);

        assert!(guard.release().is_err());
        guard.release().expect("second release is a no-op");
        assert_eq!(quits.load(Ordering::SeqCst), 1);
        assert!(guard.engine_mut().is_none());
    }

    #[cfg(not(windows))]
    #[test]
    fn native_construction_requires_windows() {
        let quits = Arc::new(AtomicU32::new(0));
        let err = EngineLifecycleGuard::new(Box::new(CountingEngine {
            quits,
            fail_quit: false,
        }))
        .err()
        .expect("platform check");
        assert!(matches!(err, PrintError::PlatformUnsupported));
    }
}
