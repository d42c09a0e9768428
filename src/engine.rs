//! The assertion seam: where a failed check goes to learn its fate.
//!
//! Every check routes its failure through the engine's active
//! [`FailureHandler`]. The default [`StrictHandler`] always propagates, which
//! aborts the test on first failure, which is plain assertion semantics. The
//! [`CollectingHandler`] suppresses and records failures while the test's
//! session is armed, and behaves exactly like the strict handler otherwise.
//!
//! `install` / `uninstall` swap the active handler. The engine stashes the
//! previously active handler the first time `install` runs and restores it
//! verbatim on `uninstall`, so soft semantics can never outlive the test that
//! asked for them.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::record::FailureRecord;
use crate::session::SoftSession;

/// What the active handler decided to do with one failure.
#[derive(Debug)]
pub enum Disposition {
    /// The failure was recorded; the calling check perceives success.
    Suppressed,
    /// The failure must abort the test. The record travels back to the
    /// call site so the message propagates unchanged.
    Propagate(FailureRecord),
}

/// Strategy for handling one check failure.
pub trait FailureHandler: Send + Sync {
    fn on_failure(&self, record: FailureRecord, session: &SoftSession) -> Disposition;
}

/// Plain assertion semantics: every failure aborts the test.
#[derive(Debug, Default)]
pub struct StrictHandler;

impl FailureHandler for StrictHandler {
    fn on_failure(&self, record: FailureRecord, _session: &SoftSession) -> Disposition {
        Disposition::Propagate(record)
    }
}

/// Soft semantics: while the session is armed, failures are appended to the
/// session buffer and swallowed so execution continues. When the session is
/// not armed, failures pass through untouched.
#[derive(Debug, Default)]
pub struct CollectingHandler;

impl FailureHandler for CollectingHandler {
    fn on_failure(&self, record: FailureRecord, session: &SoftSession) -> Disposition {
        if session.is_armed() {
            session.capture(record);
            Disposition::Suppressed
        } else {
            Disposition::Propagate(record)
        }
    }
}

struct EngineState {
    active: Arc<dyn FailureHandler>,
    original: Option<Arc<dyn FailureHandler>>,
}

/// Holds the active failure handler for one test context.
///
/// Cloneable so async bodies and chain steps dispatch through the same slot.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<Mutex<EngineState>>,
}

impl Engine {
    /// New engine with the strict handler active and nothing installed.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(EngineState {
                active: Arc::new(StrictHandler),
                original: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Swap in a replacement handler.
    ///
    /// The first call captures the currently active handler as the original;
    /// further calls while installed are no-ops.
    pub fn install(&self, handler: Arc<dyn FailureHandler>) {
        let mut state = self.lock();
        if state.original.is_none() {
            state.original = Some(std::mem::replace(&mut state.active, handler));
        }
    }

    /// Restore the captured original handler. No-op if nothing is installed.
    pub fn uninstall(&self) {
        let mut state = self.lock();
        if let Some(original) = state.original.take() {
            state.active = original;
        }
    }

    pub fn is_installed(&self) -> bool {
        self.lock().original.is_some()
    }

    /// Route one failure through the active handler.
    pub fn dispatch(&self, record: FailureRecord, session: &SoftSession) -> Disposition {
        // Clone the handler out so user code never runs under the lock.
        let handler = Arc::clone(&self.lock().active);
        handler.on_failure(record, session)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("installed", &self.is_installed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(message: &str) -> FailureRecord {
        FailureRecord::new(message)
    }

    #[test]
    fn strict_handler_always_propagates() {
        let engine = Engine::new();
        let session = SoftSession::new();
        let _guard = session.arm();

        match engine.dispatch(record("failed"), &session) {
            Disposition::Propagate(r) => assert_eq!(r.message, "failed"),
            Disposition::Suppressed => panic!("strict handler must propagate"),
        }
    }

    #[test]
    fn collecting_handler_suppresses_while_armed() {
        let engine = Engine::new();
        engine.install(Arc::new(CollectingHandler));
        let session = SoftSession::new();
        let _guard = session.arm();

        assert!(matches!(
            engine.dispatch(record("soft"), &session),
            Disposition::Suppressed
        ));
        assert_eq!(session.failure_count(), 1);
    }

    #[test]
    fn collecting_handler_propagates_when_disarmed() {
        let engine = Engine::new();
        engine.install(Arc::new(CollectingHandler));
        let session = SoftSession::new();

        assert!(matches!(
            engine.dispatch(record("hard"), &session),
            Disposition::Propagate(_)
        ));
        assert_eq!(session.failure_count(), 0);
    }

    #[test]
    fn install_is_idempotent() {
        let engine = Engine::new();
        engine.install(Arc::new(CollectingHandler));
        // Second install must not overwrite the captured original.
        engine.install(Arc::new(CollectingHandler));
        engine.uninstall();

        let session = SoftSession::new();
        let _guard = session.arm();
        // Back to strict: propagates even while armed.
        assert!(matches!(
            engine.dispatch(record("x"), &session),
            Disposition::Propagate(_)
        ));
        assert!(!engine.is_installed());
    }

    #[test]
    fn uninstall_without_install_is_a_noop() {
        let engine = Engine::new();
        engine.uninstall();
        assert!(!engine.is_installed());
    }
}
