//! Per-test soft-check state: the armed flag and the failure buffer.
//!
//! One `SoftSession` exists per running test, created by the runner and
//! carried inside the test's `TestContext`. Keeping the state per test (not
//! in a process-wide static) means a leftover armed flag or stale buffer
//! cannot leak into the next test. The runner still resets the session after
//! every case as a teardown net.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::record::{FailureBuffer, FailureRecord};

#[derive(Debug, Default)]
struct SessionState {
    armed: bool,
    buffer: FailureBuffer,
}

/// Cloneable handle to one test's soft-check state.
///
/// Clones share the same underlying state, so a context cloned into an async
/// body or a chain step observes the same armed flag and buffer.
#[derive(Debug, Clone, Default)]
pub struct SoftSession {
    inner: Arc<Mutex<SessionState>>,
}

impl SoftSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // A panic inside a check never holds this lock, but a poisoned
        // session must still be resettable by the teardown net.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// True while a collecting test body (including its async tail) is running.
    pub fn is_armed(&self) -> bool {
        self.lock().armed
    }

    /// Arm the session. The returned guard disarms on drop, so the flag is
    /// restored even when the test body unwinds.
    pub fn arm(&self) -> ArmGuard {
        self.lock().armed = true;
        ArmGuard {
            session: self.clone(),
        }
    }

    /// Append a captured failure, preserving encounter order.
    pub fn capture(&self, record: FailureRecord) {
        self.lock().buffer.append(record);
    }

    /// Take all captured failures and clear the buffer in one step.
    pub fn drain(&self) -> Vec<FailureRecord> {
        self.lock().buffer.drain()
    }

    pub fn failure_count(&self) -> usize {
        self.lock().buffer.len()
    }

    /// Disarm and discard everything. Called at test start and by the
    /// runner's per-case teardown, whatever the outcome was.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.armed = false;
        state.buffer.reset();
    }

    fn disarm(&self) {
        self.lock().armed = false;
    }
}

/// Scoped armed-flag holder.
///
/// Dropping the guard disarms the session; `disarm` makes the hand-off point
/// explicit where ordering matters (disarm before the aggregate report runs).
#[derive(Debug)]
#[must_use = "dropping the guard disarms the session immediately"]
pub struct ArmGuard {
    session: SoftSession,
}

impl ArmGuard {
    /// Consume the guard, disarming the session now.
    pub fn disarm(self) {
        // Drop does the work.
    }
}

impl Drop for ArmGuard {
    fn drop(&mut self) {
        self.session.disarm();
    }
}
