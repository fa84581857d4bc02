//! Per-test-session context.
//!
//! A [`Session`] owns everything one test case arranges: the double table,
//! the invocation counter, and the session clock. There is no process-wide
//! registry; the session object *is* the registry, created and torn down by
//! the external test runner at test boundaries. Parallel workers each build
//! their own `Session`; handles are `Rc`-shared and never cross sessions.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use im::HashMap;

use crate::diagnostics::{missing_behavior, HarnessError};
use crate::double::{BehaviorSpec, DoubleHandle, DoubleKind, DoubleState};

// ============================================================================
// SESSION CORE: shared mutable state behind every handle
// ============================================================================

#[derive(Debug)]
pub(crate) struct SessionCore {
    pub doubles: HashMap<String, Rc<RefCell<DoubleState>>>,
    pub next_ordinal: u64,
    pub started: Instant,
}

impl SessionCore {
    fn new() -> Self {
        Self {
            doubles: HashMap::new(),
            next_ordinal: 0,
            started: Instant::now(),
        }
    }
}

// ============================================================================
// SESSION: the public per-test context object
// ============================================================================

/// Explicit per-test-session context. Create one per test case; drop it (or
/// call [`Session::reset_all`]) at the test boundary.
#[derive(Debug)]
pub struct Session {
    core: Rc<RefCell<SessionCore>>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            core: Rc::new(RefCell::new(SessionCore::new())),
        }
    }

    /// Creates a double and registers it in the session table under `name`.
    ///
    /// `behavior` is required for stubs and fakes, optional for spies and
    /// mocks (absent means every call answers `Value::Nil`), and ignored for
    /// dummies. Re-using a name replaces the previous entry; the old handle
    /// keeps its log but is no longer reachable through the session.
    pub fn create_double(
        &self,
        kind: DoubleKind,
        name: &str,
        behavior: Option<BehaviorSpec>,
    ) -> Result<DoubleHandle, HarnessError> {
        if kind.requires_behavior() && behavior.is_none() {
            return Err(missing_behavior(name, kind));
        }

        let behavior = match kind {
            DoubleKind::Dummy => BehaviorSpec::new(),
            _ => behavior.unwrap_or_default(),
        };

        let state = Rc::new(RefCell::new(DoubleState {
            name: name.to_string(),
            kind,
            behavior,
            log: im::Vector::new(),
        }));

        self.core
            .borrow_mut()
            .doubles
            .insert(name.to_string(), Rc::clone(&state));

        Ok(DoubleHandle {
            state,
            core: Rc::clone(&self.core),
        })
    }

    /// Clears the double table and rewinds the invocation counter.
    ///
    /// The external test runner must invoke this between test cases when it
    /// re-uses a session; the harness never resets state behind the test's
    /// back (automatic isolation is an explicit non-goal).
    pub fn reset_all(&self) {
        let mut core = self.core.borrow_mut();
        core.doubles = HashMap::new();
        core.next_ordinal = 0;
    }

    /// Looks up a registered double by identity.
    pub fn lookup(&self, name: &str) -> Option<DoubleHandle> {
        self.core.borrow().doubles.get(name).map(|state| DoubleHandle {
            state: Rc::clone(state),
            core: Rc::clone(&self.core),
        })
    }

    pub fn double_count(&self) -> usize {
        self.core.borrow().doubles.len()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
