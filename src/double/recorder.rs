//! Invocation recording and behavior dispatch.
//!
//! Every call to a double flows through [`record`]. The recorder looks up the
//! double's canned behavior, answers it, and (for spies and mocks) appends
//! an immutable [`Invocation`] to the call log. Ordering is the owning
//! session's monotonic counter: test execution is single-threaded and
//! cooperative, so the counter is the only ordering authority the harness
//! needs.

use serde::Serialize;

use crate::diagnostics::{dummy_invoked, unstubbed_call, HarnessError};
use crate::double::{DoubleHandle, DoubleKind};
use crate::value::Value;

/// One observed call on a spy or mock. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invocation {
    /// Session-wide ordinal, strictly increasing in observation order.
    pub ordinal: u64,
    pub method: String,
    pub args: Vec<Value>,
    /// The value the recorder produced for this call.
    pub returned: Value,
    /// Microseconds since the owning session was created. Diagnostic only;
    /// the ordinal is the ordering authority.
    pub elapsed_us: u64,
}

/// Routes one call through a double.
///
/// - **Dummy**: any call is a hard failure; dummies are never invoked.
/// - **Stub / Fake**: a matching behavior answers the call; a miss fails the
///   test with the unmatched signature. Nothing is logged.
/// - **Spy / Mock**: the invocation is always logged, match or no match; the
///   return value is the mapped response if one matches, else `Value::Nil`.
pub fn record(handle: &DoubleHandle, method: &str, args: &[Value]) -> Result<Value, HarnessError> {
    let (kind, name) = {
        let state = handle.state.borrow();
        (state.kind, state.name.clone())
    };

    // Clone the matched response out of the borrow before producing it: a
    // fake's capability may itself call back into the same session.
    let response = {
        let state = handle.state.borrow();
        state.behavior.find(method, args).cloned()
    };

    match kind {
        DoubleKind::Dummy => Err(dummy_invoked(&name, method, args)),
        DoubleKind::Stub | DoubleKind::Fake => match response {
            Some(response) => Ok(response.produce(args)),
            None => Err(unstubbed_call(&name, method, args)),
        },
        DoubleKind::Spy | DoubleKind::Mock => {
            let returned = response
                .map(|response| response.produce(args))
                .unwrap_or(Value::Nil);

            let (ordinal, elapsed_us) = {
                let mut core = handle.core.borrow_mut();
                let ordinal = core.next_ordinal;
                core.next_ordinal += 1;
                (ordinal, core.started.elapsed().as_micros() as u64)
            };

            handle.state.borrow_mut().log.push_back(Invocation {
                ordinal,
                method: method.to_string(),
                args: args.to_vec(),
                returned: returned.clone(),
                elapsed_us,
            });

            Ok(returned)
        }
    }
}
