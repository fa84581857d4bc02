//! Expectation verification for mocks and spies.
//!
//! Expectations are declared in the arrange phase and consumed here, after
//! the act phase has finished: verification is never interleaved with
//! recording, and it only reads the call log. Every expectation is checked;
//! the verifier never stops at the first violation, so a failing test gets
//! the complete picture in one pass.

use serde::Serialize;
use std::fmt;

use crate::diagnostics::{expectation_not_met, unverifiable_kind, HarnessError};
use crate::double::{ArgsPattern, DoubleHandle};
use crate::value::Value;

// ============================================================================
// EXPECTATIONS
// ============================================================================

/// Expected call-count semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    Exactly(usize),
    AtLeast(usize),
    AtMost(usize),
}

impl Cardinality {
    pub fn admits(&self, actual: usize) -> bool {
        match self {
            Self::Exactly(n) => actual == *n,
            Self::AtLeast(n) => actual >= *n,
            Self::AtMost(n) => actual <= *n,
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "exactly {}", n),
            Self::AtLeast(n) => write!(f, "at least {}", n),
            Self::AtMost(n) => write!(f, "at most {}", n),
        }
    }
}

/// One declared requirement on the calls a mock must receive.
/// Built in the arrange phase, immutable afterwards.
#[derive(Debug, Clone)]
pub struct Expectation {
    pub method: String,
    pub matcher: ArgsPattern,
    pub cardinality: Cardinality,
}

impl Expectation {
    pub fn new(method: &str, matcher: ArgsPattern, cardinality: Cardinality) -> Self {
        Self {
            method: method.to_string(),
            matcher,
            cardinality,
        }
    }

    /// `method` must be called exactly `count` times, any arguments.
    pub fn exactly(method: &str, count: usize) -> Self {
        Self::new(method, ArgsPattern::Any, Cardinality::Exactly(count))
    }

    pub fn at_least(method: &str, count: usize) -> Self {
        Self::new(method, ArgsPattern::Any, Cardinality::AtLeast(count))
    }

    pub fn at_most(method: &str, count: usize) -> Self {
        Self::new(method, ArgsPattern::Any, Cardinality::AtMost(count))
    }

    /// Narrows the expectation to calls whose arguments equal `args`.
    pub fn with_exact_args(mut self, args: Vec<Value>) -> Self {
        self.matcher = ArgsPattern::Exact(args);
        self
    }

    /// Narrows the expectation with an argument predicate.
    pub fn with_matcher(mut self, matcher: ArgsPattern) -> Self {
        self.matcher = matcher;
        self
    }
}

// ============================================================================
// VERIFICATION
// ============================================================================

/// One expectation checked against the call log: what was demanded, what the
/// log actually contained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpectationOutcome {
    pub method: String,
    /// Rendered matcher, e.g. `("admin", 42)` or `(any arguments)`.
    pub matcher: String,
    pub expected: Cardinality,
    pub actual: usize,
}

/// Complete result of a verification pass.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub double: String,
    pub satisfied: Vec<ExpectationOutcome>,
    pub violated: Vec<ExpectationOutcome>,
}

impl VerificationReport {
    pub fn passed(&self) -> bool {
        self.violated.is_empty()
    }

    /// Structured payload for the external runner.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Checks every expectation against the double's call log.
///
/// Matching is by method name plus argument matcher; the actual count is
/// derived solely from the recorded invocations. Applies to spies and mocks,
/// the kinds that record. Any violation fails the test with the full
/// violation list; a clean pass returns the report silently.
pub fn verify(
    handle: &DoubleHandle,
    expectations: &[Expectation],
) -> Result<VerificationReport, HarnessError> {
    let kind = handle.kind();
    if !kind.records() {
        return Err(unverifiable_kind(kind));
    }

    let calls = handle.calls();
    let mut satisfied = Vec::new();
    let mut violated = Vec::new();

    for expectation in expectations {
        let actual = calls
            .iter()
            .filter(|inv| {
                inv.method == expectation.method && expectation.matcher.matches(&inv.args)
            })
            .count();

        let outcome = ExpectationOutcome {
            method: expectation.method.clone(),
            matcher: expectation.matcher.describe(),
            expected: expectation.cardinality,
            actual,
        };

        if expectation.cardinality.admits(actual) {
            satisfied.push(outcome);
        } else {
            violated.push(outcome);
        }
    }

    if !violated.is_empty() {
        return Err(expectation_not_met(&handle.name(), violated));
    }

    Ok(VerificationReport {
        double: handle.name(),
        satisfied,
        violated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinality_semantics() {
        assert!(Cardinality::Exactly(2).admits(2));
        assert!(!Cardinality::Exactly(2).admits(1));
        assert!(!Cardinality::Exactly(2).admits(3));

        assert!(Cardinality::AtLeast(1).admits(1));
        assert!(Cardinality::AtLeast(1).admits(5));
        assert!(!Cardinality::AtLeast(1).admits(0));

        assert!(Cardinality::AtMost(3).admits(0));
        assert!(Cardinality::AtMost(3).admits(3));
        assert!(!Cardinality::AtMost(3).admits(4));
    }

    #[test]
    fn cardinality_renders_for_reports() {
        assert_eq!(Cardinality::Exactly(2).to_string(), "exactly 2");
        assert_eq!(Cardinality::AtLeast(1).to_string(), "at least 1");
        assert_eq!(Cardinality::AtMost(0).to_string(), "at most 0");
    }
}
