//! # Chaya Double System
//!
//! This module provides the test-double system for the Chaya harness.
//! Doubles are substitute collaborators a test arranges in place of real ones.
//!
//! ## Module Structure
//!
//! - **`recorder`**: Invocation recording and behavior dispatch
//!
//! ## Design Principles
//!
//! - **Explicit Behavior**: Canned answers are declared, never reflected
//! - **Append-Only Logs**: Recorded invocations are immutable once observed
//! - **Session Ownership**: Every double belongs to exactly one [`Session`]
//!
//! [`Session`]: crate::session::Session

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{invalid_kind, HarnessError};
use crate::session::SessionCore;
use crate::value::{render_args, Value};

pub mod recorder;

pub use recorder::{record, Invocation};

// ============================================================================
// DOUBLE KINDS
// ============================================================================

/// The five classical test-double kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoubleKind {
    /// Passed around but never invoked; fills parameter lists.
    Dummy,
    /// Owns a working but shortcut implementation, supplied as a capability.
    Fake,
    /// Returns canned answers for pre-declared calls only.
    Stub,
    /// A stub that also records how it was called.
    Spy,
    /// Pre-programmed with expectations checked at verification time.
    Mock,
}

impl DoubleKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dummy => "dummy",
            Self::Fake => "fake",
            Self::Stub => "stub",
            Self::Spy => "spy",
            Self::Mock => "mock",
        }
    }

    /// Kinds that append to a call log when invoked.
    pub const fn records(&self) -> bool {
        matches!(self, Self::Spy | Self::Mock)
    }

    /// Kinds that cannot be created without a behavior spec.
    pub const fn requires_behavior(&self) -> bool {
        matches!(self, Self::Stub | Self::Fake)
    }
}

impl fmt::Display for DoubleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DoubleKind {
    type Err = HarnessError;

    /// Parses the textual kind an external runner hands across the boundary.
    /// Anything outside the five classical kinds is an arrange-phase failure.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dummy" => Ok(Self::Dummy),
            "fake" => Ok(Self::Fake),
            "stub" => Ok(Self::Stub),
            "spy" => Ok(Self::Spy),
            "mock" => Ok(Self::Mock),
            _ => Err(invalid_kind(s)),
        }
    }
}

// ============================================================================
// BEHAVIOR SPECS
// ============================================================================

/// How a declared behavior decides whether it applies to a call's arguments.
///
/// Resolved by explicit comparison over a tagged variant; the harness never
/// inspects call shapes reflectively.
#[derive(Clone)]
pub enum ArgsPattern {
    /// Applies only when the arguments equal these values exactly.
    Exact(Vec<Value>),
    /// Applies when the predicate accepts the arguments.
    Where(Rc<dyn Fn(&[Value]) -> bool>),
    /// Applies to any arguments.
    Any,
}

impl ArgsPattern {
    /// Builds a predicate matcher from any closure over the argument tuple.
    pub fn matching(predicate: impl Fn(&[Value]) -> bool + 'static) -> Self {
        Self::Where(Rc::new(predicate))
    }

    pub fn matches(&self, args: &[Value]) -> bool {
        match self {
            Self::Exact(expected) => expected.as_slice() == args,
            Self::Where(predicate) => predicate(args),
            Self::Any => true,
        }
    }

    /// Human-readable rendering for reports and diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Self::Exact(values) => render_args(values),
            Self::Where(_) => "(<predicate>)".to_string(),
            Self::Any => "(any arguments)".to_string(),
        }
    }
}

impl fmt::Debug for ArgsPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(values) => f.debug_tuple("Exact").field(values).finish(),
            Self::Where(_) => f.write_str("Where(<predicate>)"),
            Self::Any => f.write_str("Any"),
        }
    }
}

/// What a matched behavior produces.
#[derive(Clone)]
pub enum Response {
    /// A canned value, returned as-is (stubs, spies, mocks).
    Value(Value),
    /// A working shortcut implementation over the arguments (fakes).
    Apply(Rc<dyn Fn(&[Value]) -> Value>),
}

impl Response {
    /// Builds a capability response from any function over the argument tuple.
    pub fn apply(f: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Self::Apply(Rc::new(f))
    }

    pub(crate) fn produce(&self, args: &[Value]) -> Value {
        match self {
            Self::Value(v) => v.clone(),
            Self::Apply(f) => f(args),
        }
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Apply(_) => f.write_str("Apply(<capability>)"),
        }
    }
}

/// One declared rule: a method, an argument pattern, and what to answer.
#[derive(Debug, Clone)]
pub struct BehaviorRule {
    pub method: String,
    pub pattern: ArgsPattern,
    pub response: Response,
}

/// The canned behavior of a double: an ordered rule list, first match wins.
#[derive(Debug, Clone, Default)]
pub struct BehaviorSpec {
    rules: Vec<BehaviorRule>,
}

impl BehaviorSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a rule for `method` under `pattern`. Chainable, arrange-phase.
    pub fn on(mut self, method: &str, pattern: ArgsPattern, response: Response) -> Self {
        self.rules.push(BehaviorRule {
            method: method.to_string(),
            pattern,
            response,
        });
        self
    }

    /// Shorthand: `method` answers `value` for any arguments.
    pub fn returns(self, method: &str, value: Value) -> Self {
        self.on(method, ArgsPattern::Any, Response::Value(value))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub(crate) fn find(&self, method: &str, args: &[Value]) -> Option<&Response> {
        self.rules
            .iter()
            .find(|rule| rule.method == method && rule.pattern.matches(args))
            .map(|rule| &rule.response)
    }
}

// ============================================================================
// DOUBLE STATE AND HANDLES
// ============================================================================

/// Internal state of one double. Mutated only through its handle, within the
/// session that owns it.
#[derive(Debug)]
pub(crate) struct DoubleState {
    pub name: String,
    pub kind: DoubleKind,
    pub behavior: BehaviorSpec,
    pub log: im::Vector<Invocation>,
}

/// Shared handle to a registered double.
///
/// Handles are `Rc`-shared within a single session and deliberately not
/// `Send`: parallel test workers each arrange their own [`Session`], and the
/// type system keeps one worker's doubles out of another's hands.
///
/// [`Session`]: crate::session::Session
#[derive(Clone)]
pub struct DoubleHandle {
    pub(crate) state: Rc<RefCell<DoubleState>>,
    pub(crate) core: Rc<RefCell<SessionCore>>,
}

impl DoubleHandle {
    pub fn name(&self) -> String {
        self.state.borrow().name.clone()
    }

    pub fn kind(&self) -> DoubleKind {
        self.state.borrow().kind
    }

    /// Routes a call through the recorder: canned answers for stubs and
    /// fakes, log appends for spies and mocks. See [`recorder::record`].
    pub fn record(&self, method: &str, args: &[Value]) -> Result<Value, HarnessError> {
        recorder::record(self, method, args)
    }

    /// Snapshot of the call log, in observation order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.state.borrow().log.iter().cloned().collect()
    }

    pub fn call_count(&self) -> usize {
        self.state.borrow().log.len()
    }

    /// Counts recorded invocations of `method` whose arguments satisfy
    /// `pattern`, without running a full verification pass.
    pub fn calls_matching(&self, method: &str, pattern: &ArgsPattern) -> usize {
        self.state
            .borrow()
            .log
            .iter()
            .filter(|inv| inv.method == method && pattern.matches(&inv.args))
            .count()
    }
}

impl fmt::Debug for DoubleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("DoubleHandle")
            .field("name", &state.name)
            .field("kind", &state.kind)
            .field("calls", &state.log.len())
            .finish()
    }
}
