//! Chaya Error Handling - Unified Encapsulated API
//!
//! Every failure the harness can signal is a [`HarnessError`]: a structured
//! kind plus diagnostic enhancement data. Errors are never retried internally;
//! each one is surfaced to the external test runner as a test failure carrying
//! the full payload it needs for reporting (the offending call, the violated
//! expectations, the failing sample).

use miette::Diagnostic;
use std::fmt;
use thiserror::Error;

use crate::double::DoubleKind;
use crate::value::{render_args, Value};
use crate::verify::ExpectationOutcome;

/// The single error type - no wrapper, no variants, just essential data
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct HarnessError {
    /// What went wrong (type-specific data)
    pub kind: ErrorKind,
    /// How to help (auto-populated based on context)
    pub diagnostic: DiagnosticInfo,
}

/// All error kinds as a clean enum - no duplicate fields
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// A double kind was requested that the registry does not recognize, or a
    /// kind was used where its contract does not apply (e.g. verifying a stub).
    InvalidKind { requested: String },
    /// A stub or fake was arranged without the behavior spec its kind requires.
    MissingBehavior { double: String, kind: DoubleKind },
    /// A call reached a double with no matching canned behavior. Always fatal
    /// to the current test, never silently defaulted.
    UnstubbedCall {
        double: String,
        method: String,
        args: Vec<Value>,
    },
    /// Mock verification failed; carries every violated expectation.
    ExpectationNotMet {
        double: String,
        violations: Vec<ExpectationOutcome>,
    },
    /// Malformed property-runner options or generator bounds.
    InvalidOptions { message: String },
}

/// Diagnostic enhancement data
#[derive(Debug, Clone)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Arrange,
    Act,
    Verify,
    Property,
}

impl ErrorCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Arrange => "arrange",
            Self::Act => "act",
            Self::Verify => "verify",
            Self::Property => "property",
        }
    }
}

impl ErrorKind {
    /// Get the error category for test assertions
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidKind { .. } | Self::MissingBehavior { .. } => ErrorCategory::Arrange,
            Self::UnstubbedCall { .. } => ErrorCategory::Act,
            Self::ExpectationNotMet { .. } => ErrorCategory::Verify,
            Self::InvalidOptions { .. } => ErrorCategory::Property,
        }
    }

    /// Get error code suffix for diagnostic codes
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::InvalidKind { .. } => "invalid_kind",
            Self::MissingBehavior { .. } => "missing_behavior",
            Self::UnstubbedCall { .. } => "unstubbed_call",
            Self::ExpectationNotMet { .. } => "expectation_not_met",
            Self::InvalidOptions { .. } => "invalid_options",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidKind { requested } => {
                write!(f, "Arrange error: invalid double kind '{}'", requested)
            }
            ErrorKind::MissingBehavior { double, kind } => {
                write!(
                    f,
                    "Arrange error: {} '{}' created without a behavior spec",
                    kind, double
                )
            }
            ErrorKind::UnstubbedCall {
                double,
                method,
                args,
            } => {
                write!(
                    f,
                    "Act error: unstubbed call {}{} on double '{}'",
                    method,
                    render_args(args),
                    double
                )
            }
            ErrorKind::ExpectationNotMet { double, violations } => {
                write!(
                    f,
                    "Verify error: {} expectation(s) not met on mock '{}'",
                    violations.len(),
                    double
                )?;
                for v in violations {
                    write!(
                        f,
                        "\n  {} {}: expected {}, got {}",
                        v.method, v.matcher, v.expected, v.actual
                    )?;
                }
                Ok(())
            }
            ErrorKind::InvalidOptions { message } => {
                write!(f, "Property error: {}", message)
            }
        }
    }
}

impl Diagnostic for HarnessError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic.error_code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }
}

impl HarnessError {
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    pub fn error_code(&self) -> &str {
        &self.diagnostic.error_code
    }

    fn new(kind: ErrorKind, help: Option<String>) -> Self {
        let error_code = format!(
            "chaya::{}::{}",
            kind.category().as_str(),
            kind.code_suffix()
        );
        Self {
            kind,
            diagnostic: DiagnosticInfo { help, error_code },
        }
    }
}

// ============================================================================
// CONSTRUCTORS - the only way errors are built outside this module
// ============================================================================

/// An unrecognized double kind was requested at the registry boundary.
pub fn invalid_kind(requested: impl Into<String>) -> HarnessError {
    HarnessError::new(
        ErrorKind::InvalidKind {
            requested: requested.into(),
        },
        Some("valid kinds are: dummy, fake, stub, spy, mock".into()),
    )
}

/// A kind was used where its contract does not apply (verify on a non-recording
/// double). Same kind as [`invalid_kind`], different guidance.
pub fn unverifiable_kind(kind: DoubleKind) -> HarnessError {
    HarnessError::new(
        ErrorKind::InvalidKind {
            requested: kind.as_str().to_string(),
        },
        Some("only spy and mock doubles record calls; verification reads the call log".into()),
    )
}

pub fn missing_behavior(double: &str, kind: DoubleKind) -> HarnessError {
    HarnessError::new(
        ErrorKind::MissingBehavior {
            double: double.to_string(),
            kind,
        },
        Some("stubs and fakes answer only pre-declared calls; arrange a BehaviorSpec".into()),
    )
}

pub fn unstubbed_call(double: &str, method: &str, args: &[Value]) -> HarnessError {
    HarnessError::new(
        ErrorKind::UnstubbedCall {
            double: double.to_string(),
            method: method.to_string(),
            args: args.to_vec(),
        },
        Some("declare a matching behavior in the arrange phase, or use a spy".into()),
    )
}

/// A dummy received traffic. Dummies are passed around but never invoked;
/// a dummy with calls is a mis-arranged test.
pub fn dummy_invoked(double: &str, method: &str, args: &[Value]) -> HarnessError {
    HarnessError::new(
        ErrorKind::UnstubbedCall {
            double: double.to_string(),
            method: method.to_string(),
            args: args.to_vec(),
        },
        Some("dummy doubles take no calls; arrange a stub or spy if the collaborator is exercised".into()),
    )
}

pub fn expectation_not_met(double: &str, violations: Vec<ExpectationOutcome>) -> HarnessError {
    HarnessError::new(
        ErrorKind::ExpectationNotMet {
            double: double.to_string(),
            violations,
        },
        None,
    )
}

pub fn invalid_options(message: impl Into<String>) -> HarnessError {
    HarnessError::new(
        ErrorKind::InvalidOptions {
            message: message.into(),
        },
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_follow_phase_and_suffix() {
        let err = invalid_kind("clone");
        assert_eq!(err.error_code(), "chaya::arrange::invalid_kind");

        let err = unstubbed_call("db", "fetch", &[Value::Number(1.0)]);
        assert_eq!(err.error_code(), "chaya::act::unstubbed_call");
        assert_eq!(err.category(), ErrorCategory::Act);

        let err = invalid_options("trials must be at least 1");
        assert_eq!(err.error_code(), "chaya::property::invalid_options");
    }

    #[test]
    fn unstubbed_call_names_the_offending_signature() {
        let err = unstubbed_call(
            "mailer",
            "send",
            &[Value::String("admin".to_string())],
        );
        let msg = err.to_string();
        assert!(msg.contains("send"));
        assert!(msg.contains("admin"));
        assert!(msg.contains("mailer"));
    }

    #[test]
    fn diagnostic_impl_exposes_code_and_help() {
        let err = invalid_kind("clone");
        let code = Diagnostic::code(&err).map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("chaya::arrange::invalid_kind"));
        assert!(Diagnostic::help(&err).is_some());
    }
}
