pub use crate::diagnostics::{ErrorCategory, ErrorKind, HarnessError};
pub use crate::double::{ArgsPattern, BehaviorSpec, DoubleHandle, DoubleKind, Response};
pub use crate::property::{run_property, GeneratorSpec, Options, PropertyReport, Sample};
pub use crate::session::Session;
pub use crate::verify::{verify, Cardinality, Expectation, VerificationReport};

pub mod diagnostics;
pub mod double;
pub mod property;
pub mod report;
pub mod session;
pub mod value;
pub mod verify;
