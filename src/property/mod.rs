//! # Chaya Property Runner
//!
//! Drives many randomized trials of a predicate over a bounded generator
//! domain, fail-fast on the first counterexample, then shrinks it to a
//! minimal failing sample.
//!
//! ## Module Structure
//!
//! - **`generator`**: Bounded sample generators over [`Value`] domains
//! - **`runner`**: The seeded trial loop and its report
//! - **`shrink`**: Deterministic per-type shrink transforms
//!
//! Trials run sequentially, never in parallel, so the shrink loop is
//! deterministic for a given seed. The runner manages no timeouts; a hung
//! predicate belongs to the external test runner's overall timeout.
//!
//! [`Value`]: crate::value::Value

pub mod generator;
pub mod runner;
pub mod shrink;

pub use generator::GeneratorSpec;
pub use runner::{run_property, Options, PropertyReport, Sample};
