//! The seeded trial loop.
//!
//! Reproducibility is the contract here: the PRNG is a `Xoshiro256StarStar`
//! seeded from a single u64, and that seed (supplied or freshly drawn) is
//! always echoed in the report, so any failure replays exactly.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use serde::Serialize;

use crate::diagnostics::{invalid_options, HarnessError};
use crate::property::generator::GeneratorSpec;
use crate::property::shrink;
use crate::value::Value;

/// Property-run options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Number of independent samples to draw. Zero is invalid.
    pub trials: u32,
    /// Explicit PRNG seed; absent means a fresh entropy seed, reported back.
    pub seed: Option<u64>,
    /// Predicate evaluations the shrink loop may spend.
    pub max_shrink_steps: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            trials: 100,
            seed: None,
            max_shrink_steps: 100,
        }
    }
}

/// One generated input plus why it failed the predicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub inputs: Value,
    pub reason: String,
}

/// Outcome of a complete property run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyReport {
    pub passed: bool,
    /// Trials evaluated before the run ended (all of them on a pass; the
    /// failing trial's ordinal on a failure).
    pub trials_run: u32,
    /// The seed that reproduces this exact run.
    pub seed: u64,
    /// The first counterexample, as generated.
    pub failing: Option<Sample>,
    /// The counterexample after shrinking, when shrinking improved on it.
    pub shrunk: Option<Sample>,
}

impl PropertyReport {
    /// Structured payload for the external runner.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Checks `predicate` across `options.trials` samples drawn from `spec`.
///
/// Fail-fast: the first failing sample halts generation and enters the
/// shrink loop. A predicate may fail by returning `Ok(false)`, by returning
/// `Err(reason)`, or by panicking; panics are caught and folded into the
/// failing sample rather than crashing the harness, so fuzzing discovers
/// uncaught failures as ordinary counterexamples.
pub fn run_property<F>(
    spec: &GeneratorSpec,
    predicate: F,
    options: &Options,
) -> Result<PropertyReport, HarnessError>
where
    F: Fn(&Value) -> Result<bool, String>,
{
    if options.trials == 0 {
        return Err(invalid_options("trials must be at least 1"));
    }
    spec.validate()?;

    let seed = options.seed.unwrap_or_else(rand::random);
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);

    for trial in 0..options.trials {
        let inputs = spec.sample(&mut rng);
        if let Some(reason) = evaluate(&predicate, &inputs) {
            let failing = Sample {
                inputs: inputs.clone(),
                reason,
            };
            let shrunk = shrink_failure(spec, &predicate, inputs, options.max_shrink_steps);
            return Ok(PropertyReport {
                passed: false,
                trials_run: trial + 1,
                seed,
                shrunk: shrunk.filter(|s| s.inputs != failing.inputs),
                failing: Some(failing),
            });
        }
    }

    Ok(PropertyReport {
        passed: true,
        trials_run: options.trials,
        seed,
        failing: None,
        shrunk: None,
    })
}

/// Evaluates the predicate once. `None` is a pass; `Some(reason)` a failure.
fn evaluate<F>(predicate: &F, inputs: &Value) -> Option<String>
where
    F: Fn(&Value) -> Result<bool, String>,
{
    match catch_unwind(AssertUnwindSafe(|| predicate(inputs))) {
        Ok(Ok(true)) => None,
        Ok(Ok(false)) => Some("predicate returned false".to_string()),
        Ok(Err(reason)) => Some(reason),
        Err(payload) => Some(panic_reason(payload)),
    }
}

/// Iterative work-list shrink, bounded by `max_steps` predicate evaluations.
///
/// Each round asks [`shrink::candidates`] for simpler values, takes the first
/// one that still fails, and restarts from it. The round that produces no
/// failing candidate ends the loop: the current value is minimal under the
/// shrink policy.
fn shrink_failure<F>(
    spec: &GeneratorSpec,
    predicate: &F,
    failing: Value,
    max_steps: u32,
) -> Option<Sample>
where
    F: Fn(&Value) -> Result<bool, String>,
{
    let mut best = failing;
    let mut best_reason = None;
    let mut steps = 0u32;

    'rounds: loop {
        let mut improved = false;
        for candidate in shrink::candidates(spec, &best) {
            if steps >= max_steps {
                break 'rounds;
            }
            steps += 1;
            if let Some(reason) = evaluate(predicate, &candidate) {
                best = candidate;
                best_reason = Some(reason);
                improved = true;
                break;
            }
        }
        if !improved {
            break;
        }
    }

    best_reason.map(|reason| Sample {
        inputs: best,
        reason,
    })
}

fn panic_reason(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("predicate panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("predicate panicked: {}", s)
    } else {
        "predicate panicked".to_string()
    }
}
