//! Bounded sample generators.
//!
//! Every domain is finite by construction: integer ranges are closed, string
//! and list lengths are capped, choices are drawn from fixed lists. Samples
//! come out as [`Value`]s so the same predicate machinery serves single
//! inputs and tuples alike.

use rand::Rng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::diagnostics::{invalid_options, HarnessError};
use crate::value::Value;

/// Declares the domain a property quantifies over. Stateless and reusable
/// across runs; the PRNG it draws from is owned by the runner.
#[derive(Debug, Clone)]
pub enum GeneratorSpec {
    /// Integers in the closed range `lo..=hi`.
    IntRange { lo: i64, hi: i64 },
    /// Printable-ASCII strings of length `0..=max_len`.
    AsciiString { max_len: usize },
    Bool,
    /// One of a fixed list of values; declaration order is simplest-first,
    /// which is the order shrinking walks back toward.
    OneOf(Vec<Value>),
    /// A fixed-arity input tuple, one generator per position.
    TupleOf(Vec<GeneratorSpec>),
    /// Lists of `0..=max_len` elements drawn from `elem`.
    ListOf {
        elem: Box<GeneratorSpec>,
        max_len: usize,
    },
}

impl GeneratorSpec {
    /// Rejects degenerate domains before any trial runs.
    pub fn validate(&self) -> Result<(), HarnessError> {
        match self {
            Self::IntRange { lo, hi } => {
                if lo > hi {
                    return Err(invalid_options(format!(
                        "empty integer range {}..={}",
                        lo, hi
                    )));
                }
                Ok(())
            }
            Self::AsciiString { .. } | Self::Bool => Ok(()),
            Self::OneOf(values) => {
                if values.is_empty() {
                    return Err(invalid_options("one-of generator with no values"));
                }
                Ok(())
            }
            Self::TupleOf(specs) => {
                if specs.is_empty() {
                    return Err(invalid_options("tuple generator with no positions"));
                }
                for spec in specs {
                    spec.validate()?;
                }
                Ok(())
            }
            Self::ListOf { elem, .. } => elem.validate(),
        }
    }

    /// Draws one sample. Callers validate the spec first; generation itself
    /// is total and always terminates.
    pub(crate) fn sample(&self, rng: &mut Xoshiro256StarStar) -> Value {
        match self {
            Self::IntRange { lo, hi } => Value::Number(rng.gen_range(*lo..=*hi) as f64),
            Self::AsciiString { max_len } => {
                let len = rng.gen_range(0..=*max_len);
                let s: String = (0..len)
                    .map(|_| rng.gen_range(0x20u8..=0x7eu8) as char)
                    .collect();
                Value::String(s)
            }
            Self::Bool => Value::Bool(rng.gen_bool(0.5)),
            Self::OneOf(values) => values[rng.gen_range(0..values.len())].clone(),
            Self::TupleOf(specs) => {
                Value::List(specs.iter().map(|spec| spec.sample(rng)).collect())
            }
            Self::ListOf { elem, max_len } => {
                let len = rng.gen_range(0..=*max_len);
                Value::List((0..len).map(|_| elem.sample(rng)).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn empty_int_range_is_rejected() {
        let err = GeneratorSpec::IntRange { lo: 5, hi: 4 }.validate().unwrap_err();
        assert_eq!(err.error_code(), "chaya::property::invalid_options");
    }

    #[test]
    fn empty_one_of_is_rejected() {
        assert!(GeneratorSpec::OneOf(vec![]).validate().is_err());
    }

    #[test]
    fn nested_specs_are_validated_recursively() {
        let spec = GeneratorSpec::TupleOf(vec![
            GeneratorSpec::Bool,
            GeneratorSpec::ListOf {
                elem: Box::new(GeneratorSpec::IntRange { lo: 9, hi: 1 }),
                max_len: 4,
            },
        ]);
        assert!(spec.validate().is_err());
    }

    #[test]
    fn int_samples_stay_in_range() {
        let spec = GeneratorSpec::IntRange { lo: -3, hi: 7 };
        let mut rng = Xoshiro256StarStar::seed_from_u64(11);
        for _ in 0..200 {
            let n = spec.sample(&mut rng).as_number().unwrap();
            assert!((-3.0..=7.0).contains(&n));
        }
    }

    #[test]
    fn string_samples_respect_the_length_cap() {
        let spec = GeneratorSpec::AsciiString { max_len: 6 };
        let mut rng = Xoshiro256StarStar::seed_from_u64(11);
        for _ in 0..200 {
            let v = spec.sample(&mut rng);
            let s = v.as_str().unwrap();
            assert!(s.len() <= 6);
            assert!(s.chars().all(|c| (' '..='~').contains(&c)));
        }
    }

    #[test]
    fn tuple_samples_have_fixed_arity() {
        let spec = GeneratorSpec::TupleOf(vec![
            GeneratorSpec::IntRange { lo: 0, hi: 10 },
            GeneratorSpec::AsciiString { max_len: 3 },
        ]);
        let mut rng = Xoshiro256StarStar::seed_from_u64(11);
        for _ in 0..50 {
            let v = spec.sample(&mut rng);
            assert_eq!(v.as_list().unwrap().len(), 2);
        }
    }
}
