//! Deterministic per-type shrink transforms.
//!
//! Shrinking is candidate generation, not search: given a failing value,
//! [`candidates`] returns the simpler values worth trying, ordered most
//! aggressive first. The runner owns the work-list loop: it takes the first
//! candidate that still fails, re-generates candidates from it, and stops at
//! its step limit. Keeping the transforms pure keeps the whole loop
//! reproducible from the seed.
//!
//! Strategies:
//! - integers: the range-clamped zero target first, then halvings of the
//!   remaining distance toward it
//! - strings: the empty string, then suffix cuts, then one character at a
//!   time rewritten to `'a'`
//! - lists: the empty list, then suffix cuts, then element-wise shrinks
//! - tuples: element-wise shrinks, left to right
//! - bools: `true` to `false`
//! - one-of: earlier (simpler) entries in declaration order

use crate::property::generator::GeneratorSpec;
use crate::value::Value;

/// Simpler values to try in place of `value`, most aggressive first.
/// Returns an empty list when `value` is already minimal for its domain,
/// or when it does not belong to `spec`'s shape.
pub(crate) fn candidates(spec: &GeneratorSpec, value: &Value) -> Vec<Value> {
    match (spec, value) {
        (GeneratorSpec::IntRange { lo, hi }, Value::Number(n)) => {
            int_candidates(*lo, *hi, *n as i64)
                .into_iter()
                .map(|v| Value::Number(v as f64))
                .collect()
        }
        (GeneratorSpec::AsciiString { .. }, Value::String(s)) => string_candidates(s)
            .into_iter()
            .map(Value::String)
            .collect(),
        (GeneratorSpec::Bool, Value::Bool(b)) => {
            if *b {
                vec![Value::Bool(false)]
            } else {
                vec![]
            }
        }
        (GeneratorSpec::OneOf(values), current) => {
            match values.iter().position(|v| v == current) {
                Some(position) => values[..position].to_vec(),
                None => vec![],
            }
        }
        (GeneratorSpec::TupleOf(specs), Value::List(items)) if specs.len() == items.len() => {
            elementwise(specs.iter().zip(items.iter()), items)
        }
        (GeneratorSpec::ListOf { elem, .. }, Value::List(items)) => {
            let mut out: Vec<Value> = prefix_cuts(items.len())
                .into_iter()
                .map(|keep| Value::List(items[..keep].to_vec()))
                .collect();
            out.extend(elementwise(
                items.iter().map(|item| (elem.as_ref(), item)),
                items,
            ));
            out
        }
        _ => vec![],
    }
}

/// Candidates for one integer: the clamped-toward-zero target, then values
/// halving the remaining distance. When zero lies outside the range, the
/// target is the range bound nearest zero.
fn int_candidates(lo: i64, hi: i64, v: i64) -> Vec<i64> {
    let target = if lo > 0 {
        lo
    } else if hi < 0 {
        hi
    } else {
        0
    };
    if v == target {
        return vec![];
    }

    let mut out = vec![target];
    // i128 keeps the distance arithmetic safe at the extremes of i64 ranges.
    let delta = v as i128 - target as i128;
    let mut step = delta / 2;
    while step != 0 {
        let candidate = (v as i128 - step) as i64;
        if candidate != target && candidate != v {
            out.push(candidate);
        }
        step /= 2;
    }
    out
}

/// The empty string, suffix cuts, then per-character simplification to 'a'.
fn string_candidates(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let n = chars.len();
    let mut out = Vec::new();

    for keep in prefix_cuts(n) {
        out.push(chars[..keep].iter().collect());
    }
    for (i, c) in chars.iter().enumerate() {
        if *c != 'a' {
            let mut simplified = chars.clone();
            simplified[i] = 'a';
            out.push(simplified.into_iter().collect());
        }
    }
    out
}

/// Kept-prefix lengths for a sequence of length `n`: zero first, then cuts
/// dropping the back half, quarter, and so on. Every entry is `< n`.
fn prefix_cuts(n: usize) -> Vec<usize> {
    let mut out = Vec::new();
    if n == 0 {
        return out;
    }
    out.push(0);
    let mut drop = n / 2;
    while drop >= 1 {
        let keep = n - drop;
        if keep > 0 {
            out.push(keep);
        }
        drop /= 2;
    }
    out
}

/// Shrinks one element at a time, left to right, holding the rest fixed.
fn elementwise<'a>(
    pairs: impl Iterator<Item = (&'a GeneratorSpec, &'a Value)>,
    items: &[Value],
) -> Vec<Value> {
    let mut out = Vec::new();
    for (i, (spec, item)) in pairs.enumerate() {
        for candidate in candidates(spec, item) {
            let mut next = items.to_vec();
            next[i] = candidate;
            out.push(Value::List(next));
        }
    }
    out
}
