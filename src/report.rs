//! Handles user-facing rendering of harness results.
//!
//! The harness itself owns no process exit or output routing; that policy
//! belongs to the external test runner. What lives here is the presentation
//! the runner can lean on: colorized PASS/FAIL lines, summaries, and
//! expected-versus-actual diffs for violated expectations.

use difference::{Changeset, Difference};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::property::PropertyReport;
use crate::verify::{ExpectationOutcome, VerificationReport};

// Color constants for terminal output
const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";

/// Configuration for report rendering.
pub struct ReportConfig {
    pub use_colors: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl ReportConfig {
    /// A config that never emits escape codes, for logs and assertions.
    pub fn plain() -> Self {
        Self { use_colors: false }
    }

    /// Apply color formatting to text if colors are enabled.
    pub fn colorize(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{}{}{}", color, text, RESET)
        } else {
            text.to_string()
        }
    }
}

// ============================================================================
// RENDERING
// ============================================================================

/// Renders a verification report, one line per checked expectation plus a
/// summary.
pub fn render_verification(report: &VerificationReport, config: &ReportConfig) -> String {
    let mut lines = Vec::new();
    for outcome in &report.satisfied {
        lines.push(format!(
            "{}: {} {} ({}, got {})",
            config.colorize("PASS", GREEN),
            outcome.method,
            outcome.matcher,
            outcome.expected,
            outcome.actual
        ));
    }
    for outcome in &report.violated {
        lines.push(format!(
            "{}: {} {} (expected {}, got {})",
            config.colorize("FAIL", RED),
            outcome.method,
            outcome.matcher,
            outcome.expected,
            outcome.actual
        ));
    }
    lines.push(format!(
        "Verification of '{}': total {}, {} {}, {} {}",
        report.double,
        report.satisfied.len() + report.violated.len(),
        config.colorize("passed", GREEN),
        report.satisfied.len(),
        config.colorize("failed", RED),
        report.violated.len(),
    ));
    lines.join("\n")
}

/// Renders a property report: a single pass line, or the counterexample with
/// its shrunk form and the seed that replays the run.
pub fn render_property(report: &PropertyReport, config: &ReportConfig) -> String {
    if report.passed {
        return format!(
            "{}: property held for {} trials (seed {})",
            config.colorize("PASS", GREEN),
            report.trials_run,
            report.seed
        );
    }

    let mut lines = vec![format!(
        "{}: property failed on trial {} (seed {})",
        config.colorize("FAIL", RED),
        report.trials_run,
        report.seed
    )];
    if let Some(failing) = &report.failing {
        lines.push(format!("  Counterexample: {}", failing.inputs));
        lines.push(format!("  Reason: {}", failing.reason));
    }
    match &report.shrunk {
        Some(shrunk) => lines.push(format!("  Shrunk to: {}", shrunk.inputs)),
        None => lines.push(format!(
            "  {}",
            config.colorize("(no smaller counterexample found)", YELLOW)
        )),
    }
    lines.join("\n")
}

// ============================================================================
// TERMINAL PRINTING
// ============================================================================

/// Prints violated expectations with a word-level expected/actual diff.
pub fn print_violations(double: &str, violations: &[ExpectationOutcome]) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    println!("Verification failed for '{}':", double);
    let _ = stdout.reset();

    for violation in violations {
        println!("  {} {}", violation.method, violation.matcher);
        let expected = format!("{} calls", violation.expected);
        let actual = format!("{} calls", violation.actual);
        let changeset = Changeset::new(&expected, &actual, " ");
        print_diff(&mut stdout, &changeset.diffs);
        println!();
    }
}

fn print_diff(stdout: &mut StandardStream, diffs: &[Difference]) {
    for diff in diffs {
        match diff {
            Difference::Same(ref x) => {
                let _ = stdout.reset();
                println!("    {}", x);
            }
            Difference::Add(ref x) => {
                let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
                println!("   +{}", x);
            }
            Difference::Rem(ref x) => {
                let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
                println!("   -{}", x);
            }
        }
    }
    let _ = stdout.reset();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::Cardinality;

    fn outcome(method: &str, expected: Cardinality, actual: usize) -> ExpectationOutcome {
        ExpectationOutcome {
            method: method.to_string(),
            matcher: "(any arguments)".to_string(),
            expected,
            actual,
        }
    }

    #[test]
    fn verification_rendering_lists_every_outcome() {
        let report = VerificationReport {
            double: "mailer".to_string(),
            satisfied: vec![outcome("send", Cardinality::Exactly(2), 2)],
            violated: vec![outcome("close", Cardinality::AtLeast(1), 0)],
        };
        let rendered = render_verification(&report, &ReportConfig::plain());
        assert!(rendered.contains("PASS: send"));
        assert!(rendered.contains("FAIL: close"));
        assert!(rendered.contains("total 2"));
        assert!(!rendered.contains('\x1b'));
    }

    #[test]
    fn property_rendering_carries_the_seed() {
        let report = PropertyReport {
            passed: true,
            trials_run: 100,
            seed: 42,
            failing: None,
            shrunk: None,
        };
        let rendered = render_property(&report, &ReportConfig::plain());
        assert!(rendered.contains("100 trials"));
        assert!(rendered.contains("seed 42"));
    }

    #[test]
    fn colorize_wraps_only_when_enabled() {
        let colored = ReportConfig { use_colors: true };
        assert_eq!(colored.colorize("PASS", GREEN), "\x1b[32mPASS\x1b[0m");
        assert_eq!(ReportConfig::plain().colorize("PASS", GREEN), "PASS");
    }
}
