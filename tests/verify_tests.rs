//! Expectation verification tests: cardinality semantics, argument matchers,
//! and the complete-diagnostics guarantee (every expectation checked, never
//! stopping at the first violation).

use chaya::diagnostics::ErrorKind;
use chaya::value::Value;
use chaya::{verify, ArgsPattern, Cardinality, DoubleKind, Expectation, Session};

fn string(s: &str) -> Value {
    Value::String(s.to_string())
}

fn mock_with_sends(count: usize) -> (Session, chaya::DoubleHandle) {
    let session = Session::new();
    let mock = session
        .create_double(DoubleKind::Mock, "mailer", None)
        .unwrap();
    for _ in 0..count {
        mock.record("send", &[string("admin")]).unwrap();
    }
    (session, mock)
}

#[test]
fn exact_count_succeeds_on_exactly_k_matching_calls() {
    let (_session, mock) = mock_with_sends(3);

    let report = verify(&mock, &[Expectation::exactly("send", 3)]).unwrap();

    assert!(report.passed());
    assert_eq!(report.satisfied.len(), 1);
    assert_eq!(report.satisfied[0].actual, 3);
}

#[test]
fn exact_count_fails_one_call_either_side_of_k() {
    for actual in [2usize, 4] {
        let (_session, mock) = mock_with_sends(actual);
        let err = verify(&mock, &[Expectation::exactly("send", 3)]).unwrap_err();
        assert_eq!(err.error_code(), "chaya::verify::expectation_not_met");
    }
}

#[test]
fn at_least_and_at_most_bound_the_call_count() {
    let (_session, mock) = mock_with_sends(2);

    assert!(verify(&mock, &[Expectation::at_least("send", 1)]).is_ok());
    assert!(verify(&mock, &[Expectation::at_least("send", 3)]).is_err());
    assert!(verify(&mock, &[Expectation::at_most("send", 2)]).is_ok());
    assert!(verify(&mock, &[Expectation::at_most("send", 1)]).is_err());
}

#[test]
fn verification_checks_every_expectation_before_failing() {
    let session = Session::new();
    let mock = session
        .create_double(DoubleKind::Mock, "mailer", None)
        .unwrap();
    mock.record("send", &[string("admin")]).unwrap();

    let expectations = [
        Expectation::exactly("send", 1),   // satisfied
        Expectation::exactly("close", 1),  // violated
        Expectation::at_least("flush", 2), // violated
    ];
    let err = verify(&mock, &expectations).unwrap_err();

    // The error carries the complete violation list, not just the first.
    match err.kind {
        ErrorKind::ExpectationNotMet { double, violations } => {
            assert_eq!(double, "mailer");
            assert_eq!(violations.len(), 2);
            assert_eq!(violations[0].method, "close");
            assert_eq!(violations[0].actual, 0);
            assert_eq!(violations[1].method, "flush");
            assert_eq!(violations[1].expected, Cardinality::AtLeast(2));
        }
        other => panic!("expected ExpectationNotMet, got {:?}", other),
    }
}

#[test]
fn matchers_narrow_which_invocations_count() {
    let session = Session::new();
    let mock = session
        .create_double(DoubleKind::Mock, "mailer", None)
        .unwrap();
    mock.record("send", &[string("admin"), Value::Number(1.0)])
        .unwrap();
    mock.record("send", &[string("audit"), Value::Number(250.0)])
        .unwrap();

    // Exact-equality matcher: only the literal tuple counts.
    let exact = Expectation::exactly("send", 1)
        .with_exact_args(vec![string("admin"), Value::Number(1.0)]);
    assert!(verify(&mock, &[exact]).is_ok());

    // Predicate matcher over the argument values.
    let large = Expectation::exactly("send", 1).with_matcher(ArgsPattern::matching(|args| {
        args.get(1).and_then(Value::as_number).is_some_and(|n| n > 100.0)
    }));
    assert!(verify(&mock, &[large]).is_ok());

    // Default matcher counts everything under the method name.
    assert!(verify(&mock, &[Expectation::exactly("send", 2)]).is_ok());
}

#[test]
fn verifying_a_spy_is_allowed() {
    let session = Session::new();
    let spy = session.create_double(DoubleKind::Spy, "mailer", None).unwrap();
    spy.record("send", &[]).unwrap();

    assert!(verify(&spy, &[Expectation::exactly("send", 1)]).is_ok());
}

#[test]
fn verifying_a_non_recording_kind_is_rejected() {
    let session = Session::new();
    let stub = session
        .create_double(
            DoubleKind::Stub,
            "db",
            Some(chaya::BehaviorSpec::new().returns("get", Value::Nil)),
        )
        .unwrap();

    let err = verify(&stub, &[Expectation::exactly("get", 0)]).unwrap_err();
    assert_eq!(err.error_code(), "chaya::arrange::invalid_kind");
}

#[test]
fn verification_reads_the_log_without_mutating_it() {
    let (_session, mock) = mock_with_sends(2);

    let before = mock.calls();
    let _ = verify(&mock, &[Expectation::exactly("send", 5)]);
    let after = mock.calls();

    assert_eq!(before, after);
}

#[test]
fn empty_expectation_list_passes_silently() {
    let (_session, mock) = mock_with_sends(4);

    let report = verify(&mock, &[]).unwrap();
    assert!(report.passed());
    assert!(report.satisfied.is_empty());
}

#[test]
fn report_serializes_for_the_external_runner() {
    let (_session, mock) = mock_with_sends(1);

    let report = verify(&mock, &[Expectation::exactly("send", 1)]).unwrap();
    let json = report.to_json().unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["double"], "mailer");
    assert_eq!(parsed["satisfied"][0]["actual"], 1);
}
