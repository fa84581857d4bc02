//! Session lifecycle tests: registration, lookup, ordinal ordering across
//! doubles, and the reset contract at test boundaries.

use chaya::value::Value;
use chaya::{BehaviorSpec, DoubleKind, Session};

#[test]
fn reset_then_create_yields_an_empty_call_log() {
    // Pollute a session, reset it, and confirm the next double starts clean.
    let session = Session::new();
    let old_spy = session
        .create_double(DoubleKind::Spy, "mailer", None)
        .unwrap();
    for _ in 0..3 {
        old_spy.record("send", &[]).unwrap();
    }

    session.reset_all();

    let fresh = session
        .create_double(DoubleKind::Spy, "mailer", None)
        .unwrap();
    assert_eq!(fresh.call_count(), 0);
    assert_eq!(session.double_count(), 1);
}

#[test]
fn reset_clears_the_whole_table() {
    let session = Session::new();
    session
        .create_double(DoubleKind::Spy, "mailer", None)
        .unwrap();
    session
        .create_double(DoubleKind::Mock, "payments", None)
        .unwrap();
    assert_eq!(session.double_count(), 2);

    session.reset_all();

    assert_eq!(session.double_count(), 0);
    assert!(session.lookup("mailer").is_none());
}

#[test]
fn ordinals_are_monotonic_across_doubles_in_one_session() {
    let session = Session::new();
    let mailer = session
        .create_double(DoubleKind::Spy, "mailer", None)
        .unwrap();
    let payments = session
        .create_double(DoubleKind::Spy, "payments", None)
        .unwrap();

    mailer.record("send", &[]).unwrap();
    payments.record("charge", &[]).unwrap();
    mailer.record("send", &[]).unwrap();

    assert_eq!(mailer.calls()[0].ordinal, 0);
    assert_eq!(payments.calls()[0].ordinal, 1);
    assert_eq!(mailer.calls()[1].ordinal, 2);
}

#[test]
fn reset_rewinds_the_ordinal_counter() {
    let session = Session::new();
    let spy = session.create_double(DoubleKind::Spy, "s", None).unwrap();
    spy.record("call", &[]).unwrap();

    session.reset_all();

    let spy = session.create_double(DoubleKind::Spy, "s", None).unwrap();
    spy.record("call", &[]).unwrap();
    assert_eq!(spy.calls()[0].ordinal, 0);
}

#[test]
fn timestamps_never_run_backwards() {
    let session = Session::new();
    let spy = session.create_double(DoubleKind::Spy, "s", None).unwrap();
    for _ in 0..10 {
        spy.record("tick", &[]).unwrap();
    }

    let calls = spy.calls();
    assert!(calls.windows(2).all(|w| w[0].elapsed_us <= w[1].elapsed_us));
}

#[test]
fn lookup_returns_a_live_handle_to_the_same_double() {
    let session = Session::new();
    let spy = session.create_double(DoubleKind::Spy, "mailer", None).unwrap();
    spy.record("send", &[Value::Bool(true)]).unwrap();

    let looked_up = session.lookup("mailer").unwrap();
    assert_eq!(looked_up.call_count(), 1);

    looked_up.record("send", &[Value::Bool(false)]).unwrap();
    assert_eq!(spy.call_count(), 2);
}

#[test]
fn sessions_do_not_share_state() {
    let a = Session::new();
    let b = Session::new();
    let spy_a = a.create_double(DoubleKind::Spy, "svc", None).unwrap();
    let spy_b = b.create_double(DoubleKind::Spy, "svc", None).unwrap();

    spy_a.record("call", &[]).unwrap();

    assert_eq!(spy_a.call_count(), 1);
    assert_eq!(spy_b.call_count(), 0);
    // Each session numbers its own invocations.
    spy_b.record("call", &[]).unwrap();
    assert_eq!(spy_b.calls()[0].ordinal, 0);
}

#[test]
fn behavior_is_optional_exactly_where_the_kind_allows() {
    let session = Session::new();

    assert!(session.create_double(DoubleKind::Dummy, "d", None).is_ok());
    assert!(session.create_double(DoubleKind::Spy, "s", None).is_ok());
    assert!(session.create_double(DoubleKind::Mock, "m", None).is_ok());
    assert!(session.create_double(DoubleKind::Stub, "st", None).is_err());
    assert!(session.create_double(DoubleKind::Fake, "f", None).is_err());
    assert!(session
        .create_double(
            DoubleKind::Stub,
            "st",
            Some(BehaviorSpec::new().returns("get", Value::Nil)),
        )
        .is_ok());
}
