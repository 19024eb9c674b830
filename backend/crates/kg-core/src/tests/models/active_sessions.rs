use crate::ActiveSessions;

use googletest::prelude::*;

fn sessions(tokens: &[&str]) -> ActiveSessions {
    ActiveSessions::from(tokens.iter().map(|t| t.to_string()).collect::<Vec<_>>())
}

#[test]
fn given_room_left_when_admitting_then_appends_without_eviction() {
    let mut active = sessions(&["a"]);

    let evicted = active.admit("b".to_string(), 3);

    assert_that!(evicted, is_empty());
    assert_that!(active.as_slice(), elements_are![eq("a"), eq("b")]);
}

#[test]
fn given_list_at_limit_when_admitting_then_oldest_is_evicted_and_order_kept() {
    let mut active = sessions(&["a", "b", "c"]);

    let evicted = active.admit("d".to_string(), 3);

    assert_that!(evicted, elements_are![eq("a")]);
    assert_that!(active.as_slice(), elements_are![eq("b"), eq("c"), eq("d")]);
}

#[test]
fn given_list_over_lowered_limit_when_admitting_then_trims_down_to_limit() {
    let mut active = sessions(&["a", "b", "c", "d"]);

    let evicted = active.admit("e".to_string(), 2);

    assert_that!(evicted, elements_are![eq("a"), eq("b"), eq("c")]);
    assert_that!(active.as_slice(), elements_are![eq("d"), eq("e")]);
}

#[test]
fn given_any_admission_sequence_then_length_never_exceeds_limit() {
    let mut active = ActiveSessions::new();

    for i in 0..50 {
        active.admit(format!("token-{i}"), 5);
        assert_that!(active.len(), le(5));
    }

    assert_that!(active.as_slice()[0], eq("token-45"));
    assert_that!(active.as_slice()[4], eq("token-49"));
}

#[test]
fn given_zero_limit_when_admitting_then_new_session_survives() {
    let mut active = sessions(&["a"]);

    active.admit("b".to_string(), 0);

    assert_that!(active.as_slice(), elements_are![eq("b")]);
}

#[test]
fn given_active_token_when_rotating_then_replaced_at_back() {
    let mut active = sessions(&["a", "b", "c"]);

    let rotated = active.rotate("a", "a2".to_string());

    assert_that!(rotated, eq(true));
    assert_that!(active.as_slice(), elements_are![eq("b"), eq("c"), eq("a2")]);
}

#[test]
fn given_unknown_token_when_rotating_then_list_unchanged() {
    let mut active = sessions(&["a", "b"]);

    let rotated = active.rotate("zzz", "new".to_string());

    assert_that!(rotated, eq(false));
    assert_that!(active.as_slice(), elements_are![eq("a"), eq("b")]);
}

#[test]
fn given_absent_token_when_removing_then_returns_false_and_is_idempotent() {
    let mut active = sessions(&["a", "b"]);

    assert_that!(active.remove("b"), eq(true));
    assert_that!(active.remove("b"), eq(false));
    assert_that!(active.as_slice(), elements_are![eq("a")]);
}

#[test]
fn given_sessions_when_serialized_then_plain_json_array() {
    let active = sessions(&["a", "b"]);

    let json = serde_json::to_string(&active).unwrap();

    assert_that!(json, eq(r#"["a","b"]"#));
}
