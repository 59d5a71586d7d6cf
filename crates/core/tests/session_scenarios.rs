// Scenario tests for a full altar session. Time is virtual, so every timing
// assertion is exact and nothing sleeps.

use incense_altar_core::{
    layout_sticks, Action, AltarConfig, AltarSession, ChantReentry, Control, LayoutConfig,
};


fn composer_session() -> AltarSession {
    AltarSession::new(AltarConfig::composer_revision())
}

fn chanting_session() -> AltarSession {
    let mut session = composer_session();
    let animation_ms = session.lighting().animation_ms();
    session.dispatch(Action::Light);
    session.advance(animation_ms);
    session.dispatch(Action::OpenComposer);
    session.dispatch(Action::LoadSample);
    assert!(session.dispatch(Action::StartChant));
    session
}

#[test]
fn rapid_requests_light_one_stick_per_interval() {
    let mut session = composer_session();
    let animation_ms = session.lighting().animation_ms();
    for _ in 0..7 {
        session.dispatch(Action::Light);
    }

    for expected in 1..=7 {
        session.advance(animation_ms - 1);
        assert_eq!(session.lighting().lit_count(), expected - 1);
        session.advance(1);
        assert_eq!(session.lighting().lit_count(), expected);
        assert_eq!(session.lighting().pending(), 7 - expected);
    }
    assert!(!session.lighting().is_animating());
}

#[test]
fn three_clicks_scenario() {
    let mut session = composer_session();
    let animation_ms = session.lighting().animation_ms();
    for _ in 0..3 {
        session.dispatch(Action::Light);
    }

    session.advance(animation_ms);
    assert_eq!(session.lighting().lit_count(), 1);
    assert_eq!(session.lighting().pending(), 2);
    assert!(session.lighting().is_animating());

    session.advance(2 * animation_ms);
    assert_eq!(session.lighting().lit_count(), 3);
    assert_eq!(session.lighting().pending(), 0);
    assert!(!session.lighting().is_animating());
}

#[test]
fn one_large_advance_matches_many_small_ones() {
    let mut coarse = composer_session();
    let animation_ms = coarse.lighting().animation_ms();
    let mut fine = composer_session();
    for _ in 0..5 {
        coarse.dispatch(Action::Light);
        fine.dispatch(Action::Light);
    }

    coarse.advance(5 * animation_ms);
    for _ in 0..50 {
        fine.advance(animation_ms / 10);
    }
    assert_eq!(coarse.lighting().lit_count(), 5);
    assert_eq!(fine.lighting().lit_count(), 5);
}

#[test]
fn reset_discards_in_flight_animation() {
    let mut session = composer_session();
    let animation_ms = session.lighting().animation_ms();
    session.dispatch(Action::Light);
    session.advance(animation_ms);
    for _ in 0..4 {
        session.dispatch(Action::Light);
    }
    session.advance(animation_ms / 2);

    assert!(session.dispatch(Action::Reset));
    assert_eq!(session.lighting().lit_count(), 0);
    assert_eq!(session.lighting().pending(), 0);
    assert!(!session.lighting().is_animating());

    session.advance(10 * animation_ms);
    assert_eq!(session.lighting().lit_count(), 0);
    assert_eq!(session.next_deadline(), None);
}

#[test]
fn chant_needs_prayer_content() {
    let mut session = composer_session();
    let animation_ms = session.lighting().animation_ms();
    session.dispatch(Action::Light);
    session.advance(animation_ms);
    session.dispatch(Action::OpenComposer);

    assert!(!session.is_enabled(Control::StartChant));
    assert!(!session.dispatch(Action::StartChant));
    assert!(!session.is_chanting());
}

#[test]
fn chant_expires_after_configured_duration() {
    let mut session = chanting_session();
    let duration = session.chant().duration_ms();

    session.advance(duration - 1);
    assert!(session.is_chanting());
    session.advance(1);
    assert!(!session.is_chanting());
}

#[test]
fn complete_chant_is_idempotent() {
    let mut session = chanting_session();

    assert!(session.dispatch(Action::CompleteChant));
    assert!(!session.is_chanting());
    assert!(!session.dispatch(Action::CompleteChant));
    assert!(!session.is_chanting());
    assert_eq!(session.next_deadline(), None);
}

#[test]
fn chanting_gates_lighting() {
    let mut session = chanting_session();

    assert!(!session.dispatch(Action::Light));
    assert_eq!(session.lighting().pending(), 0);

    session.dispatch(Action::CompleteChant);
    assert!(session.dispatch(Action::Light));
}

#[test]
fn lighting_and_chant_timers_overlap() {
    let mut config = AltarConfig::arc_revision();
    config.chant.duration_ms = 2_500;
    let mut session = AltarSession::new(config);
    session.dispatch(Action::SetText("Nam mô".to_string()));
    session.dispatch(Action::StartChant);
    for _ in 0..3 {
        session.dispatch(Action::Light);
    }

    session.advance(2_500);
    assert!(!session.is_chanting());
    assert_eq!(session.lighting().lit_count(), 2);
    session.advance(500);
    assert_eq!(session.lighting().lit_count(), 3);
}

#[test]
fn restart_policy_extends_the_chant() {
    let mut config = AltarConfig::free_text_revision();
    config.chant.reentry = ChantReentry::Restart;
    let mut session = AltarSession::new(config);
    session.dispatch(Action::SetText("Nam mô".to_string()));
    session.dispatch(Action::StartChant);

    session.advance(40_000);
    assert!(session.dispatch(Action::StartChant));
    session.advance(40_000);
    assert!(session.is_chanting());
    session.advance(20_000);
    assert!(!session.is_chanting());
}

#[test]
fn ignore_policy_keeps_the_deadline() {
    let mut config = AltarConfig::free_text_revision();
    config.chant.reentry = ChantReentry::Ignore;
    let mut session = AltarSession::new(config);
    session.dispatch(Action::SetText("Nam mô".to_string()));
    session.dispatch(Action::StartChant);

    session.advance(40_000);
    session.dispatch(Action::StartChant);
    session.advance(20_000);
    assert!(!session.is_chanting());
}

#[test]
fn lit_count_is_not_capped_by_layout() {
    let mut config = AltarConfig::default();
    config.lighting.animation_ms = 10;
    let mut session = AltarSession::new(config);
    for _ in 0..40 {
        session.dispatch(Action::Light);
    }
    session.advance(400);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.lit_count, 40);
    assert_eq!(snapshot.sticks.len(), 32);
}

#[test]
fn grid_layout_for_ten_sticks() {
    let sticks = layout_sticks(10, &LayoutConfig::default());

    assert_eq!(sticks.len(), 10);
    let rotations: Vec<f32> = sticks.iter().map(|stick| stick.rotation).collect();
    assert_eq!(
        rotations,
        vec![-5.0, 2.0, -1.0, -4.0, 3.0, 0.0, -3.0, 4.0, 1.0, -2.0]
    );
}

#[test]
fn dropping_a_session_is_quiet() {
    let mut session = chanting_session();
    session.dispatch(Action::CompleteChant);
    session.dispatch(Action::Light);
    drop(session);
}
