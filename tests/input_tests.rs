//! Input Translation Tests
//!
//! Tests for:
//! - InputTranslator: key bindings, press/repeat/release handling, fps-normalized step
//! - FrameClock: estimate availability and per-second reporting

use std::time::{Duration, Instant};

use glam::Vec2;

use asteroids::input::{Direction, InputTranslator, Key, KeyAction};
use asteroids::settings::GameSettings;
use asteroids::utils::FrameClock;

const EPSILON: f32 = 1e-6;

fn approx_vec(a: Vec2, b: Vec2) -> bool {
    (a - b).abs().max_element() < EPSILON
}

// ============================================================================
// InputTranslator Tests
// ============================================================================

#[test]
fn wasd_map_to_the_four_directions() {
    assert_eq!(InputTranslator::direction(Key::W), Direction::Up);
    assert_eq!(InputTranslator::direction(Key::A), Direction::Left);
    assert_eq!(InputTranslator::direction(Key::S), Direction::Down);
    assert_eq!(InputTranslator::direction(Key::D), Direction::Right);
}

#[test]
fn press_moves_along_one_axis() {
    let translator = InputTranslator::new(12.0, 0.005);
    let cases = [
        (Key::W, Vec2::new(0.0, 0.005)),
        (Key::A, Vec2::new(-0.005, 0.0)),
        (Key::S, Vec2::new(0.0, -0.005)),
        (Key::D, Vec2::new(0.005, 0.0)),
    ];
    for (key, expected) in cases {
        let command = translator.translate(key, KeyAction::Press, None).unwrap();
        assert!(approx_vec(command.delta, expected), "{key:?}: {:?}", command.delta);
    }
}

#[test]
fn repeat_moves_like_press() {
    let translator = InputTranslator::new(12.0, 0.005);
    assert_eq!(
        translator.translate(Key::A, KeyAction::Repeat, Some(60.0)),
        translator.translate(Key::A, KeyAction::Press, Some(60.0))
    );
}

#[test]
fn release_is_ignored() {
    let translator = InputTranslator::default();
    for key in [Key::W, Key::A, Key::S, Key::D] {
        assert_eq!(translator.translate(key, KeyAction::Release, Some(60.0)), None);
    }
}

#[test]
fn step_is_ratio_over_fps() {
    let translator = InputTranslator::new(12.0, 0.005);
    let command = translator.translate(Key::D, KeyAction::Press, Some(240.0)).unwrap();
    assert!(approx_vec(command.delta, Vec2::new(0.05, 0.0)));
}

#[test]
fn translator_reads_settings() {
    let settings = GameSettings {
        movement_ratio: 6.0,
        fallback_step: 0.01,
        ..Default::default()
    };
    let translator = InputTranslator::from_settings(&settings);
    assert!((translator.step(Some(60.0)) - 0.1).abs() < EPSILON);
    assert!((translator.step(None) - 0.01).abs() < EPSILON);
}

// ============================================================================
// FrameClock Tests
// ============================================================================

#[test]
fn clock_starts_without_estimate() {
    let clock = FrameClock::new();
    assert_eq!(clock.fps(), None);
}

#[test]
fn clock_reports_after_one_second() {
    let start = Instant::now();
    let mut clock = FrameClock::starting_at(start);

    let mut last = None;
    for i in 1..=30 {
        let tick = clock.tick_at(start + Duration::from_millis(33 * i));
        if i < 30 {
            assert_eq!(tick.report, None);
        }
        last = Some(tick);
    }

    // 30 frames in 990 ms: not yet a whole second
    assert_eq!(last.unwrap().report, None);

    let tick = clock.tick_at(start + Duration::from_millis(1023));
    let fps = tick.report.unwrap();
    assert!((fps - 31.0 / 1.023).abs() < 0.01);
}
