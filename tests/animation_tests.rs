//! Integration tests for the spin driver
//!
//! Drives complete spins with a manual clock and a frame queue, checking the
//! landed segment, the state machine transitions and cancellation.

use prize_wheel::animation::{
    AnimationConfig, Easing, FrameOutcome, FrameQueue, IgnoreReason, ManualClock, SpinDriver,
    SpinError, SpinOutcome, SpinResult, WheelEvent,
};
use prize_wheel::config::WheelSettings;
use prize_wheel::selection::{segment_bounds, TargetError, FULL_TURN, POINTER_REFERENCE_ANGLE};
use prize_wheel::validation::ValidationError;
use prize_wheel::wheel::{PointerPosition, Segment, SegmentTarget};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};

/// Frame interval used by the tests, roughly 60 fps
const FRAME_MS: f64 = 16.0;

type TestDriver = SpinDriver<ManualClock, FrameQueue>;

struct Harness {
    driver: TestDriver,
    clock: ManualClock,
    frames: FrameQueue,
}

impl Harness {
    fn new(settings: WheelSettings, seed: u64) -> Self {
        let clock = ManualClock::new();
        let frames = FrameQueue::new();
        let driver = SpinDriver::new(&settings, clock.clone(), frames.clone())
            .with_rng(StdRng::seed_from_u64(seed));
        Self {
            driver,
            clock,
            frames,
        }
    }

    /// Delivers frames until the spin completes
    fn run(&mut self) -> SpinResult {
        for _ in 0..100_000 {
            for frame in self.frames.take_pending() {
                if let FrameOutcome::Completed(result) = self.driver.on_frame(frame) {
                    return result;
                }
            }
            self.clock.advance(FRAME_MS);
        }
        panic!("spin did not complete");
    }

    fn spin_to_completion(&mut self) -> SpinResult {
        let outcome = self.driver.spin().expect("spin failed");
        assert!(outcome.is_started(), "spin was ignored: {:?}", outcome);
        self.run()
    }
}

fn four_equal() -> Vec<Segment> {
    (1..=4)
        .map(|i| Segment::new(i.to_string(), format!("Prize {}", i), "#3366cc"))
        .collect()
}

fn fast_animation() -> AnimationConfig {
    AnimationConfig::default().with_duration(200)
}

#[test]
fn test_forced_index_end_to_end() {
    let settings = WheelSettings::default()
        .with_segments(four_equal())
        .with_predefined_result(SegmentTarget::Index(2));
    let mut harness = Harness::new(settings, 11);

    let result = harness.spin_to_completion();

    assert_eq!(result.index, 2);
    assert_eq!(result.segment.id, "3");
    assert!(result.duration_ms >= 3000.0);
    assert_eq!(harness.driver.last_result(), Some(&result));

    // The pointer at the top reads the wheel at POINTER_REFERENCE_ANGLE - angle
    let (start, end) = segment_bounds(harness.driver.segments())[2];
    let under_pointer = (POINTER_REFERENCE_ANGLE - result.angle).rem_euclid(FULL_TURN);
    assert!(
        under_pointer >= start && under_pointer < end,
        "{} not in [{}, {})",
        under_pointer,
        start,
        end
    );
}

#[test]
fn test_forced_id_for_every_pointer() {
    for pointer in PointerPosition::ALL {
        let settings = WheelSettings::default()
            .with_segments(four_equal())
            .with_animation(fast_animation())
            .with_pointer_position(pointer)
            .with_predefined_result("4");
        let mut harness = Harness::new(settings, 3);

        let result = harness.spin_to_completion();
        assert_eq!(result.segment.id, "4", "pointer {}", pointer);
    }
}

#[test]
fn test_consecutive_spins_land_on_selected_segment() {
    let segments = vec![
        Segment::new("a", "A", "#111111").with_weight(3.0),
        Segment::new("b", "B", "#222222"),
        Segment::new("c", "C", "#333333").with_weight(0.5),
        Segment::new("d", "D", "#444444").with_weight(2.0),
    ];
    let settings = WheelSettings::default()
        .with_segments(segments)
        .with_animation(fast_animation().with_easing(Easing::EaseInOut));
    let mut harness = Harness::new(settings, 21);

    let mut previous_rotation = 0.0;
    for _ in 0..50 {
        let ticket = harness.driver.spin().unwrap().ticket().unwrap();
        let target = ticket.target_index();
        let result = harness.run();

        assert_eq!(result.index, target);
        assert!(harness.driver.rotation() > previous_rotation);
        previous_rotation = harness.driver.rotation();
    }
}

#[test]
fn test_weighted_spins_follow_weights() {
    let settings = WheelSettings::default()
        .with_segments(vec![
            Segment::new("1", "Common", "#ff0000").with_weight(9.0),
            Segment::new("2", "Rare", "#00ff00").with_weight(1.0),
        ])
        .with_animation(AnimationConfig::default().with_duration(0));
    let mut harness = Harness::new(settings, 1000);

    let mut common = 0;
    for _ in 0..1000 {
        if harness.spin_to_completion().segment.id == "1" {
            common += 1;
        }
    }

    assert!(common > 700, "common segment landed only {} times", common);
}

#[test]
fn test_spin_while_spinning_is_a_no_op() {
    let settings = WheelSettings::default()
        .with_segments(four_equal())
        .with_animation(fast_animation());
    let mut harness = Harness::new(settings, 4);

    let ticket = harness.driver.spin().unwrap().ticket().unwrap();
    let first = harness.frames.take_pending()[0];
    harness.driver.on_frame(first);
    let rotation = harness.driver.rotation();

    match harness.driver.spin().unwrap() {
        SpinOutcome::Ignored(reason) => assert_eq!(reason, IgnoreReason::AlreadySpinning),
        SpinOutcome::Started(_) => panic!("second spin started"),
    }
    assert_eq!(harness.driver.rotation(), rotation);
    assert_eq!(harness.frames.pending_len(), 1);

    let result = harness.run();
    assert_eq!(result.spin_id, ticket.spin_id());
}

#[test]
fn test_disabled_forced_target_is_an_error() {
    let mut segments = four_equal();
    segments[1] = segments[1].clone().with_disabled(true);
    let settings = WheelSettings::default()
        .with_segments(segments)
        .with_predefined_result(SegmentTarget::Index(1));
    let mut harness = Harness::new(settings, 5);

    let err = harness.driver.spin().unwrap_err();
    assert_eq!(
        err,
        SpinError::Target(TargetError::TargetDisabled {
            index: 1,
            id: "2".to_string()
        })
    );
    assert!(!harness.driver.is_spinning());
    assert!(harness.frames.is_empty());

    harness.driver.set_predefined_result(Some(SegmentTarget::from("missing")));
    assert!(matches!(
        harness.driver.spin(),
        Err(SpinError::Target(TargetError::NotFound { .. }))
    ));

    harness.driver.set_predefined_result(None);
    let result = harness.spin_to_completion();
    assert_ne!(result.index, 1);
}

#[test]
fn test_invalid_configuration_is_ignored() {
    let settings = WheelSettings::default().with_segments(vec![
        Segment::new("1", "Prize 1", "#ff0000"),
        Segment::new("2", "Prize 2", "invalid-color"),
    ]);
    let mut harness = Harness::new(settings, 6);

    assert!(!harness.driver.is_valid());
    assert!(matches!(
        harness.driver.validation_errors(),
        [ValidationError::InvalidColor { index: 1, .. }]
    ));
    assert!(matches!(
        harness.driver.spin().unwrap(),
        SpinOutcome::Ignored(IgnoreReason::InvalidConfiguration)
    ));
    assert!(harness.frames.is_empty());
}

#[test]
fn test_reset_is_idempotent_and_cancels() {
    let settings = WheelSettings::default()
        .with_segments(four_equal())
        .with_animation(fast_animation());
    let mut harness = Harness::new(settings, 7);

    harness.spin_to_completion();
    assert!(harness.driver.last_result().is_some());

    let mut ticket = harness.driver.spin().unwrap().ticket().unwrap();
    harness.driver.reset();
    let after_first = harness.driver.state().clone();
    harness.driver.reset();

    assert_eq!(harness.driver.state(), &after_first);
    assert_eq!(harness.driver.rotation(), 0.0);
    assert_eq!(harness.driver.progress(), 0.0);
    assert!(harness.driver.last_result().is_none());
    assert!(!harness.driver.is_spinning());
    assert!(harness.frames.is_empty());
    assert_eq!(ticket.try_result(), Err(SpinError::Cancelled));
}

#[test]
fn test_progress_and_easing_over_time() {
    let settings = WheelSettings::default()
        .with_segments(four_equal())
        .with_animation(AnimationConfig::default().with_duration(1000).with_easing(Easing::EaseOut));
    let mut harness = Harness::new(settings, 8);

    harness.driver.spin().unwrap();
    let frame = harness.frames.take_pending()[0];
    harness.driver.on_frame(frame);

    let mut last_rotation = harness.driver.rotation();
    let mut last_progress = 0.0;
    harness.clock.advance(100.0);

    loop {
        let frame = harness.frames.take_pending()[0];
        match harness.driver.on_frame(frame) {
            FrameOutcome::Advanced { progress } => {
                assert!(progress > last_progress);
                assert!(harness.driver.rotation() > last_rotation);
                last_progress = progress;
                last_rotation = harness.driver.rotation();
                harness.clock.advance(100.0);
            }
            FrameOutcome::Completed(result) => {
                assert_eq!(harness.driver.progress(), 1.0);
                assert!((result.duration_ms - 1000.0).abs() < 1e-9);
                break;
            }
            FrameOutcome::Ignored => panic!("frame ignored"),
        }
    }
}

#[test]
fn test_stalled_frames_are_absorbed() {
    let settings = WheelSettings::default()
        .with_segments(four_equal())
        .with_predefined_result(SegmentTarget::Index(0))
        .with_animation(AnimationConfig::default().with_duration(500));
    let mut harness = Harness::new(settings, 9);

    harness.driver.spin().unwrap();
    let frame = harness.frames.take_pending()[0];
    harness.driver.on_frame(frame);

    // One late frame finishes the spin
    harness.clock.advance(5000.0);
    let frame = harness.frames.take_pending()[0];
    match harness.driver.on_frame(frame) {
        FrameOutcome::Completed(result) => assert_eq!(result.index, 0),
        other => panic!("expected completion, got {:?}", other),
    }
    assert!(harness.frames.is_empty());
}

#[test]
fn test_events_in_order() {
    let settings = WheelSettings::default()
        .with_segments(four_equal())
        .with_animation(fast_animation())
        .with_predefined_result(SegmentTarget::Index(1));
    let mut harness = Harness::new(settings, 10);

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    harness.driver.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

    let ticket = harness.driver.spin().unwrap().ticket().unwrap();
    let result = harness.run();

    let events = events.lock().unwrap();
    match &events[..] {
        [WheelEvent::SpinStarted {
            spin_id,
            target_index,
            ..
        }, WheelEvent::SpinCompleted(completed)] => {
            assert_eq!(*spin_id, ticket.spin_id());
            assert_eq!(*target_index, 1);
            assert_eq!(completed, &result);
        }
        other => panic!("unexpected events: {:?}", other),
    }
}

#[tokio::test]
async fn test_ticket_resolves_asynchronously() {
    let settings = WheelSettings::default()
        .with_segments(four_equal())
        .with_animation(fast_animation())
        .with_predefined_result(SegmentTarget::from("2"));
    let mut harness = Harness::new(settings, 12);

    let ticket = harness.driver.spin().unwrap().ticket().unwrap();
    let expected = harness.run();

    let result = ticket.wait().await.unwrap();
    assert_eq!(result, expected);
    assert_eq!(result.segment.id, "2");
}

#[test]
fn test_result_serializes_as_camel_case() {
    let settings = WheelSettings::default()
        .with_segments(four_equal())
        .with_animation(fast_animation());
    let mut harness = Harness::new(settings, 13);

    let result = harness.spin_to_completion();
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["index"], result.index);
    assert!(value.get("durationMs").is_some());
    assert!(value.get("spinId").is_some());
    assert!(value.get("timestamp").is_some());
    assert_eq!(value["segment"]["id"], result.segment.id.as_str());
}
