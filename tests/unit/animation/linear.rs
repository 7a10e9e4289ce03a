use super::*;
use std::f64::consts::{FRAC_PI_2, PI};

fn l_path() -> Vec<DVec3> {
    vec![
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(4.0, 0.0, 0.0),
        DVec3::new(4.0, 0.0, 3.0),
    ]
}

#[test]
fn full_span_travels_total_length_and_finishes() {
    let mut a = LinearAnimation::new(&l_path(), 7.0, HeadingMode::Accumulated).unwrap();
    assert!((a.total_length() - 7.0).abs() < 1e-9);
    assert_eq!(a.state(), AnimationState::Idle);

    a.advance(7.0);
    assert!((a.travelled() - 7.0).abs() < 1e-9);
    assert_eq!(a.state(), AnimationState::Finished);
}

#[test]
fn initial_heading_is_measured_from_positive_z() {
    let a = LinearAnimation::new(&l_path(), 7.0, HeadingMode::Accumulated).unwrap();
    assert!((a.pose().heading - FRAC_PI_2).abs() < 1e-9);

    let straight = [DVec3::new(0.0, 0.0, 0.0), DVec3::new(0.0, 0.0, 5.0)];
    let b = LinearAnimation::new(&straight, 1.0, HeadingMode::Accumulated).unwrap();
    assert!(b.pose().heading.abs() < 1e-9);
}

#[test]
fn accumulated_heading_adds_unsigned_turns() {
    let mut a = LinearAnimation::new(&l_path(), 7.0, HeadingMode::Accumulated).unwrap();
    a.advance(4.0);
    assert_eq!(a.state(), AnimationState::SegmentComplete);
    assert_eq!(a.segment(), 1);
    assert!((a.pose().heading - PI).abs() < 1e-9);
    assert!((a.pose().x - 4.0).abs() < 1e-9);
    assert!(a.pose().z.abs() < 1e-9);
}

#[test]
fn absolute_heading_follows_control_points() {
    let mut a = LinearAnimation::new(&l_path(), 7.0, HeadingMode::Absolute).unwrap();
    a.advance(7.0);
    let p = a.pose();
    assert!((p.x - 4.0).abs() < 1e-9);
    assert!((p.z - 3.0).abs() < 1e-9);
    assert!(p.heading.abs() < 1e-9);
}

#[test]
fn partial_advances_accumulate_and_overshoot_is_clipped() {
    let mut a = LinearAnimation::new(&l_path(), 7.0, HeadingMode::Absolute).unwrap();
    a.advance(1.0);
    assert_eq!(a.state(), AnimationState::Advancing);
    assert!((a.travelled() - 1.0).abs() < 1e-9);
    assert!((a.pose().x - 1.0).abs() < 1e-9);

    a.advance(100.0);
    assert!((a.travelled() - 7.0).abs() < 1e-9);
    assert!(a.is_finished_for_test());

    let before = a.pose();
    a.advance(5.0);
    assert_eq!(a.pose(), before);
}

#[test]
fn pose_starts_at_first_point_and_keeps_height() {
    let pts = [DVec3::new(1.0, 2.5, -1.0), DVec3::new(1.0, 9.0, 3.0)];
    let mut a = LinearAnimation::new(&pts, 2.0, HeadingMode::Absolute).unwrap();
    let p = a.pose();
    assert!((p.x - 1.0).abs() < 1e-9 && (p.y - 2.5).abs() < 1e-9 && (p.z + 1.0).abs() < 1e-9);
    a.advance(1.0);
    assert!((a.pose().y - 2.5).abs() < 1e-9);
    assert!((a.pose().z - 1.0).abs() < 1e-9);
}

#[test]
fn zero_length_segments_are_skipped() {
    let pts = [
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(0.0, 0.0, 2.0),
        DVec3::new(0.0, 5.0, 2.0),
        DVec3::new(0.0, 0.0, 4.0),
    ];
    let mut a = LinearAnimation::new(&pts, 4.0, HeadingMode::Accumulated).unwrap();
    a.advance(4.0);
    assert!(a.is_finished_for_test());
    assert!((a.pose().z - 4.0).abs() < 1e-9);
    assert!(a.pose().heading.abs() < 1e-9);
}

#[test]
fn restart_restores_initial_pose() {
    let mut a = LinearAnimation::new(&l_path(), 7.0, HeadingMode::Accumulated).unwrap();
    let initial = a.pose();
    a.advance(7.0);
    a.restart();
    assert_eq!(a.state(), AnimationState::Idle);
    assert_eq!(a.pose(), initial);
    assert_eq!(a.travelled(), 0.0);
}

#[test]
fn generated_ops_translate_then_rotate_about_y() {
    let a = LinearAnimation::new(&l_path(), 7.0, HeadingMode::Accumulated).unwrap();
    let ops = a.generated_transform();
    assert_eq!(ops.len(), 2);
    assert_eq!(ops[0], TransformOp::translate(DVec3::ZERO));
    assert_eq!(ops[1], TransformOp::rotate_radians(Axis::Y, FRAC_PI_2));
}

#[test]
fn construction_rejects_bad_parameters() {
    let one = [DVec3::ZERO];
    assert!(matches!(
        LinearAnimation::new(&one, 1.0, HeadingMode::Accumulated),
        Err(SceneError::Animation(_))
    ));
    assert!(matches!(
        LinearAnimation::new(&l_path(), 0.0, HeadingMode::Accumulated),
        Err(SceneError::Animation(_))
    ));
    let vertical = [DVec3::ZERO, DVec3::new(0.0, 3.0, 0.0)];
    assert!(matches!(
        LinearAnimation::new(&vertical, 1.0, HeadingMode::Accumulated),
        Err(SceneError::Animation(_))
    ));
}

impl LinearAnimation {
    fn is_finished_for_test(&self) -> bool {
        self.state() == AnimationState::Finished
    }
}
