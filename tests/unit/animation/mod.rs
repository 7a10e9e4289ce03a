use super::*;
use crate::foundation::core::DVec3;
use crate::graph::opts::HeadingMode;

fn circle(span: f64) -> Animation {
    Animation::Circular(CircularAnimation::new(span, DVec3::ZERO, 1.0, 0.0, 90.0).unwrap())
}

fn line(span: f64) -> Animation {
    Animation::Linear(
        LinearAnimation::new(
            &[DVec3::ZERO, DVec3::new(0.0, 0.0, 2.0)],
            span,
            HeadingMode::Accumulated,
        )
        .unwrap(),
    )
}

#[test]
fn empty_queue_produces_nothing() {
    let mut q = ComponentAnimations::new(Vec::new());
    assert!(q.is_empty());
    assert_eq!(q.current_index(), None);
    assert!(q.step(1.0).is_none());
}

#[test]
fn queue_moves_to_next_after_finish_and_restarts_previous() {
    let mut q = ComponentAnimations::new(vec![line(1.0), circle(2.0)]);
    assert_eq!(q.current_index(), Some(0));

    let ops = q.step(1.0).unwrap();
    // Finished frame still shows the final pose of the first animation.
    assert_eq!(
        ops[0],
        crate::foundation::core::TransformOp::translate(DVec3::new(0.0, 0.0, 2.0))
    );
    assert_eq!(q.current_index(), Some(1));
    assert_eq!(q.queue[0].state(), AnimationState::Idle);

    q.step(1.0);
    assert_eq!(q.current_index(), Some(1));
    assert_eq!(q.current().unwrap().state(), AnimationState::Advancing);
}

#[test]
fn last_animation_stays_finished_and_frozen() {
    let mut q = ComponentAnimations::new(vec![circle(1.0)]);
    let first = q.step(5.0).unwrap();
    let again = q.step(5.0).unwrap();
    assert_eq!(first, again);
    assert!(q.current().unwrap().is_finished());
    assert_eq!(q.len(), 1);
}

#[test]
fn animation_enum_delegates() {
    let mut a = line(2.0);
    a.advance(1.0);
    assert!((a.pose().z - 1.0).abs() < 1e-9);
    assert_eq!(a.generated_transform().len(), 2);
    a.restart();
    assert_eq!(a.state(), AnimationState::Idle);
    assert!(!a.is_finished());
}
