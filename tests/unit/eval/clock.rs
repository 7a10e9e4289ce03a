use super::*;

#[test]
fn fixed_clock_repeats_its_step() {
    let mut c = FrameClock::fixed(0.25);
    assert!((c.tick() - 0.25).abs() < 1e-12);
    assert!((c.tick() - 0.25).abs() < 1e-12);
}

#[test]
fn from_fps_inverts_rate_and_guards_zero() {
    let mut c = FrameClock::from_fps(50.0);
    assert!((c.tick() - 0.02).abs() < 1e-12);
    let mut z = FrameClock::from_fps(0.0);
    assert_eq!(z.tick(), 0.0);
    let mut n = FrameClock::fixed(-1.0);
    assert_eq!(n.tick(), 0.0);
}

#[test]
fn live_clock_starts_at_zero_and_is_monotonic() {
    let mut c = FrameClock::live();
    assert_eq!(c.tick(), 0.0);
    let dt = c.tick();
    assert!(dt >= 0.0);
}
