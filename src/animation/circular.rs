use crate::animation::{AnimationState, GeneratedOps, Pose};
use crate::foundation::core::{Axis, DVec3, TransformOp};
use crate::foundation::error::{SceneError, SceneResult};
use smallvec::smallvec;

/// Rotation about a vertical axis through `center`, at distance `radius`.
///
/// Angles are in degrees; the current angle goes linearly from `start` to `start + rotate`
/// over `span` seconds.
#[derive(Debug, Clone)]
pub struct CircularAnimation {
    span: f64,
    center: DVec3,
    radius: f64,
    start_deg: f64,
    rotate_deg: f64,
    elapsed: f64,
    state: AnimationState,
}

impl CircularAnimation {
    pub fn new(
        span: f64,
        center: DVec3,
        radius: f64,
        start_deg: f64,
        rotate_deg: f64,
    ) -> SceneResult<Self> {
        if !(span.is_finite() && span > 0.0) {
            return Err(SceneError::animation(format!(
                "circular animation span must be > 0, got {span}"
            )));
        }
        Ok(Self {
            span,
            center,
            radius,
            start_deg,
            rotate_deg,
            elapsed: 0.0,
            state: AnimationState::Idle,
        })
    }

    pub fn span(&self) -> f64 {
        self.span
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Current angle in degrees.
    pub fn angle_deg(&self) -> f64 {
        self.start_deg + self.rotate_deg * self.elapsed / self.span
    }

    pub fn advance(&mut self, dt: f64) {
        if self.state == AnimationState::Finished {
            return;
        }
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.span);
        self.state = if self.elapsed >= self.span {
            AnimationState::Finished
        } else {
            AnimationState::Advancing
        };
    }

    pub fn restart(&mut self) {
        self.elapsed = 0.0;
        self.state = AnimationState::Idle;
    }

    pub fn pose(&self) -> Pose {
        let a = self.angle_deg().to_radians();
        Pose {
            x: self.center.x + self.radius * a.cos(),
            y: self.center.y,
            z: self.center.z - self.radius * a.sin(),
            heading: a,
        }
    }

    pub fn generated_transform(&self) -> GeneratedOps {
        smallvec![
            TransformOp::translate(self.center),
            TransformOp::rotate_degrees(Axis::Y, self.angle_deg()),
            TransformOp::translate(DVec3::new(self.radius, 0.0, 0.0)),
        ]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/circular.rs"]
mod tests;
