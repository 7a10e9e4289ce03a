//! Time-based motion attached to components.
//!
//! Animations are instantiated per referencing component from the declared templates, so two
//! components naming the same template never share progress.

pub(crate) mod circular;
pub(crate) mod linear;

use crate::foundation::core::TransformOp;
use smallvec::SmallVec;

pub use circular::CircularAnimation;
pub use linear::LinearAnimation;

/// Transform ops produced by an animation for one frame. Never stored on the component.
pub type GeneratedOps = SmallVec<[TransformOp; 3]>;

/// Progress of one animation instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationState {
    /// Not advanced yet.
    Idle,
    /// Moving inside a segment.
    Advancing,
    /// A segment boundary was crossed during the last advance and more segments remain.
    SegmentComplete,
    /// Terminal. Further advances are no-ops and the pose is frozen.
    Finished,
}

/// Position and heading (radians, about +Y) of an animated node.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub heading: f64,
}

/// Closed set of supported motions.
#[derive(Debug, Clone)]
pub enum Animation {
    Linear(LinearAnimation),
    Circular(CircularAnimation),
}

impl Animation {
    /// Move forward by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        match self {
            Self::Linear(a) => a.advance(dt),
            Self::Circular(a) => a.advance(dt),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state() == AnimationState::Finished
    }

    pub fn state(&self) -> AnimationState {
        match self {
            Self::Linear(a) => a.state(),
            Self::Circular(a) => a.state(),
        }
    }

    /// Back to `Idle` with the initial pose.
    pub fn restart(&mut self) {
        match self {
            Self::Linear(a) => a.restart(),
            Self::Circular(a) => a.restart(),
        }
    }

    pub fn pose(&self) -> Pose {
        match self {
            Self::Linear(a) => a.pose(),
            Self::Circular(a) => a.pose(),
        }
    }

    /// Ops to append after the component's own transformation for the current pose.
    pub fn generated_transform(&self) -> GeneratedOps {
        match self {
            Self::Linear(a) => a.generated_transform(),
            Self::Circular(a) => a.generated_transform(),
        }
    }
}

/// A component's animations, played one after another.
#[derive(Debug, Clone, Default)]
pub struct ComponentAnimations {
    queue: Vec<Animation>,
    current: Option<usize>,
}

impl ComponentAnimations {
    pub fn new(queue: Vec<Animation>) -> Self {
        let current = if queue.is_empty() { None } else { Some(0) };
        Self { queue, current }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Index of the animation currently driving the pose.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Animation> {
        self.queue.get(self.current?)
    }

    /// Advance the playing animation and return its ops for this frame.
    ///
    /// When it finishes and another one is queued, it is restarted and the queue moves on; the
    /// frame still uses the finished pose. The last animation stays finished.
    pub fn step(&mut self, dt: f64) -> Option<GeneratedOps> {
        let idx = self.current?;
        let has_next = idx + 1 < self.queue.len();
        let anim = self.queue.get_mut(idx)?;
        anim.advance(dt);
        let ops = anim.generated_transform();
        if anim.is_finished() && has_next {
            anim.restart();
            self.current = Some(idx + 1);
        }
        Some(ops)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/mod.rs"]
mod tests;
