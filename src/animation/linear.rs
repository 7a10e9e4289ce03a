use crate::animation::{AnimationState, GeneratedOps, Pose};
use crate::foundation::core::{Axis, DVec3, TransformOp};
use crate::foundation::error::{SceneError, SceneResult};
use crate::graph::opts::HeadingMode;
use smallvec::smallvec;

const SEGMENT_EPS: f64 = 1e-12;

/// Constant-speed motion along a polyline in the XZ plane.
///
/// Speed is `total_length / span`. Position is integrated from the heading, so with
/// [`HeadingMode::Accumulated`] the path only follows the control points when every turn is a
/// left turn of less than half a revolution.
#[derive(Debug, Clone)]
pub struct LinearAnimation {
    start: DVec3,
    span: f64,
    mode: HeadingMode,
    seg_len: Vec<f64>,
    seg_dir: Vec<(f64, f64)>,
    total: f64,
    initial_heading: f64,

    state: AnimationState,
    segment: usize,
    in_segment: f64,
    last_dir: (f64, f64),
    x: f64,
    z: f64,
    heading: f64,
    travelled: f64,
}

fn angle_between(a: (f64, f64), b: (f64, f64)) -> f64 {
    let na = (a.0 * a.0 + a.1 * a.1).sqrt();
    let nb = (b.0 * b.0 + b.1 * b.1).sqrt();
    let cos = (a.0 * b.0 + a.1 * b.1) / (na * nb);
    cos.clamp(-1.0, 1.0).acos()
}

impl LinearAnimation {
    pub fn new(points: &[DVec3], span: f64, mode: HeadingMode) -> SceneResult<Self> {
        if points.len() < 2 {
            return Err(SceneError::animation(format!(
                "linear animation needs at least 2 control points, got {}",
                points.len()
            )));
        }
        if !(span.is_finite() && span > 0.0) {
            return Err(SceneError::animation(format!(
                "linear animation span must be > 0, got {span}"
            )));
        }

        let mut seg_len = Vec::with_capacity(points.len() - 1);
        let mut seg_dir = Vec::with_capacity(points.len() - 1);
        for w in points.windows(2) {
            let dx = w[1].x - w[0].x;
            let dz = w[1].z - w[0].z;
            seg_len.push((dx * dx + dz * dz).sqrt());
            seg_dir.push((dx, dz));
        }
        let total: f64 = seg_len.iter().sum();
        let Some(first) = seg_len
            .iter()
            .position(|l| *l > SEGMENT_EPS)
            .map(|i| seg_dir[i])
        else {
            return Err(SceneError::animation(
                "linear animation control points have no planar extent",
            ));
        };

        let initial_heading = match mode {
            HeadingMode::Accumulated => angle_between(first, (0.0, 1.0)),
            HeadingMode::Absolute => first.0.atan2(first.1),
        };

        let start = points[0];
        Ok(Self {
            start,
            span,
            mode,
            seg_len,
            seg_dir,
            total,
            initial_heading,
            state: AnimationState::Idle,
            segment: 0,
            in_segment: 0.0,
            last_dir: first,
            x: start.x,
            z: start.z,
            heading: initial_heading,
            travelled: 0.0,
        })
    }

    pub fn span(&self) -> f64 {
        self.span
    }

    pub fn total_length(&self) -> f64 {
        self.total
    }

    /// Planar distance covered so far.
    pub fn travelled(&self) -> f64 {
        self.travelled
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Index of the segment being traversed (equals the segment count once finished).
    pub fn segment(&self) -> usize {
        self.segment
    }

    fn enter_next_segment(&mut self) {
        self.segment += 1;
        self.in_segment = 0.0;
        while self.segment < self.seg_len.len() && self.seg_len[self.segment] <= SEGMENT_EPS {
            self.segment += 1;
        }
        let Some(&dir) = self.seg_dir.get(self.segment) else {
            return;
        };
        match self.mode {
            HeadingMode::Accumulated => self.heading += angle_between(self.last_dir, dir),
            HeadingMode::Absolute => self.heading = dir.0.atan2(dir.1),
        }
        self.last_dir = dir;
    }

    pub fn advance(&mut self, dt: f64) {
        if self.state == AnimationState::Finished {
            return;
        }
        // Leading zero-length segments are skipped silently.
        while self.segment < self.seg_len.len() && self.seg_len[self.segment] <= SEGMENT_EPS {
            self.segment += 1;
        }

        let mut remaining = self.total * dt.max(0.0) / self.span;
        let mut crossed = false;
        while remaining > 0.0 && self.segment < self.seg_len.len() {
            let left = self.seg_len[self.segment] - self.in_segment;
            let step = remaining.min(left);
            self.x += step * self.heading.sin();
            self.z += step * self.heading.cos();
            self.in_segment += step;
            self.travelled += step;
            remaining -= step;
            if self.seg_len[self.segment] - self.in_segment <= SEGMENT_EPS {
                self.enter_next_segment();
                crossed = true;
            }
        }

        self.state = if self.segment >= self.seg_len.len() {
            AnimationState::Finished
        } else if crossed {
            AnimationState::SegmentComplete
        } else {
            AnimationState::Advancing
        };
    }

    pub fn restart(&mut self) {
        self.state = AnimationState::Idle;
        self.segment = 0;
        self.in_segment = 0.0;
        self.x = self.start.x;
        self.z = self.start.z;
        self.heading = self.initial_heading;
        self.travelled = 0.0;
        if let Some(i) = self.seg_len.iter().position(|l| *l > SEGMENT_EPS) {
            self.last_dir = self.seg_dir[i];
        }
    }

    pub fn pose(&self) -> Pose {
        Pose {
            x: self.x,
            y: self.start.y,
            z: self.z,
            heading: self.heading,
        }
    }

    pub fn generated_transform(&self) -> GeneratedOps {
        smallvec![
            TransformOp::translate(DVec3::new(self.x, self.start.y, self.z)),
            TransformOp::rotate_radians(Axis::Y, self.heading),
        ]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/linear.rs"]
mod tests;
