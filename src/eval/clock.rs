use std::time::{Duration, Instant};

/// Source of per-frame `dt` in seconds.
///
/// A live clock samples a monotonic [`Instant`] once per frame; a fixed clock returns the same
/// step every time, for deterministic runs.
#[derive(Debug, Clone)]
pub enum FrameClock {
    Live { last: Option<Instant> },
    Fixed { step: f64 },
}

impl FrameClock {
    /// Monotonic clock. The first tick reports zero elapsed time.
    pub fn live() -> Self {
        Self::Live { last: None }
    }

    pub fn fixed(step: f64) -> Self {
        Self::Fixed {
            step: step.max(0.0),
        }
    }

    /// Fixed clock stepping at `fps` frames per second.
    pub fn from_fps(fps: f64) -> Self {
        if fps > 0.0 {
            Self::fixed(1.0 / fps)
        } else {
            Self::fixed(0.0)
        }
    }

    /// Seconds since the previous tick.
    pub fn tick(&mut self) -> f64 {
        match self {
            Self::Fixed { step } => *step,
            Self::Live { last } => {
                let now = Instant::now();
                let dt = last
                    .map(|prev| now.saturating_duration_since(prev))
                    .unwrap_or(Duration::ZERO);
                *last = Some(now);
                dt.as_secs_f64()
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/clock.rs"]
mod tests;
