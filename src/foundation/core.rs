use crate::foundation::error::{SceneError, SceneResult};

pub use glam::{DMat4, DVec3, DVec4};

/// Principal rotation axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Parse an axis letter. Both cases are accepted.
    pub fn parse(s: &str) -> SceneResult<Self> {
        match s {
            "x" | "X" => Ok(Self::X),
            "y" | "Y" => Ok(Self::Y),
            "z" | "Z" => Ok(Self::Z),
            other => Err(SceneError::invalid_enum(format!(
                "unknown axis '{other}' (expected x, y or z)"
            ))),
        }
    }

    pub fn unit(self) -> DVec3 {
        match self {
            Self::X => DVec3::X,
            Self::Y => DVec3::Y,
            Self::Z => DVec3::Z,
        }
    }
}

/// Straight (non-premultiplied) RGBA colour with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn splat(v: f64) -> Self {
        Self::new(v, v, v, v)
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// One step of a transformation sequence. Sequences apply in order, each op post-multiplying
/// the ambient transform.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TransformOp {
    Translate { x: f64, y: f64, z: f64 },
    Rotate { axis: Axis, angle: f64, radians: bool },
    Scale { x: f64, y: f64, z: f64 },
}

impl TransformOp {
    pub fn translate(v: DVec3) -> Self {
        Self::Translate {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }

    pub fn rotate_degrees(axis: Axis, angle: f64) -> Self {
        Self::Rotate {
            axis,
            angle,
            radians: false,
        }
    }

    pub fn rotate_radians(axis: Axis, angle: f64) -> Self {
        Self::Rotate {
            axis,
            angle,
            radians: true,
        }
    }

    pub fn scale(v: DVec3) -> Self {
        Self::Scale {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }

    /// Rotation angle normalised to radians, `None` for non-rotations.
    pub fn angle_radians(&self) -> Option<f64> {
        match *self {
            Self::Rotate { angle, radians, .. } => Some(if radians {
                angle
            } else {
                angle.to_radians()
            }),
            Self::Translate { .. } | Self::Scale { .. } => None,
        }
    }

    pub fn to_matrix(self) -> DMat4 {
        match self {
            Self::Translate { x, y, z } => DMat4::from_translation(DVec3::new(x, y, z)),
            Self::Scale { x, y, z } => DMat4::from_scale(DVec3::new(x, y, z)),
            Self::Rotate { axis, .. } => {
                let a = self.angle_radians().unwrap_or(0.0);
                match axis {
                    Axis::X => DMat4::from_rotation_x(a),
                    Axis::Y => DMat4::from_rotation_y(a),
                    Axis::Z => DMat4::from_rotation_z(a),
                }
            }
        }
    }
}

/// Fold a sequence into one matrix, in application order.
pub fn compose(ops: &[TransformOp]) -> DMat4 {
    ops.iter()
        .fold(DMat4::IDENTITY, |acc, op| acc * op.to_matrix())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
