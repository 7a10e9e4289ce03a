//! Resolved entity records. Cross references are handles into the owning [`super::SceneGraph`]
//! tables; the string ids survive only for messages and reports.

use crate::animation::{Animation, CircularAnimation, ComponentAnimations, LinearAnimation};
use crate::foundation::core::{DVec3, DVec4, Rgba, TransformOp};
use crate::foundation::error::SceneResult;
use crate::foundation::ids::{ComponentIdx, MaterialIdx, PrimitiveIdx, TextureIdx};
use crate::graph::opts::HeadingMode;

/// Global scene metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneMeta {
    pub root: ComponentIdx,
    pub axis_length: f64,
}

/// Camera viewpoint. Camera construction itself happens outside this crate.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Perspective {
        id: String,
        near: f64,
        far: f64,
        angle: f64,
        from: DVec3,
        to: DVec3,
    },
    Ortho {
        id: String,
        near: f64,
        far: f64,
        left: f64,
        right: f64,
        top: f64,
        bottom: f64,
        from: DVec3,
        to: DVec3,
    },
}

impl View {
    pub fn id(&self) -> &str {
        match self {
            Self::Perspective { id, .. } | Self::Ortho { id, .. } => id,
        }
    }
}

/// Global ambient light and clear colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ambient {
    pub ambient: Rgba,
    pub background: Rgba,
}

/// Colour triple shared by both light kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightColors {
    pub ambient: Rgba,
    pub diffuse: Rgba,
    pub specular: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    Omni {
        id: String,
        enabled: bool,
        location: DVec4,
        colors: LightColors,
    },
    Spot {
        id: String,
        enabled: bool,
        location: DVec4,
        colors: LightColors,
        angle: f64,
        exponent: f64,
        target: DVec3,
    },
}

impl Light {
    pub fn id(&self) -> &str {
        match self {
            Self::Omni { id, .. } | Self::Spot { id, .. } => id,
        }
    }

    pub fn enabled(&self) -> bool {
        match self {
            Self::Omni { enabled, .. } | Self::Spot { enabled, .. } => *enabled,
        }
    }
}

/// Texture image reference. The image is loaded by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    pub id: String,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub id: String,
    pub shininess: f64,
    pub emission: Rgba,
    pub ambient: Rgba,
    pub diffuse: Rgba,
    pub specular: Rgba,
}

/// Named, reusable transformation sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformTemplate {
    pub id: String,
    pub ops: Vec<TransformOp>,
}

impl TransformTemplate {
    /// Ops copied into a component that references this template.
    pub fn expand(&self) -> Vec<TransformOp> {
        self.ops.clone()
    }
}

/// Declared animation parameters. Each referencing component gets its own instance.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationTemplate {
    Linear {
        id: String,
        span: f64,
        points: Vec<DVec3>,
    },
    Circular {
        id: String,
        span: f64,
        center: DVec3,
        radius: f64,
        start_deg: f64,
        rotate_deg: f64,
    },
}

impl AnimationTemplate {
    pub fn id(&self) -> &str {
        match self {
            Self::Linear { id, .. } | Self::Circular { id, .. } => id,
        }
    }

    pub fn span(&self) -> f64 {
        match self {
            Self::Linear { span, .. } | Self::Circular { span, .. } => *span,
        }
    }

    pub fn instantiate(&self, mode: HeadingMode) -> SceneResult<Animation> {
        Ok(match self {
            Self::Linear { span, points, .. } => {
                Animation::Linear(LinearAnimation::new(points, *span, mode)?)
            }
            Self::Circular {
                span,
                center,
                radius,
                start_deg,
                rotate_deg,
                ..
            } => Animation::Circular(CircularAnimation::new(
                *span,
                *center,
                *radius,
                *start_deg,
                *rotate_deg,
            )?),
        })
    }
}

/// Shape descriptor. Parameters are validated but never tessellated here.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rectangle {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Triangle {
        p1: DVec3,
        p2: DVec3,
        p3: DVec3,
    },
    Cylinder {
        base: f64,
        top: f64,
        height: f64,
        slices: usize,
        stacks: usize,
    },
    Cylinder2 {
        base: f64,
        top: f64,
        height: f64,
        slices: usize,
        stacks: usize,
    },
    Sphere {
        radius: f64,
        slices: usize,
        stacks: usize,
    },
    Torus {
        inner: f64,
        outer: f64,
        slices: usize,
        loops: usize,
    },
    Plane {
        parts_u: usize,
        parts_v: usize,
    },
    Patch {
        points_u: usize,
        points_v: usize,
        parts_u: usize,
        parts_v: usize,
        control_points: Vec<DVec3>,
    },
    Vehicle,
    Terrain {
        texture: TextureIdx,
        heightmap: TextureIdx,
        parts: usize,
        height_scale: f64,
    },
    Water {
        texture: TextureIdx,
        wavemap: TextureIdx,
        parts: usize,
        height_scale: f64,
        tex_scale: f64,
    },
    Prism {
        slices: usize,
        stacks: usize,
        height: f64,
        radius: f64,
    },
    Board {
        board_texture: TextureIdx,
        cell_texture: TextureIdx,
    },
    Piece,
}

impl Shape {
    /// Declaration tag of this shape.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Rectangle { .. } => "rectangle",
            Self::Triangle { .. } => "triangle",
            Self::Cylinder { .. } => "cylinder",
            Self::Cylinder2 { .. } => "cylinder2",
            Self::Sphere { .. } => "sphere",
            Self::Torus { .. } => "torus",
            Self::Plane { .. } => "plane",
            Self::Patch { .. } => "patch",
            Self::Vehicle => "vehicle",
            Self::Terrain { .. } => "terrain",
            Self::Water { .. } => "water",
            Self::Prism { .. } => "prism",
            Self::Board { .. } => "board",
            Self::Piece => "piece",
        }
    }

    /// Flat shapes whose texture coordinates depend on the bound `length_s/length_t`.
    pub fn uses_tex_lengths(&self) -> bool {
        matches!(self, Self::Rectangle { .. } | Self::Triangle { .. })
    }

    /// Textures the shape binds by itself, regardless of the inherited texture.
    pub fn own_textures(&self) -> Vec<TextureIdx> {
        match self {
            Self::Terrain {
                texture, heightmap, ..
            } => vec![*texture, *heightmap],
            Self::Water {
                texture, wavemap, ..
            } => vec![*texture, *wavemap],
            Self::Board {
                board_texture,
                cell_texture,
            } => vec![*board_texture, *cell_texture],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub id: String,
    pub shape: Shape,
}

/// One entry of a component's material list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialSlot {
    /// Use the nearest ancestor's resolved material.
    Inherit,
    Material(MaterialIdx),
}

/// A component's materials plus the round-robin cursor selecting the active one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MaterialList {
    slots: Vec<MaterialSlot>,
    cursor: usize,
}

impl MaterialList {
    pub fn new(slots: Vec<MaterialSlot>) -> Self {
        Self { slots, cursor: 0 }
    }

    pub fn slots(&self) -> &[MaterialSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Slot under the cursor. An empty list selects nothing and behaves like `Inherit`.
    pub fn selected(&self) -> Option<MaterialSlot> {
        self.slots.get(self.cursor).copied()
    }

    pub fn contains_inherit(&self) -> bool {
        self.slots.contains(&MaterialSlot::Inherit)
    }

    /// Move the cursor to the next slot, wrapping to 0.
    pub fn advance(&mut self) {
        if self.slots.len() <= 1 {
            self.cursor = 0;
            return;
        }
        self.cursor = (self.cursor + 1) % self.slots.len();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSlot {
    /// Reuse the ancestor's texture (refined by this node's lengths).
    Inherit,
    /// Draw this subtree untextured.
    None,
    Texture(TextureIdx),
}

/// A component's texture selection. Zero lengths mean "not set".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureRef {
    pub slot: TextureSlot,
    pub length_s: f64,
    pub length_t: f64,
}

/// Scene-graph node.
#[derive(Debug, Clone)]
pub struct Component {
    pub id: String,
    /// Template-expanded and explicit ops in declaration order.
    pub ops: Vec<TransformOp>,
    pub materials: MaterialList,
    pub texture: TextureRef,
    pub animations: ComponentAnimations,
    pub child_components: Vec<ComponentIdx>,
    pub child_primitives: Vec<PrimitiveIdx>,
}

#[cfg(test)]
#[path = "../../tests/unit/graph/model.rs"]
mod tests;
