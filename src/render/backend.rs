use crate::foundation::core::{Axis, DVec3};
use crate::foundation::error::SceneResult;
use crate::foundation::ids::{ComponentIdx, MaterialIdx, PrimitiveIdx, TextureIdx};
use crate::graph::model::{Material, Shape, Texture};

/// Material resolved for a draw.
#[derive(Clone, Copy, Debug)]
pub struct MaterialBinding<'a> {
    pub handle: MaterialIdx,
    pub material: &'a Material,
    /// Index into the selecting component's material list (the inherited index for `inherit`).
    pub list_index: usize,
}

/// Texture resolved for a draw, with the effective repeat lengths.
#[derive(Clone, Copy, Debug)]
pub struct TextureBinding<'a> {
    pub handle: TextureIdx,
    pub texture: &'a Texture,
    pub length_s: f64,
    pub length_t: f64,
}

/// One primitive to draw under the current transform, material and texture.
#[derive(Clone, Copy, Debug)]
pub struct DrawCall<'a> {
    pub primitive: PrimitiveIdx,
    pub id: &'a str,
    pub shape: &'a Shape,
    /// Component that referenced the primitive.
    pub owner: ComponentIdx,
}

/// Drawing surface driven by the scene traversal.
///
/// Calls arrive strictly nested: every `push_transform_state` is matched by a
/// `pop_transform_state` before the traversal returns, and `apply_*` calls post-multiply the
/// current state.
pub trait Renderer {
    /// Save the current transform state.
    fn push_transform_state(&mut self) -> SceneResult<()>;

    /// Restore the most recently saved transform state.
    fn pop_transform_state(&mut self) -> SceneResult<()>;

    fn apply_translate(&mut self, v: DVec3) -> SceneResult<()>;

    /// Rotate by `angle_rad` radians about a principal axis.
    fn apply_rotate(&mut self, angle_rad: f64, axis: Axis) -> SceneResult<()>;

    fn apply_scale(&mut self, v: DVec3) -> SceneResult<()>;

    fn bind_material(&mut self, m: &MaterialBinding<'_>) -> SceneResult<()>;

    fn bind_texture(&mut self, t: &TextureBinding<'_>) -> SceneResult<()>;

    /// Draw the following primitives untextured.
    fn unbind_texture(&mut self) -> SceneResult<()>;

    fn draw_primitive(&mut self, d: &DrawCall<'_>) -> SceneResult<()>;
}
