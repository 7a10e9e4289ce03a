use crate::foundation::core::{Axis, DMat4, DVec3};
use crate::foundation::error::{SceneError, SceneResult};
use crate::foundation::ids::{ComponentIdx, MaterialIdx, PrimitiveIdx, TextureIdx};
use crate::render::backend::{DrawCall, MaterialBinding, Renderer, TextureBinding};

/// One renderer call, with handles instead of borrowed records.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum RenderCall {
    Push,
    Pop,
    Translate {
        x: f64,
        y: f64,
        z: f64,
    },
    Rotate {
        angle_rad: f64,
        axis: Axis,
    },
    Scale {
        x: f64,
        y: f64,
        z: f64,
    },
    BindMaterial {
        #[serde(skip)]
        handle: MaterialIdx,
        id: String,
        list_index: usize,
    },
    BindTexture {
        #[serde(skip)]
        handle: TextureIdx,
        id: String,
        length_s: f64,
        length_t: f64,
    },
    UnbindTexture,
    Draw {
        #[serde(skip)]
        primitive: PrimitiveIdx,
        #[serde(skip)]
        owner: ComponentIdx,
        id: String,
        shape: &'static str,
        /// Repeat lengths of the bound texture, for shapes that scale texture coordinates by them.
        #[serde(skip_serializing_if = "Option::is_none")]
        tex_lengths: Option<[f64; 2]>,
        /// Textures the shape binds by itself.
        #[serde(skip)]
        own_textures: Vec<TextureIdx>,
        /// Model matrix at the time of the draw, column-major.
        #[serde(skip)]
        transform: DMat4,
    },
}

/// In-memory [`Renderer`] that records every call and mirrors the transform state.
#[derive(Debug, Clone)]
pub struct RecordingRenderer {
    stack: Vec<DMat4>,
    calls: Vec<RenderCall>,
    bound_lengths: Option<[f64; 2]>,
    pushes: usize,
    pops: usize,
    record: bool,
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self {
            stack: vec![DMat4::IDENTITY],
            calls: Vec::new(),
            bound_lengths: None,
            pushes: 0,
            pops: 0,
            record: true,
        }
    }
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the transform bookkeeping and counters but drop the call log.
    pub fn counting_only() -> Self {
        Self {
            record: false,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    /// Draw calls in order.
    pub fn draws(&self) -> impl Iterator<Item = &RenderCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, RenderCall::Draw { .. }))
    }

    pub fn pushes(&self) -> usize {
        self.pushes
    }

    pub fn pops(&self) -> usize {
        self.pops
    }

    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    pub fn current_transform(&self) -> DMat4 {
        self.stack.last().copied().unwrap_or(DMat4::IDENTITY)
    }

    /// Forget recorded calls and counters between frames. The transform state must be balanced.
    pub fn clear(&mut self) {
        self.calls.clear();
        self.pushes = 0;
        self.pops = 0;
    }

    fn log(&mut self, call: RenderCall) {
        if self.record {
            self.calls.push(call);
        }
    }

    fn post_multiply(&mut self, m: DMat4) {
        if let Some(top) = self.stack.last_mut() {
            *top *= m;
        }
    }
}

impl Renderer for RecordingRenderer {
    fn push_transform_state(&mut self) -> SceneResult<()> {
        let top = self.current_transform();
        self.stack.push(top);
        self.pushes += 1;
        self.log(RenderCall::Push);
        Ok(())
    }

    fn pop_transform_state(&mut self) -> SceneResult<()> {
        if self.stack.len() <= 1 {
            return Err(SceneError::traversal("pop_transform_state without matching push"));
        }
        self.stack.pop();
        self.pops += 1;
        self.log(RenderCall::Pop);
        Ok(())
    }

    fn apply_translate(&mut self, v: DVec3) -> SceneResult<()> {
        self.post_multiply(DMat4::from_translation(v));
        self.log(RenderCall::Translate {
            x: v.x,
            y: v.y,
            z: v.z,
        });
        Ok(())
    }

    fn apply_rotate(&mut self, angle_rad: f64, axis: Axis) -> SceneResult<()> {
        let m = match axis {
            Axis::X => DMat4::from_rotation_x(angle_rad),
            Axis::Y => DMat4::from_rotation_y(angle_rad),
            Axis::Z => DMat4::from_rotation_z(angle_rad),
        };
        self.post_multiply(m);
        self.log(RenderCall::Rotate { angle_rad, axis });
        Ok(())
    }

    fn apply_scale(&mut self, v: DVec3) -> SceneResult<()> {
        self.post_multiply(DMat4::from_scale(v));
        self.log(RenderCall::Scale {
            x: v.x,
            y: v.y,
            z: v.z,
        });
        Ok(())
    }

    fn bind_material(&mut self, m: &MaterialBinding<'_>) -> SceneResult<()> {
        self.log(RenderCall::BindMaterial {
            handle: m.handle,
            id: m.material.id.clone(),
            list_index: m.list_index,
        });
        Ok(())
    }

    fn bind_texture(&mut self, t: &TextureBinding<'_>) -> SceneResult<()> {
        self.bound_lengths = Some([t.length_s, t.length_t]);
        self.log(RenderCall::BindTexture {
            handle: t.handle,
            id: t.texture.id.clone(),
            length_s: t.length_s,
            length_t: t.length_t,
        });
        Ok(())
    }

    fn unbind_texture(&mut self) -> SceneResult<()> {
        self.bound_lengths = None;
        self.log(RenderCall::UnbindTexture);
        Ok(())
    }

    fn draw_primitive(&mut self, d: &DrawCall<'_>) -> SceneResult<()> {
        let transform = self.current_transform();
        self.log(RenderCall::Draw {
            primitive: d.primitive,
            owner: d.owner,
            id: d.id.to_owned(),
            shape: d.shape.tag(),
            tex_lengths: self.bound_lengths.filter(|_| d.shape.uses_tex_lengths()),
            own_textures: d.shape.own_textures(),
            transform,
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/recording.rs"]
mod tests;
