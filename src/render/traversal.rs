use crate::foundation::core::{DMat4, DVec3, TransformOp};
use crate::foundation::error::{SceneError, SceneResult};
use crate::foundation::ids::{ComponentIdx, MaterialIdx, PrimitiveIdx, TextureIdx};
use crate::graph::model::{Component, Material, MaterialSlot, Primitive, Texture, TextureSlot};
use crate::graph::table::EntityTable;
use crate::render::backend::{DrawCall, MaterialBinding, Renderer, TextureBinding};

/// Per-frame counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct FrameStats {
    pub nodes_visited: usize,
    pub primitives_drawn: usize,
    /// Deepest component nesting reached; the root is depth 0.
    pub max_depth: usize,
}

#[derive(Debug, Clone, Copy)]
struct ActiveMaterial {
    handle: MaterialIdx,
    list_index: usize,
}

#[derive(Debug, Clone, Copy)]
struct ActiveTexture {
    handle: TextureIdx,
    length_s: f64,
    length_t: f64,
}

/// Immutable tables the traversal reads from.
pub(crate) struct Tables<'g> {
    pub(crate) materials: &'g EntityTable<MaterialIdx, Material>,
    pub(crate) textures: &'g EntityTable<TextureIdx, Texture>,
    pub(crate) primitives: &'g EntityTable<PrimitiveIdx, Primitive>,
}

/// One frame's walk over the component tree.
///
/// Owns the scoped attribute stacks; each visited node pushes onto them on the way down and pops
/// on the way up, so all of them are empty again when the frame completes.
pub(crate) struct Traversal<'g, 'r, R: Renderer + ?Sized> {
    renderer: &'r mut R,
    tables: Tables<'g>,
    dt: f64,
    max_depth: usize,
    matrices: Vec<DMat4>,
    material_stack: Vec<ActiveMaterial>,
    texture_stack: Vec<ActiveTexture>,
    stats: FrameStats,
}

impl<'g, 'r, R: Renderer + ?Sized> Traversal<'g, 'r, R> {
    pub(crate) fn new(renderer: &'r mut R, tables: Tables<'g>, dt: f64, max_depth: usize) -> Self {
        Self {
            renderer,
            tables,
            dt,
            max_depth,
            matrices: vec![DMat4::IDENTITY],
            material_stack: Vec::new(),
            texture_stack: Vec::new(),
            stats: FrameStats::default(),
        }
    }

    pub(crate) fn run(
        mut self,
        components: &mut EntityTable<ComponentIdx, Component>,
        root: ComponentIdx,
    ) -> SceneResult<FrameStats> {
        if let Err(err) = self.visit(components, root, 0, false, 0) {
            self.unwind();
            return Err(err);
        }
        let balanced = self.matrices.len() == 1
            && self.material_stack.is_empty()
            && self.texture_stack.is_empty();
        if !balanced {
            return Err(SceneError::traversal("attribute stacks unbalanced after frame"));
        }
        Ok(self.stats)
    }

    /// Pop every transform state still open after a failed frame, so the renderer can be reused.
    fn unwind(&mut self) {
        while self.matrices.len() > 1 {
            if let Err(err) = self.renderer.pop_transform_state() {
                tracing::warn!(error = %err, open = self.matrices.len() - 1, "unwind aborted");
                break;
            }
            self.matrices.pop();
        }
        self.material_stack.clear();
        self.texture_stack.clear();
    }

    fn visit(
        &mut self,
        components: &mut EntityTable<ComponentIdx, Component>,
        node: ComponentIdx,
        parent_material_index: usize,
        no_texture: bool,
        depth: usize,
    ) -> SceneResult<()> {
        if depth > self.max_depth {
            return Err(SceneError::traversal(format!(
                "component nesting exceeds max_depth {}",
                self.max_depth
            )));
        }
        self.stats.nodes_visited += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);

        let comp = components.get_mut(node).ok_or_else(|| {
            SceneError::traversal(format!("component handle {node:?} does not resolve"))
        })?;
        let generated = comp.animations.step(self.dt);
        let comp: &Component = comp;

        let (pushed_texture, no_texture) = self.enter_texture(comp, no_texture)?;
        let material_index = self.enter_material(comp, parent_material_index)?;

        self.push_transform()?;
        for op in comp.ops.iter().chain(generated.iter().flatten()) {
            self.apply(op)?;
        }

        for &p in &comp.child_primitives {
            self.draw(node, p, no_texture)?;
        }
        let children = comp.child_components.clone();
        for child in children {
            self.visit(components, child, material_index, no_texture, depth + 1)?;
        }

        self.pop_transform()?;
        self.material_stack.pop();
        if pushed_texture {
            self.texture_stack.pop();
        }
        Ok(())
    }

    /// Returns whether an entry was pushed and the "no texture" flag for the subtree.
    fn enter_texture(&mut self, comp: &Component, no_texture: bool) -> SceneResult<(bool, bool)> {
        let tex = comp.texture;
        match tex.slot {
            TextureSlot::Inherit if no_texture => Ok((false, true)),
            TextureSlot::Inherit => {
                let parent = *self.texture_stack.last().ok_or_else(|| {
                    SceneError::traversal(format!(
                        "component '{}' inherits a texture but no ancestor bound one",
                        comp.id
                    ))
                })?;
                // Refine a copy; the ancestor's entry stays as it was.
                let mut own = parent;
                if tex.length_s != 0.0 {
                    own.length_s = tex.length_s;
                }
                if tex.length_t != 0.0 {
                    own.length_t = tex.length_t;
                }
                self.texture_stack.push(own);
                Ok((true, false))
            }
            TextureSlot::None => Ok((false, true)),
            TextureSlot::Texture(handle) => {
                self.texture_stack.push(ActiveTexture {
                    handle,
                    length_s: tex.length_s,
                    length_t: tex.length_t,
                });
                Ok((true, false))
            }
        }
    }

    /// Pushes the resolved material and returns the active list index.
    fn enter_material(&mut self, comp: &Component, parent_index: usize) -> SceneResult<usize> {
        let active = match comp.materials.selected() {
            Some(MaterialSlot::Material(handle)) => ActiveMaterial {
                handle,
                list_index: comp.materials.cursor(),
            },
            Some(MaterialSlot::Inherit) | None => {
                let parent = self.material_stack.last().ok_or_else(|| {
                    SceneError::traversal(format!(
                        "component '{}' inherits a material but has no ancestor",
                        comp.id
                    ))
                })?;
                ActiveMaterial {
                    handle: parent.handle,
                    list_index: parent_index,
                }
            }
        };
        self.material_stack.push(active);
        Ok(active.list_index)
    }

    fn push_transform(&mut self) -> SceneResult<()> {
        self.renderer.push_transform_state()?;
        let top = self.matrices.last().copied().unwrap_or(DMat4::IDENTITY);
        self.matrices.push(top);
        Ok(())
    }

    fn pop_transform(&mut self) -> SceneResult<()> {
        if self.matrices.len() <= 1 {
            return Err(SceneError::traversal("transform stack underflow"));
        }
        self.renderer.pop_transform_state()?;
        self.matrices.pop();
        Ok(())
    }

    fn apply(&mut self, op: &TransformOp) -> SceneResult<()> {
        match *op {
            TransformOp::Translate { x, y, z } => {
                self.renderer.apply_translate(DVec3::new(x, y, z))?
            }
            TransformOp::Scale { x, y, z } => {
                self.renderer.apply_scale(DVec3::new(x, y, z))?
            }
            TransformOp::Rotate { axis, .. } => {
                let a = op.angle_radians().unwrap_or(0.0);
                self.renderer.apply_rotate(a, axis)?
            }
        }
        if let Some(top) = self.matrices.last_mut() {
            *top *= op.to_matrix();
        }
        Ok(())
    }

    fn draw(&mut self, owner: ComponentIdx, p: PrimitiveIdx, no_texture: bool) -> SceneResult<()> {
        let (primitives, materials, textures) = (
            self.tables.primitives,
            self.tables.materials,
            self.tables.textures,
        );
        let prim = primitives.get(p).ok_or_else(|| {
            SceneError::traversal(format!("primitive handle {p:?} does not resolve"))
        })?;
        let active = *self
            .material_stack
            .last()
            .ok_or_else(|| SceneError::traversal("no material bound for primitive"))?;
        let material = materials.get(active.handle).ok_or_else(|| {
            SceneError::traversal(format!("material handle {:?} does not resolve", active.handle))
        })?;

        self.push_transform()?;
        self.renderer.bind_material(&MaterialBinding {
            handle: active.handle,
            material,
            list_index: active.list_index,
        })?;
        match self.texture_stack.last() {
            Some(t) if !no_texture => {
                let texture = textures.get(t.handle).ok_or_else(|| {
                    SceneError::traversal(format!("texture handle {:?} does not resolve", t.handle))
                })?;
                self.renderer.bind_texture(&TextureBinding {
                    handle: t.handle,
                    texture,
                    length_s: t.length_s,
                    length_t: t.length_t,
                })?;
            }
            _ => self.renderer.unbind_texture()?,
        }
        self.renderer.draw_primitive(&DrawCall {
            primitive: p,
            id: &prim.id,
            shape: &prim.shape,
            owner,
        })?;
        self.stats.primitives_drawn += 1;
        self.pop_transform()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/traversal.rs"]
mod tests;
