use crate::decl::node::Declaration;
use crate::foundation::core::TransformOp;
use crate::foundation::error::{SceneError, SceneResult};
use crate::foundation::ids::{
    AnimationIdx, ComponentIdx, LightIdx, MaterialIdx, PrimitiveIdx, TextureIdx, TransformIdx,
    ViewIdx,
};
use crate::graph::builder::{BuildOutput, GraphBuilder};
use crate::graph::diag::Warning;
use crate::graph::model::{
    Ambient, AnimationTemplate, Component, Light, Material, Primitive, SceneMeta, Texture,
    TransformTemplate, View,
};
use crate::graph::opts::GraphOpts;
use crate::graph::table::EntityTable;
use crate::render::backend::Renderer;
use crate::render::traversal::{FrameStats, Tables, Traversal};

/// Validated, handle-resolved scene.
///
/// Only two things change after the build: material cursors ([`SceneGraph::tick_materials`]) and
/// animation progress (advanced by [`SceneGraph::display`]).
#[derive(Debug)]
pub struct SceneGraph {
    pub(crate) meta: SceneMeta,
    pub(crate) views: EntityTable<ViewIdx, View>,
    pub(crate) default_view: ViewIdx,
    pub(crate) ambient: Ambient,
    pub(crate) lights: EntityTable<LightIdx, Light>,
    pub(crate) textures: EntityTable<TextureIdx, Texture>,
    pub(crate) materials: EntityTable<MaterialIdx, Material>,
    pub(crate) transforms: EntityTable<TransformIdx, TransformTemplate>,
    pub(crate) animations: EntityTable<AnimationIdx, AnimationTemplate>,
    pub(crate) primitives: EntityTable<PrimitiveIdx, Primitive>,
    pub(crate) components: EntityTable<ComponentIdx, Component>,
    pub(crate) opts: GraphOpts,
    pub(crate) loaded_ok: bool,
}

impl SceneGraph {
    /// Build and validate a scene from a declaration.
    #[tracing::instrument(skip(decl, opts))]
    pub fn build(decl: &Declaration, opts: &GraphOpts) -> SceneResult<BuildOutput> {
        let out = GraphBuilder::new(opts).build(decl)?;
        tracing::info!(
            components = out.graph.components.len(),
            primitives = out.graph.primitives.len(),
            warnings = out.warnings.len(),
            "scene graph loaded"
        );
        Ok(out)
    }

    /// Run the full build and keep only the verdict and warnings.
    pub fn validate(decl: &Declaration, opts: &GraphOpts) -> SceneResult<Vec<Warning>> {
        Self::build(decl, opts).map(|out| out.warnings)
    }

    pub fn loaded_ok(&self) -> bool {
        self.loaded_ok
    }

    pub fn root(&self) -> ComponentIdx {
        self.meta.root
    }

    pub fn meta(&self) -> &SceneMeta {
        &self.meta
    }

    pub fn opts(&self) -> &GraphOpts {
        &self.opts
    }

    pub fn default_view(&self) -> Option<&View> {
        self.views.get(self.default_view)
    }

    pub fn views(&self) -> &EntityTable<ViewIdx, View> {
        &self.views
    }

    pub fn ambient(&self) -> &Ambient {
        &self.ambient
    }

    pub fn lights(&self) -> &EntityTable<LightIdx, Light> {
        &self.lights
    }

    pub fn textures(&self) -> &EntityTable<TextureIdx, Texture> {
        &self.textures
    }

    pub fn materials(&self) -> &EntityTable<MaterialIdx, Material> {
        &self.materials
    }

    pub fn transforms(&self) -> &EntityTable<TransformIdx, TransformTemplate> {
        &self.transforms
    }

    pub fn animations(&self) -> &EntityTable<AnimationIdx, AnimationTemplate> {
        &self.animations
    }

    pub fn primitives(&self) -> &EntityTable<PrimitiveIdx, Primitive> {
        &self.primitives
    }

    pub fn components(&self) -> &EntityTable<ComponentIdx, Component> {
        &self.components
    }

    /// Component by declared id.
    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.get(self.components.lookup(id)?)
    }

    /// Ops a `transformationref` to `id` expands to.
    pub fn expand_template(&self, id: &str) -> SceneResult<Vec<TransformOp>> {
        let h = self.transforms.resolve(id, "template expansion")?;
        self.transforms
            .get(h)
            .map(TransformTemplate::expand)
            .ok_or_else(|| SceneError::traversal(format!("template handle {h:?} does not resolve")))
    }

    /// Advance every component's material cursor once.
    pub fn tick_materials(&mut self) {
        for c in self.components.values_mut() {
            c.materials.advance();
        }
        tracing::debug!("material cursors advanced");
    }

    /// Render one frame: advance animations by `dt` seconds and walk the tree from the root.
    #[tracing::instrument(level = "debug", skip(self, renderer))]
    pub fn display<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        dt: f64,
    ) -> SceneResult<FrameStats> {
        if !self.loaded_ok {
            return Err(SceneError::traversal("scene graph is not loaded"));
        }
        let tables = Tables {
            materials: &self.materials,
            textures: &self.textures,
            primitives: &self.primitives,
        };
        Traversal::new(renderer, tables, dt, self.opts.max_depth)
            .run(&mut self.components, self.meta.root)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/scene.rs"]
mod tests;
