//! Declaration -> entity tables.
//!
//! Blocks are parsed in a fixed order because later blocks reference earlier ones by id
//! (components reference primitives, primitives reference textures, and so on). The first fatal
//! condition aborts the build; recoverable ones are collected in [`Diagnostics`].

mod assets;
mod components;
mod primitives;
mod templates;

use crate::decl::node::{DeclNode, Declaration};
use crate::foundation::core::{DVec3, DVec4, Rgba};
use crate::foundation::error::{SceneError, SceneResult};
use crate::foundation::ids::{
    AnimationIdx, ComponentIdx, EntityKind, LightIdx, MaterialIdx, PrimitiveIdx, TextureIdx,
    TransformIdx, ViewIdx,
};
use crate::graph::diag::{Diagnostics, Warning};
use crate::graph::model::{
    Ambient, AnimationTemplate, Component, Light, Material, Primitive, SceneMeta, Texture,
    TransformTemplate, View,
};
use crate::graph::opts::GraphOpts;
use crate::graph::scene::SceneGraph;
use crate::graph::table::EntityTable;
use crate::graph::validate;

/// Top-level blocks in their expected document order.
pub(crate) const BLOCKS: [&str; 10] = [
    "scene",
    "views",
    "ambient",
    "lights",
    "textures",
    "materials",
    "transformations",
    "animations",
    "primitives",
    "components",
];

pub(crate) const ROOT_TAG: &str = "yas";

/// Successful build result.
#[derive(Debug)]
pub struct BuildOutput {
    pub graph: SceneGraph,
    /// Recoverable conditions in document order.
    pub warnings: Vec<Warning>,
}

pub(crate) struct GraphBuilder<'o> {
    opts: &'o GraphOpts,
    diag: Diagnostics,

    root_id: Option<String>,
    axis_length: f64,
    views: EntityTable<ViewIdx, View>,
    default_view: Option<ViewIdx>,
    ambient: Option<Ambient>,
    lights: EntityTable<LightIdx, Light>,
    textures: EntityTable<TextureIdx, Texture>,
    materials: EntityTable<MaterialIdx, Material>,
    transforms: EntityTable<TransformIdx, TransformTemplate>,
    animations: EntityTable<AnimationIdx, AnimationTemplate>,
    primitives: EntityTable<PrimitiveIdx, Primitive>,
    components: EntityTable<ComponentIdx, Component>,
    /// Component child references, resolved once every component is known.
    pending_children: Vec<(ComponentIdx, Vec<String>)>,
}

impl<'o> GraphBuilder<'o> {
    pub(crate) fn new(opts: &'o GraphOpts) -> Self {
        Self {
            opts,
            diag: Diagnostics::new(),
            root_id: None,
            axis_length: opts.default_axis_length,
            views: EntityTable::new(EntityKind::View),
            default_view: None,
            ambient: None,
            lights: EntityTable::new(EntityKind::Light),
            textures: EntityTable::new(EntityKind::Texture),
            materials: EntityTable::new(EntityKind::Material),
            transforms: EntityTable::new(EntityKind::Transformation),
            animations: EntityTable::new(EntityKind::Animation),
            primitives: EntityTable::new(EntityKind::Primitive),
            components: EntityTable::new(EntityKind::Component),
            pending_children: Vec::new(),
        }
    }

    pub(crate) fn build(mut self, decl: &Declaration) -> SceneResult<BuildOutput> {
        let root = decl.root();
        if root.tag != ROOT_TAG {
            return Err(SceneError::malformed(format!("root tag <{ROOT_TAG}> missing")));
        }

        for child in &root.children {
            if !BLOCKS.contains(&child.tag.as_str()) {
                self.diag
                    .warn(ROOT_TAG, format!("unknown tag <{}>", child.tag));
            }
        }

        for (expected, tag) in BLOCKS.iter().enumerate() {
            let Some(pos) = root.position(tag) else {
                return Err(SceneError::malformed(format!("tag <{tag}> missing")));
            };
            if pos != expected {
                self.diag.warn(*tag, format!("tag <{tag}> out of order"));
            }
            let block = &root.children[pos];
            match *tag {
                "scene" => self.parse_scene(block)?,
                "views" => self.parse_views(block)?,
                "ambient" => self.parse_ambient(block),
                "lights" => self.parse_lights(block)?,
                "textures" => self.parse_textures(block)?,
                "materials" => self.parse_materials(block)?,
                "transformations" => self.parse_transformations(block)?,
                "animations" => self.parse_animations(block)?,
                "primitives" => self.parse_primitives(block)?,
                _ => self.parse_components(block)?,
            }
            tracing::debug!(block = *tag, "parsed block");
        }

        self.resolve_component_children()?;
        self.finish()
    }

    fn parse_scene(&mut self, node: &DeclNode) -> SceneResult<()> {
        let root = node
            .string("root")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SceneError::malformed("no root defined for scene"))?;
        self.root_id = Some(root.to_owned());

        match node.float("axis_length") {
            Some(v) => self.axis_length = v,
            None => self.diag.warn(
                "scene",
                format!(
                    "unable to parse axis_length; assuming {}",
                    self.opts.default_axis_length
                ),
            ),
        }
        Ok(())
    }

    fn resolve_component_children(&mut self) -> SceneResult<()> {
        for (owner, ids) in std::mem::take(&mut self.pending_children) {
            let owner_id = self.components.id_of(owner).unwrap_or_default().to_owned();
            let from = format!("component '{owner_id}'");
            let mut resolved = Vec::with_capacity(ids.len());
            for id in &ids {
                resolved.push(self.components.resolve(id, &from)?);
            }
            if let Some(c) = self.components.get_mut(owner) {
                c.child_components = resolved;
            }
        }
        Ok(())
    }

    fn finish(self) -> SceneResult<BuildOutput> {
        let root_id = self
            .root_id
            .ok_or_else(|| SceneError::malformed("no root defined for scene"))?;
        let root = self.components.resolve(&root_id, "scene root")?;
        let default_view = self
            .default_view
            .ok_or_else(|| SceneError::malformed("no default view"))?;
        let ambient = self.ambient.unwrap_or(Ambient {
            ambient: Rgba::splat(self.opts.default_channel),
            background: Rgba::splat(self.opts.default_channel),
        });

        validate::check_acyclic(&self.components)?;
        validate::check_root_inheritance(&self.components, root)?;

        let graph = SceneGraph {
            meta: SceneMeta {
                root,
                axis_length: self.axis_length,
            },
            views: self.views,
            default_view,
            ambient,
            lights: self.lights,
            textures: self.textures,
            materials: self.materials,
            transforms: self.transforms,
            animations: self.animations,
            primitives: self.primitives,
            components: self.components,
            opts: self.opts.clone(),
            loaded_ok: true,
        };
        Ok(BuildOutput {
            graph,
            warnings: self.diag.into_warnings(),
        })
    }
}

/// `kind 'id'` label used in messages.
fn label(kind: &str, id: &str) -> String {
    format!("{kind} '{id}'")
}

fn req_id(node: &DeclNode, what: &str) -> SceneResult<String> {
    node.string("id")
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| SceneError::malformed(format!("no id defined for {what}")))
}

fn req_string(node: &DeclNode, attr: &str, ctx: &str) -> SceneResult<String> {
    node.string(attr)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| SceneError::malformed(format!("unable to parse {attr} of {ctx}")))
}

fn req_float(node: &DeclNode, attr: &str, ctx: &str) -> SceneResult<f64> {
    node.float(attr)
        .ok_or_else(|| SceneError::malformed(format!("unable to parse {attr} of {ctx}")))
}

fn req_usize(node: &DeclNode, attr: &str, ctx: &str) -> SceneResult<usize> {
    node.usize(attr)
        .ok_or_else(|| SceneError::malformed(format!("unable to parse {attr} of {ctx}")))
}

fn req_bool(node: &DeclNode, attr: &str, ctx: &str) -> SceneResult<bool> {
    node.boolean(attr)
        .ok_or_else(|| SceneError::malformed(format!("unable to parse {attr} of {ctx}")))
}

fn req_child<'n>(node: &'n DeclNode, tag: &str, ctx: &str) -> SceneResult<&'n DeclNode> {
    node.find(tag)
        .ok_or_else(|| SceneError::malformed(format!("<{tag}> missing in {ctx}")))
}

fn xyz(node: &DeclNode, ctx: &str) -> SceneResult<DVec3> {
    Ok(DVec3::new(
        req_float(node, "x", ctx)?,
        req_float(node, "y", ctx)?,
        req_float(node, "z", ctx)?,
    ))
}

fn xyzw(node: &DeclNode, ctx: &str) -> SceneResult<DVec4> {
    Ok(DVec4::new(
        req_float(node, "x", ctx)?,
        req_float(node, "y", ctx)?,
        req_float(node, "z", ctx)?,
        req_float(node, "w", ctx)?,
    ))
}

/// Colour channels outside `[0, 1]` (or unparseable) fall back to `default` with a warning.
fn rgba(node: &DeclNode, path: &str, default: f64, diag: &mut Diagnostics) -> Rgba {
    let mut channel = |name: &str| match node.float(name) {
        Some(v) if (0.0..=1.0).contains(&v) => v,
        _ => {
            diag.warn(
                path,
                format!("unable to parse {name} value; assuming {default}"),
            );
            default
        }
    };
    let r = channel("r");
    let g = channel("g");
    let b = channel("b");
    let a = channel("a");
    Rgba::new(r, g, b, a)
}

#[cfg(test)]
#[path = "../../../tests/unit/graph/builder/mod.rs"]
mod tests;
