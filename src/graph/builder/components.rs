use super::assets::{RESERVED_MATERIAL_ID, RESERVED_TEXTURE_IDS};
use super::templates::parse_op;
use super::{GraphBuilder, label, req_child, req_float, req_id};
use crate::animation::ComponentAnimations;
use crate::decl::node::DeclNode;
use crate::foundation::core::TransformOp;
use crate::foundation::error::{SceneError, SceneResult};
use crate::foundation::ids::PrimitiveIdx;
use crate::graph::model::{Component, MaterialList, MaterialSlot, TextureRef, TextureSlot};

const COMPONENT_CHILDREN: [&str; 5] = [
    "transformation",
    "animations",
    "materials",
    "texture",
    "children",
];

impl GraphBuilder<'_> {
    pub(super) fn parse_components(&mut self, node: &DeclNode) -> SceneResult<()> {
        for child in &node.children {
            if child.tag != "component" {
                self.diag
                    .warn("components", format!("unknown tag <{}>", child.tag));
                continue;
            }
            self.parse_component(child)?;
        }

        if self.components.is_empty() {
            return Err(SceneError::malformed("at least one component must be defined"));
        }
        Ok(())
    }

    fn parse_component(&mut self, node: &DeclNode) -> SceneResult<()> {
        let id = req_id(node, "component")?;
        let ctx = label("component", &id);
        let path = format!("components/{id}");

        for part in &node.children {
            if !COMPONENT_CHILDREN.contains(&part.tag.as_str()) {
                self.diag
                    .warn(path.as_str(), format!("unknown tag <{}>", part.tag));
            }
        }

        let ops = match node.find("transformation") {
            Some(t) => self.component_ops(t, &ctx, &path)?,
            None => Vec::new(),
        };
        let animations = match node.find("animations") {
            Some(a) => self.component_animations(a, &ctx, &path)?,
            None => ComponentAnimations::default(),
        };
        let materials = match node.find("materials") {
            Some(m) => self.component_materials(m, &ctx, &path)?,
            None => MaterialList::default(),
        };
        let texture = self.component_texture(req_child(node, "texture", &ctx)?, &ctx)?;
        let (child_primitives, child_components) =
            self.component_children(req_child(node, "children", &ctx)?, &ctx, &path)?;

        let handle = self.components.insert(
            &id,
            Component {
                id: id.clone(),
                ops,
                materials,
                texture,
                animations,
                child_components: Vec::new(),
                child_primitives,
            },
        )?;
        self.pending_children.push((handle, child_components));
        Ok(())
    }

    /// Template references are expanded in place, mixed freely with explicit ops.
    fn component_ops(
        &mut self,
        node: &DeclNode,
        ctx: &str,
        path: &str,
    ) -> SceneResult<Vec<TransformOp>> {
        let mut ops = Vec::new();
        for op_node in &node.children {
            if op_node.tag == "transformationref" {
                let ref_id = req_id(op_node, &format!("transformationref in {ctx}"))?;
                let h = self.transforms.resolve(&ref_id, ctx)?;
                if let Some(t) = self.transforms.get(h) {
                    ops.extend(t.expand());
                }
                continue;
            }
            match parse_op(op_node, ctx)? {
                Some(op) => ops.push(op),
                None => self.diag.warn(
                    format!("{path}/transformation"),
                    format!("unknown tag <{}>", op_node.tag),
                ),
            }
        }
        Ok(ops)
    }

    fn component_animations(
        &mut self,
        node: &DeclNode,
        ctx: &str,
        path: &str,
    ) -> SceneResult<ComponentAnimations> {
        let mut queue = Vec::new();
        for a in &node.children {
            if a.tag != "animationref" {
                self.diag.warn(
                    format!("{path}/animations"),
                    format!("unknown tag <{}>", a.tag),
                );
                continue;
            }
            let ref_id = req_id(a, &format!("animationref in {ctx}"))?;
            let h = self.animations.resolve(&ref_id, ctx)?;
            if let Some(t) = self.animations.get(h) {
                queue.push(t.instantiate(self.opts.heading_mode)?);
            }
        }
        Ok(ComponentAnimations::new(queue))
    }

    fn component_materials(
        &mut self,
        node: &DeclNode,
        ctx: &str,
        path: &str,
    ) -> SceneResult<MaterialList> {
        let mut slots = Vec::new();
        for m in &node.children {
            if m.tag != "material" {
                self.diag.warn(
                    format!("{path}/materials"),
                    format!("unknown tag <{}>", m.tag),
                );
                continue;
            }
            let ref_id = req_id(m, &format!("material in {ctx}"))?;
            let slot = if ref_id == RESERVED_MATERIAL_ID {
                MaterialSlot::Inherit
            } else {
                MaterialSlot::Material(self.materials.resolve(&ref_id, ctx)?)
            };
            slots.push(slot);
        }
        Ok(MaterialList::new(slots))
    }

    fn component_texture(&self, node: &DeclNode, ctx: &str) -> SceneResult<TextureRef> {
        let ref_id = req_id(node, &format!("texture in {ctx}"))?;
        if RESERVED_TEXTURE_IDS.contains(&ref_id.as_str()) {
            let slot = if ref_id == "inherit" {
                TextureSlot::Inherit
            } else {
                TextureSlot::None
            };
            return Ok(TextureRef {
                slot,
                length_s: node.float("length_s").unwrap_or(0.0),
                length_t: node.float("length_t").unwrap_or(0.0),
            });
        }
        let h = self.textures.resolve(&ref_id, ctx)?;
        let tex_ctx = format!("texture in {ctx}");
        Ok(TextureRef {
            slot: TextureSlot::Texture(h),
            length_s: req_float(node, "length_s", &tex_ctx)?,
            length_t: req_float(node, "length_t", &tex_ctx)?,
        })
    }

    /// Primitive refs resolve immediately; component refs are returned as ids for the second pass.
    fn component_children(
        &mut self,
        node: &DeclNode,
        ctx: &str,
        path: &str,
    ) -> SceneResult<(Vec<PrimitiveIdx>, Vec<String>)> {
        let mut primitives = Vec::new();
        let mut components = Vec::new();
        for c in &node.children {
            match c.tag.as_str() {
                "primitiveref" => {
                    let ref_id = req_id(c, &format!("primitiveref in {ctx}"))?;
                    primitives.push(self.primitives.resolve(&ref_id, ctx)?);
                }
                "componentref" => {
                    components.push(req_id(c, &format!("componentref in {ctx}"))?);
                }
                other => self
                    .diag
                    .warn(format!("{path}/children"), format!("unknown tag <{other}>")),
            }
        }
        Ok((primitives, components))
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/graph/builder/components.rs"]
mod tests;
