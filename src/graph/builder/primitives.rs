use super::{GraphBuilder, label, req_float, req_id, req_string, req_usize, xyz};
use crate::decl::node::DeclNode;
use crate::foundation::core::DVec3;
use crate::foundation::error::{SceneError, SceneResult};
use crate::foundation::ids::TextureIdx;
use crate::graph::model::{Primitive, Shape};

impl GraphBuilder<'_> {
    pub(super) fn parse_primitives(&mut self, node: &DeclNode) -> SceneResult<()> {
        for child in &node.children {
            if child.tag != "primitive" {
                self.diag
                    .warn("primitives", format!("unknown tag <{}>", child.tag));
                continue;
            }
            let id = req_id(child, "primitive")?;
            let ctx = label("primitive", &id);
            let [shape_node] = child.children.as_slice() else {
                return Err(SceneError::malformed(format!(
                    "{ctx} must have exactly one shape, found {}",
                    child.children.len()
                )));
            };
            let shape = self.parse_shape(shape_node, &id, &ctx)?;
            self.primitives.insert(&id, Primitive { id: id.clone(), shape })?;
        }

        if self.primitives.is_empty() {
            return Err(SceneError::malformed("at least one primitive must be defined"));
        }
        Ok(())
    }

    fn texture_attr(&self, node: &DeclNode, attr: &str, ctx: &str) -> SceneResult<TextureIdx> {
        let id = req_string(node, attr, ctx)?;
        self.textures.resolve(&id, ctx)
    }

    fn parse_shape(&mut self, node: &DeclNode, id: &str, ctx: &str) -> SceneResult<Shape> {
        let f = |attr: &str| req_float(node, attr, ctx);
        let n = |attr: &str| req_usize(node, attr, ctx);

        let shape = match node.tag.as_str() {
            "rectangle" => Shape::Rectangle {
                x1: f("x1")?,
                y1: f("y1")?,
                x2: f("x2")?,
                y2: f("y2")?,
            },
            "triangle" => {
                let point = |i: u8| -> SceneResult<DVec3> {
                    Ok(DVec3::new(
                        f(&format!("x{i}"))?,
                        f(&format!("y{i}"))?,
                        f(&format!("z{i}"))?,
                    ))
                };
                Shape::Triangle {
                    p1: point(1)?,
                    p2: point(2)?,
                    p3: point(3)?,
                }
            }
            "cylinder" => Shape::Cylinder {
                base: f("base")?,
                top: f("top")?,
                height: f("height")?,
                slices: n("slices")?,
                stacks: n("stacks")?,
            },
            "cylinder2" => Shape::Cylinder2 {
                base: f("base")?,
                top: f("top")?,
                height: f("height")?,
                slices: n("slices")?,
                stacks: n("stacks")?,
            },
            "sphere" => Shape::Sphere {
                radius: f("radius")?,
                slices: n("slices")?,
                stacks: n("stacks")?,
            },
            "torus" => Shape::Torus {
                inner: f("inner")?,
                outer: f("outer")?,
                slices: n("slices")?,
                loops: n("loops")?,
            },
            "plane" => Shape::Plane {
                parts_u: n("npartsU")?,
                parts_v: n("npartsV")?,
            },
            "patch" => self.parse_patch(node, id, ctx)?,
            "vehicle" => Shape::Vehicle,
            "terrain" => Shape::Terrain {
                texture: self.texture_attr(node, "idTexture", ctx)?,
                heightmap: self.texture_attr(node, "idheightmap", ctx)?,
                parts: n("parts")?,
                height_scale: f("heightscale")?,
            },
            "water" => Shape::Water {
                texture: self.texture_attr(node, "idTexture", ctx)?,
                wavemap: self.texture_attr(node, "idwavemap", ctx)?,
                parts: n("parts")?,
                height_scale: f("heightscale")?,
                tex_scale: f("texscale")?,
            },
            "prism" => Shape::Prism {
                slices: n("slices")?,
                stacks: n("stacks")?,
                height: f("height")?,
                radius: f("radius")?,
            },
            "board" => Shape::Board {
                board_texture: self.texture_attr(node, "boardTextureId", ctx)?,
                cell_texture: self.texture_attr(node, "cellTextureId", ctx)?,
            },
            "piece" => Shape::Piece,
            other => {
                return Err(SceneError::malformed(format!(
                    "unknown shape <{other}> in {ctx}"
                )));
            }
        };
        Ok(shape)
    }

    fn parse_patch(&mut self, node: &DeclNode, id: &str, ctx: &str) -> SceneResult<Shape> {
        let points_u = req_usize(node, "npointsU", ctx)?;
        let points_v = req_usize(node, "npointsV", ctx)?;
        let parts_u = req_usize(node, "npartsU", ctx)?;
        let parts_v = req_usize(node, "npartsV", ctx)?;

        let expected = points_u.checked_mul(points_v).ok_or_else(|| {
            SceneError::malformed(format!(
                "{ctx} has npointsU * npointsV overflowing ({points_u} * {points_v})"
            ))
        })?;

        let mut control_points = Vec::with_capacity(expected.min(node.children.len()));
        for cp in &node.children {
            if cp.tag != "controlpoint" {
                self.diag
                    .warn(format!("primitives/{id}"), format!("unknown tag <{}>", cp.tag));
                continue;
            }
            control_points.push(xyz(cp, ctx)?);
        }
        if control_points.len() != expected {
            return Err(SceneError::malformed(format!(
                "{ctx} has {} control points, expected npointsU * npointsV = {expected}",
                control_points.len(),
            )));
        }
        Ok(Shape::Patch {
            points_u,
            points_v,
            parts_u,
            parts_v,
            control_points,
        })
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/graph/builder/primitives.rs"]
mod tests;
