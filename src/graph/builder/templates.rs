use super::{GraphBuilder, label, req_float, req_id, req_string, xyz};
use crate::decl::node::DeclNode;
use crate::foundation::core::{Axis, DVec3, TransformOp};
use crate::foundation::error::{SceneError, SceneResult};
use crate::graph::model::{AnimationTemplate, TransformTemplate};

/// Parse one transformation element. `None` when the tag is not a transformation op.
pub(super) fn parse_op(node: &DeclNode, ctx: &str) -> SceneResult<Option<TransformOp>> {
    let op = match node.tag.as_str() {
        "translate" => TransformOp::translate(xyz(node, ctx)?),
        "scale" => TransformOp::scale(xyz(node, ctx)?),
        "rotate" => {
            let raw = node
                .string("axis")
                .ok_or_else(|| SceneError::malformed(format!("unable to parse axis of {ctx}")))?;
            let axis = Axis::parse(raw).map_err(|_| {
                SceneError::invalid_enum(format!("unknown axis '{raw}' in {ctx}"))
            })?;
            TransformOp::rotate_degrees(axis, req_float(node, "angle", ctx)?)
        }
        _ => return Ok(None),
    };
    Ok(Some(op))
}

/// Parse the `"x y z"` attribute form used by circular animation centres.
fn parse_triplet(s: &str, ctx: &str) -> SceneResult<DVec3> {
    let parts: Vec<f64> = s
        .split_whitespace()
        .map(str::parse::<f64>)
        .collect::<Result<_, _>>()
        .map_err(|_| SceneError::malformed(format!("unable to parse center of {ctx}")))?;
    match parts.as_slice() {
        [x, y, z] => Ok(DVec3::new(*x, *y, *z)),
        _ => Err(SceneError::malformed(format!(
            "center of {ctx} must have three components"
        ))),
    }
}

fn positive_span(node: &DeclNode, ctx: &str) -> SceneResult<f64> {
    let span = req_float(node, "span", ctx)?;
    if span <= 0.0 {
        return Err(SceneError::out_of_range(format!(
            "span ({span}) must be positive for {ctx}"
        )));
    }
    Ok(span)
}

impl GraphBuilder<'_> {
    pub(super) fn parse_transformations(&mut self, node: &DeclNode) -> SceneResult<()> {
        for child in &node.children {
            if child.tag != "transformation" {
                self.diag
                    .warn("transformations", format!("unknown tag <{}>", child.tag));
                continue;
            }
            let id = req_id(child, "transformation")?;
            let ctx = label("transformation", &id);
            let mut ops = Vec::with_capacity(child.children.len());
            for op_node in &child.children {
                match parse_op(op_node, &ctx)? {
                    Some(op) => ops.push(op),
                    None => self.diag.warn(
                        format!("transformations/{id}"),
                        format!("unknown tag <{}>", op_node.tag),
                    ),
                }
            }
            if ops.is_empty() {
                return Err(SceneError::malformed(format!(
                    "{ctx} must declare at least one operation"
                )));
            }
            self.transforms.insert(&id, TransformTemplate { id: id.clone(), ops })?;
        }

        if self.transforms.is_empty() {
            return Err(SceneError::malformed(
                "at least one transformation must be defined",
            ));
        }
        Ok(())
    }

    pub(super) fn parse_animations(&mut self, node: &DeclNode) -> SceneResult<()> {
        for child in &node.children {
            let template = match child.tag.as_str() {
                "linear" => self.parse_linear(child)?,
                "circular" => parse_circular(child)?,
                other => {
                    self.diag
                        .warn("animations", format!("unknown tag <{other}>"));
                    continue;
                }
            };
            let id = template.id().to_owned();
            self.animations.insert(&id, template)?;
        }
        Ok(())
    }

    fn parse_linear(&mut self, node: &DeclNode) -> SceneResult<AnimationTemplate> {
        let id = req_id(node, "linear animation")?;
        let ctx = label("linear animation", &id);
        let span = positive_span(node, &ctx)?;

        let mut points = Vec::with_capacity(node.children.len());
        for cp in &node.children {
            if cp.tag != "controlpoint" {
                self.diag.warn(
                    format!("animations/{id}"),
                    format!("unknown tag <{}>", cp.tag),
                );
                continue;
            }
            points.push(xyz(cp, &ctx)?);
        }
        if points.len() < 2 {
            return Err(SceneError::malformed(format!(
                "{ctx} needs at least two control points"
            )));
        }
        Ok(AnimationTemplate::Linear { id, span, points })
    }
}

fn parse_circular(node: &DeclNode) -> SceneResult<AnimationTemplate> {
    let id = req_id(node, "circular animation")?;
    let ctx = label("circular animation", &id);
    let span = positive_span(node, &ctx)?;
    let center = parse_triplet(&req_string(node, "center", &ctx)?, &ctx)?;
    Ok(AnimationTemplate::Circular {
        span,
        center,
        radius: req_float(node, "radius", &ctx)?,
        start_deg: req_float(node, "startang", &ctx)?,
        rotate_deg: req_float(node, "rotang", &ctx)?,
        id,
    })
}

#[cfg(test)]
#[path = "../../../tests/unit/graph/builder/templates.rs"]
mod tests;
