use super::{
    GraphBuilder, label, req_bool, req_child, req_float, req_id, req_string, rgba, xyz, xyzw,
};
use crate::decl::node::DeclNode;
use crate::foundation::core::{DVec3, Rgba};
use crate::foundation::error::{SceneError, SceneResult};
use crate::graph::diag::Diagnostics;
use crate::graph::model::{Ambient, Light, LightColors, Material, Texture, View};

/// Texture ids with a fixed meaning in component texture selections.
pub(crate) const RESERVED_TEXTURE_IDS: [&str; 2] = ["inherit", "none"];
pub(crate) const RESERVED_MATERIAL_ID: &str = "inherit";

impl GraphBuilder<'_> {
    pub(super) fn parse_views(&mut self, node: &DeclNode) -> SceneResult<()> {
        let default = req_string(node, "default", "views")?;

        for child in &node.children {
            let view = match child.tag.as_str() {
                "perspective" => parse_perspective(child)?,
                "ortho" => parse_ortho(child)?,
                other => {
                    self.diag.warn("views", format!("unknown tag <{other}>"));
                    continue;
                }
            };
            let id = view.id().to_owned();
            self.views.insert(&id, view)?;
        }

        if self.views.is_empty() {
            return Err(SceneError::malformed("at least one view must be defined"));
        }
        self.default_view = Some(self.views.resolve(&default, "views default")?);
        Ok(())
    }

    pub(super) fn parse_ambient(&mut self, node: &DeclNode) {
        let default = self.opts.default_channel;
        for child in &node.children {
            if child.tag != "ambient" && child.tag != "background" {
                self.diag
                    .warn("ambient", format!("unknown tag <{}>", child.tag));
            }
        }
        let colour = |tag: &str, diag: &mut Diagnostics| {
            let path = format!("ambient/{tag}");
            match node.find(tag) {
                Some(n) => rgba(n, &path, default, diag),
                None => {
                    diag.warn(path, format!("<{tag}> missing; assuming {default}"));
                    Rgba::splat(default)
                }
            }
        };
        let ambient = colour("ambient", &mut self.diag);
        let background = colour("background", &mut self.diag);
        self.ambient = Some(Ambient {
            ambient,
            background,
        });
    }

    pub(super) fn parse_lights(&mut self, node: &DeclNode) -> SceneResult<()> {
        for child in &node.children {
            let spot = match child.tag.as_str() {
                "omni" => false,
                "spot" => true,
                other => {
                    self.diag.warn("lights", format!("unknown tag <{other}>"));
                    continue;
                }
            };
            let id = req_id(child, "light")?;
            let ctx = label(&child.tag, &id);
            let enabled = req_bool(child, "enabled", &ctx)?;
            let location = xyzw(req_child(child, "location", &ctx)?, &ctx)?;
            let colors = self.light_colors(child, &id, &ctx)?;

            let light = if spot {
                let angle = req_float(child, "angle", &ctx)?;
                let exponent = req_float(child, "exponent", &ctx)?;
                let target = xyz(req_child(child, "target", &ctx)?, &ctx)?;
                Light::Spot {
                    id: id.clone(),
                    enabled,
                    location,
                    colors,
                    angle,
                    exponent,
                    target,
                }
            } else {
                Light::Omni {
                    id: id.clone(),
                    enabled,
                    location,
                    colors,
                }
            };
            self.lights.insert(&id, light)?;
        }

        if self.lights.is_empty() {
            return Err(SceneError::malformed("at least one light must be defined"));
        }
        Ok(())
    }

    fn light_colors(&mut self, node: &DeclNode, id: &str, ctx: &str) -> SceneResult<LightColors> {
        let default = self.opts.default_channel;
        let mut get = |tag: &str| -> SceneResult<_> {
            let n = req_child(node, tag, ctx)?;
            Ok(rgba(n, &format!("lights/{id}/{tag}"), default, &mut self.diag))
        };
        Ok(LightColors {
            ambient: get("ambient")?,
            diffuse: get("diffuse")?,
            specular: get("specular")?,
        })
    }

    pub(super) fn parse_textures(&mut self, node: &DeclNode) -> SceneResult<()> {
        for child in &node.children {
            if child.tag != "texture" {
                self.diag
                    .warn("textures", format!("unknown tag <{}>", child.tag));
                continue;
            }
            let id = req_id(child, "texture")?;
            if RESERVED_TEXTURE_IDS.contains(&id.as_str()) {
                return Err(SceneError::malformed(format!(
                    "texture id '{id}' is reserved"
                )));
            }
            let file = req_string(child, "file", &label("texture", &id))?;
            self.textures.insert(
                &id,
                Texture {
                    id: id.clone(),
                    file,
                },
            )?;
        }

        if self.textures.is_empty() {
            return Err(SceneError::malformed("at least one texture must be defined"));
        }
        Ok(())
    }

    pub(super) fn parse_materials(&mut self, node: &DeclNode) -> SceneResult<()> {
        let default = self.opts.default_channel;
        for child in &node.children {
            if child.tag != "material" {
                self.diag
                    .warn("materials", format!("unknown tag <{}>", child.tag));
                continue;
            }
            let id = req_id(child, "material")?;
            if id == RESERVED_MATERIAL_ID {
                return Err(SceneError::malformed(format!(
                    "material id '{id}' is reserved"
                )));
            }
            let ctx = label("material", &id);
            let shininess = req_float(child, "shininess", &ctx)?;

            let mut colour = |tag: &str| -> SceneResult<_> {
                let n = req_child(child, tag, &ctx)?;
                Ok(rgba(n, &format!("materials/{id}/{tag}"), default, &mut self.diag))
            };
            let material = Material {
                id: id.clone(),
                shininess,
                emission: colour("emission")?,
                ambient: colour("ambient")?,
                diffuse: colour("diffuse")?,
                specular: colour("specular")?,
            };
            self.materials.insert(&id, material)?;
        }

        if self.materials.is_empty() {
            return Err(SceneError::malformed("at least one material must be defined"));
        }
        Ok(())
    }
}

fn view_frame(node: &DeclNode, ctx: &str) -> SceneResult<(DVec3, DVec3)> {
    if node.children.len() != 2 {
        return Err(SceneError::malformed(format!(
            "{ctx} must have exactly two children, <from> and <to>"
        )));
    }
    let from = xyz(req_child(node, "from", ctx)?, ctx)?;
    let to = xyz(req_child(node, "to", ctx)?, ctx)?;
    Ok((from, to))
}

fn near_far(node: &DeclNode, ctx: &str) -> SceneResult<(f64, f64)> {
    let near = req_float(node, "near", ctx)?;
    let far = req_float(node, "far", ctx)?;
    if near >= far {
        return Err(SceneError::out_of_range(format!(
            "near ({near}) must be smaller than far ({far}) for {ctx}"
        )));
    }
    Ok((near, far))
}

fn parse_perspective(node: &DeclNode) -> SceneResult<View> {
    let id = req_id(node, "perspective view")?;
    let ctx = label("view", &id);
    let (near, far) = near_far(node, &ctx)?;
    let angle = req_float(node, "angle", &ctx)?;
    let (from, to) = view_frame(node, &ctx)?;
    Ok(View::Perspective {
        id,
        near,
        far,
        angle,
        from,
        to,
    })
}

fn parse_ortho(node: &DeclNode) -> SceneResult<View> {
    let id = req_id(node, "ortho view")?;
    let ctx = label("view", &id);
    let (near, far) = near_far(node, &ctx)?;
    let left = req_float(node, "left", &ctx)?;
    let right = req_float(node, "right", &ctx)?;
    let top = req_float(node, "top", &ctx)?;
    let bottom = req_float(node, "bottom", &ctx)?;
    if left >= right {
        return Err(SceneError::out_of_range(format!(
            "left ({left}) must be smaller than right ({right}) for {ctx}"
        )));
    }
    if bottom >= top {
        return Err(SceneError::out_of_range(format!(
            "bottom ({bottom}) must be smaller than top ({top}) for {ctx}"
        )));
    }
    let (from, to) = view_frame(node, &ctx)?;
    Ok(View::Ortho {
        id,
        near,
        far,
        left,
        right,
        top,
        bottom,
        from,
        to,
    })
}
