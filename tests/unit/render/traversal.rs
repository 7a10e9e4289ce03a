use super::*;
use crate::decl::node::Declaration;
use crate::foundation::core::Axis;
use crate::graph::opts::GraphOpts;
use crate::graph::scene::SceneGraph;
use crate::render::recording::{RecordingRenderer, RenderCall};

fn graph_with(opts: &GraphOpts) -> SceneGraph {
    let decl = Declaration::from_str(include_str!("../../data/scene_full.json")).unwrap();
    SceneGraph::build(&decl, opts).unwrap().graph
}

fn graph() -> SceneGraph {
    graph_with(&GraphOpts::default())
}

/// (primitive, material, texture with lengths) for each draw, in order.
fn resolved(r: &RecordingRenderer) -> Vec<(String, String, Option<(String, f64, f64)>)> {
    let mut out = Vec::new();
    let mut material = String::new();
    let mut texture = None;
    for call in r.calls() {
        match call {
            RenderCall::BindMaterial { id, .. } => material = id.clone(),
            RenderCall::BindTexture {
                id,
                length_s,
                length_t,
                ..
            } => texture = Some((id.clone(), *length_s, *length_t)),
            RenderCall::UnbindTexture => texture = None,
            RenderCall::Draw { id, .. } => {
                out.push((id.clone(), material.clone(), texture.clone()))
            }
            _ => {}
        }
    }
    out
}

fn tex(id: &str, s: f64, t: f64) -> Option<(String, f64, f64)> {
    Some((id.to_owned(), s, t))
}

fn row(
    p: &str,
    m: &str,
    t: Option<(String, f64, f64)>,
) -> (String, String, Option<(String, f64, f64)>) {
    (p.to_owned(), m.to_owned(), t)
}

#[test]
fn attributes_resolve_through_ancestors() {
    let mut g = graph();
    let mut r = RecordingRenderer::new();
    g.display(&mut r, 0.0).unwrap();

    assert_eq!(
        resolved(&r),
        vec![
            row("quad", "matte", tex("wood", 1.0, 1.0)),
            row("ball", "matte", tex("wood", 2.0, 1.0)),
            row("tri", "red", None),
            row("quad", "red", None),
            row("ground", "matte", tex("grass", 3.0, 4.0)),
            row("curve", "matte", tex("grass", 3.0, 4.0)),
            row("game", "matte", tex("grass", 3.0, 4.0)),
            row("car", "shiny", tex("wood", 1.0, 1.0)),
        ]
    );
}

#[test]
fn ticked_materials_flow_to_inheriting_descendants() {
    let mut g = graph();
    g.tick_materials();
    let mut r = RecordingRenderer::new();
    g.display(&mut r, 0.0).unwrap();

    let materials: Vec<_> = resolved(&r).into_iter().map(|(_, m, _)| m).collect();
    assert_eq!(
        materials,
        vec!["shiny", "shiny", "shiny", "shiny", "shiny", "shiny", "shiny", "shiny"]
    );

    // `leg` selects `inherit` at cursor 1, so it reports the inherited index.
    let indices: Vec<_> = r
        .calls()
        .iter()
        .filter_map(|c| match c {
            RenderCall::BindMaterial { list_index, .. } => Some(*list_index),
            _ => None,
        })
        .collect();
    assert_eq!(indices, vec![1, 1, 1, 1, 1, 1, 1, 0]);
}

#[test]
fn material_round_robin_returns_after_n_ticks() {
    let mut g = graph();
    let mut first = RecordingRenderer::new();
    g.display(&mut first, 0.0).unwrap();
    g.tick_materials();
    g.tick_materials();
    let mut again = RecordingRenderer::new();
    g.display(&mut again, 0.0).unwrap();
    assert_eq!(resolved(&first), resolved(&again));
}

#[test]
fn transform_state_is_balanced_after_each_frame() {
    let mut g = graph();
    let mut r = RecordingRenderer::new();
    for _ in 0..3 {
        g.display(&mut r, 0.5).unwrap();
        assert_eq!(r.depth(), 0);
        assert_eq!(r.pushes(), r.pops());
        assert!(r.current_transform().abs_diff_eq(DMat4::IDENTITY, 1e-12));
    }
}

#[test]
fn draws_see_composed_transforms() {
    let mut g = graph();
    let mut r = RecordingRenderer::new();
    g.display(&mut r, 0.0).unwrap();

    let at = |name: &str| {
        r.calls()
            .iter()
            .find_map(|c| match c {
                RenderCall::Draw { id, transform, .. } if id == name => {
                    Some(transform.transform_point3(DVec3::ZERO))
                }
                _ => None,
            })
            .unwrap()
    };
    assert!((at("ball") - DVec3::new(2.0, 1.0, 0.0)).length() < 1e-9);
    assert!((at("car") - DVec3::new(2.0, 0.0, 0.0)).length() < 1e-9);
    assert!((at("ground") - DVec3::new(0.0, -1.0, 0.0)).length() < 1e-9);
}

#[test]
fn animation_ops_do_not_accumulate_across_frames() {
    let mut g = graph();
    let mut a = RecordingRenderer::new();
    g.display(&mut a, 0.0).unwrap();
    let mut b = RecordingRenderer::new();
    g.display(&mut b, 0.0).unwrap();
    assert_eq!(a.calls(), b.calls());

    let orbiter = g.component("orbiter").unwrap();
    assert!(orbiter.ops.is_empty());
}

#[test]
fn orbit_moves_the_car_then_hands_over_to_walk() {
    let mut g = graph();
    let car_position = |r: &RecordingRenderer| {
        r.draws()
            .find_map(|c| match c {
                RenderCall::Draw { id, transform, .. } if id == "car" => {
                    Some(transform.transform_point3(DVec3::ZERO))
                }
                _ => None,
            })
            .unwrap()
    };

    let mut r = RecordingRenderer::new();
    g.display(&mut r, 1.0).unwrap();
    assert!((car_position(&r) - DVec3::new(0.0, 0.0, -2.0)).length() < 1e-9);

    let mut r = RecordingRenderer::new();
    g.display(&mut r, 3.0).unwrap();
    assert_eq!(
        g.component("orbiter").unwrap().animations.current_index(),
        Some(1)
    );

    // Linear `walk` heads along +X first.
    let mut r = RecordingRenderer::new();
    g.display(&mut r, 1.0).unwrap();
    assert!((car_position(&r) - DVec3::new(1.0, 0.0, 0.0)).length() < 1e-9);
    assert!(r.calls().iter().any(|c| matches!(
        c,
        RenderCall::Rotate { axis: Axis::Y, .. }
    )));
}

#[test]
fn depth_guard_fails_the_frame() {
    let opts = GraphOpts {
        max_depth: 2,
        ..GraphOpts::default()
    };
    let mut g = graph_with(&opts);
    let mut r = RecordingRenderer::new();
    let err = g.display(&mut r, 0.0).unwrap_err();
    assert!(matches!(err, SceneError::Traversal(_)));
    assert!(err.to_string().contains("max_depth 2"));
    assert_eq!(r.depth(), 0);
    assert_eq!(r.pushes(), r.pops());

    // the same renderer is usable for the next frame
    let mut ok = graph();
    r.clear();
    ok.display(&mut r, 0.0).unwrap();
    assert_eq!(r.depth(), 0);
}

struct BrokenDevice {
    draws: usize,
    open: usize,
}

impl Renderer for BrokenDevice {
    fn push_transform_state(&mut self) -> SceneResult<()> {
        self.open += 1;
        Ok(())
    }
    fn pop_transform_state(&mut self) -> SceneResult<()> {
        self.open -= 1;
        Ok(())
    }
    fn apply_translate(&mut self, _v: DVec3) -> SceneResult<()> {
        Ok(())
    }
    fn apply_rotate(&mut self, _angle_rad: f64, _axis: Axis) -> SceneResult<()> {
        Ok(())
    }
    fn apply_scale(&mut self, _v: DVec3) -> SceneResult<()> {
        Ok(())
    }
    fn bind_material(&mut self, _m: &MaterialBinding<'_>) -> SceneResult<()> {
        Ok(())
    }
    fn bind_texture(&mut self, _t: &TextureBinding<'_>) -> SceneResult<()> {
        Ok(())
    }
    fn unbind_texture(&mut self) -> SceneResult<()> {
        Ok(())
    }
    fn draw_primitive(&mut self, _d: &DrawCall<'_>) -> SceneResult<()> {
        self.draws += 1;
        if self.draws == 3 {
            return Err(SceneError::Other(anyhow::anyhow!("device lost")));
        }
        Ok(())
    }
}

#[test]
fn renderer_errors_abort_the_frame() {
    let mut g = graph();
    let mut dev = BrokenDevice { draws: 0, open: 0 };
    let err = g.display(&mut dev, 0.0).unwrap_err();
    assert_eq!(err.to_string(), "device lost");
    assert_eq!(dev.draws, 3);
    assert_eq!(dev.open, 0);
}

#[test]
fn dyn_renderer_is_accepted() {
    let mut g = graph();
    let mut r = RecordingRenderer::counting_only();
    let dynr: &mut dyn Renderer = &mut r;
    let stats = g.display(dynr, 0.0).unwrap();
    assert_eq!(stats.primitives_drawn, 8);
    assert!(r.calls().is_empty());
    assert_eq!(r.pushes(), 14);
}

#[test]
fn draws_carry_shape_texture_needs() {
    let mut g = graph();
    let mut r = RecordingRenderer::new();
    g.display(&mut r, 0.0).unwrap();
    let seen: Vec<_> = r
        .draws()
        .filter_map(|c| match c {
            RenderCall::Draw {
                id,
                tex_lengths,
                own_textures,
                ..
            } => Some((id.as_str(), *tex_lengths, own_textures.len())),
            _ => None,
        })
        .collect();
    assert_eq!(
        seen,
        vec![
            ("quad", Some([1.0, 1.0]), 0),
            ("ball", None, 0),
            ("tri", None, 0),
            ("quad", None, 0),
            ("ground", None, 2),
            ("curve", None, 0),
            ("game", None, 2),
            ("car", None, 0),
        ]
    );

    let ground = g.primitives().lookup("ground").unwrap();
    let RenderCall::Draw { own_textures, .. } = r.draws().nth(4).unwrap() else {
        unreachable!()
    };
    assert_eq!(
        own_textures,
        &g.primitives().get(ground).unwrap().shape.own_textures()
    );
}
