use super::*;
use crate::foundation::core::{Axis, DVec3};
use crate::graph::model::{MaterialSlot, Shape, TextureSlot};
use crate::render::recording::RecordingRenderer;

fn full() -> Declaration {
    Declaration::from_str(include_str!("../../data/scene_full.json")).unwrap()
}

fn graph() -> SceneGraph {
    SceneGraph::build(&full(), &GraphOpts::default())
        .unwrap()
        .graph
}

#[test]
fn full_scene_loads_every_block() {
    let out = SceneGraph::build(&full(), &GraphOpts::default()).unwrap();
    assert!(out.warnings.is_empty(), "{:?}", out.warnings);
    let g = out.graph;
    assert!(g.loaded_ok());
    assert_eq!(g.views().len(), 2);
    assert_eq!(g.default_view().map(View::id), Some("cam"));
    assert_eq!(g.lights().len(), 2);
    assert!(!g.lights().iter().nth(1).unwrap().1.enabled());
    assert_eq!(g.textures().len(), 4);
    assert_eq!(g.materials().len(), 3);
    assert_eq!(g.transforms().len(), 2);
    assert_eq!(g.animations().len(), 2);
    assert_eq!(g.primitives().len(), 7);
    assert_eq!(g.components().len(), 6);
    assert_eq!(g.components().id_of(g.root()), Some("world"));
    assert!((g.meta().axis_length - 5.0).abs() < 1e-12);
}

#[test]
fn component_records_are_resolved() {
    let g = graph();
    let table = g.component("table").unwrap();
    assert_eq!(table.materials.slots(), &[MaterialSlot::Inherit]);
    assert_eq!(table.texture.slot, TextureSlot::Inherit);
    assert!((table.texture.length_s - 2.0).abs() < 1e-12);
    assert_eq!(table.texture.length_t, 0.0);
    assert_eq!(table.ops.len(), 3);

    let leg = g.component("leg").unwrap();
    assert_eq!(leg.texture.slot, TextureSlot::None);
    assert_eq!(leg.ops, vec![TransformOp::rotate_degrees(Axis::X, 90.0)]);

    let orbiter = g.component("orbiter").unwrap();
    assert_eq!(orbiter.animations.len(), 2);

    let world = g.component("world").unwrap();
    let kids: Vec<_> = world
        .child_components
        .iter()
        .filter_map(|&h| g.components().id_of(h))
        .collect();
    assert_eq!(kids, vec!["table", "plain", "orbiter"]);
}

#[test]
fn template_expansion_matches_template_ops() {
    let g = graph();
    let lift = g.expand_template("lift").unwrap();
    assert_eq!(
        lift,
        vec![
            TransformOp::translate(DVec3::new(0.0, 1.0, 0.0)),
            TransformOp::scale(DVec3::splat(2.0)),
        ]
    );
    assert_eq!(g.component("table").unwrap().ops[..2], lift[..]);
    assert!(g.expand_template("missing").is_err());
}

#[test]
fn shapes_keep_their_parameters() {
    let g = graph();
    let h = g.primitives().lookup("curve").unwrap();
    match &g.primitives().get(h).unwrap().shape {
        Shape::Patch {
            points_u,
            points_v,
            control_points,
            ..
        } => {
            assert_eq!(points_u * points_v, control_points.len());
        }
        other => panic!("unexpected shape {other:?}"),
    }
}

#[test]
fn validate_is_idempotent() {
    let decl = full();
    let opts = GraphOpts::default();
    let first = SceneGraph::validate(&decl, &opts).unwrap();
    let second = SceneGraph::validate(&decl, &opts).unwrap();
    assert_eq!(first, second);

    let mut root = decl.root().clone();
    root.children.swap(0, 1);
    let shuffled = Declaration::new(root);
    let a = SceneGraph::validate(&shuffled, &opts).unwrap();
    let b = SceneGraph::validate(&shuffled, &opts).unwrap();
    assert_eq!(a.len(), 2);
    assert_eq!(a, b);

    let bad = Declaration::from_str(include_str!("../../data/bad_view.json")).unwrap();
    let e1 = SceneGraph::validate(&bad, &opts).unwrap_err().to_string();
    let e2 = SceneGraph::validate(&bad, &opts).unwrap_err().to_string();
    assert_eq!(e1, e2);
}

#[test]
fn tick_materials_cycles_every_component_once() {
    let mut g = graph();
    let cursor = |g: &SceneGraph, id: &str| g.component(id).unwrap().materials.cursor();
    assert_eq!(cursor(&g, "world"), 0);

    g.tick_materials();
    assert_eq!(cursor(&g, "world"), 1);
    assert_eq!(cursor(&g, "leg"), 1);
    assert_eq!(cursor(&g, "orbiter"), 0);
    assert_eq!(cursor(&g, "plain"), 0);

    g.tick_materials();
    assert_eq!(cursor(&g, "world"), 0);
    assert_eq!(cursor(&g, "leg"), 0);
}

#[test]
fn display_reports_frame_stats() {
    let mut g = graph();
    let mut r = RecordingRenderer::new();
    let stats = g.display(&mut r, 0.0).unwrap();
    assert_eq!(stats.nodes_visited, 6);
    assert_eq!(stats.primitives_drawn, 8);
    assert_eq!(stats.max_depth, 3);
    assert_eq!(r.pushes(), 14);
    assert_eq!(r.pops(), 14);
}

#[test]
fn display_on_unloaded_graph_fails() {
    let mut g = graph();
    g.loaded_ok = false;
    let err = g.display(&mut RecordingRenderer::new(), 0.0).unwrap_err();
    assert!(matches!(err, SceneError::Traversal(_)));
}
