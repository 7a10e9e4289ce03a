use super::*;
use crate::graph::opts::GraphOpts;

#[test]
fn parse_op_handles_each_kind() {
    let t = DeclNode::new("translate").attr("x", 1).attr("y", 2).attr("z", 3);
    assert_eq!(
        parse_op(&t, "t").unwrap(),
        Some(TransformOp::translate(DVec3::new(1.0, 2.0, 3.0)))
    );

    let r = DeclNode::new("rotate").attr("axis", "Z").attr("angle", 45);
    assert_eq!(
        parse_op(&r, "t").unwrap(),
        Some(TransformOp::rotate_degrees(Axis::Z, 45.0))
    );

    let s = DeclNode::new("scale").attr("x", 2).attr("y", 2).attr("z", "2");
    assert_eq!(
        parse_op(&s, "t").unwrap(),
        Some(TransformOp::scale(DVec3::splat(2.0)))
    );

    assert_eq!(parse_op(&DeclNode::new("shear"), "t").unwrap(), None);
}

#[test]
fn bad_axis_is_invalid_enum() {
    let r = DeclNode::new("rotate").attr("axis", "q").attr("angle", 45);
    let err = parse_op(&r, "transformation 'spin'").unwrap_err();
    assert!(matches!(err, SceneError::InvalidEnum(_)));
    assert!(err.to_string().contains("'q'"));
    assert!(err.to_string().contains("transformation 'spin'"));
}

#[test]
fn missing_coordinate_is_malformed() {
    let t = DeclNode::new("translate").attr("x", 1).attr("y", 2);
    assert!(matches!(parse_op(&t, "t"), Err(SceneError::Malformed(_))));
}

#[test]
fn triplet_needs_three_numbers() {
    assert_eq!(
        parse_triplet(" 1  2.5 -3 ", "c").unwrap(),
        DVec3::new(1.0, 2.5, -3.0)
    );
    assert!(parse_triplet("1 2", "c").is_err());
    assert!(parse_triplet("1 two 3", "c").is_err());
}

#[test]
fn span_must_be_positive() {
    let node = DeclNode::new("circular").attr("span", 0);
    let err = positive_span(&node, "circular animation 'a'").unwrap_err();
    assert!(matches!(err, SceneError::OutOfRange(_)));
}

#[test]
fn circular_template_reads_all_fields() {
    let node = DeclNode::new("circular")
        .attr("id", "orbit")
        .attr("span", 4)
        .attr("center", "0 1 0")
        .attr("radius", 2)
        .attr("startang", 10)
        .attr("rotang", 180);
    let t = parse_circular(&node).unwrap();
    assert_eq!(
        t,
        AnimationTemplate::Circular {
            id: "orbit".to_owned(),
            span: 4.0,
            center: DVec3::new(0.0, 1.0, 0.0),
            radius: 2.0,
            start_deg: 10.0,
            rotate_deg: 180.0,
        }
    );
}

#[test]
fn linear_template_needs_two_points_and_warns_on_strays() {
    let opts = GraphOpts::default();
    let mut b = GraphBuilder::new(&opts);
    let node = DeclNode::new("linear")
        .attr("id", "walk")
        .attr("span", 2)
        .child(DeclNode::new("controlpoint").attr("x", 0).attr("y", 0).attr("z", 0))
        .child(DeclNode::new("waypoint"));
    assert!(matches!(b.parse_linear(&node), Err(SceneError::Malformed(_))));
    assert_eq!(b.diag.len(), 1);

    let node = node.child(DeclNode::new("controlpoint").attr("x", 1).attr("y", 0).attr("z", 0));
    match b.parse_linear(&node).unwrap() {
        AnimationTemplate::Linear { points, span, .. } => {
            assert_eq!(points.len(), 2);
            assert!((span - 2.0).abs() < 1e-12);
        }
        other => panic!("unexpected template {other:?}"),
    }
}

#[test]
fn transformation_template_needs_an_op() {
    let opts = GraphOpts::default();
    let mut b = GraphBuilder::new(&opts);
    let block = DeclNode::new("transformations")
        .child(DeclNode::new("transformation").attr("id", "empty"));
    assert!(matches!(
        b.parse_transformations(&block),
        Err(SceneError::Malformed(_))
    ));
}
