use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SceneError::malformed("x")
            .to_string()
            .contains("malformed declaration:")
    );
    assert!(
        SceneError::out_of_range("x")
            .to_string()
            .contains("value out of range:")
    );
    assert!(
        SceneError::invalid_enum("x")
            .to_string()
            .contains("invalid enum value:")
    );
    assert!(
        SceneError::traversal("x")
            .to_string()
            .contains("traversal error:")
    );
    assert!(
        SceneError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn identity_errors_name_kind_and_id() {
    let dup = SceneError::duplicate(EntityKind::Material, "wood");
    assert_eq!(dup.to_string(), "duplicate material id 'wood'");

    let unresolved =
        SceneError::unresolved(EntityKind::Primitive, "ball", "component 'table'");
    let msg = unresolved.to_string();
    assert!(msg.contains("unresolved primitive reference 'ball'"));
    assert!(msg.contains("component 'table'"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SceneError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
