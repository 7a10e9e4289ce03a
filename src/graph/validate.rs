use crate::foundation::error::{SceneError, SceneResult};
use crate::foundation::ids::{ComponentIdx, Handle};
use crate::graph::model::{Component, TextureSlot};
use crate::graph::table::EntityTable;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

/// Reject component reference cycles. The error names the cycle, e.g. `a -> b -> a`.
///
/// Iterative DFS: reference chains come from a flat list, so their depth is unbounded.
pub(crate) fn check_acyclic(components: &EntityTable<ComponentIdx, Component>) -> SceneResult<()> {
    let mut marks = vec![Mark::Unvisited; components.len()];
    // (component, index of the next child to look at)
    let mut stack: Vec<(ComponentIdx, usize)> = Vec::new();

    for (start, _) in components.iter() {
        if marks[start.slot()] != Mark::Unvisited {
            continue;
        }
        marks[start.slot()] = Mark::OnStack;
        stack.push((start, 0));

        while let Some(top) = stack.last_mut() {
            let h = top.0;
            let children = components
                .get(h)
                .map(|c| c.child_components.as_slice())
                .unwrap_or_default();
            let Some(&child) = children.get(top.1) else {
                marks[h.slot()] = Mark::Done;
                stack.pop();
                continue;
            };
            top.1 += 1;

            match marks.get(child.slot()).copied() {
                Some(Mark::Unvisited) => {
                    marks[child.slot()] = Mark::OnStack;
                    stack.push((child, 0));
                }
                Some(Mark::OnStack) => return Err(cycle_error(components, &stack, child)),
                Some(Mark::Done) => {}
                None => {
                    return Err(SceneError::malformed(format!(
                        "dangling component handle {child:?}"
                    )));
                }
            }
        }
    }
    Ok(())
}

fn cycle_error(
    components: &EntityTable<ComponentIdx, Component>,
    stack: &[(ComponentIdx, usize)],
    back_edge: ComponentIdx,
) -> SceneError {
    let start = stack.iter().position(|&(s, _)| s == back_edge).unwrap_or(0);
    let mut names: Vec<&str> = stack[start..]
        .iter()
        .map(|&(s, _)| components.id_of(s).unwrap_or("?"))
        .collect();
    names.push(components.id_of(back_edge).unwrap_or("?"));
    SceneError::malformed(format!("component reference cycle: {}", names.join(" -> ")))
}

/// The root has no ancestor to inherit from, so it must pick a concrete material and texture.
pub(crate) fn check_root_inheritance(
    components: &EntityTable<ComponentIdx, Component>,
    root: ComponentIdx,
) -> SceneResult<()> {
    let c = components
        .get(root)
        .ok_or_else(|| SceneError::malformed("root component handle does not resolve"))?;
    if c.materials.is_empty() || c.materials.contains_inherit() {
        return Err(SceneError::malformed(format!(
            "root component '{}' cannot inherit its material",
            c.id
        )));
    }
    if c.texture.slot == TextureSlot::Inherit {
        return Err(SceneError::malformed(format!(
            "root component '{}' cannot inherit its texture",
            c.id
        )));
    }
    Ok(())
}
