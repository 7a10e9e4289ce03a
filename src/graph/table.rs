use crate::foundation::error::{SceneError, SceneResult};
use crate::foundation::ids::{EntityKind, Handle};
use std::collections::HashMap;

/// Insertion-ordered arena of named entities, addressed by a typed handle.
///
/// String ids are resolved to handles once while building; everything downstream works on
/// handles only.
#[derive(Debug, Clone)]
pub struct EntityTable<H: Handle, T> {
    kind: EntityKind,
    items: Vec<T>,
    ids: Vec<String>,
    by_id: HashMap<String, H>,
}

impl<H: Handle, T> EntityTable<H, T> {
    pub(crate) fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
            ids: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    /// Add an entity under `id`. Ids are unique per table.
    pub(crate) fn insert(&mut self, id: &str, value: T) -> SceneResult<H> {
        if self.by_id.contains_key(id) {
            return Err(SceneError::duplicate(self.kind, id));
        }
        let slot = u32::try_from(self.items.len())
            .map_err(|_| SceneError::out_of_range(format!("too many {} entries", self.kind)))?;
        let h = H::from_slot(slot);
        self.items.push(value);
        self.ids.push(id.to_owned());
        self.by_id.insert(id.to_owned(), h);
        Ok(h)
    }

    /// Resolve an id to its handle.
    pub fn lookup(&self, id: &str) -> Option<H> {
        self.by_id.get(id).copied()
    }

    /// Resolve an id or fail with an unresolved reference naming `from`.
    pub(crate) fn resolve(&self, id: &str, from: &str) -> SceneResult<H> {
        self.lookup(id)
            .ok_or_else(|| SceneError::unresolved(self.kind, id, from))
    }

    pub fn get(&self, h: H) -> Option<&T> {
        self.items.get(h.slot())
    }

    pub(crate) fn get_mut(&mut self, h: H) -> Option<&mut T> {
        self.items.get_mut(h.slot())
    }

    /// Id the entity was declared with.
    pub fn id_of(&self, h: H) -> Option<&str> {
        self.ids.get(h.slot()).map(String::as_str)
    }

    /// Entities in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (H, &T)> {
        self.items.iter().enumerate().map(|(i, t)| (H::from_slot(i as u32), t))
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/table.rs"]
mod tests;
