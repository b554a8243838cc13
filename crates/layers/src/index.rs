use std::collections::HashMap;

use network::{LineRef, NodeRef};
use scene::entity::PrimitiveId;

/// Domain entity a render primitive stands for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Node(NodeRef),
    Line(LineRef),
}

/// Append-only association between render primitives and network entities.
///
/// A line owns one primitive per ribbon segment, so the entity side is
/// one-to-many. Reverse lookups return the first registered primitive.
#[derive(Debug, Clone, Default)]
pub struct PrimitiveIndex {
    entries: Vec<(PrimitiveId, EntityRef)>,
    by_primitive: HashMap<PrimitiveId, EntityRef>,
    first_by_entity: HashMap<EntityRef, PrimitiveId>,
}

impl PrimitiveIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, primitive: PrimitiveId, entity: EntityRef) {
        self.entries.push((primitive, entity));
        self.by_primitive.insert(primitive, entity);
        self.first_by_entity.entry(entity).or_insert(primitive);
    }

    /// Entity behind `primitive`; `None` for unregistered or stale handles.
    pub fn entity(&self, primitive: PrimitiveId) -> Option<EntityRef> {
        self.by_primitive.get(&primitive).copied()
    }

    /// First primitive registered for `entity`, in insertion order.
    pub fn primitive_for(&self, entity: EntityRef) -> Option<PrimitiveId> {
        self.first_by_entity.get(&entity).copied()
    }

    pub fn primitives_for(&self, entity: EntityRef) -> impl Iterator<Item = PrimitiveId> + '_ {
        self.entries
            .iter()
            .filter(move |(_, e)| *e == entity)
            .map(|(p, _)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PrimitiveId, EntityRef)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
