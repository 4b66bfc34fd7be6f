//! Secondary index between render order and block id.
//!
//! The index is the single source of render order: the store writes each
//! block's `meta.order` from it after every structural change, so the orders of
//! top-level blocks always form the gapless sequence `0..len`.

use std::collections::HashMap;

use crate::block::BlockId;

#[derive(Debug, Clone, Default)]
pub struct OrderIndex {
    /// order -> id
    ids: Vec<BlockId>,

    /// id -> order
    positions: HashMap<BlockId, usize>,
}

impl OrderIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from ids already sorted in render order
    pub fn from_ordered(ids: Vec<BlockId>) -> Self {
        let mut index = Self {
            ids,
            positions: HashMap::new(),
        };
        index.reindex();
        index
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Id of the block rendered at `order`
    pub fn resolve(&self, order: usize) -> Option<&str> {
        self.ids.get(order).map(String::as_str)
    }

    pub fn order_of(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Ids in render order
    pub fn ids(&self) -> &[BlockId] {
        &self.ids
    }

    pub(crate) fn insert(&mut self, at: usize, id: BlockId) {
        self.ids.insert(at, id);
        self.reindex();
    }

    /// Remove every listed id, keeping the survivors in their prior relative order.
    pub(crate) fn remove_all(&mut self, ids: &[BlockId]) {
        self.ids.retain(|id| !ids.contains(id));
        self.reindex();
    }

    pub(crate) fn move_to(&mut self, id: &str, to: usize) -> Option<usize> {
        let from = self.order_of(id)?;
        let id = self.ids.remove(from);
        self.ids.insert(to, id);
        self.reindex();
        Some(from)
    }

    fn reindex(&mut self) {
        self.positions.clear();
        for (order, id) in self.ids.iter().enumerate() {
            self.positions.insert(id.clone(), order);
        }
    }
}
