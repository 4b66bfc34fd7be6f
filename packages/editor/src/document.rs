//! # Document Store
//!
//! Owns the id-keyed block map and the order index derived from it.
//!
//! All structural primitives (`insert`, `remove`, `move_block`) finish by
//! rewriting `meta.order` from the index, so no caller ever observes a
//! half-shifted document.
//!
//! ```text
//! blocks:  { a1 → Block{order:0}, b7 → Block{order:1} }
//! index:   [a1, b7]          (order → id)
//!          { a1:0, b7:1 }    (id → order)
//! ```

use std::collections::{BTreeMap, HashMap};

use crate::block::{Block, BlockId};
use crate::commands::CommandError;
use crate::order_index::OrderIndex;

/// Full document value: the change payload and the exported layout
pub type DocumentValue = BTreeMap<BlockId, Block>;

#[derive(Debug, Clone, Default)]
pub struct Document {
    blocks: HashMap<BlockId, Block>,
    index: OrderIndex,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an id-keyed block map.
    ///
    /// Blocks are ranked by their stored order (ties broken by id) and then
    /// recompacted, so imported documents with gaps or duplicates are repaired.
    /// A block with an empty id takes its key; any other id must equal its key.
    pub fn from_value(value: DocumentValue) -> Result<Self, CommandError> {
        let mut blocks: HashMap<BlockId, Block> = HashMap::with_capacity(value.len());
        for (key, mut block) in value {
            if block.id.is_empty() {
                block.id = key.clone();
            }
            if block.id != key {
                return Err(CommandError::KeyMismatch { key, id: block.id });
            }
            blocks.insert(key, block);
        }

        let mut ranked: Vec<(usize, BlockId)> = blocks
            .values()
            .map(|block| (block.meta.order, block.id.clone()))
            .collect();
        ranked.sort();

        let mut doc = Self {
            blocks,
            index: OrderIndex::from_ordered(ranked.into_iter().map(|(_, id)| id).collect()),
        };
        doc.sync_orders();
        Ok(doc)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.blocks.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Block> {
        self.blocks.get(id)
    }

    /// Id of the block at `order`
    pub fn resolve(&self, order: usize) -> Option<&str> {
        self.index.resolve(order)
    }

    pub fn order_of(&self, id: &str) -> Option<usize> {
        self.index.order_of(id)
    }

    pub fn block_at(&self, order: usize) -> Option<&Block> {
        self.resolve(order).and_then(|id| self.blocks.get(id))
    }

    /// Blocks in render order
    pub fn blocks_in_order(&self) -> impl Iterator<Item = &Block> + '_ {
        self.index.ids().iter().filter_map(|id| self.blocks.get(id))
    }

    pub fn index(&self) -> &OrderIndex {
        &self.index
    }

    /// Insert `block` at `at`, shifting every block at or after it by one
    pub fn insert(&mut self, mut block: Block, at: usize) -> Result<(), CommandError> {
        if at > self.len() {
            return Err(CommandError::InvalidPath {
                at,
                len: self.len(),
            });
        }
        if self.contains(&block.id) {
            return Err(CommandError::DuplicateBlockId(block.id));
        }

        block.meta.order = at;
        self.index.insert(at, block.id.clone());
        self.blocks.insert(block.id.clone(), block);
        self.sync_orders();
        Ok(())
    }

    /// Remove every listed block that exists and recompact the rest.
    ///
    /// Unknown ids are ignored. Returns the removed blocks in their prior order.
    pub fn remove(&mut self, ids: &[BlockId]) -> Vec<Block> {
        let mut removed: Vec<Block> = ids
            .iter()
            .filter_map(|id| self.blocks.remove(id))
            .collect();
        if removed.is_empty() {
            return removed;
        }

        removed.sort_by_key(|block| block.meta.order);
        self.index.remove_all(ids);
        self.sync_orders();
        removed
    }

    /// Relocate a block to `to`, keeping the same block value
    pub fn move_block(&mut self, id: &str, to: usize) -> Result<(), CommandError> {
        if !self.contains(id) {
            return Err(CommandError::BlockNotFound(id.to_string()));
        }
        if to >= self.len() {
            return Err(CommandError::InvalidPath { at: to, len: self.len() });
        }

        self.index.move_to(id, to);
        self.sync_orders();
        Ok(())
    }

    /// Edit a block's data or children in place.
    ///
    /// The edit runs on a copy; it is committed only if it leaves `id` and
    /// `meta.order` unchanged.
    pub fn update_block<F>(&mut self, id: &str, edit: F) -> Result<(), CommandError>
    where
        F: FnOnce(&mut Block),
    {
        let current = self
            .blocks
            .get(id)
            .ok_or_else(|| CommandError::BlockNotFound(id.to_string()))?;

        let mut next = current.clone();
        edit(&mut next);

        if next.id != current.id {
            return Err(CommandError::ImmutableField("id"));
        }
        if next.meta.order != current.meta.order {
            return Err(CommandError::ImmutableField("order"));
        }

        self.blocks.insert(id.to_string(), next);
        Ok(())
    }

    /// Replace the entire contents
    pub fn replace(&mut self, other: Document) {
        *self = other;
    }

    /// Copy of the full document value
    pub fn snapshot(&self) -> DocumentValue {
        self.blocks
            .iter()
            .map(|(id, block)| (id.clone(), block.clone()))
            .collect()
    }

    /// True when top-level orders are exactly `0..len` and agree with the index
    pub fn is_compact(&self) -> bool {
        if self.blocks.len() != self.index.len() {
            return false;
        }
        self.index
            .ids()
            .iter()
            .enumerate()
            .all(|(order, id)| self.blocks.get(id).map(|b| b.meta.order) == Some(order))
    }

    fn sync_orders(&mut self) {
        for (order, id) in self.index.ids().iter().enumerate() {
            if let Some(block) = self.blocks.get_mut(id) {
                block.meta.order = order;
            }
        }
    }
}
