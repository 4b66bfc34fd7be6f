//! # Blocks
//!
//! A block is one top-level node of the document: a plugin type, ordering
//! metadata, a plugin-defined data record and either an opaque text-engine
//! subtree or a list of nested child blocks.
//!
//! The serialized layout is the exported document layout:
//!
//! ```json
//! {
//!   "id": "5b0c…",
//!   "type": "paragraph",
//!   "meta": { "order": 0, "depth": 0 },
//!   "data": {},
//!   "children": [{ "text": "hi" }]
//! }
//! ```

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Opaque block identifier
pub type BlockId = String;

/// Plugin-defined payload of a block
pub type BlockData = Map<String, Value>;

/// Attribute carried by every rendered block so a drop point can be hit-tested
/// back to a block id.
pub const BLOCK_ID_ATTRIBUTE: &str = "data-blockwise-block-id";

/// Generate a fresh collision-resistant block id
pub fn generate_id() -> BlockId {
    uuid::Uuid::new_v4().to_string()
}

/// Ordering metadata of a block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockMeta {
    /// Position among siblings (top-level order for document blocks)
    #[serde(default)]
    pub order: usize,

    /// Nesting depth, 0 for top-level blocks
    #[serde(default)]
    pub depth: usize,

    /// Free-form flags (`skipDrag`, ...)
    #[serde(flatten)]
    pub flags: Map<String, Value>,
}

/// Block content: a text-engine subtree or nested child blocks
///
/// The text-engine subtree is never interpreted beyond reading `text` leaves.
/// On import an array is read as nested blocks only when every node carries
/// `id`, `type` and a `meta` object; anything else, the empty array included,
/// stays an opaque subtree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BlockChildren {
    Blocks(Vec<Block>),
    Subtree(Vec<Value>),
}

impl<'de> Deserialize<'de> for BlockChildren {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nodes = Vec::<Value>::deserialize(deserializer)?;
        if nodes.is_empty() || !nodes.iter().all(is_block_value) {
            return Ok(BlockChildren::Subtree(nodes));
        }

        nodes
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Block>, _>>()
            .map(BlockChildren::Blocks)
            .map_err(de::Error::custom)
    }
}

fn is_block_value(node: &Value) -> bool {
    node.as_object().is_some_and(|map| {
        map.get("id").is_some_and(Value::is_string)
            && map.get("type").is_some_and(Value::is_string)
            && map.get("meta").is_some_and(Value::is_object)
    })
}

impl BlockChildren {
    /// A single empty text leaf
    pub fn empty_text() -> Self {
        Self::text("")
    }

    pub fn text(text: impl Into<String>) -> Self {
        let mut leaf = Map::new();
        leaf.insert("text".to_string(), Value::String(text.into()));
        BlockChildren::Subtree(vec![Value::Object(leaf)])
    }

    pub fn is_empty(&self) -> bool {
        match self {
            BlockChildren::Blocks(blocks) => blocks.is_empty(),
            BlockChildren::Subtree(nodes) => nodes.is_empty(),
        }
    }

    /// Reassign local sibling orders `0..k` to nested child blocks.
    ///
    /// Child order is its own namespace and never touches the document order.
    pub fn recompact(&mut self) {
        if let BlockChildren::Blocks(blocks) = self {
            for (ix, child) in blocks.iter_mut().enumerate() {
                child.meta.order = ix;
                child.children.recompact();
            }
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            BlockChildren::Blocks(blocks) => {
                for block in blocks {
                    block.children.collect_text(out);
                }
            }
            BlockChildren::Subtree(nodes) => {
                for node in nodes {
                    collect_value_text(node, out);
                }
            }
        }
    }
}

impl Default for BlockChildren {
    fn default() -> Self {
        Self::empty_text()
    }
}

fn collect_value_text(node: &Value, out: &mut String) {
    match node {
        Value::Object(map) => {
            if let Some(Value::String(text)) = map.get("text") {
                out.push_str(text);
            }
            if let Some(Value::Array(children)) = map.get("children") {
                for child in children {
                    collect_value_text(child, out);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_value_text(item, out);
            }
        }
        _ => {}
    }
}

/// One document-level node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,

    #[serde(rename = "type")]
    pub block_type: String,

    #[serde(default)]
    pub meta: BlockMeta,

    #[serde(default)]
    pub data: BlockData,

    #[serde(default)]
    pub children: BlockChildren,
}

impl Block {
    /// Create a block of `block_type` with a fresh id and one empty text leaf
    pub fn new(block_type: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            block_type: block_type.into(),
            meta: BlockMeta::default(),
            data: BlockData::new(),
            children: BlockChildren::empty_text(),
        }
    }

    pub fn with_id(mut self, id: impl Into<BlockId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_order(mut self, order: usize) -> Self {
        self.meta.order = order;
        self
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.meta.depth = depth;
        self
    }

    pub fn with_flag(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.flags.insert(name.into(), value.into());
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children = BlockChildren::text(text);
        self
    }

    pub fn with_children(mut self, children: BlockChildren) -> Self {
        self.children = children;
        self
    }

    /// Nested child blocks, if this is a composite block
    pub fn child_blocks(&self) -> Option<&[Block]> {
        match &self.children {
            BlockChildren::Blocks(blocks) => Some(blocks),
            BlockChildren::Subtree(_) => None,
        }
    }

    /// Concatenated text of every leaf, nested blocks included
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.children.collect_text(&mut out);
        out
    }

    /// True when the block holds no visible text
    pub fn is_empty_text(&self) -> bool {
        self.plain_text().trim().is_empty()
    }
}

/// Default block used when the editor needs a fresh block and the configured
/// default type has no plugin.
pub fn build_block_data(block_type: impl Into<String>) -> Block {
    Block::new(block_type)
}
