//! Wire shape of a cross-instance drop.

use blockwise_editor::{Block, BlockId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Content tag listeners filter on
pub const BLOCK_DROPPED: &str = "onBlockDropped";

/// Release point in viewport coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
}

impl Pointer {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropMessage {
    pub message: String,

    /// Id of the block the pointer was released over
    pub id: BlockId,

    /// Snapshot of the dragged block at release time
    pub block: Block,

    #[serde(rename = "clientX")]
    pub client_x: f64,

    #[serde(rename = "clientY")]
    pub client_y: f64,
}

impl DropMessage {
    pub fn new(target: impl Into<BlockId>, block: Block, pointer: Pointer) -> Self {
        Self {
            message: BLOCK_DROPPED.to_string(),
            id: target.into(),
            block,
            client_x: pointer.x,
            client_y: pointer.y,
        }
    }

    pub fn pointer(&self) -> Pointer {
        Pointer::new(self.client_x, self.client_y)
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Decode a channel message.
    ///
    /// `Ok(None)` for messages with some other tag; `Err` when the tag matches
    /// but the payload is malformed.
    pub fn from_value(value: &Value) -> Result<Option<Self>, serde_json::Error> {
        if value.get("message").and_then(Value::as_str) != Some(BLOCK_DROPPED) {
            return Ok(None);
        }
        serde_json::from_value(value.clone()).map(Some)
    }
}
