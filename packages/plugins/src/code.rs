//! Code blocks.
//!
//! Highlighting is the renderer's job; the core only guarantees every code
//! block carries a `language`.

use blockwise_editor::{Block, PluginDescriptor};
use serde_json::Value;

pub const CODE: &str = "code";
pub const DEFAULT_LANGUAGE: &str = "javascript";

pub fn code() -> PluginDescriptor {
    PluginDescriptor::new(CODE, || {
        Block::new(CODE)
            .with_data("language", DEFAULT_LANGUAGE)
            .with_data("filename", Value::Null)
    })
    .shortcut("```")
    .extend_editor(|methods| {
        methods.wrap_normalize_block(|block, previous| {
            previous(block);
            if block.block_type != CODE {
                return;
            }
            let missing = !matches!(block.data.get("language"), Some(Value::String(lang)) if !lang.is_empty());
            if missing {
                block
                    .data
                    .insert("language".to_string(), Value::from(DEFAULT_LANGUAGE));
            }
        })
    })
}
