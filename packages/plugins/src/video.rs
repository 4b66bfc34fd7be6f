//! Video embeds.
//!
//! A video is void: the text engine never edits it. Input goes to the
//! block's own custom editor, and Enter on a focused video inserts the
//! default block right after it.

use blockwise_editor::{
    Block, CommandError, Editor, EventContext, InputEvent, InsertOptions, PluginDescriptor,
    Propagation, Renderer, ON_KEY_DOWN,
};
use serde_json::{json, Value};
use tracing::debug;

pub const VIDEO: &str = "video";

/// (width, height)
pub const DEFAULT_VIDEO_SIZE: (u64, u64) = (400, 400);

fn default_size() -> Value {
    json!({ "width": DEFAULT_VIDEO_SIZE.0, "height": DEFAULT_VIDEO_SIZE.1 })
}

pub fn video() -> PluginDescriptor {
    PluginDescriptor::new(VIDEO, || {
        Block::new(VIDEO)
            .with_data("url", Value::Null)
            .with_data("size", default_size())
    })
    .renderer(Renderer::CustomEditor)
    .extend_editor(|methods| {
        methods
            .wrap_is_void(|block, previous| block.block_type == VIDEO || previous(block))
            .wrap_normalize_block(|block, previous| {
                previous(block);
                if block.block_type != VIDEO {
                    return;
                }
                block.data.entry("url").or_insert(Value::Null);
                if !block.data.get("size").is_some_and(Value::is_object) {
                    block.data.insert("size".to_string(), default_size());
                }
            })
    })
    .on(ON_KEY_DOWN, on_key_down)
}

fn on_key_down(
    editor: &mut Editor,
    ctx: &EventContext,
    event: &InputEvent,
) -> Result<Propagation, CommandError> {
    let Some(current) = editor.focused_block() else {
        return Ok(Propagation::Continue);
    };
    if current.block_type != VIDEO || !ctx.hotkeys.is_enter(event) {
        return Ok(Propagation::Continue);
    }

    let at = current.meta.order + 1;
    let id = editor.insert_block(ctx.default_block(), InsertOptions::at(at).focus())?;
    debug!(block_id = %id, at, "Inserted block after video");
    Ok(Propagation::Stop)
}
