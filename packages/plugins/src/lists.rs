//! Bulleted lists.
//!
//! A `bulleted-list` block nests `list-item` blocks. The list itself is not
//! draggable; the UI reads the `skipDrag` flag from its meta.

use blockwise_editor::{Block, BlockChildren, PluginDescriptor};

pub const BULLETED_LIST: &str = "bulleted-list";
pub const LIST_ITEM: &str = "list-item";
pub const SKIP_DRAG: &str = "skipDrag";

pub fn list_item() -> PluginDescriptor {
    PluginDescriptor::new(LIST_ITEM, || Block::new(LIST_ITEM).with_depth(1))
}

pub fn bulleted_list() -> PluginDescriptor {
    PluginDescriptor::new(BULLETED_LIST, || {
        Block::new(BULLETED_LIST)
            .with_flag(SKIP_DRAG, true)
            .with_children(BlockChildren::Blocks(Vec::new()))
    })
    .shortcut("-")
    .child_plugin(list_item())
    .create_element(|plugin, from| {
        // The converted block's text becomes the first item
        let mut list = plugin.define_element();
        if let (BlockChildren::Blocks(items), BlockChildren::Subtree(_)) =
            (&mut list.children, &from.children)
        {
            if let Some(first) = items.first_mut() {
                first.children = from.children.clone();
            }
        }
        list
    })
}
