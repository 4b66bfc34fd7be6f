use blockwise_editor::{Block, PluginDescriptor};

pub const PARAGRAPH: &str = "paragraph";

pub fn paragraph() -> PluginDescriptor {
    PluginDescriptor::new(PARAGRAPH, || Block::new(PARAGRAPH))
}
