use std::sync::Arc;

use super::{EscapeAll, Sanitize, placeholder};
use crate::blocks::SchemaRegistry;
use crate::editing::Document;
use crate::models::Block;
use crate::wire::{self, DeserializationError};

/// Renders documents to display markup.
///
/// Cheap to clone; the registry and sanitizer are shared.
#[derive(Clone)]
pub struct Converter {
    registry: Arc<SchemaRegistry>,
    sanitizer: Arc<dyn Sanitize>,
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl Converter {
    pub fn new(registry: Arc<SchemaRegistry>, sanitizer: impl Sanitize + 'static) -> Self {
        Self {
            registry,
            sanitizer: Arc::new(sanitizer),
        }
    }

    /// Converter that escapes raw HTML instead of sanitizing it
    pub fn escaping(registry: Arc<SchemaRegistry>) -> Self {
        Self::new(registry, EscapeAll)
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    pub fn render_block(&self, block: &Block) -> String {
        if block.data.is_unresolved() {
            return placeholder(block.type_id());
        }
        match self.registry.resolve(block.type_id()) {
            Ok(schema) => schema.render(&block.data, self.sanitizer.as_ref()),
            Err(_) => placeholder(block.type_id()),
        }
    }

    /// Render every block in order, one per line. Blocks with nothing to
    /// show are left out.
    pub fn to_html(&self, document: &Document) -> String {
        document
            .blocks
            .iter()
            .map(|block| self.render_block(block))
            .filter(|html| !html.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Load a stored document and render it
    pub fn wire_to_html(&self, input: &str) -> Result<String, DeserializationError> {
        let loaded = wire::deserialize(&self.registry, input)?;
        Ok(self.to_html(&loaded.document))
    }
}
