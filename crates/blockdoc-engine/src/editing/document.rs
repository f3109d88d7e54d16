use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::{BlockIssues, Cmd, EditError, Patch, ValidationReport};
use crate::blocks::SchemaRegistry;
use crate::models::{Block, BlockId, DocumentId};

/// An ordered sequence of blocks plus persistence metadata.
///
/// `version` counts successful saves and `updated_at` is the time of the last
/// one. Neither changes while editing.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub blocks: Vec<Block>,
    pub version: u64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Empty, never-saved document
    pub fn new(id: DocumentId) -> Self {
        Self {
            id,
            blocks: Vec::new(),
            version: 0,
            updated_at: None,
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.id == id)
    }

    pub fn position(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| &b.id == id)
    }

    fn require(&self, id: &BlockId) -> Result<usize, EditError> {
        self.position(id)
            .ok_or_else(|| EditError::BlockNotFound(id.clone()))
    }

    /// Apply one command. On error the document is unchanged.
    pub fn apply(&mut self, registry: &SchemaRegistry, cmd: Cmd) -> Result<Patch, EditError> {
        log::debug!("apply {cmd:?} to {}", self.id);
        match cmd {
            Cmd::InsertBlock { type_id, at } => {
                let block = Block::create(registry, &type_id)?;
                let index = at.unwrap_or(self.blocks.len()).min(self.blocks.len());
                let id = block.id.clone();
                self.blocks.insert(index, block);
                Ok(Patch {
                    block: id,
                    index: Some(index),
                })
            }
            Cmd::RemoveBlock { block } => {
                let index = self.require(&block)?;
                self.blocks.remove(index);
                Ok(Patch { block, index: None })
            }
            Cmd::MoveBlock { block, to } => {
                let from = self.require(&block)?;
                let moved = self.blocks.remove(from);
                let to = to.min(self.blocks.len());
                self.blocks.insert(to, moved);
                Ok(Patch {
                    block,
                    index: Some(to),
                })
            }
            Cmd::UpdateBlock { block, patch } => {
                let index = self.require(&block)?;
                self.blocks[index].update(registry, patch)?;
                Ok(Patch {
                    block,
                    index: Some(index),
                })
            }
        }
    }

    pub fn insert_block(
        &mut self,
        registry: &SchemaRegistry,
        type_id: &str,
        at: Option<usize>,
    ) -> Result<Patch, EditError> {
        self.apply(
            registry,
            Cmd::InsertBlock {
                type_id: type_id.to_string(),
                at,
            },
        )
    }

    pub fn remove_block(
        &mut self,
        registry: &SchemaRegistry,
        block: &BlockId,
    ) -> Result<Patch, EditError> {
        self.apply(
            registry,
            Cmd::RemoveBlock {
                block: block.clone(),
            },
        )
    }

    pub fn move_block(
        &mut self,
        registry: &SchemaRegistry,
        block: &BlockId,
        to: usize,
    ) -> Result<Patch, EditError> {
        self.apply(
            registry,
            Cmd::MoveBlock {
                block: block.clone(),
                to,
            },
        )
    }

    pub fn update_block(
        &mut self,
        registry: &SchemaRegistry,
        block: &BlockId,
        patch: Map<String, Value>,
    ) -> Result<Patch, EditError> {
        self.apply(
            registry,
            Cmd::UpdateBlock {
                block: block.clone(),
                patch,
            },
        )
    }

    /// Validate every block in one pass
    pub fn validate(&self, registry: &SchemaRegistry) -> ValidationReport {
        let blocks = self
            .blocks
            .iter()
            .enumerate()
            .filter_map(|(index, block)| {
                let errors = block.validate(registry);
                (!errors.is_empty()).then(|| BlockIssues {
                    block: block.id.clone(),
                    index,
                    type_id: block.type_id().to_string(),
                    errors,
                })
            })
            .collect();
        ValidationReport { blocks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::FieldError;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn registry() -> SchemaRegistry {
        SchemaRegistry::standard()
    }

    fn doc_with(registry: &SchemaRegistry, types: &[&str]) -> Document {
        let mut doc = Document::new(DocumentId::parse("doc").unwrap());
        for type_id in types {
            doc.insert_block(registry, type_id, None).unwrap();
        }
        doc
    }

    fn types(doc: &Document) -> Vec<&str> {
        doc.blocks.iter().map(Block::type_id).collect()
    }

    #[rstest]
    #[case(None, vec!["paragraph", "quote", "code"])]
    #[case(Some(0), vec!["code", "paragraph", "quote"])]
    #[case(Some(1), vec!["paragraph", "code", "quote"])]
    #[case(Some(99), vec!["paragraph", "quote", "code"])]
    fn test_insert_position(
        registry: SchemaRegistry,
        #[case] at: Option<usize>,
        #[case] expected: Vec<&str>,
    ) {
        let mut doc = doc_with(&registry, &["paragraph", "quote"]);
        let patch = doc.insert_block(&registry, "code", at).unwrap();

        assert_eq!(types(&doc), expected);
        assert_eq!(doc.position(&patch.block), patch.index);
    }

    #[rstest]
    #[case(0, vec!["quote", "paragraph", "code", "table"])]
    #[case(2, vec!["paragraph", "code", "quote", "table"])]
    #[case(10, vec!["paragraph", "code", "table", "quote"])]
    fn test_move_preserves_relative_order(
        registry: SchemaRegistry,
        #[case] to: usize,
        #[case] expected: Vec<&str>,
    ) {
        let mut doc = doc_with(&registry, &["paragraph", "quote", "code", "table"]);
        let quote = doc.blocks[1].id.clone();

        let patch = doc.move_block(&registry, &quote, to).unwrap();

        assert_eq!(types(&doc), expected);
        assert_eq!(patch.index, doc.position(&quote));
    }

    #[rstest]
    fn test_remove_block(registry: SchemaRegistry) {
        let mut doc = doc_with(&registry, &["paragraph", "quote", "code"]);
        let quote = doc.blocks[1].id.clone();

        let patch = doc.remove_block(&registry, &quote).unwrap();

        assert_eq!(patch.index, None);
        assert_eq!(types(&doc), vec!["paragraph", "code"]);
        assert!(matches!(
            doc.remove_block(&registry, &quote),
            Err(EditError::BlockNotFound(_))
        ));
    }

    #[rstest]
    fn test_failed_edits_leave_document_unchanged(registry: SchemaRegistry) {
        let mut doc = doc_with(&registry, &["paragraph"]);
        let before = doc.clone();

        assert!(doc.insert_block(&registry, "chart", None).is_err());
        let id = doc.blocks[0].id.clone();
        let patch = json!({"nope": 1}).as_object().cloned().unwrap();
        assert!(doc.update_block(&registry, &id, patch).is_err());

        assert_eq!(doc, before);
    }

    #[rstest]
    fn test_validate_collects_all_blocks(registry: SchemaRegistry) {
        let mut doc = doc_with(&registry, &["paragraph", "process", "roleDefinition"]);
        let role = doc.blocks[2].id.clone();
        let title = json!({"title": "Controller"}).as_object().cloned().unwrap();
        doc.update_block(&registry, &role, title).unwrap();

        let report = doc.validate(&registry);

        assert!(!report.is_valid());
        assert_eq!(report.blocks.len(), 1);
        assert_eq!(report.blocks[0].index, 1);
        assert_eq!(report.blocks[0].type_id, "process");
        assert_eq!(report.blocks[0].errors, vec![FieldError::required("name")]);
    }
}
