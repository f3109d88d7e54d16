use std::collections::HashMap;

use serde_json::Value;

use super::kinds::*;
use super::{BlockData, BlockKind, FieldError, Form};
use crate::render::Sanitize;

/// Raised when a type id has no registered schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown block type `{0}`")]
pub struct UnknownBlockType(pub String);

/// Everything the engine knows about one block type.
///
/// Schemas are built from a [`BlockKind`] implementation and only hold
/// function pointers, so a registry can be shared freely between threads.
#[derive(Clone, Copy)]
pub struct BlockSchema {
    type_id: &'static str,
    label: &'static str,
    family: Option<&'static str>,
    default_data: fn() -> BlockData,
    decode: fn(Value) -> Result<BlockData, serde_json::Error>,
}

impl std::fmt::Debug for BlockSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockSchema")
            .field("type_id", &self.type_id)
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

fn default_of<K: BlockKind>() -> BlockData {
    K::default().into()
}

fn decode_as<K: BlockKind>(value: Value) -> Result<BlockData, serde_json::Error> {
    // Records written without a payload decode to the defaults
    let value = match value {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value::<K>(value).map(Into::into)
}

impl BlockSchema {
    pub fn of<K: BlockKind>() -> Self {
        Self {
            type_id: K::TYPE_ID,
            label: K::LABEL,
            family: K::FAMILY,
            default_data: default_of::<K>,
            decode: decode_as::<K>,
        }
    }

    pub fn type_id(&self) -> &'static str {
        self.type_id
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Style-contract class shared by every block of this type
    pub fn family(&self) -> Option<&'static str> {
        self.family
    }

    pub fn default_data(&self) -> BlockData {
        (self.default_data)()
    }

    /// Decode a wire `data` payload. Missing fields take their defaults.
    pub fn decode(&self, value: Value) -> Result<BlockData, serde_json::Error> {
        (self.decode)(value)
    }

    /// Names of the payload fields accepted by `Block::update`
    pub fn field_names(&self) -> Vec<String> {
        match self.default_data().to_value() {
            Ok(Value::Object(map)) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    fn owns(&self, data: &BlockData) -> bool {
        !data.is_unresolved() && data.type_id() == self.type_id
    }

    pub fn validate(&self, data: &BlockData) -> Vec<FieldError> {
        if self.owns(data) || data.is_unresolved() {
            data.validate()
        } else {
            vec![FieldError::new(
                "type",
                format!("expected `{}` data, got `{}`", self.type_id, data.type_id()),
            )]
        }
    }

    pub fn render(&self, data: &BlockData, sanitizer: &dyn Sanitize) -> String {
        if self.owns(data) {
            data.render(sanitizer)
        } else {
            crate::render::placeholder(data.type_id())
        }
    }

    pub fn render_editable(&self, data: &BlockData) -> Form {
        data.form()
    }
}

/// The set of block types a process accepts.
///
/// Built once at startup and shared read-only, typically as
/// `Arc<SchemaRegistry>`.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: Vec<BlockSchema>,
    index: HashMap<String, usize>,
}

impl SchemaRegistry {
    /// Registry with no types; add them with [`SchemaRegistry::register`]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every built-in content and business block, plus legacy aliases
    pub fn standard() -> Self {
        Self::empty()
            .register::<Paragraph>()
            .register::<Header>()
            .register::<List>()
            .register::<Quote>()
            .register::<Delimiter>()
            .register::<Table>()
            .register::<Code>()
            .register::<Raw>()
            .register::<Embed>()
            .register::<Image>()
            .register::<LinkTool>()
            .register::<Process>()
            .register::<ControlMatrix>()
            .register::<RoleDefinition>()
            .register::<MaturityModel>()
            .register::<ProcessFlow>()
            .alias("businessProcess", Process::TYPE_ID)
    }

    pub fn register<K: BlockKind>(mut self) -> Self {
        let schema = BlockSchema::of::<K>();
        match self.index.get(schema.type_id) {
            Some(&i) => self.schemas[i] = schema,
            None => {
                self.index.insert(schema.type_id.to_string(), self.schemas.len());
                self.schemas.push(schema);
            }
        }
        self
    }

    /// Accept `legacy` on load as another name for the registered `target`.
    /// Aliased records are written back under the target id.
    pub fn alias(mut self, legacy: &str, target: &str) -> Self {
        if let Some(&i) = self.index.get(target) {
            self.index.insert(legacy.to_string(), i);
        }
        self
    }

    pub fn resolve(&self, type_id: &str) -> Result<&BlockSchema, UnknownBlockType> {
        self.index
            .get(type_id)
            .map(|&i| &self.schemas[i])
            .ok_or_else(|| UnknownBlockType(type_id.to_string()))
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.index.contains_key(type_id)
    }

    /// Canonical type ids in registration order
    pub fn type_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.schemas.iter().map(BlockSchema::type_id)
    }

    pub fn schemas(&self) -> impl Iterator<Item = &BlockSchema> {
        self.schemas.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::EscapeAll;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_standard_registry_lists_every_type() {
        let registry = SchemaRegistry::standard();
        let ids: Vec<_> = registry.type_ids().collect();
        assert_eq!(
            ids,
            vec![
                "paragraph",
                "header",
                "list",
                "quote",
                "delimiter",
                "table",
                "code",
                "raw",
                "embed",
                "image",
                "linkTool",
                "process",
                "controlMatrix",
                "roleDefinition",
                "maturityModel",
                "processFlow",
            ]
        );
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        let registry = SchemaRegistry::standard();
        assert_eq!(
            registry.resolve("chart").unwrap_err(),
            UnknownBlockType("chart".to_string())
        );
    }

    #[test]
    fn test_legacy_alias_resolves_to_process() {
        let registry = SchemaRegistry::standard();
        let schema = registry.resolve("businessProcess").unwrap();
        assert_eq!(schema.type_id(), "process");
        assert_eq!(schema.family(), Some("business-process"));
        assert!(!registry.type_ids().any(|id| id == "businessProcess"));
    }

    #[test]
    fn test_decode_fills_missing_fields() {
        let registry = SchemaRegistry::standard();
        let schema = registry.resolve("header").unwrap();

        let data = schema.decode(json!({"text": "Intro"})).unwrap();
        assert_eq!(
            data,
            BlockData::Header(Header {
                text: "Intro".to_string(),
                level: 2,
            })
        );
        assert_eq!(schema.decode(Value::Null).unwrap(), schema.default_data());
    }

    #[test]
    fn test_decode_rejects_wrong_shapes() {
        let registry = SchemaRegistry::standard();
        let schema = registry.resolve("list").unwrap();
        assert!(schema.decode(json!({"items": "not a list"})).is_err());
        assert!(schema.decode(json!("text")).is_err());
    }

    #[test]
    fn test_field_names_follow_wire_names() {
        let registry = SchemaRegistry::standard();
        let mut names = registry.resolve("image").unwrap().field_names();
        names.sort();
        assert_eq!(
            names,
            vec!["caption", "file", "stretched", "withBackground", "withBorder"]
        );
    }

    #[test]
    fn test_schema_does_not_render_foreign_data() {
        let registry = SchemaRegistry::standard();
        let quote = registry.resolve("quote").unwrap();
        let data = BlockData::from(Paragraph {
            text: "hi".to_string(),
        });
        assert!(quote.render(&data, &EscapeAll).contains("block-placeholder"));
        assert_eq!(quote.validate(&data).len(), 1);
    }

    #[test]
    fn test_registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SchemaRegistry>();
    }
}
