use serde_json::{Map, Value};

use super::BlockId;
use crate::blocks::{BlockData, BlockError, FieldError, SchemaRegistry};

/// One content block in a document
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: BlockId,
    pub data: BlockData,
}

impl Block {
    /// New block of `type_id` with every field at its default
    pub fn create(registry: &SchemaRegistry, type_id: &str) -> Result<Self, BlockError> {
        let schema = registry.resolve(type_id)?;
        Ok(Self {
            id: BlockId::new(),
            data: schema.default_data(),
        })
    }

    pub fn type_id(&self) -> &str {
        self.data.type_id()
    }

    /// Merge `patch` into the payload, one top-level field at a time.
    ///
    /// Keys must name fields of the block's type and values must have the
    /// field's shape. On error the block is left untouched.
    pub fn update(
        &mut self,
        registry: &SchemaRegistry,
        patch: Map<String, Value>,
    ) -> Result<(), BlockError> {
        let schema = registry.resolve(self.type_id())?;
        let type_id = schema.type_id().to_string();

        let fields = schema.field_names();
        if let Some(field) = patch.keys().find(|key| !fields.contains(key)) {
            return Err(BlockError::UnknownField {
                type_id,
                field: field.clone(),
            });
        }

        let current = match &self.data {
            // Patching a malformed block of a known type merges over its raw payload
            BlockData::Unresolved(u) => match &u.data {
                Value::Object(map) => map.clone(),
                _ => Map::new(),
            },
            data => match data.to_value() {
                Ok(Value::Object(map)) => map,
                Ok(_) => Map::new(),
                Err(source) => return Err(BlockError::InvalidFieldValue { type_id, source }),
            },
        };

        let mut merged = current;
        merged.extend(patch);

        let data = schema
            .decode(Value::Object(merged))
            .map_err(|source| BlockError::InvalidFieldValue {
                type_id: type_id.clone(),
                source,
            })?;

        log::debug!("updated block {} ({type_id})", self.id);
        self.data = data;
        Ok(())
    }

    pub fn validate(&self, registry: &SchemaRegistry) -> Vec<FieldError> {
        match registry.resolve(self.type_id()) {
            Ok(schema) => schema.validate(&self.data),
            Err(err) => vec![FieldError::new("type", err.to_string())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{Process, Unresolved, UnresolvedReason};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn patch(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("patch must be an object"),
        }
    }

    #[test]
    fn test_process_lifecycle() {
        // Given a freshly created process block
        let registry = SchemaRegistry::standard();
        let mut block = Block::create(&registry, "process").unwrap();
        assert_eq!(block.data, BlockData::Process(Process::default()));

        // Then it is invalid until it has a name
        assert_eq!(block.validate(&registry), vec![FieldError::required("name")]);

        // When the name is filled in
        block
            .update(&registry, patch(json!({"name": "Invoice Approval"})))
            .unwrap();

        // Then it validates
        assert!(block.validate(&registry).is_empty());
    }

    #[test]
    fn test_update_merges_fields() {
        let registry = SchemaRegistry::standard();
        let mut block = Block::create(&registry, "quote").unwrap();
        block
            .update(&registry, patch(json!({"text": "Less is more"})))
            .unwrap();
        block
            .update(&registry, patch(json!({"caption": "Mies"})))
            .unwrap();

        assert_eq!(
            block.data.to_value().unwrap(),
            json!({"text": "Less is more", "caption": "Mies"})
        );
    }

    #[test]
    fn test_unknown_field_leaves_block_unchanged() {
        let registry = SchemaRegistry::standard();
        let mut block = Block::create(&registry, "paragraph").unwrap();
        let before = block.clone();

        let err = block
            .update(&registry, patch(json!({"text": "x", "colour": "red"})))
            .unwrap_err();

        assert!(matches!(err, BlockError::UnknownField { ref field, .. } if field == "colour"));
        assert_eq!(block, before);
    }

    #[test]
    fn test_wrong_shape_leaves_block_unchanged() {
        let registry = SchemaRegistry::standard();
        let mut block = Block::create(&registry, "header").unwrap();
        let before = block.clone();

        let err = block
            .update(&registry, patch(json!({"level": "big"})))
            .unwrap_err();

        assert!(matches!(err, BlockError::InvalidFieldValue { .. }));
        assert_eq!(block, before);
    }

    #[test]
    fn test_create_unknown_type() {
        let registry = SchemaRegistry::standard();
        assert!(matches!(
            Block::create(&registry, "chart"),
            Err(BlockError::UnknownType(_))
        ));
    }

    #[test]
    fn test_update_repairs_malformed_known_block() {
        let registry = SchemaRegistry::standard();
        let mut block = Block {
            id: BlockId::from("b1"),
            data: BlockData::Unresolved(Unresolved {
                type_id: "header".to_string(),
                data: json!({"text": "Title", "level": "big"}),
                reason: UnresolvedReason::InvalidData("bad level".to_string()),
            }),
        };

        block.update(&registry, patch(json!({"level": 3}))).unwrap();

        assert_eq!(block.type_id(), "header");
        assert!(block.validate(&registry).is_empty());
    }

    #[rstest]
    #[case("paragraph", json!({"text": "Hello <b>there</b>"}))]
    #[case("header", json!({"text": "Scope", "level": 3}))]
    #[case("list", json!({"style": "ordered", "items": ["one", "two"]}))]
    #[case("quote", json!({"text": "Less is more", "caption": "Mies"}))]
    #[case("delimiter", json!({}))]
    #[case("table", json!({"withHeadings": true, "content": [["a", "b"], ["1", "2"]]}))]
    #[case("code", json!({"code": "let x = 1;"}))]
    #[case("raw", json!({"html": "<div>hi</div>"}))]
    #[case("embed", json!({"service": "youtube", "embed": "https://example.com/v", "caption": "Demo"}))]
    #[case("image", json!({"file": {"url": "/a.png"}, "caption": "Chart", "withBorder": true, "withBackground": false, "stretched": true}))]
    #[case("linkTool", json!({"link": "https://example.com", "meta": {"title": "Post"}}))]
    #[case("process", json!({
        "name": "Payroll",
        "frequency": "monthly",
        "steps": [{"title": "Collect", "description": "Hours", "responsible": "HR"}]
    }))]
    #[case("controlMatrix", json!({"controls": [
        {"id": "C-1", "description": "Dual sign-off", "type": "Preventive", "riskLevel": "High"},
        "review quarterly"
    ]}))]
    #[case("roleDefinition", json!({"title": "Controller", "responsibilities": ["Close"], "skills": ["IFRS"]}))]
    #[case("maturityModel", json!({"domain": "Data", "levels": [{"name": "Initial", "description": "Ad hoc"}]}))]
    #[case("processFlow", json!({"title": "Intake", "steps": [{"text": "Receive"}, {"text": "Approve"}]}))]
    fn test_form_values_are_accepted_by_update(#[case] type_id: &str, #[case] data: Value) {
        // Given a populated block
        let registry = SchemaRegistry::standard();
        let schema = registry.resolve(type_id).unwrap();
        let mut block = Block {
            id: BlockId::from("b1"),
            data: schema.decode(data).unwrap(),
        };
        let before = block.clone();

        // When an editor sends back every value its form shows
        let form = schema.render_editable(&block.data);
        block.update(&registry, form.to_patch()).unwrap();

        // Then the block is unchanged
        assert_eq!(block, before);
    }

    #[test]
    fn test_form_shaped_values_fill_business_blocks() {
        let registry = SchemaRegistry::standard();

        let mut flow = Block::create(&registry, "processFlow").unwrap();
        flow.update(&registry, patch(json!({"steps": ["Receive", "Approve"]})))
            .unwrap();
        assert!(flow.validate(&registry).is_empty());

        let mut matrix = Block::create(&registry, "controlMatrix").unwrap();
        matrix
            .update(&registry, patch(json!({"controls": "C-1 | a | b | c\nnote"})))
            .unwrap();
        assert_eq!(matrix.data.to_value().unwrap()["controls"][0]["id"], "C-1");
        assert_eq!(matrix.data.to_value().unwrap()["controls"][1], "note");
    }
}
