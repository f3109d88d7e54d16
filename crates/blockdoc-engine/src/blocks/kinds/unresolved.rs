use serde_json::Value;

use crate::blocks::{FieldError, Form, Input};
use crate::render;

/// Why a wire record could not become a typed block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    UnknownType,
    InvalidData(String),
}

impl std::fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnresolvedReason::UnknownType => write!(f, "unknown block type"),
            UnresolvedReason::InvalidData(msg) => write!(f, "invalid data: {msg}"),
        }
    }
}

/// A record kept exactly as loaded. It survives save round-trips untouched
/// but never validates, so a document holding one cannot be persisted until
/// the block is removed or repaired.
#[derive(Debug, Clone, PartialEq)]
pub struct Unresolved {
    pub type_id: String,
    pub data: Value,
    pub reason: UnresolvedReason,
}

impl Unresolved {
    pub fn validate(&self) -> Vec<FieldError> {
        let message = match &self.reason {
            UnresolvedReason::UnknownType => {
                format!("unknown block type `{}`", self.type_id)
            }
            UnresolvedReason::InvalidData(msg) => {
                format!("data does not match block type `{}`: {msg}", self.type_id)
            }
        };
        vec![FieldError::new("type", message)]
    }

    pub fn render(&self) -> String {
        render::placeholder(&self.type_id)
    }

    /// Read-only view of the raw payload
    pub fn form(&self) -> Form {
        Form::new(&self.type_id).field(
            "data",
            "Unsupported block data",
            Input::text_area(&self.data.to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_always_invalid() {
        let block = Unresolved {
            type_id: "chart".to_string(),
            data: json!({"series": [1, 2]}),
            reason: UnresolvedReason::UnknownType,
        };
        let errors = block.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "unknown block type `chart`");
        assert!(block.render().contains(r#"data-block-type="chart""#));
    }
}
