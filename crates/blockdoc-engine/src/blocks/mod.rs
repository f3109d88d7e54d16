/*!
 * # Block Types
 *
 * Every piece of document content is a block: a type id plus a payload whose
 * shape is fixed per type. Payloads are strongly typed structs gathered into
 * the closed [`BlockData`] enum; the [`SchemaRegistry`] decides which type
 * ids a process accepts and maps wire records onto those structs.
 *
 * Each payload type implements [`BlockKind`], which supplies:
 *
 * - **validation**: a pure, total check returning field-level errors
 * - **rendering**: deterministic display markup honouring the style contract
 * - **editable form**: a description of the inputs an editor should draw
 *
 * Records whose type is unknown, or whose data does not fit the declared
 * type, are kept verbatim as [`Unresolved`] so no content is lost.
 */

pub mod form;
pub mod kinds;
pub mod registry;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::render::Sanitize;

pub use form::{Form, FormField, Input};
pub use kinds::*;
pub use registry::{BlockSchema, SchemaRegistry, UnknownBlockType};

/// A single field-level validation failure.
///
/// `field` is a path into the payload such as `name` or `steps[2].title`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Error for a text field that must contain something other than whitespace
    pub fn required(field: impl Into<String>) -> Self {
        Self::new(field, "is required")
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors raised while editing a block's payload
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    #[error(transparent)]
    UnknownType(#[from] UnknownBlockType),

    #[error("unknown field `{field}` for block type `{type_id}`")]
    UnknownField { type_id: String, field: String },

    #[error("invalid value for `{type_id}` block: {source}")]
    InvalidFieldValue {
        type_id: String,
        source: serde_json::Error,
    },
}

/// Behaviour shared by every typed block payload.
pub trait BlockKind: Default + Serialize + DeserializeOwned + Into<BlockData> {
    /// Identifier used in the `type` field of wire records
    const TYPE_ID: &'static str;

    /// Human readable name shown in block pickers
    const LABEL: &'static str;

    /// Style-contract class this block family renders with, if any
    const FAMILY: Option<&'static str> = None;

    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }

    /// Render display markup. Blocks with nothing to show return an empty string.
    fn render(&self, sanitizer: &dyn Sanitize) -> String;

    fn form(&self) -> Form;
}

/// `true` when a required text field holds only whitespace
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
