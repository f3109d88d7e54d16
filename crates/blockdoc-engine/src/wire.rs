//! The one persisted representation of a document.
//!
//! ```json
//! {"id":"handbook","version":3,"updatedAt":"2024-05-01T09:30:00Z",
//!  "blocks":[{"id":"9f2c…","type":"paragraph","data":{"text":"Hello"}}]}
//! ```
//!
//! Loading is forgiving per block and strict at the top level: a record with
//! an unknown type or data that does not fit its type is kept verbatim as an
//! [`Unresolved`] block and reported in [`Loaded::issues`], while a broken
//! envelope fails the whole load. A record repeating an earlier block id is
//! given a fresh id and reported the same way.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::blocks::{BlockData, SchemaRegistry, Unresolved, UnresolvedReason};
use crate::editing::Document;
use crate::models::{Block, BlockId, DocumentId, InvalidDocumentId};

#[derive(Debug, thiserror::Error)]
pub enum DeserializationError {
    #[error("not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document must be a JSON object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid field `{field}`: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    #[error(transparent)]
    InvalidId(#[from] InvalidDocumentId),

    #[error("block record {index} is malformed: {message}")]
    MalformedRecord { index: usize, message: String },
}

/// What was wrong with a record that still loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// Kept verbatim as an [`Unresolved`] block
    Unresolved(UnresolvedReason),
    /// Repeated the id of an earlier record and was given a new one
    DuplicateId(BlockId),
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueKind::Unresolved(reason) => write!(f, "{reason}"),
            IssueKind::DuplicateId(id) => write!(f, "duplicate block id `{id}`, reassigned"),
        }
    }
}

/// A record that could not be loaded exactly as written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadIssue {
    pub index: usize,
    pub block: BlockId,
    pub type_id: String,
    pub reason: IssueKind,
}

impl std::fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "block {} [{}] `{}`: {}",
            self.index, self.block, self.type_id, self.reason
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    pub document: Document,
    pub issues: Vec<LoadIssue>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    id: &'a DocumentId,
    version: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
    blocks: Vec<Record<'a>>,
}

#[derive(Serialize)]
struct Record<'a> {
    id: &'a BlockId,
    #[serde(rename = "type")]
    type_id: &'a str,
    data: &'a BlockData,
}

/// Canonical JSON for a document
pub fn serialize(document: &Document) -> Result<String, serde_json::Error> {
    let envelope = Envelope {
        id: &document.id,
        version: document.version,
        updated_at: document.updated_at,
        blocks: document
            .blocks
            .iter()
            .map(|block| Record {
                id: &block.id,
                type_id: block.type_id(),
                data: &block.data,
            })
            .collect(),
    };
    serde_json::to_string(&envelope)
}

/// Load a document, keeping every block even when some cannot be resolved
pub fn deserialize(registry: &SchemaRegistry, input: &str) -> Result<Loaded, DeserializationError> {
    let value: Value = serde_json::from_str(input)?;
    let Value::Object(mut envelope) = value else {
        return Err(DeserializationError::NotAnObject);
    };

    let id = match envelope.remove("id") {
        Some(Value::String(id)) => DocumentId::try_from(id)?,
        Some(_) => {
            return Err(DeserializationError::InvalidField {
                field: "id",
                message: "expected a string".to_string(),
            });
        }
        None => return Err(DeserializationError::MissingField("id")),
    };

    let version = match envelope.remove("version") {
        None | Some(Value::Null) => 0,
        Some(value) => value.as_u64().ok_or(DeserializationError::InvalidField {
            field: "version",
            message: "expected a non-negative integer".to_string(),
        })?,
    };

    let updated_at = match envelope.remove("updatedAt") {
        None | Some(Value::Null) => None,
        Some(value) => Some(serde_json::from_value::<DateTime<Utc>>(value).map_err(|e| {
            DeserializationError::InvalidField {
                field: "updatedAt",
                message: e.to_string(),
            }
        })?),
    };

    let records = match envelope.remove("blocks") {
        Some(Value::Array(records)) => records,
        Some(_) => {
            return Err(DeserializationError::InvalidField {
                field: "blocks",
                message: "expected an array".to_string(),
            });
        }
        None => return Err(DeserializationError::MissingField("blocks")),
    };

    let mut blocks = Vec::with_capacity(records.len());
    let mut issues = Vec::new();
    let mut seen = HashSet::new();
    for (index, record) in records.into_iter().enumerate() {
        let (mut block, unresolved) = load_record(registry, index, record)?;

        let mut duplicate = None;
        if !seen.insert(block.id.clone()) {
            let repeated = std::mem::replace(&mut block.id, BlockId::new());
            seen.insert(block.id.clone());
            duplicate = Some(LoadIssue {
                index,
                block: block.id.clone(),
                type_id: block.type_id().to_string(),
                reason: IssueKind::DuplicateId(repeated),
            });
        }

        for mut issue in unresolved.into_iter().chain(duplicate) {
            issue.block = block.id.clone();
            log::warn!("document {id}: {issue}");
            issues.push(issue);
        }
        blocks.push(block);
    }

    Ok(Loaded {
        document: Document {
            id,
            blocks,
            version,
            updated_at,
        },
        issues,
    })
}

fn load_record(
    registry: &SchemaRegistry,
    index: usize,
    record: Value,
) -> Result<(Block, Option<LoadIssue>), DeserializationError> {
    let malformed = |message: &str| DeserializationError::MalformedRecord {
        index,
        message: message.to_string(),
    };

    let Value::Object(mut record) = record else {
        return Err(malformed("expected an object"));
    };
    let type_id = match record.remove("type") {
        Some(Value::String(type_id)) => type_id,
        _ => return Err(malformed("missing string `type`")),
    };
    let id = match record.remove("id") {
        Some(Value::String(id)) => BlockId::from(id),
        None | Some(Value::Null) => BlockId::new(),
        Some(_) => return Err(malformed("`id` must be a string")),
    };
    let data = record
        .remove("data")
        .unwrap_or_else(|| Value::Object(Map::new()));

    let resolved = match registry.resolve(&type_id) {
        Ok(schema) => schema
            .decode(data.clone())
            .map_err(|e| UnresolvedReason::InvalidData(e.to_string())),
        Err(_) => Err(UnresolvedReason::UnknownType),
    };

    Ok(match resolved {
        Ok(data) => (Block { id, data }, None),
        Err(reason) => {
            let issue = LoadIssue {
                index,
                block: id.clone(),
                type_id: type_id.clone(),
                reason: IssueKind::Unresolved(reason.clone()),
            };
            let data = BlockData::Unresolved(Unresolved {
                type_id,
                data,
                reason,
            });
            (Block { id, data }, Some(issue))
        }
    })
}
