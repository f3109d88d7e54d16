use serde::{Deserialize, Serialize};

use crate::blocks::{BlockKind, Form};
use crate::render::Sanitize;

/// Horizontal separator; carries no data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiter {}

impl BlockKind for Delimiter {
    const TYPE_ID: &'static str = "delimiter";
    const LABEL: &'static str = "Delimiter";

    fn render(&self, _sanitizer: &dyn Sanitize) -> String {
        "<hr>".to_string()
    }

    fn form(&self) -> Form {
        Form::new(Self::TYPE_ID)
    }
}
