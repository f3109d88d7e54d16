use serde::{Deserialize, Serialize};

use crate::blocks::{BlockKind, Form, Input};
use crate::render::Sanitize;

/// Author-supplied HTML, passed through the injected sanitizer on render
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Raw {
    pub html: String,
}

impl BlockKind for Raw {
    const TYPE_ID: &'static str = "raw";
    const LABEL: &'static str = "Raw HTML";

    fn render(&self, sanitizer: &dyn Sanitize) -> String {
        if self.html.trim().is_empty() {
            return String::new();
        }
        sanitizer.sanitize(&self.html)
    }

    fn form(&self) -> Form {
        Form::new(Self::TYPE_ID).field("html", "HTML", Input::text_area(&self.html))
    }
}
