use serde::{Deserialize, Serialize};

use crate::blocks::{BlockKind, Form, Input};
use crate::render::{Sanitize, html};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Code {
    pub code: String,
}

impl BlockKind for Code {
    const TYPE_ID: &'static str = "code";
    const LABEL: &'static str = "Code";

    fn render(&self, _sanitizer: &dyn Sanitize) -> String {
        if self.code.trim().is_empty() {
            return String::new();
        }
        format!("<pre><code>{}</code></pre>", html::escape(&self.code))
    }

    fn form(&self) -> Form {
        Form::new(Self::TYPE_ID).field("code", "Code", Input::text_area(&self.code))
    }
}
