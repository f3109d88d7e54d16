use serde::{Deserialize, Serialize};

use crate::blocks::{BlockKind, Form, Input};
use crate::render::{Sanitize, classes, html};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Quote {
    pub text: String,
    pub caption: String,
}

impl BlockKind for Quote {
    const TYPE_ID: &'static str = "quote";
    const LABEL: &'static str = "Quote";
    const FAMILY: Option<&'static str> = Some(classes::PROSE);

    fn render(&self, _sanitizer: &dyn Sanitize) -> String {
        let text = html::inline(&self.text);
        if text.trim().is_empty() {
            return String::new();
        }
        let mut out = format!(r#"<blockquote class="{}">{text}"#, classes::PROSE);
        if !self.caption.is_empty() {
            out.push_str(&format!("<cite>{}</cite>", html::escape(&self.caption)));
        }
        out.push_str("</blockquote>");
        out
    }

    fn form(&self) -> Form {
        Form::new(Self::TYPE_ID)
            .field("text", "Quote", Input::text_area(&self.text))
            .field("caption", "Caption", Input::text(&self.caption))
    }
}
