use serde::{Deserialize, Serialize};

use crate::blocks::{BlockKind, Form, Input};
use crate::render::{Sanitize, classes, html};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paragraph {
    pub text: String,
}

impl BlockKind for Paragraph {
    const TYPE_ID: &'static str = "paragraph";
    const LABEL: &'static str = "Paragraph";
    const FAMILY: Option<&'static str> = Some(classes::PROSE);

    fn render(&self, _sanitizer: &dyn Sanitize) -> String {
        let text = html::inline(&self.text);
        if text.trim().is_empty() {
            return String::new();
        }
        format!(r#"<p class="{}">{text}</p>"#, classes::PROSE)
    }

    fn form(&self) -> Form {
        Form::new(Self::TYPE_ID).field("text", "Text", Input::text_area(&self.text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::EscapeAll;

    #[test]
    fn test_render_keeps_inline_formatting() {
        let p = Paragraph {
            text: "Hello <b>world</b> <script>".to_string(),
        };
        insta::assert_snapshot!(
            p.render(&EscapeAll),
            @r#"<p class="article-prose">Hello <b>world</b> &lt;script&gt;</p>"#
        );
    }

    #[test]
    fn test_blank_paragraph_renders_nothing() {
        let p = Paragraph {
            text: "   ".to_string(),
        };
        assert_eq!(p.render(&EscapeAll), "");
    }
}
