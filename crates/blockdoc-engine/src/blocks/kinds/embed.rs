use serde::{Deserialize, Serialize};

use crate::blocks::{BlockKind, FieldError, Form, Input};
use crate::render::{Sanitize, classes, html};

/// Embedded third-party content such as a video player
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Embed {
    pub service: String,
    pub embed: String,
    pub caption: String,
}

impl BlockKind for Embed {
    const TYPE_ID: &'static str = "embed";
    const LABEL: &'static str = "Embed";

    fn validate(&self) -> Vec<FieldError> {
        if self.embed.is_empty() || html::is_safe_url(&self.embed) {
            Vec::new()
        } else {
            vec![FieldError::new("embed", "must be an http(s) or site-relative URL")]
        }
    }

    fn render(&self, _sanitizer: &dyn Sanitize) -> String {
        if !html::is_safe_url(&self.embed) {
            return String::new();
        }
        let mut out = format!(
            r#"<div class="{}"><iframe src="{}"></iframe>"#,
            classes::EMBED,
            html::attr(&self.embed)
        );
        if !self.caption.is_empty() {
            out.push_str(&format!("<p>{}</p>", html::escape(&self.caption)));
        }
        out.push_str("</div>");
        out
    }

    fn form(&self) -> Form {
        Form::new(Self::TYPE_ID)
            .field("service", "Service", Input::text(&self.service))
            .field("embed", "Embed URL", Input::text(&self.embed))
            .field("caption", "Caption", Input::text(&self.caption))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::EscapeAll;

    #[test]
    fn test_script_urls_are_rejected() {
        let embed = Embed {
            embed: "javascript:alert(1)".to_string(),
            ..Embed::default()
        };
        assert_eq!(embed.validate().len(), 1);
        assert_eq!(embed.render(&EscapeAll), "");
    }

    #[test]
    fn test_render_embed_with_caption() {
        let embed = Embed {
            service: "youtube".to_string(),
            embed: "https://www.youtube.com/embed/abc?a=1&b=2".to_string(),
            caption: "Walkthrough".to_string(),
        };
        insta::assert_snapshot!(
            embed.render(&EscapeAll),
            @r#"<div class="embed-container"><iframe src="https://www.youtube.com/embed/abc?a=1&amp;b=2"></iframe><p>Walkthrough</p></div>"#
        );
    }
}
