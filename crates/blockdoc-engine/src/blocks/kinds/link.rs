use serde::{Deserialize, Serialize};

use super::ImageFile;
use crate::blocks::{BlockKind, FieldError, Form, Input};
use crate::render::{Sanitize, classes, html};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkMeta {
    pub title: String,
    pub description: String,
    pub image: ImageFile,
}

/// Link preview card
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkTool {
    pub link: String,
    pub meta: LinkMeta,
}

impl BlockKind for LinkTool {
    const TYPE_ID: &'static str = "linkTool";
    const LABEL: &'static str = "Link";

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if !self.link.is_empty() && !html::is_safe_url(&self.link) {
            errors.push(FieldError::new(
                "link",
                "must be an http(s) or site-relative URL",
            ));
        }
        if !self.meta.image.url.is_empty() && !html::is_safe_url(&self.meta.image.url) {
            errors.push(FieldError::new(
                "meta.image.url",
                "must be an http(s) or site-relative URL",
            ));
        }
        errors
    }

    fn render(&self, _sanitizer: &dyn Sanitize) -> String {
        if !html::is_safe_url(&self.link) {
            return String::new();
        }

        let link = html::attr(&self.link);
        let mut out = format!(
            r#"<div class="{}"><a href="{link}" target="_blank" rel="noopener noreferrer">"#,
            classes::LINK_PREVIEW
        );
        if html::is_safe_url(&self.meta.image.url) {
            out.push_str(&format!(
                r#"<img src="{}" alt="{}">"#,
                html::attr(&self.meta.image.url),
                html::attr(&self.meta.title)
            ));
        }
        if !self.meta.title.is_empty() {
            out.push_str(&format!("<h4>{}</h4>", html::escape(&self.meta.title)));
        }
        if !self.meta.description.is_empty() {
            out.push_str(&format!("<p>{}</p>", html::escape(&self.meta.description)));
        }
        out.push_str(&format!("<p>{}</p></a></div>", html::escape(&self.link)));
        out
    }

    fn form(&self) -> Form {
        Form::new(Self::TYPE_ID).field("link", "Link", Input::text(&self.link))
    }
}
