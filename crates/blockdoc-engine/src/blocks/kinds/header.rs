use serde::{Deserialize, Serialize};

use crate::blocks::{BlockKind, FieldError, Form, Input};
use crate::render::{Sanitize, classes, html};

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Header {
    pub text: String,
    pub level: u8,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            text: String::new(),
            level: 2,
        }
    }
}

impl BlockKind for Header {
    const TYPE_ID: &'static str = "header";
    const LABEL: &'static str = "Heading";
    const FAMILY: Option<&'static str> = Some(classes::PROSE);

    fn validate(&self) -> Vec<FieldError> {
        if (MIN_LEVEL..=MAX_LEVEL).contains(&self.level) {
            Vec::new()
        } else {
            vec![FieldError::new(
                "level",
                format!("must be between {MIN_LEVEL} and {MAX_LEVEL}"),
            )]
        }
    }

    fn render(&self, _sanitizer: &dyn Sanitize) -> String {
        if self.text.trim().is_empty() {
            return String::new();
        }
        let level = self.level.clamp(MIN_LEVEL, MAX_LEVEL);
        format!(
            r#"<h{level} class="{}">{}</h{level}>"#,
            classes::PROSE,
            html::escape(&self.text)
        )
    }

    fn form(&self) -> Form {
        Form::new(Self::TYPE_ID)
            .field("text", "Text", Input::text(&self.text))
            .field(
                "level",
                "Level",
                Input::Number {
                    value: i64::from(self.level),
                    min: i64::from(MIN_LEVEL),
                    max: i64::from(MAX_LEVEL),
                },
            )
    }
}
