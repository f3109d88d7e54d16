use serde::{Deserialize, Serialize};

use crate::blocks::{BlockKind, FieldError, Form, Input};
use crate::render::{Sanitize, classes, html};

/// Location of an uploaded file. Accepts a bare URL string on input so
/// forms can edit it as a single text field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawImageFile")]
pub struct ImageFile {
    pub url: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawImageFile {
    Url(String),
    File {
        #[serde(default)]
        url: String,
    },
}

impl From<RawImageFile> for ImageFile {
    fn from(raw: RawImageFile) -> Self {
        match raw {
            RawImageFile::Url(url) | RawImageFile::File { url } => Self { url },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Image {
    pub file: ImageFile,
    pub caption: String,
    pub with_border: bool,
    pub with_background: bool,
    pub stretched: bool,
}

impl BlockKind for Image {
    const TYPE_ID: &'static str = "image";
    const LABEL: &'static str = "Image";

    fn validate(&self) -> Vec<FieldError> {
        if self.file.url.is_empty() || html::is_safe_url(&self.file.url) {
            Vec::new()
        } else {
            vec![FieldError::new(
                "file.url",
                "must be an http(s) or site-relative URL",
            )]
        }
    }

    fn render(&self, _sanitizer: &dyn Sanitize) -> String {
        if !html::is_safe_url(&self.file.url) {
            return String::new();
        }

        let modifiers = [
            (self.with_border, classes::WITH_BORDER),
            (self.with_background, classes::WITH_BACKGROUND),
            (self.stretched, classes::STRETCHED),
        ];
        let mut class = String::from(classes::IMAGE);
        for (_, modifier) in modifiers.iter().filter(|(on, _)| *on) {
            class.push(' ');
            class.push_str(modifier);
        }

        let mut out = format!(
            r#"<figure><img src="{}" alt="{}" class="{class}">"#,
            html::attr(&self.file.url),
            html::attr(&self.caption)
        );
        if !self.caption.is_empty() {
            out.push_str(&format!(
                "<figcaption>{}</figcaption>",
                html::escape(&self.caption)
            ));
        }
        out.push_str("</figure>");
        out
    }

    fn form(&self) -> Form {
        Form::new(Self::TYPE_ID)
            .field("file", "Image URL", Input::text(&self.file.url))
            .field("caption", "Caption", Input::text(&self.caption))
            .field(
                "withBorder",
                "Border",
                Input::Toggle {
                    value: self.with_border,
                },
            )
            .field(
                "withBackground",
                "Background",
                Input::Toggle {
                    value: self.with_background,
                },
            )
            .field(
                "stretched",
                "Stretch to width",
                Input::Toggle {
                    value: self.stretched,
                },
            )
    }
}
