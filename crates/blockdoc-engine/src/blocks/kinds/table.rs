use serde::{Deserialize, Serialize};

use crate::blocks::{BlockKind, FieldError, Form, Input};
use crate::render::{Sanitize, classes, html};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Table {
    pub with_headings: bool,
    pub content: Vec<Vec<String>>,
}

impl Table {
    fn width(&self) -> usize {
        self.content.first().map(Vec::len).unwrap_or(0)
    }
}

impl BlockKind for Table {
    const TYPE_ID: &'static str = "table";
    const LABEL: &'static str = "Table";
    const FAMILY: Option<&'static str> = Some(classes::PROSE);

    fn validate(&self) -> Vec<FieldError> {
        let width = self.width();
        self.content
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, row)| row.len() != width)
            .map(|(i, row)| {
                FieldError::new(
                    format!("content[{i}]"),
                    format!("has {} cells, expected {width}", row.len()),
                )
            })
            .collect()
    }

    fn render(&self, _sanitizer: &dyn Sanitize) -> String {
        if self.width() == 0 {
            return String::new();
        }

        let rows: Vec<String> = self
            .content
            .iter()
            .enumerate()
            .filter(|(_, row)| !row.is_empty())
            .map(|(i, row)| {
                let tag = if self.with_headings && i == 0 { "th" } else { "td" };
                let cells: String = row
                    .iter()
                    .map(|cell| format!("<{tag}>{}</{tag}>", html::inline(cell)))
                    .collect();
                format!("<tr>{cells}</tr>")
            })
            .collect();

        if self.with_headings {
            let (head, body) = rows.split_at(1);
            format!(
                r#"<table class="{}"><thead>{}</thead><tbody>{}</tbody></table>"#,
                classes::PROSE,
                head.concat(),
                body.concat()
            )
        } else {
            format!(
                r#"<table class="{}"><tbody>{}</tbody></table>"#,
                classes::PROSE,
                rows.concat()
            )
        }
    }

    fn form(&self) -> Form {
        let columns = (1..=self.width()).map(|i| format!("Column {i}")).collect();
        Form::new(Self::TYPE_ID)
            .field(
                "withHeadings",
                "First row is a heading",
                Input::Toggle {
                    value: self.with_headings,
                },
            )
            .field(
                "content",
                "Cells",
                Input::Rows {
                    columns,
                    rows: self.content.clone(),
                },
            )
    }
}
