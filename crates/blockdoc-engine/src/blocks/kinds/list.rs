use serde::{Deserialize, Serialize};

use crate::blocks::{BlockKind, Form, Input};
use crate::render::{Sanitize, classes, html};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    #[default]
    Unordered,
    Ordered,
}

impl ListStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            ListStyle::Unordered => "unordered",
            ListStyle::Ordered => "ordered",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct List {
    pub style: ListStyle,
    pub items: Vec<String>,
}

impl BlockKind for List {
    const TYPE_ID: &'static str = "list";
    const LABEL: &'static str = "List";
    const FAMILY: Option<&'static str> = Some(classes::PROSE);

    fn render(&self, _sanitizer: &dyn Sanitize) -> String {
        let items: String = self
            .items
            .iter()
            .map(|item| html::inline(item))
            .filter(|item| !item.trim().is_empty())
            .map(|item| format!("<li>{item}</li>"))
            .collect();
        if items.is_empty() {
            return String::new();
        }

        let tag = match self.style {
            ListStyle::Ordered => "ol",
            ListStyle::Unordered => "ul",
        };
        format!(r#"<{tag} class="{}">{items}</{tag}>"#, classes::PROSE)
    }

    fn form(&self) -> Form {
        Form::new(Self::TYPE_ID)
            .field(
                "style",
                "Style",
                Input::Select {
                    value: self.style.as_str().to_string(),
                    options: vec!["unordered".to_string(), "ordered".to_string()],
                },
            )
            .field("items", "Items", Input::lines(&self.items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::EscapeAll;

    #[test]
    fn test_ordered_list_skips_blank_items() {
        let list = List {
            style: ListStyle::Ordered,
            items: vec!["First".to_string(), "  ".to_string(), "<i>Second</i>".to_string()],
        };
        insta::assert_snapshot!(
            list.render(&EscapeAll),
            @r#"<ol class="article-prose"><li>First</li><li><i>Second</i></li></ol>"#
        );
    }

    #[test]
    fn test_style_wire_names() {
        let list: List = serde_json::from_str(r#"{"style":"ordered","items":["a"]}"#).unwrap();
        assert_eq!(list.style, ListStyle::Ordered);
        assert_eq!(List::default().style, ListStyle::Unordered);
    }
}
