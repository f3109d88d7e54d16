use serde::{Deserialize, Serialize};

use crate::blocks::{BlockKind, FieldError, Form, Input, is_blank};
use crate::render::{Sanitize, classes, html};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoleDefinition {
    pub title: String,
    pub department: String,
    pub summary: String,
    pub reports_to: String,
    pub responsibilities: Vec<String>,
    pub skills: Vec<String>,
}

fn render_items(heading: &str, items: &[String]) -> String {
    let items: String = items
        .iter()
        .filter(|item| !is_blank(item))
        .map(|item| format!("<li>{}</li>", html::inline(item)))
        .collect();
    if items.is_empty() {
        String::new()
    } else {
        format!("<h5>{heading}</h5><ul>{items}</ul>")
    }
}

impl BlockKind for RoleDefinition {
    const TYPE_ID: &'static str = "roleDefinition";
    const LABEL: &'static str = "Role Definition";
    const FAMILY: Option<&'static str> = Some(classes::ROLE);

    fn validate(&self) -> Vec<FieldError> {
        if is_blank(&self.title) {
            vec![FieldError::required("title")]
        } else {
            Vec::new()
        }
    }

    fn render(&self, _sanitizer: &dyn Sanitize) -> String {
        if is_blank(&self.title) {
            return String::new();
        }
        let mut out = format!(
            r#"<div class="{}"><h4>{}</h4>"#,
            classes::ROLE,
            html::escape(&self.title)
        );
        if !self.department.is_empty() {
            out.push_str(&format!(
                "<p>Department: {}</p>",
                html::escape(&self.department)
            ));
        }
        if !self.reports_to.is_empty() {
            out.push_str(&format!(
                "<p>Reports to: {}</p>",
                html::escape(&self.reports_to)
            ));
        }
        if !self.summary.is_empty() {
            out.push_str(&format!("<p>{}</p>", html::inline(&self.summary)));
        }
        out.push_str(&render_items("Responsibilities", &self.responsibilities));
        out.push_str(&render_items("Skills", &self.skills));
        out.push_str("</div>");
        out
    }

    fn form(&self) -> Form {
        Form::new(Self::TYPE_ID)
            .required("title", "Role title", Input::text(&self.title))
            .field("department", "Department", Input::text(&self.department))
            .field("reportsTo", "Reports to", Input::text(&self.reports_to))
            .field("summary", "Summary", Input::text_area(&self.summary))
            .field(
                "responsibilities",
                "Responsibilities",
                Input::lines(&self.responsibilities),
            )
            .field("skills", "Skills", Input::lines(&self.skills))
    }
}
