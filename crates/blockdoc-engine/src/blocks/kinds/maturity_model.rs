use serde::{Deserialize, Serialize};

use crate::blocks::{BlockKind, FieldError, Form, Input, is_blank};
use crate::render::{Sanitize, classes, html};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaturityLevel {
    pub name: String,
    pub description: String,
}

/// Capability levels for one domain, lowest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaturityModel {
    pub domain: String,
    pub description: String,
    pub levels: Vec<MaturityLevel>,
}

impl BlockKind for MaturityModel {
    const TYPE_ID: &'static str = "maturityModel";
    const LABEL: &'static str = "Maturity Model";
    const FAMILY: Option<&'static str> = Some(classes::MATURITY);

    fn validate(&self) -> Vec<FieldError> {
        if is_blank(&self.domain) {
            vec![FieldError::required("domain")]
        } else {
            Vec::new()
        }
    }

    fn render(&self, _sanitizer: &dyn Sanitize) -> String {
        if is_blank(&self.domain) {
            return String::new();
        }
        let mut out = format!(
            r#"<div class="{}"><h4>{}</h4>"#,
            classes::MATURITY,
            html::escape(&self.domain)
        );
        if !self.description.is_empty() {
            out.push_str(&format!("<p>{}</p>", html::inline(&self.description)));
        }
        if !self.levels.is_empty() {
            out.push_str("<ol>");
            for (i, level) in self.levels.iter().enumerate() {
                out.push_str(&format!(
                    r#"<li data-level="{}"><strong>{}</strong>"#,
                    i + 1,
                    html::escape(&level.name)
                ));
                if !level.description.is_empty() {
                    out.push_str(&format!("<p>{}</p>", html::inline(&level.description)));
                }
                out.push_str("</li>");
            }
            out.push_str("</ol>");
        }
        out.push_str("</div>");
        out
    }

    fn form(&self) -> Form {
        Form::new(Self::TYPE_ID)
            .required("domain", "Domain", Input::text(&self.domain))
            .field("description", "Description", Input::text_area(&self.description))
            .field(
                "levels",
                "Levels",
                Input::Rows {
                    columns: vec!["name".to_string(), "description".to_string()],
                    rows: self
                        .levels
                        .iter()
                        .map(|l| vec![l.name.clone(), l.description.clone()])
                        .collect(),
                },
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::EscapeAll;

    #[test]
    fn test_domain_required() {
        let model = MaturityModel {
            domain: "\t".to_string(),
            ..MaturityModel::default()
        };
        assert_eq!(model.validate(), vec![FieldError::required("domain")]);
    }

    #[test]
    fn test_model_without_domain_renders_nothing() {
        let model = MaturityModel {
            domain: " ".to_string(),
            levels: vec![MaturityLevel::default()],
            ..MaturityModel::default()
        };
        insta::assert_snapshot!(model.render(&EscapeAll), @"");
    }

    #[test]
    fn test_render_levels_in_order() {
        let model = MaturityModel {
            domain: "Data governance".to_string(),
            description: String::new(),
            levels: vec![
                MaturityLevel {
                    name: "Initial".to_string(),
                    description: "Ad hoc".to_string(),
                },
                MaturityLevel {
                    name: "Managed".to_string(),
                    description: String::new(),
                },
            ],
        };
        insta::assert_snapshot!(
            model.render(&EscapeAll),
            @r#"<div class="maturity-model"><h4>Data governance</h4><ol><li data-level="1"><strong>Initial</strong><p>Ad hoc</p></li><li data-level="2"><strong>Managed</strong></li></ol></div>"#
        );
    }
}
