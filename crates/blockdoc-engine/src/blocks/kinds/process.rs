use serde::{Deserialize, Serialize};

use crate::blocks::{BlockKind, FieldError, Form, Input, is_blank};
use crate::render::{Sanitize, classes, html};

/// How often a business process runs. Empty on the wire means not specified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    #[default]
    #[serde(rename = "")]
    Unspecified,
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Annually,
    AsNeeded,
}

impl Frequency {
    pub const ALL: [Frequency; 7] = [
        Frequency::Unspecified,
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Annually,
        Frequency::AsNeeded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Unspecified => "",
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Annually => "annually",
            Frequency::AsNeeded => "as-needed",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Frequency::Unspecified => "",
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Quarterly => "Quarterly",
            Frequency::Annually => "Annually",
            Frequency::AsNeeded => "As needed",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessStep {
    pub title: String,
    pub description: String,
    pub responsible: String,
}

/// A documented business process: header fields plus ordered steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Process {
    pub name: String,
    pub description: String,
    pub owner: String,
    pub department: String,
    pub frequency: Frequency,
    pub estimated_time: String,
    pub steps: Vec<ProcessStep>,
}

impl BlockKind for Process {
    const TYPE_ID: &'static str = "process";
    const LABEL: &'static str = "Business Process";
    const FAMILY: Option<&'static str> = Some(classes::PROCESS);

    fn validate(&self) -> Vec<FieldError> {
        if is_blank(&self.name) {
            vec![FieldError::required("name")]
        } else {
            Vec::new()
        }
    }

    fn render(&self, _sanitizer: &dyn Sanitize) -> String {
        if is_blank(&self.name) {
            return String::new();
        }
        let mut out = format!(r#"<div class="{}">"#, classes::PROCESS);
        out.push_str(&format!("<h4>{}</h4>", html::escape(&self.name)));
        if !self.description.is_empty() {
            out.push_str(&format!("<p>{}</p>", html::inline(&self.description)));
        }

        let meta: Vec<String> = [
            ("Owner", self.owner.as_str()),
            ("Department", self.department.as_str()),
            ("Frequency", self.frequency.label()),
            ("Estimated time", self.estimated_time.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| format!("<dt>{label}</dt><dd>{}</dd>", html::escape(value)))
        .collect();
        if !meta.is_empty() {
            out.push_str(&format!("<dl>{}</dl>", meta.concat()));
        }

        if !self.steps.is_empty() {
            out.push_str("<ol>");
            for step in &self.steps {
                out.push_str(&format!("<li><strong>{}</strong>", html::escape(&step.title)));
                if !step.description.is_empty() {
                    out.push_str(&format!("<p>{}</p>", html::inline(&step.description)));
                }
                if !step.responsible.is_empty() {
                    out.push_str(&format!(
                        "<p>Responsible: {}</p>",
                        html::escape(&step.responsible)
                    ));
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
            .required("name", "Process name", Input::text(&self.name))
            .field("description", "Description", Input::text_area(&self.description))
            .field("owner", "Owner", Input::text(&self.owner))
            .field("department", "Department", Input::text(&self.department))
            .field(
                "frequency",
                "Frequency",
                Input::Select {
                    value: self.frequency.as_str().to_string(),
                    options: Frequency::ALL
                        .iter()
                        .map(|f| f.as_str().to_string())
                        .collect(),
                },
            )
            .field(
                "estimatedTime",
                "Estimated time",
                Input::text(&self.estimated_time),
            )
            .field(
                "steps",
                "Steps",
                Input::Rows {
                    columns: vec![
                        "title".to_string(),
                        "description".to_string(),
                        "responsible".to_string(),
                    ],
                    rows: self
                        .steps
                        .iter()
                        .map(|s| {
                            vec![
                                s.title.clone(),
                                s.description.clone(),
                                s.responsible.clone(),
                            ]
                        })
                        .collect(),
                },
            )
    }
}
