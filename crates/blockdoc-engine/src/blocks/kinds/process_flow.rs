use serde::{Deserialize, Serialize};

use crate::blocks::{BlockKind, FieldError, Form, Input, is_blank};
use crate::render::{Sanitize, classes, html};

/// One step of a flow. Accepts a bare string on input, as the form sends it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawFlowStep")]
pub struct FlowStep {
    pub text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlowStep {
    Text(String),
    Step {
        #[serde(default)]
        text: String,
    },
}

impl From<RawFlowStep> for FlowStep {
    fn from(raw: RawFlowStep) -> Self {
        match raw {
            RawFlowStep::Text(text) | RawFlowStep::Step { text } => Self { text },
        }
    }
}

/// Linear sequence of steps drawn as a flow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessFlow {
    pub title: String,
    pub steps: Vec<FlowStep>,
}

impl ProcessFlow {
    const DEFAULT_TITLE: &'static str = "Process Flow";
}

impl BlockKind for ProcessFlow {
    const TYPE_ID: &'static str = "processFlow";
    const LABEL: &'static str = "Process Flow";
    const FAMILY: Option<&'static str> = Some(classes::FLOW);

    fn validate(&self) -> Vec<FieldError> {
        if self.steps.is_empty() {
            return vec![FieldError::new("steps", "needs at least one step")];
        }
        self.steps
            .iter()
            .enumerate()
            .filter(|(_, step)| is_blank(&step.text))
            .map(|(i, _)| FieldError::required(format!("steps[{i}].text")))
            .collect()
    }

    fn render(&self, _sanitizer: &dyn Sanitize) -> String {
        if self.steps.is_empty() {
            return String::new();
        }
        let title = if is_blank(&self.title) {
            Self::DEFAULT_TITLE
        } else {
            self.title.as_str()
        };
        let steps: String = self
            .steps
            .iter()
            .map(|step| format!("<li>{}</li>", html::inline(&step.text)))
            .collect();
        format!(
            r#"<div class="{}"><h4>{}</h4><ol>{steps}</ol></div>"#,
            classes::FLOW,
            html::escape(title)
        )
    }

    fn form(&self) -> Form {
        let steps: Vec<String> = self.steps.iter().map(|s| s.text.clone()).collect();
        Form::new(Self::TYPE_ID)
            .field("title", "Title", Input::text(&self.title))
            .required("steps", "Steps", Input::lines(&steps))
    }
}
