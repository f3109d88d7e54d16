use serde::Serialize;
use serde_json::{Map, Value};

/// Description of the editable form for one block.
///
/// This is what the editing surface draws instead of the rendered markup. It
/// carries current values so a frontend can bind inputs without knowing the
/// block's concrete payload type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub type_id: String,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    /// Wire name of the field, used as the key in `update` patches
    pub name: String,
    pub label: String,
    pub required: bool,
    pub input: Input,
}

/// Input widget kind together with its current value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Input {
    Text { value: String },
    TextArea { value: String },
    Select { value: String, options: Vec<String> },
    Number { value: i64, min: i64, max: i64 },
    Toggle { value: bool },
    /// One text entry per line, e.g. list items or skills
    Lines { values: Vec<String> },
    /// Ordered sub-records such as process steps. Sent back as one array per
    /// row with cells in column order.
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

impl Form {
    pub fn new(type_id: &str) -> Self {
        Self {
            type_id: type_id.to_string(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: &str, label: &str, input: Input) -> Self {
        self.fields.push(FormField {
            name: name.to_string(),
            label: label.to_string(),
            required: false,
            input,
        });
        self
    }

    pub fn required(mut self, name: &str, label: &str, input: Input) -> Self {
        self.fields.push(FormField {
            name: name.to_string(),
            label: label.to_string(),
            required: true,
            input,
        });
        self
    }

    pub fn get(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Update patch carrying every field's current value
    pub fn to_patch(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.input.to_value()))
            .collect()
    }
}

impl Input {
    pub fn text(value: &str) -> Self {
        Input::Text {
            value: value.to_string(),
        }
    }

    pub fn text_area(value: &str) -> Self {
        Input::TextArea {
            value: value.to_string(),
        }
    }

    pub fn lines(values: &[String]) -> Self {
        Input::Lines {
            values: values.to_vec(),
        }
    }

    /// The value an editor sends back for this input in an `update` patch
    pub fn to_value(&self) -> Value {
        match self {
            Input::Text { value } | Input::TextArea { value } | Input::Select { value, .. } => {
                Value::from(value.as_str())
            }
            Input::Number { value, .. } => Value::from(*value),
            Input::Toggle { value } => Value::Bool(*value),
            Input::Lines { values } => Value::from(values.clone()),
            Input::Rows { rows, .. } => Value::from(rows.clone()),
        }
    }
}
