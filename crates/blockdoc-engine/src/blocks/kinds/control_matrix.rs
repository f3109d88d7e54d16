use serde::{Deserialize, Serialize};

use crate::blocks::{BlockKind, FieldError, Form, Input};
use crate::render::{Sanitize, classes, html};

/// One parsed control: `id | description | type | risk level`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControlRow {
    pub id: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(alias = "risk")]
    pub risk_level: String,
}

/// A control matrix entry. Lines that do not parse into a row are kept as-is
/// so nothing the author typed is lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, from = "RawControlLine")]
pub enum ControlLine {
    Row(ControlRow),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawControlLine {
    Row(ControlRow),
    Text(String),
}

impl From<RawControlLine> for ControlLine {
    fn from(raw: RawControlLine) -> Self {
        match raw {
            RawControlLine::Row(row) => ControlLine::Row(row),
            RawControlLine::Text(text) => ControlLine::parse(&text),
        }
    }
}

impl ControlLine {
    const FIELDS: usize = 4;

    /// Parse one pipe-separated line
    pub fn parse(line: &str) -> Self {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let parts: Vec<&str> = line.split('|').map(str::trim).collect();
        match parts.as_slice() {
            [id, description, kind, risk_level] => ControlLine::Row(ControlRow {
                id: id.to_string(),
                description: description.to_string(),
                kind: kind.to_string(),
                risk_level: risk_level.to_string(),
            }),
            _ => ControlLine::Text(line.to_string()),
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            ControlLine::Row(row) => [
                row.id.as_str(),
                row.description.as_str(),
                row.kind.as_str(),
                row.risk_level.as_str(),
            ]
            .join(" | "),
            ControlLine::Text(text) => text.clone(),
        }
    }
}

/// Controls as stored, or the form's free text with one control per line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawControlMatrix")]
pub struct ControlMatrix {
    pub controls: Vec<ControlLine>,
}

#[derive(Deserialize)]
struct RawControlMatrix {
    #[serde(default)]
    controls: RawControls,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawControls {
    Lines(Vec<ControlLine>),
    Text(String),
}

impl Default for RawControls {
    fn default() -> Self {
        RawControls::Lines(Vec::new())
    }
}

impl From<RawControlMatrix> for ControlMatrix {
    fn from(raw: RawControlMatrix) -> Self {
        match raw.controls {
            RawControls::Lines(controls) => Self { controls },
            RawControls::Text(text) => Self::from_text(&text),
        }
    }
}

impl ControlMatrix {
    /// Build a matrix from the editor's free-text form, one control per line.
    pub fn from_text(text: &str) -> Self {
        Self {
            controls: text
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(ControlLine::parse)
                .collect(),
        }
    }

    pub fn to_text(&self) -> String {
        self.controls
            .iter()
            .map(ControlLine::to_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl BlockKind for ControlMatrix {
    const TYPE_ID: &'static str = "controlMatrix";
    const LABEL: &'static str = "Control Matrix";
    const FAMILY: Option<&'static str> = Some(classes::CONTROL);

    fn validate(&self) -> Vec<FieldError> {
        self.controls
            .iter()
            .enumerate()
            .filter_map(|(i, line)| match line {
                ControlLine::Row(row) if row.id.trim().is_empty() => {
                    Some(FieldError::required(format!("controls[{i}].id")))
                }
                _ => None,
            })
            .collect()
    }

    fn render(&self, _sanitizer: &dyn Sanitize) -> String {
        if self.controls.is_empty() {
            return String::new();
        }
        let mut out = format!(
            r#"<div class="{}"><table><thead><tr><th>ID</th><th>Description</th><th>Type</th><th>Risk Level</th></tr></thead><tbody>"#,
            classes::CONTROL
        );
        for line in &self.controls {
            match line {
                ControlLine::Row(row) => out.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    html::escape(&row.id),
                    html::escape(&row.description),
                    html::escape(&row.kind),
                    html::escape(&row.risk_level)
                )),
                ControlLine::Text(text) => out.push_str(&format!(
                    r#"<tr><td colspan="{}">{}</td></tr>"#,
                    ControlLine::FIELDS,
                    html::escape(text)
                )),
            }
        }
        out.push_str("</tbody></table></div>");
        out
    }

    fn form(&self) -> Form {
        Form::new(Self::TYPE_ID).field(
            "controls",
            "Controls (ID | Description | Type | Risk Level)",
            Input::text_area(&self.to_text()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::EscapeAll;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_parse_four_fields_into_row() {
        assert_eq!(
            ControlLine::parse("C-101 | Segregation of duties | Preventive | High"),
            ControlLine::Row(ControlRow {
                id: "C-101".to_string(),
                description: "Segregation of duties".to_string(),
                kind: "Preventive".to_string(),
                risk_level: "High".to_string(),
            })
        );
    }

    #[rstest]
    #[case("C-102 | Needs review")]
    #[case("just a note")]
    #[case("a | b | c | d | e")]
    fn test_other_lines_kept_verbatim(#[case] line: &str) {
        assert_eq!(ControlLine::parse(line), ControlLine::Text(line.to_string()));
    }

    #[test]
    fn test_from_text_skips_blank_lines() {
        let matrix = ControlMatrix::from_text("C-1 | a | b | c\r\n   \nloose note\n");
        assert_eq!(matrix.controls.len(), 2);
        assert_eq!(matrix.to_text(), "C-1 | a | b | c\nloose note");
    }

    #[test]
    fn test_wire_accepts_rows_strings_and_legacy_risk() {
        let matrix: ControlMatrix = serde_json::from_value(json!({
            "controls": [
                {"id": "C-1", "description": "d", "type": "Detective", "risk": "Low"},
                "C-2 | e | Preventive | High",
                "free text"
            ]
        }))
        .unwrap();

        assert_eq!(
            matrix.controls[0],
            ControlLine::Row(ControlRow {
                id: "C-1".to_string(),
                description: "d".to_string(),
                kind: "Detective".to_string(),
                risk_level: "Low".to_string(),
            })
        );
        assert!(matches!(&matrix.controls[1], ControlLine::Row(row) if row.id == "C-2"));
        assert_eq!(matrix.controls[2], ControlLine::Text("free text".to_string()));

        let value = serde_json::to_value(&matrix).unwrap();
        assert_eq!(value["controls"][0]["riskLevel"], "Low");
        assert_eq!(value["controls"][2], "free text");
    }

    #[test]
    fn test_controls_accept_form_text() {
        let matrix: ControlMatrix =
            serde_json::from_value(json!({"controls": "C-1 | a | b | c\nnote"})).unwrap();
        assert_eq!(matrix, ControlMatrix::from_text("C-1 | a | b | c\nnote"));
    }

    #[test]
    fn test_empty_matrix_renders_nothing() {
        insta::assert_snapshot!(ControlMatrix::default().render(&EscapeAll), @"");
    }

    #[test]
    fn test_row_without_id_is_invalid() {
        let matrix = ControlMatrix::from_text(" | orphan | Manual | Low\nnote");
        assert_eq!(
            matrix.validate(),
            vec![FieldError::required("controls[0].id")]
        );
    }

    #[test]
    fn test_render_keeps_opaque_lines_visible() {
        let matrix = ControlMatrix::from_text("C-1 | Dual <sign> | Preventive | High\nC-2 | todo");
        insta::assert_snapshot!(
            matrix.render(&EscapeAll),
            @r#"<div class="control-matrix"><table><thead><tr><th>ID</th><th>Description</th><th>Type</th><th>Risk Level</th></tr></thead><tbody><tr><td>C-1</td><td>Dual &lt;sign&gt;</td><td>Preventive</td><td>High</td></tr><tr><td colspan="4">C-2 | todo</td></tr></tbody></table></div>"#
        );
    }
}
