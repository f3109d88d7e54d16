//! Read-only rendering of documents to display markup.
//!
//! The [`Converter`] is the single path from a document to HTML. Both the
//! public display and an editor session's read-only mode go through it, so
//! the two surfaces cannot drift apart.

pub mod converter;
pub mod html;

pub use converter::Converter;

/// Class names the shared stylesheet keys on. Changing any of these breaks the
/// public site's styling.
pub mod classes {
    pub const PROSE: &str = "article-prose";
    pub const PROCESS: &str = "business-process";
    pub const CONTROL: &str = "control-matrix";
    pub const ROLE: &str = "role-definition";
    pub const MATURITY: &str = "maturity-model";
    pub const FLOW: &str = "process-flow";
    pub const PLACEHOLDER: &str = "block-placeholder";

    // Media blocks
    pub const IMAGE: &str = "article-image";
    pub const WITH_BORDER: &str = "with-border";
    pub const WITH_BACKGROUND: &str = "with-background";
    pub const STRETCHED: &str = "stretched";
    pub const EMBED: &str = "embed-container";
    pub const LINK_PREVIEW: &str = "link-preview";
}

/// External HTML sanitizer applied to raw HTML blocks.
pub trait Sanitize: Send + Sync {
    fn sanitize(&self, html: &str) -> String;
}

impl<F> Sanitize for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn sanitize(&self, html: &str) -> String {
        self(html)
    }
}

/// Fallback sanitizer that escapes everything, so raw HTML shows as text
#[derive(Debug, Clone, Copy, Default)]
pub struct EscapeAll;

impl Sanitize for EscapeAll {
    fn sanitize(&self, html: &str) -> String {
        html::escape(html)
    }
}

/// Visible marker for a block whose type is not registered.
pub fn placeholder(type_id: &str) -> String {
    format!(
        r#"<div class="{}" data-block-type="{}">Unsupported block: {}</div>"#,
        classes::PLACEHOLDER,
        html::attr(type_id),
        html::escape(type_id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_sanitizer() {
        let strip = |html: &str| html.replace("<script>", "");
        assert_eq!(strip.sanitize("<script>x"), "x");
    }

    #[test]
    fn test_escape_all() {
        assert_eq!(EscapeAll.sanitize("<b>x</b>"), "&lt;b&gt;x&lt;/b&gt;");
    }

    #[test]
    fn test_placeholder_escapes_type_id() {
        insta::assert_snapshot!(
            placeholder("<odd>"),
            @r#"<div class="block-placeholder" data-block-type="&lt;odd&gt;">Unsupported block: &lt;odd&gt;</div>"#
        );
    }
}
