//! The editable document: source text plus a language tag.

use crate::language::Language;

/// Text shown in the preview when the document has no code.
pub const PLACEHOLDER_TEXT: &str = "Paste your code to see the preview";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub code: String,
    pub language: Language,
}

impl Document {
    pub fn new(code: impl Into<String>, language: Language) -> Self {
        Self {
            code: code.into(),
            language,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// The text the preview displays: the code, or the placeholder when empty.
    pub fn display_text(&self) -> &str {
        if self.code.is_empty() {
            PLACEHOLDER_TEXT
        } else {
            &self.code
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_shows_placeholder() {
        let doc = Document::default();
        assert!(doc.is_empty());
        assert_eq!(doc.language, Language::JavaScript);
        assert_eq!(doc.display_text(), PLACEHOLDER_TEXT);
    }

    #[test]
    fn non_empty_document_shows_code() {
        let doc = Document::new("puts 1", Language::Ruby);
        assert_eq!(doc.display_text(), "puts 1");
    }
}
