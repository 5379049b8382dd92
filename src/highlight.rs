//! Syntax highlighting collaborators.
//!
//! A highlighter turns `(code, language)` into styled lines for display. It
//! never changes how many lines there are: the output has exactly one entry
//! per line of [`split_lines`], which is what the sizer counted.

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;

use crate::language::Language;
use crate::sizing::split_lines;

/// RGBA color
pub type Rgba = (u8, u8, u8, u8);

/// Foreground used when no theme color applies (gray-200).
pub const DEFAULT_FOREGROUND: Rgba = (229, 231, 235, 255);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub color: Rgba,
}

/// One displayed line, as a run of colored spans.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledLine {
    pub spans: Vec<StyledSpan>,
}

impl StyledLine {
    pub fn plain(text: &str, color: Rgba) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        Self {
            spans: vec![StyledSpan {
                text: text.to_string(),
                color,
            }],
        }
    }

    /// Width of the line in characters.
    pub fn char_len(&self) -> usize {
        self.spans.iter().map(|s| s.text.chars().count()).sum()
    }
}

pub trait Highlighter: Send + Sync {
    /// Style `code` as `language`. Must return one line per logical line.
    fn highlight(&self, code: &str, language: Language) -> Vec<StyledLine>;
}

/// Single-color highlighter; deterministic and dependency-free.
#[derive(Debug, Clone, Copy)]
pub struct PlainHighlighter {
    pub color: Rgba,
}

impl Default for PlainHighlighter {
    fn default() -> Self {
        Self {
            color: DEFAULT_FOREGROUND,
        }
    }
}

impl Highlighter for PlainHighlighter {
    fn highlight(&self, code: &str, _language: Language) -> Vec<StyledLine> {
        split_lines(code).map(|line| StyledLine::plain(line, self.color)).collect()
    }
}

pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Highlighter backed by syntect's bundled syntaxes and themes.
pub struct SyntectHighlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl SyntectHighlighter {
    pub fn new() -> Self {
        Self::with_theme(DEFAULT_THEME)
    }

    /// Use a bundled theme by name, falling back to syntect's default theme.
    pub fn with_theme(name: &str) -> Self {
        let mut themes = ThemeSet::load_defaults();
        let theme = themes.themes.remove(name).unwrap_or_else(|| {
            log::warn!("Unknown highlight theme '{}'; using the default theme", name);
            Theme::default()
        });
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, language: Language) -> Vec<StyledLine> {
        let syntax = self
            .syntaxes
            .find_syntax_by_extension(language.extension())
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());
        let mut lines = HighlightLines::new(syntax, &self.theme);

        split_lines(code)
            .map(|line| {
                // The newline-aware syntaxes expect each line to keep its break.
                let with_break = format!("{}\n", line);
                match lines.highlight_line(&with_break, &self.syntaxes) {
                    Ok(ranges) => StyledLine {
                        spans: ranges
                            .into_iter()
                            .map(|(style, text)| StyledSpan {
                                text: text.trim_end_matches('\n').to_string(),
                                color: (
                                    style.foreground.r,
                                    style.foreground.g,
                                    style.foreground.b,
                                    style.foreground.a,
                                ),
                            })
                            .filter(|span| !span.text.is_empty())
                            .collect(),
                    },
                    Err(e) => {
                        log::debug!("Highlighting failed, drawing line unstyled: {}", e);
                        StyledLine::plain(line, DEFAULT_FOREGROUND)
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizing::line_count;

    #[test]
    fn plain_highlighter_keeps_line_structure() {
        let code = "a\r\n\nb\n";
        let lines = PlainHighlighter::default().highlight(code, Language::Ruby);
        assert_eq!(lines.len(), line_count(code));
        assert_eq!(lines[0], StyledLine::plain("a", DEFAULT_FOREGROUND));
        assert!(lines[1].spans.is_empty());
    }

    #[test]
    fn syntect_highlighter_keeps_line_structure_and_text() {
        let h = SyntectHighlighter::new();
        let code = "def f(x):\n    return x + 1\n";
        let lines = h.highlight(code, Language::Python);
        assert_eq!(lines.len(), line_count(code));
        let text: String = lines[1].spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(text, "    return x + 1");
        assert_eq!(lines[1].char_len(), 16);
    }

    #[test]
    fn syntect_highlighter_colors_keywords() {
        let h = SyntectHighlighter::new();
        let lines = h.highlight("function f() { return 1; }", Language::JavaScript);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].spans.len() > 1, "expected several styled spans");
    }

    #[test]
    fn unknown_theme_falls_back() {
        let h = SyntectHighlighter::with_theme("no-such-theme");
        assert_eq!(h.highlight("x", Language::Java).len(), 1);
    }
}
