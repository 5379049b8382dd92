//! Closed registry of languages the preview can be labelled and highlighted as.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A supported language.
///
/// The set is closed: anything a share token carries that is not listed here
/// falls back to [`Language::DEFAULT`] when decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    JavaScript,
    Python,
    Java,
    Cpp,
    Ruby,
}

impl Language {
    pub const DEFAULT: Language = Language::JavaScript;

    /// Every registry entry, in selector order.
    pub const ALL: [Language; 5] = [
        Language::JavaScript,
        Language::Python,
        Language::Java,
        Language::Cpp,
        Language::Ruby,
    ];

    /// Stable identifier written into share tokens.
    pub fn id(self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::Ruby => "ruby",
        }
    }

    /// Human-readable name for selection widgets.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::Python => "Python",
            Language::Java => "Java",
            Language::Cpp => "C++",
            Language::Ruby => "Ruby",
        }
    }

    /// File extension used for the panel header and for syntax lookup.
    pub fn extension(self) -> &'static str {
        match self {
            Language::JavaScript => "js",
            Language::Python => "py",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::Ruby => "rb",
        }
    }

    /// Header label such as `python.py`.
    pub fn file_label(self) -> String {
        format!("{}.{}", self.id(), self.extension())
    }

    /// Look up a language by id or extension, ignoring ASCII case.
    pub fn lookup(name: &str) -> Option<Language> {
        let name = name.trim();
        Language::ALL
            .into_iter()
            .find(|l| l.id().eq_ignore_ascii_case(name) || l.extension().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when parsing a name outside the registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language '{0}'")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Language::lookup(s).ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}
