//! Shareable-state codec: `Document` <-> URL-path-safe token.
//!
//! A token is the JSON record `{"code": ..., "language": ...}` encoded with the
//! URL-safe base64 alphabet and no padding, so it never contains `+`, `/` or
//! `=`. Decoding also accepts tokens written with the standard alphabet and
//! padding, which is what older links carry.
//!
//! Decoding is lenient about the language and strict about everything else:
//! a record with a `code` string but a missing or unknown `language` decodes
//! to the default language, while anything that is not such a record is a
//! [`Error::DecodeMalformed`].

use std::fmt;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;

use crate::document::Document;
use crate::language::Language;
use crate::{Error, Result};

const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Opaque, URL-path-safe serialization of a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShareToken(String);

impl ShareToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ShareToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShareToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// How the decoder arrived at the document's language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageResolution {
    /// The record named a registry language.
    Exact,
    /// The record had no `language` field; the default was used.
    Missing,
    /// The record named something outside the registry (kept verbatim); the
    /// default was used.
    Unrecognized(String),
}

impl LanguageResolution {
    pub fn is_fallback(&self) -> bool {
        !matches!(self, LanguageResolution::Exact)
    }
}

/// A decoded document together with how its language was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub document: Document,
    pub language: LanguageResolution,
}

#[derive(Serialize)]
struct WireDocument<'a> {
    code: &'a str,
    language: &'static str,
}

/// Serialize a document into a share token.
///
/// Deterministic: equal documents always produce equal tokens.
pub fn encode(document: &Document) -> Result<ShareToken> {
    let wire = WireDocument {
        code: &document.code,
        language: document.language.id(),
    };
    let json = serde_json::to_vec(&wire).map_err(|e| Error::EncodeFailed(e.to_string()))?;
    Ok(ShareToken(TOKEN_ENGINE.encode(json)))
}

/// Decode a token into a document, discarding how the language was resolved.
pub fn decode(token: &str) -> Result<Document> {
    decode_detailed(token).map(|d| d.document)
}

/// Decode a token and report whether the language had to be defaulted.
pub fn decode_detailed(token: &str) -> Result<Decoded> {
    let normalized = normalize_token(token);
    if normalized.is_empty() {
        return Err(Error::DecodeMalformed("empty token".into()));
    }

    let bytes = TOKEN_ENGINE
        .decode(normalized.as_bytes())
        .map_err(|e| Error::DecodeMalformed(format!("invalid base64: {}", e)))?;
    let text = String::from_utf8(bytes)
        .map_err(|e| Error::DecodeMalformed(format!("payload is not UTF-8: {}", e)))?;
    let record: Value = serde_json::from_str(&text)
        .map_err(|e| Error::DecodeMalformed(format!("payload is not a JSON record: {}", e)))?;

    let Value::Object(mut fields) = record else {
        return Err(Error::DecodeMalformed("payload is not a JSON object".into()));
    };

    let code = match fields.remove("code") {
        Some(Value::String(code)) => code,
        Some(other) => {
            return Err(Error::DecodeMalformed(format!(
                "field `code` must be a string, found {}",
                json_kind(&other)
            )))
        }
        None => return Err(Error::DecodeMalformed("missing field `code`".into())),
    };

    let (language, resolution) = match fields.remove("language") {
        None | Some(Value::Null) => (Language::DEFAULT, LanguageResolution::Missing),
        Some(Value::String(name)) => match Language::lookup(&name) {
            Some(lang) => (lang, LanguageResolution::Exact),
            None => (Language::DEFAULT, LanguageResolution::Unrecognized(name)),
        },
        Some(other) => (
            Language::DEFAULT,
            LanguageResolution::Unrecognized(other.to_string()),
        ),
    };

    match &resolution {
        LanguageResolution::Exact => debug!("Decoded share token ({} bytes of code, {})", code.len(), language),
        LanguageResolution::Missing => warn!("Share token has no language; using {}", language),
        LanguageResolution::Unrecognized(name) => {
            warn!("Share token names unknown language {}; using {}", name, language)
        }
    }

    Ok(Decoded {
        document: Document { code, language },
        language: resolution,
    })
}

/// Map legacy standard-alphabet tokens onto the URL-safe alphabet and drop
/// padding.
fn normalize_token(token: &str) -> String {
    token
        .trim()
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Whether `c` may appear in a token.
pub fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}
