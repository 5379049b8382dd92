use codeshot::codec::{self, is_token_char};
use codeshot::{Document, Error, Language, LanguageResolution};

fn corpus() -> Vec<String> {
    vec![
        String::new(),
        "print('hi')".to_string(),
        "fn main() {\n    println!(\"{}\", 1 + 1);\n}\n".to_string(),
        "a".repeat(10_000),
        "tabs\tand\r\nwindows\r\nbreaks".to_string(),
        "unicode: \u{00e9}\u{4e2d}\u{6587} \u{1F980} \u{200d}".to_string(),
        "\"quotes\" and \\backslashes\\ and {\"json\": true}".to_string(),
        ">>>???///+++===".to_string(),
        "\u{0}\u{1}\u{7f} control".to_string(),
    ]
}

#[test]
fn round_trip_for_every_language() {
    for code in corpus() {
        for lang in Language::ALL {
            let doc = Document::new(code.clone(), lang);
            let token = codec::encode(&doc).expect("encode");
            assert_eq!(codec::decode(token.as_str()).expect("decode"), doc);
        }
    }
}

#[test]
fn tokens_are_path_safe() {
    for code in corpus() {
        let token = codec::encode(&Document::new(code, Language::Cpp)).unwrap();
        assert!(
            token.as_str().chars().all(is_token_char),
            "unsafe character in {}",
            token
        );
        assert!(!token.as_str().ends_with('='));
    }
}

#[test]
fn distinct_documents_get_distinct_tokens() {
    let a = codec::encode(&Document::new("x", Language::Python)).unwrap();
    let b = codec::encode(&Document::new("x", Language::Ruby)).unwrap();
    let c = codec::encode(&Document::new("x ", Language::Python)).unwrap();
    assert_ne!(a, b);
    assert_ne!(a, c);
}

#[test]
fn print_hi_example() {
    let doc = Document::new("print('hi')", Language::Python);
    let token = codec::encode(&doc).unwrap();
    let decoded = codec::decode_detailed(token.as_str()).unwrap();
    assert_eq!(decoded.document.code, "print('hi')");
    assert_eq!(decoded.document.language, Language::Python);
    assert_eq!(decoded.language, LanguageResolution::Exact);
}

#[test]
fn unknown_language_keeps_code() {
    use base64::Engine as _;
    let json = r#"{"code":"main = putStrLn \"hi\"","language":"haskell"}"#;
    let token = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(json);
    let decoded = codec::decode_detailed(&token).unwrap();
    assert_eq!(decoded.document.code, "main = putStrLn \"hi\"");
    assert_eq!(decoded.document.language, Language::DEFAULT);
    assert!(decoded.language.is_fallback());
}

#[test]
fn noise_is_malformed() {
    for noise in ["not base64 at all!", "@@@@", "====", "Zm9v", "eyJjb2RlIjo"] {
        match codec::decode(noise) {
            Err(Error::DecodeMalformed(_)) => {}
            other => panic!("{:?} decoded to {:?}", noise, other),
        }
    }
}
