use std::fs;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

use codeshot::rendering::{compose_scene, PreviewFrame};
use codeshot::{Document, Language, LayoutConstants, PanelStyle, PlainHighlighter, PreviewLayoutSizer};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push(name);
    p
}

fn check_golden(name: &str, svg: &str) {
    let digest = hex::encode(Sha256::digest(svg.as_bytes()));
    let expected_path = golden_path(name);
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens/expected").ok();
        fs::write(&expected_path, &digest).expect("write golden");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    if !expected_path.exists() {
        println!(
            "No golden at {:?}; run with UPDATE_GOLDENS=1 to create it. Skipping.",
            expected_path
        );
        return;
    }

    let exp = fs::read_to_string(&expected_path).expect("unable to read golden");
    assert_eq!(digest, exp.trim(), "scene for {} changed", name);
}

fn scene_for(code: &str, language: Language) -> String {
    let constants = LayoutConstants::default();
    let frame = PreviewFrame {
        document: Document::new(code, language),
        metrics: PreviewLayoutSizer::new(constants).measure(code),
    };
    compose_scene(&frame, 1, &PlainHighlighter::default(), &constants, &PanelStyle::default()).svg
}

#[test]
fn golden_scene_matches_fixture() {
    let code = fs::read_to_string("tests/goldens/pages/hello.py").expect("read fixture");
    let svg = scene_for(&code, Language::Python);
    assert!(svg.contains("python.py"));
    // 9 lines (trailing newline included) at 20px plus 148px of chrome.
    assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="896" height="328""#));
    // Header label plus the 6 non-empty code lines.
    assert_eq!(svg.matches("<text ").count(), 7);
    assert!(svg.contains(r#"<text x="56" y="107" "#), "first line baseline moved");
    assert!(svg.contains("&quot;&quot;&quot;Say hello.&quot;&quot;&quot;"));
    check_golden("hello_py.sha256", &svg);
}

#[test]
fn scenes_are_deterministic() {
    let a = scene_for("class A {}\n", Language::Java);
    let b = scene_for("class A {}\n", Language::Java);
    assert_eq!(a, b);
    assert_ne!(a, scene_for("class A {}\n", Language::Cpp));
}
