use codeshot::sizing::line_count;
use codeshot::{LayoutConstants, PreviewLayoutSizer};

fn sizer() -> PreviewLayoutSizer {
    PreviewLayoutSizer::new(LayoutConstants {
        line_height_px: 24,
        chrome_padding_px: 100,
        base_height_px: 200,
        max_height_px: None,
    })
}

#[test]
fn empty_code_is_the_floor() {
    assert_eq!(sizer().compute_height(""), 200);
}

#[test]
fn single_line_stays_at_the_floor() {
    assert_eq!(sizer().compute_height("print('hi')"), 200);
}

#[test]
fn twenty_five_lines() {
    let code: Vec<String> = (0..25).map(|i| format!("line {}", i)).collect();
    let code = code.join("\n");
    assert_eq!(line_count(&code), 25);
    assert_eq!(sizer().compute_height(&code), 25 * 24 + 100);
}

#[test]
fn adding_a_line_adds_a_line_height_above_the_floor() {
    let s = sizer();
    let mut code = "x\n".repeat(10);
    code.push('x');
    for _ in 0..40 {
        let before = s.compute_height(&code);
        let longer = format!("{}\nmore", code);
        assert_eq!(line_count(&longer), line_count(&code) + 1);
        assert!(s.compute_height(&longer) >= before + 24);
        code = longer;
    }
}

#[test]
fn height_never_decreases_when_lines_are_added() {
    let s = sizer();
    let mut code = String::new();
    let mut last = s.compute_height(&code);
    for _ in 0..30 {
        code.push('\n');
        let h = s.compute_height(&code);
        assert!(h >= last);
        assert!(h >= 200);
        last = h;
    }
}

#[test]
fn no_cap_by_default() {
    let code = "x\n".repeat(5_000);
    assert_eq!(sizer().compute_height(&code), 5_001 * 24 + 100);
    assert!(!sizer().measure(&code).clamped);
}
