//! Preview layout sizing.
//!
//! The exported image has to show the whole document: a scrollable region
//! rasterizes only its visible viewport, so the container is sized from the
//! logical line count rather than from a fixed viewport.

use serde::{Deserialize, Serialize};

pub const DEFAULT_LINE_HEIGHT_PX: u32 = 20;
/// Outer padding, window header and code padding of the default panel style.
pub const DEFAULT_CHROME_PADDING_PX: u32 = 148;
pub const DEFAULT_BASE_HEIGHT_PX: u32 = 200;

/// Fixed per-line and chrome measurements the sizer works from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConstants {
    /// Height of one rendered code line
    pub line_height_px: u32,
    /// Vertical space taken by everything that is not a code line
    pub chrome_padding_px: u32,
    /// Minimum container height
    pub base_height_px: u32,
    /// Optional cap; when hit the preview scrolls internally
    pub max_height_px: Option<u32>,
}

impl Default for LayoutConstants {
    fn default() -> Self {
        Self {
            line_height_px: DEFAULT_LINE_HEIGHT_PX,
            chrome_padding_px: DEFAULT_CHROME_PADDING_PX,
            base_height_px: DEFAULT_BASE_HEIGHT_PX,
            max_height_px: None,
        }
    }
}

/// Derived sizing data for the current code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutMetrics {
    pub line_count: usize,
    pub container_height_px: u32,
    /// The height was capped by `max_height_px`, so not every line is visible.
    pub clamped: bool,
}

/// Split code into the lines an editor would display.
///
/// `\n` and `\r\n` both end a line. A trailing break yields a final empty
/// line, and empty input is a single empty line.
pub fn split_lines(code: &str) -> impl Iterator<Item = &str> {
    code.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line))
}

pub fn line_count(code: &str) -> usize {
    code.bytes().filter(|&b| b == b'\n').count() + 1
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewLayoutSizer {
    constants: LayoutConstants,
}

impl PreviewLayoutSizer {
    pub fn new(constants: LayoutConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &LayoutConstants {
        &self.constants
    }

    /// Height needed to show every line of `code`, ignoring any cap.
    pub fn compute_height(&self, code: &str) -> u32 {
        self.height_for_lines(line_count(code))
    }

    fn height_for_lines(&self, lines: usize) -> u32 {
        let c = &self.constants;
        let lines = u32::try_from(lines).unwrap_or(u32::MAX);
        let content = lines
            .saturating_mul(c.line_height_px)
            .saturating_add(c.chrome_padding_px);
        content.max(c.base_height_px)
    }

    /// Full metrics for `code`, applying the optional cap.
    pub fn measure(&self, code: &str) -> LayoutMetrics {
        let line_count = line_count(code);
        let natural = self.height_for_lines(line_count);
        let (container_height_px, clamped) = match self.constants.max_height_px {
            Some(max) if natural > max => (max.max(self.constants.base_height_px), true),
            _ => (natural, false),
        };
        LayoutMetrics {
            line_count,
            container_height_px,
            clamped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizer(line: u32, chrome: u32, base: u32) -> PreviewLayoutSizer {
        PreviewLayoutSizer::new(LayoutConstants {
            line_height_px: line,
            chrome_padding_px: chrome,
            base_height_px: base,
            max_height_px: None,
        })
    }

    #[test]
    fn line_counting_matches_an_editor() {
        assert_eq!(line_count(""), 1);
        assert_eq!(line_count("a"), 1);
        assert_eq!(line_count("a\n"), 2);
        assert_eq!(line_count("a\nb"), 2);
        assert_eq!(line_count("a\r\nb\r\n"), 3);
        assert_eq!(line_count("\n\n"), 3);
    }

    #[test]
    fn split_lines_agrees_with_line_count() {
        for code in ["", "a", "a\n", "a\r\nb", "x\n\ny\r\n"] {
            assert_eq!(split_lines(code).count(), line_count(code), "{:?}", code);
        }
        let lines: Vec<_> = split_lines("a\r\nb\n").collect();
        assert_eq!(lines, vec!["a", "b", ""]);
    }

    #[test]
    fn empty_code_yields_base_height() {
        assert_eq!(sizer(24, 100, 200).compute_height(""), 200);
        assert_eq!(PreviewLayoutSizer::default().compute_height(""), DEFAULT_BASE_HEIGHT_PX);
    }

    #[test]
    fn tall_code_exceeds_the_floor() {
        let code = vec!["x"; 25].join("\n");
        assert_eq!(sizer(24, 100, 200).compute_height(&code), 700);
    }

    #[test]
    fn cap_clamps_and_flags() {
        let s = PreviewLayoutSizer::new(LayoutConstants {
            max_height_px: Some(300),
            ..LayoutConstants::default()
        });
        let m = s.measure(&"x\n".repeat(50));
        assert_eq!(m.container_height_px, 300);
        assert!(m.clamped);
        assert_eq!(m.line_count, 51);

        let m = s.measure("short");
        assert_eq!(m.container_height_px, DEFAULT_BASE_HEIGHT_PX);
        assert!(!m.clamped);
    }

    #[test]
    fn saturates_instead_of_overflowing() {
        let s = sizer(u32::MAX, u32::MAX, 1);
        assert_eq!(s.compute_height("a\nb"), u32::MAX);
    }
}
