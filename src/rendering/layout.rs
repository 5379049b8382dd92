/// Panel geometry: where the window chrome, header and code lines go inside a
/// container whose height the sizer already decided.

use serde::{Deserialize, Serialize};

use crate::highlight::DEFAULT_THEME;
use crate::sizing::{LayoutConstants, LayoutMetrics};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }
}

/// Visual measurements of the panel chrome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelStyle {
    /// Narrowest panel; wider code grows the panel instead of wrapping
    pub min_width_px: u32,
    pub outer_padding_px: u32,
    pub header_height_px: u32,
    /// Space between the header and the code area
    pub header_gap_px: u32,
    pub code_padding_px: u32,
    pub corner_radius_px: u32,
    pub font_size_px: u32,
    /// Advance of one monospace character
    pub char_width_px: f32,
    pub font_family: String,
    /// Highlighting theme name
    pub theme: String,
}

impl Default for PanelStyle {
    fn default() -> Self {
        Self {
            min_width_px: 896,
            outer_padding_px: 32,
            header_height_px: 28,
            header_gap_px: 8,
            code_padding_px: 24,
            corner_radius_px: 8,
            font_size_px: 14,
            char_width_px: 8.4,
            font_family: "monospace".to_string(),
            theme: DEFAULT_THEME.to_string(),
        }
    }
}

impl PanelStyle {
    /// Vertical space this style spends on anything but code lines.
    pub fn chrome_padding_px(&self) -> u32 {
        self.frame_height_px() + self.code_padding_px * 2
    }

    /// Fixed vertical chrome around the code area: outer padding, header and gap.
    /// A chrome budget smaller than this leaves no room for the last lines.
    pub fn frame_height_px(&self) -> u32 {
        self.outer_padding_px * 2 + self.header_height_px + self.header_gap_px
    }
}

/// Resolved geometry for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelLayout {
    pub canvas: Rect,
    pub header: Rect,
    pub code: Rect,
    /// Centers of the three header dots
    pub dots: [(i32, i32); 3],
    pub dot_radius: u32,
    /// Baseline origin of the file label
    pub label_origin: (i32, i32),
    /// Left edge of code text and top of the first line
    pub text_origin: (i32, i32),
    pub line_height: u32,
    pub visible_lines: usize,
    /// Present when the container was capped and the code scrolls
    pub scrollbar: Option<Rect>,
}

impl PanelLayout {
    /// Baseline of the `index`-th code line.
    pub fn baseline(&self, index: usize) -> i32 {
        let top = self.text_origin.1 + (index as u32 * self.line_height) as i32;
        top + (self.line_height * 3 / 4) as i32
    }
}

/// Lay out the panel for `metrics`, widening it to fit `longest_line` chars.
pub fn layout_panel(
    metrics: &LayoutMetrics,
    longest_line: usize,
    constants: &LayoutConstants,
    style: &PanelStyle,
) -> PanelLayout {
    let outer = style.outer_padding_px;
    let content_width = (longest_line as f32 * style.char_width_px).ceil() as u32;
    let width = style
        .min_width_px
        .max(outer * 2 + style.code_padding_px * 2 + content_width);
    let height = metrics.container_height_px;
    let inner_width = width.saturating_sub(outer * 2);

    let canvas = Rect { x: 0, y: 0, width, height };
    let header = Rect {
        x: outer as i32,
        y: outer as i32,
        width: inner_width,
        height: style.header_height_px,
    };
    let code_top = outer + style.header_height_px + style.header_gap_px;
    let code = Rect {
        x: outer as i32,
        y: code_top as i32,
        width: inner_width,
        height: height.saturating_sub(code_top + outer),
    };

    // Whatever chrome budget is left after the frame pads the code vertically.
    let pad_top = constants.chrome_padding_px.saturating_sub(style.frame_height_px()) / 2;
    let line_height = constants.line_height_px.max(1);
    let fits = (code.height.saturating_sub(pad_top * 2) / line_height) as usize;
    let visible_lines = metrics.line_count.min(fits.max(1));

    // Any line that does not fit scrolls, whether the cap or the chrome cut it.
    let scrollbar = if visible_lines < metrics.line_count {
        let track = code.height.saturating_sub(8);
        let thumb = (track as u64 * visible_lines as u64 / metrics.line_count as u64) as u32;
        Some(Rect {
            x: code.right() - 8,
            y: code.y + 4,
            width: 4,
            height: thumb.max(8).min(track),
        })
    } else {
        None
    };

    let header_mid = header.y + (header.height / 2) as i32;
    let dot_radius = 6;
    let dots = [0, 1, 2].map(|i| (header.x + 14 + i * 20, header_mid));

    PanelLayout {
        canvas,
        header,
        code,
        dots,
        dot_radius,
        label_origin: (header.x + 14 + 3 * 20 + 4, header_mid + 4),
        text_origin: (code.x + style.code_padding_px as i32, code.y + pad_top as i32),
        line_height,
        visible_lines,
        scrollbar,
    }
}
