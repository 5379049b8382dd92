/// Paint commands for the code panel and their SVG serialization.

use crate::highlight::{Rgba, StyledLine, StyledSpan};
use crate::rendering::layout::{PanelLayout, PanelStyle};

const TAB_WIDTH: usize = 4;

mod colors {
    use crate::highlight::Rgba;

    pub const GRADIENT: [Rgba; 3] = [(37, 99, 235, 255), (14, 165, 233, 255), (251, 146, 60, 255)];
    pub const DIM: Rgba = (0, 0, 0, 128);
    pub const HEADER: Rgba = (31, 41, 55, 255);
    pub const CODE_BG: Rgba = (17, 24, 39, 255);
    pub const DOTS: [Rgba; 3] = [(239, 68, 68, 255), (234, 179, 8, 255), (34, 197, 94, 255)];
    pub const LABEL: Rgba = (156, 163, 175, 255);
    pub const PLACEHOLDER: Rgba = (107, 114, 128, 255);
    pub const SCROLLBAR: Rgba = (75, 85, 99, 255);
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    /// Diagonal gradient from top-left to bottom-right
    GradientRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        radius: u32,
        stops: Vec<Rgba>,
    },
    SolidRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        radius: u32,
        rgba: Rgba,
    },
    Circle {
        cx: i32,
        cy: i32,
        r: u32,
        rgba: Rgba,
    },
    Text {
        x: i32,
        y: i32,
        font_size: u32,
        spans: Vec<StyledSpan>,
    },
}

/// Replace tabs so character counts match drawn widths.
pub fn expand_tabs(lines: &mut [StyledLine]) {
    for span in lines.iter_mut().flat_map(|l| l.spans.iter_mut()) {
        if span.text.contains('\t') {
            span.text = span.text.replace('\t', &" ".repeat(TAB_WIDTH));
        }
    }
}

/// Build the paint list for a laid-out panel.
///
/// `placeholder` draws the lines muted, for documents without code.
pub fn paint_panel(
    layout: &PanelLayout,
    lines: &[StyledLine],
    label: &str,
    placeholder: bool,
    style: &PanelStyle,
) -> Vec<PaintCommand> {
    let radius = style.corner_radius_px;
    let mut cmds = vec![
        PaintCommand::GradientRect {
            x: layout.canvas.x,
            y: layout.canvas.y,
            width: layout.canvas.width,
            height: layout.canvas.height,
            radius,
            stops: colors::GRADIENT.to_vec(),
        },
        PaintCommand::SolidRect {
            x: layout.canvas.x,
            y: layout.canvas.y,
            width: layout.canvas.width,
            height: layout.canvas.height,
            radius,
            rgba: colors::DIM,
        },
        PaintCommand::SolidRect {
            x: layout.header.x,
            y: layout.header.y,
            width: layout.header.width,
            height: layout.header.height,
            radius,
            rgba: colors::HEADER,
        },
    ];

    for (&(cx, cy), rgba) in layout.dots.iter().zip(colors::DOTS) {
        cmds.push(PaintCommand::Circle {
            cx,
            cy,
            r: layout.dot_radius,
            rgba,
        });
    }

    cmds.push(PaintCommand::Text {
        x: layout.label_origin.0,
        y: layout.label_origin.1,
        font_size: style.font_size_px.saturating_sub(1).max(1),
        spans: vec![StyledSpan {
            text: label.to_string(),
            color: colors::LABEL,
        }],
    });

    cmds.push(PaintCommand::SolidRect {
        x: layout.code.x,
        y: layout.code.y,
        width: layout.code.width,
        height: layout.code.height,
        radius,
        rgba: colors::CODE_BG,
    });

    for (i, line) in lines.iter().take(layout.visible_lines).enumerate() {
        if line.spans.is_empty() {
            continue;
        }
        let spans = if placeholder {
            line.spans
                .iter()
                .map(|s| StyledSpan {
                    text: s.text.clone(),
                    color: colors::PLACEHOLDER,
                })
                .collect()
        } else {
            line.spans.clone()
        };
        cmds.push(PaintCommand::Text {
            x: layout.text_origin.0,
            y: layout.baseline(i),
            font_size: style.font_size_px,
            spans,
        });
    }

    if let Some(bar) = layout.scrollbar {
        cmds.push(PaintCommand::SolidRect {
            x: bar.x,
            y: bar.y,
            width: bar.width,
            height: bar.height,
            radius: bar.width / 2,
            rgba: colors::SCROLLBAR,
        });
    }

    cmds
}

/// Serialize paint commands into a standalone SVG document.
pub fn to_svg(cmds: &[PaintCommand], width: u32, height: u32, font_family: &str) -> String {
    let mut defs = String::new();
    let mut body = String::new();
    let family = escape_xml(font_family);

    for cmd in cmds {
        match cmd {
            PaintCommand::GradientRect { x, y, width, height, radius, stops } => {
                let id = format!("g{}", defs.matches("<linearGradient").count());
                defs.push_str(&format!(
                    r#"<linearGradient id="{}" x1="0" y1="0" x2="1" y2="1">"#,
                    id
                ));
                let last = stops.len().saturating_sub(1).max(1);
                for (i, stop) in stops.iter().enumerate() {
                    defs.push_str(&format!(
                        r#"<stop offset="{:.3}" stop-color="{}"{}/>"#,
                        i as f32 / last as f32,
                        hex_color(*stop),
                        opacity_attr("stop-opacity", *stop)
                    ));
                }
                defs.push_str("</linearGradient>");
                body.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="url(#{})"/>"#,
                    x, y, width, height, radius, id
                ));
            }
            PaintCommand::SolidRect { x, y, width, height, radius, rgba } => {
                body.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}"{}/>"#,
                    x,
                    y,
                    width,
                    height,
                    radius,
                    hex_color(*rgba),
                    opacity_attr("fill-opacity", *rgba)
                ));
            }
            PaintCommand::Circle { cx, cy, r, rgba } => {
                body.push_str(&format!(
                    r#"<circle cx="{}" cy="{}" r="{}" fill="{}"{}/>"#,
                    cx,
                    cy,
                    r,
                    hex_color(*rgba),
                    opacity_attr("fill-opacity", *rgba)
                ));
            }
            PaintCommand::Text { x, y, font_size, spans } => {
                body.push_str(&format!(
                    r#"<text x="{}" y="{}" font-family="{}" font-size="{}" xml:space="preserve">"#,
                    x, y, family, font_size
                ));
                for span in spans {
                    body.push_str(&format!(
                        r#"<tspan fill="{}"{}>{}</tspan>"#,
                        hex_color(span.color),
                        opacity_attr("fill-opacity", span.color),
                        escape_xml(&span.text)
                    ));
                }
                body.push_str("</text>");
            }
        }
    }

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><defs>{defs}</defs>{body}</svg>"#,
        w = width,
        h = height,
        defs = defs,
        body = body
    )
}

fn hex_color((r, g, b, _): Rgba) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

fn opacity_attr(name: &str, (_, _, _, a): Rgba) -> String {
    if a == 255 {
        String::new()
    } else {
        format!(r#" {}="{:.3}""#, name, a as f32 / 255.0)
    }
}

/// Escape text for XML content and attributes. Characters XML cannot carry
/// become U+FFFD.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}' => out.push('\u{FFFD}'),
            c => out.push(c),
        }
    }
    out
}
