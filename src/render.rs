// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Shields-style SVG rendering.
//!
//! [`BadgeData`] fully determines the emitted bytes: the same data always
//! renders to the same document. Geometry follows a fixed-pitch text width
//! approximation for an 11px sans-serif font so that sizes can be computed
//! without font metrics.

use std::{borrow::Cow, fmt::Write as _};

use serde::{Deserialize, Serialize};

use crate::{config::BadgeStyle, logo::resolve_logo};

/// Width reserved for a logo when one is present.
pub const LOGO_WIDTH: u32 = 16;
/// Fixed horizontal padding added to every badge.
pub const HORIZONTAL_PADDING: u32 = 28;
/// Height of `flat` and `flat-square` badges.
pub const BADGE_HEIGHT: u32 = 20;
/// Height of `for-the-badge` badges.
pub const TALL_BADGE_HEIGHT: u32 = 28;

const LABEL_BACKGROUND: &str = "#555";
const FONT_FAMILY: &str = "Verdana,Geneva,DejaVu Sans,sans-serif";

/// Approximates the rendered width of `text` as `ceil(bytes * 6.5)`.
///
/// # Examples
///
/// ```
/// use covbadge::text_width;
///
/// assert_eq!(text_width("coverage"), 52);
/// assert_eq!(text_width("85.5%"), 33);
/// ```
pub fn text_width(text: &str) -> u32 {
    (text.len() as f64 * 6.5).ceil() as u32
}

/// Pixel size of a rendered badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Total width in pixels.
    pub width:  u32,
    /// Total height in pixels.
    pub height: u32
}

/// Computed geometry of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeLayout {
    label_width:   u32,
    message_width: u32,
    logo_width:    u32,
    height:        u32
}

impl BadgeLayout {
    /// Measures a badge from its texts, logo presence and style.
    ///
    /// `for-the-badge` text is measured in the upper-cased form it is drawn
    /// in.
    pub fn measure(label: &str, message: &str, has_logo: bool, style: BadgeStyle) -> Self {
        Self {
            label_width:   text_width(&displayed_text(label, style)),
            message_width: text_width(&displayed_text(message, style)),
            logo_width:    if has_logo { LOGO_WIDTH } else { 0 },
            height:        match style {
                BadgeStyle::ForTheBadge => TALL_BADGE_HEIGHT,
                BadgeStyle::Flat | BadgeStyle::FlatSquare => BADGE_HEIGHT
            }
        }
    }

    /// Total width: label, message and logo widths plus fixed padding.
    pub fn width(&self) -> u32 {
        self.label_width + self.message_width + self.logo_width + HORIZONTAL_PADDING
    }

    /// Badge height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width of the gray label section, logo included.
    pub fn label_section_width(&self) -> u32 {
        self.logo_width + self.label_width + 10
    }

    /// Width of the colored message section.
    pub fn message_section_width(&self) -> u32 {
        self.width() - self.label_section_width()
    }

    /// Horizontal center of the label text.
    pub fn label_x(&self) -> u32 {
        self.logo_width + self.label_width / 2 + 6
    }

    /// Horizontal center of the message text.
    pub fn message_x(&self) -> u32 {
        self.logo_width + self.label_width + self.message_width / 2 + 16
    }

    /// Width and height as a serializable value.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width:  self.width(),
            height: self.height
        }
    }
}

/// Content of a single badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeData {
    /// Left-hand text.
    pub label:      String,
    /// Right-hand text.
    pub message:    String,
    /// Hex color of the message section.
    pub color:      String,
    /// Visual style.
    pub style:      BadgeStyle,
    /// Resolved logo reference placed in the `<image>` element.
    pub logo:       Option<String>,
    /// Accessible description, also used as `<title>`.
    pub aria_label: String,
    /// Optional generation timestamp embedded as an XML comment.
    pub timestamp:  Option<String>
}

impl BadgeData {
    /// Creates badge content with an aria label of `"{label}: {message}"`.
    pub fn new(
        label: impl Into<String>,
        message: impl Into<String>,
        color: impl Into<String>,
        style: BadgeStyle
    ) -> Self {
        let label = label.into();
        let message = message.into();
        let aria_label = format!("{label}: {message}");
        Self {
            label,
            message,
            color: color.into(),
            style,
            logo: None,
            aria_label,
            timestamp: None
        }
    }

    /// Attaches a logo; unknown logo references leave the badge without one.
    pub fn with_logo(mut self, logo: Option<&str>, logo_color: Option<&str>) -> Self {
        self.logo = logo
            .and_then(|reference| resolve_logo(reference, logo_color))
            .map(str::to_owned);
        self
    }

    /// Embeds a generation timestamp into the rendered document.
    pub fn with_timestamp(mut self, timestamp: Option<String>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Geometry of the badge.
    pub fn layout(&self) -> BadgeLayout {
        BadgeLayout::measure(&self.label, &self.message, self.logo.is_some(), self.style)
    }
}

/// Renders badge content with the renderer matching its style.
pub fn render_svg(data: &BadgeData) -> String {
    match data.style {
        BadgeStyle::Flat => render_flat(data),
        BadgeStyle::FlatSquare => render_flat_square(data),
        BadgeStyle::ForTheBadge => render_for_the_badge(data)
    }
}

fn render_flat(data: &BadgeData) -> String {
    let layout = data.layout();
    let width = layout.width();
    let height = layout.height();
    let mut buffer = String::with_capacity(1024);

    write_header(&mut buffer, data, &layout);
    buffer.push_str(
        "  <linearGradient id=\"s\" x2=\"0\" y2=\"100%\">\n    <stop offset=\"0\" stop-color=\"#bbb\" stop-opacity=\".1\"/>\n    <stop offset=\"1\" stop-opacity=\".1\"/>\n  </linearGradient>\n"
    );
    let _ = writeln!(
        buffer,
        "  <clipPath id=\"r\">\n    <rect width=\"{width}\" height=\"{height}\" rx=\"3\" fill=\"#fff\"/>\n  </clipPath>"
    );
    buffer.push_str("  <g clip-path=\"url(#r)\">\n");
    write_sections(&mut buffer, data, &layout);
    let _ = writeln!(
        buffer,
        "    <rect width=\"{width}\" height=\"{height}\" fill=\"url(#s)\"/>\n  </g>"
    );
    write_text_group(&mut buffer, data, &layout, TextPass::WithShadow);
    buffer.push_str("</svg>\n");

    buffer
}

fn render_flat_square(data: &BadgeData) -> String {
    let layout = data.layout();
    let mut buffer = String::with_capacity(768);

    write_header(&mut buffer, data, &layout);
    buffer.push_str("  <g shape-rendering=\"crispEdges\">\n");
    write_sections(&mut buffer, data, &layout);
    buffer.push_str("  </g>\n");
    write_text_group(&mut buffer, data, &layout, TextPass::Single);
    buffer.push_str("</svg>\n");

    buffer
}

fn render_for_the_badge(data: &BadgeData) -> String {
    let layout = data.layout();
    let mut buffer = String::with_capacity(768);

    write_header(&mut buffer, data, &layout);
    buffer.push_str("  <g shape-rendering=\"crispEdges\">\n");
    write_sections(&mut buffer, data, &layout);
    buffer.push_str("  </g>\n");
    write_text_group(&mut buffer, data, &layout, TextPass::Bold);
    buffer.push_str("</svg>\n");

    buffer
}

fn write_header(buffer: &mut String, data: &BadgeData, layout: &BadgeLayout) {
    let aria = escape_xml(&data.aria_label);
    let _ = writeln!(
        buffer,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{}\" height=\"{}\" role=\"img\" aria-label=\"{aria}\">",
        layout.width(),
        layout.height()
    );
    let _ = writeln!(buffer, "  <title>{aria}</title>");
    if let Some(timestamp) = data.timestamp.as_deref() {
        // "--" is not allowed inside XML comments.
        let _ = writeln!(buffer, "  <!-- generated {} -->", timestamp.replace("--", "- -"));
    }
}

fn write_sections(buffer: &mut String, data: &BadgeData, layout: &BadgeLayout) {
    let height = layout.height();
    let label_section = layout.label_section_width();
    let _ = writeln!(
        buffer,
        "    <rect width=\"{label_section}\" height=\"{height}\" fill=\"{LABEL_BACKGROUND}\"/>"
    );
    let _ = writeln!(
        buffer,
        "    <rect x=\"{label_section}\" width=\"{}\" height=\"{height}\" fill=\"{}\"/>",
        layout.message_section_width(),
        escape_xml(&data.color)
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextPass {
    WithShadow,
    Single,
    Bold
}

fn write_text_group(buffer: &mut String, data: &BadgeData, layout: &BadgeLayout, pass: TextPass) {
    let weight = if pass == TextPass::Bold { " font-weight=\"bold\"" } else { "" };
    let _ = writeln!(
        buffer,
        "  <g fill=\"#fff\" text-anchor=\"middle\" font-family=\"{FONT_FAMILY}\" text-rendering=\"geometricPrecision\" font-size=\"11\"{weight}>"
    );

    if let Some(logo) = data.logo.as_deref() {
        let logo_y = (layout.height() - 14) / 2;
        let _ = writeln!(
            buffer,
            "    <image x=\"5\" y=\"{logo_y}\" width=\"14\" height=\"14\" xlink:href=\"{}\"/>",
            escape_xml(logo)
        );
    }

    let label = displayed_text(&data.label, data.style);
    let message = displayed_text(&data.message, data.style);
    let baseline = layout.height() / 2 + 4;

    for (x, text) in [(layout.label_x(), label), (layout.message_x(), message)] {
        let escaped = escape_xml(&text);
        if pass == TextPass::WithShadow {
            let _ = writeln!(
                buffer,
                "    <text aria-hidden=\"true\" x=\"{x}\" y=\"{}\" fill=\"#010101\" fill-opacity=\".3\">{escaped}</text>",
                baseline + 1
            );
        }
        let _ = writeln!(buffer, "    <text x=\"{x}\" y=\"{baseline}\">{escaped}</text>");
    }

    buffer.push_str("  </g>\n");
}

/// Text as drawn for a style.
fn displayed_text(text: &str, style: BadgeStyle) -> Cow<'_, str> {
    match style {
        BadgeStyle::ForTheBadge => Cow::Owned(text.to_uppercase()),
        BadgeStyle::Flat | BadgeStyle::FlatSquare => Cow::Borrowed(text)
    }
}

/// Escapes XML special characters, borrowing when nothing needs escaping.
pub fn escape_xml(value: &str) -> Cow<'_, str> {
    if value
        .chars()
        .any(|character| matches!(character, '&' | '<' | '>' | '\"' | '\''))
    {
        let mut escaped = String::with_capacity(value.len());
        for character in value.chars() {
            match character {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '\"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&apos;"),
                other => escaped.push(other)
            }
        }
        Cow::Owned(escaped)
    } else {
        Cow::Borrowed(value)
    }
}
