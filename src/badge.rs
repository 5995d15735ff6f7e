// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Coverage and trend badge generation.
//!
//! [`BadgeGenerator`] turns percentages into [`BadgeData`] using the generic
//! coverage palette and renders it through the style-dispatching SVG
//! renderer. Output is deterministic: the same inputs always yield the same
//! bytes.

use crate::{
    config::{BadgeConfig, BadgeStyle},
    context::Context,
    error::Error,
    grading::{EXCELLENT, GradingPolicy, LOW, NEUTRAL_COLOR},
    render::{BadgeData, render_svg}
};

/// Trend changes within this distance of zero are reported as stable.
pub const TREND_TOLERANCE: f64 = 0.1;

/// Per-call overrides applied on top of the generator's [`BadgeConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Style override.
    pub style:      Option<BadgeStyle>,
    /// Label override.
    pub label:      Option<String>,
    /// Logo override.
    pub logo:       Option<String>,
    /// Logo color override.
    pub logo_color: Option<String>,
    /// Timestamp embedded into the document.
    pub timestamp:  Option<String>
}

/// Renders coverage badges from a fixed [`BadgeConfig`].
///
/// # Example
///
/// ```
/// use covbadge::{BadgeGenerator, Context, RenderOptions};
///
/// # fn main() -> Result<(), covbadge::Error> {
/// let generator = BadgeGenerator::default();
/// let svg = generator.generate(&Context::background(), 85.5, &RenderOptions::default())?;
/// let text = String::from_utf8(svg).expect("svg is utf-8");
/// assert!(text.contains("85.5%"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BadgeGenerator {
    config: BadgeConfig,
    policy: GradingPolicy
}

impl Default for BadgeGenerator {
    fn default() -> Self {
        Self::new(BadgeConfig::default())
    }
}

impl BadgeGenerator {
    /// Creates a generator; the coverage palette follows the configured
    /// thresholds.
    pub fn new(config: BadgeConfig) -> Self {
        let policy = GradingPolicy::coverage(&config.thresholds);
        Self {
            config,
            policy
        }
    }

    /// Settings the generator was created with.
    pub fn config(&self) -> &BadgeConfig {
        &self.config
    }

    /// Coverage palette derived from the configured thresholds.
    pub fn policy(&self) -> &GradingPolicy {
        &self.policy
    }

    /// Returns the palette color for a percentage.
    pub fn color_for(&self, percentage: f64) -> &'static str {
        self.policy.grade(percentage).color
    }

    /// Builds the content of a coverage badge without rendering it.
    ///
    /// The percentage is formatted with one decimal and is not clamped.
    pub fn coverage_data(&self, percentage: f64, options: &RenderOptions) -> BadgeData {
        self.decorate(
            options,
            self.label(options),
            format!("{percentage:.1}%"),
            self.color_for(percentage)
        )
    }

    /// Builds the content of a trend badge comparing two measurements.
    pub fn trend_data(&self, current: f64, previous: f64, options: &RenderOptions) -> BadgeData {
        let diff = current - previous;
        let (message, color) = if diff > TREND_TOLERANCE {
            (format!("↑ +{diff:.1}%"), self.band_color(EXCELLENT))
        } else if diff < -TREND_TOLERANCE {
            (format!("↓ {diff:.1}%"), self.band_color(LOW))
        } else {
            ("→ stable".to_owned(), NEUTRAL_COLOR)
        };
        let label = options.label.clone().unwrap_or_else(|| "trend".to_owned());
        self.decorate(options, label, message, color)
    }

    /// Renders a coverage badge.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] when the context is already cancelled.
    pub fn generate(
        &self,
        context: &Context,
        percentage: f64,
        options: &RenderOptions
    ) -> Result<Vec<u8>, Error> {
        self.render(context, &self.coverage_data(percentage, options))
    }

    /// Renders a trend badge for `current` against `previous`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] when the context is already cancelled.
    pub fn generate_trend_badge(
        &self,
        context: &Context,
        current: f64,
        previous: f64,
        options: &RenderOptions
    ) -> Result<Vec<u8>, Error> {
        self.render(context, &self.trend_data(current, previous, options))
    }

    /// Renders arbitrary badge content through the style dispatcher.
    ///
    /// Cancellation is checked once, before any output is produced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] when the context is already cancelled.
    pub fn render(&self, context: &Context, data: &BadgeData) -> Result<Vec<u8>, Error> {
        if context.is_cancelled() {
            return Err(Error::Cancelled);
        }
        Ok(render_svg(data).into_bytes())
    }

    fn label(&self, options: &RenderOptions) -> String {
        options
            .label
            .clone()
            .unwrap_or_else(|| self.config.label.clone())
    }

    fn band_color(&self, name: &str) -> &'static str {
        self.policy
            .band_named(name)
            .map_or(NEUTRAL_COLOR, |band| band.color)
    }

    fn decorate(
        &self,
        options: &RenderOptions,
        label: String,
        message: String,
        color: &str
    ) -> BadgeData {
        let style = options.style.unwrap_or(self.config.style);
        let logo = options.logo.as_deref().or(self.config.logo.as_deref());
        let logo_color = options
            .logo_color
            .as_deref()
            .or(self.config.logo_color.as_deref());

        BadgeData::new(label, message, color, style)
            .with_logo(logo, logo_color)
            .with_timestamp(options.timestamp.clone())
    }
}
