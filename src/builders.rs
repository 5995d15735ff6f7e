// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Content builders for the six PR badge types.
//!
//! Coverage and trend badges delegate to the [`BadgeGenerator`]; the other
//! four build [`BadgeData`] from their own grading policies, which are kept
//! separate from the generator's coverage palette.

use crate::{
    badge::{BadgeGenerator, RenderOptions, TREND_TOLERANCE},
    config::{BadgeStyle, BadgeType},
    grading::{GradingPolicy, NEGATIVE_COLOR, NEUTRAL_COLOR, POSITIVE_COLOR},
    render::BadgeData,
    request::PrBadgeRequest
};

/// Smallest absolute difference the diff badge reports as a change.
pub const DIFF_SIGNIFICANCE: f64 = 0.5;

/// Grading policies used by the status, diff and quality builders.
#[derive(Debug, Clone)]
pub struct ContentBuilders {
    status:  GradingPolicy,
    quality: GradingPolicy,
    diff:    GradingPolicy
}

impl Default for ContentBuilders {
    fn default() -> Self {
        Self::new(
            GradingPolicy::status(),
            GradingPolicy::quality(),
            GradingPolicy::diff_magnitude()
        )
    }
}

impl ContentBuilders {
    /// Creates builders with explicit policies.
    pub fn new(status: GradingPolicy, quality: GradingPolicy, diff: GradingPolicy) -> Self {
        Self {
            status,
            quality,
            diff
        }
    }

    /// Builds the content of one badge for a request.
    pub fn build(
        &self,
        generator: &BadgeGenerator,
        badge_type: BadgeType,
        style: BadgeStyle,
        request: &PrBadgeRequest
    ) -> BadgeData {
        let label = request.label_for(badge_type);
        match badge_type {
            BadgeType::Coverage => {
                generator.coverage_data(request.coverage, &generator_options(style, label))
            }
            BadgeType::Trend => generator.trend_data(
                request.coverage,
                request.base_coverage,
                &generator_options(style, label)
            ),
            BadgeType::Status => self.status(style, label, request.coverage),
            BadgeType::Comparison => comparison(style, label, request.change()),
            BadgeType::Diff => self.diff(style, label, request.change()),
            BadgeType::Quality => {
                self.quality(style, label, request.quality_grade.as_deref(), request.coverage)
            }
        }
    }

    /// Explicit grade when non-blank, otherwise the grade derived from
    /// coverage.
    pub fn resolve_grade<'a>(&'a self, explicit: Option<&'a str>, coverage: f64) -> &'a str {
        explicit
            .map(str::trim)
            .filter(|grade| !grade.is_empty())
            .unwrap_or_else(|| self.quality.grade(coverage).name)
    }

    fn status(&self, style: BadgeStyle, label: Option<&str>, coverage: f64) -> BadgeData {
        let band = self.status.grade(coverage);
        BadgeData::new(label.unwrap_or("status"), band.name, band.color, style)
    }

    fn diff(&self, style: BadgeStyle, label: Option<&str>, diff: f64) -> BadgeData {
        let magnitude = diff.abs();
        let (message, color) = if magnitude >= DIFF_SIGNIFICANCE {
            let level = self.diff.grade(magnitude).name;
            let color = if diff > 0.0 { POSITIVE_COLOR } else { NEGATIVE_COLOR };
            (format!("{diff:+.1}% {level}"), color)
        } else {
            (self.diff.grade(magnitude).name.to_owned(), NEUTRAL_COLOR)
        };
        BadgeData::new(label.unwrap_or("diff"), message, color, style)
    }

    fn quality(
        &self,
        style: BadgeStyle,
        label: Option<&str>,
        grade: Option<&str>,
        coverage: f64
    ) -> BadgeData {
        let grade = self.resolve_grade(grade, coverage);
        let color = self
            .quality
            .band_named(grade)
            .map_or(NEUTRAL_COLOR, |band| band.color);
        BadgeData::new(label.unwrap_or("quality"), grade, color, style)
    }
}

fn comparison(style: BadgeStyle, label: Option<&str>, diff: f64) -> BadgeData {
    let (message, color) = if diff > TREND_TOLERANCE {
        (format!("+{diff:.1}%"), POSITIVE_COLOR)
    } else if diff < -TREND_TOLERANCE {
        (format!("{diff:.1}%"), NEGATIVE_COLOR)
    } else {
        ("±0.0%".to_owned(), NEUTRAL_COLOR)
    };
    BadgeData::new(label.unwrap_or("vs base"), message, color, style)
}

fn generator_options(style: BadgeStyle, label: Option<&str>) -> RenderOptions {
    RenderOptions {
        style: Some(style),
        label: label.map(str::to_owned),
        ..RenderOptions::default()
    }
}
