// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Grading policies mapping numeric values onto named, colored bands.
//!
//! Two palettes coexist on purpose: the generic coverage palette used by the
//! badge generator and the status/quality palette used by the PR badge
//! builders. Each lives in its own named policy and they are never merged.

use crate::config::ThresholdConfig;

/// Neutral gray used for stable trends and unknown grades.
pub const NEUTRAL_COLOR: &str = "#8b949e";
/// Green used for improvements by the PR badge builders.
pub const POSITIVE_COLOR: &str = "#3fb950";
/// Red used for regressions by the PR badge builders.
pub const NEGATIVE_COLOR: &str = "#f85149";

/// Band name of the best coverage band.
pub const EXCELLENT: &str = "excellent";
/// Band name of the lowest passing coverage band.
pub const LOW: &str = "low";

/// Single band of a [`GradingPolicy`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Inclusive lower bound of the band.
    pub minimum: f64,
    /// Human readable band name, used as badge message by some builders.
    pub name:    &'static str,
    /// Hex color associated with the band.
    pub color:   &'static str
}

/// Ordered band table with a fallback for values below every bound.
///
/// Bands are sorted best-first by descending minimum; a value maps to the
/// first band whose minimum it reaches, so every value maps to exactly one
/// band.
///
/// # Example
///
/// ```
/// use covbadge::GradingPolicy;
///
/// let status = GradingPolicy::status();
/// assert_eq!(status.grade(91.0).name, "excellent");
/// assert_eq!(status.grade(12.0).name, "critical");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GradingPolicy {
    bands:    Vec<Band>,
    fallback: Band
}

impl GradingPolicy {
    fn new(mut bands: Vec<Band>, fallback: Band) -> Self {
        bands.sort_by(|left, right| right.minimum.total_cmp(&left.minimum));
        Self {
            bands,
            fallback
        }
    }

    /// Generic coverage palette driven by configurable cut points.
    pub fn coverage(thresholds: &ThresholdConfig) -> Self {
        Self::new(
            vec![
                Band {
                    minimum: thresholds.excellent,
                    name:    EXCELLENT,
                    color:   "#28a745"
                },
                Band {
                    minimum: thresholds.good,
                    name:    "good",
                    color:   "#3fb950"
                },
                Band {
                    minimum: thresholds.acceptable,
                    name:    "acceptable",
                    color:   "#ffc107"
                },
                Band {
                    minimum: thresholds.low,
                    name:    LOW,
                    color:   "#fd7e14"
                },
            ],
            Band {
                minimum: f64::NEG_INFINITY,
                name:    "critical",
                color:   "#dc3545"
            }
        )
    }

    /// Status palette used by the PR `status` badge.
    pub fn status() -> Self {
        Self::new(
            vec![
                Band {
                    minimum: 90.0,
                    name:    "excellent",
                    color:   "#3fb950"
                },
                Band {
                    minimum: 80.0,
                    name:    "good",
                    color:   "#7c3aed"
                },
                Band {
                    minimum: 70.0,
                    name:    "fair",
                    color:   "#d29922"
                },
                Band {
                    minimum: 60.0,
                    name:    "poor",
                    color:   "#fb8500"
                },
            ],
            Band {
                minimum: f64::NEG_INFINITY,
                name:    "critical",
                color:   "#f85149"
            }
        )
    }

    /// Letter grades used by the PR `quality` badge.
    pub fn quality() -> Self {
        Self::new(
            vec![
                Band {
                    minimum: 95.0,
                    name:    "A+",
                    color:   "#3fb950"
                },
                Band {
                    minimum: 90.0,
                    name:    "A",
                    color:   "#3fb950"
                },
                Band {
                    minimum: 85.0,
                    name:    "B+",
                    color:   "#7c3aed"
                },
                Band {
                    minimum: 80.0,
                    name:    "B",
                    color:   "#7c3aed"
                },
                Band {
                    minimum: 70.0,
                    name:    "C",
                    color:   "#d29922"
                },
                Band {
                    minimum: 60.0,
                    name:    "D",
                    color:   "#fb8500"
                },
            ],
            Band {
                minimum: f64::NEG_INFINITY,
                name:    "F",
                color:   "#f85149"
            }
        )
    }

    /// Magnitude levels applied to the absolute coverage difference.
    pub fn diff_magnitude() -> Self {
        Self::new(
            vec![
                Band {
                    minimum: 5.0,
                    name:    "major",
                    color:   NEUTRAL_COLOR
                },
                Band {
                    minimum: 2.0,
                    name:    "moderate",
                    color:   NEUTRAL_COLOR
                },
                Band {
                    minimum: 0.5,
                    name:    "minor",
                    color:   NEUTRAL_COLOR
                },
            ],
            Band {
                minimum: f64::NEG_INFINITY,
                name:    "stable",
                color:   NEUTRAL_COLOR
            }
        )
    }

    /// Returns the band the value falls into.
    pub fn grade(&self, value: f64) -> &Band {
        self.bands
            .iter()
            .find(|band| value >= band.minimum)
            .unwrap_or(&self.fallback)
    }

    /// Returns the position of the value's band, `0` being the best band.
    pub fn band_index(&self, value: f64) -> usize {
        self.bands
            .iter()
            .position(|band| value >= band.minimum)
            .unwrap_or(self.bands.len())
    }

    /// Looks a band up by name, including the fallback band.
    pub fn band_named(&self, name: &str) -> Option<&Band> {
        self.bands
            .iter()
            .chain(std::iter::once(&self.fallback))
            .find(|band| band.name == name)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn coverage_policy_uses_default_palette() {
        let policy = GradingPolicy::coverage(&ThresholdConfig::default());
        assert_eq!(policy.grade(100.0).color, "#28a745");
        assert_eq!(policy.grade(95.0).color, "#28a745");
        assert_eq!(policy.grade(85.5).color, "#3fb950");
        assert_eq!(policy.grade(75.0).color, "#ffc107");
        assert_eq!(policy.grade(60.0).color, "#fd7e14");
        assert_eq!(policy.grade(59.9).color, "#dc3545");
        assert_eq!(policy.grade(-3.0).color, "#dc3545");
    }

    #[test]
    fn coverage_policy_follows_custom_thresholds() {
        let thresholds = ThresholdConfig {
            excellent:  80.0,
            good:       70.0,
            acceptable: 50.0,
            low:        30.0
        };
        let policy = GradingPolicy::coverage(&thresholds);
        assert_eq!(policy.grade(81.0).name, "excellent");
        assert_eq!(policy.grade(31.0).name, "low");
        assert_eq!(policy.grade(29.0).name, "critical");
    }

    #[test]
    fn status_policy_keeps_its_own_colors() {
        let policy = GradingPolicy::status();
        assert_eq!(policy.grade(90.0).color, "#3fb950");
        assert_eq!(policy.grade(85.0).color, "#7c3aed");
        assert_eq!(policy.grade(70.0).name, "fair");
        assert_eq!(policy.grade(65.0).color, "#fb8500");
        assert_eq!(policy.grade(10.0).color, "#f85149");
    }

    #[test]
    fn quality_policy_assigns_letter_grades() {
        let policy = GradingPolicy::quality();
        let grades: Vec<&str> = [97.0, 92.0, 86.0, 81.0, 75.0, 61.0, 10.0]
            .iter()
            .map(|value| policy.grade(*value).name)
            .collect();
        assert_eq!(grades, ["A+", "A", "B+", "B", "C", "D", "F"]);
    }

    #[test]
    fn band_named_includes_fallback() {
        let policy = GradingPolicy::quality();
        assert_eq!(policy.band_named("F").map(|band| band.color), Some("#f85149"));
        assert!(policy.band_named("Z").is_none());
    }

    #[test]
    fn nan_falls_back_to_lowest_band() {
        let policy = GradingPolicy::status();
        assert_eq!(policy.grade(f64::NAN).name, "critical");
    }

    proptest! {
        #[test]
        fn higher_values_never_grade_worse(a in 0.0f64..=100.0, b in 0.0f64..=100.0) {
            let policy = GradingPolicy::coverage(&ThresholdConfig::default());
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(policy.band_index(low) >= policy.band_index(high));
        }
    }
}
