// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Configuration types for the badge generator and the PR badge manager.
//!
//! The types mirror the YAML documents consumed by the CLI. Every field has a
//! serde default so a partial document only overrides what it names, and
//! [`PrBadgeConfig::validate`] rejects inconsistent values once, before any
//! badge is rendered.

use std::{fmt, fs, path::Path, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{self, Error};

/// Visual styles supported by the badge renderer.
#[derive(
    Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum BadgeStyle {
    /// Rounded corners with a subtle gradient overlay.
    #[default]
    Flat,
    /// Same geometry as [`BadgeStyle::Flat`] with crisp square edges.
    FlatSquare,
    /// Taller badge with bold upper-cased text.
    ForTheBadge
}

impl BadgeStyle {
    /// Every supported style in declaration order.
    pub const ALL: [Self; 3] = [Self::Flat, Self::FlatSquare, Self::ForTheBadge];

    /// Returns the canonical style name used in file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::FlatSquare => "flat-square",
            Self::ForTheBadge => "for-the-badge"
        }
    }

    /// Resolves a style name, falling back to [`BadgeStyle::Flat`] for
    /// anything unrecognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use covbadge::BadgeStyle;
    ///
    /// assert_eq!(BadgeStyle::resolve("for-the-badge"), BadgeStyle::ForTheBadge);
    /// assert_eq!(BadgeStyle::resolve("plastic"), BadgeStyle::Flat);
    /// ```
    pub fn resolve(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl fmt::Display for BadgeStyle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for BadgeStyle {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == value.trim())
            .ok_or_else(|| Error::validation(format!("unknown badge style '{value}'")))
    }
}

/// Kinds of badges the PR manager can produce.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum BadgeType {
    /// Current coverage percentage.
    Coverage,
    /// Direction of change against the base branch.
    Trend,
    /// Named status band of the current coverage.
    Status,
    /// Signed difference against the base branch.
    Comparison,
    /// Magnitude level of the difference against the base branch.
    Diff,
    /// Letter grade of the current coverage.
    Quality
}

impl BadgeType {
    /// Every supported badge type in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Coverage,
        Self::Trend,
        Self::Status,
        Self::Comparison,
        Self::Diff,
        Self::Quality
    ];

    /// Returns the canonical type name used in file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Coverage => "coverage",
            Self::Trend => "trend",
            Self::Status => "status",
            Self::Comparison => "comparison",
            Self::Diff => "diff",
            Self::Quality => "quality"
        }
    }
}

impl fmt::Display for BadgeType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for BadgeType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value.trim())
            .ok_or_else(|| Error::UnsupportedBadgeType {
                name: value.to_owned()
            })
    }
}

/// Cut points of the generic coverage palette.
///
/// Invariant: `100 >= excellent >= good >= acceptable >= low >= 0`.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdConfig {
    /// Minimum percentage of the excellent band.
    pub excellent:  f64,
    /// Minimum percentage of the good band.
    pub good:       f64,
    /// Minimum percentage of the acceptable band.
    pub acceptable: f64,
    /// Minimum percentage of the low band; anything below is critical.
    pub low:        f64
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            excellent:  95.0,
            good:       85.0,
            acceptable: 75.0,
            low:        60.0
        }
    }
}

impl ThresholdConfig {
    /// Checks that the cut points are ordered and lie within `[0, 100]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] describing the first violated bound.
    pub fn validate(&self) -> Result<(), Error> {
        let points = [
            ("excellent", self.excellent),
            ("good", self.good),
            ("acceptable", self.acceptable),
            ("low", self.low)
        ];

        for (name, value) in points {
            if !(0.0..=100.0).contains(&value) {
                return Err(Error::validation(format!(
                    "threshold '{name}' must be within 0..=100, got {value}"
                )));
            }
        }

        for pair in points.windows(2) {
            let (upper_name, upper) = pair[0];
            let (lower_name, lower) = pair[1];
            if upper < lower {
                return Err(Error::validation(format!(
                    "threshold '{upper_name}' ({upper}) must not be below '{lower_name}' ({lower})"
                )));
            }
        }

        Ok(())
    }
}

/// Settings of a [`BadgeGenerator`](crate::BadgeGenerator) instance.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BadgeConfig {
    /// Style used when a call does not override it.
    pub style:      BadgeStyle,
    /// Label shown on the left side of coverage badges.
    pub label:      String,
    /// Logo name, URL or data URI.
    pub logo:       Option<String>,
    /// Logo color; anything other than white selects brand-colored logos.
    pub logo_color: Option<String>,
    /// Cut points of the coverage palette.
    pub thresholds: ThresholdConfig
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            style:      BadgeStyle::Flat,
            label:      "coverage".to_owned(),
            logo:       None,
            logo_color: None,
            thresholds: ThresholdConfig::default()
        }
    }
}

/// File naming scheme used for PR badge artifacts.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NamingScheme {
    /// Configurable dash-separated patterns such as `badge-{type}-{style}.svg`.
    ///
    /// Parsing these names back is lossy for multi-segment styles.
    #[default]
    Legacy,
    /// Fixed `badge__{type}__{style}.svg` names that invert for every style.
    Delimited
}

/// One file name pattern per badge type.
///
/// Patterns accept the `{style}`, `{type}`, `{pr}`, `{branch}` and, when
/// timestamps are enabled, `{timestamp}` placeholders.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileNamePatterns {
    /// Pattern for coverage badges.
    pub coverage:   String,
    /// Pattern for trend badges.
    pub trend:      String,
    /// Pattern for status badges.
    pub status:     String,
    /// Pattern for comparison badges.
    pub comparison: String,
    /// Pattern for diff badges.
    pub diff:       String,
    /// Pattern for quality badges.
    pub quality:    String
}

impl Default for FileNamePatterns {
    fn default() -> Self {
        Self {
            coverage:   "badge-coverage-{style}.svg".to_owned(),
            trend:      "badge-trend-{style}.svg".to_owned(),
            status:     "badge-status-{style}.svg".to_owned(),
            comparison: "badge-comparison-{style}.svg".to_owned(),
            diff:       "badge-diff-{style}.svg".to_owned(),
            quality:    "badge-quality-{style}.svg".to_owned()
        }
    }
}

impl FileNamePatterns {
    /// Returns the pattern configured for the badge type.
    pub fn for_type(&self, badge_type: BadgeType) -> &str {
        match badge_type {
            BadgeType::Coverage => &self.coverage,
            BadgeType::Trend => &self.trend,
            BadgeType::Status => &self.status,
            BadgeType::Comparison => &self.comparison,
            BadgeType::Diff => &self.diff,
            BadgeType::Quality => &self.quality
        }
    }
}

/// Lifecycle settings for PR badge directories.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct CleanupPolicy {
    /// Allows [`PrBadgeManager::cleanup_pr_badges`](crate::PrBadgeManager::cleanup_pr_badges)
    /// to remove directories.
    pub enable_cleanup:   bool,
    /// Maximum artifact age in days. Carried for callers; the manager only
    /// removes whole PR directories.
    pub max_age_days:     u32,
    /// Removes a PR's badges when the PR is merged.
    pub cleanup_on_merge: bool
}

impl Default for CleanupPolicy {
    fn default() -> Self {
        Self {
            enable_cleanup:   true,
            max_age_days:     30,
            cleanup_on_merge: true
        }
    }
}

/// Settings of a [`PrBadgeManager`](crate::PrBadgeManager).
///
/// # Examples
///
/// ```
/// use covbadge::{BadgeStyle, PrBadgeConfig};
///
/// let yaml = r#"
/// output_base_path: site/coverage
/// default_style: flat-square
/// file_mode: "0640"
/// "#;
/// let config = PrBadgeConfig::parse(yaml,).expect("valid configuration",);
/// assert_eq!(config.default_style, BadgeStyle::FlatSquare);
/// assert_eq!(config.file_mode, 0o640);
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PrBadgeConfig {
    /// Root directory; badges land in `{output_base_path}/pr/{number}`.
    pub output_base_path:         PathBuf,
    /// Permission bits applied to created directories.
    #[serde(deserialize_with = "deserialize_mode")]
    pub directory_mode:           u32,
    /// Permission bits applied to written badge files.
    #[serde(deserialize_with = "deserialize_mode")]
    pub file_mode:                u32,
    /// File name pattern per badge type.
    pub patterns:                 FileNamePatterns,
    /// Styles allowed for generation.
    pub styles:                   Vec<BadgeStyle>,
    /// Style used when neither the request nor multi-style mode chooses.
    pub default_style:            BadgeStyle,
    /// Generates every allowed style when the request does not name styles.
    pub generate_multiple_styles: bool,
    /// Enables the `{timestamp}` file name placeholder.
    pub include_timestamp:        bool,
    /// File naming scheme.
    pub naming_scheme:            NamingScheme,
    /// Directory lifecycle settings.
    pub cleanup:                  CleanupPolicy,
    /// Renders and writes badge pairs on the rayon thread pool.
    pub parallel:                 bool,
    /// Template of the public base URL; accepts `{owner}`, `{repo}`, `{pr}`.
    pub public_url_template:      String,
    /// Generator settings used for coverage and trend badges.
    pub badge:                    BadgeConfig
}

impl Default for PrBadgeConfig {
    fn default() -> Self {
        Self {
            output_base_path:         PathBuf::from("coverage"),
            directory_mode:           0o755,
            file_mode:                0o644,
            patterns:                 FileNamePatterns::default(),
            styles:                   BadgeStyle::ALL.to_vec(),
            default_style:            BadgeStyle::Flat,
            generate_multiple_styles: false,
            include_timestamp:        false,
            naming_scheme:            NamingScheme::Legacy,
            cleanup:                  CleanupPolicy::default(),
            parallel:                 false,
            public_url_template:      "https://{owner}.github.io/{repo}/coverage/pr/{pr}"
                .to_owned(),
            badge:                    BadgeConfig::default()
        }
    }
}

impl PrBadgeConfig {
    /// Parses and validates a YAML configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for malformed YAML and [`Error::Validation`]
    /// when the decoded values are inconsistent.
    pub fn parse(contents: &str) -> Result<Self, Error> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read, otherwise the
    /// errors of [`PrBadgeConfig::parse`].
    pub fn load(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path).map_err(|source| error::io_error(path, source))?;
        Self::parse(&contents)
    }

    /// Checks the invariants the manager relies on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] describing the first violation.
    pub fn validate(&self) -> Result<(), Error> {
        if self.styles.is_empty() {
            return Err(Error::validation("at least one badge style must be allowed"));
        }

        for (index, style) in self.styles.iter().enumerate() {
            if self.styles[..index].contains(style) {
                return Err(Error::validation(format!("style '{style}' is listed twice")));
            }
        }

        if !self.styles.contains(&self.default_style) {
            return Err(Error::validation(format!(
                "default style '{}' is not among the allowed styles",
                self.default_style
            )));
        }

        if self.naming_scheme == NamingScheme::Legacy {
            for badge_type in BadgeType::ALL {
                let pattern = self.patterns.for_type(badge_type);
                if !pattern.ends_with(".svg") || pattern.len() <= ".svg".len() {
                    return Err(Error::validation(format!(
                        "file name pattern for '{badge_type}' must end with .svg, got '{pattern}'"
                    )));
                }
                if pattern.contains('/') || pattern.contains('\\') {
                    return Err(Error::validation(format!(
                        "file name pattern for '{badge_type}' must not contain path separators"
                    )));
                }
            }
        }

        if self.directory_mode > 0o777 || self.file_mode > 0o777 {
            return Err(Error::validation("permission modes must not exceed 0o777"));
        }

        if self.badge.label.trim().is_empty() {
            return Err(Error::validation("badge label must not be empty"));
        }

        self.badge.thresholds.validate()
    }
}

fn deserialize_mode<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawMode {
        Number(u32),
        Text(String)
    }

    match RawMode::deserialize(deserializer)? {
        RawMode::Number(mode) => Ok(mode),
        RawMode::Text(text) => {
            let digits = text.trim().trim_start_matches("0o");
            u32::from_str_radix(digits, 8).map_err(|_| {
                serde::de::Error::custom(format!("permission mode '{text}' is not an octal value"))
            })
        }
    }
}
