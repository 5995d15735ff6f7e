// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Inputs describing one pull request's coverage state.

use std::{collections::BTreeMap, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    badge::TREND_TOLERANCE,
    config::{BadgeStyle, BadgeType, PrBadgeConfig},
    error::Error
};

/// Direction of coverage change reported by the trend collaborator.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Coverage increased.
    Up,
    /// Coverage decreased.
    Down,
    /// Coverage did not move meaningfully.
    #[default]
    Stable
}

impl Trend {
    /// Direction of a signed coverage change.
    pub fn from_change(change: f64) -> Self {
        if change > TREND_TOLERANCE {
            Self::Up
        } else if change < -TREND_TOLERANCE {
            Self::Down
        } else {
            Self::Stable
        }
    }
}

impl FromStr for Trend {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "stable" => Ok(Self::Stable),
            other => Err(Error::invalid_request(format!("unknown trend '{other}'")))
        }
    }
}

/// Request for the badges of one pull request.
///
/// `types` holds raw type names as supplied by CI inputs; unknown names are
/// reported per artifact rather than rejecting the whole request.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PrBadgeRequest {
    /// Repository owner.
    pub owner:            String,
    /// Repository name.
    pub repository:       String,
    /// Pull request number.
    pub pr_number:        u64,
    /// Head branch of the pull request.
    pub branch:           String,
    /// Head commit SHA.
    pub commit_sha:       String,
    /// Coverage of the head commit.
    pub coverage:         f64,
    /// Coverage of the base branch.
    pub base_coverage:    f64,
    /// Trend direction reported by the history collaborator.
    #[serde(default)]
    pub trend:            Trend,
    /// Explicit quality grade; derived from coverage when absent.
    #[serde(default)]
    pub quality_grade:    Option<String>,
    /// Requested badge type names.
    #[serde(default)]
    pub types:            Vec<String>,
    /// Requested styles; configuration decides when empty.
    #[serde(default)]
    pub styles:           Vec<BadgeStyle>,
    /// Label overrides keyed by badge type.
    #[serde(default)]
    pub custom_labels:    BTreeMap<BadgeType, String>,
    /// Time the coverage run finished.
    pub timestamp:        DateTime<Utc>,
    /// Author of the pull request.
    #[serde(default)]
    pub author:           String
}

impl PrBadgeRequest {
    /// Creates a request for the default `coverage` badge.
    pub fn new(
        owner: impl Into<String>,
        repository: impl Into<String>,
        pr_number: u64,
        coverage: f64,
        base_coverage: f64
    ) -> Self {
        Self {
            owner: owner.into(),
            repository: repository.into(),
            pr_number,
            branch: String::new(),
            commit_sha: String::new(),
            coverage,
            base_coverage,
            trend: Trend::Stable,
            quality_grade: None,
            types: vec![BadgeType::Coverage.as_str().to_owned()],
            styles: Vec::new(),
            custom_labels: BTreeMap::new(),
            timestamp: Utc::now(),
            author: String::new()
        }
    }

    /// Signed coverage change against the base branch.
    pub fn change(&self) -> f64 {
        self.coverage - self.base_coverage
    }

    /// Label override for a badge type, if any.
    pub fn label_for(&self, badge_type: BadgeType) -> Option<&str> {
        self.custom_labels.get(&badge_type).map(String::as_str)
    }

    /// Styles to generate: request styles win, then the multi-style toggle,
    /// then the default style.
    pub fn resolve_styles(&self, config: &PrBadgeConfig) -> Vec<BadgeStyle> {
        if !self.styles.is_empty() {
            self.styles.clone()
        } else if config.generate_multiple_styles {
            config.styles.clone()
        } else {
            vec![config.default_style]
        }
    }

    /// Rejects requests the manager cannot serve consistently.
    ///
    /// Duplicate type names, duplicate styles and styles outside the allowed
    /// set are refused up front. Unknown type names pass and fail per
    /// artifact.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] describing the first problem.
    pub fn validate(&self, config: &PrBadgeConfig) -> Result<(), Error> {
        for (index, name) in self.types.iter().enumerate() {
            if self.types[..index].iter().any(|previous| previous.trim() == name.trim()) {
                return Err(Error::invalid_request(format!(
                    "badge type '{name}' is requested twice"
                )));
            }
        }

        for (index, style) in self.styles.iter().enumerate() {
            if self.styles[..index].contains(style) {
                return Err(Error::invalid_request(format!("style '{style}' is requested twice")));
            }
            if !config.styles.contains(style) {
                return Err(Error::invalid_request(format!(
                    "style '{style}' is not allowed by the configuration"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PrBadgeRequest {
        PrBadgeRequest::new("octocat", "hello-world", 42, 87.5, 85.0)
    }

    #[test]
    fn change_is_signed_difference() {
        assert_eq!(request().change(), 2.5);
    }

    #[test]
    fn request_styles_take_precedence() {
        let mut request = request();
        request.styles = vec![BadgeStyle::ForTheBadge];
        let config = PrBadgeConfig {
            generate_multiple_styles: true,
            ..PrBadgeConfig::default()
        };
        assert_eq!(request.resolve_styles(&config), vec![BadgeStyle::ForTheBadge]);
    }

    #[test]
    fn multi_style_toggle_expands_to_allowed_styles() {
        let config = PrBadgeConfig {
            generate_multiple_styles: true,
            ..PrBadgeConfig::default()
        };
        assert_eq!(request().resolve_styles(&config), BadgeStyle::ALL.to_vec());
    }

    #[test]
    fn default_style_is_used_otherwise() {
        let config = PrBadgeConfig {
            default_style: BadgeStyle::FlatSquare,
            ..PrBadgeConfig::default()
        };
        assert_eq!(request().resolve_styles(&config), vec![BadgeStyle::FlatSquare]);
    }

    #[test]
    fn validate_rejects_duplicate_types() {
        let mut request = request();
        request.types = vec!["coverage".to_owned(), "trend".to_owned(), "coverage".to_owned()];
        let error = request.validate(&PrBadgeConfig::default()).unwrap_err();
        assert!(error.to_string().contains("'coverage' is requested twice"));
    }

    #[test]
    fn validate_rejects_styles_outside_configuration() {
        let mut request = request();
        request.styles = vec![BadgeStyle::ForTheBadge];
        let config = PrBadgeConfig {
            styles: vec![BadgeStyle::Flat],
            ..PrBadgeConfig::default()
        };
        assert!(request.validate(&config).is_err());
    }

    #[test]
    fn validate_reports_request_errors_as_such() {
        let mut request = request();
        request.styles = vec![BadgeStyle::Flat, BadgeStyle::Flat];
        let error = request.validate(&PrBadgeConfig::default()).unwrap_err();
        assert!(matches!(error, Error::InvalidRequest { .. }));
        assert!(error.to_string().starts_with("invalid badge request:"));
    }

    #[test]
    fn validate_accepts_blank_identity() {
        let request = PrBadgeRequest::new("", " ", 5, 90.0, 80.0);
        request.validate(&PrBadgeConfig::default()).expect("identity only feeds URLs");
    }

    #[test]
    fn validate_lets_unknown_types_through() {
        let mut request = request();
        request.types = vec!["coverage".to_owned(), "sparkline".to_owned()];
        request.validate(&PrBadgeConfig::default()).expect("unknown types fail per artifact");
    }

    #[test]
    fn trend_follows_change_outside_tolerance() {
        assert_eq!(Trend::from_change(2.5), Trend::Up);
        assert_eq!(Trend::from_change(-0.5), Trend::Down);
        assert_eq!(Trend::from_change(0.05), Trend::Stable);
        assert_eq!("down".parse::<Trend>().expect("known trend"), Trend::Down);
        assert!("sideways".parse::<Trend>().is_err());
    }

    #[test]
    fn request_deserializes_with_defaults() {
        let json = r#"{
            "owner": "octocat",
            "repository": "hello-world",
            "pr_number": 7,
            "branch": "feature/x",
            "commit_sha": "abc123",
            "coverage": 91.0,
            "base_coverage": 90.0,
            "trend": "up",
            "custom_labels": {"status": "health"},
            "timestamp": "2025-03-04T05:06:07Z"
        }"#;
        let request: PrBadgeRequest = serde_json::from_str(json).expect("valid request");
        assert_eq!(request.trend, Trend::Up);
        assert!(request.types.is_empty());
        assert_eq!(request.label_for(BadgeType::Status), Some("health"));
    }
}
