// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Artifact file names and public URLs.
//!
//! Two schemes exist. The legacy scheme expands configurable dash-separated
//! patterns; parsing such names back is ambiguous because styles themselves
//! contain dashes, so `badge-coverage-flat-square.svg` reads back as type
//! `coverage-flat` and style `square`. The delimited scheme reserves `__` as
//! separator and inverts for every type and style.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::{
    config::{BadgeStyle, BadgeType, NamingScheme, PrBadgeConfig},
    request::PrBadgeRequest,
    slug::branch_slug
};

/// `chrono` format of the `{timestamp}` placeholder (`YYYYMMDD-HHMMSS`).
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

const LEGACY_PREFIX: &str = "badge-";
const DELIMITED_PREFIX: &str = "badge__";
const DELIMITER: &str = "__";
const EXTENSION: &str = ".svg";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z_]+)\}").expect("valid placeholder pattern"));

/// Type and style recovered from an artifact file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedBadgeName {
    /// Badge type as read from the name; may be a lossy reading.
    pub badge_type: String,
    /// Style as read from the name; may be a lossy reading.
    pub style:      String
}

/// Replaces `{name}` placeholders using `lookup`; unknown names stay literal.
///
/// # Examples
///
/// ```
/// use covbadge::expand_placeholders;
///
/// let expanded = expand_placeholders("badge-{type}-{color}.svg", |name| {
///     (name == "type").then(|| "coverage".to_owned(),)
/// },);
/// assert_eq!(expanded, "badge-coverage-{color}.svg");
/// ```
pub fn expand_placeholders<F>(pattern: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>
{
    PLACEHOLDER
        .replace_all(pattern, |captures: &Captures<'_>| {
            lookup(&captures[1]).unwrap_or_else(|| captures[0].to_owned())
        })
        .into_owned()
}

/// Builds the artifact file name for a badge type and style.
///
/// `{timestamp}` only expands when the configuration enables timestamps.
pub fn build_file_name(
    config: &PrBadgeConfig,
    badge_type: BadgeType,
    style: BadgeStyle,
    request: &PrBadgeRequest
) -> String {
    let timestamp = config
        .include_timestamp
        .then(|| request.timestamp.format(TIMESTAMP_FORMAT).to_string());

    match config.naming_scheme {
        NamingScheme::Legacy => {
            expand_placeholders(config.patterns.for_type(badge_type), |name| match name {
                "style" => Some(style.as_str().to_owned()),
                "type" => Some(badge_type.as_str().to_owned()),
                "pr" => Some(request.pr_number.to_string()),
                "branch" => Some(branch_slug(&request.branch)),
                "timestamp" => timestamp.clone(),
                _ => None
            })
        }
        NamingScheme::Delimited => {
            let mut name = format!("{DELIMITED_PREFIX}{badge_type}{DELIMITER}{style}");
            if let Some(timestamp) = timestamp {
                name.push_str(DELIMITER);
                name.push_str(&timestamp);
            }
            name.push_str(EXTENSION);
            name
        }
    }
}

/// Recovers type and style from an artifact file name.
///
/// Returns `None` for names that do not follow the scheme.
pub fn parse_badge_file_name(file_name: &str, scheme: NamingScheme) -> Option<ParsedBadgeName> {
    let stem = file_name.strip_suffix(EXTENSION).unwrap_or(file_name);
    match scheme {
        NamingScheme::Legacy => parse_legacy(stem),
        NamingScheme::Delimited => parse_delimited(stem)
    }
}

fn parse_legacy(stem: &str) -> Option<ParsedBadgeName> {
    if !stem.starts_with(LEGACY_PREFIX) {
        return None;
    }

    let segments: Vec<&str> = stem.split('-').collect();
    if segments.len() < 3 {
        return None;
    }

    let last = segments.len() - 1;
    Some(ParsedBadgeName {
        badge_type: segments[1..last].join("-"),
        style:      segments[last].to_owned()
    })
}

fn parse_delimited(stem: &str) -> Option<ParsedBadgeName> {
    let body = stem.strip_prefix(DELIMITED_PREFIX)?;
    let segments: Vec<&str> = body.split(DELIMITER).collect();
    if !(2..=3).contains(&segments.len()) {
        return None;
    }

    let badge_type: BadgeType = segments[0].parse().ok()?;
    let style: BadgeStyle = segments[1].parse().ok()?;
    Some(ParsedBadgeName {
        badge_type: badge_type.as_str().to_owned(),
        style:      style.as_str().to_owned()
    })
}

/// Public base URL of a pull request's badges.
///
/// # Examples
///
/// ```
/// use covbadge::{PrBadgeConfig, PrBadgeRequest, base_url};
///
/// let request = PrBadgeRequest::new("octocat", "hello-world", 42, 90.0, 88.0,);
/// assert_eq!(
///     base_url(&PrBadgeConfig::default(), &request,),
///     "https://octocat.github.io/hello-world/coverage/pr/42"
/// );
/// ```
pub fn base_url(config: &PrBadgeConfig, request: &PrBadgeRequest) -> String {
    expand_placeholders(&config.public_url_template, |name| match name {
        "owner" => Some(request.owner.clone()),
        "repo" => Some(request.repository.clone()),
        "pr" => Some(request.pr_number.to_string()),
        _ => None
    })
}

/// Public URL of a single artifact below `base`.
pub fn public_url(base: &str, file_name: &str) -> String {
    format!("{}/{file_name}", base.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn request() -> PrBadgeRequest {
        let mut request = PrBadgeRequest::new("octocat", "hello-world", 42, 90.0, 88.0);
        request.branch = "feature/Login".to_owned();
        request.timestamp = Utc
            .with_ymd_and_hms(2025, 3, 4, 5, 6, 7)
            .single()
            .expect("valid timestamp");
        request
    }

    #[test]
    fn default_patterns_expand_type_and_style() {
        let config = PrBadgeConfig::default();
        for badge_type in BadgeType::ALL {
            let name = build_file_name(&config, badge_type, BadgeStyle::Flat, &request());
            assert_eq!(name, format!("badge-{badge_type}-flat.svg"));
        }
    }

    #[test]
    fn pattern_placeholders_cover_pr_and_branch() {
        let mut config = PrBadgeConfig::default();
        config.patterns.coverage = "{type}-{pr}-{branch}-{style}.svg".to_owned();
        let name = build_file_name(&config, BadgeType::Coverage, BadgeStyle::FlatSquare, &request());
        assert_eq!(name, "coverage-42-feature-login-flat-square.svg");
    }

    #[test]
    fn timestamp_placeholder_requires_opt_in() {
        let mut config = PrBadgeConfig::default();
        config.patterns.trend = "badge-trend-{style}-{timestamp}.svg".to_owned();
        let literal = build_file_name(&config, BadgeType::Trend, BadgeStyle::Flat, &request());
        assert_eq!(literal, "badge-trend-flat-{timestamp}.svg");

        config.include_timestamp = true;
        let stamped = build_file_name(&config, BadgeType::Trend, BadgeStyle::Flat, &request());
        assert_eq!(stamped, "badge-trend-flat-20250304-050607.svg");
    }

    #[test]
    fn unknown_placeholders_stay_literal() {
        let mut config = PrBadgeConfig::default();
        config.patterns.diff = "badge-{kind}-{style}.svg".to_owned();
        let name = build_file_name(&config, BadgeType::Diff, BadgeStyle::Flat, &request());
        assert_eq!(name, "badge-{kind}-flat.svg");
    }

    #[test]
    fn legacy_round_trip_holds_for_single_segment_styles() {
        let config = PrBadgeConfig::default();
        for badge_type in BadgeType::ALL {
            let name = build_file_name(&config, badge_type, BadgeStyle::Flat, &request());
            let parsed = parse_badge_file_name(&name, NamingScheme::Legacy).expect("parsable");
            assert_eq!(parsed.badge_type, badge_type.as_str());
            assert_eq!(parsed.style, "flat");
        }
    }

    #[test]
    fn legacy_round_trip_breaks_for_multi_segment_styles() {
        let config = PrBadgeConfig::default();

        let square = build_file_name(&config, BadgeType::Coverage, BadgeStyle::FlatSquare, &request());
        let parsed = parse_badge_file_name(&square, NamingScheme::Legacy).expect("parsable");
        assert_ne!(parsed.style, "flat-square");
        assert_eq!(parsed.badge_type, "coverage-flat");
        assert_eq!(parsed.style, "square");

        let tall = build_file_name(&config, BadgeType::Status, BadgeStyle::ForTheBadge, &request());
        let parsed = parse_badge_file_name(&tall, NamingScheme::Legacy).expect("parsable");
        assert_ne!(parsed.badge_type, "status");
        assert_eq!(parsed.badge_type, "status-for-the");
        assert_eq!(parsed.style, "badge");
    }

    #[test]
    fn legacy_parse_skips_foreign_names() {
        assert!(parse_badge_file_name("coverage-flat.svg", NamingScheme::Legacy).is_none());
        assert!(parse_badge_file_name("badge-flat.svg", NamingScheme::Legacy).is_none());
        assert!(parse_badge_file_name("index.svg", NamingScheme::Legacy).is_none());
    }

    #[test]
    fn delimited_round_trip_holds_for_every_style() {
        let config = PrBadgeConfig {
            naming_scheme: NamingScheme::Delimited,
            ..PrBadgeConfig::default()
        };
        for badge_type in BadgeType::ALL {
            for style in BadgeStyle::ALL {
                let name = build_file_name(&config, badge_type, style, &request());
                let parsed = parse_badge_file_name(&name, NamingScheme::Delimited).expect("parsable");
                assert_eq!(parsed.badge_type, badge_type.as_str());
                assert_eq!(parsed.style, style.as_str());
            }
        }
    }

    #[test]
    fn delimited_names_carry_optional_timestamp() {
        let config = PrBadgeConfig {
            naming_scheme: NamingScheme::Delimited,
            include_timestamp: true,
            ..PrBadgeConfig::default()
        };
        let name = build_file_name(&config, BadgeType::Quality, BadgeStyle::FlatSquare, &request());
        assert_eq!(name, "badge__quality__flat-square__20250304-050607.svg");
        let parsed = parse_badge_file_name(&name, NamingScheme::Delimited).expect("parsable");
        assert_eq!(parsed.style, "flat-square");
    }

    #[test]
    fn delimited_parse_rejects_unknown_parts() {
        assert!(parse_badge_file_name("badge__sparkline__flat.svg", NamingScheme::Delimited).is_none());
        assert!(parse_badge_file_name("badge__coverage__plastic.svg", NamingScheme::Delimited).is_none());
        assert!(parse_badge_file_name("badge-coverage-flat.svg", NamingScheme::Delimited).is_none());
    }

    #[test]
    fn urls_follow_pages_layout() {
        let base = base_url(&PrBadgeConfig::default(), &request());
        assert_eq!(base, "https://octocat.github.io/hello-world/coverage/pr/42");
        assert_eq!(
            public_url(&base, "badge-coverage-flat.svg"),
            "https://octocat.github.io/hello-world/coverage/pr/42/badge-coverage-flat.svg"
        );
        assert_eq!(public_url("https://cdn.example/", "a.svg"), "https://cdn.example/a.svg");
    }
}
