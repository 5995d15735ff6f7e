// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Coverage badge rendering and pull request badge lifecycle management.
//!
//! [`BadgeGenerator`] turns a coverage percentage (or a pair of percentages)
//! into deterministic SVG bytes in one of three styles. [`PrBadgeManager`]
//! expands the badge types and styles requested for a pull request, persists
//! the artifacts through an [`ArtifactStore`], reports their public URLs and
//! removes or lists them later. Configuration is loaded from YAML and
//! validated once; all fallible operations return [`Error`].

mod badge;
mod builders;
mod config;
mod context;
mod error;
mod grading;
mod logo;
mod manager;
mod naming;
mod render;
mod request;
mod slug;
mod store;

pub use badge::{BadgeGenerator, RenderOptions, TREND_TOLERANCE};
pub use builders::{ContentBuilders, DIFF_SIGNIFICANCE};
pub use config::{
    BadgeConfig, BadgeStyle, BadgeType, CleanupPolicy, FileNamePatterns, NamingScheme,
    PrBadgeConfig, ThresholdConfig
};
pub use context::{CancelHandle, Context};
pub use error::{Error, badge_io_error, io_error};
pub use grading::{Band, GradingPolicy, NEGATIVE_COLOR, NEUTRAL_COLOR, POSITIVE_COLOR};
pub use logo::resolve_logo;
pub use manager::{
    ArtifactFailure, BadgeInfo, BadgeMetadata, InventoryEntry, PrBadgeInventory, PrBadgeManager,
    PrBadgeResult
};
pub use naming::{
    ParsedBadgeName, TIMESTAMP_FORMAT, base_url, build_file_name, expand_placeholders,
    parse_badge_file_name, public_url
};
pub use render::{BadgeData, BadgeLayout, Dimensions, escape_xml, render_svg, text_width};
pub use request::{PrBadgeRequest, Trend};
pub use slug::{UNKNOWN_BRANCH, branch_slug, slugify};
pub use store::{ArtifactStore, FsArtifactStore, MemoryArtifactStore, StoredArtifact};
