#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the badge crate."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.

use std::path::{Path, PathBuf};

/// Unified error type returned by the generator, the PR manager and the CLI.
///
/// Setup failures (configuration, output directory) surface directly from
/// the failing call. Failures of a single badge artifact are recorded inside
/// [`PrBadgeResult::errors`](crate::PrBadgeResult) instead of aborting the
/// batch.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Wraps I/O errors that occur while reading configuration files.
    #[error("failed to read configuration from {path:?}: {source}")]
    Io {
        /// Location of the configuration file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse configuration: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Returned when configuration or a request violates invariants.
    #[error("invalid configuration: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// Wraps serialization errors when writing JSON output.
    #[error("failed to serialize output: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    },
    /// Wraps I/O errors that occur while writing, listing or removing badge
    /// artifacts.
    #[error("failed to access badge artifact at {path:?}: {source}")]
    BadgeIo {
        /// Location of the artifact or directory being accessed.
        path:   PathBuf,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    },
    /// Returned when rendering starts after the context was cancelled.
    #[error("badge rendering cancelled")]
    Cancelled,
    /// Returned for badge type names the manager does not know how to build.
    #[error("unsupported badge type: {name}")]
    UnsupportedBadgeType {
        /// Badge type name as requested.
        name: String
    },
    /// Returned when a badge request is inconsistent with itself or with the
    /// manager configuration.
    #[error("invalid badge request: {message}")]
    InvalidRequest {
        /// Human readable message describing the request problem.
        message: String
    },
    /// Returned for a badge whose file name was already produced by another
    /// badge of the same batch.
    #[error("file name '{file_name}' is already used by another badge in this batch")]
    FileNameCollision {
        /// Colliding artifact file name.
        file_name: String
    }
}

impl Error {
    /// Constructs a validation error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the validation failure.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Constructs a request error from the provided displayable value.
    pub fn invalid_request<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::InvalidRequest {
            message: message.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// The returned string matches the [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the configuration file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::BadgeIo`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the badge artifact that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn badge_io_error(path: &Path, source: std::io::Error) -> Error {
    Error::BadgeIo {
        path: path.to_path_buf(),
        source
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn validation_constructor_populates_message() {
        let error = Error::validation("something went wrong");
        match error {
            Error::Validation {
                ref message
            } => {
                assert_eq!(message, "something went wrong");
            }
            other => panic!("expected validation error, got {other:?}")
        }
    }

    #[test]
    fn to_display_string_matches_display() {
        let error = Error::validation("display me");
        assert_eq!(error.to_string(), error.to_display_string());
    }

    #[test]
    fn io_error_helper_wraps_path_and_source() {
        let path = std::path::Path::new("/tmp/badges.yaml");
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = super::io_error(path, io_error);

        match error {
            Error::Io {
                path: ref stored_path,
                ref source
            } => {
                assert_eq!(stored_path, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected io error, got {other:?}")
        }
    }

    #[test]
    fn serde_yaml_conversion_maps_to_parse_variant() {
        let error = serde_yaml::from_str::<usize>("not-a-number").unwrap_err();
        let mapped: Error = error.into();
        assert!(matches!(mapped, Error::Parse { .. }));
    }

    #[test]
    fn badge_io_error_helper_wraps_path_and_source() {
        let path = std::path::Path::new("/tmp/pr/7/badge-coverage-flat.svg");
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = super::badge_io_error(path, io_error);

        match error {
            Error::BadgeIo {
                path: ref stored_path,
                ref source
            } => {
                assert_eq!(stored_path, path);
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected badge io error, got {other:?}")
        }
    }

    #[test]
    fn unsupported_badge_type_names_the_type() {
        let error = Error::UnsupportedBadgeType {
            name: "sparkline".to_owned()
        };
        assert_eq!(error.to_string(), "unsupported badge type: sparkline");
    }

    #[test]
    fn request_errors_are_not_reported_as_configuration_errors() {
        let error = Error::invalid_request("style 'flat' is requested twice");
        assert_eq!(error.to_string(), "invalid badge request: style 'flat' is requested twice");
    }

    #[test]
    fn file_name_collision_names_the_file() {
        let error = Error::FileNameCollision {
            file_name: "badge-coverage.svg".to_owned()
        };
        assert!(error.to_string().contains("'badge-coverage.svg'"));
    }
}
