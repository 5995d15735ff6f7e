// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Pull request badge lifecycle.
//!
//! [`PrBadgeManager`] expands the requested types and styles of one pull
//! request into badge artifacts, persists them through an [`ArtifactStore`]
//! and reports public URLs. Only preparing the PR location is fatal; every
//! other failure is recorded per artifact so sibling badges still land.

use std::{
    collections::{BTreeMap, HashSet},
    path::PathBuf
};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    badge::BadgeGenerator,
    builders::ContentBuilders,
    config::{BadgeStyle, BadgeType, PrBadgeConfig},
    context::Context,
    error::Error,
    naming::{self, ParsedBadgeName},
    render::Dimensions,
    request::{PrBadgeRequest, Trend},
    store::{ArtifactStore, FsArtifactStore}
};

/// Snapshot of the request values a badge was generated from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgeMetadata {
    /// Coverage of the head commit.
    pub coverage:      f64,
    /// Coverage of the base branch.
    pub base_coverage: f64,
    /// Signed difference between head and base coverage.
    pub change:        f64,
    /// Trend direction carried by the request.
    pub trend:         Trend,
    /// Explicit grade, or the grade derived from coverage.
    pub quality_grade: String,
    /// Pull request number.
    pub pr_number:     u64,
    /// Head branch as supplied, not slugged.
    pub branch:        String,
    /// Head commit SHA.
    pub commit_sha:    String,
    /// Pull request author.
    pub author:        String,
    /// Start of the batch that produced the badge.
    pub generated_at:  DateTime<Utc>
}

/// One persisted badge artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgeInfo {
    /// Badge type.
    pub badge_type: BadgeType,
    /// Rendered style.
    pub style:      BadgeStyle,
    /// File name inside the PR location.
    pub file_name:  String,
    /// Location reported by the store.
    pub path:       PathBuf,
    /// Public URL of the artifact.
    pub public_url: String,
    /// Size in bytes reported by the store after writing.
    pub size:       u64,
    /// Rendered width and height.
    pub dimensions: Dimensions,
    /// Request snapshot.
    pub metadata:   BadgeMetadata
}

/// Failure of a single `(type, style)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactFailure {
    /// Badge type as requested, which may not be a known type.
    pub badge_type: String,
    /// Style of the failed pair.
    pub style:      BadgeStyle,
    /// Display form of the underlying error.
    pub message:    String
}

/// Outcome of [`PrBadgeManager::generate_pr_badges`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrBadgeResult {
    /// Generated badges grouped by type, in style order.
    pub badges:       BTreeMap<BadgeType, Vec<BadgeInfo>>,
    /// Paths of every written artifact in request order.
    pub local_paths:  Vec<PathBuf>,
    /// Public URLs of every written artifact in request order.
    pub public_urls:  Vec<String>,
    /// Public base URL of the pull request.
    pub base_url:     String,
    /// Number of artifacts written.
    pub total_badges: usize,
    /// Non-fatal per-artifact failures.
    pub errors:       Vec<ArtifactFailure>
}

impl PrBadgeResult {
    fn empty(base_url: String) -> Self {
        Self {
            badges: BTreeMap::new(),
            local_paths: Vec::new(),
            public_urls: Vec::new(),
            base_url,
            total_badges: 0,
            errors: Vec::new()
        }
    }

    fn push(&mut self, info: BadgeInfo) {
        self.local_paths.push(info.path.clone());
        self.public_urls.push(info.public_url.clone());
        self.total_badges += 1;
        self.badges.entry(info.badge_type).or_default().push(info);
    }

    /// Returns `true` when every requested pair was generated.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Artifact recognised while listing a pull request location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryEntry {
    /// Type read back from the file name; lossy under the legacy scheme.
    pub badge_type: String,
    /// Style read back from the file name; lossy under the legacy scheme.
    pub style:      String,
    /// File name inside the PR location.
    pub file_name:  String,
    /// Location reported by the store.
    pub path:       PathBuf,
    /// Size in bytes.
    pub size:       u64
}

/// Badges currently stored for a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrBadgeInventory {
    /// Pull request number.
    pub pr_number: u64,
    /// Location listed by the store.
    pub directory: PathBuf,
    /// Recognised badges sorted by file name.
    pub entries:   Vec<InventoryEntry>
}

/// Pair whose type resolved and whose file name is unique in its batch.
#[derive(Debug)]
struct PlannedArtifact<'r> {
    name:       &'r str,
    badge_type: BadgeType,
    style:      BadgeStyle,
    file_name:  String
}

/// Generates, lists and removes the badges of pull requests.
///
/// # Examples
///
/// ```
/// use covbadge::{Context, MemoryArtifactStore, PrBadgeConfig, PrBadgeManager, PrBadgeRequest};
///
/// let manager =
///     PrBadgeManager::with_store(PrBadgeConfig::default(), MemoryArtifactStore::new(),)
///         .expect("valid configuration",);
/// let request = PrBadgeRequest::new("octocat", "hello-world", 7, 91.0, 90.0,);
/// let result = manager
///     .generate_pr_badges(&Context::background(), &request,)
///     .expect("generation succeeds",);
/// assert_eq!(result.total_badges, 1);
/// assert_eq!(
///     result.public_urls[0],
///     "https://octocat.github.io/hello-world/coverage/pr/7/badge-coverage-flat.svg"
/// );
/// ```
#[derive(Debug)]
pub struct PrBadgeManager<S = FsArtifactStore> {
    config:    PrBadgeConfig,
    generator: BadgeGenerator,
    builders:  ContentBuilders,
    store:     S
}

impl PrBadgeManager<FsArtifactStore> {
    /// Creates a manager persisting to the configured output base path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the configuration is inconsistent.
    pub fn new(config: PrBadgeConfig) -> Result<Self, Error> {
        let store = FsArtifactStore::from_config(&config);
        Self::with_store(config, store)
    }
}

impl<S> PrBadgeManager<S>
where
    S: ArtifactStore
{
    /// Creates a manager over an explicit artifact store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the configuration is inconsistent.
    pub fn with_store(config: PrBadgeConfig, store: S) -> Result<Self, Error> {
        config.validate()?;
        let generator = BadgeGenerator::new(config.badge.clone());
        Ok(Self {
            config,
            generator,
            builders: ContentBuilders::default(),
            store
        })
    }

    /// Validated configuration of the manager.
    pub fn config(&self) -> &PrBadgeConfig {
        &self.config
    }

    /// Artifact store backing the manager.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Generates every requested `(type, style)` badge of a pull request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] for duplicate types or disallowed
    /// styles and [`Error::BadgeIo`] when the PR location cannot be prepared.
    /// Failures of individual artifacts, including unknown types, file name
    /// collisions and cancellation, are reported in
    /// [`PrBadgeResult::errors`].
    pub fn generate_pr_badges(
        &self,
        context: &Context,
        request: &PrBadgeRequest
    ) -> Result<PrBadgeResult, Error> {
        request.validate(&self.config)?;
        let directory = self.store.prepare(request.pr_number)?;

        let styles = request.resolve_styles(&self.config);
        let base_url = naming::base_url(&self.config, request);
        let generated_at = Utc::now();
        let mut claimed = HashSet::new();
        let plan: Vec<Result<PlannedArtifact<'_>, ArtifactFailure>> = request
            .types
            .iter()
            .flat_map(|name| styles.iter().map(move |style| (name.trim(), *style)))
            .map(|(name, style)| {
                self.plan_artifact(request, name, style, &mut claimed)
                    .map_err(|error| failure(name, style, &error))
            })
            .collect();

        info!(
            "generating {} badge(s) for PR #{} in {}",
            plan.len(),
            request.pr_number,
            directory.display()
        );

        let artifact = |slot: &Result<PlannedArtifact<'_>, ArtifactFailure>| match slot {
            Ok(planned) => self
                .generate_artifact(context, request, planned, &base_url, generated_at)
                .map_err(|error| failure(planned.name, planned.style, &error)),
            Err(rejected) => Err(rejected.clone())
        };
        let outcomes: Vec<Result<BadgeInfo, ArtifactFailure>> = if self.config.parallel {
            plan.par_iter().map(artifact).collect()
        } else {
            plan.iter().map(artifact).collect()
        };

        let mut result = PrBadgeResult::empty(base_url);
        for outcome in outcomes {
            match outcome {
                Ok(info) => result.push(info),
                Err(failure) => result.errors.push(failure)
            }
        }

        info!(
            "generated {} badge(s) for PR #{} with {} failure(s)",
            result.total_badges,
            request.pr_number,
            result.errors.len()
        );
        Ok(result)
    }

    /// Resolves the type and claims the file name of one pair.
    ///
    /// Names are claimed in request order, so the first pair producing a
    /// name keeps it and later ones fail with [`Error::FileNameCollision`].
    fn plan_artifact<'r>(
        &self,
        request: &PrBadgeRequest,
        name: &'r str,
        style: BadgeStyle,
        claimed: &mut HashSet<String>
    ) -> Result<PlannedArtifact<'r>, Error> {
        let badge_type: BadgeType = name.parse()?;
        let file_name = naming::build_file_name(&self.config, badge_type, style, request);
        if !claimed.insert(file_name.clone()) {
            return Err(Error::FileNameCollision {
                file_name
            });
        }
        Ok(PlannedArtifact {
            name,
            badge_type,
            style,
            file_name
        })
    }

    fn generate_artifact(
        &self,
        context: &Context,
        request: &PrBadgeRequest,
        planned: &PlannedArtifact<'_>,
        base_url: &str,
        generated_at: DateTime<Utc>
    ) -> Result<BadgeInfo, Error> {
        let data = self
            .builders
            .build(&self.generator, planned.badge_type, planned.style, request);
        let bytes = self.generator.render(context, &data)?;
        let stored = self
            .store
            .write(request.pr_number, &planned.file_name, &bytes)?;
        debug!("wrote {} ({} bytes)", stored.path.display(), stored.size);

        Ok(BadgeInfo {
            badge_type: planned.badge_type,
            style: planned.style,
            public_url: naming::public_url(base_url, &planned.file_name),
            file_name: planned.file_name.clone(),
            path: stored.path,
            size: stored.size,
            dimensions: data.layout().dimensions(),
            metadata: self.metadata(request, generated_at)
        })
    }

    fn metadata(&self, request: &PrBadgeRequest, generated_at: DateTime<Utc>) -> BadgeMetadata {
        BadgeMetadata {
            coverage: request.coverage,
            base_coverage: request.base_coverage,
            change: request.change(),
            trend: request.trend,
            quality_grade: self
                .builders
                .resolve_grade(request.quality_grade.as_deref(), request.coverage)
                .to_owned(),
            pr_number: request.pr_number,
            branch: request.branch.clone(),
            commit_sha: request.commit_sha.clone(),
            author: request.author.clone(),
            generated_at
        }
    }

    /// Removes every badge of a pull request.
    ///
    /// Does nothing when cleanup is disabled or nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadgeIo`] when the location exists but cannot be
    /// removed.
    pub fn cleanup_pr_badges(&self, pr_number: u64) -> Result<(), Error> {
        if !self.config.cleanup.enable_cleanup {
            debug!("cleanup disabled, keeping badges of PR #{pr_number}");
            return Ok(());
        }

        if self.store.remove_pr(pr_number)? {
            info!("removed badges of PR #{pr_number}");
        } else {
            debug!("no badges stored for PR #{pr_number}");
        }
        Ok(())
    }

    /// Applies the cleanup policy to a closed pull request.
    ///
    /// Returns `true` when cleanup ran, which only happens for merged pull
    /// requests with `cleanup_on_merge` enabled.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`PrBadgeManager::cleanup_pr_badges`].
    pub fn handle_pr_closed(&self, pr_number: u64, merged: bool) -> Result<bool, Error> {
        let policy = &self.config.cleanup;
        if !(merged && policy.cleanup_on_merge && policy.enable_cleanup) {
            debug!("keeping badges of closed PR #{pr_number} (merged: {merged})");
            return Ok(false);
        }
        self.cleanup_pr_badges(pr_number)?;
        Ok(true)
    }

    /// Lists the badges stored for a pull request.
    ///
    /// Files that do not follow the configured naming scheme are skipped. A
    /// missing location yields an empty inventory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadgeIo`] when the location cannot be read.
    pub fn get_pr_info(&self, pr_number: u64) -> Result<PrBadgeInventory, Error> {
        let entries = self
            .store
            .list(pr_number)?
            .into_iter()
            .filter(|artifact| artifact.file_name.ends_with(".svg"))
            .filter_map(|artifact| {
                let ParsedBadgeName {
                    badge_type,
                    style
                } = naming::parse_badge_file_name(&artifact.file_name, self.config.naming_scheme)?;
                Some(InventoryEntry {
                    badge_type,
                    style,
                    file_name: artifact.file_name,
                    path: artifact.path,
                    size: artifact.size
                })
            })
            .collect();

        Ok(PrBadgeInventory {
            pr_number,
            directory: self.store.pr_location(pr_number),
            entries
        })
    }
}

fn failure(name: &str, style: BadgeStyle, error: &Error) -> ArtifactFailure {
    warn!("failed to generate {name} badge in {style} style: {error}");
    ArtifactFailure {
        badge_type: name.to_owned(),
        style,
        message: error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        fs,
        sync::atomic::{AtomicBool, Ordering}
    };

    use tempfile::tempdir;

    use super::*;
    use crate::{
        config::NamingScheme,
        context::CancelHandle,
        store::{MemoryArtifactStore, StoredArtifact}
    };

    fn config_at(base: &std::path::Path) -> PrBadgeConfig {
        PrBadgeConfig {
            output_base_path: base.to_path_buf(),
            ..PrBadgeConfig::default()
        }
    }

    fn request(types: &[&str], styles: &[BadgeStyle]) -> PrBadgeRequest {
        let mut request = PrBadgeRequest::new("octocat", "hello-world", 42, 87.5, 85.0);
        request.branch = "feature/login".to_owned();
        request.commit_sha = "abc123".to_owned();
        request.types = types.iter().map(|name| (*name).to_owned()).collect();
        request.styles = styles.to_vec();
        request
    }

    #[test]
    fn generates_every_type_and_style_pair() {
        let dir = tempdir().expect("temp dir");
        let manager = PrBadgeManager::new(config_at(dir.path())).expect("manager");
        let request = request(
            &["coverage", "trend", "status", "comparison"],
            &[BadgeStyle::Flat, BadgeStyle::FlatSquare]
        );

        let result = manager
            .generate_pr_badges(&Context::background(), &request)
            .expect("generation succeeds");

        assert_eq!(result.total_badges, 8);
        assert!(result.is_complete());
        assert_eq!(result.local_paths.len(), 8);
        assert_eq!(result.badges[&BadgeType::Status].len(), 2);

        let directory = dir.path().join("pr").join("42");
        let files = fs::read_dir(&directory).expect("pr directory").count();
        assert_eq!(files, 8);
        assert!(directory.join("badge-coverage-flat-square.svg").is_file());
        assert_eq!(
            result.public_urls[0],
            "https://octocat.github.io/hello-world/coverage/pr/42/badge-coverage-flat.svg"
        );
    }

    #[test]
    fn badge_info_reports_size_dimensions_and_metadata() {
        let dir = tempdir().expect("temp dir");
        let manager = PrBadgeManager::new(config_at(dir.path())).expect("manager");
        let mut request = request(&["coverage"], &[BadgeStyle::ForTheBadge]);
        request.author = "hubot".to_owned();

        let result = manager
            .generate_pr_badges(&Context::background(), &request)
            .expect("generation succeeds");
        let info = &result.badges[&BadgeType::Coverage][0];

        let on_disk = fs::metadata(&info.path).expect("artifact").len();
        assert_eq!(info.size, on_disk);
        assert_eq!(info.dimensions.height, 28);
        assert_eq!(info.metadata.change, 2.5);
        assert_eq!(info.metadata.quality_grade, "B+");
        assert_eq!(info.metadata.author, "hubot");
        assert_eq!(info.metadata.commit_sha, "abc123");
    }

    #[cfg(unix)]
    #[test]
    fn applies_configured_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().expect("temp dir");
        let config = PrBadgeConfig {
            file_mode: 0o600,
            ..config_at(dir.path())
        };
        let manager = PrBadgeManager::new(config).expect("manager");
        let result = manager
            .generate_pr_badges(&Context::background(), &request(&["coverage"], &[]))
            .expect("generation succeeds");

        let mode = fs::metadata(&result.local_paths[0])
            .expect("artifact")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn unknown_type_is_recorded_without_failing_siblings() {
        let manager =
            PrBadgeManager::with_store(PrBadgeConfig::default(), MemoryArtifactStore::new())
                .expect("manager");
        let request = request(&["coverage", "sparkline"], &[BadgeStyle::Flat]);

        let result = manager
            .generate_pr_badges(&Context::background(), &request)
            .expect("partial failure is not fatal");

        assert_eq!(result.total_badges, 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].badge_type, "sparkline");
        assert_eq!(result.errors[0].style, BadgeStyle::Flat);
        assert!(result.errors[0].message.contains("sparkline"));
    }

    #[test]
    fn blank_identity_is_not_fatal() {
        let manager =
            PrBadgeManager::with_store(PrBadgeConfig::default(), MemoryArtifactStore::new())
                .expect("manager");
        let request = PrBadgeRequest::new("", "repo", 5, 90.0, 80.0);

        let result = manager
            .generate_pr_badges(&Context::background(), &request)
            .expect("blank owner only affects URLs");
        assert_eq!(result.total_badges, 1);
        assert!(result.is_complete());
    }

    #[test]
    fn colliding_file_names_are_reported_instead_of_overwritten() {
        let mut config = PrBadgeConfig {
            parallel: true,
            ..PrBadgeConfig::default()
        };
        config.patterns.coverage = "badge-coverage.svg".to_owned();
        let manager = PrBadgeManager::with_store(config, MemoryArtifactStore::new()).expect("manager");
        let request = request(&["coverage", "trend"], &BadgeStyle::ALL);

        let result = manager
            .generate_pr_badges(&Context::background(), &request)
            .expect("collisions are not fatal");

        assert_eq!(result.total_badges, 4);
        assert_eq!(result.badges[&BadgeType::Coverage].len(), 1);
        assert_eq!(result.badges[&BadgeType::Coverage][0].style, BadgeStyle::Flat);
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors.iter().all(|failure| {
            failure.badge_type == "coverage" && failure.message.contains("'badge-coverage.svg'")
        }));
        assert_eq!(
            result.errors.iter().map(|failure| failure.style).collect::<Vec<_>>(),
            vec![BadgeStyle::FlatSquare, BadgeStyle::ForTheBadge]
        );

        let stored = manager.store().list(42).expect("list");
        assert_eq!(stored.len(), result.total_badges);
        let urls: HashSet<&String> = result.public_urls.iter().collect();
        assert_eq!(urls.len(), result.public_urls.len());
    }

    #[test]
    fn duplicate_types_are_rejected_before_writing() {
        let store = MemoryArtifactStore::new();
        let manager =
            PrBadgeManager::with_store(PrBadgeConfig::default(), store).expect("manager");
        let request = request(&["coverage", "coverage"], &[]);

        let error = manager
            .generate_pr_badges(&Context::background(), &request)
            .unwrap_err();
        assert!(matches!(error, Error::InvalidRequest { .. }));
        assert!(manager.store().list(42).expect("list").is_empty());
    }

    #[test]
    fn unpreparable_directory_is_fatal() {
        let dir = tempdir().expect("temp dir");
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, b"not a directory").expect("write blocker");
        let manager = PrBadgeManager::new(config_at(&blocker)).expect("manager");

        let error = manager
            .generate_pr_badges(&Context::background(), &request(&["coverage"], &[]))
            .unwrap_err();
        assert!(matches!(error, Error::BadgeIo { .. }));
    }

    #[test]
    fn regeneration_is_byte_identical() {
        let dir = tempdir().expect("temp dir");
        let manager = PrBadgeManager::new(config_at(dir.path())).expect("manager");
        let request = request(&["coverage", "diff", "quality"], &[BadgeStyle::Flat]);

        let first = manager
            .generate_pr_badges(&Context::background(), &request)
            .expect("first run");
        let before: Vec<Vec<u8>> = first
            .local_paths
            .iter()
            .map(|path| fs::read(path).expect("artifact"))
            .collect();
        let second = manager
            .generate_pr_badges(&Context::background(), &request)
            .expect("second run");
        let after: Vec<Vec<u8>> = second
            .local_paths
            .iter()
            .map(|path| fs::read(path).expect("artifact"))
            .collect();

        assert_eq!(first.local_paths, second.local_paths);
        assert_eq!(before, after);
    }

    #[test]
    fn cancelled_context_reports_every_pair() {
        let manager =
            PrBadgeManager::with_store(PrBadgeConfig::default(), MemoryArtifactStore::new())
                .expect("manager");
        let (context, handle) = Context::with_cancel();
        handle.cancel();

        let result = manager
            .generate_pr_badges(&context, &request(&["coverage", "trend"], &[]))
            .expect("cancellation is not fatal");
        assert_eq!(result.total_badges, 0);
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors.iter().all(|failure| failure.message.contains("cancelled")));
    }

    struct CancelAfterFirstWrite {
        inner:     MemoryArtifactStore,
        handle:    CancelHandle,
        cancelled: AtomicBool
    }

    impl ArtifactStore for CancelAfterFirstWrite {
        fn pr_location(&self, pr_number: u64) -> PathBuf {
            self.inner.pr_location(pr_number)
        }

        fn prepare(&self, pr_number: u64) -> Result<PathBuf, Error> {
            self.inner.prepare(pr_number)
        }

        fn write(
            &self,
            pr_number: u64,
            file_name: &str,
            contents: &[u8]
        ) -> Result<StoredArtifact, Error> {
            let stored = self.inner.write(pr_number, file_name, contents)?;
            if !self.cancelled.swap(true, Ordering::SeqCst) {
                self.handle.cancel();
            }
            Ok(stored)
        }

        fn list(&self, pr_number: u64) -> Result<Vec<StoredArtifact>, Error> {
            self.inner.list(pr_number)
        }

        fn remove_pr(&self, pr_number: u64) -> Result<bool, Error> {
            self.inner.remove_pr(pr_number)
        }
    }

    #[test]
    fn cancellation_mid_batch_keeps_finished_artifacts() {
        let (context, handle) = Context::with_cancel();
        let store = CancelAfterFirstWrite {
            inner: MemoryArtifactStore::new(),
            handle,
            cancelled: AtomicBool::new(false)
        };
        let manager = PrBadgeManager::with_store(PrBadgeConfig::default(), store).expect("manager");

        let result = manager
            .generate_pr_badges(&context, &request(&["coverage", "trend", "status"], &[]))
            .expect("partial result");
        assert_eq!(result.total_badges, 1);
        assert!(result.badges.contains_key(&BadgeType::Coverage));
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn parallel_mode_preserves_request_order() {
        let types = ["quality", "coverage", "diff", "trend", "status", "comparison"];
        let styles = BadgeStyle::ALL;
        let sequential =
            PrBadgeManager::with_store(PrBadgeConfig::default(), MemoryArtifactStore::new())
                .expect("manager");
        let parallel = PrBadgeManager::with_store(
            PrBadgeConfig {
                parallel: true,
                ..PrBadgeConfig::default()
            },
            MemoryArtifactStore::new()
        )
        .expect("manager");
        let request = request(&types, &styles);

        let left = sequential
            .generate_pr_badges(&Context::background(), &request)
            .expect("sequential");
        let right = parallel
            .generate_pr_badges(&Context::background(), &request)
            .expect("parallel");

        assert_eq!(left.total_badges, 18);
        assert_eq!(left.public_urls, right.public_urls);
        for path in &left.local_paths {
            let name = path.file_name().and_then(|name| name.to_str()).expect("name");
            assert_eq!(
                sequential.store().contents(42, name),
                parallel.store().contents(42, name)
            );
        }
    }

    #[test]
    fn cleanup_of_missing_directory_is_a_no_op() {
        let dir = tempdir().expect("temp dir");
        let manager = PrBadgeManager::new(config_at(dir.path())).expect("manager");

        manager.cleanup_pr_badges(99).expect("no-op");
        assert_eq!(fs::read_dir(dir.path()).expect("base").count(), 0);
    }

    #[test]
    fn cleanup_removes_pr_directory() {
        let dir = tempdir().expect("temp dir");
        let manager = PrBadgeManager::new(config_at(dir.path())).expect("manager");
        manager
            .generate_pr_badges(&Context::background(), &request(&["coverage"], &[]))
            .expect("generation succeeds");

        manager.cleanup_pr_badges(42).expect("cleanup");
        assert!(!dir.path().join("pr").join("42").exists());
    }

    #[test]
    fn disabled_cleanup_keeps_artifacts() {
        let mut config = PrBadgeConfig::default();
        config.cleanup.enable_cleanup = false;
        let manager = PrBadgeManager::with_store(config, MemoryArtifactStore::new()).expect("manager");
        manager
            .generate_pr_badges(&Context::background(), &request(&["coverage"], &[]))
            .expect("generation succeeds");

        manager.cleanup_pr_badges(42).expect("cleanup");
        assert_eq!(manager.store().list(42).expect("list").len(), 1);
    }

    #[test]
    fn closed_pr_is_cleaned_only_when_merged() {
        let manager =
            PrBadgeManager::with_store(PrBadgeConfig::default(), MemoryArtifactStore::new())
                .expect("manager");
        manager
            .generate_pr_badges(&Context::background(), &request(&["coverage"], &[]))
            .expect("generation succeeds");

        assert!(!manager.handle_pr_closed(42, false).expect("closed"));
        assert_eq!(manager.store().list(42).expect("list").len(), 1);
        assert!(manager.handle_pr_closed(42, true).expect("merged"));
        assert!(manager.store().list(42).expect("list").is_empty());
    }

    #[test]
    fn inventory_reproduces_legacy_parse() {
        let dir = tempdir().expect("temp dir");
        let manager = PrBadgeManager::new(config_at(dir.path())).expect("manager");
        manager
            .generate_pr_badges(
                &Context::background(),
                &request(&["coverage"], &[BadgeStyle::Flat, BadgeStyle::FlatSquare])
            )
            .expect("generation succeeds");
        let directory = dir.path().join("pr").join("42");
        fs::write(directory.join("notes.txt"), b"x").expect("foreign file");
        fs::write(directory.join("logo.svg"), b"<svg/>").expect("foreign svg");

        let inventory = manager.get_pr_info(42).expect("inventory");
        assert_eq!(inventory.directory, directory);
        let parsed: Vec<(&str, &str)> = inventory
            .entries
            .iter()
            .map(|entry| (entry.badge_type.as_str(), entry.style.as_str()))
            .collect();
        assert_eq!(parsed, vec![("coverage-flat", "square"), ("coverage", "flat")]);
    }

    #[test]
    fn inventory_inverts_delimited_names() {
        let config = PrBadgeConfig {
            naming_scheme: NamingScheme::Delimited,
            ..PrBadgeConfig::default()
        };
        let manager = PrBadgeManager::with_store(config, MemoryArtifactStore::new()).expect("manager");
        manager
            .generate_pr_badges(
                &Context::background(),
                &request(&["status"], &[BadgeStyle::ForTheBadge, BadgeStyle::FlatSquare])
            )
            .expect("generation succeeds");

        let inventory = manager.get_pr_info(42).expect("inventory");
        let parsed: Vec<(&str, &str)> = inventory
            .entries
            .iter()
            .map(|entry| (entry.badge_type.as_str(), entry.style.as_str()))
            .collect();
        assert_eq!(parsed, vec![("status", "flat-square"), ("status", "for-the-badge")]);
    }

    #[test]
    fn inventory_of_unknown_pr_is_empty() {
        let dir = tempdir().expect("temp dir");
        let manager = PrBadgeManager::new(config_at(dir.path())).expect("manager");
        assert!(manager.get_pr_info(7).expect("inventory").entries.is_empty());
    }
}
