use crate::asset::{self, ReleaseAsset, UploadedAsset};
use crate::config::ReleaseConfig;
use crate::error::{GhReleaseError, Result};
use crate::releaser::{CreateRelease, Release, Releaser, UpdateRelease};
use crate::retry::{with_retry, RetryConfig};
use futures_util::stream::{self, StreamExt};
use std::path::{Path, PathBuf};

/// Default number of uploads in flight at once
pub const DEFAULT_UPLOAD_CONCURRENCY: usize = 4;

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub release: Release,
    pub assets: Vec<UploadedAsset>,
}

/// Drives find-or-create, asset uploads and the final publish step
pub struct Publisher<R> {
    releaser: R,
    config: ReleaseConfig,
    retry_config: RetryConfig,
    upload_concurrency: usize,
}

impl<R: Releaser> Publisher<R> {
    pub fn new(releaser: R, config: ReleaseConfig) -> Self {
        Self {
            releaser,
            config,
            retry_config: RetryConfig::default(),
            upload_concurrency: DEFAULT_UPLOAD_CONCURRENCY,
        }
    }

    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    pub fn with_upload_concurrency(mut self, limit: usize) -> Self {
        self.upload_concurrency = limit.max(1);
        self
    }

    pub fn releaser(&self) -> &R {
        &self.releaser
    }

    /// Run the whole workflow: validate files, release, upload, publish
    pub async fn run(&self) -> Result<RunReport> {
        let files = self.resolve_files()?;

        let release = self.release().await?;
        tracing::info!("Release ready: {}", release.html_url);

        let assets = if files.is_empty() {
            Vec::new()
        } else {
            self.upload_assets(&release, &files).await?
        };

        let release = if self.config.publish_after_upload() {
            self.publish(&release).await?
        } else {
            release
        };

        Ok(RunReport { release, assets })
    }

    /// Expand the file patterns once, before any API call
    pub fn resolve_files(&self) -> Result<Vec<PathBuf>> {
        if self.config.files.is_empty() {
            return Ok(Vec::new());
        }

        let unmatched = asset::unmatched_patterns(&self.config.files)?;
        if !unmatched.is_empty() {
            let patterns = unmatched.join(", ");
            if self.config.fail_on_unmatched_files {
                return Err(GhReleaseError::UnmatchedFiles { patterns });
            }
            tracing::warn!("Pattern(s) did not match any files: {}", patterns);
        }

        asset::paths(&self.config.files)
    }

    /// Find the release for the configured tag and update it, or create it.
    ///
    /// A create that loses a race against another run is retried from the
    /// lookup, up to the retry cap.
    pub async fn release(&self) -> Result<Release> {
        with_retry(
            &format!("Creating release {}", self.config.tag),
            &self.retry_config,
            GhReleaseError::is_conflict,
            || self.find_or_create(),
        )
        .await
    }

    async fn find_or_create(&self) -> Result<Release> {
        let config = &self.config;
        let draft = config.effective_draft();

        match self
            .releaser
            .find_release(&config.owner, &config.repo, &config.tag, draft)
            .await
        {
            Ok(existing) => {
                tracing::info!("Release {} already exists, will update it", config.tag);
                self.update_existing(existing, draft).await
            }
            Err(e) if e.is_not_found() => {
                tracing::info!("No release found for {}, creating one", config.tag);
                self.releaser
                    .create_release(&CreateRelease {
                        owner: config.owner.clone(),
                        repo: config.repo.clone(),
                        tag_name: config.tag.clone(),
                        target_commitish: config.target_commitish.clone(),
                        name: Some(config.name.clone().unwrap_or_else(|| config.tag.clone())),
                        body: config.body.clone(),
                        draft,
                        prerelease: config.prerelease,
                    })
                    .await
            }
            Err(e) => Err(e),
        }
    }

    async fn update_existing(&self, existing: Release, draft: bool) -> Result<Release> {
        let config = &self.config;
        let name = config
            .name
            .clone()
            .or_else(|| existing.name.clone().filter(|n| !n.is_empty()))
            .unwrap_or_else(|| config.tag.clone());

        self.releaser
            .update_release(&UpdateRelease {
                owner: config.owner.clone(),
                repo: config.repo.clone(),
                release_id: existing.id,
                tag_name: Some(config.tag.clone()),
                target_commitish: Some(existing.target_commitish.clone()),
                name: Some(name),
                body: merge_body(existing.body.as_deref(), config.body.as_deref()),
                draft: Some(draft),
                prerelease: Some(config.prerelease),
            })
            .await
    }

    /// Upload every file, at most `upload_concurrency` at a time.
    ///
    /// Returns only after all uploads have settled. Any failure is reported
    /// as one aggregated error; uploads that succeeded stay on the release.
    pub async fn upload_assets(
        &self,
        release: &Release,
        files: &[PathBuf],
    ) -> Result<Vec<UploadedAsset>> {
        tracing::info!("Uploading {} asset(s) to {}", files.len(), release.tag_name);

        let results: Vec<(&Path, Result<UploadedAsset>)> = stream::iter(files)
            .map(|path| async move {
                let result = self.upload(release, path).await;
                (path.as_path(), result)
            })
            .buffer_unordered(self.upload_concurrency)
            .collect()
            .await;

        let total = results.len();
        let mut uploaded = Vec::with_capacity(total);
        let mut failures = Vec::new();
        for (path, result) in results {
            match result {
                Ok(asset) => uploaded.push(asset),
                Err(e) => {
                    tracing::error!("Failed to upload {}: {}", path.display(), e);
                    failures.push(format!("{}: {}", path.display(), e));
                }
            }
        }

        if !failures.is_empty() {
            return Err(GhReleaseError::AssetUploads {
                failed: failures.len(),
                total,
                details: failures.join("; "),
            });
        }

        Ok(uploaded)
    }

    async fn upload(&self, release: &Release, path: &Path) -> Result<UploadedAsset> {
        let asset = ReleaseAsset::from_path(path).await?;
        self.releaser.upload_asset(release, &asset).await
    }

    async fn publish(&self, release: &Release) -> Result<Release> {
        tracing::info!("Publishing release {}", release.tag_name);
        self.releaser
            .update_release(&UpdateRelease {
                owner: self.config.owner.clone(),
                repo: self.config.repo.clone(),
                release_id: release.id,
                draft: Some(false),
                ..Default::default()
            })
            .await
    }
}

/// Append new release notes to the existing ones
pub fn merge_body(existing: Option<&str>, new: Option<&str>) -> Option<String> {
    match (existing, new) {
        (Some(old), Some(new)) => Some(format!("{old}\n{new}")),
        (Some(old), None) => Some(old.to_string()),
        (None, Some(new)) => Some(new.to_string()),
        (None, None) => None,
    }
}
