use crate::asset::parse_patterns;
use crate::cli::Args;
use crate::error::{GhReleaseError, Result};
use crate::retry::RetryConfig;

const TAG_REF_PREFIX: &str = "refs/tags/";

/// Everything one run needs, computed once from the arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseConfig {
    pub owner: String,
    pub repo: String,
    pub tag: String,
    pub name: Option<String>,
    pub body: Option<String>,
    pub draft: bool,
    pub prerelease: bool,
    pub draft_until_assets_uploaded: bool,
    pub target_commitish: Option<String>,
    pub files: Vec<String>,
    pub fail_on_unmatched_files: bool,
}

impl ReleaseConfig {
    pub fn from_args(args: &Args) -> Result<Self> {
        let (owner, repo) = args.parse_repository()?;
        let tag = resolve_tag(args.tag_name.as_deref(), args.git_ref.as_deref())?;

        let body = match &args.body_path {
            Some(path) => Some(std::fs::read_to_string(path).map_err(|e| {
                GhReleaseError::Config(format!(
                    "Failed to read body_path {}: {}",
                    path.display(),
                    e
                ))
            })?),
            None => args.body.clone(),
        };

        Ok(Self {
            owner,
            repo,
            tag,
            name: non_empty(args.name.clone()),
            body: non_empty(body),
            draft: args.draft,
            prerelease: args.prerelease,
            draft_until_assets_uploaded: args.draft_until_assets_uploaded,
            target_commitish: non_empty(args.target_commitish.clone()),
            files: args.files.as_deref().map(parse_patterns).unwrap_or_default(),
            fail_on_unmatched_files: args.fail_on_unmatched_files,
        })
    }

    /// Draft state used while the release is being created or updated
    pub fn effective_draft(&self) -> bool {
        self.draft || self.draft_until_assets_uploaded
    }

    /// Whether a final publish call is owed once assets are uploaded
    pub fn publish_after_upload(&self) -> bool {
        self.draft_until_assets_uploaded && !self.draft
    }

    pub fn retry_config(args: &Args) -> RetryConfig {
        RetryConfig::with_max_retries(args.max_retries)
    }
}

/// Explicit tag wins; otherwise the ref must be a tag ref
pub fn resolve_tag(tag_name: Option<&str>, git_ref: Option<&str>) -> Result<String> {
    if let Some(tag) = tag_name.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(tag.to_string());
    }

    let git_ref = git_ref.unwrap_or_default();
    match git_ref.strip_prefix(TAG_REF_PREFIX) {
        Some(tag) if !tag.is_empty() => Ok(tag.to_string()),
        _ => Err(GhReleaseError::NoTag {
            git_ref: git_ref.to_string(),
        }),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
