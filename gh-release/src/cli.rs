use clap::builder::FalseyValueParser;
use clap::Parser;
use std::path::PathBuf;

/// Default GitHub API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Parser, Debug, Clone)]
#[clap(
    name = "gh-release",
    version,
    about = "Create or update a GitHub release and upload assets to it",
    long_about = None
)]
pub struct Args {
    /// GitHub repository (owner/repo)
    #[clap(long, env = "GITHUB_REPOSITORY")]
    pub repository: String,

    /// Git ref that triggered the run (e.g., refs/tags/v1.2.3)
    #[clap(long = "ref", env = "GITHUB_REF")]
    pub git_ref: Option<String>,

    /// GitHub token (falls back to the GITHUB_TOKEN env var)
    #[clap(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Tag name; overrides the tag derived from the ref
    #[clap(long, env = "INPUT_TAG_NAME")]
    pub tag_name: Option<String>,

    /// Release name (defaults to the tag)
    #[clap(long, env = "INPUT_NAME")]
    pub name: Option<String>,

    /// Release notes
    #[clap(long, env = "INPUT_BODY")]
    pub body: Option<String>,

    /// File to read release notes from; takes precedence over --body
    #[clap(long, env = "INPUT_BODY_PATH")]
    pub body_path: Option<PathBuf>,

    /// Create as draft release
    #[clap(long, env = "INPUT_DRAFT", value_parser = FalseyValueParser::new())]
    pub draft: bool,

    /// Mark the release as a prerelease
    #[clap(long, env = "INPUT_PRERELEASE", value_parser = FalseyValueParser::new())]
    pub prerelease: bool,

    /// Files to upload: newline or comma separated glob patterns
    #[clap(long, env = "INPUT_FILES")]
    pub files: Option<String>,

    /// Fail before any API call when a pattern matches no file
    #[clap(
        long,
        env = "INPUT_FAIL_ON_UNMATCHED_FILES",
        value_parser = FalseyValueParser::new()
    )]
    pub fail_on_unmatched_files: bool,

    /// Keep the release a draft until every asset is uploaded
    #[clap(
        long,
        env = "INPUT_DRAFT_UNTIL_ASSETS_UPLOADED",
        value_parser = FalseyValueParser::new()
    )]
    pub draft_until_assets_uploaded: bool,

    /// Commitish the tag is created from when it does not exist yet
    #[clap(long, env = "INPUT_TARGET_COMMITISH")]
    pub target_commitish: Option<String>,

    /// GitHub API base URL
    #[clap(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// How many times to retry when another run creates the release first
    #[clap(long, env = "INPUT_MAX_RETRIES", default_value_t = 3)]
    pub max_retries: u32,

    /// Maximum number of concurrent asset uploads
    #[clap(long, default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..))]
    pub upload_concurrency: u16,

    /// Enable verbose output
    #[clap(long)]
    pub verbose: bool,
}

impl Args {
    /// Token from --token/INPUT_TOKEN, else GITHUB_TOKEN
    pub fn token(&self) -> Option<String> {
        self.token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()))
    }

    /// Parse repository into (owner, repo)
    pub fn parse_repository(&self) -> crate::error::Result<(String, String)> {
        let parts: Vec<&str> = self.repository.split('/').collect();
        match parts.as_slice() {
            [owner, repo] if !owner.is_empty() && !repo.is_empty() => {
                Ok((owner.to_string(), repo.to_string()))
            }
            _ => Err(crate::error::GhReleaseError::InvalidRepo {
                input: self.repository.clone(),
            }),
        }
    }
}
