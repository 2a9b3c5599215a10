use thiserror::Error;

#[derive(Error, Debug)]
pub enum GhReleaseError {
    #[error("Release not found: {tag} in {owner}/{repo}")]
    ReleaseNotFound {
        tag: String,
        owner: String,
        repo: String,
    },

    #[error("Release for tag {tag} already exists in {owner}/{repo}")]
    ReleaseConflict {
        tag: String,
        owner: String,
        repo: String,
    },

    #[error("GitHub API error: {0}")]
    GitHubApi(Box<octocrab::Error>),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid repository format '{input}'. Expected format: owner/repo")]
    InvalidRepo { input: String },

    #[error("GitHub Releases requires a tag, but ref '{git_ref}' is not a tag ref. Set tag_name or push a tag")]
    NoTag { git_ref: String },

    #[error("Invalid glob pattern '{pattern}': {reason}")]
    Pattern { pattern: String, reason: String },

    #[error("Pattern(s) did not match any files: {patterns}")]
    UnmatchedFiles { patterns: String },

    #[error("Asset upload failed: {0}")]
    AssetUpload(String),

    #[error("{failed} of {total} asset uploads failed: {details}")]
    AssetUploads {
        failed: usize,
        total: usize,
        details: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GhReleaseError>;

impl GhReleaseError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GhReleaseError::ReleaseNotFound { .. })
    }

    /// Another run created the same tag first.
    pub fn is_conflict(&self) -> bool {
        matches!(self, GhReleaseError::ReleaseConflict { .. })
    }
}

impl From<octocrab::Error> for GhReleaseError {
    fn from(err: octocrab::Error) -> Self {
        GhReleaseError::GitHubApi(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let not_found = GhReleaseError::ReleaseNotFound {
            tag: "v1.0.0".to_string(),
            owner: "owner".to_string(),
            repo: "repo".to_string(),
        };
        assert!(not_found.is_not_found());
        assert!(!not_found.is_conflict());

        let conflict = GhReleaseError::ReleaseConflict {
            tag: "v1.0.0".to_string(),
            owner: "owner".to_string(),
            repo: "repo".to_string(),
        };
        assert!(conflict.is_conflict());
        assert!(!conflict.is_not_found());

        let other = GhReleaseError::AssetUpload("boom".to_string());
        assert!(!other.is_conflict());
        assert!(!other.is_not_found());
    }

    #[test]
    fn test_messages() {
        let err = GhReleaseError::InvalidRepo {
            input: "nope".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid repository format 'nope'. Expected format: owner/repo"
        );

        let err = GhReleaseError::UnmatchedFiles {
            patterns: "dist/*.bin".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Pattern(s) did not match any files: dist/*.bin"
        );
    }
}
