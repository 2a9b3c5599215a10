//! # gh-release
//!
//! Create or update a GitHub release from CI and attach build artifacts to it.
//!
//! ## Overview
//!
//! `gh-release` reads its configuration from GitHub Actions inputs
//! (`INPUT_*` and `GITHUB_*` environment variables) or equivalent flags,
//! finds the release for the resolved tag and updates it, or creates it when
//! it does not exist yet. Files matched by glob patterns are then uploaded as
//! release assets.
//!
//! ## Features
//!
//! - Idempotent find-or-create keyed by tag, including draft releases
//! - Release notes are appended to an existing release, never replaced
//! - Concurrent runs racing on the same tag converge on a single release
//! - Bounded-concurrency asset uploads joined before success is reported
//! - Optional "draft until assets uploaded" publishing
//!
//! ## Usage
//!
//! ```bash
//! # Inside a workflow triggered by a tag push
//! gh-release --files "dist/*.tar.gz,dist/*.zip"
//!
//! # Explicit repository and tag
//! gh-release --repository owner/repo --tag-name v1.0.0 --draft-until-assets-uploaded
//! ```

/// Local file discovery and asset preparation
pub mod asset;

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Per-run release configuration derived from the arguments
pub mod config;

/// Error types and error handling utilities
pub mod error;

/// GitHub API implementation of the releaser
pub mod github;

/// Workflow outputs and failure reporting
pub mod output;

/// Release workflow orchestration
pub mod publisher;

/// Release API abstraction and paginated search
pub mod releaser;

/// Conflict retry logic with exponential backoff
pub mod retry;
