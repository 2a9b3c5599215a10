use clap::Parser;
use gh_release::cli::Args;
use gh_release::config::ReleaseConfig;
use gh_release::error::GhReleaseError;
use std::fs;
use tempfile::TempDir;

fn parse(extra: &[&str]) -> Args {
    let mut argv = vec!["gh-release", "--repository", "owner/repo"];
    argv.extend_from_slice(extra);
    Args::try_parse_from(argv).expect("arguments should parse")
}

#[test]
fn test_config_from_tag_ref() {
    let args = parse(&[
        "--ref",
        "refs/tags/v1.2.3",
        "--files",
        "dist/*.zip\ndist/*.tar.gz,SHA256SUMS",
        "--draft",
        "--prerelease",
    ]);

    let config = ReleaseConfig::from_args(&args).unwrap();

    assert_eq!(config.owner, "owner");
    assert_eq!(config.repo, "repo");
    assert_eq!(config.tag, "v1.2.3");
    assert!(config.draft);
    assert!(config.prerelease);
    assert_eq!(config.files, vec!["dist/*.zip", "dist/*.tar.gz", "SHA256SUMS"]);
}

#[test]
fn test_tag_name_overrides_ref() {
    let args = parse(&["--ref", "refs/heads/main", "--tag-name", "nightly"]);
    let config = ReleaseConfig::from_args(&args).unwrap();
    assert_eq!(config.tag, "nightly");
}

#[test]
fn test_branch_ref_without_tag_fails() {
    let args = parse(&["--ref", "refs/heads/main", "--tag-name", ""]);
    let err = ReleaseConfig::from_args(&args).unwrap_err();
    assert!(matches!(err, GhReleaseError::NoTag { .. }));
}

#[test]
fn test_invalid_repository() {
    for input in ["invalid-format", "owner/", "a/b/c"] {
        let args = Args::try_parse_from([
            "gh-release",
            "--repository",
            input,
            "--tag-name",
            "v1.0.0",
        ])
        .unwrap();
        let err = ReleaseConfig::from_args(&args).unwrap_err();
        assert!(
            matches!(err, GhReleaseError::InvalidRepo { .. }),
            "{input} should be rejected"
        );
    }
}

#[test]
fn test_body_path_wins_over_body() {
    let dir = TempDir::new().unwrap();
    let notes = dir.path().join("NOTES.md");
    fs::write(&notes, "## Changes\n- fixed things").unwrap();

    let args = parse(&[
        "--tag-name",
        "v1.0.0",
        "--body",
        "inline body",
        "--body-path",
        notes.to_str().unwrap(),
    ]);
    let config = ReleaseConfig::from_args(&args).unwrap();

    assert_eq!(config.body.as_deref(), Some("## Changes\n- fixed things"));
}

#[test]
fn test_missing_body_path_is_config_error() {
    let args = parse(&["--tag-name", "v1.0.0", "--body-path", "/nonexistent/NOTES.md"]);
    let err = ReleaseConfig::from_args(&args).unwrap_err();
    assert!(matches!(err, GhReleaseError::Config(_)));
}

#[test]
fn test_empty_inputs_are_unset() {
    let args = parse(&["--tag-name", "v1.0.0", "--name", "", "--body", ""]);
    let config = ReleaseConfig::from_args(&args).unwrap();
    assert_eq!(config.name, None);
    assert_eq!(config.body, None);
    assert!(config.files.is_empty());
}

#[test]
fn test_flags() {
    let args = parse(&[
        "--tag-name",
        "v1.0.0",
        "--fail-on-unmatched-files",
        "--draft-until-assets-uploaded",
        "--target-commitish",
        "release-branch",
        "--max-retries",
        "5",
        "--upload-concurrency",
        "8",
    ]);
    let config = ReleaseConfig::from_args(&args).unwrap();

    assert!(config.fail_on_unmatched_files);
    assert!(config.draft_until_assets_uploaded);
    assert_eq!(config.target_commitish.as_deref(), Some("release-branch"));
    assert_eq!(ReleaseConfig::retry_config(&args).max_retries, 5);
    assert_eq!(args.upload_concurrency, 8);
}

#[test]
fn test_upload_concurrency_must_be_positive() {
    let result = Args::try_parse_from([
        "gh-release",
        "--repository",
        "owner/repo",
        "--upload-concurrency",
        "0",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_explicit_token_wins() {
    let args = parse(&["--token", "explicit-token"]);
    assert_eq!(args.token().as_deref(), Some("explicit-token"));
}
