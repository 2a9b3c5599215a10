use crate::error::{GhReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A local file prepared for upload
#[derive(Debug, Clone)]
pub struct ReleaseAsset {
    pub name: String,
    pub mime: &'static str,
    pub size: u64,
    pub data: Vec<u8>,
}

impl ReleaseAsset {
    /// Read a file and derive its upload name and content type
    pub async fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                GhReleaseError::AssetUpload(format!("Invalid asset path: {}", path.display()))
            })?
            .to_string();

        let size = tokio::fs::metadata(path).await?.len();
        let data = tokio::fs::read(path).await?;

        Ok(Self {
            name,
            mime: get_content_type(path),
            size,
            data,
        })
    }
}

/// Asset as reported back by the upload endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedAsset {
    pub id: u64,
    pub name: String,
    pub browser_download_url: String,
    pub size: u64,
}

/// Determine content type for an asset
pub fn get_content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "gz" | "tgz" => "application/gzip",
        "zip" => "application/zip",
        "xz" => "application/x-xz",
        "bz2" => "application/x-bzip2",
        "zst" => "application/zstd",
        "tar" => "application/x-tar",
        "7z" => "application/x-7z-compressed",
        "deb" => "application/vnd.debian.binary-package",
        "rpm" => "application/x-rpm",
        "dmg" => "application/x-apple-diskimage",
        "msi" => "application/x-msdownload",
        "exe" => "application/vnd.microsoft.portable-executable",
        "jar" => "application/java-archive",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "txt" | "sha256" | "sig" | "asc" => "text/plain",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Split a files input on newlines and commas
pub fn parse_patterns(input: &str) -> Vec<String> {
    input
        .split(['\n', ','])
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

fn expand(pattern: &str) -> Result<Vec<PathBuf>> {
    let entries = glob::glob(pattern).map_err(|e| GhReleaseError::Pattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;

    Ok(entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("Skipping unreadable path for '{}': {}", pattern, e);
                None
            }
        })
        .filter(|path| path.is_file())
        .collect())
}

/// Every regular file matched by `patterns`, in pattern order, without duplicates
pub fn paths(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut found: Vec<PathBuf> = Vec::new();
    for pattern in patterns {
        for path in expand(pattern)? {
            if !found.contains(&path) {
                found.push(path);
            }
        }
    }
    Ok(found)
}

/// Patterns that match no regular file
pub fn unmatched_patterns(patterns: &[String]) -> Result<Vec<String>> {
    let mut unmatched = Vec::new();
    for pattern in patterns {
        if expand(pattern)?.is_empty() {
            unmatched.push(pattern.clone());
        }
    }
    Ok(unmatched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_get_content_type() {
        assert_eq!(get_content_type(Path::new("dist/app.zip")), "application/zip");
        assert_eq!(get_content_type(Path::new("app.tar.gz")), "application/gzip");
        assert_eq!(get_content_type(Path::new("APP.ZIP")), "application/zip");
        assert_eq!(get_content_type(Path::new("SHA256SUMS.txt")), "text/plain");
        assert_eq!(
            get_content_type(Path::new("app.unknownext")),
            "application/octet-stream"
        );
        assert_eq!(get_content_type(Path::new("binary")), "application/octet-stream");
    }

    #[test]
    fn test_parse_patterns() {
        let patterns = parse_patterns("dist/*.zip\n  dist/*.tar.gz , checksums.txt\r\n\n,");
        assert_eq!(patterns, vec!["dist/*.zip", "dist/*.tar.gz", "checksums.txt"]);
        assert!(parse_patterns("").is_empty());
    }

    #[test]
    fn test_paths_and_unmatched() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("dist/nested")).unwrap();
        fs::write(dir.path().join("dist/a.bin"), b"a").unwrap();
        fs::write(dir.path().join("dist/b.bin"), b"b").unwrap();

        let bins = format!("{}/dist/*.bin", dir.path().display());
        let all = format!("{}/dist/*", dir.path().display());
        let missing = format!("{}/dist/*.exe", dir.path().display());
        let patterns = vec![bins, all, missing.clone()];

        let found = paths(&patterns).unwrap();
        // directories are skipped and overlapping patterns are de-duplicated
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.is_file()));

        assert_eq!(unmatched_patterns(&patterns).unwrap(), vec![missing]);
    }

    #[test]
    fn test_invalid_pattern() {
        let err = paths(&["dist/[".to_string()]).unwrap_err();
        assert!(matches!(err, GhReleaseError::Pattern { .. }));
    }

    #[tokio::test]
    async fn test_release_asset_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app-x86_64.zip");
        fs::write(&path, b"zip bytes").unwrap();

        let asset = ReleaseAsset::from_path(&path).await.unwrap();

        assert_eq!(asset.name, "app-x86_64.zip");
        assert_eq!(asset.mime, "application/zip");
        assert_eq!(asset.size, 9);
        assert_eq!(asset.data, b"zip bytes");
    }
}
