use crate::asset::{ReleaseAsset, UploadedAsset};
use crate::error::{GhReleaseError, Result};
use async_trait::async_trait;
use futures_util::stream::{self, BoxStream, Stream, StreamExt, TryStreamExt};
use serde::Serialize;

/// Page size used when enumerating releases
pub const RELEASES_PER_PAGE: u8 = 100;

/// A release as returned by the remote API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Release {
    pub id: u64,
    pub upload_url: String,
    pub html_url: String,
    pub tag_name: String,
    pub name: Option<String>,
    pub body: Option<String>,
    pub target_commitish: String,
    pub draft: bool,
    pub prerelease: bool,
}

impl From<octocrab::models::repos::Release> for Release {
    fn from(release: octocrab::models::repos::Release) -> Self {
        Self {
            id: release.id.0,
            upload_url: release.upload_url,
            html_url: release.html_url.to_string(),
            tag_name: release.tag_name,
            name: release.name,
            body: release.body,
            target_commitish: release.target_commitish,
            draft: release.draft,
            prerelease: release.prerelease,
        }
    }
}

/// Payload for creating a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRelease {
    pub owner: String,
    pub repo: String,
    pub tag_name: String,
    pub target_commitish: Option<String>,
    pub name: Option<String>,
    pub body: Option<String>,
    pub draft: bool,
    pub prerelease: bool,
}

/// Partial update of a release. `None` fields are left unchanged server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRelease {
    pub owner: String,
    pub repo: String,
    pub release_id: u64,
    pub tag_name: Option<String>,
    pub target_commitish: Option<String>,
    pub name: Option<String>,
    pub body: Option<String>,
    pub draft: Option<bool>,
    pub prerelease: Option<bool>,
}

/// Remote release-management API
#[async_trait]
pub trait Releaser: Send + Sync {
    /// Look up a published release by tag. Drafts are never returned.
    async fn get_release_by_tag(&self, owner: &str, repo: &str, tag: &str) -> Result<Release>;

    /// Fails with `ReleaseConflict` when the tag already has a release
    async fn create_release(&self, params: &CreateRelease) -> Result<Release>;

    async fn update_release(&self, params: &UpdateRelease) -> Result<Release>;

    /// Fetch a single page of releases, newest first
    async fn list_releases(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<Release>>;

    async fn upload_asset(&self, release: &Release, asset: &ReleaseAsset)
        -> Result<UploadedAsset>;

    /// Lazily enumerate every release page by page.
    ///
    /// Each call starts again from the first page. The stream ends after the
    /// first empty or short page.
    fn all_releases<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
    ) -> BoxStream<'a, Result<Vec<Release>>> {
        stream::try_unfold(Some(1u32), move |page| async move {
            let Some(page) = page else {
                return Ok::<_, GhReleaseError>(None);
            };

            let releases = self
                .list_releases(owner, repo, page, RELEASES_PER_PAGE)
                .await?;
            if releases.is_empty() {
                return Ok(None);
            }

            let next = (releases.len() >= usize::from(RELEASES_PER_PAGE)).then_some(page + 1);
            Ok(Some((releases, next)))
        })
        .boxed()
    }

    /// Find the release for `tag`.
    ///
    /// Drafts cannot be looked up by tag, so `draft == true` scans every page
    /// instead.
    async fn find_release(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
        draft: bool,
    ) -> Result<Release> {
        if !draft {
            return self.get_release_by_tag(owner, repo, tag).await;
        }

        tracing::debug!("Scanning releases of {}/{} for draft tag {}", owner, repo, tag);
        find_in_pages(self.all_releases(owner, repo), |release: &Release| {
            release.tag_name == tag
        })
        .await?
        .ok_or_else(|| GhReleaseError::ReleaseNotFound {
            tag: tag.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }
}

/// Return the first item of a paginated stream matching `predicate`.
///
/// Stops pulling pages as soon as a match is found.
pub async fn find_in_pages<S, T, E, P>(
    pages: S,
    predicate: P,
) -> std::result::Result<Option<T>, E>
where
    S: Stream<Item = std::result::Result<Vec<T>, E>>,
    P: Fn(&T) -> bool,
{
    let mut pages = std::pin::pin!(pages);
    while let Some(page) = pages.try_next().await? {
        if let Some(found) = page.into_iter().find(|item| predicate(item)) {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_find_in_pages_short_circuits() {
        let pulled = Arc::new(AtomicU32::new(0));
        let pulled_clone = pulled.clone();
        let pages = stream::iter(vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]).map(
            move |page| {
                pulled_clone.fetch_add(1, Ordering::SeqCst);
                Ok::<_, GhReleaseError>(page)
            },
        );

        let found = find_in_pages(pages, |n: &i32| *n % 5 == 0).await.unwrap();

        assert_eq!(found, Some(5));
        assert_eq!(pulled.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_find_in_pages_exhausted() {
        let pages = stream::iter(vec![Ok::<_, GhReleaseError>(vec![1, 2]), Ok(vec![3])]);
        let found = find_in_pages(pages, |n: &i32| *n > 10).await.unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_find_in_pages_propagates_error() {
        let pages = stream::iter(vec![
            Ok(vec![1]),
            Err(GhReleaseError::Config("page failed".to_string())),
            Ok(vec![2]),
        ]);
        let result = find_in_pages(pages, |n: &i32| *n == 2).await;
        assert!(matches!(result, Err(GhReleaseError::Config(_))));
    }
}
