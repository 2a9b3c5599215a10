use crate::asset::{ReleaseAsset, UploadedAsset};
use crate::error::{GhReleaseError, Result};
use crate::releaser::{CreateRelease, Release, Releaser, UpdateRelease};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};

const USER_AGENT: &str = "gh-release";

/// `Releaser` backed by the GitHub REST API
pub struct GitHubReleaser {
    octocrab: Octocrab,
    http_client: Client,
    token: Option<String>,
}

impl GitHubReleaser {
    pub fn new(token: Option<String>, api_url: &str) -> Result<Self> {
        let octocrab = if let Some(token) = &token {
            Octocrab::builder()
                .base_uri(api_url)?
                .personal_token(token.clone())
                .build()?
        } else {
            Octocrab::builder().base_uri(api_url)?.build()?
        };

        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(300))
            .build()?;

        Ok(Self {
            octocrab,
            http_client,
            token,
        })
    }
}

/// HTTP status of a GitHub error response, if the error carries one
fn status_of(err: &octocrab::Error) -> Option<u16> {
    match err {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code.as_u16()),
        _ => None,
    }
}

/// 409, or a 422 whose validation errors report `already_exists`
fn is_already_exists(err: &octocrab::Error) -> bool {
    match err {
        octocrab::Error::GitHub { source, .. } => match source.status_code.as_u16() {
            409 => true,
            422 => source.errors.iter().flatten().any(|detail| {
                detail.get("code").and_then(|code| code.as_str()) == Some("already_exists")
            }),
            _ => false,
        },
        _ => false,
    }
}

fn not_found_or(err: octocrab::Error, owner: &str, repo: &str, tag: &str) -> GhReleaseError {
    if status_of(&err) == Some(404) {
        GhReleaseError::ReleaseNotFound {
            tag: tag.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
        }
    } else {
        err.into()
    }
}

/// Strip the RFC 6570 `{?name,label}` suffix and add the asset name
pub fn upload_endpoint(upload_url: &str, asset_name: &str) -> Result<Url> {
    let base = upload_url
        .split_once('{')
        .map(|(base, _)| base)
        .unwrap_or(upload_url);

    let mut url = Url::parse(base)
        .map_err(|e| GhReleaseError::AssetUpload(format!("Invalid upload URL {base}: {e}")))?;
    url.query_pairs_mut().append_pair("name", asset_name);
    Ok(url)
}

#[async_trait]
impl Releaser for GitHubReleaser {
    async fn get_release_by_tag(&self, owner: &str, repo: &str, tag: &str) -> Result<Release> {
        self.octocrab
            .repos(owner, repo)
            .releases()
            .get_by_tag(tag)
            .await
            .map(Release::from)
            .map_err(|e| not_found_or(e, owner, repo, tag))
    }

    async fn create_release(&self, params: &CreateRelease) -> Result<Release> {
        tracing::info!("Creating new release: {}", params.tag_name);

        let repos = self.octocrab.repos(&params.owner, &params.repo);
        let releases = repos.releases();
        let mut release_builder = releases
            .create(&params.tag_name)
            .draft(params.draft)
            .prerelease(params.prerelease);

        if let Some(target) = &params.target_commitish {
            release_builder = release_builder.target_commitish(target);
        }
        if let Some(name) = &params.name {
            release_builder = release_builder.name(name);
        }
        if let Some(body) = &params.body {
            release_builder = release_builder.body(body);
        }

        match release_builder.send().await {
            Ok(release) => Ok(release.into()),
            Err(e) if is_already_exists(&e) => {
                tracing::warn!(
                    "Release for {} already exists, status {:?}: {}",
                    params.tag_name,
                    status_of(&e),
                    e
                );
                Err(GhReleaseError::ReleaseConflict {
                    tag: params.tag_name.clone(),
                    owner: params.owner.clone(),
                    repo: params.repo.clone(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_release(&self, params: &UpdateRelease) -> Result<Release> {
        tracing::debug!("Updating release {}", params.release_id);

        let repos = self.octocrab.repos(&params.owner, &params.repo);
        let releases = repos.releases();
        let mut release_builder = releases.update(params.release_id);

        if let Some(tag_name) = &params.tag_name {
            release_builder = release_builder.tag_name(tag_name);
        }
        if let Some(target) = &params.target_commitish {
            release_builder = release_builder.target_commitish(target);
        }
        if let Some(name) = &params.name {
            release_builder = release_builder.name(name);
        }
        if let Some(body) = &params.body {
            release_builder = release_builder.body(body);
        }
        if let Some(draft) = params.draft {
            release_builder = release_builder.draft(draft);
        }
        if let Some(prerelease) = params.prerelease {
            release_builder = release_builder.prerelease(prerelease);
        }

        Ok(release_builder.send().await?.into())
    }

    async fn list_releases(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<Release>> {
        let page = self
            .octocrab
            .repos(owner, repo)
            .releases()
            .list()
            .per_page(per_page)
            .page(page)
            .send()
            .await?;

        Ok(page.items.into_iter().map(Release::from).collect())
    }

    async fn upload_asset(
        &self,
        release: &Release,
        asset: &ReleaseAsset,
    ) -> Result<UploadedAsset> {
        tracing::info!("Uploading asset: {}", asset.name);

        let url = upload_endpoint(&release.upload_url, &asset.name)?;

        let mut request = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, asset.mime)
            .header(ACCEPT, "application/vnd.github+json")
            .body(asset.data.clone());
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GhReleaseError::AssetUpload(format!(
                "Failed to upload {}: {status} - {error_text}",
                asset.name
            )));
        }

        let uploaded: UploadedAsset = response.json().await?;
        tracing::info!("Successfully uploaded: {}", uploaded.name);
        Ok(uploaded)
    }
}
