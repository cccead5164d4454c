//! UMD backend API client
//!
//! Thin request/response wrappers around the backend's dataset,
//! configuration and group endpoints. Each call issues exactly one HTTP
//! request; there are no retries and no local recovery — failures surface
//! to the caller as [`ApiError`].

use crate::error::{ApiError, ApiResult};
use serde_json::Value;
use std::time::Duration;
use umd_common::api::{GroupMap, GroupRecord, SessionUser, Ta2Config};
use umd_common::ClientConfig;

const USER_AGENT: &str = concat!("umd-client/", env!("CARGO_PKG_VERSION"));

/// Header carrying the girder authentication token
const TOKEN_HEADER: &str = "Girder-Token";

/// UMD backend API client
pub struct UmdClient {
    http_client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl UmdClient {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.server_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http_client.request(method, self.url(path));
        if let Some(token) = &self.token {
            builder = builder.header(TOKEN_HEADER, token);
        }
        builder
    }

    /// Trigger ingestion of the video items in a folder
    ///
    /// `POST UMD_dataset/ingest_video/{folderId}` — returns the backend's
    /// job description body.
    pub async fn ingest_video(&self, folder_id: &str) -> ApiResult<Value> {
        let path = format!("UMD_dataset/ingest_video/{folder_id}");
        tracing::debug!(folder_id = %folder_id, "Triggering video ingest");

        let response = self.request(reqwest::Method::POST, &path).send().await?;
        let response = expect_success(response, &path).await?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        tracing::info!(folder_id = %folder_id, "Video ingest triggered");
        Ok(body)
    }

    /// Trigger a refresh of the backend's container folders
    ///
    /// `POST UMD_dataset/update_containers`
    pub async fn update_containers(&self) -> ApiResult<()> {
        let path = "UMD_dataset/update_containers";
        tracing::debug!("Requesting container refresh");

        let response = self.request(reqwest::Method::POST, path).send().await?;
        expect_success(response, path).await?;

        tracing::info!("Container refresh triggered");
        Ok(())
    }

    /// Create a filter folder under the given folder
    ///
    /// `POST UMD_dataset/filter/{folderId}` — the backend contract is
    /// status-exact: the parsed body is returned only for status 200.
    /// Every other status, including other 2xx codes, yields `None`, which
    /// callers cannot distinguish from an intentionally empty result.
    pub async fn create_filter_folder(&self, folder_id: &str) -> ApiResult<Option<Value>> {
        let path = format!("UMD_dataset/filter/{folder_id}");
        tracing::debug!(folder_id = %folder_id, "Creating filter folder");

        let response = self.request(reqwest::Method::POST, &path).send().await?;
        let status = response.status();

        if status.as_u16() != 200 {
            tracing::warn!(
                folder_id = %folder_id,
                status = status.as_u16(),
                "Filter folder request returned non-200, reporting empty result"
            );
            return Ok(None);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        Ok(Some(body))
    }

    /// Fetch the TA2 configuration
    ///
    /// `GET UMD_configuration/TA2_config`
    pub async fn get_ta2_config(&self) -> ApiResult<Ta2Config> {
        let path = "UMD_configuration/TA2_config";
        tracing::debug!("Fetching TA2 configuration");

        let response = self.request(reqwest::Method::GET, path).send().await?;
        let response = expect_success(response, path).await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Persist the TA2 configuration
    ///
    /// `PUT UMD_configuration/TA2_config` — the config round-trips opaquely;
    /// validation is the backend's concern.
    pub async fn put_ta2_config(&self, config: &Ta2Config) -> ApiResult<()> {
        let path = "UMD_configuration/TA2_config";
        tracing::debug!(norms = config.norm_map.len(), "Updating TA2 configuration");

        let response = self
            .request(reqwest::Method::PUT, path)
            .json(config)
            .send()
            .await?;
        expect_success(response, path).await?;

        tracing::info!("TA2 configuration updated");
        Ok(())
    }

    /// Fetch the group-name → group-id mapping
    ///
    /// `GET group` — maps the backend's group listing to name/id pairs.
    /// `limit=0` requests the full listing in one page.
    pub async fn get_group_ids(&self) -> ApiResult<GroupMap> {
        let path = "group";
        tracing::debug!("Fetching group ids");

        let response = self
            .request(reqwest::Method::GET, path)
            .query(&[("limit", "0")])
            .send()
            .await?;
        let response = expect_success(response, path).await?;

        let records: Vec<GroupRecord> = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        tracing::debug!(groups = records.len(), "Fetched group listing");
        Ok(records.into_iter().map(|g| (g.name, g.id)).collect())
    }

    /// Fetch the session user, or `None` when the session is anonymous
    ///
    /// `GET user/me` — the backend answers `null` for anonymous sessions.
    pub async fn current_user(&self) -> ApiResult<Option<SessionUser>> {
        let path = "user/me";
        tracing::debug!("Fetching session user");

        let response = self.request(reqwest::Method::GET, path).send().await?;
        let response = expect_success(response, path).await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Download the tabular export of a folder's annotations as a zip
    ///
    /// `GET UMD_dataset/export/{folderId}`
    pub async fn export_tabular(&self, folder_id: &str) -> ApiResult<Vec<u8>> {
        let path = format!("UMD_dataset/export/{folder_id}");
        tracing::debug!(folder_id = %folder_id, "Downloading tabular export");

        let response = self.request(reqwest::Method::GET, &path).send().await?;
        let response = expect_success(response, &path).await?;

        let bytes = response.bytes().await?;
        tracing::info!(folder_id = %folder_id, bytes = bytes.len(), "Export downloaded");
        Ok(bytes.to_vec())
    }
}

/// Triage a response's status, turning non-success into a typed error
async fn expect_success(
    response: reqwest::Response,
    path: &str,
) -> ApiResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::from_status(status.as_u16(), path, body))
}
