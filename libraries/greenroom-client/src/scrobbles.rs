//! Scrobble and recently-played endpoints.

use crate::client::GreenroomClient;
use crate::error::{ApiClientError, Result};
use crate::types::{RecentlyPlayedResponse, SetArtworkRequest, SubmitScrobblesRequest};
use async_trait::async_trait;
use greenroom_core::{
    DisplayTrack, RecentlyPlayedSource, RefreshArtworkResponse, ScrobbleApi, ScrobblePage,
    ScrobbleSubmission, SubmitScrobblesResponse,
};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Largest batch the server accepts in one `POST /api/v1/scrobbles`
pub const MAX_SCROBBLE_BATCH: usize = 50;

async fn parse_json<T: DeserializeOwned>(response: reqwest::Response, what: &str) -> Result<T> {
    let status = response.status().as_u16();
    let body = response.text().await?;

    // Some endpoints answer 204 or an empty body on success
    let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
    serde_json::from_str(body).map_err(|e| {
        debug!(status, error = %e, "Unparseable {} response", what);
        ApiClientError::ParseError(format!("Failed to parse {} response: {}", what, e))
    })
}

impl GreenroomClient {
    /// `/api/v1/scrobbles/{id}[/{action}]` with the id escaped as one path segment
    fn scrobble_url(&self, scrobble_id: &str, action: Option<&str>) -> Result<url::Url> {
        let mut url = url::Url::parse(&self.endpoint("/api/v1/scrobbles"))
            .map_err(|e| ApiClientError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ApiClientError::InvalidUrl(self.url().to_string()))?
            .push(scrobble_id)
            .extend(action);
        Ok(url)
    }

    /// Submit one batch of scrobbles.
    pub async fn submit_scrobbles(
        &self,
        batch: &[ScrobbleSubmission],
    ) -> Result<SubmitScrobblesResponse> {
        if batch.len() > MAX_SCROBBLE_BATCH {
            return Err(ApiClientError::Api {
                status: 413,
                code: Some("batch_too_large".into()),
                message: format!(
                    "At most {} scrobbles can be submitted at once, got {}",
                    MAX_SCROBBLE_BATCH,
                    batch.len()
                ),
            });
        }

        let url = self.endpoint("/api/v1/scrobbles");
        debug!(url = %url, count = batch.len(), "Submitting scrobble batch");

        let body = SubmitScrobblesRequest { scrobbles: batch };
        let response = self.send_authorized(|http| http.post(&url).json(&body)).await?;

        let mut ack: SubmitScrobblesResponse = parse_json(response, "scrobble submit").await?;
        if ack.accepted == 0 && ack.rejected == 0 {
            ack.accepted = batch.len();
        }
        Ok(ack)
    }

    /// Fetch one page of the user's scrobbles.
    pub async fn list_scrobbles(&self, cursor: Option<&str>, limit: u32) -> Result<ScrobblePage> {
        let mut url = url::Url::parse(&self.endpoint("/api/v1/scrobbles"))
            .map_err(|e| ApiClientError::InvalidUrl(e.to_string()))?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(cursor) = cursor {
                query.append_pair("cursor", cursor);
            }
            query.append_pair("limit", &limit.to_string());
        }
        debug!(url = %url, "Fetching scrobbles");

        let response = self
            .send_authorized(|http| http.get(url.clone()))
            .await?;
        let page: ScrobblePage = parse_json(response, "scrobble list").await?;

        debug!(
            count = page.scrobbles.len(),
            has_more = page.next_cursor.is_some(),
            "Fetched scrobbles"
        );
        Ok(page)
    }

    /// Ask the server to look for artwork again.
    pub async fn refresh_artwork(&self, scrobble_id: &str) -> Result<RefreshArtworkResponse> {
        let url = self.scrobble_url(scrobble_id, Some("refresh_artwork"))?;
        debug!(url = %url, "Refreshing artwork");

        let response = self.send_authorized(|http| http.post(url.clone())).await?;
        parse_json(response, "artwork refresh").await
    }

    /// Pin an artwork URL on a scrobble.
    pub async fn set_preferred_artwork(&self, scrobble_id: &str, artwork_url: &str) -> Result<()> {
        let url = self.scrobble_url(scrobble_id, None)?;
        debug!(url = %url, "Setting preferred artwork");

        let body = SetArtworkRequest {
            preferred_artwork_url: artwork_url,
        };
        self.send_authorized(|http| http.patch(url.clone()).json(&body))
            .await?;
        Ok(())
    }

    /// Remove a pinned artwork URL.
    pub async fn clear_preferred_artwork(&self, scrobble_id: &str) -> Result<()> {
        let url = self.scrobble_url(scrobble_id, Some("preferred_artwork"))?;
        debug!(url = %url, "Clearing preferred artwork");

        self.send_authorized(|http| http.delete(url.clone())).await?;
        Ok(())
    }

    /// Fetch the server-merged recently-played list.
    pub async fn recently_played(&self, limit: u32) -> Result<Vec<DisplayTrack>> {
        let url = format!("{}?limit={}", self.endpoint("/recently-played"), limit);
        debug!(url = %url, "Fetching recently played");

        let response = self.send_authorized(|http| http.get(&url)).await?;
        let tracks = parse_json::<RecentlyPlayedResponse>(response, "recently played")
            .await?
            .into_tracks();

        debug!(count = tracks.len(), "Fetched recently played");
        Ok(tracks)
    }
}

#[async_trait]
impl ScrobbleApi for GreenroomClient {
    async fn has_session(&self) -> bool {
        self.is_authenticated()
    }

    async fn submit_scrobbles(
        &self,
        batch: &[ScrobbleSubmission],
    ) -> greenroom_core::Result<SubmitScrobblesResponse> {
        Ok(GreenroomClient::submit_scrobbles(self, batch).await?)
    }

    async fn list_scrobbles(
        &self,
        cursor: Option<String>,
        limit: u32,
    ) -> greenroom_core::Result<ScrobblePage> {
        Ok(GreenroomClient::list_scrobbles(self, cursor.as_deref(), limit).await?)
    }

    async fn refresh_artwork(
        &self,
        scrobble_id: &str,
    ) -> greenroom_core::Result<RefreshArtworkResponse> {
        Ok(GreenroomClient::refresh_artwork(self, scrobble_id).await?)
    }

    async fn set_preferred_artwork(
        &self,
        scrobble_id: &str,
        artwork_url: &str,
    ) -> greenroom_core::Result<()> {
        Ok(GreenroomClient::set_preferred_artwork(self, scrobble_id, artwork_url).await?)
    }

    async fn clear_preferred_artwork(&self, scrobble_id: &str) -> greenroom_core::Result<()> {
        Ok(GreenroomClient::clear_preferred_artwork(self, scrobble_id).await?)
    }
}

#[async_trait]
impl RecentlyPlayedSource for GreenroomClient {
    async fn recently_played(&self, limit: u32) -> greenroom_core::Result<Vec<DisplayTrack>> {
        Ok(GreenroomClient::recently_played(self, limit).await?)
    }
}
