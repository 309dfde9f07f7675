use super::filter::FilterConfig;
use super::query::{build_search_request, excluded_ids};
use super::types::*;
use super::ArtworkSource;
use crate::config::ApiConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashSet;

/// Items taller than this multiple of their width are dropped.
const MAX_HEIGHT_TO_WIDTH: f64 = 2.5;

/// Header the Art Institute of Chicago API uses to identify calling sites.
const USER_AGENT_HEADER: &str = "AIC-User-Agent";

/// Client for the Art Institute of Chicago artworks search endpoint.
pub struct ArticClient {
    client: Client,
    search_url: String,
    user_agent: String,
}

/// Result of normalizing one response: the records to display and every id
/// the response carried, including ones whose record was dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBatch {
    pub records: Vec<ArtworkRecord>,
    pub returned_ids: Vec<u64>,
}

impl ArticClient {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: Client::new(),
            search_url: config.search_url.clone(),
            user_agent: config.user_agent.clone(),
        }
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let resp = self
            .client
            .post(&self.search_url)
            .header(USER_AGENT_HEADER, &self.user_agent)
            .json(request)
            .send()
            .await
            .context("artwork search request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("artwork search failed ({}): {}", status, body);
        }

        resp.json()
            .await
            .context("failed to parse artwork search response")
    }
}

#[async_trait]
impl ArtworkSource for ArticClient {
    async fn fetch_batch(&mut self, session: &mut FilterConfig) -> Result<Vec<ArtworkRecord>> {
        let request = build_search_request(session);
        tracing::debug!(
            excluded = excluded_ids(&request.query).len(),
            "searching artworks"
        );
        let response = self.search(&request).await?;

        let batch = normalize_batch(&response);
        let newly_seen = session.mark_seen(batch.returned_ids.iter().copied());
        tracing::debug!(
            returned = batch.returned_ids.len(),
            kept = batch.records.len(),
            newly_seen,
            seen_total = session.seen_ids().len(),
            "artwork batch normalized"
        );

        Ok(batch.records)
    }
}

/// Turn a raw search response into display records.
///
/// Pure: the same response always yields the same batch. Repeated ids within
/// one response keep only their first record.
pub fn normalize_batch(response: &SearchResponse) -> NormalizedBatch {
    let iiif_base = response.config.iiif_url.trim_end_matches('/');
    let site_base = response.config.website_url.trim_end_matches('/');

    let mut returned_ids = Vec::with_capacity(response.data.len());
    let mut records = Vec::with_capacity(response.data.len());
    let mut in_batch = HashSet::new();

    for artwork in &response.data {
        returned_ids.push(artwork.id);
        if !in_batch.insert(artwork.id) || is_too_tall(artwork) {
            continue;
        }
        records.push(to_record(artwork, iiif_base, site_base));
    }

    NormalizedBatch { records, returned_ids }
}

/// Height more than 2.5x width on the first dimension entry. Entries missing
/// either side, or with a zero side, are kept.
fn is_too_tall(artwork: &RawArtwork) -> bool {
    let Some(first) = artwork.dimensions_detail.as_deref().and_then(|d| d.first()) else {
        return false;
    };
    match (first.height, first.width) {
        (Some(h), Some(w)) if h != 0.0 && w != 0.0 => h > MAX_HEIGHT_TO_WIDTH * w,
        _ => false,
    }
}

fn to_record(artwork: &RawArtwork, iiif_base: &str, site_base: &str) -> ArtworkRecord {
    ArtworkRecord {
        id: artwork.id,
        title: artwork.title.clone().unwrap_or_default(),
        artist_name: artwork.artist_title.clone().unwrap_or_default(),
        artist_id: artwork.artist_id,
        date_start: artwork.date_start,
        date_end: artwork.date_end,
        medium: artwork.medium_display.clone().unwrap_or_default(),
        place_of_origin: artwork.place_of_origin.clone().unwrap_or_default(),
        short_description: artwork.short_description.clone().unwrap_or_default(),
        image_url: artwork
            .image_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| format!("{}/{}/full/843,/0/default.jpg", iiif_base, id)),
        detail_url: format!("{}/artworks/{}", site_base, artwork.id),
        artist_url: artwork
            .artist_id
            .map(|id| format!("{}/artists/{}", site_base, id)),
    }
}
