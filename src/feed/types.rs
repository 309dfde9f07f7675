use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized output of one fetch. Built once from the raw API item and the
/// base URLs of that response; never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtworkRecord {
    pub id: u64,
    pub title: String,
    pub artist_name: String,
    pub artist_id: Option<u64>,
    pub date_start: Option<i32>,
    pub date_end: Option<i32>,
    pub medium: String,
    pub place_of_origin: String,
    pub short_description: String,
    pub image_url: Option<String>,
    pub detail_url: String,
    pub artist_url: Option<String>,
}

/// Body of `POST /api/v1/artworks/search`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub query: Value,
    pub fields: Vec<&'static str>,
    pub limit: u32,
    pub sort: Value,
}

/// Search endpoint response: a page of items plus the base URLs needed to
/// resolve image and website links.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub data: Vec<RawArtwork>,
    pub config: ApiInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiInfo {
    pub iiif_url: String,
    pub website_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct RawArtwork {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist_title: Option<String>,
    #[serde(default)]
    pub artist_id: Option<u64>,
    #[serde(default)]
    pub date_start: Option<i32>,
    #[serde(default)]
    pub date_end: Option<i32>,
    #[serde(default)]
    pub date_display: Option<String>,
    #[serde(default)]
    pub medium_display: Option<String>,
    #[serde(default)]
    pub artwork_type_title: Option<String>,
    #[serde(default)]
    pub place_of_origin: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub image_id: Option<String>,
    #[serde(default)]
    pub dimensions_detail: Option<Vec<DimensionDetail>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DimensionDetail {
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
}
