//! Search request construction for the artworks search endpoint.

use super::filter::FilterConfig;
use super::types::SearchRequest;
use serde_json::{json, Value};

/// Records requested per call.
pub const PAGE_SIZE: u32 = 12;

/// Fields requested from the search endpoint.
pub const FIELDS: [&str; 13] = [
    "id",
    "artist_title",
    "artist_id",
    "date_start",
    "date_end",
    "date_display",
    "medium_display",
    "artwork_type_title",
    "place_of_origin",
    "short_description",
    "title",
    "image_id",
    "dimensions_detail",
];

/// Build the search body for the next page under `config`.
///
/// Ids already in the seen list go into `must_not`; ids returned by the
/// response to this request are only excluded from the next one.
pub fn build_search_request(config: &FilterConfig) -> SearchRequest {
    SearchRequest {
        query: build_query(config),
        fields: FIELDS.to_vec(),
        limit: PAGE_SIZE,
        sort: random_sort(),
    }
}

fn build_query(config: &FilterConfig) -> Value {
    let settings = &config.settings;

    let mut must = vec![
        json!({ "term": { "has_not_been_viewed_much": settings.show_obscure } }),
        json!({ "exists": { "field": "artist_id" } }),
        json!({ "exists": { "field": "image_id" } }),
    ];

    // One type keeps the single-valued term; several collapse into terms.
    let types: Vec<u32> = settings.artwork_type_ids.iter().copied().collect();
    match types.as_slice() {
        [] => {}
        [only] => must.push(json!({ "term": { "artwork_type_id": only } })),
        many => must.push(json!({ "terms": { "artwork_type_id": many } })),
    }

    if settings.require_short_description {
        must.push(json!({ "exists": { "field": "short_description" } }));
    }
    if let Some(min) = settings.min_year {
        must.push(json!({ "range": { "date_start": { "gte": min } } }));
    }
    if let Some(max) = settings.max_year {
        must.push(json!({ "range": { "date_end": { "lte": max } } }));
    }

    json!({
        "bool": {
            "must": must,
            "must_not": [
                { "terms": { "id": config.seen_ids().as_slice() } }
            ]
        }
    })
}

fn random_sort() -> Value {
    json!([{
        "_script": {
            "type": "number",
            "script": "Math.random()",
            "order": "asc"
        }
    }])
}

/// Ids listed in the request's `must_not` clause.
pub fn excluded_ids(query: &Value) -> Vec<u64> {
    query["bool"]["must_not"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|clause| clause["terms"]["id"].as_array())
        .flatten()
        .filter_map(Value::as_u64)
        .collect()
}
