//! Tags view endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use cmx_common::matrix::{flatten_tags, tag_features};
use cmx_common::model::Tag;

use crate::error::ApiResult;
use crate::AppState;

/// One flattened taxonomy row with its cross-product feature total
#[derive(Debug, Serialize)]
pub struct TagRowSummary {
    pub primary_tag: String,
    pub secondary_tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_description: Option<String>,
    pub feature_count: usize,
}

#[derive(Debug, Serialize)]
pub struct TagsResponse {
    /// Taxonomy with exclusions applied
    pub tags: Vec<Tag>,
    /// Primary tag names hidden from the read-only views
    pub excluded: Vec<String>,
    pub rows: Vec<TagRowSummary>,
}

/// GET /api/tags
pub async fn tags(State(state): State<AppState>) -> ApiResult<Json<TagsResponse>> {
    let view = state.read_view()?;
    let visible: Vec<Tag> = view.visible_tags().into_iter().cloned().collect();

    let rows = flatten_tags(&visible)
        .into_iter()
        .map(|row| {
            let feature_count =
                tag_features(&view.products, &row.primary_tag, &row.secondary_tag).len();
            TagRowSummary {
                primary_tag: row.primary_tag,
                secondary_tag: row.secondary_tag,
                primary_description: row.primary_description,
                secondary_description: row.secondary_description,
                feature_count,
            }
        })
        .collect();

    Ok(Json(TagsResponse {
        tags: visible,
        excluded: view.exclude_tags.clone(),
        rows,
    }))
}
