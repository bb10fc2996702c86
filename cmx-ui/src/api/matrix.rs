//! Matrix view endpoints
//!
//! The matrix cross-tabulates flattened tag rows against products, marking
//! presence per cell; a cell drills down into the matching features sorted
//! by recency.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use cmx_common::matrix::{flatten_tags, product_tag_features, tag_features};
use cmx_common::model::Tag;

use crate::error::ApiResult;
use crate::AppState;

/// One matrix cell: does this product carry the row's tag pair?
#[derive(Debug, Serialize)]
pub struct MatrixCell {
    pub present: bool,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct MatrixRow {
    pub primary_tag: String,
    pub secondary_tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_description: Option<String>,
    /// One cell per product, in product order
    pub cells: Vec<MatrixCell>,
}

#[derive(Debug, Serialize)]
pub struct MatrixResponse {
    pub generation: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub products: Vec<String>,
    pub rows: Vec<MatrixRow>,
}

/// GET /api/matrix
pub async fn matrix(State(state): State<AppState>) -> ApiResult<Json<MatrixResponse>> {
    let view = state.read_view()?;
    let visible: Vec<Tag> = view.visible_tags().into_iter().cloned().collect();

    let rows = flatten_tags(&visible)
        .into_iter()
        .map(|row| {
            let cells = view
                .products
                .iter()
                .map(|product| {
                    let count =
                        product_tag_features(product, &row.primary_tag, &row.secondary_tag).len();
                    MatrixCell {
                        present: count > 0,
                        count,
                    }
                })
                .collect();
            MatrixRow {
                primary_tag: row.primary_tag,
                secondary_tag: row.secondary_tag,
                primary_description: row.primary_description,
                secondary_description: row.secondary_description,
                cells,
            }
        })
        .collect();

    Ok(Json(MatrixResponse {
        generation: view.generation,
        last_error: view.last_error.clone(),
        products: view.products.iter().map(|p| p.name.clone()).collect(),
        rows,
    }))
}

/// One entry of a matrix cell drill-down
#[derive(Debug, Serialize)]
pub struct CellFeature {
    pub product: String,
    pub title: String,
    pub description: String,
    pub time: String,
    /// Parsed date used for ordering (epoch when unparsable)
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct CellFeaturesResponse {
    pub primary_tag: String,
    pub secondary_tag: String,
    pub features: Vec<CellFeature>,
}

/// GET /api/tags/:primary/:secondary/features
///
/// Cross-product feature list for one (primary, secondary) pair, sorted
/// descending by parsed date. An unknown pair is not an error; it simply
/// matches nothing.
pub async fn tag_feature_list(
    State(state): State<AppState>,
    Path((primary, secondary)): Path<(String, String)>,
) -> ApiResult<Json<CellFeaturesResponse>> {
    let view = state.read_view()?;

    let features = tag_features(&view.products, &primary, &secondary)
        .into_iter()
        .map(|hit| CellFeature {
            product: hit.product.to_string(),
            title: hit.feature.title.clone(),
            description: hit.feature.description.clone(),
            time: hit.feature.time.clone(),
            date: hit.date.to_string(),
        })
        .collect();

    Ok(Json(CellFeaturesResponse {
        primary_tag: primary,
        secondary_tag: secondary,
        features,
    }))
}

/// GET /api/products/:name/tags/:primary/:secondary/features
///
/// Single-product variant of the drill-down, used by the product detail
/// view.
pub async fn product_tag_feature_list(
    State(state): State<AppState>,
    Path((name, primary, secondary)): Path<(String, String, String)>,
) -> ApiResult<Json<CellFeaturesResponse>> {
    let view = state.read_view()?;

    let features = view
        .products
        .iter()
        .filter(|product| product.name == name)
        .flat_map(|product| {
            product_tag_features(product, &primary, &secondary)
                .into_iter()
                .map(|feature| CellFeature {
                    product: product.name.clone(),
                    title: feature.title.clone(),
                    description: feature.description.clone(),
                    time: feature.time.clone(),
                    date: cmx_common::dates::parse_feature_date(&feature.time).to_string(),
                })
        })
        .collect();

    Ok(Json(CellFeaturesResponse {
        primary_tag: primary,
        secondary_tag: secondary,
        features,
    }))
}
