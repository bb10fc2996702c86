//! Product view endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use cmx_common::dates::parse_feature_date;
use cmx_common::model::Feature;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ProductListEntry {
    pub name: String,
    pub url: String,
    pub feature_count: usize,
    /// Most recent parsed feature date, if any feature exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<String>,
}

/// GET /api/products
pub async fn product_list(State(state): State<AppState>) -> ApiResult<Json<Vec<ProductListEntry>>> {
    let view = state.read_view()?;

    let entries = view
        .products
        .iter()
        .map(|product| {
            let latest = product
                .features
                .iter()
                .map(|f| parse_feature_date(&f.time))
                .max()
                .map(|d| d.to_string());
            ProductListEntry {
                name: product.name.clone(),
                url: product.url.clone(),
                feature_count: product.features.len(),
                latest,
            }
        })
        .collect();

    Ok(Json(entries))
}

#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub name: String,
    pub url: String,
    /// Features sorted descending by parsed date, feed order on ties
    pub features: Vec<Feature>,
}

/// GET /api/products/:name
pub async fn product_detail(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<ProductDetail>> {
    let view = state.read_view()?;

    let product = view
        .products
        .iter()
        .find(|product| product.name == name)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown product: {name}")))?;

    let mut features = product.features.clone();
    features.sort_by(|a, b| parse_feature_date(&b.time).cmp(&parse_feature_date(&a.time)));

    Ok(Json(ProductDetail {
        name: product.name.clone(),
        url: product.url.clone(),
        features,
    }))
}
