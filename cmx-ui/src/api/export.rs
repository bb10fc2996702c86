//! Matrix CSV export
//!
//! The matrix as a downloadable CSV: one row per flattened tag pair, one
//! column per product, cell values are match counts (blank when absent).

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use cmx_common::matrix::{flatten_tags, product_tag_features};
use cmx_common::model::{Product, Tag};

use crate::error::ApiResult;
use crate::AppState;

/// GET /api/export/matrix.csv
pub async fn export_matrix_csv(State(state): State<AppState>) -> ApiResult<Response> {
    let view = state.read_view()?;
    let visible: Vec<Tag> = view.visible_tags().into_iter().cloned().collect();
    let csv = render_matrix_csv(&visible, &view.products);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"matrix.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

fn render_matrix_csv(tags: &[Tag], products: &[Product]) -> String {
    let mut out = String::new();

    out.push_str("Primary Tag,Secondary Tag");
    for product in products {
        out.push(',');
        out.push_str(&escape_csv(&product.name));
    }
    out.push('\n');

    for row in flatten_tags(tags) {
        out.push_str(&escape_csv(&row.primary_tag));
        out.push(',');
        out.push_str(&escape_csv(&row.secondary_tag));
        for product in products {
            out.push(',');
            let count = product_tag_features(product, &row.primary_tag, &row.secondary_tag).len();
            if count > 0 {
                out.push_str(&count.to_string());
            }
        }
        out.push('\n');
    }

    out
}

/// Quote a field when it contains a delimiter, quote or newline
fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmx_common::model::{Feature, FeatureSubtag, FeatureTag, Subtag};

    #[test]
    fn escape_passes_plain_fields_through() {
        assert_eq!(escape_csv("AI Model"), "AI Model");
    }

    #[test]
    fn escape_quotes_delimiters_and_quotes() {
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn matrix_csv_has_header_and_counts() {
        let tags = vec![Tag {
            name: "UI".to_string(),
            description: None,
            subtags: vec![Subtag {
                name: "Forms".to_string(),
                description: None,
            }],
        }];
        let products = vec![Product {
            name: "alpha".to_string(),
            url: String::new(),
            features: vec![Feature {
                title: "f".to_string(),
                description: String::new(),
                time: String::new(),
                tags: vec![FeatureTag {
                    name: "UI".to_string(),
                    subtags: vec![FeatureSubtag {
                        name: "Forms".to_string(),
                    }],
                }],
            }],
        }];

        let csv = render_matrix_csv(&tags, &products);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Primary Tag,Secondary Tag,alpha");
        assert_eq!(lines[1], "UI,Forms,1");
    }
}
