//! Matrix model behavior tests
//!
//! Exercises the flattening, membership and ordering guarantees the view
//! layer depends on, including the lossy date fallback and tolerance of
//! malformed feed data.

use cmx_common::dates::{epoch, parse_feature_date};
use cmx_common::matrix::{flatten_tags, product_has_tag, subtags, tag_features};
use cmx_common::model::{Product, Tag, OTHER_SUBTAG};

fn taxonomy(json: &str) -> Vec<Tag> {
    serde_json::from_str(json).unwrap()
}

fn product(json: &str) -> Product {
    let records = serde_json::from_str(json).unwrap();
    Product::from_storage_records("test", records)
}

#[test]
fn flatten_row_count_is_sum_of_max_one_and_subtag_count() {
    let tags = taxonomy(
        r#"[
            {"name": "AI Model", "subtags": [{"name": "OpenAI"}, {"name": "Anthropic"}, {"name": "Gemini"}]},
            {"name": "Pricing", "subtags": []},
            {"name": "Agent", "subtags": [{"name": "Agent Mode"}]}
        ]"#,
    );
    let rows = flatten_tags(&tags);
    assert_eq!(rows.len(), 3 + 1 + 1);

    // Input order preserved: tags first, subtags within each tag
    let pairs: Vec<(&str, &str)> = rows
        .iter()
        .map(|r| (r.primary_tag.as_str(), r.secondary_tag.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("AI Model", "OpenAI"),
            ("AI Model", "Anthropic"),
            ("AI Model", "Gemini"),
            ("Pricing", OTHER_SUBTAG),
            ("Agent", "Agent Mode"),
        ]
    );
}

#[test]
fn subtagless_tag_gets_other_row_with_parent_description() {
    let tags = taxonomy(r#"[{"name": "Pricing", "description": "plans and billing", "subtags": []}]"#);
    let rows = flatten_tags(&tags);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].secondary_tag, OTHER_SUBTAG);
    assert_eq!(rows[0].primary_description.as_deref(), Some("plans and billing"));
    assert_eq!(rows[0].secondary_description.as_deref(), Some("plans and billing"));
}

#[test]
fn matrix_cell_presence_end_to_end() {
    let tags = taxonomy(r#"[{"name": "UI", "subtags": [{"name": "Forms"}]}]"#);
    let tagged = product(
        r#"[
            {"name": "alpha", "url": "https://alpha.dev"},
            {"name": "feature", "features": [
                {"title": "form builder", "time": "2024-05-01",
                 "tags": [{"name": "UI", "subtags": [{"name": "Forms"}]}]}
            ]}
        ]"#,
    );
    let untagged = product(
        r#"[
            {"name": "beta", "url": "https://beta.dev"},
            {"name": "feature", "features": [
                {"title": "unrelated", "time": "2024-05-02", "tags": []}
            ]}
        ]"#,
    );

    let rows = flatten_tags(&tags);
    assert_eq!(rows.len(), 1);
    assert!(product_has_tag(&tagged, "UI", "Forms"));
    assert!(!product_has_tag(&untagged, "UI", "Forms"));
}

#[test]
fn matrix_other_cell_end_to_end() {
    let tags = taxonomy(r#"[{"name": "Infra", "subtags": []}]"#);
    let p = product(
        r#"[
            {"name": "gamma", "url": ""},
            {"name": "feature", "features": [
                {"title": "region expansion", "time": "2024-04-01",
                 "tags": [{"name": "Infra", "subtags": []}]}
            ]}
        ]"#,
    );

    let rows = flatten_tags(&tags);
    assert_eq!(rows[0].secondary_tag, OTHER_SUBTAG);
    assert!(product_has_tag(&p, "Infra", OTHER_SUBTAG));
}

#[test]
fn orphan_feature_tags_do_not_disturb_queries() {
    // Feature tags are free text and may name taxonomy entries that do not
    // exist; queries against the real taxonomy still work
    let p = product(
        r#"[
            {"name": "delta", "url": ""},
            {"name": "feature", "features": [
                {"title": "mystery", "time": "2024-01-01",
                 "tags": [{"name": "Ghost Category", "subtags": [{"name": "Phantom"}]}]}
            ]}
        ]"#,
    );
    assert!(product_has_tag(&p, "Ghost Category", "Phantom"));
    assert!(!product_has_tag(&p, "UI", "Forms"));
}

#[test]
fn malformed_tags_never_panic_and_count_as_empty() {
    let p = product(
        r#"[
            {"name": "epsilon", "url": ""},
            {"name": "feature", "features": [
                {"title": "a", "time": "2024-01-01", "tags": "None"},
                {"title": "b", "time": "2024-01-02"},
                {"title": "c", "time": "2024-01-03", "tags": 17}
            ]}
        ]"#,
    );
    assert_eq!(p.features.len(), 3);
    assert!(!product_has_tag(&p, "UI", "Forms"));
    assert!(!product_has_tag(&p, "UI", OTHER_SUBTAG));
    assert!(tag_features(std::slice::from_ref(&p), "UI", "Forms").is_empty());
}

#[test]
fn cross_product_features_sorted_by_recency() {
    let products = vec![
        product(
            r#"[
                {"name": "a", "url": ""},
                {"name": "feature", "features": [
                    {"title": "iso-with-suffix", "time": "2024-03-05 (beta)",
                     "tags": [{"name": "UI", "subtags": [{"name": "Forms"}]}]},
                    {"title": "undated", "time": "coming soon",
                     "tags": [{"name": "UI", "subtags": [{"name": "Forms"}]}]}
                ]}
            ]"#,
        ),
        product(
            r#"[
                {"name": "b", "url": ""},
                {"name": "feature", "features": [
                    {"title": "slash-date", "time": "6/1/2024",
                     "tags": [{"name": "UI", "subtags": [{"name": "Forms"}]}]}
                ]}
            ]"#,
        ),
    ];

    let hits = tag_features(&products, "UI", "Forms");
    let titles: Vec<_> = hits.iter().map(|h| h.feature.title.as_str()).collect();
    assert_eq!(titles, vec!["slash-date", "iso-with-suffix", "undated"]);
    assert_eq!(hits[2].date, epoch());
}

#[test]
fn date_parsing_matches_documented_formats() {
    assert_eq!(
        parse_feature_date("2024-03-05 some text"),
        parse_feature_date("3/5/2024")
    );
    assert_eq!(parse_feature_date("not a date"), epoch());
}

#[test]
fn subtags_contract() {
    let tags = taxonomy(
        r#"[
            {"name": "UI", "subtags": [{"name": "Forms"}, {"name": "Tables"}]},
            {"name": "Pricing", "subtags": []}
        ]"#,
    );
    assert_eq!(subtags(&tags, "UI"), vec!["Forms", "Tables"]);
    assert_eq!(subtags(&tags, "Pricing"), vec![OTHER_SUBTAG]);
    assert!(subtags(&tags, "Nope").is_empty());
}
