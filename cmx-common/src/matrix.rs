//! Tag matrix model
//!
//! Pure, synchronous queries over the taxonomy and product feed data.
//! Everything here is total over malformed input: missing or garbage
//! collections count as empty, and no function returns an error. The admin
//! curation views rely on rendering partial data without crashing.

use chrono::NaiveDate;

use crate::dates::parse_feature_date;
use crate::model::{Feature, Product, Tag, TagRow, OTHER_SUBTAG};

/// A feature matched during a cross-product tag search
#[derive(Debug, Clone)]
pub struct TagHit<'a> {
    /// Owning product name
    pub product: &'a str,
    pub feature: &'a Feature,
    /// Parsed feature date used for ordering
    pub date: NaiveDate,
}

/// Flatten the taxonomy tree into (primary, secondary) rows.
///
/// A tag with no subtags emits a single row with the synthetic
/// [`OTHER_SUBTAG`] secondary, duplicating the parent's description.
/// Otherwise one row per subtag. Input tag and subtag order is preserved
/// and no de-duplication is performed; a malformed taxonomy that repeats a
/// pair yields the pair twice.
pub fn flatten_tags(tags: &[Tag]) -> Vec<TagRow> {
    let mut rows = Vec::new();

    for tag in tags {
        if tag.subtags.is_empty() {
            rows.push(TagRow {
                primary_tag: tag.name.clone(),
                secondary_tag: OTHER_SUBTAG.to_string(),
                primary_description: tag.description.clone(),
                secondary_description: tag.description.clone(),
            });
        } else {
            for subtag in &tag.subtags {
                rows.push(TagRow {
                    primary_tag: tag.name.clone(),
                    secondary_tag: subtag.name.clone(),
                    primary_description: tag.description.clone(),
                    secondary_description: subtag.description.clone(),
                });
            }
        }
    }

    rows
}

/// Does any feature of `product` carry the (primary, secondary) pair?
///
/// `secondary == "Other"` matches a feature tag named `primary` with an
/// empty subtag list; any other secondary matches by subtag name.
pub fn product_has_tag(product: &Product, primary: &str, secondary: &str) -> bool {
    product
        .features
        .iter()
        .any(|feature| feature_matches(feature, primary, secondary))
}

/// Features of one product carrying the (primary, secondary) pair,
/// in feed order.
pub fn product_tag_features<'a>(
    product: &'a Product,
    primary: &str,
    secondary: &str,
) -> Vec<&'a Feature> {
    product
        .features
        .iter()
        .filter(|feature| feature_matches(feature, primary, secondary))
        .collect()
}

/// Cross-product search for the (primary, secondary) pair.
///
/// Matches are sorted descending by parsed date. The sort is stable, so
/// ties (equal dates, and all unparsable dates which share the epoch
/// sentinel) keep iteration order: products in input order, each product's
/// features in feed order. Unparsable dates therefore sink to the end.
pub fn tag_features<'a>(
    products: &'a [Product],
    primary: &str,
    secondary: &str,
) -> Vec<TagHit<'a>> {
    let mut hits: Vec<TagHit<'a>> = Vec::new();

    for product in products {
        for feature in &product.features {
            if feature_matches(feature, primary, secondary) {
                hits.push(TagHit {
                    product: &product.name,
                    feature,
                    date: parse_feature_date(&feature.time),
                });
            }
        }
    }

    hits.sort_by(|a, b| b.date.cmp(&a.date));
    hits
}

/// Primary tag names in taxonomy order
pub fn primary_tags(tags: &[Tag]) -> Vec<&str> {
    tags.iter().map(|tag| tag.name.as_str()).collect()
}

/// Subtag names of one primary tag.
///
/// Returns `["Other"]` when the tag exists with no subtags, and an empty
/// list when the primary tag is absent from the taxonomy.
pub fn subtags<'a>(tags: &'a [Tag], primary: &str) -> Vec<&'a str> {
    match tags.iter().find(|tag| tag.name == primary) {
        Some(tag) if tag.subtags.is_empty() => vec![OTHER_SUBTAG],
        Some(tag) => tag.subtags.iter().map(|s| s.name.as_str()).collect(),
        None => Vec::new(),
    }
}

fn feature_matches(feature: &Feature, primary: &str, secondary: &str) -> bool {
    feature.tags.iter().any(|tag| {
        if tag.name != primary {
            return false;
        }
        if secondary == OTHER_SUBTAG {
            tag.subtags.is_empty()
        } else {
            tag.subtags.iter().any(|sub| sub.name == secondary)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FeatureSubtag, FeatureTag, Subtag};

    fn tag(name: &str, subtags: &[&str]) -> Tag {
        Tag {
            name: name.to_string(),
            description: None,
            subtags: subtags
                .iter()
                .map(|s| Subtag {
                    name: s.to_string(),
                    description: None,
                })
                .collect(),
        }
    }

    fn feature(title: &str, time: &str, tags: &[(&str, &[&str])]) -> Feature {
        Feature {
            title: title.to_string(),
            description: String::new(),
            time: time.to_string(),
            tags: tags
                .iter()
                .map(|(name, subs)| FeatureTag {
                    name: name.to_string(),
                    subtags: subs
                        .iter()
                        .map(|s| FeatureSubtag {
                            name: s.to_string(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    fn product(name: &str, features: Vec<Feature>) -> Product {
        Product {
            name: name.to_string(),
            url: String::new(),
            features,
        }
    }

    #[test]
    fn flatten_emits_one_row_per_subtag() {
        let tags = vec![tag("UI", &["Forms", "Tables"]), tag("Infra", &[])];
        let rows = flatten_tags(&tags);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].primary_tag, "UI");
        assert_eq!(rows[0].secondary_tag, "Forms");
        assert_eq!(rows[1].secondary_tag, "Tables");
        assert_eq!(rows[2].primary_tag, "Infra");
        assert_eq!(rows[2].secondary_tag, OTHER_SUBTAG);
    }

    #[test]
    fn flatten_other_row_duplicates_parent_description() {
        let tags = vec![Tag {
            name: "Infra".to_string(),
            description: Some("infrastructure".to_string()),
            subtags: Vec::new(),
        }];
        let rows = flatten_tags(&tags);
        assert_eq!(rows[0].primary_description.as_deref(), Some("infrastructure"));
        assert_eq!(
            rows[0].secondary_description.as_deref(),
            Some("infrastructure")
        );
    }

    #[test]
    fn flatten_does_not_deduplicate() {
        let tags = vec![tag("UI", &["Forms", "Forms"])];
        assert_eq!(flatten_tags(&tags).len(), 2);
    }

    #[test]
    fn has_tag_by_subtag_name() {
        let p = product("v0", vec![feature("f", "", &[("UI", &["Forms"])])]);
        assert!(product_has_tag(&p, "UI", "Forms"));
        assert!(!product_has_tag(&p, "UI", "Tables"));
        assert!(!product_has_tag(&p, "Infra", "Forms"));
    }

    #[test]
    fn has_tag_other_requires_empty_subtags() {
        let p = product(
            "v0",
            vec![
                feature("bare", "", &[("Infra", &[])]),
                feature("subbed", "", &[("UI", &["Forms"])]),
            ],
        );
        assert!(product_has_tag(&p, "Infra", OTHER_SUBTAG));
        assert!(!product_has_tag(&p, "UI", OTHER_SUBTAG));
    }

    #[test]
    fn product_tag_features_keeps_feed_order() {
        let p = product(
            "v0",
            vec![
                feature("first", "", &[("UI", &["Forms"])]),
                feature("skip", "", &[("UI", &["Tables"])]),
                feature("second", "", &[("UI", &["Forms"])]),
            ],
        );
        let matched = product_tag_features(&p, "UI", "Forms");
        let titles: Vec<_> = matched.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[test]
    fn tag_features_sorts_descending_with_unparsable_last() {
        let products = vec![
            product(
                "a",
                vec![
                    feature("old", "2023-01-01", &[("UI", &["Forms"])]),
                    feature("mystery", "soon", &[("UI", &["Forms"])]),
                ],
            ),
            product("b", vec![feature("new", "2024-06-01", &[("UI", &["Forms"])])]),
        ];
        let hits = tag_features(&products, "UI", "Forms");
        let titles: Vec<_> = hits.iter().map(|h| h.feature.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "old", "mystery"]);
    }

    #[test]
    fn tag_features_ties_keep_iteration_order() {
        let products = vec![
            product("a", vec![feature("a1", "2024-01-01", &[("UI", &["Forms"])])]),
            product("b", vec![feature("b1", "2024-01-01", &[("UI", &["Forms"])])]),
        ];
        let hits = tag_features(&products, "UI", "Forms");
        assert_eq!(hits[0].product, "a");
        assert_eq!(hits[1].product, "b");
    }

    #[test]
    fn subtags_lookup() {
        let tags = vec![tag("UI", &["Forms"]), tag("Infra", &[])];
        assert_eq!(subtags(&tags, "UI"), vec!["Forms"]);
        assert_eq!(subtags(&tags, "Infra"), vec![OTHER_SUBTAG]);
        assert!(subtags(&tags, "Missing").is_empty());
    }

    #[test]
    fn primary_tags_in_input_order() {
        let tags = vec![tag("B", &[]), tag("A", &[])];
        assert_eq!(primary_tags(&tags), vec!["B", "A"]);
    }
}
