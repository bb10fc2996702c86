//! Domain model for the changelog dataset
//!
//! Two distinct tag shapes exist on purpose: the taxonomy (`Tag`/`Subtag`,
//! with descriptions) and the assignment carried by a feature
//! (`FeatureTag`/`FeatureSubtag`, names only). Feature tag names are free
//! text and may reference taxonomy entries that no longer exist; nothing
//! here assumes otherwise.

use serde::{Deserialize, Deserializer, Serialize};

/// Reserved subtag name.
///
/// Synthesized in flattened/matrix views for a primary tag with no subtag
/// breakdown. Never persisted by this application, but admin curation may
/// create literal subtags under an "Others" bucket on the remote side.
pub const OTHER_SUBTAG: &str = "Other";

/// Taxonomy primary tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub subtags: Vec<Subtag>,
}

/// Taxonomy secondary tag, unique within its parent's subtag list only.
/// The same subtag name may appear under multiple primary tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subtag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Flattened (primary, secondary) taxonomy row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagRow {
    pub primary_tag: String,
    pub secondary_tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_description: Option<String>,
}

/// One changelog entry for a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Free-text date string, see [`crate::dates::parse_feature_date`]
    #[serde(default)]
    pub time: String,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<FeatureTag>,
}

/// Tag assignment carried by a feature (no descriptions)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureTag {
    pub name: String,
    #[serde(default)]
    pub subtags: Vec<FeatureSubtag>,
}

/// Subtag reference inside a feature's tag assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSubtag {
    pub name: String,
}

/// One configured product source with its normalized feature list
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Unique key used for routing and lookups
    pub name: String,
    pub url: String,
    pub features: Vec<Feature>,
}

/// Raw record inside a `storage/<product>.json` document.
///
/// The document is an array holding one app-info record (`name`, `url`)
/// and one record named `"feature"` carrying the feature list.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub features: Option<Vec<Feature>>,
}

impl Product {
    /// Normalize raw storage records into a product.
    ///
    /// The app-info record is the first one not named `"feature"`; the
    /// feature list comes from the first record named `"feature"`. Missing
    /// records degrade to the configured key and an empty feature list.
    pub fn from_storage_records(key: &str, records: Vec<StorageRecord>) -> Product {
        let mut name = None;
        let mut url = None;
        let mut features = None;

        for record in records {
            if record.name == "feature" {
                if features.is_none() {
                    features = record.features;
                }
            } else if name.is_none() {
                if !record.name.is_empty() {
                    name = Some(record.name);
                }
                url = record.url;
            }
        }

        Product {
            name: name.unwrap_or_else(|| key.to_string()),
            url: url.unwrap_or_default(),
            features: features.unwrap_or_default(),
        }
    }
}

/// Tolerant `tags` deserializer.
///
/// Raw data carries malformed values here: the string `"None"`, `null`, or
/// other non-array shapes. All of them deserialize to an empty list, and a
/// malformed element inside an otherwise valid array is dropped rather than
/// failing the whole feature.
fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<FeatureTag>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_tags_none_string_coerces_to_empty() {
        let feature: Feature =
            serde_json::from_str(r#"{"title":"t","description":"d","time":"","tags":"None"}"#)
                .unwrap();
        assert!(feature.tags.is_empty());
    }

    #[test]
    fn feature_tags_missing_coerces_to_empty() {
        let feature: Feature = serde_json::from_str(r#"{"title":"t"}"#).unwrap();
        assert!(feature.tags.is_empty());
        assert_eq!(feature.description, "");
        assert_eq!(feature.time, "");
    }

    #[test]
    fn feature_tags_non_array_coerces_to_empty() {
        let feature: Feature =
            serde_json::from_str(r#"{"title":"t","tags":{"name":"UI"}}"#).unwrap();
        assert!(feature.tags.is_empty());
    }

    #[test]
    fn feature_tags_malformed_element_is_dropped() {
        let feature: Feature = serde_json::from_str(
            r#"{"title":"t","tags":[{"name":"UI","subtags":[{"name":"Forms"}]},42]}"#,
        )
        .unwrap();
        assert_eq!(feature.tags.len(), 1);
        assert_eq!(feature.tags[0].name, "UI");
        assert_eq!(feature.tags[0].subtags[0].name, "Forms");
    }

    #[test]
    fn storage_records_split_app_info_and_features() {
        let records: Vec<StorageRecord> = serde_json::from_str(
            r#"[
                {"name": "v0", "url": "https://v0.dev"},
                {"name": "feature", "features": [{"title": "a"}]}
            ]"#,
        )
        .unwrap();
        let product = Product::from_storage_records("v0", records);
        assert_eq!(product.name, "v0");
        assert_eq!(product.url, "https://v0.dev");
        assert_eq!(product.features.len(), 1);
    }

    #[test]
    fn storage_records_missing_feature_record_degrades_to_empty() {
        let records: Vec<StorageRecord> =
            serde_json::from_str(r#"[{"name": "bolt", "url": "https://bolt.new"}]"#).unwrap();
        let product = Product::from_storage_records("bolt", records);
        assert_eq!(product.name, "bolt");
        assert!(product.features.is_empty());
    }

    #[test]
    fn storage_records_empty_document_uses_configured_key() {
        let product = Product::from_storage_records("replit", Vec::new());
        assert_eq!(product.name, "replit");
        assert_eq!(product.url, "");
        assert!(product.features.is_empty());
    }
}
