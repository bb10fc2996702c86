//! Auxiliary document types
//!
//! Shapes of the static JSON documents surrounding the core dataset: the
//! configured product list, the view exclusion config, the AI summary and
//! the crawl update logs. All fields default so a partial or stale
//! document renders as empty sections instead of failing the load.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One configured product source (`info/competitor.json` entry)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competitor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// View config (`info/admin_config.json`).
///
/// Only the exclusion list is consumed here; the same document carries
/// server-side fields this application never reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default)]
    pub exclude_tags: Vec<String>,
}

/// AI summary document (`info/summary.json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub matrix_overview: String,
    #[serde(default)]
    pub tag_summaries: BTreeMap<String, String>,
}

/// Crawl log index (`logs/index.json`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogIndex {
    #[serde(default)]
    pub files: Vec<String>,
}

/// One crawl update log entry (`logs/update_<timestamp>.json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLog {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default)]
    pub updates: BTreeMap<String, UpdateRecord>,
}

/// Per-product outcome inside an update log entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRecord {
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_features: Option<Vec<NewFeatureBrief>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Title/time pair listed for newly crawled features
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFeatureBrief {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub time: String,
}
