//! Static document loading
//!
//! Reads the data root's `info/`, `storage/` and `logs/` trees into a
//! [`LoadedData`] snapshot. The taxonomy document is the only load-fatal
//! resource; every other document degrades per-resource, matching how the
//! views are expected to render partial data.

use std::path::{Path, PathBuf};

use cmx_common::docs::{AdminConfig, Competitor, LogIndex, Summary, UpdateLog};
use cmx_common::model::{Product, StorageRecord, Tag};
use cmx_common::{Error, Result};
use futures::future::join_all;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::state::LoadedData;

/// Handle on the data root directory
#[derive(Debug, Clone)]
pub struct DataRoot {
    root: PathBuf,
}

impl DataRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Load one full snapshot.
    ///
    /// Product documents are fetched concurrently; a failed product is
    /// logged and omitted. Only a missing or malformed taxonomy fails the
    /// whole load.
    pub async fn load(&self) -> Result<LoadedData> {
        let tags: Vec<Tag> = self.read_json(&self.root.join("info").join("tag.json")).await?;

        let competitors: Vec<Competitor> = self
            .read_json_or(&self.root.join("info").join("competitor.json"), Vec::new)
            .await;

        let products = self.load_products(&competitors).await;

        let admin_config: AdminConfig = self
            .read_json_or(
                &self.root.join("info").join("admin_config.json"),
                AdminConfig::default,
            )
            .await;

        let summary: Summary = self
            .read_json_or(&self.root.join("info").join("summary.json"), Summary::default)
            .await;

        let logs = self.load_update_logs().await;

        Ok(LoadedData {
            tags,
            exclude_tags: admin_config.exclude_tags,
            products,
            summary,
            logs,
        })
    }

    /// Fan out over the configured product list
    async fn load_products(&self, competitors: &[Competitor]) -> Vec<Product> {
        let reads = competitors
            .iter()
            .filter(|c| !c.name.is_empty())
            .map(|competitor| async move {
                let path = self
                    .root
                    .join("storage")
                    .join(format!("{}.json", competitor.name));
                match self.read_json::<Vec<StorageRecord>>(&path).await {
                    Ok(records) => Some(Product::from_storage_records(&competitor.name, records)),
                    Err(error) => {
                        warn!(product = %competitor.name, %error, "Skipping product document");
                        None
                    }
                }
            });

        join_all(reads).await.into_iter().flatten().collect()
    }

    /// Read the log index and every entry it references, newest first
    async fn load_update_logs(&self) -> Vec<UpdateLog> {
        let logs_dir = self.root.join("logs");
        let index: LogIndex = self.read_json_or(&logs_dir.join("index.json"), LogIndex::default).await;

        let reads = index.files.iter().map(|file| {
            let path = logs_dir.join(file);
            async move {
                match self.read_json::<UpdateLog>(&path).await {
                    Ok(log) => Some(log),
                    Err(error) => {
                        warn!(file = %path.display(), %error, "Skipping update log");
                        None
                    }
                }
            }
        });

        let mut logs: Vec<UpdateLog> = join_all(reads).await.into_iter().flatten().collect();
        // ISO timestamps sort lexicographically
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        logs
    }

    async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let bytes = tokio::fs::read(path).await.map_err(|error| {
            Error::NotFound(format!("{}: {}", path.display(), error))
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn read_json_or<T: DeserializeOwned>(&self, path: &Path, fallback: impl FnOnce() -> T) -> T {
        match self.read_json(path).await {
            Ok(value) => value,
            Err(error) => {
                warn!(file = %path.display(), %error, "Falling back to empty document");
                fallback()
            }
        }
    }
}
