//! Order persistence
//!
//! Each confirmed order is written once to its own pretty-printed JSON file
//! named after the customer and the UTC time of saving.

use std::path::{Path, PathBuf};
use chrono::{DateTime, Utc};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error};

use crate::models::OrderState;
use crate::utils::errors::Result;
use crate::utils::helpers::{format_compact_utc, sanitize_filename};
use crate::utils::logging::log_record_saved;

const FALLBACK_NAME: &str = "guest";

/// Directory of saved orders
#[derive(Debug, Clone)]
pub struct OrderStore {
    dir: PathBuf,
}

impl OrderStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for an order saved at `at`: `order_<name>_<YYYYMMDDTHHMMSSZ>.json`
    pub fn file_name(order: &OrderState, at: DateTime<Utc>) -> String {
        let name = order
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(sanitize_filename)
            .unwrap_or_else(|| FALLBACK_NAME.to_string());

        format!("order_{}_{}.json", name, format_compact_utc(at))
    }

    /// Save an order stamped with the current time
    pub async fn save(&self, order: &OrderState) -> Result<PathBuf> {
        self.save_at(order, Utc::now()).await
    }

    /// Save an order under the name derived from `at`
    ///
    /// The file is created exclusively: an existing order with the same name
    /// is never overwritten, the save fails instead.
    pub async fn save_at(&self, order: &OrderState, at: DateTime<Utc>) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(Self::file_name(order, at));
        let body = serde_json::to_string_pretty(order)?;
        debug!(path = %path.display(), bytes = body.len(), "Writing order file");

        let mut file = match fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(file) => file,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to create order file");
                return Err(e.into());
            }
        };
        file.write_all(body.as_bytes()).await?;
        file.flush().await?;

        log_record_saved("order", &path.display().to_string());
        Ok(path)
    }

    /// Read a saved order back
    pub async fn load(path: impl AsRef<Path>) -> Result<OrderState> {
        let raw = fs::read_to_string(path.as_ref()).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Saved order files, oldest name first
    pub async fn list(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(paths),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_order = path
                .file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| n.starts_with("order_") && n.ends_with(".json"));
            if is_order {
                paths.push(path);
            }
        }

        paths.sort();
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_order() -> OrderState {
        OrderState {
            drink_type: Some("latte".to_string()),
            size: Some("grande".to_string()),
            milk: Some("oat".to_string()),
            extras: vec!["vanilla syrup".to_string()],
            name: Some("Alex".to_string()),
        }
    }

    #[test]
    fn test_file_name() {
        let at = Utc.with_ymd_and_hms(2025, 11, 23, 14, 2, 9).unwrap();
        assert_eq!(OrderStore::file_name(&sample_order(), at), "order_Alex_20251123T140209Z.json");

        let anonymous = OrderState::default();
        assert_eq!(OrderStore::file_name(&anonymous, at), "order_guest_20251123T140209Z.json");
    }

    #[tokio::test]
    async fn test_save_creates_directory_and_round_trips() {
        let temp = tempfile::tempdir().unwrap();
        let store = OrderStore::new(temp.path().join("orders"));

        let path = store.save(&sample_order()).await.unwrap();
        assert!(path.starts_with(temp.path().join("orders")));

        let loaded = OrderStore::load(&path).await.unwrap();
        assert_eq!(loaded, sample_order());
        assert_eq!(store.list().await.unwrap(), vec![path]);
    }

    #[tokio::test]
    async fn test_save_never_overwrites() {
        let temp = tempfile::tempdir().unwrap();
        let store = OrderStore::new(temp.path());
        let at = Utc.with_ymd_and_hms(2025, 11, 23, 14, 2, 9).unwrap();

        let first = store.save_at(&sample_order(), at).await.unwrap();
        let mut changed = sample_order();
        changed.size = Some("tall".to_string());
        assert!(store.save_at(&changed, at).await.is_err());

        assert_eq!(OrderStore::load(&first).await.unwrap(), sample_order());
    }

    #[tokio::test]
    async fn test_list_missing_directory_is_empty() {
        let temp = tempfile::tempdir().unwrap();
        let store = OrderStore::new(temp.path().join("nope"));
        assert!(store.list().await.unwrap().is_empty());
    }
}
