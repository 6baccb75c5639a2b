//! Wellness history persistence
//!
//! Completed check-ins accumulate in a single log file that is read back at
//! the start of the next session to give the companion some context.
//!
//! Two layouts are supported. [`HistoryFormat::JsonArray`] keeps the whole
//! history in one JSON array and rewrites it on every append through a
//! temporary file and a rename, so an interrupted write leaves the previous
//! file intact. [`HistoryFormat::JsonLines`] appends one record per line and
//! never rewrites earlier records.
//!
//! Corruption policy: an unreadable array file is logged as a warning and
//! read as empty history. The next append moves the corrupt file aside to
//! `<file>.corrupt-<timestamp>` before writing a fresh log. In the line
//! layout only the damaged lines are skipped, and a partial last line left by
//! an interrupted write is closed off before the next record is appended.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use chrono::Utc;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tracing::{debug, warn};

use crate::config::HistoryFormat;
use crate::models::HistoryEntry;
use crate::utils::errors::Result;
use crate::utils::helpers::format_compact_utc;
use crate::utils::logging::log_record_saved;

/// What was found on disk
#[derive(Debug)]
enum Snapshot {
    Missing,
    Loaded(Vec<HistoryEntry>),
    Corrupt(serde_json::Error),
}

/// The wellness log file
#[derive(Debug, Clone)]
pub struct WellnessLog {
    path: PathBuf,
    format: HistoryFormat,
}

impl WellnessLog {
    pub fn new(path: impl Into<PathBuf>, format: HistoryFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> HistoryFormat {
        self.format
    }

    /// All previous check-ins in insertion order
    ///
    /// Never fails: a missing file is empty history, a corrupt or unreadable
    /// one is logged and also read as empty.
    pub async fn load_history(&self) -> Vec<HistoryEntry> {
        match self.snapshot().await {
            Ok(Snapshot::Missing) => Vec::new(),
            Ok(Snapshot::Loaded(entries)) => entries,
            Ok(Snapshot::Corrupt(e)) => {
                warn!(path = %self.path.display(), error = %e, "Wellness log is corrupted, starting fresh");
                Vec::new()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Wellness log could not be read, starting fresh");
                Vec::new()
            }
        }
    }

    /// The most recent check-in, if any
    pub async fn last_entry(&self) -> Option<HistoryEntry> {
        self.load_history().await.pop()
    }

    /// Context paragraph for the next session's instructions
    pub async fn format_context(&self) -> String {
        format_history_context(&self.load_history().await)
    }

    /// Record a completed check-in; returns the number of stored check-ins
    pub async fn append(&self, entry: &HistoryEntry) -> Result<usize> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let count = match self.format {
            HistoryFormat::JsonArray => self.append_array(entry).await?,
            HistoryFormat::JsonLines => self.append_line(entry).await?,
        };

        log_record_saved("checkin", &self.path.display().to_string());
        Ok(count)
    }

    async fn append_array(&self, entry: &HistoryEntry) -> Result<usize> {
        let mut history = match self.snapshot().await? {
            Snapshot::Missing => Vec::new(),
            Snapshot::Loaded(entries) => entries,
            Snapshot::Corrupt(e) => {
                let preserved = self.preserve_corrupt_file().await?;
                warn!(path = %self.path.display(), preserved = %preserved.display(), error = %e,
                      "Corrupt wellness log moved aside before rewrite");
                Vec::new()
            }
        };
        history.push(entry.clone());

        let body = serde_json::to_string_pretty(&history)?;
        let staging = sibling(&self.path, ".tmp");
        fs::write(&staging, body.as_bytes()).await?;
        fs::rename(&staging, &self.path).await?;

        debug!(path = %self.path.display(), entries = history.len(), "Wellness log rewritten");
        Ok(history.len())
    }

    async fn append_line(&self, entry: &HistoryEntry) -> Result<usize> {
        let mut line = String::new();
        if ends_without_newline(&self.path).await? {
            warn!(path = %self.path.display(), "Wellness log ends in a partial line, starting a new one");
            line.push('\n');
        }
        line.push_str(&serde_json::to_string(entry)?);
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        match self.snapshot().await? {
            Snapshot::Loaded(entries) => Ok(entries.len()),
            _ => Ok(0),
        }
    }

    async fn preserve_corrupt_file(&self) -> Result<PathBuf> {
        let target = sibling(&self.path, &format!(".corrupt-{}", format_compact_utc(Utc::now())));
        fs::rename(&self.path, &target).await?;
        Ok(target)
    }

    async fn snapshot(&self) -> Result<Snapshot> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Snapshot::Missing),
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Snapshot::Loaded(Vec::new()));
        }

        Ok(match self.format {
            HistoryFormat::JsonArray => match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
                Ok(entries) => Snapshot::Loaded(entries),
                Err(e) => Snapshot::Corrupt(e),
            },
            HistoryFormat::JsonLines => Snapshot::Loaded(self.parse_lines(&raw)),
        })
    }

    fn parse_lines(&self, raw: &str) -> Vec<HistoryEntry> {
        raw.lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(index, line)| match serde_json::from_str::<HistoryEntry>(line) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(path = %self.path.display(), line = index + 1, error = %e,
                          "Skipping corrupt wellness log line");
                    None
                }
            })
            .collect()
    }
}

/// Whether the file exists, is non-empty and its last byte is not a newline
async fn ends_without_newline(path: &Path) -> Result<bool> {
    let mut file = match fs::File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };
    if file.metadata().await?.len() == 0 {
        return Ok(false);
    }

    file.seek(SeekFrom::End(-1)).await?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last).await?;
    Ok(last[0] != b'\n')
}

/// `<path><suffix>` next to the original file
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Render the previous check-in for the companion's instructions
pub fn format_history_context(history: &[HistoryEntry]) -> String {
    let Some(last) = history.last() else {
        return "This is the user's first check-in.".to_string();
    };

    let mut context = format!("\nPrevious check-in ({}):\n", last.date);
    context.push_str(&format!("- Mood: {}\n", last.mood));
    context.push_str(&format!("- Energy: {}\n", last.energy.as_deref().unwrap_or("N/A")));
    context.push_str(&format!("- Objectives: {}\n", last.objectives.join(", ")));

    if history.len() >= 2 {
        context.push_str(&format!("\nTotal check-ins so far: {}", history.len()));
    }

    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(day: u32, mood: &str) -> HistoryEntry {
        let timestamp = NaiveDate::from_ymd_opt(2025, 11, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        HistoryEntry::at(
            timestamp,
            mood.to_string(),
            Some("medium".to_string()),
            vec!["finish the report".to_string(), "take a walk".to_string()],
            Some("steady day".to_string()),
        )
    }

    #[test]
    fn test_first_checkin_context() {
        assert_eq!(format_history_context(&[]), "This is the user's first check-in.");
    }

    #[test]
    fn test_context_for_single_entry() {
        let context = format_history_context(&[entry(20, "stressed")]);
        assert_eq!(
            context,
            "\nPrevious check-in (2025-11-20):\n- Mood: stressed\n- Energy: medium\n- Objectives: finish the report, take a walk\n"
        );
    }

    #[test]
    fn test_context_counts_multiple_entries() {
        let mut last = entry(21, "good");
        last.energy = None;
        let context = format_history_context(&[entry(20, "tired"), last]);
        assert!(context.contains("(2025-11-21)"));
        assert!(context.contains("- Energy: N/A"));
        assert!(context.ends_with("Total check-ins so far: 2"));
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_history() {
        let temp = tempfile::tempdir().unwrap();
        let log = WellnessLog::new(temp.path().join("wellness_log.json"), HistoryFormat::JsonArray);
        assert!(log.load_history().await.is_empty());
        assert!(log.last_entry().await.is_none());
    }

    #[tokio::test]
    async fn test_array_append_leaves_no_staging_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("wellness_log.json");
        let log = WellnessLog::new(&path, HistoryFormat::JsonArray);

        assert_eq!(log.append(&entry(20, "tired")).await.unwrap(), 1);
        assert_eq!(log.append(&entry(21, "good")).await.unwrap(), 2);

        assert!(!sibling(&path, ".tmp").exists());
        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<HistoryEntry> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_array_is_preserved_on_append() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("wellness_log.json");
        std::fs::write(&path, r#"[{"date":"#).unwrap();
        let log = WellnessLog::new(&path, HistoryFormat::JsonArray);

        assert!(log.load_history().await.is_empty());
        assert_eq!(log.append(&entry(22, "okay")).await.unwrap(), 1);

        let preserved: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".corrupt-"))
            .collect();
        assert_eq!(preserved.len(), 1);
        assert_eq!(std::fs::read_to_string(preserved[0].path()).unwrap(), r#"[{"date":"#);
    }

    #[tokio::test]
    async fn test_json_lines_skip_corrupt_lines() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("wellness_log.jsonl");
        let log = WellnessLog::new(&path, HistoryFormat::JsonLines);

        log.append(&entry(20, "tired")).await.unwrap();
        {
            use std::io::Write;
            let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
            writeln!(file, "{{\"date\": truncated").unwrap();
        }
        assert_eq!(log.append(&entry(21, "good")).await.unwrap(), 2);

        let history = log.load_history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].mood, "tired");
        assert_eq!(history[1].mood, "good");
    }

    #[tokio::test]
    async fn test_json_lines_append_after_torn_write() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("wellness_log.jsonl");
        let log = WellnessLog::new(&path, HistoryFormat::JsonLines);

        log.append(&entry(20, "tired")).await.unwrap();
        {
            use std::io::Write;
            let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
            write!(file, "{{\"date\": \"2025-11-2").unwrap();
        }
        assert!(ends_without_newline(&path).await.unwrap());

        assert_eq!(log.append(&entry(21, "good")).await.unwrap(), 2);

        let moods: Vec<String> = log.load_history().await.into_iter().map(|e| e.mood).collect();
        assert_eq!(moods, vec!["tired", "good"]);
        assert!(!ends_without_newline(&path).await.unwrap());
    }
}
