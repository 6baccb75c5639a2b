//! Simple test infrastructure for basic testing
//!
//! Every test gets its own temp directory for orders and the wellness log.

use std::path::{Path, PathBuf};
use std::sync::Once;
use VoiceBuddy::config::{HistoryFormat, Settings};

static INIT: Once = Once::new();

/// Initialize test environment
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// Test context holding a temp directory and settings pointing into it
pub struct SimpleTestContext {
    pub temp_dir: tempfile::TempDir,
    pub settings: Settings,
}

impl SimpleTestContext {
    /// Create a new simple test context with the default history layout
    pub fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Self::with_format(HistoryFormat::JsonArray)
    }

    pub fn with_format(format: HistoryFormat) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        init_test_env();

        let temp_dir = tempfile::tempdir()?;
        let mut settings = Settings::default();
        settings.storage.orders_dir = temp_dir.path().join("orders");
        settings.storage.wellness_log_path = temp_dir.path().join("wellness_log.json");
        settings.storage.history_format = format;
        settings.providers.deepgram_api_key = Some(test_deepgram_key());

        Ok(Self { temp_dir, settings })
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn orders_dir(&self) -> PathBuf {
        self.temp_dir.path().join("orders")
    }

    pub fn wellness_log(&self) -> PathBuf {
        self.temp_dir.path().join("wellness_log.json")
    }
}

pub fn test_deepgram_key() -> String {
    "dg_test_key_0123456789".to_string()
}
