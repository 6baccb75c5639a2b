//! Services module
//!
//! This module contains the services a session relies on besides its state:
//! frontend broadcast, usage metrics and LiveKit connection details.

pub mod broadcast;
pub mod token;
pub mod usage;

// Re-export commonly used services
pub use broadcast::{BroadcastPublisher, DataChannel, PublisherStats};
pub use token::{ConnectionDetails, TokenIssuer};
pub use usage::{PipelineMetrics, UsageCollector, UsageSummary};

use crate::config::settings::Settings;
use crate::storage::{OrderStore, WellnessLog};

/// Service factory for the file-backed stores shared by all sessions
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub orders: OrderStore,
    pub wellness: WellnessLog,
    pub broadcast_capacity: usize,
}

impl ServiceFactory {
    /// Create a new ServiceFactory from settings
    pub fn new(settings: &Settings) -> Self {
        Self {
            orders: OrderStore::new(settings.storage.orders_dir.clone()),
            wellness: WellnessLog::new(
                settings.storage.wellness_log_path.clone(),
                settings.storage.history_format,
            ),
            broadcast_capacity: settings.broadcast.queue_capacity,
        }
    }

    /// Token issuer, available only when LiveKit credentials are configured
    pub fn token_issuer(settings: &Settings) -> crate::Result<TokenIssuer> {
        TokenIssuer::from_config(&settings.livekit)
    }
}
