//! Application State
//!
//! Shared state accessible by all sync handlers.

use std::sync::Arc;

use super::document::DocumentStore;
use super::error::SyncResult;
use crate::config::ServerConfig;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Synced page storage
    pub documents: Arc<DocumentStore>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create state from the server configuration
    pub fn new(config: ServerConfig) -> SyncResult<Self> {
        let documents = DocumentStore::open(&config.upload_dir, &config.initial_document)?;
        Ok(Self {
            documents: Arc::new(documents),
            config: Arc::new(config),
        })
    }
}
