//! Document-store handle. Nothing on the chat path reads or writes it yet.

use anyhow::{Context, Result};
use log::info;
use mongodb::{Client, Database};

use crate::config::DocumentStoreConfig;

#[derive(Clone)]
pub struct DocumentStore {
    db: Database,
}

impl DocumentStore {
    /// Parses the URI and returns a handle to the named database.
    /// The driver connects lazily on first use.
    pub async fn connect(config: &DocumentStoreConfig) -> Result<Self> {
        let client = Client::with_uri_str(&config.uri)
            .await
            .with_context(|| format!("invalid document store URI {:?}", config.uri))?;

        info!("Document store database {:?} ready", config.db_name);
        Ok(Self {
            db: client.database(&config.db_name),
        })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}
