//! Whole-document persistence.
//!
//! The document is an opaque JSON value: a store loads it whole and replaces
//! it whole, never field by field.

use tracing::debug;

use super::Database;
use crate::error::Result;
use crate::state::AppState;

/// Key the document is stored under.
pub const APP_STATE_KEY: &str = "app_state";

/// Load/save of the single application document.
pub trait StateStore {
    /// The stored document, or `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<AppState>>;

    /// Replace the stored document.
    fn save(&mut self, state: &AppState) -> Result<()>;
}

/// Document stored as one JSON value in the SQLite kv table.
pub struct SqliteStateStore {
    db: Database,
}

impl SqliteStateStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open the store in the default data directory.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened.
    pub fn open() -> Result<Self> {
        Ok(Self::new(Database::open()?))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl StateStore for SqliteStateStore {
    fn load(&self) -> Result<Option<AppState>> {
        match self.db.kv_get(APP_STATE_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => {
                debug!("no stored document");
                Ok(None)
            }
        }
    }

    fn save(&mut self, state: &AppState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        self.db.kv_set(APP_STATE_KEY, &json)?;
        Ok(())
    }
}

/// In-memory store holding the serialized document.
#[derive(Debug, Default, Clone)]
pub struct MemoryStateStore {
    json: Option<String>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The exact serialized document last saved.
    pub fn raw(&self) -> Option<&str> {
        self.json.as_deref()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<Option<AppState>> {
        self.json
            .as_deref()
            .map(serde_json::from_str::<AppState>)
            .transpose()
            .map_err(Into::into)
    }

    fn save(&mut self, state: &AppState) -> Result<()> {
        self.json = Some(serde_json::to_string(state)?);
        Ok(())
    }
}
