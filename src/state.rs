use std::sync::Arc;

use crate::auth::sessions::SessionStore;
use crate::config::AppConfig;
use crate::sheets::{GoogleSheets, SheetsClient};

#[cfg(test)]
use crate::sheets::InMemorySheets;

/// Shared application state: the spreadsheet client behind its trait,
/// the process-wide session table, and config.
#[derive(Clone)]
pub struct AppState {
    pub sheets: Arc<dyn SheetsClient>,
    pub sessions: SessionStore,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let sheets = Arc::new(GoogleSheets::new(&config)) as Arc<dyn SheetsClient>;
        Ok(Self {
            sheets,
            sessions: SessionStore::new(),
            config,
        })
    }
}

#[cfg(test)]
impl AppState {
    /// Test state over an empty in-memory sheet.
    pub fn fake() -> Self {
        Self::fake_with(Arc::new(InMemorySheets::default()))
    }

    /// Test state over the given sheets client, for tests that need to
    /// seed rows or flip the store into its unavailable mode.
    pub fn fake_with(sheets: Arc<dyn SheetsClient>) -> Self {
        let config = Arc::new(AppConfig {
            sheets_base_url: "https://sheets.invalid/v4".into(),
            sheet_id: "test-sheet".into(),
            api_token: "test-token".into(),
            allowed_origins: vec![
                "https://app.test".to_string(),
                "http://localhost:3000".to_string(),
            ],
        });
        Self {
            sheets,
            sessions: SessionStore::new(),
            config,
        }
    }
}
