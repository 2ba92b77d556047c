/// Runtime configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the values API. Overridable so tests and local
    /// setups can point at something other than Google.
    pub sheets_base_url: String,
    /// Identifier of the backing spreadsheet.
    pub sheet_id: String,
    /// Bearer token for the values API.
    pub api_token: String,
    /// CORS allow-list. The first entry doubles as the canonical
    /// origin returned for unrecognized callers.
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let sheet_id = std::env::var("SHEETS_ID")?;
        let api_token = std::env::var("SHEETS_API_TOKEN")?;
        let sheets_base_url = std::env::var("SHEETS_BASE_URL")
            .unwrap_or_else(|_| "https://sheets.googleapis.com/v4".into());
        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        let allowed_origins = if allowed_origins.is_empty() {
            default_origins()
        } else {
            allowed_origins
        };

        Ok(Self {
            sheets_base_url,
            sheet_id,
            api_token,
            allowed_origins,
        })
    }

    pub fn canonical_origin(&self) -> &str {
        self.allowed_origins
            .first()
            .map(String::as_str)
            .unwrap_or("https://sugartracking.vercel.app")
    }
}

fn default_origins() -> Vec<String> {
    vec![
        "https://sugartracking.vercel.app".to_string(),
        "http://localhost:3000".to_string(),
        "https://localhost:3000".to_string(),
    ]
}
