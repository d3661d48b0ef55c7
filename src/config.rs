//! Relay configuration, read once at startup.

use log::warn;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";
pub const DEFAULT_DIRECT_API_URL: &str = "https://api.gemini.com/v1/model";
pub const DEFAULT_DB_NAME: &str = "chat_db";

/// Which generation backend answers non-greeting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    Direct,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_base: String,
    pub model: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DirectConfig {
    pub api_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DocumentStoreConfig {
    pub uri: String,
    pub db_name: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub provider: ProviderKind,
    pub gemini: GeminiConfig,
    pub direct: DirectConfig,
    /// `None` unless `MONGO_URI` is set.
    pub document_store: Option<DocumentStoreConfig>,
}

impl AppConfig {
    /// Reads configuration from environment variables.
    ///
    /// | Variable          | Default                                            |
    /// |-------------------|----------------------------------------------------|
    /// | `HOST`            | `127.0.0.1`                                        |
    /// | `PORT`            | `5000`                                             |
    /// | `RELAY_PROVIDER`  | `gemini` (or `direct`)                             |
    /// | `GOOGLE_API_KEY`  | unset                                              |
    /// | `GEMINI_MODEL`    | `gemini-pro`                                       |
    /// | `GEMINI_API_BASE` | `https://generativelanguage.googleapis.com/v1beta` |
    /// | `GEMINI_API_URL`  | `https://api.gemini.com/v1/model`                  |
    /// | `GEMINI_API_KEY`  | unset                                              |
    /// | `MONGO_URI`       | unset (document store disabled)                    |
    /// | `DB_NAME`         | `chat_db`                                          |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty strings count as unset.
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                warn!("Ignoring invalid PORT value {:?}, using 5000", raw);
                5000
            }),
            None => 5000,
        };

        let provider = match get("RELAY_PROVIDER").map(|v| v.to_lowercase()).as_deref() {
            None | Some("gemini") => ProviderKind::Gemini,
            Some("direct") => ProviderKind::Direct,
            Some(other) => {
                warn!("Unknown RELAY_PROVIDER {:?}, falling back to gemini", other);
                ProviderKind::Gemini
            }
        };

        let document_store = get("MONGO_URI").map(|uri| DocumentStoreConfig {
            uri,
            db_name: get("DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
        });

        Self {
            host: get("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            provider,
            gemini: GeminiConfig {
                api_base: get("GEMINI_API_BASE")
                    .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                api_key: get("GOOGLE_API_KEY"),
            },
            direct: DirectConfig {
                api_url: get("GEMINI_API_URL")
                    .unwrap_or_else(|| DEFAULT_DIRECT_API_URL.to_string()),
                api_key: get("GEMINI_API_KEY"),
            },
            document_store,
        }
    }
}
