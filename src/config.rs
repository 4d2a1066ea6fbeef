//! Application configuration loaded from environment variables.
//!
//! API keys are read once at startup. A `.env` file is honoured for local
//! development.

use std::env;
use std::time::Duration;

const DEFAULT_YOUTUBE_API_URL: &str = "https://api.scrapecreators.com/v1/youtube/video";
const DEFAULT_INSTAGRAM_API_URL: &str =
    "https://api.scrapecreators.com/v2/instagram/media/transcript";
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Which document store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Firestore,
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Service ---
    /// Server port
    pub port: u16,
    /// Deployment environment name (development, staging, production)
    pub environment: String,
    /// Document store backing users and the link cache
    pub storage_backend: StorageBackend,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,

    // --- Extraction provider ---
    /// ScrapeCreators API key
    pub scrape_creators_api_key: String,
    pub youtube_api_url: String,
    pub instagram_api_url: String,
    /// Outbound request timeout for every external call
    pub request_timeout: Duration,

    // --- Location extraction (optional) ---
    /// Gemini API key. Without it no locations are extracted.
    pub google_api_key: Option<String>,
    pub gemini_model: String,
    /// Google Maps key for geocoding and place details.
    pub google_maps_api_key: Option<String>,

    // --- Read projections ---
    /// Number of locations returned by the processing-status endpoint
    pub recent_locations_window: usize,
}

impl Config {
    /// Config for tests only: in-memory storage and no location extraction.
    pub fn test_default() -> Self {
        Self {
            port: 8000,
            environment: "test".to_string(),
            storage_backend: StorageBackend::Memory,
            gcp_project_id: "test-project".to_string(),
            scrape_creators_api_key: "test_scrape_key".to_string(),
            youtube_api_url: DEFAULT_YOUTUBE_API_URL.to_string(),
            instagram_api_url: DEFAULT_INSTAGRAM_API_URL.to_string(),
            request_timeout: Duration::from_secs(5),
            google_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            google_maps_api_key: None,
            recent_locations_window: 5,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let storage_backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "firestore".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "firestore" => StorageBackend::Firestore,
            "memory" => StorageBackend::Memory,
            other => return Err(ConfigError::Invalid("STORAGE_BACKEND", other.to_string())),
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            storage_backend,
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),

            scrape_creators_api_key: env::var("SCRAPE_CREATORS_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("SCRAPE_CREATORS_API_KEY"))?,
            youtube_api_url: env::var("YOUTUBE_API_URL")
                .unwrap_or_else(|_| DEFAULT_YOUTUBE_API_URL.to_string()),
            instagram_api_url: env::var("INSTAGRAM_API_URL")
                .unwrap_or_else(|_| DEFAULT_INSTAGRAM_API_URL.to_string()),
            request_timeout: Duration::from_secs(
                env::var("REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60),
            ),

            google_api_key: optional_secret("GOOGLE_API_KEY"),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            google_maps_api_key: optional_secret("GOOGLE_MAPS_API_KEY"),

            recent_locations_window: env::var("RECENT_LOCATIONS_WINDOW")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(5),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Read an optional secret, treating blank values as unset.
fn optional_secret(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("SCRAPE_CREATORS_API_KEY", " test_key ");
        env::set_var("GOOGLE_API_KEY", "   ");
        env::set_var("STORAGE_BACKEND", "Memory");
        env::remove_var("PORT");
        env::remove_var("RECENT_LOCATIONS_WINDOW");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.scrape_creators_api_key, "test_key");
        assert_eq!(config.google_api_key, None);
        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.port, 8000);
        assert_eq!(config.recent_locations_window, 5);
        assert_eq!(config.youtube_api_url, DEFAULT_YOUTUBE_API_URL);
    }
}
