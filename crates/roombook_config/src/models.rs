// --- File: crates/roombook_config/src/models.rs ---

use serde::{Deserialize, Serialize};

/// Marker value that is replaced from the environment after loading.
pub const SECRET_MARKER: &str = "secret_from_env";

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

// --- Microsoft Graph Config ---
// Credentials usually arrive as "secret_from_env" markers and are resolved
// from ROOMBOOK_SECRET_GRAPH_* or the bare TENANT_ID / CLIENT_ID / CLIENT_SECRET.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GraphConfig {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    /// Identity service host, without the tenant segment.
    #[serde(default = "default_authority_host")]
    pub authority_host: String,
    /// Graph API root including the version segment.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_scope")]
    pub scope: String,
    /// Reuse tokens until shortly before they expire. Off by default.
    #[serde(default)]
    pub cache_tokens: bool,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_subject")]
    pub default_subject: String,
    #[serde(default = "default_online_meeting_provider")]
    pub online_meeting_provider: String,
}

fn default_authority_host() -> String {
    "https://login.microsoftonline.com".to_string()
}

fn default_base_url() -> String {
    "https://graph.microsoft.com/v1.0".to_string()
}

fn default_scope() -> String {
    "https://graph.microsoft.com/.default".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_subject() -> String {
    "Room reservation".to_string()
}

fn default_online_meeting_provider() -> String {
    "teamsForBusiness".to_string()
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            tenant_id: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            authority_host: default_authority_host(),
            base_url: default_base_url(),
            scope: default_scope(),
            cache_tokens: false,
            request_timeout_secs: default_request_timeout_secs(),
            default_subject: default_subject(),
            online_meeting_provider: default_online_meeting_provider(),
        }
    }
}

impl GraphConfig {
    /// Returns the names of credential fields that are empty or still unresolved.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        [
            ("graph.tenant_id", &self.tenant_id),
            ("graph.client_id", &self.client_id),
            ("graph.client_secret", &self.client_secret),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty() || value.as_str() == SECRET_MARKER)
        .map(|(name, _)| name)
        .collect()
    }

    /// Fails when any of the client-credentials fields is unusable.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let missing = self.missing_credentials();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(config::ConfigError::Message(format!(
                "Missing Microsoft Entra credentials: {}",
                missing.join(", ")
            )))
        }
    }
}

// --- CORS Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    /// "*" allows any origin.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

// --- Logging Config ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LoggingConfig {
    /// Minimum level for the roombook crates, e.g. "debug". Defaults to info.
    #[serde(default)]
    pub level: Option<String>,
    /// When set, logs are additionally written to a daily rolling file here.
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

// --- Auto-release Config ---
// Meetings that started between `lookback_minutes` and `grace_minutes` ago
// and carry no check-in category are deleted from the room calendar.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AutoReleaseConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_grace_minutes")]
    pub grace_minutes: i64,
    #[serde(default = "default_lookback_minutes")]
    pub lookback_minutes: i64,
    #[serde(default = "default_check_in_category")]
    pub check_in_category: String,
}

fn default_interval_secs() -> u64 {
    60
}

fn default_grace_minutes() -> i64 {
    5
}

fn default_lookback_minutes() -> i64 {
    20
}

fn default_check_in_category() -> String {
    "Checked-In".to_string()
}

impl Default for AutoReleaseConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            grace_minutes: default_grace_minutes(),
            lookback_minutes: default_lookback_minutes(),
            check_in_category: default_check_in_category(),
        }
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server and Graph config are mandatory
    pub server: ServerConfig,
    pub graph: GraphConfig,

    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_auto_release: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub auto_release: Option<AutoReleaseConfig>,
}
