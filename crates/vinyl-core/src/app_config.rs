use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide settings, resolved once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// YAML or CSV file holding the store site profiles.
    pub sites_path: PathBuf,
    /// CSV file holding the reference album list.
    pub reference_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Freshness window for cached site scrapes.
    pub cache_ttl_secs: u64,
    pub max_concurrent_sites: usize,
}
