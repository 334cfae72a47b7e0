pub mod albums;
pub mod app_config;
pub mod config;
pub mod normalize;
pub mod price;
pub mod profiles;
pub mod records;

pub use albums::{load_reference_albums, parse_reference_albums, ReferenceAlbum};
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use normalize::normalize;
pub use price::parse_price;
pub use profiles::{
    load_site_profiles, validate, ProfileRejection, ProfileSet, RawSiteProfile, RejectionReason,
    SelectorFamily, SelectorSet, SiteProfile,
};
pub use records::{ComparisonRow, Listing, Recommendation, UNKNOWN};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse site profiles YAML: {0}")]
    ProfilesYaml(#[from] serde_yaml::Error),

    #[error("failed to parse CSV in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("unsupported site profile file extension for {path} (expected .yaml, .yml or .csv)")]
    UnsupportedFormat { path: String },

    #[error("reference album list has no {column} column (headers: {headers})")]
    MissingReferenceColumn {
        column: &'static str,
        headers: String,
    },
}
