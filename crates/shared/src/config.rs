//! Application configuration management.

use serde::Deserialize;

use crate::types::DashboardId;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Dashboard server configuration.
    pub server: ServerConfig,
    /// Login credentials.
    pub credentials: CredentialsConfig,
    /// Dashboard to pre-filter and the edits to apply.
    pub dashboard: DashboardConfig,
}

/// Dashboard server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Base address of the server, e.g. `http://localhost:8089/`.
    pub base_url: String,
    /// Prefix of shareable dashboard links. Defaults to
    /// `<base_url>/superset/dashboard/` when unset.
    #[serde(default)]
    pub dashboard_view_base: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Login credentials for the database auth provider.
#[derive(Clone, Deserialize)]
pub struct CredentialsConfig {
    /// User name.
    pub username: String,
    /// Password.
    pub password: String,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("username", &self.username)
            .field("password", &"[hidden]")
            .finish()
    }
}

/// Dashboard selection and requested filter edits.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Dashboard id or slug.
    pub id: DashboardId,
    /// Edits applied in order on top of the default filter values.
    #[serde(default)]
    pub edits: Vec<FilterEditConfig>,
}

/// One requested edit, addressed by filter name.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterEditConfig {
    /// Display name of the native filter.
    pub filter: String,
    /// What to set.
    #[serde(flatten)]
    pub edit: EditConfig,
}

/// Raw edit payload as written in configuration.
///
/// Strings are parsed into engine types by the caller so that this crate
/// stays independent of the filter engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditConfig {
    /// Include the listed options.
    Select {
        /// Options to include.
        values: Vec<String>,
    },
    /// Inclusive numeric bounds; either may be omitted.
    NumericRange {
        /// Lower bound.
        #[serde(default)]
        min: Option<f64>,
        /// Upper bound.
        #[serde(default)]
        max: Option<f64>,
    },
    /// Explicit RFC 3339 bounds, end exclusive.
    TimeRange {
        /// Start of the range.
        begin: String,
        /// End of the range.
        end: String,
    },
    /// A named relative range such as `Last week`.
    TimePreset {
        /// Preset label.
        preset: String,
    },
    /// A time grain, as ISO-8601 literal or name.
    TimeGrain {
        /// Grain literal or name.
        grain: String,
    },
    /// A temporal column name.
    TimeColumn {
        /// Column name.
        column: String,
    },
    /// Remove any value from the filter.
    Clear,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones overriding earlier ones: `config/default`,
    /// `config/{RUN_MODE}`, then `FILTERLINK__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FILTERLINK").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Parses configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid configuration.
    pub fn from_toml(document: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(document, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
