use serde::Deserialize;

/// Root application configuration. Loaded from an optional TOML file and
/// environment variables with the prefix `PLAYER_VALUE__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub synthetic: SyntheticConfig,
    #[serde(default)]
    pub flows: FlowConfig,
}

/// Location and column layout of the player value CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_input_path")]
    pub path: String,
    #[serde(default = "default_user_id_column")]
    pub user_id_column: String,
    #[serde(default = "default_value_column")]
    pub value_column: String,
    #[serde(default = "default_month_column")]
    pub month_column: String,
}

/// Parameters for the synthetic generators.
#[derive(Debug, Clone, Deserialize)]
pub struct SyntheticConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_players")]
    pub players: usize,
    #[serde(default = "default_months")]
    pub months: u32,
    #[serde(default = "default_start_month")]
    pub start_month: String,
}

/// Default segment selections for the transition flow, as comma-separated
/// segment names.
#[derive(Debug, Clone, Deserialize)]
pub struct FlowConfig {
    #[serde(default = "default_selection")]
    pub source_segments: String,
    #[serde(default = "default_selection")]
    pub target_segments: String,
}

// Default functions
fn default_input_path() -> String {
    "player_value_simulation.csv".to_string()
}
fn default_user_id_column() -> String {
    "user_id".to_string()
}
fn default_value_column() -> String {
    "player_value".to_string()
}
fn default_month_column() -> String {
    "month".to_string()
}
fn default_seed() -> u64 {
    42
}
fn default_players() -> usize {
    500
}
fn default_months() -> u32 {
    12
}
fn default_start_month() -> String {
    "2024-01".to_string()
}
fn default_selection() -> String {
    "low,medium,high,pvip,vip,svip".to_string()
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
            user_id_column: default_user_id_column(),
            value_column: default_value_column(),
            month_column: default_month_column(),
        }
    }
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            players: default_players(),
            months: default_months(),
            start_month: default_start_month(),
        }
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            source_segments: default_selection(),
            target_segments: default_selection(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            synthetic: SyntheticConfig::default(),
            flows: FlowConfig::default(),
        }
    }
}

const DEFAULT_CONFIG_FILE: &str = "player-value.toml";

impl AppConfig {
    /// Load configuration from the file named by `PLAYER_VALUE_CONFIG`
    /// (which must exist) or else from `player-value.toml` if present, then
    /// environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        match std::env::var("PLAYER_VALUE_CONFIG") {
            Ok(file) => Self::load_from(&file),
            Err(_) => Self::build(DEFAULT_CONFIG_FILE, false),
        }
    }

    /// Load configuration from an explicitly named TOML file layered under
    /// the environment. A missing file is an error.
    pub fn load_from(file: &str) -> Result<Self, config::ConfigError> {
        Self::build(file, true)
    }

    fn build(file: &str, required: bool) -> Result<Self, config::ConfigError> {
        tracing::debug!(file, required, "Loading configuration");
        let builder = config::Config::builder()
            .add_source(
                config::File::with_name(file)
                    .format(config::FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                config::Environment::with_prefix("PLAYER_VALUE")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
