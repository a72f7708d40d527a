use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

const ENV_PREFIX: &str = "INVOICE_EDITOR_";

fn default_log_filter() -> String {
    "info".to_string()
}

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// File that receives tracing output. Logging is off when unset,
    /// since the terminal belongs to the editor.
    #[serde(default)]
    pub log_file: Option<String>,
    /// `tracing_subscriber::EnvFilter` directive
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Config {
    /// Load configuration from `INVOICE_EDITOR_*` environment variables
    pub fn load() -> Result<Self> {
        Self::from_vars(std::env::vars())
    }

    /// Deserialize from an explicit set of variables instead of the process environment
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::prefixed(ENV_PREFIX).from_iter::<_, Config>(vars)?;

        Ok(config)
    }

    /// Command-line values win over the environment
    pub fn with_log_file(mut self, log_file: Option<String>) -> Self {
        if log_file.is_some() {
            self.log_file = log_file;
        }
        self
    }
}

/// Load `.env` if present, then read the configuration
pub fn init() -> Result<Config> {
    dotenv().ok();

    let config = Config::load()?;

    Ok(config)
}
