use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

const BASE_URL_VAR: &str = "ACME_BLOGS_API_URL";
const DEFAULT_USER_VAR: &str = "ACME_BLOGS_DEFAULT_USER";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    /// User shown when the select menu has no usable value.
    pub default_user: u32,
    /// Pause after every request.
    pub request_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_user: 1,
            request_delay_ms: 0,
        }
    }
}

impl Config {
    /// Reads `.env` and the config file (if present), then applies environment overrides.
    ///
    /// An explicitly named file must exist; the default one is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if dotenv::dotenv().is_err() {
            tracing::debug!("no .env file found");
        }

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let file = BufReader::new(File::open(path)?);
        let config: Config = serde_json::from_reader(file)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup(BASE_URL_VAR) {
            self.base_url = url;
        }
        if let Some(user) = lookup(DEFAULT_USER_VAR) {
            self.default_user = user
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{DEFAULT_USER_VAR} must be a user id, got {user:?}")))?;
        }
        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::Config("base_url is empty".to_string()));
        }
        if self.default_user == 0 {
            return Err(Error::Config("default_user must be a non-zero user id".to_string()));
        }
        Ok(())
    }
}
