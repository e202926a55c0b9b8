use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use config::{Config, Environment, File};
use miette::{Context, IntoDiagnostic, Result};
use serde::Deserialize;

use crate::{download::DEFAULT_CHUNK_SIZE, outside::ClientConfig};

/// Looked up in the working directory when no config file is given
const DEFAULT_CONFIG_FILE: &str = "sedot";
const ENV_PREFIX: &str = "SEDOT";

/// Servers may serve different markup without a browser-like user agent
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) \
    Chrome/120.0 Safari/537.36";
const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Tunables of the program, read from defaults, a TOML file and `SEDOT_*` variables
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub user_agent: String,
    pub accept_language: String,
    pub html_timeout_secs: u64,
    pub download_timeout_secs: u64,
    pub chunk_size: usize,
}

impl Settings {
    /// Load the settings. An explicitly given file must exist,
    /// while the default `sedot.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_from(path: Option<&Path>, env: Environment) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        Config::builder()
            .set_default("output_dir", "downloads")
            .and_then(|b| b.set_default("user_agent", DEFAULT_USER_AGENT))
            .and_then(|b| b.set_default("accept_language", DEFAULT_ACCEPT_LANGUAGE))
            .and_then(|b| b.set_default("html_timeout_secs", 20_i64))
            .and_then(|b| b.set_default("download_timeout_secs", 60_i64))
            .and_then(|b| b.set_default("chunk_size", DEFAULT_CHUNK_SIZE as i64))
            .into_diagnostic()
            .wrap_err("Could not set default settings")?
            .add_source(file)
            .add_source(env)
            .build()
            .into_diagnostic()
            .wrap_err("Could not read settings")?
            .try_deserialize()
            .into_diagnostic()
            .wrap_err("Invalid settings")
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            user_agent: self.user_agent.clone(),
            accept_language: self.accept_language.clone(),
            html_timeout: Duration::from_secs(self.html_timeout_secs),
            download_timeout: Duration::from_secs(self.download_timeout_secs),
        }
    }
}
