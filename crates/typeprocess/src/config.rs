//! Configuration management for typeprocess.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::localization::StringTable;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "typeprocess";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `TYPEPROCESS_`)
/// 2. TOML config file at `~/.config/typeprocess/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Target site and list.
    pub site: SiteConfig,
    /// HTTP client configuration.
    pub http: HttpConfig,
    /// Localized string configuration.
    pub strings: StringsConfig,
}

/// Target SharePoint site and list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Absolute URL of the site, e.g. `https://contoso.sharepoint.com/sites/hr`.
    pub web_url: Option<String>,
    /// Server-relative URL of the list, e.g. `/sites/hr/Lists/Requests`.
    pub list_url: Option<String>,
}

/// HTTP client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// User agent sent with every request.
    pub user_agent: String,
    /// OAuth bearer token for the SharePoint resource.
    pub access_token: Option<String>,
    /// Form digest value for write requests.
    pub request_digest: Option<String>,
}

/// Localized string configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringsConfig {
    /// TOML file overriding the built-in message templates.
    pub path: Option<PathBuf>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: format!("typeprocess/{}", env!("CARGO_PKG_VERSION")),
            access_token: None,
            request_digest: None,
        }
    }
}

impl HttpConfig {
    /// Get the request timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `TYPEPROCESS_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("TYPEPROCESS_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.http.timeout_secs == 0 {
            return Err(Error::config_validation(
                "http.timeout_secs must be greater than 0",
            ));
        }

        if let Some(web_url) = &self.site.web_url {
            if !(web_url.starts_with("https://") || web_url.starts_with("http://")) {
                return Err(Error::config_validation(format!(
                    "site.web_url must be an absolute http(s) URL: {web_url}"
                )));
            }
        }

        if let Some(list_url) = &self.site.list_url {
            if !list_url.starts_with('/') {
                return Err(Error::config_validation(format!(
                    "site.list_url must be server-relative (start with '/'): {list_url}"
                )));
            }
        }

        Ok(())
    }

    /// Resolve the site URL, preferring an explicit override.
    ///
    /// # Errors
    ///
    /// Returns an error if neither the override nor the config provides one.
    pub fn web_url(&self, explicit: Option<&str>) -> Result<String> {
        explicit
            .map(str::to_string)
            .or_else(|| self.site.web_url.clone())
            .map(|url| url.trim_end_matches('/').to_string())
            .ok_or(Error::MissingSetting { name: "web_url" })
    }

    /// Resolve the list URL, preferring an explicit override.
    ///
    /// # Errors
    ///
    /// Returns an error if neither the override nor the config provides one.
    pub fn list_url(&self, explicit: Option<&str>) -> Result<String> {
        explicit
            .map(str::to_string)
            .or_else(|| self.site.list_url.clone())
            .ok_or(Error::MissingSetting { name: "list_url" })
    }

    /// Build the string table, applying the configured overrides if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured override file cannot be loaded.
    pub fn string_table(&self) -> Result<StringTable> {
        match &self.strings.path {
            Some(path) => StringTable::load(path),
            None => Ok(StringTable::default()),
        }
    }
}
