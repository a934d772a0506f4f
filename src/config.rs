use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{HookError, Result};

/// Environment variable read when no username is given on the command line
pub const ENV_USER: &str = "BITBUCKET_USER_ID";

/// Environment variable read when no token is given on the command line
pub const ENV_TOKEN: &str = "BITBUCKET_ACCESS_TOKEN";

/// Connection settings as read from a config file, before validation.
///
/// Every field is optional in the file; missing values fall back to defaults
/// and can be overridden from the environment or the command line.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_true")]
    pub validate_certs: bool,

    #[serde(default = "default_true")]
    pub use_proxy: bool,

    #[serde(default = "default_retries")]
    pub retries: u32,

    #[serde(default = "default_sleep")]
    pub sleep: u64,
}

fn default_true() -> bool {
    true
}

fn default_retries() -> u32 {
    3
}

fn default_sleep() -> u64 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Config {
            url: String::new(),
            username: None,
            password: None,
            token: None,
            validate_certs: true,
            use_proxy: true,
            retries: default_retries(),
            sleep: default_sleep(),
        }
    }
}

/// Values given explicitly by the caller; each `Some` wins over the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionOverrides {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
    pub insecure: bool,
    pub no_proxy: bool,
    pub retries: Option<u32>,
    pub sleep: Option<u64>,
}

impl Config {
    /// Apply caller overrides on top of this config.
    pub fn merge(mut self, overrides: ConnectionOverrides) -> Self {
        if let Some(url) = overrides.url {
            self.url = url;
        }
        if let Some(username) = overrides.username {
            self.username = Some(username);
        }
        if let Some(password) = overrides.password {
            self.password = Some(password);
        }
        if let Some(token) = overrides.token {
            self.token = Some(token);
        }
        if overrides.insecure {
            self.validate_certs = false;
        }
        if overrides.no_proxy {
            self.use_proxy = false;
        }
        if let Some(retries) = overrides.retries {
            self.retries = retries;
        }
        if let Some(sleep) = overrides.sleep {
            self.sleep = sleep;
        }
        self
    }

    /// Validate into a [ConnectionConfig].
    pub fn connection(&self) -> Result<ConnectionConfig> {
        let auth = Auth::from_parts(
            self.username.as_deref(),
            self.password.as_deref(),
            self.token.as_deref(),
        )?;

        Ok(ConnectionConfig {
            base_url: self.url.clone(),
            auth,
            validate_certs: self.validate_certs,
            use_proxy: self.use_proxy,
            retries: self.retries,
            sleep: Duration::from_secs(self.sleep),
        })
    }
}

/// How requests authenticate. Exactly one mode is ever active.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    Token(String),
    Basic { username: String, password: String },
}

impl Auth {
    /// Pick the auth mode from optional parts.
    ///
    /// Username and token are mutually exclusive, one of them is required,
    /// and username and password must be given together.
    pub fn from_parts(
        username: Option<&str>,
        password: Option<&str>,
        token: Option<&str>,
    ) -> Result<Self> {
        match (username, password, token) {
            (Some(_), _, Some(_)) => Err(HookError::config(
                "parameters are mutually exclusive: username|token",
            )),
            (None, None, Some(token)) => Ok(Auth::Token(token.to_string())),
            (None, Some(_), Some(_)) => Err(HookError::config(
                "parameters are required together: username, password",
            )),
            (Some(username), Some(password), None) => Ok(Auth::Basic {
                username: username.to_string(),
                password: password.to_string(),
            }),
            (Some(_), None, None) | (None, Some(_), None) => Err(HookError::config(
                "parameters are required together: username, password",
            )),
            (None, None, None) => Err(HookError::config(
                "one of the following is required: username, token",
            )),
        }
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::Token(_) => f.write_str("Auth::Token(********)"),
            Auth::Basic { username, .. } => f
                .debug_struct("Auth::Basic")
                .field("username", username)
                .field("password", &"********")
                .finish(),
        }
    }
}

/// Validated connection settings handed to the request helper
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionConfig {
    /// Server URL; empty means endpoints are host-less paths
    pub base_url: String,
    pub auth: Auth,
    pub validate_certs: bool,
    pub use_proxy: bool,
    /// Additional attempts after a transport failure
    pub retries: u32,
    /// Delay between attempts
    pub sleep: Duration,
}

impl ConnectionConfig {
    /// Connection with token auth and default flags
    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        ConnectionConfig {
            base_url: base_url.into(),
            auth: Auth::Token(token.into()),
            validate_certs: true,
            use_proxy: true,
            retries: default_retries(),
            sleep: Duration::from_secs(default_sleep()),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `bitbucket.toml` in current directory
/// 3. `.bitbucket.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./bitbucket.toml").exists() {
        fs::read_to_string("./bitbucket.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".bitbucket.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    toml::from_str(&config_str)
        .map_err(|e| HookError::config(format!("Invalid config file: {}", e)))
}
