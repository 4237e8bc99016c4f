use std::env;
use std::io::ErrorKind;
use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use url::Url;

use super::probe_config::{LoginConfig, ProbeConfig};
use crate::login::client::HttpLoginClient;

const DEFAULT_CONFIG_FILE: &str = "config.yml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in config file")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid login endpoint {endpoint:?}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
}

pub struct AppConfig {
    pub config: ProbeConfig,
    pub login_endpoint: Url,
    pub timeout: Duration,
}

impl AppConfig {
    pub fn login(&self) -> &LoginConfig {
        &self.config.login
    }

    pub fn targets(&self) -> &[String] {
        &self.config.targets
    }
}

impl TryFrom<ProbeConfig> for AppConfig {
    type Error = ConfigError;

    fn try_from(config: ProbeConfig) -> Result<Self, Self::Error> {
        let login_endpoint =
            Url::parse(&config.login.endpoint).map_err(|source| ConfigError::InvalidEndpoint {
                endpoint: config.login.endpoint.clone(),
                source,
            })?;
        let timeout = Duration::from_millis(config.timeout_ms);

        Ok(AppConfig {
            config,
            login_endpoint,
            timeout,
        })
    }
}

/// Load the probe configuration from a YAML file and environment variables.
/// The file is named by the `CONFIG_FILE` environment variable and defaults to `config.yml`;
/// when that default file does not exist the built-in targets are used.
/// `LOG_FILE`, `LOGIN_USERNAME` and `LOGIN_PASSWORD` override the file's values.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let config_file_location = env::var("CONFIG_FILE").ok();
    let mut config = read_config_file(config_file_location.as_deref())?;
    apply_env_overrides(&mut config, |key| env::var(key).ok());

    log::info!(
        "Probing {} targets, logging to {}",
        config.targets.len(),
        config.log_file
    );

    AppConfig::try_from(config)
}

fn read_config_file(explicit_location: Option<&str>) -> Result<ProbeConfig, ConfigError> {
    let location = explicit_location.unwrap_or(DEFAULT_CONFIG_FILE);
    match std::fs::read_to_string(location) {
        Ok(config_str) => parse_config(&config_str),
        Err(e) if e.kind() == ErrorKind::NotFound && explicit_location.is_none() => {
            log::info!("No {location} found, using built-in configuration");
            Ok(ProbeConfig::default())
        }
        Err(source) => Err(ConfigError::Read {
            path: location.to_string(),
            source,
        }),
    }
}

fn parse_config(config_str: &str) -> Result<ProbeConfig, ConfigError> {
    if config_str.trim().is_empty() {
        return Ok(ProbeConfig::default());
    }
    Ok(serde_yaml::from_str(config_str)?)
}

fn apply_env_overrides(config: &mut ProbeConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(log_file) = lookup("LOG_FILE") {
        config.log_file = log_file;
    }
    if let Some(username) = lookup("LOGIN_USERNAME") {
        config.login.username = Some(username);
    }
    if let Some(password) = lookup("LOGIN_PASSWORD") {
        config.login.password = Some(password);
    }
}

fn http_client_builder(timeout: Duration) -> ClientBuilder {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("probe-batch/", env!("CARGO_PKG_VERSION")))
}

/// Setup the HTTP client shared by every probe in the batch.
/// Requests that have not completed within `timeout` fail, and so do
/// targets whose TLS certificate does not verify.
pub fn setup_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    http_client_builder(timeout).build()
}

/// Setup the login client for the configured endpoint and credentials.
/// It gets its own client so the download timeout does not bound the login.
pub fn setup_login_client(app_config: &AppConfig) -> Result<HttpLoginClient, reqwest::Error> {
    let client = Client::builder()
        .user_agent(concat!("probe-batch/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let login = app_config.login();

    Ok(HttpLoginClient::new(
        client,
        app_config.login_endpoint.clone(),
        login.username.clone(),
        login.password.clone(),
    ))
}
