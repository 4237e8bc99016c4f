use serde::Deserialize;

pub const DEFAULT_LOG_FILE: &str = "log.txt";
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_LOGIN_NAME: &str = "P1 (Login)";
pub const DEFAULT_LOGIN_ENDPOINT: &str = "http://physics-api.turtlesim.com/Users/Authenticate";

const DEFAULT_TARGETS: [&str; 8] = [
    "http://physics-api.turtlesim.com/Users",
    "http://physics-api-cn.turtlesim.com/Users",
    "http://nlm-api-cn.turtlesim.com/Users",
    "http://nlm-api.turtlesim.com/Users",
    "http://tu.netlogo.org",
    "http://tu.netlogo.org",
    "http://pl.turtlesim.com",
    "http://physics-api-cn.turtlesim.com/Contents",
];

/// Configuration for a single probe batch.
/// Every field is optional in the YAML file; missing fields fall back to the built-in defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// File the batch report is appended to, relative to the working directory.
    pub log_file: String,

    /// Per-request timeout for the URL probes, in milliseconds.
    pub timeout_ms: u64,

    /// The login check.
    pub login: LoginConfig,

    /// URLs to download, in order. Duplicates are probed once per entry.
    pub targets: Vec<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            log_file: DEFAULT_LOG_FILE.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            login: LoginConfig::default(),
            targets: default_targets(),
        }
    }
}

/// Login check configuration.
/// Credentials are optional; without them the login is attempted anonymously.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    /// Name shown for the login check in the report.
    pub name: String,

    pub endpoint: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for LoginConfig {
    fn default() -> Self {
        LoginConfig {
            name: DEFAULT_LOGIN_NAME.to_string(),
            endpoint: DEFAULT_LOGIN_ENDPOINT.to_string(),
            username: None,
            password: None,
        }
    }
}

fn default_targets() -> Vec<String> {
    DEFAULT_TARGETS.iter().map(|s| s.to_string()).collect()
}
