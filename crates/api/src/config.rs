use std::path::PathBuf;

use crate::auth::session::SessionConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory holding one JSON chat history file per user.
    pub chat_log_dir: PathBuf,
    /// Front-end directory served for paths no API route matches.
    pub static_dir: Option<PathBuf>,
    /// Create the `demo` account on startup if it is missing.
    pub seed_demo_user: bool,
    /// Include internal error details in 500 responses. Development only.
    pub expose_error_details: bool,
    /// Session cookie and lifetime settings.
    pub session: SessionConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `HOST`                  | `0.0.0.0`                |
    /// | `PORT`                  | `5000`                   |
    /// | `CORS_ORIGINS`          | `http://localhost:5000`  |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                     |
    /// | `CHAT_LOG_DIR`          | `chat_logs`              |
    /// | `STATIC_DIR`            | unset                    |
    /// | `SEED_DEMO_USER`        | `true`                   |
    /// | `EXPOSE_ERROR_DETAILS`  | `false`                  |
    ///
    /// Session settings are documented on [`SessionConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics if a numeric or boolean variable is set to an unparsable value.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let chat_log_dir = std::env::var("CHAT_LOG_DIR")
            .unwrap_or_else(|_| "chat_logs".into())
            .into();

        let static_dir = std::env::var("STATIC_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            chat_log_dir,
            static_dir,
            seed_demo_user: env_flag("SEED_DEMO_USER", true),
            expose_error_details: env_flag("EXPOSE_ERROR_DETAILS", false),
            session: SessionConfig::from_env(),
        }
    }
}

/// Read a boolean environment variable (`true`/`false`, `1`/`0`, `yes`/`no`).
///
/// # Panics
///
/// Panics if the variable is set to anything else.
pub(crate) fn env_flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(raw) => parse_flag(&raw).unwrap_or_else(|| panic!("{key} must be a boolean, got '{raw}'")),
        Err(_) => default,
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
