//! Process configuration, built once from the environment at startup.

use std::path::PathBuf;

/// Configuration shared by the HTTP server, repository, and artifact store.
///
/// Constructed once in the binary and passed by reference into constructors;
/// nothing in the core reads the environment after startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// Root directory for stored image artifacts.
    pub upload_dir: PathBuf,
    /// Shared secret expected in the `x-api-key` header on mutating routes.
    /// `None` means the gate is unconfigured and mutations are refused.
    pub api_key: Option<String>,
    pub host: String,
    pub port: u16,
    /// Base URL of the external translation service.
    pub translate_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            db_path: PathBuf::from(env_or("HERBARIUM_DB", "herbarium.db")),
            upload_dir: PathBuf::from(env_or("HERBARIUM_UPLOADS", "uploads")),
            api_key: std::env::var("HERBARIUM_API_KEY").ok().filter(|k| !k.is_empty()),
            host: env_or("HERBARIUM_HOST", "127.0.0.1"),
            port: env_parse_with_default("HERBARIUM_PORT", 8000),
            translate_url: env_or(
                "HERBARIUM_TRANSLATE_URL",
                "https://api.mymemory.translated.net/get",
            ),
        }
    }
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).ok().filter(|v| !v.is_empty()).unwrap_or_else(|| default.to_owned())
}

/// Parse an environment variable with a default fallback.
///
/// - If the variable is not set: returns `default` silently (expected case).
/// - If the variable is set but cannot be parsed: logs a warning and returns
///   `default` instead of silently swallowing the failure.
fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(var: &str, default: T) -> T {
    match std::env::var(var) {
        Ok(v) => match v.parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}
