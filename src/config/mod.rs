// src/config/mod.rs
// All tunables load from the environment (with a .env file if present).

use once_cell::sync::Lazy;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    // ── Database
    pub database_url: String,

    // ── Gemini API
    pub gemini_api_key: String,
    pub primary_model: String,
    pub fallback_model: String,

    // ── Assistant behavior
    pub assistant_name: String,
    pub user_title: String,
    pub default_session_id: String,
    /// Non-Complete tasks handed to the model as grounding.
    pub context_task_limit: usize,
    /// Stored turns read back into model context.
    pub history_window: usize,

    // ── History endpoint defaults
    pub history_default_limit: usize,
    pub history_max_limit: usize,

    // ── Server
    pub host: String,
    pub port: u16,
}

/// Parse an environment variable, stripping inline comments and whitespace;
/// missing or unparseable values fall back to the default.
fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_err() {
            eprintln!("Warning: .env file not found. Using environment variables and defaults.");
        }

        Self {
            database_url: env_var_or("DATABASE_URL", "sqlite:./taskdeck.db".to_string()),
            gemini_api_key: env_var_or("GEMINI_API_KEY", String::new()),
            primary_model: env_var_or("TASKDECK_PRIMARY_MODEL", "gemini-3-flash-preview".to_string()),
            fallback_model: env_var_or("TASKDECK_FALLBACK_MODEL", "gemini-2.5-flash".to_string()),
            assistant_name: env_var_or("TASKDECK_ASSISTANT_NAME", "JARVIS".to_string()),
            user_title: env_var_or("TASKDECK_USER_TITLE", "Boss".to_string()),
            default_session_id: env_var_or("TASKDECK_DEFAULT_SESSION_ID", "default-session".to_string()),
            context_task_limit: env_var_or("TASKDECK_CONTEXT_TASK_LIMIT", 20),
            history_window: env_var_or("TASKDECK_HISTORY_WINDOW", 6),
            history_default_limit: env_var_or("TASKDECK_HISTORY_DEFAULT_LIMIT", 30),
            history_max_limit: env_var_or("TASKDECK_HISTORY_MAX_LIMIT", 100),
            host: env_var_or("TASKDECK_HOST", "0.0.0.0".to_string()),
            port: env_var_or("TASKDECK_PORT", 8080),
        }
    }

    /// Server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
