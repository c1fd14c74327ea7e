// src/config/mod.rs

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct TriagemConfig {
    // ── Backend API
    pub api_base_url: String,

    // ── Timeouts (in seconds)
    pub request_timeout: u64,
    pub connect_timeout: u64,

    // ── Logging
    pub log_level: String,
}

fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => match val.trim().parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                default
            }
        },
        Err(_) => default,
    }
}

impl TriagemConfig {
    pub fn from_env() -> Self {
        // Load from .env file first if it exists
        dotenvy::dotenv().ok();

        Self {
            api_base_url: env_var_or("TRIAGEM_API_BASE_URL", "http://localhost:8000".to_string()),
            request_timeout: env_var_or("TRIAGEM_REQUEST_TIMEOUT", 30),
            connect_timeout: env_var_or("TRIAGEM_CONNECT_TIMEOUT", 10),
            log_level: env_var_or("TRIAGEM_LOG_LEVEL", "info".to_string()),
        }
    }
}

pub static CONFIG: Lazy<TriagemConfig> = Lazy::new(TriagemConfig::from_env);
