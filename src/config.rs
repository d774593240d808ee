use std::path::PathBuf;

use crate::error::ChatError;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub gemini_timeout_ms: u64,
    pub port: u16,
    pub static_dir: PathBuf,
}

pub fn load_config() -> Result<Config, ChatError> {
    dotenvy::dotenv().ok();

    let gemini_api_key = std::env::var("GEMINI_API_KEY")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    if gemini_api_key.is_empty() {
        return Err(ChatError::Config(
            "GEMINI_API_KEY is required. Set it in .env file.".into(),
        ));
    }

    let gemini_model = non_empty_var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let gemini_api_base = non_empty_var("GEMINI_API_BASE")
        .map(|s| s.trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    let gemini_timeout_ms = std::env::var("GEMINI_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(60_000);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(3000);

    let static_dir = non_empty_var("STATIC_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./public"));

    Ok(Config {
        gemini_api_key,
        gemini_model,
        gemini_api_base,
        gemini_timeout_ms,
        port,
        static_dir,
    })
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
pub fn test_config(api_base: &str) -> Config {
    Config {
        gemini_api_key: "test-key".into(),
        gemini_model: DEFAULT_MODEL.into(),
        gemini_api_base: api_base.into(),
        gemini_timeout_ms: 5_000,
        port: 0,
        static_dir: PathBuf::from("./public"),
    }
}
