use anyhow::{Context, Result};
use std::env;

pub const DEFAULT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/completions";
pub const DEFAULT_MODEL: &str = "text-davinci-003";

/// Runtime configuration, read once at startup and injected into the
/// completion client. The API key is required; everything else has defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub completions_url: String,
    pub model: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY is not set; export it or put it in a .env file")?;
        let completions_url =
            env::var("OPENAI_API_URL").unwrap_or_else(|_| DEFAULT_COMPLETIONS_URL.to_string());
        let model =
            env::var("TOPICFINDER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self {
            api_key,
            completions_url,
            model,
        })
    }
}
