use std::env;

pub const DEFAULT_GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_GROQ_MODEL: &str = "qwen/qwen3-32b";

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    /// Groq credential. Absence is not fatal: the provider's own auth
    /// error surfaces through the normal run-error path.
    pub groq_api_key: Option<String>,
    pub groq_endpoint: String,
    pub groq_model: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            groq_api_key: env::var("GROQ_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            groq_endpoint: env::var("GROQ_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_GROQ_ENDPOINT.to_string()),
            groq_model: env::var("GROQ_MODEL").unwrap_or_else(|_| DEFAULT_GROQ_MODEL.to_string()),
        }
    }
}
