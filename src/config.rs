use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_LLM_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_LLM_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";
const DEFAULT_DATA_DIR: &str = ".adaptfit";

#[derive(Debug, Clone)]
pub struct Config {
    pub llm_api_key: String,
    pub llm_api_url: String,
    pub llm_model: String,
    pub llm_timeout: Option<Duration>,
    pub data_dir: PathBuf,
    pub expose_raw_responses: bool,
    pub port: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let llm_api_key = env::var("GROQ_API_KEY")?;
        let port = env::var("PORT")?;
        let llm_api_url =
            env::var("LLM_API_URL").unwrap_or_else(|_| DEFAULT_LLM_API_URL.to_string());
        let llm_model = env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string());

        let llm_timeout = match env::var("LLM_TIMEOUT_SECS") {
            Ok(value) => Some(Duration::from_secs(value.parse().map_err(|e| {
                anyhow::anyhow!("LLM_TIMEOUT_SECS must be a whole number of seconds: {}", e)
            })?)),
            Err(_) => None,
        };

        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));

        let expose_raw_responses = env::var("EXPOSE_RAW_RESPONSES")
            .map(|value| parse_flag(&value))
            .unwrap_or(false);

        Ok(Self {
            llm_api_key,
            llm_api_url,
            llm_model,
            llm_timeout,
            data_dir,
            expose_raw_responses,
            port,
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
impl Config {
    /// Config pointing at a mock completion endpoint and a scratch data dir.
    pub fn for_tests(llm_api_url: String, data_dir: PathBuf) -> Self {
        Self {
            llm_api_key: "test-key".to_string(),
            llm_api_url,
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            llm_timeout: None,
            data_dir,
            expose_raw_responses: false,
            port: "0".to_string(),
        }
    }
}
