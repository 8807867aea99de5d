use std::env;

use anyhow::{anyhow, Result};

use logsift_llm::LlmProvider;

pub const DEFAULT_SIMILARITY_EPS: f32 = 0.3;
pub const DEFAULT_MIN_SAMPLES: usize = 5;

/// Run configuration, read once at run start and threaded explicitly
/// through the pipeline's entry points. No component queries ambient
/// process state mid-run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub ai_enhancement_enabled: bool,
    pub debug_logging: bool,
    pub similarity_eps: f32,
    pub min_samples: usize,
    pub provider: LlmProvider,
    pub model_identifier: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ai_enhancement_enabled: true,
            debug_logging: false,
            similarity_eps: DEFAULT_SIMILARITY_EPS,
            min_samples: DEFAULT_MIN_SAMPLES,
            provider: LlmProvider::Ollama,
            model_identifier: default_model(LlmProvider::Ollama).to_string(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_env() -> Result<Self> {
        let ai_enhancement_enabled = !env_flag("LOGSIFT_DISABLE_AI");
        let debug_logging = env_flag("LOGSIFT_DEBUG");
        let similarity_eps = env::var("LOGSIFT_EPS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SIMILARITY_EPS);
        let min_samples = env::var("LOGSIFT_MIN_SAMPLES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MIN_SAMPLES);
        let provider_name = env::var("LOGSIFT_PROVIDER").unwrap_or_else(|_| "ollama".to_string());
        let provider = LlmProvider::from_str(&provider_name)
            .ok_or_else(|| anyhow!(format!("unknown provider {provider_name}")))?;
        let model_identifier =
            env::var("LOGSIFT_MODEL").unwrap_or_else(|_| default_model(provider).to_string());
        Ok(Self {
            ai_enhancement_enabled,
            debug_logging,
            similarity_eps,
            min_samples,
            provider,
            model_identifier,
        })
    }
}

pub fn default_model(provider: LlmProvider) -> &'static str {
    match provider {
        LlmProvider::Ollama => "llama3.2",
        LlmProvider::OpenAi => "gpt-4.1-mini",
        LlmProvider::Anthropic => "claude-3-5-sonnet",
        LlmProvider::Local => "local",
    }
}

fn env_flag(var: &str) -> bool {
    env::var(var)
        .map(|value| {
            matches!(
                value.trim().to_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
        .unwrap_or(false)
}
