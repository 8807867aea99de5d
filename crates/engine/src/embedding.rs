use std::env;

use anyhow::{anyhow, Result};
use reqwest::blocking::Client;
use serde::Deserialize;

use logsift_core::{HashEmbedder, HashEmbedderConfig};

#[derive(Clone)]
enum EmbeddingBackend {
    Hash(HashEmbedder),
    OpenAi(OpenAiEmbeddingClient),
}

/// Embedding provider handle. The hash backend is the offline default; the
/// OpenAI backend maps lines to model embeddings over HTTP. Either way,
/// `embed_batch` upholds positional correspondence: one vector per input
/// line, same order, or an error.
#[derive(Clone)]
pub struct EmbeddingClient {
    backend: EmbeddingBackend,
}

impl EmbeddingClient {
    pub fn from_env() -> Result<Self> {
        match env::var("LOGSIFT_EMBEDDING_PROVIDER")
            .unwrap_or_else(|_| "hash".to_string())
            .to_lowercase()
            .as_str()
        {
            "openai" => {
                let model = env::var("LOGSIFT_EMBEDDING_MODEL")
                    .unwrap_or_else(|_| "text-embedding-3-small".to_string());
                Ok(Self {
                    backend: EmbeddingBackend::OpenAi(OpenAiEmbeddingClient::new(&model)?),
                })
            }
            _ => {
                let dimensions = env::var("LOGSIFT_EMBED_DIMENSIONS")
                    .ok()
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(64);
                Ok(Self {
                    backend: EmbeddingBackend::Hash(HashEmbedder::new(HashEmbedderConfig {
                        dimensions,
                        seed: 1337,
                    })),
                })
            }
        }
    }

    pub fn hash() -> Self {
        Self {
            backend: EmbeddingBackend::Hash(HashEmbedder::new(HashEmbedderConfig::default())),
        }
    }

    pub fn embed_batch(&self, lines: &[String]) -> Result<Vec<Vec<f32>>> {
        let vectors = match &self.backend {
            EmbeddingBackend::Hash(embedder) => embedder.embed_batch(lines),
            EmbeddingBackend::OpenAi(client) => client.embed_batch(lines)?,
        };
        if vectors.len() != lines.len() {
            return Err(anyhow!(
                "embedding backend returned {} vectors for {} lines",
                vectors.len(),
                lines.len()
            ));
        }
        Ok(vectors)
    }
}

#[derive(Clone)]
struct OpenAiEmbeddingClient {
    http: Client,
    model: String,
    api_key: String,
}

impl OpenAiEmbeddingClient {
    fn new(model: &str) -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow!("OPENAI_API_KEY is required for openai embeddings"))?;
        Ok(Self {
            http: Client::new(),
            model: model.to_string(),
            api_key,
        })
    }

    fn embed_batch(&self, lines: &[String]) -> Result<Vec<Vec<f32>>> {
        if lines.is_empty() {
            return Ok(Vec::new());
        }
        let payload = serde_json::json!({
            "model": self.model,
            "input": lines,
        });
        let response = self
            .http
            .post("https://api.openai.com/v1/embeddings")
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "openai embeddings request failed: {}",
                response.status()
            ));
        }
        let parsed: OpenAiEmbeddingResponse = response.json()?;
        Ok(parsed.data.into_iter().map(|item| item.embedding).collect())
    }
}

#[derive(Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingData>,
}

#[derive(Deserialize)]
struct OpenAiEmbeddingData {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_backend_embeds_one_vector_per_line() {
        let client = EmbeddingClient::hash();
        let lines = vec!["alpha beta".to_string(), "gamma delta".to_string()];
        let vectors = client.embed_batch(&lines).unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0].len(), 64);
    }

    #[test]
    fn hash_backend_handles_empty_input() {
        let client = EmbeddingClient::hash();
        let vectors = client.embed_batch(&[]).unwrap();
        assert!(vectors.is_empty());
    }
}
