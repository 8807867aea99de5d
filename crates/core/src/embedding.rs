use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy)]
pub struct HashEmbedderConfig {
    pub dimensions: usize,
    pub seed: u64,
}

impl Default for HashEmbedderConfig {
    fn default() -> Self {
        Self {
            dimensions: 64,
            seed: 1337,
        }
    }
}

/// Deterministic bag-of-tokens embedder. Tokens are split on
/// non-alphanumeric boundaries and purely numeric tokens are skipped:
/// counters, ports and timestamps vary per line and would otherwise pull
/// lines with identical messages apart.
#[derive(Clone)]
pub struct HashEmbedder {
    config: HashEmbedderConfig,
}

impl HashEmbedder {
    pub fn new(config: HashEmbedderConfig) -> Self {
        Self { config }
    }

    pub fn embed_line(&self, text: &str) -> Vec<f32> {
        let dims = self.config.dimensions.max(1);
        let mut vector = vec![0f32; dims];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
        {
            if token.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            vector[self.bucket_for(token)] += 1.0;
        }
        normalize(&mut vector);
        vector
    }

    pub fn embed_batch(&self, lines: &[String]) -> Vec<Vec<f32>> {
        lines.iter().map(|line| self.embed_line(line)).collect()
    }

    fn bucket_for(&self, token: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        hasher.write_u64(self.config.seed);
        token.to_lowercase().hash(&mut hasher);
        (hasher.finish() as usize) % self.config.dimensions.max(1)
    }
}

fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return;
    }
    for value in vector.iter_mut() {
        *value /= norm;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::cosine_similarity;

    #[test]
    fn embedding_is_deterministic() {
        let embedder = HashEmbedder::new(HashEmbedderConfig::default());
        let first = embedder.embed_line("ERROR db connection refused");
        let second = embedder.embed_line("ERROR db connection refused");
        assert_eq!(first, second);
    }

    #[test]
    fn embedding_is_unit_length() {
        let embedder = HashEmbedder::new(HashEmbedderConfig::default());
        let vector = embedder.embed_line("worker started on node alpha");
        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn numeric_tokens_do_not_affect_similarity() {
        let embedder = HashEmbedder::new(HashEmbedderConfig::default());
        let a = embedder.embed_line("request failed after 123 retries");
        let b = embedder.embed_line("request failed after 456 retries");
        assert!(cosine_similarity(&a, &b) > 0.9999);
    }

    #[test]
    fn batch_preserves_positional_correspondence() {
        let embedder = HashEmbedder::new(HashEmbedderConfig::default());
        let lines = vec!["one alpha".to_string(), "two beta".to_string()];
        let vectors = embedder.embed_batch(&lines);
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0], embedder.embed_line("one alpha"));
        assert_eq!(vectors[1], embedder.embed_line("two beta"));
    }

    #[test]
    fn all_numeric_line_embeds_to_zero_vector() {
        let embedder = HashEmbedder::new(HashEmbedderConfig::default());
        let vector = embedder.embed_line("123 456 789");
        assert!(vector.iter().all(|v| *v == 0.0));
    }
}
