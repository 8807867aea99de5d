use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use logsift_core::{cluster, export, group, silhouette_score, write_clusters, NOISE_LABEL};
use logsift_engine::{AnalysisConfig, EmbeddingClient};

use crate::discover;
use crate::logging;

pub fn run(
    input: String,
    output: String,
    eps: Option<f32>,
    min_samples: Option<usize>,
) -> Result<()> {
    let config = AnalysisConfig::from_env()?;
    let eps = eps.unwrap_or(config.similarity_eps);
    let min_samples = min_samples.unwrap_or(config.min_samples);

    let path = PathBuf::from(&input);
    let lines = discover::load_lines(&path)?;
    if lines.is_empty() {
        return Err(anyhow!("no log lines in {input}"));
    }
    logging::stage("cluster", format!("embedding {} lines", lines.len()));
    let embedder = EmbeddingClient::from_env().unwrap_or_else(|_| EmbeddingClient::hash());
    let contents: Vec<String> = lines.iter().map(|line| line.content.clone()).collect();
    let vectors = embedder.embed_batch(&contents)?;
    logging::stage(
        "cluster",
        format!("grouping with eps={eps} min_samples={min_samples}"),
    );
    let labels = cluster(&vectors, eps, min_samples);
    let clusters = export(group(lines, &labels)?);

    let semantic = clusters.iter().filter(|c| c.id != NOISE_LABEL).count();
    let noise = clusters
        .iter()
        .find(|c| c.id == NOISE_LABEL)
        .map(|c| c.count)
        .unwrap_or(0);
    logging::info(format!("total lines: {}", labels.len()));
    logging::info(format!("clusters (excluding noise): {semantic}"));
    logging::info(format!("noise lines: {noise}"));
    for cluster in &clusters {
        logging::info(format!("  cluster {}: {} logs", cluster.id, cluster.count));
    }
    if let Some(score) = silhouette_score(&vectors, &labels) {
        logging::info(format!("silhouette score: {score:.4}"));
    }

    write_clusters(Path::new(&output), &clusters)?;
    logging::info(format!("clustered logs exported to {output}"));
    Ok(())
}
