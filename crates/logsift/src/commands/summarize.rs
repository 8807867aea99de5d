use std::path::Path;

use anyhow::{anyhow, Result};

use logsift_core::{read_clusters, NOISE_LABEL};
use logsift_engine::{assemble, run_stats, summarize_run, AnalysisConfig, RunMeta};

use crate::commands::{build_client, print_result_summary, write_json};
use crate::logging;

pub fn run(
    clusters: String,
    output: Option<String>,
    disable_ai: bool,
    debug: bool,
) -> Result<()> {
    let mut config = AnalysisConfig::from_env()?;
    if disable_ai {
        config.ai_enhancement_enabled = false;
    }
    if debug {
        config.debug_logging = true;
        logging::init_debug_tracing();
    }

    let exports = read_clusters(Path::new(&clusters))?;
    if exports.is_empty() {
        return Err(anyhow!("no clusters in {clusters}"));
    }
    logging::stage("summarize", format!("summarizing {} clusters", exports.len()));
    let client = build_client(&mut config);
    let (summaries, alerts, ai_used) = summarize_run(
        &exports,
        &|prompt| match &client {
            Some(client) => client.generate(prompt),
            None => Err(anyhow!("language model provider unavailable")),
        },
        &config,
    );

    let total_lines = exports.iter().map(|e| e.log_count).sum();
    let semantic = exports.iter().filter(|e| e.cluster_id != NOISE_LABEL).count();
    let noise = exports
        .iter()
        .filter(|e| e.cluster_id == NOISE_LABEL)
        .map(|e| e.log_count)
        .sum();
    let meta = RunMeta {
        log_directory: Some(clusters),
        total_files: 1,
    };
    let stats = run_stats(&meta, total_lines, semantic, noise);
    let model_identifier = ai_used.then(|| config.model_identifier.clone());
    let result = assemble(summaries, alerts, ai_used, model_identifier, stats);
    match output {
        Some(path) => write_json(&result, &path)?,
        None => print_result_summary(&result),
    }
    Ok(())
}
