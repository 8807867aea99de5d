use std::path::PathBuf;

use anyhow::{anyhow, Result};

use logsift_engine::{run_analysis, AnalysisConfig, EmbeddingClient, RunMeta};

use crate::commands::{build_client, print_result_summary, write_json};
use crate::discover;
use crate::logging;

pub fn run(
    logs: String,
    term: Option<String>,
    output: Option<String>,
    eps: Option<f32>,
    min_samples: Option<usize>,
    disable_ai: bool,
    debug: bool,
) -> Result<()> {
    let mut config = AnalysisConfig::from_env()?;
    if disable_ai {
        config.ai_enhancement_enabled = false;
        logging::info("AI enhancement disabled via command-line flag");
    }
    if debug {
        config.debug_logging = true;
        logging::init_debug_tracing();
    }
    if let Some(eps) = eps {
        config.similarity_eps = eps;
    }
    if let Some(min_samples) = min_samples {
        config.min_samples = min_samples;
    }

    let root = PathBuf::from(&logs);
    if !root.exists() {
        return Err(anyhow!("log path '{}' does not exist", root.display()));
    }
    let files = discover::find_log_files(&root);
    logging::info(format!("found {} log files", files.len()));
    if logging::verbose_enabled() {
        for file in files.iter().take(10) {
            logging::verbose(format!("  - {}", file.display()));
        }
        if files.len() > 10 {
            logging::verbose(format!("  ... and {} more", files.len() - 10));
        }
    }
    let lines = discover::collect_lines(&files, term.as_deref());
    if lines.is_empty() {
        return Err(anyhow!("no log lines found under {}", root.display()));
    }
    logging::info(format!("loaded {} log lines", lines.len()));

    let embedder = EmbeddingClient::from_env().unwrap_or_else(|_| EmbeddingClient::hash());
    let client = build_client(&mut config);
    let meta = RunMeta {
        log_directory: Some(logs),
        total_files: files.len(),
    };
    logging::stage("analyze", "clustering and summarizing");
    let result = run_analysis(
        lines,
        &|contents| embedder.embed_batch(contents),
        &|prompt| match &client {
            Some(client) => client.generate(prompt),
            None => Err(anyhow!("language model provider unavailable")),
        },
        &config,
        meta,
    )?;
    match output {
        Some(path) => write_json(&result, &path)?,
        None => print_result_summary(&result),
    }
    Ok(())
}
