pub mod analyze;
pub mod cluster;
pub mod scan;
pub mod summarize;

use std::fs::File;
use std::io::BufWriter;

use anyhow::Result;
use serde::Serialize;

use logsift_engine::{AnalysisConfig, AnalysisResult};
use logsift_llm::LlmClient;

use crate::logging;

/// Builds the shared provider handle for the run. Construction failure is
/// the caller's decision point: we log it and flip the run to the fallback
/// path instead of aborting.
pub(crate) fn build_client(config: &mut AnalysisConfig) -> Option<LlmClient> {
    if !config.ai_enhancement_enabled {
        return None;
    }
    match LlmClient::new(config.provider, config.model_identifier.clone()) {
        Ok(client) => Some(client),
        Err(err) => {
            logging::info(format!(
                "language model unavailable, continuing without AI enhancement: {err:#}"
            ));
            config.ai_enhancement_enabled = false;
            None
        }
    }
}

pub(crate) fn write_json<T: Serialize>(value: &T, path: &str) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)?;
    logging::info(format!("results written to {path}"));
    Ok(())
}

pub(crate) fn print_result_summary(result: &AnalysisResult) {
    logging::info("--- Analysis Summary ---");
    logging::info(format!("total lines: {}", result.metadata.total_lines));
    logging::info(format!(
        "clusters found: {} ({} noise lines)",
        result.metadata.clusters_found, result.metadata.noise_lines
    ));
    for summary in &result.clusters {
        let marker = if summary.ai_summarized { " *" } else { "" };
        logging::info(format!(
            "  [{}] {} ({} logs){}",
            summary.cluster_id, summary.title, summary.log_count, marker
        ));
        logging::info(format!("      {}", summary.summary));
    }
    match result.alerts.alerts() {
        Some(alerts) => {
            logging::info(format!("insights: {}", alerts.len()));
            for (index, alert) in alerts.iter().enumerate() {
                logging::info(format!("  {}. {}", index + 1, alert.log));
                logging::info(format!("     {}", alert.explanation));
                logging::info(format!("     {}", alert.suggestion));
            }
        }
        None => logging::info("no insights identified"),
    }
    if result.ai_enhancement_used {
        if let Some(model) = &result.model_identifier {
            logging::info(format!("summaries enhanced using model: {model}"));
        }
    } else {
        logging::info("AI enhancement was not used");
    }
}
