use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::summarize::{AlertOutcome, ClusterSummary};

/// Run statistics carried in the result's `metadata` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_directory: Option<String>,
    pub total_files: usize,
    pub total_lines: usize,
    pub clusters_found: usize,
    pub noise_lines: usize,
}

/// Caller-supplied context about where the lines came from.
#[derive(Debug, Clone, Default)]
pub struct RunMeta {
    pub log_directory: Option<String>,
    pub total_files: usize,
}

/// Top-level reply object, created once per run and returned to the
/// caller. No further mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub alerts: AlertOutcome,
    pub clusters: Vec<ClusterSummary>,
    pub ai_enhancement_used: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_identifier: Option<String>,
    pub metadata: RunStats,
}

pub fn run_stats(
    meta: &RunMeta,
    total_lines: usize,
    clusters_found: usize,
    noise_lines: usize,
) -> RunStats {
    RunStats {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        log_directory: meta.log_directory.clone(),
        total_files: meta.total_files,
        total_lines,
        clusters_found,
        noise_lines,
    }
}

/// Pure merge. Cluster ordering is whatever the aggregator produced and
/// `ai_enhancement_used` is taken verbatim, never inferred from content.
pub fn assemble(
    summaries: Vec<ClusterSummary>,
    alerts: AlertOutcome,
    ai_used: bool,
    model_identifier: Option<String>,
    stats: RunStats,
) -> AnalysisResult {
    AnalysisResult {
        alerts,
        clusters: summaries,
        ai_enhancement_used: ai_used,
        model_identifier,
        metadata: stats,
    }
}
