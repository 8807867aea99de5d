mod assemble;
mod config;
mod embedding;
mod pipeline;
mod summarize;

pub use assemble::{assemble, run_stats, AnalysisResult, RunMeta, RunStats};
pub use config::{default_model, AnalysisConfig, DEFAULT_MIN_SAMPLES, DEFAULT_SIMILARITY_EPS};
pub use embedding::EmbeddingClient;
pub use pipeline::{run_analysis, summarize_run};
pub use summarize::{
    extract_insights, fallback_summary, summarize_cluster, AlertOutcome, ClusterSummary,
    InsightAlert, NO_ALERTS_SENTINEL,
};
