use anyhow::Result;

use logsift_core::{cluster, export, group, ClusterExport, LogLine, SiftError, NOISE_LABEL};

use crate::assemble::{assemble, run_stats, AnalysisResult, RunMeta};
use crate::config::AnalysisConfig;
use crate::summarize::{
    extract_insights, fallback_summary, summarize_cluster, AlertOutcome, ClusterSummary,
};

/// Runs the full pipeline over raw lines: embed, cluster, aggregate,
/// summarize, assemble. Embedding failures propagate (there is no fallback
/// without vectors); language-model failures degrade per cluster.
pub fn run_analysis(
    lines: Vec<LogLine>,
    embed: &impl Fn(&[String]) -> Result<Vec<Vec<f32>>>,
    generate: &impl Fn(&str) -> Result<String>,
    config: &AnalysisConfig,
    meta: RunMeta,
) -> Result<AnalysisResult> {
    let contents: Vec<String> = lines.iter().map(|line| line.content.clone()).collect();
    let vectors = embed(&contents)?;
    if vectors.len() != lines.len() {
        return Err(SiftError::PartitionMismatch {
            context: "embedding vectors",
            expected: lines.len(),
            actual: vectors.len(),
        }
        .into());
    }
    let labels = cluster(&vectors, config.similarity_eps, config.min_samples);
    let total_lines = labels.len();
    let clusters = export(group(lines, &labels)?);
    let clusters_found = clusters
        .iter()
        .filter(|cluster| cluster.id != NOISE_LABEL)
        .count();
    let noise_lines = clusters
        .iter()
        .filter(|cluster| cluster.id == NOISE_LABEL)
        .map(|cluster| cluster.count)
        .sum();
    let exports: Vec<ClusterExport> = clusters.iter().map(ClusterExport::from).collect();
    let (summaries, alerts, ai_used) = summarize_run(&exports, generate, config);
    let stats = run_stats(&meta, total_lines, clusters_found, noise_lines);
    let model_identifier = ai_used.then(|| config.model_identifier.clone());
    Ok(assemble(summaries, alerts, ai_used, model_identifier, stats))
}

/// The summarization stage over exported clusters, shared by the pipeline
/// and the standalone `summarize` front end. The AI gate is checked once,
/// before any provider call: disabled means zero calls and pure fallback
/// output. One cluster's failure never aborts the rest, and an insight
/// failure never touches the computed summaries.
pub fn summarize_run(
    exports: &[ClusterExport],
    generate: &impl Fn(&str) -> Result<String>,
    config: &AnalysisConfig,
) -> (Vec<ClusterSummary>, AlertOutcome, bool) {
    if !config.ai_enhancement_enabled {
        let summaries = exports
            .iter()
            .map(|export| fallback_summary(export.cluster_id, export.log_count, &export.logs))
            .collect();
        return (summaries, AlertOutcome::none(), false);
    }
    let summaries: Vec<ClusterSummary> = exports
        .iter()
        .map(|export| {
            summarize_cluster(
                generate,
                export.cluster_id,
                export.log_count,
                &export.logs,
                config.debug_logging,
            )
        })
        .collect();
    let alerts = extract_insights(generate, &summaries, config.debug_logging);
    (summaries, alerts, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::cell::RefCell;

    fn export_of(cluster_id: i32, logs: &[&str]) -> ClusterExport {
        ClusterExport {
            cluster_id,
            log_count: logs.len(),
            logs: logs.iter().map(|l| l.to_string()).collect(),
        }
    }

    fn disabled_config() -> AnalysisConfig {
        AnalysisConfig {
            ai_enhancement_enabled: false,
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn gating_never_touches_the_provider() {
        let calls = RefCell::new(0usize);
        let generate = |_: &str| -> Result<String> {
            *calls.borrow_mut() += 1;
            Ok(r#"{"summary": "long enough to pass validation easily"}"#.to_string())
        };
        let exports = vec![export_of(-1, &["n"]), export_of(0, &["a", "b"])];
        let config = disabled_config();
        for _ in 0..3 {
            let (summaries, alerts, ai_used) = summarize_run(&exports, &generate, &config);
            assert!(!ai_used);
            assert_eq!(alerts, AlertOutcome::none());
            assert!(summaries.iter().all(|s| !s.ai_summarized));
        }
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn one_failing_cluster_does_not_abort_the_others() {
        let generate = |prompt: &str| -> Result<String> {
            if prompt.contains("Cluster ID: 0") {
                Err(anyhow!("transient model failure"))
            } else if prompt.contains("Return only the JSON list") {
                Ok("[]".to_string())
            } else {
                Ok(serde_json::json!({
                    "cluster": "Startup Notices",
                    "summary": "Routine startup messages recorded during the boot sequence.",
                })
                .to_string())
            }
        };
        let exports = vec![export_of(0, &["a"]), export_of(1, &["b"])];
        let (summaries, _, ai_used) = summarize_run(&exports, &generate, &AnalysisConfig::default());
        assert!(ai_used);
        assert!(!summaries[0].ai_summarized);
        assert!(summaries[1].ai_summarized);
        assert_eq!(summaries[1].title, "Startup Notices");
    }

    #[test]
    fn insight_failure_leaves_summaries_intact() {
        let generate = |prompt: &str| -> Result<String> {
            if prompt.contains("Return only the JSON list") {
                Err(anyhow!("insight stage down"))
            } else {
                Ok(serde_json::json!({
                    "summary": "A perfectly valid summary of the cluster contents.",
                })
                .to_string())
            }
        };
        let exports = vec![export_of(0, &["a"])];
        let (summaries, alerts, ai_used) =
            summarize_run(&exports, &generate, &AnalysisConfig::default());
        assert!(ai_used);
        assert!(summaries[0].ai_summarized);
        assert_eq!(alerts, AlertOutcome::none());
    }

    #[test]
    fn embedding_count_mismatch_is_fatal() {
        let lines = vec![LogLine::new("a"), LogLine::new("b"), LogLine::new("c")];
        let embed = |_: &[String]| -> Result<Vec<Vec<f32>>> {
            Ok(vec![vec![1.0, 0.0], vec![0.0, 1.0]])
        };
        let generate = |_: &str| -> Result<String> { Ok(String::new()) };
        let err = run_analysis(lines, &embed, &generate, &disabled_config(), RunMeta::default())
            .unwrap_err();
        assert!(err.to_string().contains("partition inconsistency"));
    }

    #[test]
    fn model_identifier_follows_ai_usage() {
        let lines = vec![LogLine::new("alpha beta"), LogLine::new("alpha beta")];
        let embed = |contents: &[String]| -> Result<Vec<Vec<f32>>> {
            Ok(contents.iter().map(|_| vec![1.0, 0.0]).collect())
        };
        let generate = |prompt: &str| -> Result<String> {
            if prompt.contains("Return only the JSON list") {
                Ok("[]".to_string())
            } else {
                Ok(r#"{"summary": "two identical lines grouped into one cluster"}"#.to_string())
            }
        };
        let config = AnalysisConfig {
            min_samples: 1,
            ..AnalysisConfig::default()
        };
        let result = run_analysis(lines, &embed, &generate, &config, RunMeta::default()).unwrap();
        assert!(result.ai_enhancement_used);
        assert_eq!(result.model_identifier.as_deref(), Some("llama3.2"));
    }
}
