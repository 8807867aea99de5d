use anyhow::Result;

use logsift_core::LogLine;
use logsift_engine::{run_analysis, AlertOutcome, AnalysisConfig, RunMeta};

fn stub_embed(contents: &[String]) -> Result<Vec<Vec<f32>>> {
    Ok(contents
        .iter()
        .map(|line| {
            if line.contains("ERROR db timeout") {
                vec![1.0, 0.0]
            } else {
                vec![0.0, 1.0]
            }
        })
        .collect())
}

fn no_provider(_: &str) -> Result<String> {
    panic!("provider must not be called when AI enhancement is disabled");
}

#[test]
fn end_to_end_groups_similar_lines_and_degrades_without_ai() {
    let lines = vec![
        LogLine::new("2024-01-01T00:00:00 ERROR db timeout"),
        LogLine::new("2024-01-01T00:00:05 ERROR db timeout retry"),
        LogLine::new("2024-01-02T00:00:00 INFO startup"),
    ];
    let config = AnalysisConfig {
        ai_enhancement_enabled: false,
        similarity_eps: 0.3,
        min_samples: 1,
        ..AnalysisConfig::default()
    };
    let meta = RunMeta {
        log_directory: Some("./data/logs".to_string()),
        total_files: 1,
    };
    let result = run_analysis(lines, &stub_embed, &no_provider, &config, meta).unwrap();

    assert!(!result.ai_enhancement_used);
    assert!(result.model_identifier.is_none());
    assert_eq!(result.alerts, AlertOutcome::none());

    let error_cluster = result
        .clusters
        .iter()
        .find(|c| c.original_logs.iter().all(|l| l.contains("ERROR db timeout")) && c.log_count == 2)
        .expect("the two ERROR db timeout lines must share a cluster");
    let startup_cluster = result
        .clusters
        .iter()
        .find(|c| c.original_logs.iter().any(|l| l.contains("INFO startup")))
        .expect("the startup line must land in its own cluster");
    assert_ne!(error_cluster.cluster_id, startup_cluster.cluster_id);
    assert_eq!(startup_cluster.log_count, 1);

    for cluster in &result.clusters {
        assert!(!cluster.ai_summarized);
        assert_eq!(
            cluster.summary,
            format!(
                "Cluster {} contains {} logs with varied content.",
                cluster.cluster_id, cluster.log_count
            )
        );
    }

    assert_eq!(result.metadata.total_lines, 3);
    assert_eq!(result.metadata.clusters_found, 2);
    assert_eq!(result.metadata.noise_lines, 0);
    assert_eq!(result.metadata.log_directory.as_deref(), Some("./data/logs"));
}

#[test]
fn cluster_order_ascends_with_noise_first() {
    let lines = vec![
        LogLine::new("ERROR db timeout"),
        LogLine::new("ERROR db timeout again"),
        LogLine::new("INFO startup"),
    ];
    let config = AnalysisConfig {
        ai_enhancement_enabled: false,
        similarity_eps: 0.3,
        // the lone startup line cannot reach two neighbors, so it is noise
        min_samples: 2,
        ..AnalysisConfig::default()
    };
    let result = run_analysis(lines, &stub_embed, &no_provider, &config, RunMeta::default()).unwrap();
    let ids: Vec<i32> = result.clusters.iter().map(|c| c.cluster_id).collect();
    assert_eq!(ids, vec![-1, 0]);
    assert_eq!(result.clusters[0].log_count, 1);
    assert_eq!(result.metadata.noise_lines, 1);
    assert_eq!(result.metadata.clusters_found, 1);
}

#[test]
fn empty_input_still_produces_a_result() {
    let config = AnalysisConfig {
        ai_enhancement_enabled: false,
        ..AnalysisConfig::default()
    };
    let result = run_analysis(Vec::new(), &stub_embed, &no_provider, &config, RunMeta::default())
        .unwrap();
    assert_eq!(result.metadata.total_lines, 0);
    assert_eq!(result.metadata.clusters_found, 0);
    // the noise bucket is always materialized, even when empty
    assert_eq!(result.clusters.len(), 1);
    assert_eq!(result.clusters[0].cluster_id, -1);
    assert_eq!(result.clusters[0].log_count, 0);
}
