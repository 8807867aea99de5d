use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

pub const NO_ALERTS_SENTINEL: &str = "No alerts identified";

const SAMPLE_LOGS_PER_CLUSTER: usize = 3;
const SUMMARY_MIN_CHARS: usize = 20;
const FALLBACK_PROBLEM: &str = "General cluster pattern";
const FALLBACK_SOLUTION: &str = "Review logs for further investigation.";

/// One summarized cluster. Created once by the engine, immutable afterward.
/// `ai_summarized` is false exactly when the content came from the
/// deterministic fallback rather than the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub cluster_id: i32,
    pub log_count: usize,
    #[serde(rename = "cluster")]
    pub title: String,
    pub summary: String,
    pub problem: String,
    pub solution: String,
    pub original_logs: Vec<String>,
    pub ai_summarized: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightAlert {
    pub log: String,
    pub explanation: String,
    pub suggestion: String,
}

/// File-wide findings: either a non-empty selection of alerts or the
/// sentinel string. Serialized untagged so the result JSON carries the
/// array or the bare string, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlertOutcome {
    Alerts(Vec<InsightAlert>),
    Sentinel(String),
}

impl AlertOutcome {
    pub fn none() -> Self {
        AlertOutcome::Sentinel(NO_ALERTS_SENTINEL.to_string())
    }

    pub fn alerts(&self) -> Option<&[InsightAlert]> {
        match self {
            AlertOutcome::Alerts(alerts) => Some(alerts),
            AlertOutcome::Sentinel(_) => None,
        }
    }
}

/// Deterministic summary used on any provider error, timeout or validation
/// rejection. Total in `(cluster_id, count)`: always succeeds, no side
/// effects.
pub fn fallback_summary(cluster_id: i32, count: usize, logs: &[String]) -> ClusterSummary {
    ClusterSummary {
        cluster_id,
        log_count: count,
        title: format!("Cluster {cluster_id}"),
        summary: format!("Cluster {cluster_id} contains {count} logs with varied content."),
        problem: FALLBACK_PROBLEM.to_string(),
        solution: FALLBACK_SOLUTION.to_string(),
        original_logs: logs.to_vec(),
        ai_summarized: false,
    }
}

/// Asks the provider for a four-key JSON summary of one cluster and
/// validates the answer as untrusted input. Never fails: every rejection
/// path lands on the fallback record.
pub fn summarize_cluster(
    generate: &impl Fn(&str) -> Result<String>,
    cluster_id: i32,
    log_count: usize,
    logs: &[String],
    debug_logging: bool,
) -> ClusterSummary {
    let prompt = cluster_prompt(cluster_id, log_count, logs);
    if debug_logging {
        debug!(cluster_id, "cluster prompt:\n{prompt}");
    }
    let raw = match generate(&prompt) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(cluster_id, "summary generation failed: {err:#}");
            return fallback_summary(cluster_id, log_count, logs);
        }
    };
    match parse_summary_response(&raw, cluster_id) {
        Some(parsed) => ClusterSummary {
            cluster_id,
            log_count,
            title: parsed.title,
            summary: parsed.summary,
            problem: parsed.problem,
            solution: parsed.solution,
            original_logs: logs.to_vec(),
            ai_summarized: true,
        },
        None => {
            warn!(cluster_id, "summary response rejected, using fallback");
            fallback_summary(cluster_id, log_count, logs)
        }
    }
}

/// One combined request across all clusters asking for a variable-length,
/// cross-cluster selection of individually significant lines. Any
/// violation of the response contract yields the sentinel.
pub fn extract_insights(
    generate: &impl Fn(&str) -> Result<String>,
    summaries: &[ClusterSummary],
    debug_logging: bool,
) -> AlertOutcome {
    let prompt = insight_prompt(summaries);
    if debug_logging {
        debug!("insight prompt:\n{prompt}");
    }
    let raw = match generate(&prompt) {
        Ok(raw) => raw,
        Err(err) => {
            warn!("insight generation failed: {err:#}");
            return AlertOutcome::none();
        }
    };
    match parse_insight_response(&raw) {
        Some(alerts) => AlertOutcome::Alerts(alerts),
        None => {
            warn!("insight response rejected, using sentinel");
            AlertOutcome::none()
        }
    }
}

fn cluster_prompt(cluster_id: i32, log_count: usize, logs: &[String]) -> String {
    let samples = sample_block(logs);
    format!(
        "You are a professional log analyst. Analyze the following log entries from a cluster \
         and describe the common patterns, issues, or themes. Assign a descriptive title to the \
         cluster that reflects the type of logs it contains (e.g., 'Authentication Errors', \
         'Database Connection Issues', 'HTTP Request Failures').\n\n\
         Cluster ID: {cluster_id}\n\
         Log Count: {log_count}\n\
         Sample Logs:\n{samples}\n\n\
         Provide a JSON response with:\n\
         - cluster: A concise, specific title for the cluster based on the type of logs.\n\
         - summary: A concise description of the common patterns or issues in the cluster.\n\
         - problem: A specific problem description (if identifiable, else \"General cluster pattern\").\n\
         - solution: Detailed resolution steps (if applicable, else \"Review logs for further investigation.\").\n\n\
         Return only the JSON object."
    )
}

fn insight_prompt(summaries: &[ClusterSummary]) -> String {
    let blocks: Vec<String> = summaries
        .iter()
        .map(|summary| {
            format!(
                "Cluster {} ({}):\n{}",
                summary.cluster_id,
                summary.title,
                sample_block(&summary.original_logs)
            )
        })
        .collect();
    let body = if blocks.is_empty() {
        "No logs available".to_string()
    } else {
        blocks.join("\n")
    };
    format!(
        "You are a professional log analyst. Analyze the following log clusters to identify \
         meaningful insights about the log file, such as critical issues, trends, anomalies, or \
         other significant observations. Select a variable number of logs from across the entire \
         file that provide valuable insight into system behavior or issues, and for each \
         selected log explain its significance and suggest concrete actions. Do not generate one \
         insight per cluster; select logs from across all clusters.\n\n\
         Log Clusters:\n{body}\n\n\
         Provide a JSON response as a list of objects, each containing:\n\
         - log: The specific log entry selected.\n\
         - explanation: A clear explanation of the significance of the log.\n\
         - suggestion: Specific actions to address or leverage the insight.\n\n\
         Return only the JSON list."
    )
}

fn sample_block(logs: &[String]) -> String {
    if logs.is_empty() {
        return "No logs available".to_string();
    }
    logs.iter()
        .take(SAMPLE_LOGS_PER_CLUSTER)
        .map(String::as_str)
        .collect::<Vec<&str>>()
        .join("\n")
}

struct ParsedSummary {
    title: String,
    summary: String,
    problem: String,
    solution: String,
}

// Accept/reject hinges on `summary` alone; the other three keys are
// defaulted independently when absent.
fn parse_summary_response(raw: &str, cluster_id: i32) -> Option<ParsedSummary> {
    let value: Value = serde_json::from_str(raw.trim()).ok()?;
    let summary = value.get("summary").and_then(Value::as_str)?;
    if summary.trim().chars().count() < SUMMARY_MIN_CHARS {
        return None;
    }
    let field = |key: &str, default: String| {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(default)
    };
    Some(ParsedSummary {
        title: field("cluster", format!("Cluster {cluster_id}")),
        summary: summary.to_string(),
        problem: field("problem", FALLBACK_PROBLEM.to_string()),
        solution: field("solution", FALLBACK_SOLUTION.to_string()),
    })
}

fn parse_insight_response(raw: &str) -> Option<Vec<InsightAlert>> {
    let value: Value = serde_json::from_str(raw.trim()).ok()?;
    let items = value.as_array()?;
    if items.is_empty() {
        return None;
    }
    let mut alerts = Vec::with_capacity(items.len());
    for item in items {
        let object = item.as_object()?;
        let field = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);
        alerts.push(InsightAlert {
            log: field("log")?,
            explanation: field("explanation")?,
            suggestion: field("suggestion")?,
        });
    }
    Some(alerts)
}
