use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::line::{parse_entry, LogLine};

static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[a-f0-9]{8}(?:-[a-f0-9]{4}){3}-[a-f0-9]{12}\b").unwrap()
});
static NUM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

const TOP_PATTERNS: usize = 10;
const MIN_PATTERN_CHARS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimePattern {
    pub first_occurrence: String,
    pub last_occurrence: String,
    pub total_occurrences: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPattern {
    pub component: String,
    pub pattern: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogAnalysis {
    pub total_entries: usize,
    pub severity_distribution: BTreeMap<String, usize>,
    pub components: BTreeMap<String, usize>,
    pub time_pattern: Option<TimePattern>,
    pub error_patterns: Vec<ErrorPattern>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub problem: String,
    pub solution: String,
}

/// Aggregates parsed entries into severity/component distributions, the
/// observed time window, and the top recurring error patterns. Volatile
/// fragments (UUIDs, numbers) are templated so repeats collapse.
pub fn analyze_entries(lines: &[LogLine]) -> LogAnalysis {
    let mut severities: BTreeMap<String, usize> = BTreeMap::new();
    let mut components: BTreeMap<String, usize> = BTreeMap::new();
    let mut errors_by_component: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut timestamps: Vec<String> = Vec::new();
    for line in lines {
        let parsed = parse_entry(&line.content);
        *severities.entry(parsed.severity.clone()).or_insert(0) += 1;
        if let Some(component) = &parsed.component {
            *components.entry(component.clone()).or_insert(0) += 1;
            if matches!(parsed.severity.as_str(), "ERROR" | "CRITICAL" | "FATAL") {
                errors_by_component
                    .entry(component.clone())
                    .or_default()
                    .push(parsed.message.clone());
            }
        }
        if let Some(timestamp) = parsed.timestamp {
            timestamps.push(timestamp);
        }
    }
    timestamps.sort();
    let time_pattern = match (timestamps.first(), timestamps.last()) {
        (Some(first), Some(last)) => Some(TimePattern {
            first_occurrence: first.clone(),
            last_occurrence: last.clone(),
            total_occurrences: timestamps.len(),
        }),
        _ => None,
    };

    let mut pattern_counts: BTreeMap<(String, String), usize> = BTreeMap::new();
    for (component, errors) in &errors_by_component {
        for error in errors {
            if error.len() <= MIN_PATTERN_CHARS {
                continue;
            }
            let templated = UUID_RE.replace_all(error, "<ID>");
            let templated = NUM_RE.replace_all(&templated, "<NUM>").into_owned();
            *pattern_counts
                .entry((component.clone(), templated))
                .or_insert(0) += 1;
        }
    }
    let mut error_patterns: Vec<ErrorPattern> = pattern_counts
        .into_iter()
        .map(|((component, pattern), count)| ErrorPattern {
            component,
            pattern,
            count,
        })
        .collect();
    error_patterns.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.pattern.cmp(&b.pattern)));
    error_patterns.truncate(TOP_PATTERNS);

    LogAnalysis {
        total_entries: lines.len(),
        severity_distribution: severities,
        components,
        time_pattern,
        error_patterns,
    }
}

/// Keyword heuristics over the recurring error patterns. Falls back to a
/// most-common-component suggestion when nothing specific matches.
pub fn suggest_solutions(analysis: &LogAnalysis) -> Vec<Suggestion> {
    let patterns: Vec<String> = analysis
        .error_patterns
        .iter()
        .map(|p| p.pattern.to_lowercase())
        .collect();
    let mentions =
        |keywords: &[&str]| patterns.iter().any(|p| keywords.iter().any(|k| p.contains(k)));

    let mut suggestions = Vec::new();
    if mentions(&["connection", "timeout", "connect"]) {
        suggestions.push(Suggestion {
            problem: "Connection issues".to_string(),
            solution: "Check network connectivity between services and verify that all \
                       dependent services are running. Look for firewall or DNS issues."
                .to_string(),
        });
    }
    if mentions(&["permission", "access", "denied"]) {
        suggestions.push(Suggestion {
            problem: "Permission issues".to_string(),
            solution: "Verify file and resource permissions. Check that service accounts \
                       have the necessary access rights."
                .to_string(),
        });
    }
    if mentions(&["memory", "cpu", "capacity", "full"]) {
        suggestions.push(Suggestion {
            problem: "Resource constraints".to_string(),
            solution: "Check system resources (memory, CPU, disk space). Consider scaling \
                       up infrastructure or optimizing resource usage."
                .to_string(),
        });
    }
    if mentions(&["database", "db", "sql", "query"]) {
        suggestions.push(Suggestion {
            problem: "Database issues".to_string(),
            solution: "Check database connectivity, query performance, and database logs. \
                       Verify that database indices are properly set up."
                .to_string(),
        });
    }
    if suggestions.is_empty() && analysis.total_entries > 0 {
        let most_common = analysis
            .components
            .iter()
            .max_by_key(|(_, count)| **count)
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| "unknown".to_string());
        suggestions.push(Suggestion {
            problem: format!("Multiple errors in {most_common} component"),
            solution: format!(
                "Review the {most_common} component logs in detail and check recent code \
                 changes or configuration updates to this component."
            ),
        });
    }
    suggestions
}
