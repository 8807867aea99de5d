use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use logsift_core::{analyze_entries, suggest_solutions, LogAnalysis, LogLine, Suggestion};

use crate::commands::write_json;
use crate::discover;
use crate::logging;

#[derive(Debug, Serialize)]
struct ScanMetadata {
    timestamp: String,
    search_term: String,
    log_directory: String,
    total_files_searched: usize,
    total_matches: usize,
}

#[derive(Debug, Serialize)]
struct ScanReport {
    metadata: ScanMetadata,
    matches: Vec<LogLine>,
    analysis: LogAnalysis,
    solutions: Vec<Suggestion>,
}

pub fn run(logs: String, term: String, output: Option<String>) -> Result<()> {
    let root = PathBuf::from(&logs);
    if !root.exists() {
        return Err(anyhow!("log path '{}' does not exist", root.display()));
    }
    let files = discover::find_log_files(&root);
    logging::info(format!("searching {} log files for '{term}'", files.len()));
    let matches = discover::collect_lines(&files, Some(&term));
    logging::info(format!("found {} matches", matches.len()));
    if logging::verbose_enabled() {
        for line in matches.iter().take(5) {
            logging::verbose(format!("  - {}", line.content));
        }
    }

    let analysis = analyze_entries(&matches);
    let solutions = suggest_solutions(&analysis);
    let report = ScanReport {
        metadata: ScanMetadata {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            search_term: term,
            log_directory: logs,
            total_files_searched: files.len(),
            total_matches: matches.len(),
        },
        matches,
        analysis,
        solutions,
    };
    match output {
        Some(path) => write_json(&report, &path)?,
        None => print_report(&report),
    }
    Ok(())
}

fn print_report(report: &ScanReport) {
    logging::info("--- Scan Summary ---");
    logging::info(format!("total matches: {}", report.analysis.total_entries));
    logging::info("severity distribution:");
    for (severity, count) in &report.analysis.severity_distribution {
        logging::info(format!("  - {severity}: {count}"));
    }
    if let Some(window) = &report.analysis.time_pattern {
        logging::info(format!(
            "time window: {} .. {} ({} stamped entries)",
            window.first_occurrence, window.last_occurrence, window.total_occurrences
        ));
    }
    if !report.analysis.error_patterns.is_empty() {
        logging::info("recurring error patterns:");
        for pattern in &report.analysis.error_patterns {
            logging::info(format!(
                "  {}x [{}] {}",
                pattern.count, pattern.component, pattern.pattern
            ));
        }
    }
    if report.solutions.is_empty() {
        logging::info("no suggested solutions");
    } else {
        logging::info("suggested solutions:");
        for (index, suggestion) in report.solutions.iter().enumerate() {
            logging::info(format!("  {}. {}", index + 1, suggestion.problem));
            logging::info(format!("     {}", suggestion.solution));
        }
    }
}
