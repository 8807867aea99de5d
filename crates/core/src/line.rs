use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A raw log line with its optional origin. Immutable once read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogLine {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<usize>,
}

impl LogLine {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: None,
            line_number: None,
        }
    }

    pub fn located(content: impl Into<String>, source: PathBuf, line_number: usize) -> Self {
        Self {
            content: content.into(),
            source: Some(source),
            line_number: Some(line_number),
        }
    }
}

static TIMESTAMP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2})").unwrap());
static SEVERITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(ERROR|INFO|WARNING|DEBUG|CRITICAL|WARN|FATAL)\b").unwrap()
});
static COMPONENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[([^\]]+)\]|^([^:]+):").unwrap());

pub const UNKNOWN_SEVERITY: &str = "UNKNOWN";

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEntry {
    pub timestamp: Option<String>,
    pub severity: String,
    pub component: Option<String>,
    pub message: String,
}

/// Splits a raw line into timestamp, severity, component and message.
/// Severity defaults to UNKNOWN; the component is recognized either as
/// `[name]` or as a `name:` prefix of the text following the severity.
pub fn parse_entry(line: &str) -> ParsedEntry {
    let timestamp_match = TIMESTAMP_RE.find(line);
    let timestamp = timestamp_match.map(|m| m.as_str().to_string());
    let severity_match = SEVERITY_RE.find(line);
    let severity = severity_match
        .map(|m| m.as_str().to_uppercase())
        .unwrap_or_else(|| UNKNOWN_SEVERITY.to_string());
    let remainder = match timestamp_match {
        Some(m) => line[m.end()..].trim(),
        None => line,
    };
    let Some(sev) = severity_match else {
        return ParsedEntry {
            timestamp,
            severity,
            component: None,
            message: remainder.to_string(),
        };
    };
    let component_msg = remainder.replacen(sev.as_str(), "", 1).trim().to_string();
    match COMPONENT_RE.captures(&component_msg) {
        Some(caps) => {
            let component = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str().trim().to_string());
            let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
            ParsedEntry {
                timestamp,
                severity,
                component,
                message: component_msg[end..].trim().to_string(),
            }
        }
        None => ParsedEntry {
            timestamp,
            severity,
            component: None,
            message: component_msg,
        },
    }
}
