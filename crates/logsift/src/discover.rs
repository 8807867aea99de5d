use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use logsift_core::LogLine;

use crate::logging;

const MAX_LOG_FILES: usize = 100;

/// Walks a directory for `.log` files, bounded at `MAX_LOG_FILES`. A path
/// that is already a file is returned as-is regardless of extension.
pub fn find_log_files(root: &Path) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if files.len() >= MAX_LOG_FILES {
            break;
        }
        let path = entry.path();
        if path.is_file() && path.extension().map(|ext| ext == "log").unwrap_or(false) {
            files.push(path.to_path_buf());
        }
    }
    files
}

/// Reads one file into located lines, lossy on encoding, skipping blanks.
pub fn load_lines(path: &Path) -> Result<Vec<LogLine>> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| LogLine::located(line.trim(), path.to_path_buf(), index + 1))
        .collect())
}

/// Loads every file, optionally keeping only lines that contain `term`
/// case-insensitively. Unreadable files are logged and skipped so one bad
/// file never sinks the run.
pub fn collect_lines(files: &[PathBuf], term: Option<&str>) -> Vec<LogLine> {
    let needle = term.map(str::to_lowercase);
    let mut lines = Vec::new();
    for file in files {
        let loaded = match load_lines(file) {
            Ok(loaded) => loaded,
            Err(err) => {
                logging::stage("discover", format!("skipping unreadable file: {err:#}"));
                continue;
            }
        };
        match &needle {
            Some(needle) => lines.extend(
                loaded
                    .into_iter()
                    .filter(|line| line.content.to_lowercase().contains(needle)),
            ),
            None => lines.extend(loaded),
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn finds_only_log_files_recursively() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("app.log"), "a\n").unwrap();
        fs::write(dir.path().join("nested/worker.log"), "b\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "c\n").unwrap();
        let mut found = find_log_files(dir.path());
        found.sort();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.extension().unwrap() == "log"));
    }

    #[test]
    fn file_path_is_used_directly() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.txt");
        fs::write(&path, "line\n").unwrap();
        assert_eq!(find_log_files(&path), vec![path]);
    }

    #[test]
    fn load_lines_skips_blank_lines_and_numbers_from_one() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "first\n\n  \nsecond\n").unwrap();
        let lines = load_lines(&path).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].content, "first");
        assert_eq!(lines[0].line_number, Some(1));
        assert_eq!(lines[1].content, "second");
        assert_eq!(lines[1].line_number, Some(4));
    }

    #[test]
    fn term_filter_is_case_insensitive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "ERROR one\ninfo two\nError three\n").unwrap();
        let lines = collect_lines(&[path], Some("error"));
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.content.to_lowercase().contains("error")));
    }

    #[test]
    fn missing_files_are_skipped() {
        let lines = collect_lines(&[PathBuf::from("/nonexistent/x.log")], None);
        assert!(lines.is_empty());
    }
}
