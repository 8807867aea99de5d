use std::env;
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn init(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
    if enabled {
        info("verbose logging enabled");
    }
}

pub fn verbose_enabled() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

pub fn info(message: impl AsRef<str>) {
    eprintln!("[logsift] {}", message.as_ref());
}

pub fn stage(stage: &str, message: impl AsRef<str>) {
    eprintln!("[logsift::{}] {}", stage, message.as_ref());
}

pub fn verbose(message: impl AsRef<str>) {
    if verbose_enabled() {
        eprintln!("[logsift::verbose] {}", message.as_ref());
    }
}

pub fn env_flag() -> bool {
    env::var("LOGSIFT_VERBOSE")
        .map(|value| parse_bool(value.trim()))
        .unwrap_or(false)
}

/// Installs a debug-level tracing subscriber so the engine's prompt dumps
/// become visible. Safe to call more than once.
pub fn init_debug_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .with_target(false)
        .try_init();
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_spellings_parse_as_true() {
        for raw in ["1", "true", "YES", " on "] {
            assert!(parse_bool(raw), "{raw} should be truthy");
        }
        for raw in ["0", "false", "off", ""] {
            assert!(!parse_bool(raw), "{raw} should be falsy");
        }
    }
}
