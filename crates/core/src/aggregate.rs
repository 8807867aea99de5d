use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cluster::NOISE_LABEL;
use crate::error::{Result, SiftError};
use crate::line::LogLine;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    pub id: i32,
    pub members: Vec<LogLine>,
    pub count: usize,
}

/// Partitions lines by cluster label. Every line lands in exactly one
/// bucket; the noise bucket is always materialized, even when empty, so
/// it is never dropped silently downstream.
pub fn group(lines: Vec<LogLine>, labels: &[i32]) -> Result<BTreeMap<i32, Vec<LogLine>>> {
    if lines.len() != labels.len() {
        return Err(SiftError::PartitionMismatch {
            context: "cluster labels",
            expected: lines.len(),
            actual: labels.len(),
        });
    }
    let mut groups: BTreeMap<i32, Vec<LogLine>> = BTreeMap::new();
    groups.insert(NOISE_LABEL, Vec::new());
    for (line, label) in lines.into_iter().zip(labels.iter()) {
        groups.entry(*label).or_default().push(line);
    }
    Ok(groups)
}

/// Flattens grouped lines into `Cluster` records sorted by ascending id,
/// noise (-1) first.
pub fn export(groups: BTreeMap<i32, Vec<LogLine>>) -> Vec<Cluster> {
    groups
        .into_iter()
        .map(|(id, members)| {
            let count = members.len();
            Cluster { id, members, count }
        })
        .collect()
}
