use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::aggregate::Cluster;
use crate::error::{Result, SiftError};

/// File-level contract between the clustering stage and the summarization
/// stage: a JSON array of these records, ascending by `cluster_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterExport {
    pub cluster_id: i32,
    pub log_count: usize,
    pub logs: Vec<String>,
}

impl From<&Cluster> for ClusterExport {
    fn from(cluster: &Cluster) -> Self {
        Self {
            cluster_id: cluster.id,
            log_count: cluster.count,
            logs: cluster
                .members
                .iter()
                .map(|member| member.content.clone())
                .collect(),
        }
    }
}

pub fn write_clusters(path: &Path, clusters: &[Cluster]) -> Result<()> {
    let records: Vec<ClusterExport> = clusters.iter().map(ClusterExport::from).collect();
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &records)?;
    Ok(())
}

pub fn read_clusters(path: &Path) -> Result<Vec<ClusterExport>> {
    let file = File::open(path)?;
    let mut records: Vec<ClusterExport> = serde_json::from_reader(BufReader::new(file))?;
    for record in &records {
        if record.log_count != record.logs.len() {
            return Err(SiftError::InvalidInterchange(
                "log_count does not match number of logs",
            ));
        }
    }
    records.sort_by_key(|record| record.cluster_id);
    Ok(records)
}
