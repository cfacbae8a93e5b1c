//! Run-artifact writer: one directory per run, one JSON Lines file per
//! platform table, plus a manifest describing what was written.
//!
//! Order rows nest line items, so the on-disk format is JSON Lines rather
//! than a flat columnar file.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::{FormatError, PlatformTables};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableArtifact {
    pub platform: String,
    pub table: String,
    pub rows: u64,
    pub bytes: u64,
    pub file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: String,
    pub created_at: String,
    pub tables: Vec<TableArtifact>,
    pub bytes_written: u64,
    pub duration_ms: u64,
}

/// Where one run's artifacts landed.
#[derive(Debug, Clone)]
pub struct WriteResult {
    pub run_dir: PathBuf,
    pub manifest: RunManifest,
}

/// Writes a formatted dataset under `out_dir/<timestamp>__run_<uuid>/`.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    out_dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn write(
        &self,
        dataset: &std::collections::BTreeMap<String, PlatformTables>,
    ) -> Result<WriteResult, FormatError> {
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now();
        let timestamp = created_at.format("%Y-%m-%dT%H-%M-%SZ").to_string();
        let run_dir = self.out_dir.join(format!("{timestamp}__run_{run_id}"));
        std::fs::create_dir_all(&run_dir)?;

        info!(
            run_id = %run_id,
            platforms = dataset.len(),
            "artifact write started"
        );

        let mut tables = Vec::new();
        let mut bytes_written = 0_u64;
        for (platform, platform_tables) in dataset {
            for (table, rows) in platform_tables {
                let file = format!("{platform}.{table}.jsonl");
                let bytes = write_jsonl(&run_dir.join(&file), rows)?;
                bytes_written += bytes;
                tables.push(TableArtifact {
                    platform: platform.clone(),
                    table: table.clone(),
                    rows: rows.len() as u64,
                    bytes,
                    file,
                });
            }
        }

        let manifest = RunManifest {
            run_id: run_id.clone(),
            created_at: created_at.to_rfc3339(),
            tables,
            bytes_written,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        std::fs::write(
            run_dir.join("run_manifest.json"),
            serde_json::to_vec_pretty(&manifest)?,
        )?;

        info!(
            run_id = %run_id,
            tables = manifest.tables.len(),
            bytes_written = manifest.bytes_written,
            duration_ms = manifest.duration_ms,
            "artifact write completed"
        );

        Ok(WriteResult { run_dir, manifest })
    }
}

fn write_jsonl(path: &Path, rows: &[Value]) -> Result<u64, FormatError> {
    let mut writer = BufWriter::new(std::fs::File::create(path)?);
    let mut bytes = 0_u64;
    for row in rows {
        let line = serde_json::to_vec(row)?;
        writer.write_all(&line)?;
        writer.write_all(b"\n")?;
        bytes += line.len() as u64 + 1;
    }
    writer.flush()?;
    Ok(bytes)
}
