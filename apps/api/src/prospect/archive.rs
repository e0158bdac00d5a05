//! Append-only JSON Lines log of completed searches, one file per company.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::prospect::models::ScoredProfile;

#[derive(Serialize)]
struct ArchiveRecord<'a> {
    timestamp: String,
    company: &'a str,
    profiles: &'a [ScoredProfile],
}

/// `{dir}/{Company_Name}.jsonl`, with spaces and path separators replaced.
pub fn archive_path(dir: &Path, company: &str) -> PathBuf {
    let stem: String = company
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c,
        })
        .collect();
    dir.join(format!("{stem}.jsonl"))
}

pub async fn append_results(dir: &Path, company: &str, profiles: &[ScoredProfile]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create results dir {}", dir.display()))?;

    let path = archive_path(dir, company);
    let mut line = serde_json::to_string(&ArchiveRecord {
        timestamp: Utc::now().to_rfc3339(),
        company,
        profiles,
    })?;
    line.push('\n');

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .await
        .with_context(|| format!("failed to open {}", path.display()))?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await?;
    Ok(path)
}
