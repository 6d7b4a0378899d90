use crate::planner::{BatchPlan, BatchStats, PlanEntry};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    Dry,
    Apply,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Previewed,
    Applied,
    Unchanged,
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub source_name: String,
    pub destination_name: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub status: OutcomeStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub mode: ExecutionMode,
    pub outcomes: Vec<BatchOutcome>,
    pub applied: usize,
    pub failed: usize,
    pub no_matches: bool,
    pub stats: BatchStats,
}

pub fn execute_plan(plan: &BatchPlan, mode: ExecutionMode) -> Result<BatchReport> {
    if plan.entries.is_empty() {
        return Ok(BatchReport {
            mode,
            outcomes: Vec::new(),
            applied: 0,
            failed: 0,
            no_matches: true,
            stats: plan.stats.clone(),
        });
    }

    if mode == ExecutionMode::Apply {
        if let Some(dest_dir) = plan.dest_dir.as_deref() {
            fs::create_dir_all(dest_dir).with_context(|| {
                format!(
                    "移動先フォルダを作成できませんでした: {}",
                    dest_dir.display()
                )
            })?;
        }
    }

    let mut outcomes = Vec::with_capacity(plan.entries.len());
    let mut applied = 0usize;
    let mut failed = 0usize;

    for entry in &plan.entries {
        let status = if !entry.changed {
            OutcomeStatus::Unchanged
        } else {
            match mode {
                ExecutionMode::Dry => OutcomeStatus::Previewed,
                ExecutionMode::Apply => match rename_entry(entry) {
                    Ok(()) => {
                        applied += 1;
                        OutcomeStatus::Applied
                    }
                    Err(err) => {
                        failed += 1;
                        OutcomeStatus::Failed {
                            message: format!("{:#}", err),
                        }
                    }
                },
            }
        };

        outcomes.push(BatchOutcome {
            source_name: entry.source.name.clone(),
            destination_name: entry.destination_name.clone(),
            source: entry.source.path.clone(),
            destination: entry.destination.clone(),
            status,
        });
    }

    Ok(BatchReport {
        mode,
        outcomes,
        applied,
        failed,
        no_matches: false,
        stats: plan.stats.clone(),
    })
}

fn rename_entry(entry: &PlanEntry) -> Result<()> {
    if entry.destination.exists() {
        anyhow::bail!("移動先が既に存在します: {}", entry.destination.display());
    }
    fs::rename(&entry.source.path, &entry.destination).with_context(|| {
        format!(
            "リネームに失敗しました: {} -> {}",
            entry.source.path.display(),
            entry.destination.display()
        )
    })?;
    Ok(())
}
