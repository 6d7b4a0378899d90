use crate::apply::{ExecutionMode, OutcomeStatus};
use crate::rules::RuleError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CreateOptions {
    pub directory: PathBuf,
    pub extensions: Vec<String>,
    pub count: usize,
    pub start: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlan {
    pub directory: PathBuf,
    pub file_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOutcome {
    pub name: String,
    pub path: PathBuf,
    pub status: OutcomeStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReport {
    pub mode: ExecutionMode,
    pub outcomes: Vec<CreateOutcome>,
    pub created: usize,
    pub failed: usize,
}

pub fn plan_creations(options: &CreateOptions) -> Result<CreatePlan, RuleError> {
    let mut extensions = Vec::new();
    let mut seen = HashSet::new();
    for raw in &options.extensions {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let normalized = if trimmed.starts_with('.') {
            trimmed.to_string()
        } else {
            format!(".{trimmed}")
        };
        if seen.insert(normalized.clone()) {
            extensions.push(normalized);
        }
    }
    if extensions.is_empty() {
        return Err(RuleError::EmptyExtensions);
    }

    let end = options
        .start
        .checked_add(options.count)
        .ok_or(RuleError::CounterOverflow {
            start: options.start,
            count: options.count,
        })?;

    let mut file_names = Vec::new();
    for extension in &extensions {
        for index in options.start..end {
            file_names.push(format!("file{}{}", index, extension));
        }
    }

    Ok(CreatePlan {
        directory: options.directory.clone(),
        file_names,
    })
}

pub fn execute_creations(plan: &CreatePlan, mode: ExecutionMode) -> Result<CreateReport> {
    if mode == ExecutionMode::Apply {
        fs::create_dir_all(&plan.directory).with_context(|| {
            format!(
                "フォルダを作成できませんでした: {}",
                plan.directory.display()
            )
        })?;
    }

    let mut outcomes = Vec::with_capacity(plan.file_names.len());
    let mut created = 0usize;
    let mut failed = 0usize;

    for name in &plan.file_names {
        let path = plan.directory.join(name);
        let status = match mode {
            ExecutionMode::Dry => OutcomeStatus::Previewed,
            ExecutionMode::Apply => match create_placeholder(&path) {
                Ok(()) => {
                    created += 1;
                    OutcomeStatus::Applied
                }
                Err(err) => {
                    failed += 1;
                    OutcomeStatus::Failed {
                        message: format!("{:#}", err),
                    }
                }
            },
        };

        outcomes.push(CreateOutcome {
            name: name.clone(),
            path,
            status,
        });
    }

    Ok(CreateReport {
        mode,
        outcomes,
        created,
        failed,
    })
}

fn create_placeholder(path: &Path) -> Result<()> {
    File::create(path)
        .with_context(|| format!("ファイルを作成できませんでした: {}", path.display()))?;
    Ok(())
}
