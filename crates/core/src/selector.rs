use crate::entry::DirectoryEntry;
use crate::planner::BatchStats;
use crate::rules::MatchRule;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn scan_directory(dir: &Path, stats: &mut BatchStats) -> Result<Vec<DirectoryEntry>> {
    let mut entries = Vec::new();

    for entry in
        fs::read_dir(dir).with_context(|| format!("フォルダを読めませんでした: {}", dir.display()))?
    {
        let entry = entry.with_context(|| format!("エントリ読み取り失敗: {}", dir.display()))?;
        let path = entry.path();
        stats.scanned_entries += 1;

        if !path.is_file() {
            stats.skipped_non_files += 1;
            continue;
        }
        if let Some(snapshot) = DirectoryEntry::from_path(&path) {
            entries.push(snapshot);
        }
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(entries)
}

pub fn select_entries(entries: &[DirectoryEntry], rule: &MatchRule) -> Vec<DirectoryEntry> {
    entries
        .iter()
        .filter(|entry| rule.matches(entry))
        .cloned()
        .collect()
}
