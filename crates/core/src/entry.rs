use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub stem: String,
    pub extension: String,
    pub path: PathBuf,
}

impl DirectoryEntry {
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_string();
        let stem = path
            .file_stem()
            .map(|v| v.to_string_lossy().to_string())
            .unwrap_or_else(|| name.clone());
        let extension = path
            .extension()
            .map(|v| format!(".{}", v.to_string_lossy()))
            .unwrap_or_default();

        Some(Self {
            name,
            stem,
            extension,
            path: path.to_path_buf(),
        })
    }

    pub fn extension_key(&self) -> String {
        self.extension.trim_start_matches('.').to_ascii_lowercase()
    }
}
