//! Vega-Lite JSON files, one per chart: `<dir>/<target>.vl.json`.
//!
//! Each build replaces the previous one: `*.vl.json` files already in the
//! directory are removed before anything is written. Other files are left alone.

use std::fs;
use std::path::{Path, PathBuf};

use crate::chart::ChartSpec;
use crate::error::AppError;
use crate::render::{ChartRenderer, EmbedOptions, PageParts, check_target};

pub struct JsonDirRenderer {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl JsonDirRenderer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

}

const SPEC_SUFFIX: &str = ".vl.json";

/// Delete chart specs written by an earlier build.
fn remove_stale_specs(dir: &Path) -> Result<usize, AppError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| AppError::io(format!("Failed to list '{}': {e}", dir.display())))?;

    let mut removed = 0;
    for entry in entries {
        let path = entry
            .map_err(|e| AppError::io(format!("Failed to list '{}': {e}", dir.display())))?
            .path();
        let is_spec = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(SPEC_SUFFIX));
        if is_spec && path.is_file() {
            fs::remove_file(&path)
                .map_err(|e| AppError::io(format!("Failed to remove '{}': {e}", path.display())))?;
            removed += 1;
        }
    }
    Ok(removed)
}

impl ChartRenderer for JsonDirRenderer {
    /// Specs are plain files; the directory is created and emptied of old specs.
    fn ensure_available(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| AppError::io(format!("Failed to create '{}': {e}", self.dir.display())))?;
        let removed = remove_stale_specs(&self.dir)?;
        if removed > 0 {
            tracing::debug!(dir = %self.dir.display(), removed, "removed chart specs from a previous build");
        }
        Ok(())
    }

    fn embed(&mut self, target: &str, spec: &ChartSpec, _options: &EmbedOptions) -> Result<(), AppError> {
        check_target(target)?;
        let path = self.dir.join(format!("{target}{SPEC_SUFFIX}"));
        if self.written.contains(&path) {
            return Err(AppError::render(format!("Chart target `{target}` is already in use.")));
        }
        let text = serde_json::to_string_pretty(spec)
            .map_err(|e| AppError::render(format!("Failed to serialize chart `{target}`: {e}")))?;
        fs::write(&path, text)
            .map_err(|e| AppError::io(format!("Failed to write '{}': {e}", path.display())))?;
        self.written.push(path);
        Ok(())
    }

    fn finish(&mut self, _page: &PageParts) -> Result<PathBuf, AppError> {
        tracing::info!(dir = %self.dir.display(), files = self.written.len(), "wrote chart specs");
        Ok(self.dir.clone())
    }
}
