//! Snapshot storage for project states
//!
//! Snapshots live under `states/project=<number>/<unix-ts>.json`, one
//! pretty-printed JSON document per capture. Writes are atomic (temp file
//! plus rename) with an exclusive lock held while writing.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use fs2::FileExt;
use thiserror::Error;

use crate::domain::ProjectState;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no snapshots found for project {0}")]
    NoSnapshots(u32),

    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// Store for captured project states
pub struct StateStore {
    base_dir: PathBuf,
}

impl StateStore {
    /// Creates a store rooted at the given directory
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Returns the store's base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn project_dir(&self, project_number: u32) -> PathBuf {
        self.base_dir
            .join("states")
            .join(format!("project={}", project_number))
    }

    /// Saves a state, returning the path it was written to
    pub fn save(&self, state: &ProjectState) -> Result<PathBuf> {
        validate_state(state)?;

        let project_dir = self.project_dir(state.project_number);
        fs::create_dir_all(&project_dir)
            .with_context(|| format!("Failed to create directory: {}", project_dir.display()))?;

        let path = project_dir.join(format!("{}.json", state.timestamp.timestamp()));
        let temp_path = path.with_extension("json.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .context("Failed to acquire write lock on snapshot")?;

            let mut writer = BufWriter::new(&file);
            serde_json::to_writer_pretty(&mut writer, state)
                .context("Failed to serialize state")?;
            writer.flush().context("Failed to flush snapshot")?;
        }

        fs::rename(&temp_path, &path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                path.display()
            )
        })?;

        Ok(path)
    }

    /// Loads the snapshot nearest to the given timestamp
    pub fn load_nearest(&self, project_number: u32, at: DateTime<Utc>) -> Result<ProjectState> {
        let path = self.find_nearest(project_number, at)?;
        self.load_file(&path)
    }

    /// Finds the snapshot file nearest to the given timestamp
    pub fn find_nearest(&self, project_number: u32, at: DateTime<Utc>) -> Result<PathBuf> {
        let project_dir = self.project_dir(project_number);

        let mut candidates: Vec<(DateTime<Utc>, PathBuf)> = Vec::new();
        if project_dir.is_dir() {
            let entries = fs::read_dir(&project_dir).with_context(|| {
                format!("Failed to read project directory: {}", project_dir.display())
            })?;

            for entry in entries {
                let entry = entry.context("Failed to read directory entry")?;
                let path = entry.path();
                if let Some(timestamp) = snapshot_timestamp(&path) {
                    candidates.push((timestamp, path));
                }
            }
        }

        candidates
            .into_iter()
            .min_by_key(|(timestamp, _)| (at - *timestamp).num_seconds().abs())
            .map(|(_, path)| path)
            .ok_or_else(|| StoreError::NoSnapshots(project_number).into())
    }

    /// Lists all snapshots for a project, oldest first
    pub fn list(&self, project_number: u32) -> Result<Vec<(DateTime<Utc>, PathBuf)>> {
        let project_dir = self.project_dir(project_number);
        if !project_dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&project_dir).with_context(|| {
            format!("Failed to read project directory: {}", project_dir.display())
        })?;

        let mut snapshots: Vec<(DateTime<Utc>, PathBuf)> = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            if let Some(timestamp) = snapshot_timestamp(&path) {
                snapshots.push((timestamp, path));
            }
        }

        snapshots.sort_by_key(|(timestamp, _)| *timestamp);
        Ok(snapshots)
    }

    /// Loads a state from a specific file
    pub fn load_file(&self, path: &Path) -> Result<ProjectState> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open snapshot: {}", path.display()))?;

        file.lock_shared()
            .context("Failed to acquire read lock on snapshot")?;

        let reader = BufReader::new(&file);
        let mut state: ProjectState = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse snapshot: {}", path.display()))?;
        state.filename = path.display().to_string();

        Ok(state)
    }
}

/// Extracts the capture timestamp from a snapshot filename
fn snapshot_timestamp(path: &Path) -> Option<DateTime<Utc>> {
    if path.extension().map_or(true, |ext| ext != "json") {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let unix: i64 = stem.parse().ok()?;
    Utc.timestamp_opt(unix, 0).single()
}

fn validate_state(state: &ProjectState) -> Result<(), StoreError> {
    if state.project_number == 0 {
        return Err(StoreError::InvalidState(
            "project number is required".to_string(),
        ));
    }

    let mut seen = std::collections::HashSet::new();
    for (index, item) in state.items.iter().enumerate() {
        if item.id.is_empty() {
            return Err(StoreError::InvalidState(format!(
                "item {}: ID is required",
                index
            )));
        }
        if !seen.insert(item.id.as_str()) {
            return Err(StoreError::InvalidState(format!(
                "item {}: duplicate ID '{}'",
                index, item.id
            )));
        }
        if item.title().is_empty() {
            return Err(StoreError::InvalidState(format!(
                "item {}: title is required",
                index
            )));
        }
    }

    Ok(())
}
