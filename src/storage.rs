// File: ./src/storage.rs
// Persists the task and event stores to a single JSON file.
//
// Changes to Task, CalendarEvent or their nested types require bumping
// WORKSPACE_VERSION below.
use crate::context::AppContext;
use crate::store::{EventStore, TaskStore};
use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// Version history:
// - v1: tasks and events with uuid task ids and numeric event ids
const WORKSPACE_VERSION: u32 = 1;

/// Everything the assistant edits, saved as one snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    pub tasks: TaskStore,
    #[serde(default)]
    pub events: EventStore,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            version: WORKSPACE_VERSION,
            ..Self::default()
        }
    }

    /// Loads the workspace. A missing file yields an empty one; an unreadable
    /// file is an error so a later save cannot clobber it.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_workspace_path()?;
        LocalStorage::load_json(&path)
    }

    pub fn save(&mut self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_workspace_path()?;
        self.version = WORKSPACE_VERSION;
        LocalStorage::save_json(&path, self)
    }
}

pub struct LocalStorage;

impl LocalStorage {
    /// Sidecar lock file path, e.g. `workspace.json.lock`.
    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = lock_path.extension() {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".lock");
            lock_path.set_extension(new_ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    /// Runs `f` while holding an exclusive lock on the sidecar lock file.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file {:?}", lock_path))?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    /// Atomic write: write to a .tmp file then rename over the target.
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    fn load_json(path: &Path) -> Result<Workspace> {
        if !path.exists() {
            return Ok(Workspace::new());
        }
        Self::with_lock(path, || {
            let json = fs::read_to_string(path)?;
            let data: Workspace = serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse workspace file {:?}", path))?;
            if data.version > WORKSPACE_VERSION {
                log::warn!(
                    "Workspace {:?} was written by a newer version (v{} > v{})",
                    path,
                    data.version,
                    WORKSPACE_VERSION
                );
            }
            log::debug!(
                "Loaded {} tasks and {} events from {:?}",
                data.tasks.len(),
                data.events.len(),
                path
            );
            Ok(data)
        })
    }

    fn save_json(path: &Path, data: &Workspace) -> Result<()> {
        Self::with_lock(path, || {
            let json = serde_json::to_string_pretty(data)?;
            Self::atomic_write(path, json)?;
            Ok(())
        })
    }
}
