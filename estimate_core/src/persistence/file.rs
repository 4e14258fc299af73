//! # File Snapshot Store
//!
//! Persists an estimate as a `.est` JSON file with:
//! - **Atomic saves**: write to `.est.tmp`, fsync, rename over the target
//! - **File locking**: a `.est.lock` file held for the duration of a save,
//!   so two processes (or two people on a shared drive) cannot interleave
//! - **Version validation**: snapshots from a newer schema are refused
//!
//! ## Example
//!
//! ```rust,no_run
//! use estimate_core::persistence::{FileSnapshotStore, SnapshotStore};
//! use estimate_core::store::EstimateStore;
//! use estimate_core::settings::EstimatorSettings;
//!
//! let mut adapter = FileSnapshotStore::new("estimate.est", "sales@gryphon.example");
//! let mut store = EstimateStore::new(&EstimatorSettings::default());
//!
//! store.load_estimate(&adapter)?;
//! store.save_estimate(&mut adapter)?;
//! # Ok::<(), estimate_core::errors::EstimateError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use super::{EstimateSnapshot, SnapshotStore};
use crate::errors::{EstimateError, EstimateResult};

/// Lock files older than this are taken over whoever holds them
const STALE_LOCK_HOURS: i64 = 24;

/// Who is saving: the JSON body of a `.est.lock` file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LockHolder {
    user_id: String,
    machine: String,
    pid: u32,
    locked_at: DateTime<Utc>,
}

impl LockHolder {
    fn current(user_id: &str) -> Self {
        LockHolder {
            user_id: user_id.to_string(),
            machine: machine_name(),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// Over a day old, or left behind by a process that has exited on this machine.
    fn is_stale(&self) -> bool {
        if Utc::now() - self.locked_at > Duration::hours(STALE_LOCK_HOURS) {
            return true;
        }
        self.machine == machine_name() && !process_alive(self.pid)
    }
}

fn machine_name() -> String {
    ["HOSTNAME", "HOST", "COMPUTERNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(target_os = "linux")]
fn process_alive(pid: u32) -> bool {
    Path::new("/proc").join(pid.to_string()).exists()
}

// No cheap liveness check here; only the age limit frees these locks.
#[cfg(not(target_os = "linux"))]
fn process_alive(_pid: u32) -> bool {
    true
}

/// The live holder recorded in `lock_path`. Missing, unreadable and stale
/// lock files all count as free.
fn live_holder(lock_path: &Path) -> Option<LockHolder> {
    let contents = fs::read_to_string(lock_path).ok()?;
    let holder: LockHolder = serde_json::from_str(&contents).ok()?;
    if holder.is_stale() {
        tracing::warn!(
            lock = %lock_path.display(),
            holder = %holder.user_id,
            locked_at = %holder.locked_at,
            "Taking over stale snapshot lock"
        );
        return None;
    }
    Some(holder)
}

/// Held for the duration of one save; removes the lock file on drop.
struct SaveLock {
    lock_path: PathBuf,
    _file: File,
}

impl SaveLock {
    fn acquire(snapshot_path: &Path, user_id: &str) -> EstimateResult<Self> {
        let lock_path = sibling_with_suffix(snapshot_path, "lock");
        let locked = |by: String, at: String| EstimateError::file_locked(snapshot_path.display().to_string(), by, at);

        if let Some(holder) = live_holder(&lock_path) {
            return Err(locked(
                format!("{} ({})", holder.user_id, holder.machine),
                holder.locked_at.to_rfc3339(),
            ));
        }

        let lock_error = |operation: &str, e: std::io::Error| {
            EstimateError::file_error(operation, lock_path.display().to_string(), e.to_string())
        };

        // Truncate only once the OS lock is ours, so a racing holder's record survives.
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| lock_error("create lock", e))?;
        file.try_lock_exclusive()
            .map_err(|_| locked("another process".to_string(), "unknown".to_string()))?;

        let record = serde_json::to_vec_pretty(&LockHolder::current(user_id))?;
        file.set_len(0).map_err(|e| lock_error("write lock", e))?;
        file.write_all(&record).map_err(|e| lock_error("write lock", e))?;
        file.sync_all().map_err(|e| lock_error("sync lock", e))?;

        Ok(SaveLock {
            lock_path,
            _file: file,
        })
    }
}

impl Drop for SaveLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// `estimate.est` + `lock` -> `estimate.est.lock`
fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut sibling = path.to_path_buf();
    let extension = sibling
        .extension()
        .map(|e| format!("{}.{}", e.to_string_lossy(), suffix))
        .unwrap_or_else(|| suffix.to_string());
    sibling.set_extension(extension);
    sibling
}

fn read_to_string(path: &Path, operation: &str) -> EstimateResult<String> {
    let mut file =
        File::open(path).map_err(|e| EstimateError::file_error(operation, path.display().to_string(), e.to_string()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| EstimateError::file_error(operation, path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

/// Write `contents` to `path` atomically: temp file, fsync, rename.
fn write_atomic(path: &Path, contents: &str) -> EstimateResult<()> {
    let tmp_path = sibling_with_suffix(path, "tmp");

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| EstimateError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .write_all(contents.as_bytes())
        .map_err(|e| EstimateError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .sync_all()
        .map_err(|e| EstimateError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        EstimateError::file_error("rename to final", path.display().to_string(), e.to_string())
    })
}

/// Snapshot adapter backed by a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
    user_id: String,
}

impl FileSnapshotStore {
    /// # Arguments
    ///
    /// * `path` - Snapshot file (conventionally `*.est`)
    /// * `user_id` - Recorded in the lock file while saving
    pub fn new(path: impl Into<PathBuf>, user_id: impl Into<String>) -> Self {
        FileSnapshotStore {
            path: path.into(),
            user_id: user_id.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> EstimateResult<Option<EstimateSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = read_to_string(&self.path, "read")?;
        EstimateSnapshot::from_json(&contents).map(Some)
    }

    fn save(&mut self, snapshot: &EstimateSnapshot) -> EstimateResult<()> {
        let json = snapshot.to_json()?;
        let _lock = SaveLock::acquire(&self.path, &self.user_id)?;
        write_atomic(&self.path, &json)
    }
}
