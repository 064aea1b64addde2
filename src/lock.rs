//! Single-flight guard for a run
//!
//! The settings file is read at start and may be rewritten on token refresh.
//! Overlapping runs must not both do that, so a run holds an exclusive lock
//! file for its whole duration.

use crate::error::{Result, StromprisError};
use crate::logging::get_logger;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Exclusive lock file, removed on drop
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    /// Lock file path used for a settings file
    pub fn path_for(settings_path: &Path) -> PathBuf {
        let mut name = settings_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "settings".into());
        name.push(".lock");
        settings_path.with_file_name(name)
    }

    /// Take the lock, replacing one older than `stale_after`
    pub fn acquire(path: &Path, stale_after: Duration) -> Result<Self> {
        let logger = get_logger("lock");
        match Self::create(path) {
            Ok(lock) => Ok(lock),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                if Self::is_stale(path, stale_after) {
                    logger.warn(&format!("Taking over stale lock {}", path.display()));
                    Self::take_over(path, stale_after)
                } else {
                    Err(Self::held(path))
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn create(path: &Path) -> std::io::Result<Self> {
        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        if let Err(e) = writeln!(file, "{}", std::process::id()) {
            drop(file);
            let _ = std::fs::remove_file(path);
            return Err(e);
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Replace a stale lock.
    ///
    /// The stale file is first renamed to a name private to this process.
    /// Only one contender can win that rename; everyone else falls through to
    /// `create_new`, which admits exactly one holder.
    fn take_over(path: &Path, stale_after: Duration) -> Result<Self> {
        let claimed = Self::claim_path(path);
        match std::fs::rename(path, &claimed) {
            Ok(()) => {
                if !Self::is_stale(&claimed, stale_after) {
                    // another run replaced the lock after our check; hand it back
                    if let Err(e) = std::fs::rename(&claimed, path) {
                        get_logger("lock").error(&format!(
                            "Could not restore lock {}: {}",
                            path.display(),
                            e
                        ));
                    }
                    return Err(Self::held(path));
                }
                std::fs::remove_file(&claimed)?;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Self::create(path).map_err(|e| Self::contended(path, &e))
    }

    fn claim_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(format!(".stale.{}", std::process::id()));
        path.with_file_name(name)
    }

    fn held(path: &Path) -> StromprisError {
        StromprisError::locked(format!("{} is held by another run", path.display()))
    }

    fn contended(path: &Path, err: &std::io::Error) -> StromprisError {
        if err.kind() == std::io::ErrorKind::AlreadyExists {
            Self::held(path)
        } else {
            StromprisError::io(err.to_string())
        }
    }

    fn is_stale(path: &Path, stale_after: Duration) -> bool {
        std::fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| SystemTime::now().duration_since(modified).ok())
            .is_some_and(|age| age > stale_after)
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
