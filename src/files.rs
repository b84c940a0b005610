//! Creation and removal of the files EnvyControl owns.

use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{EnvyError, Result};
use crate::paths::{Paths, SDDM_XSETUP_BACKUP_PATH, SDDM_XSETUP_PATH};
use crate::templates::{self, MANAGED_FILES};

/// Outcome of [`remove_if_exists`]. Failures other than a missing file are
/// returned as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    NotPresent,
}

/// Writes `content` to `path`, creating parent directories and replacing any
/// previous content.
pub fn create(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| EnvyError::fs("create directory", parent, err))?;
    }
    fs::write(path, content).map_err(|err| EnvyError::fs("write", path, err))?;
    debug!(path = %path.display(), "created file");
    Ok(())
}

pub fn remove_if_exists(path: &Path) -> Result<Removal> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed file");
            Ok(Removal::Removed)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Removal::NotPresent),
        Err(err) => Err(EnvyError::fs("remove", path, err)),
    }
}

/// Marks a generated script as executable (`0755`).
pub fn make_executable(path: &Path) -> Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .map_err(|err| EnvyError::fs("set permissions on", path, err))
}

/// Owns the managed file set below one root.
pub struct FileSet<'a> {
    paths: &'a Paths,
}

impl<'a> FileSet<'a> {
    pub fn new(paths: &'a Paths) -> Self {
        FileSet { paths }
    }

    /// Removes every file any mode may have written and puts SDDM's Xsetup
    /// back the way it was before nvidia mode. Safe to run repeatedly.
    pub fn cleanup(&self) -> Result<()> {
        let mut removed = 0;
        for file in MANAGED_FILES.iter() {
            if remove_if_exists(&self.paths.resolve(file.path))? == Removal::Removed {
                removed += 1;
            }
        }
        self.restore_xsetup()?;
        info!(removed, "cleaned up managed files");
        Ok(())
    }

    /// Copies the current Xsetup to its `.bak` sibling, if there is one.
    pub fn backup_xsetup(&self) -> Result<bool> {
        let xsetup = self.paths.resolve(SDDM_XSETUP_PATH);
        if !xsetup.exists() {
            return Ok(false);
        }
        let backup = self.paths.resolve(SDDM_XSETUP_BACKUP_PATH);
        fs::copy(&xsetup, &backup).map_err(|err| EnvyError::fs("back up", &xsetup, err))?;
        debug!(backup = %backup.display(), "backed up Xsetup");
        Ok(true)
    }

    /// Rewrites Xsetup from its backup and then drops the backup. Without a
    /// backup, an Xsetup we generated ourselves is removed; anything else is
    /// left alone.
    pub fn restore_xsetup(&self) -> Result<()> {
        let xsetup = self.paths.resolve(SDDM_XSETUP_PATH);
        let backup = self.paths.resolve(SDDM_XSETUP_BACKUP_PATH);

        match fs::read(&backup) {
            Ok(original) => {
                if let Some(parent) = xsetup.parent() {
                    fs::create_dir_all(parent)
                        .map_err(|err| EnvyError::fs("create directory", parent, err))?;
                }
                fs::write(&xsetup, original).map_err(|err| EnvyError::fs("restore", &xsetup, err))?;
                remove_if_exists(&backup)?;
                info!("restored Xsetup from backup");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let generated = fs::read_to_string(&xsetup)
                    .map(|content| templates::is_generated(&content))
                    .unwrap_or(false);
                if generated {
                    remove_if_exists(&xsetup)?;
                }
                Ok(())
            }
            Err(err) => Err(EnvyError::fs("read", &backup, err)),
        }
    }

    /// Replaces Xsetup with SDDM's stock script.
    pub fn reset_xsetup(&self) -> Result<()> {
        let xsetup = self.paths.resolve(SDDM_XSETUP_PATH);
        create(&xsetup, templates::SDDM_DEFAULT_XSETUP)?;
        make_executable(&xsetup)
    }
}
