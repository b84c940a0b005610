use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Every failure EnvyControl can report. All of these abort the running
/// operation; non-fatal conditions are printed as warnings instead.
#[derive(Debug, Error)]
pub enum EnvyError {
    #[error("this operation requires root privileges")]
    NotRoot,

    #[error("provided graphics mode '{0}' is not valid\nSupported modes: integrated, hybrid, nvidia")]
    InvalidMode(String),

    #[error("provided display manager '{0}' is not valid\nSupported display managers: gdm, sddm, lightdm")]
    InvalidDisplayManager(String),

    #[error("this option is intended to be used with --switch nvidia\nExample: sudo envycontrol --switch nvidia --dm sddm")]
    DisplayManagerWithoutSwitch,

    #[error("could not find Intel or AMD iGPU")]
    IgpuNotFound,

    #[error("could not find Nvidia GPU\nTry switching to hybrid mode first!")]
    NvidiaGpuNotFound,

    #[error("failed to run {program}: {source}")]
    Command {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read answer: {0}")]
    Prompt(#[source] io::Error),

    #[error("failed to {action} {}: {source}", path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl EnvyError {
    pub(crate) fn fs(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        EnvyError::Filesystem {
            action,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, EnvyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_mode_lists_supported_modes() {
        let msg = EnvyError::InvalidMode("foo".into()).to_string();
        assert!(msg.contains("'foo'"));
        assert!(msg.contains("integrated, hybrid, nvidia"));
    }

    #[test]
    fn filesystem_error_names_the_path() {
        let err = EnvyError::fs(
            "remove",
            "/etc/X11/xorg.conf",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(err.to_string().starts_with("failed to remove /etc/X11/xorg.conf"));
    }
}
