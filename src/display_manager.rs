use std::fmt;
use std::fs;
use std::str::FromStr;

use tracing::debug;

use crate::error::{EnvyError, Result};
use crate::files::{self, FileSet};
use crate::hardware::IgpuVendor;
use crate::paths::{Paths, DISPLAY_MANAGER_SERVICE, SDDM_XSETUP_PATH};
use crate::templates::{self, managed_file, Artifact, RenderContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayManager {
    Unknown,
    Gdm,
    Sddm,
    LightDm,
}

impl DisplayManager {
    /// Maps a systemd unit or executable name onto a display manager.
    pub fn classify(name: &str) -> DisplayManager {
        match name {
            "gdm" | "gdm3" => DisplayManager::Gdm,
            "sddm" => DisplayManager::Sddm,
            "lightdm" => DisplayManager::LightDm,
            _ => DisplayManager::Unknown,
        }
    }
}

impl FromStr for DisplayManager {
    type Err = EnvyError;

    /// Parses a user supplied `--dm` value. Unlike [`DisplayManager::classify`]
    /// there is no unknown fallback.
    fn from_str(name: &str) -> Result<Self> {
        match DisplayManager::classify(&name.to_lowercase()) {
            DisplayManager::Unknown => Err(EnvyError::InvalidDisplayManager(name.to_string())),
            dm => Ok(dm),
        }
    }
}

impl fmt::Display for DisplayManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DisplayManager::Unknown => "",
            DisplayManager::Gdm => "gdm",
            DisplayManager::Sddm => "sddm",
            DisplayManager::LightDm => "lightdm",
        };
        f.write_str(name)
    }
}

/// Reads which display manager systemd starts. Never fails: anything that
/// goes wrong degrades to [`DisplayManager::Unknown`] with a warning.
pub fn detect(paths: &Paths) -> DisplayManager {
    let service = paths.resolve(DISPLAY_MANAGER_SERVICE);
    let target = match fs::read_link(&service) {
        Ok(target) => target,
        Err(err) => {
            println!("Warning: Display Manager detection is not available");
            debug!(service = %service.display(), "cannot read display manager unit: {err}");
            return DisplayManager::Unknown;
        }
    };

    // /usr/lib/systemd/system/sddm.service -> sddm
    let name = target
        .file_name()
        .map(|name| name.to_string_lossy())
        .map(|name| name.trim_end_matches(".service").to_string())
        .unwrap_or_default();

    let dm = DisplayManager::classify(&name);
    if dm == DisplayManager::Unknown {
        println!("Warning: unsupported Display Manager '{name}'");
        debug!(link = %target.display(), "unrecognised display manager");
    } else {
        debug!(%dm, "detected display manager");
    }
    dm
}

/// Hooks the Xrandr provider setup into the display manager's startup.
/// GDM handles provider output switching on its own.
pub fn configure(
    dm: DisplayManager,
    igpu: IgpuVendor,
    provider: Option<&str>,
    paths: &Paths,
) -> Result<()> {
    let provider = match igpu {
        IgpuVendor::Intel => templates::INTEL_PROVIDER,
        IgpuVendor::Amd => provider.unwrap_or(templates::INTEL_PROVIDER),
    };

    match dm {
        DisplayManager::Sddm => {
            FileSet::new(paths).backup_xsetup()?;
            let xsetup = paths.resolve(SDDM_XSETUP_PATH);
            files::create(&xsetup, &templates::xrandr_script(provider))?;
            files::make_executable(&xsetup)?;
        }
        DisplayManager::LightDm => {
            let ctx = RenderContext {
                provider: Some(provider.to_string()),
                ..Default::default()
            };
            let script = managed_file(Artifact::LightdmScript);
            let script_path = paths.resolve(script.path);
            files::create(&script_path, &script.render(&ctx))?;
            files::make_executable(&script_path)?;

            let config = managed_file(Artifact::LightdmConfig);
            files::create(&paths.resolve(config.path), &config.render(&ctx))?;
        }
        DisplayManager::Gdm | DisplayManager::Unknown => {
            debug!(%dm, "no display manager hook needed");
        }
    }
    Ok(())
}

/// Whether `dm` runs the Xrandr script (and so needs a provider name).
pub fn needs_xrandr_script(dm: DisplayManager) -> bool {
    matches!(dm, DisplayManager::Sddm | DisplayManager::LightDm)
}
