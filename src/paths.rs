use std::path::{Path, PathBuf};

pub const BLACKLIST_PATH: &str = "/etc/modprobe.d/blacklist-nvidia.conf";
pub const UDEV_INTEGRATED_PATH: &str = "/lib/udev/rules.d/50-remove-nvidia.rules";
pub const UDEV_PM_PATH: &str = "/lib/udev/rules.d/80-nvidia-pm.rules";
pub const MODESET_PATH: &str = "/etc/modprobe.d/nvidia.conf";
pub const XORG_PATH: &str = "/etc/X11/xorg.conf";
pub const EXTRA_XORG_PATH: &str = "/etc/X11/xorg.conf.d/10-nvidia.conf";
pub const SDDM_XSETUP_PATH: &str = "/usr/share/sddm/scripts/Xsetup";
pub const SDDM_XSETUP_BACKUP_PATH: &str = "/usr/share/sddm/scripts/Xsetup.bak";
pub const LIGHTDM_SCRIPT_PATH: &str = "/etc/lightdm/nvidia.sh";
pub const LIGHTDM_CONFIG_PATH: &str = "/etc/lightdm/lightdm.conf.d/20-nvidia.conf";
pub const DISPLAY_MANAGER_SERVICE: &str = "/etc/systemd/system/display-manager.service";

/// Maps the absolute system paths EnvyControl knows about onto a root
/// directory. The binary always uses `/`.
#[derive(Debug, Clone)]
pub struct Paths {
    root: PathBuf,
}

impl Paths {
    pub fn system() -> Self {
        Paths {
            root: PathBuf::from("/"),
        }
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Paths { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, system_path: &str) -> PathBuf {
        self.root.join(system_path.trim_start_matches('/'))
    }

    pub fn exists(&self, system_path: &str) -> bool {
        self.resolve(system_path).exists()
    }
}

impl Default for Paths {
    fn default() -> Self {
        Paths::system()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_paths_resolve_to_themselves() {
        assert_eq!(Paths::system().resolve(XORG_PATH), PathBuf::from(XORG_PATH));
    }

    #[test]
    fn rooted_paths_stay_under_the_root() {
        let paths = Paths::with_root("/tmp/scratch");
        assert_eq!(
            paths.resolve(BLACKLIST_PATH),
            PathBuf::from("/tmp/scratch/etc/modprobe.d/blacklist-nvidia.conf")
        );
    }
}
