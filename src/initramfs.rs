use std::process::Command;

use tracing::{debug, info};

use crate::paths::Paths;

/// Tool used to regenerate the initramfs on this distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitramfsTool {
    UpdateInitramfs,
    Dracut,
    Mkinitcpio,
    MakeInitrd,
}

impl InitramfsTool {
    /// Picks the tool from distribution marker files.
    pub fn detect(paths: &Paths) -> Option<InitramfsTool> {
        if paths.exists("/etc/debian_version") {
            Some(InitramfsTool::UpdateInitramfs)
        } else if paths.exists("/etc/redhat-release")
            || paths.exists("/usr/bin/zypper")
            || paths.exists("/usr/bin/dracut")
        {
            Some(InitramfsTool::Dracut)
        } else if paths.exists("/etc/arch-release") {
            Some(InitramfsTool::Mkinitcpio)
        } else if paths.exists("/etc/altlinux-release") {
            Some(InitramfsTool::MakeInitrd)
        } else {
            None
        }
    }

    pub fn command(&self) -> (&'static str, &'static [&'static str]) {
        match self {
            InitramfsTool::UpdateInitramfs => ("update-initramfs", &["-u", "-k", "all"]),
            InitramfsTool::Dracut => ("dracut", &["--force", "--regenerate-all"]),
            InitramfsTool::Mkinitcpio => ("mkinitcpio", &["-P"]),
            InitramfsTool::MakeInitrd => ("make-initrd", &[]),
        }
    }
}

/// Regenerates the initramfs so module blacklists and options apply at early
/// boot. Failures only warn.
pub fn rebuild(paths: &Paths) {
    let Some(tool) = InitramfsTool::detect(paths) else {
        println!("Warning: could not determine how to rebuild the initramfs, please do it manually");
        debug!(root = %paths.root().display(), "no initramfs tool detected");
        return;
    };

    let (program, args) = tool.command();
    println!("Rebuilding the initramfs with {program}...");
    debug!(program, ?args, "running initramfs rebuild");

    match Command::new(program).args(args).status() {
        Ok(status) if status.success() => {
            info!(program, "initramfs rebuilt");
            println!("Successfully rebuilt the initramfs!");
        }
        Ok(status) => {
            println!("Warning: an error occurred while rebuilding the initramfs ({program} {status})");
            debug!(program, %status, "initramfs rebuild failed");
        }
        Err(err) => {
            println!("Warning: could not run {program}: {err}");
            debug!(program, "initramfs rebuild could not start: {err}");
        }
    }
}
