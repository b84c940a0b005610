//! Contents of every file EnvyControl writes.
//!
//! Each managed file is one row of [`MANAGED_FILES`]: the system path, the
//! modes that own it and the function that renders its content from the
//! facts gathered for the transition. Nothing outside this table (plus the
//! SDDM `Xsetup` pair, which is backed up rather than owned) is touched.

use std::fmt::Write;

use crate::hardware::{IgpuVendor, PciBusId};
use crate::modes::Mode;
use crate::paths::{
    BLACKLIST_PATH, EXTRA_XORG_PATH, LIGHTDM_CONFIG_PATH, LIGHTDM_SCRIPT_PATH, MODESET_PATH,
    UDEV_INTEGRATED_PATH, UDEV_PM_PATH, XORG_PATH,
};

pub const HEADER: &str = "# Automatically generated by EnvyControl";

const BLACKLIST_CONTENT: &str = r#"# Automatically generated by EnvyControl

blacklist nouveau
blacklist nvidia
blacklist nvidia_drm
blacklist nvidia_uvm
blacklist nvidia_modeset
blacklist nvidia_current
blacklist nvidia_current_drm
blacklist nvidia_current_uvm
blacklist nvidia_current_modeset
blacklist i2c_nvidia_gpu
alias nouveau off
alias nvidia off
alias nvidia_drm off
alias nvidia_uvm off
alias nvidia_modeset off
alias nvidia_current off
alias nvidia_current_drm off
alias nvidia_current_uvm off
alias nvidia_current_modeset off
alias i2c_nvidia_gpu off
"#;

const UDEV_INTEGRATED_CONTENT: &str = r#"# Automatically generated by EnvyControl

# Remove NVIDIA USB xHCI Host Controller devices, if present
ACTION=="add", SUBSYSTEM=="pci", ATTR{vendor}=="0x10de", ATTR{class}=="0x0c0330", ATTR{power/control}="auto", ATTR{remove}="1"

# Remove NVIDIA USB Type-C UCSI devices, if present
ACTION=="add", SUBSYSTEM=="pci", ATTR{vendor}=="0x10de", ATTR{class}=="0x0c8000", ATTR{power/control}="auto", ATTR{remove}="1"

# Remove NVIDIA Audio devices, if present
ACTION=="add", SUBSYSTEM=="pci", ATTR{vendor}=="0x10de", ATTR{class}=="0x040300", ATTR{power/control}="auto", ATTR{remove}="1"

# Remove NVIDIA VGA/3D controller devices
ACTION=="add", SUBSYSTEM=="pci", ATTR{vendor}=="0x10de", ATTR{class}=="0x03[0-9]*", ATTR{power/control}="auto", ATTR{remove}="1"
"#;

const UDEV_PM_CONTENT: &str = r#"# Automatically generated by EnvyControl

# Remove NVIDIA USB xHCI Host Controller devices, if present
ACTION=="add", SUBSYSTEM=="pci", ATTR{vendor}=="0x10de", ATTR{class}=="0x0c0330", ATTR{remove}="1"

# Remove NVIDIA USB Type-C UCSI devices, if present
ACTION=="add", SUBSYSTEM=="pci", ATTR{vendor}=="0x10de", ATTR{class}=="0x0c8000", ATTR{remove}="1"

# Enable runtime PM for NVIDIA VGA/3D controller devices on driver bind
ACTION=="bind", SUBSYSTEM=="pci", ATTR{vendor}=="0x10de", ATTR{class}=="0x030000", TEST=="power/control", ATTR{power/control}="auto"
ACTION=="bind", SUBSYSTEM=="pci", ATTR{vendor}=="0x10de", ATTR{class}=="0x030200", TEST=="power/control", ATTR{power/control}="auto"

# Disable runtime PM for NVIDIA VGA/3D controller devices on driver unbind
ACTION=="unbind", SUBSYSTEM=="pci", ATTR{vendor}=="0x10de", ATTR{class}=="0x030000", TEST=="power/control", ATTR{power/control}="on"
ACTION=="unbind", SUBSYSTEM=="pci", ATTR{vendor}=="0x10de", ATTR{class}=="0x030200", TEST=="power/control", ATTR{power/control}="on"
"#;

const XORG_INTEL_TEMPLATE: &str = r#"# Automatically generated by EnvyControl

Section "ServerLayout"
    Identifier "layout"
    Screen 0 "nvidia"
    Inactive "intel"
EndSection

Section "Device"
    Identifier "nvidia"
    Driver "nvidia"
    BusID "{bus_id}"
EndSection

Section "Screen"
    Identifier "nvidia"
    Device "nvidia"
    Option "AllowEmptyInitialConfiguration"
EndSection

Section "Device"
    Identifier "intel"
    Driver "modesetting"
EndSection

Section "Screen"
    Identifier "intel"
    Device "intel"
EndSection
"#;

const XORG_AMD_TEMPLATE: &str = r#"# Automatically generated by EnvyControl

Section "ServerLayout"
    Identifier "layout"
    Screen 0 "nvidia"
    Inactive "amdgpu"
EndSection

Section "Device"
    Identifier "nvidia"
    Driver "nvidia"
    BusID "{bus_id}"
EndSection

Section "Screen"
    Identifier "nvidia"
    Device "nvidia"
    Option "AllowEmptyInitialConfiguration"
EndSection

Section "Device"
    Identifier "amdgpu"
    Driver "amdgpu"
EndSection

Section "Screen"
    Identifier "amd"
    Device "amdgpu"
EndSection
"#;

pub const SDDM_DEFAULT_XSETUP: &str = r#"#!/bin/sh
# Xsetup - run as root before the login dialog appears

"#;

/// xrandr provider name of an Intel iGPU driven by the modesetting driver.
pub const INTEL_PROVIDER: &str = "modesetting";

pub const DEFAULT_RTD3_LEVEL: u8 = 2;
pub const DEFAULT_COOLBITS: u16 = 28;

/// Kind of file EnvyControl owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Blacklist,
    UdevIntegrated,
    UdevPm,
    Modeset,
    Xorg,
    ExtraXorg,
    LightdmScript,
    LightdmConfig,
}

/// Facts a transition has gathered before rendering its files.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub igpu: Option<IgpuVendor>,
    pub bus_id: Option<PciBusId>,
    pub provider: Option<String>,
    pub rtd3: Option<u8>,
    pub force_comp: bool,
    pub coolbits: Option<u16>,
}

pub struct ManagedFile {
    pub artifact: Artifact,
    pub path: &'static str,
    pub modes: &'static [Mode],
    render: fn(&RenderContext) -> String,
}

impl ManagedFile {
    pub fn render(&self, ctx: &RenderContext) -> String {
        (self.render)(ctx)
    }
}

pub static MANAGED_FILES: [ManagedFile; 8] = [
    ManagedFile {
        artifact: Artifact::Blacklist,
        path: BLACKLIST_PATH,
        modes: &[Mode::Integrated],
        render: render_blacklist,
    },
    ManagedFile {
        artifact: Artifact::UdevIntegrated,
        path: UDEV_INTEGRATED_PATH,
        modes: &[Mode::Integrated],
        render: render_udev_integrated,
    },
    ManagedFile {
        artifact: Artifact::UdevPm,
        path: UDEV_PM_PATH,
        modes: &[Mode::Hybrid],
        render: render_udev_pm,
    },
    ManagedFile {
        artifact: Artifact::Modeset,
        path: MODESET_PATH,
        modes: &[Mode::Hybrid, Mode::Nvidia],
        render: render_modeset,
    },
    ManagedFile {
        artifact: Artifact::Xorg,
        path: XORG_PATH,
        modes: &[Mode::Nvidia],
        render: render_xorg,
    },
    ManagedFile {
        artifact: Artifact::ExtraXorg,
        path: EXTRA_XORG_PATH,
        modes: &[Mode::Nvidia],
        render: render_extra_xorg,
    },
    ManagedFile {
        artifact: Artifact::LightdmScript,
        path: LIGHTDM_SCRIPT_PATH,
        modes: &[Mode::Nvidia],
        render: render_lightdm_script,
    },
    ManagedFile {
        artifact: Artifact::LightdmConfig,
        path: LIGHTDM_CONFIG_PATH,
        modes: &[Mode::Nvidia],
        render: render_lightdm_config,
    },
];

pub fn managed_file(artifact: Artifact) -> &'static ManagedFile {
    MANAGED_FILES
        .iter()
        .find(|file| file.artifact == artifact)
        .unwrap_or_else(|| unreachable!("every artifact has a row in MANAGED_FILES"))
}

fn render_blacklist(_: &RenderContext) -> String {
    BLACKLIST_CONTENT.to_string()
}

fn render_udev_integrated(_: &RenderContext) -> String {
    UDEV_INTEGRATED_CONTENT.to_string()
}

fn render_udev_pm(_: &RenderContext) -> String {
    UDEV_PM_CONTENT.to_string()
}

fn render_modeset(ctx: &RenderContext) -> String {
    let mut content = format!("{HEADER}\n\noptions nvidia-drm modeset=1\n");
    if let Some(level) = ctx.rtd3 {
        let _ = writeln!(content, "options nvidia \"NVreg_DynamicPowerManagement=0x0{level}\"");
    }
    content
}

fn render_xorg(ctx: &RenderContext) -> String {
    let template = match ctx.igpu {
        Some(IgpuVendor::Amd) => XORG_AMD_TEMPLATE,
        _ => XORG_INTEL_TEMPLATE,
    };
    let bus_id = ctx.bus_id.as_ref().map(PciBusId::as_str).unwrap_or_default();
    template.replace("{bus_id}", bus_id)
}

fn render_extra_xorg(ctx: &RenderContext) -> String {
    let mut content = format!(
        "{HEADER}\n\nSection \"OutputClass\"\n    Identifier \"nvidia\"\n    MatchDriver \"nvidia-drm\"\n    Driver \"nvidia\"\n"
    );
    if ctx.force_comp {
        content.push_str("    Option \"ForceCompositionPipeline\" \"On\"\n");
    }
    if let Some(value) = ctx.coolbits {
        let _ = writeln!(content, "    Option \"Coolbits\" \"{value}\"");
    }
    content.push_str("EndSection\n");
    content
}

fn render_lightdm_script(ctx: &RenderContext) -> String {
    xrandr_script(ctx.provider.as_deref().unwrap_or(INTEL_PROVIDER))
}

fn render_lightdm_config(_: &RenderContext) -> String {
    format!("{HEADER}\n\n[Seat:*]\ndisplay-setup-script={LIGHTDM_SCRIPT_PATH}\n")
}

/// Display setup script binding the NVIDIA GPU as output source for the
/// integrated provider. Shared by SDDM's Xsetup and the LightDM hook.
pub fn xrandr_script(provider: &str) -> String {
    format!(
        "#!/bin/sh\n{HEADER}\n\nxrandr --setprovideroutputsource \"{provider}\" NVIDIA-0\nxrandr --auto\n"
    )
}

pub fn is_generated(content: &str) -> bool {
    content.lines().take(2).any(|line| line == HEADER)
}
