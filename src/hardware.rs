use std::fmt;
use std::process::Command;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{EnvyError, Result};

/// Written into the Xrandr script when `xrandr --listproviders` does not
/// report an AMD provider.
pub const AMD_PROVIDER_PLACEHOLDER: &str = "Error: could not find AMD iGPU name";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgpuVendor {
    Intel,
    Amd,
}

impl fmt::Display for IgpuVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgpuVendor::Intel => write!(f, "intel"),
            IgpuVendor::Amd => write!(f, "amd"),
        }
    }
}

/// X.org style bus id of the discrete GPU, e.g. `PCI:1:0:0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PciBusId(String);

impl PciBusId {
    /// Converts an lspci slot token (`01:00.0`, or `0000:01:00.0` when lspci
    /// prints the domain) into decimal `PCI:bus:device:function` form.
    pub fn parse(token: &str) -> Option<PciBusId> {
        let fields: Vec<&str> = token.split(':').collect();
        let (bus, slot) = match fields.as_slice() {
            [bus, slot] => (*bus, *slot),
            [_domain, bus, slot] => (*bus, *slot),
            _ => return None,
        };
        let (device, function) = slot.split_once('.')?;

        let bus = u8::from_str_radix(bus, 16).ok()?;
        let device = u8::from_str_radix(device, 16).ok()?;
        let function = u8::from_str_radix(function, 16).ok()?;

        Some(PciBusId(format!("PCI:{bus}:{device}:{function}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PciBusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the mode switcher needs to know about the machine.
pub trait HardwareFacts {
    fn igpu_vendor(&self) -> Result<IgpuVendor>;

    /// Fails with [`EnvyError::NvidiaGpuNotFound`] when the dGPU is not on
    /// the PCI bus, which is the case while integrated mode is active.
    fn nvidia_bus_id(&self) -> Result<PciBusId>;

    /// Best effort: falls back to [`AMD_PROVIDER_PLACEHOLDER`].
    fn amd_igpu_name(&self) -> String;
}

/// Inspects the running system through `lspci` and `xrandr`.
#[derive(Debug, Default)]
pub struct SystemHardware;

impl HardwareFacts for SystemHardware {
    fn igpu_vendor(&self) -> Result<IgpuVendor> {
        let output = command_output("lspci", &[])?;
        let vendor = parse_igpu_vendor(&output).ok_or(EnvyError::IgpuNotFound)?;
        debug!(%vendor, "detected iGPU vendor");
        Ok(vendor)
    }

    fn nvidia_bus_id(&self) -> Result<PciBusId> {
        let output = command_output("lspci", &[])?;
        let bus_id = parse_nvidia_bus_id(&output).ok_or(EnvyError::NvidiaGpuNotFound)?;
        debug!(%bus_id, "detected Nvidia GPU");
        Ok(bus_id)
    }

    fn amd_igpu_name(&self) -> String {
        let name = command_output("xrandr", &["--listproviders"])
            .map_err(|err| debug!("{err}"))
            .ok()
            .and_then(|output| parse_amd_provider(&output));

        match name {
            Some(name) => {
                debug!(provider = %name, "detected AMD iGPU provider");
                name
            }
            None => {
                println!("Warning: could not find AMD iGPU name, the Xrandr script may need manual editing");
                debug!("no AMD provider reported by xrandr");
                AMD_PROVIDER_PLACEHOLDER.to_string()
            }
        }
    }
}

fn cached(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .map_err(|err| debug!(pattern, "invalid pattern: {err}"))
            .ok()
    })
    .as_ref()
}

fn intel_vga() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, r"VGA.*Intel")
}

fn amd_vga() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, r"VGA.*(ATI|AMD|AMD/ATI)")
}

fn amd_provider() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, r"name:\s*(.*(?:AMD|ATI|Radeon).*)")
}

pub fn parse_igpu_vendor(lspci: &str) -> Option<IgpuVendor> {
    let matches = |re: Option<&Regex>| re.is_some_and(|re| re.is_match(lspci));
    if matches(intel_vga()) {
        Some(IgpuVendor::Intel)
    } else if matches(amd_vga()) {
        Some(IgpuVendor::Amd)
    } else {
        None
    }
}

pub fn parse_nvidia_bus_id(lspci: &str) -> Option<PciBusId> {
    lspci
        .lines()
        .filter(|line| line.contains("NVIDIA"))
        .filter(|line| line.contains("VGA compatible controller") || line.contains("3D controller"))
        .find_map(|line| line.split_whitespace().next().and_then(PciBusId::parse))
}

pub fn parse_amd_provider(listproviders: &str) -> Option<String> {
    let re = amd_provider()?;
    listproviders.lines().find_map(|line| {
        re.captures(line)
            .map(|caps| caps[1].trim().to_string())
            .filter(|name| !name.is_empty())
    })
}

fn command_output(program: &str, args: &[&str]) -> Result<String> {
    debug!(program, ?args, "running hardware query");
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| EnvyError::Command {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        warn!(program, status = %output.status, "hardware query exited unsuccessfully");
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
