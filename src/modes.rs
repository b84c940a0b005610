//! Graphics mode transitions.
//!
//! Every switch tears down the whole managed file set and then builds the
//! target mode from scratch, so switching into the current mode again is the
//! same as any other transition. Hardware probing and the yes/no decisions
//! happen before anything is removed: a failed hardware query or an aborted prompt
//! leaves the previous mode intact.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info};

use crate::display_manager::{self, DisplayManager};
use crate::error::{EnvyError, Result};
use crate::files::{self, FileSet};
use crate::hardware::{HardwareFacts, IgpuVendor};
use crate::initramfs;
use crate::paths::Paths;
use crate::prompt::Prompter;
use crate::templates::{managed_file, Artifact, RenderContext, DEFAULT_COOLBITS, DEFAULT_RTD3_LEVEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Integrated,
    Hybrid,
    Nvidia,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Integrated => "integrated",
            Mode::Hybrid => "hybrid",
            Mode::Nvidia => "nvidia",
        }
    }
}

impl FromStr for Mode {
    type Err = EnvyError;

    fn from_str(name: &str) -> Result<Mode> {
        match name {
            "integrated" => Ok(Mode::Integrated),
            "hybrid" => Ok(Mode::Hybrid),
            "nvidia" => Ok(Mode::Nvidia),
            _ => Err(EnvyError::InvalidMode(name.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decisions that may be made up front on the command line. Anything left
/// as `None` is asked through the [`Prompter`].
#[derive(Debug, Clone, Default)]
pub struct SwitchOptions {
    /// Overrides display manager detection (nvidia mode only).
    pub display_manager: Option<DisplayManager>,
    /// RTD3 power management level for hybrid mode.
    pub rtd3: Option<u8>,
    pub force_comp: Option<bool>,
    pub coolbits: Option<u16>,
}

pub struct Switcher<'a> {
    paths: &'a Paths,
    hardware: &'a dyn HardwareFacts,
    prompter: &'a mut dyn Prompter,
}

impl<'a> Switcher<'a> {
    pub fn new(
        paths: &'a Paths,
        hardware: &'a dyn HardwareFacts,
        prompter: &'a mut dyn Prompter,
    ) -> Self {
        Switcher {
            paths,
            hardware,
            prompter,
        }
    }

    pub fn switch(&mut self, mode: Mode, options: &SwitchOptions) -> Result<()> {
        info!(%mode, "switching graphics mode");
        match mode {
            Mode::Integrated => self.integrated()?,
            Mode::Hybrid => self.hybrid(options)?,
            Mode::Nvidia => self.nvidia(options)?,
        }

        initramfs::rebuild(self.paths);

        println!("Graphics mode set to: {mode}");
        println!("Please reboot your computer for changes to apply!");
        Ok(())
    }

    fn integrated(&mut self) -> Result<()> {
        let ctx = RenderContext::default();
        FileSet::new(self.paths).cleanup()?;
        // blacklist all nouveau and Nvidia modules, then drop the dGPU from the bus
        self.write(Mode::Integrated, Artifact::Blacklist, &ctx)?;
        self.write(Mode::Integrated, Artifact::UdevIntegrated, &ctx)
    }

    fn hybrid(&mut self, options: &SwitchOptions) -> Result<()> {
        let rtd3 = match options.rtd3 {
            Some(level) => Some(level),
            None => self
                .ask("Do you want to enable PCI-Express Runtime D3 (RTD3) Power Management?")?
                .then_some(DEFAULT_RTD3_LEVEL),
        };
        let ctx = RenderContext {
            rtd3,
            ..Default::default()
        };

        FileSet::new(self.paths).cleanup()?;
        if rtd3.is_some() {
            self.write(Mode::Hybrid, Artifact::UdevPm, &ctx)?;
        }
        self.write(Mode::Hybrid, Artifact::Modeset, &ctx)
    }

    fn nvidia(&mut self, options: &SwitchOptions) -> Result<()> {
        let igpu = self.hardware.igpu_vendor()?;
        let bus_id = self.hardware.nvidia_bus_id()?;

        let dm = match options.display_manager {
            Some(dm) => dm,
            None => display_manager::detect(self.paths),
        };
        let provider = (igpu == IgpuVendor::Amd && display_manager::needs_xrandr_script(dm))
            .then(|| self.hardware.amd_igpu_name());

        let force_comp = match options.force_comp {
            Some(enabled) => enabled,
            None => self.ask("Do you want to enable the ForceCompositionPipeline setting?")?,
        };
        let coolbits = match options.coolbits {
            Some(value) => Some(value),
            None => self
                .ask("Do you want to enable Coolbits?")?
                .then_some(DEFAULT_COOLBITS),
        };
        debug!(%igpu, %bus_id, %dm, force_comp, ?coolbits, "nvidia mode parameters");

        let ctx = RenderContext {
            igpu: Some(igpu),
            bus_id: Some(bus_id),
            provider: provider.clone(),
            rtd3: None,
            force_comp,
            coolbits,
        };

        FileSet::new(self.paths).cleanup()?;
        self.write(Mode::Nvidia, Artifact::Xorg, &ctx)?;
        display_manager::configure(dm, igpu, provider.as_deref(), self.paths)?;
        // modeset is required to prevent tearing on the internal screen
        self.write(Mode::Nvidia, Artifact::Modeset, &ctx)?;
        if force_comp || coolbits.is_some() {
            self.write(Mode::Nvidia, Artifact::ExtraXorg, &ctx)?;
        }
        Ok(())
    }

    fn ask(&mut self, question: &str) -> Result<bool> {
        self.prompter.confirm(question).map_err(EnvyError::Prompt)
    }

    fn write(&self, mode: Mode, artifact: Artifact, ctx: &RenderContext) -> Result<()> {
        let file = managed_file(artifact);
        debug_assert!(file.modes.contains(&mode), "{artifact:?} is not owned by {mode}");
        files::create(&self.paths.resolve(file.path), &file.render(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exact_mode_names() {
        assert_eq!("integrated".parse::<Mode>().unwrap(), Mode::Integrated);
        assert_eq!("hybrid".parse::<Mode>().unwrap(), Mode::Hybrid);
        assert_eq!("nvidia".parse::<Mode>().unwrap(), Mode::Nvidia);
    }

    #[test]
    fn mode_names_are_case_sensitive() {
        for name in ["NVIDIA", "Hybrid", "Integrated"] {
            let err = name.parse::<Mode>().unwrap_err();
            assert!(matches!(err, EnvyError::InvalidMode(bad) if bad == name));
        }
    }

    #[test]
    fn rejects_unknown_modes() {
        let err = "foo".parse::<Mode>().unwrap_err();
        assert!(matches!(err, EnvyError::InvalidMode(name) if name == "foo"));
    }

    #[test]
    fn display_round_trips() {
        for mode in [Mode::Integrated, Mode::Hybrid, Mode::Nvidia] {
            assert_eq!(mode.to_string().parse::<Mode>().unwrap(), mode);
        }
    }
}
