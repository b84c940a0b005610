use tracing::debug;

use crate::cli::CliArgs;
use crate::display_manager::DisplayManager;
use crate::error::{EnvyError, Result};
use crate::hardware::HardwareFacts;
use crate::modes::{Mode, SwitchOptions, Switcher};
use crate::paths::Paths;
use crate::permissions::ensure_root;
use crate::prompt::Prompter;
use crate::{reset, status};

/// Everything a command needs from the outside world.
pub struct Context<'a> {
    pub paths: Paths,
    pub hardware: &'a dyn HardwareFacts,
    pub prompter: &'a mut dyn Prompter,
    pub privileged: bool,
}

pub fn version_string() -> String {
    format!("EnvyControl {}", env!("CARGO_PKG_VERSION"))
}

/// Runs the single action selected on the command line.
pub fn execute(args: &CliArgs, ctx: &mut Context<'_>) -> Result<()> {
    if args.dm.is_some() && args.switch.is_none() {
        return Err(EnvyError::DisplayManagerWithoutSwitch);
    }

    if args.query {
        status::print_status(&ctx.paths);
    } else if args.version {
        println!("{}", version_string());
    } else if let Some(mode) = &args.switch {
        ensure_root(ctx.privileged)?;
        let mode: Mode = mode.parse()?;
        let options = switch_options(args, mode)?;
        Switcher::new(&ctx.paths, ctx.hardware, &mut *ctx.prompter).switch(mode, &options)?;
    } else if args.reset_sddm {
        ensure_root(ctx.privileged)?;
        reset::reset_sddm(&ctx.paths)?;
    } else if args.reset {
        ensure_root(ctx.privileged)?;
        reset::reset_to_default(&ctx.paths)?;
    }
    Ok(())
}

fn switch_options(args: &CliArgs, mode: Mode) -> Result<SwitchOptions> {
    let display_manager = match (&args.dm, mode) {
        (Some(dm), Mode::Nvidia) => Some(dm.parse::<DisplayManager>()?),
        (Some(dm), _) => {
            println!("Warning: --dm {dm} only applies to nvidia mode, ignoring it");
            debug!(%mode, dm = %dm, "display manager override ignored");
            None
        }
        (None, _) => None,
    };

    Ok(SwitchOptions {
        display_manager,
        rtd3: args.rtd3,
        force_comp: args.force_comp.then_some(true),
        coolbits: args.coolbits,
    })
}
