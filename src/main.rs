use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind;

use envycontrol::cli::{self, CliArgs};
use envycontrol::commands::{self, Context};
use envycontrol::hardware::SystemHardware;
use envycontrol::logger;
use envycontrol::paths::Paths;
use envycontrol::permissions;
use envycontrol::prompt::TerminalPrompter;

fn main() -> ExitCode {
    // print help if no argument is provided
    if std::env::args_os().len() <= 1 {
        let _ = cli::command().print_help();
        return ExitCode::FAILURE;
    }

    let args = match cli::parse_args_from(std::env::args_os()) {
        Ok(args) => args,
        Err(err) if err.kind() == ErrorKind::DisplayHelp => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };

    logger::init(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<()> {
    let hardware = SystemHardware;
    let mut prompter = TerminalPrompter::new();
    let mut ctx = Context {
        paths: Paths::system(),
        hardware: &hardware,
        prompter: &mut prompter,
        privileged: permissions::is_root(),
    };
    commands::execute(args, &mut ctx)?;
    Ok(())
}
