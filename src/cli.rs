use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub query: bool,
    pub switch: Option<String>,
    pub dm: Option<String>,
    pub reset: bool,
    pub reset_sddm: bool,
    pub version: bool,
    pub rtd3: Option<u8>,
    pub force_comp: bool,
    pub coolbits: Option<u16>,
    pub verbose: bool,
}

pub fn command() -> Command {
    Command::new("envycontrol")
        .about("Easy GPU switching for Nvidia Optimus laptops under Linux")
        .disable_version_flag(true)
        .arg(
            Arg::new("query")
                .short('q')
                .long("query")
                .visible_alias("status")
                .help("Query the current graphics mode")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("switch")
                .short('s')
                .long("switch")
                .value_name("MODE")
                .help("Switch the graphics mode. Supported modes: integrated, hybrid, nvidia"),
        )
        .arg(
            Arg::new("dm")
                .long("dm")
                .value_name("DISPLAY_MANAGER")
                .help("Manually specify your display manager for nvidia mode. Supported: gdm, sddm, lightdm"),
        )
        .arg(
            Arg::new("reset")
                .long("reset")
                .help("Remove EnvyControl settings")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("reset-sddm")
                .long("reset-sddm")
                .help("Restore default Xsetup file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("rtd3")
                .long("rtd3")
                .value_name("LEVEL")
                .num_args(0..=1)
                .default_missing_value("2")
                .value_parser(value_parser!(u8).range(0..=3))
                .help("Enable PCI-Express Runtime D3 (RTD3) Power Management in hybrid mode (default level 2)"),
        )
        .arg(
            Arg::new("force-comp")
                .long("force-comp")
                .help("Enable ForceCompositionPipeline in nvidia mode")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("coolbits")
                .long("coolbits")
                .value_name("VALUE")
                .num_args(0..=1)
                .default_missing_value("28")
                .value_parser(value_parser!(u16))
                .help("Enable Coolbits in nvidia mode (default 28)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .short('v')
                .long("version")
                .help("Print the current version and exit")
                .action(ArgAction::SetTrue),
        )
}

pub fn parse_args_from<I, T>(args: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    command().try_get_matches_from(args).map(|matches| from_matches(&matches))
}

fn from_matches(matches: &ArgMatches) -> CliArgs {
    CliArgs {
        query: matches.get_flag("query"),
        switch: matches.get_one::<String>("switch").cloned(),
        dm: matches.get_one::<String>("dm").cloned(),
        reset: matches.get_flag("reset"),
        reset_sddm: matches.get_flag("reset-sddm"),
        version: matches.get_flag("version"),
        rtd3: matches.get_one::<u8>("rtd3").copied(),
        force_comp: matches.get_flag("force-comp"),
        coolbits: matches.get_one::<u16>("coolbits").copied(),
        verbose: matches.get_flag("verbose"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::{DEFAULT_COOLBITS, DEFAULT_RTD3_LEVEL};

    #[test]
    fn command_definition_is_consistent() {
        command().debug_assert();
    }

    #[test]
    fn mode_is_free_text_so_it_can_be_validated_later() {
        let args = parse_args_from(["envycontrol", "-s", "foo"]).unwrap();
        assert_eq!(args.switch.as_deref(), Some("foo"));
    }

    #[test]
    fn status_is_an_alias_of_query() {
        assert!(parse_args_from(["envycontrol", "--status"]).unwrap().query);
        assert!(parse_args_from(["envycontrol", "-q"]).unwrap().query);
    }

    #[test]
    fn optional_values_fall_back_to_defaults() {
        let args = parse_args_from(["envycontrol", "-s", "hybrid", "--rtd3"]).unwrap();
        assert_eq!(args.rtd3, Some(DEFAULT_RTD3_LEVEL));

        let args = parse_args_from(["envycontrol", "-s", "nvidia", "--coolbits", "--force-comp"]).unwrap();
        assert_eq!(args.coolbits, Some(DEFAULT_COOLBITS));
        assert!(args.force_comp);

        let args = parse_args_from(["envycontrol", "-s", "nvidia", "--coolbits", "4"]).unwrap();
        assert_eq!(args.coolbits, Some(4));
    }

    #[test]
    fn rtd3_level_is_bounded() {
        assert!(parse_args_from(["envycontrol", "-s", "hybrid", "--rtd3", "4"]).is_err());
    }

    #[test]
    fn lowercase_v_prints_version() {
        assert!(parse_args_from(["envycontrol", "-v"]).unwrap().version);
    }
}
