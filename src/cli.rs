use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgGroup, Command, command, value_parser};
use color_eyre::eyre;
use scan_proto::proto::Protocol;
use tracing::Level;
use url::Url;

use crate::config::{Config, Input};

fn build_clap_command() -> Command {
    command!()
        .disable_version_flag(true)
        .color(clap::ColorChoice::Always)
        .long_version(format!(
            "- Scanner capability negotiation, v{}",
            env!("CARGO_PKG_VERSION")
        ))
        .version(format!("v{}", env!("CARGO_PKG_VERSION")))
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .help("endpoint of the scanner service to query")
                .value_parser(value_parser!(Url)),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .help("decode a capabilities response saved to a file")
                .value_parser(value_parser!(PathBuf)),
        )
        .group(
            ArgGroup::new("input")
                .args(["url", "file"])
                .required(true),
        )
        .arg(
            Arg::new("protocol")
                .short('p')
                .long("protocol")
                .help("protocol the scanner speaks")
                .default_value("wsd")
                .value_parser(value_parser!(Protocol)),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .help("set timeout for HTTP requests, in seconds")
                .value_parser(float_to_duration_parser)
                .default_value("5.0"),
        )
        .arg(
            Arg::new("print-request")
                .long("print-request")
                .help("print the capabilities request instead of sending it")
                .conflicts_with("file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("increase verbosity")
                .default_value("0")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("version")
                .short('V')
                .long("version")
                .help("show version number and exit")
                .action(ArgAction::Version),
        )
}

fn float_to_duration_parser(value: &str) -> Result<Duration, String> {
    let value = value.parse::<f32>().map_err(|error| error.to_string())?;

    Duration::try_from_secs_f32(value).map_err(|error| error.to_string())
}

pub fn parse_cli() -> Result<Config, eyre::Report> {
    parse_cli_from(env::args_os())
}

pub fn parse_cli_from<I, T>(from: I) -> Result<Config, eyre::Report>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut command = build_clap_command();

    let matches = command.try_get_matches_from_mut(from)?;

    let input = match (
        matches.get_one::<Url>("url"),
        matches.get_one::<PathBuf>("file"),
    ) {
        (Some(url), _) => Input::Url(url.clone()),
        (None, Some(file)) => Input::File(file.clone()),
        (None, None) => return Err(eyre::eyre!("either --url or --file is required")),
    };

    let verbosity = match get_user_cli_value::<u8>(&matches, "verbose") {
        None | Some(&0) => Level::WARN,
        Some(&1) => Level::INFO,
        Some(_) => Level::DEBUG,
    };

    let protocol = matches
        .get_one::<Protocol>("protocol")
        .copied()
        .ok_or_else(|| eyre::eyre!("protocol has a default"))?;

    let timeout = matches
        .get_one::<Duration>("timeout")
        .copied()
        .ok_or_else(|| eyre::eyre!("timeout has a default"))?;

    let config = Config {
        input,
        protocol,
        timeout,
        verbosity,
        print_request: matches.get_flag("print-request"),
    };

    Ok(config)
}

fn get_user_cli_value<'a, T>(matches: &'a clap::ArgMatches, key: &str) -> Option<&'a T>
where
    T: Clone + Send + Sync + 'static,
{
    // our CLI has defaults, so we check if the user has provided a value
    let Some(ValueSource::CommandLine) = matches.value_source(key) else {
        return None;
    };

    matches.get_one::<T>(key)
}
