//! Command-line interface parsing and argument handling.
//!
//! Every flag except `--config` and `--json-logs` overrides the matching
//! setting from the configuration file.

use clap::{value_parser, Arg, ArgMatches, Command};
use std::path::PathBuf;

/// Command-line arguments for the Winger arena host.
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
    /// Optional override for the number of observer roles
    pub observers: Option<usize>,
    /// Optional override for the number of players in the arena
    pub players: Option<usize>,
    /// Optional seed for the authority's decisions
    pub seed: Option<u64>,
    /// Optional number of simulated seconds to run
    pub duration: Option<f64>,
}

impl CliArgs {
    /// Parses the process arguments.
    ///
    /// Exits with clap's usage message when an argument is malformed.
    pub fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }

    /// Parses an explicit argument list (the first item is the binary name).
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Ok(Self::from_matches(&command().try_get_matches_from(args)?))
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            config_path: matches
                .get_one::<String>("config")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG)),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
            observers: matches.get_one::<usize>("observers").copied(),
            players: matches.get_one::<usize>("players").copied(),
            seed: matches.get_one::<u64>("seed").copied(),
            duration: matches.get_one::<f64>("duration").copied(),
        }
    }
}

const DEFAULT_CONFIG: &str = "winger.toml";

fn command() -> Command {
    Command::new("Winger Arena")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Authority-replicated boss simulation with observer replay")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value(DEFAULT_CONFIG),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .help("Output logs in JSON format")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("observers")
                .short('o')
                .long("observers")
                .value_name("COUNT")
                .help("Observer roles replaying the authority")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("players")
                .short('p')
                .long("players")
                .value_name("COUNT")
                .help("Players placed in the arena")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("seed")
                .short('s')
                .long("seed")
                .value_name("SEED")
                .help("Seed for the authority's decisions")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("duration")
                .short('d')
                .long("duration")
                .value_name("SECONDS")
                .help("Simulated seconds to run before stopping")
                .value_parser(value_parser!(f64)),
        )
}
