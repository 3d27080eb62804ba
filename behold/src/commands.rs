use crate::handlers::parse_threads_arg;
use behold_core::config::DEFAULT_CONFIG_DIR;
use clap::{arg, command};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("behold")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("behold")
        .about("Find a username across the web")
        .styles(CLAP_STYLING)
        .arg_required_else_help(true)
        .subcommand_negates_reqs(true)
        .arg(
            arg!(-u --"username" <USERNAME>)
                .required(true)
                .help("The username to look for"),
        )
        .arg(
            arg!(--"nsfw" <BOOL>)
                .required(false)
                .help("Include sites flagged as NSFW ('true' to include)")
                .default_value("false"),
        )
        .arg(
            arg!(-o --"output_filepath" <PATH>)
                .required(false)
                .help("Save the results to this file (default: summary on screen only)"),
        )
        .arg(
            arg!(-t --"threads" <NUM_WORKERS>)
                .required(false)
                .help("The number of async workers probing sites in parallel")
                .value_parser(parse_threads_arg)
                .default_value("1"),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Output file format: csv, json, text")
                .value_parser(["csv", "json", "text"])
                .default_value("csv"),
        )
        .arg(
            arg!(-c --"config" <PATH>)
                .required(false)
                .help("Path to the behold config file (default: ~/.config/behold/config.json)"),
        )
        .arg(
            arg!(--"timeout" <MILLIS>)
                .required(false)
                .help("Per-request timeout in milliseconds")
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value("1000"),
        )
        .arg(arg!(-q --"quiet" "Suppress banner, progress bar and misses").required(false))
        .arg(arg!(-v --"verbose" "Enable debug logging").required(false))
        .subcommand(
            command!("init")
                .about("Installs the default config, site catalog and NSFW table")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Directory to install the configuration into")
                        .default_value(DEFAULT_CONFIG_DIR),
                )
                .arg(
                    arg!(-f --"force")
                        .help("Overwrite existing configuration files without asking")
                        .required(false),
                ),
        )
}
