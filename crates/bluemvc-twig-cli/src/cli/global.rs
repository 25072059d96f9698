//! Flags shared by every `bluemvc-twig` subcommand.

use std::path::PathBuf;

use clap::{ArgAction, Args, builder::FalseyValueParser};

/// Logging, colour, config file and message format.
///
/// None of these change what a view renders to; they only affect what the
/// CLI itself prints around it.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// `-v` info, `-vv` debug (defaults applied, templates reloaded),
    /// `-vvv` trace (template resolution). `RUST_LOG` overrides all of them.
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        help = "Log more to stderr (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Only print rendered output and errors"
    )]
    pub quiet: bool,

    /// Any `NO_COLOR` value other than empty, `0`, `false`, `no` or `off`
    /// turns colour off.
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new(),
        help = "Disable colored messages and errors"
    )]
    pub no_color: bool,

    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Read settings from FILE instead of the user config file"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "Format of `list` and `config show` output; rendered views are never reformatted"
    )]
    pub output_format: OutputFormat,
}

/// How `list` and `config show` print their results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `human` on a terminal, `plain` otherwise.
    #[default]
    Auto,
    /// Headers and colour.
    Human,
    /// One entry per line, or TOML for `config show`.
    Plain,
    Json,
}
