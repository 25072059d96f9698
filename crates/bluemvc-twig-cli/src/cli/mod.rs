//! CLI argument definitions using the clap derive API.
//!
//! Argument names, help text and value parsers live here. No rendering
//! logic.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name     = "bluemvc-twig",
    bin_name = "bluemvc-twig",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Render Twig views the way a BlueMvc application does",
    long_about = "bluemvc-twig renders a view file with the Model, ViewItems, \
                  Request and Application bindings a BlueMvc controller would \
                  pass, using the same search-path and cache defaults.",
    after_help = "EXAMPLES:\n\
        \x20 bluemvc-twig render basic.twig --view-path views --model '{\"Header\":\"Hi\"}'\n\
        \x20 bluemvc-twig render page.twig --view-path alt --view-path views --item Title=Home\n\
        \x20 bluemvc-twig list --view-path views\n\
        \x20 bluemvc-twig completions bash > /usr/share/bash-completion/completions/bluemvc-twig",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render a view and print the result.
    #[command(
        visible_alias = "r",
        about = "Render a view",
        after_help = "EXAMPLES:\n\
            \x20 bluemvc-twig render basic.twig --view-path views\n\
            \x20 bluemvc-twig render basic.twig --model-file model.json --url /products\n\
            \x20 bluemvc-twig render page.html.tpl --extension html.tpl --strict"
    )]
    Render(RenderArgs),

    /// List view files under the search paths.
    #[command(
        visible_alias = "ls",
        about = "List available views",
        after_help = "EXAMPLES:\n\
            \x20 bluemvc-twig list --view-path views\n\
            \x20 bluemvc-twig list --view-path views --output-format json"
    )]
    List(ListArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 bluemvc-twig completions bash > ~/.local/share/bash-completion/completions/bluemvc-twig\n\
            \x20 bluemvc-twig completions zsh  > ~/.zfunc/_bluemvc-twig"
    )]
    Completions(CompletionsArgs),

    /// Inspect the configuration.
    #[command(about = "Configuration management", subcommand)]
    Config(ConfigCommands),
}

// ── render ────────────────────────────────────────────────────────────────────

/// Arguments for `bluemvc-twig render`.
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// View file, relative to the search paths.
    #[arg(value_name = "VIEW", help = "View file to render, e.g. basic.twig")]
    pub view: String,

    /// Search path; repeat to add more, first match wins.
    #[arg(
        short = 'p',
        long = "view-path",
        value_name = "DIR",
        help = "View search path (repeatable, first match wins)"
    )]
    pub view_paths: Vec<PathBuf>,

    /// Application temp path; the cache lives below it.
    #[arg(long = "temp-path", value_name = "DIR", help = "Application temp path")]
    pub temp_path: Option<PathBuf>,

    /// Explicit cache directory, overriding `<temp-path>/bluemvc-twig/cache/`.
    #[arg(long = "cache-dir", value_name = "DIR", help = "Template cache directory")]
    pub cache_dir: Option<PathBuf>,

    /// Model as inline JSON. Bare text that is not JSON is used as a string.
    #[arg(
        short = 'm',
        long = "model",
        value_name = "JSON",
        conflicts_with = "model_file",
        value_parser = parse_json_or_text,
        help = "Model as JSON"
    )]
    pub model: Option<Value>,

    /// Model read from a JSON file.
    #[arg(long = "model-file", value_name = "FILE", help = "Model JSON file")]
    pub model_file: Option<PathBuf>,

    /// View item; repeat for more.
    #[arg(
        short = 'i',
        long = "item",
        value_name = "KEY=VALUE",
        value_parser = parse_item,
        help = "View item (repeatable)"
    )]
    pub items: Vec<(String, Value)>,

    /// Request URL or site-relative path.
    #[arg(long = "url", value_name = "URL", default_value = "/", help = "Request URL")]
    pub url: String,

    /// Request method.
    #[arg(long = "method", value_name = "METHOD", default_value = "GET", help = "Request method")]
    pub method: String,

    /// Fail on undefined variables.
    #[arg(long = "strict", overrides_with = "no_strict", help = "Enable strict variables")]
    pub strict: bool,

    #[arg(
        long = "no-strict",
        overrides_with = "strict",
        help = "Disable strict variables, even if the config enables them"
    )]
    pub no_strict: bool,

    /// Enable debug mode (`dump()` prints).
    #[arg(long = "debug", overrides_with = "no_debug", help = "Enable debug mode")]
    pub debug: bool,

    #[arg(
        long = "no-debug",
        overrides_with = "debug",
        help = "Disable debug mode, even if the config enables it"
    )]
    pub no_debug: bool,

    /// View file extension handled by the renderer.
    #[arg(long = "extension", value_name = "EXT", help = "View file extension (default: twig)")]
    pub extension: Option<String>,
}

impl RenderArgs {
    /// `Some` when `--strict` or `--no-strict` was given; the last one wins.
    pub fn strict_variables(&self) -> Option<bool> {
        switch(self.strict, self.no_strict)
    }

    /// `Some` when `--debug` or `--no-debug` was given; the last one wins.
    pub fn debug_mode(&self) -> Option<bool> {
        switch(self.debug, self.no_debug)
    }
}

fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `bluemvc-twig list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Search path; repeat to add more.
    #[arg(
        short = 'p',
        long = "view-path",
        value_name = "DIR",
        help = "View search path (repeatable)"
    )]
    pub view_paths: Vec<PathBuf>,

    /// Only list files with this extension.
    #[arg(long = "extension", value_name = "EXT", help = "View file extension (default: twig)")]
    pub extension: Option<String>,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `bluemvc-twig completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `bluemvc-twig config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration.
    Show,
    /// Print the path of the default configuration file.
    Path,
}

// ── value parsers ─────────────────────────────────────────────────────────────

/// JSON if it parses, otherwise the raw text as a string.
fn parse_json_or_text(raw: &str) -> Result<Value, String> {
    Ok(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())))
}

/// `KEY=VALUE`, the value parsed like [`parse_json_or_text`].
fn parse_item(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.is_empty() {
        return Err("view item key must not be empty".to_string());
    }
    Ok((key.to_string(), parse_json_or_text(value)?))
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_render_command() {
        let cli = Cli::parse_from([
            "bluemvc-twig",
            "render",
            "basic.twig",
            "--view-path",
            "views",
            "-p",
            "alt",
            "--item",
            "Title=Home",
            "--strict",
        ]);

        let Commands::Render(args) = cli.command else {
            panic!("expected Render command");
        };
        assert_eq!(args.view, "basic.twig");
        assert_eq!(args.view_paths, vec![PathBuf::from("views"), PathBuf::from("alt")]);
        assert_eq!(args.items, vec![("Title".to_string(), json!("Home"))]);
        assert_eq!(args.strict_variables(), Some(true));
        assert_eq!(args.debug_mode(), None);
        assert_eq!(args.url, "/");
    }

    #[test]
    fn model_accepts_json_and_text() {
        assert_eq!(parse_json_or_text("{\"A\":1}").unwrap(), json!({"A": 1}));
        assert_eq!(parse_json_or_text("Baz").unwrap(), json!("Baz"));
    }

    #[test]
    fn item_requires_key_and_equals() {
        assert_eq!(parse_item("Count=3").unwrap(), ("Count".to_string(), json!(3)));
        assert_eq!(parse_item("Eq=a=b").unwrap(), ("Eq".to_string(), json!("a=b")));
        assert!(parse_item("novalue").is_err());
        assert!(parse_item("=x").is_err());
    }

    #[test]
    fn model_and_model_file_conflict() {
        let result = Cli::try_parse_from([
            "bluemvc-twig",
            "render",
            "basic.twig",
            "--model",
            "{}",
            "--model-file",
            "m.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn strict_and_debug_switches() {
        let parse = |extra: &[&str]| {
            let mut argv = vec!["bluemvc-twig", "render", "basic.twig"];
            argv.extend_from_slice(extra);
            match Cli::parse_from(argv).command {
                Commands::Render(args) => args,
                _ => unreachable!(),
            }
        };

        let unset = parse(&[]);
        assert_eq!(unset.strict_variables(), None);
        assert_eq!(unset.debug_mode(), None);

        let off = parse(&["--no-strict", "--no-debug"]);
        assert_eq!(off.strict_variables(), Some(false));
        assert_eq!(off.debug_mode(), Some(false));

        let last_wins = parse(&["--strict", "--no-strict", "--no-debug", "--debug"]);
        assert_eq!(last_wins.strict_variables(), Some(false));
        assert_eq!(last_wins.debug_mode(), Some(true));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["bluemvc-twig", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }
}
