use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use docopt_core::ArgMap;
use docopt_engine::{DocoptError, Outcome, ParseConfig, parse_with_config, usage_section};

/// Output format for the matched argument map.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "docopt-match")]
#[command(about = "Match an argument vector against a docopt usage document")]
struct Cli {
    /// File holding the usage document (`-` or absent: read stdin).
    #[arg(long)]
    usage_file: Option<PathBuf>,
    /// YAML file with parse settings (help, version, options_first).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Treat everything after the first positional argument as positional.
    #[arg(long)]
    options_first: bool,
    /// Do not treat -h/--help as a help request.
    #[arg(long)]
    no_help: bool,
    /// Enable --version handling and print this text when it is requested.
    #[arg(long)]
    version_string: Option<String>,
    /// Output format for the matched arguments.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Argument vector to match, program name excluded.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    argv: Vec<String>,
}

/// How a run ended when it did not print a result.
#[derive(Debug)]
enum Failure {
    /// Could not read inputs or write output.
    Setup(String),
    /// The usage document is malformed.
    Grammar(String),
    /// The argument vector does not fit the usage document.
    Argument { message: String, usage: String },
}

impl Failure {
    fn exit_code(&self) -> u8 {
        match self {
            Failure::Setup(_) | Failure::Argument { .. } => 1,
            Failure::Grammar(_) => 2,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            match &failure {
                Failure::Setup(message) => eprintln!("error: {message}"),
                Failure::Grammar(message) => eprintln!("error: {message}"),
                Failure::Argument { message, usage } => {
                    eprintln!("{message}");
                    eprintln!("{usage}");
                }
            }
            ExitCode::from(failure.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<(), Failure> {
    let doc = read_usage(cli.usage_file.as_ref())?;
    let config = resolve_config(&cli)?;

    let outcome = parse_with_config(&doc, cli.argv.iter().cloned(), &config).map_err(|err| match err {
        DocoptError::Grammar(message) => Failure::Grammar(message),
        DocoptError::Argument(message) => Failure::Argument {
            message,
            usage: usage_section(&doc).unwrap_or_default(),
        },
    })?;

    match outcome {
        Outcome::Matched(args) => print_args(&args, cli.format),
        Outcome::HelpRequested => {
            println!("{}", doc.trim_end());
            Ok(())
        }
        Outcome::VersionRequested => {
            println!("{}", cli.version_string.unwrap_or_default());
            Ok(())
        }
    }
}

fn read_usage(path: Option<&PathBuf>) -> Result<String, Failure> {
    match path {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path).map_err(|err| {
            Failure::Setup(format!("Failed to read '{}': {err}", path.display()))
        }),
        _ => {
            let mut doc = String::new();
            std::io::stdin()
                .read_to_string(&mut doc)
                .map_err(|err| Failure::Setup(format!("Failed to read stdin: {err}")))?;
            Ok(doc)
        }
    }
}

/// Settings from `--config`, overridden by the command-line flags.
fn resolve_config(cli: &Cli) -> Result<ParseConfig, Failure> {
    let mut config = match &cli.config {
        Some(path) => ParseConfig::load(path).map_err(|err| {
            Failure::Setup(format!("Failed to load config '{}': {err}", path.display()))
        })?,
        None => ParseConfig::default(),
    };

    if cli.options_first {
        config.options_first = true;
    }
    if cli.no_help {
        config.help = false;
    }
    // Without a version string there is nothing to print.
    config.version = config.version && cli.version_string.is_some();

    Ok(config)
}

fn print_args(args: &ArgMap, format: CliOutputFormat) -> Result<(), Failure> {
    match format {
        CliOutputFormat::Json => {
            let json = serde_json::to_string_pretty(args)
                .map_err(|e| Failure::Setup(format!("Failed to serialize output: {e}")))?;
            println!("{json}");
        }
        CliOutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(args)
                .map_err(|e| Failure::Setup(format!("Failed to serialize output: {e}")))?;
            print!("{yaml}");
        }
    }
    Ok(())
}
