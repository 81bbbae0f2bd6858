//! Binary entry point for the relgraph command processor.
#![forbid(unsafe_code)]

use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use relgraph::{
    admin::{stats, verify},
    cli::Session,
    config::{ParseErrorPolicy, ReportFormat},
    Config,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "relgraph",
    version,
    about = "Replay relation commands and report maximum-indegree entities",
    disable_help_subcommand = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "RELGRAPH_CONFIG",
        value_name = "PATH",
        help = "Config file (TOML)"
    )]
    config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_name = "FILE",
        help = "Read commands from FILE instead of stdin"
    )]
    input: Option<PathBuf>,

    #[arg(long, value_enum, help = "Report output format")]
    format: Option<FormatArg>,

    #[arg(long, help = "Abort on unparsable lines and verify after every command")]
    strict: bool,

    #[arg(long, help = "Verify invariants after every mutating command")]
    verify: bool,

    #[arg(long, value_name = "TOKEN", help = "Text printed when nothing qualifies")]
    empty_token: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Replay commands, then check structural invariants (JSON)")]
    Verify,

    #[command(about = "Replay commands, then print relation statistics (JSON)")]
    Stats,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Text => ReportFormat::Text,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;
    init_tracing(&config);

    let input = open_input(cli.input.as_ref())?;
    let mut session = Session::new(&config);

    match cli.command {
        None => {
            let stdout = io::stdout();
            let output = BufWriter::new(stdout.lock());
            session.run(input, output)?;
        }
        Some(Command::Verify) => {
            session.run(input, io::sink())?;
            let report = verify(session.graph());
            print_json(&report)?;
            if !report.success {
                std::process::exit(2);
            }
        }
        Some(Command::Stats) => {
            session.run(input, io::sink())?;
            print_json(&stats(session.graph()))?;
        }
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<Config, Box<dyn Error>> {
    let mut config = Config::load(cli.config.clone())?;
    if cli.strict {
        config.session.on_parse_error = ParseErrorPolicy::Abort;
        config.session.verify_each_command = true;
    }
    if cli.verify {
        config.session.verify_each_command = true;
    }
    if let Some(format) = cli.format {
        config.report.format = format.into();
    }
    if let Some(token) = &cli.empty_token {
        config.report.empty_token = token.clone();
    }
    Ok(config)
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log.filter.as_str()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn open_input(path: Option<&PathBuf>) -> Result<Box<dyn BufRead>, Box<dyn Error>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .map_err(|err| format!("cannot open input {}: {err}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
