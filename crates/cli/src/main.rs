mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "solflow")]
#[command(about = "Heuristic static analysis for Solidity smart contracts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze Solidity file(s) for vulnerability patterns
    Analyze(AnalyzeArgs),
    /// List all available rules
    List,
    /// Generate a default .solflow.toml config file
    Init,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// .sol files or directories to scan recursively
    #[arg(default_value = "contracts")]
    paths: Vec<PathBuf>,

    /// Output format (default: from config, else text)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Minimum severity to report (default: from config, else low)
    #[arg(short, long)]
    severity: Option<SeverityFilter>,

    /// Run only these rules (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    rules: Option<Vec<String>>,

    /// Exclude these rules (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    exclude: Option<Vec<String>>,

    /// Path to config file (default: .solflow.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where ASTs come from
    #[arg(short, long, default_value = "solc")]
    provider: ProviderKind,

    /// solc binary used by the solc provider
    #[arg(long, default_value = "solc")]
    solc: PathBuf,

    /// Extra import roots passed to solc (default: node_modules)
    #[arg(long)]
    include_path: Vec<PathBuf>,

    /// Directory for the AST cache
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Empty the AST cache before analyzing
    #[arg(long, requires = "cache")]
    clear_cache: bool,

    /// Suppress banner and summary
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[derive(ValueEnum, Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
    Sarif,
}

#[derive(ValueEnum, Clone, Copy)]
enum SeverityFilter {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

#[derive(ValueEnum, Clone, Copy)]
enum ProviderKind {
    /// Run solc --standard-json on each file
    Solc,
    /// Read a pre-built <file>.ast.json next to each source
    Json,
    /// Parse with tree-sitter-solidity, no compiler needed
    TreeSitter,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args).map(ExitCode::from),
        Commands::List => commands::list::run().map(|_| ExitCode::SUCCESS),
        Commands::Init => commands::init::run().map(|_| ExitCode::SUCCESS),
    }
}
