use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use relevance_lens::analysis::Analyzer;
use relevance_lens::api::ExplainSession;
use relevance_lens::config::AnalysisConfig;
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON analysis config; command-line flags override its values.
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score breakdown for one document or all of them.
    Analyze(cmd::analyze::AnalyzeArgs),
    /// Documents and explain entries as found in the response.
    Inspect(cmd::inspect::InspectArgs),
    /// One CSV row per lexical-group field, for every document.
    Export(cmd::export::ExportArgs),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Overridable settings live in the subcommand's matches, not the root.
    let (cli_config, response_path) = match &cli.command {
        Commands::Analyze(args) => (&args.config, &args.response),
        Commands::Inspect(args) => (&args.config, &args.response),
        Commands::Export(args) => (&args.config, &args.response),
    };
    let sub_matches = matches.subcommand().map(|(_, m)| m).unwrap_or(&matches);

    let config = match &cli.config {
        Some(path) => {
            info!("Loading analysis config from: {}", path);
            let mut file_config = AnalysisConfig::load_from_file(path).unwrap_or_else(|e| {
                error!("{}", e);
                process::exit(1);
            });
            file_config.merge_from_cli(cli_config, sub_matches);
            file_config
        }
        None => cli_config.clone(),
    };

    let analyzer = Analyzer::new(&config).unwrap_or_else(|e| {
        error!("Invalid analysis config: {}", e);
        process::exit(1);
    });

    let session = ExplainSession::load_with(response_path, analyzer).unwrap_or_else(|e| {
        error!("Failed to load '{}': {}", response_path.display(), e);
        process::exit(1);
    });

    let result = match &cli.command {
        Commands::Analyze(args) => cmd::analyze::run(args, &session),
        Commands::Inspect(_) => cmd::inspect::run(&session),
        Commands::Export(args) => cmd::export::run(args, &session),
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}
