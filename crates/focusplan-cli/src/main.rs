use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "focusplan", version, about = "Focusplan behavioral analytics CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full analytics report as JSON
    Analyze(commands::analyze::ReportArgs),
    /// Focus heatmap (ASCII by default)
    Heatmap {
        #[command(flatten)]
        args: commands::analyze::ReportArgs,
        /// Print the heatmap as JSON
        #[arg(long)]
        json: bool,
    },
    /// Profile insights and recommendations as JSON
    Insights(commands::analyze::ReportArgs),
    /// Weekly summary as JSON
    Summary(commands::analyze::ReportArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Analyze(args) => commands::analyze::run_report(args),
        Commands::Heatmap { args, json } => commands::analyze::run_heatmap(args, json),
        Commands::Insights(args) => commands::analyze::run_insights(args),
        Commands::Summary(args) => commands::analyze::run_summary(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
