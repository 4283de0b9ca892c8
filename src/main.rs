use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxbot::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        /// The base currency to convert from
        from: String,
        /// The ending currency to convert to
        to: String,
        /// The amount you want to convert
        #[arg(allow_negative_numbers = true)]
        value: f64,
        /// Print the interaction response payload instead of the rendered reply
        #[arg(long)]
        json: bool,
    },
    /// Print the command registration payloads
    Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxbot::cli::setup::setup(),
        Some(Commands::Convert {
            from,
            to,
            value,
            json,
        }) => fxbot::run_command(
            fxbot::AppCommand::Convert {
                from,
                to,
                value,
                json,
            },
            cli.config_path.as_deref(),
        )
        .await
        .map(|_| ()),
        Some(Commands::Commands) => {
            fxbot::run_command(fxbot::AppCommand::Commands, cli.config_path.as_deref())
                .await
                .map(|_| ())
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
