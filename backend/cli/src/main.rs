mod config_cmd;
mod extract_cmd;
mod services;
mod terminal_output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use receiptdesk_config::{config_dir, config_file_path, load_and_prepare};
use receiptdesk_core::MergePolicy;
use receiptdesk_form::ExpenseForm;
use receiptdesk_logging::{init_logger, LogSettings};
use receiptdesk_media::PreviewStore;

#[derive(Parser)]
#[command(name = "receiptdesk")]
#[command(about = "Turn receipt photos into reviewed expense entries")]
#[command(version)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract an expense draft from a receipt image
    Extract {
        /// Receipt image to read
        image: PathBuf,
        /// Print the draft as JSON
        #[arg(long)]
        json: bool,
        /// full-overwrite or fill-empty-only
        #[arg(long, value_name = "POLICY")]
        merge_policy: Option<MergePolicy>,
    },
    /// Open the interactive expense form
    Ui {
        /// Receipt image to preselect
        image: Option<PathBuf>,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the resolved configuration
    Show,
    /// Print the config file path
    Path,
    /// Validate the configuration
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_file_path(&config_dir()));

    if let Commands::Config {
        action: ConfigAction::Path,
    } = &cli.command
    {
        config_cmd::path(&config_path);
        return Ok(());
    }

    let config = load_and_prepare(&config_path).await?;

    // The terminal UI owns the screen; its logs only go to the file, if any.
    let interactive = matches!(cli.command, Commands::Ui { .. });
    init_logger(&LogSettings {
        level: config.log_level().to_string(),
        dir: config.log_dir().map(PathBuf::from),
        console: !interactive,
    });

    match cli.command {
        Commands::Extract {
            image,
            json,
            merge_policy,
        } => extract_cmd::run(&image, json, merge_policy, &config).await?,
        Commands::Ui { image } => {
            info!(config = %config_path.display(), "Starting receiptdesk ui");
            let extractor = services::build_extractor(&config)?;
            let form = ExpenseForm::new(PreviewStore::new()).with_merge_policy(config.merge_policy());
            receiptdesk_tui::run(form, extractor, image).await?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => config_cmd::show(&config)?,
            ConfigAction::Path => config_cmd::path(&config_path),
            ConfigAction::Validate => config_cmd::check(&config_path, &config)?,
        },
    }

    Ok(())
}
