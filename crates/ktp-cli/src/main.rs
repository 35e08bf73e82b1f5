//! ktp: role-scoped file resources from the command line.
//!
//! Configuration comes from the environment (see `ktp_core::Config`). A fresh
//! process reloads the catalog, so files uploaded by earlier runs are listed but
//! have no bytes; use `ktp session` to upload and preview within one session.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ktp_cli::console::{ConsoleNotifier, SpoolOpener};
use ktp_cli::output::{print_listing, OutputFormat};
use ktp_cli::session::{read_files, report_outcome, run_session, SessionTargets, HELP};
use ktp_cli::init_tracing;
use ktp_core::{Config, ResourceContext};
use ktp_resources::ResourceManager;
use ktp_storage::create_catalog_store;

#[derive(Parser)]
#[command(name = "ktp", about = "Role-scoped file resource manager")]
struct Cli {
    /// Project the resources belong to
    #[arg(long, global = true)]
    project: Option<String>,

    /// Sub-project the resources belong to
    #[arg(long, global = true)]
    sub_project: Option<String>,

    /// Role whose resources to show (defaults to KTP_USER_ROLE)
    #[arg(long, global = true)]
    role: Option<String>,

    /// Output format for listings
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload files through the file chooser path
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List the catalog
    List,
    /// Start an interactive session reading commands from stdin
    Session {
        /// Default directory for downloads (defaults to <data dir>/downloads)
        #[arg(long)]
        download_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(config.log_format);
    tracing::debug!(
        environment = %config.environment,
        backend = ?config.catalog_backend,
        data_dir = %config.data_dir().display(),
        "Configuration loaded"
    );

    let cli = Cli::parse();

    let context = ResourceContext::new(
        cli.project,
        cli.sub_project,
        cli.role.or_else(|| Some(config.default_role.clone())),
    );
    let store = create_catalog_store(&config, &context)
        .await
        .context("Failed to open catalog store")?;
    let mut manager =
        ResourceManager::open(context, Arc::new(store), Arc::new(ConsoleNotifier)).await;

    match cli.command {
        Commands::Upload { files } => {
            let batch = read_files(&files).await;
            let outcome = manager.choose_files(batch).await;
            report_outcome(&outcome);
            print_listing(
                &manager.title(),
                &manager.breadcrumb(),
                manager.list(),
                cli.format,
            )?;
            if !outcome.persisted {
                anyhow::bail!(
                    "Catalog could not be saved to {}",
                    config.data_dir().display()
                );
            }
        }
        Commands::List => {
            print_listing(
                &manager.title(),
                &manager.breadcrumb(),
                manager.list(),
                cli.format,
            )?;
        }
        Commands::Session { download_dir } => {
            let targets = SessionTargets {
                download_dir: download_dir
                    .unwrap_or_else(|| config.data_dir().join("downloads")),
                opener: Box::new(SpoolOpener::new(config.data_dir().join("opened"))),
                format: cli.format,
            };
            eprintln!("{} | type 'help' for commands", manager.title());
            eprintln!("{}", HELP);

            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            run_session(&mut manager, stdin, &targets).await?;
        }
    }

    Ok(())
}
