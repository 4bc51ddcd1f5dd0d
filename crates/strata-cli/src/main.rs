//! Strata - deploy client for the strata platform
//!
//! Usage:
//!   strata deploy            # Deploy the service in the current directory
//!   strata deploy -w         # Deploy, then redeploy on every change
//!   strata info              # List targets and endpoints
//!   strata logout            # Forget the stored token

mod console_reporter;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use strata_core::commands::{
    DeployCommand, DeployOptions, InfoCommand, InfoOptions, InfoReport, LogoutCommand,
};
use strata_core::context::AppContext;
use strata_core::reporter::{Reporter, TracingReporter};

use crate::console_reporter::ConsoleReporter;

#[derive(Parser)]
#[command(name = "strata", version)]
#[command(about = "Deploy client for the strata platform", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy the service definition in the current directory
    Deploy(DeployArgs),

    /// List the targets of the current service
    Info {
        /// Only show this target
        #[arg(short, long)]
        target: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Remove the stored credentials
    Logout,
}

#[derive(Args)]
struct DeployArgs {
    /// Target name or <cluster>/<projectId>
    #[arg(short, long)]
    target: Option<String>,

    /// Create a new service with this name
    #[arg(short = 'n', long)]
    new_service: Option<String>,

    /// Cluster for the new service
    #[arg(short = 'c', long, requires = "new_service")]
    new_service_cluster: Option<String>,

    /// Alias for a new service
    #[arg(short, long)]
    alias: Option<String>,

    /// Accept data loss caused by destructive changes
    #[arg(short, long)]
    force: bool,

    /// Redeploy whenever the service definition changes
    #[arg(short, long)]
    watch: bool,

    /// Show the changes without applying them
    #[arg(long, conflicts_with = "watch")]
    dry_run: bool,

    /// Print the deploy report as JSON
    #[arg(long)]
    json: bool,
}

impl DeployArgs {
    fn to_options(&self) -> DeployOptions {
        let mut options = DeployOptions::new()
            .with_force(self.force)
            .with_watch(self.watch)
            .with_dry_run(self.dry_run);
        if let Some(target) = &self.target {
            options = options.with_target(target);
        }
        if let Some(name) = &self.new_service {
            options = options.with_new_service(name);
        }
        if let Some(cluster) = &self.new_service_cluster {
            options = options.with_new_service_cluster(cluster);
        }
        if let Some(alias) = &self.alias {
            options = options.with_alias(alias);
        }
        options
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "strata=debug,info"
    } else {
        "strata=info,warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli.command).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

/// Run a command; `Ok(false)` means it completed but did not succeed.
async fn run(command: Commands) -> Result<bool> {
    match command {
        Commands::Deploy(args) => run_deploy(args).await,
        Commands::Info { target, json } => {
            let mut options = InfoOptions::new();
            if let Some(target) = target {
                options = options.with_target(target);
            }
            let report = InfoCommand::with_defaults()?.execute(&options)?;
            print_info(&report, json)?;
            Ok(true)
        }
        Commands::Logout => {
            let report = LogoutCommand::with_defaults()?.execute()?;
            if report.removed {
                println!("✓ Logged out, removed {}", report.path.display());
            } else {
                println!("• Not logged in");
            }
            Ok(true)
        }
    }
}

async fn run_deploy(args: DeployArgs) -> Result<bool> {
    let reporter: Arc<dyn Reporter> = if args.json {
        Arc::new(TracingReporter)
    } else {
        Arc::new(ConsoleReporter::stdout())
    };

    let report = DeployCommand::new(AppContext::with_defaults()?, reporter)
        .execute(&args.to_options())
        .await?;
    tracing::debug!(outcome = ?report.outcome, "deploy command finished");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !report.outcome.is_success() {
        println!(
            "{} Deploy to '{}' finished with {} error(s)",
            style("✗").red(),
            report.target_name,
            report.errors.len()
        );
    }

    Ok(report.outcome.is_success())
}

fn print_info(report: &InfoReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    if report.targets.is_empty() {
        println!("No targets configured.");
        println!("Create one with: strata deploy");
        return Ok(());
    }

    println!("Active cluster: {}", report.active_cluster);
    println!();
    println!(
        "  {:<14} {:<24} {:<28} Endpoint",
        "Name", "Cluster", "Project"
    );
    println!("  {}", "-".repeat(90));
    for target in &report.targets {
        let marker = if target.is_default { "*" } else { " " };
        println!(
            "{} {:<14} {:<24} {:<28} {}",
            marker, target.name, target.cluster, target.project_id, target.endpoint
        );
    }
    Ok(())
}
