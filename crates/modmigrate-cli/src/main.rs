use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use modmigrate_api::ModrinthClient;
use modmigrate_core::{
    report, Config, Journal, MigrationEngine, MigrationRequest, ModrinthCatalog,
};

mod prompt;

use prompt::Confirmation;

#[derive(Parser)]
#[command(name = "modmigrate")]
#[command(
    version,
    about = "Check a Modrinth collection for target-version updates and compare with a target collection",
    long_about = None
)]
struct Cli {
    /// ID of the source collection to check
    #[arg(short = 'c', long = "collection")]
    collection: String,

    /// ID of the target collection to check for already saved mods
    #[arg(short = 't', long = "target-collection")]
    target_collection: String,

    /// Game version you are currently using
    #[arg(long = "current-version")]
    current_version: String,

    /// Game version to check for updates
    #[arg(long = "target-version")]
    target_version: String,

    /// Loader to use ("fabric", "forge", "quilt" etc)
    #[arg(short = 'l', long)]
    loader: String,

    /// Directory for the journal files (overrides config)
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// API base URL (overrides config)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Write the full run report as JSON
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Run non-interactively: decline the browser prompt and skip the
    /// final pause
    #[arg(long)]
    no_interaction: bool,
}

#[tokio::main]
async fn main() {
    // Initialize logging - helps when things go sideways
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "modmigrate=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let outcome = run(&cli).await;

    if let Err(e) = &outcome {
        // Printed before the pause so the message stays on screen even
        // when the window closes on exit
        eprintln!("An unexpected error occurred: {:#}", e);
    }

    if !cli.no_interaction {
        prompt::pause_before_exit();
    }

    if outcome.is_err() {
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {}", e);
        Config::default()
    });

    if let Some(base_url) = &cli.base_url {
        config.platform.api_url = base_url.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.logs.dir = dir.clone();
    }

    let request = MigrationRequest {
        source_collection: cli.collection.clone(),
        target_collection: cli.target_collection.clone(),
        current_version: cli.current_version.clone(),
        target_version: cli.target_version.clone(),
        loader: cli.loader.clone(),
    };

    let client = ModrinthClient::with_base_url(config.platform.api_url.clone());
    let catalog = ModrinthCatalog::new(client);
    let journal = Journal::new(
        config.logs.dir.clone(),
        config.platform.site_url.clone(),
        &request,
    );
    let engine = MigrationEngine::new(Box::new(catalog), journal);

    // A missing source collection ends the run with a message, not a
    // crash - there is nothing to check without it
    let report_data = match engine.run(&request).await {
        Ok(report_data) => report_data,
        Err(modmigrate_core::Error::NotFound(_)) => {
            println!("Collection id={} not found", cli.collection);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    print!("{}", report::render_summary(&report_data));

    if let Some(path) = &cli.export {
        report::export_json(&report_data, path)?;
        println!("\nReport exported to {}", path.display());
    }

    if cli.no_interaction {
        return Ok(());
    }

    maybe_open_links(&report_data.update_links, &prompt::StdinConfirmation);

    Ok(())
}

/// Offer to open every update link in the default browser. Returns how
/// many links were actually opened.
fn maybe_open_links(links: &[String], confirmation: &dyn Confirmation) -> usize {
    if links.is_empty() {
        return 0;
    }

    let question = "\nDo you want to open all mods that have a version update in your browser?";
    if !confirmation.confirm(question) {
        println!("Not opening any links.");
        return 0;
    }

    println!("Opening all updated mod links in your browser...");
    let mut opened = 0;
    for link in links {
        match open::that(link) {
            Ok(()) => opened += 1,
            Err(e) => tracing::warn!("Failed to open {}: {}", link, e),
        }
    }
    opened
}
