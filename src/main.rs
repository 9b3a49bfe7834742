use anyhow::Result;
use clap::Parser;
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use youtube_to_docs::{Cli, Credentials, DocsPipeline, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "youtube_to_docs=debug"
    } else {
        "youtube_to_docs=info"
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = Settings::load(cli.config.as_deref())?;
    let credentials = Credentials::from_env();
    tracing::debug!(?credentials, "Loaded credentials");

    let pipeline = DocsPipeline::new(settings, &credentials, cli.model.as_deref(), !cli.quiet)?;

    let report = pipeline.run(&cli.identifier, &cli.outfile).await?;

    println!(
        "{} Wrote {} of {} video(s) to {}",
        style("✓").green().bold(),
        report.written,
        report.requested,
        style(report.table_path.display()).cyan()
    );
    if report.skipped() > 0 {
        println!(
            "{} Skipped {} video(s); see the log for details",
            style("!").yellow().bold(),
            report.skipped()
        );
    }

    Ok(())
}
