use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gh_release::cli::Args;
use gh_release::config::ReleaseConfig;
use gh_release::github::GitHubReleaser;
use gh_release::output;
use gh_release::publisher::Publisher;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = run(args).await {
        println!("{}", output::error_command(&format!("{e:#}")));
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = ReleaseConfig::from_args(&args)?;
    tracing::info!(
        "Releasing {} for {}/{}",
        config.tag,
        config.owner,
        config.repo
    );

    let releaser = GitHubReleaser::new(args.token(), &args.api_url)?;
    let publisher = Publisher::new(releaser, config)
        .with_retry_config(ReleaseConfig::retry_config(&args))
        .with_upload_concurrency(usize::from(args.upload_concurrency));

    let report = publisher.run().await?;

    tracing::info!("🎉 Release ready at {}", report.release.html_url);
    output::write_outputs(&report)?;

    Ok(())
}
