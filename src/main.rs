use std::process::ExitCode;

use anyhow::Context;
use bilisub::{
    cli::Cli,
    collection::{self, MediaId},
    config::Settings,
    output::ArtifactWriter,
    present::TerminalPresenter,
    session::{CredentialStore, Session},
    transport::HttpTransport,
};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bilisub=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match until_interrupted(run(cli), tokio::signal::ctrl_c()).await {
        Some(Ok(())) => ExitCode::SUCCESS,
        Some(Err(e)) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
        None => {
            eprintln!("\nInterrupted, exiting.");
            ExitCode::from(130)
        }
    }
}

/// Drive `work` to completion unless `interrupt` fires first. An interrupt
/// source that fails to register is ignored.
async fn until_interrupted<T>(
    work: impl Future<Output = T>,
    interrupt: impl Future<Output = std::io::Result<()>>,
) -> Option<T> {
    tokio::select! {
        output = work => Some(output),
        Ok(()) = interrupt => None,
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = cli.apply(Settings::from_env());
    let media = MediaId::parse(&cli.media_id)?;

    let transport = HttpTransport::new().context("building HTTP client")?;
    let mut session = Session::open(
        transport,
        CredentialStore::new(&settings.credentials_file),
        Box::new(TerminalPresenter::default()),
        settings.session_settings(),
    )
    .await?;

    let writer = ArtifactWriter::new(&cli.json_dir, &cli.output);
    let options = settings.walk_options(cli.lan.clone(), cli.part_index(), cli.merge);
    let report = collection::walk(&mut session, &media, &writer, &options).await?;

    for outcome in &report.outcomes {
        if let Some(reason) = &outcome.skipped {
            eprintln!("P{} {}: {reason}", outcome.part.index, outcome.part.title);
        }
    }

    let report = report.into_result()?;

    tracing::info!(
        "Done: {}/{} part(s) with subtitles",
        report.succeeded(),
        report.outcomes.len()
    );
    Ok(())
}
