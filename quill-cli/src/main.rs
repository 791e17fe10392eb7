use anyhow::Result;
use clap::Parser;
use quill_cli::{ApiClient, Cli, CliContext, RenderOptions, Renderer, Session, cli_modes};
use quill_core::Config;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("quill: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "quill=debug,quill_cli=debug,quill_core=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let mut config = Config::load()?;
    if let Some(url) = &cli.api_url {
        config.client.api_url = url.trim_end_matches('/').to_string();
    }
    if let Some(user) = &cli.user {
        config.client.user = Some(user.clone());
    }
    if let Some(token) = &cli.token {
        config.client.token = Some(token.clone());
    }

    let renderer = Renderer::new(Some(RenderOptions {
        date_format: config.client.date_format.clone(),
        use_color: cli.color.use_color(),
        short_mode: cli.short,
    }));

    let session = Arc::new(Session::open_with_header(
        &config.client,
        &config.identity_header,
    )?);
    let client = ApiClient::new(session.clone());
    let ctx = CliContext {
        cli: &cli,
        renderer: &renderer,
        client: &client,
        config: &config.client,
    };

    let result = cli_modes::run(&ctx).await;
    session.close();
    result
}
