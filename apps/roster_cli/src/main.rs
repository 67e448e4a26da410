use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{CollectionViewController, HttpStudentApi};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::error::RecvError,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod render;

use commands::{parse_intent, CommandError, Intent, HELP};
use config::{load_settings, DEFAULT_CONFIG_PATH};
use render::render;

#[derive(Parser, Debug)]
#[command(about = "Register students and page through the roster")]
struct Args {
    /// API origin; the student collection lives under `lasalle-student/`.
    #[arg(long)]
    api_base_url: Option<String>,
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[arg(long)]
    log_filter: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (mut settings, config_error) = load_settings(&args.config);
    if let Some(v) = args.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(v) = args.log_filter {
        settings.log_filter = v;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&settings.log_filter)
                .with_context(|| format!("invalid log filter '{}'", settings.log_filter))?,
        )
        .with_writer(std::io::stderr)
        .init();
    if let Some(err) = config_error {
        warn!(error = %err, "roster: config file skipped");
    }

    let api = HttpStudentApi::new(&settings.api_base_url)
        .with_context(|| format!("invalid api base url '{}'", settings.api_base_url))?;
    info!(students_url = %api.students_url(), "roster: starting");
    let controller = CollectionViewController::new(Arc::new(api));

    let mut events = controller.subscribe();
    let renderer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(snapshot) => println!("\n{}", render(&snapshot)),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "roster: renderer fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    controller.mount().await;
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let intent = match parse_intent(&line) {
            Ok(intent) => intent,
            Err(CommandError::Empty) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        match intent {
            Intent::SetField { field, value } => {
                controller.update_draft_field(field, &value).await;
            }
            Intent::Submit => {
                // The reload keeps running in the background.
                if let Err(err) = controller.submit_draft().await {
                    debug!(
                        error = %err,
                        validation = err.is_validation(),
                        "roster: submit did not go through"
                    );
                }
            }
            Intent::NextPage => {
                if controller.go_to_next_page().await.is_none() {
                    println!("already on the last page");
                }
            }
            Intent::PreviousPage => {
                if controller.go_to_previous_page().await.is_none() {
                    println!("already on the first page");
                }
            }
            Intent::Reload => {
                let page = controller.snapshot().await.current_page;
                controller.load_page(page).await;
            }
            Intent::Show => println!("\n{}", render(&controller.snapshot().await)),
            Intent::Help => println!("{HELP}"),
            Intent::Quit => break,
        }
    }

    renderer.abort();
    Ok(())
}
