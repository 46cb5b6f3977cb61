use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use roster_core::{load_settings, Collaborators, Coordinator, HttpUserService};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::error::RecvError,
    task::JoinHandle,
};
use tracing_subscriber::EnvFilter;

mod commands;
mod orchestration;
mod render;

use commands::{parse, ParseError, HELP};
use orchestration::{Flow, Prompt};

#[derive(Parser, Debug)]
struct Args {
    /// Overrides `server_url` from roster.toml and the environment.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
}

fn spawn_renderer(coordinator: &Coordinator) -> JoinHandle<()> {
    let mut events = coordinator.subscribe_events();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Some(text) = render::render_event(&event) {
                        println!("{}", text.trim_end());
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "renderer lagged behind coordinator events");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

/// Signs in, turning a failure into the message the coordinator recorded.
async fn sign_in(coordinator: &Coordinator, email: &str, password: &str) -> Result<()> {
    if let Err(err) = coordinator.on_login(email, password).await {
        let message = coordinator
            .snapshot()
            .await
            .last_failure
            .map(|failure| failure.message().to_string())
            .unwrap_or_else(|| err.to_string());
        anyhow::bail!(message);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    let base = settings.server_url()?;
    let service = HttpUserService::with_timeout(base.clone(), settings.request_timeout())
        .context("failed to build http client")?;
    let coordinator = Arc::new(Coordinator::new(
        Collaborators::from_service(Arc::new(service)),
        &settings,
    ));
    tracing::info!(server_url = %base, "roster client starting");

    let renderer = spawn_renderer(&coordinator);

    if let Err(err) = sign_in(&coordinator, &args.email, &args.password).await {
        renderer.abort();
        return Err(err);
    }
    println!("{HELP}");

    let mut prompt = Prompt::new(Arc::clone(&coordinator));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse(&line) {
            Ok(command) => command,
            Err(ParseError::Empty) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        if prompt.handle(command).await == Flow::Exit {
            break;
        }
    }

    renderer.abort();
    Ok(())
}
