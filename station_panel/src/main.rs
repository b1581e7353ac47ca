#[warn(clippy::pedantic)]
mod error;
mod panel;
mod render;

use crate::error::MainError;
use crate::panel::PanelController;
use crate::render::render;
use std::io::BufRead;
use telemetry::error::InitializationError;
use telemetry::tinygs::fetcher::StationFetcher;
use telemetry::{load_config, shutdown_listener};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), MainError> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();

    tracing::subscriber::set_global_default(subscriber).map_err(InitializationError::Tracing)?;

    let config = load_config().map_err(InitializationError::from)?;
    info!(config = ?config, "config loaded");
    let fetcher = StationFetcher::from_config(&config).map_err(InitializationError::from)?;

    // Listener cancels on SIGINT/SIGTERM; the panel cancels on quit.
    let shutdown_token = CancellationToken::new();
    let signal_handle = tokio::spawn(shutdown_listener(Some(shutdown_token.clone())));
    let panel_handle = tokio::spawn(run_panel(fetcher, config.station, shutdown_token.clone()));

    tokio::select! {
        res = panel_handle => {
            shutdown_token.cancel();
            res??;
        }
        res = signal_handle => {
            shutdown_token.cancel();
            res?;
        }
    }

    Ok(())
}

/// Renders the panel on every state change. Enter refreshes, `q` quits.
async fn run_panel(
    fetcher: StationFetcher,
    station: String,
    shutdown: CancellationToken,
) -> Result<(), MainError> {
    let mut controller = PanelController::new(fetcher, &station, shutdown.clone());
    let changed = controller.changed();
    let mut lines = spawn_stdin_reader();
    let mut stdout = tokio::io::stdout();

    info!(station = %station, "starting station panel");
    controller.refresh();

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("shutdown requested, closing station panel");
                break;
            }
            _ = changed.notified() => {
                draw(&mut stdout, &controller).await?;
            }
            line = lines.recv() => match line.transpose()? {
                Some(input) if input.trim().eq_ignore_ascii_case("q") => break,
                Some(_) => {
                    debug!("refresh requested");
                    controller.refresh();
                }
                None => {
                    // No interactive input: show the outcome of the current fetch and exit.
                    controller.settle().await?;
                    draw(&mut stdout, &controller).await?;
                    break;
                }
            },
        }
    }

    Ok(())
}

/// Reads stdin on a plain thread; tokio's stdin would block runtime shutdown on a pending read.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<std::io::Result<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

async fn draw(
    stdout: &mut tokio::io::Stdout,
    controller: &PanelController,
) -> Result<(), MainError> {
    let mut frame = render(&controller.state());
    frame.push_str("\n\n");
    stdout.write_all(frame.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}
