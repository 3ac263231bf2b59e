//! `acuctl monitor`: run every enabled channel, tail the operator log and
//! print the telemetry table on an interval until Ctrl-C.

use std::fmt::Write;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use acu_core::{ConnectionStatus, Console, ConsoleConfig, FeedTexts, MetricsTable};

use crate::cli::{GlobalOpts, MonitorArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct MonitorSnapshot<'a> {
    status: &'a ConnectionStatus,
    metrics: &'a MetricsTable,
    feeds: &'a FeedTexts,
}

pub async fn handle(
    config: ConsoleConfig,
    args: MonitorArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(global.color_mode());
    let console = Console::new(config)?;
    console.set_streaming(!args.no_stream);

    let mut log_rx = console.log_entries();
    console.start().await?;

    let mut ticker = tokio::time::interval(Duration::from_secs(args.interval.max(1)));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            biased;
            _ = &mut ctrl_c => break,
            entry = log_rx.recv() => match entry {
                Ok(entry) => {
                    let line = match global.output_format() {
                        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
                            serde_json::to_string(&*entry)
                                .map_err(|e| CliError::Render(e.to_string()))?
                        }
                        OutputFormat::Table | OutputFormat::Plain => output::log_line(&entry, color),
                    };
                    output::print_output(&line, global.quiet);
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "operator log subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            },
            _ = ticker.tick() => {
                let out = render_snapshot(&console, global.output_format(), color)?;
                output::print_output(&out, global.quiet);
            }
        }
    }

    console.shutdown().await;
    Ok(())
}

fn render_snapshot(
    console: &Console,
    format: OutputFormat,
    color: bool,
) -> Result<String, CliError> {
    let status = console.connection_status();
    let metrics = console.metrics();
    let feeds = console.feeds();
    let snapshot = MonitorSnapshot {
        status: &status,
        metrics: &metrics,
        feeds: &feeds,
    };

    match format {
        OutputFormat::Table => {
            let mut out = output::status_line(&status, color);
            let _ = write!(out, "\n{}", output::metrics_table(&metrics));
            for (title, text) in [
                ("satellite", &feeds.satellite),
                ("location", &feeds.location),
                ("lo", &feeds.local_oscillator),
            ] {
                if let Some(text) = text {
                    let _ = write!(out, "\n[{title}]\n{text}");
                }
            }
            Ok(out)
        }
        OutputFormat::Plain => {
            let mut out = output::status_line(&status, false);
            for (key, value) in metrics.iter() {
                let _ = write!(out, "\n{key}={value}");
            }
            Ok(out)
        }
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
            serde_json::to_string(&snapshot).map_err(|e| CliError::Render(e.to_string()))
        }
    }
}
