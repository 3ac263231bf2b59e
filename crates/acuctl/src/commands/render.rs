//! Rendering for command results.

use std::fmt::Write;

use tabled::Tabled;

use acu_core::{CommandResult, FrameExchange, LinkStatus, MetricsTable, SerialPort};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PortRow {
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&SerialPort> for PortRow {
    fn from(p: &SerialPort) -> Self {
        Self {
            device: p.device.clone(),
            description: p.description.clone(),
        }
    }
}

// ── Detail views ────────────────────────────────────────────────────

fn link_detail(link: &LinkStatus) -> String {
    let connected = link
        .connected
        .map_or_else(|| "-".to_owned(), |c| c.to_string());
    format!(
        "connected: {connected}\nmode:      {}",
        link.mode.as_deref().unwrap_or("-")
    )
}

fn exchange_detail(exchange: &FrameExchange) -> String {
    format!("TX  {}\nRX  {}", exchange.frame, exchange.response)
}

// ── Entry point ─────────────────────────────────────────────────────

/// Render one command result. `metrics` is the table after the command's
/// telemetry was merged; it is appended in table mode when the reply
/// carried a parsed snapshot.
pub fn render(
    result: &CommandResult,
    metrics: &MetricsTable,
    global: &GlobalOpts,
) -> Result<String, CliError> {
    let format = global.output_format();
    match result {
        CommandResult::Ports(ports) => {
            output::render_list(format, ports, |p| PortRow::from(p), |p| p.device.clone())
        }

        CommandResult::Link(link) => output::render_single(format, link, link_detail, |l| {
            l.mode.clone().unwrap_or_else(|| "-".into())
        }),

        CommandResult::Exchange(exchange) => {
            let mut out = output::render_single(format, exchange, exchange_detail, |e| {
                e.response.clone()
            })?;
            if format == OutputFormat::Table
                && exchange.parsed.as_ref().is_some_and(|p| !p.is_empty())
            {
                let _ = write!(out, "\n\n{}", output::metrics_table(metrics));
            }
            Ok(out)
        }

        CommandResult::LocalOscillator(readback) => output::render_single(
            format,
            readback,
            |r| {
                format!(
                    "BEACON\n{}\n\nDVB\n{}",
                    exchange_detail(&r.beacon),
                    exchange_detail(&r.dvb)
                )
            },
            |r| format!("{}\n{}", r.beacon.response, r.dvb.response),
        ),
    }
}
