//! Command dispatch: bridges CLI args -> core Commands -> output formatting.

pub mod config_cmd;
pub mod monitor;
pub mod render;
pub mod request;

use acu_core::{Console, ConsoleConfig};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    config: ConsoleConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Command::Monitor(args) = cmd {
        return monitor::handle(config, args, global).await;
    }

    let Some(core) = request::to_core(cmd)? else {
        return Ok(());
    };

    let (result, metrics) = Console::oneshot(config, |console| async move {
        let result = console.execute(core).await?;
        Ok((result, console.metrics()))
    })
    .await?;

    let out = render::render(&result, &metrics, global)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
