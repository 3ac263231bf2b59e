//! Translate parsed CLI arguments into core commands.

use std::str::FromStr;

use acu_core::{
    AntennaAction, Command as CoreCommand, LoMode, LocalOscillatorForm, LocationForm,
    ManualPositionForm, SatelliteForm, SpeedForm,
};

use crate::cli::{
    AntennaCommand, Command, ConnectCommand, LoCommand, LocationCommand, ManualCommand,
    SatelliteCommand,
};
use crate::error::CliError;

/// Build the core command for a backend-bound CLI command.
///
/// Returns `None` for commands handled locally (config, completions) or
/// with their own lifecycle (monitor).
pub fn to_core(cmd: Command) -> Result<Option<CoreCommand>, CliError> {
    let core = match cmd {
        Command::Ports => CoreCommand::ListPorts,
        Command::Connect(args) => match args.command {
            ConnectCommand::Serial { port } => CoreCommand::ConnectSerial { port },
            ConnectCommand::Tcp { target } => CoreCommand::ConnectTcp { target },
        },
        Command::Disconnect => CoreCommand::Disconnect,
        Command::Mode => CoreCommand::Mode,
        Command::Connected => CoreCommand::Connected,
        Command::Send(args) => {
            CoreCommand::custom(args.code, &args.data, args.retries, args.timeout)
        }
        Command::Stop => CoreCommand::stop(),
        Command::Status => CoreCommand::Status,

        Command::Satellite(args) => match args.command {
            SatelliteCommand::Get => CoreCommand::GetSatellite,
            SatelliteCommand::Set {
                name,
                center_freq,
                carrier_freq,
                carrier_rate,
                sat_longitude,
                pol_mode,
                lock_threshold,
            } => CoreCommand::SetSatellite(SatelliteForm {
                name,
                center_freq,
                carrier_freq,
                carrier_rate,
                sat_longitude,
                pol_mode,
                lock_threshold,
            }),
        },

        Command::Location(args) => match args.command {
            LocationCommand::Get => CoreCommand::GetLocation,
            LocationCommand::Set {
                longitude,
                latitude,
                heading,
            } => CoreCommand::SetLocation(LocationForm {
                longitude,
                latitude,
                heading,
            }),
        },

        Command::Manual(args) => match args.command {
            ManualCommand::Dirx {
                sport_type,
                az_target,
                az_speed,
                pitch_target,
                pitch_speed,
                pol_target,
                pol_speed,
            } => CoreCommand::ManualPosition(ManualPositionForm {
                sport_type,
                az_target,
                az_speed,
                pitch_target,
                pitch_speed,
                pol_target,
                pol_speed,
            }),
            ManualCommand::Speed {
                direction_code,
                speed,
            } => CoreCommand::ManualSpeed(SpeedForm {
                direction_code,
                speed,
            }),
        },

        Command::Lo(args) => match args.command {
            LoCommand::Get => CoreCommand::GetLocalOscillator,
            LoCommand::Set { mode, lo_mhz, gain } => {
                CoreCommand::SetLocalOscillator(LocalOscillatorForm {
                    mode: parse_named::<LoMode>("mode", &mode, "beacon or dvb")?,
                    lo_mhz,
                    gain,
                })
            }
        },

        Command::Antenna(args) => match args.command {
            AntennaCommand::Reset => CoreCommand::Antenna(AntennaAction::Reset),
            AntennaCommand::AlignStar => CoreCommand::Antenna(AntennaAction::AlignStar),
            AntennaCommand::Stow => CoreCommand::Antenna(AntennaAction::Collection),
            AntennaCommand::Action { name } => CoreCommand::AntennaAction(parse_named(
                "action",
                &name,
                "reset, align_star, collection or stop",
            )?),
        },

        Command::Monitor(_) | Command::Config(_) | Command::Completions(_) => return Ok(None),
    };
    Ok(Some(core))
}

fn parse_named<T: FromStr>(field: &str, raw: &str, expected: &str) -> Result<T, CliError> {
    raw.trim().parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("expected {expected}, got '{raw}'"),
    })
}
