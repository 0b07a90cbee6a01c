use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};

use pinbus_proto::{PinMode, PinPud};
use pinbus_server::DEFAULT_SOCKET_PATH;

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod pin;
pub mod serve;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the GPIO daemon.
    Serve(ServeArgs),
    /// Configure the electrical mode of a pin.
    SetMode(SetModeArgs),
    /// Configure the bias resistor of a pin.
    SetPud(SetPudArgs),
    /// Read the logic level of a pin.
    Read(PinArgs),
    /// Drive a pin to a logic level.
    Write(WriteArgs),
    /// Configure PWM output on a pin.
    Pwm(PwmArgs),
    /// Return a pin to its power-on state.
    Deinit(PinArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Serve(args) => serve::run(args),
        Command::SetMode(args) => pin::run_set_mode(args, format),
        Command::SetPud(args) => pin::run_set_pud(args, format),
        Command::Read(args) => pin::run_read(args, format),
        Command::Write(args) => pin::run_write(args, format),
        Command::Pwm(args) => pin::run_pwm(args, format),
        Command::Deinit(args) => pin::run_deinit(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Shared connection flags for the one-shot client commands.
#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Daemon socket path.
    #[arg(long, default_value = DEFAULT_SOCKET_PATH)]
    pub socket: PathBuf,
    /// Per-exchange I/O timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Socket path to bind.
    #[arg(long, default_value = DEFAULT_SOCKET_PATH)]
    pub socket: PathBuf,
    /// Maximum number of concurrent clients.
    #[arg(long, default_value_t = 16)]
    pub max_clients: usize,
    /// Permission mode of the socket file, octal. This is the trust
    /// boundary; the default admits every local user.
    #[arg(long, default_value = "666")]
    pub socket_mode: String,
    /// Per-connection I/O timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub io_timeout: String,
    /// Readiness-wait tick; bounds shutdown latency.
    #[arg(long, default_value = "500ms")]
    pub poll_interval: String,
    /// Hardware backend to drive.
    #[arg(long, value_enum, default_value_t = BackendArg::Sim)]
    pub backend: BackendArg,
}

/// Backend selected at startup.
///
/// A chip-specific backend registers here as a new variant; `sim` keeps
/// the daemon runnable on any machine.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum BackendArg {
    /// In-memory simulator (no hardware access).
    Sim,
}

#[derive(Args, Debug)]
pub struct SetModeArgs {
    /// Pin number (BCM numbering).
    pub pin: u16,
    /// Electrical mode.
    #[arg(value_enum)]
    pub mode: ModeArg,
    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Args, Debug)]
pub struct SetPudArgs {
    /// Pin number (BCM numbering).
    pub pin: u16,
    /// Bias resistor configuration.
    #[arg(value_enum)]
    pub pud: PudArg,
    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Args, Debug)]
pub struct PinArgs {
    /// Pin number (BCM numbering).
    pub pin: u16,
    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    /// Pin number (BCM numbering).
    pub pin: u16,
    /// Logic level (0 or 1).
    pub level: u8,
    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Args, Debug)]
pub struct PwmArgs {
    /// Pin number (BCM numbering).
    pub pin: u16,
    /// PWM frequency in Hz.
    pub frequency: u32,
    /// Duty cycle range.
    pub range: u32,
    /// Duty cycle, relative to the range.
    pub duty: u32,
    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Args, Debug, Default)]
pub struct VersionArgs {}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ModeArg {
    Input,
    Output,
    OpenDrain,
    OpenSource,
    Pwm,
}

impl From<ModeArg> for PinMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Input => PinMode::Input,
            ModeArg::Output => PinMode::OutputPushPull,
            ModeArg::OpenDrain => PinMode::OutputOpenDrain,
            ModeArg::OpenSource => PinMode::OutputOpenSource,
            ModeArg::Pwm => PinMode::Pwm,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum PudArg {
    Floating,
    Up,
    Down,
}

impl From<PudArg> for PinPud {
    fn from(pud: PudArg) -> Self {
        match pud {
            PudArg::Floating => PinPud::Floating,
            PudArg::Up => PinPud::PullUp,
            PudArg::Down => PinPud::PullDown,
        }
    }
}

pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}

pub(crate) fn parse_socket_mode(input: &str) -> CliResult<u32> {
    let digits = input.trim().trim_start_matches("0o");
    u32::from_str_radix(digits, 8)
        .map_err(|_| CliError::new(USAGE, format!("invalid octal socket mode: {input}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
    }

    #[test]
    fn parse_socket_mode_accepts_octal_forms() {
        assert_eq!(parse_socket_mode("666").unwrap(), 0o666);
        assert_eq!(parse_socket_mode("0o600").unwrap(), 0o600);
        assert!(parse_socket_mode("9x").is_err());
    }

    #[test]
    fn mode_and_pud_args_map_onto_wire_enums() {
        assert_eq!(PinMode::from(ModeArg::Output), PinMode::OutputPushPull);
        assert_eq!(PinMode::from(ModeArg::Pwm), PinMode::Pwm);
        assert_eq!(PinPud::from(PudArg::Up), PinPud::PullUp);
    }
}
