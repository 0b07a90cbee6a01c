use pinbus_client::PinClient;
use pinbus_proto::PwmConfig;

use crate::cmd::{parse_duration, ConnectArgs, PinArgs, PwmArgs, SetModeArgs, SetPudArgs, WriteArgs};
use crate::exit::{client_error, CliResult, FAILURE, SUCCESS};
use crate::output::{print_report, ExchangeReport, OutputFormat};

fn connect(args: &ConnectArgs) -> CliResult<PinClient> {
    let timeout = parse_duration(&args.timeout)?;
    PinClient::connect_with_timeout(&args.socket, Some(timeout))
        .map_err(|err| client_error("connect failed", err))
}

fn exit_for(status: i32) -> i32 {
    if status == 0 {
        SUCCESS
    } else {
        FAILURE
    }
}

pub fn run_set_mode(args: SetModeArgs, format: OutputFormat) -> CliResult<i32> {
    let mut client = connect(&args.connect)?;
    let status = client
        .set_mode(args.pin, args.mode.into())
        .map_err(|err| client_error("set-mode failed", err))?;
    print_report(&ExchangeReport::new("set-mode", args.pin, status), format);
    Ok(exit_for(status))
}

pub fn run_set_pud(args: SetPudArgs, format: OutputFormat) -> CliResult<i32> {
    let mut client = connect(&args.connect)?;
    let status = client
        .set_pud(args.pin, args.pud.into())
        .map_err(|err| client_error("set-pud failed", err))?;
    print_report(&ExchangeReport::new("set-pud", args.pin, status), format);
    Ok(exit_for(status))
}

pub fn run_read(args: PinArgs, format: OutputFormat) -> CliResult<i32> {
    let mut client = connect(&args.connect)?;
    let (level, status) = client
        .read(args.pin)
        .map_err(|err| client_error("read failed", err))?;
    print_report(
        &ExchangeReport::with_level("read", args.pin, status, level),
        format,
    );
    Ok(exit_for(status))
}

pub fn run_write(args: WriteArgs, format: OutputFormat) -> CliResult<i32> {
    let mut client = connect(&args.connect)?;
    let status = client
        .write(args.pin, args.level)
        .map_err(|err| client_error("write failed", err))?;
    print_report(&ExchangeReport::new("write", args.pin, status), format);
    Ok(exit_for(status))
}

pub fn run_pwm(args: PwmArgs, format: OutputFormat) -> CliResult<i32> {
    let mut client = connect(&args.connect)?;
    let status = client
        .set_pwm(
            args.pin,
            PwmConfig {
                frequency: args.frequency,
                range: args.range,
                duty: args.duty,
            },
        )
        .map_err(|err| client_error("pwm failed", err))?;
    print_report(&ExchangeReport::new("pwm", args.pin, status), format);
    Ok(exit_for(status))
}

pub fn run_deinit(args: PinArgs, format: OutputFormat) -> CliResult<i32> {
    let mut client = connect(&args.connect)?;
    let status = client
        .deinit(args.pin)
        .map_err(|err| client_error("deinit failed", err))?;
    print_report(&ExchangeReport::new("deinit", args.pin, status), format);
    Ok(exit_for(status))
}
