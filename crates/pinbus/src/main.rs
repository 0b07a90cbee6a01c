mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "pinbus", version, about = "GPIO control daemon and client")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_subcommand() {
        let cli = Cli::try_parse_from([
            "pinbus",
            "serve",
            "--socket",
            "/tmp/test.sock",
            "--max-clients",
            "4",
            "--backend",
            "sim",
        ])
        .expect("serve args should parse");

        assert!(matches!(cli.command, Command::Serve(_)));
    }

    #[test]
    fn parses_write_subcommand() {
        let cli = Cli::try_parse_from([
            "pinbus",
            "write",
            "23",
            "1",
            "--socket",
            "/tmp/test.sock",
        ])
        .expect("write args should parse");

        match cli.command {
            Command::Write(args) => {
                assert_eq!(args.pin, 23);
                assert_eq!(args.level, 1);
            }
            other => panic!("expected write, got {other:?}"),
        }
    }

    #[test]
    fn parses_set_mode_value_enum() {
        let cli = Cli::try_parse_from(["pinbus", "set-mode", "23", "output"])
            .expect("set-mode args should parse");
        assert!(matches!(cli.command, Command::SetMode(_)));
    }

    #[test]
    fn rejects_unknown_mode_value() {
        let err = Cli::try_parse_from(["pinbus", "set-mode", "23", "sideways"])
            .expect_err("unknown mode should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn parses_pwm_subcommand() {
        let cli = Cli::try_parse_from(["pinbus", "pwm", "18", "1000", "256", "128"])
            .expect("pwm args should parse");
        assert!(matches!(cli.command, Command::Pwm(_)));
    }
}
