use pinbus_gpio::{GpioBackend, SimBackend};
use pinbus_server::{Server, ServerConfig};

use crate::cmd::{parse_duration, parse_socket_mode, BackendArg, ServeArgs};
use crate::exit::{server_error, CliError, CliResult, INTERNAL, SUCCESS};

pub fn run(args: ServeArgs) -> CliResult<i32> {
    let config = ServerConfig {
        socket_path: args.socket,
        max_clients: args.max_clients,
        socket_mode: parse_socket_mode(&args.socket_mode)?,
        io_timeout: parse_duration(&args.io_timeout)?,
        poll_interval: parse_duration(&args.poll_interval)?,
    };

    let backend: Box<dyn GpioBackend> = match args.backend {
        BackendArg::Sim => Box::new(SimBackend::new()),
    };

    let mut server =
        Server::bind(config, backend).map_err(|err| server_error("bind failed", err))?;

    let handle = server.handle();
    ctrlc::set_handler(move || handle.stop()).map_err(|err| {
        CliError::new(INTERNAL, format!("signal handler setup failed: {err}"))
    })?;

    server
        .run()
        .map_err(|err| server_error("server failed", err))?;

    Ok(SUCCESS)
}
