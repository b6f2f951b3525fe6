use crate::cmd::ServeArgs;
use crate::exit::CliResult;

#[cfg(unix)]
pub fn run(args: ServeArgs) -> CliResult<i32> {
    use k8056_frame::{FrameWriter, TransmitConfig};
    use k8056_osc::{OscServer, ServerConfig};
    use k8056_serial::{LineConfig, SerialPort};
    use osc2k8056::{bridge, Dispatcher, Shutdown};
    use tracing::info;

    use crate::cmd::parse_duration;
    use crate::exit::{osc_error, serial_error, CliError, SUCCESS, USAGE};

    if args.attempts == 0 {
        return Err(CliError::new(USAGE, "--attempts must be at least 1"));
    }
    let transmit = TransmitConfig {
        attempts: args.attempts,
        interval: parse_duration(&args.interval)?,
    };
    let server_config = ServerConfig {
        poll_interval: parse_duration(&args.poll_interval)?,
        ..ServerConfig::default()
    };

    let port = SerialPort::open_with_config(
        &args.device,
        &LineConfig {
            baud_rate: args.baud,
        },
    )
    .map_err(|err| serial_error("serial open failed", err))?;

    // The port restores its saved settings on drop if binding fails here.
    let mut server = OscServer::bind_with_config(args.listen, server_config)
        .map_err(|err| osc_error("OSC server failed to start", err))?;

    let shutdown = Shutdown::new();
    install_termination_handler(shutdown.clone())?;

    info!(
        device = %args.device.display(),
        listen = %server.local_addr(),
        "bridge running"
    );

    let mut dispatcher = Dispatcher::new(FrameWriter::with_config(port, transmit));
    bridge::run(&mut server, &mut dispatcher, &shutdown);

    dispatcher
        .into_writer()
        .into_inner()
        .close()
        .map_err(|err| serial_error("serial close failed", err))?;

    Ok(SUCCESS)
}

#[cfg(not(unix))]
pub fn run(_args: ServeArgs) -> CliResult<i32> {
    Err(crate::exit::CliError::new(
        crate::exit::FAILURE,
        "serial devices are only supported on Unix platforms",
    ))
}

/// SIGINT, SIGTERM and SIGHUP all request a clean stop.
#[cfg(unix)]
fn install_termination_handler(shutdown: osc2k8056::Shutdown) -> CliResult<()> {
    ctrlc::set_handler(move || shutdown.request()).map_err(|err| {
        crate::exit::CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
