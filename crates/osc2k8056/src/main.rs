mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "osc2k8056",
    version,
    about = "Bridge OSC control messages to a Velleman K8056 relay card"
)]
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
    use crate::cmd::{RelayOp, RelayState};

    #[test]
    fn parses_serve_subcommand() {
        let cli = Cli::try_parse_from([
            "osc2k8056",
            "serve",
            "--device",
            "/dev/ttyUSB0",
            "--listen",
            "127.0.0.1:9000",
        ])
        .expect("serve args should parse");

        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.device, std::path::PathBuf::from("/dev/ttyUSB0"));
                assert_eq!(args.listen.port(), 9000);
                assert_eq!(args.baud, 2400);
                assert_eq!(args.attempts, 6);
            }
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn parses_relay_state_operation() {
        let cli = Cli::try_parse_from(["osc2k8056", "frame", "-a", "4", "relay", "3", "off"])
            .expect("frame args should parse");

        match cli.command {
            Command::Frame(args) => {
                assert_eq!(args.card, 4);
                assert_eq!(
                    args.op,
                    RelayOp::Relay {
                        relay: 3,
                        state: RelayState::Off
                    }
                );
            }
            other => panic!("expected frame, got {other:?}"),
        }
    }

    #[test]
    fn send_requires_an_operation() {
        assert!(Cli::try_parse_from(["osc2k8056", "send"]).is_err());
    }

    #[test]
    fn rejects_unknown_relay_state() {
        let err = Cli::try_parse_from(["osc2k8056", "frame", "relay", "1", "maybe"])
            .expect_err("bad state should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
