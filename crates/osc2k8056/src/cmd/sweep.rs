use k8056_osc::{OscArg, OscClient, OscMessage};
use tracing::{debug, info};

use crate::cmd::{parse_duration, SweepArgs};
use crate::exit::{osc_error, CliError, CliResult, SUCCESS, USAGE};

/// Send every status value in `from..=to` to the bridge, one per delay.
pub fn run(args: SweepArgs) -> CliResult<i32> {
    if args.from > args.to {
        return Err(CliError::new(
            USAGE,
            format!("--from ({}) must not exceed --to ({})", args.from, args.to),
        ));
    }
    let delay = parse_duration(&args.delay)?;
    let mut client =
        OscClient::connect(args.target).map_err(|err| osc_error("connect failed", err))?;

    info!(
        to = %client.target(),
        card = args.card,
        from = args.from,
        until = args.to,
        "sweep started"
    );

    for value in args.from..=args.to {
        let message = OscMessage::new(
            "/k8056/set",
            vec![OscArg::Int(args.card), OscArg::Int(i32::from(value))],
        );
        client
            .send(&message)
            .map_err(|err| osc_error("send failed", err))?;
        debug!(value, "status sent");
        if value != args.to {
            std::thread::sleep(delay);
        }
    }

    info!("sweep finished");
    Ok(SUCCESS)
}
