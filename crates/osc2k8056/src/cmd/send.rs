use k8056_osc::OscClient;
use tracing::info;

use crate::cmd::SendArgs;
use crate::exit::{osc_error, CliResult, SUCCESS};

pub fn run(args: SendArgs) -> CliResult<i32> {
    let message = args.op.to_message(args.card);
    let mut client =
        OscClient::connect(args.target).map_err(|err| osc_error("connect failed", err))?;
    client
        .send(&message)
        .map_err(|err| osc_error("send failed", err))?;

    info!(
        to = %client.target(),
        path = %message.path,
        types = %message.type_tags(),
        "OSC message sent"
    );
    Ok(SUCCESS)
}
