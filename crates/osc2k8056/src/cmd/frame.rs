use k8056_frame::Frame;
use osc2k8056::Route;

use crate::cmd::{FrameArgs, RelayOp};
use crate::exit::{frame_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: FrameArgs, format: OutputFormat) -> CliResult<i32> {
    let (operation, frame) = resolve(&args.op, args.card)?;
    print_frame(&frame, operation, format);
    Ok(SUCCESS)
}

/// Encode an operation exactly as the bridge would for the same message.
fn resolve(op: &RelayOp, card: i32) -> CliResult<(&'static str, Frame)> {
    let message = op.to_message(card);
    let command = match Route::from_message(&message) {
        Route::Command(command) => command,
        Route::Unhandled { path, types } => {
            return Err(CliError::new(
                INTERNAL,
                format!("no operation for {path} ({types})"),
            ))
        }
    };
    let frame = command
        .to_frame()
        .map_err(|err| frame_error("cannot encode frame", err))?;
    Ok((command.name(), frame))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::RelayState;
    use crate::exit::DATA_INVALID;

    #[test]
    fn set_relay_keeps_raw_index() {
        let (name, frame) = resolve(&RelayOp::SetRelay { relay: 3 }, 5).unwrap();
        assert_eq!(name, "set_relay");
        assert_eq!(frame.as_bytes(), &[13, 5, b'S', 3, 152]);
    }

    #[test]
    fn relay_off_uses_relay_code() {
        let op = RelayOp::Relay {
            relay: 2,
            state: RelayState::Off,
        };
        let (_, frame) = resolve(&op, 1).unwrap();
        assert_eq!(frame.instruction(), b'C');
        assert_eq!(frame.value(), b'2');
    }

    #[test]
    fn set_address_goes_to_the_card() {
        let (_, frame) = resolve(&RelayOp::SetAddress { new_address: 9 }, 3).unwrap();
        assert_eq!(frame.address(), 3);
        assert_eq!(frame.instruction(), b'T');
        assert_eq!(frame.value(), 9);
    }

    #[test]
    fn out_of_range_relay_is_data_invalid() {
        let err = resolve(&RelayOp::ClearRelay { relay: 9 }, 1).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
    }
}
