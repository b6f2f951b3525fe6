use std::fmt;
use std::io;

use k8056_frame::FrameError;
use k8056_osc::OscError;
use k8056_serial::SerialError;

// Exit code constants.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DEVICE_ERROR: i32 = 3;
pub const HEALTH_CHECK_FAILED: i32 = 30;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::AddrInUse
        | io::ErrorKind::AddrNotAvailable
        | io::ErrorKind::ConnectionRefused => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn serial_error(context: &str, err: SerialError) -> CliError {
    let code = match &err {
        SerialError::Open { source, .. } if source.kind() == io::ErrorKind::PermissionDenied => {
            PERMISSION_DENIED
        }
        SerialError::UnsupportedBaud(_) => USAGE,
        _ => DEVICE_ERROR,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn osc_error(context: &str, err: OscError) -> CliError {
    match err {
        OscError::Bind { addr, source } | OscError::Connect { addr, source } => {
            io_error(&format!("{context} ({addr})"), source)
        }
        OscError::Io(source) => io_error(context, source),
        OscError::InvalidAddress(_) => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_device_is_a_device_error() {
        let err = serial_error(
            "serial open failed",
            SerialError::Open {
                path: "/dev/k8056".into(),
                source: io::Error::from(io::ErrorKind::NotFound),
            },
        );
        assert_eq!(err.code, DEVICE_ERROR);
        assert!(err.message.contains("/dev/k8056"));
    }

    #[test]
    fn forbidden_device_is_permission_denied() {
        let err = serial_error(
            "serial open failed",
            SerialError::Open {
                path: "/dev/k8056".into(),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            },
        );
        assert_eq!(err.code, PERMISSION_DENIED);
    }

    #[test]
    fn busy_port_is_a_failure() {
        let err = osc_error(
            "OSC server failed to start",
            OscError::Bind {
                addr: "0.0.0.0:8056".parse().unwrap(),
                source: io::Error::from(io::ErrorKind::AddrInUse),
            },
        );
        assert_eq!(err.code, FAILURE);
        assert!(err.message.contains("0.0.0.0:8056"));
    }

    #[test]
    fn invalid_relay_is_data_invalid() {
        let err = frame_error("cannot encode", FrameError::InvalidRelay(9));
        assert_eq!(err.code, DATA_INVALID);
    }
}
