use std::path::PathBuf;

/// Errors that can occur while managing the serial line.
#[derive(Debug, thiserror::Error)]
pub enum SerialError {
    /// Failed to open the device node.
    #[error("failed to open serial device {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A termios call on an open device failed.
    #[error("failed to configure serial device {path} ({op}): {source}")]
    Configure {
        path: PathBuf,
        op: &'static str,
        source: std::io::Error,
    },

    /// The requested baud rate has no termios speed constant.
    #[error("unsupported baud rate: {0}")]
    UnsupportedBaud(u32),

    /// An I/O error occurred on the open line.
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SerialError>;
