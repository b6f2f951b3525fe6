use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Result, SerialError};
use crate::traits::SerialLine;
use crate::DEFAULT_BAUD_RATE;

/// Line settings applied when the port is opened.
#[derive(Debug, Clone)]
pub struct LineConfig {
    /// Output and input speed in baud. Default: 2400.
    pub baud_rate: u32,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}

/// An open, raw-mode serial device.
///
/// Opened write-only without becoming the controlling terminal. The termios
/// settings found at open time are saved and restored by [`SerialPort::close`],
/// or on drop if `close` was never called.
pub struct SerialPort {
    file: File,
    path: PathBuf,
    baud_rate: u32,
    saved: libc::termios,
    restore_on_drop: bool,
}

impl SerialPort {
    /// Open `path` with the default 2400 baud configuration.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, &LineConfig::default())
    }

    /// Open `path` and apply raw 8-bit mode at the configured speed.
    pub fn open_with_config(path: impl AsRef<Path>, config: &LineConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let speed = baud_constant(config.baud_rate)
            .ok_or(SerialError::UnsupportedBaud(config.baud_rate))?;

        let file = OpenOptions::new()
            .write(true)
            .custom_flags(libc::O_NOCTTY | libc::O_NDELAY)
            .open(&path)
            .map_err(|source| SerialError::Open {
                path: path.clone(),
                source,
            })?;
        let fd = file.as_raw_fd();

        // SAFETY: `termios` is a plain C struct for which all-zero is a valid value.
        let mut saved: libc::termios = unsafe { std::mem::zeroed() };
        // SAFETY: `fd` is open for the lifetime of `file` and `saved` is writable.
        if unsafe { libc::tcgetattr(fd, &mut saved) } != 0 {
            return Err(configure_error(&path, "tcgetattr"));
        }

        // Everything not named here stays zero: no input processing, no
        // echo, no canonical mode, no output post-processing.
        // SAFETY: as above, all-zero is a valid termios.
        let mut raw: libc::termios = unsafe { std::mem::zeroed() };
        raw.c_cflag = libc::CS8 | libc::CLOCAL | libc::CREAD;
        raw.c_oflag = 0;

        // SAFETY: `raw` is a valid termios owned by this frame.
        let speed_rc =
            unsafe { libc::cfsetispeed(&mut raw, speed) | libc::cfsetospeed(&mut raw, speed) };
        if speed_rc != 0 {
            return Err(configure_error(&path, "cfsetspeed"));
        }

        // SAFETY: `fd` is an open descriptor owned by `file`.
        if unsafe { libc::tcflush(fd, libc::TCOFLUSH) } != 0 {
            return Err(configure_error(&path, "tcflush"));
        }
        // SAFETY: `fd` is open and `raw` points to a fully initialised termios.
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &raw) } != 0 {
            return Err(configure_error(&path, "tcsetattr"));
        }

        info!(?path, baud = config.baud_rate, "serial line configured");

        Ok(Self {
            file,
            path,
            baud_rate: config.baud_rate,
            saved,
            restore_on_drop: true,
        })
    }

    /// Restore the saved line settings and release the device.
    pub fn close(mut self) -> Result<()> {
        self.restore_on_drop = false;
        self.restore()?;
        debug!(path = ?self.path, "serial line restored and closed");
        Ok(())
    }

    /// Device path this port was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Configured line speed.
    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    fn restore(&mut self) -> Result<()> {
        // SAFETY: the descriptor is still owned by `self.file`; `saved` was
        // filled by tcgetattr at open time.
        if unsafe { libc::tcsetattr(self.file.as_raw_fd(), libc::TCSANOW, &self.saved) } != 0 {
            return Err(configure_error(&self.path, "tcsetattr"));
        }
        Ok(())
    }
}

impl Write for SerialPort {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl SerialLine for SerialPort {
    fn discard_output(&mut self) -> io::Result<()> {
        // SAFETY: the descriptor is open for as long as `self.file` lives.
        if unsafe { libc::tcflush(self.file.as_raw_fd(), libc::TCOFLUSH) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl Drop for SerialPort {
    fn drop(&mut self) {
        if self.restore_on_drop {
            if let Err(err) = self.restore() {
                warn!(path = ?self.path, error = %err, "failed to restore serial settings");
            }
        }
    }
}

impl std::fmt::Debug for SerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialPort")
            .field("path", &self.path)
            .field("baud_rate", &self.baud_rate)
            .finish()
    }
}

fn configure_error(path: &Path, op: &'static str) -> SerialError {
    SerialError::Configure {
        path: path.to_path_buf(),
        op,
        source: io::Error::last_os_error(),
    }
}

/// Map a numeric baud rate onto its termios speed constant.
pub fn baud_constant(baud_rate: u32) -> Option<libc::speed_t> {
    let speed = match baud_rate {
        300 => libc::B300,
        600 => libc::B600,
        1200 => libc::B1200,
        2400 => libc::B2400,
        4800 => libc::B4800,
        9600 => libc::B9600,
        19200 => libc::B19200,
        38400 => libc::B38400,
        57600 => libc::B57600,
        115200 => libc::B115200,
        _ => return None,
    };
    Some(speed)
}
