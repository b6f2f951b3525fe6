use std::io;
use std::net::SocketAddr;
use std::path::Path;

use k8056_osc::{OscError, OscServer};
use serde::Serialize;

use crate::cmd::DoctorArgs;
use crate::exit::{CliResult, HEALTH_CHECK_FAILED, SUCCESS};
use crate::output::OutputFormat;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Pass,
    Fail,
    Warn,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorOutput {
    checks: Vec<CheckResult>,
    overall: &'static str,
}

pub fn run(args: DoctorArgs, format: OutputFormat) -> CliResult<i32> {
    let checks = collect_checks(&args);
    let has_fail = checks.iter().any(|c| c.status == CheckStatus::Fail);
    let overall = if has_fail { "fail" } else { "pass" };

    let output = DoctorOutput { checks, overall };
    print_doctor(&output, format);

    if has_fail {
        Ok(HEALTH_CHECK_FAILED)
    } else {
        Ok(SUCCESS)
    }
}

fn collect_checks(args: &DoctorArgs) -> Vec<CheckResult> {
    vec![
        platform_serial_check(),
        device_check(&args.device),
        listen_check(args.listen),
    ]
}

fn print_doctor(output: &DoctorOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("osc2k8056 doctor\n");
            for c in &output.checks {
                println!(
                    "  [{:>4}] {:<18} {}",
                    status_text(c.status),
                    c.name,
                    c.detail
                );
            }
            if output.overall == "pass" {
                println!("\n  Result: all checks passed");
            } else {
                println!("\n  Result: one or more checks failed");
            }
        }
        OutputFormat::Raw => {
            println!("{}", output.overall);
        }
    }
}

fn status_text(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "PASS",
        CheckStatus::Fail => "FAIL",
        CheckStatus::Warn => "WARN",
    }
}

fn platform_serial_check() -> CheckResult {
    if cfg!(unix) {
        CheckResult {
            name: "platform_serial".to_string(),
            status: CheckStatus::Pass,
            detail: "termios serial backend available".to_string(),
        }
    } else {
        CheckResult {
            name: "platform_serial".to_string(),
            status: CheckStatus::Fail,
            detail: "serial backend unavailable on this platform".to_string(),
        }
    }
}

/// Open the device in raw mode and close it again, restoring its settings.
#[cfg(unix)]
fn device_check(path: &Path) -> CheckResult {
    use k8056_serial::{SerialError, SerialPort};

    let name = "serial_device".to_string();
    let result = SerialPort::open(path).and_then(|port| {
        let baud = port.baud_rate();
        port.close().map(|()| baud)
    });

    match result {
        Ok(baud) => CheckResult {
            name,
            status: CheckStatus::Pass,
            detail: format!("{} opened at {baud} baud", path.display()),
        },
        Err(SerialError::Open { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            CheckResult {
                name,
                status: CheckStatus::Fail,
                detail: format!("{} does not exist", path.display()),
            }
        }
        Err(SerialError::Configure { op, .. }) => CheckResult {
            name,
            status: CheckStatus::Fail,
            detail: format!("{} is not a serial line ({op} failed)", path.display()),
        },
        Err(err) => CheckResult {
            name,
            status: CheckStatus::Fail,
            detail: err.to_string(),
        },
    }
}

#[cfg(not(unix))]
fn device_check(path: &Path) -> CheckResult {
    CheckResult {
        name: "serial_device".to_string(),
        status: CheckStatus::Fail,
        detail: format!("{} cannot be opened on this platform", path.display()),
    }
}

fn listen_check(addr: SocketAddr) -> CheckResult {
    let name = "osc_listen".to_string();
    match OscServer::bind(addr) {
        Ok(server) => CheckResult {
            name,
            status: CheckStatus::Pass,
            detail: format!("UDP bind on {} succeeded", server.local_addr()),
        },
        Err(OscError::Bind { source, .. }) if source.kind() == io::ErrorKind::AddrInUse => {
            CheckResult {
                name,
                status: CheckStatus::Warn,
                detail: format!("{addr} already in use (is a bridge running?)"),
            }
        }
        Err(err) => CheckResult {
            name,
            status: CheckStatus::Fail,
            detail: err.to_string(),
        },
    }
}
