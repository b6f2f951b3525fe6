use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("osc2k8056 {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: osc2k8056");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("OSC2K8056_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("serial: {}", if cfg!(unix) { "termios" } else { "unavailable" });
    println!(
        "frame: {} bytes, {} writes every {:?}",
        k8056_frame::FRAME_SIZE,
        k8056_frame::DEFAULT_ATTEMPTS,
        k8056_frame::DEFAULT_INTERVAL
    );
    println!("features: cli={}", cfg!(feature = "cli"));

    Ok(SUCCESS)
}
