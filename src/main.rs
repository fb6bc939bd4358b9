use anyhow::Result;
use metasweep_shim::LOG_TAG;
use metasweep_shim::launch::{LaunchConfig, launch};
use metasweep_shim::runtime::RealRuntime;
use std::ffi::OsString;

/// metasweep shim
///
/// Runs the metasweep binary provisioned by `metasweep-install`, passing every
/// argument through untouched and exiting with the binary's exit code.
fn run(args: Vec<OsString>) -> Result<i32> {
    let runtime = RealRuntime;
    let config = LaunchConfig::from_env(&runtime)?;
    launch(&runtime, &config, args)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<OsString> = std::env::args_os().skip(1).collect();
    let code = match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", LOG_TAG, e);
            1
        }
    };
    std::process::exit(code);
}
