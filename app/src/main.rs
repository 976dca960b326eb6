//! `walkmesh` command line tool.

use std::process::ExitCode;

use clap::Parser;

mod args;
mod config;
mod simulate;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    #[cfg(feature = "profiling")]
    let _tracy = walkmesh_core::profiling::Client::start();

    let cli = args::Cli::parse();
    walkmesh_core::init();

    match simulate::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
