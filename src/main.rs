//! Morpho viewer binary.
//!
//! Usage: `morpho [options.toml]`. Without an argument the default options
//! are used (shapes under `models/`).

use std::path::PathBuf;
use std::process::ExitCode;

use morpho::options::Options;
use morpho::Viewer;

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let options = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => match Options::load(&path) {
            Ok(options) => {
                log::info!("loaded options from {}", path.display());
                options
            }
            Err(e) => {
                log::error!("cannot load {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => Options::default(),
    };

    match Viewer::builder().with_options(options).build().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
