use std::process::ExitCode;

use log::{error, LevelFilter};
use simplelog::{Config, WriteLogger};

use chess_core::uci::{UciFrontEnd, QUIET_LEVEL};

fn main() -> ExitCode {
    // stdout carries the protocol, diagnostics go to stderr
    let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), std::io::stderr());
    log::set_max_level(QUIET_LEVEL);

    match UciFrontEnd::new() {
        Ok(mut uci) => {
            uci.run();
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
