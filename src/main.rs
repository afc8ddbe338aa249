use std::process::ExitCode;
use syncdir::{args::get_env_args, cli, logging};

fn main() -> ExitCode {
    let args = get_env_args();

    if let Err(e) = logging::init() {
        eprintln!("warning: failed to initialise logging: {e}");
    }

    ExitCode::from(cli::run(args) as u8)
}
