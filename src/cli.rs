//! The thin shell between parsed arguments and the engine: resolve options,
//! run the pre-flight checks, pick the engine entry point, map errors to exit
//! codes.

use crate::{
    args::{Args, CpArgs, SubCommandArgs},
    config::{Profile, SyncConfig},
    engine,
    error::{Result, SyncError, EXIT_OK},
    report::{ConsoleReporter, Reporter, SyncSummary},
    safety,
};
use tracing::info;

/// `syncdir 0.2.0 (linux/x86_64)`
pub fn version_line() -> String {
    format!(
        "{} {} ({}/{})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Command-line options with the RON profile folded in.
pub fn build_config(args: &CpArgs) -> Result<SyncConfig> {
    let config = args.to_config();
    let profile = Profile::locate(args.config_path.as_deref()).map_err(SyncError::Profile)?;
    Ok(match profile {
        Some(profile) => config.with_profile(&profile),
        None => config,
    })
}

/// Pre-flight the paths in `args` and synchronize them under `config`.
pub fn execute(
    args: &CpArgs,
    config: &SyncConfig,
    reporter: &mut dyn Reporter,
) -> Result<SyncSummary> {
    let approved = safety::preflight(&args.source, &args.destination, config)?;
    if approved.source_is_dir {
        engine::sync_dir(&approved.source, &approved.destination, config, reporter)
    } else {
        engine::sync_file(&approved.source, &approved.destination, config, reporter)
    }
}

pub fn run_cp(args: &CpArgs) -> Result<SyncSummary> {
    let config = build_config(args)?;
    let mut reporter = ConsoleReporter::new(config.verbose, config.dry_run);
    let summary = execute(args, &config, &mut reporter)?;

    if config.verbose {
        info!("{summary}");
    }
    if config.dry_run {
        info!("[DRY-RUN] no changes were made.");
    }
    Ok(summary)
}

/// Run a parsed command line and return the process exit code.
pub fn run(args: Args) -> i32 {
    match args.subcommand {
        SubCommandArgs::Version => {
            println!("{}", version_line());
            EXIT_OK
        }
        SubCommandArgs::Cp(cp) => match run_cp(&cp) {
            Ok(_) => EXIT_OK,
            Err(e) => {
                eprintln!("error: {e}");
                e.exit_code()
            }
        },
    }
}
