//! Gentoo Installer - Main entry point
//!
//! Parses the command line, loads the configuration and runs the install
//! pipeline against the real terminal.

use log::{debug, error, info};

use gentoo_installer::cli::Cli;
use gentoo_installer::command_runner::CommandRunner;
use gentoo_installer::config::InstallConfig;
use gentoo_installer::error::InstallError;
use gentoo_installer::installer::Installer;
use gentoo_installer::process_guard;
use gentoo_installer::prompt::TerminalPrompter;

/// Initialize the logger with appropriate settings
fn init_logger() {
    use env_logger::Builder;
    use std::io::Write;

    Builder::from_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}:{}] {}",
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .filter_level(log::LevelFilter::Info)
        .parse_default_env() // RUST_LOG overrides the default level
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<InstallConfig> {
    let config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from: {:?}", path);
            InstallConfig::load_from_file(path)?
        }
        None => InstallConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    debug!("Effective configuration: {:?}", config);

    if let Some(path) = &cli.save_config {
        config.save_to_file(path)?;
        info!("Configuration written to {:?}", path);
        return Ok(());
    }

    let runner = if cli.dry_run {
        CommandRunner::dry_run()
    } else {
        CommandRunner::new()
    };

    let mut installer = Installer::new(config, runner, Box::new(TerminalPrompter));
    installer.run()?;
    Ok(())
}

/// Main application entry point
fn main() {
    init_logger();
    info!("Gentoo installer starting up");

    // Children are terminated if we receive SIGINT/SIGTERM/SIGHUP
    if let Err(e) = process_guard::init_signal_handlers() {
        log::warn!("Failed to initialize signal handlers: {}", e);
    }

    let cli = Cli::parse_args();
    debug!("CLI arguments parsed: {:?}", cli);

    if let Err(e) = run(cli) {
        error!("Installation failed: {:#}", e);
        eprintln!("An error occurred: {:#}", e);
        let code = e
            .downcast_ref::<InstallError>()
            .map(InstallError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}
