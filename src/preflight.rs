//! Pre-flight checks for the live environment
//!
//! Verifies, before any disk is touched:
//! - Running with root privileges (EUID 0)
//! - The connectivity host answers an HTTP GET
//! - Required host binaries are on PATH

use crate::config::InstallConfig;
use crate::error::{InstallError, Result};
use std::time::Duration;

/// Host binaries every install invokes directly. The `mkfs` tool depends on
/// the configured filesystem; see [`required_binaries`].
pub const BASE_BINARIES: &[&str] = &[
    "lsblk",    // Disk enumeration (util-linux)
    "parted",   // Partitioning
    "mount",    // Device and bind mounts
    "umount",   // Teardown
    "wget",     // Stage download
    "tar",      // Stage extraction
    "cp",       // DNS info copy
    "chroot",   // Portage and kernel steps
    "useradd",  // Account creation (shadow)
    "chpasswd", // Password database update (shadow)
];

/// Every host binary an install with `config` will run
pub fn required_binaries(config: &InstallConfig) -> Vec<&'static str> {
    let mut binaries = BASE_BINARIES.to_vec();
    binaries.push(config.filesystem.mkfs_program());
    binaries
}

fn is_running_as_root() -> bool {
    nix::unistd::geteuid().is_root()
}

/// Names from `binaries` that cannot be resolved on PATH
pub fn verify_environment(binaries: &[&str]) -> Vec<String> {
    binaries
        .iter()
        .filter(|binary| which::which(binary).is_err())
        .map(|binary| binary.to_string())
        .collect()
}

/// Fail unless the effective user is root
pub fn check_root() -> Result<()> {
    if is_running_as_root() {
        log::info!("Running as root");
        Ok(())
    } else {
        Err(InstallError::NotRoot)
    }
}

/// Fail if any binary needed for `config` is missing
pub fn check_binaries(config: &InstallConfig) -> Result<()> {
    let binaries = required_binaries(config);
    let missing = verify_environment(&binaries);
    if missing.is_empty() {
        log::info!("All {} required binaries found", binaries.len());
        Ok(())
    } else {
        Err(InstallError::MissingBinaries(missing))
    }
}

/// HTTP GET against `url`; only transport failures count as offline.
///
/// Any HTTP status (even 5xx) proves the network path works.
pub fn check_network(url: &str, timeout: Duration) -> Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("gentoo-installer/", env!("CARGO_PKG_VERSION")))
        .build()?;

    match client.get(url).send() {
        Ok(response) => {
            log::info!(
                "Network connectivity confirmed ({} answered {})",
                url,
                response.status()
            );
            println!("Internet connection is working");
            Ok(())
        }
        Err(e) => {
            log::warn!("Network connectivity check failed: {}", e);
            Err(InstallError::network(format!(
                "No internet connection ({}). Please check and try again.",
                e
            )))
        }
    }
}
