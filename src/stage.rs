//! Stage tarball download and extraction.

use std::path::{Path, PathBuf};

use crate::command_runner::{CommandRunner, FailurePolicy};
use crate::error::Result;
use crate::tools::stage::{CopyArgs, TarExtractArgs, WgetArgs};

pub const HOST_RESOLV_CONF: &str = "/etc/resolv.conf";

/// Download `url` to `destination`.
///
/// No checksum or signature verification is done; the tarball is trusted as
/// served by the mirror.
pub fn download_stage(runner: &mut CommandRunner, url: &str, destination: &Path) -> Result<PathBuf> {
    log::info!("Downloading {} to {}", url, destination.display());
    runner.run(
        &WgetArgs {
            url: url.to_string(),
            output: destination.to_path_buf(),
        },
        FailurePolicy::Abort,
    )?;
    Ok(destination.to_path_buf())
}

/// Unpack `tarball` into `target_root`, keeping permissions and xattrs.
pub fn extract_stage(runner: &mut CommandRunner, tarball: &Path, target_root: &Path) -> Result<()> {
    runner.run(
        &TarExtractArgs {
            archive: tarball.to_path_buf(),
            destination: target_root.to_path_buf(),
        },
        FailurePolicy::Abort,
    )?;
    Ok(())
}

/// Copy the live system's resolver config so the chroot can resolve names.
pub fn copy_dns_info(runner: &mut CommandRunner, target_root: &Path) -> Result<()> {
    runner.run(
        &CopyArgs {
            source: PathBuf::from(HOST_RESOLV_CONF),
            destination: target_root.join("etc"),
        },
        FailurePolicy::Abort,
    )?;
    Ok(())
}
