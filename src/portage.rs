//! Portage tree sync, package installation and kernel build.
//!
//! Everything here runs inside the target through `chroot`, so the live
//! medium's own package database is never touched.

use std::path::Path;

use crate::command_runner::{CommandRunner, FailurePolicy};
use crate::error::Result;
use crate::installer::notify_step;
use crate::tools::portage::ChrootArgs;

pub const GENKERNEL_ATOM: &str = "sys-kernel/genkernel";

/// Fetch a Portage snapshot, then sync to the latest tree.
pub fn sync_portage(runner: &mut CommandRunner, root: &Path) -> Result<()> {
    runner.run(&ChrootArgs::webrsync(root), FailurePolicy::Abort)?;
    runner.run(&ChrootArgs::sync(root), FailurePolicy::Abort)?;
    Ok(())
}

/// Emerge each atom in order. The first failure stops the loop.
pub fn install_packages(runner: &mut CommandRunner, root: &Path, packages: &[String]) -> Result<()> {
    for (i, package) in packages.iter().enumerate() {
        notify_step(&format!("Installing {}", package));
        log::info!("Package {}/{}: {}", i + 1, packages.len(), package);
        runner.run(&ChrootArgs::emerge(root, package), FailurePolicy::Abort)?;
    }
    Ok(())
}

/// Install genkernel and build a kernel plus initramfs with it.
pub fn configure_kernel(runner: &mut CommandRunner, root: &Path) -> Result<()> {
    runner.run(&ChrootArgs::emerge(root, GENKERNEL_ATOM), FailurePolicy::Abort)?;
    runner.run(&ChrootArgs::genkernel_all(root), FailurePolicy::Abort)?;
    Ok(())
}
