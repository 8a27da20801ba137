//! Pseudo-filesystem mounts for the chroot, and their teardown.
//!
//! `/sys` and `/dev` are bound recursively and then marked rslave so that
//! unmounting them from the target later does not propagate back to the
//! live system.

use std::path::Path;

use crate::command_runner::{CommandRunner, FailurePolicy};
use crate::error::Result;
use crate::tools::mount::{MountArgs, UmountArgs};

/// The mount sequence for `root`, in execution order.
pub fn mount_plan(root: &Path) -> Vec<MountArgs> {
    vec![
        MountArgs::proc(root),
        MountArgs::rbind(root, "sys"),
        MountArgs::make_rslave(root, "sys"),
        MountArgs::rbind(root, "dev"),
        MountArgs::make_rslave(root, "dev"),
    ]
}

pub fn mount_filesystems(runner: &mut CommandRunner, root: &Path) -> Result<()> {
    for args in mount_plan(root) {
        runner.run(&args, FailurePolicy::Abort)?;
    }
    Ok(())
}

/// `umount -R <root>`. A failure here is reported but never fatal.
pub fn unmount_target(runner: &mut CommandRunner, root: &Path) -> Result<()> {
    let record = runner.run(
        &UmountArgs {
            target: root.to_path_buf(),
            recursive: true,
        },
        FailurePolicy::Continue,
    )?;
    if !record.success() {
        log::warn!("{} may still be mounted", root.display());
    }
    Ok(())
}
