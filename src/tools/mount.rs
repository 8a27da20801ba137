//! Typed arguments for `mount` and `umount`.

use std::path::{Path, PathBuf};

use crate::tool_args::ToolArgs;

/// The `mount` forms the installer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountArgs {
    /// `mount <device> <target>`
    Device { device: PathBuf, target: PathBuf },
    /// `mount --types <fstype> <source> <target>`
    Typed {
        fstype: &'static str,
        source: PathBuf,
        target: PathBuf,
    },
    /// `mount --rbind <source> <target>`
    Rbind { source: PathBuf, target: PathBuf },
    /// `mount --make-rslave <target>`
    MakeRslave { target: PathBuf },
}

impl MountArgs {
    /// proc filesystem at `<root>/proc`
    pub fn proc(root: &Path) -> Self {
        MountArgs::Typed {
            fstype: "proc",
            source: PathBuf::from("/proc"),
            target: root.join("proc"),
        }
    }

    /// Recursive bind of the host's `/<dir>` into `<root>/<dir>`
    pub fn rbind(root: &Path, dir: &str) -> Self {
        MountArgs::Rbind {
            source: Path::new("/").join(dir),
            target: root.join(dir),
        }
    }

    /// Recursive-slave propagation on `<root>/<dir>`
    pub fn make_rslave(root: &Path, dir: &str) -> Self {
        MountArgs::MakeRslave {
            target: root.join(dir),
        }
    }
}

impl ToolArgs for MountArgs {
    fn program(&self) -> &'static str {
        "mount"
    }

    fn to_cli_args(&self) -> Vec<String> {
        match self {
            MountArgs::Device { device, target } => {
                vec![device.display().to_string(), target.display().to_string()]
            }
            MountArgs::Typed {
                fstype,
                source,
                target,
            } => vec![
                "--types".to_string(),
                fstype.to_string(),
                source.display().to_string(),
                target.display().to_string(),
            ],
            MountArgs::Rbind { source, target } => vec![
                "--rbind".to_string(),
                source.display().to_string(),
                target.display().to_string(),
            ],
            MountArgs::MakeRslave { target } => {
                vec!["--make-rslave".to_string(), target.display().to_string()]
            }
        }
    }
}

/// `umount [-R] <target>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UmountArgs {
    pub target: PathBuf,
    pub recursive: bool,
}

impl ToolArgs for UmountArgs {
    fn program(&self) -> &'static str {
        "umount"
    }

    fn to_cli_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.recursive {
            args.push("-R".to_string());
        }
        args.push(self.target.display().to_string());
        args
    }
}
