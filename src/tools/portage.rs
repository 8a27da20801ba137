//! Typed arguments for Portage and kernel tools run inside the target root.
//!
//! Every invocation is wrapped in `chroot <root>` so packages land in the
//! new system rather than on the live medium.

use std::path::{Path, PathBuf};

use crate::tool_args::ToolArgs;

/// `chroot <root> <program> <args...>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChrootArgs {
    pub root: PathBuf,
    pub program: String,
    pub args: Vec<String>,
}

impl ChrootArgs {
    pub fn new(root: &Path, program: &str, args: &[&str]) -> Self {
        Self {
            root: root.to_path_buf(),
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// `emerge-webrsync`: snapshot of the Portage tree over HTTP
    pub fn webrsync(root: &Path) -> Self {
        Self::new(root, "emerge-webrsync", &[])
    }

    /// `emerge --sync`
    pub fn sync(root: &Path) -> Self {
        Self::new(root, "emerge", &["--sync"])
    }

    /// `emerge <atom>`
    pub fn emerge(root: &Path, atom: &str) -> Self {
        Self::new(root, "emerge", &[atom])
    }

    /// `genkernel all`
    pub fn genkernel_all(root: &Path) -> Self {
        Self::new(root, "genkernel", &["all"])
    }
}

impl ToolArgs for ChrootArgs {
    fn program(&self) -> &'static str {
        "chroot"
    }

    fn to_cli_args(&self) -> Vec<String> {
        let mut args = vec![self.root.display().to_string(), self.program.clone()];
        args.extend(self.args.iter().cloned());
        args
    }
}
