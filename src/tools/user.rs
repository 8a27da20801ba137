//! Typed arguments for account tools.
//!
//! - `UseraddArgs` for `useradd`
//! - `ChpasswdArgs` for `chpasswd`
//!
//! Both use `--root` so the target's password database is edited, not the
//! live medium's.

use std::path::PathBuf;

use crate::tool_args::ToolArgs;

/// `useradd --root <root> -m -G <groups> -s <shell> <username>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseraddArgs {
    pub root: PathBuf,
    pub username: String,
    pub groups: Vec<String>,
    pub shell: String,
}

impl ToolArgs for UseraddArgs {
    fn program(&self) -> &'static str {
        "useradd"
    }

    fn to_cli_args(&self) -> Vec<String> {
        let mut args = vec![
            "--root".to_string(),
            self.root.display().to_string(),
            "-m".to_string(),
        ];
        if !self.groups.is_empty() {
            args.push("-G".to_string());
            args.push(self.groups.join(","));
        }
        args.push("-s".to_string());
        args.push(self.shell.clone());
        args.push(self.username.clone());
        args
    }
}

/// `chpasswd --root <root> -e`, fed `<user>:<hash>` on stdin.
///
/// The hash never appears in the argument vector, so it is invisible in
/// `/proc/<pid>/cmdline` and in command reports.
#[derive(Clone, PartialEq, Eq)]
pub struct ChpasswdArgs {
    pub root: PathBuf,
    pub username: String,
    pub hash: String,
}

impl std::fmt::Debug for ChpasswdArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChpasswdArgs")
            .field("root", &self.root)
            .field("username", &self.username)
            .field("hash", &"[redacted]")
            .finish()
    }
}

impl ToolArgs for ChpasswdArgs {
    fn program(&self) -> &'static str {
        "chpasswd"
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![
            "--root".to_string(),
            self.root.display().to_string(),
            "-e".to_string(),
        ]
    }

    fn stdin_payload(&self) -> Option<String> {
        Some(format!("{}:{}\n", self.username, self.hash))
    }
}
