//! Type-safe tool argument contracts.
//!
//! Every external utility the installer drives is described by a struct that
//! implements `ToolArgs`. The struct produces an argument vector that is handed
//! to `execve` directly, so hostnames, usernames, device paths and hashes are
//! never interpreted by a shell.
//!
//! # Contract
//!
//! - `program()`: executable name, resolved through `PATH`.
//! - `to_cli_args()`: arguments exactly as the tool expects them.
//! - `stdin_payload()`: bytes written to the tool's stdin, if any. Secrets
//!   belong here, never in the argument vector.
//! - `is_destructive()`: whether dry-run must skip the invocation.

/// Trait for typed tool invocations.
pub trait ToolArgs {
    /// Executable name, e.g. `"parted"`.
    fn program(&self) -> &'static str;

    /// Arguments passed to the executable.
    fn to_cli_args(&self) -> Vec<String>;

    /// Data fed to stdin. Defaults to none (stdin is closed).
    fn stdin_payload(&self) -> Option<String> {
        None
    }

    /// Destructive tools are skipped in dry-run mode.
    fn is_destructive(&self) -> bool {
        true
    }

    /// Human-readable command line for reports and logs.
    ///
    /// Stdin payloads are redacted since they may carry password hashes.
    fn display(&self) -> String {
        let mut line = std::iter::once(self.program().to_string())
            .chain(self.to_cli_args())
            .collect::<Vec<_>>()
            .join(" ");
        if self.stdin_payload().is_some() {
            line.push_str(" < [redacted]");
        }
        line
    }
}

/// An arbitrary program with a fixed argument vector.
///
/// Used for one-off tools that have no dedicated struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommand {
    pub program: &'static str,
    pub args: Vec<String>,
    pub destructive: bool,
}

impl RawCommand {
    pub fn new(program: &'static str) -> Self {
        Self {
            program,
            args: Vec::new(),
            destructive: true,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Mark the command as safe to run in dry-run mode.
    pub fn read_only(mut self) -> Self {
        self.destructive = false;
        self
    }
}

impl ToolArgs for RawCommand {
    fn program(&self) -> &'static str {
        self.program
    }

    fn to_cli_args(&self) -> Vec<String> {
        self.args.clone()
    }

    fn is_destructive(&self) -> bool {
        self.destructive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Secret;

    impl ToolArgs for Secret {
        fn program(&self) -> &'static str {
            "chpasswd"
        }

        fn to_cli_args(&self) -> Vec<String> {
            vec!["-e".into()]
        }

        fn stdin_payload(&self) -> Option<String> {
            Some("root:abcdef\n".into())
        }
    }

    #[test]
    fn test_display_joins_program_and_args() {
        let cmd = RawCommand::new("parted").arg("-s").arg("/dev/sda");
        assert_eq!(cmd.display(), "parted -s /dev/sda");
    }

    #[test]
    fn test_display_redacts_stdin() {
        let shown = Secret.display();
        assert_eq!(shown, "chpasswd -e < [redacted]");
        assert!(!shown.contains("abcdef"));
    }

    #[test]
    fn test_raw_command_read_only() {
        let cmd = RawCommand::new("lsblk").read_only();
        assert!(!cmd.is_destructive());
        assert!(RawCommand::new("mkfs.ext4").is_destructive());
    }

    #[test]
    fn test_metacharacters_stay_single_arguments() {
        let cmd = RawCommand::new("useradd").arg("bob; rm -rf /");
        assert_eq!(cmd.to_cli_args(), vec!["bob; rm -rf /".to_string()]);
    }
}
