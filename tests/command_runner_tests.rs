//! Tests for tool execution through `CommandRunner`
//!
//! These tests verify:
//! - Typed arguments reach the tool verbatim, with no shell in between
//! - Stdin payloads are delivered but never displayed
//! - Failure policies and the execution history
//! - Finished tools are no longer tracked for interruption

use gentoo_installer::command_runner::{CommandRunner, FailurePolicy};
use gentoo_installer::error::InstallError;
use gentoo_installer::process_guard::ToolRegistry;
use gentoo_installer::tool_args::{RawCommand, ToolArgs};

/// `cat` fed a secret on stdin, standing in for chpasswd
struct CatSecret {
    secret: String,
}

impl ToolArgs for CatSecret {
    fn program(&self) -> &'static str {
        "cat"
    }

    fn to_cli_args(&self) -> Vec<String> {
        Vec::new()
    }

    fn stdin_payload(&self) -> Option<String> {
        Some(self.secret.clone())
    }
}

#[test]
fn test_arguments_are_not_shell_interpreted() {
    let mut runner = CommandRunner::new();
    let hostile = "gentoo; echo pwned $(id) `whoami`";
    let record = runner
        .run(&RawCommand::new("echo").arg(hostile), FailurePolicy::Abort)
        .expect("echo succeeds");
    assert_eq!(record.stdout.trim_end(), hostile);
}

#[test]
fn test_stdin_payload_delivered_and_redacted() {
    let mut runner = CommandRunner::new();
    let args = CatSecret {
        secret: "root:deadbeef\n".to_string(),
    };
    let record = runner.run(&args, FailurePolicy::Abort).expect("cat succeeds");

    assert_eq!(record.stdout, "root:deadbeef\n");
    assert_eq!(record.command, "cat < [redacted]");
    assert!(!record.command.contains("deadbeef"));
}

#[test]
fn test_stderr_captured_on_failure() {
    let mut runner = CommandRunner::new();
    let err = runner
        .run(
            &RawCommand::new("ls").arg("/definitely/not/here/4242"),
            FailurePolicy::Abort,
        )
        .unwrap_err();

    match err {
        InstallError::CommandFailed {
            command,
            exit_code,
            stderr,
        } => {
            assert_eq!(command, "ls /definitely/not/here/4242");
            assert_ne!(exit_code, 0);
            assert!(!stderr.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_history_keeps_order_across_policies() {
    let mut runner = CommandRunner::new();
    runner
        .run(&RawCommand::new("true"), FailurePolicy::Abort)
        .unwrap();
    runner
        .run(&RawCommand::new("false"), FailurePolicy::Continue)
        .unwrap();
    assert!(
        runner
            .run(&RawCommand::new("false"), FailurePolicy::Abort)
            .is_err()
    );

    let codes: Vec<i32> = runner.history().iter().map(|r| r.exit_code).collect();
    assert_eq!(codes, vec![0, 1, 1]);
    assert_eq!(runner.commands(), vec!["true", "false", "false"]);
}

#[test]
fn test_dry_run_never_spawns_destructive_tools() {
    let mut runner = CommandRunner::dry_run();
    let record = runner
        .run(
            &RawCommand::new("definitely-not-a-real-tool-4242").arg("--wipe"),
            FailurePolicy::Abort,
        )
        .expect("simulated");
    assert!(record.simulated);
    assert!(record.success());
    assert_eq!(record.args, vec!["--wipe"]);
}

#[test]
fn test_finished_tool_is_untracked() {
    let mut runner = CommandRunner::new();
    runner
        .run(&RawCommand::new("echo").arg("mkfs-done-4242"), FailurePolicy::Abort)
        .expect("echo succeeds");

    let registry = ToolRegistry::global().lock().unwrap();
    assert!(!registry.commands().contains(&"echo mkfs-done-4242"));
}
