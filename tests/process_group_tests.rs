//! Tests for stopping tools the installer started
//!
//! These tests verify:
//! - A tool run through `CommandRunner` shows up in the registry by command line
//! - Stopping it through the registry fails the run instead of hanging it
//! - Helpers a tool forks into the background die with it
//! - Tools are isolated from the installer's own process group

use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use gentoo_installer::command_runner::{CommandRunner, FailurePolicy};
use gentoo_installer::process_guard::{ToolProcess, ToolRegistry};
use gentoo_installer::tool_args::RawCommand;
use nix::unistd::{Pid, getpgid};

/// Poll `check` every 20ms until it holds or `timeout` passes
fn eventually(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        thread::sleep(Duration::from_millis(20));
    }
    check()
}

fn pid_gone(pid: u32) -> bool {
    match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
        Ok(stat) => stat
            .rsplit_once(')')
            .map(|(_, rest)| rest.trim_start().starts_with(['Z', 'X']))
            .unwrap_or(true),
        Err(_) => true,
    }
}

#[test]
fn test_interrupt_names_the_running_tool() {
    let worker = thread::spawn(|| {
        let mut runner = CommandRunner::new();
        runner.run(
            &RawCommand::new("sleep").arg("1000"),
            FailurePolicy::Abort,
        )
    });

    let registered = eventually(Duration::from_secs(5), || {
        ToolRegistry::global()
            .lock()
            .unwrap()
            .commands()
            .contains(&"sleep 1000")
    });
    assert!(registered, "runner should track `sleep 1000` while it runs");

    let stopped = ToolRegistry::global()
        .lock()
        .unwrap()
        .terminate_all(Duration::from_secs(3));
    assert!(stopped.iter().any(|tool| tool.command == "sleep 1000"));

    let result = worker.join().expect("runner thread");
    let err = result.expect_err("a stopped tool is a failed command");
    assert!(err.to_string().contains("sleep 1000"));
}

#[test]
fn test_background_helpers_stop_with_their_tool() {
    let mut tool = Command::new("sh")
        .args(["-c", "sleep 1000 & echo $!; wait"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .tied_to_installer()
        .spawn()
        .expect("spawn sh");

    let mut line = String::new();
    if let Some(stdout) = tool.stdout.take() {
        BufReader::new(stdout).read_line(&mut line).expect("helper pid");
    }
    let helper: u32 = line.trim().parse().expect("sh printed the helper pid");
    assert!(!pid_gone(helper));

    // A private registry keeps the global one free for the runner tests
    let mut registry = ToolRegistry::default();
    registry.insert(tool.id(), "sh -c sleep 1000 & wait");
    registry.terminate_all(Duration::from_secs(3));
    tool.wait().expect("reaped");

    assert!(
        eventually(Duration::from_secs(3), || pid_gone(helper)),
        "helper {} outlived its tool",
        helper
    );
}

#[test]
fn test_tool_leads_separate_group() {
    let mut tool = Command::new("sleep")
        .arg("30")
        .tied_to_installer()
        .spawn()
        .expect("spawn sleep");
    let pid = Pid::from_raw(tool.id() as i32);

    let group = getpgid(Some(pid)).expect("tool has a group");
    assert_eq!(group, pid);
    assert_ne!(group, getpgid(None).expect("own group"));

    let mut registry = ToolRegistry::default();
    registry.insert(tool.id(), "sleep 30");
    registry.terminate_all(Duration::from_secs(2));
    tool.wait().expect("reaped");
}
