//! Tool execution with uniform reporting.
//!
//! All external utilities go through `CommandRunner::run`, which:
//!
//! - Spawns the tool in its own process group, tracked under its command line
//! - Captures stdout and stderr
//! - Prints a success or failure report including the exit code
//! - Applies the caller's `FailurePolicy`
//!
//! A failing command under `FailurePolicy::Abort` becomes an
//! `InstallError::CommandFailed`; the binary turns that into exit status 1.

use crate::error::{InstallError, Result};
use crate::process_guard::{ToolProcess, ToolRegistry};
use crate::tool_args::ToolArgs;
use log::{debug, info, warn};
use std::io::Write;
use std::process::{Command, Stdio};

/// What to do when a tool exits non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Return an error so the pipeline stops.
    #[default]
    Abort,
    /// Report the failure and keep going.
    Continue,
}

/// Outcome of a single tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    pub program: String,
    pub args: Vec<String>,
    /// Display form with stdin redacted
    pub command: String,
    /// Exit code; -1 when the tool was killed by a signal or never spawned
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// True when the invocation was skipped by dry-run
    pub simulated: bool,
}

impl CommandRecord {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    fn into_error(self) -> InstallError {
        InstallError::CommandFailed {
            command: self.command,
            exit_code: self.exit_code,
            stderr: self.stderr.trim().to_string(),
        }
    }
}

/// Synchronous tool runner with an execution history.
#[derive(Debug, Default)]
pub struct CommandRunner {
    dry_run: bool,
    history: Vec<CommandRecord>,
}

impl CommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner that skips destructive tools and records them as successful.
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            history: Vec::new(),
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Every record produced so far, in execution order.
    pub fn history(&self) -> &[CommandRecord] {
        &self.history
    }

    /// Display forms of every command run so far.
    pub fn commands(&self) -> Vec<String> {
        self.history.iter().map(|r| r.command.clone()).collect()
    }

    /// Execute a tool and report the outcome.
    pub fn run<T: ToolArgs>(&mut self, args: &T, policy: FailurePolicy) -> Result<CommandRecord> {
        let record = if self.dry_run && args.is_destructive() {
            info!("[dry-run] would run: {}", args.display());
            CommandRecord {
                program: args.program().to_string(),
                args: args.to_cli_args(),
                command: args.display(),
                exit_code: 0,
                stdout: String::new(),
                stderr: String::new(),
                simulated: true,
            }
        } else {
            execute(args)
        };

        self.history.push(record.clone());
        report(&record);

        if record.success() {
            return Ok(record);
        }

        match policy {
            FailurePolicy::Abort => Err(record.into_error()),
            FailurePolicy::Continue => {
                warn!("Continuing after failed command: {}", record.command);
                Ok(record)
            }
        }
    }
}

fn execute<T: ToolArgs>(args: &T) -> CommandRecord {
    let program = args.program();
    let cli_args = args.to_cli_args();
    let command = args.display();
    let payload = args.stdin_payload();

    debug!("exec: {} args={:?}", program, cli_args);

    let mut record = CommandRecord {
        program: program.to_string(),
        args: cli_args.clone(),
        command,
        exit_code: -1,
        stdout: String::new(),
        stderr: String::new(),
        simulated: false,
    };

    let mut cmd = Command::new(program);
    cmd.args(&cli_args)
        .stdin(if payload.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .tied_to_installer();

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            record.stderr = format!("failed to spawn {}: {}", program, e);
            return record;
        }
    };
    let tracked = ToolRegistry::track(child.id(), &record.command);

    if let (Some(data), Some(mut stdin)) = (payload, child.stdin.take()) {
        // A tool that exits early closes the pipe; its exit code tells the story
        if let Err(e) = stdin.write_all(data.as_bytes()) {
            debug!("stdin write to {} failed: {}", program, e);
        }
    }

    let output = child.wait_with_output();
    drop(tracked);

    match output {
        Ok(output) => {
            record.exit_code = output.status.code().unwrap_or(-1);
            record.stdout = String::from_utf8_lossy(&output.stdout).to_string();
            record.stderr = String::from_utf8_lossy(&output.stderr).to_string();
        }
        Err(e) => {
            record.stderr = format!("failed waiting for {}: {}", program, e);
        }
    }

    record
}

/// Print the uniform success/failure report to stdout.
fn report(record: &CommandRecord) {
    if record.success() {
        info!("Command succeeded: {}", record.command);
        println!("\nCommand Execution Successful!");
        println!("Command: {}", record.command);
        println!("Output: {}", record.stdout);
    } else {
        info!(
            "Command failed with exit code {}: {}",
            record.exit_code, record.command
        );
        println!("\nCommand Execution Failed!");
        println!("Command: {}", record.command);
        println!("Error Code: {}", record.exit_code);
        println!("Error Message: {}", record.stderr);
    }
}
