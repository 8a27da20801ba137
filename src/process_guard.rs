//! Keeping running tools tied to the installer.
//!
//! An interrupted install must not leave `parted`, `mkfs` or `tar` writing to
//! the target disk. Each tool the runner spawns leads its own process group,
//! receives SIGTERM if the installer dies, and is recorded in the global
//! [`ToolRegistry`] under the command line it was started with. On a signal or
//! when the [`ProcessGuard`] is dropped, whatever is still recorded gets
//! stopped and reported by name.

use nix::sys::signal::{Signal, killpg};
use nix::unistd::Pid;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};

static REGISTRY: OnceLock<Mutex<ToolRegistry>> = OnceLock::new();

/// A tool that has been spawned and not yet reaped
#[derive(Debug, Clone)]
pub struct RunningTool {
    pub pid: u32,
    pub command: String,
    pub started: Instant,
}

/// Tools currently running, keyed by PID (which is also their PGID)
#[derive(Debug, Default)]
pub struct ToolRegistry {
    running: HashMap<u32, RunningTool>,
}

impl ToolRegistry {
    pub fn global() -> &'static Mutex<ToolRegistry> {
        REGISTRY.get_or_init(|| Mutex::new(ToolRegistry::default()))
    }

    /// Record `pid` in the global registry until the returned handle drops
    pub fn track(pid: u32, command: &str) -> TrackedTool {
        if let Ok(mut registry) = Self::global().lock() {
            registry.insert(pid, command);
        }
        TrackedTool { pid }
    }

    pub fn insert(&mut self, pid: u32, command: &str) {
        log::debug!("tracking pid {} ({})", pid, command);
        self.running.insert(
            pid,
            RunningTool {
                pid,
                command: command.to_string(),
                started: Instant::now(),
            },
        );
    }

    pub fn remove(&mut self, pid: u32) -> Option<RunningTool> {
        self.running.remove(&pid)
    }

    pub fn commands(&self) -> Vec<&str> {
        self.running.values().map(|t| t.command.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    /// Stop every recorded tool and forget it.
    ///
    /// Each group gets SIGTERM; groups whose leader is still running after
    /// `grace` get SIGKILL. Returns the tools that were stopped.
    pub fn terminate_all(&mut self, grace: Duration) -> Vec<RunningTool> {
        let stopping: Vec<RunningTool> = self.running.drain().map(|(_, tool)| tool).collect();

        for tool in &stopping {
            log::warn!(
                "Stopping `{}` after {}s",
                tool.command,
                tool.started.elapsed().as_secs()
            );
            signal_group(tool.pid, Signal::SIGTERM);
        }

        let deadline = Instant::now() + grace;
        while Instant::now() < deadline && stopping.iter().any(|t| is_running(t.pid)) {
            std::thread::sleep(Duration::from_millis(50));
        }

        for tool in stopping.iter().filter(|t| is_running(t.pid)) {
            log::error!("`{}` ignored SIGTERM, killing", tool.command);
            signal_group(tool.pid, Signal::SIGKILL);
        }

        stopping
    }
}

/// Removes its PID from the global registry once the tool has been waited on
#[derive(Debug)]
pub struct TrackedTool {
    pid: u32,
}

impl Drop for TrackedTool {
    fn drop(&mut self) {
        if let Ok(mut registry) = ToolRegistry::global().lock() {
            registry.remove(self.pid);
        }
    }
}

fn signal_group(pgid: u32, signal: Signal) {
    // ESRCH just means the group already exited
    if let Err(e) = killpg(Pid::from_raw(pgid as i32), signal) {
        log::debug!("{} to group {}: {}", signal.as_str(), pgid, e);
    }
}

/// State letter from a `/proc/<pid>/stat` line. The command name in
/// parentheses may itself contain spaces or parens, so parse after the last ')'.
fn stat_state(stat: &str) -> Option<char> {
    let (_, rest) = stat.rsplit_once(')')?;
    rest.trim_start().chars().next()
}

/// Running means present in /proc and neither zombie nor dead
fn is_running(pid: u32) -> bool {
    match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
        Ok(stat) => !matches!(stat_state(&stat), Some('Z' | 'X') | None),
        Err(_) => false,
    }
}

/// Stops leftover tools when the owning `Installer` goes away
#[derive(Debug, Default)]
pub struct ProcessGuard;

impl ProcessGuard {
    pub fn new() -> Self {
        Self
    }
}

impl Drop for ProcessGuard {
    fn drop(&mut self) {
        if let Ok(mut registry) = ToolRegistry::global().lock() {
            if !registry.is_empty() {
                registry.terminate_all(Duration::from_secs(5));
            }
        }
    }
}

/// Install handlers for SIGINT, SIGTERM and SIGHUP.
///
/// The first signal stops running tools, names each one on stderr and exits
/// with `128 + signo`.
pub fn init_signal_handlers() -> Result<(), std::io::Error> {
    use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])?;

    std::thread::spawn(move || {
        let Some(signo) = signals.forever().next() else {
            return;
        };
        let name = Signal::try_from(signo).map(|s| s.as_str()).unwrap_or("signal");
        log::info!("Received {}, stopping installation", name);

        let stopped = match ToolRegistry::global().lock() {
            Ok(mut registry) => registry.terminate_all(Duration::from_secs(3)),
            Err(_) => Vec::new(),
        };
        for tool in &stopped {
            eprintln!("Interrupted: stopped `{}`", tool.command);
        }

        std::process::exit(128 + signo);
    });

    Ok(())
}

/// Spawn setup for installer-owned tools
pub trait ToolProcess {
    /// Lead a fresh process group and receive SIGTERM if the installer dies
    fn tied_to_installer(&mut self) -> &mut Self;
}

impl ToolProcess for std::process::Command {
    fn tied_to_installer(&mut self) -> &mut Self {
        use std::os::unix::process::CommandExt;

        self.process_group(0);
        // SAFETY: prctl is async-signal-safe and touches no parent state
        unsafe {
            self.pre_exec(|| {
                nix::sys::prctl::set_pdeathsig(Signal::SIGTERM).map_err(std::io::Error::from)
            });
        }
        self
    }
}
