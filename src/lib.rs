//! Gentoo Installer Library
//!
//! An ordered pipeline that turns a blank disk into a bootable-ready Gentoo
//! root: partition, unpack stage3, sync Portage, emerge packages, build a
//! kernel and create accounts. Every external tool is invoked through a typed
//! argument vector; no shell is involved anywhere.

pub mod cli;
pub mod command_runner;
pub mod config;
pub mod disk;
pub mod error;
pub mod install_state;
pub mod installer;
pub mod mounts;
pub mod password;
pub mod portage;
pub mod preflight;
pub mod process_guard;
pub mod prompt;
pub mod release;
pub mod stage;
pub mod system;
pub mod tool_args;
pub mod tools;

// Re-export main types for convenience
pub use command_runner::{CommandRecord, CommandRunner, FailurePolicy};
pub use config::InstallConfig;
pub use disk::DiskDescriptor;
pub use error::{InstallError, Result};
pub use install_state::{InstallContext, InstallStep};
pub use installer::Installer;
pub use password::{Credential, check_password_strength, hash_password};
pub use process_guard::{ProcessGuard, ToolProcess, ToolRegistry};
pub use prompt::{Prompter, ScriptedPrompter, TerminalPrompter};
pub use tool_args::ToolArgs;
