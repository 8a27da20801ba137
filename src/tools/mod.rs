//! Typed invocations of the host utilities the installer drives.
//!
//! Each struct implements `ToolArgs` and maps its fields to the exact argument
//! vector the tool expects.

pub mod disk;
pub mod mount;
pub mod portage;
pub mod stage;
pub mod user;
