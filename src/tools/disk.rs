//! Typed arguments for block device tools.
//!
//! - `LsblkArgs` for `lsblk`
//! - `PartedArgs` for `parted`
//! - `MkfsArgs` for `mkfs.<fs>`

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::tool_args::ToolArgs;

/// Partition table label written by `parted mklabel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PartitionTable {
    #[default]
    Gpt,
    Msdos,
}

/// Filesystem created on the root partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Filesystem {
    #[default]
    Ext4,
    Xfs,
    Btrfs,
}

impl Filesystem {
    /// `mkfs` front-end for this filesystem.
    pub fn mkfs_program(self) -> &'static str {
        match self {
            Filesystem::Ext4 => "mkfs.ext4",
            Filesystem::Xfs => "mkfs.xfs",
            Filesystem::Btrfs => "mkfs.btrfs",
        }
    }
}

/// `lsblk -dpno NAME,SIZE`: whole disks, full paths, no header.
///
/// Read-only, so it also runs in dry-run mode.
#[derive(Debug, Clone, Default)]
pub struct LsblkArgs;

impl ToolArgs for LsblkArgs {
    fn program(&self) -> &'static str {
        "lsblk"
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec!["-dpno".to_string(), "NAME,SIZE".to_string()]
    }

    fn is_destructive(&self) -> bool {
        false
    }
}

/// Scripted (`-s`) parted operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartedArgs {
    /// `parted -s <disk> mklabel <table>`
    MkLabel { disk: PathBuf, table: PartitionTable },
    /// `parted -s <disk> mkpart primary <fs> <start> <end>`
    MkPart {
        disk: PathBuf,
        filesystem: Filesystem,
        start: String,
        end: String,
    },
}

impl PartedArgs {
    /// Single partition spanning the disk, aligned at 1MiB.
    pub fn whole_disk(disk: PathBuf, filesystem: Filesystem) -> Self {
        PartedArgs::MkPart {
            disk,
            filesystem,
            start: "1MiB".to_string(),
            end: "100%".to_string(),
        }
    }
}

impl ToolArgs for PartedArgs {
    fn program(&self) -> &'static str {
        "parted"
    }

    fn to_cli_args(&self) -> Vec<String> {
        match self {
            PartedArgs::MkLabel { disk, table } => vec![
                "-s".to_string(),
                disk.display().to_string(),
                "mklabel".to_string(),
                table.to_string(),
            ],
            PartedArgs::MkPart {
                disk,
                filesystem,
                start,
                end,
            } => vec![
                "-s".to_string(),
                disk.display().to_string(),
                "mkpart".to_string(),
                "primary".to_string(),
                filesystem.to_string(),
                start.clone(),
                end.clone(),
            ],
        }
    }
}

/// `mkfs.<fs> <partition>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MkfsArgs {
    pub partition: PathBuf,
    pub filesystem: Filesystem,
}

impl ToolArgs for MkfsArgs {
    fn program(&self) -> &'static str {
        self.filesystem.mkfs_program()
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![self.partition.display().to_string()]
    }
}
