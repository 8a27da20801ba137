//! Disk enumeration, interactive selection and partitioning.
//!
//! The chosen disk gets a single primary partition spanning the whole
//! device, formatted and mounted at the target root. There is no
//! confirmation and no rollback: a failure half way leaves the disk as the
//! last successful tool left it.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::command_runner::{CommandRunner, FailurePolicy};
use crate::error::{InstallError, Result};
use crate::prompt::Prompter;
use crate::tools::disk::{Filesystem, LsblkArgs, MkfsArgs, PartedArgs, PartitionTable};
use crate::tools::mount::MountArgs;

pub const DISK_PROMPT: &str = "Please enter the number of the disk to install Gentoo on: ";

/// One whole disk as reported by `lsblk -dpno NAME,SIZE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskDescriptor {
    /// Full device path, e.g. `/dev/sda`
    pub name: String,
    /// Human-readable size, e.g. `465.8G`
    pub size: String,
}

impl DiskDescriptor {
    /// Parse one line of lsblk output. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let name = fields.next()?.to_string();
        let size = fields.next().unwrap_or_default().to_string();
        Some(Self { name, size })
    }

    pub fn device_path(&self) -> PathBuf {
        PathBuf::from(&self.name)
    }

    /// Path of partition `index` on this disk.
    ///
    /// Names ending in a digit (`nvme0n1`, `mmcblk0`, `loop0`) take a `p`
    /// separator before the partition number.
    pub fn partition_path(&self, index: u8) -> PathBuf {
        partition_path(&self.name, index)
    }
}

impl fmt::Display for DiskDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.size.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} {}", self.name, self.size)
        }
    }
}

pub fn partition_path(disk: &str, index: u8) -> PathBuf {
    let needs_p = disk.chars().last().is_some_and(|c| c.is_ascii_digit());
    if needs_p {
        PathBuf::from(format!("{}p{}", disk, index))
    } else {
        PathBuf::from(format!("{}{}", disk, index))
    }
}

/// Parse full lsblk output, skipping blank lines.
pub fn parse_lsblk(output: &str) -> Vec<DiskDescriptor> {
    output.lines().filter_map(DiskDescriptor::parse).collect()
}

/// Enumerate disks and print them numbered from 1.
pub fn list_disks(runner: &mut CommandRunner) -> Result<Vec<DiskDescriptor>> {
    let record = runner.run(&LsblkArgs, FailurePolicy::Abort)?;
    let disks = parse_lsblk(&record.stdout);
    if disks.is_empty() {
        return Err(InstallError::disk("lsblk reported no disks"));
    }

    for (i, disk) in disks.iter().enumerate() {
        println!("{}. {}", i + 1, disk);
    }
    Ok(disks)
}

/// Outcome of interpreting one answer to the disk prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    NotANumber,
    OutOfRange { max: usize },
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::NotANumber => write!(f, "Invalid input. Please enter a number."),
            SelectionError::OutOfRange { max } => {
                write!(f, "Invalid selection. Please enter a number between 1 and {}.", max)
            }
        }
    }
}

/// Map a 1-based answer to an index into `count` disks.
pub fn parse_selection(input: &str, count: usize) -> std::result::Result<usize, SelectionError> {
    let number: usize = input
        .trim()
        .parse()
        .map_err(|_| SelectionError::NotANumber)?;
    if number == 0 || number > count {
        return Err(SelectionError::OutOfRange { max: count });
    }
    Ok(number - 1)
}

/// Prompt until a valid disk number is entered.
///
/// Non-numeric and out-of-range answers both re-prompt.
pub fn select_disk(disks: &[DiskDescriptor], prompter: &mut dyn Prompter) -> Result<DiskDescriptor> {
    if disks.is_empty() {
        return Err(InstallError::disk("no disks to choose from"));
    }

    loop {
        let answer = prompter.read_line(DISK_PROMPT)?;
        match parse_selection(&answer, disks.len()) {
            Ok(index) => {
                let disk = disks[index].clone();
                log::info!("Selected disk {}", disk);
                return Ok(disk);
            }
            Err(e) => println!("{}", e),
        }
    }
}

/// Label, partition, format and mount `disk` at `target_root`.
///
/// Returns the root partition path.
pub fn partition_disk(
    runner: &mut CommandRunner,
    disk: &DiskDescriptor,
    table: PartitionTable,
    filesystem: Filesystem,
    target_root: &Path,
) -> Result<PathBuf> {
    let device = disk.device_path();
    let partition = disk.partition_path(1);

    runner.run(
        &PartedArgs::MkLabel {
            disk: device.clone(),
            table,
        },
        FailurePolicy::Abort,
    )?;
    runner.run(&PartedArgs::whole_disk(device, filesystem), FailurePolicy::Abort)?;
    runner.run(
        &MkfsArgs {
            partition: partition.clone(),
            filesystem,
        },
        FailurePolicy::Abort,
    )?;
    runner.run(
        &MountArgs::Device {
            device: partition.clone(),
            target: target_root.to_path_buf(),
        },
        FailurePolicy::Abort,
    )?;

    Ok(partition)
}
