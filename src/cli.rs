use clap::Parser;
use std::path::PathBuf;

/// Gentoo Installer - unattended-by-default Gentoo Linux installation
#[derive(Parser, Debug)]
#[command(name = "gentoo-install")]
#[command(about = "Partition a disk, unpack stage3 and bootstrap a Gentoo system")]
#[command(version)]
pub struct Cli {
    /// JSON installation config; every field is optional
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Dry-run mode: show what would be executed without making changes.
    ///
    /// Destructive tools (parted, mkfs, mount, emerge, useradd...) are
    /// logged and skipped. lsblk and the network probes still run so the
    /// preview is realistic.
    #[arg(long)]
    pub dry_run: bool,

    /// Write the effective configuration to this file and exit
    #[arg(long)]
    pub save_config: Option<PathBuf>,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
