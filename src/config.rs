//! Installation configuration.
//!
//! Every field has a default, so the installer runs with no config file at
//! all. A JSON file passed via `--config` may override any subset of fields.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::tools::disk::{Filesystem, PartitionTable};

pub const DEFAULT_TARGET_ROOT: &str = "/mnt/gentoo";
pub const DEFAULT_CONNECTIVITY_URL: &str = "http://www.google.com";
pub const DEFAULT_RELEASE_INDEX_URL: &str =
    "http://distfiles.gentoo.org/releases/amd64/autobuilds/current-stage3-amd64/";

/// Packages emerged into the new system, in install order
pub const DEFAULT_PACKAGES: &[&str] = &[
    "sys-kernel/linux-firmware",
    "net-misc/dhcpcd",
    "sys-boot/grub",
    "x11-base/xorg-drivers",
    "x11-base/xorg-server",
    "x11-wm/bspwm",
    "x11-terms/rxvt-unicode",
    "www-client/firefox",
    "app-editors/vim",
    "media-gfx/feh",
    "media-sound/alsa-utils",
];

/// Installation configuration that can be saved/loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    // Target
    pub target_root: PathBuf,
    pub partition_table: PartitionTable,
    pub filesystem: Filesystem,

    // Network
    pub connectivity_url: String,
    pub network_timeout_secs: u64,

    // Stage discovery
    pub release_index_url: String,
    /// Base prepended to the matched href; the index URL when unset
    pub release_base_url: Option<String>,
    pub stage_pattern: String,
    pub stage_filename: String,

    // System
    pub hostname: String,
    pub username: String,
    pub user_groups: Vec<String>,
    pub user_shell: String,

    // Packages
    pub packages: Vec<String>,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            target_root: PathBuf::from(DEFAULT_TARGET_ROOT),
            partition_table: PartitionTable::Gpt,
            filesystem: Filesystem::Ext4,
            connectivity_url: DEFAULT_CONNECTIVITY_URL.to_string(),
            network_timeout_secs: 5,
            release_index_url: DEFAULT_RELEASE_INDEX_URL.to_string(),
            release_base_url: None,
            stage_pattern: "stage3-amd64".to_string(),
            stage_filename: "stage3-amd64-latest.tar.xz".to_string(),
            hostname: "gentoo".to_string(),
            username: "user".to_string(),
            user_groups: vec!["users".into(), "wheel".into(), "audio".into()],
            user_shell: "/bin/bash".to_string(),
            packages: DEFAULT_PACKAGES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl InstallConfig {
    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// URL the matched stage href is appended to
    pub fn release_base(&self) -> &str {
        self.release_base_url
            .as_deref()
            .unwrap_or(&self.release_index_url)
    }

    /// Where the downloaded tarball is written
    pub fn stage_path(&self) -> PathBuf {
        self.target_root.join(&self.stage_filename)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.target_root.is_absolute() {
            anyhow::bail!("Target root must be an absolute path");
        }

        // Both names reach tools and files verbatim, so padding is an error
        if self.hostname.trim() != self.hostname {
            anyhow::bail!("Hostname must not have leading or trailing whitespace");
        }
        if self.username.trim() != self.username {
            anyhow::bail!("Username must not have leading or trailing whitespace");
        }

        // Hostname (RFC 1123 label: letters, digits, hyphens; 1-63 chars)
        let hostname = self.hostname.as_str();
        if hostname.is_empty() {
            anyhow::bail!("Hostname must be specified");
        }
        if hostname.len() > 63 {
            anyhow::bail!("Hostname must be at most 63 characters long");
        }
        if !hostname.starts_with(|c: char| c.is_ascii_alphabetic()) {
            anyhow::bail!("Hostname must start with a letter");
        }
        if hostname.ends_with('-') {
            anyhow::bail!("Hostname must not end with a hyphen");
        }
        if !hostname
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            anyhow::bail!("Hostname can only contain letters, numbers, and hyphens");
        }

        // Username (1-32 chars, start with lowercase letter)
        let username = self.username.as_str();
        if username.is_empty() {
            anyhow::bail!("Username must be specified");
        }
        if username.len() > 32 {
            anyhow::bail!("Username must be at most 32 characters long");
        }
        if !username.starts_with(|c: char| c.is_ascii_lowercase()) {
            anyhow::bail!("Username must start with a lowercase letter");
        }
        if !username
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        {
            anyhow::bail!(
                "Username can only contain lowercase letters, numbers, underscores, and hyphens"
            );
        }
        if username == "root" {
            anyhow::bail!("Username must not be root");
        }

        if self.stage_pattern.is_empty() {
            anyhow::bail!("Stage pattern must not be empty");
        }
        if self.stage_filename.is_empty() || self.stage_filename.contains('/') {
            anyhow::bail!("Stage filename must be a plain file name");
        }
        if self.network_timeout_secs == 0 {
            anyhow::bail!("Network timeout must be at least one second");
        }

        // Atoms are passed to emerge as arguments; a leading '-' would be an option
        for package in &self.packages {
            if package.is_empty()
                || package.starts_with('-')
                || package.chars().any(char::is_whitespace)
            {
                anyhow::bail!("Invalid package atom: {:?}", package);
            }
        }

        for group in &self.user_groups {
            if group.is_empty() || group.contains(',') || group.chars().any(char::is_whitespace) {
                anyhow::bail!("Invalid group name: {:?}", group);
            }
        }

        if !self.user_shell.starts_with('/') {
            anyhow::bail!("User shell must be an absolute path");
        }

        Ok(())
    }
}
