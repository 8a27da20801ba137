//! Install pipeline state
//!
//! `InstallStep` lists the pipeline in execution order and `InstallContext`
//! is the single value threaded through it. Steps read configuration from the
//! context and record what they produced (selected disk, stage URL,
//! credentials) back into it, so no step depends on global state.
//!
//! # Step Flow
//!
//! ```text
//! CheckRoot → CheckNetwork → PartitionDisk → DownloadStage → ExtractStage
//!     → CopyDnsInfo → MountFilesystems → SyncPortage → InstallPackages
//!     → ConfigureKernel → ConfigureSystem
//!
//! (teardown: umount -R <root>, always)
//! ```

use std::path::{Path, PathBuf};

use strum::{Display, EnumIter, IntoEnumIterator};

use crate::config::InstallConfig;
use crate::disk::DiskDescriptor;
use crate::password::Credential;

/// Pipeline steps in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum InstallStep {
    #[strum(serialize = "Check root privileges")]
    CheckRoot,
    #[strum(serialize = "Check network connection")]
    CheckNetwork,
    #[strum(serialize = "Partition disk")]
    PartitionDisk,
    #[strum(serialize = "Download stage3 tarball")]
    DownloadStage,
    #[strum(serialize = "Extract stage3 tarball")]
    ExtractStage,
    #[strum(serialize = "Copy DNS info")]
    CopyDnsInfo,
    #[strum(serialize = "Mount filesystems")]
    MountFilesystems,
    #[strum(serialize = "Sync Portage tree")]
    SyncPortage,
    #[strum(serialize = "Install packages")]
    InstallPackages,
    #[strum(serialize = "Configure kernel")]
    ConfigureKernel,
    #[strum(serialize = "Configure system")]
    ConfigureSystem,
}

impl InstallStep {
    /// All steps in execution order
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }

    /// Steps that write to the selected disk or the target root
    pub const fn is_destructive(self) -> bool {
        !matches!(self, Self::CheckRoot | Self::CheckNetwork)
    }

    /// Steps skipped entirely in dry-run mode (root and host binary checks)
    pub const fn skipped_in_dry_run(self) -> bool {
        matches!(self, Self::CheckRoot)
    }
}

/// Everything the pipeline knows, passed explicitly from step to step.
#[derive(Debug, Clone)]
pub struct InstallContext {
    pub config: InstallConfig,

    /// Disk chosen at the prompt
    pub disk: Option<DiskDescriptor>,

    /// Partition mounted at the target root
    pub root_partition: Option<PathBuf>,

    /// Stage URL found in the release index
    pub artifact_url: Option<String>,

    /// Local path of the downloaded tarball
    pub stage_tarball: Option<PathBuf>,

    /// Root first, then the regular user
    pub credentials: Vec<Credential>,

    completed: Vec<InstallStep>,
    failed_at: Option<InstallStep>,
}

impl InstallContext {
    pub fn new(config: InstallConfig) -> Self {
        Self {
            config,
            disk: None,
            root_partition: None,
            artifact_url: None,
            stage_tarball: None,
            credentials: Vec::new(),
            completed: Vec::with_capacity(InstallStep::iter().len()),
            failed_at: None,
        }
    }

    #[inline]
    pub fn target_root(&self) -> &Path {
        &self.config.target_root
    }

    /// Steps finished so far, in order
    pub fn completed_steps(&self) -> &[InstallStep] {
        &self.completed
    }

    #[inline]
    pub fn failed_at(&self) -> Option<InstallStep> {
        self.failed_at
    }

    /// True once every step has finished
    pub fn is_complete(&self) -> bool {
        self.failed_at.is_none() && self.completed.len() == InstallStep::iter().len()
    }

    pub(crate) fn mark_completed(&mut self, step: InstallStep) {
        log::debug!("Step completed: {}", step);
        self.completed.push(step);
    }

    pub(crate) fn mark_failed(&mut self, step: InstallStep) {
        log::error!("Step failed: {}", step);
        self.failed_at = Some(step);
    }
}
