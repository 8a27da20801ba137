//! Installer module
//!
//! Drives the pipeline: each `InstallStep` runs in order against one
//! `InstallContext`, behind a step banner. The first failing step stops the
//! pipeline. The target root is unmounted afterwards whether or not the
//! pipeline succeeded, and the first error is returned to the caller.

use std::time::Duration;

use log::{info, warn};

use crate::command_runner::CommandRunner;
use crate::config::InstallConfig;
use crate::disk::{DiskDescriptor, list_disks, partition_disk, select_disk};
use crate::error::{InstallError, Result};
use crate::install_state::{InstallContext, InstallStep};
use crate::mounts::{mount_filesystems, unmount_target};
use crate::portage::{configure_kernel, install_packages, sync_portage};
use crate::preflight;
use crate::process_guard::ProcessGuard;
use crate::prompt::Prompter;
use crate::release::fetch_latest_url;
use crate::stage::{copy_dns_info, download_stage, extract_stage};
use crate::system::configure_system;

const BANNER_RULE: &str = "========================================";

/// Print a banner announcing the next piece of work.
pub fn notify_step(title: &str) {
    println!("\n{}", BANNER_RULE);
    println!("STEP: {}", title);
    println!("{}\n", BANNER_RULE);
}

/// Installer instance
pub struct Installer {
    runner: CommandRunner,
    prompter: Box<dyn Prompter>,
    ctx: InstallContext,
    skip_network_check: bool,
    disks: Option<Vec<DiskDescriptor>>,
    _guard: ProcessGuard,
}

impl Installer {
    /// Create a new installer instance
    pub fn new(config: InstallConfig, runner: CommandRunner, prompter: Box<dyn Prompter>) -> Self {
        Self {
            runner,
            prompter,
            ctx: InstallContext::new(config),
            skip_network_check: false,
            disks: None,
            _guard: ProcessGuard::new(),
        }
    }

    /// Skip the connectivity probe. Used when driving the pipeline offline.
    pub fn without_network_check(mut self) -> Self {
        self.skip_network_check = true;
        self
    }

    /// Preset the stage URL so the release index is not fetched.
    pub fn with_artifact_url(mut self, url: impl Into<String>) -> Self {
        self.ctx.artifact_url = Some(url.into());
        self
    }

    /// Offer these disks instead of enumerating with lsblk.
    pub fn with_disks(mut self, disks: Vec<DiskDescriptor>) -> Self {
        self.disks = Some(disks);
        self
    }

    pub fn context(&self) -> &InstallContext {
        &self.ctx
    }

    pub fn runner(&self) -> &CommandRunner {
        &self.runner
    }

    /// Run every step, then tear down. Returns the first error.
    pub fn run(&mut self) -> Result<()> {
        info!(
            "Starting installation into {} (dry-run: {})",
            self.ctx.target_root().display(),
            self.runner.is_dry_run()
        );

        let outcome = self.run_steps();

        notify_step("Unmount target");
        if let Err(e) = unmount_target(&mut self.runner, self.ctx.config.target_root.as_path()) {
            warn!("Teardown failed: {}", e);
        }

        match &outcome {
            Ok(()) => info!("Installation completed"),
            Err(e) => warn!("Installation stopped: {}", e),
        }
        outcome
    }

    /// Run the steps up to and including `last`, without teardown.
    pub fn run_until(&mut self, last: InstallStep) -> Result<()> {
        for step in InstallStep::all() {
            self.run_one(step)?;
            if step == last {
                break;
            }
        }
        Ok(())
    }

    fn run_steps(&mut self) -> Result<()> {
        for step in InstallStep::all() {
            self.run_one(step)?;
        }
        Ok(())
    }

    fn run_one(&mut self, step: InstallStep) -> Result<()> {
        notify_step(&step.to_string());
        if self.runner.is_dry_run() {
            if step.skipped_in_dry_run() {
                info!("[dry-run] skipping {}", step);
                self.ctx.mark_completed(step);
                return Ok(());
            }
            if step.is_destructive() {
                info!("[dry-run] destructive commands in '{}' are simulated", step);
            }
        }

        match self.execute_step(step) {
            Ok(()) => {
                self.ctx.mark_completed(step);
                Ok(())
            }
            Err(e) => {
                self.ctx.mark_failed(step);
                Err(e)
            }
        }
    }

    fn execute_step(&mut self, step: InstallStep) -> Result<()> {
        let root = self.ctx.config.target_root.clone();

        match step {
            InstallStep::CheckRoot => {
                preflight::check_root()?;
                preflight::check_binaries(&self.ctx.config)
            }
            InstallStep::CheckNetwork => {
                if self.skip_network_check {
                    info!("Network check disabled");
                    return Ok(());
                }
                preflight::check_network(
                    &self.ctx.config.connectivity_url,
                    Duration::from_secs(self.ctx.config.network_timeout_secs),
                )
            }
            InstallStep::PartitionDisk => {
                let disks = match self.disks.clone() {
                    Some(disks) => disks,
                    None => list_disks(&mut self.runner)?,
                };
                let disk = select_disk(&disks, self.prompter.as_mut())?;
                let partition = partition_disk(
                    &mut self.runner,
                    &disk,
                    self.ctx.config.partition_table,
                    self.ctx.config.filesystem,
                    &root,
                )?;
                self.ctx.disk = Some(disk);
                self.ctx.root_partition = Some(partition);
                Ok(())
            }
            InstallStep::DownloadStage => {
                let url = match self.ctx.artifact_url.clone() {
                    Some(url) => url,
                    None => fetch_latest_url(
                        &self.ctx.config.release_index_url,
                        self.ctx.config.release_base(),
                        &self.ctx.config.stage_pattern,
                        Duration::from_secs(self.ctx.config.network_timeout_secs),
                    )?,
                };
                let tarball = download_stage(&mut self.runner, &url, &self.ctx.config.stage_path())?;
                self.ctx.artifact_url = Some(url);
                self.ctx.stage_tarball = Some(tarball);
                Ok(())
            }
            InstallStep::ExtractStage => {
                let tarball = self
                    .ctx
                    .stage_tarball
                    .clone()
                    .ok_or_else(|| InstallError::config("no stage tarball has been downloaded"))?;
                extract_stage(&mut self.runner, &tarball, &root)
            }
            InstallStep::CopyDnsInfo => copy_dns_info(&mut self.runner, &root),
            InstallStep::MountFilesystems => mount_filesystems(&mut self.runner, &root),
            InstallStep::SyncPortage => sync_portage(&mut self.runner, &root),
            InstallStep::InstallPackages => {
                install_packages(&mut self.runner, &root, &self.ctx.config.packages)
            }
            InstallStep::ConfigureKernel => configure_kernel(&mut self.runner, &root),
            InstallStep::ConfigureSystem => {
                configure_system(&mut self.runner, self.prompter.as_mut(), &mut self.ctx)
            }
        }
    }
}
