//! Hostname, passwords and the regular user account.

use std::fs;
use std::path::Path;

use crate::command_runner::{CommandRunner, FailurePolicy};
use crate::error::{InstallError, Result};
use crate::install_state::InstallContext;
use crate::password::{Credential, collect_credential};
use crate::prompt::Prompter;
use crate::tools::user::{ChpasswdArgs, UseraddArgs};

pub const ROOT_USER: &str = "root";

/// Write `<root>/etc/hostname`.
pub fn write_hostname(root: &Path, hostname: &str) -> Result<()> {
    let path = root.join("etc").join("hostname");
    fs::write(&path, format!("{}\n", hostname)).map_err(|e| {
        InstallError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to write {}: {}", path.display(), e),
        ))
    })?;
    log::info!("Hostname set to {}", hostname);
    Ok(())
}

fn set_password(runner: &mut CommandRunner, root: &Path, credential: &Credential) -> Result<()> {
    runner.run(
        &ChpasswdArgs {
            root: root.to_path_buf(),
            username: credential.username.clone(),
            hash: credential.hash().to_string(),
        },
        FailurePolicy::Abort,
    )?;
    Ok(())
}

/// Collect both passwords, then apply hostname, accounts and passwords.
///
/// Passwords are asked for up front so a typo does not leave the target
/// with a hostname but no usable accounts.
pub fn configure_system(
    runner: &mut CommandRunner,
    prompter: &mut dyn Prompter,
    ctx: &mut InstallContext,
) -> Result<()> {
    let username = ctx.config.username.clone();
    let root_credential = collect_credential(prompter, ROOT_USER)?;
    let user_credential = collect_credential(prompter, &username)?;
    ctx.credentials = vec![root_credential.clone(), user_credential.clone()];

    let root = ctx.target_root().to_path_buf();
    if runner.is_dry_run() {
        log::info!(
            "[dry-run] would write {} to {}",
            ctx.config.hostname,
            root.join("etc/hostname").display()
        );
    } else {
        write_hostname(&root, &ctx.config.hostname)?;
    }

    set_password(runner, &root, &root_credential)?;
    runner.run(
        &UseraddArgs {
            root: root.clone(),
            username,
            groups: ctx.config.user_groups.clone(),
            shell: ctx.config.user_shell.clone(),
        },
        FailurePolicy::Abort,
    )?;
    set_password(runner, &root, &user_credential)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InstallConfig;
    use crate::password::verify_password;
    use crate::prompt::ScriptedPrompter;

    #[test]
    fn test_write_hostname() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("etc")).unwrap();
        write_hostname(dir.path(), "gentoo").unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("etc/hostname")).unwrap(),
            "gentoo\n"
        );
    }

    #[test]
    fn test_write_hostname_missing_etc() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            write_hostname(dir.path(), "gentoo"),
            Err(InstallError::Io(_))
        ));
    }

    #[test]
    fn test_configure_system_sequence() {
        let mut runner = CommandRunner::dry_run();
        let mut prompter = ScriptedPrompter::new(["short", "RootPass1", "UserPass1"]);
        let mut ctx = InstallContext::new(InstallConfig::default());

        configure_system(&mut runner, &mut prompter, &mut ctx).unwrap();

        assert_eq!(
            runner.commands(),
            vec![
                "chpasswd --root /mnt/gentoo -e < [redacted]",
                "useradd --root /mnt/gentoo -m -G users,wheel,audio -s /bin/bash user",
                "chpasswd --root /mnt/gentoo -e < [redacted]",
            ]
        );
        assert_eq!(prompter.prompts().len(), 3);
        assert!(prompter.prompts()[2].contains("password for user"));

        assert_eq!(ctx.credentials.len(), 2);
        assert_eq!(ctx.credentials[0].username, "root");
        assert!(verify_password("RootPass1", ctx.credentials[0].hash()));
        assert!(verify_password("UserPass1", ctx.credentials[1].hash()));
    }

    #[test]
    fn test_configure_system_never_puts_hash_in_argv() {
        let mut runner = CommandRunner::dry_run();
        let mut prompter = ScriptedPrompter::new(["RootPass1", "UserPass1"]);
        let mut ctx = InstallContext::new(InstallConfig::default());

        configure_system(&mut runner, &mut prompter, &mut ctx).unwrap();

        let hash = ctx.credentials[0].hash();
        assert!(
            runner
                .history()
                .iter()
                .all(|r| r.args.iter().all(|a| !a.contains(hash)))
        );
    }
}
