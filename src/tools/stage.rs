//! Typed arguments for fetching and unpacking the stage tarball.

use std::path::PathBuf;

use crate::tool_args::ToolArgs;

/// `wget <url> -O <output>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WgetArgs {
    pub url: String,
    pub output: PathBuf,
}

impl ToolArgs for WgetArgs {
    fn program(&self) -> &'static str {
        "wget"
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![
            self.url.clone(),
            "-O".to_string(),
            self.output.display().to_string(),
        ]
    }
}

/// `tar xpvf <archive> -C <dest> --xattrs`
///
/// `p` keeps permissions and `--xattrs` keeps extended attributes, both
/// required for a bootable stage3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TarExtractArgs {
    pub archive: PathBuf,
    pub destination: PathBuf,
}

impl ToolArgs for TarExtractArgs {
    fn program(&self) -> &'static str {
        "tar"
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![
            "xpvf".to_string(),
            self.archive.display().to_string(),
            "-C".to_string(),
            self.destination.display().to_string(),
            "--xattrs".to_string(),
        ]
    }
}

/// `cp --dereference <source> <dest>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyArgs {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl ToolArgs for CopyArgs {
    fn program(&self) -> &'static str {
        "cp"
    }

    fn to_cli_args(&self) -> Vec<String> {
        let mut dest = self.destination.display().to_string();
        // Trailing slash makes cp fail loudly when the directory is missing
        if !dest.ends_with('/') {
            dest.push('/');
        }
        vec![
            "--dereference".to_string(),
            self.source.display().to_string(),
            dest,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wget_args() {
        let args = WgetArgs {
            url: "http://example.org/stage3.tar.xz".to_string(),
            output: PathBuf::from("/mnt/gentoo/stage3-amd64-latest.tar.xz"),
        };
        assert_eq!(
            args.display(),
            "wget http://example.org/stage3.tar.xz -O /mnt/gentoo/stage3-amd64-latest.tar.xz"
        );
    }

    #[test]
    fn test_tar_preserves_xattrs() {
        let args = TarExtractArgs {
            archive: PathBuf::from("/mnt/gentoo/stage3.tar.xz"),
            destination: PathBuf::from("/mnt/gentoo"),
        };
        let cli = args.to_cli_args();
        assert_eq!(cli[0], "xpvf");
        assert_eq!(cli.last().map(String::as_str), Some("--xattrs"));
    }

    #[test]
    fn test_copy_appends_directory_slash() {
        let args = CopyArgs {
            source: PathBuf::from("/etc/resolv.conf"),
            destination: PathBuf::from("/mnt/gentoo/etc"),
        };
        assert_eq!(
            args.display(),
            "cp --dereference /etc/resolv.conf /mnt/gentoo/etc/"
        );
    }
}
