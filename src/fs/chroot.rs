use std::os::fd::OwnedFd;
use std::path::Path;

use anyhow::{Context as _, Result};
use rustix::fs::{open, Mode, OFlags};
use rustix::process::{chdir, chroot, fchdir};

/// Scoped privilege-boundary crossing. While the guard is alive the process
/// sees `target` as `/`. The previous root and working directory are restored
/// by [`ChrootGuard::exit`] or, on early-return paths, by [`Drop`].
///
/// At most one guard may be active in the process at a time.
pub struct ChrootGuard {
    old_root: OwnedFd,
    old_cwd: OwnedFd,
    active: bool,
}

impl ChrootGuard {
    pub fn enter(target: &Path) -> Result<Self> {
        let dir_flags = OFlags::RDONLY | OFlags::DIRECTORY | OFlags::CLOEXEC;
        let old_root =
            open("/", dir_flags, Mode::empty()).context("Failed to open / for later restore")?;
        let old_cwd = open(".", dir_flags, Mode::empty())
            .context("Failed to open the working directory for later restore")?;

        chroot(target).with_context(|| format!("Couldn't chroot into {target:?}"))?;
        chdir("/").context("Failed to chdir into the new root")?;

        Ok(Self {
            old_root,
            old_cwd,
            active: true,
        })
    }

    /// Leave the chroot and return to the saved root context.
    pub fn exit(mut self) -> Result<()> {
        self.leave()
    }

    fn leave(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        fchdir(&self.old_root).context("Failed to move back to the saved root")?;
        chroot(".").context("Couldn't chroot back to the original root")?;
        fchdir(&self.old_cwd).context("Failed to restore the working directory")?;
        Ok(())
    }
}

impl Drop for ChrootGuard {
    fn drop(&mut self) {
        if self.active {
            if let Err(error) = self.leave() {
                tracing::error!(?error, "failed to restore the original root context");
            }
        }
    }
}
