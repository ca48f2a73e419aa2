//! Disk I/O for shortcuts stores

use crate::error::{Result, StoreError};
use crate::lock::StoreLock;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Locked handle on a store file
///
/// The lock is taken before the first read and held until the handle is
/// dropped, so a read-edit-write cycle through one handle is never
/// interleaved with another process doing the same.
#[derive(Debug)]
pub struct StoreFile {
    path: PathBuf,
    _lock: StoreLock,
}

impl StoreFile {
    /// Lock the store at `path`
    ///
    /// The store itself does not have to exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let lock = StoreLock::acquire(&path)?;
        Ok(StoreFile { path, _lock: lock })
    }

    /// Read the whole store
    pub fn read_all(&self) -> Result<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }

    /// Replace the store with `bytes`
    ///
    /// The bytes go to a temporary file in the same directory, which is
    /// synced and renamed over the store. With `backup` set, the previous
    /// contents are first copied to `<store>.bak`. The replacement takes
    /// over the previous file's permissions and, where the process is
    /// allowed to, its owner.
    pub fn write_all(&self, bytes: &[u8], backup: bool) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let previous = match fs::metadata(&self.path) {
            Ok(meta) => Some(meta),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        if backup && previous.is_some() {
            let backup_path = backup_path(&self.path);
            fs::copy(&self.path, &backup_path)?;
            debug!("Backed up store to {:?}", backup_path);
        }

        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(bytes)?;
        temp.as_file().sync_all()?;
        if let Some(meta) = &previous {
            inherit_metadata(meta, temp.as_file())?;
        }
        temp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        info!("Wrote {} bytes to {:?}", bytes.len(), self.path);
        Ok(())
    }

    /// Get file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Give `file` the mode and owner recorded in `meta`
///
/// Changing the owner needs privileges the process may lack; that case is
/// logged and the file keeps the process's owner.
fn inherit_metadata(meta: &fs::Metadata, file: &fs::File) -> Result<()> {
    file.set_permissions(meta.permissions())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        use std::os::unix::io::AsRawFd;

        let result = unsafe { libc::fchown(file.as_raw_fd(), meta.uid(), meta.gid()) };
        if result != 0 {
            debug!(
                "Keeping owner of rewritten store: {}",
                std::io::Error::last_os_error()
            );
        }
    }

    Ok(())
}

/// `<store>.bak` next to the store
pub fn backup_path(store_path: &Path) -> PathBuf {
    let mut name = store_path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}
