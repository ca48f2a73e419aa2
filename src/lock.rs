//! Advisory lock held while a store is read, edited and written back
//!
//! The lock lives on a sidecar `<store>.lock` file rather than on the store
//! itself, because the store is replaced by rename when it is rewritten.
//! While held, the sidecar contains the holder's process id so a second
//! editor can say who it is waiting on.

use crate::error::{Result, StoreError};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Exclusive lock on a shortcuts store, released on drop
#[derive(Debug)]
pub struct StoreLock {
    file: File,
    path: PathBuf,
}

impl StoreLock {
    /// Try to lock the store at `store_path` without blocking
    ///
    /// Fails with [`StoreError::Locked`] while another handle holds the lock,
    /// and with `Io` when the sidecar cannot be created.
    pub fn acquire(store_path: &Path) -> Result<Self> {
        let path = lock_path(store_path);

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        if !sys::try_lock(&file)? {
            let holder = read_holder(&mut file);
            return Err(StoreError::Locked { path, holder });
        }

        let mut lock = StoreLock { file, path };
        lock.record_holder()?;
        debug!("Locked {:?} for process {}", lock.path, std::process::id());

        Ok(lock)
    }

    /// Path of the sidecar lock file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record_holder(&mut self) -> io::Result<()> {
        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        write!(self.file, "{}", std::process::id())?;
        self.file.flush()
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        // A released sidecar is always empty
        if let Err(e) = self.file.set_len(0) {
            debug!("Could not clear {:?}: {}", self.path, e);
        }
        if let Err(e) = sys::unlock(&self.file) {
            warn!("Failed to unlock {:?}: {}", self.path, e);
        }
    }
}

/// Process id written by the current holder, if readable
fn read_holder(file: &mut File) -> Option<u32> {
    let mut content = String::new();
    file.seek(SeekFrom::Start(0)).ok()?;
    file.read_to_string(&mut content).ok()?;
    content.trim().parse().ok()
}

/// `<store>.lock` next to the store
pub fn lock_path(store_path: &Path) -> PathBuf {
    let mut name = store_path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

#[cfg(unix)]
mod sys {
    use std::fs::File;
    use std::io;
    use std::os::unix::io::AsRawFd;

    /// `Ok(false)` when another open file holds the lock
    pub fn try_lock(file: &File) -> io::Result<bool> {
        if unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) } == 0 {
            return Ok(true);
        }
        match io::Error::last_os_error() {
            e if e.kind() == io::ErrorKind::WouldBlock => Ok(false),
            e => Err(e),
        }
    }

    pub fn unlock(file: &File) -> io::Result<()> {
        if unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_UN) } == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }
}

#[cfg(windows)]
mod sys {
    use std::fs::File;
    use std::io;
    use std::os::windows::io::AsRawHandle;
    use windows_sys::Win32::Foundation::{ERROR_LOCK_VIOLATION, HANDLE};
    use windows_sys::Win32::Storage::FileSystem::{
        LockFileEx, UnlockFileEx, LOCKFILE_EXCLUSIVE_LOCK, LOCKFILE_FAIL_IMMEDIATELY,
    };
    use windows_sys::Win32::System::IO::OVERLAPPED;

    pub fn try_lock(file: &File) -> io::Result<bool> {
        let handle = file.as_raw_handle() as HANDLE;
        let locked = unsafe {
            let mut overlapped = std::mem::zeroed::<OVERLAPPED>();
            LockFileEx(
                handle,
                LOCKFILE_EXCLUSIVE_LOCK | LOCKFILE_FAIL_IMMEDIATELY,
                0,
                1,
                0,
                &mut overlapped,
            )
        };
        if locked != 0 {
            return Ok(true);
        }
        match io::Error::last_os_error() {
            e if e.raw_os_error() == Some(ERROR_LOCK_VIOLATION as i32) => Ok(false),
            e => Err(e),
        }
    }

    pub fn unlock(file: &File) -> io::Result<()> {
        let handle = file.as_raw_handle() as HANDLE;
        let unlocked = unsafe {
            let mut overlapped = std::mem::zeroed::<OVERLAPPED>();
            UnlockFileEx(handle, 0, 1, 0, &mut overlapped)
        };
        if unlocked != 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }
}

#[cfg(not(any(unix, windows)))]
mod sys {
    use std::fs::File;
    use std::io;

    pub fn try_lock(_file: &File) -> io::Result<bool> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "store locking is not supported on this platform",
        ))
    }

    pub fn unlock(_file: &File) -> io::Result<()> {
        Ok(())
    }
}
