//! File-backed device.

use std::fs::File;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::error::{IoError, IoResult};
use super::handle::BlockDevice;
use super::options::OpenOptions;

/// A device backed by a regular file.
///
/// The file sits behind an interior mutex so the device can be shared
/// between callers; on Unix the positional syscalls do not touch the file
/// cursor at all.
pub struct FileDevice {
    file: Mutex<File>,
    path: PathBuf,
    writable: bool,
}

impl FileDevice {
    /// Opens a device file with the specified options.
    pub fn open(path: impl AsRef<Path>, options: OpenOptions) -> IoResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = options
            .to_std_options()
            .open(&path)
            .map_err(|e| IoError::from_io_with_path(e, &path))?;

        if let Some(size) = options.preallocate {
            let current = file.metadata().map(|m| m.len())?;
            if current < size {
                file.set_len(size)?;
            }
        }

        Ok(Self {
            file: Mutex::new(file),
            writable: options.is_write(),
            path,
        })
    }

    /// Opens an existing device file read-only.
    pub fn open_read(path: impl AsRef<Path>) -> IoResult<Self> {
        Self::open(path, OpenOptions::for_read())
    }

    /// Creates (or opens) a read-write device file of at least `size` bytes.
    pub fn create(path: impl AsRef<Path>, size: u64) -> IoResult<Self> {
        Self::open(path, OpenOptions::for_create().preallocate(size))
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BlockDevice for FileDevice {
    fn len(&self) -> IoResult<u64> {
        let file = self.file.lock();
        Ok(file.metadata().map(|m| m.len())?)
    }

    fn read_at(&self, buf: &mut [u8], offset: u64) -> IoResult<usize> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileExt;
            let file = self.file.lock();
            Ok(file.read_at(buf, offset)?)
        }
        #[cfg(not(unix))]
        {
            use std::io::{Read, Seek, SeekFrom};
            let mut file = self.file.lock();
            file.seek(SeekFrom::Start(offset))?;
            Ok(file.read(buf)?)
        }
    }

    fn write_at(&self, buf: &[u8], offset: u64) -> IoResult<usize> {
        if !self.writable {
            return Err(IoError::InvalidOperation {
                operation: "write",
                mode: "read-only",
            });
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::FileExt;
            let file = self.file.lock();
            Ok(file.write_at(buf, offset)?)
        }
        #[cfg(not(unix))]
        {
            use std::io::{Seek, SeekFrom, Write};
            let mut file = self.file.lock();
            file.seek(SeekFrom::Start(offset))?;
            Ok(file.write(buf)?)
        }
    }

    fn sync(&self) -> IoResult<()> {
        let file = self.file.lock();
        Ok(file.sync_all()?)
    }
}

impl std::fmt::Debug for FileDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDevice")
            .field("path", &self.path)
            .field("writable", &self.writable)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn create_preallocates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.img");

        let dev = FileDevice::create(&path, 4096).unwrap();
        assert_eq!(dev.len().unwrap(), 4096);
        assert_eq!(dev.path(), path);
    }

    #[test]
    fn open_missing_file_fails() {
        let result = FileDevice::open_read("/nonexistent/device.img");
        assert!(result.unwrap_err().is_not_found());
    }

    #[test]
    fn write_and_read_at_offset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dev.img");

        let dev = FileDevice::create(&path, 1024).unwrap();
        dev.write_all_at(b"band data", 100).unwrap();
        dev.sync().unwrap();

        let mut buf = vec![0u8; 9];
        dev.read_exact_at(&mut buf, 100).unwrap();
        assert_eq!(&buf, b"band data");
    }

    #[test]
    fn read_past_end_is_short() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("small.img");

        let dev = FileDevice::create(&path, 8).unwrap();
        let mut buf = vec![0u8; 16];
        let err = dev.read_exact_at(&mut buf, 0).unwrap_err();
        assert!(matches!(err, IoError::ShortIo { operation: "read", .. }));
    }

    #[test]
    fn read_only_rejects_writes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ro.img");

        drop(FileDevice::create(&path, 64).unwrap());

        let dev = FileDevice::open_read(&path).unwrap();
        let err = dev.write_at(b"x", 0).unwrap_err();
        assert!(matches!(err, IoError::InvalidOperation { .. }));
    }

    #[test]
    fn preallocate_never_shrinks() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grow.img");

        drop(FileDevice::create(&path, 4096).unwrap());
        let dev = FileDevice::create(&path, 1024).unwrap();
        assert_eq!(dev.len().unwrap(), 4096);
    }
}
