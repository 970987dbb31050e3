//! Block device trait.

use super::error::{IoError, IoResult};

/// Positional byte-range I/O over a device.
///
/// All operations address the device by absolute byte offset; there is no
/// cursor. Implementations must allow concurrent calls through a shared
/// reference.
pub trait BlockDevice: Send + Sync {
    /// Returns the current device size in bytes.
    fn len(&self) -> IoResult<u64>;

    /// Returns true if the device holds no bytes.
    fn is_empty(&self) -> IoResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Reads data from the device at the specified offset.
    ///
    /// Returns the number of bytes read. May return less than the buffer
    /// size if the end of the device is reached.
    fn read_at(&self, buf: &mut [u8], offset: u64) -> IoResult<usize>;

    /// Reads exactly `buf.len()` bytes at the specified offset.
    ///
    /// Returns an error if the device ends before the buffer is filled.
    fn read_exact_at(&self, buf: &mut [u8], offset: u64) -> IoResult<()> {
        let mut total_read = 0;
        while total_read < buf.len() {
            let n = self.read_at(&mut buf[total_read..], offset + total_read as u64)?;
            if n == 0 {
                return Err(IoError::short_read(buf.len(), total_read));
            }
            total_read += n;
        }
        Ok(())
    }

    /// Writes data to the device at the specified offset.
    ///
    /// Returns the number of bytes written.
    fn write_at(&self, buf: &[u8], offset: u64) -> IoResult<usize>;

    /// Writes all bytes to the device at the specified offset.
    ///
    /// Returns an error if not all bytes could be written.
    fn write_all_at(&self, buf: &[u8], offset: u64) -> IoResult<()> {
        let mut total_written = 0;
        while total_written < buf.len() {
            let n = self.write_at(&buf[total_written..], offset + total_written as u64)?;
            if n == 0 {
                return Err(IoError::short_write(buf.len(), total_written));
            }
            total_written += n;
        }
        Ok(())
    }

    /// Flushes device buffers to stable storage.
    fn sync(&self) -> IoResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Device that transfers at most two bytes per call, to exercise the
    /// provided loop methods.
    struct TrickleDevice {
        data: Mutex<Vec<u8>>,
    }

    impl BlockDevice for TrickleDevice {
        fn len(&self) -> IoResult<u64> {
            Ok(self.data.lock().len() as u64)
        }

        fn read_at(&self, buf: &mut [u8], offset: u64) -> IoResult<usize> {
            let data = self.data.lock();
            let offset = offset as usize;
            if offset >= data.len() {
                return Ok(0);
            }
            let n = buf.len().min(data.len() - offset).min(2);
            buf[..n].copy_from_slice(&data[offset..offset + n]);
            Ok(n)
        }

        fn write_at(&self, buf: &[u8], offset: u64) -> IoResult<usize> {
            let mut data = self.data.lock();
            let offset = offset as usize;
            if offset >= data.len() {
                return Ok(0);
            }
            let n = buf.len().min(data.len() - offset).min(2);
            data[offset..offset + n].copy_from_slice(&buf[..n]);
            Ok(n)
        }

        fn sync(&self) -> IoResult<()> {
            Ok(())
        }
    }

    #[test]
    fn read_exact_loops_over_short_reads() {
        let dev = TrickleDevice {
            data: Mutex::new((0u8..16).collect()),
        };
        let mut buf = [0u8; 7];
        dev.read_exact_at(&mut buf, 3).unwrap();
        assert_eq!(buf, [3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn read_exact_past_end_is_short_read() {
        let dev = TrickleDevice {
            data: Mutex::new(vec![0u8; 4]),
        };
        let mut buf = [0u8; 8];
        let err = dev.read_exact_at(&mut buf, 0).unwrap_err();
        assert!(matches!(
            err,
            IoError::ShortIo {
                operation: "read",
                expected: 8,
                actual: 4
            }
        ));
    }

    #[test]
    fn write_all_loops_over_short_writes() {
        let dev = TrickleDevice {
            data: Mutex::new(vec![0u8; 16]),
        };
        dev.write_all_at(&[9u8; 7], 2).unwrap();
        let data = dev.data.lock();
        assert_eq!(&data[2..9], &[9u8; 7]);
        assert_eq!(data[1], 0);
        assert_eq!(data[9], 0);
    }

    #[test]
    fn write_all_past_end_is_short_write() {
        let dev = TrickleDevice {
            data: Mutex::new(vec![0u8; 4]),
        };
        let err = dev.write_all_at(&[1u8; 8], 0).unwrap_err();
        assert!(matches!(err, IoError::ShortIo { operation: "write", .. }));
    }
}
