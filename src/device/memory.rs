//! In-memory device.

use parking_lot::RwLock;

use super::error::{IoError, IoResult};
use super::handle::BlockDevice;

/// A fixed-capacity in-memory device.
///
/// Behaves like a pre-sized device file: reads clamp at the end of the
/// device, writes past the end fail. Used as the simulated backing store in
/// tests and benchmarks.
pub struct MemDevice {
    data: RwLock<Vec<u8>>,
}

impl MemDevice {
    /// Creates a zero-filled device of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            data: RwLock::new(vec![0u8; capacity]),
        }
    }

    /// Creates a device holding `data`; capacity equals `data.len()`.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Returns the fixed capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.read().len()
    }

    /// Returns a copy of the full device contents.
    pub fn snapshot(&self) -> Vec<u8> {
        self.data.read().clone()
    }
}

impl BlockDevice for MemDevice {
    fn len(&self) -> IoResult<u64> {
        Ok(self.data.read().len() as u64)
    }

    fn read_at(&self, buf: &mut [u8], offset: u64) -> IoResult<usize> {
        let data = self.data.read();
        let offset = offset as usize;
        if offset >= data.len() {
            return Ok(0);
        }
        let n = buf.len().min(data.len() - offset);
        buf[..n].copy_from_slice(&data[offset..offset + n]);
        Ok(n)
    }

    fn write_at(&self, buf: &[u8], offset: u64) -> IoResult<usize> {
        let mut data = self.data.write();
        let capacity = data.len() as u64;
        let end = offset
            .checked_add(buf.len() as u64)
            .filter(|&end| end <= capacity);
        match end {
            Some(_) => {
                let offset = offset as usize;
                data[offset..offset + buf.len()].copy_from_slice(buf);
                Ok(buf.len())
            }
            None => Err(IoError::OutOfRange {
                offset,
                len: buf.len(),
                capacity,
            }),
        }
    }

    fn sync(&self) -> IoResult<()> {
        Ok(())
    }
}

impl std::fmt::Debug for MemDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemDevice")
            .field("capacity", &self.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_filled_on_creation() {
        let dev = MemDevice::new(64);
        assert_eq!(dev.capacity(), 64);
        let mut buf = [0xFFu8; 64];
        dev.read_exact_at(&mut buf, 0).unwrap();
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn write_then_read() {
        let dev = MemDevice::new(32);
        dev.write_all_at(&[7u8; 8], 8).unwrap();

        let mut buf = [0u8; 8];
        dev.read_exact_at(&mut buf, 8).unwrap();
        assert_eq!(buf, [7u8; 8]);
    }

    #[test]
    fn read_clamps_at_end() {
        let dev = MemDevice::from_vec(vec![1, 2, 3, 4]);
        let mut buf = [0u8; 8];
        let n = dev.read_at(&mut buf, 2).unwrap();
        assert_eq!(n, 2);
        assert_eq!(&buf[..2], &[3, 4]);

        let n = dev.read_at(&mut buf, 100).unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn write_past_end_fails() {
        let dev = MemDevice::new(16);
        let err = dev.write_at(&[0u8; 8], 12).unwrap_err();
        assert!(matches!(err, IoError::OutOfRange { capacity: 16, .. }));
        // Offset overflow must not panic either.
        let err = dev.write_at(&[0u8; 8], u64::MAX).unwrap_err();
        assert!(matches!(err, IoError::OutOfRange { .. }));
    }

    #[test]
    fn snapshot_copies_contents() {
        let dev = MemDevice::from_vec(vec![5u8; 4]);
        dev.write_all_at(&[9], 0).unwrap();
        assert_eq!(dev.snapshot(), vec![9, 5, 5, 5]);
    }
}
