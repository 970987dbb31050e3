//! Public cache facade.

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use parking_lot::Mutex;

use crate::config::CacheConfig;
use crate::device::BlockDevice;
use crate::error::CacheResult;
use crate::manager::CacheStats;
use crate::translate::BandTranslator;

/// Write-back block cache over a band-constrained backing store.
///
/// The single entry point for callers. Internally the whole translation
/// and allocation machinery is one single-owner structure; concurrent
/// callers are serialized behind one mutex rather than fine-grained locks
/// on the pool, index, and recency lists. Wrap in an [`Arc`] to share.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use bandcache::{AddressMode, BandCache, CacheConfig, MemDevice, StrategyKind};
///
/// # fn main() -> bandcache::CacheResult<()> {
/// let config = CacheConfig::new(8)
///     .with_block_size(4096)
///     .with_band_size(64 * 1024)
///     .with_strategy(StrategyKind::Lru)
///     .with_mode(AddressMode::Banded);
///
/// let backing = Arc::new(MemDevice::new(1024 * 1024));
/// let cache_dev = Arc::new(MemDevice::new(config.cache_device_size() as usize));
/// let cache = BandCache::new(config, backing, cache_dev)?;
///
/// cache.write(4096, &[7u8; 4096])?;
/// assert_eq!(cache.read(4096)?.as_ref(), &[7u8; 4096][..]);
/// # Ok(())
/// # }
/// ```
pub struct BandCache {
    inner: Mutex<BandTranslator>,
    block_size: usize,
}

impl BandCache {
    /// Creates a cache from a configuration and the two devices.
    ///
    /// `backing_dev` is the band-constrained store; `cache_dev` must span
    /// at least [`CacheConfig::cache_device_size`] bytes.
    pub fn new(
        config: CacheConfig,
        backing_dev: Arc<dyn BlockDevice>,
        cache_dev: Arc<dyn BlockDevice>,
    ) -> CacheResult<Self> {
        let block_size = config.block_size;
        let inner = BandTranslator::new(config, backing_dev, cache_dev)?;
        Ok(Self {
            inner: Mutex::new(inner),
            block_size,
        })
    }

    /// Reads the block at `offset`.
    ///
    /// `offset` must be block-aligned (caller responsibility).
    pub fn read(&self, offset: u64) -> CacheResult<Bytes> {
        let mut buf = BytesMut::zeroed(self.block_size);
        self.inner.lock().read_block(offset, &mut buf)?;
        Ok(buf.freeze())
    }

    /// Reads the block at `offset` into a caller-supplied buffer of
    /// exactly one block.
    pub fn read_into(&self, offset: u64, out: &mut [u8]) -> CacheResult<()> {
        self.inner.lock().read_block(offset, out)
    }

    /// Writes one block of `data` at `offset`.
    ///
    /// The write lands on the cache device and reaches the backing store
    /// on eviction or [`flush`](Self::flush).
    pub fn write(&self, offset: u64, data: &[u8]) -> CacheResult<()> {
        self.inner.lock().write_block(offset, data)
    }

    /// Writes every dirty slot back to the backing store and returns the
    /// number of slots flushed.
    pub fn flush(&self) -> CacheResult<usize> {
        self.inner.lock().flush()
    }

    /// Returns true if the block or band covering `offset` is resident.
    pub fn contains(&self, offset: u64) -> bool {
        self.inner.lock().contains(offset)
    }

    /// Returns a snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    /// Returns the block size served by [`read`](Self::read) and
    /// [`write`](Self::write).
    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }
}

impl std::fmt::Debug for BandCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BandCache")
            .field("inner", &*self.inner.lock())
            .finish()
    }
}
