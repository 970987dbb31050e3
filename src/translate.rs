//! Band translation: block requests against a band-constrained store.
//!
//! The backing store forbids small random writes; the cache device does
//! not. In banded mode a cache slot therefore holds an entire band, small
//! writes land inside the cached band image, and bands travel between the
//! devices only as a whole (read-modify-write on fill, full-band write-back
//! on flush). In direct mode a slot holds a single block and the
//! translation is the identity.
//!
//! All addressing below is byte-granular: `band_base = offset - offset %
//! band_size` picks the band, `intra = offset - band_base` locates the
//! block inside it, and slot `i` owns cache-device bytes starting at
//! `i * unit_size`.

use std::sync::Arc;

use tracing::debug;

use crate::config::{AddressMode, CacheConfig};
use crate::device::BlockDevice;
use crate::error::{CacheError, CacheResult};
use crate::eviction;
use crate::manager::{CacheManager, CacheStats};
use crate::types::Tag;

/// Read/write orchestration over one cache manager and two devices.
///
/// Owns the slot pool (through the manager), both device handles, and a
/// band-sized scratch buffer for read-modify-write sequences. All methods
/// take `&mut self`; [`BandCache`](crate::BandCache) provides the shared,
/// lock-guarded wrapper.
pub struct BandTranslator {
    config: CacheConfig,
    manager: CacheManager,
    backing_dev: Arc<dyn BlockDevice>,
    cache_dev: Arc<dyn BlockDevice>,
    scratch: Vec<u8>,
}

impl BandTranslator {
    /// Creates a translator from a validated configuration and the two
    /// devices.
    pub fn new(
        config: CacheConfig,
        backing_dev: Arc<dyn BlockDevice>,
        cache_dev: Arc<dyn BlockDevice>,
    ) -> CacheResult<Self> {
        config.validate().map_err(CacheError::config)?;
        let strategy = eviction::build(config.strategy, config.capacity)?;
        let manager = CacheManager::new(config.capacity, config.unit_size(), strategy);
        let scratch = match config.mode {
            AddressMode::Banded => vec![0u8; config.band_size],
            AddressMode::Direct => Vec::new(),
        };

        Ok(Self {
            config,
            manager,
            backing_dev,
            cache_dev,
            scratch,
        })
    }

    /// Reads one block at `offset` into `out`.
    ///
    /// `out` must be exactly one block long and `offset` block-aligned
    /// (caller responsibility).
    pub fn read_block(&mut self, offset: u64, out: &mut [u8]) -> CacheResult<()> {
        debug_assert_eq!(out.len(), self.config.block_size);
        debug_assert_eq!(offset % self.config.block_size as u64, 0);

        match self.config.mode {
            AddressMode::Direct => self.read_direct(offset, out),
            AddressMode::Banded => self.read_banded(offset, out),
        }
    }

    /// Writes one block of `data` at `offset`.
    ///
    /// The block lands on the cache device and is flushed to the backing
    /// store on eviction or [`flush`](Self::flush); `data` must be exactly
    /// one block long and `offset` block-aligned (caller responsibility).
    pub fn write_block(&mut self, offset: u64, data: &[u8]) -> CacheResult<()> {
        debug_assert_eq!(data.len(), self.config.block_size);
        debug_assert_eq!(offset % self.config.block_size as u64, 0);

        match self.config.mode {
            AddressMode::Direct => self.write_direct(offset, data),
            AddressMode::Banded => self.write_banded(offset, data),
        }
    }

    /// Writes every dirty slot back to the backing store.
    pub fn flush(&mut self) -> CacheResult<usize> {
        self.manager
            .flush_dirty(&*self.cache_dev, &*self.backing_dev)
    }

    /// Returns true if the unit covering `offset` is resident.
    ///
    /// Does not touch recency state.
    pub fn contains(&self, offset: u64) -> bool {
        self.manager.lookup(Tag::new(self.cache_key(offset))).is_some()
    }

    /// Returns a snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        self.manager.stats()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn read_direct(&mut self, offset: u64, out: &mut [u8]) -> CacheResult<()> {
        let alloc =
            self.manager
                .allocate(Tag::new(offset), &*self.cache_dev, &*self.backing_dev)?;
        let cache_pos = alloc.slot.index() as u64 * self.config.block_size as u64;

        if alloc.hit {
            self.cache_dev.read_exact_at(out, cache_pos)?;
        } else {
            self.backing_dev.read_exact_at(out, offset)?;
            self.cache_dev.write_all_at(out, cache_pos)?;
        }
        self.manager.mark_valid(alloc.slot);
        Ok(())
    }

    fn write_direct(&mut self, offset: u64, data: &[u8]) -> CacheResult<()> {
        let alloc =
            self.manager
                .allocate(Tag::new(offset), &*self.cache_dev, &*self.backing_dev)?;
        let cache_pos = alloc.slot.index() as u64 * self.config.block_size as u64;

        self.cache_dev.write_all_at(data, cache_pos)?;
        self.manager.mark_dirty(alloc.slot);
        Ok(())
    }

    fn read_banded(&mut self, offset: u64, out: &mut [u8]) -> CacheResult<()> {
        let (band_base, intra) = self.band_of(offset);
        let alloc =
            self.manager
                .allocate(Tag::new(band_base), &*self.cache_dev, &*self.backing_dev)?;
        let slot_base = alloc.slot.index() as u64 * self.config.band_size as u64;

        if alloc.hit {
            self.cache_dev.read_exact_at(out, slot_base + intra as u64)?;
        } else {
            // Fill the whole band, then serve the request from the image
            // just read; no second trip to either device.
            self.backing_dev.read_exact_at(&mut self.scratch, band_base)?;
            self.cache_dev.write_all_at(&self.scratch, slot_base)?;
            out.copy_from_slice(&self.scratch[intra..intra + self.config.block_size]);
            self.manager.note_band_fill();
            debug!(band_base, slot = alloc.slot.index(), "band filled for read");
        }
        self.manager.mark_valid(alloc.slot);
        Ok(())
    }

    fn write_banded(&mut self, offset: u64, data: &[u8]) -> CacheResult<()> {
        let (band_base, intra) = self.band_of(offset);
        let alloc =
            self.manager
                .allocate(Tag::new(band_base), &*self.cache_dev, &*self.backing_dev)?;
        let slot_base = alloc.slot.index() as u64 * self.config.band_size as u64;

        if alloc.hit {
            // Sub-band random writes are fine on the cache device.
            self.cache_dev
                .write_all_at(data, slot_base + intra as u64)?;
        } else {
            // Read-modify-write: splice the block into the band image so
            // every byte outside the written range keeps its prior
            // backing-store content.
            self.backing_dev.read_exact_at(&mut self.scratch, band_base)?;
            self.scratch[intra..intra + self.config.block_size].copy_from_slice(data);
            self.cache_dev.write_all_at(&self.scratch, slot_base)?;
            self.manager.note_band_fill();
            debug!(band_base, slot = alloc.slot.index(), "band filled for write");
        }
        self.manager.mark_dirty(alloc.slot);
        Ok(())
    }

    /// Returns the key a request at `offset` is cached under.
    fn cache_key(&self, offset: u64) -> u64 {
        match self.config.mode {
            AddressMode::Direct => offset,
            AddressMode::Banded => self.band_of(offset).0,
        }
    }

    fn band_of(&self, offset: u64) -> (u64, usize) {
        let band_size = self.config.band_size as u64;
        let band_base = offset - offset % band_size;
        (band_base, (offset - band_base) as usize)
    }
}

impl std::fmt::Debug for BandTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BandTranslator")
            .field("mode", &self.config.mode)
            .field("block_size", &self.config.block_size)
            .field("band_size", &self.config.band_size)
            .field("manager", &self.manager)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::MemDevice;
    use crate::StrategyKind;

    const BLOCK: usize = 512;
    const BAND: usize = 2048;

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    fn banded(capacity: usize) -> (BandTranslator, Arc<MemDevice>, Arc<MemDevice>) {
        let config = CacheConfig::new(capacity)
            .with_block_size(BLOCK)
            .with_band_size(BAND)
            .with_strategy(StrategyKind::Lru)
            .with_mode(AddressMode::Banded);
        let backing = Arc::new(MemDevice::from_vec(pattern(4 * BAND)));
        let cache = Arc::new(MemDevice::new(config.cache_device_size() as usize));
        let translator =
            BandTranslator::new(config, backing.clone(), cache.clone()).unwrap();
        (translator, backing, cache)
    }

    fn direct(capacity: usize) -> (BandTranslator, Arc<MemDevice>, Arc<MemDevice>) {
        let config = CacheConfig::new(capacity)
            .with_block_size(BLOCK)
            .with_strategy(StrategyKind::Lru)
            .with_mode(AddressMode::Direct);
        let backing = Arc::new(MemDevice::from_vec(pattern(64 * BLOCK)));
        let cache = Arc::new(MemDevice::new(config.cache_device_size() as usize));
        let translator =
            BandTranslator::new(config, backing.clone(), cache.clone()).unwrap();
        (translator, backing, cache)
    }

    #[test]
    fn direct_read_miss_pulls_from_backing() {
        let (mut tr, backing, _cache) = direct(4);
        let mut out = vec![0u8; BLOCK];

        tr.read_block(3 * BLOCK as u64, &mut out).unwrap();
        assert_eq!(out, backing.snapshot()[3 * BLOCK..4 * BLOCK]);
        assert!(tr.contains(3 * BLOCK as u64));
    }

    #[test]
    fn direct_read_hit_serves_cached_copy() {
        let (mut tr, backing, _cache) = direct(4);
        let mut out = vec![0u8; BLOCK];
        tr.read_block(0, &mut out).unwrap();
        let cached = out.clone();

        // Change the backing store underneath; a hit must not see it.
        backing.write_all_at(&[0xEE; BLOCK], 0).unwrap();
        tr.read_block(0, &mut out).unwrap();
        assert_eq!(out, cached);
        assert_eq!(tr.stats().hits, 1);
    }

    #[test]
    fn direct_round_trip() {
        let (mut tr, backing, _cache) = direct(4);
        let data = vec![0x5A; BLOCK];
        tr.write_block(2 * BLOCK as u64, &data).unwrap();

        let mut out = vec![0u8; BLOCK];
        tr.read_block(2 * BLOCK as u64, &mut out).unwrap();
        assert_eq!(out, data);

        // Write-back is deferred: backing still holds the old bytes.
        assert_eq!(
            backing.snapshot()[2 * BLOCK..3 * BLOCK],
            pattern(64 * BLOCK)[2 * BLOCK..3 * BLOCK]
        );
    }

    #[test]
    fn band_read_miss_fills_caller_buffer() {
        // Pins the miss-path contract: the caller's buffer is served from
        // the band image just read, not left untouched.
        let (mut tr, backing, cache) = banded(2);
        let offset = BAND as u64 + 512;
        let mut out = vec![0u8; BLOCK];

        tr.read_block(offset, &mut out).unwrap();
        assert_eq!(out, backing.snapshot()[offset as usize..offset as usize + BLOCK]);

        // The full band is now resident on the cache device at slot 0.
        assert_eq!(
            cache.snapshot()[..BAND],
            backing.snapshot()[BAND..2 * BAND]
        );
        assert_eq!(tr.stats().band_fills, 1);
    }

    #[test]
    fn band_read_hit_serves_cached_band() {
        let (mut tr, backing, _cache) = banded(2);
        let mut out = vec![0u8; BLOCK];
        tr.read_block(0, &mut out).unwrap();
        let cached = out.clone();

        backing.write_all_at(&[0xEE; BAND], 0).unwrap();
        tr.read_block(0, &mut out).unwrap();
        assert_eq!(out, cached);

        // A different block of the same band is also a hit.
        tr.read_block(512, &mut out).unwrap();
        assert_eq!(out, pattern(4 * BAND)[512..512 + BLOCK]);
        assert_eq!(tr.stats().band_fills, 1);
    }

    #[test]
    fn band_write_miss_preserves_rest_of_band() {
        let (mut tr, backing, cache) = banded(2);
        let data = vec![0xAA; BLOCK];
        tr.write_block(512, &data).unwrap();

        let band_image = &cache.snapshot()[..BAND];
        let prior = backing.snapshot();
        assert_eq!(&band_image[..512], &prior[..512]);
        assert_eq!(&band_image[512..1024], &data[..]);
        assert_eq!(&band_image[1024..], &prior[1024..BAND]);

        // The backing store is untouched until write-back.
        assert_eq!(backing.snapshot(), pattern(4 * BAND));
    }

    #[test]
    fn band_write_round_trip() {
        let (mut tr, _backing, _cache) = banded(2);
        let data = vec![0x33; BLOCK];
        tr.write_block(1536, &data).unwrap();

        let mut out = vec![0u8; BLOCK];
        tr.read_block(1536, &mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn band_write_hit_lands_inside_cached_band() {
        let (mut tr, _backing, cache) = banded(2);
        tr.write_block(0, &vec![0x01; BLOCK]).unwrap();
        tr.write_block(512, &vec![0x02; BLOCK]).unwrap();

        let stats = tr.stats();
        assert_eq!(stats.band_fills, 1, "second write must hit the band");
        let band_image = &cache.snapshot()[..BAND];
        assert_eq!(&band_image[..512], &[0x01; 512]);
        assert_eq!(&band_image[512..1024], &[0x02; 512]);
    }

    #[test]
    fn eviction_writes_dirty_band_back() {
        let (mut tr, backing, _cache) = banded(1);
        tr.write_block(512, &vec![0xAA; BLOCK]).unwrap();

        // Touching another band evicts band 0 and flushes it whole.
        let mut out = vec![0u8; BLOCK];
        tr.read_block(BAND as u64, &mut out).unwrap();

        let after = backing.snapshot();
        let prior = pattern(4 * BAND);
        assert_eq!(&after[..512], &prior[..512]);
        assert_eq!(&after[512..1024], &[0xAA; 512]);
        assert_eq!(&after[1024..BAND], &prior[1024..BAND]);

        let stats = tr.stats();
        assert_eq!(stats.flushes, 1);
        assert_eq!(stats.evictions, 1);
    }

    #[test]
    fn flush_persists_dirty_bands() {
        let (mut tr, backing, _cache) = banded(2);
        tr.write_block(0, &vec![0x44; BLOCK]).unwrap();
        tr.write_block(BAND as u64, &vec![0x55; BLOCK]).unwrap();

        assert_eq!(tr.flush().unwrap(), 2);
        let after = backing.snapshot();
        assert_eq!(&after[..512], &[0x44; 512]);
        assert_eq!(&after[BAND..BAND + 512], &[0x55; 512]);
        assert_eq!(tr.stats().dirty_slots, 0);

        // Flushed bands stay resident and clean.
        assert!(tr.contains(0));
        assert_eq!(tr.flush().unwrap(), 0);
    }

    #[test]
    fn contains_is_band_granular() {
        let (mut tr, _backing, _cache) = banded(2);
        tr.write_block(0, &vec![0x01; BLOCK]).unwrap();

        assert!(tr.contains(0));
        assert!(tr.contains(1536), "same band, different block");
        assert!(!tr.contains(BAND as u64));

        let hits_before = tr.stats().hits;
        assert!(tr.contains(0));
        assert_eq!(tr.stats().hits, hits_before, "contains must not count as a hit");
    }

    #[test]
    fn device_error_propagates() {
        // Cache device too small for the pool: the very first fill fails.
        let config = CacheConfig::new(2)
            .with_block_size(BLOCK)
            .with_band_size(BAND)
            .with_mode(AddressMode::Banded);
        let backing = Arc::new(MemDevice::from_vec(pattern(4 * BAND)));
        let cache = Arc::new(MemDevice::new(BAND / 2));
        let mut tr = BandTranslator::new(config, backing, cache).unwrap();

        let err = tr.write_block(0, &vec![0u8; BLOCK]).unwrap_err();
        assert!(matches!(err, CacheError::Io(_)));
    }
}
