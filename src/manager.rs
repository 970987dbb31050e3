//! Cache manager: slot allocation, flush-on-evict, index maintenance.
//!
//! [`CacheManager::allocate`] is the single entry point through which the
//! translation layer obtains slots, and the only code path that mutates
//! the tag index or flushes a dirty slot to the backing store.

use tracing::{debug, trace};

use crate::device::BlockDevice;
use crate::error::CacheResult;
use crate::eviction::EvictionStrategy;
use crate::index::TagTable;
use crate::pool::SlotPool;
use crate::types::{SlotId, Tag};

/// Outcome of [`CacheManager::allocate`].
#[derive(Debug, Clone, Copy)]
pub struct Allocation {
    /// The slot now owning the requested tag.
    pub slot: SlotId,
    /// True if the tag was already resident; the slot's content is live.
    /// False if the caller must populate the slot.
    pub hit: bool,
}

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    hits: u64,
    misses: u64,
    evictions: u64,
    flushes: u64,
    band_fills: u64,
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Allocations that found the tag resident.
    pub hits: u64,
    /// Allocations that had to assign a slot.
    pub misses: u64,
    /// Resident tags displaced from their slot.
    pub evictions: u64,
    /// Dirty slots written back to the backing store.
    pub flushes: u64,
    /// Whole bands read from the backing store to fill a slot.
    pub band_fills: u64,
    /// Slots currently holding live content.
    pub resident_slots: usize,
    /// Slots currently dirty.
    pub dirty_slots: usize,
}

impl CacheStats {
    /// Returns the hit ratio over all allocations, 0.0 to 1.0.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Orchestrates tag lookup, victim selection, flush-on-evict, and index
/// maintenance over one slot pool.
pub struct CacheManager {
    pool: SlotPool,
    index: TagTable,
    strategy: Box<dyn EvictionStrategy>,
    unit_size: usize,
    scratch: Vec<u8>,
    counters: Counters,
}

impl CacheManager {
    /// Creates a manager for `capacity` slots of `unit_size` bytes each.
    pub fn new(capacity: usize, unit_size: usize, strategy: Box<dyn EvictionStrategy>) -> Self {
        Self {
            pool: SlotPool::new(capacity),
            index: TagTable::new(capacity),
            strategy,
            unit_size,
            scratch: vec![0u8; unit_size],
            counters: Counters::default(),
        }
    }

    /// Returns the slot holding `tag`, assigning one on a miss.
    ///
    /// On a hit the strategy is notified and nothing else changes: no
    /// flags, no index entries, no device I/O. On a miss the victim slot
    /// is flushed first if dirty (one cache-device read, one
    /// backing-device write), its old tag is unindexed if it was resident,
    /// and the new tag is indexed with both flags cleared. The caller is
    /// responsible for populating the slot and re-marking it valid.
    pub fn allocate(
        &mut self,
        tag: Tag,
        cache_dev: &dyn BlockDevice,
        backing_dev: &dyn BlockDevice,
    ) -> CacheResult<Allocation> {
        let code = self.index.hash(tag);
        if let Some(slot) = self.index.lookup(tag, code) {
            self.strategy.on_hit(slot);
            self.counters.hits += 1;
            trace!(%tag, slot = slot.index(), "tag hit");
            return Ok(Allocation { slot, hit: true });
        }

        self.counters.misses += 1;
        let victim = self.strategy.pick_victim(&mut self.pool);
        let descriptor = self.pool.slot(victim);
        let was_valid = descriptor.is_valid();
        let was_dirty = descriptor.is_dirty();
        let old_tag = descriptor.tag();

        if was_dirty {
            self.flush_slot(victim, old_tag, cache_dev, backing_dev)?;
            self.counters.flushes += 1;
        }
        if was_valid {
            // The old tag hashes differently from the request; recompute.
            let old_code = self.index.hash(old_tag);
            self.index.delete(old_tag, old_code);
            self.counters.evictions += 1;
            debug!(%old_tag, %tag, slot = victim.index(), "evicted resident tag");
        }

        self.index.insert(tag, code, victim);
        let descriptor = self.pool.slot_mut(victim);
        descriptor.clear_flags();
        descriptor.set_tag(tag);
        trace!(%tag, slot = victim.index(), "tag miss, slot assigned");

        Ok(Allocation { slot: victim, hit: false })
    }

    /// Looks up `tag` without touching recency state.
    pub fn lookup(&self, tag: Tag) -> Option<SlotId> {
        let code = self.index.hash(tag);
        self.index.lookup(tag, code)
    }

    /// Writes every dirty slot back to the backing store.
    ///
    /// Returns the number of slots flushed. Flushed slots stay resident;
    /// only their dirty flag clears.
    pub fn flush_dirty(
        &mut self,
        cache_dev: &dyn BlockDevice,
        backing_dev: &dyn BlockDevice,
    ) -> CacheResult<usize> {
        let mut flushed = 0;
        for index in 0..self.pool.capacity() {
            let slot = SlotId::new(index);
            if !self.pool.slot(slot).is_dirty() {
                continue;
            }
            let tag = self.pool.slot(slot).tag();
            self.flush_slot(slot, tag, cache_dev, backing_dev)?;
            self.pool.slot_mut(slot).set_dirty(false);
            self.counters.flushes += 1;
            flushed += 1;
        }
        Ok(flushed)
    }

    /// Marks `slot` valid after the caller populated it.
    pub fn mark_valid(&mut self, slot: SlotId) {
        self.pool.slot_mut(slot).set_valid(true);
    }

    /// Marks `slot` valid and dirty after the caller wrote into it.
    pub fn mark_dirty(&mut self, slot: SlotId) {
        let descriptor = self.pool.slot_mut(slot);
        descriptor.set_valid(true);
        descriptor.set_dirty(true);
    }

    /// Returns a snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        let mut resident = 0;
        let mut dirty = 0;
        for slot in self.pool.iter() {
            if slot.is_valid() {
                resident += 1;
            }
            if slot.is_dirty() {
                dirty += 1;
            }
        }
        CacheStats {
            hits: self.counters.hits,
            misses: self.counters.misses,
            evictions: self.counters.evictions,
            flushes: self.counters.flushes,
            band_fills: self.counters.band_fills,
            resident_slots: resident,
            dirty_slots: dirty,
        }
    }

    /// Returns the pool capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Returns the slot unit size in bytes.
    #[inline]
    pub fn unit_size(&self) -> usize {
        self.unit_size
    }

    /// Returns the number of resident tags.
    pub fn resident_tags(&self) -> usize {
        self.index.len()
    }

    pub(crate) fn note_band_fill(&mut self) {
        self.counters.band_fills += 1;
    }

    fn flush_slot(
        &mut self,
        slot: SlotId,
        tag: Tag,
        cache_dev: &dyn BlockDevice,
        backing_dev: &dyn BlockDevice,
    ) -> CacheResult<()> {
        let cache_pos = slot.index() as u64 * self.unit_size as u64;
        cache_dev.read_exact_at(&mut self.scratch, cache_pos)?;
        backing_dev.write_all_at(&self.scratch, tag.offset())?;
        debug!(%tag, slot = slot.index(), "flushed dirty slot");
        Ok(())
    }
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("capacity", &self.pool.capacity())
            .field("unit_size", &self.unit_size)
            .field("strategy", &self.strategy.name())
            .field("resident_tags", &self.index.len())
            .finish()
    }
}
