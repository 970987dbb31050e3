//! Cache configuration.

/// Default block size in bytes (4 KB).
///
/// The minimal unit requested by read/write callers. Matches the common
/// sector-cluster size of flash devices.
pub const DEFAULT_BLOCK_SIZE: usize = 4 * 1024;

/// Default band size in bytes (2 MB).
///
/// A band is the write granularity of the backing store: it can only be
/// rewritten as a whole.
pub const DEFAULT_BAND_SIZE: usize = 2 * 1024 * 1024;

/// Default number of cache slots.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Minimum supported block size in bytes.
pub const MIN_BLOCK_SIZE: usize = 512;

/// Eviction strategy selection, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Second-chance approximation of LRU using one reference bit per slot.
    Clock,
    /// Exact least-recently-used ordering over all resident slots.
    Lru,
    /// Band-aware LRU. Reserved: building a cache with this kind fails.
    BandLru,
}

/// Addressing mode, fixed at construction.
///
/// Chooses what a cache slot holds and therefore what the tag of a request
/// is: a single block, or the whole band containing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
    /// Cache key is the requested block offset; slots hold one block.
    Direct,
    /// Cache key is the band-base offset; slots hold one full band.
    Banded,
}

/// Configuration for a [`BandCache`](crate::BandCache).
///
/// All values are fixed at construction; the pool is never resized at
/// runtime.
///
/// # Example
///
/// ```rust
/// use bandcache::{AddressMode, CacheConfig, StrategyKind};
///
/// let config = CacheConfig::new(64)
///     .with_block_size(4096)
///     .with_band_size(1024 * 1024)
///     .with_strategy(StrategyKind::Lru)
///     .with_mode(AddressMode::Banded);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Number of slots in the pool.
    pub capacity: usize,
    /// Block size in bytes.
    pub block_size: usize,
    /// Band size in bytes.
    pub band_size: usize,
    /// Eviction strategy.
    pub strategy: StrategyKind,
    /// Addressing mode.
    pub mode: AddressMode,
}

impl CacheConfig {
    /// Creates a configuration with the given slot count and defaults
    /// everywhere else.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            block_size: DEFAULT_BLOCK_SIZE,
            band_size: DEFAULT_BAND_SIZE,
            strategy: StrategyKind::Clock,
            mode: AddressMode::Direct,
        }
    }

    /// Sets the block size.
    #[must_use]
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Sets the band size.
    #[must_use]
    pub fn with_band_size(mut self, band_size: usize) -> Self {
        self.band_size = band_size;
        self
    }

    /// Sets the eviction strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the addressing mode.
    #[must_use]
    pub fn with_mode(mut self, mode: AddressMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns the size of one cache slot for the configured mode.
    #[inline]
    pub fn unit_size(&self) -> usize {
        match self.mode {
            AddressMode::Direct => self.block_size,
            AddressMode::Banded => self.band_size,
        }
    }

    /// Returns the number of cache-device bytes the pool addresses.
    ///
    /// Useful for sizing the cache device before handing it to the cache.
    pub fn cache_device_size(&self) -> u64 {
        self.capacity as u64 * self.unit_size() as u64
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.capacity == 0 {
            return Err("capacity must be > 0");
        }
        if !self.block_size.is_power_of_two() {
            return Err("block_size must be a power of 2");
        }
        if self.block_size < MIN_BLOCK_SIZE {
            return Err("block_size must be >= 512");
        }
        if self.mode == AddressMode::Banded {
            if self.band_size < self.block_size {
                return Err("band_size must be >= block_size");
            }
            if self.band_size % self.block_size != 0 {
                return Err("band_size must be a multiple of block_size");
            }
        }
        if self.strategy == StrategyKind::BandLru {
            return Err("band-aware LRU is reserved and not implemented");
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
