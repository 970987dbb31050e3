//! # bandcache
//!
//! Write-back block cache for band-constrained (shingled) backing stores.
//!
//! A fast, randomly-writable cache device fronts a backing store that only
//! accepts coarse band-granularity writes. Callers read and write
//! fixed-size blocks; the cache turns small random writes into band-sized
//! read-modify-write sequences where the backing store demands it, and
//! defers write-back until eviction or an explicit flush.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         BandCache                            │
//! │               (mutex-guarded serialization)                  │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │                     BandTranslator                     │  │
//! │  │   direct / banded addressing, read-modify-write        │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                             │                                │
//! │                             ▼                                │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │                      CacheManager                      │  │
//! │  │   TagTable lookup · flush-on-evict · index upkeep      │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │              │                            │                  │
//! │              ▼                            ▼                  │
//! │  ┌──────────────────────┐    ┌──────────────────────────┐    │
//! │  │       SlotPool       │    │     EvictionStrategy     │    │
//! │  │  descriptors + free  │    │      CLOCK  /  LRU       │    │
//! │  │        list          │    │                          │    │
//! │  └──────────────────────┘    └──────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//!                │                               │
//!                ▼                               ▼
//!     ┌────────────────────┐         ┌────────────────────┐
//!     │    cache device    │         │   backing device   │
//!     │   (random write)   │         │  (band-wise write) │
//!     └────────────────────┘         └────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use bandcache::{AddressMode, BandCache, CacheConfig, MemDevice, StrategyKind};
//!
//! # fn main() -> bandcache::CacheResult<()> {
//! let config = CacheConfig::new(16)
//!     .with_block_size(4096)
//!     .with_band_size(64 * 1024)
//!     .with_strategy(StrategyKind::Clock)
//!     .with_mode(AddressMode::Banded);
//!
//! let backing = Arc::new(MemDevice::new(4 * 1024 * 1024));
//! let cache_dev = Arc::new(MemDevice::new(config.cache_device_size() as usize));
//! let cache = BandCache::new(config, backing, cache_dev)?;
//!
//! cache.write(0, &[1u8; 4096])?;
//! let block = cache.read(0)?;
//! assert_eq!(block[0], 1);
//! cache.flush()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Public cache facade.
pub mod cache;

/// Cache configuration and constants.
pub mod config;

/// Positional device I/O.
pub mod device;

/// Cache-level errors.
pub mod error;

/// Eviction strategies.
pub mod eviction;

/// Tag index.
pub mod index;

/// Cache manager.
pub mod manager;

/// Slot pool.
pub mod pool;

/// Band translation.
pub mod translate;

/// Identifier newtypes.
pub mod types;

pub use cache::BandCache;
pub use config::{AddressMode, CacheConfig, StrategyKind};
pub use device::{BlockDevice, FileDevice, MemDevice};
pub use error::{CacheError, CacheResult};
pub use manager::CacheStats;
pub use types::{SlotId, Tag};
