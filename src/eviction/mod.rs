//! Pluggable eviction strategies.
//!
//! A strategy owns the recency state for every slot (a parallel structure
//! indexed by slot id) and answers exactly two questions: which slot to
//! recycle next, and how to account for a hit. The variant is chosen once
//! at construction; call sites only ever speak to the trait.
//!
//! Both strategies drain the pool's free list before selecting victims, so
//! the first `capacity` acquisitions never evict or flush anything.

mod clock;
mod lru;

pub use clock::ClockStrategy;
pub use lru::LruStrategy;

use crate::config::StrategyKind;
use crate::error::{CacheError, CacheResult};
use crate::pool::SlotPool;
use crate::types::SlotId;

/// Victim selection and recency tracking over the slot pool.
///
/// Selection is infallible: slots are never pinned, so once the free list
/// is empty every slot is a candidate and a victim always exists.
pub trait EvictionStrategy: Send + std::fmt::Debug {
    /// Returns the next slot to (re)use, taking from the pool's free list
    /// while it lasts.
    ///
    /// The caller will immediately repopulate the returned slot, so
    /// strategies treat the victim as most recently used on return.
    fn pick_victim(&mut self, pool: &mut SlotPool) -> SlotId;

    /// Records a lookup hit on `slot`.
    fn on_hit(&mut self, slot: SlotId);

    /// Returns the strategy's display name.
    fn name(&self) -> &'static str;
}

/// Builds the strategy selected by `kind` for a pool of `capacity` slots.
///
/// `StrategyKind::BandLru` is reserved and fails with a configuration
/// error.
pub fn build(kind: StrategyKind, capacity: usize) -> CacheResult<Box<dyn EvictionStrategy>> {
    match kind {
        StrategyKind::Clock => Ok(Box::new(ClockStrategy::new(capacity))),
        StrategyKind::Lru => Ok(Box::new(LruStrategy::new(capacity))),
        StrategyKind::BandLru => Err(CacheError::config(
            "band-aware LRU is reserved and not implemented",
        )),
    }
}
