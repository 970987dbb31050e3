//! Slot pool: the fixed descriptor arena and its one-time-use free list.
//!
//! The pool owns no cache-device bytes itself; slot `i` of a pool with unit
//! size `u` stands for bytes `[i * u, (i + 1) * u)` of the cache device.
//! Descriptors are allocated once at construction and live for the pool's
//! lifetime. A slot leaves the free list at most once and is never
//! returned: after the list drains, slots are recycled exclusively through
//! eviction.

mod arena;
mod slot;

pub use arena::SlotPool;
pub use slot::SlotDescriptor;
