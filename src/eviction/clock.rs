//! CLOCK eviction.
//!
//! A second-chance approximation of LRU: one reference bit per slot and a
//! single circular sweep cursor. Hits set the bit; the sweep clears every
//! set bit it passes and stops at the first slot whose bit is already
//! clear. A slot therefore survives one full sweep after its last hit.

use crate::pool::SlotPool;
use crate::types::SlotId;

use super::EvictionStrategy;

/// CLOCK strategy state: reference bits plus the sweep cursor.
pub struct ClockStrategy {
    ref_bits: Vec<bool>,
    hand: usize,
}

impl ClockStrategy {
    /// Creates CLOCK state for a pool of `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            ref_bits: vec![false; capacity],
            hand: 0,
        }
    }

    /// Returns the current cursor position.
    #[inline]
    pub fn hand_position(&self) -> usize {
        self.hand
    }

    /// Returns the reference bit of `slot`.
    #[inline]
    pub fn ref_bit(&self, slot: SlotId) -> bool {
        self.ref_bits[slot.index()]
    }
}

impl EvictionStrategy for ClockStrategy {
    fn pick_victim(&mut self, pool: &mut SlotPool) -> SlotId {
        if let Some(id) = pool.take_free() {
            return id;
        }

        // Terminates within two revolutions: each set bit is cleared the
        // first time the hand passes it.
        loop {
            let index = self.hand;
            self.hand = (self.hand + 1) % self.ref_bits.len();
            if self.ref_bits[index] {
                self.ref_bits[index] = false;
            } else {
                return SlotId::new(index);
            }
        }
    }

    fn on_hit(&mut self, slot: SlotId) {
        self.ref_bits[slot.index()] = true;
    }

    fn name(&self) -> &'static str {
        "clock"
    }
}

impl std::fmt::Debug for ClockStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClockStrategy")
            .field("capacity", &self.ref_bits.len())
            .field("hand", &self.hand)
            .finish()
    }
}
