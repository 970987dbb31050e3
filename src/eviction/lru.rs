//! LRU eviction.
//!
//! Exact recency ordering over all slots that have left the free list,
//! kept in an intrusive doubly-linked list of slot indices: head is most
//! recently used, tail is least recently used. List links live in a
//! parallel array, so no allocation happens after construction and no
//! pointers are involved.

use crate::pool::SlotPool;
use crate::types::SlotId;

use super::EvictionStrategy;

#[derive(Debug, Clone, Copy, Default)]
struct Link {
    prev: Option<usize>,
    next: Option<usize>,
}

/// LRU strategy state: per-slot list links plus head/tail indices.
pub struct LruStrategy {
    links: Vec<Link>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl LruStrategy {
    /// Creates LRU state for a pool of `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            links: vec![Link::default(); capacity],
            head: None,
            tail: None,
        }
    }

    /// Returns the least-recently-used slot, if any slot is in the list.
    #[inline]
    pub fn coldest(&self) -> Option<SlotId> {
        self.tail.map(SlotId::new)
    }

    /// Returns the most-recently-used slot, if any slot is in the list.
    #[inline]
    pub fn hottest(&self) -> Option<SlotId> {
        self.head.map(SlotId::new)
    }

    fn push_front(&mut self, index: usize) {
        self.links[index].prev = None;
        self.links[index].next = self.head;
        if let Some(head) = self.head {
            self.links[head].prev = Some(index);
        }
        self.head = Some(index);
        if self.tail.is_none() {
            self.tail = Some(index);
        }
    }

    fn unlink(&mut self, index: usize) {
        let Link { prev, next } = self.links[index];
        match prev {
            Some(prev) => self.links[prev].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.links[next].prev = prev,
            None => self.tail = prev,
        }
    }

    fn move_to_front(&mut self, index: usize) {
        if self.head == Some(index) {
            return;
        }
        self.unlink(index);
        self.push_front(index);
    }
}

impl EvictionStrategy for LruStrategy {
    fn pick_victim(&mut self, pool: &mut SlotPool) -> SlotId {
        // A freshly freed slot enters at the head: no eviction, no flush.
        if let Some(id) = pool.take_free() {
            self.push_front(id.index());
            return id;
        }

        // The caller repopulates the victim, which makes it the most
        // recently used content in the pool; re-head it right away.
        let victim = self
            .tail
            .expect("free list drained but recency list is empty");
        self.move_to_front(victim);
        SlotId::new(victim)
    }

    fn on_hit(&mut self, slot: SlotId) {
        self.move_to_front(slot.index());
    }

    fn name(&self) -> &'static str {
        "lru"
    }
}

impl std::fmt::Debug for LruStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruStrategy")
            .field("capacity", &self.links.len())
            .field("head", &self.head)
            .field("tail", &self.tail)
            .finish()
    }
}
