//! Tag index: maps resident tags to slot ids.
//!
//! The index is consumed through a narrow hash/lookup/insert/delete
//! contract. The caller computes the hash code once per logical request and
//! reuses it for the paired lookup/insert or lookup/delete, so one logical
//! operation always addresses one bucket.

use std::hash::Hasher;

use siphasher::sip::SipHasher13;

use crate::types::{SlotId, Tag};

// Fixed SipHash keys: the index is process-private, so the hash only needs
// to be well distributed, not unpredictable.
const TAG_HASH_KEY0: u64 = 0x7369_6d75_6c61_7465;
const TAG_HASH_KEY1: u64 = 0x6261_6e64_6361_6368;

const MIN_BUCKETS: usize = 16;

/// Keyed, bucket-chained mapping from [`Tag`] to [`SlotId`].
///
/// Bucket count is the next power of two at or above the pool capacity and
/// never changes; chains absorb collisions. The table holds at most one
/// entry per tag.
pub struct TagTable {
    buckets: Vec<Vec<(Tag, SlotId)>>,
    mask: u64,
    len: usize,
}

impl TagTable {
    /// Creates a table sized for `capacity` resident tags.
    pub fn new(capacity: usize) -> Self {
        let nbuckets = capacity.next_power_of_two().max(MIN_BUCKETS);
        Self {
            buckets: (0..nbuckets).map(|_| Vec::new()).collect(),
            mask: (nbuckets - 1) as u64,
            len: 0,
        }
    }

    /// Computes the hash code for `tag`.
    pub fn hash(&self, tag: Tag) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(TAG_HASH_KEY0, TAG_HASH_KEY1);
        hasher.write_u64(tag.offset());
        hasher.finish()
    }

    /// Looks up the slot holding `tag`, if any.
    ///
    /// `code` must be `self.hash(tag)`.
    pub fn lookup(&self, tag: Tag, code: u64) -> Option<SlotId> {
        self.bucket(code)
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|&(_, slot)| slot)
    }

    /// Inserts the mapping `tag -> slot`.
    ///
    /// The tag must not already be present; residency is unique per tag.
    pub fn insert(&mut self, tag: Tag, code: u64, slot: SlotId) {
        debug_assert!(
            self.lookup(tag, code).is_none(),
            "tag {tag} already indexed"
        );
        self.bucket_mut(code).push((tag, slot));
        self.len += 1;
    }

    /// Removes the mapping for `tag`, returning the slot it named.
    pub fn delete(&mut self, tag: Tag, code: u64) -> Option<SlotId> {
        let bucket = self.bucket_mut(code);
        let pos = bucket.iter().position(|(t, _)| *t == tag)?;
        let (_, slot) = bucket.swap_remove(pos);
        self.len -= 1;
        Some(slot)
    }

    /// Returns the number of resident tags.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no tags are resident.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn bucket(&self, code: u64) -> &Vec<(Tag, SlotId)> {
        &self.buckets[(code & self.mask) as usize]
    }

    #[inline]
    fn bucket_mut(&mut self, code: u64) -> &mut Vec<(Tag, SlotId)> {
        &mut self.buckets[(code & self.mask) as usize]
    }
}

impl std::fmt::Debug for TagTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagTable")
            .field("buckets", &self.buckets.len())
            .field("len", &self.len)
            .finish()
    }
}
