//! Core identifier types.
//!
//! These newtypes wrap the raw integers used throughout the cache,
//! preventing accidental mixing of backing-store offsets and slot indices.

use std::fmt;

/// Logical key identifying the backing-store region a slot holds.
///
/// A tag is a byte offset into the backing device: the block offset in
/// direct addressing, or the band-base offset in band addressing. Tags are
/// unique per resident slot.
///
/// # Example
///
/// ```rust
/// use bandcache::Tag;
///
/// let tag = Tag::new(4096);
/// assert_eq!(tag.offset(), 4096);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Tag(u64);

impl Tag {
    /// Creates a new `Tag` from a backing-store byte offset.
    #[inline]
    #[must_use]
    pub const fn new(offset: u64) -> Self {
        Self(offset)
    }

    /// Returns the backing-store byte offset this tag names.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self.0)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Tag {
    #[inline]
    fn from(offset: u64) -> Self {
        Self::new(offset)
    }
}

impl From<Tag> for u64 {
    #[inline]
    fn from(tag: Tag) -> Self {
        tag.0
    }
}

/// Slot identifier, an index into the pool's descriptor arena.
///
/// Slot ids are assigned once at pool construction and never change for the
/// lifetime of the pool. Slot `i` owns bytes
/// `[i * unit_size, (i + 1) * unit_size)` of the cache device.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct SlotId(usize);

impl SlotId {
    /// Creates a new slot id.
    #[inline]
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw arena index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotId({})", self.0)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for SlotId {
    #[inline]
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl From<SlotId> for usize {
    #[inline]
    fn from(id: SlotId) -> Self {
        id.0
    }
}
