//! Positional byte-range device I/O.
//!
//! Both ends of the cache speak the same narrow contract: absolute-offset
//! reads and writes of byte ranges, expressed by the [`BlockDevice`] trait.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            BlockDevice Trait            │
//! │   (read_at, write_at, len, sync, ...)   │
//! └─────────────────────────────────────────┘
//!              │                   │
//!              ▼                   ▼
//! ┌─────────────────────┐  ┌─────────────────────┐
//! │     FileDevice      │  │      MemDevice      │
//! │    (real files)     │  │  (fixed-size RAM)   │
//! └─────────────────────┘  └─────────────────────┘
//! ```
//!
//! The band-granularity constraint of the backing store is not modeled
//! here; the translation layer above only ever issues whole-band writes to
//! the backing device when running in banded mode.

mod error;
mod file;
mod handle;
mod memory;
mod options;

pub use error::{IoError, IoResult};
pub use file::FileDevice;
pub use handle::BlockDevice;
pub use memory::MemDevice;
pub use options::OpenOptions;
