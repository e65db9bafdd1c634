//! probe-map: an open-addressing hash table from string keys to string
//! values, with its own hashing, collision resolution and growth.
//!
//! Internal Design:
//!
//! Summary
//! - `ProbeMap<S>` keeps a power-of-two slot array of optional entry
//!   handles and an arena (`slotmap::SlotMap`) owning the entries.
//! - Layers:
//!   - `probe`: home-slot masking, the linear probe sequence, and the
//!     3/4 max-load arithmetic.
//!   - `table`: `put`/`get` over the probe sequence plus growth.
//!   - `error`: `TableError`, the recoverable input errors.
//!
//! Hashing and seeding
//! - The `S: BuildHasher` is the seed. `ProbeMap::new`/`with_capacity` use a
//!   fresh `RandomState` per table, so slot assignment is unpredictable
//!   across instances. The same hasher is kept across growth.
//! - Each entry stores the `u64` digest computed at insertion; growth places
//!   entries by stored digest and lookups compare digests before keys.
//!
//! Growth
//! - `put` checks `len() >= max_load()` before probing and doubles the slot
//!   array if so. `max_load` is `capacity * 3 / 4` and is recomputed on
//!   every growth. This can grow one insert earlier than a strict 0.75
//!   load factor and also fires on an update at the threshold.
//! - Growth runs inline inside `put`; that call is O(capacity), others are
//!   O(1) expected.
//!
//! Errors
//! - Capacities that are zero or not a power of two fail with
//!   `TableError::InvalidSize`; empty keys fail with `TableError::InvalidKey`.
//!   Neither mutates the map.
//! - A full probe cycle in `put` can only follow broken growth bookkeeping
//!   and panics.
//!
//! Notes and non-goals
//! - No removal, so no tombstones: an empty slot always ends a lookup.
//! - No shrinking. Keys and values are `str`/`String` only.
//! - No internal synchronization. Mutation requires `&mut`; sharing across
//!   threads is the caller's business (wrap in a lock).

pub mod error;
mod probe;
pub mod table;
mod table_proptest;

// Public surface
pub use error::{Result, TableError};
pub use table::{Iter, ProbeMap, DEFAULT_CAPACITY};
