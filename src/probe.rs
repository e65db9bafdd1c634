//! Slot arithmetic shared by insert, lookup and rehash.
//!
//! All sizes handled here are powers of two, so reducing a digest to a slot
//! index is a mask against `size - 1` and wrapping the probe is the same mask.

/// Map a 64-bit digest onto `[0, size)`. `size` must be a power of two.
#[inline]
pub(crate) fn home_slot(hash: u64, size: usize) -> usize {
    debug_assert!(size.is_power_of_two());
    (hash as usize) & (size - 1)
}

/// Occupancy at which the next `put` grows the table: `size * 3 / 4`,
/// written so it cannot overflow for any `usize`.
#[inline]
pub(crate) fn max_load(size: usize) -> usize {
    (size / 4) * 3 + (size % 4) * 3 / 4
}

/// Linear probe sequence: `home, home + 1, ...` wrapping at `size`.
///
/// Yields every slot exactly once, then stops. Running out means the caller
/// walked a full cycle without resolving.
#[derive(Debug, Clone)]
pub(crate) struct Probe {
    pos: usize,
    mask: usize,
    remaining: usize,
}

impl Probe {
    #[inline]
    pub(crate) fn new(hash: u64, size: usize) -> Self {
        Self {
            pos: home_slot(hash, size),
            mask: size - 1,
            remaining: size,
        }
    }
}

impl Iterator for Probe {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let i = self.pos;
        self.pos = (self.pos + 1) & self.mask;
        self.remaining -= 1;
        Some(i)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Probe {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn home_slot_masks_high_bits() {
        assert_eq!(home_slot(0, 8), 0);
        assert_eq!(home_slot(7, 8), 7);
        assert_eq!(home_slot(8, 8), 0);
        assert_eq!(home_slot(u64::MAX, 64), 63);
        assert_eq!(home_slot(u64::MAX, 1), 0);
    }

    #[test]
    fn max_load_is_three_quarters() {
        assert_eq!(max_load(1), 0);
        assert_eq!(max_load(2), 1);
        assert_eq!(max_load(4), 3);
        assert_eq!(max_load(16), 12);
        assert_eq!(max_load(64), 48);
        assert_eq!(max_load(128), 96);
        let top = 1usize << (usize::BITS - 1);
        assert_eq!(max_load(top), top / 4 * 3);
    }

    #[test]
    fn probe_starts_at_home_and_wraps() {
        let seq: Vec<usize> = Probe::new(6, 8).collect();
        assert_eq!(seq, vec![6, 7, 0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn probe_visits_each_slot_once() {
        for size in [1usize, 2, 4, 32, 256] {
            for hash in [0u64, 1, 13, 0xdead_beef, u64::MAX] {
                let p = Probe::new(hash, size);
                assert_eq!(p.len(), size);
                let seen: BTreeSet<usize> = p.collect();
                assert_eq!(seen.len(), size);
                assert_eq!(seen.iter().next_back().copied(), Some(size - 1));
            }
        }
    }
}
