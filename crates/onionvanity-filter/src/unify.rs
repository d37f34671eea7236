//! Mask unification for the shared-mask layout
//!
//! Binary search without a per-record mask needs every record to share one
//! mask. Filters arrive with different precision, so when masks disagree the
//! less precise side is expanded into one record per assignment of the bits
//! it leaves free. The expanded records accept exactly the keys the original
//! filters accepted; only the record count changes.
//!
//! Example (big-endian 32-bit):
//!
//! ```text
//! shared 0xFFC00000 (10 bits), incoming 0xF8000000 (5 bits)
//! free     = 0xFFC00000 & !0xF8000000 = 0x07C00000
//! ishift   = 22, direct = 0x1F, no shifted runs, combined = 0x1F
//! incoming becomes 32 records: value | (j << 22) for j in 0..=0x1F
//! ```
//!
//! When free bits form several runs, the lowest run is the direct mask and
//! each higher run is moved down next to the previous ones by a relative
//! shift, so a dense counter `0..=combined` enumerates every assignment.
//! With one shifted run a value is placed as
//! `((j & dmask) | ((j << rshift) & smask)) << ishift`.

use crate::packed::PackedInt;

/// Placement plan for the free bits of one expansion
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Expansion<I> {
    /// Position of the lowest free bit
    ishift: u32,
    /// Lowest run of free bits; counter bits land here unshifted
    direct: I,
    /// Higher runs: counter bits and the relative shift moving them into place
    shifted: Vec<(I, u32)>,
    /// Dense counter mask, `combined + 1` is a power of two
    combined: I,
    /// Number of free bits
    width: u32,
}

impl<I: PackedInt> Expansion<I> {
    /// Plan the enumeration of `free`; `None` when there is nothing to expand
    pub(crate) fn plan(free: I) -> Option<Self> {
        if free == I::ZERO {
            return None;
        }

        let ishift = free.trailing_zeros();
        let cross = free >> ishift;
        // x & (x + 1) clears the lowest run of ones
        let smask = cross & cross.wrapping_add(I::ONE);
        let direct = cross ^ smask;

        let mut width = direct.count_ones();
        let mut combined = direct;
        let mut shifted = Vec::new();
        let mut rest = smask;
        while rest != I::ZERO {
            let pos = rest.trailing_zeros();
            let run = rest >> pos;
            let run = run ^ (run & run.wrapping_add(I::ONE));
            let dense = run << width;
            shifted.push((dense, pos - width));
            combined = combined | dense;
            rest = rest ^ (run << pos);
            width += run.count_ones();
        }

        Some(Self {
            ishift,
            direct,
            shifted,
            combined,
            width,
        })
    }

    /// Records produced per expanded value, `None` if it overflows `usize`
    pub(crate) fn count(&self) -> Option<usize> {
        1usize.checked_shl(self.width)
    }

    #[inline]
    fn place(&self, j: I) -> I {
        let mut bits = j & self.direct;
        for &(dense, shift) in &self.shifted {
            bits = bits | ((j & dense) << shift);
        }
        bits << self.ishift
    }

    /// Every value `base` takes once the free bits are fixed
    pub(crate) fn expand(&self, base: I) -> impl Iterator<Item = I> + '_ {
        let combined = self.combined;
        std::iter::successors(Some(I::ZERO), move |&j| {
            (j != combined).then(|| j.wrapping_add(I::ONE))
        })
        .map(move |j| base | self.place(j))
    }
}

/// Packed filter values sharing a single mask
#[derive(Debug, Clone, Default)]
pub struct UnifiedFilters<I> {
    values: Vec<I>,
    mask: I,
    flattened: bool,
}

impl<I: PackedInt> UnifiedFilters<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &[I] {
        &self.values
    }

    /// Mask every value is stored under
    pub fn mask(&self) -> I {
        self.mask
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether any insertion had to expand records
    pub fn is_flattened(&self) -> bool {
        self.flattened
    }

    pub(crate) fn values_mut(&mut self) -> &mut Vec<I> {
        &mut self.values
    }

    /// Insert a filter, expanding records until all of them share one mask.
    ///
    /// Existing records expand over `mask & !shared`, the incoming filter over
    /// `shared & !mask`, and the shared mask becomes their union. For prefix
    /// masks one side is always empty: a more precise shared mask expands only
    /// the incoming filter, a more precise incoming mask re-expands every
    /// existing record.
    ///
    /// Returns how many records were added, or the record count the insertion
    /// would need when that exceeds `limit` (the set is left untouched).
    pub fn insert(&mut self, value: I, mask: I, limit: usize) -> Result<usize, usize> {
        let value = value & mask;

        if self.values.is_empty() {
            self.mask = mask;
            self.values.push(value);
            return Ok(1);
        }
        if mask == self.mask {
            self.values.push(value);
            return Ok(1);
        }

        let existing = Expansion::plan(mask & !self.mask);
        let incoming = Expansion::plan(self.mask & !mask);

        let factor = |plan: &Option<Expansion<I>>| plan.as_ref().map_or(Some(1), Expansion::count);
        let projected = factor(&existing)
            .and_then(|f| f.checked_mul(self.values.len()))
            .and_then(|n| factor(&incoming).and_then(|f| n.checked_add(f)));
        let projected = match projected {
            Some(n) if n <= limit => n,
            other => return Err(other.unwrap_or(usize::MAX)),
        };

        let before = self.values.len();
        if let Some(plan) = existing {
            let mut expanded = Vec::with_capacity(projected);
            for &v in &self.values {
                expanded.extend(plan.expand(v));
            }
            self.values = expanded;
        }
        self.mask = self.mask | mask;
        match incoming {
            Some(plan) => self.values.extend(plan.expand(value)),
            None => self.values.push(value),
        }
        self.flattened = true;

        debug_assert_eq!(self.values.len(), projected);
        Ok(projected - before)
    }
}
