// src/skew.rs
//! Sector interleave tables.
//!
//! A table maps the read position of a sector within a raw track to the
//! slot it occupies in the track's sector list. It is built by stepping
//! `|skew|` slots per sector; when that lands on a slot already taken (which
//! happens whenever `|skew|` shares a factor with the sector count) the
//! builder probes forward for a positive skew and backward for a negative
//! one until a free slot turns up.

use log::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkewTable {
    slots: Vec<usize>,
}

impl SkewTable {
    /// Build the table for `skew` over `sectors` sectors.
    ///
    /// Returns `None` when `|skew| <= 1` (no interleave) or the track is empty;
    /// callers treat that as the identity mapping.
    pub fn build(skew: i32, sectors: usize) -> Option<SkewTable> {
        let magnitude = skew.unsigned_abs() as usize;
        if magnitude <= 1 || sectors == 0 {
            return None;
        }

        let step = if skew > 0 { 1 } else { sectors - 1 };
        let mut filled: Vec<Option<usize>> = vec![None; sectors];
        for position in 0..sectors {
            let mut candidate = (position * (magnitude % sectors)) % sectors;
            // At most `position` slots are taken, so this always finds one.
            while filled[candidate].is_some() {
                candidate = (candidate + step) % sectors;
            }
            filled[candidate] = Some(position);
        }

        let slots = filled.into_iter().collect::<Option<Vec<usize>>>()?;
        trace!("skew {} over {} sectors: {:?}", skew, sectors, slots);
        Some(SkewTable { slots })
    }

    /// Destination slot for raw read position `position`.
    pub fn slot(&self, position: usize) -> Option<usize> {
        self.slots.get(position).copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
