// src/side.rs
//! How the two sides of a disk are laid out in the raw dump and how they are
//! addressed once they land in the container.

use crate::error::ConvertError;
use crate::geometry::Geometry;
use std::fmt;

/// Side numbering policy, selected by its numeric id (`i` in a geometry
/// descriptor, `--side-mode` on the command line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SidePolicy {
    /// All of side 0, then all of side 1, each as a contiguous region.
    Continuation,
    /// Side 0 and side 1 alternate per cylinder.
    #[default]
    Interlaced,
    /// Interlaced, but both sides are one logical surface: the logical head
    /// is always 0 and side 1 continues the sector numbering.
    Paired,
}

/// Where a track's data lives in the source and how its sectors are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Absolute source offset to seek to before reading, if not sequential.
    pub seek: Option<u64>,
    pub logical_head: u8,
    /// Sector number given to raw position 0; position `s` gets `first_sector + s`.
    pub first_sector: u8,
}

impl SidePolicy {
    pub fn id(self) -> u32 {
        match self {
            SidePolicy::Continuation => 0,
            SidePolicy::Interlaced => 1,
            SidePolicy::Paired => 2,
        }
    }

    pub fn place(self, geometry: &Geometry, cylinder: u8, head: u8) -> Placement {
        let first_sector = geometry.first_sector(head);
        match self {
            SidePolicy::Continuation => {
                let track = head as u64 * geometry.cylinders as u64 + cylinder as u64;
                Placement {
                    seek: Some(track * geometry.track_bytes() as u64),
                    logical_head: head,
                    first_sector,
                }
            }
            SidePolicy::Interlaced => Placement { seek: None, logical_head: head, first_sector },
            SidePolicy::Paired => Placement { seek: None, logical_head: 0, first_sector },
        }
    }
}

impl TryFrom<u32> for SidePolicy {
    type Error = ConvertError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(SidePolicy::Continuation),
            1 => Ok(SidePolicy::Interlaced),
            2 => Ok(SidePolicy::Paired),
            other => Err(ConvertError::UnknownSidePolicy(other)),
        }
    }
}

impl fmt::Display for SidePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SidePolicy::Continuation => "continuation",
            SidePolicy::Interlaced => "interlaced",
            SidePolicy::Paired => "paired",
        };
        write!(f, "{} ({})", name, self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryBuilder;

    fn geometry(policy: u32) -> Geometry {
        GeometryBuilder {
            cylinders: Some(40),
            heads: Some(2),
            sectors: Some(10),
            sector_length: Some(512),
            side_policy: Some(policy),
            ..Default::default()
        }
        .build()
        .unwrap()
    }

    #[test]
    fn continuation_seeks_into_the_second_side_region() {
        let g = geometry(0);
        let placement = SidePolicy::Continuation.place(&g, 5, 1);
        assert_eq!(placement.seek, Some((1 * 40 + 5) * 10 * 512));
        assert_ne!(placement.seek, Some((5 * 2 + 1) * 10 * 512));
        assert_eq!(placement.logical_head, 1);
        assert_eq!(SidePolicy::Continuation.place(&g, 5, 0).seek, Some(5 * 10 * 512));
    }

    #[test]
    fn interlaced_reads_sequentially() {
        let g = geometry(1);
        let placement = SidePolicy::Interlaced.place(&g, 7, 1);
        assert_eq!(placement, Placement { seek: None, logical_head: 1, first_sector: 1 });
    }

    #[test]
    fn paired_reports_head_zero_and_continues_numbering() {
        let g = geometry(2);
        assert_eq!(
            SidePolicy::Paired.place(&g, 3, 0),
            Placement { seek: None, logical_head: 0, first_sector: 0 }
        );
        assert_eq!(
            SidePolicy::Paired.place(&g, 3, 1),
            Placement { seek: None, logical_head: 0, first_sector: 10 }
        );
    }

    #[test]
    fn unknown_ids_are_rejected() {
        assert_eq!(SidePolicy::try_from(1).unwrap(), SidePolicy::Interlaced);
        assert!(matches!(SidePolicy::try_from(3), Err(ConvertError::UnknownSidePolicy(3))));
    }
}
