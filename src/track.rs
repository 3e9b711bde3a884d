// src/track.rs
use crate::geometry::SectorSize;
use crate::mode::DataMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectorStatus {
    #[default]
    Good,
    /// Read with a data error on the original media.
    DataError,
    /// No data could be read at all.
    Unavailable,
}

/// One sector as addressed by the controller, with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorRecord {
    pub cylinder: u8,
    pub head: u8,
    pub sector: u8,
    pub deleted: bool,
    pub status: SectorStatus,
    /// Exactly one sector length, or empty when `Unavailable`.
    pub data: Vec<u8>,
}

impl SectorRecord {
    /// The fill byte when every byte of the payload is the same.
    pub fn uniform_byte(&self) -> Option<u8> {
        let (&first, rest) = self.data.split_first()?;
        rest.iter().all(|&b| b == first).then_some(first)
    }
}

/// One physical track. Sectors are listed in physical slot order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    pub mode: DataMode,
    pub cylinder: u8,
    pub head: u8,
    pub sector_size: SectorSize,
    pub sectors: Vec<SectorRecord>,
}

impl TrackRecord {
    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    pub fn sector_numbers(&self) -> Vec<u8> {
        self.sectors.iter().map(|s| s.sector).collect()
    }

    pub fn has_cylinder_map(&self) -> bool {
        self.sectors.iter().any(|s| s.cylinder != self.cylinder)
    }

    pub fn has_head_map(&self) -> bool {
        self.sectors.iter().any(|s| s.head != self.head)
    }
}
