// src/disk_formats/mod.rs

pub mod floppy_3_5inch_ibm;
pub mod floppy_5_25inch_cpm;
pub mod floppy_5_25inch_ibm;
pub mod floppy_8inch_ibm;

use crate::geometry::{Density, GeometryBuilder, MediaSize};

pub use floppy_3_5inch_ibm::{IBM_1_44M, IBM_720K};
pub use floppy_5_25inch_cpm::{KAYPRO_4, KAYPRO_II};
pub use floppy_5_25inch_ibm::{IBM_1_2M, IBM_360K};
pub use floppy_8inch_ibm::IBM_3740;

/// A well-known disk layout, selectable by name with `--preset`.
#[derive(Debug, Clone, Copy)]
pub struct DiskFormat {
    pub name: &'static str,
    pub description: &'static str,
    pub media: MediaSize,
    pub cylinders: u8,
    pub heads: u8,
    pub sectors_per_track: u8,
    pub sector_size: u16,
    pub density: Density,
    /// Data rate when it differs from the media default.
    pub data_rate: Option<u32>,
    pub side_policy: u32,
    /// Explicit first sector number; `None` keeps the side-mode default.
    pub first_sector: Option<u8>,
}

impl DiskFormat {
    /// Calculates the total size in bytes for this disk format.
    pub fn total_size(&self) -> usize {
        self.cylinders as usize * self.heads as usize * self.sectors_per_track as usize * self.sector_size as usize
    }

    /// The preset as a geometry layer; later layers override it field by field.
    pub fn builder(&self) -> GeometryBuilder {
        GeometryBuilder {
            media: Some(self.media),
            sector_length: Some(self.sector_size as u32),
            sectors: Some(self.sectors_per_track as u32),
            heads: Some(self.heads as u32),
            cylinders: Some(self.cylinders as u32),
            density: Some(self.density),
            data_rate: self.data_rate,
            side_policy: Some(self.side_policy),
            first_sector: self.first_sector.map(u32::from),
            ..Default::default()
        }
    }
}

pub const PRESETS: [&DiskFormat; 7] = [
    &IBM_3740, &IBM_360K, &IBM_1_2M, &IBM_720K, &IBM_1_44M, &KAYPRO_II, &KAYPRO_4,
];

pub fn find(name: &str) -> Option<&'static DiskFormat> {
    PRESETS.iter().copied().find(|f| f.name.eq_ignore_ascii_case(name))
}
