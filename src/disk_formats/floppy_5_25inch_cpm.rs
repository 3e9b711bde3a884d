// src/disk_formats/floppy_5_25inch_cpm.rs

use super::DiskFormat;
use crate::geometry::{Density, MediaSize};

pub const KAYPRO_II: DiskFormat = DiskFormat {
    name: "kaypro2",
    description: "Kaypro II 191K 5.25\" SSDD",
    media: MediaSize::Mini,
    cylinders: 40,
    heads: 1,
    sectors_per_track: 10,
    sector_size: 512,
    density: Density::Double,
    data_rate: None,
    side_policy: 1,
    first_sector: Some(0),
};

/// Both sides report head 0; side 1 carries sectors 10-19.
pub const KAYPRO_4: DiskFormat = DiskFormat {
    name: "kaypro4",
    description: "Kaypro 4 390K 5.25\" DSDD",
    media: MediaSize::Mini,
    cylinders: 40,
    heads: 2,
    sectors_per_track: 10,
    sector_size: 512,
    density: Density::Double,
    data_rate: None,
    side_policy: 2,
    first_sector: None,
};
