// src/disk_formats/floppy_5_25inch_ibm.rs

use super::DiskFormat; // Import from parent module
use crate::geometry::{Density, MediaSize};

/// 360K double density, read in a high-density drive (MFM, 300kbps).
pub const IBM_360K: DiskFormat = DiskFormat {
    name: "ibm360k",
    description: "360K 5.25\" DD",
    media: MediaSize::Mini,
    cylinders: 40,
    heads: 2,
    sectors_per_track: 9,
    sector_size: 512,
    density: Density::Double,
    data_rate: None,
    side_policy: 1,
    first_sector: None,
};

/// 1.2M high density (MFM, 500kbps).
pub const IBM_1_2M: DiskFormat = DiskFormat {
    name: "ibm1200k",
    description: "1.2M 5.25\" HD",
    media: MediaSize::Mini,
    cylinders: 80,
    heads: 2,
    sectors_per_track: 15,
    sector_size: 512,
    density: Density::Extended,
    data_rate: None,
    side_policy: 1,
    first_sector: None,
};
