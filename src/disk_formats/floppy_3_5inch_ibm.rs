// src/disk_formats/floppy_3_5inch_ibm.rs

use super::DiskFormat; // Import from parent module
use crate::geometry::{Density, MediaSize};

pub const IBM_720K: DiskFormat = DiskFormat {
    name: "ibm720k",
    description: "720K 3.5\" DD",
    media: MediaSize::Mini,
    cylinders: 80,
    heads: 2,
    sectors_per_track: 9,
    sector_size: 512,
    density: Density::Double,
    data_rate: Some(250),
    side_policy: 1,
    first_sector: None,
};

pub const IBM_1_44M: DiskFormat = DiskFormat {
    name: "ibm1440k",
    description: "1.44M 3.5\" HD",
    media: MediaSize::Mini,
    cylinders: 80,
    heads: 2,
    sectors_per_track: 18,
    sector_size: 512,
    density: Density::Extended,
    data_rate: Some(500),
    side_policy: 1,
    first_sector: None,
};
