// src/disk_formats/floppy_8inch_ibm.rs

use super::DiskFormat;
use crate::geometry::{Density, MediaSize};

/// IBM 3740 single-sided single density, the CP/M distribution format.
pub const IBM_3740: DiskFormat = DiskFormat {
    name: "ibm3740",
    description: "250K 8\" SSSD",
    media: MediaSize::Standard,
    cylinders: 77,
    heads: 1,
    sectors_per_track: 26,
    sector_size: 128,
    density: Density::Single,
    data_rate: None,
    side_policy: 1,
    first_sector: None,
};
