// src/geometry.rs
use crate::error::{ConvertError, Result};
use crate::side::SidePolicy;
use std::fmt;

/// Physical media class. It picks the default data rate of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaSize {
    /// 5.25" (and 3.5") media.
    #[default]
    Mini,
    /// 8" media.
    Standard,
}

impl MediaSize {
    pub fn from_inches(inches: u32) -> Result<Self> {
        match inches {
            3 | 5 => Ok(MediaSize::Mini),
            8 => Ok(MediaSize::Standard),
            other => Err(ConvertError::InvalidGeometry(format!("unknown media size {}\"", other))),
        }
    }
}

/// Recording density. Single is FM, the others are MFM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Density {
    #[default]
    Single,
    Double,
    Extended,
}

impl Density {
    pub fn from_id(id: u32) -> Result<Self> {
        match id {
            0 => Ok(Density::Single),
            1 => Ok(Density::Double),
            2 => Ok(Density::Extended),
            other => Err(ConvertError::InvalidGeometry(format!("unknown density {}", other))),
        }
    }

    pub fn is_mfm(self) -> bool {
        self != Density::Single
    }
}

/// Sector length, stored the way the container encodes it: `128 << code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorSize {
    B128,
    B256,
    B512,
    B1024,
}

impl SectorSize {
    pub fn from_bytes(bytes: u32) -> Result<Self> {
        match bytes {
            128 => Ok(SectorSize::B128),
            256 => Ok(SectorSize::B256),
            512 => Ok(SectorSize::B512),
            1024 => Ok(SectorSize::B1024),
            other => Err(ConvertError::UnsupportedSectorLength(other)),
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(SectorSize::B128),
            1 => Some(SectorSize::B256),
            2 => Some(SectorSize::B512),
            3 => Some(SectorSize::B1024),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            SectorSize::B128 => 0,
            SectorSize::B256 => 1,
            SectorSize::B512 => 2,
            SectorSize::B1024 => 3,
        }
    }

    pub fn bytes(self) -> usize {
        128 << self.code()
    }
}

/// Resolved disk geometry. Built once, then only read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geometry {
    pub media: MediaSize,
    pub sector_size: SectorSize,
    pub sectors: u8,
    pub heads: u8,
    pub cylinders: u8,
    pub density: Density,
    /// Explicit data rate in kbps, overriding the media default.
    pub data_rate: Option<u32>,
    pub side_policy: SidePolicy,
    /// First logical sector number for head 0 and head 1.
    pub first_sectors: [u8; 2],
    /// Interleave factor for head 0 and for the other head.
    pub skews: [i32; 2],
}

impl Geometry {
    /// Bytes declared by the geometry: cylinders × heads × sectors × length.
    pub fn capacity(&self) -> u64 {
        self.cylinders as u64 * self.heads as u64 * self.track_bytes() as u64
    }

    pub fn track_bytes(&self) -> usize {
        self.sectors as usize * self.sector_size.bytes()
    }

    pub fn first_sector(&self, head: u8) -> u8 {
        if head == 0 { self.first_sectors[0] } else { self.first_sectors[1] }
    }

    pub fn skew(&self, head: u8) -> i32 {
        if head == 0 { self.skews[0] } else { self.skews[1] }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cylinders, {} heads, {} sectors/track, {} bytes/sector, {:?} density, side mode {}",
            self.cylinders,
            self.heads,
            self.sectors,
            self.sector_size.bytes(),
            self.density,
            self.side_policy
        )
    }
}

/// Geometry as gathered from presets, a probed descriptor and command-line
/// flags. Every field is optional until [`GeometryBuilder::build`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeometryBuilder {
    pub media: Option<MediaSize>,
    pub sector_length: Option<u32>,
    pub sectors: Option<u32>,
    pub heads: Option<u32>,
    pub cylinders: Option<u32>,
    pub density: Option<Density>,
    pub data_rate: Option<u32>,
    pub side_policy: Option<u32>,
    pub first_sector: Option<u32>,
    pub first_sector_other: Option<u32>,
    pub skew: Option<i32>,
    pub skew_other: Option<i32>,
}

fn required(value: Option<u32>, what: &str) -> Result<u32> {
    value.ok_or_else(|| ConvertError::InvalidGeometry(format!("{} not given", what)))
}

fn count(value: Option<u32>, what: &str) -> Result<u8> {
    let value = required(value, what)?;
    if value == 0 {
        return Err(ConvertError::InvalidGeometry(format!("{} must be positive", what)));
    }
    u8::try_from(value)
        .map_err(|_| ConvertError::InvalidGeometry(format!("{} {} exceeds 255", what, value)))
}

impl GeometryBuilder {
    /// Layer `overrides` on top of `self`; fields set in `overrides` win.
    pub fn merge(self, overrides: GeometryBuilder) -> GeometryBuilder {
        GeometryBuilder {
            media: overrides.media.or(self.media),
            sector_length: overrides.sector_length.or(self.sector_length),
            sectors: overrides.sectors.or(self.sectors),
            heads: overrides.heads.or(self.heads),
            cylinders: overrides.cylinders.or(self.cylinders),
            density: overrides.density.or(self.density),
            data_rate: overrides.data_rate.or(self.data_rate),
            side_policy: overrides.side_policy.or(self.side_policy),
            first_sector: overrides.first_sector.or(self.first_sector),
            first_sector_other: overrides.first_sector_other.or(self.first_sector_other),
            skew: overrides.skew.or(self.skew),
            skew_other: overrides.skew_other.or(self.skew_other),
        }
    }

    pub fn build(&self) -> Result<Geometry> {
        // Sector length is checked first so a bad value fails before anything else.
        let sector_size = SectorSize::from_bytes(required(self.sector_length, "sector length")?)?;
        let cylinders = count(self.cylinders, "cylinder count")?;
        let heads = count(self.heads, "head count")?;
        let sectors = count(self.sectors, "sector count")?;
        if heads > 2 {
            return Err(ConvertError::InvalidGeometry(format!("{} heads, at most 2 supported", heads)));
        }
        let side_policy = match self.side_policy {
            Some(id) => SidePolicy::try_from(id)?,
            None => SidePolicy::default(),
        };

        let (first, other) = match side_policy {
            SidePolicy::Paired => (
                self.first_sector.unwrap_or(0),
                self.first_sector_other.unwrap_or(sectors as u32),
            ),
            _ => {
                let first = self.first_sector.unwrap_or(1);
                (first, self.first_sector_other.unwrap_or(first))
            }
        };
        let mut first_sectors = [0u8; 2];
        for (slot, offset) in first_sectors.iter_mut().zip([first, other]) {
            let last = offset as u64 + sectors as u64 - 1;
            if last > u8::MAX as u64 {
                return Err(ConvertError::InvalidGeometry(format!(
                    "sector numbers {}..={} do not fit in a byte",
                    offset, last
                )));
            }
            *slot = offset as u8;
        }

        let skew = self.skew.unwrap_or(0);
        let skews = [skew, self.skew_other.unwrap_or(skew)];

        Ok(Geometry {
            media: self.media.unwrap_or_default(),
            sector_size,
            sectors,
            heads,
            cylinders,
            density: self.density.unwrap_or_default(),
            data_rate: self.data_rate,
            side_policy,
            first_sectors,
            skews,
        })
    }
}
