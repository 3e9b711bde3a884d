// src/mode.rs
use crate::error::{ConvertError, Result};
use crate::geometry::{Density, Geometry, MediaSize};
use std::fmt;

/// Track recording mode, numbered as the ImageDisk mode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMode {
    Fm500 = 0,
    Fm300 = 1,
    Fm250 = 2,
    Mfm500 = 3,
    Mfm300 = 4,
    Mfm250 = 5,
}

impl DataMode {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(DataMode::Fm500),
            1 => Some(DataMode::Fm300),
            2 => Some(DataMode::Fm250),
            3 => Some(DataMode::Mfm500),
            4 => Some(DataMode::Mfm300),
            5 => Some(DataMode::Mfm250),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_mfm(self) -> bool {
        self.code() >= 3
    }

    pub fn rate_kbps(self) -> u32 {
        match self {
            DataMode::Fm500 | DataMode::Mfm500 => 500,
            DataMode::Fm300 | DataMode::Mfm300 => 300,
            DataMode::Fm250 | DataMode::Mfm250 => 250,
        }
    }

    /// Mode for a rate and encoding pair.
    pub fn from_rate(rate: u32, mfm: bool) -> Result<Self> {
        match (rate, mfm) {
            (500, false) => Ok(DataMode::Fm500),
            (300, false) => Ok(DataMode::Fm300),
            (250, false) => Ok(DataMode::Fm250),
            (500, true) => Ok(DataMode::Mfm500),
            (300, true) => Ok(DataMode::Mfm300),
            (250, true) => Ok(DataMode::Mfm250),
            (rate, mfm) => Err(ConvertError::UnsupportedDataRate {
                rate,
                encoding: if mfm { "MFM" } else { "FM" },
            }),
        }
    }

    /// Mode used for every track of `geometry`. An explicit data rate wins;
    /// otherwise 8" media and extended density run at 500 kbps and 5.25"
    /// media at 300 kbps (a double-density disk read in a high-density drive).
    pub fn select(geometry: &Geometry) -> Result<Self> {
        let mfm = geometry.density.is_mfm();
        let rate = match (geometry.data_rate, geometry.media, geometry.density) {
            (Some(rate), _, _) => rate,
            (None, MediaSize::Standard, _) | (None, _, Density::Extended) => 500,
            (None, MediaSize::Mini, _) => 300,
        };
        DataMode::from_rate(rate, mfm)
    }
}

impl fmt::Display for DataMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoding = if self.is_mfm() { "MFM" } else { "FM" };
        write!(f, "{}-{}k", encoding, self.rate_kbps())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryBuilder;

    fn geometry(media: MediaSize, density: Density, rate: Option<u32>) -> Geometry {
        GeometryBuilder {
            media: Some(media),
            density: Some(density),
            data_rate: rate,
            cylinders: Some(77),
            heads: Some(1),
            sectors: Some(26),
            sector_length: Some(128),
            ..Default::default()
        }
        .build()
        .unwrap()
    }

    #[test]
    fn media_and_density_pick_the_mode() {
        let cases = [
            (MediaSize::Standard, Density::Single, DataMode::Fm500),
            (MediaSize::Standard, Density::Double, DataMode::Mfm500),
            (MediaSize::Mini, Density::Single, DataMode::Fm300),
            (MediaSize::Mini, Density::Double, DataMode::Mfm300),
            (MediaSize::Mini, Density::Extended, DataMode::Mfm500),
        ];
        for (media, density, mode) in cases {
            assert_eq!(DataMode::select(&geometry(media, density, None)).unwrap(), mode);
        }
    }

    #[test]
    fn explicit_rate_overrides_media() {
        let g = geometry(MediaSize::Standard, Density::Double, Some(250));
        assert_eq!(DataMode::select(&g).unwrap(), DataMode::Mfm250);
    }

    #[test]
    fn unrepresentable_rate_is_an_error() {
        let g = geometry(MediaSize::Mini, Density::Extended, Some(1000));
        assert!(matches!(
            DataMode::select(&g),
            Err(ConvertError::UnsupportedDataRate { rate: 1000, encoding: "MFM" })
        ));
    }

    #[test]
    fn codes_match_imagedisk() {
        assert_eq!(DataMode::Fm500.code(), 0);
        assert_eq!(DataMode::Mfm250.code(), 5);
        assert_eq!(DataMode::from_code(4), Some(DataMode::Mfm300));
        assert_eq!(DataMode::from_code(6), None);
        assert_eq!(DataMode::Mfm300.to_string(), "MFM-300k");
    }
}
