// src/error.rs
use thiserror::Error;

/// Everything that can abort a conversion. There are no warnings: any of
/// these stops the run and the partially written container is invalid.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("geometry descriptor: {0}")]
    Descriptor(String),
    #[error("unsupported sector length {0} (expected 128, 256, 512 or 1024)")]
    UnsupportedSectorLength(u32),
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("unknown side mode {0} (expected 0, 1 or 2)")]
    UnknownSidePolicy(u32),
    #[error("unsupported data rate {rate} kbps for {encoding}")]
    UnsupportedDataRate { rate: u32, encoding: &'static str },
    #[error("image file too large: {actual} bytes, geometry holds {declared}")]
    ImageTooLarge { actual: u64, declared: u64 },
    #[error("image file too small: {actual} bytes, geometry needs {declared}")]
    ImageTooSmall { actual: u64, declared: u64 },
    #[error("short read at cylinder {cylinder} head {head}: wanted {wanted} bytes, got {got}")]
    ShortRead { cylinder: u32, head: u32, wanted: usize, got: usize },
    #[error("invalid .imd container: {0}")]
    Container(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
