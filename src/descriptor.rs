// src/descriptor.rs
//! Self-describing raw images carry their geometry in the last 128 bytes as
//! one ASCII line of `<number><letter>` pairs, e.g. `5m512z10p2s40t1d2i\n`:
//!
//! | letter | field                                   |
//! |--------|-----------------------------------------|
//! | `m`    | media size in inches (3, 5 or 8)        |
//! | `z`    | sector length in bytes                  |
//! | `p`    | sectors per track                       |
//! | `s`    | sides (heads)                           |
//! | `t`    | tracks (cylinders)                      |
//! | `d`    | density: 0 single, 1 double, 2 extended |
//! | `i`    | side mode (see [`crate::side`])         |
//! | `l`    | logical skew, ignored                   |
//! | `h`    | hard sectors, ignored                   |
//!
//! The line ends at a newline, a NUL or the end of the 128 bytes.

use crate::error::{ConvertError, Result};
use crate::geometry::{Density, GeometryBuilder, MediaSize};
use log::debug;
use std::io::{Read, Seek, SeekFrom};

pub const DESCRIPTOR_LEN: u64 = 128;

/// Parse a descriptor block into the geometry fields it sets.
pub fn parse(block: &[u8]) -> Result<GeometryBuilder> {
    let mut geometry = GeometryBuilder::default();
    let mut value: Option<u32> = None;

    for &byte in block.iter().take(DESCRIPTOR_LEN as usize) {
        match byte {
            b'\n' | b'\r' | 0 => break,
            b'0'..=b'9' => {
                let digit = (byte - b'0') as u32;
                let next = value.unwrap_or(0).checked_mul(10).and_then(|v| v.checked_add(digit));
                value = Some(next.ok_or_else(|| ConvertError::Descriptor("number out of range".to_string()))?);
            }
            letter => {
                let number = value.take().ok_or_else(|| {
                    ConvertError::Descriptor(format!("'{}' has no value", char::from(letter).escape_default()))
                })?;
                match letter {
                    b'm' => geometry.media = Some(MediaSize::from_inches(number)?),
                    b'z' => geometry.sector_length = Some(number),
                    b'p' => geometry.sectors = Some(number),
                    b's' => geometry.heads = Some(number),
                    b't' => geometry.cylinders = Some(number),
                    b'd' => geometry.density = Some(Density::from_id(number)?),
                    b'i' => geometry.side_policy = Some(number),
                    b'l' | b'h' => {}
                    other => {
                        return Err(ConvertError::Descriptor(format!(
                            "unknown field '{}'",
                            char::from(other).escape_default()
                        )))
                    }
                }
            }
        }
    }

    if let Some(number) = value {
        return Err(ConvertError::Descriptor(format!("trailing number {} without a field", number)));
    }
    Ok(geometry)
}

/// Read and parse the descriptor at the end of `source`.
pub fn probe<R: Read + Seek>(source: &mut R) -> Result<GeometryBuilder> {
    let len = source.seek(SeekFrom::End(0))?;
    if len < DESCRIPTOR_LEN {
        return Err(ConvertError::Descriptor(format!(
            "file is {} bytes, too short to hold a descriptor",
            len
        )));
    }
    source.seek(SeekFrom::Start(len - DESCRIPTOR_LEN))?;
    let mut block = [0u8; DESCRIPTOR_LEN as usize];
    source.read_exact(&mut block)?;
    let geometry = parse(&block)?;
    debug!("probed descriptor: {:?}", geometry);
    Ok(geometry)
}
