// src/formats/imd.rs
//! ImageDisk (.imd) container: an ASCII header line and comment closed by
//! 0x1A, then one record per track.

use crate::error::{ConvertError, Result};
use crate::geometry::SectorSize;
use crate::materialize::TrackSink;
use crate::mode::DataMode;
use crate::track::{SectorRecord, SectorStatus, TrackRecord};
use byteorder::{ReadBytesExt, WriteBytesExt};
use chrono::{Local, NaiveDateTime};
use log::trace;
use std::io::{Cursor, Read, Write};

pub const SIGNATURE: &str = "IMD 1.18";
pub const COMMENT_END: u8 = 0x1A;
pub const CYL_MAP_FLAG: u8 = 0x80;
pub const HEAD_MAP_FLAG: u8 = 0x40;
pub const HEAD_MASK: u8 = 0x0F;

/// Sector data record types.
mod record {
    pub const UNAVAILABLE: u8 = 0;
    pub const NORMAL: u8 = 1;
    pub const COMPRESSED: u8 = 2;
    pub const DELETED: u8 = 3;
    pub const COMPRESSED_DELETED: u8 = 4;
    pub const ERROR: u8 = 5;
    pub const COMPRESSED_ERROR: u8 = 6;
    pub const DELETED_ERROR: u8 = 7;
    pub const COMPRESSED_DELETED_ERROR: u8 = 8;
}

/// First line of the comment block, e.g. `IMD 1.18: 17/10/2026 09:30:00`.
pub fn signature(when: NaiveDateTime) -> String {
    format!("{}: {}\r\n", SIGNATURE, when.format("%d/%m/%Y %H:%M:%S"))
}

/// Comment for a new container: signature line, then the title, then any
/// free text. 0x1A would end the comment early and is dropped.
pub fn disk_comment(title: Option<&str>, text: Option<&str>) -> String {
    let mut comment = signature(Local::now().naive_local());
    for part in [title, text].into_iter().flatten() {
        comment.extend(part.chars().filter(|&c| c != COMMENT_END as char));
    }
    comment
}

/// Streams tracks into an .imd container.
pub struct ImdWriter<W: Write> {
    out: W,
}

impl<W: Write> ImdWriter<W> {
    /// Write the header and comment; tracks follow through [`TrackSink`].
    pub fn new(mut out: W, comment: &str) -> Result<Self> {
        out.write_all(comment.as_bytes())?;
        out.write_u8(COMMENT_END)?;
        Ok(ImdWriter { out })
    }

    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

fn record_type(sector: &SectorRecord, compressed: bool) -> u8 {
    let error = sector.status == SectorStatus::DataError;
    match (compressed, sector.deleted, error) {
        (false, false, false) => record::NORMAL,
        (true, false, false) => record::COMPRESSED,
        (false, true, false) => record::DELETED,
        (true, true, false) => record::COMPRESSED_DELETED,
        (false, false, true) => record::ERROR,
        (true, false, true) => record::COMPRESSED_ERROR,
        (false, true, true) => record::DELETED_ERROR,
        (true, true, true) => record::COMPRESSED_DELETED_ERROR,
    }
}

impl<W: Write> TrackSink for ImdWriter<W> {
    fn write_track(&mut self, track: &TrackRecord) -> Result<()> {
        let count = u8::try_from(track.sector_count())
            .map_err(|_| ConvertError::Container(format!("{} sectors in one track", track.sector_count())))?;
        let cylinder_map = track.has_cylinder_map();
        let head_map = track.has_head_map();
        let mut head = track.head & HEAD_MASK;
        if cylinder_map {
            head |= CYL_MAP_FLAG;
        }
        if head_map {
            head |= HEAD_MAP_FLAG;
        }

        let out = &mut self.out;
        out.write_u8(track.mode.code())?;
        out.write_u8(track.cylinder)?;
        out.write_u8(head)?;
        out.write_u8(count)?;
        out.write_u8(track.sector_size.code())?;
        out.write_all(&track.sector_numbers())?;
        if cylinder_map {
            let map: Vec<u8> = track.sectors.iter().map(|s| s.cylinder).collect();
            out.write_all(&map)?;
        }
        if head_map {
            let map: Vec<u8> = track.sectors.iter().map(|s| s.head).collect();
            out.write_all(&map)?;
        }

        for sector in &track.sectors {
            if sector.status == SectorStatus::Unavailable {
                out.write_u8(record::UNAVAILABLE)?;
                continue;
            }
            match sector.uniform_byte() {
                Some(fill) => {
                    trace!("compressing cyl {} head {} sec {}", track.cylinder, track.head, sector.sector);
                    out.write_u8(record_type(sector, true))?;
                    out.write_u8(fill)?;
                }
                None => {
                    out.write_u8(record_type(sector, false))?;
                    out.write_all(&sector.data)?;
                }
            }
        }
        // A run cut short still leaves every completed track on disk.
        out.flush()?;
        Ok(())
    }
}

/// A container read back into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImdImage {
    pub comment: String,
    pub tracks: Vec<TrackRecord>,
}

fn bad(what: String) -> ConvertError {
    ConvertError::Container(what)
}

fn read_map(cursor: &mut Cursor<&[u8]>, len: usize) -> Result<Vec<u8>> {
    let mut map = vec![0u8; len];
    cursor.read_exact(&mut map).map_err(|_| bad("truncated sector map".to_string()))?;
    Ok(map)
}

impl ImdImage {
    pub fn parse(data: &[u8]) -> Result<ImdImage> {
        if !data.starts_with(SIGNATURE[..3].as_bytes()) {
            return Err(bad("missing IMD signature".to_string()));
        }
        let header_end = data
            .iter()
            .position(|&b| b == COMMENT_END)
            .ok_or_else(|| bad("no comment terminator (0x1A) found".to_string()))?;
        let comment = String::from_utf8_lossy(&data[..header_end]).into_owned();

        let body = &data[header_end + 1..];
        let mut cursor = Cursor::new(body);
        let mut tracks = Vec::new();
        while (cursor.position() as usize) < body.len() {
            tracks.push(Self::parse_track(&mut cursor)?);
        }
        Ok(ImdImage { comment, tracks })
    }

    fn parse_track(cursor: &mut Cursor<&[u8]>) -> Result<TrackRecord> {
        let truncated = |_: std::io::Error| bad("truncated track header".to_string());
        let mode_code = cursor.read_u8().map_err(truncated)?;
        let cylinder = cursor.read_u8().map_err(truncated)?;
        let head_flags = cursor.read_u8().map_err(truncated)?;
        let count = cursor.read_u8().map_err(truncated)? as usize;
        let size_code = cursor.read_u8().map_err(truncated)?;

        let mode = DataMode::from_code(mode_code).ok_or_else(|| bad(format!("unknown mode {}", mode_code)))?;
        let sector_size = SectorSize::from_code(size_code)
            .ok_or_else(|| bad(format!("unsupported sector size code {}", size_code)))?;
        let head = head_flags & HEAD_MASK;

        let numbers = read_map(cursor, count)?;
        let cylinders = if head_flags & CYL_MAP_FLAG != 0 { read_map(cursor, count)? } else { vec![cylinder; count] };
        let heads = if head_flags & HEAD_MAP_FLAG != 0 { read_map(cursor, count)? } else { vec![head; count] };

        let length = sector_size.bytes();
        let mut sectors = Vec::with_capacity(count);
        for i in 0..count {
            let kind = cursor.read_u8().map_err(|_| bad("truncated sector data".to_string()))?;
            let (data, status, deleted) = match kind {
                record::UNAVAILABLE => (Vec::new(), SectorStatus::Unavailable, false),
                1..=8 => {
                    let compressed = kind % 2 == 0;
                    let deleted = matches!(
                        kind,
                        record::DELETED | record::COMPRESSED_DELETED | record::DELETED_ERROR | record::COMPRESSED_DELETED_ERROR
                    );
                    let status = if kind >= record::ERROR { SectorStatus::DataError } else { SectorStatus::Good };
                    let data = if compressed {
                        let fill = cursor.read_u8().map_err(|_| bad("truncated sector data".to_string()))?;
                        vec![fill; length]
                    } else {
                        read_map(cursor, length)?
                    };
                    (data, status, deleted)
                }
                other => return Err(bad(format!("unsupported sector type {}", other))),
            };
            sectors.push(SectorRecord {
                cylinder: cylinders[i],
                head: heads[i],
                sector: numbers[i],
                deleted,
                status,
                data,
            });
        }

        Ok(TrackRecord { mode, cylinder, head, sector_size, sectors })
    }

    /// Highest cylinder and head present, as counts.
    pub fn extent(&self) -> (usize, usize) {
        self.tracks.iter().fold((0, 0), |(cyls, heads), t| {
            (cyls.max(t.cylinder as usize + 1), heads.max(t.head as usize + 1))
        })
    }
}
