// src/materialize.rs
//! Turns a raw sector dump into tracks, one (cylinder, head) at a time.

use crate::capacity::{self, CapacityCheck};
use crate::descriptor::DESCRIPTOR_LEN;
use crate::error::{ConvertError, Result};
use crate::geometry::Geometry;
use crate::mode::DataMode;
use crate::skew::SkewTable;
use crate::track::{SectorRecord, SectorStatus, TrackRecord};
use log::{debug, info, warn};
use std::io::{ErrorKind, Read, Seek, SeekFrom};

/// Fill byte for sector data missing from a short source in `force` mode.
pub const FILL_BYTE: u8 = 0xE5;

/// Receives finished tracks in cylinder-major, head-minor order.
pub trait TrackSink {
    fn write_track(&mut self, track: &TrackRecord) -> Result<()>;
}

/// Sink that keeps every track, for inspection.
impl TrackSink for Vec<TrackRecord> {
    fn write_track(&mut self, track: &TrackRecord) -> Result<()> {
        self.push(track.clone());
        Ok(())
    }
}

/// Sink that drops every track; used for a dry run without an output file.
#[derive(Debug, Default)]
pub struct NullSink;

impl TrackSink for NullSink {
    fn write_track(&mut self, _track: &TrackRecord) -> Result<()> {
        Ok(())
    }
}

pub struct Materializer<'a> {
    geometry: &'a Geometry,
    mode: DataMode,
    /// Interleave for head 0 and for the other head; `None` is identity.
    skews: [Option<SkewTable>; 2],
    pad_short_reads: bool,
    /// End of the sector data in the source; bytes past it are never read.
    data_len: Option<u64>,
}

impl<'a> Materializer<'a> {
    pub fn new(geometry: &'a Geometry) -> Result<Self> {
        let mode = DataMode::select(geometry)?;
        let sectors = geometry.sectors as usize;
        let skews = [
            SkewTable::build(geometry.skews[0], sectors),
            SkewTable::build(geometry.skews[1], sectors),
        ];
        debug!("geometry: {}, mode {}", geometry, mode);
        Ok(Materializer { geometry, mode, skews, pad_short_reads: false, data_len: None })
    }

    /// Pad a short source with [`FILL_BYTE`] instead of failing.
    pub fn pad_short_reads(mut self, pad: bool) -> Self {
        self.pad_short_reads = pad;
        self
    }

    /// Stop reading sector data at `len` bytes into the source.
    pub fn limit_to(mut self, len: u64) -> Self {
        self.data_len = Some(len);
        self
    }

    pub fn skew_table(&self, head: u8) -> Option<&SkewTable> {
        self.skews[if head == 0 { 0 } else { 1 }].as_ref()
    }

    /// Read one track from `source` and lay out its sectors.
    pub fn read_track<R: Read + Seek>(&self, source: &mut R, cylinder: u8, head: u8) -> Result<TrackRecord> {
        let geometry = self.geometry;
        let placement = geometry.side_policy.place(geometry, cylinder, head);
        if let Some(offset) = placement.seek {
            source.seek(SeekFrom::Start(offset))?;
        }

        let length = geometry.sector_size.bytes();
        let wanted = geometry.track_bytes();
        let mut buf = vec![0u8; wanted];
        let got = match self.data_len {
            Some(end) => {
                let remaining = end.saturating_sub(source.stream_position()?);
                read_full(&mut source.by_ref().take(remaining), &mut buf)?
            }
            None => read_full(source, &mut buf)?,
        };
        if got < wanted {
            if !self.pad_short_reads {
                return Err(ConvertError::ShortRead { cylinder: cylinder as u32, head: head as u32, wanted, got });
            }
            warn!("cylinder {} head {}: {} of {} bytes present, padding", cylinder, head, got, wanted);
            buf[got..].fill(FILL_BYTE);
        }

        let count = geometry.sectors as usize;
        let table = self.skew_table(head);
        let mut slots: Vec<Option<SectorRecord>> = vec![None; count];
        for (position, data) in buf.chunks_exact(length).enumerate() {
            let slot = match table {
                Some(table) => table.slot(position),
                None => Some(position),
            };
            let entry = slot.and_then(|slot| slots.get_mut(slot)).ok_or_else(|| {
                ConvertError::InvalidGeometry(format!("no slot for sector position {}", position))
            })?;
            *entry = Some(SectorRecord {
                cylinder,
                head: placement.logical_head,
                sector: placement.first_sector + position as u8,
                deleted: false,
                status: SectorStatus::Good,
                data: data.to_vec(),
            });
        }
        let sectors = slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ConvertError::InvalidGeometry("skew table left a slot empty".to_string()))?;

        Ok(TrackRecord {
            mode: self.mode,
            cylinder,
            head,
            sector_size: geometry.sector_size,
            sectors,
        })
    }

    /// Materialize every track in order and hand each to `sink` as soon as it
    /// is complete. Returns the number of tracks written.
    pub fn run<R: Read + Seek, S: TrackSink>(&self, source: &mut R, sink: &mut S) -> Result<usize> {
        let mut written = 0;
        for cylinder in 0..self.geometry.cylinders {
            for head in 0..self.geometry.heads {
                let track = self.read_track(source, cylinder, head)?;
                debug!(
                    "cylinder {} head {}: {} sectors {:?}",
                    cylinder,
                    head,
                    track.sector_count(),
                    track.sector_numbers()
                );
                sink.write_track(&track)?;
                written += 1;
            }
        }
        Ok(written)
    }
}

/// Check the source against the geometry, then stream every track into `sink`.
pub fn convert<R: Read + Seek, S: TrackSink>(
    geometry: &Geometry,
    source: &mut R,
    has_descriptor: bool,
    check: CapacityCheck,
    sink: &mut S,
) -> Result<usize> {
    let mut materializer = Materializer::new(geometry)?.pad_short_reads(check.force);
    let source_len = source.seek(SeekFrom::End(0))?;
    capacity::validate(geometry, source_len, has_descriptor, check)?;
    if has_descriptor {
        materializer = materializer.limit_to(source_len.saturating_sub(DESCRIPTOR_LEN));
    }
    source.seek(SeekFrom::Start(0))?;
    let tracks = materializer.run(source, sink)?;
    info!("{} tracks converted", tracks);
    Ok(tracks)
}

/// Like `read_exact`, but reports how much was read instead of failing at EOF.
fn read_full<R: Read>(source: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
