// src/core.rs
use crate::formats::imd::ImdImage;
use crate::track::SectorStatus;

/// Printable preview of a sector: the first 32 bytes, non-ASCII as '.'.
fn preview(data: &[u8]) -> String {
    data.iter()
        .take(32)
        .map(|&b| if (32..=126).contains(&b) { b as char } else { '.' })
        .collect()
}

/// Human-readable listing of a container: header comment, a line per track
/// and, with `ascii`, a line per sector.
pub fn display(image: &ImdImage, ascii: bool) -> String {
    let mut output = Vec::new();
    output.push(format!("Header: {}", image.comment.trim_end()));
    let (cylinders, heads) = image.extent();
    output.push(format!("{} tracks, {} cylinders, {} heads", image.tracks.len(), cylinders, heads));

    for track in &image.tracks {
        output.push(format!(
            "Cyl {}, Head {}: {} sectors, size {} bytes, mode {}, sectors {:?}",
            track.cylinder,
            track.head,
            track.sector_count(),
            track.sector_size.bytes(),
            track.mode,
            track.sector_numbers()
        ));
        if !ascii {
            continue;
        }
        for sector in &track.sectors {
            let mut flags = String::new();
            if sector.deleted {
                flags.push_str(" deleted");
            }
            match sector.status {
                SectorStatus::Good => {}
                SectorStatus::DataError => flags.push_str(" data-error"),
                SectorStatus::Unavailable => flags.push_str(" unavailable"),
            }
            output.push(format!(
                "  C{} H{} S{}{}: {}",
                sector.cylinder,
                sector.head,
                sector.sector,
                flags,
                preview(&sector.data)
            ));
        }
    }
    output.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SectorSize;
    use crate::mode::DataMode;
    use crate::track::{SectorRecord, TrackRecord};

    fn image() -> ImdImage {
        let mut data = b"CP/M 2.2 boot".to_vec();
        data.resize(128, 0);
        ImdImage {
            comment: "IMD 1.18: 01/01/2000 00:00:00\r\n".to_string(),
            tracks: vec![TrackRecord {
                mode: DataMode::Mfm300,
                cylinder: 0,
                head: 1,
                sector_size: SectorSize::B128,
                sectors: vec![SectorRecord {
                    cylinder: 0,
                    head: 0,
                    sector: 10,
                    deleted: true,
                    status: SectorStatus::Good,
                    data,
                }],
            }],
        }
    }

    #[test]
    fn summary_lists_tracks() {
        let text = display(&image(), false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Header: IMD 1.18: 01/01/2000 00:00:00");
        assert_eq!(lines[1], "1 tracks, 1 cylinders, 2 heads");
        assert_eq!(lines[2], "Cyl 0, Head 1: 1 sectors, size 128 bytes, mode MFM-300k, sectors [10]");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn ascii_adds_sector_previews() {
        let text = display(&image(), true);
        assert!(text.ends_with("  C0 H0 S10 deleted: CP/M 2.2 boot..................."));
    }
}
