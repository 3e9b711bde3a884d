// src/tests.rs
#[cfg(test)]
mod tests {
    use crate::capacity::CapacityCheck;
    use crate::descriptor::{self, DESCRIPTOR_LEN};
    use crate::error::ConvertError;
    use crate::formats::imd::{ImdImage, ImdWriter};
    use crate::geometry::GeometryBuilder;
    use crate::materialize::{convert, Materializer};
    use crate::mode::DataMode;
    use crate::skew::SkewTable;
    use crate::track::{SectorStatus, TrackRecord};
    use std::io::{Cursor, Read, Seek, SeekFrom};

    /// Raw image whose sectors start with their index in the file (big endian)
    /// and are otherwise filled with 0xE5.
    fn raw_image(sectors: usize, length: usize) -> Vec<u8> {
        let mut image = Vec::with_capacity(sectors * length);
        for index in 0..sectors {
            let mut sector = vec![0xE5u8; length];
            sector[..2].copy_from_slice(&(index as u16).to_be_bytes());
            image.extend(sector);
        }
        image
    }

    fn index_of(data: &[u8]) -> usize {
        u16::from_be_bytes([data[0], data[1]]) as usize
    }

    /// Records every absolute seek made on the inner reader.
    struct SeekLog<R> {
        inner: R,
        seeks: Vec<u64>,
    }

    impl<R: Read> Read for SeekLog<R> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.inner.read(buf)
        }
    }

    impl<R: Seek> Seek for SeekLog<R> {
        fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
            if let SeekFrom::Start(offset) = pos {
                self.seeks.push(offset);
            }
            self.inner.seek(pos)
        }
    }

    #[test]
    fn paired_sides_with_negative_skew() {
        let geometry = GeometryBuilder {
            cylinders: Some(40),
            heads: Some(2),
            sectors: Some(10),
            sector_length: Some(512),
            side_policy: Some(2),
            skew: Some(-4),
            density: Some(crate::geometry::Density::Double),
            ..Default::default()
        }
        .build()
        .unwrap();
        let mut source = Cursor::new(raw_image(40 * 2 * 10, 512));
        assert_eq!(source.get_ref().len(), 40 * 2 * 10 * 512);

        let mut tracks: Vec<TrackRecord> = Vec::new();
        let written = convert(&geometry, &mut source, false, CapacityCheck::default(), &mut tracks).unwrap();
        assert_eq!(written, 80);
        assert_eq!(tracks.len(), 80);

        let table = SkewTable::build(-4, 10).unwrap();
        assert_eq!(table.as_slice(), &[0, 8, 3, 6, 1, 9, 4, 7, 2, 5]);

        for (n, track) in tracks.iter().enumerate() {
            assert_eq!((track.cylinder as usize, track.head as usize), (n / 2, n % 2));
            assert_eq!(track.mode, DataMode::Mfm300);
            assert!(track.sectors.iter().all(|s| s.head == 0 && s.cylinder == track.cylinder));
            assert!(track.sectors.iter().all(|s| !s.deleted && s.status == SectorStatus::Good));
            for position in 0..10 {
                let sector = &track.sectors[table.slot(position).unwrap()];
                assert_eq!(index_of(&sector.data), n * 10 + position);
                assert_eq!(sector.sector as usize, position + if track.head == 0 { 0 } else { 10 });
            }
        }
        assert_eq!(tracks[0].sector_numbers(), vec![0, 4, 8, 2, 6, 9, 3, 7, 1, 5]);
        assert_eq!(tracks[1].sector_numbers(), vec![10, 14, 18, 12, 16, 19, 13, 17, 11, 15]);
    }

    #[test]
    fn continuation_seeks_past_side_zero() {
        let geometry = GeometryBuilder {
            cylinders: Some(40),
            heads: Some(2),
            sectors: Some(10),
            sector_length: Some(512),
            side_policy: Some(0),
            ..Default::default()
        }
        .build()
        .unwrap();
        let materializer = Materializer::new(&geometry).unwrap();
        let mut source = SeekLog { inner: Cursor::new(raw_image(800, 512)), seeks: Vec::new() };

        let track = materializer.read_track(&mut source, 5, 1).unwrap();
        assert_eq!(source.seeks, vec![(1 * 40 + 5) * 10 * 512]);
        assert_ne!(source.seeks[0], (5 * 2 + 1) * 10 * 512);
        assert_eq!(index_of(&track.sectors[0].data), 450);
        assert_eq!(track.sector_numbers(), (1..=10).collect::<Vec<u8>>());

        let mut tracks = Vec::new();
        source.seeks.clear();
        materializer.run(&mut source, &mut tracks).unwrap();
        assert_eq!(source.seeks.len(), 80);
        assert_eq!(index_of(&tracks[1].sectors[0].data), 400);
        assert_eq!(index_of(&tracks[2].sectors[0].data), 10);
    }

    #[test]
    fn unsupported_sector_length_fails_before_any_io() {
        let builder = GeometryBuilder {
            cylinders: Some(40),
            heads: Some(2),
            sectors: Some(10),
            sector_length: Some(300),
            ..Default::default()
        };
        assert!(matches!(builder.build(), Err(ConvertError::UnsupportedSectorLength(300))));
    }

    #[test]
    fn unit_skew_is_identity() {
        for skew in [0, 1, -1] {
            let geometry = GeometryBuilder {
                cylinders: Some(1),
                heads: Some(2),
                sectors: Some(10),
                sector_length: Some(128),
                skew: Some(skew),
                ..Default::default()
            }
            .build()
            .unwrap();
            let materializer = Materializer::new(&geometry).unwrap();
            assert!(materializer.skew_table(0).is_none());
            assert!(materializer.skew_table(1).is_none());
            let mut tracks = Vec::new();
            materializer.run(&mut Cursor::new(raw_image(20, 128)), &mut tracks).unwrap();
            for track in &tracks {
                assert_eq!(track.sector_numbers(), (1..=10).collect::<Vec<u8>>());
            }
        }
    }

    #[test]
    fn probed_image_round_trips_through_imd() {
        let mut image = raw_image(2 * 2 * 4, 128);
        let mut trailer = b"5m128z4p2s2t1d2i3l0h\n".to_vec();
        trailer.resize(DESCRIPTOR_LEN as usize, 0);
        image.extend(trailer);
        let mut source = Cursor::new(image);

        let geometry = descriptor::probe(&mut source).unwrap().build().unwrap();
        let mut writer = ImdWriter::new(Vec::new(), "IMD 1.18: test\r\nprobed").unwrap();
        assert_eq!(convert(&geometry, &mut source, true, CapacityCheck::default(), &mut writer).unwrap(), 4);
        let container = ImdImage::parse(&writer.finish().unwrap()).unwrap();

        assert_eq!(container.comment, "IMD 1.18: test\r\nprobed");
        assert_eq!(container.extent(), (2, 2));
        let side1 = &container.tracks[3];
        assert_eq!((side1.cylinder, side1.head), (1, 1));
        assert_eq!(side1.sector_numbers(), vec![4, 5, 6, 7]);
        assert!(side1.sectors.iter().all(|s| s.head == 0));
        assert_eq!(index_of(&side1.sectors[2].data), 14);
        assert_eq!(side1.sectors[2].data[2..], [0xE5u8; 126][..]);
    }

    #[test]
    fn descriptor_counts_against_capacity_only_when_probed() {
        let mut image = raw_image(4, 128);
        let mut trailer = b"5m128z4p1s1t".to_vec();
        trailer.resize(DESCRIPTOR_LEN as usize, 0);
        image.extend(trailer);
        let geometry = descriptor::parse(&image[512..]).unwrap().build().unwrap();

        let mut tracks = Vec::new();
        let mut source = Cursor::new(image);
        assert!(convert(&geometry, &mut source, true, CapacityCheck::default(), &mut tracks).is_ok());
        let err = convert(&geometry, &mut source, false, CapacityCheck::default(), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, ConvertError::ImageTooLarge { actual: 640, declared: 512 }));
    }
}
