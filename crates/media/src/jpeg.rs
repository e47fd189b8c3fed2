//! JPEG segment walk: integrity verification and metadata stripping.

use crate::error::{MediaError, MediaResult};

const SOI: [u8; 2] = [0xff, 0xd8];
const EOI: [u8; 2] = [0xff, 0xd9];

/// Canonicalize a JPEG byte stream.
///
/// Walks the marker segments up to start-of-scan, verifies the frame header,
/// drops EXIF/APPn (except the JFIF APP0) and comment segments, then copies
/// the entropy-coded data verbatim. Deterministic for identical input.
pub(crate) fn canonicalize(data: &[u8], max_dimension: u32) -> MediaResult<Vec<u8>> {
    if data.len() < 4 || data[..2] != SOI {
        return Err(MediaError::Corrupt("missing SOI marker".to_string()));
    }

    let mut out = Vec::with_capacity(data.len());
    out.extend_from_slice(&SOI);

    let mut pos = 2;
    let mut saw_frame = false;

    loop {
        if pos + 2 > data.len() {
            return Err(MediaError::Corrupt("truncated before scan data".to_string()));
        }
        if data[pos] != 0xff {
            return Err(MediaError::Corrupt(format!(
                "expected marker at offset {pos}"
            )));
        }
        // Skip fill bytes preceding the marker code.
        while pos + 1 < data.len() && data[pos + 1] == 0xff {
            pos += 1;
        }
        if pos + 2 > data.len() {
            return Err(MediaError::Corrupt(
                "truncated after marker padding".to_string(),
            ));
        }
        let marker = data[pos + 1];
        pos += 2;

        match marker {
            // Standalone markers have no place in the header section.
            0xd8 | 0xd9 | 0x01 | 0xd0..=0xd7 => {
                return Err(MediaError::Corrupt(format!(
                    "unexpected marker 0xff{marker:02x} in header section"
                )));
            }
            _ => {}
        }

        if pos + 2 > data.len() {
            return Err(MediaError::Corrupt("truncated segment length".to_string()));
        }
        let seg_len = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
        if seg_len < 2 || pos + seg_len > data.len() {
            return Err(MediaError::Corrupt(format!(
                "invalid segment length for marker 0xff{marker:02x}"
            )));
        }
        let seg_start = pos - 2;
        let seg_end = pos + seg_len;
        let payload = &data[pos + 2..seg_end];

        match marker {
            // Baseline, extended sequential, progressive frames.
            0xc0 | 0xc1 | 0xc2 => {
                if payload.len() < 5 {
                    return Err(MediaError::Corrupt("truncated frame header".to_string()));
                }
                let height = u16::from_be_bytes([payload[1], payload[2]]) as u32;
                let width = u16::from_be_bytes([payload[3], payload[4]]) as u32;
                if width == 0 || height == 0 {
                    return Err(MediaError::Corrupt("zero image dimension".to_string()));
                }
                if width > max_dimension || height > max_dimension {
                    return Err(MediaError::DimensionsTooLarge {
                        width,
                        height,
                        max: max_dimension,
                    });
                }
                saw_frame = true;
                out.extend_from_slice(&data[seg_start..seg_end]);
            }
            // Other SOF variants (lossless, arithmetic) are not supported.
            0xc3 | 0xc5..=0xc7 | 0xc9..=0xcb | 0xcd..=0xcf => {
                return Err(MediaError::Corrupt(format!(
                    "unsupported frame type 0xff{marker:02x}"
                )));
            }
            // JFIF header: kept so the canonical form stays a valid JFIF file.
            0xe0 => out.extend_from_slice(&data[seg_start..seg_end]),
            // EXIF and other application segments, comments: stripped.
            0xe1..=0xef | 0xfe => {}
            // Start of scan: copy the segment and the entropy-coded remainder.
            0xda => {
                if !saw_frame {
                    return Err(MediaError::Corrupt("SOS before frame header".to_string()));
                }
                if data.len() < seg_end + 2 || data[data.len() - 2..] != EOI {
                    return Err(MediaError::Corrupt("missing EOI marker".to_string()));
                }
                out.extend_from_slice(&data[seg_start..]);
                return Ok(out);
            }
            // Quantization/Huffman tables, restart interval, and the rest of
            // the structural segments are preserved as-is.
            _ => out.extend_from_slice(&data[seg_start..seg_end]),
        }

        pos = seg_end;
    }
}


#[cfg(test)]
mod tests {
    use super::testutil::{build_jpeg, segment};
    use super::*;

    const MAX: u32 = 1 << 14;

    #[test]
    fn passes_minimal_jpeg_through() {
        let jpeg = build_jpeg(8, 8, &[]);
        let canonical = canonicalize(&jpeg, MAX).unwrap();
        assert_eq!(canonical, jpeg);
    }

    #[test]
    fn strips_exif_and_comment_segments() {
        let exif = segment(0xe1, b"Exif\0\0MM\0*gps-coordinates");
        let comment = segment(0xfe, b"shot on a phone");
        let jpeg = build_jpeg(8, 8, &[exif, comment]);

        let canonical = canonicalize(&jpeg, MAX).unwrap();
        assert_eq!(canonical, build_jpeg(8, 8, &[]));
    }

    #[test]
    fn rejects_missing_eoi() {
        let jpeg = build_jpeg(8, 8, &[]);
        assert!(matches!(
            canonicalize(&jpeg[..jpeg.len() - 2], MAX),
            Err(MediaError::Corrupt(_))
        ));
    }

    #[test]
    fn rejects_trailing_fill_bytes_without_marker() {
        // SOI followed by nothing but fill bytes: sniffs as JPEG but carries
        // no marker code to read.
        assert!(matches!(
            canonicalize(&[0xff, 0xd8, 0xff, 0xff], MAX),
            Err(MediaError::Corrupt(_))
        ));
        assert!(matches!(
            canonicalize(&[0xff, 0xd8, 0xff, 0xff, 0xff], MAX),
            Err(MediaError::Corrupt(_))
        ));
    }

    #[test]
    fn rejects_garbage_between_segments() {
        let mut jpeg = vec![0xff, 0xd8];
        jpeg.extend_from_slice(b"not a marker");
        assert!(matches!(
            canonicalize(&jpeg, MAX),
            Err(MediaError::Corrupt(_))
        ));
    }

    #[test]
    fn rejects_oversized_dimensions() {
        let jpeg = build_jpeg(u16::MAX, 8, &[]);
        assert!(matches!(
            canonicalize(&jpeg, 1024),
            Err(MediaError::DimensionsTooLarge { .. })
        ));
    }
}
